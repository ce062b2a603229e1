//! Errors returned when a store refuses a record

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::id::{EventId, ReminderId, TaskId};

/// Input that a store refused to accept.
///
/// Looking up, updating or deleting an id that does not exist is *not* an error:
/// such calls return `None`, `false`, or are silent no-ops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("event ends at {end} which is before its start at {start}")]
    EndBeforeStart { start: DateTime<Utc>, end: DateTime<Utc> },

    #[error("task {task} is already linked to event {event}")]
    TaskAlreadyLinked { task: TaskId, event: EventId },

    #[error("task {0} appears more than once in the reorder list")]
    DuplicateReorderId(TaskId),

    #[error("reminder {0} is already scheduled")]
    DuplicateReminder(ReminderId),

    #[error("reminder time {0} is before the Unix epoch")]
    ReminderBeforeEpoch(DateTime<Utc>),

    #[error("no task with id {0}")]
    UnknownTask(TaskId),
}
