//! Keeps tasks and their linked calendar events in agreement
//!
//! A scheduled task occupies a calendar slot: its `scheduled_date` and the start of its linked
//! [`CalendarEvent`] must agree. The two stores are independent, so the coordinator performs a
//! best-effort dual write. When the second write cannot happen (e.g. the task has just been deleted),
//! the first one is *not* rolled back; the outcome says so and a warning is logged.

use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, Weak};

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::id::TaskId;
use crate::notifier::Subscription;
use crate::store::{CalendarStore, TaskStore};
use crate::traits::{CalendarSource, TaskSource};
use crate::{CalendarEvent, EventType};

/// What happened during [`TaskCalendarCoordinator::move_task_to_date`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No event is linked to this task. Nothing has changed.
    NoLinkedEvent,
    /// Both the event and the task have moved
    Moved,
    /// The event has moved, but the task could not be updated (it does not exist anymore).
    /// The event move is kept.
    EventMovedTaskMissing,
}

impl MoveOutcome {
    /// Whether the calendar event has been moved
    pub fn is_success(&self) -> bool {
        *self != MoveOutcome::NoLinkedEvent
    }
}

impl Display for MoveOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLinkedEvent => write!(f, "no linked event"),
            Self::Moved => write!(f, "moved"),
            Self::EventMovedTaskMissing => write!(f, "event moved, but its task is missing"),
        }
    }
}


/// Coordinates a [`TaskStore`] and a [`CalendarStore`].
///
/// As long as this value lives, it also reacts to changes made directly on the task store:
/// * when `update` changes the `scheduled_date` of a task, its linked event is moved there (keeping its duration).
///   Other updates (renames, reorders...) never touch the calendar.
/// * when a task is deleted, the events linked to it are unlinked (never deleted)
#[derive(Debug)]
pub struct TaskCalendarCoordinator {
    tasks: Arc<TaskStore>,
    calendar: Arc<CalendarStore>,

    _subscriptions: Vec<Subscription>,
}

impl TaskCalendarCoordinator {
    pub fn new(tasks: Arc<TaskStore>, calendar: Arc<CalendarStore>) -> Self {
        let on_reschedule = {
            let calendar = Arc::clone(&calendar);
            let weak_tasks: Weak<TaskStore> = Arc::downgrade(&tasks);
            // Notifications of concurrent updates may arrive out of order.
            // Each reaction reads the stored date, one at a time, so the last one always sees the latest date.
            let following = Mutex::new(());
            tasks.rescheduled().subscribe(move |task| {
                let _following = following.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                let tasks = match weak_tasks.upgrade() {
                    None => return,
                    Some(tasks) => tasks,
                };
                if let Some(Some(scheduled)) = tasks.scheduled_date_of(task.id()) {
                    if calendar.follow_task(task.id(), scheduled) {
                        log::info!("Moved the calendar event of task {} to {}", task.id(), scheduled);
                    }
                }
            })
        };

        let on_delete = {
            let calendar = Arc::clone(&calendar);
            tasks.notifier().deleted().subscribe(move |task_id| {
                let n = calendar.unlink_task(*task_id);
                if n > 0 {
                    log::info!("Unlinked {} event(s) from deleted task {}", n, task_id);
                }
            })
        };

        Self {
            tasks,
            calendar,
            _subscriptions: vec![on_reschedule, on_delete],
        }
    }

    pub fn tasks(&self) -> &Arc<TaskStore> { &self.tasks }
    pub fn calendar(&self) -> &Arc<CalendarStore> { &self.calendar }

    /// Move the event linked to this task to `new_date` (keeping its duration), then set the task's scheduled date accordingly.
    pub async fn move_task_to_date(&self, task_id: TaskId, new_date: DateTime<Utc>) -> MoveOutcome {
        if self.calendar.move_task_to_date(task_id, new_date).await == false {
            return MoveOutcome::NoLinkedEvent;
        }

        let outcome = self.set_scheduled_date(task_id, Some(new_date));
        if outcome == MoveOutcome::EventMovedTaskMissing {
            log::warn!("The event of task {} has been moved to {}, but the task could not be updated. Not rolling back.", task_id, new_date);
        }
        outcome
    }

    /// Book a calendar slot for this task, starting at `start`.
    ///
    /// If the task already has a linked event, that event is moved instead.
    /// Otherwise a new `Task` event is created, lasting the task's estimated duration (or the
    /// [configured default](crate::config::DEFAULT_TASK_DURATION_MINUTES)).
    /// Returns `Ok(None)` if there is no such task.
    pub async fn schedule_task(&self, task_id: TaskId, start: DateTime<Utc>) -> Result<Option<CalendarEvent>, ValidationError> {
        let task = match self.tasks.get_by_id(task_id).await {
            None => return Ok(None),
            Some(task) => task,
        };

        if self.calendar.get_for_task(task_id).is_some() {
            self.move_task_to_date(task_id, start).await;
            return Ok(self.calendar.get_for_task(task_id));
        }

        let duration = task.estimated_duration().unwrap_or_else(crate::config::default_task_duration);
        let draft = CalendarEvent::new(task.title(), start, start + duration, EventType::Task)
            .with_description(task.description())
            .linked_to(task_id);
        let event = self.calendar.create(draft).await?;
        log::info!("Booked event {} for task {}", event.id(), task_id);

        if self.set_scheduled_date(task_id, Some(start)) == MoveOutcome::EventMovedTaskMissing {
            log::warn!("Task {} vanished while its event {} was being created. Keeping the event.", task_id, event.id());
        }
        Ok(Some(event))
    }

    /// Delete the event linked to this task, and clear the task's scheduled date.
    ///
    /// Returns whether there was a linked event.
    pub async fn unschedule_task(&self, task_id: TaskId) -> bool {
        let event = match self.calendar.get_for_task(task_id) {
            None => return false,
            Some(event) => event,
        };

        self.calendar.delete(event.id()).await;
        if self.set_scheduled_date(task_id, None) == MoveOutcome::EventMovedTaskMissing {
            log::warn!("Deleted event {} but its task {} is missing", event.id(), task_id);
        }
        true
    }

    fn set_scheduled_date(&self, task_id: TaskId, date: Option<DateTime<Utc>>) -> MoveOutcome {
        match self.tasks.set_scheduled_date(task_id, date) {
            None => MoveOutcome::EventMovedTaskMissing,
            Some(_) => MoveOutcome::Moved,
        }
    }
}
