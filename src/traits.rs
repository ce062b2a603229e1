//! The contracts that UI layers use to talk to the stores
//!
//! Calls are asynchronous so that an implementation may sit on slow storage, even though the
//! in-memory stores of this crate complete every call immediately.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::id::{EventId, ReminderId, TaskId};
use crate::notifier::ChangeNotifier;
use crate::{CalendarEvent, Priority, Reminder, Task, TaskStatus};

#[async_trait]
pub trait TaskSource {
    /// Every task, by ascending sort order
    async fn list_all(&self) -> Vec<Task>;
    async fn get_by_id(&self, id: TaskId) -> Option<Task>;
    /// Store a new task. It gets a fresh id, the current time as its creation date, and is appended at the end of the manual order.
    async fn create(&self, task: Task) -> Result<Task, ValidationError>;
    /// Replace the stored task that has the same id.
    ///
    /// If there is no such task, nothing happens and `task` is returned as is: callers must not assume it has been stored.
    async fn update(&self, task: Task) -> Result<Task, ValidationError>;
    /// Returns whether a task has been deleted
    async fn delete(&self, id: TaskId) -> bool;

    /// Tasks scheduled on this (UTC) day, in sort order
    async fn get_by_date(&self, date: NaiveDate) -> Vec<Task>;
    async fn get_by_priority(&self, priority: Priority) -> Vec<Task>;
    async fn get_by_status(&self, status: TaskStatus) -> Vec<Task>;

    /// Apply a manual (drag-and-drop) order.
    ///
    /// Listed tasks come first, in the given order. Unknown ids are skipped. Tasks that are not listed keep their
    /// relative order after them, so that sort orders are always `0..n`.
    async fn reorder(&self, ids_in_order: &[TaskId]) -> Result<(), ValidationError>;
    /// Case-insensitive substring search in titles, descriptions and tags. An empty term matches everything.
    async fn search(&self, term: &str) -> Vec<Task>;

    fn notifier(&self) -> &ChangeNotifier<Task, TaskId>;
}

#[async_trait]
pub trait CalendarSource {
    /// Events that start on this (UTC) day
    async fn get_for_date(&self, date: NaiveDate) -> Vec<CalendarEvent>;
    /// Events that start between these (UTC) days, both included
    async fn get_for_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<CalendarEvent>;
    async fn get_by_id(&self, id: EventId) -> Option<CalendarEvent>;
    async fn create(&self, event: CalendarEvent) -> Result<CalendarEvent, ValidationError>;
    /// Replace the stored event that has the same id. Silently does nothing if there is none.
    async fn update(&self, event: CalendarEvent) -> Result<CalendarEvent, ValidationError>;
    async fn delete(&self, id: EventId) -> bool;
    /// Move the event linked to this task so that it starts at `new_date`, keeping its duration.
    ///
    /// Returns `false` (and creates nothing) if no event is linked to this task.
    /// This only moves the event. See [`TaskCalendarCoordinator`](crate::coordinator::TaskCalendarCoordinator) to keep the task in sync.
    async fn move_task_to_date(&self, task_id: TaskId, new_date: DateTime<Utc>) -> bool;

    fn notifier(&self) -> &ChangeNotifier<CalendarEvent, EventId>;
}

#[async_trait]
pub trait ReminderSource {
    async fn schedule(&self, reminder: Reminder) -> Result<(), ValidationError>;
    async fn cancel(&self, id: ReminderId) -> bool;
    /// Uncompleted reminders due strictly after now, soonest first
    async fn list_upcoming(&self) -> Vec<Reminder>;
    /// Completed reminders are kept, but are not upcoming anymore
    async fn mark_complete(&self, id: ReminderId) -> bool;

    fn notifier(&self) -> &ChangeNotifier<Reminder, ReminderId>;
}
