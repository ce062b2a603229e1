//! The planner bundles the three stores and keeps them consistent with each other
//!
//! UI layers usually create a single [`Planner`] and share it (e.g. in an `Arc`) between sessions.

use std::sync::Arc;

use crate::coordinator::TaskCalendarCoordinator;
use crate::error::ValidationError;
use crate::id::TaskId;
use crate::notifier::Subscription;
use crate::store::{CalendarStore, ReminderStore, TaskStore};
use crate::traits::{ReminderSource, TaskSource};
use crate::Reminder;

/// Owns a [`TaskStore`], a [`CalendarStore`] and a [`ReminderStore`].
///
/// On top of what the [`TaskCalendarCoordinator`] does, deleting a task cancels every reminder attached to it.
#[derive(Debug)]
pub struct Planner {
    tasks: Arc<TaskStore>,
    calendar: Arc<CalendarStore>,
    reminders: Arc<ReminderStore>,
    coordinator: TaskCalendarCoordinator,

    _reminder_cascade: Subscription,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Create an empty planner
    pub fn new() -> Self {
        let tasks = Arc::new(TaskStore::new());
        let calendar = Arc::new(CalendarStore::new());
        let reminders = Arc::new(ReminderStore::new());
        let coordinator = TaskCalendarCoordinator::new(Arc::clone(&tasks), Arc::clone(&calendar));

        let reminder_cascade = {
            let reminders = Arc::clone(&reminders);
            tasks.notifier().deleted().subscribe(move |task_id| {
                reminders.cancel_for_task(*task_id);
            })
        };

        Self {
            tasks,
            calendar,
            reminders,
            coordinator,
            _reminder_cascade: reminder_cascade,
        }
    }

    /// Create a planner that contains the demo tasks and events of [`sample_data`](crate::sample_data)
    pub async fn with_sample_data() -> Result<Self, ValidationError> {
        let planner = Self::new();
        crate::sample_data::populate(&planner).await?;
        Ok(planner)
    }

    pub fn tasks(&self) -> &Arc<TaskStore>           { &self.tasks }
    pub fn calendar(&self) -> &Arc<CalendarStore>    { &self.calendar }
    pub fn reminders(&self) -> &Arc<ReminderStore>   { &self.reminders }
    pub fn coordinator(&self) -> &TaskCalendarCoordinator { &self.coordinator }

    /// Schedule a reminder attached to an existing task
    pub async fn add_reminder(&self, task_id: TaskId, reminder: Reminder) -> Result<Reminder, ValidationError> {
        if self.tasks.get_by_id(task_id).await.is_none() {
            return Err(ValidationError::UnknownTask(task_id));
        }
        let reminder = reminder.for_task(task_id);
        self.reminders.schedule(reminder.clone()).await?;
        Ok(reminder)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crate::{ReminderType, Task};

    #[tokio::test]
    async fn deleting_a_task_cancels_its_reminders() {
        let planner = Planner::new();
        let task = planner.tasks().create(Task::new("Call Doctor")).await.unwrap();
        let other = planner.tasks().create(Task::new("Grocery Shopping")).await.unwrap();
        let soon = Utc::now() + Duration::hours(1);

        planner.add_reminder(task.id(), Reminder::new(soon, ReminderType::Notification, "Call!")).await.unwrap();
        planner.add_reminder(task.id(), Reminder::new(soon, ReminderType::Sms, "Call now!")).await.unwrap();
        let kept = planner.add_reminder(other.id(), Reminder::new(soon, ReminderType::Email, "Milk")).await.unwrap();
        assert_eq!(planner.reminders().len(), 3);

        planner.tasks().delete(task.id()).await;
        assert_eq!(planner.reminders().list_upcoming().await, vec![kept]);
    }

    #[tokio::test]
    async fn reminders_need_an_existing_task() {
        let planner = Planner::new();
        let ghost = TaskId::random();
        let r = Reminder::new(Utc::now(), ReminderType::Notification, "nobody");
        assert_eq!(planner.add_reminder(ghost, r).await, Err(ValidationError::UnknownTask(ghost)));
        assert!(planner.reminders().is_empty());
    }
}
