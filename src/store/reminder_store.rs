use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::id::{ReminderId, TaskId};
use crate::notifier::ChangeNotifier;
use crate::traits::ReminderSource;
use crate::Reminder;

use super::lock;

/// Owns every [`Reminder`], including the ones attached to a task.
///
/// Scheduling is bookkeeping only: nothing fires when a reminder is due.
#[derive(Debug)]
pub struct ReminderStore {
    reminders: Mutex<Vec<Reminder>>,
    notifier: ChangeNotifier<Reminder, ReminderId>,
}

impl Default for ReminderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderStore {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
            notifier: ChangeNotifier::new("reminders"),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.reminders).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_by_id(&self, id: ReminderId) -> Option<Reminder> {
        lock(&self.reminders).iter().find(|r| r.id() == id).cloned()
    }

    /// Same as [`ReminderSource::list_upcoming`], relative to `now` rather than to the current time
    pub fn list_upcoming_at(&self, now: DateTime<Utc>) -> Vec<Reminder> {
        let mut upcoming: Vec<Reminder> = lock(&self.reminders).iter()
            .filter(|r| r.is_upcoming_at(now))
            .cloned()
            .collect();
        upcoming.sort_by_key(|r| r.reminder_time());
        upcoming
    }

    /// Every reminder attached to this task (completed ones included), by ascending time
    pub fn list_for_task(&self, task_id: TaskId) -> Vec<Reminder> {
        let mut attached: Vec<Reminder> = lock(&self.reminders).iter()
            .filter(|r| r.task_id() == Some(task_id))
            .cloned()
            .collect();
        attached.sort_by_key(|r| r.reminder_time());
        attached
    }

    /// Cancel every reminder attached to this task. Returns how many were cancelled.
    pub fn cancel_for_task(&self, task_id: TaskId) -> usize {
        let cancelled: Vec<ReminderId> = {
            let mut reminders = lock(&self.reminders);
            let ids: Vec<ReminderId> = reminders.iter()
                .filter(|r| r.task_id() == Some(task_id))
                .map(|r| r.id())
                .collect();
            reminders.retain(|r| r.task_id() != Some(task_id));
            ids
        };

        for id in &cancelled {
            self.notifier.deleted().publish(id);
        }
        if cancelled.is_empty() == false {
            log::debug!("Cancelled {} reminder(s) of task {}", cancelled.len(), task_id);
        }
        cancelled.len()
    }
}

#[async_trait]
impl ReminderSource for ReminderStore {
    async fn schedule(&self, reminder: Reminder) -> Result<(), ValidationError> {
        if reminder.reminder_time().timestamp() < 0 {
            return Err(ValidationError::ReminderBeforeEpoch(reminder.reminder_time()));
        }

        {
            let mut reminders = lock(&self.reminders);
            if reminders.iter().any(|r| r.id() == reminder.id()) {
                return Err(ValidationError::DuplicateReminder(reminder.id()));
            }
            reminders.push(reminder.clone());
        }

        log::debug!("Scheduled reminder {} at {}", reminder.id(), reminder.reminder_time());
        self.notifier.created().publish(&reminder);
        Ok(())
    }

    async fn cancel(&self, id: ReminderId) -> bool {
        let removed = {
            let mut reminders = lock(&self.reminders);
            let before = reminders.len();
            reminders.retain(|r| r.id() != id);
            reminders.len() != before
        };

        if removed {
            log::debug!("Cancelled reminder {}", id);
            self.notifier.deleted().publish(&id);
        }
        removed
    }

    async fn list_upcoming(&self) -> Vec<Reminder> {
        self.list_upcoming_at(Utc::now())
    }

    async fn mark_complete(&self, id: ReminderId) -> bool {
        let completed = {
            let mut reminders = lock(&self.reminders);
            reminders.iter_mut()
                .find(|r| r.id() == id)
                .map(|r| {
                    r.set_completed();
                    r.clone()
                })
        };

        match completed {
            None => false,
            Some(reminder) => {
                log::debug!("Reminder {} is complete", id);
                self.notifier.updated().publish(&reminder);
                true
            },
        }
    }

    fn notifier(&self) -> &ChangeNotifier<Reminder, ReminderId> {
        &self.notifier
    }
}
