//! Reminders

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::id::{ReminderId, TaskId};

/// How a reminder should reach the user. Delivery itself is not handled by this crate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderType {
    Notification,
    Email,
    Sms,
}

impl Default for ReminderType {
    fn default() -> Self {
        ReminderType::Notification
    }
}

/// A scheduled alert.
///
/// Reminders live in the [`ReminderStore`](crate::store::ReminderStore). The ones attached to a task
/// name it in their back-reference, and are cancelled when that task is deleted through a [`Planner`](crate::Planner).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    id: ReminderId,
    reminder_time: DateTime<Utc>,
    reminder_type: ReminderType,
    message: String,
    is_completed: bool,
    task_id: Option<TaskId>,
}

impl Reminder {
    pub fn new<S: Into<String>>(reminder_time: DateTime<Utc>, reminder_type: ReminderType, message: S) -> Self {
        Self {
            id: ReminderId::random(),
            reminder_time,
            reminder_type,
            message: message.into(),
            is_completed: false,
            task_id: None,
        }
    }

    pub fn for_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    pub fn id(&self) -> ReminderId                { self.id }
    pub fn reminder_time(&self) -> DateTime<Utc>  { self.reminder_time }
    pub fn reminder_type(&self) -> ReminderType   { self.reminder_type }
    pub fn message(&self) -> &str                 { &self.message }
    pub fn is_completed(&self) -> bool            { self.is_completed }
    pub fn task_id(&self) -> Option<TaskId>       { self.task_id }

    /// Whether this reminder is still to come at `now`
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.is_completed == false && self.reminder_time > now
    }

    pub fn set_reminder_time(&mut self, reminder_time: DateTime<Utc>) {
        self.reminder_time = reminder_time;
    }

    pub fn set_message<S: Into<String>>(&mut self, message: S) {
        self.message = message.into();
    }

    pub(crate) fn set_completed(&mut self) {
        self.is_completed = true;
    }
}
