//! To-do tasks

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::id::TaskId;

/// How urgent a task is. Variants are ordered, `Low < Medium < High < Urgent`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    OnHold,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// A to-do task
///
/// Tasks are value records: read one from a [`TaskSource`](crate::traits::TaskSource), change it with the setters,
/// and hand it back to `update`, which replaces the whole stored record.
/// The id, creation date and sort order are owned by the store and cannot be changed from outside the crate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    priority: Priority,
    status: TaskStatus,

    /// Set by the store when the task is created
    created_at: DateTime<Utc>,
    due_date: Option<DateTime<Utc>>,
    /// When set, the task occupies a slot in the calendar
    scheduled_date: Option<DateTime<Utc>>,
    /// Maintained by [`Task::set_status`]
    completed_at: Option<DateTime<Utc>>,
    #[serde(with = "duration_minutes")]
    estimated_duration: Option<Duration>,

    tags: BTreeSet<String>,
    category: String,

    /// Whether this task has been imported from an outside system
    is_external: bool,
    /// The id of this task in the outside system it was imported from (if known)
    external_ref: Option<String>,

    /// Manual (drag-and-drop) position among all tasks
    sort_order: u32,
}

impl Task {
    /// Create a brand new Task that is not in a store yet.
    ///
    /// It gets a random id, but the store will assign another one when it is `create`d.
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            id: TaskId::random(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            created_at: Utc::now(),
            due_date: None,
            scheduled_date: None,
            completed_at: None,
            estimated_duration: None,
            tags: BTreeSet::new(),
            category: String::new(),
            is_external: false,
            external_ref: None,
            sort_order: 0,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(|t| t.into()).collect();
        self
    }

    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_scheduled_date(mut self, scheduled: DateTime<Utc>) -> Self {
        self.scheduled_date = Some(scheduled);
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_estimated_duration(mut self, duration: Duration) -> Self {
        self.estimated_duration = Some(duration);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.set_status(status);
        self
    }

    pub fn id(&self) -> TaskId                  { self.id }
    pub fn title(&self) -> &str                 { &self.title }
    pub fn description(&self) -> &str           { &self.description }
    pub fn priority(&self) -> Priority          { self.priority }
    pub fn status(&self) -> TaskStatus          { self.status }
    pub fn created_at(&self) -> DateTime<Utc>   { self.created_at }
    pub fn due_date(&self) -> Option<DateTime<Utc>>       { self.due_date }
    pub fn scheduled_date(&self) -> Option<DateTime<Utc>> { self.scheduled_date }
    pub fn completed_at(&self) -> Option<DateTime<Utc>>   { self.completed_at }
    pub fn estimated_duration(&self) -> Option<Duration>  { self.estimated_duration }
    pub fn tags(&self) -> &BTreeSet<String>     { &self.tags }
    pub fn category(&self) -> &str              { &self.category }
    pub fn is_external(&self) -> bool           { self.is_external }
    pub fn external_ref(&self) -> Option<&str>  { self.external_ref.as_deref() }
    pub fn sort_order(&self) -> u32             { self.sort_order }

    pub fn completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Whether this task is scheduled on the given (UTC) day
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.scheduled_date.map(|d| d.date_naive() == date).unwrap_or(false)
    }

    /// Case-insensitive substring match against the title, the description and every tag.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }

    pub fn set_title<S: Into<String>>(&mut self, title: S) {
        self.title = title.into();
    }

    pub fn set_description<S: Into<String>>(&mut self, description: S) {
        self.description = description.into();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Set the status.
    /// Entering `Completed` stamps the completion date, leaving it clears the date.
    pub fn set_status(&mut self, status: TaskStatus) {
        match (self.status, status) {
            (TaskStatus::Completed, TaskStatus::Completed) => {},
            (_, TaskStatus::Completed) => self.completed_at = Some(Utc::now()),
            (_, _) => self.completed_at = None,
        }
        self.status = status;
    }

    pub fn set_due_date(&mut self, due: Option<DateTime<Utc>>) {
        self.due_date = due;
    }

    /// Note that changing this on a stored task moves its linked calendar event, if any (see [`crate::coordinator`])
    pub fn set_scheduled_date(&mut self, scheduled: Option<DateTime<Utc>>) {
        self.scheduled_date = scheduled;
    }

    pub fn set_estimated_duration(&mut self, duration: Option<Duration>) {
        self.estimated_duration = duration;
    }

    pub fn set_category<S: Into<String>>(&mut self, category: S) {
        self.category = category.into();
    }

    /// Returns whether the tag was not present yet
    pub fn add_tag<S: Into<String>>(&mut self, tag: S) -> bool {
        self.tags.insert(tag.into())
    }

    /// Returns whether the tag was present
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    /// Flag this task as imported from an outside system
    pub fn mark_external(&mut self, external_ref: Option<String>) {
        self.is_external = true;
        self.external_ref = external_ref;
    }

    pub(crate) fn set_id(&mut self, id: TaskId) {
        self.id = id;
    }

    pub(crate) fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }

    pub(crate) fn set_sort_order(&mut self, sort_order: u32) {
        self.sort_order = sort_order;
    }
}


/// (De)serializes an optional duration as a whole number of minutes
mod duration_minutes {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&d.num_minutes()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let minutes = Option::<i64>::deserialize(deserializer)?;
        Ok(minutes.map(Duration::minutes))
    }
}
