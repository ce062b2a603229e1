//! Calendar events

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use csscolorparser::Color;

use crate::id::{EventId, TaskId};

/// What a calendar slot is used for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Task,
    Meeting,
    Reminder,
    Break,
    Focus,
}

/// A time-boxed entry in the calendar, that may be linked to a [`Task`](crate::Task).
///
/// The link is a weak reference: deleting either side never deletes the other one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    id: EventId,
    title: String,
    description: String,
    start_time: DateTime<Utc>,
    /// Never before `start_time` for a stored event
    end_time: DateTime<Utc>,
    is_all_day: bool,
    event_type: EventType,
    linked_task_id: Option<TaskId>,
    color: Color,
}

impl CalendarEvent {
    /// Create a brand new event that is not in a store yet.
    /// It uses the configured [default color](crate::config::DEFAULT_EVENT_COLOR).
    pub fn new<S: Into<String>>(title: S, start_time: DateTime<Utc>, end_time: DateTime<Utc>, event_type: EventType) -> Self {
        Self {
            id: EventId::random(),
            title: title.into(),
            description: String::new(),
            start_time,
            end_time,
            is_all_day: false,
            event_type,
            linked_task_id: None,
            color: crate::config::default_event_color(),
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn all_day(mut self) -> Self {
        self.is_all_day = true;
        self
    }

    pub fn linked_to(mut self, task_id: TaskId) -> Self {
        self.linked_task_id = Some(task_id);
        self
    }

    pub fn id(&self) -> EventId                 { self.id }
    pub fn title(&self) -> &str                 { &self.title }
    pub fn description(&self) -> &str           { &self.description }
    pub fn start_time(&self) -> DateTime<Utc>   { self.start_time }
    pub fn end_time(&self) -> DateTime<Utc>     { self.end_time }
    pub fn is_all_day(&self) -> bool            { self.is_all_day }
    pub fn event_type(&self) -> EventType       { self.event_type }
    pub fn linked_task_id(&self) -> Option<TaskId> { self.linked_task_id }
    pub fn color(&self) -> &Color               { &self.color }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// The (UTC) day this event starts on
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    pub fn set_title<S: Into<String>>(&mut self, title: S) {
        self.title = title.into();
    }

    pub fn set_description<S: Into<String>>(&mut self, description: S) {
        self.description = description.into();
    }

    /// Set both bounds at once. The store refuses the event if `end_time` is before `start_time`
    pub fn set_times(&mut self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) {
        self.start_time = start_time;
        self.end_time = end_time;
    }

    /// Move the event so that it starts at `new_start`, keeping its duration
    pub fn move_to(&mut self, new_start: DateTime<Utc>) {
        let duration = self.duration();
        self.start_time = new_start;
        self.end_time = new_start + duration;
    }

    pub fn set_all_day(&mut self, is_all_day: bool) {
        self.is_all_day = is_all_day;
    }

    pub fn set_event_type(&mut self, event_type: EventType) {
        self.event_type = event_type;
    }

    pub fn set_linked_task_id(&mut self, task_id: Option<TaskId>) {
        self.linked_task_id = task_id;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub(crate) fn set_id(&mut self, id: EventId) {
        self.id = id;
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn moving_keeps_the_duration() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 14, 0, 0).unwrap();
        let mut event = CalendarEvent::new("Math Study Session", start, start + Duration::hours(2), EventType::Focus);

        let target = Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 0).unwrap();
        event.move_to(target);
        assert_eq!(event.start_time(), target);
        assert_eq!(event.end_time(), target + Duration::hours(2));
        assert_eq!(event.start_date(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    }

    #[test]
    fn new_events_get_a_color() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
        let event = CalendarEvent::new("Break Time", start, start + Duration::minutes(30), EventType::Break);
        assert_eq!(event.color().to_hex_string().len(), 7);
        assert!(event.linked_task_id().is_none());
    }
}
