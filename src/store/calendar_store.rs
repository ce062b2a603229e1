use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::id::{EventId, TaskId};
use crate::notifier::ChangeNotifier;
use crate::traits::CalendarSource;
use crate::CalendarEvent;

use super::lock;

/// Owns every [`CalendarEvent`]
///
/// A task is linked to at most one event at a time.
#[derive(Debug)]
pub struct CalendarStore {
    events: Mutex<Vec<CalendarEvent>>,
    notifier: ChangeNotifier<CalendarEvent, EventId>,
}

impl Default for CalendarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarStore {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            notifier: ChangeNotifier::new("calendar"),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.events).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every event, in store order
    pub fn list_all(&self) -> Vec<CalendarEvent> {
        lock(&self.events).clone()
    }

    /// The event linked to this task, if any
    pub fn get_for_task(&self, task_id: TaskId) -> Option<CalendarEvent> {
        lock(&self.events).iter()
            .find(|e| e.linked_task_id() == Some(task_id))
            .cloned()
    }

    fn filtered<F>(&self, predicate: F) -> Vec<CalendarEvent>
    where
        F: Fn(&CalendarEvent) -> bool,
    {
        lock(&self.events).iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    /// Make the event linked to `task_id` start at `new_start`, unless it already does.
    ///
    /// Returns whether the event has been moved.
    pub(crate) fn follow_task(&self, task_id: TaskId, new_start: DateTime<Utc>) -> bool {
        let moved = {
            let mut events = lock(&self.events);
            match events.iter_mut().find(|e| e.linked_task_id() == Some(task_id)) {
                Some(event) if event.start_time() != new_start => {
                    event.move_to(new_start);
                    Some(event.clone())
                },
                _ => None,
            }
        };

        match moved {
            None => false,
            Some(event) => {
                log::debug!("Event {} follows task {} to {}", event.id(), task_id, new_start);
                self.notifier.updated().publish(&event);
                true
            },
        }
    }

    /// Clear every link to this task. Returns how many events were linked to it.
    pub(crate) fn unlink_task(&self, task_id: TaskId) -> usize {
        let unlinked: Vec<CalendarEvent> = {
            let mut events = lock(&self.events);
            events.iter_mut()
                .filter(|e| e.linked_task_id() == Some(task_id))
                .map(|e| {
                    e.set_linked_task_id(None);
                    e.clone()
                })
                .collect()
        };

        for event in &unlinked {
            log::debug!("Event {} is not linked to deleted task {} anymore", event.id(), task_id);
            self.notifier.updated().publish(event);
        }
        unlinked.len()
    }
}

/// Checks `event` against itself and against the other stored events
fn validate(event: &CalendarEvent, stored: &[CalendarEvent]) -> Result<(), ValidationError> {
    if event.title().trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if event.end_time() < event.start_time() {
        return Err(ValidationError::EndBeforeStart { start: event.start_time(), end: event.end_time() });
    }
    if let Some(task) = event.linked_task_id() {
        let other = stored.iter()
            .find(|e| e.id() != event.id() && e.linked_task_id() == Some(task));
        if let Some(other) = other {
            return Err(ValidationError::TaskAlreadyLinked { task, event: other.id() });
        }
    }
    Ok(())
}

#[async_trait]
impl CalendarSource for CalendarStore {
    async fn get_for_date(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        self.filtered(|e| e.start_date() == date)
    }

    async fn get_for_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<CalendarEvent> {
        self.filtered(|e| start <= e.start_date() && e.start_date() <= end)
    }

    async fn get_by_id(&self, id: EventId) -> Option<CalendarEvent> {
        lock(&self.events).iter().find(|e| e.id() == id).cloned()
    }

    async fn create(&self, mut event: CalendarEvent) -> Result<CalendarEvent, ValidationError> {
        {
            let mut events = lock(&self.events);

            let mut id = EventId::random();
            while events.iter().any(|e| e.id() == id) {
                id = EventId::random();
            }
            event.set_id(id);

            validate(&event, &events)?;
            events.push(event.clone());
        }

        log::debug!("Created event {} ({:?})", event.id(), event.title());
        self.notifier.created().publish(&event);
        Ok(event)
    }

    async fn update(&self, event: CalendarEvent) -> Result<CalendarEvent, ValidationError> {
        {
            let mut events = lock(&self.events);
            let index = match events.iter().position(|e| e.id() == event.id()) {
                None => {
                    log::debug!("No event {} to update. Ignoring it.", event.id());
                    return Ok(event);
                },
                Some(index) => index,
            };

            validate(&event, &events)?;
            events[index] = event.clone();
        }

        log::debug!("Updated event {}", event.id());
        self.notifier.updated().publish(&event);
        Ok(event)
    }

    async fn delete(&self, id: EventId) -> bool {
        let removed = {
            let mut events = lock(&self.events);
            match events.iter().position(|e| e.id() == id) {
                None => false,
                Some(index) => {
                    events.remove(index);
                    true
                },
            }
        };

        if removed {
            log::debug!("Deleted event {}", id);
            self.notifier.deleted().publish(&id);
        }
        removed
    }

    async fn move_task_to_date(&self, task_id: TaskId, new_date: DateTime<Utc>) -> bool {
        let moved = {
            let mut events = lock(&self.events);
            events.iter_mut()
                .find(|e| e.linked_task_id() == Some(task_id))
                .map(|event| {
                    event.move_to(new_date);
                    event.clone()
                })
        };

        match moved {
            None => {
                log::debug!("No event is linked to task {}, nothing to move", task_id);
                false
            },
            Some(event) => {
                log::debug!("Moved event {} of task {} to {}", event.id(), task_id, new_date);
                self.notifier.updated().publish(&event);
                true
            },
        }
    }

    fn notifier(&self) -> &ChangeNotifier<CalendarEvent, EventId> {
        &self.notifier
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use crate::EventType;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn event(title: &str, start: DateTime<Utc>, hours: i64) -> CalendarEvent {
        CalendarEvent::new(title, start, start + Duration::hours(hours), EventType::Meeting)
    }

    #[tokio::test]
    async fn date_and_range_queries() {
        let store = CalendarStore::new();
        let e6 = store.create(event("six", at(6, 10), 1)).await.unwrap();
        let e7 = store.create(event("seven", at(7, 23), 2)).await.unwrap();
        let e9 = store.create(event("nine", at(9, 0), 1)).await.unwrap();

        assert_eq!(store.get_for_date(date(6)).await, vec![e6.clone()]);
        assert!(store.get_for_date(date(8)).await.is_empty());
        // The day an event ends on does not matter
        assert_eq!(store.get_for_date(date(7)).await, vec![e7.clone()]);
        assert_eq!(store.get_for_range(date(6), date(7)).await, vec![e6.clone(), e7.clone()]);
        assert_eq!(store.get_for_range(date(7), date(9)).await, vec![e7, e9]);
        assert!(store.get_for_range(date(9), date(6)).await.is_empty());
    }

    #[tokio::test]
    async fn events_cannot_end_before_they_start() {
        let store = CalendarStore::new();
        let bad = CalendarEvent::new("Backwards", at(6, 10), at(6, 9), EventType::Focus);
        assert!(matches!(store.create(bad).await, Err(ValidationError::EndBeforeStart { .. })));
        assert!(store.is_empty());

        // Zero-length events are fine
        let ok = CalendarEvent::new("Instant", at(6, 10), at(6, 10), EventType::Reminder);
        assert!(store.create(ok).await.is_ok());
    }

    #[tokio::test]
    async fn update_and_delete() {
        let store = CalendarStore::new();
        let mut e = store.create(event("Project Meeting", at(7, 15), 1)).await.unwrap();

        e.set_title("Quarterly review");
        store.update(e.clone()).await.unwrap();
        assert_eq!(store.get_by_id(e.id()).await.unwrap().title(), "Quarterly review");

        let stranger = event("Not stored", at(7, 15), 1);
        assert_eq!(store.update(stranger.clone()).await, Ok(stranger));
        assert_eq!(store.len(), 1);

        assert!(store.delete(e.id()).await);
        assert!(store.delete(e.id()).await == false);
        assert!(store.get_by_id(e.id()).await.is_none());
    }

    #[tokio::test]
    async fn one_event_per_task() {
        let store = CalendarStore::new();
        let task = TaskId::random();
        let first = store.create(event("first", at(6, 10), 1).linked_to(task)).await.unwrap();

        let second = store.create(event("second", at(6, 12), 1).linked_to(task)).await;
        assert_eq!(second, Err(ValidationError::TaskAlreadyLinked { task, event: first.id() }));

        // Updating the linked event itself is fine
        assert!(store.update(first.clone()).await.is_ok());
        assert_eq!(store.get_for_task(task), Some(first));
    }

    #[tokio::test]
    async fn moving_a_task_keeps_the_event_duration() {
        let store = CalendarStore::new();
        let task = TaskId::random();
        let e = store.create(event("Study", at(6, 14), 2).linked_to(task)).await.unwrap();

        assert!(store.move_task_to_date(task, at(9, 8)).await);
        let moved = store.get_by_id(e.id()).await.unwrap();
        assert_eq!(moved.start_time(), at(9, 8));
        assert_eq!(moved.end_time(), at(9, 10));
    }

    #[tokio::test]
    async fn moving_an_unlinked_task_creates_nothing() {
        let store = CalendarStore::new();
        store.create(event("Unrelated", at(6, 14), 2)).await.unwrap();

        assert!(store.move_task_to_date(TaskId::random(), at(9, 8)).await == false);
        assert_eq!(store.len(), 1);
        assert_eq!(store.list_all()[0].start_time(), at(6, 14));
    }

    #[tokio::test]
    async fn unlinking_keeps_the_event() {
        let store = CalendarStore::new();
        let task = TaskId::random();
        let e = store.create(event("Study", at(6, 14), 2).linked_to(task)).await.unwrap();

        assert_eq!(store.unlink_task(task), 1);
        assert_eq!(store.unlink_task(task), 0);
        assert_eq!(store.get_by_id(e.id()).await.unwrap().linked_task_id(), None);
    }
}
