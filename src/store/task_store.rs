use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::id::TaskId;
use crate::notifier::{Channel, ChangeNotifier};
use crate::traits::TaskSource;
use crate::{Priority, Task, TaskStatus};

use super::lock;

/// Owns every [`Task`]
#[derive(Debug)]
pub struct TaskStore {
    tasks: Mutex<Vec<Task>>,
    notifier: ChangeNotifier<Task, TaskId>,
    /// Published by `update` when the scheduled date of a task has changed
    rescheduled: Channel<Task>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            notifier: ChangeNotifier::new("tasks"),
            rescheduled: Channel::new("tasks", "rescheduled"),
        }
    }

    pub(crate) fn rescheduled(&self) -> &Channel<Task> {
        &self.rescheduled
    }

    /// The scheduled date currently stored for this task, or `None` if there is no such task
    pub(crate) fn scheduled_date_of(&self, id: TaskId) -> Option<Option<DateTime<Utc>>> {
        lock(&self.tasks).iter().find(|t| t.id() == id).map(|t| t.scheduled_date())
    }

    /// Change only the scheduled date of a task, leaving the rest of the stored record as it is.
    ///
    /// Publishes `updated` (but not `rescheduled`). Returns `None` if there is no such task.
    pub(crate) fn set_scheduled_date(&self, id: TaskId, date: Option<DateTime<Utc>>) -> Option<Task> {
        let updated = {
            let mut tasks = lock(&self.tasks);
            let task = tasks.iter_mut().find(|t| t.id() == id)?;
            task.set_scheduled_date(date);
            task.clone()
        };

        log::debug!("Task {} is now scheduled at {:?}", id, date);
        self.notifier.updated().publish(&updated);
        Some(updated)
    }

    pub fn len(&self) -> usize {
        lock(&self.tasks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tasks matching `predicate`, in sort order
    fn filtered<F>(&self, predicate: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        let mut result: Vec<Task> = lock(&self.tasks)
            .iter()
            .filter(|t| predicate(t))
            .cloned()
            .collect();
        // Stable: equal sort orders keep the store order
        result.sort_by_key(|t| t.sort_order());
        result
    }
}

fn validate(task: &Task) -> Result<(), ValidationError> {
    if task.title().trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

#[async_trait]
impl TaskSource for TaskStore {
    async fn list_all(&self) -> Vec<Task> {
        self.filtered(|_| true)
    }

    async fn get_by_id(&self, id: TaskId) -> Option<Task> {
        lock(&self.tasks).iter().find(|t| t.id() == id).cloned()
    }

    async fn create(&self, mut task: Task) -> Result<Task, ValidationError> {
        validate(&task)?;

        let stored = {
            let mut tasks = lock(&self.tasks);

            let mut id = TaskId::random();
            while tasks.iter().any(|t| t.id() == id) {
                id = TaskId::random();
            }
            // Appended at the end. After deletions the store size may already be taken.
            let next_order = tasks.iter()
                .map(|t| t.sort_order() + 1)
                .max()
                .unwrap_or(0)
                .max(tasks.len() as u32);

            task.set_id(id);
            task.set_created_at(Utc::now());
            task.set_sort_order(next_order);
            tasks.push(task.clone());
            task
        };

        log::debug!("Created task {} ({:?})", stored.id(), stored.title());
        self.notifier.created().publish(&stored);
        Ok(stored)
    }

    async fn update(&self, mut task: Task) -> Result<Task, ValidationError> {
        validate(&task)?;

        let rescheduled = {
            let mut tasks = lock(&self.tasks);
            match tasks.iter_mut().find(|t| t.id() == task.id()) {
                None => {
                    log::debug!("No task {} to update. Ignoring it.", task.id());
                    return Ok(task);
                },
                Some(existing) => {
                    // These belong to the store, whatever the caller's copy says
                    task.set_created_at(existing.created_at());
                    task.set_sort_order(existing.sort_order());
                    let rescheduled = existing.scheduled_date() != task.scheduled_date();
                    *existing = task.clone();
                    rescheduled
                },
            }
        };

        log::debug!("Updated task {}", task.id());
        self.notifier.updated().publish(&task);
        if rescheduled {
            self.rescheduled.publish(&task);
        }
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> bool {
        let removed = {
            let mut tasks = lock(&self.tasks);
            match tasks.iter().position(|t| t.id() == id) {
                None => false,
                Some(index) => {
                    tasks.remove(index);
                    true
                },
            }
        };

        if removed {
            log::debug!("Deleted task {}", id);
            self.notifier.deleted().publish(&id);
        }
        removed
    }

    async fn get_by_date(&self, date: NaiveDate) -> Vec<Task> {
        self.filtered(|t| t.is_scheduled_on(date))
    }

    async fn get_by_priority(&self, priority: Priority) -> Vec<Task> {
        self.filtered(|t| t.priority() == priority)
    }

    async fn get_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.filtered(|t| t.status() == status)
    }

    async fn reorder(&self, ids_in_order: &[TaskId]) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for id in ids_in_order {
            if seen.insert(*id) == false {
                return Err(ValidationError::DuplicateReorderId(*id));
            }
        }

        let changed = {
            let mut tasks = lock(&self.tasks);

            // Listed tasks first, then the others in their current order
            let mut new_order: Vec<TaskId> = ids_in_order.iter()
                .filter(|id| tasks.iter().any(|t| t.id() == **id))
                .cloned()
                .collect();
            let mut unlisted: Vec<&Task> = tasks.iter()
                .filter(|t| seen.contains(&t.id()) == false)
                .collect();
            unlisted.sort_by_key(|t| t.sort_order());
            new_order.extend(unlisted.iter().map(|t| t.id()));

            let mut changed = Vec::new();
            for (position, id) in new_order.iter().enumerate() {
                if let Some(task) = tasks.iter_mut().find(|t| t.id() == *id) {
                    if task.sort_order() != position as u32 {
                        task.set_sort_order(position as u32);
                        changed.push(task.clone());
                    }
                }
            }
            changed
        };

        log::debug!("Reordered tasks, {} of them moved", changed.len());
        for task in &changed {
            self.notifier.updated().publish(task);
        }
        Ok(())
    }

    async fn search(&self, term: &str) -> Vec<Task> {
        let needle = term.to_lowercase();
        self.filtered(|t| t.matches_lowercase(&needle))
    }

    fn notifier(&self) -> &ChangeNotifier<Task, TaskId> {
        &self.notifier
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use chrono::{Duration, TimeZone};

    async fn store_with(titles: &[&str]) -> (TaskStore, Vec<Task>) {
        let store = TaskStore::new();
        let mut created = Vec::new();
        for title in titles {
            created.push(store.create(Task::new(*title)).await.unwrap());
        }
        (store, created)
    }

    fn ids(tasks: &[Task]) -> Vec<TaskId> {
        tasks.iter().map(|t| t.id()).collect()
    }

    #[tokio::test]
    async fn created_tasks_are_listed_in_creation_order() {
        let (store, created) = store_with(&["A", "B", "C"]).await;

        let all = store.list_all().await;
        assert_eq!(all, created);
        assert_eq!(all.iter().map(|t| t.sort_order()).collect::<Vec<_>>(), vec![0, 1, 2]);

        let unique: HashSet<TaskId> = ids(&all).into_iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[tokio::test]
    async fn create_assigns_a_fresh_id() {
        let store = TaskStore::new();
        let draft = Task::new("Call Doctor");
        let stored = store.create(draft.clone()).await.unwrap();

        assert_ne!(stored.id(), draft.id());
        assert_eq!(store.get_by_id(stored.id()).await, Some(stored.clone()));
        assert_eq!(store.get_by_id(draft.id()).await, None);
    }

    #[tokio::test]
    async fn empty_titles_are_refused() {
        let store = TaskStore::new();
        assert_eq!(store.create(Task::new("   ")).await, Err(ValidationError::EmptyTitle));
        assert!(store.is_empty());

        let mut task = store.create(Task::new("Valid")).await.unwrap();
        task.set_title("");
        assert_eq!(store.update(task.clone()).await, Err(ValidationError::EmptyTitle));
        assert_eq!(store.get_by_id(task.id()).await.unwrap().title(), "Valid");
    }

    #[tokio::test]
    async fn updating_an_unknown_task_changes_nothing() {
        let (store, created) = store_with(&["A", "B"]).await;
        let stranger = Task::new("Not stored");

        let returned = store.update(stranger.clone()).await.unwrap();
        assert_eq!(returned, stranger);
        assert_eq!(store.list_all().await, created);
    }

    #[tokio::test]
    async fn update_replaces_the_record_but_keeps_store_fields() {
        let (store, created) = store_with(&["A", "B"]).await;
        let mut b = created[1].clone();
        b.set_title("B, renamed");
        b.set_priority(Priority::Urgent);
        b.set_sort_order(42);

        let updated = store.update(b).await.unwrap();
        assert_eq!(updated.sort_order(), 1);
        assert_eq!(updated.created_at(), created[1].created_at());
        assert_eq!(store.get_by_id(updated.id()).await, Some(updated));
    }

    #[tokio::test]
    async fn delete_twice() {
        let (store, created) = store_with(&["A", "B"]).await;
        let a = created[0].id();

        assert!(store.delete(a).await);
        assert_eq!(store.get_by_id(a).await, None);
        assert!(store.delete(a).await == false);
        assert_eq!(ids(&store.list_all().await), vec![created[1].id()]);
    }

    #[tokio::test]
    async fn creating_after_a_deletion_does_not_reuse_a_sort_order() {
        let (store, created) = store_with(&["A", "B", "C"]).await;
        store.delete(created[0].id()).await;

        let d = store.create(Task::new("D")).await.unwrap();
        assert_eq!(d.sort_order(), 3);
        assert_eq!(ids(&store.list_all().await), vec![created[1].id(), created[2].id(), d.id()]);
    }

    #[tokio::test]
    async fn reorder_swaps_two_tasks() {
        let (store, created) = store_with(&["a", "b"]).await;
        let (a, b) = (created[0].id(), created[1].id());

        store.reorder(&[b, a]).await.unwrap();
        assert_eq!(ids(&store.list_all().await), vec![b, a]);
    }

    #[tokio::test]
    async fn partial_reorder_keeps_orders_contiguous() {
        let (store, created) = store_with(&["a", "b", "c", "d"]).await;
        let (a, b, c, d) = (created[0].id(), created[1].id(), created[2].id(), created[3].id());

        store.reorder(&[d, TaskId::random(), b]).await.unwrap();

        let all = store.list_all().await;
        assert_eq!(ids(&all), vec![d, b, a, c]);
        assert_eq!(all.iter().map(|t| t.sort_order()).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn reorder_refuses_duplicates() {
        let (store, created) = store_with(&["a", "b"]).await;
        let (a, b) = (created[0].id(), created[1].id());

        assert_eq!(store.reorder(&[b, a, b]).await, Err(ValidationError::DuplicateReorderId(b)));
        assert_eq!(ids(&store.list_all().await), vec![a, b]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let store = TaskStore::new();
        let math = store.create(Task::new("Complete Math Assignment")).await.unwrap();
        store.create(Task::new("Grocery Shopping")).await.unwrap();

        assert_eq!(store.search("math").await, vec![math.clone()]);
        assert_eq!(store.search("MATH").await, vec![math]);
        assert_eq!(store.search("").await.len(), 2);
    }

    #[tokio::test]
    async fn filters() {
        let day = Utc.with_ymd_and_hms(2024, 5, 6, 15, 0, 0).unwrap();
        let store = TaskStore::new();
        let a = store.create(Task::new("A").with_priority(Priority::High).with_scheduled_date(day)).await.unwrap();
        let b = store.create(Task::new("B").with_priority(Priority::Low).with_status(TaskStatus::OnHold)).await.unwrap();
        let c = store.create(Task::new("C").with_priority(Priority::High).with_scheduled_date(day + Duration::days(1))).await.unwrap();

        assert_eq!(store.get_by_priority(Priority::High).await, vec![a.clone(), c.clone()]);
        assert_eq!(store.get_by_priority(Priority::Low).await, vec![b.clone()]);
        assert_eq!(store.get_by_status(TaskStatus::OnHold).await, vec![b]);
        assert_eq!(store.get_by_date(day.date_naive()).await, vec![a]);
        assert_eq!(store.get_by_date((day + Duration::days(1)).date_naive()).await, vec![c]);
    }

    #[tokio::test]
    async fn notifications() {
        let store = TaskStore::new();
        let created = Arc::new(AtomicUsize::new(0));
        let updated = Arc::new(AtomicUsize::new(0));
        let deleted = Arc::new(AtomicUsize::new(0));

        let _subs = {
            let (c, u, d) = (created.clone(), updated.clone(), deleted.clone());
            vec![
                store.notifier().created().subscribe(move |_| { c.fetch_add(1, Ordering::SeqCst); }),
                store.notifier().updated().subscribe(move |_| { u.fetch_add(1, Ordering::SeqCst); }),
                store.notifier().deleted().subscribe(move |_| { d.fetch_add(1, Ordering::SeqCst); }),
            ]
        };

        let task = store.create(Task::new("A")).await.unwrap();
        store.update(task.clone()).await.unwrap();
        store.update(Task::new("unknown")).await.unwrap();
        store.delete(task.id()).await;
        store.delete(task.id()).await;

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(updated.load(Ordering::SeqCst), 1);
        assert_eq!(deleted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn only_schedule_changes_are_reported_as_reschedules() {
        let (store, created) = store_with(&["A", "B"]).await;
        let rescheduled = Arc::new(AtomicUsize::new(0));
        let _sub = {
            let r = rescheduled.clone();
            store.rescheduled().subscribe(move |_| { r.fetch_add(1, Ordering::SeqCst); })
        };

        let mut a = created[0].clone();
        a.set_title("A, renamed");
        store.update(a.clone()).await.unwrap();
        store.reorder(&[created[1].id(), a.id()]).await.unwrap();
        assert_eq!(rescheduled.load(Ordering::SeqCst), 0);

        a.set_scheduled_date(Some(Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap()));
        store.update(a.clone()).await.unwrap();
        store.update(a.clone()).await.unwrap();
        assert_eq!(rescheduled.load(Ordering::SeqCst), 1);

        // The coordinator's own writes have already moved the event
        store.set_scheduled_date(a.id(), None);
        assert_eq!(rescheduled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn setting_the_schedule_keeps_the_rest_of_the_record() {
        let (store, created) = store_with(&["A"]).await;
        let day = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();

        // Another session renamed the task in the meantime
        let mut renamed = created[0].clone();
        renamed.set_title("Renamed");
        store.update(renamed).await.unwrap();

        let stored = store.set_scheduled_date(created[0].id(), Some(day)).unwrap();
        assert_eq!(stored.title(), "Renamed");
        assert_eq!(stored.scheduled_date(), Some(day));
        assert_eq!(store.scheduled_date_of(created[0].id()), Some(Some(day)));

        assert!(store.set_scheduled_date(TaskId::random(), Some(day)).is_none());
        assert_eq!(store.scheduled_date_of(TaskId::random()), None);
    }

    #[tokio::test]
    async fn a_failing_subscriber_does_not_undo_the_mutation() {
        let store = TaskStore::new();
        let _sub = store.notifier().created().subscribe(|_| panic!("UI crashed"));

        let task = store.create(Task::new("A")).await.unwrap();
        assert_eq!(store.get_by_id(task.id()).await, Some(task));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creations_get_distinct_ids() {
        let store = Arc::new(TaskStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for j in 0..25 {
                    ids.push(store.create(Task::new(format!("task {}-{}", i, j))).await.unwrap().id());
                }
                ids
            }));
        }

        let mut all_ids = HashSet::new();
        for handle in handles {
            all_ids.extend(handle.await.unwrap());
        }
        assert_eq!(all_ids.len(), 200);
        assert_eq!(store.len(), 200);

        let orders: HashSet<u32> = store.list_all().await.iter().map(|t| t.sort_order()).collect();
        assert_eq!(orders.len(), 200);
    }
}
