//! In-memory stores for tasks, calendar events and reminders
//!
//! Each store serializes its own mutations behind a single lock, and publishes its changes on its
//! [`ChangeNotifier`](crate::notifier::ChangeNotifier) once the lock has been released.
//! Records are kept in insertion order, which is the "store order" that ties are broken with.

mod task_store;
pub use task_store::TaskStore;
mod calendar_store;
pub use calendar_store::CalendarStore;
mod reminder_store;
pub use reminder_store::ReminderStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a store.
///
/// Subscribers never run while a store is locked, so a poisoned lock can only come from a panic in
/// this crate's own bookkeeping, after which the records are still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
