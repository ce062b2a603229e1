//! This crate provides the in-memory core of a personal task, calendar and reminder manager,
//! meant for people who need executive-function support.
//!
//! It owns three kinds of records, each in its own [`store`]:
//! * [`Task`]s, with priorities, statuses, and a manual (drag-and-drop) order,
//! * [`CalendarEvent`]s, that may be linked to a task,
//! * [`Reminder`]s, that may be attached to a task.
//!
//! The stores are used through the asynchronous contracts of the [`traits`] module, and publish their
//! changes on a [`ChangeNotifier`](notifier::ChangeNotifier) so that UI layers can re-render without polling. \
//! A scheduled task and its linked event are kept in agreement by the [`TaskCalendarCoordinator`](coordinator::TaskCalendarCoordinator). \
//! A [`Planner`] bundles all of this together.
//!
//! Nothing is persisted: the content lives as long as the process.

pub mod traits;
pub mod error;
pub use error::ValidationError;
pub mod config;

mod id;
pub use id::{EventId, ReminderId, TaskId};
mod task;
pub use task::{Priority, Task, TaskStatus};
mod event;
pub use event::{CalendarEvent, EventType};
mod reminder;
pub use reminder::{Reminder, ReminderType};

pub mod notifier;
pub mod store;
pub mod coordinator;
pub use coordinator::{MoveOutcome, TaskCalendarCoordinator};
mod planner;
pub use planner::Planner;

pub mod sample_data;
pub mod utils;
