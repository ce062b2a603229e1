//! Support for library configuration options

use std::sync::{Arc, Mutex};

use chrono::Duration;
use csscolorparser::Color;
use once_cell::sync::Lazy;

/// Display color given to calendar events that do not pick one (any CSS color string, e.g. `#007ACC` or `teal`).
/// Feel free to override it when initing this library.
pub static DEFAULT_EVENT_COLOR: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("#007ACC".to_string())));

/// Length (in minutes) of the calendar slot booked for a task that has no estimated duration.
/// Feel free to override it when initing this library.
pub static DEFAULT_TASK_DURATION_MINUTES: Lazy<Arc<Mutex<i64>>> = Lazy::new(|| Arc::new(Mutex::new(60)));


/// The color new events get, parsed from [`DEFAULT_EVENT_COLOR`]
pub fn default_event_color() -> Color {
    let configured = match DEFAULT_EVENT_COLOR.lock() {
        Ok(value) => value.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };

    match csscolorparser::parse(&configured) {
        Ok(color) => color,
        Err(err) => {
            log::warn!("Invalid default event color {:?} ({}), using the built-in one", configured, err);
            Color::from_rgb_u8(0x00, 0x7A, 0xCC)
        },
    }
}

/// The slot length used when scheduling a task without an estimated duration, see [`DEFAULT_TASK_DURATION_MINUTES`]
pub fn default_task_duration() -> Duration {
    let minutes = match DEFAULT_TASK_DURATION_MINUTES.lock() {
        Ok(value) => *value,
        Err(poisoned) => *poisoned.into_inner(),
    };
    Duration::minutes(minutes.max(0))
}
