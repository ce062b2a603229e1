//! Demo content, relative to the current day
//!
//! This is what the planner shows on a first launch (and what the `agenda` binary prints).

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use crate::error::ValidationError;
use crate::traits::{CalendarSource, TaskSource};
use crate::{CalendarEvent, EventType, Planner, Priority, Task, TaskStatus};

/// Midnight (UTC) of the current day
pub fn today() -> DateTime<Utc> {
    let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&midnight)
}

fn color(css: &str) -> csscolorparser::Color {
    csscolorparser::parse(css).unwrap_or_else(|_| crate::config::default_event_color())
}

/// Add five tasks and four calendar events to the planner
pub async fn populate(planner: &Planner) -> Result<(), ValidationError> {
    let today = today();

    let mut math = Task::new("Complete Math Assignment")
        .with_description("Solve problems 1-20 from Chapter 5")
        .with_priority(Priority::High)
        .with_due_date(today + Duration::days(2))
        .with_scheduled_date(today + Duration::days(1))
        .with_estimated_duration(Duration::hours(2))
        .with_category("Education")
        .with_tags(vec!["Math", "Homework", "Urgent"]);
    math.mark_external(Some("teams_123".to_string()));

    let mut science = Task::new("Read Science Chapter")
        .with_description("Read Chapter 8: Photosynthesis and take notes")
        .with_status(TaskStatus::InProgress)
        .with_due_date(today + Duration::days(3))
        .with_scheduled_date(today)
        .with_estimated_duration(Duration::hours(1))
        .with_category("Education")
        .with_tags(vec!["Science", "Reading"]);
    science.mark_external(Some("teams_124".to_string()));

    let shopping = Task::new("Grocery Shopping")
        .with_description("Buy milk, bread, eggs, and vegetables")
        .with_priority(Priority::Low)
        .with_scheduled_date(today)
        .with_estimated_duration(Duration::minutes(45))
        .with_category("Personal")
        .with_tags(vec!["Shopping", "Errands"]);

    let doctor = Task::new("Call Doctor")
        .with_description("Schedule annual checkup appointment")
        .with_estimated_duration(Duration::minutes(15))
        .with_category("Health")
        .with_tags(vec!["Health", "Phone Call"]);

    let presentation = Task::new("Project Presentation")
        .with_description("Prepare slides for quarterly project review")
        .with_priority(Priority::High)
        .with_due_date(today + Duration::days(5))
        .with_scheduled_date(today + Duration::days(3))
        .with_estimated_duration(Duration::hours(3))
        .with_category("Work")
        .with_tags(vec!["Presentation", "Important"]);

    for task in vec![math, science, shopping, doctor, presentation] {
        planner.tasks().create(task).await?;
    }

    let events = vec![
        CalendarEvent::new("Math Study Session", today + Duration::hours(14), today + Duration::hours(16), EventType::Focus)
            .with_description("Focus time for math assignment")
            .with_color(color("#FF6B6B")),
        CalendarEvent::new("Science Reading", today + Duration::hours(10), today + Duration::hours(11), EventType::Task)
            .with_description("Read Chapter 8")
            .with_color(color("#4ECDC4")),
        CalendarEvent::new("Break Time", today + Duration::hours(12), today + Duration::minutes(12 * 60 + 30), EventType::Break)
            .with_description("Take a relaxing break")
            .with_color(color("#45B7D1")),
        CalendarEvent::new("Project Meeting", today + Duration::days(1) + Duration::hours(15), today + Duration::days(1) + Duration::hours(16), EventType::Meeting)
            .with_description("Team sync for quarterly review")
            .with_color(color("#FFB347")),
    ];
    for event in events {
        planner.calendar().create(event).await?;
    }

    log::info!("Added {} sample tasks and {} sample events", planner.tasks().len(), planner.calendar().len());
    Ok(())
}
