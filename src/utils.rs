//! Some utility functions

use chrono::NaiveDate;

use crate::traits::{CalendarSource, TaskSource};
use crate::{CalendarEvent, Priority, Task, TaskStatus};

/// A debug utility that pretty-prints tasks, in the order they are given
pub fn print_task_list(tasks: &[Task]) {
    for task in tasks {
        print_task(task);
    }
}

pub fn print_task(task: &Task) {
    println!("    {}", format_task(task));
}

/// One line per task: status, priority, sort order, title, schedule and id
pub fn format_task(task: &Task) -> String {
    let status = match task.status() {
        TaskStatus::Pending => " ",
        TaskStatus::InProgress => "~",
        TaskStatus::Completed => "✓",
        TaskStatus::Cancelled => "x",
        TaskStatus::OnHold => "‖",
    };
    let priority = match task.priority() {
        Priority::Low => ".",
        Priority::Medium => "-",
        Priority::High => "!",
        Priority::Urgent => "‼",
    };
    let scheduled = match task.scheduled_date() {
        Some(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        None => "unscheduled".to_string(),
    };
    format!("{}{} {:>2} {}\t({})\t{}", status, priority, task.sort_order(), task.title(), scheduled, task.id())
}

/// One line per event: time span, type, title and linked task (if any)
pub fn format_event(event: &CalendarEvent) -> String {
    let span = if event.is_all_day() {
        "all day    ".to_string()
    } else {
        format!("{}-{}", event.start_time().format("%H:%M"), event.end_time().format("%H:%M"))
    };
    let link = match event.linked_task_id() {
        Some(task) => format!(" -> task {}", task),
        None => String::new(),
    };
    format!("{} [{:?}] {}{}", span, event.event_type(), event.title(), link)
}

/// A debug utility that pretty-prints what is planned on a given day: calendar events first, then scheduled tasks
pub async fn print_agenda<T, C>(tasks: &T, calendar: &C, date: NaiveDate)
where
    T: TaskSource + Sync,
    C: CalendarSource + Sync,
{
    println!("AGENDA {}", date);
    let mut events = calendar.get_for_date(date).await;
    events.sort_by_key(|e| e.start_time());
    for event in &events {
        println!("    {}", format_event(event));
    }
    for task in tasks.get_by_date(date).await {
        print_task(&task);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use crate::EventType;

    #[test]
    fn formatting() {
        let task = Task::new("Call Doctor").with_priority(Priority::Urgent);
        let line = format_task(&task);
        assert!(line.starts_with(" ‼  0 Call Doctor"));
        assert!(line.contains("unscheduled"));

        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        let event = CalendarEvent::new("Stand-up", start, start + Duration::minutes(15), EventType::Meeting);
        assert_eq!(format_event(&event), "09:00-09:15 [Meeting] Stand-up");
    }
}
