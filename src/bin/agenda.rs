//! Prints the demo planner, then drags a few things around.
//!
//! Run with `RUST_LOG=debug` to see every store mutation.

use chrono::Duration;

use focus_planner::sample_data::today;
use focus_planner::traits::TaskSource;
use focus_planner::utils::{print_agenda, print_task_list};
use focus_planner::Planner;


#[tokio::main]
async fn main() {
    env_logger::init();

    let planner = match Planner::with_sample_data().await {
        Ok(planner) => planner,
        Err(err) => {
            log::error!("Unable to load the sample data: {}", err);
            return;
        }
    };
    let today = today();

    println!("---- Tasks -----");
    print_task_list(&planner.tasks().list_all().await);
    print_agenda(planner.tasks().as_ref(), planner.calendar().as_ref(), today.date_naive()).await;

    // What the UI sends after a drag gesture: the whole list, in its new order
    let mut ids: Vec<_> = planner.tasks().list_all().await.iter().map(|t| t.id()).collect();
    ids.reverse();
    if let Err(err) = planner.tasks().reorder(&ids).await {
        log::error!("Unable to reorder: {}", err);
    }
    println!("---- Tasks, reversed -----");
    print_task_list(&planner.tasks().list_all().await);

    // What the UI sends after a calendar drop
    let shopping = planner.tasks().search("grocery").await;
    if let Some(task) = shopping.first() {
        let slot = today + Duration::hours(18);
        match planner.coordinator().schedule_task(task.id(), slot).await {
            Ok(Some(event)) => println!("Booked {} at {}", event.title(), event.start_time()),
            Ok(None) => println!("{} has vanished", task.title()),
            Err(err) => log::error!("Unable to book a slot: {}", err),
        }

        let tomorrow = slot + Duration::days(1);
        let outcome = planner.coordinator().move_task_to_date(task.id(), tomorrow).await;
        println!("Moving {} to tomorrow: {}", task.title(), outcome);
        print_agenda(planner.tasks().as_ref(), planner.calendar().as_ref(), tomorrow.date_naive()).await;
    }
}
