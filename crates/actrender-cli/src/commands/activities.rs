//! `actrender activities`: list reportable activities.

use actrender_core::Activity;

pub fn run() {
    println!("{:<12} Description", "Activity");
    println!("{}", "-".repeat(50));
    for activity in Activity::ALL {
        println!("{:<12} {}", activity.name(), activity.description());
    }
}
