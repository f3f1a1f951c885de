// small.rs — Small goal subcommands: add, remove, toggle.

use anyhow::bail;
use clap::Subcommand;
use gt_goal::{GoalStore, Weekday};

use crate::time_input::{format_reminder, reminder_today};

#[derive(Subcommand)]
pub enum SmallCommands {
    /// Schedule a small goal on a weekday.
    Add {
        /// Goal ID.
        goal_id: String,
        /// Weekday (e.g., "monday" or "mon").
        day: Weekday,
        /// What to do (e.g., "5km easy run").
        text: String,
        /// Reminder time, "06:30" or "6:30 AM".
        #[arg(long)]
        at: String,
    },
    /// Remove the small goal at INDEX on a weekday.
    Remove {
        goal_id: String,
        day: Weekday,
        index: usize,
    },
    /// Mark the small goal at INDEX complete, or incomplete again.
    Toggle {
        goal_id: String,
        day: Weekday,
        index: usize,
    },
}

pub fn execute(cmd: &SmallCommands, store: &mut GoalStore) -> anyhow::Result<()> {
    match cmd {
        SmallCommands::Add {
            goal_id,
            day,
            text,
            at,
        } => add_small_goal(store, goal_id, *day, text, at),
        SmallCommands::Remove {
            goal_id,
            day,
            index,
        } => remove_small_goal(store, goal_id, *day, *index),
        SmallCommands::Toggle {
            goal_id,
            day,
            index,
        } => toggle_small_goal(store, goal_id, *day, *index),
    }
}

fn add_small_goal(
    store: &mut GoalStore,
    goal_id: &str,
    day: Weekday,
    text: &str,
    at: &str,
) -> anyhow::Result<()> {
    let reminder = reminder_today(at)?;
    let Some(sg) = store.add_small_goal(goal_id, day, text, reminder)? else {
        bail!("goal not found: {}", goal_id);
    };
    println!(
        "Added to {}: {} - {}",
        day,
        sg.text,
        format_reminder(&sg.reminder_time)
    );
    Ok(())
}

fn remove_small_goal(
    store: &mut GoalStore,
    goal_id: &str,
    day: Weekday,
    index: usize,
) -> anyhow::Result<()> {
    let Some(sg) = store.remove_small_goal(goal_id, day, index) else {
        bail!("no small goal {} on {} for goal {}", index, day, goal_id);
    };
    println!("Removed from {}: {}", day, sg.text);
    Ok(())
}

fn toggle_small_goal(
    store: &mut GoalStore,
    goal_id: &str,
    day: Weekday,
    index: usize,
) -> anyhow::Result<()> {
    match store.toggle_small_goal_completion(goal_id, day, index) {
        Some(completed) => {
            let state = if completed { "done" } else { "not done" };
            println!("{} #{} marked {}", day, index, state);
            Ok(())
        }
        None => bail!("no small goal {} on {} for goal {}", index, day, goal_id),
    }
}
