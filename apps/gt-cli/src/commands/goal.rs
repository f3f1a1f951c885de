// goal.rs — Goal subcommands: add, list, show, rename, toggle, delete.

use anyhow::bail;
use chrono::Local;
use clap::Subcommand;
use gt_goal::{ConfirmationChannel, DeleteOutcome, Goal, GoalStore, WeeklyGoals};

use super::truncate;
use crate::time_input::{format_reminder, parse_small_goal_arg};

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a big goal.
    Add {
        /// Goal title (e.g., "Run a marathon").
        title: String,
        /// Small goal to schedule, as DAY@TIME=TEXT (e.g., "mon@06:30=5km easy run").
        #[arg(long = "small", value_name = "DAY@TIME=TEXT")]
        small: Vec<String>,
    },
    /// List all goals.
    List,
    /// Show a goal with its weekly small goals.
    Show {
        /// Goal ID.
        id: String,
    },
    /// Change a goal's title.
    Rename {
        /// Goal ID.
        id: String,
        /// New title.
        title: String,
    },
    /// Mark a goal complete, or incomplete again.
    Toggle {
        /// Goal ID.
        id: String,
    },
    /// Delete a goal (asks for confirmation).
    Delete {
        /// Goal ID.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

pub fn execute(
    cmd: &GoalCommands,
    store: &mut GoalStore,
    confirm: &dyn ConfirmationChannel,
) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Add { title, small } => add_goal(store, title, small),
        GoalCommands::List => {
            list_goals(store);
            Ok(())
        }
        GoalCommands::Show { id } => show_goal(store, id),
        GoalCommands::Rename { id, title } => rename_goal(store, id, title),
        GoalCommands::Toggle { id } => toggle_goal(store, id),
        GoalCommands::Delete { id, yes } => {
            if *yes {
                delete_goal(store, id, &gt_goal::AutoConfirm::yes())
            } else {
                delete_goal(store, id, confirm)
            }
        }
    }
}

fn add_goal(store: &mut GoalStore, title: &str, small: &[String]) -> anyhow::Result<()> {
    // Parse everything first so a bad argument leaves the list untouched.
    let today = Local::now().date_naive();
    let mut weekly = WeeklyGoals::new();
    for arg in small {
        let (day, small_goal) = parse_small_goal_arg(arg, today)?;
        weekly.push(day, small_goal);
    }

    let goal = store.create(title, weekly)?;
    println!("Goal created: {}", goal.id);
    println!("  Title:       {}", goal.title);
    println!("  Small goals: {}", goal.weekly_goals.total());
    Ok(())
}

fn list_goals(store: &GoalStore) {
    if store.is_empty() {
        println!("No goals yet. Create one with `gt goal add <title>`.");
        return;
    }

    println!(
        "{:<38} {:<30} {:<6} {:<8} {}",
        "ID", "TITLE", "DONE", "WEEKLY", "DAYS"
    );
    println!("{}", "-".repeat(100));
    for g in store.goals() {
        println!(
            "{:<38} {:<30} {:<6} {:<8} {}",
            g.id,
            truncate(&g.title, 28),
            if g.completed { "[x]" } else { "[ ]" },
            format!(
                "{}/{}",
                g.weekly_goals.completed_total(),
                g.weekly_goals.total()
            ),
            scheduled_days(&g.weekly_goals),
        );
    }

    let summary = store.summary();
    println!(
        "\n{} active • {} completed",
        summary.active, summary.completed
    );
}

/// Short names of the days that have small goals, e.g. "Mon,Wed", or "-".
fn scheduled_days(weekly: &WeeklyGoals) -> String {
    let days: Vec<&str> = weekly
        .iter()
        .filter(|(_, goals)| !goals.is_empty())
        .map(|(day, _)| day.short_name())
        .collect();
    if days.is_empty() {
        "-".to_string()
    } else {
        days.join(",")
    }
}

fn show_goal(store: &GoalStore, id: &str) -> anyhow::Result<()> {
    let Some(g) = store.get(id) else {
        bail!("goal not found: {}", id);
    };
    print!("{}", render_goal(g));
    Ok(())
}

fn render_goal(g: &Goal) -> String {
    let mut out = String::new();
    out.push_str(&format!("Goal:      {}\n", g.id));
    out.push_str(&format!("Title:     {}\n", g.title));
    out.push_str(&format!(
        "Status:    {}\n",
        if g.completed { "completed" } else { "active" }
    ));
    out.push_str(&format!("Created:   {}\n", g.created_at.to_rfc3339()));

    for (day, goals) in g.weekly_goals.iter() {
        if goals.is_empty() {
            continue;
        }
        let plural = if goals.len() == 1 { "" } else { "s" };
        out.push_str(&format!("\n{} ({} goal{})\n", day, goals.len(), plural));
        for (index, sg) in goals.iter().enumerate() {
            out.push_str(&format!(
                "  {} [{}] {} - {}\n",
                index,
                if sg.completed { "x" } else { " " },
                sg.text,
                format_reminder(&sg.reminder_time)
            ));
        }
    }
    if g.weekly_goals.total() == 0 {
        out.push_str("\nNo small goals scheduled.\n");
    }
    out
}

fn rename_goal(store: &mut GoalStore, id: &str, title: &str) -> anyhow::Result<()> {
    let Some(mut goal) = store.get(id).cloned() else {
        bail!("goal not found: {}", id);
    };
    goal.title = title.to_string();
    store.update(goal)?;
    println!("Goal renamed: {}", id);
    Ok(())
}

fn toggle_goal(store: &mut GoalStore, id: &str) -> anyhow::Result<()> {
    match store.toggle_completion(id) {
        Some(true) => println!("Goal completed: {}", id),
        Some(false) => println!("Goal reopened: {}", id),
        None => bail!("goal not found: {}", id),
    }
    Ok(())
}

fn delete_goal(
    store: &mut GoalStore,
    id: &str,
    confirm: &dyn ConfirmationChannel,
) -> anyhow::Result<()> {
    match store.delete(id, confirm) {
        DeleteOutcome::Deleted(g) => println!("Deleted goal: {} ({})", g.title, g.id),
        DeleteOutcome::Cancelled => println!("Kept goal: {}", id),
        DeleteOutcome::NotFound => bail!("goal not found: {}", id),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gt_goal::{AutoConfirm, Weekday, DEFAULT_STORAGE_KEY};
    use gt_storage::MemoryStore;
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn new_store() -> GoalStore {
        GoalStore::new(&Handle::current(), Arc::new(MemoryStore::new()), DEFAULT_STORAGE_KEY)
    }

    #[tokio::test]
    async fn add_goal_with_small_goals() {
        let mut store = new_store();
        add_goal(
            &mut store,
            "Run a marathon",
            &["mon@06:30=5km easy run".to_string(), "sat@8:00 AM=10km".to_string()],
        )
        .unwrap();

        let goal = &store.goals()[0];
        assert_eq!(goal.title, "Run a marathon");
        assert_eq!(goal.weekly_goals.count(Weekday::Monday), 1);
        assert_eq!(goal.weekly_goals.count(Weekday::Saturday), 1);
    }

    #[tokio::test]
    async fn add_goal_with_bad_small_goal_creates_nothing() {
        let mut store = new_store();
        let result = add_goal(&mut store, "Run", &["someday=run".to_string()]);
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rename_and_toggle() {
        let mut store = new_store();
        add_goal(&mut store, "Draft", &[]).unwrap();
        let id = store.goals()[0].id.clone();

        rename_goal(&mut store, &id, "Final").unwrap();
        toggle_goal(&mut store, &id).unwrap();

        let goal = store.get(&id).unwrap();
        assert_eq!(goal.title, "Final");
        assert!(goal.completed);
        assert!(toggle_goal(&mut store, "missing").is_err());
    }

    #[tokio::test]
    async fn delete_respects_confirmation() {
        let mut store = new_store();
        add_goal(&mut store, "Doomed", &[]).unwrap();
        let id = store.goals()[0].id.clone();

        delete_goal(&mut store, &id, &AutoConfirm::no()).unwrap();
        assert_eq!(store.len(), 1);

        let cmd = GoalCommands::Delete {
            id: id.clone(),
            yes: true,
        };
        execute(&cmd, &mut store, &AutoConfirm::no()).unwrap();
        assert!(store.is_empty());
        assert!(delete_goal(&mut store, &id, &AutoConfirm::yes()).is_err());
    }

    #[tokio::test]
    async fn list_shows_scheduled_day_abbreviations() {
        let mut store = new_store();
        add_goal(
            &mut store,
            "Run",
            &["sun@07:00=Long run".to_string(), "tue@18:00=Intervals".to_string()],
        )
        .unwrap();
        add_goal(&mut store, "Someday", &[]).unwrap();

        assert_eq!(scheduled_days(&store.goals()[0].weekly_goals), "Tue,Sun");
        assert_eq!(scheduled_days(&store.goals()[1].weekly_goals), "-");
    }

    #[tokio::test]
    async fn render_lists_only_scheduled_days() {
        let mut store = new_store();
        add_goal(&mut store, "Run", &["wed@18:00=Intervals".to_string()]).unwrap();

        let text = render_goal(&store.goals()[0]);
        assert!(text.contains("Wednesday (1 goal)"));
        assert!(text.contains("Intervals - 6:00 PM"));
        assert!(!text.contains("Monday"));
    }
}
