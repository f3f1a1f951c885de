// time_input.rs — Time-of-day input for small-goal reminders.
//
// The user types a wall-clock time ("06:30", "5:30 PM"); the reminder is
// stored as a UTC timestamp on the given local date.

use anyhow::{anyhow, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use gt_goal::{SmallGoal, Weekday};

const FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

/// Parse `HH:MM` (24-hour) or `H:MM AM/PM`.
pub fn parse_time_of_day(input: &str) -> anyhow::Result<NaiveTime> {
    let input = input.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| anyhow!("unrecognized time '{}' (try 06:30 or 6:30 AM)", input))
}

/// Reminder timestamp for `time` on the local calendar day `date`.
pub fn reminder_at(time: NaiveTime, date: NaiveDate) -> anyhow::Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("{} does not exist on {} in the local time zone", time, date))
}

/// Parse a reminder time for today.
pub fn reminder_today(input: &str) -> anyhow::Result<DateTime<Utc>> {
    reminder_at(parse_time_of_day(input)?, Local::now().date_naive())
}

/// Local 12-hour rendering, e.g. "6:30 AM".
pub fn format_reminder(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%-I:%M %p").to_string()
}

/// Parse a `DAY@TIME=TEXT` small-goal argument, e.g. `mon@06:30=5km easy run`.
pub fn parse_small_goal_arg(arg: &str, date: NaiveDate) -> anyhow::Result<(Weekday, SmallGoal)> {
    let Some((schedule, text)) = arg.split_once('=') else {
        bail!("expected DAY@TIME=TEXT, got '{}'", arg);
    };
    let Some((day, time)) = schedule.split_once('@') else {
        bail!("expected DAY@TIME before '=', got '{}'", schedule);
    };

    let day: Weekday = day.parse()?;
    let reminder = reminder_at(parse_time_of_day(time)?, date)?;
    Ok((day, SmallGoal::new(text, reminder)?))
}
