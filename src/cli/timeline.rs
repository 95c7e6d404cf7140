use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use crate::{
    storage::Database,
    tracking::{report::hourly_timeline, settings::TrackerSettings},
    utils::time::date_to_mask_key,
};

use super::output::render_timeline;

#[derive(Args, Debug, Clone)]
pub struct TimelineCommand {
    #[arg(long, help = "Day to show, YYYY-MM-DD. By default today")]
    date: Option<NaiveDate>,
}

pub async fn process_timeline_command(
    database: &Database,
    command: TimelineCommand,
    today: NaiveDate,
) -> Result<()> {
    let snapshot = database.load().await?;
    let settings = TrackerSettings::from_meta(&snapshot.meta);
    let date = command.date.unwrap_or(today);

    println!("{}", date_to_mask_key(date));
    for line in render_timeline(&hourly_timeline(&snapshot.store, date, &settings)) {
        println!("{line}");
    }
    Ok(())
}
