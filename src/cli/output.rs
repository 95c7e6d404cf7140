use ansi_term::{Colour, Style};
use chrono::NaiveDate;

use crate::{
    project::{entities::ProjectStatus, store::ProjectStore},
    tracking::{
        report::{minutes_on, HourSummary},
        settings::TrackerSettings,
        tick::TickOutcome,
    },
    utils::time::format_minutes,
};

const INDENT: &str = "  ";

/// Renders the store as an indented tree, one project per line, with own, aggregated and
/// `today` minutes. The active project is highlighted when `colored` is set.
pub fn render_tree(
    store: &ProjectStore,
    today: NaiveDate,
    settings: &TrackerSettings,
    colored: bool,
) -> Vec<String> {
    store
        .tree()
        .into_iter()
        .map(|entry| {
            let project = entry.project;
            let line = format!(
                "{}{}\t{}\t{}\t{}\t{}\t{}",
                INDENT.repeat(entry.depth),
                project.title,
                project.path,
                format_minutes(project.own_minutes),
                format_minutes(project.aggregated_minutes),
                format_minutes(minutes_on(project, today, settings)),
                project.status,
            );
            if colored {
                status_style(project.status).paint(line).to_string()
            } else {
                line
            }
        })
        .collect()
}

fn status_style(status: ProjectStatus) -> Style {
    match status {
        ProjectStatus::Active => Colour::Green.bold(),
        ProjectStatus::Paused => Style::new(),
        ProjectStatus::Completed | ProjectStatus::Archived => Colour::Fixed(244).normal(),
    }
}

/// One line per hour: start, total minutes, activity level and the projects of that hour.
pub fn render_timeline(timeline: &[HourSummary]) -> Vec<String> {
    timeline
        .iter()
        .map(|row| {
            let projects = row
                .projects
                .iter()
                .map(|v| format!("{} {}", v.title, format_minutes(v.minutes)))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{:02}:00\t{}\t{}\t{}",
                row.hour,
                format_minutes(row.minutes),
                row.level,
                projects
            )
        })
        .collect()
}

pub fn describe_tick(outcome: &TickOutcome) -> String {
    match outcome {
        TickOutcome::OutsideWorkHours => "Outside of work hours, nothing recorded".into(),
        TickOutcome::Idle { idle } => {
            format!("User is idle for {}s, nothing recorded", idle.as_secs())
        }
        TickOutcome::NoActiveProject => "No active project, nothing recorded".into(),
        TickOutcome::AlreadyRecorded { path, slot } => {
            format!("Slot {slot} is already recorded for {path}")
        }
        TickOutcome::Recorded {
            path,
            slot,
            own_minutes,
            updated,
        } => format!(
            "Recorded slot {slot} for {path}, total {}. Updated {}",
            format_minutes(*own_minutes),
            updated.join(", ")
        ),
    }
}
