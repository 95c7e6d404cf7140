use chrono::NaiveDate;

/// This is the standard way of converting a date to a key of daily masks.
pub fn date_to_mask_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats minutes as `2h 05m`, or `45m` under an hour.
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let minutes = minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}
