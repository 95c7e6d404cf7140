use std::fmt::Display;

use chrono::{NaiveTime, TimeDelta};
use tracing::warn;

use super::settings::TrackerSettings;

const SET: char = '1';
const UNSET: char = '0';

/// Work done during one day, one flag per slot. Stored as a string of `'0'` and `'1'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMask {
    slots: Vec<bool>,
}

impl DayMask {
    pub fn empty(slot_count: usize) -> Self {
        Self {
            slots: vec![false; slot_count],
        }
    }

    /// Masks shorter than `slot_count` are padded with unset slots. Longer ones are kept whole,
    /// they were recorded with a different configuration and still count. Anything other than
    /// `'1'` is an unset slot.
    pub fn parse(mask: &str, slot_count: usize) -> Self {
        if !is_well_formed(mask) {
            warn!("Mask {mask:?} contains characters other than '0' and '1', they are read as unset");
        }
        let mut slots = mask.chars().map(|c| c == SET).collect::<Vec<_>>();
        if slots.len() < slot_count {
            slots.resize(slot_count, false);
        }
        Self { slots }
    }

    /// Marks a slot. Returns false if it was already set or doesn't exist.
    pub fn set(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(value) if !*value => {
                *value = true;
                true
            }
            Some(_) | None => false,
        }
    }

    pub fn is_set(&self, slot: usize) -> bool {
        self.slots.get(slot).copied().unwrap_or(false)
    }

    /// Number of slots, set or not.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|v| **v).count()
    }

    pub fn minutes(&self, interval_minutes: u32) -> u64 {
        self.count() as u64 * interval_minutes as u64
    }
}

impl Display for DayMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self
            .slots
            .iter()
            .map(|v| if *v { SET } else { UNSET })
            .collect::<String>();
        f.write_str(&text)
    }
}

/// True if the mask only holds `'0'` and `'1'`. Other characters don't survive a save.
pub fn is_well_formed(mask: &str) -> bool {
    mask.chars().all(|c| c == SET || c == UNSET)
}

/// Slot the given time of day falls into, counted from the start of work hours. None outside
/// of work hours.
pub fn slot_for(time: NaiveTime, settings: &TrackerSettings) -> Option<usize> {
    let work_hours = &settings.work_hours;
    if time < work_hours.start || time >= work_hours.end {
        return None;
    }
    let minutes = (time - work_hours.start).num_minutes();
    let slot = usize::try_from(minutes / settings.time_tracking.interval_minutes as i64).ok()?;
    (slot < settings.time_tracking.total_daily_slots).then_some(slot)
}

/// Start time of a slot, the inverse of [slot_for]. None if the slot would start past midnight,
/// which only happens for masks longer than the configured work day.
pub fn slot_start(slot: usize, settings: &TrackerSettings) -> Option<NaiveTime> {
    let offset = i64::try_from(slot).ok()? * settings.time_tracking.interval_minutes as i64;
    let (time, overflow) = settings
        .work_hours
        .start
        .overflowing_add_signed(TimeDelta::try_minutes(offset)?);
    (overflow == 0).then_some(time)
}
