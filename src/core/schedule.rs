//! Weekly opening-hours conflict validation.
//!
//! Windows are bucketed by day and every same-day pair is compared with the
//! half-open rule `a.opens < b.closes && a.closes > b.opens`. Windows that only
//! touch at an endpoint do not conflict. Buckets are tiny (a few windows per
//! day) so the pairwise scan is fine.

use std::collections::BTreeMap;

use crate::domain::model::{ensure_whole_seconds, OpeningSchedule, OpeningWindow, WindowEdit};
use crate::utils::error::{AdminError, Result};

pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 7;

/// First overlapping pair found, by position in the input slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub day: u8,
    pub first: usize,
    pub second: usize,
}

impl From<Conflict> for AdminError {
    fn from(conflict: Conflict) -> Self {
        AdminError::ScheduleConflict {
            day: conflict.day,
            first: conflict.first,
            second: conflict.second,
        }
    }
}

pub fn overlaps(a: &OpeningWindow, b: &OpeningWindow) -> bool {
    a.opens_at_seconds() < b.closes_at_seconds() && a.closes_at_seconds() > b.opens_at_seconds()
}

pub fn find_conflict(windows: &[OpeningWindow]) -> Option<Conflict> {
    let mut by_day: BTreeMap<u8, Vec<(usize, &OpeningWindow)>> = BTreeMap::new();
    for (index, window) in windows.iter().enumerate() {
        by_day.entry(window.day).or_default().push((index, window));
    }

    for (day, bucket) in &by_day {
        for (i, (first, a)) in bucket.iter().enumerate() {
            for (second, b) in &bucket[i + 1..] {
                if overlaps(a, b) {
                    return Some(Conflict {
                        day: *day,
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
    }
    None
}

pub fn has_conflict(windows: &[OpeningWindow]) -> bool {
    find_conflict(windows).is_some()
}

/// Rejects a window that cannot be compared: bad day, sub-second times or
/// non-positive duration.
pub fn check_window(index: usize, window: &OpeningWindow) -> Result<()> {
    if !(FIRST_DAY..=LAST_DAY).contains(&window.day) {
        return Err(AdminError::InvalidDay {
            index,
            day: window.day,
        });
    }
    ensure_whole_seconds("openAt", window.opens_at)?;
    ensure_whole_seconds("closeAt", window.closes_at)?;
    if !window.has_positive_duration() {
        return Err(AdminError::MalformedWindow {
            index,
            day: window.day,
            opens_at: window.opens_at,
            closes_at: window.closes_at,
        });
    }
    Ok(())
}

#[derive(Debug)]
pub struct ScheduleReport {
    pub valid: bool,
    pub conflict_detected: bool,
    pub reason: Option<AdminError>,
}

impl ScheduleReport {
    fn ok() -> Self {
        Self {
            valid: true,
            conflict_detected: false,
            reason: None,
        }
    }

    fn rejected(reason: AdminError) -> Self {
        Self {
            valid: false,
            conflict_detected: matches!(reason, AdminError::ScheduleConflict { .. }),
            reason: Some(reason),
        }
    }

    pub fn into_result(self) -> Result<()> {
        match self.reason {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

/// Full check used before submission. Malformed windows are reported before
/// the overlap scan runs.
pub fn validate_schedule(windows: &[OpeningWindow]) -> ScheduleReport {
    for (index, window) in windows.iter().enumerate() {
        if let Err(reason) = check_window(index, window) {
            tracing::debug!(index, day = window.day, "rejecting malformed opening window");
            return ScheduleReport::rejected(reason);
        }
    }

    match find_conflict(windows) {
        Some(conflict) => {
            tracing::debug!(
                day = conflict.day,
                first = conflict.first,
                second = conflict.second,
                "opening windows overlap"
            );
            ScheduleReport::rejected(conflict.into())
        }
        None => ScheduleReport::ok(),
    }
}

impl OpeningSchedule {
    /// Applies one field edit if the result is still a valid schedule.
    ///
    /// The edited window must keep a valid day and a positive duration, then the
    /// whole updated set must be conflict free. On any failure the schedule is
    /// left untouched.
    pub fn apply_edit(&mut self, index: usize, edit: WindowEdit) -> Result<()> {
        let candidate = edit.apply_to(self.get(index)?);
        check_window(index, &candidate)?;

        let mut updated = self.windows().to_vec();
        updated[index] = candidate;
        if let Some(conflict) = find_conflict(&updated) {
            return Err(conflict.into());
        }

        self.replace(index, candidate)
    }
}
