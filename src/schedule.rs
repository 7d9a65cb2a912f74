use chrono::{DateTime, TimeZone, Utc};

use crate::timeutil::{add_to_date, TimeUnit};

const MAX_OCCURRENCE_STEPS: usize = 100_000;

/// How a task's deadline relates to the current time.
///
/// Derived display data only; the server never sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeadlineStatus {
    /// The task has no deadline (encoded as 0).
    None,
    Upcoming,
    /// The deadline is at or before `now`.
    Overdue,
}

pub fn deadline_status(deadline: i64, now: DateTime<Utc>) -> DeadlineStatus {
    if deadline == 0 {
        return DeadlineStatus::None;
    }
    if deadline <= now.timestamp() {
        DeadlineStatus::Overdue
    } else {
        DeadlineStatus::Upcoming
    }
}

/// Maps a wire recurrence code to the unit one occurrence advances by.
pub fn interval_unit(interval: u32) -> Option<TimeUnit> {
    match interval {
        0 => Some(TimeUnit::Hour),
        1 => Some(TimeUnit::Day),
        2 => Some(TimeUnit::Week),
        3 => Some(TimeUnit::Month),
        4 => Some(TimeUnit::Year),
        _ => None,
    }
}

/// The first occurrence of a recurring deadline after `now`, in Unix seconds.
///
/// Advances the deadline one interval at a time so month-length clamping
/// stays calendar-correct. Returns `None` for deadline-free tasks or an
/// unknown interval code.
pub fn next_occurrence(deadline: i64, interval: u32, now: DateTime<Utc>) -> Option<i64> {
    if deadline == 0 {
        return None;
    }
    let unit = interval_unit(interval)?;
    let mut next = Utc.timestamp_opt(deadline, 0).single()?;
    for _ in 0..MAX_OCCURRENCE_STEPS {
        if next > now {
            return Some(next.timestamp());
        }
        next = add_to_date(next, 1, unit);
    }
    None
}
