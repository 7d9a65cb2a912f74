use chrono::FixedOffset;

use crate::models::{NewTask, UserProfile};
use crate::timeutil::{self, FormatError};
use crate::toast::ToastType;

/// Recurrence options in wire order; a selection is encoded as its index.
pub const RECURRING_INTERVALS: [&str; 5] = ["hourly", "daily", "weekly", "monthly", "yearly"];

/// Deadlines are entered in the service's home timezone (UTC+01:00).
const DEADLINE_OFFSET_SECS: i32 = 3600;

pub fn deadline_offset() -> FixedOffset {
    FixedOffset::east_opt(DEADLINE_OFFSET_SECS).unwrap()
}

/// User-entered task fields before validation and encoding.
#[derive(Debug, Default, Clone)]
pub struct TaskDraft {
    pub description: String,
    pub notes: String,
    /// `YYYY-MM-DD`, or empty for no deadline.
    pub date: String,
    /// `HH:MM`, or empty for no deadline.
    pub time: String,
    /// One of [`RECURRING_INTERVALS`], or empty for a one-off task.
    pub recurring: String,
    pub assigned_group: Option<u64>,
    /// Falls back to the signed-in user when `None`.
    pub assigned_user: Option<u64>,
}

/// Why a draft could not be encoded. No request is sent for any of these.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftError {
    DateFormat,
    TimeFormat,
    /// Date without time, or time without date.
    IncompleteDueDate,
    UnknownInterval(String),
}

impl DraftError {
    /// The toast to raise for this validation failure. Incomplete due dates
    /// are a gentle prompt rather than an error.
    pub fn notice(&self) -> (ToastType, String) {
        match self {
            DraftError::DateFormat => (
                ToastType::Error,
                "Please format the date as YYYY-MM-DD".to_string(),
            ),
            DraftError::TimeFormat => (
                ToastType::Error,
                "Please format the time as HH:MM".to_string(),
            ),
            DraftError::IncompleteDueDate => (
                ToastType::Info,
                "Due date must either be empty or include both date and time".to_string(),
            ),
            DraftError::UnknownInterval(label) => (
                ToastType::Error,
                format!(
                    "Unknown recurrence '{}'. Supported: hourly, daily, weekly, monthly, yearly.",
                    label
                ),
            ),
        }
    }
}

/// Validates a draft and encodes it into the creation payload.
///
/// Field format problems surface before the both-or-neither presence check,
/// matching the order the entries are reviewed in. An empty date/time pair
/// encodes the deadline as 0 ("none").
pub fn encode(draft: &TaskDraft, profile: &UserProfile) -> Result<NewTask, DraftError> {
    if !draft.date.is_empty() {
        timeutil::parse_date(&draft.date).map_err(|_| DraftError::DateFormat)?;
    }
    if !draft.time.is_empty() {
        timeutil::parse_time(&draft.time).map_err(|_| DraftError::TimeFormat)?;
    }
    if draft.date.is_empty() != draft.time.is_empty() {
        return Err(DraftError::IncompleteDueDate);
    }

    let deadline = if draft.date.is_empty() {
        0
    } else {
        timeutil::combine(&draft.date, &draft.time, deadline_offset()).map_err(|err| match err {
            FormatError::Date => DraftError::DateFormat,
            FormatError::Time => DraftError::TimeFormat,
        })?
    };

    Ok(NewTask {
        description: draft.description.clone(),
        notes: draft.notes.clone(),
        deadline,
        recurring_interval: encode_recurrence(&draft.recurring)?,
        assigned_group: draft.assigned_group,
        assigned_user: draft.assigned_user.unwrap_or(profile.id),
    })
}

/// Encodes a recurrence label as its zero-based index, or `None` for the
/// empty selection. The wire format never carries the label itself.
pub fn encode_recurrence(label: &str) -> Result<Option<u32>, DraftError> {
    if label.is_empty() {
        return Ok(None);
    }
    let lowered = label.to_lowercase();
    match RECURRING_INTERVALS.iter().position(|option| *option == lowered) {
        Some(index) => Ok(Some(index as u32)),
        None => Err(DraftError::UnknownInterval(label.to_string())),
    }
}
