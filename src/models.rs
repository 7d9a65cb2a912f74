use serde::{Deserialize, Serialize};

/// A task as served by the task service.
///
/// The authoritative copy lives server-side; the client only ever holds a
/// read-only snapshot that is replaced wholesale on refresh.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier.
    pub id: u64,
    /// Display text of the task.
    pub description: String,
    /// Optional free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Whether the task has been completed (server-authoritative).
    #[serde(default)]
    pub completed: bool,
    /// Deadline in Unix seconds; 0 means the task has no deadline.
    #[serde(default)]
    pub deadline: i64,
    /// Zero-based index into the recurrence options; absent for one-off tasks.
    #[serde(default)]
    pub recurring_interval: Option<u32>,
    /// Group the task is assigned to, if any.
    #[serde(default)]
    pub assigned_group: Option<u64>,
    /// User the task is assigned to.
    pub assigned_user: u64,
}

/// A user or group as offered for assignment selection.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Identifiable {
    pub id: u64,
    pub name: String,
}

/// The signed-in user's profile.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Payload for task creation. `None` fields serialize as JSON `null`.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub description: String,
    pub notes: String,
    pub deadline: i64,
    pub recurring_interval: Option<u32>,
    pub assigned_group: Option<u64>,
    pub assigned_user: u64,
}

/// Resolves a selection entered as either a numeric id or a display name.
pub fn resolve_id(entries: &[Identifiable], selection: &str) -> Option<u64> {
    if let Ok(id) = selection.parse::<u64>() {
        return Some(id);
    }
    entries
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(selection))
        .map(|e| e.id)
}
