//! Local-vs-remote reconciliation for listing copy fields.
//!
//! Directionality is inferred from iteration provenance, not timestamps:
//! remote timestamps are not reliably comparable to local wall-clock time
//! across systems. The classification precedence in [`compare_field`] is
//! observable behavior and must not be reordered.

use serde::{Deserialize, Serialize};

use crate::metadata::{FieldWithHistory, IterationSource};

/// Six-way classification of a field's local/remote relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    InSync,
    LocalNewer,
    RemoteNewer,
    Conflict,
    LocalOnly,
    RemoteOnly,
}

impl SyncState {
    /// Human-readable label used by the status table.
    pub fn label(&self) -> &'static str {
        match self {
            SyncState::InSync => "in sync",
            SyncState::LocalNewer => "local newer",
            SyncState::RemoteNewer => "remote newer",
            SyncState::Conflict => "CONFLICT",
            SyncState::LocalOnly => "local only",
            SyncState::RemoteOnly => "remote only",
        }
    }

    /// Single-character marker used by the status table.
    pub fn marker(&self) -> char {
        match self {
            SyncState::InSync => '=',
            SyncState::LocalNewer => '>',
            SyncState::RemoteNewer => '<',
            SyncState::Conflict => '!',
            SyncState::LocalOnly => '+',
            SyncState::RemoteOnly => '-',
        }
    }
}

/// Comparison result for one field. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub local_content: Option<String>,
    pub remote_content: Option<String>,
    pub state: SyncState,
}

/// Classify one field's local history against a point-in-time remote value.
///
/// Total and deterministic: every combination of present/absent content and
/// history shape maps to exactly one [`SyncState`]; this never fails.
///
/// Precedence (do not reorder):
/// 1. neither side has content -> in sync
/// 2. only remote has content  -> remote only
/// 3. only local has content   -> local only
/// 4. contents equal           -> in sync
/// 5. contents differ          -> provenance tie-break, see
///    [`classify_divergence`]
pub fn compare_field(
    field: &str,
    locale: &str,
    platform: Option<&str>,
    local: &FieldWithHistory,
    remote_content: Option<&str>,
) -> FieldDiff {
    let local_content = local.latest_content();

    let state = match (local_content, remote_content) {
        (None, None) => SyncState::InSync,
        (None, Some(_)) => SyncState::RemoteOnly,
        (Some(_), None) => SyncState::LocalOnly,
        (Some(l), Some(r)) if l == r => SyncState::InSync,
        (Some(_), Some(r)) => classify_divergence(local, r),
    };

    FieldDiff {
        field: field.to_string(),
        locale: locale.to_string(),
        platform: platform.map(str::to_string),
        local_content: local_content.map(str::to_string),
        remote_content: remote_content.map(str::to_string),
        state,
    }
}

/// Both sides have content and it differs. Decide which side moved.
///
/// If the latest local iteration is itself a pull, local is an unmodified
/// mirror of an earlier remote value, so only the remote can have moved.
/// Otherwise the most recent pulled iteration is the last known
/// synchronization point: remote still matching it means only local moved;
/// remote differing from it means both sides diverged independently.
fn classify_divergence(local: &FieldWithHistory, remote_content: &str) -> SyncState {
    if local
        .latest_iteration()
        .map(|i| i.source == IterationSource::PulledFromAsc)
        .unwrap_or(false)
    {
        return SyncState::RemoteNewer;
    }

    let last_pull = local
        .iterations
        .iter()
        .rev()
        .find(|i| i.source == IterationSource::PulledFromAsc);

    match last_pull {
        None => SyncState::LocalNewer,
        Some(pulled) if pulled.content == remote_content => SyncState::LocalNewer,
        Some(_) => SyncState::Conflict,
    }
}

/// Render diffs as an aligned status table with summary counts.
///
/// Presentation only: one row per diff (field, locale, platform, state),
/// then a count of fields per state.
pub fn format_diff_table(diffs: &[FieldDiff]) -> String {
    if diffs.is_empty() {
        return "No fields to compare.".to_string();
    }

    let field_width = diffs
        .iter()
        .map(|d| d.field.len())
        .max()
        .unwrap_or(0)
        .max("Field".len());
    let locale_width = diffs
        .iter()
        .map(|d| d.locale.len())
        .max()
        .unwrap_or(0)
        .max("Locale".len());

    let mut lines = Vec::with_capacity(diffs.len() + 4);
    lines.push(format!(
        "{:field_width$}  {:locale_width$}  {:8}  Status",
        "Field", "Locale", "Platform"
    ));
    lines.push("-".repeat(field_width + locale_width + 30));

    for diff in diffs {
        let platform = diff.platform.as_deref().unwrap_or("-");
        lines.push(format!(
            "{:field_width$}  {:locale_width$}  {:8}  {}  {}",
            diff.field,
            diff.locale,
            platform,
            diff.state.marker(),
            diff.state.label()
        ));
    }

    let count = |state: SyncState| diffs.iter().filter(|d| d.state == state).count();
    lines.push(String::new());
    lines.push(format!(
        "Summary: {} in sync, {} local newer, {} remote newer, {} conflicts, {} local only, {} remote only",
        count(SyncState::InSync),
        count(SyncState::LocalNewer),
        count(SyncState::RemoteNewer),
        count(SyncState::Conflict),
        count(SyncState::LocalOnly),
        count(SyncState::RemoteOnly),
    ));

    lines.join("\n")
}
