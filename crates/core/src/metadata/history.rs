//! Append-only iteration history for a single listing-copy field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of a content iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationSource {
    AiGenerated,
    UserEdited,
    PulledFromAsc,
    Translated,
}

impl IterationSource {
    /// Store identifier; also the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            IterationSource::AiGenerated => "ai_generated",
            IterationSource::UserEdited => "user_edited",
            IterationSource::PulledFromAsc => "pulled_from_asc",
            IterationSource::Translated => "translated",
        }
    }
}

impl std::fmt::Display for IterationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IterationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai_generated" => Ok(IterationSource::AiGenerated),
            "user_edited" => Ok(IterationSource::UserEdited),
            "pulled_from_asc" => Ok(IterationSource::PulledFromAsc),
            "translated" => Ok(IterationSource::Translated),
            other => Err(format!("unknown iteration source: {other}")),
        }
    }
}

/// One immutable revision of a field's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub source: IterationSource,
    /// Free-text rationale for the revision. Required, not validated.
    pub context: String,
}

/// A field with its full iteration history.
///
/// `latest` points at the current iteration id; `0` means the field has no
/// content yet. The iteration list is append-only: entries are never
/// reordered, mutated, or removed, and ids are never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWithHistory {
    pub latest: u64,
    pub iterations: Vec<Iteration>,
}

impl FieldWithHistory {
    /// A field that has never been written.
    pub fn empty() -> Self {
        Self {
            latest: 0,
            iterations: Vec::new(),
        }
    }

    /// True when the field has no content yet.
    pub fn is_empty(&self) -> bool {
        self.latest == 0 && self.iterations.is_empty()
    }

    /// Content of the iteration `latest` points at.
    ///
    /// A zero pointer and a dangling pointer both read as "no content".
    pub fn latest_content(&self) -> Option<&str> {
        if self.latest == 0 {
            return None;
        }
        self.iterations
            .iter()
            .find(|i| i.id == self.latest)
            .map(|i| i.content.as_str())
    }

    /// The iteration `latest` points at, if it exists.
    pub fn latest_iteration(&self) -> Option<&Iteration> {
        if self.latest == 0 {
            return None;
        }
        self.iterations.iter().find(|i| i.id == self.latest)
    }

    fn next_id(&self) -> u64 {
        self.iterations
            .iter()
            .map(|i| i.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Return a new history with one more iteration appended and `latest`
    /// moved to it. The receiver is left untouched; callers persist the
    /// returned value themselves.
    #[must_use]
    pub fn append_iteration(
        &self,
        content: impl Into<String>,
        source: IterationSource,
        context: impl Into<String>,
    ) -> FieldWithHistory {
        let id = self.next_id();
        let mut iterations = self.iterations.clone();
        iterations.push(Iteration {
            id,
            timestamp: Utc::now(),
            content: content.into(),
            source,
            context: context.into(),
        });
        FieldWithHistory {
            latest: id,
            iterations,
        }
    }
}

impl Default for FieldWithHistory {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_has_no_content() {
        let field = FieldWithHistory::empty();
        assert!(field.is_empty());
        assert_eq!(field.latest_content(), None);
    }

    #[test]
    fn append_to_empty_starts_at_id_one() {
        let field = FieldWithHistory::empty();
        let updated = field.append_iteration("x", IterationSource::UserEdited, "c");

        assert_eq!(updated.latest, 1);
        assert_eq!(updated.iterations.len(), 1);
        assert_eq!(updated.latest_content(), Some("x"));
    }

    #[test]
    fn append_does_not_mutate_the_input() {
        let field = FieldWithHistory::empty();
        let _updated = field.append_iteration("x", IterationSource::UserEdited, "c");

        assert_eq!(field, FieldWithHistory::empty());
    }

    #[test]
    fn next_id_is_max_plus_one_not_length_plus_one() {
        // Simulate a history whose ids are sparse (e.g. written by an older
        // copy of the store); the next id must still be past the maximum.
        let mut field = FieldWithHistory::empty()
            .append_iteration("a", IterationSource::AiGenerated, "first");
        field.iterations[0].id = 5;
        field.latest = 5;

        let updated = field.append_iteration("b", IterationSource::UserEdited, "second");
        assert_eq!(updated.latest, 6);
    }

    #[test]
    fn latest_points_at_exactly_one_iteration() {
        let field = FieldWithHistory::empty()
            .append_iteration("a", IterationSource::AiGenerated, "gen")
            .append_iteration("b", IterationSource::UserEdited, "edit")
            .append_iteration("c", IterationSource::UserEdited, "edit again");

        assert_eq!(field.latest, 3);
        let matching: Vec<_> = field
            .iterations
            .iter()
            .filter(|i| i.id == field.latest)
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(field.latest_content(), Some("c"));
    }

    #[test]
    fn dangling_latest_pointer_reads_as_no_content() {
        let mut field = FieldWithHistory::empty()
            .append_iteration("a", IterationSource::UserEdited, "c");
        field.latest = 42;

        assert_eq!(field.latest_content(), None);
        assert!(field.latest_iteration().is_none());
    }

    #[test]
    fn iteration_source_serializes_snake_case() {
        let actual = [
            IterationSource::AiGenerated,
            IterationSource::UserEdited,
            IterationSource::PulledFromAsc,
            IterationSource::Translated,
        ]
        .iter()
        .map(|s| serde_json::to_string(s).expect("serialize source"))
        .collect::<Vec<_>>();

        assert_eq!(
            actual,
            vec![
                "\"ai_generated\"",
                "\"user_edited\"",
                "\"pulled_from_asc\"",
                "\"translated\"",
            ]
        );
    }

    #[test]
    fn history_round_trips_through_json() {
        let field = FieldWithHistory::empty()
            .append_iteration("hello", IterationSource::PulledFromAsc, "initial pull");
        let json = serde_json::to_string(&field).expect("serialize history");
        let back: FieldWithHistory = serde_json::from_str(&json).expect("parse history");
        assert_eq!(back, field);
    }
}
