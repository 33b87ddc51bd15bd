//! Character-limit validation for listing copy.

use serde::{Deserialize, Serialize};

use crate::metadata::FieldKind;

/// Character limit enforced by the store backend for one field.
///
/// Lengths are counted in Unicode scalar values, matching how the remote
/// platform counts them.
pub fn char_limit(field: FieldKind) -> usize {
    match field {
        FieldKind::Name | FieldKind::Subtitle | FieldKind::IapDisplayName => 30,
        FieldKind::Keywords => 100,
        FieldKind::PromotionalText => 170,
        FieldKind::Description | FieldKind::ReleaseNotes => 4000,
        FieldKind::IapDescription => 45,
    }
}

/// Validation outcome for a single field's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub field: FieldKind,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub content: String,
    pub length: usize,
    pub limit: usize,
    pub valid: bool,
}

/// Validate one field's content against its character limit.
pub fn validate_field(
    field: FieldKind,
    content: &str,
    locale: &str,
    platform: Option<&str>,
) -> ValidationResult {
    let limit = char_limit(field);
    let length = content.chars().count();

    ValidationResult {
        field,
        locale: locale.to_string(),
        platform: platform.map(str::to_string),
        content: content.to_string(),
        length,
        limit,
        valid: length <= limit,
    }
}

/// Render validation results as a readable summary.
pub fn format_validation_results(results: &[ValidationResult]) -> String {
    if results.is_empty() {
        return "No fields to validate.".to_string();
    }

    let failures: Vec<_> = results.iter().filter(|r| !r.valid).collect();
    let pass_count = results.len() - failures.len();

    let mut lines = Vec::new();
    if failures.is_empty() {
        lines.push(format!("All {} fields pass validation.", results.len()));
    } else {
        lines.push(format!(
            "{} of {} fields exceed limits:\n",
            failures.len(),
            results.len()
        ));
        for failure in &failures {
            let location = match failure.platform.as_deref() {
                Some(platform) => format!("{}/{}", failure.locale, platform),
                None => failure.locale.clone(),
            };
            lines.push(format!(
                "  FAIL: {} ({}): {}/{} chars (+{} over)",
                failure.field,
                location,
                failure.length,
                failure.limit,
                failure.length - failure.limit
            ));
        }
        if pass_count > 0 {
            lines.push(format!("\n{pass_count} fields pass."));
        }
    }

    lines.join("\n")
}
