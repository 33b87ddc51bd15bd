//! `copydesk validate` — character-limit validation.
//!
//! Two modes: a config-driven sweep across locales/platforms, and a
//! single-file mode used by hook scripts to validate one store document
//! (exits non-zero on failure).

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use copydesk_core::metadata::{
    AppInfoData, FieldKind, FieldWithHistory, IapData, ReleaseNotesData,
};
use copydesk_core::validation::{format_validation_results, validate_field, ValidationResult};
use copydesk_storage_fs::MetadataStore;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Locale to validate (all configured locales if omitted).
    #[arg(long)]
    locale: Option<String>,

    /// Platform to validate (all configured platforms if omitted).
    #[arg(long)]
    platform: Option<String>,

    /// Validate one store document instead of sweeping the store.
    #[arg(long, conflicts_with_all = ["locale", "platform"])]
    file: Option<PathBuf>,
}

pub async fn run(root: &Path, args: ValidateArgs) -> Result<()> {
    if let Some(file) = args.file {
        return validate_single_file(&file).await;
    }

    let store = super::store_at(root);
    let config = store
        .read_config()
        .await?
        .context("no config found; write .appstore/config.json first")?;

    let locales = match args.locale {
        Some(locale) => vec![locale],
        None => config.locales.clone(),
    };
    let platforms = match args.platform {
        Some(platform) => vec![platform],
        None => config.platforms.clone(),
    };

    let mut results = Vec::new();
    for locale in &locales {
        sweep_locale(&store, locale, &platforms, &mut results).await?;
    }

    println!("{}", format_validation_results(&results));
    if results.iter().any(|r| !r.valid) {
        std::process::exit(1);
    }
    Ok(())
}

async fn sweep_locale(
    store: &MetadataStore,
    locale: &str,
    platforms: &[String],
    results: &mut Vec<ValidationResult>,
) -> Result<()> {
    let app_info = store.read_app_info(locale).await?;
    for kind in [FieldKind::Name, FieldKind::Subtitle, FieldKind::Keywords] {
        if let Some(content) = app_info.field(kind).and_then(|f| f.latest_content()) {
            results.push(validate_field(kind, content, locale, None));
        }
    }

    for platform in platforms {
        for kind in [FieldKind::Description, FieldKind::PromotionalText] {
            let field = store.read_version_field(locale, platform, kind).await?;
            if let Some(content) = field.latest_content() {
                results.push(validate_field(kind, content, locale, Some(platform.as_str())));
            }
        }

        for version in store.list_release_note_versions(locale, platform).await? {
            if let Some(notes) = store.read_release_notes(locale, platform, &version).await? {
                if let Some(content) = notes.notes.latest_content() {
                    results.push(validate_field(
                        FieldKind::ReleaseNotes,
                        content,
                        locale,
                        Some(platform.as_str()),
                    ));
                }
            }
        }
    }

    for product_id in store.list_iap_product_ids(locale).await? {
        if let Some(iap) = store.read_iap(locale, &product_id).await? {
            if let Some(content) = iap.display_name.latest_content() {
                results.push(validate_field(FieldKind::IapDisplayName, content, locale, None));
            }
            if let Some(content) = iap.description.latest_content() {
                results.push(validate_field(FieldKind::IapDescription, content, locale, None));
            }
        }
    }

    Ok(())
}

/// Validate one store document, inferring its shape from the path the way
/// the store lays documents out.
async fn validate_single_file(path: &Path) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("file not found: {}", path.display()))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let mut results = Vec::new();
    let locale = "-";

    if stem == "app_info" {
        let data: AppInfoData =
            serde_json::from_str(&raw).with_context(|| format!("invalid JSON: {}", path.display()))?;
        for kind in [FieldKind::Name, FieldKind::Subtitle, FieldKind::Keywords] {
            if let Some(content) = data.field(kind).and_then(|f| f.latest_content()) {
                results.push(validate_field(kind, content, locale, None));
            }
        }
    } else if stem == "description" || stem == "promotional_text" {
        let kind = if stem == "description" {
            FieldKind::Description
        } else {
            FieldKind::PromotionalText
        };
        let data: FieldWithHistory =
            serde_json::from_str(&raw).with_context(|| format!("invalid JSON: {}", path.display()))?;
        if let Some(content) = data.latest_content() {
            results.push(validate_field(kind, content, locale, None));
        }
    } else if parent == "release_notes" {
        let data: ReleaseNotesData =
            serde_json::from_str(&raw).with_context(|| format!("invalid JSON: {}", path.display()))?;
        if let Some(content) = data.notes.latest_content() {
            results.push(validate_field(FieldKind::ReleaseNotes, content, locale, None));
        }
    } else if parent == "iap" {
        let data: IapData =
            serde_json::from_str(&raw).with_context(|| format!("invalid JSON: {}", path.display()))?;
        if let Some(content) = data.display_name.latest_content() {
            results.push(validate_field(FieldKind::IapDisplayName, content, locale, None));
        }
        if let Some(content) = data.description.latest_content() {
            results.push(validate_field(FieldKind::IapDescription, content, locale, None));
        }
    } else {
        bail!("unrecognized store document: {}", path.display());
    }

    let failures: Vec<_> = results.iter().filter(|r| !r.valid).collect();
    if !failures.is_empty() {
        for failure in &failures {
            eprintln!(
                "VALIDATION FAIL: {} is {}/{} chars (+{} over limit)",
                failure.field,
                failure.length,
                failure.limit,
                failure.length - failure.limit
            );
        }
        std::process::exit(1);
    }
    for result in &results {
        println!("OK: {} {}/{} chars", result.field, result.length, result.limit);
    }
    Ok(())
}
