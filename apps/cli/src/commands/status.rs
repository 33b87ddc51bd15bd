//! `copydesk status` — reconcile local copy against the remote store.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::Path;
use tracing::debug;

use copydesk_connect::ConnectClient;
use copydesk_core::diff::{compare_field, format_diff_table, FieldDiff};
use copydesk_core::metadata::{FieldKind, FieldRef};
use copydesk_storage_fs::MetadataStore;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Locale to reconcile (defaults to the configured primary locale).
    #[arg(long)]
    locale: Option<String>,

    /// Platform to reconcile (defaults to the first configured platform).
    #[arg(long)]
    platform: Option<String>,

    /// Remote app id (defaults to the configured app_id, else a bundle-id
    /// lookup).
    #[arg(long)]
    app_id: Option<String>,
}

/// Remote values observed for one (locale, platform) at a point in time.
#[derive(Debug, Default)]
struct RemoteSnapshot {
    name: Option<String>,
    subtitle: Option<String>,
    keywords: Option<String>,
    description: Option<String>,
    promotional_text: Option<String>,
    whats_new: Option<String>,
    version_string: Option<String>,
}

pub async fn run(root: &Path, args: StatusArgs) -> Result<()> {
    let store = super::store_at(root);
    let config = store
        .read_config()
        .await?
        .context("no config found; write .appstore/config.json first")?;

    let locale = args.locale.unwrap_or_else(|| config.primary_locale.clone());
    let platform = match args.platform.or_else(|| config.platforms.first().cloned()) {
        Some(platform) => platform.to_lowercase(),
        None => bail!("no platform configured and none given"),
    };

    let client = super::client_for(root);
    let app_id = match args.app_id.or_else(|| config.app_id.clone()) {
        Some(id) => id,
        None => {
            let app = client
                .app_by_bundle_id(&config.bundle_id)
                .await?
                .with_context(|| format!("no app found with bundle id {}", config.bundle_id))?;
            app.id
        }
    };

    let remote = fetch_remote_snapshot(&client, &app_id, &locale, &platform).await?;
    let diffs = diff_against_store(&store, &locale, &platform, &remote).await?;
    println!("{}", format_diff_table(&diffs));
    Ok(())
}

async fn fetch_remote_snapshot(
    client: &ConnectClient,
    app_id: &str,
    locale: &str,
    platform: &str,
) -> Result<RemoteSnapshot> {
    let mut remote = RemoteSnapshot::default();

    // App-level copy lives on the newest app info record.
    let app_infos = client.app_infos(app_id).await?;
    if let Some(app_info) = app_infos.first() {
        let localizations = client
            .app_info_localizations(&app_info.id, Some(locale))
            .await?;
        if let Some(localization) = localizations.into_iter().next() {
            remote.name = localization.name;
            remote.subtitle = localization.subtitle;
        }
    }

    // Version-level copy lives on the editable version's localization.
    let editable = client
        .editable_version(app_id, &super::remote_platform(platform))
        .await?;
    if let Some(version) = editable {
        debug!(
            "editable version for {platform}: {} ({})",
            version.version_string, version.state
        );
        let localizations = client
            .version_localizations(&version.id, Some(locale))
            .await?;
        if let Some(localization) = localizations.into_iter().next() {
            remote.keywords = localization.keywords;
            remote.description = localization.description;
            remote.promotional_text = localization.promotional_text;
            remote.whats_new = localization.whats_new;
        }
        remote.version_string = Some(version.version_string);
    }

    Ok(remote)
}

async fn diff_against_store(
    store: &MetadataStore,
    locale: &str,
    platform: &str,
    remote: &RemoteSnapshot,
) -> Result<Vec<FieldDiff>> {
    let app_info = store.read_app_info(locale).await?;
    let mut diffs = vec![
        compare_field("name", locale, None, &app_info.name, remote.name.as_deref()),
        compare_field(
            "subtitle",
            locale,
            None,
            &app_info.subtitle,
            remote.subtitle.as_deref(),
        ),
        compare_field(
            "keywords",
            locale,
            Some(platform),
            &app_info.keywords,
            remote.keywords.as_deref(),
        ),
    ];

    for (field, remote_content) in [
        (FieldKind::Description, remote.description.as_deref()),
        (FieldKind::PromotionalText, remote.promotional_text.as_deref()),
    ] {
        let local = store.read_version_field(locale, platform, field).await?;
        diffs.push(compare_field(
            field.as_str(),
            locale,
            Some(platform),
            &local,
            remote_content,
        ));
    }

    // Release notes compare against the editable version's What's New text.
    if let Some(version_string) = remote.version_string.as_deref() {
        let field_ref = FieldRef::release_notes(locale, platform, version_string);
        let local = store.read_field(&field_ref).await?;
        diffs.push(compare_field(
            FieldKind::ReleaseNotes.as_str(),
            locale,
            Some(platform),
            &local,
            remote.whats_new.as_deref(),
        ));
    }

    Ok(diffs)
}
