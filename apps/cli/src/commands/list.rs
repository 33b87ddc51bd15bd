//! `copydesk list` — enumerate locales, IAP products, or release-note
//! versions from the local store.

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Locales,
    Iap,
    ReleaseNotes,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum)]
    kind: ListKind,

    /// Locale to list for (defaults to the configured primary locale).
    #[arg(long)]
    locale: Option<String>,

    /// Platform to list for (release notes only).
    #[arg(long)]
    platform: Option<String>,
}

pub async fn run(root: &Path, args: ListArgs) -> Result<()> {
    let store = super::store_at(root);
    let config = store
        .read_config()
        .await?
        .context("no config found; write .appstore/config.json first")?;

    let locale = args.locale.unwrap_or_else(|| config.primary_locale.clone());

    let output = match args.kind {
        ListKind::Locales => {
            let stored = store.read_locales().await?;
            serde_json::json!({ "configured": config.locales, "stored": stored })
        }
        ListKind::Iap => {
            let mut products = Vec::new();
            for product_id in store.list_iap_product_ids(&locale).await? {
                if let Some(iap) = store.read_iap(&locale, &product_id).await? {
                    products.push(serde_json::json!({
                        "product_id": product_id,
                        "display_name": iap.display_name.latest_content(),
                        "description": iap.description.latest_content(),
                    }));
                }
            }
            serde_json::json!({ "locale": locale, "iaps": products })
        }
        ListKind::ReleaseNotes => {
            let platform = match args.platform.or_else(|| config.platforms.first().cloned()) {
                Some(platform) => platform.to_lowercase(),
                None => bail!("no platform configured and none given"),
            };
            let versions = store.list_release_note_versions(&locale, &platform).await?;
            serde_json::json!({ "locale": locale, "platform": platform, "versions": versions })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
