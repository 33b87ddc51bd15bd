//! `copydesk read` — print a field's latest content and full history.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::FieldSelector;

#[derive(Debug, Args)]
pub struct ReadArgs {
    #[command(flatten)]
    selector: FieldSelector,
}

pub async fn run(root: &Path, args: ReadArgs) -> Result<()> {
    let store = super::store_at(root);
    let history = store.read_field(&args.selector.to_field_ref()).await?;

    let output = serde_json::json!({
        "latest_content": history.latest_content(),
        "history": history,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
