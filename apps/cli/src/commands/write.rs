//! `copydesk write` — append a new iteration to a field's history.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use copydesk_core::metadata::IterationSource;

use super::FieldSelector;

#[derive(Debug, Args)]
pub struct WriteArgs {
    #[command(flatten)]
    selector: FieldSelector,

    /// The content to write.
    #[arg(long)]
    content: String,

    /// Provenance of this iteration (ai_generated, user_edited,
    /// pulled_from_asc, translated).
    #[arg(long)]
    source: IterationSource,

    /// Context/reason for this iteration.
    #[arg(long)]
    context: String,
}

pub async fn run(root: &Path, args: WriteArgs) -> Result<()> {
    let store = super::store_at(root);
    let updated = store
        .append(
            &args.selector.to_field_ref(),
            &args.content,
            args.source,
            &args.context,
        )
        .await?;

    let output = serde_json::json!({
        "success": true,
        "iteration_id": updated.latest,
        "content": updated.latest_content(),
        "total_iterations": updated.iterations.len(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
