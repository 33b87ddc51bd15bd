//! `copydesk request` — raw authenticated access to the remote API.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use reqwest::Method;
use std::path::Path;

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// API path, e.g. /v1/apps.
    path: String,

    /// HTTP method.
    #[arg(long, default_value = "GET")]
    method: String,

    /// JSON request body (POST/PATCH).
    #[arg(long)]
    body: Option<String>,

    /// Query parameter as key=value; repeatable.
    #[arg(long = "param")]
    params: Vec<String>,

    /// Follow pagination and aggregate every page.
    #[arg(long)]
    all_pages: bool,
}

fn parse_params(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| anyhow!("malformed query parameter (expected key=value): {entry}"))
        })
        .collect()
}

pub async fn run(root: &Path, args: RequestArgs) -> Result<()> {
    let client = super::client_for(root);
    let params = parse_params(&args.params)?;

    let envelope = if args.all_pages {
        client.request_all_pages(&args.path, &params).await?
    } else {
        let method: Method = args
            .method
            .to_uppercase()
            .parse()
            .map_err(|_| anyhow!("unsupported HTTP method: {}", args.method))?;
        let body = args
            .body
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .context("request body is not valid JSON")?;
        client
            .request(&args.path, method, body.as_ref(), &params)
            .await?
    };

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_key_value_pairs() {
        let params = parse_params(&[
            "limit=200".to_string(),
            "filter[locale]=en-US".to_string(),
        ])
        .expect("parse");
        assert_eq!(
            params,
            vec![
                ("limit".to_string(), "200".to_string()),
                ("filter[locale]".to_string(), "en-US".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_param_is_rejected() {
        assert!(parse_params(&["nonsense".to_string()]).is_err());
    }
}
