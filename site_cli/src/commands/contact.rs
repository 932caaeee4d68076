use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use site_lib::proxy::{self, ProxyReply};
use site_lib::{SafeClient, Settings};

use crate::output::{print_json, print_rows, FieldRow, OutputFormat};

#[derive(Args)]
pub struct ContactArgs {
    /// JSON body to submit
    #[arg(long, conflicts_with = "file")]
    pub body: Option<String>,

    /// Read the JSON body from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn read_body(args: &ContactArgs) -> Result<String> {
    let body = match (&args.body, &args.file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("pass the form body with --body or --file"),
    };
    serde_json::from_str::<serde_json::Value>(&body).context("contact body is not valid JSON")?;
    Ok(body)
}

fn reply_rows(reply: &ProxyReply) -> Vec<FieldRow> {
    vec![
        FieldRow::new("Status", reply.status.to_string()),
        FieldRow::new("Body", reply.body.to_string()),
    ]
}

pub async fn run(args: &ContactArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let body = read_body(args)?;
    let client = SafeClient::from_settings(settings, None);
    let reply = proxy::contact(&client, &settings.contact_submit_urls(), &body).await;
    match format {
        OutputFormat::Json => print_json(&reply.body),
        _ => print_rows(reply_rows(&reply), &reply.body, format)?,
    }
    Ok(())
}
