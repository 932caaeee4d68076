use anyhow::Result;
use clap::Args;
use serde_json::Value;
use site_lib::validation;
use site_lib::{SafeClient, Settings};

use crate::output::{print_rows, FieldRow, OutputFormat};

#[derive(Args)]
pub struct PageArgs {
    /// Page slug, e.g. about-us
    pub slug: String,
}

/// One row per section: its position and type.
pub fn section_rows(sections: &[Value]) -> Vec<FieldRow> {
    sections
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let kind = s
                .get("section_type")
                .or_else(|| s.get("type"))
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            let anchor = s.get("anchor_id").and_then(Value::as_str).unwrap_or_default();
            let value = if anchor.is_empty() {
                kind.to_string()
            } else {
                format!("{} #{}", kind, anchor)
            };
            FieldRow::new(&format!("Section {}", i + 1), value)
        })
        .collect()
}

pub async fn run(args: &PageArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let slug = validation::validate_slug(&args.slug)?;
    let client = SafeClient::from_settings(settings, None);
    let payload = client.page(&slug).await;
    print_rows(section_rows(&payload.sections), &payload, format)
}
