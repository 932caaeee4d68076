use anyhow::Result;
use clap::Args;
use serde_json::json;
use site_lib::validation;

use crate::output::{print_rows, FieldRow, OutputFormat};

#[derive(Args)]
pub struct ZipArgs {
    /// ZIP code as typed
    pub zip: String,
}

pub fn run(args: &ZipArgs, format: &OutputFormat) -> Result<()> {
    let zip = validation::sanitize_zip(&args.zip);
    let href = validation::quotes_href(&zip)?;
    let rows = vec![FieldRow::new("ZIP", zip.as_str()), FieldRow::new("Quotes", href.as_str())];
    print_rows(rows, &json!({ "zip": zip, "href": href }), format)
}
