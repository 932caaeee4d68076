use anyhow::Result;
use clap::Args;
use site_lib::admin::{category_blog_preview, CategoryPicker};
use site_lib::{CategoryQuery, SafeClient, Settings};

use crate::output::{build_picker_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct PickerArgs {
    /// Parent page the blog belongs to
    #[arg(long)]
    pub page_id: Option<i64>,

    /// Category currently selected on the form
    #[arg(long)]
    pub selected: Option<i64>,

    /// List the blogs already filed under this category
    #[arg(long)]
    pub preview: Option<i64>,
}

pub async fn run(args: &PickerArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let client = SafeClient::from_settings(settings, None);

    if let (Some(category_id), Some(page_id)) = (args.preview, args.page_id) {
        let query = CategoryQuery::default()
            .with_page_id(page_id)
            .with_include_blogs(true);
        let raw = client.raw_categories(&query).await.unwrap_or_default();
        let lines = category_blog_preview(&raw, category_id);
        match format {
            OutputFormat::Json => print_json(&lines),
            _ => lines.iter().for_each(|l| println!("{}", l)),
        }
        return Ok(());
    }

    let picker = CategoryPicker::load(&client, args.page_id, args.selected).await;
    if picker.disabled && *format != OutputFormat::Json {
        println!("Select a parent page first.");
        return Ok(());
    }
    print_rows(build_picker_rows(&picker), &picker, format)
}
