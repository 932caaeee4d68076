use anyhow::Result;
use clap::Args;
use site_lib::{CategoryQuery, SafeClient, Settings};

use crate::output::{build_category_rows, build_raw_category_rows, print_rows, OutputFormat};

#[derive(Args)]
pub struct CategoriesArgs {
    /// Only categories under this parent page
    #[arg(long)]
    pub page_id: Option<i64>,

    /// Include each category's blogs (with --page-id)
    #[arg(long)]
    pub include_blogs: bool,

    /// Category type filter
    #[arg(long = "type")]
    pub kind: Option<String>,
}

pub fn query_for(args: &CategoriesArgs) -> CategoryQuery {
    let mut query = CategoryQuery::default();
    if let Some(kind) = args.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        query = query.with_kind(kind);
    }
    if let Some(page_id) = args.page_id {
        query = query.with_page_id(page_id);
        if args.include_blogs {
            query = query.with_include_blogs(true);
        }
    }
    query
}

pub async fn run(args: &CategoriesArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let client = SafeClient::from_settings(settings, None);
    let query = query_for(args);

    if args.page_id.is_some() {
        let raw = client.raw_categories(&query).await.unwrap_or_default();
        return print_rows(build_raw_category_rows(&raw), &raw, format);
    }

    let categories = client.all_categories(&query).await;
    print_rows(build_category_rows(&categories), &categories, format)
}
