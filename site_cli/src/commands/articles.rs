use anyhow::Result;
use clap::Args;
use site_lib::validation;
use site_lib::{load_article_list, ArticleListRequest, QueryParams, SafeClient, Settings};

use crate::output::{build_article_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct ArticlesArgs {
    /// Search text (the page's `q` parameter)
    #[arg(long, short)]
    pub q: Option<String>,

    /// Category slug
    #[arg(long)]
    pub category: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: i64,
}

/// Query string the `/articles` page would be requested with.
pub fn params_for(args: &ArticlesArgs) -> Result<QueryParams> {
    let mut params = QueryParams::new();
    if let Some(q) = args.q.as_deref().filter(|q| !q.trim().is_empty()) {
        params.set("q", &validation::validate_search(q)?);
    }
    if let Some(category) = args.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        params.set("category", category);
    }
    if args.page > 1 {
        params.set("page", &args.page.to_string());
    }
    Ok(params)
}

pub async fn run(args: &ArticlesArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let client = SafeClient::from_settings(settings, None);
    let request = ArticleListRequest::from_params(params_for(args)?);
    let view = load_article_list(&client, &request).await;

    if *format == OutputFormat::Json {
        print_json(&view);
        return Ok(());
    }

    if *format == OutputFormat::Table {
        println!("{}", view.heading);
        if let Some(sub) = &view.subheading {
            println!("{}", sub);
        }
        if let Some(err) = &view.error {
            eprintln!("{}", err);
        }
    }
    print_rows(build_article_rows(&view.cards), &view, format)?;
    if *format == OutputFormat::Table {
        if let Some(range) = view.range {
            println!(
                "Showing {}-{} of {} (page {} of {})",
                range.start,
                range.end,
                view.total,
                view.pagination.current_page,
                view.pagination.total_pages
            );
        }
        if !view.chips.is_empty() {
            let names: Vec<&str> = view.chips.iter().map(|c| c.name.as_str()).collect();
            println!("Categories: {}", names.join(", "));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(q: Option<&str>, category: Option<&str>, page: i64) -> ArticlesArgs {
        ArticlesArgs {
            q: q.map(String::from),
            category: category.map(String::from),
            page,
        }
    }

    #[test]
    fn params_skip_blank_and_first_page() {
        let params = params_for(&args(Some("  "), Some(""), 1)).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn params_carry_search_category_and_page() {
        let params = params_for(&args(Some(" teen "), Some("alaska"), 3)).unwrap();
        assert_eq!(params.get("q"), Some("teen"));
        assert_eq!(params.get("category"), Some("alaska"));
        assert_eq!(params.get("page"), Some("3"));
    }

    #[test]
    fn overlong_search_is_rejected() {
        let long = "x".repeat(500);
        assert!(params_for(&args(Some(&long), None, 1)).is_err());
    }
}
