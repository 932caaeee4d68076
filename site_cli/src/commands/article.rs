use anyhow::{bail, Result};
use clap::Args;
use site_lib::types::BlogDetail;
use site_lib::validation;
use site_lib::{SafeClient, Settings};

use crate::output::{print_rows, FieldRow, OutputFormat};

#[derive(Args)]
pub struct ArticleArgs {
    /// Article slug
    pub slug: String,

    /// Include the article body HTML in table output
    #[arg(long)]
    pub body: bool,
}

pub fn detail_rows(blog: &BlogDetail, with_body: bool) -> Vec<FieldRow> {
    let a = &blog.article;
    let mut rows = vec![
        FieldRow::new("Title", a.title.as_str()),
        FieldRow::new("Slug", a.slug.as_str()),
        FieldRow::new("Category", a.category.clone().unwrap_or_default()),
        FieldRow::new(
            "Published",
            a.created_at
                .as_deref()
                .map(site_lib::articles::format_date)
                .unwrap_or_default(),
        ),
        FieldRow::new(
            "Updated",
            blog.updated_at
                .as_deref()
                .map(site_lib::articles::format_date)
                .unwrap_or_default(),
        ),
        FieldRow::new("Author", blog.author.clone().unwrap_or_default()),
        FieldRow::new("Reviewer", blog.reviewer.clone().unwrap_or_default()),
        FieldRow::new("Image", site_lib::articles::hero_image(a)),
    ];
    if !blog.related_blogs.is_empty() {
        let related: Vec<&str> = blog.related_blogs.iter().map(|r| r.slug.as_str()).collect();
        rows.push(FieldRow::new("Related", related.join(", ")));
    }
    if with_body {
        rows.push(FieldRow::new("Body", blog.content_html.clone().unwrap_or_default()));
    }
    rows
}

pub async fn run(args: &ArticleArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let slug = validation::validate_slug(&args.slug)?;
    let client = SafeClient::from_settings(settings, None);
    let resp = client.blog(&slug).await;

    let Some(blog) = &resp.blog else {
        if *format == OutputFormat::Json {
            crate::output::print_json(&resp);
            return Ok(());
        }
        bail!("article '{}' not found or unavailable", slug);
    };
    print_rows(detail_rows(blog, args.body), &resp, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_rows_fill_blanks() {
        let blog: BlogDetail = serde_json::from_value(serde_json::json!({
            "slug": "sr22-basics",
            "title": "SR-22 Basics",
            "author": "Dana",
            "updated_at": "2024-06-01",
            "content_html": "<p>hi</p>",
            "related_blogs": [{"slug": "fr44"}, {"slug": "dui"}]
        }))
        .unwrap();

        let rows = detail_rows(&blog, false);
        let json = serde_json::to_value(&rows).unwrap();
        let find = |field: &str| {
            json.as_array()
                .unwrap()
                .iter()
                .find(|r| r["Field"] == field)
                .map(|r| r["Value"].as_str().unwrap().to_string())
        };
        assert_eq!(find("Author").as_deref(), Some("Dana"));
        assert_eq!(find("Updated").as_deref(), Some("Jun 1, 2024"));
        assert_eq!(find("Reviewer").as_deref(), Some(""));
        assert_eq!(find("Related").as_deref(), Some("fr44, dui"));
        assert_eq!(find("Body"), None);

        assert_eq!(detail_rows(&blog, true).len(), rows.len() + 1);
    }
}
