use std::io::Write;

use anyhow::{bail, Result};
use serde::Serialize;
use site_lib::admin::CategoryPicker;
use site_lib::articles::ArticleCard;
use site_lib::types::{Article, Category, RawCategory};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => bail!("unknown output format '{}': use table, json, csv or markdown", other),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct ArticleRow {
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Link")]
    #[serde(rename = "Link")]
    href: String,
}

#[derive(Tabled, Serialize)]
pub struct CategoryRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    #[serde(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Blogs")]
    #[serde(rename = "Blogs")]
    blogs: String,
}

#[derive(Tabled, Serialize)]
pub struct SuggestionRow {
    #[tabled(rename = "#")]
    #[serde(rename = "#")]
    position: usize,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Link")]
    #[serde(rename = "Link")]
    href: String,
}

#[derive(Tabled, Serialize)]
pub struct PickerRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Selected")]
    #[serde(rename = "Selected")]
    selected: String,
}

/// Two-column row for single records (article detail, homepage summary).
#[derive(Tabled, Serialize)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

impl FieldRow {
    pub fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

// -- Row builders --

pub fn build_article_rows(cards: &[ArticleCard]) -> Vec<ArticleRow> {
    cards
        .iter()
        .map(|c| ArticleRow {
            title: c.title.clone(),
            category: c.category.clone().unwrap_or_default(),
            date: c.date.clone(),
            href: c.href.clone(),
        })
        .collect()
}

pub fn build_category_rows(categories: &[Category]) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|c| CategoryRow {
            id: String::new(),
            name: c.name.clone(),
            slug: c.slug.clone(),
            blogs: String::new(),
        })
        .collect()
}

pub fn build_raw_category_rows(categories: &[RawCategory]) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.map(|id| id.to_string()).unwrap_or_default(),
            name: c.name.clone().unwrap_or_default(),
            slug: c.slug.clone().unwrap_or_default(),
            blogs: c
                .blogs
                .as_ref()
                .map(|b| b.len().to_string())
                .unwrap_or_default(),
        })
        .collect()
}

pub fn build_suggestion_rows(suggestions: &[Article], highlighted: i64) -> Vec<SuggestionRow> {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, a)| SuggestionRow {
            position: i + 1,
            title: if i as i64 == highlighted {
                format!("> {}", a.title)
            } else {
                a.title.clone()
            },
            href: site_lib::articles::article_href(&a.slug),
        })
        .collect()
}

pub fn build_picker_rows(picker: &CategoryPicker) -> Vec<PickerRow> {
    picker
        .options
        .iter()
        .map(|o| PickerRow {
            id: o.id,
            name: o.name.clone(),
            selected: if picker.selected == Some(o.id) {
                "yes".to_string()
            } else {
                String::new()
            },
        })
        .collect()
}

// -- Output --

pub fn print_table<T: Tabled>(rows: Vec<T>) {
    println!("{}", Table::new(rows));
}

pub fn print_markdown<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    write_csv(std::io::stdout(), rows)
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// Prints `rows` in a tabular format, or `data` as JSON.
pub fn print_rows<T, D>(rows: Vec<T>, data: &D, format: &OutputFormat) -> Result<()>
where
    T: Tabled + Serialize,
    D: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => print_table(rows),
        OutputFormat::Markdown => print_markdown(rows),
        OutputFormat::Csv => print_csv(&rows)?,
        OutputFormat::Json => print_json(&data),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_lib::admin::PickerOption;

    fn article(slug: &str, title: &str) -> Article {
        serde_json::from_value(serde_json::json!({ "slug": slug, "title": title })).unwrap()
    }

    fn csv_from_rows<T: Serialize>(rows: &[T]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse(" csv ").unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_build_article_rows_mapping() {
        let card = ArticleCard::from_article(&serde_json::from_value(serde_json::json!({
            "slug": "sr22-basics",
            "title": "SR-22 Basics",
            "category": "High Risk",
            "created_at": "2024-03-05T09:00:00Z"
        })).unwrap());
        let rows = build_article_rows(&[card]);
        assert_eq!(rows[0].title, "SR-22 Basics");
        assert_eq!(rows[0].category, "High Risk");
        assert_eq!(rows[0].date, "Mar 5, 2024");
        assert_eq!(rows[0].href, "/articles/sr22-basics");
    }

    #[test]
    fn test_build_raw_category_rows_missing_fields() {
        let raw: Vec<RawCategory> = serde_json::from_value(serde_json::json!([
            {"id": 4, "name": "Teen Drivers", "blogs": [{"slug": "a", "title": "A"}]},
            {"name": "Orphan"}
        ]))
        .unwrap();
        let rows = build_raw_category_rows(&raw);
        assert_eq!(rows[0].id, "4");
        assert_eq!(rows[0].blogs, "1");
        assert_eq!(rows[1].id, "");
        assert_eq!(rows[1].blogs, "");
    }

    #[test]
    fn test_build_suggestion_rows_marks_highlight() {
        let items = vec![article("a", "Alpha"), article("b", "Beta")];
        let rows = build_suggestion_rows(&items, 1);
        assert_eq!(rows[0].title, "Alpha");
        assert_eq!(rows[1].title, "> Beta");
        assert_eq!(rows[1].position, 2);
        assert!(build_suggestion_rows(&items, -1).iter().all(|r| !r.title.starts_with('>')));
    }

    #[test]
    fn test_build_picker_rows_selected() {
        let picker = CategoryPicker {
            options: vec![
                PickerOption { id: 1, name: "Alaska".into() },
                PickerOption { id: 2, name: "Texas".into() },
            ],
            selected: Some(2),
            disabled: false,
        };
        let rows = build_picker_rows(&picker);
        assert_eq!(rows[0].selected, "");
        assert_eq!(rows[1].selected, "yes");
    }

    #[test]
    fn test_csv_article_headers() {
        let csv = csv_from_rows(&build_article_rows(&[]));
        assert_eq!(csv, "");

        let card = ArticleCard::from_article(&article("a", "A"));
        let csv = csv_from_rows(&build_article_rows(&[card]));
        assert_eq!(csv.lines().next().unwrap(), "Title,Category,Date,Link");
    }

    #[test]
    fn test_csv_field_rows() {
        let rows = vec![FieldRow::new("Title", "SR-22, explained")];
        let csv = csv_from_rows(&rows);
        assert_eq!(csv, "Field,Value\nTitle,\"SR-22, explained\"\n");
    }
}
