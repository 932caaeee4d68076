use serde::{Deserialize, Serialize};

use super::Article;

/// A category entry as the upstream sends it. `name` and `slug` may each be missing.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RawCategory {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blogs: Option<Vec<Article>>,
}

/// A category filter chip: slug plus display name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

impl Category {
    /// Fills a missing slug from the name and a missing name from the slug.
    /// Entries with neither are dropped.
    pub fn from_raw(raw: &RawCategory) -> Option<Self> {
        let name = raw.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let slug = raw.slug.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (slug, name) {
            (None, None) => None,
            (Some(slug), Some(name)) => Some(Self {
                slug: slug.to_string(),
                name: name.to_string(),
            }),
            (Some(slug), None) => Some(Self {
                slug: slug.to_string(),
                name: title_from_slug(slug),
            }),
            (None, Some(name)) => Some(Self {
                slug: slug_from_name(name),
                name: name.to_string(),
            }),
        }
    }
}

/// `auto-insurance` -> `Auto Insurance`
fn title_from_slug(slug: &str) -> String {
    slug.replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Auto  Insurance` -> `auto-insurance`
fn slug_from_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Shapes the category endpoints answer with, in the order they are tried.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum CategoriesResponse {
    Bare(Vec<RawCategory>),
    Categories { categories: Vec<RawCategory> },
    Items { items: Vec<RawCategory> },
    Data { data: Vec<RawCategory> },
}

impl CategoriesResponse {
    pub fn into_raw(self) -> Vec<RawCategory> {
        match self {
            CategoriesResponse::Bare(list)
            | CategoriesResponse::Categories { categories: list }
            | CategoriesResponse::Items { items: list }
            | CategoriesResponse::Data { data: list } => list,
        }
    }

    /// Normalized filter chips, dropping unusable entries.
    pub fn into_categories(self) -> Vec<Category> {
        self.into_raw().iter().filter_map(Category::from_raw).collect()
    }
}
