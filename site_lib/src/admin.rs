//! Admin form state: homepage section rows and the blog category picker.
//!
//! Field visibility is computed when a row is built and again whenever its
//! type or column count changes.

use std::fmt;

use content_api::types::RawCategory;
use content_api::CategoryQuery;
use serde::Serialize;

use crate::fetch::SafeClient;

pub const DEFAULT_ANCHOR_ID: &str = "section-1";
pub const MAX_COLUMNS: i64 = 5;
/// Column count used when the admin's answer is not 1 through 5.
pub const FALLBACK_COLUMNS: i64 = 2;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    RichText,
    RichColumns,
    Media,
    Video,
    Graph,
    Code,
    Gallery,
    Stats,
    Cta,
    Editor,
    /// A type this form does not know; shown with the plain body.
    Unknown(String),
}

impl SectionKind {
    /// Reads the type select's value. Blank means rich text.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "rich_text" => Self::RichText,
            "rich_columns" => Self::RichColumns,
            "media" => Self::Media,
            "video" => Self::Video,
            "graph" => Self::Graph,
            "code" => Self::Code,
            "gallery" => Self::Gallery,
            "stats" => Self::Stats,
            "cta" => Self::Cta,
            "editor" => Self::Editor,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::RichText => "rich_text",
            Self::RichColumns => "rich_columns",
            Self::Media => "media",
            Self::Video => "video",
            Self::Graph => "graph",
            Self::Code => "code",
            Self::Gallery => "gallery",
            Self::Stats => "stats",
            Self::Cta => "cta",
            Self::Editor => "editor",
            Self::Unknown(other) => other,
        }
    }

    /// Fieldsets shown for this kind.
    pub fn fieldsets(&self) -> &'static [Fieldset] {
        use Fieldset::*;
        match self {
            Self::RichText => &[FullWidthBody],
            Self::RichColumns => &[ColumnsContent],
            Self::Media => &[Media, FullWidthBody],
            Self::Video => &[Video, FullWidthBody],
            Self::Graph => &[Graph],
            Self::Code => &[Code],
            Self::Gallery => &[Gallery, Cta],
            Self::Stats => &[Stats],
            Self::Cta => &[Cta, FullWidthBody],
            Self::Editor => &[EditorBlocks],
            Self::Unknown(_) => &[FullWidthBody],
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of fields on the section form, identified by its legend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Fieldset {
    FullWidthBody,
    ColumnsContent,
    Media,
    Video,
    Graph,
    Code,
    Gallery,
    Stats,
    Cta,
    EditorBlocks,
}

impl Fieldset {
    pub const ALL: [Fieldset; 10] = [
        Fieldset::FullWidthBody,
        Fieldset::ColumnsContent,
        Fieldset::Media,
        Fieldset::Video,
        Fieldset::Graph,
        Fieldset::Code,
        Fieldset::Gallery,
        Fieldset::Stats,
        Fieldset::Cta,
        Fieldset::EditorBlocks,
    ];

    pub fn legend(&self) -> &'static str {
        match self {
            Fieldset::FullWidthBody => "Full Width Body",
            Fieldset::ColumnsContent => "Columns Content",
            Fieldset::Media => "Media",
            Fieldset::Video => "Video",
            Fieldset::Graph => "Graph",
            Fieldset::Code => "Code",
            Fieldset::Gallery => "Gallery",
            Fieldset::Stats => "Stats",
            Fieldset::Cta => "CTA",
            Fieldset::EditorBlocks => "Editor Blocks",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Full,
    Grid2,
    Grid3,
    Grid4,
    Grid5,
}

impl Layout {
    pub fn for_columns(columns: i64) -> Self {
        match columns {
            1 => Layout::Full,
            2 => Layout::Grid2,
            3 => Layout::Grid3,
            4 => Layout::Grid4,
            _ => Layout::Grid5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Full => "full",
            Layout::Grid2 => "grid2",
            Layout::Grid3 => "grid3",
            Layout::Grid4 => "grid4",
            Layout::Grid5 => "grid5",
        }
    }
}

/// Column count from a free-text answer, if it is 1 through 5.
pub fn parse_columns(answer: &str) -> Option<i64> {
    answer
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|n| (1..=MAX_COLUMNS).contains(n))
}

/// Per-column field names (`colN_title`, `colN_subtitle`, `colN_rich`, `colN_blocks`).
pub fn column_fields(column: i64) -> [String; 4] {
    ["title", "subtitle", "rich", "blocks"].map(|suffix| format!("col{}_{}", column, suffix))
}

/// One homepage section in the admin inline form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionRow {
    pub anchor_id: String,
    pub kind: SectionKind,
    pub columns: i64,
    pub layout: Layout,
    visible_fieldsets: Vec<Fieldset>,
    visible_fields: Vec<String>,
}

impl SectionRow {
    /// An existing row as stored.
    pub fn new(anchor_id: &str, kind: SectionKind, columns: i64, layout: Layout) -> Self {
        let mut row = Self {
            anchor_id: anchor_id.to_string(),
            kind,
            columns,
            layout,
            visible_fieldsets: Vec::new(),
            visible_fields: Vec::new(),
        };
        row.refresh();
        row
    }

    /// A freshly added row, set up from the admin's answers to the
    /// "section id" and "columns" questions. One column means a full-width
    /// rich-text section; more means a column grid.
    pub fn added(anchor_answer: Option<&str>, columns_answer: Option<&str>) -> Self {
        let anchor = anchor_answer
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_ANCHOR_ID);
        let columns = columns_answer
            .and_then(parse_columns)
            .unwrap_or(FALLBACK_COLUMNS);
        let kind = if columns == 1 {
            SectionKind::RichText
        } else {
            SectionKind::RichColumns
        };
        Self::new(anchor, kind, columns, Layout::for_columns(columns))
    }

    /// Changes the section type. Switching to columns with an invalid stored
    /// count takes the count from `columns_answer` when that is valid.
    pub fn set_kind(&mut self, kind: SectionKind, columns_answer: Option<&str>) {
        if kind == SectionKind::RichColumns && !(1..=MAX_COLUMNS).contains(&self.columns) {
            if let Some(n) = columns_answer.and_then(parse_columns) {
                self.columns = n;
                self.layout = Layout::for_columns(n);
            }
        }
        self.kind = kind;
        self.refresh();
    }

    pub fn set_columns(&mut self, columns: i64) {
        self.columns = columns;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.visible_fieldsets = self.kind.fieldsets().to_vec();
        self.visible_fields = if self.kind == SectionKind::RichColumns {
            (1..=self.columns.min(MAX_COLUMNS))
                .flat_map(column_fields)
                .collect()
        } else {
            Vec::new()
        };
    }

    pub fn visible_fieldsets(&self) -> &[Fieldset] {
        &self.visible_fieldsets
    }

    pub fn is_visible(&self, fieldset: Fieldset) -> bool {
        self.visible_fieldsets.contains(&fieldset)
    }

    /// Per-column fields currently shown.
    pub fn visible_fields(&self) -> &[String] {
        &self.visible_fields
    }

    pub fn is_field_visible(&self, field: &str) -> bool {
        self.visible_fields.iter().any(|f| f == field)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PickerOption {
    pub id: i64,
    pub name: String,
}

/// The blog form's category select, filtered by parent page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryPicker {
    pub options: Vec<PickerOption>,
    pub selected: Option<i64>,
    pub disabled: bool,
}

impl CategoryPicker {
    /// No parent page chosen: nothing to pick from.
    pub fn disabled() -> Self {
        Self {
            options: Vec::new(),
            selected: None,
            disabled: true,
        }
    }

    /// Options from the upstream list. `keep` is kept selected if it is still offered.
    pub fn from_categories(categories: &[RawCategory], keep: Option<i64>) -> Self {
        let options: Vec<PickerOption> = categories
            .iter()
            .filter_map(|c| {
                Some(PickerOption {
                    id: c.id?,
                    name: c.name.clone().unwrap_or_default(),
                })
            })
            .collect();
        let selected = keep.filter(|id| options.iter().any(|o| o.id == *id));
        Self {
            options,
            selected,
            disabled: false,
        }
    }

    /// Loads the picker for `page_id`. On failure the picker is empty but enabled.
    pub async fn load(client: &SafeClient, page_id: Option<i64>, keep: Option<i64>) -> Self {
        let Some(page_id) = page_id else {
            return Self::disabled();
        };
        let query = CategoryQuery::default().with_page_id(page_id);
        match client.raw_categories(&query).await {
            Some(categories) => Self::from_categories(&categories, keep),
            None => Self::from_categories(&[], None),
        }
    }
}

/// Lines previewing the blogs filed under `category_id`, as `title — slug`.
pub fn category_blog_preview(categories: &[RawCategory], category_id: i64) -> Vec<String> {
    let lines: Vec<String> = categories
        .iter()
        .find(|c| c.id == Some(category_id))
        .and_then(|c| c.blogs.as_ref())
        .map(|blogs| {
            blogs
                .iter()
                .map(|b| format!("{} — {}", b.title, b.slug))
                .collect()
        })
        .unwrap_or_default();
    if lines.is_empty() {
        vec!["No blogs found for this category.".to_string()]
    } else {
        lines
    }
}
