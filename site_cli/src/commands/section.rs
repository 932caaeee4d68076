use anyhow::Result;
use clap::Args;
use site_lib::admin::{SectionKind, SectionRow};

use crate::output::{print_rows, FieldRow, OutputFormat};

#[derive(Args)]
pub struct SectionArgs {
    /// Section type, e.g. rich_text, rich_columns, media, video
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Answer to the "how many columns" question
    #[arg(long)]
    pub columns: Option<String>,

    /// Answer to the "section id" question
    #[arg(long)]
    pub anchor: Option<String>,
}

/// Builds the row the admin gets after adding a section and, if `kind`
/// is given, switching its type.
pub fn build_row(args: &SectionArgs) -> SectionRow {
    let mut row = SectionRow::added(args.anchor.as_deref(), args.columns.as_deref());
    if let Some(kind) = &args.kind {
        row.set_kind(SectionKind::parse(kind), args.columns.as_deref());
    }
    row
}

fn row_fields(row: &SectionRow) -> Vec<FieldRow> {
    let legends: Vec<&str> = row.visible_fieldsets().iter().map(|f| f.legend()).collect();
    vec![
        FieldRow::new("Anchor", row.anchor_id.as_str()),
        FieldRow::new("Type", row.kind.as_str()),
        FieldRow::new("Columns", row.columns.to_string()),
        FieldRow::new("Layout", row.layout.as_str()),
        FieldRow::new("Fieldsets", legends.join(", ")),
        FieldRow::new("Column fields", row.visible_fields().join(", ")),
    ]
}

pub fn run(args: &SectionArgs, format: &OutputFormat) -> Result<()> {
    let row = build_row(args);
    print_rows(row_fields(&row), &row, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_lib::admin::Fieldset;

    fn args(kind: Option<&str>, columns: Option<&str>, anchor: Option<&str>) -> SectionArgs {
        SectionArgs {
            kind: kind.map(String::from),
            columns: columns.map(String::from),
            anchor: anchor.map(String::from),
        }
    }

    #[test]
    fn added_row_defaults() {
        let row = build_row(&args(None, Some("seven"), None));
        assert_eq!(row.anchor_id, "section-1");
        assert_eq!(row.columns, 2);
        assert_eq!(row.kind, SectionKind::RichColumns);
        assert!(row.is_field_visible("col2_blocks"));
        assert!(!row.is_field_visible("col3_title"));
    }

    #[test]
    fn switching_to_video_hides_columns() {
        let row = build_row(&args(Some("video"), Some("3"), Some("clips")));
        assert_eq!(row.anchor_id, "clips");
        assert!(row.is_visible(Fieldset::Video));
        assert!(!row.is_visible(Fieldset::ColumnsContent));
        assert!(row.visible_fields().is_empty());
    }
}
