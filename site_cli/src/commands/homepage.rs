use anyhow::Result;
use site_lib::types::HomepagePayload;
use site_lib::{SafeClient, Settings};

use crate::output::{print_rows, FieldRow, OutputFormat};

pub fn summary_rows(payload: &HomepagePayload) -> Vec<FieldRow> {
    let mut rows = vec![
        FieldRow::new("Meta title", payload.meta_title.clone().unwrap_or_default()),
        FieldRow::new(
            "Meta description",
            payload.meta_description.clone().unwrap_or_default(),
        ),
        FieldRow::new("Hero image", payload.hero_image.clone().unwrap_or_default()),
        FieldRow::new("Sections", payload.sections.len().to_string()),
        FieldRow::new("Videos", payload.videos.len().to_string()),
    ];
    if let Some(err) = &payload.error {
        rows.push(FieldRow::new("Error", err.as_str()));
    }
    rows
}

pub async fn run(settings: &Settings, format: &OutputFormat) -> Result<()> {
    let client = SafeClient::from_settings(settings, None);
    let payload = client.homepage().await;
    print_rows(summary_rows(&payload), &payload, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_summary() {
        let rows = summary_rows(&HomepagePayload::fallback_with_error("homepage upstream error"));
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json[0]["Value"], "Home");
        assert_eq!(json[3]["Value"], "0");
        assert_eq!(json[5]["Field"], "Error");
    }
}
