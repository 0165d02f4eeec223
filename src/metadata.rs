//! Metadata Stage - `icons.json`
//!
//! The document shape is a public contract for downstream consumers.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::manifest::Manifest;
use crate::ontology::Ontology;
use crate::output::OutputTree;
use crate::pipeline::PipelineError;
use crate::styles::Style;

pub const METADATA_FILE: &str = "icons.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconMetadata {
    pub icons: Vec<IconEntry>,
    pub categories: Vec<String>,
    pub total_count: usize,
    pub styles: Vec<Style>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconEntry {
    pub name: String,
    pub label: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub styles: Vec<Style>,
}

pub fn build_metadata(manifest: &Manifest, ontology: &Ontology) -> IconMetadata {
    let grouped = manifest.styles_by_name();

    for name in ontology.icons.keys() {
        if !grouped.contains_key(name.as_str()) {
            debug!(icon = %name, "ontology entry has no matching icon");
        }
    }

    let icons = grouped
        .into_iter()
        .map(|(name, styles)| {
            let meta = ontology.resolve(name);
            IconEntry {
                name: name.to_string(),
                label: meta.label,
                description: meta.description,
                category: meta.category,
                tags: meta.tags,
                styles,
            }
        })
        .collect();

    IconMetadata {
        icons,
        categories: ontology.categories.clone(),
        total_count: manifest.len(),
        styles: Style::ALL.to_vec(),
    }
}

pub fn write_metadata(
    manifest: &Manifest,
    ontology: &Ontology,
    out: &mut OutputTree,
) -> Result<IconMetadata, PipelineError> {
    let metadata = build_metadata(manifest, ontology);
    let mut json = serde_json::to_string_pretty(&metadata)?;
    json.push('\n');
    out.write(METADATA_FILE, &json)?;

    info!(
        stage = "metadata",
        icons = metadata.icons.len(),
        variants = metadata.total_count,
        "wrote {}",
        METADATA_FILE
    );
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::fixtures::manifest;

    #[test]
    fn test_total_count_is_variants_and_icons_are_unique_names() {
        let manifest = manifest(&[
            (Style::Outline, "home", "<path/>"),
            (Style::Solid, "home", "<path/>"),
            (Style::Outline, "bell", "<path/>"),
        ]);
        let metadata = build_metadata(&manifest, &Ontology::default());

        assert_eq!(metadata.total_count, 3);
        assert_eq!(metadata.icons.len(), 2);
        assert_eq!(metadata.icons[0].name, "bell");
        assert_eq!(metadata.icons[1].styles, vec![Style::Outline, Style::Solid]);
        assert_eq!(metadata.styles, Style::ALL.to_vec());
    }

    #[test]
    fn test_ontology_merged_with_defaults() {
        let ontology = Ontology::from_json(
            r#"{"categories": ["Navigation"], "icons": {"home": {"category": "Navigation", "tags": ["house"]}}}"#,
        )
        .unwrap();
        let manifest = manifest(&[(Style::Outline, "home", "<path/>")]);
        let metadata = build_metadata(&manifest, &ontology);

        let home = &metadata.icons[0];
        assert_eq!(home.label, "Home");
        assert_eq!(home.category, "Navigation");
        assert_eq!(home.tags, vec!["house"]);
        assert_eq!(metadata.categories, vec!["Navigation"]);
    }

    #[test]
    fn test_json_shape() {
        let manifest = manifest(&[(Style::Bulk, "chart-pie", "<path/>")]);
        let value = serde_json::to_value(build_metadata(&manifest, &Ontology::default())).unwrap();

        assert_eq!(value["totalCount"], 1);
        assert_eq!(value["icons"][0]["label"], "Chart Pie");
        assert_eq!(value["icons"][0]["category"], "Uncategorized");
        assert_eq!(value["icons"][0]["styles"][0], "bulk");
        assert_eq!(value["styles"][3], "bulk");
    }
}
