//! Ontology - Side-car Icon Metadata
//!
//! Absence is tolerated and inconsistencies only warn. An icon without an
//! entry gets synthesized defaults, field by field.

use heck::ToTitleCase;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::output::io_error;
use crate::pipeline::PipelineError;

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ontology {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub icons: BTreeMap<String, IconMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconMeta {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Ontology fields for one icon with defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMeta {
    pub label: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// An icon entry referencing a category missing from the category list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory {
    pub icon: String,
    pub category: String,
}

impl Ontology {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn unknown_categories(&self) -> Vec<UnknownCategory> {
        self.icons
            .iter()
            .filter_map(|(icon, meta)| {
                let category = meta.category.as_deref().filter(|c| !c.is_empty())?;
                if self.categories.iter().any(|c| c == category) {
                    None
                } else {
                    Some(UnknownCategory {
                        icon: icon.clone(),
                        category: category.to_string(),
                    })
                }
            })
            .collect()
    }

    /// Metadata for `name`, each missing field replaced by its default.
    pub fn resolve(&self, name: &str) -> ResolvedMeta {
        let meta = self.icons.get(name);

        ResolvedMeta {
            label: non_empty(meta.and_then(|m| m.label.as_ref()))
                .map(str::to_string)
                .unwrap_or_else(|| default_label(name)),
            description: non_empty(meta.and_then(|m| m.description.as_ref()))
                .unwrap_or_default()
                .to_string(),
            category: non_empty(meta.and_then(|m| m.category.as_ref()))
                .unwrap_or(UNCATEGORIZED)
                .to_string(),
            tags: meta.map(|m| m.tags.iter().cloned().collect()).unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// `arrow-up` becomes `Arrow Up`.
pub fn default_label(name: &str) -> String {
    name.to_title_case()
}

pub fn load_ontology(path: &Path) -> Result<Ontology, PipelineError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "ontology file not found, using defaults for every icon");
            return Ok(Ontology::default());
        }
        Err(source) => return Err(io_error("read", path, source)),
    };

    let ontology = Ontology::from_json(&content).map_err(|source| PipelineError::Ontology {
        path: path.to_path_buf(),
        source,
    })?;

    for issue in ontology.unknown_categories() {
        warn!(
            icon = %issue.icon,
            category = %issue.category,
            "ontology references a category missing from the category list"
        );
    }

    info!(
        categories = ontology.categories.len(),
        icons = ontology.icons.len(),
        "ontology loaded"
    );
    Ok(ontology)
}
