//! Style Set - The Fixed Variant Enumeration
//!
//! Every icon exists in one or more of these styles. Stroke classification is a
//! property of the style identifier, never of the icon content.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Outline,
    Solid,
    Duotone,
    Bulk,
}

impl Style {
    /// All styles in build order.
    pub const ALL: [Style; 4] = [Style::Outline, Style::Solid, Style::Duotone, Style::Bulk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Outline => "outline",
            Style::Solid => "solid",
            Style::Duotone => "duotone",
            Style::Bulk => "bulk",
        }
    }

    /// Suffix used to disambiguate root barrel exports.
    pub fn pascal(&self) -> &'static str {
        match self {
            Style::Outline => "Outline",
            Style::Solid => "Solid",
            Style::Duotone => "Duotone",
            Style::Bulk => "Bulk",
        }
    }

    /// Stroke-based styles expose a dynamic stroke width on their components.
    pub fn is_stroke(&self) -> bool {
        matches!(self, Style::Outline | Style::Duotone)
    }

    pub fn from_dir_name(name: &str) -> Option<Style> {
        Style::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub fn display(&self) -> StyleDisplay {
        match self {
            Style::Outline => StyleDisplay {
                id: *self,
                label: "Outline",
                tag: "OL",
                description: "1.5px strokes on a 24px grid for interface chrome.",
            },
            Style::Solid => StyleDisplay {
                id: *self,
                label: "Solid",
                tag: "SO",
                description: "Filled shapes for active and selected states.",
            },
            Style::Duotone => StyleDisplay {
                id: *self,
                label: "Duotone",
                tag: "DT",
                description: "Strokes over a tinted secondary layer.",
            },
            Style::Bulk => StyleDisplay {
                id: *self,
                label: "Bulk",
                tag: "BK",
                description: "Two-weight fills for dense dashboards.",
            },
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demo page display metadata for a style
#[derive(Debug, Clone, Serialize)]
pub struct StyleDisplay {
    pub id: Style,
    pub label: &'static str,
    pub tag: &'static str,
    pub description: &'static str,
}
