//! Manifest - the shared artifact every downstream stage reads
//!
//! Built once by the optimizer stage, never mutated afterwards.

use heck::ToUpperCamelCase;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::pipeline::PipelineError;
use crate::styles::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconVariant {
    pub style: Style,
    pub name: String,
    pub raw: String,
    pub optimized: String,
    /// `optimized` without the outer `<svg>` wrapper
    pub inner: String,
}

impl IconVariant {
    /// Component file base name and export symbol.
    pub fn component_name(&self) -> String {
        component_name(&self.name)
    }

    /// Root barrel symbol, unique across styles.
    pub fn export_name(&self) -> String {
        format!("{}{}", self.component_name(), self.style.pascal())
    }

    pub fn sprite_id(&self) -> String {
        format!("{}-{}", self.name, self.style)
    }
}

/// `arrow-up` becomes `ArrowUp`.
pub fn component_name(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Why an icon name cannot become a component
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("`{name}` becomes `{component}`, which is not a valid identifier")]
    InvalidIdentifier { name: String, component: String },

    #[error("`{name}` and `{existing}` both become component `{component}`")]
    Collision {
        name: String,
        existing: String,
        component: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    variants: Vec<IconVariant>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variant. A repeated `(style, name)` pair, or a name whose
    /// component name is invalid or already taken in that style, is rejected.
    pub fn push(&mut self, variant: IconVariant) -> Result<(), PipelineError> {
        if self.get(variant.style, &variant.name).is_some() {
            return Err(PipelineError::DuplicateVariant {
                style: variant.style,
                name: variant.name,
            });
        }
        self.check_name(variant.style, &variant.name)
            .map_err(|source| PipelineError::ComponentName {
                style: variant.style,
                source,
            })?;
        self.variants.push(variant);
        Ok(())
    }

    /// Component names must be identifiers and unique within a style.
    pub fn check_name(&self, style: Style, name: &str) -> Result<(), NameError> {
        let component = component_name(name);
        if !component.starts_with(|c: char| c.is_alphabetic()) {
            return Err(NameError::InvalidIdentifier {
                name: name.to_string(),
                component,
            });
        }
        match self
            .for_style(style)
            .find(|v| v.name != name && v.component_name() == component)
        {
            Some(existing) => Err(NameError::Collision {
                name: name.to_string(),
                existing: existing.name.clone(),
                component,
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, style: Style, name: &str) -> Option<&IconVariant> {
        self.variants.iter().find(|v| v.style == style && v.name == name)
    }

    /// `get` for the first style in `styles` that has the icon.
    pub fn find_in(&self, name: &str, styles: &[Style]) -> Option<&IconVariant> {
        styles.iter().find_map(|style| self.get(*style, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconVariant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn for_style(&self, style: Style) -> impl Iterator<Item = &IconVariant> {
        self.variants.iter().filter(move |v| v.style == style)
    }

    /// Styles each icon name exists in, names ascending, styles in build order.
    pub fn styles_by_name(&self) -> BTreeMap<&str, Vec<Style>> {
        let mut grouped: BTreeMap<&str, Vec<Style>> = BTreeMap::new();
        for variant in &self.variants {
            grouped.entry(variant.name.as_str()).or_default().push(variant.style);
        }
        for styles in grouped.values_mut() {
            styles.sort();
            styles.dedup();
        }
        grouped
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn variant(style: Style, name: &str, inner: &str) -> IconVariant {
        let optimized = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none">{}</svg>"#,
            inner
        );
        IconVariant {
            style,
            name: name.to_string(),
            raw: optimized.clone(),
            optimized,
            inner: inner.to_string(),
        }
    }

    pub fn manifest(entries: &[(Style, &str, &str)]) -> Manifest {
        let mut manifest = Manifest::new();
        for (style, name, inner) in entries {
            manifest.push(variant(*style, name, inner)).unwrap();
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_derived_names() {
        let v = variant(Style::Outline, "arrow-up-right", "<path/>");
        assert_eq!(v.component_name(), "ArrowUpRight");
        assert_eq!(v.export_name(), "ArrowUpRightOutline");
        assert_eq!(v.sprite_id(), "arrow-up-right-outline");
    }

    #[test]
    fn test_duplicate_variant_rejected() {
        let mut manifest = manifest(&[(Style::Solid, "home", "<path/>")]);
        let err = manifest.push(variant(Style::Solid, "home", "<circle/>")).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateVariant { style: Style::Solid, .. }));
        assert!(manifest.push(variant(Style::Outline, "home", "<path/>")).is_ok());
    }

    #[test]
    fn test_component_name_collision_rejected() {
        let mut manifest = manifest(&[(Style::Outline, "arrow-up", "<path/>")]);
        let err = manifest.push(variant(Style::Outline, "arrow_up", "<path/>")).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ComponentName { source: NameError::Collision { .. }, .. }
        ));
        assert_eq!(manifest.len(), 1);

        // other styles live in their own directories and barrels
        assert!(manifest.push(variant(Style::Solid, "arrow_up", "<path/>")).is_ok());
    }

    #[test]
    fn test_name_must_start_with_letter() {
        let manifest = Manifest::new();
        assert_eq!(
            manifest.check_name(Style::Solid, "2fa"),
            Err(NameError::InvalidIdentifier {
                name: "2fa".into(),
                component: "2fa".into(),
            })
        );
        assert!(matches!(
            manifest.check_name(Style::Solid, "---"),
            Err(NameError::InvalidIdentifier { .. })
        ));
        assert!(manifest.check_name(Style::Solid, "two-fa").is_ok());
    }

    #[test]
    fn test_styles_by_name_sorted() {
        let manifest = manifest(&[
            (Style::Solid, "home", ""),
            (Style::Outline, "home", ""),
            (Style::Outline, "bell", ""),
        ]);
        let grouped = manifest.styles_by_name();
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec!["bell", "home"]);
        assert_eq!(grouped["home"], vec![Style::Outline, Style::Solid]);
    }

    #[test]
    fn test_find_in_falls_back() {
        let manifest = manifest(&[(Style::Outline, "sun", "<circle/>")]);
        let found = manifest.find_in("sun", &[Style::Solid, Style::Outline]).unwrap();
        assert_eq!(found.style, Style::Outline);
        assert!(manifest.find_in("moon", &[Style::Solid, Style::Outline]).is_none());
    }
}
