//! Component Codegen - one component per icon variant per framework
//!
//! Generation is plain string templating. Each framework implements
//! [`ComponentTarget`], whose methods are pure (manifest record in, file
//! contents out); [`emit_components`] is the only part touching the disk.

pub mod attrs;
pub mod react;
pub mod svelte;

use tracing::info;

use crate::manifest::{IconVariant, Manifest};
use crate::output::OutputTree;
use crate::pipeline::PipelineError;
use crate::styles::Style;

pub use react::React;
pub use svelte::Svelte;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const VIEW_BOX: &str = "0 0 24 24";
pub const DEFAULT_SIZE: u32 = 24;

/// Sizes at or below this render with the heavier stroke.
pub const SMALL_SIZE: u32 = 16;
pub const SMALL_STROKE_WIDTH: f64 = 1.75;
pub const STROKE_WIDTH: f64 = 1.5;

pub const GENERATED_NOTICE: &str = "Generated by forgeicons. Do not edit.";

/// Stroke width a stroke-based component uses when no override is given.
pub fn default_stroke_width(size: f64) -> f64 {
    if size <= SMALL_SIZE as f64 {
        SMALL_STROKE_WIDTH
    } else {
        STROKE_WIDTH
    }
}

/// The same policy as a JavaScript expression over `size`.
pub fn stroke_width_expr() -> String {
    format!("size <= {} ? {} : {}", SMALL_SIZE, SMALL_STROKE_WIDTH, STROKE_WIDTH)
}

/// One re-export line in a barrel file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub symbol: String,
    pub module: String,
    pub stroke: bool,
}

pub trait ComponentTarget {
    /// Output directory name.
    fn id(&self) -> &'static str;
    fn extension(&self) -> &'static str;

    fn component(&self, variant: &IconVariant) -> String;

    /// Declarations for one style directory, importing shared shapes from the root.
    fn style_types(&self, exports: &[Export]) -> String;

    /// Shared prop shapes plus a declaration for every root export.
    fn root_types(&self, exports: &[Export]) -> String;

    fn barrel(&self, exports: &[Export]) -> String {
        let mut out = format!("// {}\n", GENERATED_NOTICE);
        for export in exports {
            out.push_str(&format!(
                "export {{ default as {} }} from '{}';\n",
                export.symbol, export.module
            ));
        }
        out
    }
}

/// Counts reported by a codegen run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodegenSummary {
    pub components: usize,
    pub styles: usize,
}

/// Write `{id}/{style}/{Name}.{ext}`, per-style barrels and the root barrel.
pub fn emit_components(
    target: &dyn ComponentTarget,
    manifest: &Manifest,
    out: &mut OutputTree,
) -> Result<CodegenSummary, PipelineError> {
    let id = target.id();
    out.reset_dir(id)?;

    let mut summary = CodegenSummary::default();
    let mut root = vec![];

    for style in Style::ALL {
        let mut exports = vec![];

        for variant in manifest.for_style(style) {
            let component = variant.component_name();
            let file = format!("{}.{}", component, target.extension());
            out.write(&format!("{}/{}/{}", id, style, file), &target.component(variant))?;

            root.push(Export {
                symbol: variant.export_name(),
                module: format!("./{}/{}", style, file),
                stroke: style.is_stroke(),
            });
            exports.push(Export {
                symbol: component,
                module: format!("./{}", file),
                stroke: style.is_stroke(),
            });
        }

        if exports.is_empty() {
            continue;
        }
        exports.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        out.write(&format!("{}/{}/index.js", id, style), &target.barrel(&exports))?;
        out.write(&format!("{}/{}/index.d.ts", id, style), &target.style_types(&exports))?;

        summary.components += exports.len();
        summary.styles += 1;
    }

    root.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    out.write(&format!("{}/index.js", id), &target.barrel(&root))?;
    out.write(&format!("{}/index.d.ts", id), &target.root_types(&root))?;

    info!(
        stage = id,
        components = summary.components,
        styles = summary.styles,
        "generated components"
    );
    Ok(summary)
}

/// Type alias name for an export in the declaration files.
pub(crate) fn shape_of(export: &Export) -> &'static str {
    if export.stroke {
        "StrokeIcon"
    } else {
        "Icon"
    }
}

/// `Icon`, `StrokeIcon`, or both, for an import list.
pub(crate) fn shapes_used(exports: &[Export]) -> String {
    let mut shapes: Vec<&str> = exports.iter().map(shape_of).collect();
    shapes.sort();
    shapes.dedup();
    shapes.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::fixtures::manifest;
    use std::fs;

    #[test]
    fn test_stroke_width_policy() {
        assert_eq!(default_stroke_width(12.0), 1.75);
        assert_eq!(default_stroke_width(16.0), 1.75);
        assert_eq!(default_stroke_width(16.5), 1.5);
        assert_eq!(default_stroke_width(24.0), 1.5);
        assert_eq!(stroke_width_expr(), "size <= 16 ? 1.75 : 1.5");
    }

    #[test]
    fn test_emit_writes_one_file_per_variant_and_barrels() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = OutputTree::new(dir.path());
        let manifest = manifest(&[
            (Style::Outline, "home", "<path/>"),
            (Style::Outline, "bell", "<path/>"),
            (Style::Solid, "home", "<path/>"),
        ]);

        let summary = emit_components(&React, &manifest, &mut out).unwrap();
        assert_eq!(summary, CodegenSummary { components: 3, styles: 2 });

        for rel in [
            "react/outline/Home.jsx",
            "react/outline/Bell.jsx",
            "react/solid/Home.jsx",
            "react/outline/index.js",
            "react/outline/index.d.ts",
            "react/solid/index.js",
            "react/index.js",
            "react/index.d.ts",
        ] {
            assert!(dir.path().join(rel).exists(), "missing {}", rel);
        }
        assert!(!dir.path().join("react/duotone").exists());

        let barrel = fs::read_to_string(dir.path().join("react/outline/index.js")).unwrap();
        let bell = barrel.find("Bell").unwrap();
        let home = barrel.find("Home").unwrap();
        assert!(bell < home);

        let root = fs::read_to_string(dir.path().join("react/index.js")).unwrap();
        assert!(root.contains("export { default as HomeOutline } from './outline/Home.jsx';"));
        assert!(root.contains("export { default as HomeSolid } from './solid/Home.jsx';"));
    }

    #[test]
    fn test_emit_removes_stale_components() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = OutputTree::new(dir.path());
        emit_components(&Svelte, &manifest(&[(Style::Bulk, "old", "<path/>")]), &mut out).unwrap();
        emit_components(&Svelte, &manifest(&[(Style::Bulk, "new", "<path/>")]), &mut out).unwrap();

        assert!(!dir.path().join("svelte/bulk/Old.svelte").exists());
        assert!(dir.path().join("svelte/bulk/New.svelte").exists());
    }
}
