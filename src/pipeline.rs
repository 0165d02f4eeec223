//! Build Pipeline - Single Entry Point
//!
//! Sources and ontology are read once, the optimizer produces the manifest,
//! and every selected stage then runs sequentially off that same manifest.

use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::codegen::{emit_components, ComponentTarget, React, Svelte};
use crate::config::BuildConfig;
use crate::demo::write_demo;
use crate::hashing::BuildReport;
use crate::manifest::{Manifest, NameError};
use crate::metadata::write_metadata;
use crate::ontology::{load_ontology, Ontology};
use crate::optimize::{optimize_icons, Optimize, SvgMinifier};
use crate::output::OutputTree;
use crate::source::read_sources;
use crate::sprite::write_sprite;
use crate::styles::Style;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to {op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid ontology {}: {source}", path.display())]
    Ontology {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate icon {name} in style {style}")]
    DuplicateVariant { style: Style, name: String },

    #[error("icon in style {style}: {source}")]
    ComponentName {
        style: Style,
        #[source]
        source: NameError,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Which stages a run executes. The optimizer always runs since it produces
/// the manifest; `optimize` additionally selects the metadata stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSelection {
    pub optimize: bool,
    pub react: bool,
    pub svelte: bool,
    pub sprite: bool,
    pub demo: bool,
}

impl StageSelection {
    pub fn all() -> Self {
        Self {
            optimize: true,
            react: true,
            svelte: true,
            sprite: true,
            demo: true,
        }
    }

    /// Flags as given on the command line; none set means every stage.
    pub fn from_flags(optimize: bool, react: bool, svelte: bool, sprite: bool, demo: bool) -> Self {
        let selection = Self { optimize, react, svelte, sprite, demo };
        if selection.is_empty() {
            Self::all()
        } else {
            selection
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.optimize || self.react || self.svelte || self.sprite || self.demo)
    }
}

impl Default for StageSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Everything a run produced
#[derive(Debug)]
pub struct BuildOutcome {
    pub manifest: Manifest,
    pub ontology: Ontology,
    pub skipped: Vec<(Style, String)>,
    pub report: BuildReport,
}

/// The build pipeline - owns the configuration, optimizer and codegen targets
pub struct Pipeline {
    config: BuildConfig,
    optimizer: Box<dyn Optimize>,
}

impl Pipeline {
    pub fn new(config: BuildConfig) -> Self {
        let minifier = SvgMinifier::new(config.minify);
        Self::with_optimizer(config, Box::new(minifier))
    }

    pub fn with_optimizer(config: BuildConfig, optimizer: Box<dyn Optimize>) -> Self {
        Self { config, optimizer }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Full run: read, optimize, then every selected downstream stage.
    pub fn run(&self, selection: &StageSelection) -> Result<BuildOutcome, PipelineError> {
        let raws = read_sources(&self.config.source_dir)?;
        info!(stage = "source", count = raws.len(), "read source icons");
        let ontology = load_ontology(&self.config.ontology_path)?;

        let mut out = OutputTree::new(&self.config.output_dir);
        let summary = optimize_icons(self.optimizer.as_ref(), raws, &mut out)?;
        let manifest = summary.manifest;

        if selection.optimize {
            write_metadata(&manifest, &ontology, &mut out)?;
        }
        for target in self.targets(selection) {
            emit_components(target, &manifest, &mut out)?;
        }
        if selection.sprite {
            write_sprite(&manifest, &mut out)?;
        }
        if selection.demo {
            write_demo(&manifest, &ontology, &self.config.demo_dir, &mut out)?;
        }

        let report = out.into_report();
        info!(
            artifacts = report.len(),
            fingerprint = %report.fingerprint()?,
            "build complete"
        );

        Ok(BuildOutcome {
            manifest,
            ontology,
            skipped: summary.skipped,
            report,
        })
    }

    /// Demo-only run against a manifest and ontology from an earlier full run.
    pub fn run_demo(&self, manifest: &Manifest, ontology: &Ontology) -> Result<BuildReport, PipelineError> {
        let mut out = OutputTree::new(&self.config.output_dir);
        write_demo(manifest, ontology, &self.config.demo_dir, &mut out)?;
        Ok(out.into_report())
    }

    fn targets(&self, selection: &StageSelection) -> Vec<&'static dyn ComponentTarget> {
        let mut targets: Vec<&'static dyn ComponentTarget> = vec![];
        if selection.react {
            targets.push(&React);
        }
        if selection.svelte {
            targets.push(&Svelte);
        }
        targets
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}
