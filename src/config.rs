//! Build Configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::optimize::MinifyOptions;
use crate::pipeline::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_ontology_path")]
    pub ontology_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_demo_dir")]
    pub demo_dir: PathBuf,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub minify: MinifyOptions,
}

fn default_source_dir() -> PathBuf { PathBuf::from("icons") }
fn default_ontology_path() -> PathBuf { PathBuf::from("ontology.json") }
fn default_output_dir() -> PathBuf { PathBuf::from("dist") }
fn default_demo_dir() -> PathBuf { PathBuf::from("demo") }
fn default_debounce_ms() -> u64 { 150 }

impl BuildConfig {
    /// Relative paths in the file are taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            op: "read config",
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| PipelineError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.rooted_at(path.parent().unwrap_or(Path::new(""))))
    }

    /// Resolve every path against `base`, leaving absolute paths untouched.
    pub fn rooted_at(mut self, base: &Path) -> Self {
        for path in [
            &mut self.source_dir,
            &mut self.ontology_path,
            &mut self.output_dir,
            &mut self.demo_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            ontology_path: default_ontology_path(),
            output_dir: default_output_dir(),
            demo_dir: default_demo_dir(),
            debounce_ms: default_debounce_ms(),
            minify: MinifyOptions::default(),
        }
    }
}
