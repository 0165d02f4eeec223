//! ForgeIcons Core - Icon Build Pipeline
//!
//! Raw SVGs under `{source}/{style}/{name}.svg` plus an optional ontology go
//! in; optimized SVGs, React and Svelte components, a sprite sheet, a metadata
//! index and a self-contained demo page come out.
//!
//! # Guarantees
//! 1. One bad icon never aborts a run
//! 2. Output is deterministic for identical inputs
//! 3. Every export symbol is unique
//! 4. Stale output is removed on every run

pub mod codegen;
pub mod config;
pub mod demo;
pub mod hashing;
pub mod manifest;
pub mod metadata;
pub mod ontology;
pub mod optimize;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod sprite;
pub mod styles;
pub mod watch;

pub use config::BuildConfig;
pub use hashing::{canonical_json, sha256_hex, BuildReport};
pub use manifest::{IconVariant, Manifest};
pub use ontology::{load_ontology, IconMeta, Ontology, ResolvedMeta};
pub use optimize::{inner_content, MinifyOptions, Optimize, OptimizeError, SvgMinifier};
pub use pipeline::{BuildOutcome, Pipeline, PipelineError, StageSelection};
pub use styles::Style;
pub use watch::{watch, BuildCache, Debouncer, WatchContext};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
