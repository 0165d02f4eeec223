//! ForgeIcons CLI - build the icon library, optionally watching for changes
//!
//! Stage flags combine; with none given every stage runs.
//! Returns non-zero on any fatal error. Icons the optimizer rejects are
//! logged and skipped without affecting the exit code.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forgeicons_core::{
    watch, BuildCache, BuildConfig, Pipeline, PipelineError, StageSelection, ENGINE_VERSION,
};

const DEFAULT_CONFIG: &str = "forgeicons.json";

#[derive(Parser)]
#[command(name = "forgeicons-cli")]
#[command(about = "ForgeIcons CLI - Icon Build Pipeline")]
#[command(version)]
struct Cli {
    /// Optimize SVGs and write the metadata index
    #[arg(long)]
    optimize: bool,

    /// Generate React components
    #[arg(long)]
    react: bool,

    /// Generate Svelte components
    #[arg(long)]
    svelte: bool,

    /// Build the sprite sheet
    #[arg(long)]
    sprite: bool,

    /// Build the demo page
    #[arg(long)]
    demo: bool,

    /// Keep running and rebuild on changes
    #[arg(short, long)]
    watch: bool,

    /// JSON configuration file (defaults to ./forgeicons.json when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source icon directory
    #[arg(long)]
    source: Option<PathBuf>,

    /// Ontology file
    #[arg(long)]
    ontology: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Demo payload directory
    #[arg(long)]
    demo_dir: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn selection(&self) -> StageSelection {
        StageSelection::from_flags(self.optimize, self.react, self.svelte, self.sprite, self.demo)
    }

    fn build_config(&self) -> Result<BuildConfig, PipelineError> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::load(path)?,
            None if Path::new(DEFAULT_CONFIG).exists() => BuildConfig::load(Path::new(DEFAULT_CONFIG))?,
            None => BuildConfig::default(),
        };

        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(ontology) = &self.ontology {
            config.ontology_path = ontology.clone();
        }
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(demo_dir) = &self.demo_dir {
            config.demo_dir = demo_dir.clone();
        }
        Ok(config)
    }
}

const DEFAULT_DIRECTIVES: &str = "forgeicons_core=info,forgeicons_cli=info";

/// Fixed filter for `-v`/`-q`; `None` defers to `RUST_LOG`.
fn log_directives(verbose: u8, quiet: bool) -> Option<&'static str> {
    match (verbose, quiet) {
        (0, true) => Some("forgeicons_core=error,forgeicons_cli=error"),
        (0, false) => None,
        (1, _) => Some("forgeicons_core=debug,forgeicons_cli=debug"),
        _ => Some("forgeicons_core=trace,forgeicons_cli=trace"),
    }
}

fn init_logger(verbose: u8, quiet: bool) {
    let filter = match log_directives(verbose, quiet) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES)),
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    let selection = cli.selection();
    let pipeline = Pipeline::new(cli.build_config()?);
    info!(version = ENGINE_VERSION, ?selection, "forgeicons");

    let cache = match pipeline.run(&selection) {
        Ok(outcome) => {
            if !outcome.skipped.is_empty() {
                warn!(skipped = outcome.skipped.len(), "some icons were skipped");
            }
            info!(icons = outcome.manifest.len(), out = %pipeline.config().output_dir.display(), "done");
            Some(BuildCache::from(outcome))
        }
        Err(e) if cli.watch => {
            error!(error = %e, "initial build failed, watching anyway");
            None
        }
        Err(e) => return Err(e),
    };

    if cli.watch {
        watch(&pipeline, selection, cache)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "build failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directives_name_both_crates() {
        for directives in [
            log_directives(0, true),
            log_directives(1, false),
            log_directives(3, false),
            Some(DEFAULT_DIRECTIVES),
        ] {
            let directives = directives.unwrap();
            assert!(directives.contains("forgeicons_core="));
            assert!(directives.contains("forgeicons_cli="));
        }
        assert_eq!(log_directives(0, true), Some("forgeicons_core=error,forgeicons_cli=error"));
        assert_eq!(log_directives(0, false), None);
    }

    #[test]
    fn test_flags_override_config_paths() {
        let cli = Cli::parse_from(["forgeicons-cli", "--react", "--out", "build", "--source", "svg"]);
        let config = cli.build_config().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("build"));
        assert_eq!(config.source_dir, PathBuf::from("svg"));
        assert!(cli.selection().react && !cli.selection().svelte);
    }
}
