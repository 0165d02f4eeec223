//! Output Tree - every artifact write goes through here
//!
//! Creates parent directories on demand and records a content hash per
//! artifact. Any filesystem failure is fatal and names the offending path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::hashing::BuildReport;
use crate::pipeline::PipelineError;

pub struct OutputTree {
    root: PathBuf,
    report: BuildReport,
}

impl OutputTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            report: BuildReport::default(),
        }
    }

    /// Absolute path for a `/`-separated artifact path.
    pub fn path_of(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    pub fn write(&mut self, rel: &str, contents: &str) -> Result<(), PipelineError> {
        let path = self.path_of(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| io_error("create directory", parent, source))?;
        }
        fs::write(&path, contents).map_err(|source| io_error("write", &path, source))?;
        self.report.record(rel, contents.as_bytes());
        Ok(())
    }

    /// Remove a generated subtree so deleted icons leave no stale files behind.
    pub fn reset_dir(&mut self, rel: &str) -> Result<(), PipelineError> {
        let path = self.path_of(rel);
        match fs::remove_dir_all(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(io_error("remove directory", &path, source)),
        }
        let prefix = format!("{}/", rel.trim_end_matches('/'));
        self.report.artifacts.retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn into_report(self) -> BuildReport {
        self.report
    }
}

pub(crate) fn io_error(op: &'static str, path: &Path, source: io::Error) -> PipelineError {
    PipelineError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents_and_records_hash() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = OutputTree::new(dir.path());
        out.write("react/outline/Home.jsx", "export {};").unwrap();

        let written = fs::read_to_string(dir.path().join("react").join("outline").join("Home.jsx")).unwrap();
        assert_eq!(written, "export {};");
        assert!(out.report().hash_of("react/outline/Home.jsx").is_some());
    }

    #[test]
    fn test_reset_dir_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = OutputTree::new(dir.path());
        out.write("svg/outline/old.svg", "<svg/>").unwrap();
        out.write("sprite.svg", "<svg/>").unwrap();

        out.reset_dir("svg").unwrap();

        assert!(!dir.path().join("svg").exists());
        assert!(out.report().hash_of("svg/outline/old.svg").is_none());
        assert!(out.report().hash_of("sprite.svg").is_some());
    }

    #[test]
    fn test_reset_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = OutputTree::new(dir.path());
        assert!(out.reset_dir("svelte").is_ok());
    }
}
