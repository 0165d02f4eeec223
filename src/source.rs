//! Source Reader
//!
//! One subdirectory per style, one `.svg` file per icon. Content is not
//! inspected here; malformed files are the optimizer's problem.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::output::io_error;
use crate::pipeline::PipelineError;
use crate::styles::Style;

pub const SOURCE_EXTENSION: &str = "svg";

/// A source file as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIcon {
    pub style: Style,
    pub name: String,
    pub content: Vec<u8>,
}

/// Read every icon under `source_dir`, style by style, files sorted by name.
pub fn read_sources(source_dir: &Path) -> Result<Vec<RawIcon>, PipelineError> {
    let mut icons = vec![];

    for style in Style::ALL {
        let dir = source_dir.join(style.as_str());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(style = %style, path = %dir.display(), "style directory missing, skipping");
                continue;
            }
            Err(source) => return Err(io_error("read directory", &dir, source)),
        };

        let mut files = vec![];
        for entry in entries {
            let entry = entry.map_err(|source| io_error("read directory", &dir, source))?;
            let path = entry.path();
            if !path.is_file() || !path.extension().map_or(false, |e| e == SOURCE_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(name) => files.push((name.to_string(), path)),
                None => warn!(path = %path.display(), "icon file name is not valid UTF-8, skipping"),
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, path) in files {
            let content = fs::read(&path).map_err(|source| io_error("read", &path, source))?;
            icons.push(RawIcon { style, name, content });
        }
    }

    Ok(icons)
}
