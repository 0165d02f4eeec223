//! Optimizer Stage
//!
//! `Optimize` is the opaque minification capability. `SvgMinifier` is the
//! default implementation; it also guarantees a single `<svg>` root so that
//! `inner_content` can slice the document safely.
//!
//! A failing icon is logged and left out of the manifest. It never aborts the
//! run.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::manifest::{IconVariant, Manifest};
use crate::output::OutputTree;
use crate::pipeline::PipelineError;
use crate::source::RawIcon;
use crate::styles::Style;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("icon is not valid UTF-8")]
    Encoding,

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("failed to serialize: {0}")]
    Write(String),

    #[error("document has no root element")]
    Empty,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),

    #[error("text outside the root element")]
    StrayText,

    #[error("document ends with {0} unclosed element(s)")]
    Unclosed(usize),

    #[error("closing tag without a matching opening tag")]
    Unbalanced,
}

/// Vector minification capability
pub trait Optimize {
    fn name(&self) -> &'static str;
    fn optimize(&self, raw: &str) -> Result<String, OptimizeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinifyOptions {
    /// Drop `width`/`height` from the root, keeping (or synthesising) `viewBox`.
    pub strip_dimensions: bool,
    /// Drop Inkscape/Sodipodi elements, attributes and namespaces.
    pub strip_editor_data: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            strip_dimensions: true,
            strip_editor_data: true,
        }
    }
}

const DROPPED_ELEMENTS: &[&[u8]] = &[b"metadata", b"title", b"desc", b"sodipodi:namedview"];
const EDITOR_PREFIXES: &[&[u8]] = &[b"inkscape:", b"sodipodi:", b"xmlns:inkscape", b"xmlns:sodipodi"];

#[derive(Debug, Clone, Default)]
pub struct SvgMinifier {
    options: MinifyOptions,
}

impl SvgMinifier {
    pub fn new(options: MinifyOptions) -> Self {
        Self { options }
    }

    fn is_dropped_element(&self, name: &[u8]) -> bool {
        DROPPED_ELEMENTS.iter().any(|d| *d == name)
            || (self.options.strip_editor_data && EDITOR_PREFIXES.iter().any(|p| name.starts_with(p)))
    }

    fn rewrite_element(&self, e: &BytesStart<'_>, is_root: bool) -> Result<BytesStart<'static>, OptimizeError> {
        let mut out = e.to_owned();
        out.clear_attributes();

        let mut has_view_box = false;
        let mut width = None;
        let mut height = None;

        for attr in e.attributes() {
            let attr = attr?;
            let key = attr.key.as_ref();

            if self.options.strip_editor_data && EDITOR_PREFIXES.iter().any(|p| key.starts_with(p)) {
                continue;
            }
            if is_root {
                match key {
                    b"viewBox" => has_view_box = true,
                    b"width" if self.options.strip_dimensions => {
                        width = parse_length(&attr.value);
                        continue;
                    }
                    b"height" if self.options.strip_dimensions => {
                        height = parse_length(&attr.value);
                        continue;
                    }
                    _ => {}
                }
            }
            out.push_attribute(attr);
        }

        if is_root && !has_view_box {
            if let (Some(w), Some(h)) = (width, height) {
                out.push_attribute(("viewBox", format!("0 0 {} {}", w, h).as_str()));
            }
        }

        Ok(out)
    }
}

impl Optimize for SvgMinifier {
    fn name(&self) -> &'static str { "svg-minifier" }

    fn optimize(&self, raw: &str) -> Result<String, OptimizeError> {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().trim_text(true);
        let mut writer = Writer::new(Vec::new());

        let mut depth = 0usize;
        let mut roots = 0usize;
        let mut skipping = 0usize;

        loop {
            let event = reader.read_event()?;

            if skipping > 0 {
                match event {
                    Event::Start(_) => skipping += 1,
                    Event::End(_) => skipping -= 1,
                    Event::Eof => return Err(OptimizeError::Unclosed(depth + skipping)),
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(e) if depth == 0 => {
                    check_root(&e, &mut roots)?;
                    depth += 1;
                    let root = self.rewrite_element(&e, true)?;
                    write(&mut writer, Event::Start(root))?;
                }
                Event::Empty(e) if depth == 0 => {
                    check_root(&e, &mut roots)?;
                    let root = self.rewrite_element(&e, true)?;
                    write(&mut writer, Event::Empty(root))?;
                }
                Event::Start(e) => {
                    if self.is_dropped_element(e.name().as_ref()) {
                        skipping = 1;
                        continue;
                    }
                    depth += 1;
                    let elem = self.rewrite_element(&e, false)?;
                    write(&mut writer, Event::Start(elem))?;
                }
                Event::Empty(e) => {
                    if self.is_dropped_element(e.name().as_ref()) {
                        continue;
                    }
                    let elem = self.rewrite_element(&e, false)?;
                    write(&mut writer, Event::Empty(elem))?;
                }
                Event::End(e) => {
                    if depth == 0 {
                        return Err(OptimizeError::Unbalanced);
                    }
                    depth -= 1;
                    write(&mut writer, Event::End(e))?;
                }
                Event::Text(t) => {
                    if depth == 0 {
                        if !t.iter().all(u8::is_ascii_whitespace) {
                            return Err(OptimizeError::StrayText);
                        }
                        continue;
                    }
                    write(&mut writer, Event::Text(t))?;
                }
                Event::CData(c) => {
                    if depth == 0 {
                        return Err(OptimizeError::StrayText);
                    }
                    write(&mut writer, Event::CData(c))?;
                }
                Event::Eof => break,
                // comments, declarations, doctypes and processing instructions
                _ => {}
            }
        }

        if depth > 0 {
            return Err(OptimizeError::Unclosed(depth));
        }
        if roots == 0 {
            return Err(OptimizeError::Empty);
        }

        String::from_utf8(writer.into_inner()).map_err(|_| OptimizeError::Encoding)
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), OptimizeError> {
    writer
        .write_event(event)
        .map_err(|e| OptimizeError::Write(e.to_string()))
}

fn check_root(e: &BytesStart<'_>, roots: &mut usize) -> Result<(), OptimizeError> {
    *roots += 1;
    if *roots > 1 {
        return Err(OptimizeError::MultipleRoots);
    }
    if e.local_name().as_ref() != b"svg" {
        return Err(OptimizeError::NotSvg(
            String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        ));
    }
    Ok(())
}

/// `24`, `24px` and `24.0` all parse; percentages and units other than px do not.
fn parse_length(raw: &[u8]) -> Option<String> {
    let value = std::str::from_utf8(raw).ok()?.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.parse::<f64>().ok().filter(|n| *n > 0.0)?;
    Some(number.to_string())
}

/// Slice out everything between the root `<svg ...>` and the last `</svg>`.
///
/// Degenerate input (no root, self-closing root, missing close tag) yields an
/// empty string rather than an error.
pub fn inner_content(document: &str) -> String {
    let open = match document.find("<svg") {
        Some(i) => i,
        None => return String::new(),
    };
    let open_end = match document[open..].find('>') {
        Some(i) => open + i,
        None => return String::new(),
    };
    if document[..open_end].ends_with('/') {
        return String::new();
    }
    match document.rfind("</svg>") {
        Some(close) if close > open_end => document[open_end + 1..close].trim().to_string(),
        _ => String::new(),
    }
}

/// Result of the optimizer stage
#[derive(Debug, Default)]
pub struct OptimizeSummary {
    pub manifest: Manifest,
    pub skipped: Vec<(Style, String)>,
}

/// Optimize every raw icon, write `svg/{style}/{name}.svg`, build the manifest.
pub fn optimize_icons(
    optimizer: &dyn Optimize,
    raws: Vec<RawIcon>,
    out: &mut OutputTree,
) -> Result<OptimizeSummary, PipelineError> {
    out.reset_dir("svg")?;
    let mut summary = OptimizeSummary::default();

    for raw in raws {
        if let Err(e) = summary.manifest.check_name(raw.style, &raw.name) {
            warn!(style = %raw.style, name = %raw.name, error = %e, "unusable icon name, skipping");
            summary.skipped.push((raw.style, raw.name));
            continue;
        }

        let result = std::str::from_utf8(&raw.content)
            .map_err(|_| OptimizeError::Encoding)
            .and_then(|text| optimizer.optimize(text).map(|optimized| (text, optimized)));

        let (text, optimized) = match result {
            Ok(pair) => pair,
            Err(e) => {
                warn!(
                    style = %raw.style,
                    name = %raw.name,
                    optimizer = optimizer.name(),
                    error = %e,
                    "failed to optimize icon, skipping"
                );
                summary.skipped.push((raw.style, raw.name));
                continue;
            }
        };

        out.write(&format!("svg/{}/{}.svg", raw.style, raw.name), &optimized)?;

        let inner = inner_content(&optimized);
        summary.manifest.push(IconVariant {
            style: raw.style,
            name: raw.name.clone(),
            raw: text.to_string(),
            optimized,
            inner,
        })?;
    }

    info!(
        stage = "optimize",
        count = summary.manifest.len(),
        skipped = summary.skipped.len(),
        "optimized icons"
    );
    Ok(summary)
}
