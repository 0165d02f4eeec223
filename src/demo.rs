//! Demo Stage - one self-contained `index.html`
//!
//! Styles and scripts are hand-authored payload files; this stage only
//! interpolates build-time data into the skeleton and concatenates the parts.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::manifest::Manifest;
use crate::ontology::{Ontology, ResolvedMeta};
use crate::output::{io_error, OutputTree};
use crate::pipeline::PipelineError;
use crate::styles::{Style, StyleDisplay};

pub const DEMO_FILE: &str = "index.html";

pub const STYLES_FILE: &str = "styles.css";
pub const SCRIPT_FILE: &str = "app.js";
pub const EASTER_EGG_FILE: &str = "disco.js";

/// Hand-authored presentational files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoPayload {
    pub styles: String,
    pub script: String,
    pub easter_egg: Option<String>,
}

impl DemoPayload {
    pub fn load(dir: &Path) -> Result<Self, PipelineError> {
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|source| io_error("read", &path, source))
        };

        let easter_egg_path = dir.join(EASTER_EGG_FILE);
        let easter_egg = match fs::read_to_string(&easter_egg_path) {
            Ok(script) => Some(script),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(io_error("read", &easter_egg_path, source)),
        };

        Ok(Self {
            styles: read(STYLES_FILE)?,
            script: read(SCRIPT_FILE)?,
            easter_egg,
        })
    }
}

/// Inline chrome glyphs: icon name and the styles to try, in order.
const LOGO: (&str, &[Style]) = ("sparkles", &[Style::Solid, Style::Outline]);
const SEARCH: (&str, &[Style]) = ("search", &[Style::Outline, Style::Solid]);
const THEME_LIGHT: (&str, &[Style]) = ("sun", &[Style::Outline, Style::Solid]);
const THEME_DARK: (&str, &[Style]) = ("moon", &[Style::Outline, Style::Solid]);

/// Data embedded in the page for the behavior script
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoData<'a> {
    pub icons: BTreeMap<Style, BTreeMap<&'a str, &'a str>>,
    pub styles: Vec<StyleDisplay>,
    pub meta: BTreeMap<&'a str, ResolvedMeta>,
    pub style_order: Vec<Style>,
    pub names: Vec<&'a str>,
}

pub fn demo_data<'a>(manifest: &'a Manifest, ontology: &Ontology) -> DemoData<'a> {
    let mut icons: BTreeMap<Style, BTreeMap<&str, &str>> = BTreeMap::new();
    for variant in manifest.iter() {
        icons
            .entry(variant.style)
            .or_default()
            .insert(variant.name.as_str(), variant.inner.as_str());
    }

    let names: Vec<&str> = manifest.styles_by_name().into_keys().collect();
    let meta = names.iter().map(|name| (*name, ontology.resolve(name))).collect();

    DemoData {
        icons,
        styles: Style::ALL.iter().map(Style::display).collect(),
        meta,
        style_order: Style::ALL.to_vec(),
        names,
    }
}

fn glyph(manifest: &Manifest, (name, styles): (&str, &[Style])) -> String {
    match manifest.find_in(name, styles) {
        Some(variant) => variant.inner.clone(),
        None => {
            debug!(icon = name, "chrome glyph missing, leaving it empty");
            String::new()
        }
    }
}

fn category_buttons(ontology: &Ontology) -> String {
    let mut buttons = vec![
        r#"<button class="category active" data-category="all">All</button>"#.to_string(),
    ];
    for category in &ontology.categories {
        buttons.push(format!(
            r#"<button class="category" data-category="{}">{}</button>"#,
            encode_double_quoted_attribute(category),
            encode_text(category)
        ));
    }
    buttons.join("\n          ")
}

fn skeleton(manifest: &Manifest, ontology: &Ontology) -> String {
    let svg = |glyph: String| {
        format!(
            r#"<svg viewBox="0 0 24 24" fill="none" width="20" height="20" aria-hidden="true">{}</svg>"#,
            glyph
        )
    };

    format!(
        r##"<!doctype html>
<html lang="en" data-theme="light">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>ForgeIcons</title>
  </head>
  <body>
    <header class="masthead">
      <a class="brand" href="#">{logo}<span>ForgeIcons</span></a>
      <span class="count">{count} icons</span>
      <button class="theme-toggle" type="button" aria-label="Toggle theme">
        <span class="theme-light">{sun}</span>
        <span class="theme-dark">{moon}</span>
      </button>
    </header>
    <main>
      <div class="toolbar">
        <label class="search">{search}<input id="search" type="search" placeholder="Search icons" autocomplete="off"></label>
        <nav class="categories">
          {categories}
        </nav>
        <nav class="styles" id="style-tabs"></nav>
      </div>
      <section class="grid" id="grid"></section>
      <aside class="detail" id="detail" hidden></aside>
    </main>
"##,
        logo = svg(glyph(manifest, LOGO)),
        count = manifest.len(),
        sun = svg(glyph(manifest, THEME_LIGHT)),
        moon = svg(glyph(manifest, THEME_DARK)),
        search = svg(glyph(manifest, SEARCH)),
        categories = category_buttons(ontology),
    )
}

pub fn build_demo(
    manifest: &Manifest,
    ontology: &Ontology,
    payload: &DemoPayload,
) -> Result<String, PipelineError> {
    let data = serde_json::to_string(&demo_data(manifest, ontology))?.replace("</", "<\\/");

    let mut page = skeleton(manifest, ontology);
    page.push_str(&format!("    <style>\n{}\n    </style>\n", payload.styles));
    page.push_str(&format!(
        "    <script id=\"icon-data\" type=\"application/json\">{}</script>\n",
        data
    ));
    page.push_str(&format!("    <script>\n{}\n    </script>\n", payload.script));
    if let Some(easter_egg) = &payload.easter_egg {
        page.push_str(&format!("    <script>\n{}\n    </script>\n", easter_egg));
    }
    page.push_str("  </body>\n</html>\n");
    Ok(page)
}

pub fn write_demo(
    manifest: &Manifest,
    ontology: &Ontology,
    demo_dir: &Path,
    out: &mut OutputTree,
) -> Result<(), PipelineError> {
    let payload = DemoPayload::load(demo_dir)?;
    let page = build_demo(manifest, ontology, &payload)?;
    out.write(DEMO_FILE, &page)?;
    info!(stage = "demo", count = manifest.len(), bytes = page.len(), "wrote {}", DEMO_FILE);
    Ok(())
}
