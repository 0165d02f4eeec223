//! Sprite Stage - `sprite.svg`
//!
//! Symbols are sorted by id so the file diffs cleanly between rebuilds.

use tracing::info;

use crate::codegen::{SVG_NS, VIEW_BOX};
use crate::manifest::Manifest;
use crate::output::OutputTree;
use crate::pipeline::PipelineError;

pub const SPRITE_FILE: &str = "sprite.svg";

pub fn build_sprite(manifest: &Manifest) -> String {
    let mut symbols: Vec<_> = manifest.iter().map(|v| (v.sprite_id(), v.inner.as_str())).collect();
    symbols.sort_by(|a, b| a.0.cmp(&b.0));

    let mut sprite = format!(r#"<svg xmlns="{}" style="display:none">"#, SVG_NS);
    sprite.push('\n');
    for (id, inner) in &symbols {
        sprite.push_str(&format!(
            r#"  <symbol id="{}" viewBox="{}" fill="none">{}</symbol>"#,
            id, VIEW_BOX, inner
        ));
        sprite.push('\n');
    }
    sprite.push_str("</svg>\n");
    sprite
}

pub fn write_sprite(manifest: &Manifest, out: &mut OutputTree) -> Result<(), PipelineError> {
    let sprite = build_sprite(manifest);
    out.write(SPRITE_FILE, &sprite)?;
    info!(stage = "sprite", count = manifest.len(), "wrote {}", SPRITE_FILE);
    Ok(())
}
