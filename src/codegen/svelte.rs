//! Svelte target - single-file components with `$$restProps` passthrough

use once_cell::sync::Lazy;
use regex::Regex;

use super::attrs::SVELTE;
use super::{
    shape_of, shapes_used, stroke_width_expr, ComponentTarget, Export, DEFAULT_SIZE,
    GENERATED_NOTICE, SVG_NS, VIEW_BOX,
};
use crate::manifest::IconVariant;

static STROKE_WIDTH_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\s)stroke-width="[^"]*""#)
        .unwrap_or_else(|e| panic!("BUG: Invalid stroke-width pattern: {}", e))
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Svelte;

impl Svelte {
    /// Inner content with braces escaped (Svelte reads them as expressions)
    /// and, for stroke styles, a live stroke width.
    pub fn markup_content(variant: &IconVariant) -> String {
        let escaped = variant.inner.replace('{', "&#123;").replace('}', "&#125;");
        let translated = SVELTE.translate(&escaped);
        if variant.style.is_stroke() {
            STROKE_WIDTH_ATTR
                .replace_all(&translated, "${1}stroke-width={sw}")
                .into_owned()
        } else {
            translated
        }
    }
}

impl ComponentTarget for Svelte {
    fn id(&self) -> &'static str { "svelte" }

    fn extension(&self) -> &'static str { "svelte" }

    fn component(&self, variant: &IconVariant) -> String {
        let stroke = variant.style.is_stroke();

        let mut script = format!("  export let size = {};\n", DEFAULT_SIZE);
        if stroke {
            script.push_str("  export let strokeWidth = undefined;\n\n");
            script.push_str(&format!("  $: sw = strokeWidth ?? ({});\n", stroke_width_expr()));
        }
        let stroke_attr = if stroke { "  stroke-width={sw}\n" } else { "" };

        format!(
            r#"<!-- {notice} -->
<script>
{script}</script>

<svg
  xmlns="{ns}"
  viewBox="{view_box}"
  fill="none"
  width={{size}}
  height={{size}}
{stroke_attr}  {{...$$restProps}}
>
  {content}
</svg>
"#,
            notice = GENERATED_NOTICE,
            script = script,
            ns = SVG_NS,
            view_box = VIEW_BOX,
            stroke_attr = stroke_attr,
            content = Self::markup_content(variant),
        )
    }

    fn style_types(&self, exports: &[Export]) -> String {
        let mut out = format!("// {}\n", GENERATED_NOTICE);
        out.push_str(&format!("import type {{ {} }} from '../index';\n\n", shapes_used(exports)));
        for export in exports {
            out.push_str(&format!(
                "export declare const {}: typeof {};\n",
                export.symbol,
                shape_of(export)
            ));
        }
        out
    }

    fn root_types(&self, exports: &[Export]) -> String {
        let mut out = format!(
            r#"// {notice}
import type {{ SvelteComponent }} from 'svelte';
import type {{ SVGAttributes }} from 'svelte/elements';

export interface IconProps extends Omit<SVGAttributes<SVGSVGElement>, 'stroke-width'> {{
  size?: number | string;
}}

export interface StrokeIconProps extends IconProps {{
  strokeWidth?: number | string;
}}

export declare class Icon extends SvelteComponent<IconProps> {{}}
export declare class StrokeIcon extends SvelteComponent<StrokeIconProps> {{}}

"#,
            notice = GENERATED_NOTICE
        );
        for export in exports {
            out.push_str(&format!(
                "export declare const {}: typeof {};\n",
                export.symbol,
                shape_of(export)
            ));
        }
        out
    }
}
