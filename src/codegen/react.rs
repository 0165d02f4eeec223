//! React target - `forwardRef` components in JSX

use heck::ToLowerCamelCase;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::attrs::REACT;
use super::{
    shape_of, shapes_used, stroke_width_expr, ComponentTarget, Export, DEFAULT_SIZE,
    GENERATED_NOTICE, SVG_NS, VIEW_BOX,
};
use crate::manifest::IconVariant;

static STROKE_WIDTH_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\s)strokeWidth="[^"]*""#)
        .unwrap_or_else(|e| panic!("BUG: Invalid strokeWidth pattern: {}", e))
});

static TEXT_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(<[^>]*>)|([^<]+)")
        .unwrap_or_else(|e| panic!("BUG: Invalid text segment pattern: {}", e))
});

static STYLE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\s)style="([^"]*)""#)
        .unwrap_or_else(|e| panic!("BUG: Invalid style pattern: {}", e))
});

#[derive(Debug, Clone, Copy, Default)]
pub struct React;

impl React {
    /// Inner content with JSX attribute names and, for stroke styles, a live stroke width.
    pub fn jsx_content(variant: &IconVariant) -> String {
        let translated = style_objects(&REACT.translate(&escape_text(&variant.inner)));
        if variant.style.is_stroke() {
            STROKE_WIDTH_ATTR
                .replace_all(&translated, "${1}strokeWidth={sw}")
                .into_owned()
        } else {
            translated
        }
    }
}

/// Braces in text nodes (e.g. `<style>` rules) would open JSX expressions.
fn escape_text(markup: &str) -> String {
    TEXT_SEGMENT
        .replace_all(markup, |caps: &Captures<'_>| match (caps.get(1), caps.get(2)) {
            (Some(tag), _) => tag.as_str().to_string(),
            (None, Some(text)) => text
                .as_str()
                .chars()
                .map(|c| match c {
                    '{' => "{'{'}".to_string(),
                    '}' => "{'}'}".to_string(),
                    c => c.to_string(),
                })
                .collect(),
            (None, None) => String::new(),
        })
        .into_owned()
}

/// `style="fill-opacity:.5"` becomes `style={{ fillOpacity: '.5' }}`.
fn style_objects(markup: &str) -> String {
    STYLE_ATTR
        .replace_all(markup, |caps: &Captures<'_>| {
            let entries: Vec<String> = caps[2]
                .split(';')
                .filter_map(|decl| decl.split_once(':'))
                .map(|(key, value)| (key.trim(), value.trim()))
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| {
                    let value = value.replace('\\', "\\\\").replace('\'', "\\'");
                    if key.starts_with("--") {
                        format!("'{}': '{}'", key, value)
                    } else {
                        format!("{}: '{}'", key.to_lower_camel_case(), value)
                    }
                })
                .collect();
            if entries.is_empty() {
                String::new()
            } else {
                format!("{}style={{{{ {} }}}}", &caps[1], entries.join(", "))
            }
        })
        .into_owned()
}

impl ComponentTarget for React {
    fn id(&self) -> &'static str { "react" }

    fn extension(&self) -> &'static str { "jsx" }

    fn component(&self, variant: &IconVariant) -> String {
        let name = variant.component_name();
        let stroke = variant.style.is_stroke();

        let params = if stroke {
            format!("{{ size = {}, strokeWidth, ...props }}", DEFAULT_SIZE)
        } else {
            format!("{{ size = {}, ...props }}", DEFAULT_SIZE)
        };
        let stroke_binding = if stroke {
            format!("  const sw = strokeWidth ?? ({});\n", stroke_width_expr())
        } else {
            String::new()
        };
        let stroke_attr = if stroke { "      strokeWidth={sw}\n" } else { "" };

        format!(
            r#"// {notice}
import * as React from 'react';

const {name} = React.forwardRef(function {name}({params}, ref) {{
{stroke_binding}  return (
    <svg
      ref={{ref}}
      xmlns="{ns}"
      viewBox="{view_box}"
      fill="none"
      width={{size}}
      height={{size}}
{stroke_attr}      {{...props}}
    >
      {content}
    </svg>
  );
}});

{name}.displayName = '{display}';

export default {name};
"#,
            notice = GENERATED_NOTICE,
            name = name,
            params = params,
            stroke_binding = stroke_binding,
            ns = SVG_NS,
            view_box = VIEW_BOX,
            stroke_attr = stroke_attr,
            content = Self::jsx_content(variant),
            display = variant.export_name(),
        )
    }

    fn style_types(&self, exports: &[Export]) -> String {
        let mut out = format!("// {}\n", GENERATED_NOTICE);
        out.push_str(&format!("import type {{ {} }} from '../index';\n\n", shapes_used(exports)));
        for export in exports {
            out.push_str(&format!("export declare const {}: {};\n", export.symbol, shape_of(export)));
        }
        out
    }

    fn root_types(&self, exports: &[Export]) -> String {
        let mut out = format!(
            r#"// {notice}
import type {{ ForwardRefExoticComponent, RefAttributes, SVGProps }} from 'react';

export interface IconProps extends Omit<SVGProps<SVGSVGElement>, 'ref' | 'strokeWidth'> {{
  size?: number | string;
}}

export interface StrokeIconProps extends IconProps {{
  strokeWidth?: number | string;
}}

export type Icon = ForwardRefExoticComponent<IconProps & RefAttributes<SVGSVGElement>>;
export type StrokeIcon = ForwardRefExoticComponent<StrokeIconProps & RefAttributes<SVGSVGElement>>;

"#,
            notice = GENERATED_NOTICE
        );
        for export in exports {
            out.push_str(&format!("export declare const {}: {};\n", export.symbol, shape_of(export)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::fixtures::variant;
    use crate::styles::Style;

    const INNER: &str = r#"<path d="M4 12h16" stroke="currentColor" stroke-width="1.5" stroke-linecap="round"/>"#;

    #[test]
    fn test_stroke_component_exposes_stroke_width() {
        let out = React.component(&variant(Style::Outline, "minus", INNER));
        assert!(out.contains("const Minus = React.forwardRef(function Minus({ size = 24, strokeWidth, ...props }, ref)"));
        assert!(out.contains("const sw = strokeWidth ?? (size <= 16 ? 1.75 : 1.5);"));
        assert!(out.contains(r#"<path d="M4 12h16" stroke="currentColor" strokeWidth={sw} strokeLinecap="round"/>"#));
        assert!(out.contains("      strokeWidth={sw}\n"));
        assert!(out.contains("export default Minus;"));
    }

    #[test]
    fn test_fill_component_has_no_stroke_parameter() {
        let out = React.component(&variant(Style::Solid, "minus", INNER));
        assert!(out.contains("function Minus({ size = 24, ...props }, ref)"));
        assert!(!out.contains("const sw"));
        assert!(!out.contains("{sw}"));
        assert!(out.contains(r#"strokeWidth="1.5""#));
    }

    #[test]
    fn test_root_element_contract() {
        let out = React.component(&variant(Style::Bulk, "dot", "<circle r=\"2\"/>"));
        assert!(out.contains(r#"viewBox="0 0 24 24""#));
        assert!(out.contains(r#"fill="none""#));
        assert!(out.contains("width={size}"));
        assert!(out.contains("height={size}"));
        assert!(out.contains("{...props}"));
        assert!(out.contains("Dot.displayName = 'DotBulk';"));
    }

    #[test]
    fn test_text_braces_and_inline_styles_become_jsx() {
        let out = React.component(&variant(
            Style::Solid,
            "css",
            r#"<style>.a{fill:red}</style><path class="a" style="fill:red; fill-opacity:.5"/>"#,
        ));
        assert!(!out.contains("{fill:red}"));
        assert!(out.contains("<style>.a{'{'}fill:red{'}'}</style>"));
        assert!(out.contains(r#"<path className="a" style={{ fill: 'red', fillOpacity: '.5' }}/>"#));
    }

    #[test]
    fn test_empty_style_attribute_dropped() {
        let out = React::jsx_content(&variant(Style::Bulk, "dot", r#"<circle r="2" style=""/>"#));
        assert_eq!(out, r#"<circle r="2"/>"#);
    }

    #[test]
    fn test_root_types_follow_export_order() {
        let exports = vec![
            Export { symbol: "BellOutline".into(), module: "./outline/Bell.jsx".into(), stroke: true },
            Export { symbol: "HomeSolid".into(), module: "./solid/Home.jsx".into(), stroke: false },
        ];
        let out = React.root_types(&exports);
        let bell = out.find("export declare const BellOutline: StrokeIcon;").unwrap();
        let home = out.find("export declare const HomeSolid: Icon;").unwrap();
        assert!(bell < home);
        assert!(out.contains("export interface IconProps"));
    }

    #[test]
    fn test_style_types_import_shapes() {
        let exports = vec![Export { symbol: "Home".into(), module: "./Home.jsx".into(), stroke: false }];
        let out = React.style_types(&exports);
        assert!(out.contains("import type { Icon } from '../index';"));
        assert!(out.contains("export declare const Home: Icon;"));
    }
}
