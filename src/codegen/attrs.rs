//! Attribute translation tables
//!
//! Each framework gets a static ordered list of `(attribute, replacement)`
//! pairs. Rules match whole attribute names only (preceded by whitespace,
//! followed by `=`), so `stroke-width` never matches inside `data-stroke-width`.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRule {
    pub attribute: &'static str,
    pub replacement: &'static str,
}

const fn rule(attribute: &'static str, replacement: &'static str) -> AttributeRule {
    AttributeRule { attribute, replacement }
}

/// JSX wants DOM property names.
pub const REACT_RULES: &[AttributeRule] = &[
    rule("class", "className"),
    rule("clip-path", "clipPath"),
    rule("clip-rule", "clipRule"),
    rule("color-interpolation-filters", "colorInterpolationFilters"),
    rule("fill-opacity", "fillOpacity"),
    rule("fill-rule", "fillRule"),
    rule("flood-color", "floodColor"),
    rule("flood-opacity", "floodOpacity"),
    rule("font-family", "fontFamily"),
    rule("font-size", "fontSize"),
    rule("font-weight", "fontWeight"),
    rule("stop-color", "stopColor"),
    rule("stop-opacity", "stopOpacity"),
    rule("stroke-dasharray", "strokeDasharray"),
    rule("stroke-dashoffset", "strokeDashoffset"),
    rule("stroke-linecap", "strokeLinecap"),
    rule("stroke-linejoin", "strokeLinejoin"),
    rule("stroke-miterlimit", "strokeMiterlimit"),
    rule("stroke-opacity", "strokeOpacity"),
    rule("stroke-width", "strokeWidth"),
    rule("text-anchor", "textAnchor"),
    rule("xlink:href", "xlinkHref"),
    rule("xml:space", "xmlSpace"),
    rule("xmlns:xlink", "xmlnsXlink"),
];

/// Svelte keeps SVG attribute names; only the deprecated xlink form changes.
pub const SVELTE_RULES: &[AttributeRule] = &[rule("xlink:href", "href")];

pub struct AttributeTable {
    compiled: Vec<(Regex, String)>,
}

impl AttributeTable {
    pub fn compile(rules: &[AttributeRule]) -> Self {
        let compiled = rules
            .iter()
            .map(|r| {
                let pattern = format!(r"(\s){}=", regex::escape(r.attribute));
                let regex = Regex::new(&pattern)
                    .unwrap_or_else(|e| panic!("BUG: Invalid attribute pattern {}: {}", pattern, e));
                (regex, format!("${{1}}{}=", r.replacement))
            })
            .collect();
        Self { compiled }
    }

    /// Apply every rule in order.
    pub fn translate(&self, content: &str) -> String {
        self.compiled
            .iter()
            .fold(content.to_string(), |acc, (regex, replacement)| {
                regex.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }
}

pub static REACT: Lazy<AttributeTable> = Lazy::new(|| AttributeTable::compile(REACT_RULES));
pub static SVELTE: Lazy<AttributeTable> = Lazy::new(|| AttributeTable::compile(SVELTE_RULES));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_react_camel_cases_hyphenated_attributes() {
        let out = REACT.translate(
            r#"<path d="M0 0" stroke-width="1.5" stroke-linecap="round" fill-rule="evenodd" class="a"/>"#,
        );
        assert_eq!(
            out,
            r#"<path d="M0 0" strokeWidth="1.5" strokeLinecap="round" fillRule="evenodd" className="a"/>"#
        );
    }

    #[test]
    fn test_whole_attribute_names_only() {
        let out = REACT.translate(r#"<g data-stroke-width="2" stroke-widths="3"/>"#);
        assert_eq!(out, r#"<g data-stroke-width="2" stroke-widths="3"/>"#);
    }

    #[test]
    fn test_attribute_values_untouched() {
        let out = REACT.translate(r#"<text font-size="10">class=x</text>"#);
        assert_eq!(out, r#"<text fontSize="10">class=x</text>"#);
    }

    #[test]
    fn test_svelte_table() {
        let out = SVELTE.translate(r##"<use xlink:href="#a" stroke-width="2"/>"##);
        assert_eq!(out, r##"<use href="#a" stroke-width="2"/>"##);
    }
}
