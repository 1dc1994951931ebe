//! Per-prefix property value extraction and the value-class pattern.
//!
//! Each extractor derives one value from an element under its prefix's
//! rules; the analyzer appends that value once per listed suffix.

use kuchiki::NodeRef;
use url::Url;

use super::datetime::canonicalize_iso8601;
use super::node::{
    attr, first_attr, resolve_url, serialize_children, tag_name, text_content,
};

/// Extract a `p-*` (plain text) property value.
pub(crate) fn extract_p(node: &NodeRef) -> String {
    let fragments = vcp_fragments(node);
    if !fragments.is_empty() {
        return fragments.concat();
    }
    if let Some(value) = first_attr(node, &["title", "value", "alt"])
        && !value.is_empty()
    {
        return value;
    }
    text_content(node)
}

/// Extract a `u-*` (URL) property value.
///
/// Tag-specific and "unlikely" attribute sources resolve against
/// `base`; value-class fragments and the text fallback do not.
pub(crate) fn extract_u(node: &NodeRef, base: &Url) -> String {
    if let Some(raw) = tag_url_attribute(node)
        && let Some(absolute) = resolve_url(base, &raw)
    {
        return absolute;
    }
    let fragments = vcp_fragments(node);
    if !fragments.is_empty() {
        return fragments.concat();
    }
    if let Some(raw) = unlikely_url_attribute(node)
        && let Some(absolute) = resolve_url(base, &raw)
    {
        return absolute;
    }
    text_content(node)
}

/// URL attribute for tags that natively carry one.
fn tag_url_attribute(node: &NodeRef) -> Option<String> {
    match tag_name(node)?.as_str() {
        "a" | "area" | "link" => attr(node, "href"),
        "img" | "audio" => attr(node, "src"),
        "video" => attr(node, "src").or_else(|| attr(node, "poster")),
        "object" => attr(node, "data"),
        _ => None,
    }
}

/// URL sources on tags that only unusually carry one.
fn unlikely_url_attribute(node: &NodeRef) -> Option<String> {
    match tag_name(node)?.as_str() {
        "abbr" => attr(node, "title"),
        "data" | "input" => attr(node, "value"),
        _ => None,
    }
}

/// Extract an `e-*` property: embedded HTML plus its text content.
///
/// The markup keeps text children raw and rewrites descendant
/// `href`/`src` attributes to absolute URLs; trailing space characters
/// are stripped.
pub(crate) fn extract_e(node: &NodeRef, base: &Url) -> (String, String) {
    let html = serialize_children(node, Some(base));
    let html = html.trim_end_matches(' ').to_string();
    (html, text_content(node))
}

/// Extract a `dt-*` candidate and canonicalize it.
///
/// `None` when the candidate is not ISO-8601; the property is then
/// silently skipped.
pub(crate) fn extract_dt(node: &NodeRef) -> Option<String> {
    let fragments = vcp_fragments(node);
    let candidate = if !fragments.is_empty() {
        fragments.concat()
    } else if let Some(value) = first_attr(node, &["datetime", "title", "value"]) {
        value
    } else {
        text_content(node)
    };
    canonicalize_iso8601(&candidate)
}

/// Collect value-class-pattern fragments from a subtree.
///
/// `value-title` elements contribute their `title` attribute, `value`
/// elements their inner markup; neither is recursed into. An empty
/// result means no value-class markup is present.
pub(crate) fn vcp_fragments(node: &NodeRef) -> Vec<String> {
    let mut fragments = Vec::new();
    collect_fragments(node, &mut fragments);
    fragments
}

fn collect_fragments(node: &NodeRef, fragments: &mut Vec<String>) {
    for child in node.children() {
        if child.as_element().is_none() {
            continue;
        }
        if has_class(&child, "value-title") {
            fragments.push(attr(&child, "title").unwrap_or_default());
        } else if has_class(&child, "value") {
            fragments.push(serialize_children(&child, None));
        } else {
            collect_fragments(&child, fragments);
        }
    }
}

/// Plain class membership test; not an MF2 token scan.
fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class")
        .map(|value| value.split_whitespace().any(|token| token == class))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use kuchiki::traits::*;

    use super::*;

    fn first_element(html: &str) -> NodeRef {
        let document = kuchiki::parse_html().one(html);
        let body = document.select("body").unwrap().next().unwrap();
        body.as_node()
            .children()
            .find(|child| child.as_element().is_some())
            .unwrap()
    }

    fn base() -> Url {
        Url::parse("http://ex.com/").unwrap()
    }

    #[test]
    fn test_p_prefers_vcp_over_attributes() {
        let node = first_element(
            r#"<span title="nope"><span class="value">Al</span><span class="value">ice</span></span>"#,
        );
        assert_eq!(extract_p(&node), "Alice");
    }

    #[test]
    fn test_p_attribute_order() {
        let node = first_element(r#"<span title="t" alt="a">text</span>"#);
        assert_eq!(extract_p(&node), "t");
        let node = first_element(r#"<img alt="a">"#);
        assert_eq!(extract_p(&node), "a");
    }

    #[test]
    fn test_p_empty_title_falls_back_to_text() {
        let node = first_element(r#"<span title="">fallback</span>"#);
        assert_eq!(extract_p(&node), "fallback");
    }

    #[test]
    fn test_u_tag_table() {
        let node = first_element(r#"<a href="/a">x</a>"#);
        assert_eq!(extract_u(&node, &base()), "http://ex.com/a");
        let node = first_element(r#"<img src="/i.png">"#);
        assert_eq!(extract_u(&node, &base()), "http://ex.com/i.png");
        let node = first_element(r#"<video poster="/p.png"></video>"#);
        assert_eq!(extract_u(&node, &base()), "http://ex.com/p.png");
        let node = first_element(r#"<object data="/o"></object>"#);
        assert_eq!(extract_u(&node, &base()), "http://ex.com/o");
    }

    #[test]
    fn test_u_unlikely_sources_resolve() {
        let node = first_element(r#"<abbr title="/t">x</abbr>"#);
        assert_eq!(extract_u(&node, &base()), "http://ex.com/t");
        let node = first_element(r#"<data value="/v">x</data>"#);
        assert_eq!(extract_u(&node, &base()), "http://ex.com/v");
    }

    #[test]
    fn test_u_vcp_and_text_are_not_resolved() {
        let node = first_element(r#"<span><span class="value">/raw</span></span>"#);
        assert_eq!(extract_u(&node, &base()), "/raw");
        let node = first_element(r#"<span>/text</span>"#);
        assert_eq!(extract_u(&node, &base()), "/text");
    }

    #[test]
    fn test_e_rewrites_and_strips_trailing_spaces() {
        let node = first_element(r#"<div>Hi <a href="/x">x</a> </div>"#);
        let (html, value) = extract_e(&node, &base());
        assert_eq!(html, r#"Hi <a href="http://ex.com/x">x</a>"#);
        assert_eq!(value, "Hi x");
    }

    #[test]
    fn test_dt_attribute_order_and_failure() {
        let node = first_element(r#"<time datetime="2020-01-02">Jan 2</time>"#);
        assert_eq!(extract_dt(&node).as_deref(), Some("2020-01-02 00:00:00"));
        let node = first_element(r#"<time>Jan 2</time>"#);
        assert_eq!(extract_dt(&node), None);
    }

    #[test]
    fn test_vcp_value_title_wins_and_does_not_recurse() {
        let node = first_element(
            r#"<span><span class="value-title" title="2020-01-02"><span class="value">inner</span></span></span>"#,
        );
        assert_eq!(vcp_fragments(&node), vec!["2020-01-02"]);
    }

    #[test]
    fn test_vcp_absent_marker_yields_empty() {
        let node = first_element("<span><b>x</b></span>");
        assert!(vcp_fragments(&node).is_empty());
    }
}
