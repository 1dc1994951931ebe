//! Helpers over kuchiki nodes: attribute access, tag names, text
//! content, URL resolution, and HTML re-serialization.

use kuchiki::{NodeData, NodeRef};
use url::Url;

/// Value of an attribute on an element node.
pub(crate) fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(str::to_string)
}

/// First defined attribute among `names`, in order. The value may be
/// empty; callers decide whether empty counts.
pub(crate) fn first_attr(node: &NodeRef, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| attr(node, name))
}

/// Lowercase local tag name of an element node.
pub(crate) fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|element| element.name.local.to_string())
}

/// Trimmed text content of a node's subtree. Entities were already
/// decoded by the HTML parser.
pub(crate) fn text_content(node: &NodeRef) -> String {
    node.text_contents().trim().to_string()
}

/// Element children of a node, skipping text and comments.
pub(crate) fn element_children(node: &NodeRef) -> Vec<NodeRef> {
    node.children()
        .filter(|child| child.as_element().is_some())
        .collect()
}

/// Resolve a possibly-relative URL against `base`.
///
/// Empty input and join failures yield `None`; already-absolute URLs
/// pass through unchanged.
pub(crate) fn resolve_url(base: &Url, raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    base.join(raw).ok().map(|url| url.to_string())
}

/// Serialize the children of `node` to HTML.
///
/// Element children serialize as markup, text children as their raw
/// decoded text. When `rewrite_base` is set, every descendant `href`
/// and `src` attribute is rewritten to an absolute URL.
pub(crate) fn serialize_children(node: &NodeRef, rewrite_base: Option<&Url>) -> String {
    let mut output = String::new();
    for child in node.children() {
        serialize_node(&child, &mut output, rewrite_base);
    }
    output
}

fn serialize_node(node: &NodeRef, output: &mut String, rewrite_base: Option<&Url>) {
    match node.data() {
        NodeData::Element(element) => {
            let name = element.name.local.as_ref();
            output.push('<');
            output.push_str(name);

            for (key, attribute) in element.attributes.borrow().map.iter() {
                let mut value = attribute.value.clone();
                if let Some(base) = rewrite_base
                    && (key.local.as_ref() == "href" || key.local.as_ref() == "src")
                    && let Some(absolute) = resolve_url(base, &value)
                {
                    value = absolute;
                }
                output.push(' ');
                output.push_str(&key.local);
                output.push_str("=\"");
                output.push_str(&value.replace('&', "&amp;").replace('"', "&quot;"));
                output.push('"');
            }

            let children: Vec<_> = node.children().collect();
            if children.is_empty() {
                output.push_str("/>");
            } else {
                output.push('>');
                for child in children {
                    serialize_node(&child, output, rewrite_base);
                }
                output.push_str("</");
                output.push_str(name);
                output.push('>');
            }
        }
        NodeData::Text(text) => {
            output.push_str(&text.borrow());
        }
        _ => {
            for child in node.children() {
                serialize_node(&child, output, rewrite_base);
            }
        }
    }
}
