//! Implied name, photo, and url resolution for h-items.
//!
//! An h-item that declares no explicit `name`/`photo`/`url` property
//! can imply one from its element shape: the element itself, its only
//! element child, or its only element grandchild, provided the probed
//! node is not itself an h-item.

use kuchiki::NodeRef;
use url::Url;

use super::classes::ClassTokens;
use super::node::{attr, element_children, resolve_url, tag_name, text_content};
use crate::document::{Document, ItemId, PropertyValue};

/// Apply implied properties to a freshly analyzed h-item.
///
/// Runs after the item's subtree has been walked, in the order name,
/// photo, url; each probe is skipped when the item already carries
/// that property.
pub(crate) fn apply_implied_properties(
    document: &mut Document,
    id: ItemId,
    node: &NodeRef,
    base: &Url,
) {
    let item = document.get(id);
    let skip_name = item
        .properties
        .keys()
        .any(|key| key.starts_with("p-") || key.starts_with("e-"));
    let has_photo = !item.get_properties("photo").is_empty();
    let has_url = !item.get_properties("url").is_empty();

    if !skip_name {
        let name = implied_name(node);
        if !name.is_empty() {
            document
                .get_mut(id)
                .add_property("p-name", PropertyValue::Text(name));
        }
    }
    if !has_photo
        && let Some(raw) = implied_photo(node)
        && let Some(absolute) = resolve_url(base, &raw)
    {
        document
            .get_mut(id)
            .add_property("u-photo", PropertyValue::Text(absolute));
    }
    if !has_url
        && let Some(raw) = implied_url(node)
        && let Some(absolute) = resolve_url(base, &raw)
    {
        document
            .get_mut(id)
            .add_property("u-url", PropertyValue::Text(absolute));
    }
}

/// Probe for an implied name. A match on the element itself accepts an
/// empty string (and ends probing); child and grandchild matches must
/// be non-empty to count.
fn implied_name(node: &NodeRef) -> String {
    if let Some(tag) = tag_name(node) {
        match tag.as_str() {
            "img" | "area" => return attr(node, "alt").unwrap_or_default(),
            "abbr" => return attr(node, "title").unwrap_or_default(),
            _ => {}
        }
    }

    if let Some(child) = sole_non_h_child(node) {
        if let Some(name) = named_source(&child) {
            return name;
        }
        if let Some(grandchild) = sole_non_h_child(&child)
            && let Some(name) = named_source(&grandchild)
        {
            return name;
        }
    }

    text_content(node)
}

/// Non-empty `alt`/`title` from an `img`/`area`/`abbr` descendant.
fn named_source(node: &NodeRef) -> Option<String> {
    let tag = tag_name(node)?;
    let name = match tag.as_str() {
        "img" | "area" => attr(node, "alt")?,
        "abbr" => attr(node, "title")?,
        _ => return None,
    };
    if name.is_empty() { None } else { Some(name) }
}

fn implied_photo(node: &NodeRef) -> Option<String> {
    if let Some(source) = photo_source(node) {
        return Some(source);
    }
    let child = sole_non_h_child(node)?;
    if let Some(source) = photo_source(&child) {
        return Some(source);
    }
    let grandchild = sole_non_h_child(&child)?;
    photo_source(&grandchild)
}

/// `src` of an `img` or `data` of an `object`.
fn photo_source(node: &NodeRef) -> Option<String> {
    match tag_name(node)?.as_str() {
        "img" => attr(node, "src"),
        "object" => attr(node, "data"),
        _ => None,
    }
}

fn implied_url(node: &NodeRef) -> Option<String> {
    if let Some(source) = url_source(node) {
        return Some(source);
    }
    let child = sole_non_h_child(node)?;
    if let Some(source) = url_source(&child) {
        return Some(source);
    }
    let grandchild = sole_non_h_child(&child)?;
    url_source(&grandchild)
}

/// `href` of an `a` or `area`.
fn url_source(node: &NodeRef) -> Option<String> {
    match tag_name(node)?.as_str() {
        "a" | "area" => attr(node, "href"),
        _ => None,
    }
}

/// The node's only element child, provided it is not an h-item.
fn sole_non_h_child(node: &NodeRef) -> Option<NodeRef> {
    let mut children = element_children(node);
    if children.len() != 1 {
        return None;
    }
    let child = children.remove(0);
    if !ClassTokens::of(&child).h.is_empty() {
        return None;
    }
    Some(child)
}
