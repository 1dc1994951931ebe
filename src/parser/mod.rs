//! The recursive MF2 analyzer and its base-URL state.
//!
//! `Parser::parse` builds the element tree with kuchiki, applies a
//! `<base href>` override once, then walks the tree carrying the
//! innermost enclosing h-item as context.

pub(crate) mod classes;
pub(crate) mod datetime;
pub(crate) mod extract;
pub(crate) mod implied;
pub(crate) mod node;

use kuchiki::traits::*;
use kuchiki::{NodeData, NodeRef};
use url::Url;

use crate::document::{Document, Item, ItemId, PropertyValue};
use crate::error::Result;
use classes::ClassTokens;
use extract::{extract_dt, extract_e, extract_p, extract_u};
use implied::apply_implied_properties;

/// Base URL used when the caller provides no context.
const DEFAULT_URL_CONTEXT: &str = "http://example.com/";

/// Microformats2 parser.
///
/// Holds the base URL used to resolve relative URLs during a walk. The
/// base is reset from `url_context` at the start of every [`parse`]
/// call, may be overwritten once by a `<base href>` in the document,
/// and is cleared back to the default afterwards.
///
/// [`parse`]: Parser::parse
pub struct Parser {
    base: Url,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            base: default_base(),
        }
    }

    /// Parse an HTML document into an MF2 [`Document`].
    ///
    /// The tree builder is lenient, so malformed HTML degrades the way
    /// a browser would rather than failing.
    pub fn parse(&mut self, html: &str, url_context: Option<Url>) -> Result<Document> {
        self.base = url_context.unwrap_or_else(default_base);

        let root = kuchiki::parse_html().one(html);
        self.apply_base_element(&root);

        let mut document = Document::new();
        self.analyze(&mut document, &root, None);

        self.base = default_base();
        Ok(document)
    }

    /// Overwrite the base once from the document's first usable
    /// `<base href>`. A relative href resolves against the caller's
    /// context; an absolute one replaces it.
    fn apply_base_element(&mut self, root: &NodeRef) {
        let Ok(bases) = root.select("base") else {
            return;
        };
        for base in bases {
            let node = base.as_node();
            if let Some(element) = node.as_element() {
                let attributes = element.attributes.borrow();
                if let Some(href) = attributes.get("href")
                    && let Ok(resolved) = self.base.join(href)
                {
                    self.base = resolved;
                    return;
                }
            }
        }
    }

    /// Recursive walk. `current` is the innermost enclosing h-item.
    fn analyze(&self, document: &mut Document, node: &NodeRef, current: Option<ItemId>) {
        match node.data() {
            NodeData::Element(_) => {}
            NodeData::Document(_) | NodeData::DocumentFragment => {
                for child in node.children() {
                    self.analyze(document, &child, current);
                }
                return;
            }
            // Text and comments terminate this branch.
            _ => return,
        }

        let tokens = ClassTokens::of(node);

        let new_item = if tokens.h.is_empty() {
            None
        } else {
            let id = document.push_item(Item::new(tokens.h.clone(), current));
            if current.is_none() {
                document.top_level_items.push(id);
            }
            Some(id)
        };

        if let Some(enclosing) = current {
            // p-* and u-* are suppressed on an element that starts a new
            // h-item: the item itself becomes the property value below.
            // e-* and dt-* still extract into the enclosing item.
            if new_item.is_none() {
                if !tokens.p.is_empty() {
                    let value = extract_p(node);
                    for suffix in &tokens.p {
                        document
                            .get_mut(enclosing)
                            .add_property(&format!("p-{suffix}"), PropertyValue::Text(value.clone()));
                    }
                }
                if !tokens.u.is_empty() {
                    let value = extract_u(node, &self.base);
                    for suffix in &tokens.u {
                        document
                            .get_mut(enclosing)
                            .add_property(&format!("u-{suffix}"), PropertyValue::Text(value.clone()));
                    }
                }
            }
            if !tokens.e.is_empty() {
                let (html, value) = extract_e(node, &self.base);
                for suffix in &tokens.e {
                    document.get_mut(enclosing).add_property(
                        &format!("e-{suffix}"),
                        PropertyValue::Fragment {
                            html: html.clone(),
                            value: value.clone(),
                        },
                    );
                }
            }
            if !tokens.dt.is_empty()
                && let Some(value) = extract_dt(node)
            {
                for suffix in &tokens.dt {
                    document
                        .get_mut(enclosing)
                        .add_property(&format!("dt-{suffix}"), PropertyValue::Text(value.clone()));
                }
            }
        }

        let context = new_item.or(current);
        for child in node.children() {
            self.analyze(document, &child, context);
        }

        if let Some(id) = new_item {
            apply_implied_properties(document, id, node, &self.base);

            let value = if !tokens.p.is_empty() {
                first_string_form(document, id, "name")
            } else if !tokens.u.is_empty() {
                first_string_form(document, id, "url")
            } else {
                None
            };
            document.get_mut(id).value = value;

            if let Some(enclosing) = current {
                if let Some(suffix) = tokens.p.first() {
                    document
                        .get_mut(enclosing)
                        .add_property(&format!("p-{suffix}"), PropertyValue::Item(id));
                } else if let Some(suffix) = tokens.u.first() {
                    document
                        .get_mut(enclosing)
                        .add_property(&format!("u-{suffix}"), PropertyValue::Item(id));
                } else {
                    document.get_mut(enclosing).children.push(id);
                }
            }
        }
    }
}

/// First stored value for `key`, reduced to its string form.
fn first_string_form(document: &Document, id: ItemId, key: &str) -> Option<String> {
    match document.get(id).get_properties(key).first()? {
        PropertyValue::Text(text) => Some(text.clone()),
        PropertyValue::Fragment { value, .. } => Some(value.clone()),
        PropertyValue::Item(_) => None,
    }
}

fn default_base() -> Url {
    Url::parse(DEFAULT_URL_CONTEXT).unwrap()
}
