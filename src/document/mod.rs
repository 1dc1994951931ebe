//! Core MF2 data types: documents, items, and property values.
//!
//! A [`Document`] owns every discovered [`Item`] in an arena; items
//! reference each other (parent, children, nested property values)
//! through [`ItemId`] indices, so no item is owned twice.

mod json;

use std::collections::BTreeMap;

use serde_json::Value;

/// Identifies an [`Item`] within its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub(crate) usize);

/// One stored value of an item property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Plain text or a resolved URL.
    Text(String),
    /// Embedded markup from an `e-*` property.
    Fragment { html: String, value: String },
    /// A nested h-item consumed as the property value.
    Item(ItemId),
}

impl PropertyValue {
    /// The value as plain text, when it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The id of the nested item, when the value is one.
    pub fn as_item(&self) -> Option<ItemId> {
        match self {
            PropertyValue::Item(id) => Some(*id),
            _ => None,
        }
    }
}

/// Prefixes searched by the unprefixed query methods, in order.
const PROPERTY_PREFIXES: &[&str] = &["p-", "u-", "e-", "dt-"];

/// One `h-*` microformat instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Type names with the `h-` prefix stripped (`entry`, `card`).
    pub types: Vec<String>,
    /// Property values keyed by prefixed property name (`p-name`).
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
    /// Nested h-items not consumed as property values.
    pub children: Vec<ItemId>,
    /// Enclosing item, when any.
    pub parent: Option<ItemId>,
    /// Single string form, set when the item doubles as a `p-*` or
    /// `u-*` property value.
    pub value: Option<String>,
}

impl Item {
    pub(crate) fn new(types: Vec<String>, parent: Option<ItemId>) -> Self {
        Self {
            types,
            properties: BTreeMap::new(),
            children: Vec::new(),
            parent,
            value: None,
        }
    }

    /// Append a value under a prefixed property key.
    pub(crate) fn add_property(&mut self, key: &str, value: PropertyValue) {
        self.properties.entry(key.to_string()).or_default().push(value);
    }

    /// Whether the item carries `type_query`, with or without its
    /// `h-` prefix.
    pub fn has_type(&self, type_query: &str) -> bool {
        let stripped = type_query.strip_prefix("h-").unwrap_or(type_query);
        self.types.iter().any(|t| t == stripped)
    }

    /// Values stored for an unprefixed property key.
    ///
    /// Searches `p-`, `u-`, `e-`, `dt-` in that order and returns the
    /// first populated list, or an empty slice when the property is
    /// absent under every prefix.
    pub fn get_properties(&self, key: &str) -> &[PropertyValue] {
        for prefix in PROPERTY_PREFIXES {
            if let Some(values) = self.properties.get(&format!("{prefix}{key}")) {
                return values;
            }
        }
        &[]
    }

    /// First value stored for an unprefixed property key.
    ///
    /// Warns through the `log` facade when more than one value exists.
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        let values = self.get_properties(key);
        if values.len() > 1 {
            log::warn!(
                "property {key:?} has {} values, returning the first",
                values.len()
            );
        }
        values.first()
    }
}

/// A parsed MF2 document.
///
/// Items live in a single arena in discovery (pre-order) order;
/// `top_level_items` indexes the ones not enclosed by any other item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    arena: Vec<Item>,
    /// Items not enclosed by any other item, in document order.
    pub top_level_items: Vec<ItemId>,
    /// Link relations. The analyzer does not populate these yet; they
    /// round-trip through JSON for forward compatibility.
    pub rels: BTreeMap<String, Vec<String>>,
    /// Per-URL relation metadata; same status as `rels`.
    pub rel_urls: BTreeMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items at any depth, in discovery order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.arena.iter()
    }

    /// Number of items at any depth.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Look up an item by id.
    ///
    /// Ids are only meaningful for the document that produced them;
    /// panics on an id from another document.
    pub fn get(&self, id: ItemId) -> &Item {
        &self.arena[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> &mut Item {
        &mut self.arena[id.0]
    }

    /// Append an item to the arena, assigning its id.
    pub(crate) fn push_item(&mut self, item: Item) -> ItemId {
        let id = ItemId(self.arena.len());
        self.arena.push(item);
        id
    }

    /// First item in discovery order carrying the queried type, with
    /// or without its `h-` prefix.
    pub fn get_first(&self, type_query: &str) -> Option<&Item> {
        self.items().find(|item| item.has_type(type_query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with(types: &[&str]) -> Item {
        Item::new(types.iter().map(|t| t.to_string()).collect(), None)
    }

    #[test]
    fn test_has_type_strips_query_prefix() {
        let item = item_with(&["entry"]);
        assert!(item.has_type("entry"));
        assert!(item.has_type("h-entry"));
        assert!(!item.has_type("card"));
    }

    #[test]
    fn test_get_properties_searches_prefixes_in_order() {
        let mut item = item_with(&["card"]);
        item.add_property("u-name", PropertyValue::Text("u".into()));
        item.add_property("p-name", PropertyValue::Text("p".into()));

        let values = item.get_properties("name");
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].as_text(), Some("p"));
    }

    #[test]
    fn test_get_properties_missing_key_is_empty() {
        let item = item_with(&["card"]);
        assert!(item.get_properties("name").is_empty());
        assert!(item.get_property("name").is_none());
    }

    #[test]
    fn test_get_property_returns_first_of_many() {
        let mut item = item_with(&["card"]);
        item.add_property("p-category", PropertyValue::Text("a".into()));
        item.add_property("p-category", PropertyValue::Text("b".into()));
        assert_eq!(
            item.get_property("category").and_then(|v| v.as_text()),
            Some("a")
        );
    }

    #[test]
    fn test_get_first_matches_prefixed_and_bare_queries() {
        let mut document = Document::new();
        let id = document.push_item(item_with(&["entry"]));
        document.top_level_items.push(id);

        assert!(document.get_first("entry").is_some());
        assert!(document.get_first("h-entry").is_some());
        assert!(document.get_first("card").is_none());
    }
}
