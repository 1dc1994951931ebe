//! Canonical MF2 JSON serialization and deserialization.
//!
//! The wire shape is `{"items": [...], "rels": {...}, "rel-urls": {...}}`
//! with property keys unprefixed (`p-name` serializes as `name`).
//! Deserialization re-prefixes by value shape: `{html, value}` objects
//! rehydrate under `e-`, everything else under `p-`, which is stable
//! under repeated round trips.

use serde_json::{Map, Value, json};

use super::{Document, Item, ItemId, PropertyValue};
use crate::error::{Error, Result};

impl Document {
    /// The document as a canonical MF2 JSON value.
    pub fn as_raw_data(&self) -> Value {
        let items: Vec<Value> = self
            .top_level_items
            .iter()
            .map(|id| self.item_to_value(*id))
            .collect();
        let rels: Map<String, Value> = self
            .rels
            .iter()
            .map(|(name, urls)| (name.clone(), json!(urls)))
            .collect();
        let rel_urls: Map<String, Value> = self
            .rel_urls
            .iter()
            .map(|(url, meta)| (url.clone(), meta.clone()))
            .collect();
        json!({ "items": items, "rels": rels, "rel-urls": rel_urls })
    }

    /// The document as pretty-printed canonical MF2 JSON.
    pub fn as_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.as_raw_data())?)
    }

    /// Rebuild a document from canonical MF2 JSON.
    pub fn new_from_json(json_text: &str) -> Result<Document> {
        let value: Value = serde_json::from_str(json_text)?;
        let root = value
            .as_object()
            .ok_or_else(|| invalid("top level must be an object"))?;

        let mut document = Document::new();

        let items = root
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("missing items array"))?;
        for item in items {
            let id = item_from_value(&mut document, item, None)?;
            document.top_level_items.push(id);
        }

        if let Some(rels) = root.get("rels").and_then(Value::as_object) {
            for (name, urls) in rels {
                let urls = urls
                    .as_array()
                    .ok_or_else(|| invalid("rel entries must be arrays"))?;
                let urls = urls
                    .iter()
                    .map(|url| {
                        url.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| invalid("rel URLs must be strings"))
                    })
                    .collect::<Result<Vec<String>>>()?;
                document.rels.insert(name.clone(), urls);
            }
        }
        if let Some(rel_urls) = root.get("rel-urls").and_then(Value::as_object) {
            for (url, meta) in rel_urls {
                document.rel_urls.insert(url.clone(), meta.clone());
            }
        }

        Ok(document)
    }

    fn item_to_value(&self, id: ItemId) -> Value {
        let item = self.get(id);
        let mut object = Map::new();

        let types: Vec<String> = item.types.iter().map(|t| format!("h-{t}")).collect();
        object.insert("type".into(), json!(types));

        let mut properties = Map::new();
        for (key, values) in &item.properties {
            let unprefixed = strip_property_prefix(key);
            let rendered: Vec<Value> =
                values.iter().map(|v| self.property_to_value(v)).collect();
            // Distinct prefixed keys can share a suffix; merge their lists.
            let slot = properties
                .entry(unprefixed.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(existing) = slot {
                existing.extend(rendered);
            }
        }
        object.insert("properties".into(), Value::Object(properties));

        if let Some(value) = &item.value {
            object.insert("value".into(), Value::String(value.clone()));
        }
        if !item.children.is_empty() {
            let children: Vec<Value> = item
                .children
                .iter()
                .map(|child| self.item_to_value(*child))
                .collect();
            object.insert("children".into(), Value::Array(children));
        }

        Value::Object(object)
    }

    fn property_to_value(&self, value: &PropertyValue) -> Value {
        match value {
            PropertyValue::Text(text) => Value::String(text.clone()),
            PropertyValue::Fragment { html, value } => json!({ "html": html, "value": value }),
            PropertyValue::Item(id) => self.item_to_value(*id),
        }
    }
}

/// `p-name` → `name`; keys without a dash pass through unchanged.
fn strip_property_prefix(key: &str) -> &str {
    match key.split_once('-') {
        Some((_, suffix)) => suffix,
        None => key,
    }
}

fn item_from_value(
    document: &mut Document,
    value: &Value,
    parent: Option<ItemId>,
) -> Result<ItemId> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("item must be an object"))?;

    let types = object
        .get("type")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("item is missing its type array"))?;
    let types = types
        .iter()
        .map(|t| {
            t.as_str()
                .map(|t| t.strip_prefix("h-").unwrap_or(t).to_string())
                .ok_or_else(|| invalid("item types must be strings"))
        })
        .collect::<Result<Vec<String>>>()?;
    if types.is_empty() {
        return Err(invalid("item type array is empty"));
    }

    let id = document.push_item(Item::new(types, parent));

    if let Some(properties) = object.get("properties").and_then(Value::as_object) {
        for (key, values) in properties {
            let values = values
                .as_array()
                .ok_or_else(|| invalid("property values must be arrays"))?;
            for value in values {
                let (prefixed, parsed) = property_from_value(document, key, value, id)?;
                document.get_mut(id).add_property(&prefixed, parsed);
            }
        }
    }

    if let Some(children) = object.get("children").and_then(Value::as_array) {
        for child in children {
            let child_id = item_from_value(document, child, Some(id))?;
            document.get_mut(id).children.push(child_id);
        }
    }

    if let Some(value) = object.get("value").and_then(Value::as_str) {
        document.get_mut(id).value = Some(value.to_string());
    }

    Ok(id)
}

fn property_from_value(
    document: &mut Document,
    key: &str,
    value: &Value,
    parent: ItemId,
) -> Result<(String, PropertyValue)> {
    match value {
        Value::String(text) => Ok((format!("p-{key}"), PropertyValue::Text(text.clone()))),
        Value::Object(object) if object.contains_key("type") => {
            let id = item_from_value(document, value, Some(parent))?;
            Ok((format!("p-{key}"), PropertyValue::Item(id)))
        }
        Value::Object(object) => {
            let html = object
                .get("html")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid("embedded property needs an html string"))?;
            let text = object
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid("embedded property needs a value string"))?;
            Ok((
                format!("e-{key}"),
                PropertyValue::Fragment {
                    html: html.to_string(),
                    value: text.to_string(),
                },
            ))
        }
        _ => Err(invalid("unsupported property value")),
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidDocument(message.to_string())
}
