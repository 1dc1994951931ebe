//! Query surface and structural invariant tests.

use mf2::{Document, PropertyValue};
use url::Url;

fn parse_at(html: &str, base: &str) -> Document {
    mf2::parse_with_base(html, Url::parse(base).unwrap()).expect("parse should succeed")
}

const FEED_HTML: &str = r#"
<div class="h-feed">
  <div class="h-entry">
    <h1 class="p-name">First</h1>
    <span class="p-author h-card">Ann</span>
    <div class="e-content">Hello <a href="/w">world</a></div>
  </div>
  <div class="h-entry">
    <h1 class="p-name">Second</h1>
    <img class="u-photo" src="/b.png" alt="">
  </div>
</div>
"#;

// ============================================================================
// Query surface
// ============================================================================

#[test]
fn test_get_first_ignores_h_prefix_in_query() {
    let document = parse_at(FEED_HTML, "http://ex.com/");
    let bare = document.get_first("entry").unwrap();
    let prefixed = document.get_first("h-entry").unwrap();
    assert_eq!(bare, prefixed);
    assert_eq!(
        bare.get_property("name").and_then(|v| v.as_text()),
        Some("First")
    );
}

#[test]
fn test_get_first_walks_in_discovery_order() {
    let document = parse_at(FEED_HTML, "http://ex.com/");
    // The feed is discovered before its entries and the nested card.
    assert_eq!(document.get_first("feed").unwrap().types, vec!["feed"]);
    assert_eq!(
        document
            .get_first("card")
            .unwrap()
            .get_property("name")
            .and_then(|v| v.as_text()),
        Some("Ann")
    );
}

#[test]
fn test_get_property_returns_first_of_many() {
    let document = parse_at(
        r#"<div class="h-entry"><span class="p-category">a</span><span class="p-category">b</span></div>"#,
        "http://ex.com/",
    );
    let entry = document.get_first("entry").unwrap();
    assert_eq!(entry.get_properties("category").len(), 2);
    assert_eq!(
        entry.get_property("category").and_then(|v| v.as_text()),
        Some("a")
    );
}

// ============================================================================
// Structural invariants
// ============================================================================

#[test]
fn test_discovery_order_is_pre_order() {
    let document = parse_at(FEED_HTML, "http://ex.com/");
    let types: Vec<_> = document.items().map(|item| item.types[0].as_str()).collect();
    assert_eq!(types, vec!["feed", "entry", "card", "entry"]);
    assert_eq!(document.len(), 4);
    assert_eq!(document.top_level_items.len(), 1);
}

#[test]
fn test_every_item_has_types() {
    let document = parse_at(FEED_HTML, "http://ex.com/");
    for item in document.items() {
        assert!(!item.types.is_empty());
    }
}

#[test]
fn test_stored_urls_are_absolute() {
    let document = parse_at(FEED_HTML, "http://ex.com/");
    for item in document.items() {
        for (key, values) in &item.properties {
            if !key.starts_with("u-") {
                continue;
            }
            for value in values {
                if let PropertyValue::Text(text) = value {
                    assert!(
                        Url::parse(text).is_ok(),
                        "{key} value {text:?} should be absolute"
                    );
                }
            }
        }
    }
}

#[test]
fn test_embedded_html_urls_are_absolute() {
    let document = parse_at(FEED_HTML, "http://ex.com/");
    let entry = document.get_first("entry").unwrap();
    match &entry.get_properties("content")[0] {
        PropertyValue::Fragment { html, .. } => {
            assert!(html.contains(r#"href="http://ex.com/w""#));
        }
        other => panic!("expected fragment, got {other:?}"),
    }
}

#[test]
fn test_parents_link_back_to_enclosing_items() {
    let document = parse_at(FEED_HTML, "http://ex.com/");
    let feed_id = document.top_level_items[0];
    let feed = document.get(feed_id);
    assert!(feed.parent.is_none());
    for child in &feed.children {
        assert_eq!(document.get(*child).parent, Some(feed_id));
    }
}

#[test]
fn test_parser_is_reusable_across_documents() {
    let mut parser = mf2::Parser::new();
    let with_base = parser
        .parse(
            r#"<html><head><base href="http://b.org/"></head><body><div class="h-card"><a class="u-url" href="x">X</a></div></body></html>"#,
            None,
        )
        .unwrap();
    let card = with_base.get_first("card").unwrap();
    assert_eq!(
        card.get_property("url").and_then(|v| v.as_text()),
        Some("http://b.org/x")
    );

    // The base from the first document must not leak into the second.
    let without_base = parser
        .parse(r#"<div class="h-card"><a class="u-url" href="x">X</a></div>"#, None)
        .unwrap();
    let card = without_base.get_first("card").unwrap();
    assert_eq!(
        card.get_property("url").and_then(|v| v.as_text()),
        Some("http://example.com/x")
    );
}
