//! # mf2
//!
//! A microformats2 (MF2) parser: HTML in, canonical MF2 JSON out.
//!
//! Microformats2 embeds semantic metadata in HTML through class names
//! (`h-card`, `p-name`, `u-url`, `e-content`, `dt-published`). This
//! crate walks the parsed element tree, builds a queryable [`Document`]
//! of [`Item`]s, and serializes it losslessly to the canonical JSON
//! form.
//!
//! ## Quick Start
//!
//! ```
//! let html = r#"<div class="h-card"><a class="p-name u-url" href="/me">Alice</a></div>"#;
//! let document = mf2::parse(html).unwrap();
//!
//! let card = document.get_first("card").unwrap();
//! assert_eq!(card.get_property("name").and_then(|v| v.as_text()), Some("Alice"));
//! ```
//!
//! Relative URLs resolve against a caller-supplied base:
//!
//! ```
//! use url::Url;
//!
//! let html = r#"<div class="h-card"><img class="u-photo" src="/me.jpg" alt="Me"></div>"#;
//! let base = Url::parse("https://example.org/about/").unwrap();
//! let document = mf2::parse_with_base(html, base).unwrap();
//!
//! let card = document.get_first("card").unwrap();
//! assert_eq!(card.get_property("photo").and_then(|v| v.as_text()),
//!            Some("https://example.org/me.jpg"));
//! ```

pub mod document;
pub mod error;
pub mod parser;

pub use document::{Document, Item, ItemId, PropertyValue};
pub use error::{Error, Result};
pub use parser::Parser;

use url::Url;

/// Parse HTML with the default base URL (`http://example.com/`).
pub fn parse(html: &str) -> Result<Document> {
    Parser::new().parse(html, None)
}

/// Parse HTML, resolving relative URLs against `url_context`.
pub fn parse_with_base(html: &str, url_context: Url) -> Result<Document> {
    Parser::new().parse(html, Some(url_context))
}
