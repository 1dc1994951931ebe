//! MF2 class attribute tokenizing.
//!
//! Uses LazyLock to compile the token pattern once on first use.

use std::sync::LazyLock;

use kuchiki::NodeRef;
use regex_lite::Regex;

use super::node::attr;

/// Matches one MF2 class token: a prefix, a dash, then a lowercase
/// dash-separated suffix bounded on the right by whitespace or end.
static MF2_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(h|e|u|dt|p)-([a-z]+(?:-[a-z]+)*)(?:\s|$)").unwrap());

/// MF2 class tokens of one element, bucketed by prefix.
///
/// Suffixes keep their left-to-right order; duplicates are preserved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ClassTokens {
    pub h: Vec<String>,
    pub e: Vec<String>,
    pub u: Vec<String>,
    pub dt: Vec<String>,
    pub p: Vec<String>,
}

impl ClassTokens {
    /// Tokenize a raw `class` attribute value.
    pub fn parse(class_attr: &str) -> Self {
        let mut tokens = Self::default();
        for caps in MF2_TOKEN_RE.captures_iter(class_attr) {
            let suffix = caps[2].to_string();
            match &caps[1] {
                "h" => tokens.h.push(suffix),
                "e" => tokens.e.push(suffix),
                "u" => tokens.u.push(suffix),
                "dt" => tokens.dt.push(suffix),
                "p" => tokens.p.push(suffix),
                _ => unreachable!(),
            }
        }
        tokens
    }

    /// Tokenize an element's `class` attribute; all buckets are empty
    /// when the attribute is absent.
    pub fn of(node: &NodeRef) -> Self {
        match attr(node, "class") {
            Some(class) => Self::parse(&class),
            None => Self::default(),
        }
    }
}
