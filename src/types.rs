//! Shared types used across the build pipeline.
//!
//! Catalog records are free-form: every tool, category metadata entry and
//! per-item page carries whatever keys the data author chose. They are kept
//! as [`serde_json::Value`] trees, which is also what Tera consumes as
//! template context, and read through the small accessor helpers below so
//! that a missing or oddly-typed field is a `None`, never a failure.

use serde_json::{Map, Value};
use std::fmt;

/// A free-form record: string keys mapped to YAML-compatible values.
pub type Record = Map<String, Value>;

/// One of the ten fixed tool categories.
///
/// Order matters: [`CategoryId::ALL`] is the order categories are walked
/// during aggregation, so it also fixes the order of `featured_tools` and of
/// the build statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryId {
    Foundation,
    Creative,
    Writing,
    Technical,
    Business,
    Research,
    Voice,
    Video,
    Data,
    Directory,
}

/// Suffix shared by every category key in the data file.
const KEY_SUFFIX: &str = "_tools";

impl CategoryId {
    pub const ALL: [CategoryId; 10] = [
        CategoryId::Foundation,
        CategoryId::Creative,
        CategoryId::Writing,
        CategoryId::Technical,
        CategoryId::Business,
        CategoryId::Research,
        CategoryId::Voice,
        CategoryId::Video,
        CategoryId::Data,
        CategoryId::Directory,
    ];

    /// Top-level key holding this category's tool list (`foundation_tools`).
    pub fn key(self) -> &'static str {
        match self {
            CategoryId::Foundation => "foundation_tools",
            CategoryId::Creative => "creative_tools",
            CategoryId::Writing => "writing_tools",
            CategoryId::Technical => "technical_tools",
            CategoryId::Business => "business_tools",
            CategoryId::Research => "research_tools",
            CategoryId::Voice => "voice_tools",
            CategoryId::Video => "video_tools",
            CategoryId::Data => "data_tools",
            CategoryId::Directory => "directory_tools",
        }
    }

    /// Key into the `categories` metadata mapping: the list key without its
    /// `_tools` suffix (`foundation_tools` → `foundation`).
    pub fn short_name(self) -> &'static str {
        let key = self.key();
        key.strip_suffix(KEY_SUFFIX).unwrap_or(key)
    }

    /// Title-cased short name used in the build statistics (`Foundation`).
    pub fn display_name(self) -> String {
        let short = self.short_name();
        let mut chars = short.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Truthiness of a free-form value, as data authors expect from YAML flags.
///
/// `true`, non-zero numbers and non-empty strings, lists and mappings are
/// truthy. `null`, `false`, `0`, `""`, `[]` and `{}` are not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a scalar field as text. Strings are returned as-is, numbers and
/// booleans in their display form; anything else is `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Field of a mapping value, or `None` when `value` isn't a mapping or lacks
/// the key.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|map| map.get(key))
}
