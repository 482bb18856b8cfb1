//! The tool catalog and its aggregation.
//!
//! A [`Catalog`] is the top-level mapping of `data/tools.yaml`, kept whole so
//! that every key the data author adds (site title, hero text, ...) reaches
//! the homepage template. [`aggregate`] walks the fixed category lists and
//! attaches the derived values templates rely on:
//!
//! - `total_tools`: number of tools across all categories
//! - `featured_tools`: every tool with a truthy `featured` flag, in category
//!   order then list order
//! - `categories.<short>.tool_count`: per-category count, only for metadata
//!   entries that already exist
//!
//! Aggregation never fails. A category whose value isn't a list counts as
//! empty, and a tool entry that isn't a mapping is counted but can't be
//! featured.

use crate::types::{CategoryId, Record, field, is_truthy};
use serde_json::Value;
use tracing::warn;

/// Key of the short-name → metadata mapping.
pub const METADATA_KEY: &str = "categories";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    fields: Record,
    stats: CatalogStats,
}

/// Counts computed by [`aggregate`], in the order categories were walked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStats {
    pub total_tools: usize,
    pub featured: usize,
    pub per_category: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryCount {
    pub category: CategoryId,
    pub tools: usize,
}

impl Catalog {
    pub fn new(fields: Record) -> Self {
        Self {
            fields,
            stats: CatalogStats::default(),
        }
    }

    /// All top-level fields, including derived ones once aggregated.
    pub fn fields(&self) -> &Record {
        &self.fields
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }

    /// Tools listed under a category; empty when the key is absent or its
    /// value isn't a list.
    pub fn tools(&self, category: CategoryId) -> &[Value] {
        self.fields
            .get(category.key())
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The `featured_tools` list attached by [`aggregate`].
    pub fn featured_tools(&self) -> &[Value] {
        self.fields
            .get("featured_tools")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Metadata record for a category short name, if present.
    pub fn metadata(&self, short_name: &str) -> Option<&Value> {
        self.fields
            .get(METADATA_KEY)
            .and_then(Value::as_object)
            .and_then(|m| m.get(short_name))
    }

    fn metadata_mut(&mut self, short_name: &str) -> Option<&mut Value> {
        self.fields
            .get_mut(METADATA_KEY)
            .and_then(Value::as_object_mut)
            .and_then(|m| m.get_mut(short_name))
    }
}

/// Compute totals, the featured list and per-category counts.
///
/// `categories` is walked in order; pass [`CategoryId::ALL`] for the full
/// catalog.
pub fn aggregate(mut catalog: Catalog, categories: &[CategoryId]) -> Catalog {
    let mut total_tools = 0;
    let mut featured_tools = Vec::new();
    let mut per_category = Vec::with_capacity(categories.len());

    for &category in categories {
        let not_a_list = catalog
            .fields
            .get(category.key())
            .is_some_and(|v| !v.is_array() && !v.is_null());
        if not_a_list {
            warn!(category = category.key(), "category is not a list, counting it as empty");
        }

        let tools = catalog.tools(category);
        let count = tools.len();
        let featured: Vec<Value> = tools
            .iter()
            .filter(|tool| field(tool, "featured").is_some_and(is_truthy))
            .cloned()
            .collect();

        total_tools += count;
        featured_tools.extend(featured);
        per_category.push(CategoryCount {
            category,
            tools: count,
        });

        match catalog.metadata_mut(category.short_name()) {
            Some(Value::Object(meta)) => {
                meta.insert("tool_count".to_string(), Value::from(count));
            }
            Some(_) => {
                warn!(
                    category = category.short_name(),
                    "category metadata is not a mapping, tool_count not set"
                );
            }
            None => {}
        }
    }

    catalog.stats = CatalogStats {
        total_tools,
        featured: featured_tools.len(),
        per_category,
    };
    catalog
        .fields
        .insert("total_tools".to_string(), Value::from(total_tools));
    catalog
        .fields
        .insert("featured_tools".to_string(), Value::Array(featured_tools));
    catalog
}
