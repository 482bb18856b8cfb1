//! # toolsite
//!
//! A static site generator for curated tool catalogs. A YAML file lists
//! tools under ten fixed categories; Tera templates turn it into a homepage
//! and one detail page per tool, and the site's static assets are copied
//! alongside. The result is a directory of plain files that any web server
//! (or a browser opening `index.html`) can serve.
//!
//! # Pipeline
//!
//! ```text
//! data/tools.yaml        →  load + aggregate  →  output/index.html
//! data/tool_pages/*.yaml →  render each       →  output/pages/<category>/<slug>.html
//! ../css ../js ...       →  merge copy        →  output/css output/js ...
//! ```
//!
//! The catalog is loaded whole and handed to the homepage template with
//! three derived values attached: `total_tools`, `featured_tools` and a
//! `tool_count` on each category's metadata. Tool pages are independent of
//! the catalog: each YAML file is its own page.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | YAML loading for the catalog and page sources |
//! | [`catalog`] | The catalog mapping and its aggregation |
//! | [`render`] | Tera template engine, `markdown` filter, homepage rendering |
//! | [`pages`] | Per-tool detail pages |
//! | [`publish`] | Static asset copying with merge semantics |
//! | [`pipeline`] | Stage sequencing, progress events, the build report |
//! | [`config`] | Optional `site.toml` over stock defaults |
//! | [`types`] | Category identifiers and free-form value helpers |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Runtime Templates
//!
//! Page layouts are Tera files in the project's `templates/` directory, not
//! compiled into the binary. The people editing the catalog also edit its
//! look, and they shouldn't need a Rust toolchain to do it.
//!
//! ## Free-Form Records
//!
//! Tools and category metadata carry whatever fields the data author
//! writes, and templates are the only consumer of most of them. Records are
//! therefore kept as `serde_json::Value` trees rather than typed structs;
//! the generator itself only reads `featured`, `category` and `slug`, and
//! treats a missing or odd-typed field as absent.
//!
//! ## Failure Isolation
//!
//! A missing catalog or a broken homepage stops the build. Anything
//! per-file (a malformed tool page, a tool page template that doesn't parse,
//! an asset that fails to copy) is recorded in the build report and the
//! build carries on, so one bad entry never blocks publishing the rest of
//! the catalog.
//!
//! ## Reproducible Output
//!
//! Categories are walked in a fixed order, tool page sources and asset
//! trees are visited in file name order, and nothing time-dependent is
//! rendered. Rebuilding unchanged inputs produces byte-identical files.

pub mod catalog;
pub mod config;
pub mod load;
pub mod output;
pub mod pages;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
