//! Per-tool detail pages.
//!
//! Each YAML file in the tool pages directory describes one page:
//!
//! ```yaml
//! tool:
//!   name: Canva
//!   category: creative_tools
//!   slug: canva          # optional, defaults to the file stem
//! content:
//!   overview: "Design anything, *fast*."
//!   pricing: [...]
//! ```
//!
//! and renders to `<output>/pages/<tool.category>/<tool.slug>.html` with the
//! tool page template, which sees two variables: `tool` and `content`. A
//! missing category files the page under `misc`.
//!
//! Files are processed in file name order, each on its own: a malformed
//! file or a failing render is recorded and the batch moves on. Three cases
//! skip the phase entirely without failing the build: the directory doesn't
//! exist, the template doesn't exist, or the template exists but couldn't
//! be loaded.

use crate::load::{self, LoadError};
use crate::render::{RenderError, TemplateEngine, write_page};
use crate::types::{Record, field, scalar_text};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use thiserror::Error;
use tracing::{debug, warn};

/// Category directory for pages whose tool has no category.
pub const FALLBACK_CATEGORY: &str = "misc";

/// Subdirectory of the output root that holds tool pages.
pub const PAGES_DIR: &str = "pages";

const PAGE_EXTENSIONS: &[&str] = &["yaml", "yml"];

#[derive(Error, Debug)]
pub enum ToolPageError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("invalid {field} {value:?}: must be a single path segment")]
    InvalidPathComponent { field: &'static str, value: String },
    #[error("failed to list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of the tool pages phase.
#[derive(Debug)]
pub enum ToolPagesOutcome {
    /// The tool pages directory doesn't exist.
    NotPresent,
    /// The tool page template couldn't be resolved; nothing was rendered.
    TemplateMissing(String),
    /// The tool page template exists but failed to load; nothing was rendered.
    TemplateBroken { template: String, reason: String },
    /// The directory couldn't be listed.
    Unreadable(ToolPageError),
    /// One entry per page source, in file name order.
    Rendered(Vec<ToolPageResult>),
}

#[derive(Debug)]
pub struct ToolPageResult {
    pub source: PathBuf,
    pub result: Result<PathBuf, ToolPageError>,
}

impl ToolPagesOutcome {
    /// Output paths of successfully written pages, in file name order.
    pub fn generated(&self) -> Vec<&Path> {
        match self {
            ToolPagesOutcome::Rendered(results) => results
                .iter()
                .filter_map(|r| r.result.as_ref().ok().map(PathBuf::as_path))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Page sources that failed, with their errors.
    pub fn failures(&self) -> Vec<(&Path, &ToolPageError)> {
        match self {
            ToolPagesOutcome::Rendered(results) => results
                .iter()
                .filter_map(|r| r.result.as_ref().err().map(|e| (r.source.as_path(), e)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Render every page source in `pages_dir` into `output_dir/pages/`.
pub fn render_tool_pages(
    engine: &TemplateEngine,
    pages_dir: &Path,
    output_dir: &Path,
    template: &str,
) -> ToolPagesOutcome {
    if !pages_dir.is_dir() {
        debug!(dir = %pages_dir.display(), "no tool pages directory");
        return ToolPagesOutcome::NotPresent;
    }
    if let Some(reason) = engine.broken_reason(template) {
        warn!(template, reason, "tool page template failed to load, skipping tool pages");
        return ToolPagesOutcome::TemplateBroken {
            template: template.to_string(),
            reason: reason.to_string(),
        };
    }
    if !engine.has_template(template) {
        return ToolPagesOutcome::TemplateMissing(template.to_string());
    }

    let sources = match collect_page_sources(pages_dir) {
        Ok(sources) => sources,
        Err(e) => return ToolPagesOutcome::Unreadable(e),
    };

    let results = sources
        .into_iter()
        .map(|source| {
            let result = render_tool_page(engine, &source, output_dir, template);
            debug!(source = %source.display(), ok = result.is_ok(), "tool page");
            ToolPageResult { source, result }
        })
        .collect();
    ToolPagesOutcome::Rendered(results)
}

/// YAML files directly inside `dir`, sorted by file name.
fn collect_page_sources(dir: &Path) -> Result<Vec<PathBuf>, ToolPageError> {
    let io_err = |source| ToolPageError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut sources: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| PAGE_EXTENSIONS.contains(&e))
        })
        .collect();

    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(sources)
}

/// Render one page source; returns the written output path.
pub fn render_tool_page(
    engine: &TemplateEngine,
    source: &Path,
    output_dir: &Path,
    template: &str,
) -> Result<PathBuf, ToolPageError> {
    let data = Value::Object(load::load_mapping(source)?);
    let tool = record_or_empty(field(&data, "tool"));
    let content = record_or_empty(field(&data, "content"));

    let output_file = tool_page_path(&tool, source, output_dir)?;

    let mut context = Context::new();
    context.insert("tool", &tool);
    context.insert("content", &content);
    let html = engine.render(template, &context)?;

    write_page(&output_file, &html)?;
    Ok(output_file)
}

/// `<output>/pages/<category>/<slug>.html` for a page source.
pub fn tool_page_path(
    tool: &Record,
    source: &Path,
    output_dir: &Path,
) -> Result<PathBuf, ToolPageError> {
    let category = tool
        .get("category")
        .and_then(scalar_text)
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());
    let slug = match tool.get("slug").and_then(scalar_text) {
        Some(slug) => slug,
        None => source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    check_path_segment("category", &category)?;
    check_path_segment("slug", &slug)?;

    Ok(output_dir
        .join(PAGES_DIR)
        .join(category)
        .join(format!("{slug}.html")))
}

fn check_path_segment(field: &'static str, value: &str) -> Result<(), ToolPageError> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.contains('\0');
    if invalid {
        return Err(ToolPageError::InvalidPathComponent {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn record_or_empty(value: Option<&Value>) -> Record {
    value
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}
