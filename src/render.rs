//! Template loading and HTML rendering.
//!
//! Templates are [Tera](https://keats.github.io/tera/) files under the
//! project's `templates/` directory, registered by their path relative to
//! it (`index.html`, `partials/tool_card.html`). Layout inheritance
//! (`{% extends "base.html" %}`) and includes work across the whole
//! directory.
//!
//! HTML autoescaping is on for `.html` templates. Trusted markup in the data
//! is emitted with `| safe`, and Markdown strings with the `markdown` filter
//! registered here:
//!
//! ```text
//! <section>{{ content.overview | markdown | safe }}</section>
//! ```
//!
//! The homepage is rendered with every catalog field as a top-level
//! variable, so a template can use `total_tools`, `featured_tools`,
//! `categories` and any key the data author added.

use crate::catalog::Catalog;
use pulldown_cmark::{Options, Parser, html as md_html};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tera::{Context, Template, Tera};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("template '{template}' is unusable: {reason}")]
    TemplateBroken { template: String, reason: String },
    #[error("failed to list templates in {}: {source}", dir.display())]
    List {
        dir: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to load templates from {}: {source}", dir.display())]
    Load { dir: PathBuf, source: tera::Error },
    #[error("failed to render '{template}': {source}")]
    Render {
        template: String,
        source: tera::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A template file that exists but was left out of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenTemplate {
    pub name: String,
    pub reason: String,
}

/// Template set loaded from a directory.
#[derive(Debug)]
pub struct TemplateEngine {
    tera: Tera,
    broken: Vec<BrokenTemplate>,
}

/// A template source that parsed on its own.
struct ParsedSource {
    name: String,
    source: String,
    template: Template,
}

impl TemplateEngine {
    /// Load every `.html` template under `dir`.
    ///
    /// A missing directory is an empty engine: every lookup then reports
    /// [`RenderError::TemplateNotFound`], which is how callers learn about it.
    ///
    /// Templates are checked one by one. A file that can't be read or
    /// parsed is set aside as a [`BrokenTemplate`], as is anything that
    /// extends or imports macros from one, so a typo in one page's layout
    /// only costs that page. Rendering a broken template reports
    /// [`RenderError::TemplateBroken`].
    pub fn load(dir: &Path) -> Result<Self, RenderError> {
        if !dir.is_dir() {
            return Ok(Self::with_tera(Tera::default(), Vec::new()));
        }

        let mut parsed = Vec::new();
        let mut broken = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| RenderError::List {
                dir: dir.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "html") {
                continue;
            }
            let name = template_name(dir, path);
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    broken.push(BrokenTemplate {
                        name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            match Template::new(&name, None, &source) {
                Ok(template) => parsed.push(ParsedSource {
                    name,
                    source,
                    template,
                }),
                Err(e) => broken.push(BrokenTemplate {
                    name,
                    reason: error_chain(&e),
                }),
            }
        }

        drop_unresolved(&mut parsed, &mut broken);
        broken.sort_by(|a, b| a.name.cmp(&b.name));

        let mut tera = Tera::default();
        tera.add_raw_templates(parsed.iter().map(|p| (p.name.as_str(), p.source.as_str())))
            .map_err(|e| RenderError::Load {
                dir: dir.to_path_buf(),
                source: e,
            })?;
        Ok(Self::with_tera(tera, broken))
    }

    fn with_tera(mut tera: Tera, broken: Vec<BrokenTemplate>) -> Self {
        tera.register_filter("markdown", markdown_filter);
        Self { tera, broken }
    }

    /// Build an engine from in-memory `(name, source)` pairs.
    pub fn from_raw<'a>(
        templates: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| RenderError::Load {
                dir: PathBuf::new(),
                source: e,
            })?;
        Ok(Self::with_tera(tera, Vec::new()))
    }

    /// Whether `name` loaded and can be rendered.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Sorted names of all loaded templates.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tera.get_template_names().map(String::from).collect();
        names.sort();
        names
    }

    /// Templates found on disk but left out of the engine, by name.
    pub fn broken(&self) -> &[BrokenTemplate] {
        &self.broken
    }

    /// Why `name` was left out, if it was.
    pub fn broken_reason(&self, name: &str) -> Option<&str> {
        self.broken
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.reason.as_str())
    }

    /// Render a named template.
    pub fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        if let Some(reason) = self.broken_reason(name) {
            return Err(RenderError::TemplateBroken {
                template: name.to_string(),
                reason: reason.to_string(),
            });
        }
        if !self.has_template(name) {
            return Err(RenderError::TemplateNotFound(name.to_string()));
        }
        self.tera
            .render(name, context)
            .map_err(|e| RenderError::Render {
                template: name.to_string(),
                source: e,
            })
    }
}

/// Template name for a file: its path under `dir`, `/`-separated.
fn template_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Move templates whose parent or macro imports aren't loadable over to
/// `broken`, until nothing left depends on a missing template.
fn drop_unresolved(parsed: &mut Vec<ParsedSource>, broken: &mut Vec<BrokenTemplate>) {
    loop {
        let available: HashSet<&str> = parsed.iter().map(|p| p.name.as_str()).collect();
        let unresolved: Vec<(usize, String)> = parsed
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                missing_dependency(&p.template, &available).map(|reason| (i, reason))
            })
            .collect();
        if unresolved.is_empty() {
            return;
        }
        for (i, reason) in unresolved.into_iter().rev() {
            let dropped = parsed.remove(i);
            broken.push(BrokenTemplate {
                name: dropped.name,
                reason,
            });
        }
    }
}

fn missing_dependency(template: &Template, available: &HashSet<&str>) -> Option<String> {
    if let Some(parent) = template
        .parent
        .as_ref()
        .filter(|p| !available.contains(p.as_str()))
    {
        return Some(format!("extends missing or broken template '{parent}'"));
    }
    template
        .imported_macro_files
        .iter()
        .find(|(file, _)| !available.contains(file.as_str()))
        .map(|(file, _)| format!("imports macros from missing or broken template '{file}'"))
}

/// An error and its causes on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Tera filter: render a Markdown string to HTML.
fn markdown_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("markdown filter expects a string"))?;
    Ok(Value::String(markdown_to_html(text)))
}

pub fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// Every catalog field as a top-level template variable.
pub fn catalog_context(catalog: &Catalog) -> Context {
    let mut context = Context::new();
    for (key, value) in catalog.fields() {
        context.insert(key.as_str(), value);
    }
    context
}

/// Write `contents` to `path`, creating parent directories as needed.
pub fn write_page(path: &Path, contents: &str) -> Result<(), RenderError> {
    let io_err = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}

/// Render the homepage to `output_dir/index.html`.
pub fn render_homepage(
    engine: &TemplateEngine,
    catalog: &Catalog,
    template: &str,
    output_dir: &Path,
) -> Result<PathBuf, RenderError> {
    let html = engine.render(template, &catalog_context(catalog))?;
    let output_file = output_dir.join("index.html");
    write_page(&output_file, &html)?;
    Ok(output_file)
}
