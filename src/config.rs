//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Every option has a
//! stock default matching the standard project layout, so the file is
//! optional: a project that follows the layout below builds with no config
//! at all.
//!
//! ## Project Layout
//!
//! Paths are relative to the project root (`--root`, default: the current
//! directory). The stock layout keeps the generator inputs in `tools/` and
//! publishes into a sibling `output/`:
//!
//! ```text
//! site/
//! ├── tools/                     # Project root
//! │   ├── site.toml              # This file (optional)
//! │   ├── data/
//! │   │   ├── tools.yaml         # The catalog
//! │   │   └── tool_pages/        # One YAML file per detail page (optional)
//! │   └── templates/
//! │       ├── index.html
//! │       └── tool_page.html
//! ├── css/  images/  js/  pages/ # Copied into output/
//! ├── manifest.json  robots.txt  sitemap.xml
//! └── output/                    # Generated site
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data_file = "data/tools.yaml"
//! tool_pages_dir = "data/tool_pages"
//! templates_dir = "templates"
//! output_dir = "../output"
//!
//! [templates]
//! homepage = "index.html"
//! tool_page = "tool_page.html"
//!
//! [assets]
//! dirs = [
//!     { source = "../css", dest = "css" },
//!     { source = "../images", dest = "images" },
//!     { source = "../js", dest = "js" },
//!     { source = "../pages", dest = "pages" },
//! ]
//! root_files = ["../manifest.json", "../robots.txt", "../sitemap.xml"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Name of the optional config file in the project root.
pub const CONFIG_FILE: &str = "site.toml";

/// Site configuration loaded from `site.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// The catalog YAML file.
    pub data_file: PathBuf,
    /// Directory of per-item page sources. May be absent.
    pub tool_pages_dir: PathBuf,
    /// Directory Tera loads templates from.
    pub templates_dir: PathBuf,
    /// Where the generated site is written.
    pub output_dir: PathBuf,
    /// Template names.
    pub templates: TemplatesConfig,
    /// Static assets copied into the output.
    pub assets: AssetsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/tools.yaml"),
            tool_pages_dir: PathBuf::from("data/tool_pages"),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("../output"),
            templates: TemplatesConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.templates.homepage.trim().is_empty() {
            return Err(ConfigError::Validation(
                "templates.homepage must not be empty".into(),
            ));
        }
        if self.templates.tool_page.trim().is_empty() {
            return Err(ConfigError::Validation(
                "templates.tool_page must not be empty".into(),
            ));
        }
        for dir in &self.assets.dirs {
            if !is_contained_relative(&dir.dest) {
                return Err(ConfigError::Validation(format!(
                    "assets.dirs dest {:?} must be a relative path inside the output directory",
                    dir.dest
                )));
            }
        }
        Ok(())
    }

    /// Resolve every path option against the project root.
    pub fn resolve_paths(&self, root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            data_file: root.join(&self.data_file),
            tool_pages_dir: root.join(&self.tool_pages_dir),
            templates_dir: root.join(&self.templates_dir),
            output_dir: root.join(&self.output_dir),
        }
    }
}

/// Config paths joined onto the project root.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPaths {
    pub data_file: PathBuf,
    pub tool_pages_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Template names, as Tera registers them: paths relative to `templates_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    pub homepage: String,
    pub tool_page: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            homepage: "index.html".to_string(),
            tool_page: "tool_page.html".to_string(),
        }
    }
}

/// Static assets copied verbatim into the output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directories merged into `output_dir/<dest>`.
    pub dirs: Vec<AssetDir>,
    /// Individual files copied into the output root under their file name.
    pub root_files: Vec<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let dir = |name: &str| AssetDir {
            source: PathBuf::from(format!("../{name}")),
            dest: PathBuf::from(name),
        };
        Self {
            dirs: vec![dir("css"), dir("images"), dir("js"), dir("pages")],
            root_files: ["manifest.json", "robots.txt", "sitemap.xml"]
                .iter()
                .map(|f| PathBuf::from(format!("../{f}")))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetDir {
    /// Source directory, relative to the project root.
    pub source: PathBuf,
    /// Destination, relative to the output directory.
    pub dest: PathBuf,
}

fn is_contained_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   `assets.dirs` list in `site.toml` replaces the stock list.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `site.toml` path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Load a config file the user named explicitly.
///
/// Same as [`load_config`], except the file must exist: a mistyped
/// `--config` path is an error rather than a silent build with defaults.
pub fn load_named_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay =
        load_raw_config(path)?.ok_or_else(|| ConfigError::Missing(path.to_path_buf()))?;
    resolve_config(base, Some(overlay))
}

/// Returns a fully-commented stock `site.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# toolsite configuration
# ======================
#
# All options are optional. Uncomment and change only what you need.
# Relative paths resolve against the project root (--root, default ".").

# The catalog: the ten *_tools lists plus a `categories` metadata mapping.
# data_file = "data/tools.yaml"

# One YAML file per tool detail page, each with `tool` and `content` keys.
# Rendered to <output_dir>/pages/<tool.category>/<tool.slug>.html.
# The directory may be absent.
# tool_pages_dir = "data/tool_pages"

# Tera templates. Names below are paths relative to this directory.
# templates_dir = "templates"

# The generated site.
# output_dir = "../output"

[templates]
# Rendered with every catalog field plus total_tools and featured_tools.
# homepage = "index.html"

# Rendered once per tool page with `tool` and `content`.
# tool_page = "tool_page.html"

[assets]
# Directories merged into the output (existing files are overwritten, others kept).
# dirs = [
#     { source = "../css", dest = "css" },
#     { source = "../images", dest = "images" },
#     { source = "../js", dest = "js" },
#     { source = "../pages", dest = "pages" },
# ]

# Files copied into the output root when present.
# root_files = ["../manifest.json", "../robots.txt", "../sitemap.xml"]
"##
}
