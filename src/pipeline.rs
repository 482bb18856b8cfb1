//! The build pipeline.
//!
//! Runs the stages strictly in order:
//!
//! ```text
//! 1. Load       data/tools.yaml  →  Catalog
//! 2. Aggregate  Catalog          →  totals, featured list, tool counts
//! 3. Templates  templates/       →  TemplateEngine
//! 4. Homepage   Catalog          →  output/index.html
//! 5. Tool pages data/tool_pages/ →  output/pages/<category>/<slug>.html
//! 6. Assets     ../css, ...      →  output/css, ...
//! ```
//!
//! Stages 1, 3 and 4 are fatal: without the catalog or a homepage there is
//! no site. A single template that fails to parse is not a stage 3 failure;
//! it is set aside and only the pages using it are affected. Tool pages and
//! assets isolate their failures per file and end up in the [`BuildReport`]
//! instead.
//!
//! Progress is reported through a callback receiving [`BuildEvent`]s as
//! each stage starts and finishes; [`crate::output`] turns them into lines.

use crate::catalog::{self, Catalog, CatalogStats};
use crate::config::{ConfigError, SiteConfig};
use crate::load::{self, LoadError};
use crate::pages::{self, ToolPagesOutcome};
use crate::publish::{self, PublishReport};
use crate::render::{self, BrokenTemplate, RenderError, TemplateEngine};
use crate::types::CategoryId;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// A fatal build error. The underlying error is the `source()`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    #[error("could not load catalog")]
    Load(#[from] LoadError),
    #[error("could not load templates")]
    Templates(#[source] RenderError),
    #[error("could not render homepage")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// The catalog data file doesn't exist: usually the build was started
    /// from the wrong directory.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, PipelineError::Load(e) if e.is_missing())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadCatalog,
    LoadTemplates,
    Homepage,
    ToolPages,
    Assets,
}

/// Progress notifications, in pipeline order.
#[derive(Debug)]
pub enum BuildEvent<'a> {
    StageStarted(Stage),
    CatalogLoaded(&'a CatalogStats),
    TemplatesLoaded(&'a [String]),
    TemplateSetAside(&'a BrokenTemplate),
    HomepageWritten(&'a Path),
    ToolPagesDone(&'a ToolPagesOutcome),
    AssetsDone(&'a PublishReport),
}

/// Everything a finished build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub stats: CatalogStats,
    pub templates: Vec<String>,
    pub homepage: PathBuf,
    pub tool_pages: ToolPagesOutcome,
    pub assets: PublishReport,
    pub output_dir: PathBuf,
}

/// Load and aggregate the catalog named by `config`.
pub fn load_catalog(config: &SiteConfig, root: &Path) -> Result<Catalog, LoadError> {
    let paths = config.resolve_paths(root);
    let catalog = load::load_catalog(&paths.data_file)?;
    Ok(catalog::aggregate(catalog, &CategoryId::ALL))
}

/// Run the full build.
pub fn build(
    config: &SiteConfig,
    root: &Path,
    on_event: &mut dyn FnMut(BuildEvent<'_>),
) -> Result<BuildReport, PipelineError> {
    let paths = config.resolve_paths(root);

    on_event(BuildEvent::StageStarted(Stage::LoadCatalog));
    let catalog = load_catalog(config, root)?;
    info!(
        data_file = %paths.data_file.display(),
        total_tools = catalog.stats().total_tools,
        "catalog loaded"
    );
    on_event(BuildEvent::CatalogLoaded(catalog.stats()));

    on_event(BuildEvent::StageStarted(Stage::LoadTemplates));
    let engine = TemplateEngine::load(&paths.templates_dir).map_err(PipelineError::Templates)?;
    let templates = engine.template_names();
    on_event(BuildEvent::TemplatesLoaded(&templates));
    for broken in engine.broken() {
        warn!(template = %broken.name, reason = %broken.reason, "template set aside");
        on_event(BuildEvent::TemplateSetAside(broken));
    }

    on_event(BuildEvent::StageStarted(Stage::Homepage));
    let homepage = render::render_homepage(
        &engine,
        &catalog,
        &config.templates.homepage,
        &paths.output_dir,
    )?;
    on_event(BuildEvent::HomepageWritten(&homepage));

    on_event(BuildEvent::StageStarted(Stage::ToolPages));
    let tool_pages = pages::render_tool_pages(
        &engine,
        &paths.tool_pages_dir,
        &paths.output_dir,
        &config.templates.tool_page,
    );
    on_event(BuildEvent::ToolPagesDone(&tool_pages));

    on_event(BuildEvent::StageStarted(Stage::Assets));
    let assets = publish::publish_assets(&config.assets, root, &paths.output_dir);
    on_event(BuildEvent::AssetsDone(&assets));

    info!(
        output_dir = %paths.output_dir.display(),
        tool_pages = tool_pages.generated().len(),
        assets = assets.files_copied(),
        "build finished"
    );

    Ok(BuildReport {
        stats: catalog.stats().clone(),
        templates,
        homepage,
        tool_pages,
        assets,
        output_dir: paths.output_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{read_tree, write_project};
    use std::fs;
    use tempfile::TempDir;

    fn quiet() -> impl FnMut(BuildEvent<'_>) {
        |_| {}
    }

    #[test]
    fn builds_full_project() {
        let tmp = write_project();
        let root = tmp.path().join("tools");

        let report = build(&SiteConfig::default(), &root, &mut quiet()).unwrap();

        let output = tmp.path().join("output");
        assert_eq!(report.stats.total_tools, 4);
        assert_eq!(report.stats.featured, 2);
        assert!(output.join("index.html").is_file());
        assert!(output.join("pages/business_tools/widget.html").is_file());
        assert!(output.join("pages/data_tools/gizmo.html").is_file());
        assert!(output.join("css/site.css").is_file());
        assert!(output.join("robots.txt").is_file());
        assert_eq!(report.tool_pages.generated().len(), 2);

        let index = fs::read_to_string(output.join("index.html")).unwrap();
        assert!(index.contains("4 tools"), "index was: {index}");
        assert!(index.contains("Claude"));
    }

    #[test]
    fn events_arrive_in_stage_order() {
        let tmp = write_project();
        let mut stages = Vec::new();

        build(&SiteConfig::default(), &tmp.path().join("tools"), &mut |event| {
            if let BuildEvent::StageStarted(stage) = event {
                stages.push(stage);
            }
        })
        .unwrap();

        assert_eq!(
            stages,
            vec![
                Stage::LoadCatalog,
                Stage::LoadTemplates,
                Stage::Homepage,
                Stage::ToolPages,
                Stage::Assets
            ]
        );
    }

    #[test]
    fn missing_catalog_is_missing_input() {
        let tmp = TempDir::new().unwrap();
        let err = build(&SiteConfig::default(), tmp.path(), &mut quiet()).unwrap_err();
        assert!(err.is_missing_input());
    }

    #[test]
    fn malformed_catalog_is_fatal_but_not_missing() {
        let tmp = write_project();
        let root = tmp.path().join("tools");
        fs::write(root.join("data/tools.yaml"), "foundation_tools: [").unwrap();

        let err = build(&SiteConfig::default(), &root, &mut quiet()).unwrap_err();
        assert!(matches!(err, PipelineError::Load(LoadError::Malformed { .. })));
        assert!(!err.is_missing_input());
    }

    #[test]
    fn missing_homepage_template_is_fatal() {
        let tmp = write_project();
        let root = tmp.path().join("tools");
        fs::remove_file(root.join("templates/index.html")).unwrap();

        let err = build(&SiteConfig::default(), &root, &mut quiet()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Render(RenderError::TemplateNotFound(_))
        ));
        // Nothing after the homepage ran.
        assert!(!tmp.path().join("output/css").exists());
    }

    #[test]
    fn missing_tool_page_template_still_publishes() {
        let tmp = write_project();
        let root = tmp.path().join("tools");
        fs::remove_file(root.join("templates/tool_page.html")).unwrap();

        let report = build(&SiteConfig::default(), &root, &mut quiet()).unwrap();

        assert!(matches!(report.tool_pages, ToolPagesOutcome::TemplateMissing(_)));
        assert!(tmp.path().join("output/index.html").is_file());
        assert!(tmp.path().join("output/css/site.css").is_file());
    }

    #[test]
    fn broken_tool_page_template_still_builds_homepage_and_assets() {
        let tmp = write_project();
        let root = tmp.path().join("tools");
        fs::write(root.join("templates/tool_page.html"), "{% if %}").unwrap();
        let mut set_aside = Vec::new();

        let report = build(&SiteConfig::default(), &root, &mut |event| {
            if let BuildEvent::TemplateSetAside(broken) = event {
                set_aside.push(broken.name.clone());
            }
        })
        .unwrap();

        assert_eq!(set_aside, vec!["tool_page.html".to_string()]);
        assert!(matches!(
            report.tool_pages,
            ToolPagesOutcome::TemplateBroken { ref template, .. } if template == "tool_page.html"
        ));
        assert!(tmp.path().join("output/index.html").is_file());
        assert!(tmp.path().join("output/css/site.css").is_file());
        assert!(!tmp.path().join("output/pages/business_tools").exists());
    }

    #[test]
    fn broken_homepage_template_is_fatal() {
        let tmp = write_project();
        let root = tmp.path().join("tools");
        fs::write(root.join("templates/index.html"), "{% for %}").unwrap();

        let err = build(&SiteConfig::default(), &root, &mut quiet()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Render(RenderError::TemplateBroken { .. })
        ));
        assert!(!tmp.path().join("output/index.html").exists());
    }

    #[test]
    fn homepage_lists_categories_in_file_order() {
        let tmp = write_project();
        let root = tmp.path().join("tools");

        build(&SiteConfig::default(), &root, &mut quiet()).unwrap();

        let index = fs::read_to_string(tmp.path().join("output/index.html")).unwrap();
        let positions: Vec<usize> = ["#foundation", "#creative", "#business", "#data"]
            .iter()
            .map(|anchor| index.find(anchor).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "index was: {index}");
    }

    #[test]
    fn missing_tool_pages_dir_is_not_an_error() {
        let tmp = write_project();
        let root = tmp.path().join("tools");
        fs::remove_dir_all(root.join("data/tool_pages")).unwrap();

        let report = build(&SiteConfig::default(), &root, &mut quiet()).unwrap();
        assert!(matches!(report.tool_pages, ToolPagesOutcome::NotPresent));
        assert!(report.tool_pages.generated().is_empty());
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let tmp = write_project();
        let root = tmp.path().join("tools");

        build(&SiteConfig::default(), &root, &mut quiet()).unwrap();
        let first = read_tree(&tmp.path().join("output"));
        build(&SiteConfig::default(), &root, &mut quiet()).unwrap();
        let second = read_tree(&tmp.path().join("output"));

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn custom_output_dir() {
        let tmp = write_project();
        let root = tmp.path().join("tools");
        let config = SiteConfig {
            output_dir: PathBuf::from("dist"),
            ..SiteConfig::default()
        };

        let report = build(&config, &root, &mut quiet()).unwrap();
        assert_eq!(report.output_dir, root.join("dist"));
        assert!(root.join("dist/index.html").is_file());
    }
}
