//! CLI output formatting for the build.
//!
//! # Output Format
//!
//! ```text
//! 📂 Loading catalog...
//!    ✅ Loaded 28 tools (6 featured)
//! 🔧 Loading templates...
//!    ✅ 4 templates ready
//! 🏠 Rendering homepage...
//!    ✅ Generated: ../output/index.html
//! 🧩 Rendering tool pages...
//!    ✅ Generated: ../output/pages/creative_tools/canva.html
//!    ❌ Error processing data/tool_pages/broken.yaml: malformed YAML in ...
//! 📦 Copying static assets...
//!    ✅ Copied css/ (3 files)
//!    ➖ js/ not present
//!    ✅ Copied root files: manifest.json, robots.txt
//!
//! ==================================================
//! 📊 BUILD STATISTICS
//! ==================================================
//! Total Tools:        28
//! Foundation:         5
//! ...
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns `Vec<String>` and does no I/O, so the
//! exact output is unit-tested. The `print_*` wrappers write to stdout.

use crate::catalog::CatalogStats;
use crate::pages::ToolPagesOutcome;
use crate::pipeline::{BuildEvent, BuildReport, PipelineError, Stage};
use crate::publish::{AssetOutcome, PublishReport};
use std::error::Error;
use std::path::Path;

const RULE_WIDTH: usize = 50;
const LABEL_WIDTH: usize = 20;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// `label:` padded to a fixed column, then the value.
fn stat_line(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<width$}{}", format!("{label}:"), value, width = LABEL_WIDTH)
}

fn step(line: impl std::fmt::Display) -> String {
    format!("   {line}")
}

pub fn format_banner() -> Vec<String> {
    vec![
        String::new(),
        "🚀 ".repeat(20),
        "TOOLSITE - STATIC CATALOG GENERATOR".to_string(),
        "🚀 ".repeat(20),
        String::new(),
    ]
}

fn stage_heading(stage: Stage) -> &'static str {
    match stage {
        Stage::LoadCatalog => "📂 Loading catalog...",
        Stage::LoadTemplates => "🔧 Loading templates...",
        Stage::Homepage => "🏠 Rendering homepage...",
        Stage::ToolPages => "🧩 Rendering tool pages...",
        Stage::Assets => "📦 Copying static assets...",
    }
}

/// Lines for one pipeline event.
pub fn format_build_event(event: &BuildEvent<'_>) -> Vec<String> {
    match event {
        BuildEvent::StageStarted(stage) => vec![stage_heading(*stage).to_string()],
        BuildEvent::CatalogLoaded(stats) => vec![step(format!(
            "✅ Loaded {} tools ({} featured)",
            stats.total_tools, stats.featured
        ))],
        BuildEvent::TemplatesLoaded(names) => vec![step(format!(
            "✅ {} template{} ready",
            names.len(),
            if names.len() == 1 { "" } else { "s" }
        ))],
        BuildEvent::TemplateSetAside(broken) => vec![step(format!(
            "⚠️  {} not loaded: {}",
            broken.name, broken.reason
        ))],
        BuildEvent::HomepageWritten(path) => {
            vec![step(format!("✅ Generated: {}", path.display()))]
        }
        BuildEvent::ToolPagesDone(outcome) => format_tool_pages(outcome),
        BuildEvent::AssetsDone(report) => format_assets(report),
    }
}

pub fn format_tool_pages(outcome: &ToolPagesOutcome) -> Vec<String> {
    match outcome {
        ToolPagesOutcome::NotPresent => {
            vec![step("⚠️  No tool pages directory found, skipping")]
        }
        ToolPagesOutcome::TemplateMissing(template) => {
            vec![step(format!(
                "⚠️  {template} template not found, skipping tool pages"
            ))]
        }
        ToolPagesOutcome::TemplateBroken { template, .. } => {
            vec![step(format!(
                "⚠️  {template} template failed to load, skipping tool pages"
            ))]
        }
        ToolPagesOutcome::Unreadable(e) => vec![step(format!("❌ {e}"))],
        ToolPagesOutcome::Rendered(results) if results.is_empty() => {
            vec![step("➖ No tool page sources found")]
        }
        ToolPagesOutcome::Rendered(results) => results
            .iter()
            .map(|r| match &r.result {
                Ok(path) => step(format!("✅ Generated: {}", path.display())),
                Err(e) => step(format!(
                    "❌ Error processing {}: {}",
                    r.source.display(),
                    e
                )),
            })
            .collect(),
    }
}

pub fn format_assets(report: &PublishReport) -> Vec<String> {
    let mut lines = Vec::new();

    for dir in &report.dirs {
        let dest = dir.dest.display();
        match &dir.outcome {
            AssetOutcome::NotPresent => lines.push(step(format!("➖ {dest}/ not present"))),
            AssetOutcome::Copied { files, errors } => {
                lines.push(step(format!(
                    "✅ Copied {dest}/ ({files} file{})",
                    if *files == 1 { "" } else { "s" }
                )));
                lines.extend(errors.iter().map(|e| step(format!("❌ {e}"))));
            }
        }
    }

    let copied: Vec<String> = report
        .root_files
        .iter()
        .filter(|r| r.outcome.files() > 0)
        .map(|r| r.dest.display().to_string())
        .collect();
    if !copied.is_empty() {
        lines.push(step(format!("✅ Copied root files: {}", copied.join(", "))));
    }
    for file in &report.root_files {
        lines.extend(file.outcome.errors().iter().map(|e| step(format!("❌ {e}"))));
    }

    lines
}

/// Per-category counts, skipping empty categories.
fn category_lines(stats: &CatalogStats) -> Vec<String> {
    stats
        .per_category
        .iter()
        .filter(|c| c.tools > 0)
        .map(|c| stat_line(&c.category.display_name(), c.tools))
        .collect()
}

/// Final statistics block.
pub fn format_build_stats(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        rule(),
        "📊 BUILD STATISTICS".to_string(),
        rule(),
        stat_line("Total Tools", report.stats.total_tools),
    ];
    lines.extend(category_lines(&report.stats));
    lines.push(stat_line("Featured", report.stats.featured));
    lines.push(stat_line("Tool Pages", report.tool_pages.generated().len()));

    let failed = report.tool_pages.failures().len() + report.assets.errors().count();
    if failed > 0 {
        lines.push(stat_line("Errors", failed));
    }

    lines.push(stat_line("Assets Copied", report.assets.files_copied()));
    lines.push(stat_line(
        "Templates Used",
        format!("{} ({})", report.templates.len(), report.templates.join(", ")),
    ));
    lines.push(stat_line("Output Directory", report.output_dir.display()));
    lines.push(rule());
    lines
}

/// Closing lines pointing at the generated homepage.
pub fn format_build_complete(homepage: &Path) -> Vec<String> {
    let shown = homepage
        .canonicalize()
        .unwrap_or_else(|_| homepage.to_path_buf());
    vec![
        String::new(),
        "✨ BUILD COMPLETE! ✨".to_string(),
        String::new(),
        format!("👉 Open file: {}", shown.display()),
        String::new(),
    ]
}

/// Statistics for `check`: the catalog as it would be built.
pub fn format_check_output(stats: &CatalogStats, data_file: &Path) -> Vec<String> {
    let mut lines = vec![format!("Catalog: {}", data_file.display())];
    lines.push(stat_line("Total Tools", stats.total_tools));
    lines.extend(category_lines(stats));
    lines.push(stat_line("Featured", stats.featured));
    lines
}

/// Report a fatal error with its full cause chain. A missing catalog also
/// gets a hint about the working directory.
pub fn format_fatal_error(err: &PipelineError) -> Vec<String> {
    let mut lines = vec![String::new(), format!("❌ ERROR: {err}")];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("   caused by: {cause}"));
        source = cause.source();
    }
    if err.is_missing_input() {
        lines.push(
            "   Make sure you're running this from the 'tools/' directory, or pass --root"
                .to_string(),
        );
    }
    lines
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

pub fn print_build_event(event: &BuildEvent<'_>) {
    print_lines(format_build_event(event));
}

pub fn print_build_summary(report: &BuildReport) {
    print_lines(format_build_stats(report));
    print_lines(format_build_complete(&report.homepage));
}

pub fn print_banner() {
    print_lines(format_banner());
}

pub fn print_check_output(stats: &CatalogStats, data_file: &Path) {
    print_lines(format_check_output(stats, data_file));
}

pub fn print_fatal_error(err: &PipelineError) {
    for line in format_fatal_error(err) {
        eprintln!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryCount;
    use crate::load::LoadError;
    use crate::pages::{ToolPageError, ToolPageResult};
    use crate::publish::{AssetReport, CopyError};
    use crate::render::{BrokenTemplate, RenderError};
    use crate::types::CategoryId;
    use std::path::PathBuf;

    fn stats() -> CatalogStats {
        CatalogStats {
            total_tools: 3,
            featured: 1,
            per_category: vec![
                CategoryCount {
                    category: CategoryId::Foundation,
                    tools: 2,
                },
                CategoryCount {
                    category: CategoryId::Creative,
                    tools: 0,
                },
                CategoryCount {
                    category: CategoryId::Video,
                    tools: 1,
                },
            ],
        }
    }

    fn report(tool_pages: ToolPagesOutcome, assets: PublishReport) -> BuildReport {
        BuildReport {
            stats: stats(),
            templates: vec!["index.html".into(), "tool_page.html".into()],
            homepage: PathBuf::from("out/index.html"),
            tool_pages,
            assets,
            output_dir: PathBuf::from("out"),
        }
    }

    #[test]
    fn stat_line_pads_label() {
        assert_eq!(stat_line("Total Tools", 28), "Total Tools:        28");
        assert_eq!(stat_line("Foundation", 5), "Foundation:         5");
    }

    #[test]
    fn stage_started_heading() {
        let lines = format_build_event(&BuildEvent::StageStarted(Stage::Homepage));
        assert_eq!(lines, vec!["🏠 Rendering homepage..."]);
    }

    #[test]
    fn catalog_loaded_line() {
        let s = stats();
        let lines = format_build_event(&BuildEvent::CatalogLoaded(&s));
        assert_eq!(lines, vec!["   ✅ Loaded 3 tools (1 featured)"]);
    }

    #[test]
    fn templates_loaded_pluralizes() {
        let one = vec!["index.html".to_string()];
        assert_eq!(
            format_build_event(&BuildEvent::TemplatesLoaded(&one)),
            vec!["   ✅ 1 template ready"]
        );
    }

    #[test]
    fn tool_pages_not_present() {
        let lines = format_tool_pages(&ToolPagesOutcome::NotPresent);
        assert_eq!(lines, vec!["   ⚠️  No tool pages directory found, skipping"]);
    }

    #[test]
    fn tool_pages_template_missing() {
        let lines = format_tool_pages(&ToolPagesOutcome::TemplateMissing("tool_page.html".into()));
        assert_eq!(
            lines,
            vec!["   ⚠️  tool_page.html template not found, skipping tool pages"]
        );
    }

    #[test]
    fn tool_pages_template_broken() {
        let lines = format_tool_pages(&ToolPagesOutcome::TemplateBroken {
            template: "tool_page.html".into(),
            reason: "unexpected end".into(),
        });
        assert_eq!(
            lines,
            vec!["   ⚠️  tool_page.html template failed to load, skipping tool pages"]
        );
    }

    #[test]
    fn template_set_aside_line() {
        let broken = BrokenTemplate {
            name: "partials/card.html".into(),
            reason: "unexpected end".into(),
        };
        assert_eq!(
            format_build_event(&BuildEvent::TemplateSetAside(&broken)),
            vec!["   ⚠️  partials/card.html not loaded: unexpected end"]
        );
    }

    #[test]
    fn tool_pages_success_and_failure_lines() {
        let outcome = ToolPagesOutcome::Rendered(vec![
            ToolPageResult {
                source: PathBuf::from("data/tool_pages/a.yaml"),
                result: Ok(PathBuf::from("out/pages/x/a.html")),
            },
            ToolPageResult {
                source: PathBuf::from("data/tool_pages/b.yaml"),
                result: Err(ToolPageError::Load(LoadError::NotAMapping(PathBuf::from(
                    "data/tool_pages/b.yaml",
                )))),
            },
        ]);

        let lines = format_tool_pages(&outcome);
        assert_eq!(lines[0], "   ✅ Generated: out/pages/x/a.html");
        assert_eq!(
            lines[1],
            "   ❌ Error processing data/tool_pages/b.yaml: expected a mapping at the top level of data/tool_pages/b.yaml"
        );
    }

    #[test]
    fn assets_lines() {
        let report = PublishReport {
            dirs: vec![
                AssetReport {
                    source: PathBuf::from("../css"),
                    dest: PathBuf::from("css"),
                    outcome: AssetOutcome::Copied {
                        files: 3,
                        errors: Vec::new(),
                    },
                },
                AssetReport {
                    source: PathBuf::from("../js"),
                    dest: PathBuf::from("js"),
                    outcome: AssetOutcome::NotPresent,
                },
            ],
            root_files: vec![
                AssetReport {
                    source: PathBuf::from("../robots.txt"),
                    dest: PathBuf::from("robots.txt"),
                    outcome: AssetOutcome::Copied {
                        files: 1,
                        errors: Vec::new(),
                    },
                },
                AssetReport {
                    source: PathBuf::from("../sitemap.xml"),
                    dest: PathBuf::from("sitemap.xml"),
                    outcome: AssetOutcome::NotPresent,
                },
            ],
        };

        assert_eq!(
            format_assets(&report),
            vec![
                "   ✅ Copied css/ (3 files)",
                "   ➖ js/ not present",
                "   ✅ Copied root files: robots.txt",
            ]
        );
    }

    #[test]
    fn asset_errors_are_listed() {
        let report = PublishReport {
            dirs: vec![AssetReport {
                source: PathBuf::from("../css"),
                dest: PathBuf::from("css"),
                outcome: AssetOutcome::Copied {
                    files: 0,
                    errors: vec![CopyError::Io {
                        path: PathBuf::from("../css/a.css"),
                        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                    }],
                },
            }],
            root_files: Vec::new(),
        };

        let lines = format_assets(&report);
        assert_eq!(lines[1], "   ❌ failed to copy ../css/a.css: denied");
    }

    #[test]
    fn build_stats_skip_empty_categories() {
        let lines = format_build_stats(&report(ToolPagesOutcome::NotPresent, PublishReport::default()));

        assert!(lines.contains(&"Total Tools:        3".to_string()));
        assert!(lines.contains(&"Foundation:         2".to_string()));
        assert!(lines.contains(&"Video:              1".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Creative")));
        assert!(lines.contains(&"Tool Pages:         0".to_string()));
        assert!(lines.contains(&"Templates Used:     2 (index.html, tool_page.html)".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Errors")));
    }

    #[test]
    fn missing_input_gets_directory_hint() {
        let err = PipelineError::Load(LoadError::Missing(PathBuf::from("data/tools.yaml")));
        let lines = format_fatal_error(&err);
        assert_eq!(
            lines[1..],
            [
                "❌ ERROR: could not load catalog".to_string(),
                "   caused by: file not found: data/tools.yaml".to_string(),
                "   Make sure you're running this from the 'tools/' directory, or pass --root"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn other_errors_show_cause_chain() {
        let err = PipelineError::Render(RenderError::Render {
            template: "index.html".into(),
            source: tera::Error::msg("Variable `x` not found"),
        });
        let lines = format_fatal_error(&err);
        assert_eq!(lines[1], "❌ ERROR: could not render homepage");
        assert_eq!(
            lines[2],
            "   caused by: failed to render 'index.html': Variable `x` not found"
        );
        // Each message appears once.
        assert_eq!(
            lines.iter().filter(|l| l.contains("failed to render")).count(),
            1
        );
    }
}
