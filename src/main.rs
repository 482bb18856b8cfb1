use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use toolsite::pipeline::{self, PipelineError};
use toolsite::{config, output};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "toolsite")]
#[command(about = "Static site generator for tool catalogs")]
#[command(long_about = "\
Static site generator for tool catalogs

Renders a YAML catalog of tools into a static website with Tera templates,
then copies the site's static assets next to it. Run with no arguments from
the project root to build.

Project structure (stock layout):

  site/
  ├── tools/                       # Project root (run from here)
  │   ├── site.toml                # Optional config
  │   ├── data/
  │   │   ├── tools.yaml           # Catalog: *_tools lists + categories
  │   │   └── tool_pages/          # One YAML per detail page
  │   │       └── canva.yaml       # tool: {category, slug}, content: {...}
  │   └── templates/
  │       ├── index.html           # Homepage
  │       └── tool_page.html       # Detail page
  ├── css/ images/ js/ pages/      # Copied into output/
  ├── manifest.json robots.txt sitemap.xml
  └── output/                      # Generated site

Run 'toolsite gen-config' to print a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Project root; paths in site.toml resolve against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/site.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site (the default)
    Build,
    /// Load and aggregate the catalog, print statistics, write nothing
    Check,
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Build) {
        Command::Build => build(&cli.root, cli.config.as_deref()),
        Command::Check => check(&cli.root, cli.config.as_deref()),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_fatal_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toolsite=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_site_config(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<config::SiteConfig, PipelineError> {
    let site_config = match config_path {
        Some(path) => config::load_named_config(path)?,
        None => config::load_config(&root.join(config::CONFIG_FILE))?,
    };
    Ok(site_config)
}

fn build(root: &Path, config_path: Option<&Path>) -> Result<(), PipelineError> {
    output::print_banner();
    let site_config = load_site_config(root, config_path)?;
    let report = pipeline::build(&site_config, root, &mut |event| {
        output::print_build_event(&event);
    })?;
    output::print_build_summary(&report);
    Ok(())
}

fn check(root: &Path, config_path: Option<&Path>) -> Result<(), PipelineError> {
    let site_config = load_site_config(root, config_path)?;
    let catalog = pipeline::load_catalog(&site_config, root)?;
    let data_file = site_config.resolve_paths(root).data_file;
    output::print_check_output(catalog.stats(), &data_file);
    Ok(())
}
