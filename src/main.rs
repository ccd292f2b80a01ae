use clap::{Parser, Subcommand};
use quire::{config, output, site};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Static site generator for Markdown notebooks")]
#[command(long_about = "\
Static site generator for Markdown notebooks

Your filesystem is the data source. Top-level Markdown files become pages,
each top-level folder becomes a dated listing of its pages, and front-matter
tags are gathered into one tag page.

Content structure:

  content/
  ├── config.json                  # Site config (optional)
  ├── index.md                     # Landing page (required)
  ├── 404.md                       # Not-found page (optional)
  ├── static/                      # Copied to site/static/
  ├── imgs/                        # Copied to site/imgs/
  ├── about.md                     # Page → about.html
  └── notes/                       # Folder → notes/index.html
      ├── index.md                 # Folder intro (optional)
      └── first.md                 # Page → notes/first.html

Front-matter (all keys optional):

  ---
  title: First post
  date: 2024-01-05
  tags: [travel, film]
  ---

Image layouts are set by the end of the image title:
  ![](imgs/a.jpg \"Caption, fit\")     fit | pano | pair | pair_h | pair_v

Set RUST_LOG=debug to log every file written.

Run 'quire gen-config' to print the stock config.json.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(short, long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory. WARNING: removed and recreated on every build
    #[arg(short, long, default_value = "site", global = true)]
    destination: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site, replacing the destination directory
    Build,
    /// Validate the content directory without building
    Check,
    /// Print a stock config.json with every option at its default
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise only warnings
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build => {
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.destination.display()
            );
            let report = site::build(&cli.source, &cli.destination)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", report.destination.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = site::check(&cli.source)?;
            output::print_check_output(&report);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            println!("{}", config::stock_config_json()?);
        }
    }

    Ok(())
}
