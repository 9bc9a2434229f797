use clap::{Parser, Subcommand};
use kutty_site::{config, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("KUTTY_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("KUTTY_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "kutty-site")]
#[command(about = "Static renderer for the KuttyTeachers site")]
#[command(long_about = "\
Static renderer for the KuttyTeachers site

Hand-written HTML pages are shells: they carry mount points (elements with
known ids) that the renderer fills with the shared navigation and footer,
the gardening guide, and the photo gallery. Every view state (a category filter, an open plant,
an open photo) becomes its own static page.

Source structure:

  site/
  ├── config.toml          # Site config (optional, merged over defaults)
  ├── index.html           # Shell: chrome only
  ├── gardening.html       # Shell with plants-grid / category-filter
  ├── plants-data.json     # { categories, plants }
  ├── photography.html     # Shell with albums-container
  ├── photos.json          # { albums }
  └── images/              # Any other file is copied verbatim

Set RUST_LOG (e.g. RUST_LOG=debug) for detailed logs.

Run 'kutty-site gen-config' to print a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory holding shells, data and assets
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every shell into static pages and copy assets
    Build,
    /// Validate config, shells and data documents without writing
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let report = generate::generate(&cli.source, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let checks = generate::check(&cli.source)?;
            output::print_check_output(&checks);
            if output::all_data_ready(&checks) {
                println!("==> Site is valid");
            } else {
                return Err("one or more data documents failed to load".into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
