use clap::{Parser, Subcommand};
use frogtales_seo::{SeoManager, config, content, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "frogtales-seo")]
#[command(about = "Search and social metadata for Frogtales")]
#[command(long_about = "\
Search and social metadata for Frogtales

Reads pages and Markdown articles from a content directory and writes the
SEO artifacts the site serves: sitemap.xml, robots.txt, Blog JSON-LD, and a
<head> fragment per page and article.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── pages.toml                   # [[page]] tables: title, path, sitemap hints
  └── articles/
      ├── pond-life.md             # +++ TOML front matter +++ then Markdown
      └── 2024/
          └── spring-chorus.md     # Subdirectories are walked too

Set RUST_LOG=debug for per-file logging.

Run 'frogtales-seo gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score and validate every page and article
    Check,
    /// Write sitemap, robots.txt, JSON-LD, and head fragments
    Build {
        /// Extra line appended to robots.txt (repeatable)
        #[arg(long = "extra")]
        extra: Vec<String>,
    },
    /// Score a single article file
    Score {
        /// Markdown article with front matter
        file: PathBuf,
    },
    /// Print robots.txt
    Robots {
        /// Extra line appended after the sitemap reference (repeatable)
        #[arg(long = "extra")]
        extra: Vec<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let content = content::load(&cli.source)?;
            let seo = SeoManager::new(content.config.clone())?;
            let report = output::check_content(&content, &seo);
            output::print_check_output(&report);
            let failing = report.failing();
            if failing > 0 {
                return Err(format!("{failing} entries failed validation").into());
            }
            println!("==> Content is valid");
        }
        Command::Build { extra } => {
            println!("==> Loading {}", cli.source.display());
            let content = content::load(&cli.source)?;
            let seo = SeoManager::new(content.config.clone())?;
            let report = generate::generate(&content, &seo, &cli.output, &extra)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Score { file } => {
            let seo = SeoManager::new(config::load_config(&cli.source)?)?;
            let article = content::load_article(&file)?;
            let entry = output::score_article(&seo, &article, &file.display().to_string());
            output::print_score(&entry);
        }
        Command::Robots { extra } => {
            let seo = SeoManager::new(config::load_config(&cli.source)?)?;
            println!("{}", seo.generate_robots_txt(&extra));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so command output on stdout stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
