use clap::{Parser, Subcommand, ValueEnum};
use folio::collections::{
    CaseFilter, build_flat_collection, filter_by_category, limit, search_by_title,
};
use folio::content::ContentKind;
use folio::{config, generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for personal portfolios")]
#[command(long_about = "\
Static site generator for personal portfolios

Articles, projects and case studies are markdown files with YAML front
matter. Drafts and hidden items are never published; everything else is
listed newest first.

Content structure:

  content/
  ├── config.toml            # Site config (optional)
  ├── sections.config.json   # Home page section toggles (optional)
  ├── sections/sobre.md      # Markdown for a home page section (optional)
  ├── artigos/               # Articles (category tabs + category pages)
  │   └── guia.md
  ├── projetos/              # Projects
  └── casos/                 # Case studies

Front matter:

  ---
  title: Guia completo       # required
  date: 2024-02-01           # newest first; missing dates sort last
  category: [guia, dev]      # one tag or a list
  summary: Tudo sobre o tema
  draft: true                # never published
  visible: false             # also: \"no\", \"off\", \"0\", \"hidden\"
  ---

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".folio-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Articles,
    Projects,
    CaseStudies,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Articles => ContentKind::Articles,
            KindArg::Projects => ContentKind::Projects,
            KindArg::CaseStudies => ContentKind::CaseStudies,
        }
    }
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Case-insensitive text to find in titles and summaries (empty = all)
    #[arg(default_value = "")]
    term: String,

    /// Collection to search
    #[arg(long, value_enum, default_value = "articles")]
    kind: KindArg,

    /// Only items tagged with this category
    #[arg(long)]
    category: Option<String>,

    /// Case studies: exact modalidade
    #[arg(long, default_value = "")]
    modalidade: String,

    /// Case studies: formato contains
    #[arg(long, default_value = "")]
    formato: String,

    /// Case studies: objetivo contains
    #[arg(long, default_value = "")]
    objetivo: String,

    /// Show at most this many results
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the HTML site from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Search visible items, newest first
    Search(SearchArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let manifest_path = cli.temp_dir.join("manifest.json");

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir, &manifest_path)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let report = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir, &manifest_path)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Search(args) => {
            let manifest = scan::scan(&cli.source)?;
            let kind = ContentKind::from(args.kind);
            let flat = build_flat_collection(manifest.items(kind));

            let mut results = search_by_title(flat.iter().copied(), &args.term);
            if let Some(category) = &args.category {
                results = filter_by_category(results, category);
            }
            let case_filter = CaseFilter {
                modalidade: args.modalidade,
                formato: args.formato,
                objetivo: args.objetivo,
            };
            if !case_filter.is_empty() {
                results.retain(|item| case_filter.matches(item));
            }
            let shown = limit(&results, args.limit.unwrap_or(usize::MAX));
            output::print_search_results(shown);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn write_manifest(
    manifest: &scan::Manifest,
    temp_dir: &Path,
    manifest_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(manifest_path, json)?;
    Ok(())
}
