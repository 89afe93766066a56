// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use doc_explorer::utils::logging::{
    format_error, format_info, format_outline, format_success, format_warning,
};
use doc_explorer::{
    Config, ExplorerSession, JsonExporter, MarkdownRenderer, OutlineBuilder,
    ProgressTracker, SectionLocator, Validator,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "doc_explorer")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Explore API documentation: outlines, cited passages and RAG answers", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table of contents of a local markdown file
    Outline {
        file: PathBuf,

        /// Title the page is displayed under; a matching top heading is dropped
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Find where an html fragment sits in a rendered markdown file
    Locate {
        file: PathBuf,

        #[arg(long, conflicts_with = "fragment_file", required_unless_present = "fragment_file")]
        fragment: Option<String>,

        #[arg(long, value_name = "FILE")]
        fragment_file: Option<PathBuf>,
    },

    /// List the pages the backend knows for a documentation site
    List {
        url: String,

        /// Only show pages whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Fetch one page from the backend and print its outline
    Page {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Ask a question answered from the indexed documentation
    Ask {
        query: String,

        /// Highlight each cited source inside this page
        #[arg(long, value_name = "PAGE_ID")]
        page: Option<String>,
    },

    /// Show the documentation chunks retrieved for a query
    Retrieve { query: String },

    /// Fetch every page of a documentation site and export it as JSON
    Export {
        url: String,

        #[arg(short, long, default_value = "./exports")]
        output: PathBuf,

        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    doc_explorer::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Outline { file, title, json } => {
            cmd_outline(&config, &file, title.as_deref(), json)?;
        }
        Commands::Locate {
            file,
            fragment,
            fragment_file,
        } => {
            cmd_locate(&config, &file, fragment, fragment_file)?;
        }
        Commands::List { url, search } => {
            cmd_list(&config, &url, search.as_deref()).await?;
        }
        Commands::Page { id, json } => {
            cmd_page(&config, &id, json).await?;
        }
        Commands::Ask { query, page } => {
            cmd_ask(&config, &query, page.as_deref()).await?;
        }
        Commands::Retrieve { query } => {
            cmd_retrieve(&config, &query).await?;
        }
        Commands::Export {
            url,
            output,
            pretty,
        } => {
            cmd_export(&config, &url, output, pretty).await?;
        }
    }

    Ok(())
}

fn read_markdown(file: &Path) -> Result<String> {
    if let Err(e) = Validator::validate_markdown_extension(file) {
        warn!("{}", e);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn cmd_outline(config: &Config, file: &Path, title: Option<&str>, json: bool) -> Result<()> {
    let markdown = read_markdown(file)?;
    let forest = OutlineBuilder::from_config(&config.outline).build(&markdown, title);

    if json {
        println!("{}", serde_json::to_string_pretty(&forest)?);
    } else if forest.is_empty() {
        println!("{}", format_warning("No headings found"));
    } else {
        print!("{}", format_outline(&forest));
    }

    Ok(())
}

fn cmd_locate(
    config: &Config,
    file: &Path,
    fragment: Option<String>,
    fragment_file: Option<PathBuf>,
) -> Result<()> {
    let markdown = read_markdown(file)?;
    let fragment = match (fragment, fragment_file) {
        (Some(fragment), _) => fragment,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("Either --fragment or --fragment-file is required"),
    };

    let document = MarkdownRenderer::new().render(&markdown);
    let locator = SectionLocator::from_config(&config.locator);

    match locator.locate(&document, &fragment) {
        Some(highlight) => {
            println!(
                "{}",
                format_success(&format!(
                    "Matched {} block(s) starting at block {} ({:?})",
                    highlight.range.len, highlight.range.start, highlight.strategy
                ))
            );
            for id in &highlight.block_ids {
                if let Some(block) = document.block(id) {
                    println!(
                        "  [{}] <{}> {} {}",
                        block.index,
                        block.tag,
                        block.id,
                        Validator::truncate_text(block.text.trim(), 60)
                    );
                }
            }
        }
        None => println!("{}", format_warning("No matching elements found")),
    }

    Ok(())
}

async fn cmd_list(config: &Config, url: &str, search: Option<&str>) -> Result<()> {
    let session = ExplorerSession::from_config(config)?;
    let pages = session
        .client()
        .list_pages(url)
        .await
        .context("Failed to fetch documentation paths")?;

    let indices = match search {
        Some(query) => ExplorerSession::search_pages(&pages, query),
        None => (0..pages.len()).collect(),
    };

    println!("{}", format_info(&format!("{} page(s) for {}", indices.len(), url)));
    for idx in indices {
        let page = &pages[idx];
        println!("  {:<24} {} {}", page.id, page.title, page.path);
    }

    Ok(())
}

async fn cmd_page(config: &Config, id: &str, json: bool) -> Result<()> {
    let session = ExplorerSession::from_config(config)?;

    if let Err(e) = session.load_page(id).await {
        println!("{}", format_error(&e.to_string()));
        return Err(e).context("Failed to fetch documentation page");
    }

    let outline = session.outline();
    if json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
        return Ok(());
    }

    if let Some(page) = session.markdown_store().page() {
        println!("{}", format_info(&format!("{} ({})", page.title, page.url)));
    }
    print!("{}", format_outline(&outline));

    Ok(())
}

async fn cmd_ask(config: &Config, query: &str, page_id: Option<&str>) -> Result<()> {
    let session = ExplorerSession::from_config(config)?;

    if let Some(id) = page_id
        && let Err(e) = session.load_page(id).await
    {
        warn!("Citations will not be highlighted: {}", e);
    }

    let reply = session.ask(query).await;
    println!("{}", reply.format_summary(2000));

    if page_id.is_some() {
        for source in &reply.sources {
            match session.highlight_source(source) {
                Some(highlight) => println!(
                    "{}",
                    format_success(&format!(
                        "{} -> block {} ({} block(s))",
                        Validator::truncate_text(&source.text, 40),
                        highlight.range.start,
                        highlight.block_ids.len()
                    ))
                ),
                None => println!(
                    "{}",
                    format_warning(&format!(
                        "{} not found in page",
                        Validator::truncate_text(&source.text, 40)
                    ))
                ),
            }
        }
    }

    Ok(())
}

async fn cmd_retrieve(config: &Config, query: &str) -> Result<()> {
    let session = ExplorerSession::from_config(config)?;

    match session.retrieve(query).await {
        Some(message) => println!("{}", message.format_summary(300)),
        None => println!("{}", format_error("Failed to fetch RAG chunks")),
    }

    Ok(())
}

async fn cmd_export(config: &Config, url: &str, output: PathBuf, pretty: bool) -> Result<()> {
    let start_time = Instant::now();
    let session = ExplorerSession::from_config(config)?;

    // sized by fetch_all once the site has been listed
    let tracker = ProgressTracker::new(0);

    let (pages, stats) = session
        .fetch_all(url, Some(&tracker))
        .await
        .context("Failed to fetch documentation")?;

    let exporter = JsonExporter::new(output)?;
    let manifest = exporter.export_all(
        &pages,
        &OutlineBuilder::from_config(&config.outline),
        pretty,
    )?;

    info!(
        "Export complete in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    println!("{}", format_success(&stats.summary()));
    println!(
        "{}",
        format_info(&format!(
            "{} file(s) written to {}",
            manifest.files.len(),
            exporter.output_dir().display()
        ))
    );

    Ok(())
}
