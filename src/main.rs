// file: src/main.rs
// description: commandline application entry point with command handling

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use content_enhancer::utils::logging::{format_error, format_success, format_warning};
use content_enhancer::{
    BatchOrchestrator, Config, ContentItem, DomRendererFactory, Renderer, RendererFactory,
    RendererPool, TogetherClient, Validator,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "content_enhancer")]
#[command(version = "0.1.0")]
#[command(about = "Concurrent research-and-enhance pipeline for short social posts", long_about = None)]
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
    /// Enhance a JSON batch of content items
    Enhance {
        /// JSON file containing an array of {"id", "content"} items
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Where to write the JSON results (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Extra instruction appended to the enhancement prompt
        #[arg(long)]
        instruction: Option<String>,
    },

    /// Launch one renderer and extract a known page, to sanity-check setup
    Verify {
        #[arg(long, default_value = "https://example.com")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    content_enhancer::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Enhance {
            input,
            output,
            instruction,
        } => run_enhance(config, input, output, instruction).await,
        Commands::Verify { url } => run_verify(config, &url).await,
    }
}

async fn run_enhance(
    config: Config,
    input: PathBuf,
    output: Option<PathBuf>,
    instruction: Option<String>,
) -> Result<()> {
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read batch file {}", input.display()))?;
    let items: Vec<ContentItem> =
        serde_json::from_str(&raw).context("Batch file is not a JSON array of items")?;

    let synthesizer =
        Arc::new(TogetherClient::new(&config.synthesis).context("Synthesis client setup failed")?);
    let factory = DomRendererFactory::new(&config.fetch);
    let pool = Arc::new(RendererPool::initialize(&factory, &config.pool).await);
    if pool.is_degraded() {
        warn!(
            usable = pool.usable(),
            capacity = pool.capacity(),
            "running with a degraded renderer pool"
        );
    }

    let orchestrator = BatchOrchestrator::new(pool.clone(), synthesizer, &config)
        .context("Orchestrator setup failed")?;

    // The pool must be torn down on termination signals so no renderer
    // instance outlives the process.
    let outcome = tokio::select! {
        outcome = orchestrator.run_batch(items, instruction.as_deref()) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", format_warning("Interrupted, shutting down renderer pool"));
            pool.shutdown().await;
            return Ok(());
        }
    };

    pool.shutdown().await;

    let json = serde_json::to_string_pretty(&outcome)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }

    let message = format!(
        "Processed {} items - Success: {}, Errors: {}",
        outcome.summary.total, outcome.summary.succeeded, outcome.summary.failed
    );
    if outcome.summary.failed == 0 {
        eprintln!("{}", format_success(&message));
    } else {
        eprintln!("{}", format_warning(&message));
    }

    Ok(())
}

async fn run_verify(config: Config, url: &str) -> Result<()> {
    Validator::validate_url(url).context("Verification URL must be http(s)")?;

    let factory = DomRendererFactory::new(&config.fetch);
    let renderer = match factory.launch().await {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("{}", format_error(&format!("Renderer failed to start: {e}")));
            return Err(e.into());
        }
    };

    let timeout = Duration::from_millis(config.fetch.page_load_timeout_ms);
    match renderer.render_page(url, timeout).await {
        Ok(text) => {
            eprintln!(
                "{}",
                format_success(&format!("Rendered {} chars from {url}", text.len()))
            );
        }
        Err(e) => {
            eprintln!("{}", format_error(&format!("Rendering failed: {e}")));
            renderer.close().await.ok();
            return Err(e.into());
        }
    }

    renderer.close().await.ok();
    Ok(())
}
