//! CLI binary for kitchen-sakhi.
//!
//! A thin shim over the library crate: `serve` maps flags onto
//! `ServiceConfig` and runs the HTTP service; `export` lays a local text
//! file out into a PDF without a server, model or database.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kitchen_sakhi::{paginate, render_pdf, serve, PageGeometry, ServiceConfig};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the service against a local MongoDB (GEMINI_API_KEY must be set)
  kitchen-sakhi serve

  # Different port and store
  kitchen-sakhi serve --port 8080 --mongo-uri mongodb://db:27017/

  # Turn a saved plan into a PDF offline
  kitchen-sakhi export plan.txt -o plan.pdf
  cat plan.txt | kitchen-sakhi export - -o plan.pdf

ENVIRONMENT:
  GEMINI_API_KEY   Model credential (read once at startup)
  MONGO_URI        Document store connection string
  RUST_LOG         Log filter, e.g. kitchen_sakhi=debug
"#;

/// Meal suggestions, weekly meal plans and PDF exports over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "kitchen-sakhi",
    version,
    about = "Meal suggestions, weekly meal plans and PDF exports over HTTP",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "KITCHEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "KITCHEN_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Paginate a text file into a PDF.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "KITCHEN_HOST", default_value = "0.0.0.0")]
    host: String,

    /// TCP port.
    #[arg(short, long, env = "PORT", default_value_t = 5001)]
    port: u16,

    /// MongoDB connection string.
    #[arg(long, env = "MONGO_URI", default_value = kitchen_sakhi::config::DEFAULT_MONGO_URI)]
    mongo_uri: String,

    /// Database holding the history collections.
    #[arg(long, env = "KITCHEN_DATABASE", default_value = "KitchenSakhi")]
    database: String,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(long, env = "KITCHEN_PROVIDER", default_value = "gemini")]
    provider: String,

    /// Model ID passed to the provider.
    #[arg(long, env = "KITCHEN_MODEL", default_value = "gemini-1.5-flash")]
    model: String,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "KITCHEN_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max output tokens per generation.
    #[arg(long, env = "KITCHEN_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// Directory exported PDFs are written to and served from.
    #[arg(long, env = "KITCHEN_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Absolute base URL used in returned download links.
    #[arg(long, env = "PUBLIC_BASE_URL")]
    public_url: Option<String>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Text file to lay out, or `-` for stdin.
    input: String,

    /// Where to write the PDF.
    #[arg(short, long, default_value = "plan.pdf")]
    output: PathBuf,

    /// Line height in points.
    #[arg(long, default_value_t = PageGeometry::A4.line_height)]
    line_height: f32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Export(args) => run_export(args).await,
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut builder = ServiceConfig::builder()
        .host(args.host)
        .port(args.port)
        .mongo_uri(args.mongo_uri)
        .database(args.database)
        .provider_name(args.provider)
        .model(args.model)
        .temperature(args.temperature)
        .max_tokens(args.max_tokens)
        .static_dir(args.static_dir);
    if let Some(url) = args.public_url {
        builder = builder.public_base_url(url);
    }
    let config = builder.build().context("Invalid configuration")?;

    serve(config).await.context("Service failed")
}

async fn run_export(args: ExportArgs) -> Result<()> {
    let text = if args.input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(&args.input)
            .await
            .with_context(|| format!("Failed to read '{}'", args.input))?
    };

    let geometry = PageGeometry {
        line_height: args.line_height,
        ..PageGeometry::A4
    };
    geometry.validate().context("Invalid page geometry")?;

    let sequence = paginate(&text, &geometry);
    let (pages, lines) = (sequence.page_count(), sequence.line_count());
    let bytes = render_pdf(sequence).await.context("PDF generation failed")?;

    tokio::fs::write(&args.output, &bytes)
        .await
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;

    info!(
        "Wrote {} ({} lines on {} pages, {} bytes)",
        args.output.display(),
        lines,
        pages,
        bytes.len()
    );
    Ok(())
}
