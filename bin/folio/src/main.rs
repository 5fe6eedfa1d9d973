//! Folio CLI
//!
//! Markdown blog server with a generated sitemap.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(name = "folio", version, about = "A small Markdown blog server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the blog over HTTP
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Development mode: show drafts
        #[arg(long)]
        dev: bool,
    },
    /// Print or write sitemap.xml
    Sitemap {
        /// Site origin (e.g., https://example.com); defaults to site.base_url
        #[arg(long)]
        origin: Option<String>,
        /// Include drafts
        #[arg(long)]
        dev: bool,
        /// Output file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { host, port, dev } => {
            folio::cmd::serve::run(&cli.config, host.as_deref(), port, dev).await?;
        }
        Commands::Sitemap {
            origin,
            dev,
            output,
        } => {
            folio::cmd::sitemap::run(&cli.config, origin.as_deref(), dev, output.as_deref())?;
        }
        Commands::Check { strict } => {
            folio::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
