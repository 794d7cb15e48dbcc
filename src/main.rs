// ABOUTME: Entry point for the steeple binary.
// ABOUTME: Parses CLI arguments, initializes tracing, recovers interrupted publishes, and runs a subcommand.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use steeple_agent::create_analyzer;
use steeple_store::{Repository, export_backup, import_backup, parse_backup, recover_interrupted_batch};
use steeple_server::{AppState, SteepleConfig, create_router};

#[derive(Parser)]
#[command(name = "steeple")]
#[command(about = "Church website content store with admin publishing and backups")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default)
    Serve {
        /// Address to listen on, overriding STEEPLE_BIND
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Write a backup document of the whole site
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace everything with the contents of a backup document
    Import {
        file: PathBuf,
        /// Confirm that all current content will be overwritten
        #[arg(long)]
        yes: bool,
    },
    /// Print the site configuration merged with defaults
    Config,
    /// Finish a publish that was interrupted mid-write
    Recover,
}

fn open_repository(config: &SteepleConfig) -> anyhow::Result<Repository> {
    let store = config.open_store().context("cannot open storage")?;
    let repo = Repository::new(store).with_latency(config.latency);
    recover(&repo)?;
    Ok(repo)
}

fn recover(repo: &Repository) -> anyhow::Result<()> {
    match recover_interrupted_batch(repo.store()).context("cannot recover interrupted publish")? {
        Some(report) => tracing::warn!(
            batch_id = %report.batch_id,
            keys = report.keys_rolled_forward.len(),
            "rolled forward an interrupted publish"
        ),
        None => tracing::debug!("no interrupted publish found"),
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    use std::io::Write;

    eprint!("{}", prompt);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn serve(config: SteepleConfig, bind: Option<SocketAddr>) -> anyhow::Result<()> {
    let repo = open_repository(&config)?;
    let analyzer = create_analyzer(config.analyzer)?;
    let state = Arc::new(AppState::new(repo, analyzer, config.analysis_timeout));
    let app = create_router(state);

    let addr = bind.unwrap_or(config.bind);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    tracing::info!("steeple listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("steeple=debug,tower_http=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SteepleConfig::from_env()?;

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => serve(config, bind).await?,
        Command::Export { out } => {
            let repo = open_repository(&config)?;
            let doc = export_backup(&repo).await;
            let text = serde_json::to_string_pretty(&doc)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    tracing::info!("backup written to {}", path.display());
                }
                None => println!("{}", text),
            }
        }
        Command::Import { file, yes } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let doc = parse_backup(&text)?;
            if !yes && !confirm(&format!(
                "Restore the backup from {}? This overwrites all current content. [y/N] ",
                doc.timestamp
            ))? {
                anyhow::bail!("import cancelled");
            }
            let repo = open_repository(&config)?;
            let batch_id = import_backup(&repo, &doc).await?;
            tracing::info!(batch_id = %batch_id, "backup from {} restored", doc.timestamp);
        }
        Command::Config => {
            let repo = open_repository(&config)?;
            let site = repo.get_site_config().await;
            println!("{}", serde_json::to_string_pretty(&site)?);
        }
        Command::Recover => {
            let store = config.open_store().context("cannot open storage")?;
            recover(&Repository::new(store))?;
        }
    }

    Ok(())
}
