// CSV ingestion CLI for the Joy of Painting datasets.
// Each file runs in its own transaction; a fatal failure rolls that file
// back, logs, and exits non-zero. Already-committed files stay committed.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use joy_of_painting::util::env as env_util;
use joy_of_painting::{ingest, Db};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ingest", version, about = "Joy of Painting CSV ingestion CLI")]
struct Cli {
    /// Optional override for the database URL (defaults to DATABASE_URL)
    #[arg(long, global = true)]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Ingest the paintings/episodes/colors CSV
    Paintings { file: PathBuf },
    /// Ingest the free-text episode air-date listing
    AirDates { file: PathBuf },
    /// Ingest the subject-matter feature matrix
    Features { file: PathBuf },
    /// Run all three ingestors sequentially, each in its own transaction
    All {
        #[arg(long)]
        paintings: PathBuf,
        #[arg(long)]
        air_dates: PathBuf,
        #[arg(long)]
        features: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    env_util::init_env();
    let cli = Cli::parse();

    let database_url = match cli.db_url {
        Some(url) => url,
        None => env_util::db_url()?,
    };
    let max_connections: u32 = env_util::env_parse("DB_MAX_CONNS", 5u32);
    let db = Db::connect(&database_url, max_connections).await?;

    match cli.command {
        Command::Paintings { file } => {
            let summary = ingest::paintings::run(&db, &file).await?;
            info!(?summary, "paintings ingestion complete");
        }
        Command::AirDates { file } => {
            let summary = ingest::air_dates::run(&db, &file).await?;
            info!(?summary, "air-date ingestion complete");
        }
        Command::Features { file } => {
            let summary = ingest::features::run(&db, &file).await?;
            info!(?summary, "feature ingestion complete");
        }
        Command::All {
            paintings,
            air_dates,
            features,
        } => {
            let p = ingest::paintings::run(&db, &paintings).await?;
            let a = ingest::air_dates::run(&db, &air_dates).await?;
            let f = ingest::features::run(&db, &features).await?;
            info!(
                paintings = ?p,
                air_dates = ?a,
                features = ?f,
                "full ingestion complete"
            );
        }
    }

    Ok(())
}
