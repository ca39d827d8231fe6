//! mvb-cli - terminal movie browser
//!
//! Startup order:
//! 1. parse arguments and read the TOML config
//! 2. initialize tracing (stderr, so menus on stdout stay readable), then
//!    report how the config was obtained
//! 3. resolve the root folder and open the database
//! 4. seed the catalog if the database is new
//! 5. run the interactive session on stdin/stdout

use anyhow::{Context, Result};
use clap::Parser;
use mvb_cli::catalog::load_catalog_if_empty;
use mvb_cli::{Prompt, Session};
use mvb_common::config::{self, TomlConfig};
use mvb_common::db;
use mvb_rec::{Recommender, SqliteCatalog};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mvb-cli")]
#[command(about = "Terminal movie browser with content-similarity recommendations")]
#[command(version)]
struct Args {
    /// Folder holding movie-records.db (overrides MVB_ROOT_FOLDER and the config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: $MVB_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog CSV used when the database has no movies yet
    #[arg(long, env = "MVB_CATALOG")]
    catalog: Option<PathBuf>,

    /// Fixed shuffle seed for reproducible recommendations
    #[arg(long, env = "MVB_SEED")]
    seed: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (toml_config, config_source) = TomlConfig::load_from(args.config.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting MVB terminal browser (mvb-cli) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    config_source.log();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match db::init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e).context(format!("opening {}", db_path.display()));
        }
    };

    let catalog_csv = args.catalog.or(toml_config.catalog_csv);
    let loaded = load_catalog_if_empty(&pool, catalog_csv.as_deref())
        .await
        .context("loading movie catalog")?;
    if loaded > 0 {
        info!("Imported {} movies", loaded);
    }

    let settings = toml_config.recommendation;
    let store = SqliteCatalog::new(pool.clone());
    let recommender = match args.seed {
        Some(seed) => {
            info!(seed, "Using fixed shuffle seed");
            Recommender::with_seed(store, settings, seed)
        }
        None => Recommender::new(store, settings),
    };

    let stdin = std::io::stdin();
    let prompt = Prompt::new(stdin.lock(), std::io::stdout());
    let mut session = Session::new(pool.clone(), recommender, prompt);
    session.run().await.context("interactive session failed")?;

    pool.close().await;
    Ok(())
}
