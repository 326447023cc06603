//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::{SqliteService, TraceStore};
use crate::domain::{TraceIngestService, TraceQueryService};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub database: Arc<SqliteService>,
    pub ingest: TraceIngestService,
    pub query: TraceQueryService,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let (cli_config, command) = cli::parse();
        Self::init_logging(cli_config.debug);

        tracing::debug!("Application starting");
        // `start` is the only command and also the default
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init(&config).await?;

        let database = Arc::new(
            SqliteService::init(&storage, &config.database)
                .await
                .context("Failed to initialize SQLite trace store")?,
        );

        let store: Arc<dyn TraceStore> = Arc::new(Arc::clone(&database));
        let ingest = TraceIngestService::new(Arc::clone(&store));
        let query = TraceQueryService::new(store);

        let shutdown = ShutdownService::new(Arc::clone(&database));

        Ok(Self {
            shutdown,
            config,
            storage,
            database,
            ingest,
            query,
        })
    }

    fn init_logging(debug: bool) {
        let default_filter = if debug {
            format!("info,{}=debug,tower_http=debug", APP_NAME_LOWER)
        } else {
            format!("info,{}=info", APP_NAME_LOWER)
        };

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        tracing::info!(
            host = %app.config.server.host,
            port = app.config.server.port,
            data_dir = %app.storage.data_dir().display(),
            "Tracekeep starting"
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_checkpoint_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
