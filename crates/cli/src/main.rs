//! blob-log CLI
//!
//! - emit: write messages through the buffered remote logger
//! - cat: print a remote log object
//! - check: verify the store is reachable and the container exists

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, reload};

use blob_log_application::observability::DEFAULT_CHANNEL_CAPACITY;
use blob_log_application::{BlobLogLayer, LoggerProvider, blob_log_layer};
use blob_log_domain::shared_kernel::{BlobLogConfig, ConfigLoader, LogLevel};
use blob_log_domain::storage::{BlobStore, BlobStoreConnector};
use blob_log_infrastructure::DefaultBlobStoreConnector;

#[derive(Parser, Debug)]
#[command(name = "blob-log")]
#[command(about = "Buffered logger persisting to a remote blob", long_about = None)]
#[command(version)]
struct Cli {
    /// .env file loaded before reading the environment
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Container holding the log objects (default: BLOB_LOG_CONTAINER or "logs")
    #[arg(short, long, global = true)]
    container: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write messages to a fresh log object
    Emit {
        /// Level of every message (DEBUG, INFO, WARNING, ERROR, CRITICAL)
        #[arg(short, long, default_value = "INFO")]
        level: LogLevel,
        /// Wrap the messages in a START/END banner with this name
        #[arg(short, long)]
        section: Option<String>,
        #[arg(required = true)]
        messages: Vec<String>,
    },
    /// Print the content of a log object
    Cat { object: String },
    /// Check connectivity and create the container if missing
    Check,
}

/// Slot for the remote bridge, filled once the logger exists
type BridgeHandle = reload::Handle<Option<BlobLogLayer>, Registry>;

fn setup_logging() -> BridgeHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (bridge, handle) = reload::Layer::new(None::<BlobLogLayer>);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(bridge)
        .with(fmt_layer)
        .init();

    handle
}

#[tokio::main]
async fn main() -> Result<()> {
    let bridge = setup_logging();

    let cli = Cli::parse();
    let config = ConfigLoader::new(cli.env_file.clone())
        .load_blob_log_config()
        .context("Failed to load configuration")?;
    let container = cli
        .container
        .clone()
        .unwrap_or_else(|| config.container.clone());

    match cli.command {
        Commands::Emit {
            level,
            section,
            messages,
        } => {
            emit(
                config,
                &container,
                level,
                section.as_deref(),
                &messages,
                &bridge,
            )
            .await
        }
        Commands::Cat { object } => cat(&config, &container, &object).await,
        Commands::Check => check(&config, &container).await,
    }
}

async fn emit(
    config: BlobLogConfig,
    container: &str,
    level: LogLevel,
    section: Option<&str>,
    messages: &[String],
    bridge: &BridgeHandle,
) -> Result<()> {
    let provider = LoggerProvider::new(config, Arc::new(DefaultBlobStoreConnector::default()));
    let logger = provider
        .get_or_init(Some(container))
        .await
        .context("Failed to initialize remote logger")?;

    let (layer, forwarder) = blob_log_layer(logger.clone(), DEFAULT_CHANNEL_CAPACITY);
    bridge
        .reload(Some(layer))
        .context("Failed to install tracing bridge")?;
    let forwarding = forwarder.spawn();

    if let Some(name) = section {
        logger.log_section_boundary(name, true).await?;
    }
    for message in messages {
        logger.log(level, message.as_str()).await?;
    }
    if let Some(name) = section {
        logger.log_section_boundary(name, false).await?;
    }

    // Dropping the layer closes the channel; the forwarder drains it and closes the logger
    bridge
        .reload(None::<BlobLogLayer>)
        .context("Failed to remove tracing bridge")?;
    forwarding.await.context("Tracing bridge task failed")?;

    provider
        .shutdown()
        .await
        .context("Failed to flush remote log")?;

    if let Some(object) = provider.current_object_name() {
        println!("{}", object);
    }
    Ok(())
}

fn connect(config: &BlobLogConfig) -> Result<Arc<dyn BlobStore>> {
    let connection_string = config.require_connection_string()?;
    let store = DefaultBlobStoreConnector::default().connect(connection_string)?;
    Ok(store)
}

async fn cat(config: &BlobLogConfig, container: &str, object: &str) -> Result<()> {
    let store = connect(config)?;
    let content = store
        .read_object(container, object)
        .await
        .with_context(|| format!("Failed to read {}/{}", container, object))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&content)?;
    stdout.flush()?;
    Ok(())
}

async fn check(config: &BlobLogConfig, container: &str) -> Result<()> {
    let store = connect(config)?;
    info!(backend = store.backend_name(), container, "Checking blob store");

    if store.container_exists(container).await? {
        println!("Container '{}' is reachable", container);
        return Ok(());
    }

    match store.create_container(container).await {
        Ok(()) => println!("Container '{}' created", container),
        Err(e) if e.is_already_exists() => println!("Container '{}' is reachable", container),
        Err(e) => return Err(e).context(format!("Failed to create container '{}'", container)),
    }
    Ok(())
}
