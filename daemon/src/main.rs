//! `realm`: pick and follow a realm from the command line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use realm_client::{
    init_logging, ClientConfig, LogFormat, RealmChangeObserver, RealmClient, ShareableLocation,
    ShutdownController,
};
use realm_discovery::{CatalystProber, NodeRegistry};
use realm_types::{ConnectionStatus, ParcelPosition};

#[derive(Parser)]
#[command(name = "realm", about = "Discover catalysts and pick the realm to join")]
struct Cli {
    /// Use this catalyst only, skipping node discovery.
    #[arg(long, env = "REALM_PINNED_NODE", global = true)]
    pinned_node: Option<String>,

    /// Endpoint serving the catalyst list.
    #[arg(long, env = "REALM_BOOTSTRAP_URL", global = true)]
    bootstrap_url: Option<String>,

    /// Registry fallback catalysts (comma-separated).
    #[arg(long, env = "REALM_FALLBACK_NODES", value_delimiter = ',', global = true)]
    fallback_nodes: Vec<String>,

    /// Bound on each health and status probe, in milliseconds.
    #[arg(long, env = "REALM_PROBE_TIMEOUT_MS", global = true)]
    probe_timeout_ms: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "REALM_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "REALM_LOG_FORMAT", global = true)]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run one discovery round and print the candidates as JSON.
    Scan {
        /// Also print the discovery metrics in Prometheus text format.
        #[arg(long)]
        metrics: bool,
    },
    /// Run one discovery round and print the selected realm.
    Select {
        /// Join this realm ("catalyst" or "catalyst-layer") instead of the best one.
        #[arg(long)]
        realm: Option<String>,
    },
    /// Select a realm, then keep moving to where users gather around a parcel.
    Watch {
        /// Parcel x coordinate.
        #[arg(long, allow_hyphen_values = true, requires = "y", required_unless_present = "world_x")]
        x: Option<i32>,
        /// Parcel y coordinate.
        #[arg(long, allow_hyphen_values = true, requires = "x")]
        y: Option<i32>,
        /// World-space x coordinate, converted to its parcel.
        #[arg(long, allow_hyphen_values = true, requires = "world_z", conflicts_with = "x")]
        world_x: Option<f64>,
        /// World-space z coordinate, converted to its parcel.
        #[arg(long, allow_hyphen_values = true, requires = "world_x", conflicts_with = "y")]
        world_z: Option<f64>,
        /// Seconds between crowded-realm checks.
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
        /// URL whose `realm` parameter follows the current realm.
        #[arg(long)]
        share_url: Option<String>,
    },
}

/// The watched parcel, from parcel or world coordinates.
fn watch_position(
    parcel: (Option<i32>, Option<i32>),
    world: (Option<f64>, Option<f64>),
) -> anyhow::Result<ParcelPosition> {
    match (parcel, world) {
        ((Some(x), Some(y)), _) => Ok(ParcelPosition::new(x, y)),
        (_, (Some(x), Some(z))) => Ok(ParcelPosition::from_world(x, z)),
        _ => anyhow::bail!("watch needs --x/--y or --world-x/--world-z"),
    }
}

/// Layer CLI flags and env vars over the file configuration.
fn merge_config(cli: &Cli, file_config: Option<ClientConfig>) -> ClientConfig {
    let base = file_config.unwrap_or_default();
    ClientConfig {
        pinned_node: cli.pinned_node.clone().or(base.pinned_node),
        bootstrap_url: cli.bootstrap_url.clone().or(base.bootstrap_url),
        fallback_nodes: if cli.fallback_nodes.is_empty() {
            base.fallback_nodes
        } else {
            cli.fallback_nodes.clone()
        },
        probe_timeout_ms: cli.probe_timeout_ms.unwrap_or(base.probe_timeout_ms),
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
        log_format: cli.log_format.clone().unwrap_or(base.log_format),
        ..base
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = cli
        .config
        .as_ref()
        .map(|path| ClientConfig::from_toml_file(&path.to_string_lossy()));
    let config = match &file_config {
        Some(Ok(cfg)) => merge_config(&cli, Some(cfg.clone())),
        _ => merge_config(&cli, None),
    };

    let log_format: LogFormat = config.log_format.parse().unwrap_or_default();
    init_logging(log_format, &config.log_level)?;

    match (&cli.config, &file_config) {
        (Some(path), Some(Ok(_))) => tracing::info!("Loaded config from {}", path.display()),
        (Some(path), Some(Err(e))) => {
            tracing::warn!("Failed to load config file {}: {e}, using CLI defaults", path.display())
        }
        _ => {}
    }

    let client = RealmClient::from_config(&config).context("invalid configuration")?;

    match cli.command {
        Command::Scan { metrics } => {
            let candidates = client.discover().await?;
            println!("{}", serde_json::to_string_pretty(&candidates)?);
            if metrics {
                print!("{}", client.metrics().encode()?);
            }
        }
        Command::Select { realm } => {
            let selected = match realm {
                Some(wanted) => client.change_realm(&wanted).await?,
                None => client.select_initial_realm().await?,
            };
            println!("{selected}");
        }
        Command::Watch {
            x,
            y,
            world_x,
            world_z,
            interval_secs,
            share_url,
        } => {
            let position = watch_position((x, y), (world_x, world_z))?;
            let location = share_url.as_deref().map(ShareableLocation::parse).transpose()?;
            watch(
                client,
                position,
                Duration::from_secs(interval_secs.max(1)),
                location,
            )
            .await?;
        }
    }

    Ok(())
}

async fn watch<P, R>(
    client: RealmClient<P, R>,
    position: ParcelPosition,
    interval: Duration,
    location: Option<ShareableLocation>,
) -> anyhow::Result<()>
where
    P: CatalystProber,
    R: NodeRegistry,
{
    let store = Arc::clone(client.store());

    let mut observer = RealmChangeObserver::new();
    observer.subscribe(Box::new(|previous, current| {
        tracing::info!(
            previous = %previous.map(|r| r.to_string()).unwrap_or_default(),
            current = %current,
            domain = %current.domain,
            "realm changed"
        );
    }));
    if let Some(location) = &location {
        observer.subscribe(location.listener());
    }
    // No session layer runs here, so every published realm counts as joined.
    {
        let store = Arc::downgrade(&store);
        observer.subscribe(Box::new(move |_, _| {
            if let Some(store) = store.upgrade() {
                store.set_connection_status(ConnectionStatus::Connected);
            }
        }));
    }
    let observer_task = observer.spawn(store.subscribe_realm_changes());

    let realm = client.select_initial_realm().await?;
    tracing::info!(realm = %realm, x = position.x, y = position.y, "watching for crowded realms");

    let shutdown = Arc::new(ShutdownController::new());
    let _signals = shutdown.listen_for_signals();

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match client.change_to_crowded_realm(position).await {
                    Ok((true, realm)) => tracing::info!(realm = %realm, "moved to crowded realm"),
                    Ok((false, _)) => {}
                    Err(e) => tracing::warn!(error = %e, "crowded realm check failed"),
                }
            }
            _ = shutdown.stopped() => break,
        }
    }

    if let Some(location) = &location {
        println!("{}", location.url());
    }
    drop(client);
    drop(store);
    let _ = observer_task.await;
    Ok(())
}
