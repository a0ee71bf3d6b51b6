mod config;
mod replay;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::RewindConfig;
use mc_rewind_core::enchantment::EnchantmentRewriter;
use mc_rewind_core::{protocol_1_13_2_to_1_14, MappingTables, TracingSink};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "rewind.toml".into());
    let config = match RewindConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("mc-rewind v{} (1.14 -> 1.13.2)", env!("CARGO_PKG_VERSION"));

    let tables = match MappingTables::load(Path::new(&config.mappings.path)) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("Failed to load mappings {}: {e}", config.mappings.path);
            std::process::exit(1);
        }
    };
    let [blocks, items, particles, sounds] = tables.sizes();
    info!(
        "Mappings: {blocks} block states, {items} items, {particles} particles, {sounds} sounds, {} enchantments",
        tables.enchantment_count()
    );

    let protocol = Arc::new(protocol_1_13_2_to_1_14(
        tables,
        EnchantmentRewriter::new(config.items.nbt_namespace.as_str()),
        Arc::new(TracingSink),
    ));

    if config.replay.captures.is_empty() {
        warn!("No captures configured under [replay]; nothing to do");
        return;
    }
    let output_dir = config.replay.output_dir.as_ref().map(PathBuf::from);
    if let Some(dir) = &output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            error!("Cannot create {}: {e}", dir.display());
            std::process::exit(1);
        }
    }

    // Connections are independent; each capture replays on its own blocking task.
    let mut tasks = JoinSet::new();
    for capture in &config.replay.captures {
        let protocol = Arc::clone(&protocol);
        let capture = PathBuf::from(capture);
        let output_dir = output_dir.clone();
        tasks.spawn_blocking(move || {
            let result = replay::replay_file(&protocol, &capture, output_dir.as_deref());
            (capture, result)
        });
    }

    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((capture, Ok(stats))) => info!(
                "{}: {} in, {} out ({} dropped, {} synthesized), {} entities tracked, {} position anomalies",
                capture.display(),
                stats.input,
                stats.output,
                stats.dropped,
                stats.synthesized,
                stats.tracked_at_end,
                stats.position_anomalies
            ),
            Ok((capture, Err(e))) => {
                error!("{}: {e}", capture.display());
                failed += 1;
            }
            Err(e) => {
                error!("Replay task failed: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
    info!("Replay finished.");
}
