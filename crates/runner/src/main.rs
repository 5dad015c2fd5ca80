use std::process;
use std::sync::Arc;

use log::{error, info};
use tokio::sync::watch;

use argus_feed::{SimFeed, TimeoutFeed};
use argus_ports::{SignalPublisher, SignalRepository};
use argus_runner::config::AppConfig;
use argus_runner::engine::{RunMode, ScanEngine};
use argus_runner::publisher::BroadcastSignalPublisher;
use argus_runner::store::InMemorySignalStore;

fn print_help() {
    eprintln!(
        r#"Argus - market anomaly scanner

USAGE:
    argus [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --mode <MODE>       Run mode: single | continuous | report (default: single)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    ARGUS_CONFIG        Config file path (overridden by --config)
    ARGUS_MODE          Run mode (overridden by --mode)
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # One scan cycle and a summary of the best signals
    argus

    # Scan on the configured interval until Ctrl-C
    argus --mode continuous

    # Volatility-squeeze screen over the universe
    argus --config config.json --mode report
"#
    );
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments, with env vars as the fallback
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = std::env::var("ARGUS_CONFIG").ok();
    let mut mode_arg = std::env::var("ARGUS_MODE").ok();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return;
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--mode" | "-m" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --mode requires a mode argument");
                    process::exit(1);
                }
                mode_arg = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = if let Some(path) = &config_path {
        info!("Loading configuration from: {}", path);
        match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
    } else {
        info!("Using default configuration");
        AppConfig::default()
    };

    let mode = match &mode_arg {
        Some(arg) => match RunMode::from_arg(arg) {
            Some(mode) => mode,
            None => {
                eprintln!("Unknown mode: {} (expected single | continuous | report)", arg);
                process::exit(1);
            }
        },
        None => RunMode::Single,
    };

    let source = Arc::new(TimeoutFeed::new(
        SimFeed::new(config.feed_config()),
        config.request_timeout(),
    ));
    let store = Arc::new(InMemorySignalStore::new());
    let publisher = Arc::new(BroadcastSignalPublisher::default());

    let engine = ScanEngine::new(
        source,
        config.engine_config(),
        Arc::clone(&store) as Arc<dyn SignalRepository>,
        Arc::clone(&publisher) as Arc<dyn SignalPublisher>,
    );

    match engine.initialize().await {
        Ok(count) => info!("Universe ready: {} symbols", count),
        Err(e) => {
            error!("Startup failed: {}", e);
            process::exit(1);
        }
    }

    match mode {
        RunMode::Single => {
            engine.run_single().await;
            if let Ok(stats) = store.summary_stats().await {
                info!(
                    "Store now holds {} signals, {} from the last 24h (avg score {:.1})",
                    stats.total, stats.last_24h, stats.avg_score_24h
                );
            }
        }
        RunMode::Continuous => {
            let (stop_tx, stop_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Ctrl-C received, shutting down");
                    let _ = stop_tx.send(true);
                }
            });
            engine.run_continuous(stop_rx).await;
        }
        RunMode::Report => {
            engine.squeeze_report().await;
        }
    }
}
