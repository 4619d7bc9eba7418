use std::time::Duration;

use alert_sink::{AlertDispatcher, AlertText};
use anyhow::{Context, Result};
use flip_monitor::{
    share, tick_shared, FlipMonitor, HeuristicWinModel, OddsBoard, SharedMonitor,
    SimulatedOddsFeed, WinModelConfig,
};
use kelly_bet_sizer::KellyBetSizer;
use prop_edge_calculator::{PropEdge, PropEdgeCalculator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::signal::unix::SignalKind;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

mod config;
mod roster;

use config::AgentConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Panic hook: log panic info before crashing
    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    tracing::info!("Starting bookie agent");

    // 2. Load configuration
    let config = AgentConfig::from_env().context("Invalid agent configuration")?;
    tracing::info!("Configuration loaded and validated");
    tracing::info!("  Odds refresh: {} seconds", config.odds_refresh_seconds);
    tracing::info!("  Monitor tick: {} seconds", config.monitor_tick_seconds);
    tracing::info!("  Bankroll: ${:.2}", config.bankroll);
    tracing::info!("  Min model probability: {:.0}%", config.min_model_probability * 100.0);

    let seed = config.sim_seed;
    if let Some(seed) = seed {
        tracing::info!("  Simulation seed: {}", seed);
    }

    // 3. Price the startup prop slate
    price_props(&config, seed)?;

    // 4. Build the monitor and register the roster
    let model = match seed {
        Some(seed) => HeuristicWinModel::new(WinModelConfig::default(), seed),
        None => HeuristicWinModel::from_entropy(WinModelConfig::default()),
    };
    let mut monitor = FlipMonitor::new(config.monitor_config(), Box::new(model))
        .context("Invalid monitor configuration")?;

    let board = OddsBoard::new();
    for registration in roster::favorites(chrono::Utc::now()) {
        let game_id = registration.game_id.clone();
        let odds = registration.original_odds;
        if let Err(e) = monitor.register_favorite(registration) {
            tracing::warn!("Skipping {}: {}", game_id, e);
            continue;
        }
        if let Ok(odds) = betting_core::AmericanOdds::new(odds) {
            board.publish(game_id, odds);
        }
    }
    let monitor = share(monitor);

    let dispatcher = AlertDispatcher::new(&config.sink_config());
    tracing::info!("Alert channels: {:?}", dispatcher.channel_names());

    // 5. Periodic tasks with graceful shutdown (SIGINT + SIGTERM)
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let feed = match seed {
        Some(seed) => SimulatedOddsFeed::new(seed.wrapping_add(1)),
        None => SimulatedOddsFeed::from_entropy(),
    };
    let refresh = spawn_odds_refresh(
        monitor.clone(),
        board.clone(),
        feed,
        Duration::from_secs(config.odds_refresh_seconds),
        shutdown_rx.clone(),
    );
    let ticker = spawn_monitor_tick(
        monitor.clone(),
        board,
        dispatcher,
        Duration::from_secs(config.monitor_tick_seconds),
        shutdown_rx,
    );

    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received SIGINT");
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM");
        }
    }

    tracing::info!("Shutdown signal received, exiting gracefully...");
    shutdown_tx.send(true).ok();
    if let Err(e) = refresh.await {
        tracing::warn!("Odds refresh task ended abnormally: {}", e);
    }
    if let Err(e) = ticker.await {
        tracing::warn!("Monitor task ended abnormally: {}", e);
    }

    let guard = monitor.lock().await;
    tracing::info!(
        "Bookie agent shut down. {} flip alert(s) raised across {} game(s)",
        guard.get_alerts().len(),
        guard.games().count()
    );
    Ok(())
}

fn price_props(config: &AgentConfig, seed: Option<u64>) -> Result<()> {
    let calculator = PropEdgeCalculator::default();
    let sizer = KellyBetSizer::default();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for (label, query) in roster::props(chrono::Utc::now()) {
        let edge = calculator
            .compute_prop_edge(&query, &mut rng)
            .with_context(|| format!("Failed to price {}", label))?;

        match &edge {
            PropEdge::Priced(result) => {
                let stake = sizer
                    .recommend_for_edge(config.bankroll, result, 1.0)
                    .with_context(|| format!("Failed to size {}", label))?;
                tracing::info!(
                    "{}: expected {:.1}, P(over) {:.1}%, edge {:+.2}% at {} -> {} ${:.2}",
                    label,
                    result.expected_value,
                    result.over_probability * 100.0,
                    result.edge,
                    result.market_odds,
                    stake.tier.label(),
                    stake.amount
                );
            }
            PropEdge::Degenerate(d) => {
                tracing::warn!("{}: not priced ({:?})", label, d.reason);
            }
        }
    }
    Ok(())
}

fn spawn_odds_refresh(
    monitor: SharedMonitor,
    board: OddsBoard,
    mut feed: SimulatedOddsFeed,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let published = {
                        let guard = monitor.lock().await;
                        board.refresh_from(&mut feed, guard.games())
                    };
                    tracing::debug!("Published {} odds quote(s)", published);
                }
                _ = shutdown.changed() => {
                    tracing::info!("Odds refresh stopped");
                    break;
                }
            }
        }
    })
}

fn spawn_monitor_tick(
    monitor: SharedMonitor,
    board: OddsBoard,
    dispatcher: AlertDispatcher,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        let mut reader = board;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let (alerts, warnings) =
                        tick_shared(&monitor, chrono::Utc::now(), &mut reader).await;
                    for warning in &warnings {
                        tracing::warn!("{}", warning.summary());
                    }
                    for alert in &alerts {
                        let delivered = dispatcher.dispatch(alert).await;
                        tracing::info!("{} (delivered to {} channel(s))", alert.headline(), delivered);
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("Monitor tick stopped");
                    break;
                }
            }
        }
    })
}
