//! FruitReel terminal driver
//!
//! Usage:
//!   fruitreel --bet 10 --lines 3 --spins 20
//!   fruitreel --seed 7 --take-bonus-spins --json
//!   fruitreel --auto --spins 50 --delay-ms 200
//!   fruitreel --config machine.yaml

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, bail};
use clap::Parser;

use fr_slot::{
    AutoPlayRunner, AutoPlayTick, GameConfig, GameEvent, GameSession, SharedSession, SpinRequest,
};

#[derive(Parser)]
#[command(name = "fruitreel", about = "Multi-line fruit slot machine", version)]
struct Cli {
    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Machine config (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the high win-rate studio preset
    #[arg(long, conflicts_with = "config")]
    studio: bool,

    /// Bet per line
    #[arg(short, long, default_value_t = 10)]
    bet: u32,

    /// Active paylines
    #[arg(short, long, default_value_t = 3)]
    lines: usize,

    /// Number of spins to play
    #[arg(short, long, default_value_t = 10)]
    spins: u64,

    /// Play every bonus sub-spin as soon as it opens
    #[arg(long)]
    take_bonus_spins: bool,

    /// Run the spins through auto-play
    #[arg(long)]
    auto: bool,

    /// Auto-play delay between spins in milliseconds
    #[arg(long, requires = "auto")]
    delay_ms: Option<u64>,

    /// Print one JSON line per event
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match (&cli.config, cli.studio) {
        (Some(path), _) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        (None, true) => GameConfig::studio(),
        (None, false) => GameConfig::reference(),
    };
    if let Some(ms) = cli.delay_ms {
        config.auto_play.spin_delay_ms = ms;
    }

    let session = match cli.seed {
        Some(seed) => GameSession::seeded(config, seed),
        None => GameSession::new(config),
    }
    .context("failed to start session")?;
    log::info!("Starting FruitReel with balance {}", session.balance());

    let request = SpinRequest::new(cli.bet, cli.lines);
    session
        .validate(&request)
        .with_context(|| format!("bet {} × {} lines is not playable", cli.bet, cli.lines))?;

    let shared = session.into_shared();
    if cli.auto {
        run_auto(&cli, &shared, request).await?;
    } else {
        run_manual(&cli, &shared, request)?;
    }

    print_summary(&shared, cli.json)
}

/// Spin `--spins` times in the foreground
fn run_manual(cli: &Cli, shared: &SharedSession, request: SpinRequest) -> Result<()> {
    let mut session = shared.lock();
    for _ in 0..cli.spins {
        let result = session.spin(request);
        if result.is_ok() && cli.take_bonus_spins && session.pending_bonus().is_some() {
            if let Err(err) = session.resolve_bonus_spin() {
                log::error!("bonus spin failed: {}", err);
            }
        }
        for event in session.drain_events() {
            print_event(&event, cli.json)?;
        }
        if let Err(err) = result {
            log::warn!("stopping: {}", err);
            break;
        }
    }
    Ok(())
}

/// Seed auto-play with one manual spin, then let the runner play the rest
async fn run_auto(cli: &Cli, shared: &SharedSession, request: SpinRequest) -> Result<()> {
    if cli.spins == 0 {
        return Ok(());
    }

    let first = shared.lock().spin(request);
    drain_and_print(shared, cli.json, cli.take_bonus_spins)?;
    if let Err(err) = first {
        bail!("first spin rejected: {err}");
    }

    let runner = Arc::new(AutoPlayRunner::new(shared.clone()));
    let played = Arc::new(AtomicU64::new(1));
    let target = cli.spins;
    let json = cli.json;
    let take_bonus_spins = cli.take_bonus_spins;

    let task = {
        let runner = runner.clone();
        let played = played.clone();
        tokio::spawn(async move {
            let handle = runner.clone();
            runner
                .run(move |tick| {
                    if let Err(err) = drain_and_print(handle.session(), json, take_bonus_spins) {
                        log::error!("{:#}", err);
                    }
                    let done = match tick {
                        AutoPlayTick::Spun(_) => played.fetch_add(1, Ordering::SeqCst) + 1 >= target,
                        AutoPlayTick::Stopped(reason) => {
                            log::warn!("auto-play stopped: {:?}", reason);
                            true
                        }
                        AutoPlayTick::Idle => false,
                    };
                    if done {
                        handle.shutdown();
                    }
                })
                .await
        })
    };

    if played.load(Ordering::SeqCst) < target {
        runner.toggle();
    } else {
        runner.shutdown();
    }
    let spins = task.await.context("auto-play task failed")?;

    // final toggle event from a self-stop
    drain_and_print(shared, cli.json, false)?;
    log::info!(
        "auto-play finished after {} spins ({} ms apart)",
        spins,
        shared.lock().config().auto_play.spin_delay_ms
    );
    Ok(())
}

fn drain_and_print(shared: &SharedSession, json: bool, take_bonus_spins: bool) -> Result<()> {
    let mut session = shared.lock();
    if take_bonus_spins && session.pending_bonus().is_some() {
        if let Err(err) = session.resolve_bonus_spin() {
            log::error!("bonus spin failed: {}", err);
        }
    }
    for event in session.drain_events() {
        print_event(&event, json)?;
    }
    Ok(())
}

fn print_event(event: &GameEvent, json: bool) -> Result<()> {
    if json {
        let line = event
            .to_json()
            .with_context(|| format!("failed to encode {} event", event.type_name()))?;
        println!("{line}");
        return Ok(());
    }

    match event {
        GameEvent::SpinResolved {
            round,
            outcome,
            applied,
            ..
        } => {
            let mut line = format!(
                "#{:<4} stake {:>5}  won {:>6}  balance {:>7}",
                round, applied.total_stake, applied.winnings, applied.balance
            );
            if !outcome.winning_lines.is_empty() {
                line.push_str(&format!("  lines {:?}", outcome.winning_lines));
            }
            if outcome.is_jackpot {
                line.push_str("  JACKPOT");
            }
            println!("{line}");
            for row in outcome.grid.to_string().lines() {
                println!("      {row}");
            }
        }
        GameEvent::BonusTriggered {
            consecutive_wins, ..
        } => println!("      {} wins in a row: bonus round!", consecutive_wins),
        GameEvent::BonusAwarded { award, .. } => {
            println!("      bonus +{}  balance {}", award.amount, award.balance)
        }
        GameEvent::BonusSpinResolved { outcome, .. } => {
            if outcome.won {
                println!("      bonus spin won +{}  balance {}", outcome.amount, outcome.balance);
            } else {
                println!("      bonus spin lost  balance {}", outcome.balance);
            }
        }
        GameEvent::SpinRejected { reason, .. } => println!("      rejected: {reason}"),
        GameEvent::AutoPlayToggled { enabled } => {
            println!("      auto-play {}", if *enabled { "on" } else { "off" })
        }
    }
    Ok(())
}

fn print_summary(shared: &SharedSession, json: bool) -> Result<()> {
    let session = shared.lock();
    let stats = session.stats();
    let series = session.balance_stats();

    if json {
        let summary = serde_json::json!({
            "type": "summary",
            "stats": stats,
            "balance": series,
        });
        println!("{}", serde_json::to_string(&summary).context("failed to encode summary")?);
        return Ok(());
    }

    println!();
    println!("Spins            {}", stats.total_spins);
    println!("Wins / losses    {} / {}", stats.wins, stats.losses);
    println!("Jackpots         {}", stats.jackpots);
    println!("Bonuses          {} ({} bonus spins won)", stats.bonuses, stats.bonus_spins_won);
    println!("Hit rate         {:.1}%", stats.hit_rate());
    println!("Return to player {:.1}%", stats.return_to_player());
    println!("Biggest win      {}", stats.biggest_win);
    println!("Round win rate   {:.1}%", series.win_rate);
    println!(
        "Balance          {} -> {} ({:+.2}%)",
        series.initial, series.current, series.change_pct
    );
    Ok(())
}
