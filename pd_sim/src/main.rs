//! Headless tournament simulator.
//!
//! Seats computer players at one or more tables and ticks them through the
//! progression engine until a single player holds every chip.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Error, bail};
use ctrlc::set_handler;
use log::{info, warn};
use pico_args::Arguments;
use poker_director::{
    harness::{
        BuiltinProvider, CheckCallProvider, RandomProvider, SimulationConfig, TableRunner,
        runner::DEFAULT_TICK_MILLIS,
    },
    tournament::TournamentConfig,
};
use rand::random;

const HELP: &str = "\
Simulate a multi-table poker tournament with computer players

USAGE:
  pd_sim [OPTIONS]

OPTIONS:
  --players    N           Players to seat                [default: env PD_SIM_PLAYERS or 6]
  --tables     N           Tables to spread them over     [default: env PD_SIM_TABLES or 1]
  --seats      N           Seats per table                [default: env PD_SIM_SEATS or 10]
  --seed       S           Seed for cards and decisions   [default: env PD_SIM_SEED or random]
  --max-ticks  N           Give up after N ticks          [default: env PD_SIM_MAX_TICKS or 1000000]
  --tick-ms    N           Simulated millis per tick      [default: env PD_SIM_TICK_MS or 1000]
  --provider   NAME        random or check-call           [default: env PD_SIM_PROVIDER or random]

FLAGS:
  -h, --help               Print help information
  --online                 Run levels on the wall clock and time out waits
  --auto-deal              Deal hands without waiting between them
  --turbo                  Use the turbo blind schedule

ENVIRONMENT:
  RUST_LOG                 Log filter (e.g., info, poker_director=debug)
";

struct Args {
    players: usize,
    tables: usize,
    seats: usize,
    seed: u64,
    max_ticks: u64,
    tick_millis: u64,
    provider: String,
    online: bool,
    auto_deal: bool,
    turbo: bool,
}

/// Reads `flag`, then `var`, then falls back to `default`.
fn value_or_env<T>(pargs: &mut Arguments, flag: &'static str, var: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    pargs.value_from_str(flag).unwrap_or_else(|_| {
        std::env::var(var)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    })
}

fn flag_or_env(pargs: &mut Arguments, flag: &'static str, var: &str) -> bool {
    pargs.contains(flag)
        || std::env::var(var).is_ok_and(|v| matches!(v.as_str(), "1" | "true" | "yes"))
}

fn provider(name: &str, seed: u64) -> Result<BuiltinProvider, Error> {
    let provider = match name {
        "random" => RandomProvider::new(seed).into(),
        "check-call" => CheckCallProvider.into(),
        other => bail!("unknown provider `{other}`, expected random or check-call"),
    };
    Ok(provider)
}

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        players: value_or_env(&mut pargs, "--players", "PD_SIM_PLAYERS", 6),
        tables: value_or_env(&mut pargs, "--tables", "PD_SIM_TABLES", 1),
        seats: value_or_env(&mut pargs, "--seats", "PD_SIM_SEATS", 10),
        seed: value_or_env(&mut pargs, "--seed", "PD_SIM_SEED", random()),
        max_ticks: value_or_env(&mut pargs, "--max-ticks", "PD_SIM_MAX_TICKS", 1_000_000),
        tick_millis: value_or_env(&mut pargs, "--tick-ms", "PD_SIM_TICK_MS", DEFAULT_TICK_MILLIS),
        provider: value_or_env(
            &mut pargs,
            "--provider",
            "PD_SIM_PROVIDER",
            "random".to_string(),
        ),
        online: flag_or_env(&mut pargs, "--online", "PD_SIM_ONLINE"),
        auto_deal: flag_or_env(&mut pargs, "--auto-deal", "PD_SIM_AUTO_DEAL"),
        turbo: flag_or_env(&mut pargs, "--turbo", "PD_SIM_TURBO"),
    };
    let rest = pargs.finish();
    if !rest.is_empty() {
        bail!("unexpected arguments: {rest:?}");
    }

    // Catching signals for a clean stop.
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    set_handler(move || handler_stop.store(true, Ordering::SeqCst))?;

    env_logger::builder().format_target(false).init();

    let name = format!("Simulation #{}", args.seed);
    let config = if args.turbo {
        TournamentConfig::turbo_sit_and_go(name, args.players)
    } else {
        TournamentConfig::sit_and_go(name, args.players)
    };
    let sim = SimulationConfig {
        players: args.players,
        tables: args.tables,
        seats_per_table: args.seats,
        seed: args.seed,
        online: args.online,
        auto_deal: args.auto_deal,
        tick_millis: args.tick_millis,
    };
    let mut runner = TableRunner::from_config(config, &sim, provider(&args.provider, args.seed)?)?;

    let counts = Arc::new(Mutex::new(BTreeMap::<&'static str, u64>::new()));
    let sink = Arc::clone(&counts);
    let _subscription = runner.bus().subscribe(move |event| {
        if let Ok(mut counts) = sink.lock() {
            *counts.entry(event.kind()).or_default() += 1;
        }
    });

    info!(
        "Simulating {} players at {} table(s), seed {}",
        args.players, args.tables, args.seed
    );
    let summary = runner.run(args.max_ticks, || stop.load(Ordering::SeqCst));

    println!("{}", serde_json::to_string_pretty(&summary)?);
    if let Ok(counts) = counts.lock() {
        println!("{}", serde_json::to_string_pretty(&*counts)?);
    }

    if !summary.game_over {
        warn!("No winner after {} ticks", summary.ticks);
        std::process::exit(1);
    }
    Ok(())
}
