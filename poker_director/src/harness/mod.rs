//! Headless simulation of a tournament on top of the engine.
//!
//! This module provides in-memory implementations of the collaborator
//! traits and a runner that ticks them:
//! - [`SimTable`] and [`SimHand`]: seats, button, blinds and side pots
//! - [`SimTournament`]: level clock, color-up schedule and bust-outs
//! - Action providers, from scripted to seeded random play
//! - [`TableRunner`]: applies every tick result the way a server would
//!
//! ## Example
//!
//! ```
//! use poker_director::harness::{CheckCallProvider, SimulationConfig, TableRunner};
//! use poker_director::tournament::TournamentConfig;
//!
//! let config = TournamentConfig::turbo_sit_and_go("Demo".to_string(), 9);
//! let sim = SimulationConfig::default();
//! let mut runner = TableRunner::from_config(config, &sim, CheckCallProvider).unwrap();
//! runner.tick();
//! assert!(!runner.is_game_over());
//! ```

pub mod errors;
pub mod hand;
pub mod player;
pub mod providers;
pub mod runner;
pub mod table;
pub mod tournament;

pub use errors::{SimError, SimResult};
pub use hand::{HandBlinds, SimHand};
pub use player::SimPlayer;
pub use providers::{
    BuiltinProvider, CheckCallProvider, ProviderFn, RandomProvider, ScriptedProvider,
    SilentProvider,
};
pub use runner::{RunSummary, SimulationConfig, TableRunner};
pub use table::SimTable;
pub use tournament::SimTournament;
