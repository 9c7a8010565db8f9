//! # Poker Director
//!
//! The per-table progression engine of a multi-table poker tournament.
//!
//! A table moves through a fixed set of states: dealing for the button,
//! waiting for the deal, cleaning up between hands, checking for a new
//! level, coloring up, starting a hand, betting, dealing community cards,
//! showdown and breaks. On every tick the engine looks at one table,
//! performs the work that belongs to its state and returns a
//! [`TableProcessResult`] describing the next state, the presentation
//! phase to run and how the caller should schedule the table.
//!
//! The same engine runs on the host, which owns canonical game state, and
//! on clients, which replay phases without mutating the tournament.
//!
//! ## Core Modules
//!
//! - [`game`]: The state machine, its value types, events and collaborator traits
//! - [`tournament`]: Blind schedules, breaks, color-up chips and timeouts
//! - [`clock`]: The level clock
//! - [`harness`]: In-memory tables and a runner for headless tournaments
//!
//! ## Example
//!
//! ```
//! use poker_director::{
//!     GameEventBus, TableState, TournamentEngine,
//!     harness::{CheckCallProvider, SimPlayer, SimTable, SimTournament},
//!     tournament::TournamentConfig,
//! };
//! use poker_director::game::GameTable;
//! use std::sync::Arc;
//!
//! let config = Arc::new(TournamentConfig::sit_and_go("Demo".to_string(), 9));
//! let mut table = SimTable::new(1, 9, Arc::clone(&config), 7);
//! table.add_player(SimPlayer::computer(1, "Ada", 1500)).unwrap();
//! table.add_player(SimPlayer::computer(2, "Bo", 1500)).unwrap();
//! let mut tournament = SimTournament::new(config, 2, 0);
//!
//! let engine = TournamentEngine::new(Arc::new(GameEventBus::new()), CheckCallProvider);
//! let result = engine.process_table(&mut table, &mut tournament, true, false);
//! assert_eq!(result.pending_state(), Some(TableState::Begin));
//! assert_eq!(result.phase_to_run(), Some("TD.DealDisplayHigh"));
//! ```

/// Level clock.
pub mod clock;

/// Table progression engine, value types and collaborator traits.
pub mod game;
pub use game::{
    ActionOptions, ActionType, BettingRound, EngineSettings, GameEvent, GameEventBus,
    PlayerAction, TableProcessResult, TableProcessResultBuilder, TableState, TournamentEngine,
    constants,
};

/// Headless tournament simulation.
pub mod harness;

/// Tournament configuration.
pub mod tournament;
