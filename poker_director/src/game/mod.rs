//! Tournament progression engine.
//!
//! This module provides the per-table state machine and everything it
//! talks to:
//! - Value types for table states, betting rounds and player decisions
//! - The directive returned by every tick
//! - An in-process event bus
//! - The collaborator traits implemented by callers
//! - The wait-list timeout policy

pub mod collaborators;
pub mod constants;
pub mod entities;
pub mod events;
pub mod result;
pub mod settings;
pub mod state_machine;
pub mod timeouts;

pub use collaborators::{GameHand, GamePlayerInfo, GameTable, PlayerActionProvider, TournamentContext};
pub use entities::{
    ActionOptions, ActionType, BettingRound, Chips, EntityError, PlayerAction, PlayerId, TableId,
    TableState,
};
pub use events::{GameEvent, GameEventBus, Subscription};
pub use result::{PhaseParams, TableProcessResult, TableProcessResultBuilder};
pub use settings::{EngineSettings, SettingsError};
pub use state_machine::TournamentEngine;
