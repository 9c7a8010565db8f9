//! Tournament configuration for Sit-n-Go and scheduled tournaments.
//!
//! This module provides:
//! - Blind level progression, including breaks and antes
//! - The minimum chip schedule used for color-ups
//! - Per-round decision timeouts and think bank
//! - Rebuy and add-on policies
//!
//! ## Example
//!
//! ```
//! use poker_director::tournament::TournamentConfig;
//!
//! let config = TournamentConfig::sit_and_go("Sunday Special".to_string(), 9);
//! assert!(config.validate().is_ok());
//! assert!(config.is_break_level(5));
//! ```

pub mod models;

pub use models::{
    AddOnPolicy, BlindLevel, RebuyPolicy, RoundTimeouts, TournamentConfig, TournamentConfigError,
    TournamentConfigResult, TournamentType,
};
