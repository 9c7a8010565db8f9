//! Engine timing configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    DEFAULT_BETTING_GRACE_MILLIS, DEFAULT_NEW_LEVEL_TIMEOUT_MILLIS,
    DEFAULT_NON_BETTING_TIMEOUT_MILLIS, DEFAULT_ONLINE_AUTO_DEAL_PAUSE_MILLIS,
    DEFAULT_SITTING_OUT_PAUSE_MILLIS,
};

/// Errors returned by [`EngineSettings::validate`].
#[derive(Debug, Eq, Error, PartialEq)]
pub enum SettingsError {
    #[error("{name} must be greater than zero")]
    ZeroTimeout { name: &'static str },
    #[error("new level timeout ({new_level}ms) is shorter than the non-betting timeout ({non_betting}ms)")]
    NewLevelTimeoutTooShort { new_level: u64, non_betting: u64 },
}

/// Pauses and wait-list timeouts used by the engine.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EngineSettings {
    /// Pause applied when the acting player is sitting out.
    pub sitting_out_pause_millis: u64,
    /// Pause before an auto-dealt hand in online games.
    pub online_auto_deal_pause_millis: u64,
    /// Wait-list timeout while humans answer the new level dialog.
    pub new_level_timeout_millis: u64,
    /// Wait-list timeout for every other non-betting wait.
    pub non_betting_timeout_millis: u64,
    /// Added to the round timeout before a betting wait expires.
    pub betting_grace_millis: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sitting_out_pause_millis: DEFAULT_SITTING_OUT_PAUSE_MILLIS,
            online_auto_deal_pause_millis: DEFAULT_ONLINE_AUTO_DEAL_PAUSE_MILLIS,
            new_level_timeout_millis: DEFAULT_NEW_LEVEL_TIMEOUT_MILLIS,
            non_betting_timeout_millis: DEFAULT_NON_BETTING_TIMEOUT_MILLIS,
            betting_grace_millis: DEFAULT_BETTING_GRACE_MILLIS,
        }
    }
}

impl EngineSettings {
    /// Checks that every wait-list timeout can actually expire.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.new_level_timeout_millis == 0 {
            return Err(SettingsError::ZeroTimeout {
                name: "new_level_timeout_millis",
            });
        }
        if self.non_betting_timeout_millis == 0 {
            return Err(SettingsError::ZeroTimeout {
                name: "non_betting_timeout_millis",
            });
        }
        if self.new_level_timeout_millis < self.non_betting_timeout_millis {
            return Err(SettingsError::NewLevelTimeoutTooShort {
                new_level: self.new_level_timeout_millis,
                non_betting: self.non_betting_timeout_millis,
            });
        }
        Ok(())
    }
}
