//! Wait-list timeout policy.
//!
//! Pure functions of explicit time inputs so the engine never reads a clock
//! while deciding whether a wait has expired.

use super::{entities::TableState, settings::EngineSettings};

/// Outcome of checking a wait against its deadline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WaitCheck {
    Waiting { remaining_millis: u64 },
    Expired,
}

impl WaitCheck {
    fn against(deadline_millis: u64, elapsed_millis: u64) -> Self {
        if elapsed_millis >= deadline_millis {
            Self::Expired
        } else {
            Self::Waiting {
                remaining_millis: deadline_millis - elapsed_millis,
            }
        }
    }

    /// Expires only once the deadline has been passed, not when reached.
    fn after(deadline_millis: u64, elapsed_millis: u64) -> Self {
        if elapsed_millis > deadline_millis {
            Self::Expired
        } else {
            Self::Waiting {
                remaining_millis: deadline_millis - elapsed_millis,
            }
        }
    }

    #[must_use]
    pub const fn is_expired(self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Negative elapsed times come from clock adjustments and count as zero.
#[must_use]
pub fn clamp_elapsed(millis: i64) -> u64 {
    u64::try_from(millis).unwrap_or(0)
}

/// Deadline for humans answering a dialog outside of betting.
#[must_use]
pub const fn non_betting_deadline(previous: TableState, settings: &EngineSettings) -> u64 {
    match previous {
        TableState::NewLevelCheck => settings.new_level_timeout_millis,
        _ => settings.non_betting_timeout_millis,
    }
}

#[must_use]
pub fn check_non_betting(
    previous: TableState,
    elapsed_millis: u64,
    settings: &EngineSettings,
) -> WaitCheck {
    WaitCheck::after(non_betting_deadline(previous, settings), elapsed_millis)
}

/// Deadline for a betting decision: the round timeout plus a grace period,
/// extended by whatever remains in the player's think bank.
#[must_use]
pub fn betting_deadline(round_timeout_secs: u32, think_bank_millis: u64, settings: &EngineSettings) -> u64 {
    u64::from(round_timeout_secs) * 1000 + settings.betting_grace_millis + think_bank_millis
}

#[must_use]
pub fn check_betting(
    round_timeout_secs: u32,
    elapsed_millis: u64,
    think_bank_millis: u64,
    settings: &EngineSettings,
) -> WaitCheck {
    WaitCheck::against(
        betting_deadline(round_timeout_secs, think_bank_millis, settings),
        elapsed_millis,
    )
}
