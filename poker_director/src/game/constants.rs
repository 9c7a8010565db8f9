//! Phase names handed to the presentation layer, and default timings.
//!
//! Phase names are opaque to the engine. They are agreed with the layer that
//! renders or executes them and are passed through unchanged.

/// Waits for the user to press "deal" at a table without auto-deal.
pub const PHASE_WAIT_FOR_DEAL: &str = "TD.WaitForDeal";
/// Shows players who were moved to this table during consolidation.
pub const PHASE_DISPLAY_TABLE_MOVES: &str = "TD.DisplayTableMoves";
/// Announces a new level and offers rebuys and add-ons.
pub const PHASE_NEW_LEVEL_ACTIONS: &str = "TD.NewLevelActions";
pub const PHASE_COLOR_UP: &str = "TD.ColorUp";
/// Deals and displays hole cards.
pub const PHASE_DEAL_DISPLAY_HAND: &str = "TD.DealDisplayHand";
pub const PHASE_DEAL_COMMUNITY: &str = "TD.DealCommunity";
/// Asks uncontested winners and losers whether to reveal their cards.
pub const PHASE_PRE_SHOWDOWN: &str = "TD.PreShowdown";
pub const PHASE_SHOWDOWN: &str = "TD.Showdown";
/// Deals a high card to every seat to place the button.
pub const PHASE_DEAL_DISPLAY_HIGH: &str = "TD.DealDisplayHigh";
pub const PHASE_CHECK_END_HAND: &str = "TD.CheckEndHand";

/// Phase parameter listing the player ids asked to reveal at pre-showdown.
pub const PARAM_WINNERS: &str = "PARAM_WINNERS";

/// Pause applied when the acting player is sitting out.
pub const DEFAULT_SITTING_OUT_PAUSE_MILLIS: u64 = 1100;
/// Pause before an auto-dealt hand in an online game.
pub const DEFAULT_ONLINE_AUTO_DEAL_PAUSE_MILLIS: u64 = 1000;
/// How long humans get to answer the new level dialog.
pub const DEFAULT_NEW_LEVEL_TIMEOUT_MILLIS: u64 = 30_000;
/// How long humans get to answer any other non-betting dialog.
pub const DEFAULT_NON_BETTING_TIMEOUT_MILLIS: u64 = 5_000;
/// Grace period added on top of a betting round timeout.
pub const DEFAULT_BETTING_GRACE_MILLIS: u64 = 1_000;

/// Per-round decision timeout used when a round has no override.
pub const DEFAULT_TIMEOUT_SECS: u32 = 30;
pub const MIN_TIMEOUT_SECS: u32 = 5;
pub const MAX_TIMEOUT_SECS: u32 = 120;
pub const DEFAULT_THINK_BANK_SECS: u32 = 15;
pub const MAX_THINK_BANK_SECS: u32 = 120;
