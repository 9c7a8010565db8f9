//! Interfaces the engine reads and mutates.
//!
//! Tables, hands and the tournament are owned by the caller. The engine only
//! touches them through these traits, and only host-flagged code paths call
//! the mutating methods.

use enum_dispatch::enum_dispatch;

use super::entities::{
    ActionOptions, BettingRound, Chips, PlayerAction, PlayerId, TableId, TableState,
};

/// Read-only view of a seated player.
pub trait GamePlayerInfo {
    fn id(&self) -> PlayerId;

    fn name(&self) -> &str;

    fn chip_count(&self) -> Chips;

    fn is_human(&self) -> bool;

    /// Whether a person currently controls this seat. Defaults to
    /// [`GamePlayerInfo::is_human`].
    fn is_human_controlled(&self) -> bool {
        self.is_human()
    }

    /// Whether decisions for this player are made on this peer rather than
    /// relayed from a remote client.
    fn is_locally_controlled(&self) -> bool;

    fn is_sitting_out(&self) -> bool;

    fn is_observer(&self) -> bool;

    fn is_folded(&self) -> bool;

    /// Wants to reveal cards after winning uncontested.
    fn is_ask_show_winning(&self) -> bool;

    /// Wants to reveal cards after losing.
    fn is_ask_show_losing(&self) -> bool;

    /// Remaining extra decision time beyond the round timeout.
    fn think_bank_millis(&self) -> u64;
}

/// The hand currently being played at a table.
pub trait GameHand {
    type Player: GamePlayerInfo + Clone;

    fn round(&self) -> BettingRound;

    /// Whether betting for the current round is complete.
    fn is_done(&self) -> bool;

    fn num_with_cards(&self) -> usize;

    fn is_uncontested(&self) -> bool;

    /// The player whose turn it is, initialising the round's action order
    /// on first use. `None` when nobody can act.
    fn current_player_with_init(&mut self) -> Option<Self::Player>;

    fn amount_to_call(&self, player: PlayerId) -> Chips;

    fn min_bet(&self) -> Chips;

    fn min_raise(&self) -> Chips;

    fn apply_player_action(&mut self, player: PlayerId, action: PlayerAction);

    /// Moves to the next round. Never moves backwards.
    fn advance_round(&mut self);

    /// Settles winners ahead of the showdown so reveal votes can be taken.
    fn pre_resolve(&mut self, is_online: bool);

    fn resolve(&mut self);

    fn store_hand_history(&mut self);

    fn pre_winners(&self) -> Vec<Self::Player>;

    fn pre_losers(&self) -> Vec<Self::Player>;

    fn contains_player(&self, player: PlayerId) -> bool;
}

/// A physical table: state, seats, wait-list and progression hooks.
pub trait GameTable {
    type Player: GamePlayerInfo + Clone;
    type Hand: GameHand<Player = Self::Player>;

    fn number(&self) -> TableId;

    fn table_state(&self) -> TableState;

    fn set_table_state(&mut self, state: TableState);

    /// [`TableState::None`] when nothing is pending.
    fn pending_table_state(&self) -> TableState;

    fn set_pending_table_state(&mut self, state: TableState);

    fn previous_table_state(&self) -> TableState;

    /// Phase to resume when a saved table is loaded.
    fn pending_phase(&self) -> Option<&str>;

    fn seats(&self) -> usize;

    fn player(&self, seat: usize) -> Option<&Self::Player>;

    fn num_occupied_seats(&self) -> usize {
        (0..self.seats())
            .filter(|&seat| self.player(seat).is_some())
            .count()
    }

    fn added_players(&self) -> &[Self::Player];

    fn hand(&self) -> Option<&Self::Hand>;

    fn hand_mut(&mut self) -> Option<&mut Self::Hand>;

    fn hand_num(&self) -> u32;

    fn level(&self) -> u32;

    /// Whether this table is the one the local user is watching.
    fn is_current(&self) -> bool;

    fn is_auto_deal(&self) -> bool;

    fn auto_deal_delay_millis(&self) -> u64;

    fn is_zip_mode(&self) -> bool;

    fn set_zip_mode(&mut self, zip: bool);

    /// Deals for the button.
    fn set_button(&mut self);

    fn start_new_hand(&mut self);

    fn start_break(&mut self);

    fn process_ai_rebuys(&mut self);

    fn process_ai_add_ons(&mut self);

    fn clear_rebuy_list(&mut self);

    fn set_next_min_chip(&mut self, min_chip: Chips);

    fn do_color_up_determination(&mut self);

    fn is_coloring_up(&self) -> bool;

    fn color_up(&mut self);

    fn color_up_finish(&mut self);

    fn add_wait(&mut self, player: Self::Player);

    fn remove_wait_all(&mut self);

    fn wait_size(&self) -> usize;

    fn wait_player(&self, index: usize) -> Option<&Self::Player>;

    fn millis_since_last_state_change(&self) -> i64;

    fn set_pause(&mut self, millis: u64);

    fn set_player_timeout(&mut self, player: PlayerId, millis: u64);
}

/// Tournament-wide state shared by every table.
pub trait TournamentContext {
    fn num_players(&self) -> usize;

    fn is_one_player_left(&self) -> bool;

    fn level(&self) -> u32;

    fn next_level(&mut self);

    fn is_level_expired(&self) -> bool;

    fn is_break_level(&self, level: u32) -> bool;

    fn small_blind(&self, level: u32) -> Chips;

    fn big_blind(&self, level: u32) -> Chips;

    fn ante(&self, level: u32) -> Chips;

    fn min_chip(&self) -> Chips;

    /// Smallest chip of the previous level.
    fn last_min_chip(&self) -> Chips;

    /// Moves the practice clock forward by one action.
    fn advance_clock(&mut self);

    /// Moves the practice clock forward during a break.
    fn advance_clock_break(&mut self);

    fn start_game_clock(&mut self);

    /// Base decision timeout in seconds.
    fn timeout_seconds(&self) -> u32;

    fn timeout_for_round(&self, round: BettingRound) -> u32;

    fn is_scheduled_start_enabled(&self) -> bool;

    /// Milliseconds since the Unix epoch, or 0 when unset.
    fn scheduled_start_time(&self) -> i64;

    fn min_players_for_scheduled_start(&self) -> usize;

    /// The player using this peer, if any.
    fn local_player(&self) -> Option<&dyn GamePlayerInfo>;

    /// Wall clock used for the scheduled start, in Unix milliseconds.
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// The sole decision-making boundary of the engine.
///
/// Implementations may be backed by AI, a UI or a network relay. `None`
/// means no decision was produced and the engine folds for the player.
#[enum_dispatch]
pub trait PlayerActionProvider: Send + Sync {
    fn get_action(&self, player: &dyn GamePlayerInfo, options: &ActionOptions)
    -> Option<PlayerAction>;
}
