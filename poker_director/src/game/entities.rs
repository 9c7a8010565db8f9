use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of a player, unique across the whole tournament.
pub type PlayerId = i32;

/// Identifier of a physical table.
pub type TableId = i32;

/// Type alias for chip amounts. Tournament chips are whole units and every
/// stack, bet and pot is represented with them.
pub type Chips = u32;

/// Errors raised when converting legacy integer codes into entities.
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum EntityError {
    #[error("Unknown table state: {0}")]
    UnknownTableState(i32),
    #[error("Unknown betting round: {0}")]
    UnknownBettingRound(i32),
    #[error("Unknown action type: {0}")]
    UnknownActionType(i32),
}

/// Node set of the per-table progression state machine.
///
/// Each table owns exactly one current state, one previous state (used to
/// classify wait-list timeouts) and one optional pending state that is
/// adopted once a presentation phase completes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableState {
    None,
    Pending,
    DealForButton,
    Begin,
    BeginWait,
    CheckEndHand,
    Clean,
    NewLevelCheck,
    ColorUp,
    StartHand,
    Betting,
    Community,
    Showdown,
    Done,
    GameOver,
    PendingLoad,
    OnHold,
    Break,
    PreShowdown,
}

impl TableState {
    /// Every state, in legacy code order.
    pub const ALL: [Self; 19] = [
        Self::None,
        Self::Pending,
        Self::DealForButton,
        Self::Begin,
        Self::BeginWait,
        Self::CheckEndHand,
        Self::Clean,
        Self::NewLevelCheck,
        Self::ColorUp,
        Self::StartHand,
        Self::Betting,
        Self::Community,
        Self::Showdown,
        Self::Done,
        Self::GameOver,
        Self::PendingLoad,
        Self::OnHold,
        Self::Break,
        Self::PreShowdown,
    ];

    /// Integer code used by saved games and the legacy wire protocol.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Pending => 1,
            Self::DealForButton => 2,
            Self::Begin => 3,
            Self::BeginWait => 4,
            Self::CheckEndHand => 5,
            Self::Clean => 6,
            Self::NewLevelCheck => 7,
            Self::ColorUp => 8,
            Self::StartHand => 9,
            Self::Betting => 10,
            Self::Community => 11,
            Self::Showdown => 12,
            Self::Done => 13,
            Self::GameOver => 14,
            Self::PendingLoad => 15,
            Self::OnHold => 16,
            Self::Break => 17,
            Self::PreShowdown => 18,
        }
    }

    /// A table in a terminal state never transitions again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

impl TryFrom<i32> for TableState {
    type Error = EntityError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|state| state.code() == code)
            .ok_or(EntityError::UnknownTableState(code))
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::None => "NONE",
            Self::Pending => "PENDING",
            Self::DealForButton => "DEAL_FOR_BUTTON",
            Self::Begin => "BEGIN",
            Self::BeginWait => "BEGIN_WAIT",
            Self::CheckEndHand => "CHECK_END_HAND",
            Self::Clean => "CLEAN",
            Self::NewLevelCheck => "NEW_LEVEL_CHECK",
            Self::ColorUp => "COLOR_UP",
            Self::StartHand => "START_HAND",
            Self::Betting => "BETTING",
            Self::Community => "COMMUNITY",
            Self::Showdown => "SHOWDOWN",
            Self::Done => "DONE",
            Self::GameOver => "GAME_OVER",
            Self::PendingLoad => "PENDING_LOAD",
            Self::OnHold => "ON_HOLD",
            Self::Break => "BREAK",
            Self::PreShowdown => "PRE_SHOWDOWN",
        };
        write!(f, "{repr}")
    }
}

/// Betting rounds of a hold'em hand. A hand's round only ever moves forward.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BettingRound {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl BettingRound {
    pub const ALL: [Self; 5] = [
        Self::PreFlop,
        Self::Flop,
        Self::Turn,
        Self::River,
        Self::Showdown,
    ];

    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::PreFlop => 0,
            Self::Flop => 1,
            Self::Turn => 2,
            Self::River => 3,
            Self::Showdown => 4,
        }
    }

    /// The following round. Showdown is the last round and maps to itself.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::PreFlop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::River,
            Self::River | Self::Showdown => Self::Showdown,
        }
    }
}

impl TryFrom<i32> for BettingRound {
    type Error = EntityError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|round| round.code() == code)
            .ok_or(EntityError::UnknownBettingRound(code))
    }
}

impl fmt::Display for BettingRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

impl ActionType {
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Fold => 1,
            Self::Check => 2,
            Self::Call => 3,
            Self::Bet => 4,
            Self::Raise => 5,
        }
    }
}

impl TryFrom<i32> for ActionType {
    type Error = EntityError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Fold),
            2 => Ok(Self::Check),
            3 => Ok(Self::Call),
            4 => Ok(Self::Bet),
            5 => Ok(Self::Raise),
            _ => Err(EntityError::UnknownActionType(code)),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Fold => "folds",
            Self::Check => "checks",
            Self::Call => "calls",
            Self::Bet => "bets",
            Self::Raise => "raises",
        };
        write!(f, "{repr}")
    }
}

/// A decision made by a player. The amount only carries meaning for bets
/// and raises; the factory helpers keep it at zero for everything else.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PlayerAction {
    pub action_type: ActionType,
    pub amount: Chips,
}

impl PlayerAction {
    #[must_use]
    pub const fn fold() -> Self {
        Self {
            action_type: ActionType::Fold,
            amount: 0,
        }
    }

    #[must_use]
    pub const fn check() -> Self {
        Self {
            action_type: ActionType::Check,
            amount: 0,
        }
    }

    #[must_use]
    pub const fn call() -> Self {
        Self {
            action_type: ActionType::Call,
            amount: 0,
        }
    }

    #[must_use]
    pub const fn bet(amount: Chips) -> Self {
        Self {
            action_type: ActionType::Bet,
            amount,
        }
    }

    #[must_use]
    pub const fn raise(amount: Chips) -> Self {
        Self {
            action_type: ActionType::Raise,
            amount,
        }
    }

    /// Action applied on behalf of a player who ran out of time: check when
    /// nothing is owed, otherwise fold.
    #[must_use]
    pub const fn timeout_default(amount_to_call: Chips) -> Self {
        if amount_to_call == 0 {
            Self::check()
        } else {
            Self::fold()
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action_type {
            ActionType::Bet | ActionType::Raise => write!(f, "{} {}", self.action_type, self.amount),
            _ => write!(f, "{}", self.action_type),
        }
    }
}

/// What the acting player may legally do, computed fresh for every
/// betting decision.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionOptions {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    pub can_bet: bool,
    pub can_raise: bool,
    /// Chips a call actually costs. Less than the amount owed when the
    /// player calls all-in.
    pub call_amount: Chips,
    pub min_bet: Chips,
    pub max_bet: Chips,
    pub min_raise: Chips,
    pub max_raise: Chips,
    /// Decision timeout for the current round, in seconds.
    pub timeout_seconds: u32,
}

impl ActionOptions {
    /// Derives the options from the amount owed and the actor's stack.
    ///
    /// Exactly one of check and call is offered when the actor has chips:
    /// check iff nothing is owed. A short stack can still call for less,
    /// and a raise is only offered when chips remain beyond the call.
    #[must_use]
    pub fn new(
        amount_to_call: Chips,
        chip_count: Chips,
        min_bet: Chips,
        min_raise: Chips,
        timeout_seconds: u32,
    ) -> Self {
        let nothing_owed = amount_to_call == 0;
        let can_bet = nothing_owed && chip_count > 0;
        let can_raise = !nothing_owed && chip_count > amount_to_call;
        Self {
            can_fold: true,
            can_check: nothing_owed,
            can_call: !nothing_owed && chip_count > 0,
            can_bet,
            can_raise,
            call_amount: amount_to_call.min(chip_count),
            min_bet: if can_bet { min_bet.min(chip_count) } else { 0 },
            max_bet: if can_bet { chip_count } else { 0 },
            min_raise: if can_raise {
                min_raise.min(chip_count - amount_to_call)
            } else {
                0
            },
            max_raise: if can_raise {
                chip_count - amount_to_call
            } else {
                0
            },
            timeout_seconds,
        }
    }

    /// Whether `action` is legal under these options, including its amount.
    #[must_use]
    pub fn allows(&self, action: &PlayerAction) -> bool {
        match action.action_type {
            ActionType::Fold => self.can_fold,
            ActionType::Check => self.can_check,
            ActionType::Call => self.can_call,
            ActionType::Bet => {
                self.can_bet && (self.min_bet..=self.max_bet).contains(&action.amount)
            }
            ActionType::Raise => {
                self.can_raise && (self.min_raise..=self.max_raise).contains(&action.amount)
            }
        }
    }
}
