//! Domain events and the in-process bus that fans them out.
//!
//! Events are purely observational. The engine publishes them while it
//! processes a tick and never reads them back.

use log::error;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use super::entities::{ActionType, BettingRound, Chips, PlayerId, TableId, TableState};

/// Events that occur while tables progress through a tournament.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    TableStateChanged {
        table_id: TableId,
        from: TableState,
        to: TableState,
    },
    HandStarted {
        table_id: TableId,
        hand_number: u32,
    },
    PlayerActed {
        table_id: TableId,
        player_id: PlayerId,
        action: ActionType,
        amount: Chips,
    },
    CommunityCardsDealt {
        table_id: TableId,
        round: BettingRound,
    },
    ShowdownStarted {
        table_id: TableId,
    },
    HandCompleted {
        table_id: TableId,
    },
    BreakStarted {
        table_id: TableId,
    },
    BreakEnded {
        table_id: TableId,
    },
    ColorUpStarted {
        table_id: TableId,
        min_chip: Chips,
    },
    ColorUpCompleted {
        table_id: TableId,
    },
    LevelChanged {
        table_id: TableId,
        level: u32,
    },
    /// A waiting player ran out of time and the default action was applied.
    ActionTimeout {
        table_id: TableId,
        player_id: PlayerId,
        action: ActionType,
    },
    PlayerMoved {
        player_id: PlayerId,
        from_table: TableId,
        to_table: TableId,
    },
    PlayerEliminated {
        table_id: TableId,
        player_id: PlayerId,
        finish_position: usize,
    },
    TournamentCompleted {
        winner_id: PlayerId,
    },
}

impl GameEvent {
    /// Table the event happened at, when it belongs to a single table.
    #[must_use]
    pub const fn table_id(&self) -> Option<TableId> {
        match self {
            Self::TableStateChanged { table_id, .. }
            | Self::HandStarted { table_id, .. }
            | Self::PlayerActed { table_id, .. }
            | Self::CommunityCardsDealt { table_id, .. }
            | Self::ShowdownStarted { table_id }
            | Self::HandCompleted { table_id }
            | Self::BreakStarted { table_id }
            | Self::BreakEnded { table_id }
            | Self::ColorUpStarted { table_id, .. }
            | Self::ColorUpCompleted { table_id }
            | Self::LevelChanged { table_id, .. }
            | Self::ActionTimeout { table_id, .. }
            | Self::PlayerEliminated { table_id, .. } => Some(*table_id),
            Self::PlayerMoved { .. } | Self::TournamentCompleted { .. } => None,
        }
    }

    /// Variant name, for counting and filtering.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TableStateChanged { .. } => "TableStateChanged",
            Self::HandStarted { .. } => "HandStarted",
            Self::PlayerActed { .. } => "PlayerActed",
            Self::CommunityCardsDealt { .. } => "CommunityCardsDealt",
            Self::ShowdownStarted { .. } => "ShowdownStarted",
            Self::HandCompleted { .. } => "HandCompleted",
            Self::BreakStarted { .. } => "BreakStarted",
            Self::BreakEnded { .. } => "BreakEnded",
            Self::ColorUpStarted { .. } => "ColorUpStarted",
            Self::ColorUpCompleted { .. } => "ColorUpCompleted",
            Self::LevelChanged { .. } => "LevelChanged",
            Self::ActionTimeout { .. } => "ActionTimeout",
            Self::PlayerMoved { .. } => "PlayerMoved",
            Self::PlayerEliminated { .. } => "PlayerEliminated",
            Self::TournamentCompleted { .. } => "TournamentCompleted",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::TableStateChanged { table_id, from, to } => {
                format!("table {table_id}: {from} -> {to}")
            }
            Self::HandStarted {
                table_id,
                hand_number,
            } => format!("table {table_id}: hand #{hand_number} started"),
            Self::PlayerActed {
                table_id,
                player_id,
                action,
                amount,
            } => match action {
                ActionType::Bet | ActionType::Raise => {
                    format!("table {table_id}: player {player_id} {action} {amount}")
                }
                _ => format!("table {table_id}: player {player_id} {action}"),
            },
            Self::CommunityCardsDealt { table_id, round } => {
                format!("table {table_id}: {round} dealt")
            }
            Self::ShowdownStarted { table_id } => format!("table {table_id}: showdown"),
            Self::HandCompleted { table_id } => format!("table {table_id}: hand completed"),
            Self::BreakStarted { table_id } => format!("table {table_id}: break started"),
            Self::BreakEnded { table_id } => format!("table {table_id}: break ended"),
            Self::ColorUpStarted { table_id, min_chip } => {
                format!("table {table_id}: coloring up to {min_chip}")
            }
            Self::ColorUpCompleted { table_id } => format!("table {table_id}: color up done"),
            Self::LevelChanged { table_id, level } => {
                format!("table {table_id}: now at level {level}")
            }
            Self::ActionTimeout {
                table_id,
                player_id,
                action,
            } => format!("table {table_id}: player {player_id} timed out and {action}"),
            Self::PlayerMoved {
                player_id,
                from_table,
                to_table,
            } => format!("player {player_id} moved from table {from_table} to table {to_table}"),
            Self::PlayerEliminated {
                table_id,
                player_id,
                finish_position,
            } => format!("table {table_id}: player {player_id} finished #{finish_position}"),
            Self::TournamentCompleted { winner_id } => {
                format!("player {winner_id} won the tournament")
            }
        };
        write!(f, "{repr}")
    }
}

/// Handle returned by [`GameEventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Subscription(u64);

type Listener = Arc<dyn Fn(&GameEvent) + Send + Sync>;

/// Synchronous publish/subscribe channel for [`GameEvent`]s.
///
/// `publish` calls every listener in subscription order on the publishing
/// thread. Listeners must not block. A listener that panics is logged and
/// skipped; the remaining listeners still receive the event.
#[derive(Default)]
pub struct GameEventBus {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(Subscription, Listener)>>,
}

impl GameEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        let subscription = Subscription(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((subscription, Arc::new(listener)));
        subscription
    }

    /// Returns whether the subscription was still registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription);
        listeners.len() != before
    }

    pub fn clear(&self) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn publish(&self, event: &GameEvent) {
        // Listeners run outside the lock so they may subscribe or
        // unsubscribe without deadlocking.
        let snapshot: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!("event listener panicked while handling `{event}`");
            }
        }
    }
}

impl fmt::Debug for GameEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
