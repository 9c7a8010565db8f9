use serde::{Deserialize, Serialize};

use crate::game::{
    collaborators::GamePlayerInfo,
    entities::{Chips, PlayerId},
};

/// A seated player with the flags the engine inspects.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SimPlayer {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub human: bool,
    /// Decisions are made on this peer.
    pub local: bool,
    pub sitting_out: bool,
    pub observer: bool,
    pub folded: bool,
    pub ask_show_winning: bool,
    pub ask_show_losing: bool,
    pub think_bank_millis: u64,
}

impl SimPlayer {
    #[must_use]
    pub fn computer(id: PlayerId, name: &str, chips: Chips) -> Self {
        Self {
            id,
            name: name.to_string(),
            chips,
            human: false,
            local: true,
            sitting_out: false,
            observer: false,
            folded: false,
            ask_show_winning: false,
            ask_show_losing: false,
            think_bank_millis: 0,
        }
    }

    #[must_use]
    pub fn human(id: PlayerId, name: &str, chips: Chips) -> Self {
        Self {
            human: true,
            ..Self::computer(id, name, chips)
        }
    }

    /// Decisions for this player arrive from another peer.
    #[must_use]
    pub fn remote(mut self) -> Self {
        self.local = false;
        self
    }

    #[must_use]
    pub fn sitting_out(mut self) -> Self {
        self.sitting_out = true;
        self
    }

    #[must_use]
    pub fn with_think_bank(mut self, millis: u64) -> Self {
        self.think_bank_millis = millis;
        self
    }

    #[must_use]
    pub fn asks_to_show(mut self, winning: bool, losing: bool) -> Self {
        self.ask_show_winning = winning;
        self.ask_show_losing = losing;
        self
    }
}

impl GamePlayerInfo for SimPlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn chip_count(&self) -> Chips {
        self.chips
    }

    fn is_human(&self) -> bool {
        self.human
    }

    fn is_locally_controlled(&self) -> bool {
        self.local
    }

    fn is_sitting_out(&self) -> bool {
        self.sitting_out
    }

    fn is_observer(&self) -> bool {
        self.observer
    }

    fn is_folded(&self) -> bool {
        self.folded
    }

    fn is_ask_show_winning(&self) -> bool {
        self.ask_show_winning
    }

    fn is_ask_show_losing(&self) -> bool {
        self.ask_show_losing
    }

    fn think_bank_millis(&self) -> u64 {
        self.think_bank_millis
    }
}
