//! A hold'em betting model without cards.
//!
//! Blinds, antes, calls for less, minimum raises and side pots follow the
//! usual rules. Showdowns compare a strength drawn when the hand is dealt
//! instead of evaluating cards.

use log::{debug, warn};

use crate::game::{
    collaborators::GameHand,
    entities::{ActionType, BettingRound, Chips, PlayerAction, PlayerId},
};

use super::player::SimPlayer;

/// Forced bets for one hand.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HandBlinds {
    pub small: Chips,
    pub big: Chips,
    pub ante: Chips,
}

#[derive(Clone, Debug)]
struct Seat {
    player: SimPlayer,
    /// Chips put in during the current round.
    bet: Chips,
    /// Chips put in during the whole hand.
    contributed: Chips,
    all_in: bool,
    acted: bool,
    strength: u32,
}

impl Seat {
    fn is_live(&self) -> bool {
        !self.player.folded
    }

    fn can_act(&self) -> bool {
        self.is_live() && !self.all_in
    }
}

#[derive(Clone, Debug)]
pub struct SimHand {
    /// In action order: small blind first.
    seats: Vec<Seat>,
    blinds: HandBlinds,
    round: BettingRound,
    current: Option<usize>,
    initialized: bool,
    pot: Chips,
    current_bet: Chips,
    last_raise: Chips,
    pre_winners: Vec<PlayerId>,
    pre_losers: Vec<PlayerId>,
    resolved: bool,
    history_stored: bool,
    actions: Vec<(PlayerId, PlayerAction)>,
}

impl SimHand {
    /// Deals a hand to `players`, listed from the small blind onwards, and
    /// posts antes and blinds. Every player starts with strength zero.
    #[must_use]
    pub fn new(players: Vec<SimPlayer>, blinds: HandBlinds) -> Self {
        let seats = players
            .into_iter()
            .map(|mut player| {
                player.folded = false;
                Seat {
                    player,
                    bet: 0,
                    contributed: 0,
                    all_in: false,
                    acted: false,
                    strength: 0,
                }
            })
            .collect();
        let mut hand = Self {
            seats,
            blinds,
            round: BettingRound::PreFlop,
            current: None,
            initialized: false,
            pot: 0,
            current_bet: 0,
            last_raise: blinds.big,
            pre_winners: Vec::new(),
            pre_losers: Vec::new(),
            resolved: false,
            history_stored: false,
            actions: Vec::new(),
        };
        hand.post_forced_bets();
        hand
    }

    /// Sets showdown strengths, in the same order as the players.
    #[must_use]
    pub fn with_strengths(mut self, strengths: &[u32]) -> Self {
        for (seat, strength) in self.seats.iter_mut().zip(strengths) {
            seat.strength = *strength;
        }
        self
    }

    fn post_forced_bets(&mut self) {
        if self.blinds.ante > 0 {
            for idx in 0..self.seats.len() {
                self.put_in(idx, self.blinds.ante);
                // Antes are dead money, not part of the round's bet.
                self.seats[idx].bet = 0;
            }
        }
        if !self.seats.is_empty() {
            self.put_in(0, self.blinds.small);
        }
        if self.seats.len() > 1 {
            self.put_in(1, self.blinds.big);
        }
        self.current_bet = self.seats.iter().map(|s| s.bet).max().unwrap_or(0);
    }

    fn put_in(&mut self, idx: usize, amount: Chips) {
        let seat = &mut self.seats[idx];
        let paid = amount.min(seat.player.chips);
        seat.player.chips -= paid;
        seat.bet += paid;
        seat.contributed += paid;
        self.pot += paid;
        if seat.player.chips == 0 {
            seat.all_in = true;
        }
    }

    fn index_of(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.player.id == player)
    }

    fn live_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_live()).count()
    }

    fn needs_to_act(&self, idx: usize) -> bool {
        let seat = &self.seats[idx];
        seat.can_act() && (!seat.acted || seat.bet < self.current_bet)
    }

    fn betting_closed(&self) -> bool {
        let mut active = self.seats.iter().filter(|s| s.can_act());
        match (active.next(), active.next()) {
            (None, _) => true,
            // Nobody left to bet against.
            (Some(only), None) if only.bet >= self.current_bet => true,
            _ => !(0..self.seats.len()).any(|idx| self.needs_to_act(idx)),
        }
    }

    /// First seat at or after `start`, wrapping around, that still needs
    /// to act.
    fn next_to_act(&self, start: usize) -> Option<usize> {
        let len = self.seats.len();
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&idx| self.needs_to_act(idx))
    }

    fn first_to_act(&self) -> usize {
        match self.round {
            BettingRound::PreFlop if !self.seats.is_empty() => 2 % self.seats.len(),
            _ => 0,
        }
    }

    fn compute_pre_winners(&mut self) {
        let best = self
            .seats
            .iter()
            .filter(|s| s.is_live())
            .map(|s| s.strength)
            .max();
        let (winners, losers): (Vec<&Seat>, Vec<&Seat>) = self
            .seats
            .iter()
            .filter(|s| s.is_live())
            .partition(|s| Some(s.strength) == best);
        self.pre_winners = winners.iter().map(|s| s.player.id).collect();
        self.pre_losers = losers.iter().map(|s| s.player.id).collect();
    }

    /// Splits the pot into side pots by contribution and pays each to the
    /// strongest live players eligible for it.
    fn award_pots(&mut self) {
        let mut levels: Vec<Chips> = self
            .seats
            .iter()
            .filter(|s| s.is_live())
            .map(|s| s.contributed)
            .collect();
        levels.sort_unstable();
        levels.dedup();
        let top = self.seats.iter().map(|s| s.contributed).max().unwrap_or(0);

        let mut floor = 0;
        for (i, &level) in levels.iter().enumerate() {
            // Dead money above the last live level goes to the top pot.
            let cap = if i + 1 == levels.len() { top } else { level };
            let layer: Chips = self
                .seats
                .iter()
                .map(|s| s.contributed.min(cap).saturating_sub(floor))
                .sum();
            floor = cap;
            if layer == 0 {
                continue;
            }

            let eligible: Vec<usize> = (0..self.seats.len())
                .filter(|&idx| self.seats[idx].is_live() && self.seats[idx].contributed >= level)
                .collect();
            let Some(best) = eligible.iter().map(|&idx| self.seats[idx].strength).max() else {
                continue;
            };
            let winners: Vec<usize> = eligible
                .into_iter()
                .filter(|&idx| self.seats[idx].strength == best)
                .collect();
            let count = Chips::try_from(winners.len()).unwrap_or(Chips::MAX);
            let share = layer / count;
            let mut remainder = layer % count;
            for idx in winners {
                let odd_chip = u32::from(remainder > 0);
                remainder = remainder.saturating_sub(1);
                self.seats[idx].player.chips += share + odd_chip;
            }
        }
        self.pot = 0;
    }

    #[must_use]
    pub const fn pot(&self) -> Chips {
        self.pot
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    #[must_use]
    pub const fn is_history_stored(&self) -> bool {
        self.history_stored
    }

    /// Players as they stand in this hand, chips included.
    pub fn players(&self) -> impl Iterator<Item = &SimPlayer> {
        self.seats.iter().map(|s| &s.player)
    }

    /// Actions applied so far, in order.
    #[must_use]
    pub fn actions(&self) -> &[(PlayerId, PlayerAction)] {
        &self.actions
    }

    /// Chips at stake: everyone's stack plus the pot.
    #[must_use]
    pub fn total_chips(&self) -> Chips {
        self.pot + self.seats.iter().map(|s| s.player.chips).sum::<Chips>()
    }
}

impl GameHand for SimHand {
    type Player = SimPlayer;

    fn round(&self) -> BettingRound {
        self.round
    }

    fn is_done(&self) -> bool {
        self.resolved
            || self.round == BettingRound::Showdown
            || self.live_count() <= 1
            || self.betting_closed()
    }

    fn num_with_cards(&self) -> usize {
        self.live_count()
    }

    fn is_uncontested(&self) -> bool {
        self.live_count() == 1
    }

    fn current_player_with_init(&mut self) -> Option<SimPlayer> {
        if self.is_done() {
            return None;
        }
        let start = match (self.initialized, self.current) {
            (false, _) => {
                self.initialized = true;
                self.first_to_act()
            }
            (true, Some(idx)) => idx,
            (true, None) => 0,
        };
        self.current = self.next_to_act(start);
        self.current.map(|idx| self.seats[idx].player.clone())
    }

    fn amount_to_call(&self, player: PlayerId) -> Chips {
        self.index_of(player)
            .map_or(0, |idx| self.current_bet.saturating_sub(self.seats[idx].bet))
    }

    fn min_bet(&self) -> Chips {
        self.blinds.big
    }

    fn min_raise(&self) -> Chips {
        self.last_raise.max(self.blinds.big)
    }

    fn apply_player_action(&mut self, player: PlayerId, action: PlayerAction) {
        let Some(idx) = self.index_of(player) else {
            warn!("player {player} is not in this hand, ignoring `{action}`");
            return;
        };
        let to_call = self.amount_to_call(player);
        let action_type = match action.action_type {
            ActionType::Check if to_call > 0 => ActionType::Fold,
            ActionType::Call if to_call == 0 => ActionType::Check,
            other => other,
        };

        match action_type {
            ActionType::Fold => self.seats[idx].player.folded = true,
            ActionType::Check => {}
            ActionType::Call => self.put_in(idx, to_call),
            // A raise amount is the increment over the call.
            ActionType::Bet | ActionType::Raise => {
                let total = if action_type == ActionType::Bet {
                    action.amount
                } else {
                    to_call + action.amount
                };
                self.put_in(idx, total);
                let bet = self.seats[idx].bet;
                if bet > self.current_bet {
                    let raise = bet - self.current_bet;
                    // An all-in for less than a full raise does not reopen
                    // the minimum.
                    if raise >= self.last_raise {
                        self.last_raise = raise;
                    }
                    self.current_bet = bet;
                }
            }
        }

        self.seats[idx].acted = true;
        self.actions.push((player, action));
        self.current = Some((idx + 1) % self.seats.len());
        debug!(
            "player {player} {action} ({} to call, pot {})",
            to_call, self.pot
        );
    }

    fn advance_round(&mut self) {
        if self.round == BettingRound::Showdown {
            return;
        }
        self.round = self.round.next();
        for seat in &mut self.seats {
            seat.bet = 0;
            seat.acted = false;
        }
        self.current_bet = 0;
        self.last_raise = self.blinds.big;
        self.initialized = false;
        self.current = None;
    }

    fn pre_resolve(&mut self, _is_online: bool) {
        self.compute_pre_winners();
    }

    fn resolve(&mut self) {
        if self.resolved {
            return;
        }
        self.compute_pre_winners();
        self.award_pots();
        self.resolved = true;
    }

    fn store_hand_history(&mut self) {
        self.history_stored = true;
    }

    fn pre_winners(&self) -> Vec<SimPlayer> {
        self.seats
            .iter()
            .filter(|s| self.pre_winners.contains(&s.player.id))
            .map(|s| s.player.clone())
            .collect()
    }

    fn pre_losers(&self) -> Vec<SimPlayer> {
        self.seats
            .iter()
            .filter(|s| self.pre_losers.contains(&s.player.id))
            .map(|s| s.player.clone())
            .collect()
    }

    fn contains_player(&self, player: PlayerId) -> bool {
        self.index_of(player).is_some()
    }
}
