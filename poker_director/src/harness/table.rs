//! An in-memory table implementing [`GameTable`].

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{collections::HashMap, sync::Arc};

use crate::{
    game::{
        collaborators::GameTable,
        entities::{Chips, PlayerId, TableId, TableState},
    },
    tournament::TournamentConfig,
};

use super::{
    errors::{SimError, SimResult},
    hand::{HandBlinds, SimHand},
    player::SimPlayer,
};

/// Showdown strengths are drawn from `0..HAND_STRENGTH_RANGE`.
const HAND_STRENGTH_RANGE: u32 = 1000;

#[derive(Debug)]
pub struct SimTable {
    number: TableId,
    config: Arc<TournamentConfig>,
    seats: Vec<Option<SimPlayer>>,
    button: usize,
    state: TableState,
    previous_state: TableState,
    pending_state: TableState,
    pending_phase: Option<String>,
    hand: Option<SimHand>,
    hand_num: u32,
    level: u32,
    min_chip: Chips,
    next_min_chip: Chips,
    coloring_up: bool,
    auto_deal: bool,
    auto_deal_delay_millis: u64,
    current: bool,
    zip: bool,
    wait_list: Vec<SimPlayer>,
    /// Players moved here since the last hand.
    added: Vec<SimPlayer>,
    /// Busted players who may still rebuy.
    rebuy_list: Vec<PlayerId>,
    /// Players removed from their seats, not yet reported.
    eliminated: Vec<SimPlayer>,
    on_break: bool,
    pause_millis: u64,
    millis_in_state: i64,
    player_timeouts: HashMap<PlayerId, u64>,
    rng: StdRng,
}

impl SimTable {
    #[must_use]
    pub fn new(number: TableId, num_seats: usize, config: Arc<TournamentConfig>, seed: u64) -> Self {
        let level = config.starting_level;
        let min_chip = config.min_chip_for(level);
        Self {
            number,
            config,
            seats: vec![None; num_seats],
            button: 0,
            state: TableState::DealForButton,
            previous_state: TableState::None,
            pending_state: TableState::None,
            pending_phase: None,
            hand: None,
            hand_num: 0,
            level,
            min_chip,
            next_min_chip: min_chip,
            coloring_up: false,
            auto_deal: false,
            auto_deal_delay_millis: 0,
            current: false,
            zip: false,
            wait_list: Vec::new(),
            added: Vec::new(),
            rebuy_list: Vec::new(),
            eliminated: Vec::new(),
            on_break: false,
            pause_millis: 0,
            millis_in_state: 0,
            player_timeouts: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn with_auto_deal(mut self, delay_millis: u64) -> Self {
        self.auto_deal = true;
        self.auto_deal_delay_millis = delay_millis;
        self
    }

    #[must_use]
    pub fn with_zip_mode(mut self) -> Self {
        self.zip = true;
        self
    }

    pub fn set_current(&mut self, current: bool) {
        self.current = current;
    }

    pub fn set_pending_phase(&mut self, phase: Option<String>) {
        self.pending_phase = phase;
    }

    /// Seats `player` in the first empty seat.
    pub fn add_player(&mut self, player: SimPlayer) -> SimResult<usize> {
        if self.seat_of(player.id).is_some() {
            return Err(SimError::DuplicatePlayer(player.id));
        }
        let seat = self
            .seats
            .iter()
            .position(Option::is_none)
            .ok_or(SimError::TableFull(self.number))?;
        self.seats[seat] = Some(player);
        Ok(seat)
    }

    /// Seats a player moved from another table. Shown on the next clean.
    pub fn receive_player(&mut self, player: SimPlayer) -> SimResult<usize> {
        let seat = self.add_player(player.clone())?;
        self.added.push(player);
        Ok(seat)
    }

    /// Empties every seat, returning the players in seat order.
    pub fn remove_all_players(&mut self) -> Vec<SimPlayer> {
        self.seats.iter_mut().filter_map(Option::take).collect()
    }

    #[must_use]
    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.seats
            .iter()
            .position(|seat| seat.as_ref().is_some_and(|p| p.id == player))
    }

    pub fn players(&self) -> impl Iterator<Item = &SimPlayer> {
        self.seats.iter().flatten()
    }

    #[must_use]
    pub fn free_seats(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_none()).count()
    }

    #[must_use]
    pub fn chips_in_play(&self) -> Chips {
        match &self.hand {
            Some(hand) if !hand.is_resolved() => hand.total_chips(),
            _ => self.players().map(|p| p.chips).sum(),
        }
    }

    #[must_use]
    pub const fn min_chip(&self) -> Chips {
        self.min_chip
    }

    #[must_use]
    pub const fn button(&self) -> usize {
        self.button
    }

    #[must_use]
    pub const fn is_on_break(&self) -> bool {
        self.on_break
    }

    #[must_use]
    pub fn player_timeout(&self, player: PlayerId) -> Option<u64> {
        self.player_timeouts.get(&player).copied()
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.pause_millis > 0
    }

    /// Lets `millis` of table time pass.
    pub fn advance_time(&mut self, millis: u64) {
        self.pause_millis = self.pause_millis.saturating_sub(millis);
        self.millis_in_state = self
            .millis_in_state
            .saturating_add(i64::try_from(millis).unwrap_or(i64::MAX));
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// Copies stacks out of the finished hand back onto the seats.
    pub fn settle_hand(&mut self) {
        let Some(hand) = self.hand.take() else {
            return;
        };
        for player in hand.players() {
            if let Some(seated) = self
                .seats
                .iter_mut()
                .flatten()
                .find(|seated| seated.id == player.id)
            {
                seated.chips = player.chips;
            }
        }
        for seated in self.seats.iter_mut().flatten() {
            seated.folded = false;
        }
    }

    /// Removes players without chips. During the rebuy period they wait on
    /// the rebuy list instead and keep their seat.
    pub fn collect_busted(&mut self, rebuys_allowed: bool) {
        let allow = rebuys_allowed && self.config.is_rebuy_period(self.level);
        for seat in &mut self.seats {
            let busted = seat.as_ref().is_some_and(|p| p.chips == 0);
            if !busted {
                continue;
            }
            if allow {
                if let Some(player) = seat.as_ref() {
                    if !self.rebuy_list.contains(&player.id) {
                        debug!("table {}: player {} may rebuy", self.number, player.id);
                        self.rebuy_list.push(player.id);
                    }
                }
            } else if let Some(player) = seat.take() {
                self.rebuy_list.retain(|id| *id != player.id);
                self.eliminated.push(player);
            }
        }
    }

    /// Players removed since the previous call, in the order they busted.
    pub fn take_eliminated(&mut self) -> Vec<SimPlayer> {
        std::mem::take(&mut self.eliminated)
    }

    #[must_use]
    pub fn rebuy_list(&self) -> &[PlayerId] {
        &self.rebuy_list
    }

    fn hand_players(&self) -> Vec<SimPlayer> {
        let len = self.seats.len();
        (1..=len)
            .map(|offset| (self.button + offset) % len)
            .filter_map(|seat| self.seats[seat].clone())
            .filter(|p| p.chips > 0)
            .collect()
    }

    fn next_button(&self) -> usize {
        let len = self.seats.len();
        (1..=len)
            .map(|offset| (self.button + offset) % len)
            .find(|&seat| self.seats[seat].as_ref().is_some_and(|p| p.chips > 0))
            .unwrap_or(self.button)
    }
}

impl GameTable for SimTable {
    type Player = SimPlayer;
    type Hand = SimHand;

    fn number(&self) -> TableId {
        self.number
    }

    fn table_state(&self) -> TableState {
        self.state
    }

    fn set_table_state(&mut self, state: TableState) {
        if state != self.state {
            self.previous_state = self.state;
            self.state = state;
            self.millis_in_state = 0;
        }
    }

    fn pending_table_state(&self) -> TableState {
        self.pending_state
    }

    fn set_pending_table_state(&mut self, state: TableState) {
        self.pending_state = state;
    }

    fn previous_table_state(&self) -> TableState {
        self.previous_state
    }

    fn pending_phase(&self) -> Option<&str> {
        self.pending_phase.as_deref()
    }

    fn seats(&self) -> usize {
        self.seats.len()
    }

    fn player(&self, seat: usize) -> Option<&SimPlayer> {
        self.seats.get(seat).and_then(Option::as_ref)
    }

    fn added_players(&self) -> &[SimPlayer] {
        &self.added
    }

    fn hand(&self) -> Option<&SimHand> {
        self.hand.as_ref()
    }

    fn hand_mut(&mut self) -> Option<&mut SimHand> {
        self.hand.as_mut()
    }

    fn hand_num(&self) -> u32 {
        self.hand_num
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn is_current(&self) -> bool {
        self.current
    }

    fn is_auto_deal(&self) -> bool {
        self.auto_deal
    }

    fn auto_deal_delay_millis(&self) -> u64 {
        self.auto_deal_delay_millis
    }

    fn is_zip_mode(&self) -> bool {
        self.zip
    }

    fn set_zip_mode(&mut self, zip: bool) {
        self.zip = zip;
    }

    fn set_button(&mut self) {
        let occupied: Vec<usize> = (0..self.seats.len())
            .filter(|&seat| self.seats[seat].is_some())
            .collect();
        if occupied.is_empty() {
            return;
        }
        // High card wins the button.
        self.button = occupied[self.rng.random_range(0..occupied.len())];
        info!("table {}: button starts at seat {}", self.number, self.button);
    }

    fn start_new_hand(&mut self) {
        self.settle_hand();
        if self.hand_num > 0 {
            self.button = self.next_button();
        }
        self.hand_num += 1;
        self.on_break = false;
        self.added.clear();
        self.player_timeouts.clear();

        let blinds = self
            .config
            .playing_level(self.level)
            .map(|bl| HandBlinds {
                small: bl.small_blind,
                big: bl.big_blind,
                ante: bl.ante.unwrap_or(0),
            })
            .unwrap_or_default();
        let players = self.hand_players();
        let strengths: Vec<u32> = players
            .iter()
            .map(|_| self.rng.random_range(0..HAND_STRENGTH_RANGE))
            .collect();
        debug!(
            "table {}: hand #{} with {} players, blinds {}/{}",
            self.number,
            self.hand_num,
            players.len(),
            blinds.small,
            blinds.big
        );
        self.hand = Some(SimHand::new(players, blinds).with_strengths(&strengths));
    }

    fn start_break(&mut self) {
        self.settle_hand();
        self.on_break = true;
        info!("table {}: on break", self.number);
    }

    fn process_ai_rebuys(&mut self) {
        let Some(policy) = self.config.rebuy else {
            return;
        };
        let number = self.number;
        let rebuy_list = &mut self.rebuy_list;
        for player in self.seats.iter_mut().flatten() {
            if player.human || player.chips > 0 || !rebuy_list.contains(&player.id) {
                continue;
            }
            player.chips = policy.chips;
            rebuy_list.retain(|id| *id != player.id);
            info!("table {number}: player {} rebuys for {}", player.id, policy.chips);
        }
    }

    fn process_ai_add_ons(&mut self) {
        let Some(policy) = self.config.add_on else {
            return;
        };
        // The table still holds the level that just ended.
        if self.level != policy.level.saturating_sub(1) {
            return;
        }
        for player in self.seats.iter_mut().flatten() {
            if !player.human && player.chips > 0 {
                player.chips += policy.chips;
            }
        }
        info!("table {}: computers take the add-on", self.number);
    }

    fn clear_rebuy_list(&mut self) {
        let pending = std::mem::take(&mut self.rebuy_list);
        for id in pending {
            if let Some(seat) = self.seat_of(id) {
                if let Some(player) = self.seats[seat].take_if(|p| p.chips == 0) {
                    self.eliminated.push(player);
                }
            }
        }
    }

    fn set_next_min_chip(&mut self, min_chip: Chips) {
        self.next_min_chip = min_chip;
    }

    fn do_color_up_determination(&mut self) {
        let next = self.next_min_chip;
        self.coloring_up = next > self.min_chip
            && next > 0
            && self.players().any(|p| p.chips % next != 0);
        if !self.coloring_up {
            self.min_chip = self.min_chip.max(next);
        }
    }

    fn is_coloring_up(&self) -> bool {
        self.coloring_up
    }

    fn color_up(&mut self) {
        let next = self.next_min_chip;
        if next == 0 {
            return;
        }
        for player in self.seats.iter_mut().flatten() {
            let odd = player.chips % next;
            // Odd chips round to the nearest whole chip of the new size.
            player.chips -= odd;
            if odd * 2 >= next {
                player.chips += next;
            }
        }
    }

    fn color_up_finish(&mut self) {
        self.min_chip = self.next_min_chip;
        self.coloring_up = false;
        info!("table {}: colored up to {}", self.number, self.min_chip);
    }

    fn add_wait(&mut self, player: SimPlayer) {
        if !self.wait_list.iter().any(|p| p.id == player.id) {
            self.wait_list.push(player);
        }
    }

    fn remove_wait_all(&mut self) {
        self.wait_list.clear();
    }

    fn wait_size(&self) -> usize {
        self.wait_list.len()
    }

    fn wait_player(&self, index: usize) -> Option<&SimPlayer> {
        self.wait_list.get(index)
    }

    fn millis_since_last_state_change(&self) -> i64 {
        self.millis_in_state
    }

    fn set_pause(&mut self, millis: u64) {
        self.pause_millis = millis;
    }

    fn set_player_timeout(&mut self, player: PlayerId, millis: u64) {
        self.player_timeouts.insert(player, millis);
    }
}
