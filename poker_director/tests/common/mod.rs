//! Recording stubs for the collaborator traits.
//!
//! Every field is public so a test can set up exactly the situation it
//! needs, and every mutating call is logged so it can assert on what the
//! engine did.

#![allow(dead_code)]

use poker_director::{
    game::{
        GameEvent, GameEventBus, GameHand, GamePlayerInfo, GameTable, PlayerActionProvider,
        TournamentContext,
        entities::{BettingRound, Chips, PlayerAction, PlayerId, TableId, TableState},
    },
    TournamentEngine,
};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StubPlayer {
    pub id: PlayerId,
    pub chips: Chips,
    pub human: bool,
    pub local: bool,
    pub sitting_out: bool,
    pub observer: bool,
    pub folded: bool,
    pub ask_show_winning: bool,
    pub ask_show_losing: bool,
    pub think_bank_millis: u64,
}

impl StubPlayer {
    pub fn computer(id: PlayerId, chips: Chips) -> Self {
        Self {
            id,
            chips,
            local: true,
            ..Self::default()
        }
    }

    pub fn human(id: PlayerId, chips: Chips) -> Self {
        Self {
            human: true,
            ..Self::computer(id, chips)
        }
    }

    pub fn remote_human(id: PlayerId, chips: Chips) -> Self {
        Self {
            local: false,
            ..Self::human(id, chips)
        }
    }
}

impl GamePlayerInfo for StubPlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        "stub"
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

#[derive(Clone, Debug)]
pub struct StubHand {
    pub round: BettingRound,
    pub done: bool,
    pub num_with_cards: usize,
    pub uncontested: bool,
    pub current: Option<StubPlayer>,
    pub to_call: Chips,
    pub min_bet: Chips,
    pub min_raise: Chips,
    pub applied: Vec<(PlayerId, PlayerAction)>,
    pub advances: u32,
    pub pre_resolved: Option<bool>,
    pub resolves: u32,
    pub history_stored: bool,
    pub winners: Vec<StubPlayer>,
    pub losers: Vec<StubPlayer>,
}

impl Default for StubHand {
    fn default() -> Self {
        Self {
            round: BettingRound::PreFlop,
            done: false,
            num_with_cards: 3,
            uncontested: false,
            current: None,
            to_call: 0,
            min_bet: 20,
            min_raise: 20,
            applied: Vec::new(),
            advances: 0,
            pre_resolved: None,
            resolves: 0,
            history_stored: false,
            winners: Vec::new(),
            losers: Vec::new(),
        }
    }
}

impl StubHand {
    /// A hand waiting on `player`, who owes `to_call`.
    pub fn waiting_on(player: StubPlayer, to_call: Chips) -> Self {
        Self {
            current: Some(player),
            to_call,
            ..Self::default()
        }
    }
}

impl GameHand for StubHand {
    type Player = StubPlayer;

    fn round(&self) -> BettingRound {
        self.round
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn num_with_cards(&self) -> usize {
        self.num_with_cards
    }

    fn is_uncontested(&self) -> bool {
        self.uncontested
    }

    fn current_player_with_init(&mut self) -> Option<StubPlayer> {
        self.current.clone()
    }

    fn amount_to_call(&self, _player: PlayerId) -> Chips {
        self.to_call
    }

    fn min_bet(&self) -> Chips {
        self.min_bet
    }

    fn min_raise(&self) -> Chips {
        self.min_raise
    }

    fn apply_player_action(&mut self, player: PlayerId, action: PlayerAction) {
        self.applied.push((player, action));
    }

    fn advance_round(&mut self) {
        self.round = self.round.next();
        self.advances += 1;
    }

    fn pre_resolve(&mut self, is_online: bool) {
        self.pre_resolved = Some(is_online);
    }

    fn resolve(&mut self) {
        self.resolves += 1;
    }

    fn store_hand_history(&mut self) {
        self.history_stored = true;
    }

    fn pre_winners(&self) -> Vec<StubPlayer> {
        self.winners.clone()
    }

    fn pre_losers(&self) -> Vec<StubPlayer> {
        self.losers.clone()
    }

    fn contains_player(&self, player: PlayerId) -> bool {
        self.current.as_ref().is_some_and(|p| p.id == player)
            || self.winners.iter().chain(&self.losers).any(|p| p.id == player)
    }
}

#[derive(Clone, Debug)]
pub struct StubTable {
    pub number: TableId,
    pub state: TableState,
    pub pending: TableState,
    pub previous: TableState,
    pub pending_phase: Option<String>,
    pub seats: Vec<Option<StubPlayer>>,
    pub added: Vec<StubPlayer>,
    pub hand: Option<StubHand>,
    pub hand_num: u32,
    pub level: u32,
    pub current: bool,
    pub auto_deal: bool,
    pub auto_deal_delay_millis: u64,
    pub zip: bool,
    /// What `do_color_up_determination` decides.
    pub needs_color_up: bool,
    pub coloring_up: bool,
    pub next_min_chip: Option<Chips>,
    pub wait_list: Vec<StubPlayer>,
    pub millis_since_change: i64,
    pub pause: Option<u64>,
    pub player_timeouts: Vec<(PlayerId, u64)>,
    pub calls: Vec<&'static str>,
}

impl StubTable {
    pub fn new(state: TableState) -> Self {
        Self {
            number: 1,
            state,
            pending: TableState::None,
            previous: TableState::None,
            pending_phase: None,
            seats: vec![
                Some(StubPlayer::computer(1, 1000)),
                Some(StubPlayer::computer(2, 1000)),
                None,
                None,
            ],
            added: Vec::new(),
            hand: None,
            hand_num: 0,
            level: 1,
            current: true,
            auto_deal: false,
            auto_deal_delay_millis: 0,
            zip: false,
            needs_color_up: false,
            coloring_up: false,
            next_min_chip: None,
            wait_list: Vec::new(),
            millis_since_change: 0,
            pause: None,
            player_timeouts: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn with_hand(mut self, hand: StubHand) -> Self {
        self.hand = Some(hand);
        self
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.contains(&name)
    }

    pub fn hand_ref(&self) -> &StubHand {
        self.hand.as_ref().expect("table has a hand")
    }
}

impl GameTable for StubTable {
    type Player = StubPlayer;
    type Hand = StubHand;

    fn number(&self) -> TableId {
        self.number
    }

    fn table_state(&self) -> TableState {
        self.state
    }

    fn set_table_state(&mut self, state: TableState) {
        self.previous = self.state;
        self.state = state;
    }

    fn pending_table_state(&self) -> TableState {
        self.pending
    }

    fn set_pending_table_state(&mut self, state: TableState) {
        self.pending = state;
    }

    fn previous_table_state(&self) -> TableState {
        self.previous
    }

    fn pending_phase(&self) -> Option<&str> {
        self.pending_phase.as_deref()
    }

    fn seats(&self) -> usize {
        self.seats.len()
    }

    fn player(&self, seat: usize) -> Option<&StubPlayer> {
        self.seats.get(seat).and_then(Option::as_ref)
    }

    fn added_players(&self) -> &[StubPlayer] {
        &self.added
    }

    fn hand(&self) -> Option<&StubHand> {
        self.hand.as_ref()
    }

    fn hand_mut(&mut self) -> Option<&mut StubHand> {
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
        self.calls.push("set_zip_mode");
    }

    fn set_button(&mut self) {
        self.calls.push("set_button");
    }

    fn start_new_hand(&mut self) {
        self.hand_num += 1;
        self.calls.push("start_new_hand");
    }

    fn start_break(&mut self) {
        self.calls.push("start_break");
    }

    fn process_ai_rebuys(&mut self) {
        self.calls.push("process_ai_rebuys");
    }

    fn process_ai_add_ons(&mut self) {
        self.calls.push("process_ai_add_ons");
    }

    fn clear_rebuy_list(&mut self) {
        self.calls.push("clear_rebuy_list");
    }

    fn set_next_min_chip(&mut self, min_chip: Chips) {
        self.next_min_chip = Some(min_chip);
    }

    fn do_color_up_determination(&mut self) {
        self.coloring_up = self.needs_color_up;
        self.calls.push("do_color_up_determination");
    }

    fn is_coloring_up(&self) -> bool {
        self.coloring_up
    }

    fn color_up(&mut self) {
        self.calls.push("color_up");
    }

    fn color_up_finish(&mut self) {
        self.coloring_up = false;
        self.calls.push("color_up_finish");
    }

    fn add_wait(&mut self, player: StubPlayer) {
        self.wait_list.push(player);
    }

    fn remove_wait_all(&mut self) {
        self.wait_list.clear();
        self.calls.push("remove_wait_all");
    }

    fn wait_size(&self) -> usize {
        self.wait_list.len()
    }

    fn wait_player(&self, index: usize) -> Option<&StubPlayer> {
        self.wait_list.get(index)
    }

    fn millis_since_last_state_change(&self) -> i64 {
        self.millis_since_change
    }

    fn set_pause(&mut self, millis: u64) {
        self.pause = Some(millis);
    }

    fn set_player_timeout(&mut self, player: PlayerId, millis: u64) {
        self.player_timeouts.push((player, millis));
    }
}

#[derive(Clone, Debug)]
pub struct StubTournament {
    pub num_players: usize,
    pub one_player_left: bool,
    pub level: u32,
    pub level_expired: bool,
    pub break_levels: Vec<u32>,
    pub min_chip: Chips,
    pub last_min_chip: Chips,
    pub timeout_secs: u32,
    pub scheduled_enabled: bool,
    pub scheduled_start: i64,
    pub min_players_for_scheduled_start: usize,
    pub now: i64,
    pub local: Option<StubPlayer>,
    pub calls: Vec<&'static str>,
}

impl Default for StubTournament {
    fn default() -> Self {
        Self {
            num_players: 2,
            one_player_left: false,
            level: 1,
            level_expired: false,
            break_levels: Vec::new(),
            min_chip: 5,
            last_min_chip: 5,
            timeout_secs: 30,
            scheduled_enabled: false,
            scheduled_start: 0,
            min_players_for_scheduled_start: 2,
            now: 0,
            local: None,
            calls: Vec::new(),
        }
    }
}

impl StubTournament {
    pub fn called(&self, name: &str) -> bool {
        self.calls.contains(&name)
    }
}

impl TournamentContext for StubTournament {
    fn num_players(&self) -> usize {
        self.num_players
    }

    fn is_one_player_left(&self) -> bool {
        self.one_player_left
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn next_level(&mut self) {
        self.level += 1;
        self.level_expired = false;
        self.calls.push("next_level");
    }

    fn is_level_expired(&self) -> bool {
        self.level_expired
    }

    fn is_break_level(&self, level: u32) -> bool {
        self.break_levels.contains(&level)
    }

    fn small_blind(&self, level: u32) -> Chips {
        10 * level
    }

    fn big_blind(&self, level: u32) -> Chips {
        20 * level
    }

    fn ante(&self, _level: u32) -> Chips {
        0
    }

    fn min_chip(&self) -> Chips {
        self.min_chip
    }

    fn last_min_chip(&self) -> Chips {
        self.last_min_chip
    }

    fn advance_clock(&mut self) {
        self.calls.push("advance_clock");
    }

    fn advance_clock_break(&mut self) {
        self.calls.push("advance_clock_break");
    }

    fn start_game_clock(&mut self) {
        self.calls.push("start_game_clock");
    }

    fn timeout_seconds(&self) -> u32 {
        self.timeout_secs
    }

    fn timeout_for_round(&self, _round: BettingRound) -> u32 {
        self.timeout_secs
    }

    fn is_scheduled_start_enabled(&self) -> bool {
        self.scheduled_enabled
    }

    fn scheduled_start_time(&self) -> i64 {
        self.scheduled_start
    }

    fn min_players_for_scheduled_start(&self) -> usize {
        self.min_players_for_scheduled_start
    }

    fn local_player(&self) -> Option<&dyn GamePlayerInfo> {
        self.local.as_ref().map(|p| p as &dyn GamePlayerInfo)
    }

    fn now_millis(&self) -> i64 {
        self.now
    }
}

/// An engine whose published events are collected in order.
pub fn recording_engine(
    provider: impl PlayerActionProvider + 'static,
) -> (TournamentEngine, Arc<Mutex<Vec<GameEvent>>>) {
    let bus = Arc::new(GameEventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    (TournamentEngine::new(bus, provider), seen)
}
