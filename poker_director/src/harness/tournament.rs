//! Tournament-wide state shared by every table of a simulation.

use log::info;
use std::sync::Arc;

use crate::{
    clock::TournamentClock,
    game::{
        collaborators::{GamePlayerInfo, TournamentContext},
        entities::{BettingRound, Chips, PlayerId},
    },
    tournament::TournamentConfig,
};

use super::player::SimPlayer;

/// Level time used up by each dealt street in a practice game.
pub const DEFAULT_MILLIS_PER_ACTION: i64 = 12_000;

#[derive(Debug)]
pub struct SimTournament {
    config: Arc<TournamentConfig>,
    level: u32,
    last_min_chip: Chips,
    clock: TournamentClock,
    now_millis: i64,
    online: bool,
    num_players: usize,
    remaining: usize,
    /// Busted players, first out first.
    finish_order: Vec<PlayerId>,
    local_player: Option<SimPlayer>,
    millis_per_action: i64,
}

impl SimTournament {
    #[must_use]
    pub fn new(config: Arc<TournamentConfig>, num_players: usize, now_millis: i64) -> Self {
        let level = config.starting_level;
        let mut clock = TournamentClock::new();
        clock.set_seconds_remaining(config.duration_for(level), now_millis);
        Self {
            last_min_chip: config.min_chip_for(level),
            config,
            level,
            clock,
            now_millis,
            online: false,
            num_players,
            remaining: num_players,
            finish_order: Vec::new(),
            local_player: None,
            millis_per_action: DEFAULT_MILLIS_PER_ACTION,
        }
    }

    /// Level time follows simulated wall time instead of dealt streets.
    #[must_use]
    pub fn online(mut self) -> Self {
        self.online = true;
        self
    }

    #[must_use]
    pub fn with_local_player(mut self, player: SimPlayer) -> Self {
        self.local_player = Some(player);
        self
    }

    #[must_use]
    pub fn with_millis_per_action(mut self, millis: i64) -> Self {
        self.millis_per_action = millis;
        self
    }

    #[must_use]
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.online
    }

    #[must_use]
    pub const fn clock(&self) -> &TournamentClock {
        &self.clock
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    #[must_use]
    pub fn finish_order(&self) -> &[PlayerId] {
        &self.finish_order
    }

    /// Records a bust-out and returns the finishing position.
    pub fn player_out(&mut self, player: PlayerId) -> usize {
        let position = self.remaining;
        self.remaining = self.remaining.saturating_sub(1);
        self.finish_order.push(player);
        info!("player {player} finishes in position {position}");
        position
    }

    /// Moves simulated wall time forward. Online, the level clock follows
    /// and playing levels advance on their own.
    pub fn advance_time(&mut self, millis: i64) {
        self.now_millis += millis.max(0);
        if !self.online {
            return;
        }
        self.clock.tick(self.now_millis);
        // Breaks end from the table, once every table has seen them.
        if self.clock.is_expired() && !self.config.is_break_level(self.level) {
            self.next_level();
            self.clock.start(self.now_millis);
        }
    }
}

impl TournamentContext for SimTournament {
    fn num_players(&self) -> usize {
        self.num_players
    }

    fn is_one_player_left(&self) -> bool {
        self.remaining <= 1
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn next_level(&mut self) {
        self.last_min_chip = self.config.min_chip_for(self.level);
        self.level += 1;
        self.clock
            .reset(self.config.duration_for(self.level), self.now_millis);
        info!("level {} begins", self.level);
    }

    fn is_level_expired(&self) -> bool {
        self.clock.is_expired()
    }

    fn is_break_level(&self, level: u32) -> bool {
        self.config.is_break_level(level)
    }

    fn small_blind(&self, level: u32) -> Chips {
        self.config.playing_level(level).map_or(0, |bl| bl.small_blind)
    }

    fn big_blind(&self, level: u32) -> Chips {
        self.config.playing_level(level).map_or(0, |bl| bl.big_blind)
    }

    fn ante(&self, level: u32) -> Chips {
        self.config
            .playing_level(level)
            .and_then(|bl| bl.ante)
            .unwrap_or(0)
    }

    fn min_chip(&self) -> Chips {
        self.config.min_chip_for(self.level)
    }

    fn last_min_chip(&self) -> Chips {
        self.last_min_chip
    }

    fn advance_clock(&mut self) {
        self.clock.advance(self.millis_per_action);
        if self.clock.is_expired() && !self.config.is_break_level(self.level) {
            self.next_level();
        }
    }

    fn advance_clock_break(&mut self) {
        self.clock.advance(self.millis_per_action);
    }

    fn start_game_clock(&mut self) {
        self.clock.start(self.now_millis);
    }

    fn timeout_seconds(&self) -> u32 {
        self.config.timeouts.base()
    }

    fn timeout_for_round(&self, round: BettingRound) -> u32 {
        self.config.timeouts.for_round(round)
    }

    fn is_scheduled_start_enabled(&self) -> bool {
        self.config.scheduled_start.is_some()
    }

    fn scheduled_start_time(&self) -> i64 {
        self.config
            .scheduled_start
            .map_or(0, |start| start.timestamp_millis())
    }

    fn min_players_for_scheduled_start(&self) -> usize {
        self.config.min_players_for_scheduled_start
    }

    fn local_player(&self) -> Option<&dyn GamePlayerInfo> {
        self.local_player
            .as_ref()
            .map(|player| player as &dyn GamePlayerInfo)
    }

    fn now_millis(&self) -> i64 {
        self.now_millis
    }
}
