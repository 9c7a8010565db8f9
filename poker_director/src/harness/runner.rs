//! Drives a whole tournament by ticking every table in turn.
//!
//! The runner plays the host. It applies each [`TableProcessResult`] the
//! way a headless server would: pending states park the table in
//! `PENDING`, presentation phases complete immediately and the
//! between-hands bookkeeping happens on the `DONE` to `BEGIN` transition.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    game::{
        collaborators::{GameTable, PlayerActionProvider, TournamentContext},
        constants::{PHASE_COLOR_UP, PHASE_NEW_LEVEL_ACTIONS, PHASE_PRE_SHOWDOWN, PHASE_WAIT_FOR_DEAL},
        entities::{PlayerId, TableState},
        events::{GameEvent, GameEventBus},
        result::TableProcessResult,
        state_machine::TournamentEngine,
    },
    tournament::TournamentConfig,
};

use super::{
    errors::{SimError, SimResult},
    player::SimPlayer,
    table::SimTable,
    tournament::SimTournament,
};

/// Default simulated time per tick.
pub const DEFAULT_TICK_MILLIS: u64 = 1000;

/// Shape of a simulated tournament.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SimulationConfig {
    pub players: usize,
    pub tables: usize,
    pub seats_per_table: usize,
    pub seed: u64,
    pub online: bool,
    pub auto_deal: bool,
    pub tick_millis: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            players: 6,
            tables: 1,
            seats_per_table: 10,
            seed: 0,
            online: false,
            auto_deal: false,
            tick_millis: DEFAULT_TICK_MILLIS,
        }
    }
}

/// Outcome of [`TableRunner::run`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub hands: u64,
    pub winner: Option<PlayerId>,
    /// Busted players, first out first.
    pub finish_order: Vec<PlayerId>,
    pub game_over: bool,
}

pub struct TableRunner {
    engine: TournamentEngine,
    tables: Vec<SimTable>,
    tournament: SimTournament,
    tick_millis: u64,
    ticks: u64,
    hands: u64,
    winner: Option<PlayerId>,
    game_over: bool,
}

impl TableRunner {
    #[must_use]
    pub fn new(engine: TournamentEngine, tables: Vec<SimTable>, tournament: SimTournament) -> Self {
        Self {
            engine,
            tables,
            tournament,
            tick_millis: DEFAULT_TICK_MILLIS,
            ticks: 0,
            hands: 0,
            winner: None,
            game_over: false,
        }
    }

    /// Seats `sim.players` computers round-robin across fresh tables.
    pub fn from_config(
        config: TournamentConfig,
        sim: &SimulationConfig,
        provider: impl PlayerActionProvider + 'static,
    ) -> SimResult<Self> {
        config.validate()?;
        if sim.players < config.min_players {
            return Err(SimError::NotEnoughPlayers {
                needed: config.min_players,
                have: sim.players,
            });
        }
        if sim.tables == 0 || sim.players > sim.tables * sim.seats_per_table {
            return Err(SimError::TooManyPlayers {
                players: sim.players,
                tables: sim.tables,
            });
        }

        let config = Arc::new(config);
        let mut tables: Vec<SimTable> = (1..)
            .zip(0..sim.tables)
            .map(|(number, idx)| {
                let seed = sim.seed.wrapping_add(idx as u64);
                let table = SimTable::new(number, sim.seats_per_table, Arc::clone(&config), seed);
                if sim.auto_deal {
                    table.with_auto_deal(0)
                } else {
                    table
                }
            })
            .collect();
        for (id, idx) in (1..).zip((0..sim.tables).cycle().take(sim.players)) {
            let player = SimPlayer::computer(id, &format!("Player {id}"), config.starting_stack);
            tables[idx].add_player(player)?;
        }
        if let Some(first) = tables.first_mut() {
            first.set_current(true);
        }

        let now = chrono::Utc::now().timestamp_millis();
        let tournament = SimTournament::new(config, sim.players, now);
        let tournament = if sim.online {
            tournament.online()
        } else {
            tournament
        };
        let engine = TournamentEngine::new(Arc::new(GameEventBus::new()), provider);
        Ok(Self::new(engine, tables, tournament).with_tick_millis(sim.tick_millis))
    }

    #[must_use]
    pub fn with_tick_millis(mut self, millis: u64) -> Self {
        self.tick_millis = millis.max(1);
        self
    }

    #[must_use]
    pub const fn engine(&self) -> &TournamentEngine {
        &self.engine
    }

    #[must_use]
    pub fn bus(&self) -> &Arc<GameEventBus> {
        self.engine.bus()
    }

    #[must_use]
    pub fn tables(&self) -> &[SimTable] {
        &self.tables
    }

    #[must_use]
    pub const fn tournament(&self) -> &SimTournament {
        &self.tournament
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            hands: self.hands,
            winner: self.winner,
            finish_order: self.tournament.finish_order().to_vec(),
            game_over: self.game_over,
        }
    }

    /// Ticks until the tournament ends, `max_ticks` pass or `should_stop`
    /// returns true.
    pub fn run(&mut self, max_ticks: u64, should_stop: impl Fn() -> bool) -> RunSummary {
        while self.ticks < max_ticks && !should_stop() {
            if !self.tick() {
                break;
            }
        }
        if !self.game_over {
            warn!("stopped after {} ticks without a winner", self.ticks);
        }
        self.summary()
    }

    /// Lets one tick of time pass and processes every table that is not
    /// paused. Returns false once the tournament is over.
    pub fn tick(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.ticks += 1;
        let millis = i64::try_from(self.tick_millis).unwrap_or(i64::MAX);
        self.tournament.advance_time(millis);

        for idx in 0..self.tables.len() {
            let table = &mut self.tables[idx];
            table.advance_time(self.tick_millis);
            if table.is_paused() || table.table_state().is_terminal() {
                continue;
            }
            self.process(idx);
            if self.game_over {
                break;
            }
        }
        !self.game_over
    }

    fn publish(&self, event: &GameEvent) {
        self.engine.bus().publish(event);
    }

    fn process(&mut self, idx: usize) {
        let online = self.tournament.is_online();
        let result =
            self.engine
                .process_table(&mut self.tables[idx], &mut self.tournament, true, online);
        let before = self.tables[idx].table_state();
        self.apply(idx, &result);

        // The rebuy list is cleared during NEW_LEVEL_CHECK.
        self.report_eliminations(idx);

        let after = self.tables[idx].table_state();
        if before != after {
            self.publish(&GameEvent::TableStateChanged {
                table_id: self.tables[idx].number(),
                from: before,
                to: after,
            });
        }
        if before == TableState::Done && after == TableState::Begin {
            self.end_of_hand(idx);
        }
    }

    fn apply(&mut self, idx: usize, result: &TableProcessResult) {
        let table = &mut self.tables[idx];
        let Some(phase) = result.phase_to_run() else {
            if let Some(next) = result.next_state() {
                table.set_table_state(next);
            } else if let Some(pending) = result.pending_state() {
                table.set_pending_table_state(pending);
                table.set_table_state(TableState::Pending);
            }
            return;
        };

        if let Some(pending) = result.pending_state() {
            table.set_pending_table_state(pending);
            table.set_table_state(TableState::Pending);
        }
        if let Some(next) = result.next_state() {
            table.set_table_state(next);
        }
        self.run_phase(idx, phase);
    }

    /// Presentation phases finish at once. The few with game effects
    /// apply them here.
    fn run_phase(&mut self, idx: usize, phase: &str) {
        let level = self.tournament.level();
        let table = &mut self.tables[idx];
        let table_id = table.number();
        debug!("table {table_id}: phase {phase}");
        match phase {
            // Nobody presses deal in a simulation, so deal at once.
            PHASE_WAIT_FOR_DEAL => table.set_table_state(TableState::CheckEndHand),
            PHASE_NEW_LEVEL_ACTIONS if table.level() != level => {
                table.set_level(level);
                self.publish(&GameEvent::LevelChanged { table_id, level });
            }
            PHASE_COLOR_UP if table.is_current() && table.is_coloring_up() => {
                table.color_up();
                table.color_up_finish();
                self.publish(&GameEvent::ColorUpCompleted { table_id });
            }
            PHASE_PRE_SHOWDOWN => table.remove_wait_all(),
            _ => {}
        }
    }

    fn report_eliminations(&mut self, idx: usize) {
        let table_id = self.tables[idx].number();
        for player in self.tables[idx].take_eliminated() {
            let finish_position = self.tournament.player_out(player.id);
            self.publish(&GameEvent::PlayerEliminated {
                table_id,
                player_id: player.id,
                finish_position,
            });
        }
    }

    fn end_of_hand(&mut self, idx: usize) {
        self.hands += 1;
        let table = &mut self.tables[idx];
        table.settle_hand();
        let rebuys_allowed = !table.is_auto_deal();
        table.collect_busted(rebuys_allowed);
        self.report_eliminations(idx);

        if self.tournament.is_one_player_left() {
            self.finish();
            return;
        }
        self.consolidate(idx);

        // Auto-deal skips NEW_LEVEL_CHECK, so the table follows the clock
        // here.
        let level = self.tournament.level();
        let table = &mut self.tables[idx];
        if table.is_auto_deal() && table.level() != level && !self.tournament.is_break_level(level) {
            table.set_level(level);
            let table_id = table.number();
            self.publish(&GameEvent::LevelChanged { table_id, level });
        }
    }

    /// Breaks up `idx` when its players fit into the other tables, or when
    /// it is down to a single player.
    fn consolidate(&mut self, idx: usize) {
        let others: Vec<usize> = (0..self.tables.len())
            .filter(|&i| i != idx)
            .filter(|&i| {
                let table = &self.tables[i];
                !table.table_state().is_terminal()
                    && table.table_state() != TableState::OnHold
                    && table.num_occupied_seats() > 0
            })
            .collect();
        let count = self.tables[idx].num_occupied_seats();
        if others.is_empty() || count == 0 {
            return;
        }
        let free: usize = others.iter().map(|&i| self.tables[i].free_seats()).sum();
        let smallest = others
            .iter()
            .all(|&i| self.tables[i].num_occupied_seats() >= count);
        if free < count || !(count <= 1 || smallest) {
            return;
        }

        let from_table = self.tables[idx].number();
        info!("breaking table {from_table}, moving {count} players");
        for player in self.tables[idx].remove_all_players() {
            let Some(dest) = others
                .iter()
                .copied()
                .filter(|&i| self.tables[i].free_seats() > 0)
                .min_by_key(|&i| self.tables[i].num_occupied_seats())
            else {
                break;
            };
            let player_id = player.id;
            match self.tables[dest].receive_player(player) {
                Ok(_) => {
                    let to_table = self.tables[dest].number();
                    self.publish(&GameEvent::PlayerMoved {
                        player_id,
                        from_table,
                        to_table,
                    });
                }
                Err(e) => warn!("could not move player {player_id}: {e}"),
            }
        }

        let table = &mut self.tables[idx];
        let before = table.table_state();
        table.set_table_state(TableState::OnHold);
        self.publish(&GameEvent::TableStateChanged {
            table_id: from_table,
            from: before,
            to: TableState::OnHold,
        });
    }

    fn finish(&mut self) {
        let winner = self
            .tables
            .iter()
            .flat_map(|table| table.players())
            .max_by_key(|p| p.chips)
            .map(|p| p.id);
        for idx in 0..self.tables.len() {
            let table = &mut self.tables[idx];
            let before = table.table_state();
            if before == TableState::GameOver {
                continue;
            }
            table.set_table_state(TableState::GameOver);
            let table_id = table.number();
            self.publish(&GameEvent::TableStateChanged {
                table_id,
                from: before,
                to: TableState::GameOver,
            });
        }
        self.game_over = true;
        self.winner = winner;
        if let Some(winner_id) = winner {
            info!("player {winner_id} wins after {} hands", self.hands);
            self.publish(&GameEvent::TournamentCompleted { winner_id });
        }
    }
}
