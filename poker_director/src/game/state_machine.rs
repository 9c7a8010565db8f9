//! Per-table tournament progression state machine.
//!
//! [`TournamentEngine::process_table`] inspects one table for one tick and
//! returns a [`TableProcessResult`] telling the caller which state to move
//! to, which presentation phase to run and whether to sleep. The only
//! side effects are calls on the supplied table, hand and tournament.
//!
//! Host and client run the same dispatch. Every call that mutates
//! canonical tournament state is guarded by `is_host`; a client replays the
//! same phases and trusts the state replicated from the host.

use log::{debug, info, warn};
use std::{fmt, sync::Arc};

use super::{
    collaborators::{GameHand, GamePlayerInfo, GameTable, PlayerActionProvider, TournamentContext},
    constants::{
        PARAM_WINNERS, PHASE_CHECK_END_HAND, PHASE_COLOR_UP, PHASE_DEAL_COMMUNITY,
        PHASE_DEAL_DISPLAY_HAND, PHASE_DEAL_DISPLAY_HIGH, PHASE_DISPLAY_TABLE_MOVES,
        PHASE_NEW_LEVEL_ACTIONS, PHASE_PRE_SHOWDOWN, PHASE_SHOWDOWN, PHASE_WAIT_FOR_DEAL,
    },
    entities::{ActionOptions, BettingRound, PlayerAction, PlayerId, TableState},
    events::{GameEvent, GameEventBus},
    result::{TableProcessResult, TableProcessResultBuilder},
    settings::{EngineSettings, SettingsError},
    timeouts::{self, WaitCheck},
};

/// Collaborators and role flags for a single tick, plus the events
/// published so far.
struct Tick<'a, T, C> {
    table: &'a mut T,
    tournament: &'a mut C,
    is_host: bool,
    is_online: bool,
    events: Vec<GameEvent>,
}

/// The per-table state machine. Holds only the event bus, the action
/// provider and its timing settings.
pub struct TournamentEngine {
    bus: Arc<GameEventBus>,
    provider: Box<dyn PlayerActionProvider>,
    settings: EngineSettings,
}

impl TournamentEngine {
    #[must_use]
    pub fn new(bus: Arc<GameEventBus>, provider: impl PlayerActionProvider + 'static) -> Self {
        Self {
            bus,
            provider: Box::new(provider),
            settings: EngineSettings::default(),
        }
    }

    /// Replaces the default timings after validating them.
    pub fn with_settings(mut self, settings: EngineSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    #[must_use]
    pub const fn bus(&self) -> &Arc<GameEventBus> {
        &self.bus
    }

    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Processes one tick for `table`.
    ///
    /// Total over [`TableState`]: every state has a handler and no game
    /// condition makes this fail. States that need no work return an empty
    /// result, meaning the caller keeps ticking.
    pub fn process_table<T, C>(
        &self,
        table: &mut T,
        tournament: &mut C,
        is_host: bool,
        is_online: bool,
    ) -> TableProcessResult
    where
        T: GameTable,
        C: TournamentContext,
    {
        let state = table.table_state();
        let mut tick = Tick {
            table,
            tournament,
            is_host,
            is_online,
            events: Vec::new(),
        };

        let builder = match state {
            TableState::None => {
                warn!(
                    "table {} ticked in state {state}, nothing to do",
                    tick.table.number()
                );
                TableProcessResult::builder()
            }
            TableState::BeginWait | TableState::GameOver => TableProcessResult::builder(),
            TableState::Done => TableProcessResult::builder().next_state(TableState::Begin),
            TableState::OnHold => Self::on_hold(&tick),
            TableState::PendingLoad => Self::pending_load(&tick),
            TableState::Pending => self.pending(&mut tick),
            TableState::DealForButton => Self::deal_for_button(&mut tick),
            TableState::Begin => Self::begin(&tick),
            TableState::CheckEndHand => TableProcessResult::builder()
                .phase(PHASE_CHECK_END_HAND)
                .should_run_on_client(true)
                .pending_state(TableState::Clean),
            TableState::Clean => Self::clean(&tick),
            TableState::NewLevelCheck => Self::new_level_check(&mut tick),
            TableState::ColorUp => self.color_up(&mut tick),
            TableState::StartHand => self.start_hand(&mut tick),
            TableState::Break => self.on_break(&mut tick),
            TableState::Betting => self.betting(&mut tick),
            TableState::Community => self.community(&mut tick),
            TableState::PreShowdown => Self::pre_showdown(&mut tick),
            TableState::Showdown => self.showdown(&mut tick),
        };

        let result = builder.events(tick.events).build();
        debug!("table {} [{state}]: {result}", tick.table.number());
        result
    }

    fn publish<T, C>(&self, tick: &mut Tick<'_, T, C>, event: GameEvent) {
        self.bus.publish(&event);
        tick.events.push(event);
    }

    fn on_hold<T: GameTable, C>(tick: &Tick<'_, T, C>) -> TableProcessResultBuilder {
        if tick.table.num_occupied_seats() >= 2 {
            TableProcessResult::builder().next_state(TableState::Begin)
        } else {
            TableProcessResult::builder()
        }
    }

    fn pending_load<T: GameTable, C>(tick: &Tick<'_, T, C>) -> TableProcessResultBuilder {
        let phase = tick
            .table
            .pending_phase()
            .filter(|phase| !phase.is_empty())
            .map(str::to_string);
        TableProcessResult::builder()
            .next_state(TableState::Pending)
            .phase_to_run(phase)
    }

    fn deal_for_button<T: GameTable, C: TournamentContext>(
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        if tick.is_host {
            tick.table.set_button();
            if tick.is_online {
                tick.tournament.start_game_clock();
            }
        }
        TableProcessResult::builder()
            .phase(PHASE_DEAL_DISPLAY_HIGH)
            .should_run_on_client(true)
            .pending_state(TableState::Begin)
    }

    fn begin<T: GameTable, C>(tick: &Tick<'_, T, C>) -> TableProcessResultBuilder {
        if tick.table.is_auto_deal() {
            TableProcessResult::builder().next_state(TableState::StartHand)
        } else {
            TableProcessResult::builder()
                .phase(PHASE_WAIT_FOR_DEAL)
                .next_state(TableState::BeginWait)
        }
    }

    fn clean<T: GameTable, C>(tick: &Tick<'_, T, C>) -> TableProcessResultBuilder {
        // Online games announce table moves over chat instead of a phase.
        if tick.is_host && !tick.is_online && !tick.table.added_players().is_empty() {
            TableProcessResult::builder()
                .phase(PHASE_DISPLAY_TABLE_MOVES)
                .pending_state(TableState::NewLevelCheck)
        } else {
            TableProcessResult::builder()
                .next_state(TableState::NewLevelCheck)
                .should_sleep(false)
        }
    }

    fn new_level_check<T: GameTable, C: TournamentContext>(
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        if tick.table.level() == tick.tournament.level() {
            tick.table.clear_rebuy_list();
            return TableProcessResult::builder()
                .next_state(TableState::StartHand)
                .should_sleep(false);
        }

        if tick.is_host {
            tick.table.process_ai_rebuys();
            tick.table.process_ai_add_ons();
        }
        TableProcessResult::builder()
            .phase(PHASE_NEW_LEVEL_ACTIONS)
            .should_run_on_client(true)
            .pending_state(TableState::ColorUp)
    }

    fn color_up<T: GameTable, C: TournamentContext>(
        &self,
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        if tick.is_host {
            let min_chip = tick.tournament.min_chip();
            if min_chip > tick.tournament.last_min_chip() {
                tick.table.set_next_min_chip(min_chip);
                tick.table.do_color_up_determination();
                if tick.table.is_coloring_up() {
                    let table_id = tick.table.number();
                    self.publish(tick, GameEvent::ColorUpStarted { table_id, min_chip });
                }
            }
        }

        if tick.table.is_coloring_up() {
            TableProcessResult::builder()
                .phase(PHASE_COLOR_UP)
                .should_run_on_client(true)
                .pending_state(TableState::StartHand)
        } else {
            TableProcessResult::builder()
                .next_state(TableState::StartHand)
                .should_sleep(false)
        }
    }

    fn start_hand<T: GameTable, C: TournamentContext>(
        &self,
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        let table_id = tick.table.number();

        // The current table colors up in its phase, the others here.
        if tick.is_host && tick.table.is_coloring_up() {
            tick.table.color_up();
            tick.table.color_up_finish();
            self.publish(tick, GameEvent::ColorUpCompleted { table_id });
        }

        if tick.tournament.is_break_level(tick.tournament.level()) {
            if tick.is_host {
                tick.table.start_break();
                self.publish(tick, GameEvent::BreakStarted { table_id });
            }
            return TableProcessResult::builder()
                .next_state(TableState::Break)
                .should_run_on_client(true);
        }

        if tick.is_host {
            tick.table.start_new_hand();
            let hand_number = tick.table.hand_num();
            self.publish(
                tick,
                GameEvent::HandStarted {
                    table_id,
                    hand_number,
                },
            );
            if !tick.is_online {
                tick.tournament.advance_clock();
            }
        }
        TableProcessResult::builder()
            .phase(PHASE_DEAL_DISPLAY_HAND)
            .should_run_on_client(true)
            .pending_state(TableState::Betting)
    }

    fn on_break<T: GameTable, C: TournamentContext>(
        &self,
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        if !tick.is_host {
            return TableProcessResult::builder();
        }

        if !tick.is_online {
            tick.tournament.advance_clock_break();
        }
        if tick.tournament.is_level_expired() {
            tick.tournament.next_level();
        }

        // The table keeps the break level until NEW_LEVEL_CHECK syncs it.
        if tick.tournament.level() == tick.table.level() {
            return TableProcessResult::builder();
        }
        if tick.is_online {
            tick.tournament.start_game_clock();
        }
        let table_id = tick.table.number();
        self.publish(tick, GameEvent::BreakEnded { table_id });
        TableProcessResult::builder().next_state(TableState::NewLevelCheck)
    }

    fn betting<T: GameTable, C: TournamentContext>(
        &self,
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        let Some(hand) = tick.table.hand_mut() else {
            return TableProcessResult::builder();
        };

        if hand.is_done() {
            return TableProcessResult::builder().next_state(next_betting_state(hand));
        }

        let Some(actor) = hand.current_player_with_init() else {
            return TableProcessResult::builder();
        };
        let round = hand.round();
        let amount_to_call = hand.amount_to_call(actor.id());
        let (min_bet, min_raise) = (hand.min_bet(), hand.min_raise());

        if actor.is_sitting_out() {
            tick.table.set_pause(self.settings.sitting_out_pause_millis);
            if tick.is_host {
                self.apply_action(tick, actor.id(), PlayerAction::fold());
            }
            return TableProcessResult::builder().next_state(TableState::Betting);
        }

        if !actor.is_locally_controlled() {
            if !tick.is_host {
                return TableProcessResult::builder();
            }
            if tick.is_online {
                debug!(
                    "table {}: waiting on remote player {}",
                    tick.table.number(),
                    actor.id()
                );
                tick.table.add_wait(actor);
                return TableProcessResult::builder()
                    .should_run_on_client(true)
                    .should_only_send_to_wait_list(true)
                    .should_add_all_humans(false)
                    .pending_state(TableState::Betting);
            }
        }

        let timeout_seconds = tick.tournament.timeout_for_round(round);
        if tick.is_host {
            tick.table
                .set_player_timeout(actor.id(), u64::from(timeout_seconds) * 1000);
        }
        let options = ActionOptions::new(
            amount_to_call,
            actor.chip_count(),
            min_bet,
            min_raise,
            timeout_seconds,
        );

        let action = match self.provider.get_action(&actor, &options) {
            Some(action) if options.allows(&action) => action,
            Some(action) => {
                warn!(
                    "player {} chose illegal action `{action}`, applying the timeout default",
                    actor.id()
                );
                PlayerAction::timeout_default(amount_to_call)
            }
            None => {
                debug!("no decision for player {}, folding", actor.id());
                PlayerAction::fold()
            }
        };
        self.apply_action(tick, actor.id(), action);

        TableProcessResult::builder()
            .next_state(TableState::Betting)
            .should_sleep(!tick.table.is_zip_mode())
    }

    fn apply_action<T: GameTable, C>(
        &self,
        tick: &mut Tick<'_, T, C>,
        player_id: PlayerId,
        action: PlayerAction,
    ) {
        let Some(hand) = tick.table.hand_mut() else {
            return;
        };
        hand.apply_player_action(player_id, action);
        let table_id = tick.table.number();
        self.publish(
            tick,
            GameEvent::PlayerActed {
                table_id,
                player_id,
                action: action.action_type,
                amount: action.amount,
            },
        );
    }

    fn community<T: GameTable, C: TournamentContext>(
        &self,
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        let zip = tick.table.is_zip_mode();
        let Some(hand) = tick.table.hand_mut() else {
            return TableProcessResult::builder();
        };

        if !tick.is_host {
            if hand.num_with_cards() > 1 {
                return TableProcessResult::builder()
                    .phase(PHASE_DEAL_COMMUNITY)
                    .should_run_on_client(true)
                    .pending_state(TableState::Betting)
                    .should_sleep(!(zip || hand.is_done()));
            }
            return TableProcessResult::builder()
                .next_state(TableState::Community)
                .should_sleep(false);
        }

        hand.advance_round();
        let round = hand.round();
        let contested = hand.num_with_cards() > 1;
        let done = hand.is_done();
        if !tick.is_online {
            tick.tournament.advance_clock();
        }
        let table_id = tick.table.number();
        self.publish(tick, GameEvent::CommunityCardsDealt { table_id, round });

        if contested {
            TableProcessResult::builder()
                .phase(PHASE_DEAL_COMMUNITY)
                .should_run_on_client(true)
                .pending_state(TableState::Betting)
                .should_sleep(!(zip || done))
        } else {
            let next = if round >= BettingRound::River {
                TableState::PreShowdown
            } else {
                TableState::Community
            };
            TableProcessResult::builder()
                .next_state(next)
                .should_sleep(false)
        }
    }

    fn pre_showdown<T: GameTable, C: TournamentContext>(
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        let go_to_showdown = || {
            TableProcessResult::builder()
                .next_state(TableState::Showdown)
                .should_sleep(false)
        };
        if tick.table.hand().is_none() || !tick.is_online {
            return go_to_showdown();
        }

        if tick.is_host {
            if let Some(hand) = tick.table.hand_mut() {
                hand.pre_resolve(true);
            }
        } else {
            // The host replicates its wait-list.
            tick.table.remove_wait_all();
        }

        let Some(hand) = tick.table.hand() else {
            return go_to_showdown();
        };
        let uncontested = hand.is_uncontested();
        let asking_winners: Vec<_> = hand
            .pre_winners()
            .into_iter()
            .filter(|p| p.is_human() && p.is_ask_show_winning() && uncontested)
            .collect();
        let asking_losers: Vec<_> = hand
            .pre_losers()
            .into_iter()
            .filter(|p| p.is_human() && p.is_ask_show_losing())
            .collect();

        let local_id = tick.tournament.local_player().map(|p| p.id());
        let winner_ids: Vec<PlayerId> = asking_winners.iter().map(|p| p.id()).collect();
        let local_is_waiting = asking_winners
            .iter()
            .chain(&asking_losers)
            .any(|p| Some(p.id()) == local_id);

        for player in asking_winners.into_iter().chain(asking_losers) {
            tick.table.add_wait(player);
        }

        if tick.table.wait_size() == 0 {
            return go_to_showdown();
        }

        let builder = TableProcessResult::builder()
            .should_run_on_client(true)
            .should_add_all_humans(false)
            .should_only_send_to_wait_list(true)
            .pending_state(TableState::Showdown);
        if !local_is_waiting {
            return builder;
        }
        let builder = builder.phase(PHASE_PRE_SHOWDOWN);
        if winner_ids.is_empty() {
            builder
        } else {
            builder.phase_param(PARAM_WINNERS, serde_json::json!(winner_ids))
        }
    }

    fn showdown<T: GameTable, C: TournamentContext>(
        &self,
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        let save = tick.table.is_current();
        let table_id = tick.table.number();
        let Some(round) = tick.table.hand().map(|hand| hand.round()) else {
            return TableProcessResult::builder()
                .next_state(TableState::Done)
                .should_auto_save(true)
                .should_save(save)
                .should_sleep(false);
        };

        // Resolving twice would pay the pot twice.
        if tick.is_host && round != BettingRound::Showdown {
            self.publish(tick, GameEvent::ShowdownStarted { table_id });
            tick.table.set_zip_mode(false);
            if let Some(hand) = tick.table.hand_mut() {
                hand.advance_round();
                hand.resolve();
            }
            if !tick.is_online {
                tick.tournament.advance_clock();
            }
            self.publish(tick, GameEvent::HandCompleted { table_id });
        }

        let keeps_history = tick
            .tournament
            .local_player()
            .is_some_and(|local| !local.is_observer() || tick.is_host);
        if keeps_history {
            if let Some(hand) = tick.table.hand_mut() {
                hand.store_hand_history();
            }
        }

        TableProcessResult::builder()
            .phase(PHASE_SHOWDOWN)
            .should_run_on_client(true)
            .pending_state(TableState::Done)
            .should_auto_save(true)
            .should_save(save)
            .should_sleep(false)
    }

    fn pending<T: GameTable, C: TournamentContext>(
        &self,
        tick: &mut Tick<'_, T, C>,
    ) -> TableProcessResultBuilder {
        if tick.is_host && self.scheduled_start_reached(tick) {
            info!(
                "table {}: scheduled start reached, releasing wait-list",
                tick.table.number()
            );
            tick.table.remove_wait_all();
        }

        if tick.is_online && tick.table.wait_size() > 0 {
            self.check_wait_timeout(tick);
        }

        let pending_state = tick.table.pending_table_state();
        if tick.table.wait_size() == 0 {
            if tick.is_host && pending_state == TableState::Begin && tick.table.is_auto_deal() {
                let pause = if tick.is_online {
                    self.settings.online_auto_deal_pause_millis
                } else {
                    tick.table.auto_deal_delay_millis()
                };
                tick.table.set_pause(pause);
            }
            return TableProcessResult::builder()
                .next_state(pending_state)
                .should_sleep(false);
        }

        let waiting_on_computer = tick
            .table
            .wait_player(0)
            .is_some_and(|p| !p.is_human_controlled());
        let sleep = !(pending_state == TableState::Betting
            && (tick.table.is_zip_mode() || (waiting_on_computer && !tick.is_online)));
        TableProcessResult::builder().should_sleep(sleep)
    }

    fn scheduled_start_reached<T, C: TournamentContext>(&self, tick: &Tick<'_, T, C>) -> bool {
        let tournament = &*tick.tournament;
        if !tournament.is_scheduled_start_enabled() {
            return false;
        }
        let start = tournament.scheduled_start_time();
        start > 0
            && tournament.now_millis() >= start
            && tournament.num_players() >= tournament.min_players_for_scheduled_start()
    }

    /// Forces the wait-list empty once a waiting human runs out of time.
    fn check_wait_timeout<T: GameTable, C: TournamentContext>(&self, tick: &mut Tick<'_, T, C>) {
        let previous = tick.table.previous_table_state();
        let elapsed = timeouts::clamp_elapsed(tick.table.millis_since_last_state_change());

        // Computers answer on their own, there is nothing to time out.
        let Some(waiting) = tick.table.wait_player(0).cloned() else {
            return;
        };
        if !waiting.is_human_controlled() {
            return;
        }

        if previous != TableState::Betting {
            if timeouts::check_non_betting(previous, elapsed, &self.settings).is_expired() {
                info!(
                    "table {}: wait after {previous} timed out after {elapsed}ms",
                    tick.table.number()
                );
                tick.table.remove_wait_all();
            }
            return;
        }

        let Some(hand) = tick.table.hand() else {
            return;
        };
        let round_timeout = tick.tournament.timeout_for_round(hand.round());
        let amount_to_call = hand.amount_to_call(waiting.id());
        let check = timeouts::check_betting(
            round_timeout,
            elapsed,
            waiting.think_bank_millis(),
            &self.settings,
        );
        if let WaitCheck::Waiting { remaining_millis } = check {
            debug!(
                "table {}: player {} has {remaining_millis}ms left",
                tick.table.number(),
                waiting.id()
            );
            return;
        }

        let action = PlayerAction::timeout_default(amount_to_call);
        let table_id = tick.table.number();
        info!(
            "table {table_id}: player {} timed out after {elapsed}ms, {action}",
            waiting.id()
        );
        if tick.is_host {
            self.publish(
                tick,
                GameEvent::ActionTimeout {
                    table_id,
                    player_id: waiting.id(),
                    action: action.action_type,
                },
            );
            self.apply_action(tick, waiting.id(), action);
        }
        tick.table.remove_wait_all();
    }
}

impl fmt::Debug for TournamentEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TournamentEngine")
            .field("bus", &self.bus)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Where a hand goes once its betting round is complete.
fn next_betting_state<H: GameHand>(hand: &H) -> TableState {
    if hand.is_uncontested() || hand.num_with_cards() <= 1 {
        TableState::Showdown
    } else if hand.round() == BettingRound::Showdown {
        TableState::Showdown
    } else if hand.round() >= BettingRound::River {
        TableState::PreShowdown
    } else {
        TableState::Community
    }
}
