//! Integration tests for the per-state handlers of `process_table`
//!
//! Each test puts a stub table in one state and checks the directive the
//! engine returns together with the calls it made on its collaborators.

mod common;

use common::{StubHand, StubPlayer, StubTable, StubTournament, recording_engine};
use poker_director::{
    GameEvent, TableState,
    constants::{
        PHASE_CHECK_END_HAND, PHASE_COLOR_UP, PHASE_DEAL_DISPLAY_HAND, PHASE_DEAL_DISPLAY_HIGH,
        PHASE_DISPLAY_TABLE_MOVES, PHASE_NEW_LEVEL_ACTIONS, PHASE_WAIT_FOR_DEAL,
    },
    harness::SilentProvider,
};

// === Idle States ===

#[test]
fn test_idle_states_are_no_ops() {
    let (engine, events) = recording_engine(SilentProvider);
    for state in [TableState::None, TableState::BeginWait, TableState::GameOver] {
        let mut table = StubTable::new(state);
        let mut tournament = StubTournament::default();
        let result = engine.process_table(&mut table, &mut tournament, true, true);
        assert!(result.is_no_op(), "{state}");
        assert!(table.calls.is_empty());
    }
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_done_goes_to_begin() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Done);
    let result = engine.process_table(&mut table, &mut StubTournament::default(), false, true);
    assert_eq!(result.next_state(), Some(TableState::Begin));
    assert!(result.should_sleep());
}

#[test]
fn test_on_hold_needs_two_players() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::OnHold);
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.next_state(), Some(TableState::Begin));

    table.seats[1] = None;
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert!(result.is_no_op());
}

#[test]
fn test_pending_load_restores_saved_phase() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::PendingLoad);
    table.pending_phase = Some("TD.Showdown".to_string());
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.next_state(), Some(TableState::Pending));
    assert_eq!(result.phase_to_run(), Some("TD.Showdown"));

    table.pending_phase = Some(String::new());
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.next_state(), Some(TableState::Pending));
    assert_eq!(result.phase_to_run(), None);
}

// === Between Hands ===

#[test]
fn test_deal_for_button_on_online_host() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::DealForButton);
    let mut tournament = StubTournament::default();
    let result = engine.process_table(&mut table, &mut tournament, true, true);
    assert_eq!(result.phase_to_run(), Some(PHASE_DEAL_DISPLAY_HIGH));
    assert_eq!(result.pending_state(), Some(TableState::Begin));
    assert_eq!(result.next_state(), None);
    assert!(result.should_run_on_client());
    assert!(table.called("set_button"));
    assert!(tournament.called("start_game_clock"));
}

#[test]
fn test_deal_for_button_on_client_mutates_nothing() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::DealForButton);
    let mut tournament = StubTournament::default();
    let result = engine.process_table(&mut table, &mut tournament, false, true);
    assert_eq!(result.pending_state(), Some(TableState::Begin));
    assert!(table.calls.is_empty());
    assert!(tournament.calls.is_empty());
}

#[test]
fn test_begin_with_and_without_auto_deal() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Begin);
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.phase_to_run(), Some(PHASE_WAIT_FOR_DEAL));
    assert_eq!(result.next_state(), Some(TableState::BeginWait));

    table.auto_deal = true;
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.next_state(), Some(TableState::StartHand));
    assert_eq!(result.phase_to_run(), None);
}

#[test]
fn test_check_end_hand() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::CheckEndHand);
    let result = engine.process_table(&mut table, &mut StubTournament::default(), false, false);
    assert_eq!(result.phase_to_run(), Some(PHASE_CHECK_END_HAND));
    assert_eq!(result.pending_state(), Some(TableState::Clean));
    assert!(result.should_run_on_client());
}

#[test]
fn test_clean_shows_table_moves_only_offline_on_host() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Clean);
    table.added.push(StubPlayer::computer(9, 500));

    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.phase_to_run(), Some(PHASE_DISPLAY_TABLE_MOVES));
    assert_eq!(result.pending_state(), Some(TableState::NewLevelCheck));

    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, true);
    assert_eq!(result.next_state(), Some(TableState::NewLevelCheck));
    assert!(!result.should_sleep());

    table.added.clear();
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.next_state(), Some(TableState::NewLevelCheck));
    assert_eq!(result.phase_to_run(), None);
}

#[test]
fn test_table_parked_by_clean_up_is_not_overridden() {
    let (engine, _) = recording_engine(SilentProvider);
    for state in [TableState::OnHold, TableState::GameOver] {
        let mut table = StubTable::new(state);
        table.seats[1] = None;
        table.added.push(StubPlayer::computer(9, 500));
        let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
        assert!(result.is_no_op(), "{state}");
        assert_eq!(table.state, state);
    }
}

#[test]
fn test_new_level_check_same_level() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::NewLevelCheck);
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.next_state(), Some(TableState::StartHand));
    assert!(!result.should_sleep());
    assert!(table.called("clear_rebuy_list"));
    assert!(!table.called("process_ai_rebuys"));
}

#[test]
fn test_new_level_check_level_changed() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::NewLevelCheck);
    let mut tournament = StubTournament {
        level: 2,
        ..StubTournament::default()
    };
    let result = engine.process_table(&mut table, &mut tournament, true, false);
    assert_eq!(result.phase_to_run(), Some(PHASE_NEW_LEVEL_ACTIONS));
    assert_eq!(result.pending_state(), Some(TableState::ColorUp));
    assert!(result.should_run_on_client());
    assert!(table.called("process_ai_rebuys"));
    assert!(table.called("process_ai_add_ons"));

    let mut client_table = StubTable::new(TableState::NewLevelCheck);
    engine.process_table(&mut client_table, &mut tournament, false, false);
    assert!(!client_table.called("process_ai_rebuys"));
}

#[test]
fn test_color_up_needed() {
    let (engine, events) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::ColorUp);
    table.needs_color_up = true;
    let mut tournament = StubTournament {
        min_chip: 25,
        last_min_chip: 5,
        ..StubTournament::default()
    };
    let result = engine.process_table(&mut table, &mut tournament, true, false);
    assert_eq!(result.phase_to_run(), Some(PHASE_COLOR_UP));
    assert_eq!(result.pending_state(), Some(TableState::StartHand));
    assert_eq!(table.next_min_chip, Some(25));
    assert_eq!(
        events.lock().unwrap().as_slice(),
        &[GameEvent::ColorUpStarted {
            table_id: 1,
            min_chip: 25
        }]
    );
}

#[test]
fn test_color_up_not_needed() {
    let (engine, events) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::ColorUp);
    let mut tournament = StubTournament::default();
    let result = engine.process_table(&mut table, &mut tournament, true, false);
    assert_eq!(result.next_state(), Some(TableState::StartHand));
    assert!(!result.should_sleep());
    assert!(!table.called("do_color_up_determination"));
    assert!(events.lock().unwrap().is_empty());
}

// === Hands and Breaks ===

#[test]
fn test_start_hand_offline_host() {
    let (engine, events) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::StartHand);
    let mut tournament = StubTournament::default();
    let result = engine.process_table(&mut table, &mut tournament, true, false);
    assert_eq!(result.phase_to_run(), Some(PHASE_DEAL_DISPLAY_HAND));
    assert_eq!(result.pending_state(), Some(TableState::Betting));
    assert!(table.called("start_new_hand"));
    assert!(tournament.called("advance_clock"));
    assert_eq!(
        result.events(),
        &[GameEvent::HandStarted {
            table_id: 1,
            hand_number: 1
        }]
    );
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_start_hand_finishes_pending_color_up() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::StartHand);
    table.coloring_up = true;
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, true);
    assert_eq!(
        table.calls,
        vec!["color_up", "color_up_finish", "start_new_hand"]
    );
    assert!(matches!(
        result.events().first(),
        Some(GameEvent::ColorUpCompleted { table_id: 1 })
    ));
}

#[test]
fn test_start_hand_on_break_level() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::StartHand);
    let mut tournament = StubTournament {
        level: 5,
        break_levels: vec![5],
        ..StubTournament::default()
    };
    let result = engine.process_table(&mut table, &mut tournament, true, false);
    assert_eq!(result.next_state(), Some(TableState::Break));
    assert!(result.should_run_on_client());
    assert!(table.called("start_break"));
    assert!(!table.called("start_new_hand"));
    assert_eq!(result.events(), &[GameEvent::BreakStarted { table_id: 1 }]);
}

#[test]
fn test_break_continues_until_level_changes() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Break);
    table.level = 5;
    let mut tournament = StubTournament {
        level: 5,
        break_levels: vec![5],
        ..StubTournament::default()
    };
    let result = engine.process_table(&mut table, &mut tournament, true, false);
    assert!(result.is_no_op());
    assert!(tournament.called("advance_clock_break"));
    assert!(!tournament.called("next_level"));
}

#[test]
fn test_break_ends_when_clock_expires() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Break);
    table.level = 5;
    let mut tournament = StubTournament {
        level: 5,
        level_expired: true,
        break_levels: vec![5],
        ..StubTournament::default()
    };
    let result = engine.process_table(&mut table, &mut tournament, true, true);
    assert_eq!(result.next_state(), Some(TableState::NewLevelCheck));
    assert_eq!(tournament.level, 6);
    assert!(tournament.called("start_game_clock"));
    assert!(!tournament.called("advance_clock_break"));
    assert_eq!(result.events(), &[GameEvent::BreakEnded { table_id: 1 }]);
}

#[test]
fn test_break_on_client_is_idle() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Break);
    let mut tournament = StubTournament {
        level_expired: true,
        ..StubTournament::default()
    };
    let result = engine.process_table(&mut table, &mut tournament, false, true);
    assert!(result.is_no_op());
    assert!(tournament.calls.is_empty());
}

// === Showdown ===

#[test]
fn test_showdown_resolves_once() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Showdown).with_hand(StubHand {
        round: poker_director::BettingRound::River,
        ..StubHand::default()
    });
    table.zip = true;
    let mut tournament = StubTournament {
        local: Some(StubPlayer::human(1, 1000)),
        ..StubTournament::default()
    };

    let result = engine.process_table(&mut table, &mut tournament, true, false);
    assert_eq!(result.phase_to_run(), Some("TD.Showdown"));
    assert_eq!(result.pending_state(), Some(TableState::Done));
    assert!(result.should_save());
    assert!(result.should_auto_save());
    assert!(!result.should_sleep());
    assert!(!table.zip);
    assert_eq!(table.hand_ref().resolves, 1);
    assert!(table.hand_ref().history_stored);
    assert_eq!(
        result.events(),
        &[
            GameEvent::ShowdownStarted { table_id: 1 },
            GameEvent::HandCompleted { table_id: 1 }
        ]
    );

    // Already at the showdown round: nothing is paid twice.
    let result = engine.process_table(&mut table, &mut tournament, true, false);
    assert_eq!(table.hand_ref().resolves, 1);
    assert!(result.events().is_empty());
}

#[test]
fn test_showdown_without_hand() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Showdown);
    table.current = false;
    let result = engine.process_table(&mut table, &mut StubTournament::default(), true, false);
    assert_eq!(result.next_state(), Some(TableState::Done));
    assert!(result.should_auto_save());
    assert!(!result.should_save());
}

#[test]
fn test_observer_client_skips_history() {
    let (engine, _) = recording_engine(SilentProvider);
    let mut table = StubTable::new(TableState::Showdown).with_hand(StubHand::default());
    let mut observer = StubPlayer::human(7, 0);
    observer.observer = true;
    let mut tournament = StubTournament {
        local: Some(observer),
        ..StubTournament::default()
    };
    engine.process_table(&mut table, &mut tournament, false, true);
    assert!(!table.hand_ref().history_stored);
    assert_eq!(table.hand_ref().resolves, 0);
}
