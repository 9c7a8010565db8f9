//! End-to-end tests that run whole tournaments through the harness.

use poker_director::{
    GameEvent, TableState,
    game::{GameTable, TournamentContext},
    harness::{CheckCallProvider, RandomProvider, RunSummary, SimulationConfig, TableRunner},
    tournament::TournamentConfig,
};
use std::sync::{Arc, Mutex};

const MAX_TICKS: u64 = 500_000;

fn turbo(max_players: usize) -> TournamentConfig {
    TournamentConfig::turbo_sit_and_go("Simulation".to_string(), max_players)
}

fn run(sim: &SimulationConfig) -> (RunSummary, Vec<GameEvent>) {
    let mut runner =
        TableRunner::from_config(turbo(sim.players), sim, RandomProvider::new(sim.seed)).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = runner
        .bus()
        .subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    let summary = runner.run(MAX_TICKS, || false);
    assert!(
        runner
            .tables()
            .iter()
            .all(|t| t.table_state() == TableState::GameOver)
    );
    let events = seen.lock().unwrap().clone();
    (summary, events)
}

fn assert_single_winner(summary: &RunSummary, players: usize) {
    assert!(summary.game_over, "no winner after {} ticks", summary.ticks);
    let winner = summary.winner.expect("a winner");
    assert_eq!(summary.finish_order.len(), players - 1);
    assert!(!summary.finish_order.contains(&winner));
    assert!(summary.hands > 0);
}

#[test]
fn test_offline_tournament_has_one_winner() {
    let sim = SimulationConfig {
        players: 5,
        seed: 3,
        ..SimulationConfig::default()
    };
    let (summary, events) = run(&sim);
    assert_single_winner(&summary, 5);

    let completed: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::TournamentCompleted { winner_id } => Some(*winner_id),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![summary.winner.unwrap()]);

    let eliminated = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerEliminated { .. }))
        .count();
    assert_eq!(eliminated, 4);
}

#[test]
fn test_same_seed_same_tournament() {
    let sim = SimulationConfig {
        players: 4,
        seed: 42,
        ..SimulationConfig::default()
    };
    let (first, _) = run(&sim);
    let (second, _) = run(&sim);
    assert_eq!(first, second);
}

#[test]
fn test_online_tournament_completes() {
    let sim = SimulationConfig {
        players: 3,
        seed: 9,
        online: true,
        ..SimulationConfig::default()
    };
    let (summary, events) = run(&sim);
    assert_single_winner(&summary, 3);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::HandStarted { .. }))
    );
}

#[test]
fn test_tables_consolidate_as_players_bust() {
    let sim = SimulationConfig {
        players: 8,
        tables: 2,
        seats_per_table: 6,
        seed: 5,
        ..SimulationConfig::default()
    };
    let (summary, events) = run(&sim);
    assert_single_winner(&summary, 8);

    let moves: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PlayerMoved {
                from_table,
                to_table,
                ..
            } => Some((*from_table, *to_table)),
            _ => None,
        })
        .collect();
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|(from, to)| from != to));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::TableStateChanged {
            to: TableState::OnHold,
            ..
        }
    )));
}

#[test]
fn test_auto_deal_tournament_completes() {
    let sim = SimulationConfig {
        players: 4,
        seed: 17,
        auto_deal: true,
        ..SimulationConfig::default()
    };
    let (summary, events) = run(&sim);
    assert_single_winner(&summary, 4);

    // Auto-deal goes straight from BEGIN to START_HAND.
    assert!(!events.iter().any(|e| matches!(
        e,
        GameEvent::TableStateChanged {
            to: TableState::CheckEndHand,
            ..
        }
    )));
}

#[test]
fn test_hand_count_grows_with_ticks() {
    let sim = SimulationConfig {
        players: 6,
        seed: 1,
        ..SimulationConfig::default()
    };
    let mut runner = TableRunner::from_config(turbo(6), &sim, CheckCallProvider).unwrap();
    let early = runner.run(200, || false);
    let later = runner.run(2_000, || false);
    assert_eq!(early.ticks, 200);
    assert!(later.ticks > early.ticks);
    assert!(later.hands >= early.hands);
    assert!(runner.tables()[0].hand_num() >= 1);
    assert!(runner.tournament().level() > 1);
}
