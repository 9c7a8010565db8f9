use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use poker_director::{
    ActionOptions, GameEventBus, TableState, TournamentEngine,
    game::GameTable,
    harness::{
        CheckCallProvider, RandomProvider, SimPlayer, SimTable, SimTournament, SimulationConfig,
        TableRunner,
    },
    tournament::TournamentConfig,
};
use std::sync::Arc;

/// Helper to create a table with N players already in a hand
fn setup_betting_table(n_players: usize) -> (SimTable, SimTournament) {
    let config = Arc::new(TournamentConfig::turbo_sit_and_go("Bench".to_string(), 10));
    let mut table = SimTable::new(1, 10, Arc::clone(&config), 1);
    for id in 1..=n_players {
        let id = i32::try_from(id).unwrap();
        table
            .add_player(SimPlayer::computer(id, "bench", config.starting_stack))
            .unwrap();
    }
    table.set_button();
    table.start_new_hand();
    table.set_table_state(TableState::Betting);
    let tournament = SimTournament::new(config, n_players, 0);
    (table, tournament)
}

/// Benchmark deriving the legal actions for one decision
fn bench_action_options(c: &mut Criterion) {
    c.bench_function("action_options", |b| {
        b.iter(|| ActionOptions::new(40, 1500, 20, 20, 30));
    });
}

/// Benchmark one betting tick with different table sizes
fn bench_betting_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("betting_tick");
    let engine = TournamentEngine::new(Arc::new(GameEventBus::new()), CheckCallProvider);

    for n_players in [2, 10].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            n_players,
            |b, &n| {
                b.iter_batched(
                    || setup_betting_table(n),
                    |(mut table, mut tournament)| {
                        engine.process_table(&mut table, &mut tournament, true, false)
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark a complete sit-and-go from the first deal to a winner
fn bench_full_tournament(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tournament");
    group.sample_size(10);

    for players in [2, 6].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", players)),
            players,
            |b, &players| {
                let sim = SimulationConfig {
                    players,
                    ..SimulationConfig::default()
                };
                b.iter(|| {
                    let config = TournamentConfig::turbo_sit_and_go("Bench".to_string(), players);
                    let mut runner =
                        TableRunner::from_config(config, &sim, RandomProvider::new(3)).unwrap();
                    runner.run(1_000_000, || false)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(engine_operations, bench_action_options, bench_betting_tick);

criterion_group!(simulations, bench_full_tournament);

criterion_main!(engine_operations, simulations);
