//! Headless Tournament Example
//!
//! Drives two tables through the engine by hand, the way a server loop
//! would, and prints every event the engine publishes.

use std::sync::Arc;

use poker_director::{
    GameEventBus, TableState, TournamentEngine,
    game::{GameTable, TournamentContext},
    harness::{RandomProvider, SimPlayer, SimTable, SimTournament},
    tournament::TournamentConfig,
};

fn main() {
    println!("=== Headless Tournament Example ===\n");

    let config = Arc::new(TournamentConfig::turbo_sit_and_go("Example".to_string(), 6));
    let mut tables: Vec<SimTable> = (1..=2)
        .map(|number| SimTable::new(number, 6, Arc::clone(&config), number as u64))
        .collect();
    for id in 1..=6 {
        let player = SimPlayer::computer(id, &format!("Bot {id}"), config.starting_stack);
        if let Err(e) = tables[(id as usize - 1) % 2].add_player(player) {
            eprintln!("could not seat player {id}: {e}");
        }
    }
    tables[0].set_current(true);

    let bus = Arc::new(GameEventBus::new());
    let _subscription = bus.subscribe(|event| println!("  {event}"));
    let engine = TournamentEngine::new(Arc::clone(&bus), RandomProvider::new(7));
    let mut tournament = SimTournament::new(config, 6, 0);

    // A minimal caller loop: adopt the next state, or park the table in
    // PENDING until its phase has run. Phases run instantly here.
    for tick in 0..60 {
        for table in &mut tables {
            let result = engine.process_table(table, &mut tournament, true, false);
            if let Some(phase) = result.phase_to_run() {
                println!("tick {tick}: table {} runs {phase}", table.number());
            }
            match (result.next_state(), result.pending_state()) {
                (Some(next), _) => table.set_table_state(next),
                (None, Some(pending)) => {
                    table.set_pending_table_state(pending);
                    table.set_table_state(TableState::Pending);
                }
                (None, None) => {}
            }
            // Nobody presses deal in a headless run.
            if table.table_state() == TableState::BeginWait {
                table.set_table_state(TableState::CheckEndHand);
            }
        }
    }

    println!("\nAfter 60 ticks the tournament is at level {}", tournament.level());
    for table in &tables {
        println!(
            "Table {}: {} after {} hand(s), {} chips in play",
            table.number(),
            table.table_state(),
            table.hand_num(),
            table.chips_in_play()
        );
    }
}
