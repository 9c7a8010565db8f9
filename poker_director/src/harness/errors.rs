use thiserror::Error;

use crate::{
    game::entities::{PlayerId, TableId},
    tournament::TournamentConfigError,
};

/// Simulation setup errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("Table {0} is full")]
    TableFull(TableId),

    #[error("Player {0} is already seated")]
    DuplicatePlayer(PlayerId),

    #[error("Invalid tournament config: {0}")]
    InvalidConfig(#[from] TournamentConfigError),

    #[error("Not enough players: need {needed}, have {have}")]
    NotEnoughPlayers { needed: usize, have: usize },

    #[error("{players} players do not fit at {tables} tables")]
    TooManyPlayers { players: usize, tables: usize },
}

pub type SimResult<T> = Result<T, SimError>;
