//! Tournament data models: blind schedule, breaks, chip denominations and
//! decision timeouts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{
    constants::{DEFAULT_THINK_BANK_SECS, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS},
    entities::{BettingRound, Chips},
};

/// Tournament configuration errors
#[derive(Debug, Eq, Error, PartialEq)]
pub enum TournamentConfigError {
    #[error("Blind schedule is empty")]
    EmptySchedule,

    #[error("Blind levels out of order: expected level {expected}, found {found}")]
    LevelOutOfOrder { expected: u32, found: u32 },

    #[error("Invalid blinds at level {0}")]
    InvalidBlinds(u32),

    #[error("Level {0} has no duration")]
    ZeroDuration(u32),

    #[error("Level {0} has a zero minimum chip")]
    ZeroMinChip(u32),

    #[error("Blinds at level {0} are not a multiple of the minimum chip")]
    BlindsNotColoredUp(u32),

    #[error("Minimum chip decreases at level {0}")]
    MinChipDecreases(u32),

    #[error("Starting level {0} is not in the schedule")]
    UnknownStartingLevel(u32),

    #[error("Starting level {0} is a break")]
    StartsOnBreak(u32),

    #[error("Invalid player limits: min {min}, max {max}")]
    InvalidPlayerLimits { min: usize, max: usize },
}

pub type TournamentConfigResult<T> = Result<T, TournamentConfigError>;

/// Tournament type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentType {
    /// Sit-n-Go (starts when full)
    SitAndGo,
    /// Scheduled tournament (starts at specific time)
    Scheduled,
}

/// One level of the blind schedule. Break levels carry no blinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindLevel {
    /// Level number (1-indexed)
    pub level: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Option<Chips>,
    /// Duration of this level in seconds
    pub duration_secs: u32,
    pub is_break: bool,
    /// Smallest chip denomination in play at this level
    pub min_chip: Chips,
}

impl BlindLevel {
    /// Create a new blind level
    #[must_use]
    pub const fn new(level: u32, small_blind: Chips, big_blind: Chips, duration_secs: u32) -> Self {
        Self {
            level,
            small_blind,
            big_blind,
            ante: None,
            duration_secs,
            is_break: false,
            min_chip: 1,
        }
    }

    /// Create a break
    #[must_use]
    pub const fn break_level(level: u32, duration_secs: u32) -> Self {
        Self {
            level,
            small_blind: 0,
            big_blind: 0,
            ante: None,
            duration_secs,
            is_break: true,
            min_chip: 0,
        }
    }

    /// Create a blind level with ante
    #[must_use]
    pub const fn with_ante(mut self, ante: Chips) -> Self {
        self.ante = Some(ante);
        self
    }

    #[must_use]
    pub const fn with_min_chip(mut self, min_chip: Chips) -> Self {
        self.min_chip = min_chip;
        self
    }
}

/// Decision timeouts per betting round, in seconds. A round set to zero
/// uses the base timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimeouts {
    pub base_secs: u32,
    pub pre_flop_secs: u32,
    pub flop_secs: u32,
    pub turn_secs: u32,
    pub river_secs: u32,
}

impl Default for RoundTimeouts {
    fn default() -> Self {
        Self::uniform(DEFAULT_TIMEOUT_SECS)
    }
}

impl RoundTimeouts {
    #[must_use]
    pub const fn uniform(base_secs: u32) -> Self {
        Self {
            base_secs,
            pre_flop_secs: 0,
            flop_secs: 0,
            turn_secs: 0,
            river_secs: 0,
        }
    }

    /// Base timeout clamped to the supported range.
    #[must_use]
    pub const fn base(&self) -> u32 {
        clamp_timeout(self.base_secs)
    }

    /// Timeout for `round`, falling back to the base timeout and clamped to
    /// the supported range.
    #[must_use]
    pub const fn for_round(&self, round: BettingRound) -> u32 {
        let secs = match round {
            BettingRound::PreFlop => self.pre_flop_secs,
            BettingRound::Flop => self.flop_secs,
            BettingRound::Turn => self.turn_secs,
            BettingRound::River => self.river_secs,
            BettingRound::Showdown => 0,
        };
        if secs == 0 {
            self.base()
        } else {
            clamp_timeout(secs)
        }
    }
}

const fn clamp_timeout(secs: u32) -> u32 {
    if secs < MIN_TIMEOUT_SECS {
        MIN_TIMEOUT_SECS
    } else if secs > MAX_TIMEOUT_SECS {
        MAX_TIMEOUT_SECS
    } else {
        secs
    }
}

/// Players who bust before `last_level` ends may buy back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuyPolicy {
    pub chips: Chips,
    pub last_level: u32,
}

/// Every player may buy extra chips once `level` starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnPolicy {
    pub chips: Chips,
    pub level: u32,
}

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Tournament name
    pub name: String,
    /// Tournament type
    pub tournament_type: TournamentType,
    /// Minimum players required
    pub min_players: usize,
    /// Maximum players allowed
    pub max_players: usize,
    /// Starting chip stack for each player
    pub starting_stack: Chips,
    /// Blind level structure
    pub blind_levels: Vec<BlindLevel>,
    /// Starting blind level (usually 1)
    pub starting_level: u32,
    /// Scheduled start time (for Scheduled tournaments)
    pub scheduled_start: Option<DateTime<Utc>>,
    /// Players needed before a scheduled start fires
    pub min_players_for_scheduled_start: usize,
    pub timeouts: RoundTimeouts,
    /// Extra decision time each player may draw on over the tournament
    pub think_bank_secs: u32,
    pub rebuy: Option<RebuyPolicy>,
    pub add_on: Option<AddOnPolicy>,
}

impl TournamentConfig {
    /// Create a standard Sit-n-Go configuration
    #[must_use]
    pub fn sit_and_go(name: String, max_players: usize) -> Self {
        // Blinds roughly double every three levels, with a break after level 4.
        let blind_levels = vec![
            BlindLevel::new(1, 10, 20, 300).with_min_chip(5),
            BlindLevel::new(2, 15, 30, 300).with_min_chip(5),
            BlindLevel::new(3, 20, 40, 300).with_min_chip(10),
            BlindLevel::new(4, 30, 60, 300).with_min_chip(10),
            BlindLevel::break_level(5, 300),
            BlindLevel::new(6, 40, 80, 300).with_min_chip(10),
            BlindLevel::new(7, 60, 120, 300).with_min_chip(20),
            BlindLevel::new(8, 80, 160, 300).with_min_chip(20),
            BlindLevel::new(9, 120, 240, 300)
                .with_ante(20)
                .with_min_chip(20),
            BlindLevel::new(10, 160, 320, 300)
                .with_ante(40)
                .with_min_chip(20),
            BlindLevel::new(11, 240, 480, 300)
                .with_ante(60)
                .with_min_chip(20),
        ];

        Self {
            name,
            tournament_type: TournamentType::SitAndGo,
            min_players: 2,
            max_players,
            starting_stack: 1500,
            blind_levels,
            starting_level: 1,
            scheduled_start: None,
            min_players_for_scheduled_start: 2,
            timeouts: RoundTimeouts::default(),
            think_bank_secs: DEFAULT_THINK_BANK_SECS,
            rebuy: None,
            add_on: None,
        }
    }

    /// Create a turbo Sit-n-Go (faster blind increases)
    #[must_use]
    pub fn turbo_sit_and_go(name: String, max_players: usize) -> Self {
        let mut config = Self::sit_and_go(name, max_players);
        // Turbo: 3-minute levels, 1-minute break
        for level in &mut config.blind_levels {
            level.duration_secs = if level.is_break { 60 } else { 180 };
        }
        config.timeouts = RoundTimeouts::uniform(15);
        config
    }

    /// Starts at `start` once `min_players` have registered.
    #[must_use]
    pub fn scheduled(mut self, start: DateTime<Utc>, min_players: usize) -> Self {
        self.tournament_type = TournamentType::Scheduled;
        self.scheduled_start = Some(start);
        self.min_players_for_scheduled_start = min_players;
        self
    }

    #[must_use]
    pub fn with_rebuys(mut self, chips: Chips, last_level: u32) -> Self {
        self.rebuy = Some(RebuyPolicy { chips, last_level });
        self
    }

    #[must_use]
    pub fn with_add_on(mut self, chips: Chips, level: u32) -> Self {
        self.add_on = Some(AddOnPolicy { chips, level });
        self
    }

    /// Get blind level by number
    #[must_use]
    pub fn get_blind_level(&self, level: u32) -> Option<&BlindLevel> {
        self.blind_levels.iter().find(|bl| bl.level == level)
    }

    #[must_use]
    pub fn last_level(&self) -> u32 {
        self.blind_levels.last().map_or(0, |bl| bl.level)
    }

    /// Blinds in effect at `level`. Levels past the end of the schedule
    /// repeat the last playing level.
    #[must_use]
    pub fn playing_level(&self, level: u32) -> Option<&BlindLevel> {
        self.blind_levels
            .iter()
            .filter(|bl| !bl.is_break && bl.level <= level)
            .last()
    }

    #[must_use]
    pub fn is_break_level(&self, level: u32) -> bool {
        self.get_blind_level(level).is_some_and(|bl| bl.is_break)
    }

    /// Smallest chip in play at `level`. Breaks keep the previous level's
    /// chips.
    #[must_use]
    pub fn min_chip_for(&self, level: u32) -> Chips {
        self.playing_level(level).map_or(1, |bl| bl.min_chip)
    }

    /// Length of `level` in seconds. Levels past the end of the schedule
    /// last as long as the final level.
    #[must_use]
    pub fn duration_for(&self, level: u32) -> u32 {
        self.get_blind_level(level)
            .or_else(|| self.blind_levels.last())
            .map_or(0, |bl| bl.duration_secs)
    }

    #[must_use]
    pub fn is_rebuy_period(&self, level: u32) -> bool {
        self.rebuy.is_some_and(|policy| level <= policy.last_level)
    }

    /// Checks the schedule is usable by a running tournament.
    pub fn validate(&self) -> TournamentConfigResult<()> {
        if self.min_players < 2 || self.max_players < self.min_players {
            return Err(TournamentConfigError::InvalidPlayerLimits {
                min: self.min_players,
                max: self.max_players,
            });
        }
        if self.blind_levels.is_empty() {
            return Err(TournamentConfigError::EmptySchedule);
        }

        let mut min_chip = 0;
        for (expected, bl) in (1u32..).zip(&self.blind_levels) {
            if bl.level != expected {
                return Err(TournamentConfigError::LevelOutOfOrder {
                    expected,
                    found: bl.level,
                });
            }
            if bl.duration_secs == 0 {
                return Err(TournamentConfigError::ZeroDuration(bl.level));
            }
            if bl.is_break {
                continue;
            }
            if bl.small_blind == 0 || bl.big_blind < bl.small_blind {
                return Err(TournamentConfigError::InvalidBlinds(bl.level));
            }
            if bl.min_chip == 0 {
                return Err(TournamentConfigError::ZeroMinChip(bl.level));
            }
            if bl.min_chip < min_chip {
                return Err(TournamentConfigError::MinChipDecreases(bl.level));
            }
            let ante = bl.ante.unwrap_or(0);
            if bl.small_blind % bl.min_chip != 0
                || bl.big_blind % bl.min_chip != 0
                || ante % bl.min_chip != 0
            {
                return Err(TournamentConfigError::BlindsNotColoredUp(bl.level));
            }
            min_chip = bl.min_chip;
        }

        match self.get_blind_level(self.starting_level) {
            None => Err(TournamentConfigError::UnknownStartingLevel(
                self.starting_level,
            )),
            Some(bl) if bl.is_break => Err(TournamentConfigError::StartsOnBreak(bl.level)),
            Some(_) => Ok(()),
        }
    }
}
