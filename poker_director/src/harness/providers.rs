//! Decision sources for locally controlled players.

use enum_dispatch::enum_dispatch;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{
    collections::VecDeque,
    fmt,
    sync::{Mutex, PoisonError},
};

use crate::game::{
    collaborators::{GamePlayerInfo, PlayerActionProvider},
    entities::{ActionOptions, PlayerAction},
};

/// Replays a fixed list of decisions, then goes silent.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    actions: Mutex<VecDeque<PlayerAction>>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: Mutex::new(actions.into_iter().collect()),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PlayerActionProvider for ScriptedProvider {
    fn get_action(
        &self,
        _player: &dyn GamePlayerInfo,
        _options: &ActionOptions,
    ) -> Option<PlayerAction> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

/// Never bets: checks when it can, otherwise calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckCallProvider;

impl PlayerActionProvider for CheckCallProvider {
    fn get_action(
        &self,
        _player: &dyn GamePlayerInfo,
        options: &ActionOptions,
    ) -> Option<PlayerAction> {
        let action = if options.can_check {
            PlayerAction::check()
        } else if options.can_call {
            PlayerAction::call()
        } else {
            PlayerAction::fold()
        };
        Some(action)
    }
}

/// Loose-aggressive play from a seeded generator.
pub struct RandomProvider {
    rng: Mutex<StdRng>,
}

impl RandomProvider {
    const FOLD_PROBABILITY: f64 = 0.2;
    const BET_PROBABILITY: f64 = 0.25;
    const RAISE_PROBABILITY: f64 = 0.1;
    /// Chance a bet or raise is for the whole stack.
    const SHOVE_PROBABILITY: f64 = 0.08;

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn sized(rng: &mut StdRng, min: u32, max: u32) -> u32 {
        if min >= max || rng.random_bool(Self::SHOVE_PROBABILITY) {
            max
        } else {
            rng.random_range(min..=max.min(min.saturating_mul(3)))
        }
    }
}

impl PlayerActionProvider for RandomProvider {
    fn get_action(
        &self,
        _player: &dyn GamePlayerInfo,
        options: &ActionOptions,
    ) -> Option<PlayerAction> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let action = if options.can_check {
            if options.can_bet && rng.random_bool(Self::BET_PROBABILITY) {
                PlayerAction::bet(Self::sized(&mut rng, options.min_bet, options.max_bet))
            } else {
                PlayerAction::check()
            }
        } else if rng.random_bool(Self::FOLD_PROBABILITY) {
            PlayerAction::fold()
        } else if options.can_raise && rng.random_bool(Self::RAISE_PROBABILITY) {
            PlayerAction::raise(Self::sized(&mut rng, options.min_raise, options.max_raise))
        } else if options.can_call {
            PlayerAction::call()
        } else {
            PlayerAction::fold()
        };
        Some(action)
    }
}

impl fmt::Debug for RandomProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomProvider").finish_non_exhaustive()
    }
}

/// Never answers. Every decision falls back to the engine default.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentProvider;

impl PlayerActionProvider for SilentProvider {
    fn get_action(
        &self,
        _player: &dyn GamePlayerInfo,
        _options: &ActionOptions,
    ) -> Option<PlayerAction> {
        None
    }
}

/// Adapts a closure.
pub struct ProviderFn<F>(pub F);

impl<F> PlayerActionProvider for ProviderFn<F>
where
    F: Fn(&dyn GamePlayerInfo, &ActionOptions) -> Option<PlayerAction> + Send + Sync,
{
    fn get_action(
        &self,
        player: &dyn GamePlayerInfo,
        options: &ActionOptions,
    ) -> Option<PlayerAction> {
        (self.0)(player, options)
    }
}

impl<F> fmt::Debug for ProviderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProviderFn")
    }
}

/// The providers a simulation can be configured with by name.
#[enum_dispatch(PlayerActionProvider)]
#[derive(Debug)]
pub enum BuiltinProvider {
    CheckCall(CheckCallProvider),
    Random(RandomProvider),
    Scripted(ScriptedProvider),
    Silent(SilentProvider),
}
