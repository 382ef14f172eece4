//! Morty strategies: which boxes stay closed once Rick has guessed.
use smallvec::{SmallVec, smallvec};

use crate::error::GameError;
use crate::numbers::ratio;

pub mod classic;
pub mod descriptor;
pub mod lazy;

pub use classic::ClassicMorty;
pub use descriptor::{DescribedMorty, KeepRule, StrategyDescriptor};
pub use lazy::LazyMorty;

/// Box indices left closed after Morty prunes the decoys.
///
/// Built-in strategies always return exactly two ascending indices; an
/// external strategy may not, so the orchestrator normalises whatever comes back.
pub type Remaining = SmallVec<[u32; 2]>;

/// Public facts of a round at the moment Morty decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundFacts {
    pub boxes: u32,
    pub guess: u32,
    pub portal: u32,
}

impl RoundFacts {
    #[must_use]
    pub const fn guessed_right(&self) -> bool {
        self.guess == self.portal
    }

    /// The `index`-th box (ascending) that is not Rick's guess.
    #[must_use]
    pub fn nth_other(&self, index: u32) -> Option<u32> {
        if index >= self.boxes.saturating_sub(1) {
            return None;
        }
        Some(if index >= self.guess { index + 1 } else { index })
    }

    /// Remaining pair when the guess missed: Rick's box and the portal box.
    #[must_use]
    pub fn guess_and_portal(&self) -> Remaining {
        sorted_pair(self.guess, self.portal)
    }
}

/// Capability for requesting extra fair draws during a decision.
///
/// Every draw made through it joins the current round's reveal batch.
pub trait FairDraws {
    /// Jointly draw a value in `[0, range)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty or Rick's contribution cannot be read.
    fn fair_draw(&mut self, range: u32, label: &str) -> Result<u32, GameError>;
}

/// Policy deciding which two boxes remain.
///
/// Implementations hold no per-round state; one instance serves a whole session.
pub trait Strategy {
    fn name(&self) -> &str;

    /// Human-readable explanation of the policy.
    fn describe(&self) -> String;

    /// Pick the boxes left closed. Must keep Rick's guess and must never
    /// remove the portal box.
    ///
    /// # Errors
    ///
    /// Propagates failures from nested fair draws.
    fn decide_remaining(
        &self,
        facts: RoundFacts,
        draws: &mut dyn FairDraws,
    ) -> Result<Remaining, GameError>;

    /// Closed-form probability that switching wins with `boxes` boxes.
    fn exact_switch_probability(&self, boxes: u32) -> f64;
}

/// Two indices in ascending order.
#[must_use]
pub fn sorted_pair(a: u32, b: u32) -> Remaining {
    if a <= b { smallvec![a, b] } else { smallvec![b, a] }
}

/// `(n - 1) / n`: the guess is right 1 time in n and switching wins the rest.
#[must_use]
pub fn switch_win_probability(boxes: u32) -> f64 {
    ratio(u64::from(boxes.saturating_sub(1)), u64::from(boxes))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Draw handle returning scripted values and remembering what was asked.
    #[derive(Debug, Default)]
    pub struct ScriptedDraws {
        pub values: VecDeque<u32>,
        pub requests: Vec<(u32, String)>,
    }

    impl ScriptedDraws {
        pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
            Self {
                values: values.into_iter().collect(),
                requests: Vec::new(),
            }
        }
    }

    impl FairDraws for ScriptedDraws {
        fn fair_draw(&mut self, range: u32, label: &str) -> Result<u32, GameError> {
            self.requests.push((range, label.to_string()));
            let value = self.values.pop_front().unwrap_or(0);
            if value >= range {
                return Err(GameError::DrawOutOfRange { value, range });
            }
            Ok(value)
        }
    }
}
