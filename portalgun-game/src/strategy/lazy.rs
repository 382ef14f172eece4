use super::{FairDraws, Remaining, RoundFacts, Strategy, sorted_pair, switch_win_probability};
use crate::error::GameError;

/// Removes boxes deterministically, keeping the lowest possible indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyMorty;

impl Strategy for LazyMorty {
    fn name(&self) -> &str {
        "LazyMorty"
    }

    fn describe(&self) -> String {
        "LazyMorty: removes boxes deterministically (lowest indices possible), no randomness."
            .to_string()
    }

    fn decide_remaining(
        &self,
        facts: RoundFacts,
        _draws: &mut dyn FairDraws,
    ) -> Result<Remaining, GameError> {
        if !facts.guessed_right() {
            return Ok(facts.guess_and_portal());
        }
        let lowest = facts.nth_other(0).ok_or(GameError::TooFewBoxes {
            boxes: facts.boxes,
        })?;
        Ok(sorted_pair(facts.guess, lowest))
    }

    // Same law as ClassicMorty: which decoy survives does not depend on where the portal is.
    fn exact_switch_probability(&self, boxes: u32) -> f64 {
        switch_win_probability(boxes)
    }
}
