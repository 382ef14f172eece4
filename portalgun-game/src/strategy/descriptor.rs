//! Strategies defined by data instead of code, loaded from descriptor files.
use serde::{Deserialize, Serialize};

use super::{FairDraws, Remaining, RoundFacts, Strategy, sorted_pair, switch_win_probability};
use crate::error::GameError;

/// Which non-guess box is held back when Rick guessed the portal box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepRule {
    Lowest,
    Highest,
    /// Chosen by a fair draw, like ClassicMorty.
    Fair,
}

/// Shape an external strategy must have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyDescriptor {
    pub name: String,
    pub description: String,
    pub keep: KeepRule,
}

/// Strategy driven by a [`StrategyDescriptor`].
#[derive(Debug, Clone)]
pub struct DescribedMorty {
    descriptor: StrategyDescriptor,
    draw_label: String,
}

impl DescribedMorty {
    #[must_use]
    pub fn new(descriptor: StrategyDescriptor) -> Self {
        let draw_label = format!("{}-choice", descriptor.name);
        Self {
            descriptor,
            draw_label,
        }
    }
}

impl Strategy for DescribedMorty {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn describe(&self) -> String {
        format!("{}: {}", self.descriptor.name, self.descriptor.description)
    }

    fn decide_remaining(
        &self,
        facts: RoundFacts,
        draws: &mut dyn FairDraws,
    ) -> Result<Remaining, GameError> {
        if !facts.guessed_right() {
            return Ok(facts.guess_and_portal());
        }
        let range = facts.boxes.saturating_sub(1);
        let index = match self.descriptor.keep {
            KeepRule::Lowest => 0,
            KeepRule::Highest => range.saturating_sub(1),
            KeepRule::Fair => draws.fair_draw(range, &self.draw_label)?,
        };
        let kept = facts
            .nth_other(index)
            .ok_or(GameError::DrawOutOfRange { value: index, range })?;
        Ok(sorted_pair(facts.guess, kept))
    }

    fn exact_switch_probability(&self, boxes: u32) -> f64 {
        switch_win_probability(boxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testing::ScriptedDraws;

    fn morty(keep: KeepRule) -> DescribedMorty {
        DescribedMorty::new(StrategyDescriptor {
            name: "PickyMorty".to_string(),
            description: "keeps a box by rule".to_string(),
            keep,
        })
    }

    const RIGHT: RoundFacts = RoundFacts {
        boxes: 5,
        guess: 4,
        portal: 4,
    };

    #[test]
    fn highest_rule_keeps_top_other_box() {
        let mut draws = ScriptedDraws::default();
        let remaining = morty(KeepRule::Highest)
            .decide_remaining(RIGHT, &mut draws)
            .unwrap();
        assert_eq!(remaining.as_slice(), &[3, 4]);
    }

    #[test]
    fn lowest_rule_keeps_bottom_other_box() {
        let mut draws = ScriptedDraws::default();
        let remaining = morty(KeepRule::Lowest)
            .decide_remaining(RIGHT, &mut draws)
            .unwrap();
        assert_eq!(remaining.as_slice(), &[0, 4]);
    }

    #[test]
    fn fair_rule_draws_with_its_own_label() {
        let mut draws = ScriptedDraws::new([2]);
        let remaining = morty(KeepRule::Fair)
            .decide_remaining(RIGHT, &mut draws)
            .unwrap();
        assert_eq!(remaining.as_slice(), &[2, 4]);
        assert_eq!(draws.requests, vec![(4, "PickyMorty-choice".to_string())]);
    }

    #[test]
    fn wrong_guess_never_removes_portal() {
        let mut draws = ScriptedDraws::default();
        let facts = RoundFacts {
            boxes: 5,
            guess: 0,
            portal: 3,
        };
        for keep in [KeepRule::Lowest, KeepRule::Highest, KeepRule::Fair] {
            let remaining = morty(keep).decide_remaining(facts, &mut draws).unwrap();
            assert_eq!(remaining.as_slice(), &[0, 3]);
        }
        assert!(draws.requests.is_empty());
    }

    #[test]
    fn descriptor_rejects_unknown_fields() {
        let parsed: Result<StrategyDescriptor, _> = serde_json::from_str(
            r#"{"name":"X","description":"d","keep":"lowest","extra":1}"#,
        );
        assert!(parsed.is_err());
    }
}
