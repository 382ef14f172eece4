use super::{FairDraws, Remaining, RoundFacts, Strategy, sorted_pair, switch_win_probability};
use crate::error::GameError;

const DRAW_LABEL: &str = "ClassicMorty-choice";

/// Never removes the portal box; when Rick guessed right, a fair draw picks
/// which other box is held back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicMorty;

impl Strategy for ClassicMorty {
    fn name(&self) -> &str {
        "ClassicMorty"
    }

    fn describe(&self) -> String {
        let name = self.name();
        format!(
            "{name}: never removes the portal box. If Rick's initial pick is correct, {name} uses a fair random draw to pick which other box to leave."
        )
    }

    fn decide_remaining(
        &self,
        facts: RoundFacts,
        draws: &mut dyn FairDraws,
    ) -> Result<Remaining, GameError> {
        if !facts.guessed_right() {
            return Ok(facts.guess_and_portal());
        }
        let range = facts.boxes - 1;
        let pick = draws.fair_draw(range, DRAW_LABEL)?;
        let kept = facts
            .nth_other(pick)
            .ok_or(GameError::DrawOutOfRange { value: pick, range })?;
        log::debug!("classic: guess {} was right, holding back box {kept}", facts.guess);
        Ok(sorted_pair(facts.guess, kept))
    }

    fn exact_switch_probability(&self, boxes: u32) -> f64 {
        switch_win_probability(boxes)
    }
}
