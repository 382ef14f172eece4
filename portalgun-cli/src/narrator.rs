use std::io::Write;

use colored::Colorize;
use portalgun_game::{GameEvent, Reveal, RevealStatus, RoundObserver};

/// Morty's running commentary, written to the console as events arrive.
pub struct ConsoleNarrator<W> {
    out: W,
}

impl<W: Write> ConsoleNarrator<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // The console is best effort; a closed stdout ends the game through the next prompt.
        if let Err(err) = writeln!(self.out, "{text}") {
            log::debug!("narration dropped: {err}");
        }
    }

    fn reveal(&mut self, reveal: &Reveal) {
        let label = reveal.label.as_deref().unwrap_or_default();
        let id = reveal.id;
        self.line(
            &format!(
                "Morty: Aww man, my {label} random value is {}.",
                reveal.secret
            )
            .bright_black()
            .to_string(),
        );
        self.line(&format!("Morty KEY{id}={}", reveal.key_hex).bright_black().to_string());
        self.line(
            &format!(
                "Morty: So the fair number is ({} + {}) % {} = {}",
                reveal.secret, reveal.counterpart, reveal.range, reveal.value
            )
            .bright_black()
            .to_string(),
        );
        let status = match reveal.status {
            RevealStatus::Ok => reveal.status.label().green(),
            RevealStatus::Mismatch => reveal.status.label().red().bold(),
        };
        self.line(&format!("{} {status}", format!("Check HMAC{id}:").bright_black()));
    }
}

impl<W: Write> RoundObserver for ConsoleNarrator<W> {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { boxes, .. } => self.line(
                &format!("\nMorty: I'm gonna hide your portal gun in one of the {boxes} boxes.")
                    .yellow()
                    .to_string(),
            ),
            GameEvent::Committed { id, digest, .. } => {
                self.line(&format!("Morty HMAC{id}={digest}").bright_black().to_string());
            }
            GameEvent::BoxesRemaining { removed, remaining } => {
                let listed = remaining
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                self.line(
                    &format!("Morty: I removed {removed} boxes. Remaining boxes: {listed}")
                        .yellow()
                        .to_string(),
                );
            }
            GameEvent::Revealed(reveal) => self.reveal(reveal),
            GameEvent::Outcome { portal, won, .. } => {
                self.line(
                    &format!("Morty: The portal gun is in the box {portal}.")
                        .blue()
                        .to_string(),
                );
                let verdict = if *won {
                    "Morty: Aww man, you won, Rick!"
                } else {
                    "Morty: Aww man, you lost, Rick."
                };
                self.line(&verdict.blue().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portalgun_game::{KeyMaterial, keyed_digest};

    fn narrate(events: &[GameEvent]) -> String {
        colored::control::set_override(false);
        let mut narrator = ConsoleNarrator::new(Vec::new());
        for event in events {
            narrator.on_event(event);
        }
        String::from_utf8(narrator.into_inner()).unwrap()
    }

    #[test]
    fn reveal_lines_show_formula_and_status() {
        let key = KeyMaterial::from_bytes([1u8; 32]);
        let reveal = Reveal {
            id: 2,
            label: Some("portal".to_string()),
            range: 3,
            secret: 2,
            key_hex: key.to_hex(),
            digest: keyed_digest(&key, 2),
            counterpart: 2,
            value: 1,
            status: RevealStatus::Mismatch,
        };
        let text = narrate(&[GameEvent::Revealed(reveal)]);
        assert!(text.contains("my portal random value is 2."));
        assert!(text.contains(&format!("Morty KEY2={}", key.to_hex())));
        assert!(text.contains("(2 + 2) % 3 = 1"));
        assert!(text.contains("Check HMAC2: MISMATCH"));
    }

    #[test]
    fn remaining_boxes_are_listed() {
        let text = narrate(&[
            GameEvent::BoxesRemaining {
                removed: 3,
                remaining: vec![1, 4],
            },
            GameEvent::Outcome {
                portal: 4,
                final_box: 4,
                switched: true,
                won: true,
            },
        ]);
        assert!(text.contains("I removed 3 boxes. Remaining boxes: 1, 4"));
        assert!(text.contains("in the box 4."));
        assert!(text.contains("you won, Rick!"));
    }
}
