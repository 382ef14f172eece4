//! Round orchestration: portal draw, guess, Morty's pruning, stay/switch,
//! reveal of every commitment made during the round, and bookkeeping.
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use smallvec::smallvec;

use crate::answer::{AnswerError, AnswerProvider, parse_in_range};
use crate::error::GameError;
use crate::fair::{Commitment, Digest, combine, create_commitment};
use crate::stats::{RoundRecord, Statistics};
use crate::strategy::{FairDraws, Remaining, RoundFacts, Strategy};

/// Label attached to the draw that hides the portal gun.
pub const PORTAL_LABEL: &str = "portal";

/// Answer meaning "switch" at the stay/switch prompt; the other accepted answer (1) stays.
pub const SWITCH_ANSWER: u32 = 0;

/// A fair draw waiting to be revealed at the end of its round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReveal {
    pub id: u32,
    pub label: Option<String>,
    pub range: u32,
    pub commitment: Commitment,
    pub counterpart: u32,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevealStatus {
    Ok,
    Mismatch,
}

impl RevealStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Mismatch => "MISMATCH",
        }
    }
}

/// Everything disclosed about one draw once its round is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reveal {
    pub id: u32,
    pub label: Option<String>,
    pub range: u32,
    pub secret: u32,
    pub key_hex: String,
    pub digest: Digest,
    pub counterpart: u32,
    pub value: u32,
    pub status: RevealStatus,
}

impl Reveal {
    /// Recompute the digest from the disclosed secret and key.
    #[must_use]
    pub fn audit(pending: &PendingReveal) -> Self {
        let commitment = &pending.commitment;
        let status = if commitment.verify() {
            RevealStatus::Ok
        } else {
            RevealStatus::Mismatch
        };
        Self {
            id: pending.id,
            label: pending.label.clone(),
            range: pending.range,
            secret: commitment.secret(),
            key_hex: commitment.key().to_hex(),
            digest: commitment.digest(),
            counterpart: pending.counterpart,
            value: pending.value,
            status,
        }
    }
}

/// Progress notifications emitted while a round runs.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        boxes: u32,
    },
    /// Only the digest is disclosed; Rick is asked for his number next.
    Committed {
        id: u32,
        label: Option<String>,
        range: u32,
        digest: Digest,
    },
    BoxesRemaining {
        removed: u32,
        remaining: Vec<u32>,
    },
    Revealed(Reveal),
    Outcome {
        portal: u32,
        final_box: u32,
        switched: bool,
        won: bool,
    },
}

/// Receiver for [`GameEvent`]s (console renderer, transcript, test probe).
pub trait RoundObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl RoundObserver for () {
    fn on_event(&mut self, _event: &GameEvent) {}
}

impl RoundObserver for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Commitment generator plus the queue of draws awaiting reveal.
pub struct RevealLedger<R> {
    rng: R,
    issued: u32,
    pending: Vec<PendingReveal>,
}

impl<R: RngCore + CryptoRng> RevealLedger<R> {
    pub const fn new(rng: R) -> Self {
        Self {
            rng,
            issued: 0,
            pending: Vec::new(),
        }
    }

    /// Commit, disclose the digest, ask Rick for his number, combine.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty range or when Rick's answer cannot be read.
    pub fn draw(
        &mut self,
        range: u32,
        label: Option<&str>,
        answers: &mut dyn AnswerProvider,
        observer: &mut dyn RoundObserver,
    ) -> Result<u32, GameError> {
        let commitment = create_commitment(range, &mut self.rng)?;
        self.issued += 1;
        let id = self.issued;
        log::debug!("commitment {id} ({label:?}) over [0, {range})");
        observer.on_event(&GameEvent::Committed {
            id,
            label: label.map(str::to_string),
            range,
            digest: commitment.digest(),
        });

        let counterpart = answers.prompt_in_range(
            &format!("Rick, enter your number [0,{range}): "),
            range,
            &format!("Invalid number. Enter an integer in [0,{range})."),
        )?;
        let value = combine(commitment.secret(), counterpart, range)?;
        self.pending.push(PendingReveal {
            id,
            label: label.map(str::to_string),
            range,
            commitment,
            counterpart,
            value,
        });
        Ok(value)
    }

    /// Audit and clear every pending draw, oldest first.
    pub fn reveal_all(&mut self) -> Vec<Reveal> {
        self.pending.drain(..).map(|p| Reveal::audit(&p)).collect()
    }
}

/// The protocol handle a strategy receives: draws go through the round's ledger.
struct DrawDesk<'a, R> {
    ledger: &'a mut RevealLedger<R>,
    answers: &'a mut dyn AnswerProvider,
    observer: &'a mut dyn RoundObserver,
}

impl<R: RngCore + CryptoRng> FairDraws for DrawDesk<'_, R> {
    fn fair_draw(&mut self, range: u32, label: &str) -> Result<u32, GameError> {
        self.ledger
            .draw(range, Some(label), &mut *self.answers, &mut *self.observer)
    }
}

/// Force Rick's guess in, drop out-of-range or duplicate boxes, keep exactly two.
///
/// A strategy that names no usable second box gets the lowest other box.
#[must_use]
pub fn normalize_remaining(raw: &[u32], facts: RoundFacts) -> Remaining {
    let mut kept: Remaining = smallvec![facts.guess];
    for &candidate in raw {
        if candidate < facts.boxes && !kept.contains(&candidate) && kept.len() < 2 {
            kept.push(candidate);
        }
    }
    if kept.len() < 2 {
        kept.extend(facts.nth_other(0));
    }
    if raw.len() != 2 || !raw.contains(&facts.guess) || raw.iter().any(|b| *b >= facts.boxes) {
        log::warn!(
            "strategy returned {raw:?} for guess {}; normalized to {kept:?}",
            facts.guess
        );
    }
    kept.sort_unstable();
    kept
}

/// How long a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundLimit {
    Fixed(u32),
    /// Ask after every round whether to play another.
    UntilDeclined,
}

impl From<Option<u32>> for RoundLimit {
    fn from(rounds: Option<u32>) -> Self {
        rounds.map_or(Self::UntilDeclined, Self::Fixed)
    }
}

/// Final report: observed rates next to the strategy's closed form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub strategy: String,
    pub boxes: u32,
    pub rounds: u64,
    pub stats: Statistics,
    pub estimate_switched: f64,
    pub estimate_stayed: f64,
    pub exact_switched: f64,
    pub exact_stayed: f64,
}

/// Drives rounds for one strategy and one box count.
pub struct RoundOrchestrator<R> {
    boxes: u32,
    strategy: Box<dyn Strategy>,
    ledger: RevealLedger<R>,
    stats: Statistics,
    rounds_played: u32,
}

impl<R: RngCore + CryptoRng> RoundOrchestrator<R> {
    /// # Errors
    ///
    /// Returns [`GameError::TooFewBoxes`] unless there are at least three boxes.
    pub fn new(boxes: u32, strategy: Box<dyn Strategy>, rng: R) -> Result<Self, GameError> {
        if boxes <= 2 {
            return Err(GameError::TooFewBoxes { boxes });
        }
        Ok(Self {
            boxes,
            strategy,
            ledger: RevealLedger::new(rng),
            stats: Statistics::new(),
            rounds_played: 0,
        })
    }

    #[must_use]
    pub const fn boxes(&self) -> u32 {
        self.boxes
    }

    #[must_use]
    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    #[must_use]
    pub const fn stats(&self) -> &Statistics {
        &self.stats
    }

    #[must_use]
    pub const fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Play one round end to end.
    ///
    /// A round that fails partway is not counted, and the draws it already
    /// committed to are revealed before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error only when answers run out or a draw is malformed.
    pub fn play_round(
        &mut self,
        answers: &mut dyn AnswerProvider,
        observer: &mut dyn RoundObserver,
    ) -> Result<RoundRecord, GameError> {
        let round = self.rounds_played + 1;
        match self.run_round(round, &mut *answers, &mut *observer) {
            Ok(record) => {
                self.rounds_played = round;
                self.stats.record(record);
                Ok(record)
            }
            Err(err) => {
                log::warn!("round {round} abandoned: {err}");
                self.publish_reveals(observer);
                Err(err)
            }
        }
    }

    fn publish_reveals(&mut self, observer: &mut dyn RoundObserver) {
        for reveal in self.ledger.reveal_all() {
            if reveal.status == RevealStatus::Mismatch {
                log::warn!("commitment {} failed verification", reveal.id);
            }
            observer.on_event(&GameEvent::Revealed(reveal));
        }
    }

    fn run_round(
        &mut self,
        round: u32,
        answers: &mut dyn AnswerProvider,
        observer: &mut dyn RoundObserver,
    ) -> Result<RoundRecord, GameError> {
        let boxes = self.boxes;
        observer.on_event(&GameEvent::RoundStarted { round, boxes });

        let portal = self
            .ledger
            .draw(boxes, Some(PORTAL_LABEL), &mut *answers, &mut *observer)?;

        let guess = answers.prompt_in_range(
            &format!("Morty: What's your guess [0,{boxes})? "),
            boxes,
            "Invalid guess.",
        )?;

        let facts = RoundFacts {
            boxes,
            guess,
            portal,
        };
        let raw = {
            let mut desk = DrawDesk {
                ledger: &mut self.ledger,
                answers: &mut *answers,
                observer: &mut *observer,
            };
            self.strategy.decide_remaining(facts, &mut desk)?
        };
        let remaining = normalize_remaining(&raw, facts);
        log::debug!("{} kept {remaining:?}", self.strategy.name());
        let kept = u32::try_from(remaining.len()).unwrap_or(boxes);
        observer.on_event(&GameEvent::BoxesRemaining {
            removed: boxes.saturating_sub(kept),
            remaining: remaining.to_vec(),
        });

        let switched = answers.prompt(
            "Morty: You can switch your box (enter 0), or stick with it (enter 1): ",
            &|answer| {
                parse_in_range(answer, 2)
                    .ok_or_else(|| "Enter 0 to switch or 1 to stick.".to_string())
            },
        )? == SWITCH_ANSWER;
        let final_box = if switched {
            remaining
                .iter()
                .copied()
                .find(|b| *b != guess)
                .unwrap_or(guess)
        } else {
            guess
        };

        self.publish_reveals(observer);

        let won = final_box == portal;
        observer.on_event(&GameEvent::Outcome {
            portal,
            final_box,
            switched,
            won,
        });

        Ok(RoundRecord { switched, won })
    }

    /// Play rounds until `limit` is reached or Rick declines another.
    ///
    /// # Errors
    ///
    /// Stops at the first round that cannot complete.
    pub fn run_session(
        &mut self,
        limit: RoundLimit,
        answers: &mut dyn AnswerProvider,
        observer: &mut dyn RoundObserver,
    ) -> Result<SessionSummary, GameError> {
        log::info!(
            "session start: {} with {} boxes, {limit:?}",
            self.strategy.name(),
            self.boxes
        );
        let mut played = 0;
        loop {
            if matches!(limit, RoundLimit::Fixed(rounds) if played >= rounds) {
                break;
            }
            self.play_round(&mut *answers, &mut *observer)?;
            played += 1;
            if limit == RoundLimit::UntilDeclined && !Self::another_round(&mut *answers)? {
                break;
            }
        }
        log::info!("session end after {played} rounds");
        Ok(self.summary())
    }

    // Input closing at this prompt ends the session like a "no".
    fn another_round(answers: &mut dyn AnswerProvider) -> Result<bool, GameError> {
        match answers.confirm("Do you want to play another round (y/n)? ") {
            Ok(more) => Ok(more),
            Err(AnswerError::Closed { .. }) => {
                log::info!("input closed at the continue prompt; ending session");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let exact_switched = self.strategy.exact_switch_probability(self.boxes);
        SessionSummary {
            strategy: self.strategy.name().to_string(),
            boxes: self.boxes,
            rounds: self.stats.total(),
            stats: self.stats,
            estimate_switched: self.stats.estimate_switched(),
            estimate_stayed: self.stats.estimate_stayed(),
            exact_switched,
            exact_stayed: 1.0 - exact_switched,
        }
    }
}
