//! Lifetime win/loss counters split by the stay/switch decision.
use serde::Serialize;

use crate::numbers::ratio;

/// Outcome of one finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundRecord {
    pub switched: bool,
    pub won: bool,
}

/// Monotonic counters; there is no reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    rounds_switched: u64,
    wins_switched: u64,
    rounds_stayed: u64,
    wins_stayed: u64,
}

impl Statistics {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rounds_switched: 0,
            wins_switched: 0,
            rounds_stayed: 0,
            wins_stayed: 0,
        }
    }

    pub fn record(&mut self, record: RoundRecord) {
        let (rounds, wins) = if record.switched {
            (&mut self.rounds_switched, &mut self.wins_switched)
        } else {
            (&mut self.rounds_stayed, &mut self.wins_stayed)
        };
        *rounds = rounds.saturating_add(1);
        if record.won {
            *wins = wins.saturating_add(1);
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.rounds_switched + self.rounds_stayed
    }

    #[must_use]
    pub const fn rounds_switched(&self) -> u64 {
        self.rounds_switched
    }

    #[must_use]
    pub const fn wins_switched(&self) -> u64 {
        self.wins_switched
    }

    #[must_use]
    pub const fn rounds_stayed(&self) -> u64 {
        self.rounds_stayed
    }

    #[must_use]
    pub const fn wins_stayed(&self) -> u64 {
        self.wins_stayed
    }

    /// Observed win rate after switching (0 when never switched).
    #[must_use]
    pub fn estimate_switched(&self) -> f64 {
        ratio(self.wins_switched, self.rounds_switched)
    }

    /// Observed win rate after staying (0 when never stayed).
    #[must_use]
    pub fn estimate_stayed(&self) -> f64 {
        ratio(self.wins_stayed, self.rounds_stayed)
    }
}

impl Extend<RoundRecord> for Statistics {
    fn extend<T: IntoIterator<Item = RoundRecord>>(&mut self, iter: T) {
        for record in iter {
            self.record(record);
        }
    }
}
