//! Portal Gun Game Engine
//!
//! Platform-agnostic core for the Rick and Morty take on the Monty Hall game.
//! Morty hides the portal gun through a commit-reveal fair draw, prunes the
//! decoy boxes according to a pluggable strategy, and reveals every
//! commitment at the end of the round so Rick can check nothing was swapped.
//! This crate has no terminal or platform dependencies; answers arrive through
//! [`AnswerProvider`] and progress leaves through [`RoundObserver`].

pub mod answer;
pub mod error;
pub mod fair;
pub mod numbers;
pub mod registry;
pub mod round;
pub mod stats;
pub mod strategy;

// Re-export commonly used types
pub use answer::{AnswerError, AnswerProvider, LineAnswers, Validator};
pub use error::GameError;
pub use fair::{
    Commitment, Digest, FairRandomError, KeyMaterial, combine, create_commitment, keyed_digest,
    verify,
};
pub use registry::{
    BUILTINS, BuiltinStrategy, DescriptorLoader, StrategyLoadError, StrategyLoader,
    StrategyRegistry,
};
pub use round::{
    GameEvent, PendingReveal, Reveal, RevealLedger, RevealStatus, RoundLimit, RoundObserver,
    RoundOrchestrator, SessionSummary,
};
pub use stats::{RoundRecord, Statistics};
pub use strategy::{
    ClassicMorty, DescribedMorty, FairDraws, KeepRule, LazyMorty, Remaining, RoundFacts, Strategy,
    StrategyDescriptor,
};
