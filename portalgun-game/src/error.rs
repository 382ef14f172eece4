use thiserror::Error;

use crate::answer::AnswerError;
use crate::fair::FairRandomError;

/// Failures that stop a round from completing.
///
/// A digest mismatch on reveal is not an error; it surfaces as a
/// [`crate::round::RevealStatus`].
#[derive(Debug, Error)]
pub enum GameError {
    #[error("the game needs more than two boxes (got {boxes})")]
    TooFewBoxes { boxes: u32 },
    #[error("fair draw produced {value}, outside [0, {range})")]
    DrawOutOfRange { value: u32, range: u32 },
    #[error(transparent)]
    Fair(#[from] FairRandomError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
}
