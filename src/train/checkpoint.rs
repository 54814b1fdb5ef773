use serde::{Deserialize, Serialize};

use crate::train::evaluate::Evaluation;

/// What the trainer measured at the end of one block of epochs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Epochs completed so far (a multiple of the interval).
    pub epoch: usize,
    pub validation: Evaluation,
    pub training: Evaluation,
    /// Whether this checkpoint became the new best network.
    pub improved: bool,
    pub consecutive_failures: usize,
}
