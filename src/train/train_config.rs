use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use crate::errors::{MlpError, Result};
use crate::report::confusion::DEFAULT_CLASSES;
use crate::snapshot::latest::LatestNetwork;
use crate::train::checkpoint::Checkpoint;

/// Configuration for a `Trainer` run.
///
/// # Fields
/// - `learning_rate` : step size of every backpropagation correction
/// - `interval`      : epochs between two validation checkpoints
/// - `max_failures`  : consecutive non-improving checkpoints tolerated before
///                     training stops
/// - `classes`       : width of the final confusion matrix
/// - `progress_tx`   : optional channel sender; one `Checkpoint` is sent per
///                     checkpoint.  A dropped receiver is ignored.
/// - `stop_flag`     : optional atomic flag, checked before every epoch; once
///                     set the run finalizes with the best network found so
///                     far, or fails with `Interrupted` if there is none
/// - `latest`        : optional slot that receives a clone of the live
///                     network at every checkpoint
pub struct TrainConfig {
    pub learning_rate: f64,
    pub interval: usize,
    pub max_failures: usize,
    pub classes: usize,
    pub progress_tx: Option<mpsc::Sender<Checkpoint>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
    pub latest: Option<Arc<LatestNetwork>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel, stop flag or
    /// publishing slot.
    pub fn new(learning_rate: f64, interval: usize, max_failures: usize) -> Self {
        TrainConfig {
            learning_rate,
            interval,
            max_failures,
            classes: DEFAULT_CLASSES,
            progress_tx: None,
            stop_flag: None,
            latest: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(MlpError::config(format!(
                "learning rate must be a finite non-negative number, got {}",
                self.learning_rate
            )));
        }
        if self.interval == 0 {
            return Err(MlpError::config("checkpoint interval must be at least one epoch"));
        }
        if self.classes == 0 {
            return Err(MlpError::config("confusion matrix needs at least one class"));
        }
        Ok(())
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_flag
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}
