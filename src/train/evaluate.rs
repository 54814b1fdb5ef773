use serde::{Deserialize, Serialize};

use crate::data::sample::Sample;
use crate::errors::{MlpError, Result};
use crate::network::network::Network;
use crate::report::confusion::ConfusionMatrix;
use crate::train::backprop::target_for;

/// Misclassification rate and summed squared error of one network over one
/// sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub error_rate: f64,
    /// Summed over every sample and output unit; not divided by the sample
    /// count.
    pub squared_error: f64,
}

/// Fraction of samples whose decided class differs from their label.
pub fn error_rate(samples: &[Sample], network: &mut Network) -> Result<f64> {
    ensure_not_empty(samples)?;
    let mut errors = 0usize;
    for sample in samples {
        if network.forward(sample)? != sample.label() {
            errors += 1;
        }
    }
    Ok(errors as f64 / samples.len() as f64)
}

/// `Σ_samples Σ_k (t_k - y_k)^2` with bipolar one-vs-rest targets.
///
/// This is a running total, not a mean: it grows with the size of the set.
pub fn squared_error(samples: &[Sample], network: &mut Network) -> Result<f64> {
    ensure_not_empty(samples)?;
    let mut total = 0.0;
    for sample in samples {
        network.forward(sample)?;
        total += output_squared_error(network, sample.label());
    }
    Ok(total)
}

/// Both figures from a single pass over the set.
pub fn evaluate(samples: &[Sample], network: &mut Network) -> Result<Evaluation> {
    ensure_not_empty(samples)?;
    let mut errors = 0usize;
    let mut total = 0.0;
    for sample in samples {
        if network.forward(sample)? != sample.label() {
            errors += 1;
        }
        total += output_squared_error(network, sample.label());
    }
    Ok(Evaluation {
        error_rate: errors as f64 / samples.len() as f64,
        squared_error: total,
    })
}

/// Counts `(label, decided class)` pairs into a `classes`-wide matrix.
pub fn confusion_matrix(samples: &[Sample], network: &mut Network, classes: usize) -> Result<ConfusionMatrix> {
    let mut matrix = ConfusionMatrix::new(classes);
    for sample in samples {
        let predicted = network.forward(sample)?;
        matrix.record(sample.label(), predicted)?;
    }
    Ok(matrix)
}

fn output_squared_error(network: &mut Network, label: usize) -> f64 {
    network.output.iter_mut()
        .enumerate()
        .map(|(k, unit)| {
            unit.set_target(target_for(k, label));
            unit.squared_error()
        })
        .sum()
}

fn ensure_not_empty(samples: &[Sample]) -> Result<()> {
    if samples.is_empty() {
        return Err(MlpError::config("cannot evaluate on an empty sample set"));
    }
    Ok(())
}
