use serde::{Deserialize, Serialize};

use crate::errors::{MlpError, Result};

/// Layer widths of a two-layer perceptron.
///
/// Fields:
/// - `inputs`  : features per sample (weights per hidden unit)
/// - `hidden`  : hidden units (weights per output unit)
/// - `outputs` : output units, one per class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl Topology {
    pub fn new(inputs: usize, hidden: usize, outputs: usize) -> Result<Topology> {
        let topology = Topology { inputs, hidden, outputs };
        topology.validate()?;
        Ok(topology)
    }

    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 || self.hidden == 0 || self.outputs == 0 {
            return Err(MlpError::config(format!(
                "every layer needs at least one unit, got {}-{}-{}",
                self.inputs, self.hidden, self.outputs
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.inputs, self.hidden, self.outputs)
    }
}

/// How a fresh network's parameters are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform over (-1, 1).
    #[default]
    Random,
    Zero,
}
