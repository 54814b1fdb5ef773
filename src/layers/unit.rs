use rand::Rng;

use crate::activation::activation::BipolarSigmoid;
use crate::data::sample::FeatureCursor;
use crate::errors::{MlpError, Result};

/// A single neuron: one weight per input from the previous layer, a bias and
/// the bipolar-sigmoid activation.
///
/// `last_activation` is overwritten by every `forward` call; `last_target` is
/// assigned by the caller before `squared_error` is read and only means
/// something for output units.  Equality only looks at weights and bias.
#[derive(Debug, Clone)]
pub struct Unit {
    pub(crate) weights: Vec<f64>,
    pub(crate) bias: f64,
    last_activation: f64,
    last_target: f64,
}

impl Unit {
    pub fn zeroed(input_size: usize) -> Unit {
        Unit::from_parts(vec![0.0; input_size], 0.0)
    }

    /// Weights and bias drawn uniformly from (-1, 1).
    pub fn random<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> Unit {
        let weights = (0..input_size).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();
        let bias = rng.gen::<f64>() * 2.0 - 1.0;
        Unit::from_parts(weights, bias)
    }

    pub fn from_parts(weights: Vec<f64>, bias: f64) -> Unit {
        Unit {
            weights,
            bias,
            last_activation: 0.0,
            last_target: 0.0,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight(&self, index: usize) -> Result<f64> {
        self.weights.get(index).copied().ok_or(MlpError::Dimension {
            expected: self.weights.len(),
            actual: index + 1,
        })
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// `sum_i inputs[i] * weights[i] + bias`, read through a cursor.
    ///
    /// The cursor is reset first, and must yield exactly one value per weight.
    pub fn net_input(&self, cursor: &mut FeatureCursor<'_>) -> Result<f64> {
        if cursor.width() != self.weights.len() {
            return Err(MlpError::Dimension {
                expected: self.weights.len(),
                actual: cursor.width(),
            });
        }
        cursor.reset();
        let mut sum = 0.0;
        let mut index = 0;
        while cursor.has_next() {
            let value = cursor.next().unwrap_or_default();
            let weight = self.weights.get(index).ok_or(MlpError::Dimension {
                expected: self.weights.len(),
                actual: index + 1,
            })?;
            sum += value * weight;
            index += 1;
        }
        Ok(sum + self.bias)
    }

    /// Activation for `inputs` without recording it.
    pub fn activate(&self, inputs: &[f64]) -> Result<f64> {
        let net = self.net_input(&mut FeatureCursor::new(inputs))?;
        Ok(BipolarSigmoid::function(net))
    }

    /// Computes, records and returns the activation for `inputs`.
    pub fn forward(&mut self, inputs: &[f64]) -> Result<f64> {
        self.forward_cursor(&mut FeatureCursor::new(inputs))
    }

    pub fn forward_cursor(&mut self, cursor: &mut FeatureCursor<'_>) -> Result<f64> {
        let net = self.net_input(cursor)?;
        self.last_activation = BipolarSigmoid::function(net);
        Ok(self.last_activation)
    }

    pub fn last_activation(&self) -> f64 {
        self.last_activation
    }

    /// Activation slope at the last forward input; only valid right after
    /// `forward`.
    pub fn derivative(&self) -> f64 {
        BipolarSigmoid::derivative_from_output(self.last_activation)
    }

    pub fn set_target(&mut self, target: f64) {
        self.last_target = target;
    }

    pub fn last_target(&self) -> f64 {
        self.last_target
    }

    /// `(target - activation)^2` for the last forward pass.
    pub fn squared_error(&self) -> f64 {
        (self.last_target - self.last_activation).powi(2)
    }

    pub fn update_weight(&mut self, index: usize, delta: f64) -> Result<()> {
        let expected = self.weights.len();
        let weight = self.weights.get_mut(index).ok_or(MlpError::Dimension {
            expected,
            actual: index + 1,
        })?;
        *weight += delta;
        Ok(())
    }

    pub fn update_bias(&mut self, delta: f64) {
        self.bias += delta;
    }

    /// Product of the bias and every weight.  A cheap fingerprint for labelling
    /// artifacts; collisions are expected (any zero weight gives 0).
    pub fn fingerprint(&self) -> f64 {
        self.weights.iter().fold(self.bias, |acc, w| acc * w)
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.weights == other.weights && self.bias == other.bias
    }
}
