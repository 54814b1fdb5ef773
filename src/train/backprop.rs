use crate::data::sample::Sample;
use crate::errors::Result;
use crate::network::network::Network;

/// Bipolar one-vs-rest target for output unit `k`.
pub fn target_for(k: usize, label: usize) -> f64 {
    if k == label { 1.0 } else { -1.0 }
}

impl Network {
    /// One online training step: a forward pass over `sample` followed by a
    /// backpropagation update.  Returns the class decided by the forward pass.
    pub fn train_sample(&mut self, sample: &Sample, learning_rate: f64) -> Result<usize> {
        let predicted = self.forward(sample)?;
        self.backward(sample, learning_rate)?;
        Ok(predicted)
    }

    /// Applies one backpropagation update for `sample`.
    ///
    /// Relies on the activations recorded by a `forward` over the same sample
    /// immediately before.  All corrections are computed from the current
    /// weights and only then added, so the update is exact for this sample.
    fn backward(&mut self, sample: &Sample, learning_rate: f64) -> Result<()> {
        let z = self.hidden_outputs();
        let label = sample.label();

        // δk = (tk - yk) · f'(yk)
        let delta_k: Vec<f64> = self.output.iter_mut()
            .enumerate()
            .map(|(k, unit)| {
                let target = target_for(k, label);
                unit.set_target(target);
                (target - unit.last_activation()) * unit.derivative()
            })
            .collect();

        // δj = (Σk δk · wjk) · f'(zj), taken before any output weight moves
        let delta_j = self.hidden.iter()
            .enumerate()
            .map(|(j, unit)| -> Result<f64> {
                let mut delta_in = 0.0;
                for (out, dk) in self.output.iter().zip(&delta_k) {
                    delta_in += dk * out.weight(j)?;
                }
                Ok(delta_in * unit.derivative())
            })
            .collect::<Result<Vec<f64>>>()?;

        for (unit, dk) in self.output.iter_mut().zip(&delta_k) {
            for (j, zj) in z.iter().enumerate() {
                unit.update_weight(j, learning_rate * dk * zj)?;
            }
            unit.update_bias(learning_rate * dk);
        }

        for (unit, dj) in self.hidden.iter_mut().zip(&delta_j) {
            for (i, xi) in sample.features().iter().enumerate() {
                unit.update_weight(i, learning_rate * dj * xi)?;
            }
            unit.update_bias(learning_rate * dj);
        }
        Ok(())
    }
}
