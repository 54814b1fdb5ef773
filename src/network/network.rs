use std::io::Write;
use std::path::Path;

use rand::Rng;

use crate::data::sample::{FeatureCursor, Sample};
use crate::errors::{MlpError, Result};
use crate::layers::unit::Unit;
use crate::network::topology::{Topology, WeightInit};

/// A hidden layer followed by an output layer, both made of bipolar-sigmoid
/// units.  Every hidden unit has one weight per input feature; every output
/// unit has one weight per hidden unit.
///
/// `Clone` is a full structural deep copy: the clone shares no state with the
/// original, so training can keep mutating one while the other is kept as a
/// checkpoint.  It is equivalent to parsing the network's text form back.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) hidden: Vec<Unit>,
    pub(crate) output: Vec<Unit>,
}

impl Network {
    /// Builds a network with fresh parameters.
    pub fn new<R: Rng + ?Sized>(topology: Topology, init: WeightInit, rng: &mut R) -> Result<Network> {
        match init {
            WeightInit::Random => Network::random(topology, rng),
            WeightInit::Zero => Network::zeroed(topology),
        }
    }

    pub fn random<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Result<Network> {
        topology.validate()?;
        let hidden = (0..topology.hidden).map(|_| Unit::random(topology.inputs, rng)).collect();
        let output = (0..topology.outputs).map(|_| Unit::random(topology.hidden, rng)).collect();
        Ok(Network { hidden, output })
    }

    pub fn zeroed(topology: Topology) -> Result<Network> {
        topology.validate()?;
        Ok(Network {
            hidden: vec![Unit::zeroed(topology.inputs); topology.hidden],
            output: vec![Unit::zeroed(topology.hidden); topology.outputs],
        })
    }

    /// Assembles a network from already built layers, checking that their
    /// widths line up.
    pub fn from_layers(hidden: Vec<Unit>, output: Vec<Unit>) -> Result<Network> {
        let inputs = hidden.first().map(Unit::input_size).unwrap_or(0);
        let topology = Topology::new(inputs, hidden.len(), output.len())?;
        if let Some(unit) = hidden.iter().find(|u| u.input_size() != topology.inputs) {
            return Err(MlpError::Dimension { expected: topology.inputs, actual: unit.input_size() });
        }
        if let Some(unit) = output.iter().find(|u| u.input_size() != topology.hidden) {
            return Err(MlpError::Dimension { expected: topology.hidden, actual: unit.input_size() });
        }
        Ok(Network { hidden, output })
    }

    pub fn topology(&self) -> Topology {
        Topology {
            inputs: self.hidden[0].input_size(),
            hidden: self.hidden.len(),
            outputs: self.output.len(),
        }
    }

    pub fn hidden_units(&self) -> &[Unit] {
        &self.hidden
    }

    pub fn output_units(&self) -> &[Unit] {
        &self.output
    }

    /// Forward pass over a sample; records every unit's activation and
    /// returns the decided class.
    pub fn forward(&mut self, sample: &Sample) -> Result<usize> {
        self.forward_cursor(&mut sample.cursor())
    }

    pub fn forward_features(&mut self, features: &[f64]) -> Result<usize> {
        self.forward_cursor(&mut FeatureCursor::new(features))
    }

    fn forward_cursor(&mut self, cursor: &mut FeatureCursor<'_>) -> Result<usize> {
        let z = self.hidden.iter_mut()
            .map(|unit| unit.forward_cursor(cursor))
            .collect::<Result<Vec<f64>>>()?;
        let y = self.output.iter_mut()
            .map(|unit| unit.forward(&z))
            .collect::<Result<Vec<f64>>>()?;
        Ok(decide(&y))
    }

    /// Hidden activations recorded by the last forward pass.
    pub fn hidden_outputs(&self) -> Vec<f64> {
        self.hidden.iter().map(Unit::last_activation).collect()
    }

    /// Output activations recorded by the last forward pass.
    pub fn outputs(&self) -> Vec<f64> {
        self.output.iter().map(Unit::last_activation).collect()
    }

    /// Same result as `forward`, without recording activations.  Safe to call
    /// on a shared network.
    pub fn classify(&self, features: &[f64]) -> Result<(usize, Vec<f64>)> {
        let z = self.hidden.iter()
            .map(|unit| unit.activate(features))
            .collect::<Result<Vec<f64>>>()?;
        let y = self.output.iter()
            .map(|unit| unit.activate(&z))
            .collect::<Result<Vec<f64>>>()?;
        Ok((decide(&y), y))
    }

    /// Combines unit fingerprints: product over hidden units, then the sum
    /// with every output unit's.  Only used to label artifacts.
    pub fn fingerprint(&self) -> String {
        let hidden = self.hidden.iter().fold(1.0, |acc, u| acc * u.fingerprint());
        let id = self.output.iter().fold(hidden, |acc, u| acc + u.fingerprint());
        format!("{:e}", id)
    }

    /// Writes the text form to `path`, preceded by an `# id:` comment line.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        writeln!(writer, "# id: {}", self.fingerprint())?;
        write!(writer, "{}", self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a network previously written by `save` (or any text form).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }
}

/// Index of the strictly largest output; the lowest index wins ties.
pub fn decide(outputs: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in outputs.iter().enumerate().skip(1) {
        if value > outputs[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn topology(i: usize, h: usize, o: usize) -> Topology {
        Topology::new(i, h, o).unwrap()
    }

    #[test]
    fn zeroed_network_picks_first_output() {
        let mut net = Network::zeroed(topology(2, 1, 2)).unwrap();
        let class = net.forward(&Sample::new(vec![0.3, -4.0], 1)).unwrap();
        assert_eq!(net.outputs(), vec![0.0, 0.0]);
        assert_eq!(class, 0);
    }

    #[test]
    fn decide_prefers_lowest_index_on_ties() {
        assert_eq!(decide(&[0.1, 0.9, 0.9]), 1);
        assert_eq!(decide(&[-0.5, -0.5]), 0);
        assert_eq!(decide(&[-0.5, -0.2, 0.7]), 2);
    }

    #[test]
    fn forward_rejects_wrong_feature_count() {
        let mut net = Network::zeroed(topology(3, 2, 2)).unwrap();
        let err = net.forward(&Sample::new(vec![1.0], 0)).unwrap_err();
        assert!(matches!(err, MlpError::Dimension { expected: 3, actual: 1 }));
    }

    #[test]
    fn classify_agrees_with_forward() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut net = Network::random(topology(4, 3, 5), &mut rng).unwrap();
        for k in 0..20 {
            let features: Vec<f64> = (0..4).map(|j| ((k * 4 + j) as f64 * 0.37).sin()).collect();
            let (class, outputs) = net.classify(&features).unwrap();
            assert_eq!(net.forward_features(&features).unwrap(), class);
            assert_eq!(net.outputs(), outputs);
        }
    }

    #[test]
    fn clone_is_independent() {
        let mut net = Network::random(topology(2, 2, 2), &mut StdRng::seed_from_u64(3)).unwrap();
        let snapshot = net.clone();
        net.output[0].update_weight(0, 1.0).unwrap();
        assert_ne!(net.output[0].weights(), snapshot.output[0].weights());
    }

    #[test]
    fn from_layers_checks_widths() {
        let err = Network::from_layers(
            vec![Unit::zeroed(2), Unit::zeroed(2)],
            vec![Unit::zeroed(3)],
        ).unwrap_err();
        assert!(matches!(err, MlpError::Dimension { expected: 2, actual: 3 }));
        assert!(Network::from_layers(vec![], vec![Unit::zeroed(0)]).is_err());
    }

    #[test]
    fn rejects_empty_layers() {
        let err = Network::zeroed(Topology { inputs: 2, hidden: 0, outputs: 2 }).unwrap_err();
        assert!(matches!(err, MlpError::InvalidConfiguration { .. }));
    }

    #[test]
    fn save_and_load_keep_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.csv");
        let mut net = Network::random(topology(3, 4, 3), &mut StdRng::seed_from_u64(5)).unwrap();
        net.save(&path).unwrap();
        let mut loaded = Network::load(&path).unwrap();
        assert_eq!(loaded, net);
        let sample = Sample::new(vec![0.2, -0.7, 1.5], 2);
        assert_eq!(loaded.forward(&sample).unwrap(), net.forward(&sample).unwrap());
        assert_eq!(loaded.fingerprint(), net.fingerprint());
    }
}
