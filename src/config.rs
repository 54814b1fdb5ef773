//! Run configuration stored as JSON.
//!
//! Every field has a default so a config file only needs the values it
//! changes; command-line flags are merged on top with `RunConfig::merge`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{MlpError, Result};
use crate::network::topology::WeightInit;
use crate::report::confusion::DEFAULT_CLASSES;
use crate::train::train_config::TrainConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Hidden layer width.
    pub hidden: usize,
    pub learning_rate: f64,
    /// Epochs between validation checkpoints.
    pub interval: usize,
    /// Consecutive non-improving checkpoints before stopping.
    pub max_failures: usize,
    pub init: WeightInit,
    /// Seed of the first run; later runs use `seed + run`.  Drawn from the
    /// OS when absent.
    pub seed: Option<u64>,
    /// Output units and confusion-matrix width.
    pub classes: usize,
    pub output_dir: PathBuf,
    /// Seconds between background snapshots; disabled when absent.
    pub snapshot_secs: Option<u64>,
    /// Independent training runs to perform.
    pub runs: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            hidden: 16,
            learning_rate: 0.01,
            interval: 10,
            max_failures: 5,
            init: WeightInit::Random,
            seed: None,
            classes: DEFAULT_CLASSES,
            output_dir: PathBuf::from("runs"),
            snapshot_secs: None,
            runs: 1,
        }
    }
}

/// Values given on the command line; `None` keeps the file's value.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub hidden: Option<usize>,
    pub learning_rate: Option<f64>,
    pub interval: Option<usize>,
    pub max_failures: Option<usize>,
    pub init: Option<WeightInit>,
    pub seed: Option<u64>,
    pub classes: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub snapshot_secs: Option<u64>,
    pub runs: Option<usize>,
}

impl RunConfig {
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Applies overrides; the second argument wins wherever it is set.
    pub fn merge(self, other: RunOverrides) -> RunConfig {
        RunConfig {
            hidden: other.hidden.unwrap_or(self.hidden),
            learning_rate: other.learning_rate.unwrap_or(self.learning_rate),
            interval: other.interval.unwrap_or(self.interval),
            max_failures: other.max_failures.unwrap_or(self.max_failures),
            init: other.init.unwrap_or(self.init),
            seed: other.seed.or(self.seed),
            classes: other.classes.unwrap_or(self.classes),
            output_dir: other.output_dir.unwrap_or(self.output_dir),
            snapshot_secs: other.snapshot_secs.or(self.snapshot_secs),
            runs: other.runs.unwrap_or(self.runs),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.hidden == 0 {
            return Err(MlpError::config("hidden layer needs at least one unit"));
        }
        if self.runs == 0 {
            return Err(MlpError::config("at least one run is required"));
        }
        if self.snapshot_secs == Some(0) {
            return Err(MlpError::config("snapshot interval must be at least one second"));
        }
        self.train_config().validate()
    }

    /// Trainer settings without channels, flags or publishing slot.
    pub fn train_config(&self) -> TrainConfig {
        let mut config = TrainConfig::new(self.learning_rate, self.interval, self.max_failures);
        config.classes = self.classes;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config: RunConfig = serde_json::from_str(r#"{"hidden": 40, "init": "zero"}"#).unwrap();
        assert_eq!(config.hidden, 40);
        assert_eq!(config.init, WeightInit::Zero);
        assert_eq!(config.interval, RunConfig::default().interval);
        assert_eq!(config.classes, 10);
    }

    #[test]
    fn overrides_win() {
        let merged = RunConfig::default().merge(RunOverrides {
            learning_rate: Some(0.5),
            seed: Some(9),
            ..RunOverrides::default()
        });
        assert_eq!(merged.learning_rate, 0.5);
        assert_eq!(merged.seed, Some(9));
        assert_eq!(merged.hidden, 16);
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let config = RunConfig { seed: Some(3), snapshot_secs: Some(30), ..RunConfig::default() };
        config.save_json(&path).unwrap();
        assert_eq!(RunConfig::load_json(&path).unwrap(), config);
    }

    #[test]
    fn validation_catches_bad_values() {
        assert!(RunConfig::default().validate().is_ok());
        assert!(RunConfig { hidden: 0, ..RunConfig::default() }.validate().is_err());
        assert!(RunConfig { interval: 0, ..RunConfig::default() }.validate().is_err());
        assert!(RunConfig { runs: 0, ..RunConfig::default() }.validate().is_err());
        assert!(RunConfig { learning_rate: -1.0, ..RunConfig::default() }.validate().is_err());
    }
}
