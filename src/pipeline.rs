//! End-to-end training runs: build a network, train it, persist what it
//! produced, and summarize repeated runs.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::data::sample::Sample;
use crate::errors::{MlpError, Result};
use crate::network::network::Network;
use crate::network::topology::Topology;
use crate::report::artifacts::{persist, PersistSummary};
use crate::report::run_label::RunLabel;
use crate::report::summary::RunSummary;
use crate::snapshot::latest::LatestNetwork;
use crate::snapshot::snapshotter::Snapshotter;
use crate::train::trainer::{Trainer, TrainingReport};

/// One finished run and where its artifacts went.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub seed: u64,
    pub report: TrainingReport,
    pub files: PersistSummary,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub runs: Vec<RunOutcome>,
    pub summary: RunSummary,
    /// Written only for repeated runs, and only if the write succeeded.
    pub summary_path: Option<PathBuf>,
}

/// Trains `config.runs` independent networks on the given partitions.
///
/// The partitions are cloned into each run's trainer.  `stop_flag`, when
/// given, is shared by every run.
pub fn train_runs(
    config: &RunConfig,
    train: &[Sample],
    validation: &[Sample],
    test: &[Sample],
    stop_flag: Option<Arc<AtomicBool>>,
) -> Result<PipelineOutcome> {
    config.validate()?;
    let inputs = train
        .first()
        .map(Sample::len)
        .ok_or_else(|| MlpError::config("the training set is empty"))?;
    let topology = Topology::new(inputs, config.hidden, config.classes)?;
    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let started = RunLabel::new(config.hidden, config.learning_rate);

    let mut runs = Vec::with_capacity(config.runs);
    let mut summary = RunSummary::new();

    for run in 0..config.runs {
        let seed = base_seed.wrapping_add(run as u64);
        let label = if config.runs > 1 { started.clone().with_run(run + 1) } else { started.clone() };
        info!("run {}/{} with seed {}", run + 1, config.runs, seed);

        let latest = Arc::new(LatestNetwork::new());
        let mut train_config = config.train_config();
        train_config.stop_flag = stop_flag.clone();
        train_config.latest = Some(latest.clone());

        let mut network = Network::new(topology, config.init, &mut StdRng::seed_from_u64(seed))?;
        latest.publish(network.clone());

        let snapshotter = config.snapshot_secs.map(|secs| {
            Snapshotter::spawn(
                latest.clone(),
                config.output_dir.join("snapshots"),
                Duration::from_secs(secs),
            )
        });

        let trainer = Trainer::new(train.to_vec(), validation.to_vec(), test.to_vec(), train_config)?;
        let result = trainer.run(&mut network);
        if let Some(snapshotter) = snapshotter {
            snapshotter.stop();
        }
        let report = result?;

        let files = persist(&report, &label, &config.output_dir)?;
        summary.add(&report)?;
        runs.push(RunOutcome { seed, report, files });
    }

    let summary_path = if config.runs > 1 {
        save_summary(&summary, &started, &config.output_dir)
    } else {
        None
    };

    Ok(PipelineOutcome { runs, summary, summary_path })
}

/// Writes the multi-run summary next to the run artifacts.  A failure is only
/// logged: every run has already persisted its own files.
fn save_summary(summary: &RunSummary, label: &RunLabel, dir: &Path) -> Option<PathBuf> {
    let path = dir.join(format!("{}.csv", label.stem("summary")));
    match summary.save(&path) {
        Ok(()) => {
            info!("summary of {} runs saved to {}", summary.runs(), path.display());
            Some(path)
        }
        Err(e) => {
            warn!("could not write {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let label = RunLabel::new(3, 0.2);
        std::fs::create_dir(dir.path().join(format!("{}.csv", label.stem("summary")))).unwrap();
        assert_eq!(save_summary(&RunSummary::new(), &label, dir.path()), None);
    }

    #[test]
    fn summary_is_written_to_the_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let label = RunLabel::new(3, 0.2);
        let path = save_summary(&RunSummary::new(), &label, dir.path()).unwrap();
        assert!(path.is_file());
        assert!(path.starts_with(dir.path()));
    }
}
