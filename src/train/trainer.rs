use tracing::{debug, info};

use crate::data::partition::Partition;
use crate::data::sample::Sample;
use crate::errors::{MlpError, Result};
use crate::network::network::Network;
use crate::report::confusion::ConfusionMatrix;
use crate::train::checkpoint::Checkpoint;
use crate::train::evaluate::{self, Evaluation};
use crate::train::train_config::TrainConfig;

/// Owns the three sample sets and the run configuration, and drives the
/// train → validate → decide → test cycle over a borrowed network.
pub struct Trainer {
    train: Vec<Sample>,
    validation: Vec<Sample>,
    test: Vec<Sample>,
    config: TrainConfig,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Network with the lowest validation error rate seen at any checkpoint.
    pub best: Network,
    pub epochs: usize,
    pub learning_rate: f64,
    pub best_validation_error: f64,
    pub checkpoints: Vec<Checkpoint>,
    /// The best network measured on the test set.
    pub test: Evaluation,
    pub confusion: ConfusionMatrix,
    /// True when a stop flag ended training instead of early stopping.
    pub interrupted: bool,
}

/// Mutable state of one `run`; dropped when it returns.
struct Session {
    epochs_completed: usize,
    best: Option<Network>,
    best_validation_error: f64,
    consecutive_failures: usize,
    checkpoints: Vec<Checkpoint>,
}

impl Session {
    fn new() -> Session {
        Session {
            epochs_completed: 0,
            best: None,
            best_validation_error: f64::INFINITY,
            consecutive_failures: 0,
            checkpoints: Vec::new(),
        }
    }
}

impl Trainer {
    /// # Errors
    /// `InvalidConfiguration` if the configuration is invalid or any sample
    /// set is empty.
    pub fn new(
        train: Vec<Sample>,
        validation: Vec<Sample>,
        test: Vec<Sample>,
        config: TrainConfig,
    ) -> Result<Trainer> {
        config.validate()?;
        let trainer = Trainer { train, validation, test, config };
        for partition in [Partition::Train, Partition::Validation, Partition::Test] {
            if trainer.samples(partition).is_empty() {
                return Err(MlpError::config(format!("the {} set is empty", partition)));
            }
        }
        Ok(trainer)
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn samples(&self, partition: Partition) -> &[Sample] {
        match partition {
            Partition::Train => &self.train,
            Partition::Validation => &self.validation,
            Partition::Test => &self.test,
        }
    }

    pub fn evaluate(&self, partition: Partition, network: &mut Network) -> Result<Evaluation> {
        evaluate::evaluate(self.samples(partition), network)
    }

    /// Confusion matrix of `network` over the test set.
    pub fn confusion_matrix(&self, network: &mut Network) -> Result<ConfusionMatrix> {
        evaluate::confusion_matrix(&self.test, network, self.config.classes)
    }

    /// Trains `network` in place until early stopping (or the stop flag)
    /// ends the loop, then measures the best checkpointed network on the
    /// test set.
    pub fn run(&self, network: &mut Network) -> Result<TrainingReport> {
        self.check_compatible(network)?;
        let mut session = Session::new();
        let mut interrupted = false;

        info!(
            "training {} network on {} samples (lr = {}, interval = {}, max failures = {})",
            network.topology(),
            self.train.len(),
            self.config.learning_rate,
            self.config.interval,
            self.config.max_failures
        );

        loop {
            for _ in 0..self.config.interval {
                if self.config.stop_requested() {
                    interrupted = true;
                    break;
                }
                self.run_epoch(network)?;
                session.epochs_completed += 1;
            }
            if interrupted {
                info!("stop requested after {} epochs", session.epochs_completed);
                break;
            }

            let checkpoint = self.checkpoint(network, &mut session)?;

            if let Some(ref tx) = self.config.progress_tx {
                // Training does not depend on anyone listening.
                let _ = tx.send(checkpoint);
            }
            if let Some(ref latest) = self.config.latest {
                latest.publish(network.clone());
            }

            if session.consecutive_failures >= self.config.max_failures {
                break;
            }
        }

        self.finalize(session, interrupted)
    }

    /// One pass over the training set in its stored order.
    fn run_epoch(&self, network: &mut Network) -> Result<()> {
        for sample in &self.train {
            network.train_sample(sample, self.config.learning_rate)?;
        }
        Ok(())
    }

    fn checkpoint(&self, network: &mut Network, session: &mut Session) -> Result<Checkpoint> {
        let validation = self.evaluate(Partition::Validation, network)?;
        let training = self.evaluate(Partition::Train, network)?;

        let improved = validation.error_rate < session.best_validation_error;
        if improved {
            session.best_validation_error = validation.error_rate;
            session.best = Some(network.clone());
            session.consecutive_failures = 0;
        } else {
            session.consecutive_failures += 1;
        }

        info!(
            "epoch {}: validation error {:.4} (squared {:.4}), training error {:.4} (squared {:.4}){}",
            session.epochs_completed,
            validation.error_rate,
            validation.squared_error,
            training.error_rate,
            training.squared_error,
            if improved { ", new best" } else { "" }
        );
        debug!(
            "{} consecutive non-improving checkpoints of {} allowed",
            session.consecutive_failures, self.config.max_failures
        );

        let checkpoint = Checkpoint {
            epoch: session.epochs_completed,
            validation,
            training,
            improved,
            consecutive_failures: session.consecutive_failures,
        };
        session.checkpoints.push(checkpoint);
        Ok(checkpoint)
    }

    fn finalize(&self, session: Session, interrupted: bool) -> Result<TrainingReport> {
        let mut best = session.best.ok_or(MlpError::Interrupted)?;
        let test = self.evaluate(Partition::Test, &mut best)?;
        let confusion = self.confusion_matrix(&mut best)?;

        info!(
            "best network {} after {} epochs: validation error {:.4}, test error {:.4} (squared {:.4})",
            best.fingerprint(),
            session.epochs_completed,
            session.best_validation_error,
            test.error_rate,
            test.squared_error
        );

        Ok(TrainingReport {
            best,
            epochs: session.epochs_completed,
            learning_rate: self.config.learning_rate,
            best_validation_error: session.best_validation_error,
            checkpoints: session.checkpoints,
            test,
            confusion,
            interrupted,
        })
    }

    /// Labels must address an output unit, and every output unit a
    /// confusion-matrix column.
    fn check_compatible(&self, network: &Network) -> Result<()> {
        let outputs = network.topology().outputs;
        if outputs > self.config.classes {
            return Err(MlpError::config(format!(
                "network has {} output units but the confusion matrix only {} classes",
                outputs, self.config.classes
            )));
        }
        for partition in [Partition::Train, Partition::Validation, Partition::Test] {
            if let Some(sample) = self.samples(partition).iter().find(|s| s.label() >= outputs) {
                return Err(MlpError::config(format!(
                    "{} set contains label {} but the network has only {} output units",
                    partition,
                    sample.label(),
                    outputs
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::topology::Topology;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    fn separable() -> Vec<Sample> {
        vec![
            Sample::new(vec![-1.0, -1.0], 0),
            Sample::new(vec![-0.8, -0.6], 0),
            Sample::new(vec![1.0, 1.0], 1),
            Sample::new(vec![0.8, 0.6], 1),
        ]
    }

    fn trainer(config: TrainConfig) -> Trainer {
        Trainer::new(separable(), separable(), separable(), config).unwrap()
    }

    #[test]
    fn stops_after_max_failures_without_improvement() {
        // A zero learning rate freezes the network, so only the first
        // checkpoint can improve.
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(0.0, 3, 4);
        config.progress_tx = Some(tx);
        let mut net = Network::random(Topology::new(2, 2, 2).unwrap(), &mut StdRng::seed_from_u64(1)).unwrap();

        let report = trainer(config).run(&mut net).unwrap();

        assert_eq!(report.checkpoints.len(), 1 + 4);
        assert_eq!(report.epochs, 3 * 5);
        assert!(report.checkpoints[0].improved);
        assert!(report.checkpoints[1..].iter().all(|c| !c.improved));
        assert_eq!(report.checkpoints.last().unwrap().consecutive_failures, 4);
        assert_eq!(rx.try_iter().count(), 5);
        assert!(!report.interrupted);
    }

    #[test]
    fn zero_max_failures_stops_at_first_checkpoint() {
        let mut net = Network::zeroed(Topology::new(2, 1, 2).unwrap()).unwrap();
        let report = trainer(TrainConfig::new(0.5, 2, 0)).run(&mut net).unwrap();
        assert_eq!(report.checkpoints.len(), 1);
        assert_eq!(report.epochs, 2);
    }

    #[test]
    fn best_network_is_isolated_from_later_training() {
        let mut net = Network::random(Topology::new(2, 2, 2).unwrap(), &mut StdRng::seed_from_u64(4)).unwrap();
        let report = trainer(TrainConfig::new(0.5, 10, 3)).run(&mut net).unwrap();
        // Three failing checkpoints followed the best one, so the live network
        // kept training after the clone was taken.
        assert_ne!(report.best, net);
        assert_eq!(report.confusion.total(), 4);
    }

    #[test]
    fn learns_linearly_separable_points() {
        let mut net = Network::random(Topology::new(2, 2, 2).unwrap(), &mut StdRng::seed_from_u64(42)).unwrap();
        let trainer = trainer(TrainConfig::new(0.5, 10, 3));
        let mut report = trainer.run(&mut net).unwrap();

        assert_eq!(report.best_validation_error, 0.0);
        assert_eq!(trainer.evaluate(Partition::Train, &mut report.best).unwrap().error_rate, 0.0);
        assert_eq!(report.test.error_rate, 0.0);
        assert_eq!(report.confusion.correct(), 4);
    }

    #[test]
    fn publishes_clones_at_checkpoints() {
        let latest = Arc::new(crate::snapshot::latest::LatestNetwork::new());
        let mut config = TrainConfig::new(0.1, 1, 1);
        config.latest = Some(latest.clone());
        let mut net = Network::random(Topology::new(2, 2, 2).unwrap(), &mut StdRng::seed_from_u64(9)).unwrap();
        trainer(config).run(&mut net).unwrap();
        assert_eq!(*latest.get().unwrap(), net);
    }

    #[test]
    fn stop_flag_before_first_checkpoint_is_an_interruption() {
        let mut config = TrainConfig::new(0.1, 5, 2);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));
        let mut net = Network::zeroed(Topology::new(2, 1, 2).unwrap()).unwrap();
        let err = trainer(config).run(&mut net).unwrap_err();
        assert!(matches!(err, MlpError::Interrupted));
    }

    #[test]
    fn stop_flag_after_a_checkpoint_finalizes_the_best_network() {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<Checkpoint>();
        let mut config = TrainConfig::new(0.1, 1, usize::MAX);
        config.progress_tx = Some(tx);
        config.stop_flag = Some(stop.clone());

        let listener = std::thread::spawn(move || {
            let first = rx.recv().unwrap();
            stop.store(true, std::sync::atomic::Ordering::Relaxed);
            first
        });

        let mut net = Network::random(Topology::new(2, 2, 2).unwrap(), &mut StdRng::seed_from_u64(5)).unwrap();
        let report = trainer(config).run(&mut net).unwrap();
        let first = listener.join().unwrap();

        assert!(report.interrupted);
        assert!(!report.checkpoints.is_empty());
        assert_eq!(report.checkpoints[0].epoch, first.epoch);
        assert_eq!(report.epochs, report.checkpoints.last().unwrap().epoch);
        assert_eq!(report.confusion.total(), 4);
    }

    #[test]
    fn rejects_empty_sets_and_bad_config() {
        assert!(Trainer::new(separable(), vec![], separable(), TrainConfig::new(0.1, 1, 1)).is_err());
        assert!(Trainer::new(separable(), separable(), vec![], TrainConfig::new(0.1, 1, 1)).is_err());
        assert!(Trainer::new(separable(), separable(), separable(), TrainConfig::new(0.1, 0, 1)).is_err());
        assert!(Trainer::new(separable(), separable(), separable(), TrainConfig::new(f64::NAN, 1, 1)).is_err());
    }

    #[test]
    fn rejects_labels_without_output_unit() {
        let mut net = Network::zeroed(Topology::new(2, 1, 1).unwrap()).unwrap();
        let err = trainer(TrainConfig::new(0.1, 1, 1)).run(&mut net).unwrap_err();
        assert!(matches!(err, MlpError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_feature_width_mismatch() {
        let mut net = Network::zeroed(Topology::new(3, 1, 2).unwrap()).unwrap();
        let err = trainer(TrainConfig::new(0.1, 1, 1)).run(&mut net).unwrap_err();
        assert!(matches!(err, MlpError::Dimension { expected: 3, actual: 2 }));
    }
}
