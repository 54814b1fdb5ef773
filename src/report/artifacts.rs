use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::Result;
use crate::report::metrics_log::{MetricsLog, MetricsRow};
use crate::report::run_label::RunLabel;
use crate::train::trainer::TrainingReport;

/// What `persist` wrote, and which secondary artifacts it could not write.
#[derive(Debug, Clone, Default)]
pub struct PersistSummary {
    pub written: Vec<PathBuf>,
    pub failures: Vec<String>,
    pub network: PathBuf,
}

/// Builds the validation, training and test logs of a run.
pub fn metrics_logs(report: &TrainingReport, label: &RunLabel) -> [MetricsLog; 3] {
    let mut validation = MetricsLog::new(label.stem("validation_log"));
    let mut training = MetricsLog::new(label.stem("training_log"));
    let mut test = MetricsLog::new(label.stem("test_log"));

    for checkpoint in &report.checkpoints {
        validation.push(MetricsRow {
            epoch: checkpoint.epoch,
            error_rate: checkpoint.validation.error_rate,
            squared_error: checkpoint.validation.squared_error,
            learning_rate: report.learning_rate,
            network_id: None,
        });
        training.push(MetricsRow {
            epoch: checkpoint.epoch,
            error_rate: checkpoint.training.error_rate,
            squared_error: checkpoint.training.squared_error,
            learning_rate: report.learning_rate,
            network_id: None,
        });
    }
    test.push(MetricsRow {
        epoch: report.epochs,
        error_rate: report.test.error_rate,
        squared_error: report.test.squared_error,
        learning_rate: report.learning_rate,
        network_id: Some(report.best.fingerprint()),
    });

    [validation, training, test]
}

/// Writes the metrics logs, the confusion matrix and the best network into
/// `dir`.
///
/// Logs and the confusion matrix are secondary: a failure is logged and
/// recorded in the summary.  Failing to save the best network is returned as
/// an error.
pub fn persist<P: AsRef<Path>>(report: &TrainingReport, label: &RunLabel, dir: P) -> Result<PersistSummary> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut summary = PersistSummary::default();

    for log in metrics_logs(report, label) {
        match log.write_to(dir) {
            Ok(path) => summary.written.push(path),
            Err(e) => {
                warn!("could not write {}: {}", log.name(), e);
                summary.failures.push(format!("{}: {}", log.name(), e));
            }
        }
    }

    let matrix_path = dir.join(format!("{}.csv", label.stem("confusion_matrix")));
    match report.confusion.save(&matrix_path) {
        Ok(()) => summary.written.push(matrix_path),
        Err(e) => {
            warn!("could not write {}: {}", matrix_path.display(), e);
            summary.failures.push(format!("{}: {}", matrix_path.display(), e));
        }
    }

    let network_path = dir.join(format!("{}.csv", label.stem("best_network")));
    report.best.save(&network_path)?;
    info!("best network saved to {}", network_path.display());
    summary.written.push(network_path.clone());
    summary.network = network_path;

    Ok(summary)
}
