pub mod artifacts;
pub mod confusion;
pub mod metrics_log;
pub mod run_label;
pub mod summary;

pub use artifacts::{persist, PersistSummary};
pub use confusion::{ConfusionMatrix, DEFAULT_CLASSES};
pub use metrics_log::{MetricsLog, MetricsRow};
pub use run_label::RunLabel;
pub use summary::RunSummary;
