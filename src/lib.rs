pub mod errors;
pub mod activation;
pub mod data;
pub mod layers;
pub mod network;
pub mod train;
pub mod report;
pub mod snapshot;
pub mod config;
pub mod pipeline;
pub mod logging;

// Convenience re-exports
pub use errors::{MlpError, Result};
pub use activation::activation::BipolarSigmoid;
pub use data::{load_samples, parse_samples, FeatureCursor, Partition, Sample};
pub use layers::unit::Unit;
pub use network::{Network, Topology, WeightInit};
pub use train::{Checkpoint, Evaluation, TrainConfig, Trainer, TrainingReport};
pub use report::{ConfusionMatrix, MetricsLog, RunLabel, RunSummary};
pub use snapshot::{LatestNetwork, Snapshotter};
pub use config::{RunConfig, RunOverrides};
pub use pipeline::{train_runs, PipelineOutcome, RunOutcome};
pub use logging::init_logging;
