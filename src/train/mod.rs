pub mod backprop;
pub mod checkpoint;
pub mod evaluate;
pub mod train_config;
pub mod trainer;

pub use backprop::target_for;
pub use checkpoint::Checkpoint;
pub use evaluate::{confusion_matrix, error_rate, evaluate, squared_error, Evaluation};
pub use train_config::TrainConfig;
pub use trainer::{Trainer, TrainingReport};
