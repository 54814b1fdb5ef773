pub mod sample;
pub mod partition;
pub mod csv;

pub use sample::{FeatureCursor, Sample};
pub use partition::Partition;
pub use csv::{load_samples, parse_samples};
