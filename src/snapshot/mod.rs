pub mod latest;
pub mod snapshotter;

pub use latest::LatestNetwork;
pub use snapshotter::{write_snapshot, Snapshotter};
