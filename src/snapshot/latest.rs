use std::sync::{Arc, RwLock};

use crate::network::network::Network;

/// Single-slot holder for the most recently published network.
///
/// The trainer publishes clones; readers get an `Arc` to an immutable copy and
/// never observe a network halfway through an update.
#[derive(Debug, Default)]
pub struct LatestNetwork {
    slot: RwLock<Option<Arc<Network>>>,
}

impl LatestNetwork {
    pub fn new() -> LatestNetwork {
        LatestNetwork::default()
    }

    pub fn publish(&self, network: Network) {
        let network = Arc::new(network);
        match self.slot.write() {
            Ok(mut guard) => *guard = Some(network),
            Err(poisoned) => *poisoned.into_inner() = Some(network),
        }
    }

    pub fn get(&self) -> Option<Arc<Network>> {
        match self.slot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
