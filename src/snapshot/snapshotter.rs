use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Local;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::snapshot::latest::LatestNetwork;

/// Background thread that periodically writes the latest published network
/// to a timestamped file.
///
/// It only reads immutable clones from a `LatestNetwork` slot.  `stop` (or
/// dropping the handle) wakes the thread immediately and joins it.
pub struct Snapshotter {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<Vec<PathBuf>>>,
}

impl Snapshotter {
    pub fn spawn(latest: Arc<LatestNetwork>, dir: PathBuf, interval: Duration) -> Snapshotter {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            let mut written = Vec::new();
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // A message or a dropped sender both mean stop.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                match write_snapshot(&latest, &dir) {
                    Ok(Some(path)) => {
                        debug!("snapshot written to {}", path.display());
                        written.push(path);
                    }
                    Ok(None) => debug!("no network published yet, skipping snapshot"),
                    Err(e) => warn!("snapshot failed: {}", e),
                }
            }
            written
        });
        Snapshotter { stop_tx: Some(stop_tx), handle: Some(handle) }
    }

    /// Signals the thread and waits for it; returns the files it wrote.
    pub fn stop(mut self) -> Vec<PathBuf> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Vec<PathBuf> {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }
}

impl Drop for Snapshotter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Writes the current network to `<dir>/network_at_<timestamp>.csv`, or
/// returns `None` when nothing has been published yet.
pub fn write_snapshot(latest: &LatestNetwork, dir: &Path) -> Result<Option<PathBuf>> {
    let Some(network) = latest.get() else {
        return Ok(None);
    };
    std::fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S%.3f");
    let path = dir.join(format!("network_at_{}.csv", stamp));
    network.save(&path)?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::network::Network;
    use crate::network::topology::Topology;
    use std::time::Instant;

    #[test]
    fn skips_until_something_is_published() {
        let dir = tempfile::tempdir().unwrap();
        let latest = LatestNetwork::new();
        assert!(write_snapshot(&latest, dir.path()).unwrap().is_none());

        let net = Network::zeroed(Topology::new(2, 2, 2).unwrap()).unwrap();
        latest.publish(net.clone());
        let path = write_snapshot(&latest, dir.path()).unwrap().unwrap();
        assert_eq!(Network::load(path).unwrap(), net);
    }

    #[test]
    fn writes_periodically_and_stops_promptly() {
        let dir = tempfile::tempdir().unwrap();
        let latest = Arc::new(LatestNetwork::new());
        latest.publish(Network::zeroed(Topology::new(1, 1, 1).unwrap()).unwrap());

        let snapshotter = Snapshotter::spawn(latest, dir.path().to_path_buf(), Duration::from_millis(20));
        thread::sleep(Duration::from_millis(150));
        let started = Instant::now();
        let written = snapshotter.stop();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(!written.is_empty());
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn long_interval_does_not_block_stop() {
        let dir = tempfile::tempdir().unwrap();
        let snapshotter = Snapshotter::spawn(
            Arc::new(LatestNetwork::new()),
            dir.path().to_path_buf(),
            Duration::from_secs(3600),
        );
        let started = Instant::now();
        assert!(snapshotter.stop().is_empty());
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
