use chrono::{DateTime, Local};

/// Names the files of one training run after its hidden width, learning
/// rate and start time.
#[derive(Debug, Clone)]
pub struct RunLabel {
    pub hidden: usize,
    pub learning_rate: f64,
    pub started: DateTime<Local>,
    /// Set when several runs share a start time.
    pub run: Option<usize>,
}

impl RunLabel {
    pub fn new(hidden: usize, learning_rate: f64) -> RunLabel {
        RunLabel { hidden, learning_rate, started: Local::now(), run: None }
    }

    pub fn with_run(mut self, run: usize) -> RunLabel {
        self.run = Some(run);
        self
    }

    pub fn timestamp(&self) -> String {
        self.started.format("%Y-%m-%d_%H-%M-%S").to_string()
    }

    /// `<prefix>_nE<hidden>_tA<lr>__<timestamp>[_r<run>]`
    pub fn stem(&self, prefix: &str) -> String {
        let mut stem = format!(
            "{}_nE{}_tA{}__{}",
            prefix,
            self.hidden,
            self.learning_rate,
            self.timestamp()
        );
        if let Some(run) = self.run {
            stem.push_str(&format!("_r{}", run));
        }
        stem
    }
}
