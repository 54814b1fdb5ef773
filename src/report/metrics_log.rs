use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::Result;

/// One measurement written to a metrics log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub epoch: usize,
    pub error_rate: f64,
    pub squared_error: f64,
    pub learning_rate: f64,
    pub network_id: Option<String>,
}

/// Append-only list of metric rows, kept in memory and flushed to a
/// semicolon-delimited file in one go.
#[derive(Debug, Clone)]
pub struct MetricsLog {
    name: String,
    rows: Vec<MetricsRow>,
}

impl MetricsLog {
    /// `name` becomes the file stem.
    pub fn new(name: impl Into<String>) -> MetricsLog {
        MetricsLog { name: name.into(), rows: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, row: MetricsRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn to_text(&self) -> String {
        let with_id = self.rows.iter().any(|r| r.network_id.is_some());
        let mut out = String::from("epoch;error_rate;squared_error;learning_rate");
        if with_id {
            out.push_str(";network_id");
        }
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{};{};{};{}",
                row.epoch, row.error_rate, row.squared_error, row.learning_rate
            ));
            if with_id {
                out.push(';');
                out.push_str(row.network_id.as_deref().unwrap_or(""));
            }
            out.push('\n');
        }
        out
    }

    /// Writes `<dir>/<name>.csv` and returns its path.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(format!("{}.csv", self.name));
        let file = std::fs::File::create(&path)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(epoch: usize, id: Option<&str>) -> MetricsRow {
        MetricsRow {
            epoch,
            error_rate: 0.25,
            squared_error: 3.5,
            learning_rate: 0.1,
            network_id: id.map(str::to_owned),
        }
    }

    #[test]
    fn renders_rows_in_order() {
        let mut log = MetricsLog::new("validation");
        log.push(row(10, None));
        log.push(row(20, None));
        assert_eq!(
            log.to_text(),
            "epoch;error_rate;squared_error;learning_rate\n10;0.25;3.5;0.1\n20;0.25;3.5;0.1\n"
        );
    }

    #[test]
    fn adds_id_column_when_present() {
        let mut log = MetricsLog::new("test");
        log.push(row(30, Some("1.5e0")));
        assert!(log.to_text().ends_with("30;0.25;3.5;0.1;1.5e0\n"));
    }

    #[test]
    fn writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = MetricsLog::new("training_log_x");
        log.push(row(1, None));
        let path = log.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("training_log_x.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), log.to_text());
    }
}
