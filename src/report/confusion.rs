use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::errors::{MlpError, Result};

/// Class count assumed by the digit-recognition runs this crate was built for.
pub const DEFAULT_CLASSES: usize = 10;

/// Square count table: rows are true classes, columns predicted classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn new(classes: usize) -> ConfusionMatrix {
        ConfusionMatrix { counts: vec![vec![0; classes]; classes] }
    }

    pub fn classes(&self) -> usize {
        self.counts.len()
    }

    pub fn record(&mut self, actual: usize, predicted: usize) -> Result<()> {
        let classes = self.classes();
        if actual >= classes || predicted >= classes {
            return Err(MlpError::config(format!(
                "class pair ({}, {}) outside a {}-class confusion matrix",
                actual, predicted, classes
            )));
        }
        self.counts[actual][predicted] += 1;
        Ok(())
    }

    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        self.counts[actual][predicted]
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.counts
    }

    pub fn row_total(&self, actual: usize) -> usize {
        self.counts[actual].iter().sum()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal.
    pub fn correct(&self) -> usize {
        (0..self.classes()).map(|i| self.counts[i][i]).sum()
    }

    /// Element-wise sum with a matrix of the same size.
    pub fn accumulate(&mut self, other: &ConfusionMatrix) -> Result<()> {
        if other.classes() != self.classes() {
            return Err(MlpError::Dimension { expected: self.classes(), actual: other.classes() });
        }
        for (row, other_row) in self.counts.iter_mut().zip(&other.counts) {
            for (cell, add) in row.iter_mut().zip(other_row) {
                *cell += add;
            }
        }
        Ok(())
    }

    /// Semicolon table: a `null;0;1;...` header, then one row per true class
    /// prefixed by its index.
    pub fn to_table(&self) -> String {
        let mut out = String::from("null");
        for j in 0..self.classes() {
            out.push_str(&format!(";{}", j));
        }
        out.push('\n');
        for (i, row) in self.counts.iter().enumerate() {
            out.push_str(&i.to_string());
            for count in row {
                out.push_str(&format!(";{}", count));
            }
            out.push('\n');
        }
        out
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(self.to_table().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        ConfusionMatrix::new(DEFAULT_CLASSES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_layout() {
        let mut m = ConfusionMatrix::new(2);
        m.record(0, 0).unwrap();
        m.record(1, 0).unwrap();
        m.record(1, 0).unwrap();
        assert_eq!(m.to_table(), "null;0;1\n0;1;0\n1;2;0\n");
    }

    #[test]
    fn default_is_ten_by_ten() {
        let table = ConfusionMatrix::default().to_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "null;0;1;2;3;4;5;6;7;8;9");
        assert_eq!(lines[10], "9;0;0;0;0;0;0;0;0;0;0");
    }

    #[test]
    fn rejects_out_of_range_classes() {
        let mut m = ConfusionMatrix::new(3);
        assert!(m.record(3, 0).is_err());
        assert!(m.record(0, 5).is_err());
        assert_eq!(m.total(), 0);
    }

    #[test]
    fn accumulates_and_counts() {
        let mut a = ConfusionMatrix::new(2);
        a.record(0, 0).unwrap();
        let mut b = ConfusionMatrix::new(2);
        b.record(0, 1).unwrap();
        b.record(1, 1).unwrap();
        a.accumulate(&b).unwrap();
        assert_eq!(a.total(), 3);
        assert_eq!(a.row_total(0), 2);
        assert_eq!(a.correct(), 2);
        assert!(a.accumulate(&ConfusionMatrix::new(3)).is_err());
    }
}
