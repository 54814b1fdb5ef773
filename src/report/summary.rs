use std::io::Write;
use std::path::Path;

use crate::errors::Result;
use crate::report::confusion::ConfusionMatrix;
use crate::train::evaluate::Evaluation;
use crate::train::trainer::TrainingReport;

/// Test results gathered over several independent runs.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    results: Vec<Evaluation>,
    confusion: Option<ConfusionMatrix>,
}

/// Mean, minimum and maximum of one figure across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl RunSummary {
    pub fn new() -> RunSummary {
        RunSummary::default()
    }

    pub fn add(&mut self, report: &TrainingReport) -> Result<()> {
        match self.confusion {
            Some(ref mut total) => total.accumulate(&report.confusion)?,
            None => self.confusion = Some(report.confusion.clone()),
        }
        self.results.push(report.test);
        Ok(())
    }

    pub fn runs(&self) -> usize {
        self.results.len()
    }

    pub fn error_rate(&self) -> Option<Spread> {
        spread(self.results.iter().map(|r| r.error_rate))
    }

    pub fn squared_error(&self) -> Option<Spread> {
        spread(self.results.iter().map(|r| r.squared_error))
    }

    /// Element-wise sum of every run's confusion matrix.
    pub fn confusion(&self) -> Option<&ConfusionMatrix> {
        self.confusion.as_ref()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::from("run;error_rate;squared_error\n");
        for (i, r) in self.results.iter().enumerate() {
            out.push_str(&format!("{};{};{}\n", i + 1, r.error_rate, r.squared_error));
        }
        for (name, figure) in [("error_rate", self.error_rate()), ("squared_error", self.squared_error())] {
            if let Some(s) = figure {
                out.push_str(&format!("{};mean={};min={};max={}\n", name, s.mean, s.min, s.max));
            }
        }
        if let Some(ref matrix) = self.confusion {
            out.push('\n');
            out.push_str(&matrix.to_table());
        }
        out
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn spread(values: impl Iterator<Item = f64>) -> Option<Spread> {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(Spread { mean, min, max })
}
