use crate::errors::{MlpError, Result};

/// One labelled example: an immutable feature vector plus its class index.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    features: Vec<f64>,
    label: usize,
}

impl Sample {
    pub fn new(features: Vec<f64>, label: usize) -> Sample {
        Sample { features, label }
    }

    /// Builds samples from parallel feature rows and labels.
    pub fn from_matrix(features: Vec<Vec<f64>>, labels: &[usize]) -> Result<Vec<Sample>> {
        if features.len() != labels.len() {
            return Err(MlpError::Dimension {
                expected: features.len(),
                actual: labels.len(),
            });
        }
        Ok(features.into_iter()
            .zip(labels.iter())
            .map(|(row, &label)| Sample::new(row, label))
            .collect())
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    pub fn label(&self) -> usize {
        self.label
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// A fresh cursor positioned before the first feature.
    pub fn cursor(&self) -> FeatureCursor<'_> {
        FeatureCursor::new(&self.features)
    }
}

/// Forward-only read protocol over a feature slice.
///
/// A cursor is consumed by one weighted-sum computation and must be `reset`
/// before it is traversed again.
#[derive(Debug, Clone)]
pub struct FeatureCursor<'a> {
    values: &'a [f64],
    pos: usize,
}

impl<'a> FeatureCursor<'a> {
    pub fn new(values: &'a [f64]) -> FeatureCursor<'a> {
        FeatureCursor { values, pos: 0 }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.values.len()
    }

    /// Number of values the cursor walks over in a full traversal.
    pub fn width(&self) -> usize {
        self.values.len()
    }
}

impl Iterator for FeatureCursor<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let value = self.values.get(self.pos).copied()?;
        self.pos += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.values.len() - self.pos;
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_features_in_order() {
        let sample = Sample::new(vec![0.5, -1.0, 2.0], 3);
        let mut cursor = sample.cursor();
        let mut seen = Vec::new();
        while cursor.has_next() {
            seen.push(cursor.next().unwrap());
        }
        assert_eq!(seen, vec![0.5, -1.0, 2.0]);
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn cursor_must_be_reset_before_reuse() {
        let sample = Sample::new(vec![1.0, 2.0], 0);
        let mut cursor = sample.cursor();
        assert_eq!(cursor.by_ref().count(), 2);
        assert!(!cursor.has_next());
        cursor.reset();
        assert_eq!(cursor.sum::<f64>(), 3.0);
    }

    #[test]
    fn from_matrix_rejects_length_mismatch() {
        let err = Sample::from_matrix(vec![vec![1.0], vec![2.0]], &[0]).unwrap_err();
        assert!(matches!(err, MlpError::Dimension { expected: 2, actual: 1 }));
    }
}
