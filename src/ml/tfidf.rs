// ============================================================
// Layer 5: TF-IDF Transformer
// ============================================================
// Reweights raw n-gram counts so that n-grams appearing in
// almost every comment ("the", "is") matter less than rare ones.
//
// Inverse document frequency, smoothed as if one extra document
// contained every term exactly once:
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
//   n     = number of training documents
//   df(t) = number of training documents containing t
//
// Each vector is then   x[t] = count[t] * idf(t)
// and finally scaled to unit Euclidean (L2) norm.
//
// idf is computed once from the training counts and reused
// unchanged for every later transform.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::ml::sparse::SparseRowMatrix;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfTransformer {
    /// One weight per vocabulary column; empty until fitted
    idf: Vec<f64>,
}

impl TfidfTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        !self.idf.is_empty()
    }

    /// Compute idf weights from a training count matrix.
    pub fn fit(&mut self, counts: &SparseRowMatrix) -> Result<()> {
        if counts.rows() == 0 {
            bail!("Cannot fit TF-IDF weights on an empty count matrix");
        }
        if counts.cols() == 0 {
            bail!("Cannot fit TF-IDF weights on a matrix with no columns");
        }

        let mut df = vec![0usize; counts.cols()];
        for row in counts.iter_rows() {
            for (col, v) in row.iter_nonzero() {
                if v > 0.0 {
                    df[col] += 1;
                }
            }
        }

        let n = counts.rows() as f64;
        self.idf = df
            .into_iter()
            .map(|d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        Ok(())
    }

    /// Apply idf weighting and L2 normalisation to `counts`.
    pub fn transform(&self, mut counts: SparseRowMatrix) -> Result<SparseRowMatrix> {
        if !self.is_fitted() {
            bail!("TF-IDF transformer has not been fitted");
        }
        if counts.cols() != self.idf.len() {
            bail!(
                "Count matrix has {} columns but idf has {} weights",
                counts.cols(),
                self.idf.len()
            );
        }

        for (indices, values) in counts.iter_rows_mut() {
            for (v, &col) in values.iter_mut().zip(indices) {
                *v *= self.idf[col];
            }

            // An all-zero row stays all-zero
            let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in values.iter_mut() {
                    *v /= norm;
                }
            }
        }

        Ok(counts)
    }

    pub fn fit_transform(&mut self, counts: SparseRowMatrix) -> Result<SparseRowMatrix> {
        self.fit(&counts)?;
        self.transform(counts)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> SparseRowMatrix {
        // col 0 in both docs, col 1 only in doc 0
        let mut m = SparseRowMatrix::new(2);
        m.push_row(vec![(0, 1.0), (1, 2.0)]);
        m.push_row(vec![(0, 3.0)]);
        m
    }

    #[test]
    fn test_smoothed_idf() {
        let mut t = TfidfTransformer::new();
        t.fit(&counts()).unwrap();
        // n = 2: df=2 → ln(3/3)+1 = 1, df=1 → ln(3/2)+1
        assert!((t.idf[0] - 1.0).abs() < 1e-12);
        assert!((t.idf[1] - (1.5f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_have_unit_norm() {
        let mut t = TfidfTransformer::new();
        let m = t.fit_transform(counts()).unwrap();
        for row in m.iter_rows() {
            let norm: f64 = row.data.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
        // Single-term row normalises to exactly 1
        assert!((m.get(1, 0) - 1.0).abs() < 1e-12);
        // Rare term outweighs the common one in row 0
        assert!(m.get(0, 1) > m.get(0, 0));
    }

    #[test]
    fn test_empty_row_stays_zero() {
        let mut t = TfidfTransformer::new();
        t.fit(&counts()).unwrap();
        let mut unseen = SparseRowMatrix::new(2);
        unseen.push_row(Vec::new());
        let m = t.transform(unseen).unwrap();
        assert_eq!(m.row(0).nnz(), 0);
    }

    #[test]
    fn test_idf_is_frozen_after_fit() {
        let mut t = TfidfTransformer::new();
        t.fit(&counts()).unwrap();
        let before = t.idf.clone();

        let mut other = SparseRowMatrix::new(2);
        other.push_row(vec![(1, 5.0)]);
        t.transform(other).unwrap();

        assert_eq!(t.idf, before);
    }

    #[test]
    fn test_errors() {
        let t = TfidfTransformer::new();
        assert!(t.transform(counts()).is_err());

        let mut t = TfidfTransformer::new();
        t.fit(&counts()).unwrap();
        assert!(t.transform(SparseRowMatrix::new(3)).is_err());

        assert!(TfidfTransformer::new().fit(&SparseRowMatrix::new(2)).is_err());
    }
}
