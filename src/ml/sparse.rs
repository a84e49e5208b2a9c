// ============================================================
// Layer 5: Sparse Row Matrix
// ============================================================
// Bag-of-words vectors are almost entirely zeros: a comment
// uses a few dozen of the 10,000 vocabulary columns. Each row
// therefore stores only its nonzero entries as two parallel
// vectors (column indices, values), sorted by column.
//
//   row 0: indices [3, 17, 942]   data [1.0, 2.0, 1.0]
//   row 1: indices []             data []
//
// Rows are appended once and their values may be rescaled in
// place (TF-IDF weighting), but the sparsity pattern never changes.

use serde::{Deserialize, Serialize};

/// A sparse matrix with entries arranged row-wise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseRowMatrix {
    cols:    usize,
    indices: Vec<Vec<usize>>,
    data:    Vec<Vec<f64>>,
}

/// A borrowed view of one row's nonzero entries.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub data:    &'a [f64],
}

impl<'a> SparseRow<'a> {
    /// Iterate over (column, value) pairs
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        let (indices, data) = (self.indices, self.data);
        indices.iter().copied().zip(data.iter().copied())
    }

    /// Dot product with a dense vector of at least `cols` entries
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter_nonzero().map(|(j, v)| v * dense[j]).sum()
    }

    #[cfg(test)]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }
}

impl SparseRowMatrix {
    /// An empty matrix with `cols` columns and no rows
    pub fn new(cols: usize) -> Self {
        Self { cols, indices: Vec::new(), data: Vec::new() }
    }

    pub fn rows(&self) -> usize {
        self.indices.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of stored entries
    pub fn nnz(&self) -> usize {
        self.indices.iter().map(Vec::len).sum()
    }

    /// Append a row from (column, value) pairs.
    ///
    /// Pairs may come in any order; zeros are skipped.
    ///
    /// # Panics
    /// Panics if a column is out of range or appears twice.
    pub fn push_row(&mut self, mut entries: Vec<(usize, f64)>) {
        entries.sort_unstable_by_key(|&(j, _)| j);

        let mut idx  = Vec::with_capacity(entries.len());
        let mut vals = Vec::with_capacity(entries.len());
        for (j, v) in entries {
            assert!(j < self.cols, "column {j} out of range for {} columns", self.cols);
            assert!(idx.last() != Some(&j), "duplicate column {j} in row");
            if v != 0.0 {
                idx.push(j);
                vals.push(v);
            }
        }

        self.indices.push(idx);
        self.data.push(vals);
    }

    #[cfg(test)]
    pub fn row(&self, i: usize) -> SparseRow<'_> {
        SparseRow { indices: &self.indices[i], data: &self.data[i] }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = SparseRow<'_>> {
        self.indices
            .iter()
            .zip(self.data.iter())
            .map(|(indices, data)| SparseRow { indices, data })
    }

    /// Iterate over rows with mutable access to their values
    pub fn iter_rows_mut(&mut self) -> impl Iterator<Item = (&[usize], &mut [f64])> {
        self.indices
            .iter()
            .map(Vec::as_slice)
            .zip(self.data.iter_mut().map(Vec::as_mut_slice))
    }

    /// Value at (row, col), zero when not stored
    #[cfg(test)]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        match self.indices[row].binary_search(&col) {
            Ok(k)  => self.data[row][k],
            Err(_) => 0.0,
        }
    }
}
