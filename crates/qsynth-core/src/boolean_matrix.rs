//! Row-indexed GF(2) matrices with a tracked row-operation log.
//!
//! Every elementary operation is an XOR of one row into another. Operations
//! can optionally be recorded into a log of `(control, target)` pairs, which
//! downstream synthesis strategies replay as CX gates.

use crate::error::{CoreError, CoreResult};

/// A `(control, target)` row-XOR: row `target` was XORed with row `control`.
pub type RowOperation = (usize, usize);

/// A GF(2) matrix stored row-major as bit vectors, with a replayable
/// row-operation log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BooleanMatrix {
    rows: Vec<Vec<bool>>,
    row_operations: Vec<RowOperation>,
}

impl BooleanMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        BooleanMatrix {
            rows,
            row_operations: Vec::new(),
        }
    }

    /// An `rows x cols` matrix of all `val`.
    pub fn filled(rows: usize, cols: usize, val: bool) -> Self {
        BooleanMatrix {
            rows: vec![vec![val; cols]; rows],
            row_operations: Vec::new(),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, false)
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.rows[i][i] = true;
        }
        m
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    pub fn row(&self, r: usize) -> &[bool] {
        &self.rows[r]
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    pub fn row_operations(&self) -> &[RowOperation] {
        &self.row_operations
    }

    pub fn find_row(&self, row: &[bool]) -> Option<usize> {
        self.rows.iter().position(|r| r.as_slice() == row)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.row_operations.clear();
    }

    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.iter_mut().for_each(|b| *b = false);
        }
        self.row_operations.clear();
    }

    pub fn push_row(&mut self, row: Vec<bool>) {
        self.rows.push(row);
    }

    pub fn push_zeros_row(&mut self) {
        let cols = self.num_cols();
        self.rows.push(vec![false; cols]);
    }

    pub fn push_zeros_column(&mut self) {
        for row in &mut self.rows {
            row.push(false);
        }
    }

    /// Append a new column that is `1` at row `idx` and `0` elsewhere.
    pub fn append_one_hot_column(&mut self, idx: usize) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.push(i == idx);
        }
    }

    pub fn erase_row(&mut self, r: usize) {
        self.rows.remove(r);
    }

    /// XOR row `ctrl` into row `targ`, optionally recording the op.
    ///
    /// Returns `false` (and does nothing) if either index is out of range.
    pub fn row_operation(&mut self, ctrl: usize, targ: usize, track: bool) -> bool {
        if ctrl >= self.rows.len() || targ >= self.rows.len() {
            return false;
        }
        let (lo, hi) = if ctrl < targ {
            (ctrl, targ)
        } else {
            (targ, ctrl)
        };
        let (left, right) = self.rows.split_at_mut(hi);
        let ctrl_row = &left[lo];
        let targ_row = &mut right[0];
        for (t, c) in targ_row.iter_mut().zip(ctrl_row.iter()) {
            *t ^= *c;
        }
        if track {
            self.row_operations.push((ctrl, targ));
        }
        true
    }

    /// Full (non-blocked) Gaussian elimination into reduced row-echelon
    /// form. In augmented mode, the last column is treated as the RHS and
    /// excluded from pivot search; returns `false` iff an inconsistent row
    /// (all-zero pivot columns, nonzero RHS) is found.
    pub fn gaussian_elimination(&mut self, track: bool, is_augmented_matrix: bool) -> bool {
        let num_rows = self.num_rows();
        let pivot_cols = if is_augmented_matrix {
            self.num_cols().saturating_sub(1)
        } else {
            self.num_cols()
        };

        let mut pivot_row = 0usize;
        for col in 0..pivot_cols {
            let Some(found) = (pivot_row..num_rows).find(|&r| self.rows[r][col]) else {
                continue;
            };
            if found != pivot_row {
                self.rows.swap(found, pivot_row);
            }
            for r in 0..num_rows {
                if r != pivot_row && self.rows[r][col] {
                    self.row_operation(pivot_row, r, track);
                }
            }
            pivot_row += 1;
            if pivot_row == num_rows {
                break;
            }
        }

        if is_augmented_matrix {
            for r in pivot_row..num_rows {
                if self.rows[r][pivot_cols] {
                    return false;
                }
            }
        }
        true
    }

    /// Block-wise Gaussian elimination (Patel–Markov–Hayes style): columns
    /// are processed `block_size` at a time. Within a block, rows sharing an
    /// identical bit pattern restricted to that block are first combined via
    /// intra-block row-XORs; the block is then committed by clearing
    /// below-pivot (and, if `fully_reduced`, above-pivot) entries. Returns
    /// the resulting rank.
    pub fn gaussian_elimination_skip(
        &mut self,
        block_size: usize,
        fully_reduced: bool,
        track: bool,
    ) -> usize {
        let num_rows = self.num_rows();
        let num_cols = self.num_cols();
        let block_size = block_size.max(1);

        let mut pivot_row = 0usize;
        let mut col_start = 0usize;
        while col_start < num_cols && pivot_row < num_rows {
            let col_end = (col_start + block_size).min(num_cols);

            // Intra-block pass: combine rows (at or below pivot_row) that
            // share the same bit pattern within this block, so the later
            // elimination emits one row-op per duplicate instead of one per
            // pivot column.
            let mut seen: Vec<(Vec<bool>, usize)> = Vec::new();
            for r in pivot_row..num_rows {
                let pattern: Vec<bool> = self.rows[r][col_start..col_end].to_vec();
                if pattern.iter().all(|b| !b) {
                    continue;
                }
                if let Some((_, rep)) = seen.iter().find(|(p, _)| *p == pattern) {
                    let rep = *rep;
                    self.row_operation(rep, r, track);
                } else {
                    seen.push((pattern, r));
                }
            }

            for col in col_start..col_end {
                let Some(found) = (pivot_row..num_rows).find(|&r| self.rows[r][col]) else {
                    continue;
                };
                if found != pivot_row {
                    self.rows.swap(found, pivot_row);
                }
                let upper_bound = if fully_reduced { 0 } else { pivot_row + 1 };
                for r in upper_bound..num_rows {
                    if r != pivot_row && self.rows[r][col] {
                        self.row_operation(pivot_row, r, track);
                    }
                }
                pivot_row += 1;
                if pivot_row == num_rows {
                    break;
                }
            }
            col_start = col_end;
        }

        pivot_row
    }

    /// True iff the matrix is in "solved form": every row is either the
    /// zero row or one-hot, distinct one-hot columns across rows, and all
    /// one-hot rows precede all zero rows.
    pub fn is_solved_form(&self) -> bool {
        let mut seen_zero = false;
        let mut used_cols = rustc_hash::FxHashSet::default();
        for row in &self.rows {
            let ones: Vec<usize> = row
                .iter()
                .enumerate()
                .filter_map(|(i, &b)| b.then_some(i))
                .collect();
            match ones.len() {
                0 => seen_zero = true,
                1 => {
                    if seen_zero || !used_cols.insert(ones[0]) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        true
    }

    /// As [`Self::is_solved_form`] but ignores the last (RHS) column.
    pub fn is_augmented_solved_form(&self) -> bool {
        let pivot_cols = self.num_cols().saturating_sub(1);
        let mut seen_zero = false;
        let mut used_cols = rustc_hash::FxHashSet::default();
        for row in &self.rows {
            let ones: Vec<usize> = row[..pivot_cols]
                .iter()
                .enumerate()
                .filter_map(|(i, &b)| b.then_some(i))
                .collect();
            match ones.len() {
                0 => seen_zero = true,
                1 => {
                    if seen_zero || !used_cols.insert(ones[0]) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        true
    }

    /// Remove adjacent duplicate `(a, b), (a, b)` pairs from the log (two
    /// identical XORs cancel over GF(2)). Returns the number removed.
    pub fn filter_duplicate_row_operations(&mut self) -> usize {
        let mut filtered = Vec::with_capacity(self.row_operations.len());
        let mut removed = 0;
        for op in self.row_operations.drain(..) {
            if filtered.last() == Some(&op) {
                filtered.pop();
                removed += 1;
            } else {
                filtered.push(op);
            }
        }
        self.row_operations = filtered;
        removed
    }

    /// Longest dependency chain among tracked row-ops, where two ops depend
    /// on each other if they share a row index.
    pub fn row_operation_depth(&self) -> usize {
        let mut depth: rustc_hash::FxHashMap<usize, usize> = rustc_hash::FxHashMap::default();
        let mut max_depth = 0;
        for &(ctrl, targ) in &self.row_operations {
            let d = depth.get(&ctrl).copied().unwrap_or(0).max(depth.get(&targ).copied().unwrap_or(0)) + 1;
            depth.insert(targ, d);
            max_depth = max_depth.max(d);
        }
        max_depth
    }

    pub fn dense_ratio(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let total = self.num_rows() * self.num_cols();
        if total == 0 {
            return 0.0;
        }
        let ones: usize = self.rows.iter().map(|r| r.iter().filter(|b| **b).count()).sum();
        ones as f64 / total as f64
    }

    fn check_row_bounds(&self, r: usize) -> CoreResult<()> {
        if r >= self.rows.len() {
            Err(CoreError::RowOutOfRange(r, self.rows.len()))
        } else {
            Ok(())
        }
    }

    pub fn get_row(&self, r: usize) -> CoreResult<&[bool]> {
        self.check_row_bounds(r)?;
        Ok(&self.rows[r])
    }
}

impl std::ops::Index<usize> for BooleanMatrix {
    type Output = Vec<bool>;
    fn index(&self, i: usize) -> &Vec<bool> {
        &self.rows[i]
    }
}

impl std::ops::IndexMut<usize> for BooleanMatrix {
    fn index_mut(&mut self, i: usize) -> &mut Vec<bool> {
        &mut self.rows[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_operation_xor() {
        let mut m = BooleanMatrix::from_rows(vec![vec![true, false], vec![false, true]]);
        assert!(m.row_operation(0, 1, true));
        assert_eq!(m.row(1), &[true, true]);
        assert_eq!(m.row_operations(), &[(0, 1)]);
    }

    #[test]
    fn test_row_operation_out_of_range() {
        let mut m = BooleanMatrix::from_rows(vec![vec![true, false]]);
        assert!(!m.row_operation(0, 5, false));
    }

    #[test]
    fn test_gaussian_elimination_identity() {
        let mut m = BooleanMatrix::from_rows(vec![
            vec![true, true, false],
            vec![true, false, true],
        ]);
        assert!(m.gaussian_elimination(true, false));
        assert!(m.is_solved_form());
    }

    #[test]
    fn test_gaussian_elimination_skip_matches_full_rank() {
        let mut m1 = BooleanMatrix::from_rows(vec![
            vec![true, true, false, true],
            vec![false, true, true, false],
            vec![true, false, true, true],
        ]);
        let mut m2 = m1.clone();
        m1.gaussian_elimination(false, false);
        let rank = m2.gaussian_elimination_skip(2, true, false);
        assert_eq!(rank, 3);
        assert!(m2.is_solved_form());
    }

    #[test]
    fn test_filter_duplicate_row_operations() {
        let mut m = BooleanMatrix::from_rows(vec![vec![true], vec![false], vec![true]]);
        m.row_operation(0, 1, true);
        m.row_operation(0, 1, true);
        m.row_operation(1, 2, true);
        let removed = m.filter_duplicate_row_operations();
        assert_eq!(removed, 1);
        assert_eq!(m.row_operations(), &[(1, 2)]);
    }

    #[test]
    fn test_append_one_hot_column_and_push_row() {
        let mut m = BooleanMatrix::zeros(2, 1);
        m.append_one_hot_column(0);
        assert_eq!(m.row(0), &[false, true]);
        assert_eq!(m.row(1), &[false, false]);
        m.push_zeros_row();
        assert_eq!(m.num_rows(), 3);
    }

    #[test]
    fn test_row_operation_depth() {
        let mut m = BooleanMatrix::zeros(3, 1);
        m.row_operation(0, 1, true);
        m.row_operation(1, 2, true);
        assert_eq!(m.row_operation_depth(), 2);
    }
}
