//! Row-major `(row, col) -> index` arithmetic shared by every kernel.
//!
//! `spec.md` §9 calls out "column-major inner loop over row-major
//! storage" as the one traversal order to preserve: kernels iterate
//! `for i in rows { for j in cols { ... } }`, which is the cache-correct
//! order for a row-major buffer. Centralizing the stride arithmetic
//! here means no kernel computes `i * k_cols + j` by hand more than
//! once.

/// A read-only view over a dense row-major `n_rows x k_cols` buffer.
#[derive(Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    pub n_rows: usize,
    pub k_cols: usize,
}

impl<'a, T> MatrixView<'a, T> {
    pub fn new(data: &'a [T], n_rows: usize, k_cols: usize) -> Self {
        debug_assert_eq!(data.len(), n_rows * k_cols);
        Self { data, n_rows, k_cols }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T
    where
        T: Copy,
    {
        self.data[row * self.k_cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.k_cols;
        &self.data[start..start + self.k_cols]
    }
}

/// A mutable view over a dense row-major `n_rows x k_cols` buffer.
pub struct MatrixViewMut<'a, T> {
    data: &'a mut [T],
    pub n_rows: usize,
    pub k_cols: usize,
}

impl<'a, T> MatrixViewMut<'a, T> {
    pub fn new(data: &'a mut [T], n_rows: usize, k_cols: usize) -> Self {
        debug_assert_eq!(data.len(), n_rows * k_cols);
        Self { data, n_rows, k_cols }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T
    where
        T: Copy,
    {
        self.data[row * self.k_cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, v: T) {
        self.data[row * self.k_cols + col] = v;
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.k_cols;
        &mut self.data[start..start + self.k_cols]
    }
}

/// Optional boolean mask view, same shape as a value matrix. Kernels
/// hold this as `Option<MatrixView<bool>>` since `mask` is optional
/// per `spec.md` §6.
pub type MaskView<'a> = MatrixView<'a, bool>;

#[inline]
pub fn mask_bit(mask: Option<&MaskView<'_>>, row: usize, col: usize) -> Option<bool> {
    mask.map(|m| m.get(row, col))
}
