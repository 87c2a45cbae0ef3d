use std::fmt;
use std::ops::{Index, IndexMut};

use anyhow::{bail, Context};
use log::{debug, info};
use ndarray::{Array2, ArrayBase, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2, Data, Ix2};

use crate::dense::vector::{
    copy_vector, vector_hadamard, vector_hadamard_increment, vector_increment, vector_l1,
    vector_l2, vector_sgn,
};
use crate::kernel::{self, Transpose};
use crate::random;
use crate::sync::Communicator;
use crate::utils::{ensure_len, ZeroVec};

/// Row-major dense matrix of `leading_dim × second_dim` values stored in one
/// contiguous buffer. Element `(row, col)` lives at `row * second_dim + col`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseMatrix {
    leading_dim: usize,
    second_dim: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// An empty `0 × 0` matrix.
    pub fn new() -> Self {
        DenseMatrix {
            leading_dim: 0,
            second_dim: 0,
            data: Vec::new(),
        }
    }

    /// A zero-filled matrix with the given dimensions.
    pub fn with_dims(leading_dim: usize, second_dim: usize) -> Self {
        let mut matrix = Self::new();
        matrix.resize(leading_dim, second_dim);
        matrix
    }

    /// Wraps an existing row-major buffer.
    pub fn from_row_major(
        leading_dim: usize,
        second_dim: usize,
        data: Vec<f64>,
    ) -> anyhow::Result<Self> {
        let expected = leading_dim
            .checked_mul(second_dim)
            .context("Matrix dimensions overflow")?;
        if data.len() != expected {
            bail!(
                "Buffer of length {} cannot hold a {}x{} matrix",
                data.len(),
                leading_dim,
                second_dim
            );
        }
        Ok(DenseMatrix {
            leading_dim,
            second_dim,
            data,
        })
    }

    /// Reallocates storage for `leading_dim * second_dim` elements. Previous
    /// values are discarded.
    pub fn resize(&mut self, leading_dim: usize, second_dim: usize) {
        debug!(
            "Resizing matrix from {}x{} to {}x{}",
            self.leading_dim, self.second_dim, leading_dim, second_dim
        );
        self.leading_dim = leading_dim;
        self.second_dim = second_dim;
        self.data.zero_len(leading_dim * second_dim);
    }

    pub fn leading_dim(&self) -> usize {
        self.leading_dim
    }

    pub fn second_dim(&self) -> usize {
        self.second_dim
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.leading_dim, self.second_dim)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    fn offset(&self, row: usize, col: usize) -> anyhow::Result<usize> {
        if row >= self.leading_dim || col >= self.second_dim {
            bail!(
                "Index ({}, {}) out of bounds for a {}x{} matrix",
                row,
                col,
                self.leading_dim,
                self.second_dim
            );
        }
        Ok(row * self.second_dim + col)
    }

    pub fn get(&self, row: usize, col: usize) -> anyhow::Result<f64> {
        let offset = self.offset(row, col)?;
        Ok(self.data[offset])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> anyhow::Result<&mut f64> {
        let offset = self.offset(row, col)?;
        Ok(&mut self.data[offset])
    }

    pub fn row(&self, row: usize) -> anyhow::Result<&[f64]> {
        if row >= self.leading_dim {
            bail!(
                "Row {} out of bounds for a matrix with {} rows",
                row,
                self.leading_dim
            );
        }
        let start = row * self.second_dim;
        Ok(&self.data[start..start + self.second_dim])
    }

    /// Overwrites `row` with `row_buffer`, which must hold exactly
    /// `second_dim` values.
    pub fn set_row(&mut self, row: usize, row_buffer: &[f64]) -> anyhow::Result<()> {
        if row >= self.leading_dim {
            bail!(
                "Row {} out of bounds for a matrix with {} rows",
                row,
                self.leading_dim
            );
        }
        ensure_len("row buffer", row_buffer.len(), "matrix row", self.second_dim)?;
        let start = row * self.second_dim;
        copy_vector(
            &mut self.data[start..start + self.second_dim],
            row_buffer,
            self.second_dim,
        )
    }

    pub fn view(&self) -> anyhow::Result<ArrayView2<'_, f64>> {
        Ok(ArrayView2::from_shape(
            (self.leading_dim, self.second_dim),
            &self.data,
        )?)
    }

    pub fn view_mut(&mut self) -> anyhow::Result<ArrayViewMut2<'_, f64>> {
        Ok(ArrayViewMut2::from_shape(
            (self.leading_dim, self.second_dim),
            &mut self.data,
        )?)
    }

    pub fn to_array2(&self) -> Array2<f64> {
        let second_dim = self.second_dim;
        Array2::from_shape_fn((self.leading_dim, second_dim), |(row, col)| {
            self.data[row * second_dim + col]
        })
    }

    #[cfg(feature = "nalgebra")]
    pub fn to_nalgebra(&self) -> nalgebra::DMatrix<f64> {
        nalgebra::DMatrix::from_row_slice(self.leading_dim, self.second_dim, &self.data)
    }

    /// Writes every row through `log::info!`, space separated.
    pub fn log_rows(&self) {
        for row in self.data.chunks(self.second_dim.max(1)) {
            info!("{}", format_row(row));
        }
    }

    /// Replicates the dimensions and contents of rank `source`'s matrix onto
    /// every rank of `comm`. Dimensions travel first, then the payload.
    pub fn sync<C: Communicator + ?Sized>(&mut self, source: usize, comm: &C) -> anyhow::Result<()> {
        let mut dims = [self.leading_dim, self.second_dim];
        comm.sync_dims(&mut dims, source)
            .context("Failed to synchronize matrix dimensions")?;
        if comm.rank() != source {
            self.resize(dims[0], dims[1]);
        }
        comm.sync_values(&mut self.data, source)
            .context("Failed to synchronize matrix values")?;
        debug!(
            "Rank {} holds a {}x{} matrix after sync from rank {}",
            comm.rank(),
            self.leading_dim,
            self.second_dim,
            source
        );
        Ok(())
    }
}

fn format_row(row: &[f64]) -> String {
    row.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        match self.offset(row, col) {
            Ok(offset) => &self.data[offset],
            Err(e) => panic!("{}", e),
        }
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        match self.offset(row, col) {
            Ok(offset) => &mut self.data[offset],
            Err(e) => panic!("{}", e),
        }
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.second_dim == 0 {
            return Ok(());
        }
        for row in self.data.chunks(self.second_dim) {
            writeln!(f, "{}", format_row(row))?;
        }
        Ok(())
    }
}

impl<S: Data<Elem = f64>> From<&ArrayBase<S, Ix2>> for DenseMatrix {
    fn from(array: &ArrayBase<S, Ix2>) -> Self {
        let (leading_dim, second_dim) = array.dim();
        DenseMatrix {
            leading_dim,
            second_dim,
            data: array.iter().copied().collect(),
        }
    }
}

impl From<Array2<f64>> for DenseMatrix {
    fn from(array: Array2<f64>) -> Self {
        DenseMatrix::from(&array)
    }
}

#[cfg(feature = "nalgebra")]
impl From<&nalgebra::DMatrix<f64>> for DenseMatrix {
    fn from(matrix: &nalgebra::DMatrix<f64>) -> Self {
        let (leading_dim, second_dim) = matrix.shape();
        let data = (0..leading_dim)
            .flat_map(|row| (0..second_dim).map(move |col| matrix[(row, col)]))
            .collect();
        DenseMatrix {
            leading_dim,
            second_dim,
            data,
        }
    }
}

fn ensure_same_dims(
    name: &str,
    matrix: &DenseMatrix,
    reference_name: &str,
    reference: &DenseMatrix,
) -> anyhow::Result<()> {
    if matrix.dims() != reference.dims() {
        bail!(
            "Dimensions of {} ({}x{}) do not match dimensions of {} ({}x{})",
            name,
            matrix.leading_dim,
            matrix.second_dim,
            reference_name,
            reference.leading_dim,
            reference.second_dim
        );
    }
    Ok(())
}

fn ensure_square(name: &str, matrix: &DenseMatrix) -> anyhow::Result<()> {
    if matrix.leading_dim != matrix.second_dim {
        bail!(
            "Matrix {} must be square, got {}x{}",
            name,
            matrix.leading_dim,
            matrix.second_dim
        );
    }
    Ok(())
}

fn op_dims(matrix: &DenseMatrix, trans: Transpose) -> (usize, usize) {
    match trans {
        Transpose::No => (matrix.leading_dim, matrix.second_dim),
        Transpose::Yes => (matrix.second_dim, matrix.leading_dim),
    }
}

/// Fills `mat` with uniform values from `[-scale, scale]`, reproducible from `seed`.
pub fn set_to_random_matrix(mat: &mut DenseMatrix, scale: f64, seed: u32) -> anyhow::Result<()> {
    random::fill_seeded(&mut mat.data, scale, seed)
}

pub fn set_to_constant_matrix(mat: &mut DenseMatrix, value: f64) {
    mat.data.fill(value);
}

/// Ones on the main diagonal, zeros elsewhere. Rectangular matrices get ones
/// on the leading `min(leading_dim, second_dim)` diagonal positions.
pub fn set_to_identity_matrix(mat: &mut DenseMatrix) {
    mat.data.fill(0.0);
    let second_dim = mat.second_dim;
    for i in 0..mat.leading_dim.min(second_dim) {
        mat.data[i * second_dim + i] = 1.0;
    }
}

/// `output := scale * op(a) x`
pub fn matrix_vector_multiply(
    output: &mut [f64],
    scale: f64,
    a: &DenseMatrix,
    x: &[f64],
    trans: Transpose,
) -> anyhow::Result<()> {
    let (rows, cols) = op_dims(a, trans);
    ensure_len("x", x.len(), "op(a) columns", cols)?;
    ensure_len("output", output.len(), "op(a) rows", rows)?;
    output.fill(0.0);
    kernel::gemv(
        trans,
        scale,
        a.view()?,
        ArrayView1::from(x),
        0.0,
        ArrayViewMut1::from(output),
    );
    Ok(())
}

/// `output := scale * a x` for a symmetric `a` of which only the upper
/// triangle is read.
pub fn symmetric_matrix_vector_multiply(
    output: &mut [f64],
    scale: f64,
    a: &DenseMatrix,
    x: &[f64],
) -> anyhow::Result<()> {
    ensure_square("a", a)?;
    ensure_len("x", x.len(), "a", a.leading_dim)?;
    ensure_len("output", output.len(), "a", a.leading_dim)?;
    kernel::symv_upper(
        scale,
        a.view()?,
        ArrayView1::from(x),
        0.0,
        ArrayViewMut1::from(output),
    );
    Ok(())
}

/// `c := op(a) op(b)` where `tr_opt` is one of `"NN"`, `"NT"`, `"TN"`, `"TT"`.
/// `c` must already have the shape of the product.
pub fn matrix_matrix_multiply(
    c: &mut DenseMatrix,
    a: &DenseMatrix,
    b: &DenseMatrix,
    tr_opt: &str,
) -> anyhow::Result<()> {
    let (trans_a, trans_b) = Transpose::parse_pair(tr_opt)?;
    let (a_rows, a_cols) = op_dims(a, trans_a);
    let (b_rows, b_cols) = op_dims(b, trans_b);
    if a_cols != b_rows {
        bail!(
            "Inner dimensions do not agree for option {}: op(a) is {}x{}, op(b) is {}x{}",
            tr_opt,
            a_rows,
            a_cols,
            b_rows,
            b_cols
        );
    }
    if c.dims() != (a_rows, b_cols) {
        bail!(
            "Output is {}x{} but the product is {}x{}",
            c.leading_dim,
            c.second_dim,
            a_rows,
            b_cols
        );
    }
    c.data.fill(0.0);
    kernel::gemm(trans_a, trans_b, 1.0, a.view()?, b.view()?, 0.0, c.view_mut()?);
    Ok(())
}

/// Rank-1 update `a += scale * x yᵀ`.
pub fn outer_product_increment(
    a: &mut DenseMatrix,
    scale: f64,
    x: &[f64],
    y: &[f64],
) -> anyhow::Result<()> {
    ensure_len("x", x.len(), "a rows", a.leading_dim)?;
    ensure_len("y", y.len(), "a columns", a.second_dim)?;
    kernel::ger(scale, ArrayView1::from(x), ArrayView1::from(y), a.view_mut()?);
    Ok(())
}

/// `a += scale * x xᵀ`, applied to the upper triangle only.
pub fn symmetric_outer_product_increment(
    a: &mut DenseMatrix,
    scale: f64,
    x: &[f64],
) -> anyhow::Result<()> {
    ensure_square("a", a)?;
    ensure_len("x", x.len(), "a", a.leading_dim)?;
    kernel::syr_upper(scale, ArrayView1::from(x), a.view_mut()?);
    Ok(())
}

/// `a += scale * (x yᵀ + y xᵀ)`, applied to the upper triangle only.
pub fn symmetric_outer_product_increment_pair(
    a: &mut DenseMatrix,
    scale: f64,
    x: &[f64],
    y: &[f64],
) -> anyhow::Result<()> {
    ensure_square("a", a)?;
    ensure_len("x", x.len(), "a", a.leading_dim)?;
    ensure_len("y", y.len(), "a", a.leading_dim)?;
    kernel::syr2_upper(
        scale,
        ArrayView1::from(x),
        ArrayView1::from(y),
        a.view_mut()?,
    );
    Ok(())
}

/// `c_ij := scale * a_ij * b_ij`, overwriting `c`.
pub fn matrix_hadamard(
    c: &mut DenseMatrix,
    scale: f64,
    a: &DenseMatrix,
    b: &DenseMatrix,
) -> anyhow::Result<()> {
    ensure_same_dims("a", a, "c", c)?;
    ensure_same_dims("b", b, "c", c)?;
    vector_hadamard(&mut c.data, scale, &a.data, &b.data)
}

/// `a_ij := a_ij * scale * b_ij`
pub fn matrix_hadamard_increment(
    a: &mut DenseMatrix,
    scale: f64,
    b: &DenseMatrix,
) -> anyhow::Result<()> {
    ensure_same_dims("b", b, "a", a)?;
    vector_hadamard_increment(&mut a.data, scale, &b.data)
}

/// `a += scale * b`
pub fn matrix_increment(a: &mut DenseMatrix, scale: f64, b: &DenseMatrix) -> anyhow::Result<()> {
    ensure_same_dims("b", b, "a", a)?;
    vector_increment(&mut a.data, scale, &b.data)
}

pub fn matrix_sgn(sgn_mat: &mut DenseMatrix, mat: &DenseMatrix) -> anyhow::Result<()> {
    ensure_same_dims("sgn_mat", sgn_mat, "mat", mat)?;
    vector_sgn(&mut sgn_mat.data, &mat.data)
}

/// Zeroes the entries at the given flat (row-major) positions. Nothing is
/// written if any position is out of range.
pub fn matrix_mask(mat: &mut DenseMatrix, zeros: &[usize]) -> anyhow::Result<()> {
    if let Some(&bad) = zeros.iter().find(|&&pos| pos >= mat.data.len()) {
        bail!(
            "Mask position {} out of bounds for a matrix with {} elements",
            bad,
            mat.data.len()
        );
    }
    for &pos in zeros {
        mat.data[pos] = 0.0;
    }
    Ok(())
}

/// Squared L2 norm of the flat buffer.
pub fn matrix_l2(mat: &DenseMatrix) -> f64 {
    vector_l2(&mat.data)
}

pub fn matrix_l1(mat: &DenseMatrix) -> f64 {
    vector_l1(&mat.data)
}

/// Copies the block of `input` starting at `(leading_offset, second_offset)`
/// into `output`. The block has `output`'s current dimensions.
pub fn to_sub_matrix(
    output: &mut DenseMatrix,
    input: &DenseMatrix,
    leading_offset: usize,
    second_offset: usize,
) -> anyhow::Result<()> {
    let fits = |offset: usize, len: usize, bound: usize| {
        offset.checked_add(len).is_some_and(|end| end <= bound)
    };
    if !fits(leading_offset, output.leading_dim, input.leading_dim)
        || !fits(second_offset, output.second_dim, input.second_dim)
    {
        bail!(
            "A {}x{} block at ({}, {}) does not fit in a {}x{} matrix",
            output.leading_dim,
            output.second_dim,
            leading_offset,
            second_offset,
            input.leading_dim,
            input.second_dim
        );
    }
    let width = output.second_dim;
    for row in 0..output.leading_dim {
        let source = (row + leading_offset) * input.second_dim + second_offset;
        kernel::copy(
            width,
            &input.data[source..],
            &mut output.data[row * width..],
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;

    fn sequential(leading_dim: usize, second_dim: usize) -> DenseMatrix {
        let data = (0..leading_dim * second_dim).map(|v| v as f64).collect();
        DenseMatrix::from_row_major(leading_dim, second_dim, data).unwrap()
    }

    #[test]
    fn test_construction_and_resize() {
        let empty = DenseMatrix::new();
        assert_eq!(empty.dims(), (0, 0));
        assert!(empty.is_empty());

        let mut m = DenseMatrix::with_dims(2, 3);
        assert_eq!(m.len(), 6);
        assert!(m.as_slice().iter().all(|&v| v == 0.0));

        set_to_constant_matrix(&mut m, 4.0);
        m.resize(3, 1);
        assert_eq!(m.dims(), (3, 1));
        assert_eq!(m.len(), 3);

        assert!(DenseMatrix::from_row_major(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_element_access() {
        let mut m = sequential(2, 3);
        assert_eq!(m.get(1, 2).unwrap(), 5.0);
        assert_eq!(m[(0, 1)], 1.0);

        *m.get_mut(1, 0).unwrap() = -1.0;
        m[(0, 0)] = 7.0;
        assert_eq!(m.as_slice(), &[7.0, 1.0, 2.0, -1.0, 4.0, 5.0]);

        assert!(m.get(2, 0).is_err());
        assert!(m.get(0, 3).is_err());
        assert!(m.get_mut(5, 5).is_err());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_out_of_bounds_panics() {
        let m = sequential(2, 2);
        let _ = m[(0, 2)];
    }

    #[test]
    fn test_set_row() {
        let mut m = DenseMatrix::with_dims(2, 3);
        m.set_row(1, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.row(1).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(m.row(0).unwrap(), &[0.0, 0.0, 0.0]);

        assert!(m.set_row(2, &[1.0, 2.0, 3.0]).is_err());
        assert!(m.set_row(0, &[1.0, 2.0]).is_err());
        assert!(m.row(2).is_err());
    }

    #[test]
    fn test_initializers() {
        let mut m = DenseMatrix::with_dims(3, 3);
        set_to_identity_matrix(&mut m);
        assert_eq!(m.to_array2(), Array2::<f64>::eye(3));

        let mut r = DenseMatrix::with_dims(2, 3);
        set_to_identity_matrix(&mut r);
        assert_eq!(r.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);

        let mut first = DenseMatrix::with_dims(4, 4);
        let mut second = DenseMatrix::with_dims(4, 4);
        set_to_random_matrix(&mut first, 1.0, 9).unwrap();
        set_to_random_matrix(&mut second, 1.0, 9).unwrap();
        assert_eq!(first, second);
        assert!(first.as_slice().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_identity_matrix_vector_multiply() {
        let mut identity = DenseMatrix::with_dims(3, 3);
        set_to_identity_matrix(&mut identity);
        let mut output = vec![0.0; 3];
        matrix_vector_multiply(&mut output, 1.0, &identity, &[1.0, 2.0, 3.0], Transpose::No)
            .unwrap();
        assert_eq!(output, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_matrix_vector_multiply_transpose() {
        let a = DenseMatrix::from(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let mut output = vec![9.0; 2];
        matrix_vector_multiply(&mut output, 2.0, &a, &[1.0, 0.0, 1.0], Transpose::No).unwrap();
        assert_eq!(output, vec![8.0, 20.0]);

        let mut output_t = vec![0.0; 3];
        matrix_vector_multiply(&mut output_t, 1.0, &a, &[1.0, 1.0], Transpose::Yes).unwrap();
        assert_eq!(output_t, vec![5.0, 7.0, 9.0]);

        assert!(matrix_vector_multiply(&mut output, 1.0, &a, &[1.0, 1.0], Transpose::No).is_err());
        assert!(
            matrix_vector_multiply(&mut output_t, 1.0, &a, &[1.0, 1.0, 1.0], Transpose::Yes)
                .is_err()
        );
    }

    #[test]
    fn test_symmetric_matrix_vector_multiply() {
        let a = DenseMatrix::from(array![[1.0, 2.0], [-50.0, 3.0]]);
        let mut output = vec![0.0; 2];
        symmetric_matrix_vector_multiply(&mut output, 1.0, &a, &[1.0, 2.0]).unwrap();
        assert_eq!(output, vec![5.0, 8.0]);

        let rect = DenseMatrix::with_dims(2, 3);
        assert!(symmetric_matrix_vector_multiply(&mut output, 1.0, &rect, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_matrix_matrix_multiply_options() {
        let a = DenseMatrix::from(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let b = DenseMatrix::from(array![[1.0, 0.0, 2.0], [0.0, 1.0, 1.0]]);

        let mut c = DenseMatrix::with_dims(3, 3);
        matrix_matrix_multiply(&mut c, &a, &b, "NN").unwrap();
        assert_eq!(
            c.to_array2(),
            array![[1.0, 2.0, 4.0], [3.0, 4.0, 10.0], [5.0, 6.0, 16.0]]
        );

        let mut gram = DenseMatrix::with_dims(2, 2);
        matrix_matrix_multiply(&mut gram, &a, &a, "TN").unwrap();
        assert_eq!(gram.to_array2(), array![[35.0, 44.0], [44.0, 56.0]]);

        let mut outer = DenseMatrix::with_dims(3, 3);
        matrix_matrix_multiply(&mut outer, &a, &a, "NT").unwrap();
        assert_eq!(outer[(0, 2)], 17.0);

        let mut tt = DenseMatrix::with_dims(3, 3);
        matrix_matrix_multiply(&mut tt, &b, &a, "TT").unwrap();
        let product = c.to_array2();
        assert_eq!(tt.to_array2(), product.t());

        assert!(matrix_matrix_multiply(&mut c, &a, &b, "TN").is_err());
        assert!(matrix_matrix_multiply(&mut gram, &a, &b, "NN").is_err());
        assert!(matrix_matrix_multiply(&mut c, &a, &b, "XY").is_err());
    }

    #[test]
    fn test_outer_products() {
        let mut a = DenseMatrix::with_dims(2, 3);
        outer_product_increment(&mut a, 2.0, &[1.0, 2.0], &[1.0, 0.0, -1.0]).unwrap();
        assert_eq!(a.to_array2(), array![[2.0, 0.0, -2.0], [4.0, 0.0, -4.0]]);
        assert!(outer_product_increment(&mut a, 1.0, &[1.0, 2.0, 3.0], &[1.0, 0.0, -1.0]).is_err());

        let mut s = DenseMatrix::with_dims(2, 2);
        symmetric_outer_product_increment(&mut s, 1.0, &[1.0, 2.0]).unwrap();
        assert_eq!(s.to_array2(), array![[1.0, 2.0], [0.0, 4.0]]);

        let mut s2 = DenseMatrix::with_dims(2, 2);
        symmetric_outer_product_increment_pair(&mut s2, 0.5, &[1.0, 2.0], &[3.0, 4.0]).unwrap();
        assert_eq!(s2.to_array2(), array![[3.0, 5.0], [0.0, 8.0]]);

        let mut rect = DenseMatrix::with_dims(2, 3);
        assert!(symmetric_outer_product_increment(&mut rect, 1.0, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_matrix_hadamard() {
        let a = DenseMatrix::from(array![[1.0, 2.0], [3.0, 4.0]]);
        let b = DenseMatrix::from(array![[5.0, 6.0], [7.0, 8.0]]);
        let mut c = DenseMatrix::with_dims(2, 2);
        matrix_hadamard(&mut c, 1.0, &a, &b).unwrap();
        assert_eq!(c.to_array2(), array![[5.0, 12.0], [21.0, 32.0]]);

        let mut wrong = DenseMatrix::with_dims(1, 4);
        assert!(matrix_hadamard(&mut wrong, 1.0, &a, &b).is_err());
    }

    #[test]
    fn test_matrix_increments_and_sign() {
        let mut a = DenseMatrix::from(array![[1.0, -2.0], [0.0, 4.0]]);
        let b = DenseMatrix::from(array![[2.0, 2.0], [2.0, 2.0]]);

        matrix_hadamard_increment(&mut a, 0.5, &b).unwrap();
        assert_eq!(a.to_array2(), array![[1.0, -2.0], [0.0, 4.0]]);

        matrix_increment(&mut a, -1.0, &b).unwrap();
        assert_eq!(a.to_array2(), array![[-1.0, -4.0], [-2.0, 2.0]]);

        let mut sgn = DenseMatrix::with_dims(2, 2);
        matrix_sgn(&mut sgn, &DenseMatrix::from(array![[3.0, 0.0], [-1.0, 2.0]])).unwrap();
        assert_eq!(sgn.to_array2(), array![[1.0, 0.0], [-1.0, 1.0]]);

        let wrong = DenseMatrix::with_dims(3, 2);
        assert!(matrix_increment(&mut a, 1.0, &wrong).is_err());
        assert!(matrix_hadamard_increment(&mut a, 1.0, &wrong).is_err());
    }

    #[test]
    fn test_mask_and_norms() {
        let mut m = DenseMatrix::from(array![[1.0, -2.0], [3.0, -4.0]]);
        assert_relative_eq!(matrix_l2(&m), 30.0);
        assert_relative_eq!(matrix_l1(&m), 10.0);

        matrix_mask(&mut m, &[1, 2]).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, -4.0]);
        assert_abs_diff_eq!(matrix_l2(&m), 17.0, epsilon = 1e-12);

        assert!(matrix_mask(&mut m, &[0, 4]).is_err());
        assert_eq!(m.as_slice()[0], 1.0);
    }

    #[test]
    fn test_to_sub_matrix() {
        let input = sequential(3, 3);
        let mut block = DenseMatrix::with_dims(2, 2);
        to_sub_matrix(&mut block, &input, 1, 1).unwrap();
        assert_eq!(block.to_array2(), array![[4.0, 5.0], [7.0, 8.0]]);

        let mut wide = DenseMatrix::with_dims(1, 3);
        to_sub_matrix(&mut wide, &input, 2, 0).unwrap();
        assert_eq!(wide.as_slice(), &[6.0, 7.0, 8.0]);

        assert!(to_sub_matrix(&mut block, &input, 2, 0).is_err());
        assert!(to_sub_matrix(&mut block, &input, 0, 2).is_err());
    }

    #[test]
    fn test_display() {
        let m = DenseMatrix::from(array![[1.0, 2.5], [-3.0, 4.0]]);
        assert_eq!(m.to_string(), "1 2.5\n-3 4\n");
        assert_eq!(DenseMatrix::new().to_string(), "");
    }

    #[test]
    fn test_ndarray_round_trip() {
        let array = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = DenseMatrix::from(&array);
        assert_eq!(m.dims(), (2, 3));
        assert_eq!(m.to_array2(), array);
        assert_eq!(m.view().unwrap(), array.view());

        let transposed = DenseMatrix::from(&array.t());
        assert_eq!(transposed.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    #[cfg(feature = "nalgebra")]
    fn test_nalgebra_round_trip() {
        let m = sequential(2, 3);
        let na = m.to_nalgebra();
        assert_eq!(na[(1, 0)], 3.0);
        assert_eq!(DenseMatrix::from(&na), m);
    }
}
