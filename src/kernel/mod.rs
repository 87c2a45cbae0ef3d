//! # Scalar kernel adapter
//!
//! Thin BLAS-style routines with fixed calling conventions: an explicit element
//! count, unit stride and borrowed buffers that are never retained past the call.
//! The level-1 routines operate on plain slices; the matrix routines take
//! `ndarray` views so they can be handed straight to `ndarray::linalg`.
//!
//! No validation happens here beyond what slicing implies. Callers check sizes
//! and report mismatches before delegating.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use ndarray::linalg::{general_mat_mul, general_mat_vec_mul};
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2, Zip};

/// Operand transposition selector, the `TRANS` argument of the BLAS routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    No,
    Yes,
}

impl Transpose {
    /// Parses a two-character option such as `"NT"` into the selectors for the
    /// left and right operand of a matrix product.
    pub fn parse_pair(option: &str) -> anyhow::Result<(Transpose, Transpose)> {
        let mut chars = option.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(left), Some(right), None) => {
                Ok((Transpose::try_from(left)?, Transpose::try_from(right)?))
            }
            _ => bail!(
                "Transpose option must have exactly two characters, got {:?}",
                option
            ),
        }
    }
}

impl TryFrom<char> for Transpose {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'N' | 'n' => Ok(Transpose::No),
            'T' | 't' | 'C' | 'c' => Ok(Transpose::Yes),
            other => Err(anyhow!("Unknown transpose selector {:?}", other)),
        }
    }
}

impl FromStr for Transpose {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Transpose::try_from(c),
            _ => bail!("Transpose selector must be a single character, got {:?}", s),
        }
    }
}

impl fmt::Display for Transpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transpose::No => write!(f, "N"),
            Transpose::Yes => write!(f, "T"),
        }
    }
}

/// `y[..n] := x[..n]`
pub fn copy(n: usize, x: &[f64], y: &mut [f64]) {
    ArrayViewMut1::from(&mut y[..n]).assign(&ArrayView1::from(&x[..n]));
}

/// `y[..n] += alpha * x[..n]`
pub fn axpy(n: usize, alpha: f64, x: &[f64], y: &mut [f64]) {
    ArrayViewMut1::from(&mut y[..n]).scaled_add(alpha, &ArrayView1::from(&x[..n]));
}

pub fn dot(n: usize, x: &[f64], y: &[f64]) -> f64 {
    ArrayView1::from(&x[..n]).dot(&ArrayView1::from(&y[..n]))
}

/// Symmetric band matrix-vector product with no off-diagonals, i.e. the matrix
/// is `diag(a)`: `y_i := alpha * a_i * x_i + beta * y_i`.
///
/// With `beta == 0` the previous content of `y` is not read, so stale NaNs in
/// the output do not leak into the result.
pub fn sbmv_diagonal(n: usize, alpha: f64, a: &[f64], x: &[f64], beta: f64, y: &mut [f64]) {
    let zip = Zip::from(&mut y[..n]).and(&a[..n]).and(&x[..n]);
    if beta == 0.0 {
        zip.for_each(|yi, &ai, &xi| *yi = alpha * ai * xi);
    } else {
        zip.for_each(|yi, &ai, &xi| *yi = alpha * ai * xi + beta * *yi);
    }
}

/// Sum of absolute values of `x[..n]`.
pub fn asum(n: usize, x: &[f64]) -> f64 {
    ArrayView1::from(&x[..n]).fold(0.0, |acc, v| acc + v.abs())
}

/// `y := alpha * op(a) x + beta * y`
pub fn gemv(
    trans: Transpose,
    alpha: f64,
    a: ArrayView2<'_, f64>,
    x: ArrayView1<'_, f64>,
    beta: f64,
    mut y: ArrayViewMut1<'_, f64>,
) {
    let a = match trans {
        Transpose::No => a,
        Transpose::Yes => a.reversed_axes(),
    };
    general_mat_vec_mul(alpha, &a, &x, beta, &mut y);
}

/// `c := alpha * op(a) op(b) + beta * c`
pub fn gemm(
    trans_a: Transpose,
    trans_b: Transpose,
    alpha: f64,
    a: ArrayView2<'_, f64>,
    b: ArrayView2<'_, f64>,
    beta: f64,
    mut c: ArrayViewMut2<'_, f64>,
) {
    let a = match trans_a {
        Transpose::No => a,
        Transpose::Yes => a.reversed_axes(),
    };
    let b = match trans_b {
        Transpose::No => b,
        Transpose::Yes => b.reversed_axes(),
    };
    general_mat_mul(alpha, &a, &b, beta, &mut c);
}

/// Rank-1 update `a += alpha * x yᵀ`.
pub fn ger(alpha: f64, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, mut a: ArrayViewMut2<'_, f64>) {
    Zip::from(a.rows_mut())
        .and(&x)
        .for_each(|mut row, &xi| row.scaled_add(alpha * xi, &y));
}

/// `y := alpha * a x + beta * y` for symmetric `a`, reading only the upper
/// triangle (`col >= row`).
pub fn symv_upper(
    alpha: f64,
    a: ArrayView2<'_, f64>,
    x: ArrayView1<'_, f64>,
    beta: f64,
    mut y: ArrayViewMut1<'_, f64>,
) {
    let n = a.nrows();
    for i in 0..n {
        let mut acc = 0.0;
        for j in 0..n {
            let aij = if j >= i { a[[i, j]] } else { a[[j, i]] };
            acc += aij * x[j];
        }
        y[i] = if beta == 0.0 {
            alpha * acc
        } else {
            alpha * acc + beta * y[i]
        };
    }
}

/// Symmetric rank-1 update `a += alpha * x xᵀ` on the upper triangle.
pub fn syr_upper(alpha: f64, x: ArrayView1<'_, f64>, mut a: ArrayViewMut2<'_, f64>) {
    let n = x.len();
    for i in 0..n {
        let scaled = alpha * x[i];
        for j in i..n {
            a[[i, j]] += scaled * x[j];
        }
    }
}

/// Symmetric rank-2 update `a += alpha * (x yᵀ + y xᵀ)` on the upper triangle.
pub fn syr2_upper(
    alpha: f64,
    x: ArrayView1<'_, f64>,
    y: ArrayView1<'_, f64>,
    mut a: ArrayViewMut2<'_, f64>,
) {
    let n = x.len();
    for i in 0..n {
        for j in i..n {
            a[[i, j]] += alpha * (x[i] * y[j] + y[i] * x[j]);
        }
    }
}
