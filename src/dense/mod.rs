//! Dense containers: flat `f64` vectors and row-major matrices, plus the
//! element-wise, reduction and product kernels defined on them.

pub mod matrix;
pub mod vector;

pub use matrix::*;
pub use vector::*;

/// A dense vector. Operations borrow it as `&[f64]` / `&mut [f64]`.
pub type DVec = Vec<f64>;

/// Tile width of the in-place Hadamard update. Has no effect on results.
pub const HADAMARD_BLOCK: usize = 64;

/// Triangle read and written by the symmetric kernels.
pub const UPLO: char = 'U';
