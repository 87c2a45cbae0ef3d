pub mod dense;
pub mod kernel;
pub mod packing;
pub mod random;
pub mod sync;
mod utils;

pub use dense::{DVec, DenseMatrix};
pub use kernel::Transpose;
pub use sync::Communicator;
pub use utils::ZeroVec;
