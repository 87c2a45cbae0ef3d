//! # Cross-rank synchronization
//!
//! A container is replicated by value from one designated source rank to every
//! other participating rank. The communication layer is abstracted behind
//! [`Communicator`]; each container sync issues exactly two collectives, the
//! dimension metadata first and the payload second.

use anyhow::{bail, Context};
use log::debug;

use crate::dense::DVec;
use crate::utils::ZeroVec;

mod local;
pub use local::{LocalEndpoint, LocalGroup};

/// Blocking broadcast primitives of a distributed communication layer.
///
/// Every participating rank must call the same sequence of collectives with
/// the same `source`. On return, every rank's buffer holds the source rank's
/// values. A failure is reported to the caller and never retried.
pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn sync_dims(&self, dims: &mut [usize], source: usize) -> anyhow::Result<()>;

    fn sync_values(&self, values: &mut [f64], source: usize) -> anyhow::Result<()>;
}

/// Communicator for a run with a single rank. Every sync is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProcess;

impl SingleProcess {
    fn check_source(source: usize) -> anyhow::Result<()> {
        if source != 0 {
            bail!("Source rank {} does not exist in a single-process run", source);
        }
        Ok(())
    }
}

impl Communicator for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn sync_dims(&self, _dims: &mut [usize], source: usize) -> anyhow::Result<()> {
        Self::check_source(source)
    }

    fn sync_values(&self, _values: &mut [f64], source: usize) -> anyhow::Result<()> {
        Self::check_source(source)
    }
}

/// Replicates the length and contents of rank `source`'s vector onto every
/// rank of `comm`.
pub fn sync_vector<C: Communicator + ?Sized>(
    vector: &mut DVec,
    source: usize,
    comm: &C,
) -> anyhow::Result<()> {
    let mut dim = [vector.len()];
    comm.sync_dims(&mut dim, source)
        .context("Failed to synchronize vector length")?;
    if comm.rank() != source {
        vector.zero_len(dim[0]);
    }
    comm.sync_values(vector, source)
        .context("Failed to synchronize vector values")?;
    debug!(
        "Rank {} holds {} values after sync from rank {}",
        comm.rank(),
        vector.len(),
        source
    );
    Ok(())
}
