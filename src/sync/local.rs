use std::sync::{Arc, Barrier};

use anyhow::{anyhow, bail};
use log::debug;
use parking_lot::Mutex;

use super::Communicator;

#[derive(Default)]
struct Payload {
    dims: Vec<usize>,
    values: Vec<f64>,
}

fn dims_slot(payload: &mut Payload) -> &mut Vec<usize> {
    &mut payload.dims
}

fn values_slot(payload: &mut Payload) -> &mut Vec<f64> {
    &mut payload.values
}

struct Shared {
    size: usize,
    barrier: Barrier,
    slot: Mutex<Payload>,
}

/// A group of ranks living in one process, typically one thread per rank.
pub struct LocalGroup {
    endpoints: Vec<LocalEndpoint>,
}

impl LocalGroup {
    pub fn new(size: usize) -> anyhow::Result<Self> {
        if size == 0 {
            bail!("A communicator group needs at least one rank");
        }
        let shared = Arc::new(Shared {
            size,
            barrier: Barrier::new(size),
            slot: Mutex::new(Payload::default()),
        });
        let endpoints = (0..size)
            .map(|rank| LocalEndpoint {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect();
        Ok(LocalGroup { endpoints })
    }

    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    /// One endpoint per rank, ordered by rank.
    pub fn into_endpoints(self) -> Vec<LocalEndpoint> {
        self.endpoints
    }
}

/// The handle a single rank of a [`LocalGroup`] communicates through.
pub struct LocalEndpoint {
    rank: usize,
    shared: Arc<Shared>,
}

impl LocalEndpoint {
    fn broadcast<T: Copy>(
        &self,
        buffer: &mut [T],
        source: usize,
        slot: fn(&mut Payload) -> &mut Vec<T>,
    ) -> anyhow::Result<()> {
        // every rank sees the same source, so they all bail before blocking
        if source >= self.shared.size {
            bail!(
                "Source rank {} does not exist in a group of {} ranks",
                source,
                self.shared.size
            );
        }

        if self.rank == source {
            debug!("Rank {} broadcasting {} elements", self.rank, buffer.len());
            let mut payload = self.shared.slot.lock();
            let published = slot(&mut payload);
            published.clear();
            published.extend_from_slice(buffer);
        }
        self.shared.barrier.wait();

        let result = if self.rank == source {
            Ok(())
        } else {
            let mut payload = self.shared.slot.lock();
            let published = slot(&mut payload);
            if published.len() == buffer.len() {
                buffer.copy_from_slice(published);
                Ok(())
            } else {
                Err(anyhow!(
                    "Rank {} expected {} elements but rank {} sent {}",
                    self.rank,
                    buffer.len(),
                    source,
                    published.len()
                ))
            }
        };
        // the slot may only be reused once every rank has read it
        self.shared.barrier.wait();
        result
    }
}

impl Communicator for LocalEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn sync_dims(&self, dims: &mut [usize], source: usize) -> anyhow::Result<()> {
        self.broadcast(dims, source, dims_slot)
    }

    fn sync_values(&self, values: &mut [f64], source: usize) -> anyhow::Result<()> {
        self.broadcast(values, source, values_slot)
    }
}
