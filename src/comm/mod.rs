//! In-process SPMD world: one OS thread per unit, two collectives.
//!
//! [`World::run`] starts `size` units that all execute the same closure with
//! their own [`Communicator`]. Units share nothing but a mailbox of one slot
//! per rank, and they synchronize only inside [`Communicator::scatter`],
//! [`Communicator::gather`] and [`Communicator::barrier`].
//!
//! A unit that returns an error or panics aborts the world, so peers blocked
//! in a collective get [`SobelError::Aborted`] instead of waiting forever.
mod rendezvous;

use crate::error::{Result, SobelError};
use parking_lot::Mutex;
use rendezvous::Rendezvous;

/// Rank of the coordinating unit: it owns the global buffer in both collectives.
pub const ROOT: usize = 0;

struct Shared {
    size: usize,
    slots: Mutex<Vec<Option<Vec<f32>>>>,
    rendezvous: Rendezvous,
}

/// Handle given to each unit.
pub struct Communicator<'w> {
    rank: usize,
    shared: &'w Shared,
}

impl Communicator<'_> {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.shared.size
    }

    pub fn is_root(&self) -> bool {
        self.rank == ROOT
    }

    /// Wait for every unit.
    pub fn barrier(&self) -> Result<()> {
        self.shared.rendezvous.wait()
    }

    /// Tear down the world; peers in or entering a collective get `Aborted`.
    pub fn abort(&self, reason: impl Into<String>) {
        self.shared.rendezvous.abort(reason);
    }

    /// Distribute `chunk_len` elements to every unit in rank order.
    ///
    /// The root passes the full buffer (`size * chunk_len` elements); other
    /// units pass `None`. Returns this unit's chunk once every unit has
    /// reached the call.
    pub fn scatter(&self, send: Option<&[f32]>, chunk_len: usize) -> Result<Vec<f32>> {
        if self.is_root() {
            let expected = chunk_len * self.size();
            let buf = match send {
                Some(buf) if buf.len() == expected => buf,
                other => {
                    let err = SobelError::config(format!(
                        "scatter root buffer has {} elements, expected {expected}",
                        other.map_or(0, <[f32]>::len)
                    ));
                    self.abort(err.to_string());
                    return Err(err);
                }
            };
            let mut slots = self.shared.slots.lock();
            for (slot, chunk) in slots.iter_mut().zip(buf.chunks_exact(chunk_len.max(1))) {
                *slot = Some(chunk.to_vec());
            }
            if chunk_len == 0 {
                slots.iter_mut().for_each(|slot| *slot = Some(Vec::new()));
            }
        }
        self.barrier()?;

        let chunk = self.shared.slots.lock()[self.rank]
            .take()
            .ok_or_else(|| SobelError::Aborted(format!("no chunk for unit {}", self.rank)))?;
        log::debug!("unit {} received {} elements", self.rank, chunk.len());
        Ok(chunk)
    }

    /// Collect every unit's block on the root, concatenated in rank order.
    ///
    /// Returns `Some(global)` on the root and `None` elsewhere, after every
    /// unit has contributed.
    pub fn gather(&self, local: Vec<f32>) -> Result<Option<Vec<f32>>> {
        self.shared.slots.lock()[self.rank] = Some(local);
        self.barrier()?;
        if !self.is_root() {
            return Ok(None);
        }

        let mut slots = self.shared.slots.lock();
        let total = slots.iter().flatten().map(Vec::len).sum();
        let mut global = Vec::with_capacity(total);
        for (rank, slot) in slots.iter_mut().enumerate() {
            let block = slot
                .take()
                .ok_or_else(|| SobelError::Aborted(format!("unit {rank} sent no block")))?;
            global.extend_from_slice(&block);
        }
        log::debug!("root gathered {} elements from {} units", total, self.size());
        Ok(Some(global))
    }
}

/// Aborts the world if its unit unwinds.
struct AbortOnPanic<'w> {
    rank: usize,
    shared: &'w Shared,
}

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.shared
                .rendezvous
                .abort(format!("unit {} panicked", self.rank));
        }
    }
}

/// A fixed set of units running the same program.
#[derive(Clone, Copy, Debug)]
pub struct World {
    size: usize,
}

impl World {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SobelError::config("a world needs at least one unit"));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `program` on every unit and return the per-rank results in rank order.
    pub fn run<T, F>(&self, program: F) -> Vec<Result<T>>
    where
        T: Send,
        F: Fn(&Communicator<'_>) -> Result<T> + Sync,
    {
        let shared = Shared {
            size: self.size,
            slots: Mutex::new(vec![None; self.size]),
            rendezvous: Rendezvous::new(self.size),
        };
        let shared = &shared;
        let program = &program;

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..self.size)
                .map(|rank| {
                    s.spawn(move || {
                        let _guard = AbortOnPanic { rank, shared };
                        let comm = Communicator { rank, shared };
                        let result = program(&comm);
                        if let Err(err) = &result {
                            if !shared.rendezvous.is_aborted() {
                                log::warn!("unit {rank} failed: {err}");
                            }
                            shared.rendezvous.abort(format!("unit {rank} failed: {err}"));
                        }
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(rank, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(SobelError::Aborted(format!("unit {rank} panicked"))))
                })
                .collect()
        })
    }
}
