//! Scatter, per-block kernel pass, gather.
//!
//! Every unit calls [`ExchangeCoordinator::exchange`] with the same
//! partition. The root passes the global image; the others pass `None`. The
//! steps are strictly ordered:
//!
//! 1. collective scatter of `block_rows * W` elements per unit, rank order;
//! 2. each unit wraps its block in a zero-ringed [`HaloBlock`] and runs the
//!    kernel on it without talking to anyone;
//! 3. collective gather of the output blocks back to the root at the offsets
//!    they were scattered from.
//!
//! No halo rows travel between neighboring units, so the rows on either side
//! of a block boundary are computed against zeros.
use crate::comm::Communicator;
use crate::edges::BlockKernel;
use crate::error::{Result, SobelError};
use crate::halo::HaloBlock;
use crate::image::ImageF32;
use crate::partition::RowPartition;

pub struct ExchangeCoordinator<'k, K: BlockKernel> {
    partition: RowPartition,
    kernel: &'k K,
}

impl<'k, K: BlockKernel> ExchangeCoordinator<'k, K> {
    pub fn new(partition: RowPartition, kernel: &'k K) -> Self {
        Self { partition, kernel }
    }

    pub fn partition(&self) -> &RowPartition {
        &self.partition
    }

    /// Check that the world has exactly as many units as the partition has workers.
    pub fn check_world(&self, comm: &Communicator<'_>) -> Result<()> {
        if comm.size() != self.partition.workers() {
            return Err(SobelError::config(format!(
                "configured for {} workers but {} units are running",
                self.partition.workers(),
                comm.size()
            )));
        }
        Ok(())
    }

    /// Run the three phases on this unit; returns the reassembled image on the root.
    pub fn exchange(
        &self,
        comm: &Communicator<'_>,
        global: Option<&ImageF32>,
    ) -> Result<Option<ImageF32>> {
        self.check_world(comm)?;
        let part = &self.partition;

        let send = match global {
            Some(image) if comm.is_root() => {
                if (image.w, image.h) != (part.width(), part.height()) {
                    let err = SobelError::config(format!(
                        "global image is {}x{}, partition expects {}x{}",
                        image.w,
                        image.h,
                        part.width(),
                        part.height()
                    ));
                    comm.abort(err.to_string());
                    return Err(err);
                }
                Some(image.data.as_slice())
            }
            _ => None,
        };

        let local = comm.scatter(send, part.block_len())?;
        let halo = HaloBlock::from_chunk(part.block_rows(), part.width(), &local)?;
        let rows = part.rows_for(comm.rank());
        log::debug!(
            "unit {} owns rows {}..{} ({}x{} halo buffer)",
            comm.rank(),
            rows.start,
            rows.end,
            halo.rows() + 2,
            halo.cols() + 2
        );

        let block = self.kernel.apply(&halo);
        debug_assert_eq!((block.w, block.h), (part.width(), part.block_rows()));

        comm.gather(block.into_vec())?
            .map(|data| ImageF32::from_vec(part.width(), part.height(), data))
            .transpose()
    }
}
