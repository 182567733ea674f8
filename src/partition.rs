//! Row-block decomposition of the global image.
//!
//! Worker `r` of `P` owns the contiguous rows `[r*(H/P), (r+1)*(H/P))` at full
//! width. Only the row axis is split; `H` must be a multiple of `P`.
use crate::error::{Result, SobelError};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowPartition {
    height: usize,
    width: usize,
    workers: usize,
}

/// Where a global pixel lives after partitioning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalCoord {
    pub worker: usize,
    pub row: usize,
    pub col: usize,
}

impl RowPartition {
    pub fn new(height: usize, width: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(SobelError::config("worker count must be at least 1"));
        }
        if height == 0 || width == 0 {
            return Err(SobelError::config(format!(
                "image must be non-empty, got {width}x{height}"
            )));
        }
        if height % workers != 0 {
            return Err(SobelError::config(format!(
                "image height {height} is not divisible by worker count {workers}"
            )));
        }
        Ok(Self {
            height,
            width,
            workers,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Rows in every block (`H / P`).
    pub fn block_rows(&self) -> usize {
        self.height / self.workers
    }

    /// Elements in every block (`block_rows * W`), the scatter/gather chunk.
    pub fn block_len(&self) -> usize {
        self.block_rows() * self.width
    }

    /// Global row range owned by `worker`.
    pub fn rows_for(&self, worker: usize) -> Range<usize> {
        let n = self.block_rows();
        worker * n..(worker + 1) * n
    }

    /// Map a global pixel to its owner and block-local coordinates.
    pub fn locate(&self, row: usize, col: usize) -> Option<LocalCoord> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let n = self.block_rows();
        Some(LocalCoord {
            worker: row / n,
            row: row % n,
            col,
        })
    }

    /// Inverse of [`locate`](Self::locate).
    pub fn to_global(&self, local: LocalCoord) -> Option<(usize, usize)> {
        if local.worker >= self.workers || local.row >= self.block_rows() || local.col >= self.width
        {
            return None;
        }
        Some((local.worker * self.block_rows() + local.row, local.col))
    }
}
