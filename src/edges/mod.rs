//! Per-block edge kernels.
//!
//! A kernel consumes one worker's halo-padded block and produces the block it
//! contributes to the gather. The production kernel is the thresholded Sobel
//! magnitude in [`sobel`]; [`IdentityKernel`] passes the interior through
//! unchanged and is used to check scatter/gather on their own.

pub mod sobel;

use crate::halo::HaloBlock;
use crate::image::ImageF32;

pub use sobel::{
    classify, gradient_at, Gradient, SobelEdgeKernel, BACKGROUND, DEFAULT_THRESHOLD, EDGE,
};

/// Transforms a halo-padded block into an output block of the same interior size.
pub trait BlockKernel: Sync {
    fn apply(&self, halo: &HaloBlock) -> ImageF32;
}

/// Returns the block interior untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityKernel;

impl BlockKernel for IdentityKernel {
    fn apply(&self, halo: &HaloBlock) -> ImageF32 {
        halo.interior()
    }
}
