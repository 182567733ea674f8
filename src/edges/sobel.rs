//! Thresholded Sobel gradient magnitude.
//!
//! For an interior cell `(i, j)` of a halo block the 3×3 neighborhood `p` is
//! weighted by two kernels (rows are `i-1, i, i+1`, columns `j-1, j, j+1`):
//!
//! ```text
//!   Gh                Gv
//!   -1 -2 -1          -1  0  1
//!    0  0  0          -2  0  2
//!    1  2  1          -1  0  1
//! ```
//!
//! `magnitude = sqrt(Gh² + Gv²)`; the cell becomes [`EDGE`] when
//! `magnitude >= threshold` and [`BACKGROUND`] otherwise. Pixels next to the
//! halo ring see zeros there (see [`crate::halo`]).
use super::BlockKernel;
use crate::halo::HaloBlock;
use crate::image::ImageF32;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type Kernel3 = [[f32; 3]; 3];

const KERNEL_H: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];
const KERNEL_V: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

pub const DEFAULT_THRESHOLD: f32 = 100.0;
pub const EDGE: f32 = 255.0;
pub const BACKGROUND: f32 = 0.0;

/// Sobel responses at one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    pub gh: f32,
    pub gv: f32,
}

impl Gradient {
    /// Apply both kernels to a 3×3 neighborhood.
    #[inline]
    pub fn from_neighborhood(n: &Kernel3) -> Self {
        let mut gh = 0.0;
        let mut gv = 0.0;
        for (dy, row) in n.iter().enumerate() {
            for (dx, &p) in row.iter().enumerate() {
                gh += KERNEL_H[dy][dx] * p;
                gv += KERNEL_V[dy][dx] * p;
            }
        }
        Self { gh, gv }
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        (self.gh * self.gh + self.gv * self.gv).sqrt()
    }
}

/// Binary decision; a magnitude equal to the threshold counts as an edge.
#[inline]
pub fn classify(magnitude: f32, threshold: f32) -> f32 {
    if magnitude < threshold {
        BACKGROUND
    } else {
        EDGE
    }
}

/// Gradient at interior cell `(row, col)` of `halo`, `None` on the ring or outside.
pub fn gradient_at(halo: &HaloBlock, row: usize, col: usize) -> Option<Gradient> {
    halo.neighborhood(row, col)
        .map(|n| Gradient::from_neighborhood(&n))
}

/// Edge-mask kernel over a whole halo block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SobelEdgeKernel {
    pub threshold: f32,
}

impl Default for SobelEdgeKernel {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SobelEdgeKernel {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Fill one output row from halo row `row` (1-based interior index).
    fn fill_row(&self, halo: &HaloBlock, row: usize, out: &mut [f32]) {
        let [above, centre, below] = halo.row_triplet(row);
        for (j, px) in (1..=out.len()).zip(out.iter_mut()) {
            let n = [
                [above[j - 1], above[j], above[j + 1]],
                [centre[j - 1], centre[j], centre[j + 1]],
                [below[j - 1], below[j], below[j + 1]],
            ];
            *px = classify(Gradient::from_neighborhood(&n).magnitude(), self.threshold);
        }
    }
}

impl BlockKernel for SobelEdgeKernel {
    fn apply(&self, halo: &HaloBlock) -> ImageF32 {
        let mut mask = ImageF32::new(halo.cols(), halo.rows());
        if mask.is_empty() {
            return mask;
        }
        let w = mask.w;

        #[cfg(feature = "parallel")]
        mask.data
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, out)| self.fill_row(halo, y + 1, out));

        #[cfg(not(feature = "parallel"))]
        mask.data
            .chunks_mut(w)
            .enumerate()
            .for_each(|(y, out)| self.fill_row(halo, y + 1, out));

        mask
    }
}
