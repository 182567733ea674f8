//! Halo-padded working block.
//!
//! A worker's local block surrounded by a one-pixel ring, `(rows+2) x (cols+2)`.
//! The ring is zero-filled and is never populated with neighbor data: no
//! boundary exchange happens between workers. The kernel therefore sees zeros
//! beyond every block edge, so mask pixels on the first and last row of each
//! block (and on the first and last column of the image) are computed against
//! zero neighbors rather than the true image. Callers comparing against a
//! single-block run must expect differences on those rows.
use crate::error::{Result, SobelError};
use crate::image::{ImageF32, ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq)]
pub struct HaloBlock {
    rows: usize,
    cols: usize,
    buf: ImageF32,
}

impl HaloBlock {
    /// Halo buffer for a `rows x cols` block, everything zero.
    pub fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            buf: ImageF32::new(cols + 2, rows + 2),
        }
    }

    /// Copy `block` into the interior; the ring stays zero.
    pub fn from_block(block: &ImageF32) -> Self {
        let mut halo = Self::zeroed(block.h, block.w);
        for y in 0..block.h {
            halo.buf.row_mut(y + 1)[1..=block.w].copy_from_slice(block.row(y));
        }
        halo
    }

    /// Build directly from the flat row-major chunk a scatter delivers.
    pub fn from_chunk(rows: usize, cols: usize, chunk: &[f32]) -> Result<Self> {
        let block = ImageF32::from_vec(cols, rows, chunk.to_vec())?;
        Ok(Self::from_block(&block))
    }

    /// Interior rows (the local block height).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Interior columns (the local block width).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at halo coordinates; `(1, 1)` is the block's first pixel.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.buf.get(row, col)
    }

    pub fn set(&mut self, row: usize, col: usize, v: f32) -> Result<()> {
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return Err(SobelError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.buf.set(row, col, v)
    }

    /// The 3x3 neighborhood centred on interior cell `(row, col)`.
    pub fn neighborhood(&self, row: usize, col: usize) -> Option<[[f32; 3]; 3]> {
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return None;
        }
        let mut out = [[0.0; 3]; 3];
        for (dy, out_row) in out.iter_mut().enumerate() {
            let src = self.buf.row(row + dy - 1);
            out_row.copy_from_slice(&src[col - 1..=col + 1]);
        }
        Some(out)
    }

    /// Three consecutive padded rows centred on interior row `row`.
    pub(crate) fn row_triplet(&self, row: usize) -> [&[f32]; 3] {
        [
            self.buf.row(row - 1),
            self.buf.row(row),
            self.buf.row(row + 1),
        ]
    }

    /// True when every ring cell is still zero.
    pub fn ring_is_zero(&self) -> bool {
        let last_row = self.rows + 1;
        let last_col = self.cols + 1;
        let edge_rows = self.buf.row(0).iter().chain(self.buf.row(last_row));
        let edge_cols = (1..=self.rows).flat_map(|y| {
            let r = self.buf.row(y);
            [r[0], r[last_col]]
        });
        edge_rows.copied().chain(edge_cols).all(|v| v == 0.0)
    }

    /// Copy the interior back out as a plain block.
    pub fn interior(&self) -> ImageF32 {
        let mut out = ImageF32::new(self.cols, self.rows);
        for y in 0..self.rows {
            out.row_mut(y)
                .copy_from_slice(&self.buf.row(y + 1)[1..=self.cols]);
        }
        out
    }
}
