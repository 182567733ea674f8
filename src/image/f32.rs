//! Owned single-channel f32 raster in row-major layout (stride == width).
//!
//! Used for the global image, the per-worker blocks and the halo buffers.
//! Element access is `(row, col)`; the checked accessors return `None` or an
//! error instead of reading past the buffer.
use crate::error::{Result, SobelError};

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Width in pixels (columns)
    pub w: usize,
    /// Height in pixels (rows)
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Wrap an existing row-major buffer, checking its length.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != w * h {
            return Err(SobelError::config(format!(
                "buffer of {} elements cannot hold a {w}x{h} image",
                data.len()
            )));
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    /// Convert (row, col) to a linear index into `data`.
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.stride + col
    }

    #[inline]
    fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.h && col < self.w
    }

    #[inline]
    /// Pixel at (row, col), or `None` outside the image.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.in_bounds(row, col)
            .then(|| self.data[self.idx(row, col)])
    }

    /// Write the pixel at (row, col).
    pub fn set(&mut self, row: usize, col: usize, v: f32) -> Result<()> {
        if !self.in_bounds(row, col) {
            return Err(SobelError::OutOfBounds {
                row,
                col,
                rows: self.h,
                cols: self.w,
            });
        }
        let i = self.idx(row, col);
        self.data[i] = v;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.w * self.h
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[f32]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
