#![allow(dead_code)]

pub mod synthetic_image;

use halo_sobel::image::io::RasterIo;
use halo_sobel::image::ImageF32;
use halo_sobel::{Result, SobelError};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// In-memory raster collaborator: serves one input, records every write.
pub struct MemoryRaster {
    input: ImageF32,
    pub written: Mutex<Vec<(PathBuf, ImageF32)>>,
}

impl MemoryRaster {
    pub fn new(input: ImageF32) -> Self {
        Self {
            input,
            written: Mutex::new(Vec::new()),
        }
    }

    pub fn last_output(&self) -> Option<ImageF32> {
        self.written.lock().last().map(|(_, img)| img.clone())
    }
}

impl RasterIo for MemoryRaster {
    fn read_image(&self, path: &Path, expected: (usize, usize)) -> Result<ImageF32> {
        if (self.input.w, self.input.h) != expected {
            return Err(SobelError::SizeMismatch {
                path: path.to_path_buf(),
                found: (self.input.w, self.input.h),
                expected,
            });
        }
        Ok(self.input.clone())
    }

    fn write_image(&self, path: &Path, image: &ImageF32) -> Result<()> {
        self.written
            .lock()
            .push((path.to_path_buf(), image.clone()));
        Ok(())
    }
}
