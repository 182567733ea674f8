#![doc = include_str!("../README.md")]

// Core pipeline, leaves first.
pub mod partition;
pub mod halo;
pub mod edges;
pub mod exchange;
pub mod pipeline;

// Supporting modules.
pub mod comm;
pub mod config;
pub mod error;
pub mod image;
pub mod timing;

// --- High-level re-exports -------------------------------------------------

pub use crate::config::{load_config, EdgeToolConfig, PipelineConfig};
pub use crate::error::{Result, SobelError};
pub use crate::pipeline::{EdgePipeline, RunReport};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use halo_sobel::prelude::*;
/// use std::path::PathBuf;
///
/// # fn main() -> halo_sobel::Result<()> {
/// let config = PipelineConfig {
///     input: PathBuf::from("edge360x250.pgm"),
///     output: PathBuf::from("image360x250.pgm"),
///     width: 360,
///     height: 250,
///     workers: 5,
///     units: None,
///     threshold: 100.0,
/// };
/// let report = EdgePipeline::new(config, FileRaster).run()?;
/// println!("edges={} compute_s={:.6}", report.edge_pixels, report.timings.compute_s);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::io::FileRaster;
    pub use crate::image::ImageF32;
    pub use crate::{EdgePipeline, PipelineConfig, RunReport};
}
