//! Pipeline driver: load -> scatter -> kernel -> gather -> store.
//!
//! The driver validates the configuration, starts one unit per configured
//! rank and runs the same program on each. Only the coordinating unit
//! (rank 0) reads, writes and times; the others just take part in the two
//! collectives. Any unit's error aborts the whole run and no output is
//! written after a failure.
use crate::comm::{Communicator, World};
use crate::config::PipelineConfig;
use crate::edges::{SobelEdgeKernel, EDGE};
use crate::error::{Result, SobelError};
use crate::exchange::ExchangeCoordinator;
use crate::image::io::RasterIo;
use crate::partition::RowPartition;
use crate::timing::{seconds_since, PhaseTimings};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Summary of a successful run, produced by the coordinating unit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub width: usize,
    pub height: usize,
    pub workers: usize,
    pub block_rows: usize,
    pub threshold: f32,
    pub output: PathBuf,
    /// Pixels set to 255 in the output mask.
    pub edge_pixels: usize,
    pub timings: PhaseTimings,
}

pub struct EdgePipeline<R: RasterIo> {
    config: PipelineConfig,
    raster: R,
}

impl<R: RasterIo> EdgePipeline<R> {
    pub fn new(config: PipelineConfig, raster: R) -> Self {
        Self { config, raster }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn raster(&self) -> &R {
        &self.raster
    }

    /// Run every unit to completion and return the coordinator's report.
    pub fn run(&self) -> Result<RunReport> {
        let partition = self.config.validate()?;
        let world = World::new(self.config.unit_count())?;
        let kernel = SobelEdgeKernel::new(self.config.threshold);
        let coordinator = ExchangeCoordinator::new(partition, &kernel);
        log::info!(
            "starting {} units for a {}x{} image ({} rows per block)",
            world.size(),
            partition.width(),
            partition.height(),
            partition.block_rows()
        );

        let results = world.run(|comm| self.run_unit(comm, &coordinator));
        collect_report(results)
    }

    fn run_unit(
        &self,
        comm: &Communicator<'_>,
        coordinator: &ExchangeCoordinator<'_, SobelEdgeKernel>,
    ) -> Result<Option<RunReport>> {
        coordinator.check_world(comm)?;

        let total_start = Instant::now();
        let global = if comm.is_root() {
            let part = coordinator.partition();
            let image = self
                .raster
                .read_image(&self.config.input, (part.width(), part.height()))?;
            log::info!(
                "loaded {} (width {}, height {}, processors {})",
                self.config.input.display(),
                image.w,
                image.h,
                part.workers()
            );
            Some(image)
        } else {
            None
        };

        let compute_start = Instant::now();
        let gathered = coordinator.exchange(comm, global.as_ref())?;
        let compute_s = seconds_since(compute_start);

        let Some(mask) = gathered else {
            return Ok(None);
        };
        drop(global);

        self.raster.write_image(&self.config.output, &mask)?;
        let timings = PhaseTimings {
            compute_s,
            total_s: seconds_since(total_start),
        };
        log::info!("wrote {}", self.config.output.display());

        Ok(Some(self.report(coordinator.partition(), &mask.data, timings)))
    }

    fn report(&self, part: &RowPartition, mask: &[f32], timings: PhaseTimings) -> RunReport {
        RunReport {
            width: part.width(),
            height: part.height(),
            workers: part.workers(),
            block_rows: part.block_rows(),
            threshold: self.config.threshold,
            output: self.config.output.clone(),
            edge_pixels: mask.iter().filter(|&&v| v == EDGE).count(),
            timings,
        }
    }
}

/// Pick the coordinator's report, or the root cause among unit errors.
fn collect_report(results: Vec<Result<Option<RunReport>>>) -> Result<RunReport> {
    let mut report = None;
    let mut aborted = None;
    for result in results {
        match result {
            Ok(Some(r)) => report = Some(r),
            Ok(None) => {}
            Err(err @ SobelError::Aborted(_)) => {
                aborted.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }
    match (report, aborted) {
        (_, Some(err)) => Err(err),
        (Some(r), None) => Ok(r),
        (None, None) => Err(SobelError::Aborted(
            "coordinating unit produced no report".to_string(),
        )),
    }
}
