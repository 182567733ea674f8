use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock split of one run, in seconds.
///
/// `compute_s` spans scatter, kernel pass and gather on the root; `total_s`
/// spans load through store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTimings {
    pub compute_s: f64,
    pub total_s: f64,
}

impl PhaseTimings {
    /// Time spent outside the distributed phase (load, store, setup).
    pub fn serial_s(&self) -> f64 {
        (self.total_s - self.compute_s).max(0.0)
    }

    /// Report lines printed by the coordinating unit.
    pub fn report_lines(&self) -> [String; 3] {
        [
            format!("Total P Time: {:.6}s", self.compute_s),
            format!("Total S Time: {:.6}s", self.serial_s()),
            format!("Total S + P Time: {:.6}s", self.total_s),
        ]
    }
}

/// Seconds elapsed since `start`.
pub(crate) fn seconds_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64()
}
