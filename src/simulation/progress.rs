//! Progress reporting for simulation runs.
//!
//! The engine calls [`ProgressObserver::on_progress`] synchronously after every
//! completed trial with the completed fraction in `(0, 1]`. An observer error
//! aborts the run.

use tracing::info;

use crate::error::ProgressError;

pub trait ProgressObserver {
    fn on_progress(&mut self, fraction: f64) -> Result<(), ProgressError>;
}

impl<F> ProgressObserver for F
where
    F: FnMut(f64) -> Result<(), ProgressError>,
{
    fn on_progress(&mut self, fraction: f64) -> Result<(), ProgressError> {
        self(fraction)
    }
}

/// Ignores every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&mut self, _fraction: f64) -> Result<(), ProgressError> {
        Ok(())
    }
}

/// Keeps every reported fraction, in call order
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub fractions: Vec<f64>,
}

impl ProgressObserver for RecordingProgress {
    fn on_progress(&mut self, fraction: f64) -> Result<(), ProgressError> {
        self.fractions.push(fraction);
        Ok(())
    }
}

/// Logs at `info` each time the run crosses another `step_percent` boundary
#[derive(Debug, Clone)]
pub struct LoggingProgress {
    step_percent: u32,
    last_logged: u32,
}

impl LoggingProgress {
    pub fn new(step_percent: u32) -> Self {
        Self {
            step_percent: step_percent.clamp(1, 100),
            last_logged: 0,
        }
    }
}

impl Default for LoggingProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressObserver for LoggingProgress {
    fn on_progress(&mut self, fraction: f64) -> Result<(), ProgressError> {
        let percent = whole_percent(fraction);
        let bucket = percent / self.step_percent * self.step_percent;
        if bucket > self.last_logged {
            self.last_logged = bucket;
            info!(percent = bucket, "simulation progress");
        }
        Ok(())
    }
}

/// Completed whole percent; the epsilon absorbs `0.29 * 100.0 == 28.999...`
fn whole_percent(fraction: f64) -> u32 {
    (fraction * 100.0 + 1e-9).floor().clamp(0.0, 100.0) as u32
}
