use std::fmt;

use crate::metrics::RunSeries;

/// Averages and improvement percentages for a backup/sourcery run pair
#[derive(Clone, Debug)]
pub struct Comparison {
    pub backup_fps_avg: f64,
    pub sourcery_fps_avg: f64,
    pub backup_frame_avg: f64,
    pub sourcery_frame_avg: f64,
    pub fps_improvement: f64,
    pub frame_improvement: f64,
}

impl Comparison {
    /// Compare two extracted runs
    ///
    /// Returns `None` when either run produced no FPS samples, in which case
    /// there is nothing meaningful to report.
    pub fn of_runs(backup: &RunSeries, sourcery: &RunSeries) -> Option<Comparison> {
        if backup.fps.is_empty() || sourcery.fps.is_empty() {
            return None;
        }

        let backup_fps_avg = mean(&backup.fps);
        let sourcery_fps_avg = mean(&sourcery.fps);
        let backup_frame_avg = mean(&backup.frame_time_ms);
        let sourcery_frame_avg = mean(&sourcery.frame_time_ms);

        // Higher FPS is better, lower frame time is better, so the frame
        // time delta is subtracted the other way around.
        let fps_improvement = (sourcery_fps_avg - backup_fps_avg) / backup_fps_avg * 100.;
        let frame_improvement = (backup_frame_avg - sourcery_frame_avg) / backup_frame_avg * 100.;

        Some(Comparison {
            backup_fps_avg,
            sourcery_fps_avg,
            backup_frame_avg,
            sourcery_frame_avg,
            fps_improvement,
            frame_improvement,
        })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== Performance comparison ===")?;
        writeln!(f, "Backup   avg FPS:   {:.2}", self.backup_fps_avg)?;
        writeln!(f, "Sourcery avg FPS:   {:.2}", self.sourcery_fps_avg)?;
        writeln!(f, "FPS improvement:    {:+.1}%", self.fps_improvement)?;
        writeln!(f)?;
        writeln!(f, "Backup   frame ms:  {:.2} ms", self.backup_frame_avg)?;
        writeln!(f, "Sourcery frame ms:  {:.2} ms", self.sourcery_frame_avg)?;
        write!(f, "Frame time improv.: {:+.1}%", self.frame_improvement)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
