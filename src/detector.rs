//! Push-driven detection pipeline over a live sample stream.
//!
//! The detector feeds samples into the circular window and, once the
//! window has filled, reprocesses it on every push: snapshot, point
//! space, density labeling, trend verification, report. Each window owns
//! its own point space, so a degenerate or noisy window never leaks state
//! into the next one.

use crate::config::{ConfigError, DetectorConfig};
use crate::core::density::DensityLabeler;
use crate::core::points::PointSpace;
use crate::core::report::WindowReport;
use crate::core::trend::{verify_trend, TrendError};
use crate::core::windowing::{CircularWindow, Sample, WindowError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Running counters for a detector instance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DetectorStats {
    /// Samples pushed since construction
    pub samples_seen: u64,
    /// Windows fully processed
    pub windows_processed: u64,
    /// Windows where trend correction was skipped for lack of variance
    pub degenerate_windows: u64,
}

/// Outlier detection engine for one sample stream.
pub struct OutlierDetector {
    config: DetectorConfig,
    window: CircularWindow,
    labeler: DensityLabeler,
    rng: StdRng,
    stats: DetectorStats,
}

impl OutlierDetector {
    /// Create a detector, validating the configuration eagerly.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let window = CircularWindow::new(config.window_capacity);
        let labeler = DensityLabeler::new(config.epsilon, config.min_points, config.pass_count);

        Ok(Self {
            config,
            window,
            labeler,
            rng,
            stats: DetectorStats::default(),
        })
    }

    /// Feed one sample into the stream.
    ///
    /// Returns the report for the refreshed window once enough samples
    /// have arrived; earlier pushes return `None` while the window is
    /// still filling.
    pub fn push(&mut self, sample: Sample) -> Option<WindowReport> {
        if sample.width() != self.config.channels_per_instant {
            tracing::warn!(
                "sample width {} differs from the configured {} channels per instant",
                sample.width(),
                self.config.channels_per_instant
            );
        }

        self.window.push(sample);
        self.stats.samples_seen += 1;

        if !self.window.is_ready() {
            return None;
        }
        self.process_window().ok()
    }

    /// Process the current window into a report.
    ///
    /// Fails with [`WindowError::NotReady`] until the window has received
    /// `window_capacity` samples. Degeneracy is contained here: the
    /// density labels stand as final and the report carries no
    /// correlation.
    pub fn process_window(&mut self) -> Result<WindowReport, WindowError> {
        let snapshot = self.window.snapshot()?;
        let mut space = PointSpace::from_snapshot(
            &snapshot,
            self.config.channels_per_instant,
            self.config.stride(),
        );

        let outcome = self.labeler.run(&mut space, &mut self.rng);
        tracing::debug!(
            "density labeling over {} points finished after {} passes (converged: {})",
            space.len(),
            outcome.passes_run,
            outcome.converged
        );

        let correlation = match verify_trend(&mut space) {
            Ok(trend) => {
                if trend.slices_reclassified > 0 {
                    tracing::debug!(
                        "trend verification rewrote {} slice(s) at r = {:.4}",
                        trend.slices_reclassified,
                        trend.correlation
                    );
                }
                Some(trend.correlation)
            }
            Err(TrendError::DegenerateWindow) => {
                self.stats.degenerate_windows += 1;
                tracing::debug!("window has no usable trend; keeping density labels");
                None
            }
        };

        self.stats.windows_processed += 1;
        Ok(WindowReport::from_space(&space, correlation))
    }

    /// True once the window holds a full set of samples.
    pub fn is_ready(&self) -> bool {
        self.window.is_ready()
    }

    /// Running counters.
    pub fn stats(&self) -> &DetectorStats {
        &self.stats
    }

    /// The active configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}
