//! Serialized per-window detection results.
//!
//! Once a window is fully processed its labels are frozen into a report:
//! three disjoint reading sets plus the fitted trend. Reports are plain
//! data for downstream reporting and visualization consumers; the
//! detector keeps no references to them across windows.

use crate::core::points::{Label, PointSpace};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The current report format version.
pub const REPORT_VERSION: &str = "1.0";

/// The name of this producer.
pub const PRODUCER_NAME: &str = "sensor-quorum";

/// One labeled reading in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledReading {
    /// Instant (time slice) index within the window, oldest first
    pub instant: usize,
    /// Channel index within the instant
    pub channel: usize,
    /// The raw reading
    pub value: f64,
    /// Derived position coordinate used during clustering
    pub position: f64,
}

/// Final classification of one analysis window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowReport {
    /// Unique report id
    pub id: String,
    /// Report format version
    pub version: String,
    /// Producing library
    pub producer: String,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Correlation fitted by trend verification; `None` when the window
    /// was degenerate and correction was skipped
    pub correlation: Option<f64>,
    /// Readings inside dense regions
    pub core: Vec<LabeledReading>,
    /// Readings adjacent to a dense region
    pub border: Vec<LabeledReading>,
    /// Outlying readings
    pub noise: Vec<LabeledReading>,
}

impl WindowReport {
    /// Freeze the labels of a processed point space into a report.
    pub fn from_space(space: &PointSpace, correlation: Option<f64>) -> Self {
        let mut core = Vec::new();
        let mut border = Vec::new();
        let mut noise = Vec::new();

        for point in space.points() {
            let reading = LabeledReading {
                instant: point.instant,
                channel: point.channel,
                value: point.value,
                position: point.position,
            };
            match point.label {
                Label::Core => core.push(reading),
                Label::Border => border.push(reading),
                // A point the density pass never reached reads as noise
                Label::Noise | Label::Unknown => noise.push(reading),
            }
        }

        Self {
            id: Uuid::new_v4().to_string(),
            version: REPORT_VERSION.to_string(),
            producer: PRODUCER_NAME.to_string(),
            generated_at: Utc::now(),
            correlation,
            core,
            border,
            noise,
        }
    }

    /// Total readings across all three sets.
    pub fn point_count(&self) -> usize {
        self.core.len() + self.border.len() + self.noise.len()
    }

    /// True when no reading was classified as noise.
    pub fn is_clean(&self) -> bool {
        self.noise.is_empty()
    }

    /// True when trend correction was skipped for this window.
    pub fn is_degenerate(&self) -> bool {
        self.correlation.is_none()
    }
}
