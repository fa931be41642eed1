//! Density-based outlier detection for redundant multi-channel sensor
//! streams.
//!
//! Several redundant sensors sample the same quantity at the same
//! instants. This crate keeps a sliding window of the most recent
//! instants and, on every new sample, classifies each reading in the
//! window as core, border, or noise: a density pass with a same-instant
//! corroboration rule does the bulk of the work, then a linear-trend fit
//! settles the slices the density vote left ambiguous.
//!
//! # Architecture
//!
//! ```text
//! stream ──▶ CircularWindow ──▶ PointSpace ──▶ DensityLabeler
//!                                                    │
//!            WindowReport ◀── verify_trend ◀─────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use sensor_quorum::{DetectorConfig, OutlierDetector, Sample};
//!
//! let config = DetectorConfig {
//!     rng_seed: Some(7),
//!     ..DetectorConfig::default()
//! };
//! let mut detector = OutlierDetector::new(config).expect("valid configuration");
//!
//! detector.push(Sample::new(vec![1.23, 1.22, 1.21, 1.22]));
//! detector.push(Sample::new(vec![1.33, 1.32, 1.31, 1.32]));
//! detector.push(Sample::new(vec![3.40, 1.42, 1.41, 1.42]));
//! let report = detector.push(Sample::new(vec![1.53, 1.52, 1.51, 1.52]));
//!
//! assert!(report.is_some());
//! ```

pub mod config;
pub mod core;
pub mod detector;

// Re-export key types at crate root for convenience
pub use config::{ConfigError, DetectorConfig};
pub use core::{
    verify_trend, CircularWindow, DataPoint, DensityLabeler, DensityOutcome, Label,
    LabeledReading, PointId, PointSpace, Sample, TrendError, TrendOutcome, WindowError,
    WindowReport,
};
pub use detector::{DetectorStats, OutlierDetector};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
