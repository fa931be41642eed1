//! Correlation-driven correction of density-ambiguous time slices.
//!
//! After the density pass a slice may hold readings labeled noise even
//! though they had neighbors in range, which means the slice's density
//! vote was inconclusive rather than unanimous. Those slices are
//! re-anchored to the linear trend across the window: the reading closest
//! to the trend prediction wins the slice, its in-range slice-mates join
//! it, and everything else in the slice becomes noise.

use crate::core::points::{Label, PointSpace};
use statrs::statistics::Statistics;
use std::fmt;

/// Errors from trend verification.
#[derive(Debug)]
pub enum TrendError {
    /// Zero variance among non-noise points; no usable trend exists.
    DegenerateWindow,
}

impl fmt::Display for TrendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendError::DegenerateWindow => {
                write!(f, "Window has no variance to fit a trend against")
            }
        }
    }
}

impl std::error::Error for TrendError {}

/// Summary of one verification run.
#[derive(Debug, Clone, Copy)]
pub struct TrendOutcome {
    /// Pearson correlation between position and value over non-noise points
    pub correlation: f64,
    /// Slices whose labels were rewritten
    pub slices_reclassified: usize,
}

/// Run the corrective pass once over a density-labeled point space.
///
/// Returns the fitted correlation and how many slices were rewritten, or
/// [`TrendError::DegenerateWindow`] when the non-noise points have no
/// spread in either coordinate; in that case no labels are touched and
/// the density labels stand as final.
pub fn verify_trend(space: &mut PointSpace) -> Result<TrendOutcome, TrendError> {
    let r = correlation_coefficient(space)?;

    let mut slices_reclassified = 0;
    for slice in 0..space.slice_count() {
        if !requires_reevaluation(space, slice) {
            continue;
        }
        if reclassify_slice(space, slice, r) {
            slices_reclassified += 1;
        }
    }

    Ok(TrendOutcome {
        correlation: r,
        slices_reclassified,
    })
}

/// Pearson correlation between position and value over non-noise points.
fn correlation_coefficient(space: &PointSpace) -> Result<f64, TrendError> {
    let (positions, values): (Vec<f64>, Vec<f64>) = space
        .points()
        .iter()
        .filter(|p| p.label != Label::Noise)
        .map(|p| (p.position, p.value))
        .unzip();

    if positions.len() < 2 {
        return Err(TrendError::DegenerateWindow);
    }

    let mean_x = positions.iter().mean();
    let mean_y = values.iter().mean();

    let mut cross = 0.0;
    let mut spread_x = 0.0;
    let mut spread_y = 0.0;
    for (x, y) in positions.iter().zip(&values) {
        cross += (x - mean_x) * (y - mean_y);
        spread_x += (x - mean_x).powi(2);
        spread_y += (y - mean_y).powi(2);
    }

    let denominator = spread_x.sqrt() * spread_y.sqrt();
    if denominator <= 0.0 || !denominator.is_finite() {
        return Err(TrendError::DegenerateWindow);
    }

    Ok(cross / denominator)
}

/// A slice needs another look when it holds noise that had neighbors.
/// Truly isolated readings stay noise without re-evaluation.
fn requires_reevaluation(space: &PointSpace, slice: usize) -> bool {
    space.slice_ids(slice).any(|id| {
        let point = space.point(id);
        point.label == Label::Noise && !point.neighbors.is_empty()
    })
}

/// Re-anchor one slice to the window trend.
///
/// The prediction extends the trend from the slice's first reading. The
/// reading closest to the prediction wins the slice, ties going to the
/// first in channel order. A winner the density pass already accepted
/// leaves the slice untouched; a noise winner becomes core together with
/// every slice-mate in its neighbor set, and the rest of the slice is
/// forced to noise regardless of its previous label.
fn reclassify_slice(space: &mut PointSpace, slice: usize, r: f64) -> bool {
    let ids = space.slice_ids(slice);
    let anchor = space.point(ids.start);
    let predicted = r * anchor.position + anchor.value;

    let mut best = ids.start;
    let mut best_err = f64::INFINITY;
    for id in ids.clone() {
        let err = (space.point(id).value - predicted).abs();
        if err < best_err {
            best = id;
            best_err = err;
        }
    }

    if space.point(best).label != Label::Noise {
        return false;
    }

    space.set_label(best, Label::Core);
    let quorum = space.point(best).neighbors.clone();
    for id in ids {
        if id == best {
            continue;
        }
        if quorum.contains(&id) {
            space.set_label(id, Label::Core);
        } else {
            space.set_label(id, Label::Noise);
        }
    }
    true
}
