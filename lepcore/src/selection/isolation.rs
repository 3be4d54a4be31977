//! Hybrid (absolute / relative) isolation with optional mini-isolation weighting.

use serde::{Deserialize, Serialize};

use crate::algorithm::utility::square;

/// Upper edge (inclusive) of the absolute-isolation regime.
pub const ABSOLUTE_ISO_PT_MAX: f32 = 25.0;

const MINI_ISO_LOW_PT: f32 = 50.0;
const MINI_ISO_HIGH_PT: f32 = 200.0;
// calibrated plateau weights below 50 GeV and from 200 GeV on
const MINI_ISO_LOW_PT_WEIGHT: f32 = 0.42942652;
const MINI_ISO_HIGH_PT_WEIGHT: f32 = 0.02616993;

/// Thresholds of one hybrid isolation working point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IsolationWorkingPoint {
    /// Cut on `iso * pt` for pt <= 25.
    pub absolute: f32,
    /// Cut on `iso` for pt > 25.
    pub relative: f32,
    pub mini_isolation: bool,
}

impl Default for IsolationWorkingPoint {
    fn default() -> Self {
        Self::tight()
    }
}

impl IsolationWorkingPoint {
    pub fn new(absolute: f32, relative: f32, mini_isolation: bool) -> Self {
        IsolationWorkingPoint { absolute, relative, mini_isolation }
    }

    pub fn tight() -> Self {
        Self::new(5.0, 0.2, false)
    }

    pub fn loose() -> Self {
        Self::new(20.0, 0.8, false)
    }

    pub fn with_mini_isolation(mut self) -> Self {
        self.mini_isolation = true;
        self
    }

    /// Decides a single candidate.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lepcore::selection::isolation::IsolationWorkingPoint;
    /// let wp = IsolationWorkingPoint::tight();
    /// // absolute regime: 0.19 * 25 = 4.75 < 5.0
    /// assert!(wp.passes(25.0, 0.19));
    /// // relative regime: 0.21 >= 0.2
    /// assert!(!wp.passes(30.0, 0.21));
    /// ```
    pub fn passes(&self, pt: f32, iso: f32) -> bool {
        let weight = if self.mini_isolation { mini_isolation_weight(pt) } else { 1.0 };
        if pt <= ABSOLUTE_ISO_PT_MAX {
            iso * pt < self.absolute * weight
        } else {
            iso < self.relative * weight
        }
    }
}

/// Momentum-dependent weight applied to the thresholds when mini-isolation is used.
///
/// The mini-isolation cone shrinks as `10 / pt`; between 50 and 200 GeV the weight
/// follows the squared tangent ratio against the 0.3 cone, outside it is constant.
/// `pt` must be positive.
pub fn mini_isolation_weight(pt: f32) -> f32 {
    if pt < MINI_ISO_LOW_PT {
        MINI_ISO_LOW_PT_WEIGHT
    } else if pt < MINI_ISO_HIGH_PT {
        debug_assert!(pt > 0.0);
        square(((10.0 / pt as f64).tan() / 0.3f64.tan()) as f32)
    } else {
        MINI_ISO_HIGH_PT_WEIGHT
    }
}

/// Hybrid isolation decision for aligned `pt` / `iso` columns.
///
/// # Arguments
///
/// * `pt` - candidate transverse momenta.
/// * `iso` - relative isolation values, aligned with `pt`.
/// * `wp` - working point thresholds.
///
/// # Example
///
/// ```rust
/// # use lepcore::selection::isolation::{hybrid_iso, IsolationWorkingPoint};
/// let mask = hybrid_iso(&[10.0, 40.0], &[0.6, 0.1], &IsolationWorkingPoint::tight());
/// assert_eq!(mask, vec![false, true]);
/// ```
pub fn hybrid_iso(pt: &[f32], iso: &[f32], wp: &IsolationWorkingPoint) -> Vec<bool> {
    debug_assert_eq!(pt.len(), iso.len(), "pt and iso must be aligned");
    pt.iter().zip(iso.iter()).map(|(&pt, &iso)| wp.passes(pt, iso)).collect()
}
