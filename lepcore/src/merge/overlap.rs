use crate::algorithm::utility::{delta_r2, square};
use crate::merge::provenance::Provenance;

/// Angular distance below which a second-collection candidate duplicates a first-collection one.
pub const OVERLAP_DR: f32 = 0.1;

/// True if the candidate at (`eta`, `phi`) lies within `dr` of any of the reference candidates.
pub fn overlaps_any(eta: f32, phi: f32, ref_eta: &[f32], ref_phi: &[f32], dr: f32) -> bool {
    let dr2 = square(dr);
    ref_eta
        .iter()
        .zip(ref_phi.iter())
        .any(|(&e, &p)| delta_r2(e, p, eta, phi) < dr2)
}

/// Keep-mask over the second collection: false where a candidate overlaps the first one.
pub fn overlap_veto_mask(eta1: &[f32], phi1: &[f32], eta2: &[f32], phi2: &[f32], dr: f32) -> Vec<bool> {
    debug_assert_eq!(eta1.len(), phi1.len(), "eta1 and phi1 must be aligned");
    debug_assert_eq!(eta2.len(), phi2.len(), "eta2 and phi2 must be aligned");
    eta2.iter()
        .zip(phi2.iter())
        .map(|(&eta, &phi)| !overlaps_any(eta, phi, eta1, phi1, dr))
        .collect()
}

/// Concatenates two collections, dropping second-collection duplicates.
///
/// # Description
///
/// All of the first collection is kept in its original order, followed by the
/// second-collection candidates that are further than 0.1 in (eta, phi) from
/// every first-collection candidate, also in original order. The result is
/// not pt ordered.
///
/// # Example
///
/// ```rust
/// # use lepcore::merge::overlap::overlap_veto_merge;
/// # use lepcore::merge::provenance::Provenance::{First, Second};
/// let merged = overlap_veto_merge(&[0.0], &[0.0], &[0.05, 1.0], &[0.0, 0.0]);
/// assert_eq!(merged, vec![First(0), Second(1)]);
/// ```
pub fn overlap_veto_merge(eta1: &[f32], phi1: &[f32], eta2: &[f32], phi2: &[f32]) -> Vec<Provenance> {
    overlap_veto_merge_with_radius(eta1, phi1, eta2, phi2, OVERLAP_DR)
}

/// `overlap_veto_merge` with an explicit veto radius.
pub fn overlap_veto_merge_with_radius(
    eta1: &[f32],
    phi1: &[f32],
    eta2: &[f32],
    phi2: &[f32],
    dr: f32,
) -> Vec<Provenance> {
    let keep = overlap_veto_mask(eta1, phi1, eta2, phi2, dr);

    let mut merged = Vec::with_capacity(eta1.len() + eta2.len());
    merged.extend((0..eta1.len()).map(Provenance::First));
    merged.extend(
        keep.iter()
            .enumerate()
            .filter(|(_, &ok)| ok)
            .map(|(i2, _)| Provenance::Second(i2)),
    );

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::provenance::Provenance::{First, Second};
    use std::f32::consts::PI;

    #[test]
    fn test_concatenation_is_not_pt_ordered() {
        let merged = overlap_veto_merge(&[0.0, 1.0], &[0.0, 1.0], &[-1.0, 2.0], &[-1.0, 2.0]);
        assert_eq!(merged, vec![First(0), First(1), Second(0), Second(1)]);
    }

    #[test]
    fn test_veto_wraps_phi() {
        // 0.06 apart across the +-pi boundary
        let merged = overlap_veto_merge(&[0.5], &[PI - 0.03], &[0.5], &[-PI + 0.03]);
        assert_eq!(merged, vec![First(0)]);
    }

    #[test]
    fn test_veto_uses_eta_and_phi() {
        // dEta = 0.08, dPhi = 0.08 -> dR ~ 0.113, kept
        let merged = overlap_veto_merge(&[0.0], &[0.0], &[0.08], &[0.08]);
        assert_eq!(merged, vec![First(0), Second(0)]);
        // dEta = 0.06, dPhi = 0.06 -> dR ~ 0.085, vetoed
        let merged = overlap_veto_merge(&[0.0], &[0.0], &[0.06], &[0.06]);
        assert_eq!(merged, vec![First(0)]);
    }

    #[test]
    fn test_any_first_candidate_vetoes() {
        let eta1 = [2.0, -1.0, 0.0];
        let phi1 = [1.0, 0.0, -2.0];
        let eta2 = [0.01, 1.0, -1.02];
        let phi2 = [-2.0, 1.0, 0.03];
        assert_eq!(overlap_veto_mask(&eta1, &phi1, &eta2, &phi2, OVERLAP_DR), vec![false, true, false]);
        assert_eq!(
            overlap_veto_merge(&eta1, &phi1, &eta2, &phi2),
            vec![First(0), First(1), First(2), Second(1)]
        );
    }

    #[test]
    fn test_empty_first_keeps_all_second() {
        let merged = overlap_veto_merge(&[], &[], &[0.0, 0.0], &[0.0, 0.0]);
        assert_eq!(merged, vec![Second(0), Second(1)]);
    }

    #[test]
    fn test_custom_radius() {
        let merged = overlap_veto_merge_with_radius(&[0.0], &[0.0], &[0.3], &[0.0], 0.4);
        assert_eq!(merged, vec![First(0)]);
    }
}
