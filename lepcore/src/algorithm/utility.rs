use std::f32::consts::PI;

use itertools::Itertools;
use ordered_float::OrderedFloat;

pub fn square(x: f32) -> f32 {
    x * x
}

/// Azimuthal difference `phi1 - phi2`, wrapped into (-pi, pi].
///
/// Inputs are expected to lie in [-pi, pi] already, so a single shift by 2 pi
/// against the sign of the raw difference is enough.
///
/// # Example
///
/// ```rust
/// # use lepcore::algorithm::utility::delta_phi;
/// let dphi = delta_phi(3.0, -3.0);
/// assert!((dphi - (6.0 - 2.0 * std::f32::consts::PI)).abs() < 1e-6);
/// ```
pub fn delta_phi(phi1: f32, phi2: f32) -> f32 {
    let dphi = phi1 - phi2;
    if dphi.abs() > PI {
        dphi - (2.0 * PI).copysign(dphi)
    } else {
        dphi
    }
}

/// Squared angular distance in (eta, phi) space.
pub fn delta_r2(eta1: f32, phi1: f32, eta2: f32, phi2: f32) -> f32 {
    square(delta_phi(phi1, phi2)) + square(eta1 - eta2)
}

/// Indices of the `true` entries of `mask`.
pub fn mask_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, &keep)| keep)
        .map(|(i, _)| i)
        .collect()
}

/// Picks `values[i]` for each `i` in `indices`, in that order.
pub fn take<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

pub fn filter_with_mask<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
    debug_assert_eq!(values.len(), mask.len(), "mask and values must be aligned");
    take(values, &mask_indices(mask))
}

/// Element-wise AND of two aligned masks.
pub fn mask_and(lhs: &[bool], rhs: &[bool]) -> Vec<bool> {
    debug_assert_eq!(lhs.len(), rhs.len(), "masks must be aligned");
    lhs.iter().zip(rhs.iter()).map(|(&a, &b)| a && b).collect()
}

/// True if `values` is sorted in descending (non-increasing) order.
pub fn is_sorted_descending(values: &[f32]) -> bool {
    values.iter().tuple_windows().all(|(a, b)| a >= b)
}

/// Permutation that orders `values` by descending magnitude, ties kept in input order.
///
/// NaN entries are placed first, matching the total order of `OrderedFloat`.
pub fn argsort_descending(values: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(OrderedFloat(values[i])));
    order
}
