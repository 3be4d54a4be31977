use crate::algorithm::utility::is_sorted_descending;
use crate::merge::provenance::Provenance;

/// Merges two pt-descending collections into one pt-descending provenance sequence.
///
/// # Description
///
/// A standard two-way merge: the first collection's candidate is taken only
/// when its pt is strictly larger, so on equal pt the second collection's
/// candidate comes first. Once one side is exhausted the rest of the other is
/// appended in its original order. Both inputs must already be sorted by
/// descending pt; this is not validated outside debug builds.
///
/// # Arguments
///
/// * `pt1` - pt of the first collection, descending.
/// * `pt2` - pt of the second collection, descending.
///
/// # Example
///
/// ```rust
/// # use lepcore::merge::ordered::merge_by_pt;
/// # use lepcore::merge::provenance::Provenance::{First, Second};
/// let merged = merge_by_pt(&[30.0, 10.0], &[30.0, 5.0]);
/// assert_eq!(merged, vec![Second(0), First(0), First(1), Second(1)]);
/// ```
pub fn merge_by_pt(pt1: &[f32], pt2: &[f32]) -> Vec<Provenance> {
    debug_assert!(is_sorted_descending(pt1), "first collection is not sorted by descending pt");
    debug_assert!(is_sorted_descending(pt2), "second collection is not sorted by descending pt");

    let mut merged = Vec::with_capacity(pt1.len() + pt2.len());
    let (mut i1, mut i2) = (0usize, 0usize);

    while i1 < pt1.len() && i2 < pt2.len() {
        if pt1[i1] > pt2[i2] {
            merged.push(Provenance::First(i1));
            i1 += 1;
        } else {
            merged.push(Provenance::Second(i2));
            i2 += 1;
        }
    }
    merged.extend((i1..pt1.len()).map(Provenance::First));
    merged.extend((i2..pt2.len()).map(Provenance::Second));

    merged
}
