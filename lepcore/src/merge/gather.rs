use crate::merge::provenance::Provenance;

/// Source of one attribute for a gather: a column aligned with its collection,
/// or a single value broadcast to every element of that collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand<'a, T> {
    Values(&'a [T]),
    Scalar(T),
}

impl<'a, T: Clone> Operand<'a, T> {
    /// Value at `index`; a scalar ignores the index.
    pub fn get(&self, index: usize) -> T {
        match self {
            Operand::Values(values) => {
                debug_assert!(index < values.len(), "index {} out of bounds ({})", index, values.len());
                values[index].clone()
            }
            Operand::Scalar(value) => value.clone(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Operand::Scalar(_))
    }
}

impl<'a, T> From<&'a [T]> for Operand<'a, T> {
    fn from(values: &'a [T]) -> Self {
        Operand::Values(values)
    }
}

impl<'a, T> From<&'a Vec<T>> for Operand<'a, T> {
    fn from(values: &'a Vec<T>) -> Self {
        Operand::Values(values.as_slice())
    }
}

/// Builds a merged column by following a provenance sequence.
///
/// # Arguments
///
/// * `provenance` - output of one of the merges.
/// * `first` - attribute of the first collection, or a broadcast value.
/// * `second` - attribute of the second collection, or a broadcast value.
///
/// # Example
///
/// ```rust
/// # use lepcore::merge::gather::{gather, Operand};
/// # use lepcore::merge::provenance::Provenance::{First, Second};
/// let provenance = vec![Second(0), First(0), First(1)];
/// let pt = gather(&provenance, Operand::Values(&[30.0, 10.0]), Operand::Values(&[35.0]));
/// assert_eq!(pt, vec![35.0, 30.0, 10.0]);
/// let pdg_id = gather(&provenance, Operand::Scalar(13), Operand::Scalar(11));
/// assert_eq!(pdg_id, vec![11, 13, 13]);
/// ```
pub fn gather<T: Clone>(provenance: &[Provenance], first: Operand<'_, T>, second: Operand<'_, T>) -> Vec<T> {
    provenance
        .iter()
        .map(|p| match *p {
            Provenance::First(index) => first.get(index),
            Provenance::Second(index) => second.get(index),
        })
        .collect()
}

/// `gather` over the signed one's-complement encoding.
pub fn gather_encoded<T: Clone>(encoded: &[i32], first: Operand<'_, T>, second: Operand<'_, T>) -> Vec<T> {
    encoded
        .iter()
        .map(|&value| match Provenance::decode(value) {
            Provenance::First(index) => first.get(index),
            Provenance::Second(index) => second.get(index),
        })
        .collect()
}

/// Gathers two aligned columns, the common case of `gather`.
pub fn gather_values<T: Clone>(provenance: &[Provenance], first: &[T], second: &[T]) -> Vec<T> {
    gather(provenance, Operand::Values(first), Operand::Values(second))
}
