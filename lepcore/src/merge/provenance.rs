use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Origin of one element of a merged collection.
///
/// # Description
///
/// Merged collections keep, per element, the index into the collection it was
/// taken from. Downstream consumers that need a flat integer column use the
/// signed encoding of `encode`: non-negative values index the first
/// collection, negative values are the bitwise complement of an index into the
/// second one, so `Second(0)` becomes `-1` and stays distinct from `First(0)`.
/// Serde uses the same signed encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Provenance {
    First(usize),
    Second(usize),
}

impl Provenance {
    /// Signed one's-complement encoding.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lepcore::merge::provenance::Provenance;
    /// assert_eq!(Provenance::First(3).encode(), 3);
    /// assert_eq!(Provenance::Second(0).encode(), -1);
    /// assert_eq!(Provenance::Second(2).encode(), -3);
    /// ```
    pub fn encode(&self) -> i32 {
        match *self {
            Provenance::First(index) => index as i32,
            Provenance::Second(index) => !(index as i32),
        }
    }

    pub fn decode(encoded: i32) -> Self {
        if encoded < 0 {
            Provenance::Second((!encoded) as usize)
        } else {
            Provenance::First(encoded as usize)
        }
    }

    /// Index into the source collection, whichever it is.
    pub fn index(&self) -> usize {
        match *self {
            Provenance::First(index) | Provenance::Second(index) => index,
        }
    }

    pub fn is_first(&self) -> bool {
        matches!(self, Provenance::First(_))
    }

    pub fn is_second(&self) -> bool {
        matches!(self, Provenance::Second(_))
    }
}

impl From<i32> for Provenance {
    fn from(encoded: i32) -> Self {
        Provenance::decode(encoded)
    }
}

impl From<Provenance> for i32 {
    fn from(provenance: Provenance) -> Self {
        provenance.encode()
    }
}

impl Display for Provenance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::First(index) => write!(f, "First({})", index),
            Provenance::Second(index) => write!(f, "Second({})", index),
        }
    }
}

pub fn encode_all(provenance: &[Provenance]) -> Vec<i32> {
    provenance.iter().map(Provenance::encode).collect()
}

pub fn decode_all(encoded: &[i32]) -> Vec<Provenance> {
    encoded.iter().map(|&value| Provenance::decode(value)).collect()
}

/// Per-element flag that is true for elements taken from the second collection.
pub fn second_mask(provenance: &[Provenance]) -> Vec<bool> {
    provenance.iter().map(Provenance::is_second).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_matches_complement() {
        for index in [0usize, 1, 7, 1000] {
            assert_eq!(Provenance::Second(index).encode(), (index as i32) ^ -1);
            assert_eq!(Provenance::decode(!(index as i32)), Provenance::Second(index));
            assert_eq!(Provenance::decode(index as i32), Provenance::First(index));
        }
    }

    #[test]
    fn test_zero_indices_are_distinct() {
        assert_ne!(Provenance::First(0).encode(), Provenance::Second(0).encode());
    }

    #[test]
    fn test_second_mask() {
        let provenance = decode_all(&[-1, 0, 1, -2]);
        assert_eq!(second_mask(&provenance), vec![true, false, false, true]);
        assert_eq!(encode_all(&provenance), vec![-1, 0, 1, -2]);
        assert_eq!(provenance[3].index(), 1);
    }

    #[test]
    fn test_serde_uses_signed_encoding() {
        let provenance = vec![Provenance::Second(0), Provenance::First(2)];
        let json = serde_json::to_string(&provenance).unwrap();
        assert_eq!(json, "[-1,2]");
        let back: Vec<Provenance> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, provenance);
    }
}
