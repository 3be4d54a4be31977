//! Electron VID (cut-based identification) bitmap evaluation.
//!
//! The nested working-point bitmap packs ten 3-bit fields, one per cut,
//! most-significant field first. Each field holds the tightest working point
//! (0..=7) the candidate passes for that cut.

use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::LepError;

pub const VID_FIELDS: usize = 10;
pub const VID_FIELD_BITS: u32 = 3;
pub const VID_FIELD_MASK: u32 = 0o7;
pub const VID_MAX_LEVEL: u8 = 7;

/// The ten criteria encoded in a VID bitmap, in field order (most-significant first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VidCut {
    MissingHits,
    ConversionVeto,
    RelPfIsoScaled,
    EInverseMinusPInverse,
    HadronicOverEmEnergyScaled,
    Full5x5SigmaIEtaIEta,
    DPhiIn,
    DEtaInSeed,
    ScEtaMultiRange,
    MinPt,
}

impl VidCut {
    pub const ALL: [VidCut; VID_FIELDS] = [
        VidCut::MissingHits,
        VidCut::ConversionVeto,
        VidCut::RelPfIsoScaled,
        VidCut::EInverseMinusPInverse,
        VidCut::HadronicOverEmEnergyScaled,
        VidCut::Full5x5SigmaIEtaIEta,
        VidCut::DPhiIn,
        VidCut::DEtaInSeed,
        VidCut::ScEtaMultiRange,
        VidCut::MinPt,
    ];

    /// Position of this cut in `VidBitmap::fields`.
    pub fn field(&self) -> usize {
        match self {
            VidCut::MissingHits => 0,
            VidCut::ConversionVeto => 1,
            VidCut::RelPfIsoScaled => 2,
            VidCut::EInverseMinusPInverse => 3,
            VidCut::HadronicOverEmEnergyScaled => 4,
            VidCut::Full5x5SigmaIEtaIEta => 5,
            VidCut::DPhiIn => 6,
            VidCut::DEtaInSeed => 7,
            VidCut::ScEtaMultiRange => 8,
            VidCut::MinPt => 9,
        }
    }

    /// Bit offset of the cut's 3-bit field inside the packed code.
    pub fn shift(&self) -> u32 {
        (VID_FIELDS - 1 - self.field()) as u32 * VID_FIELD_BITS
    }

    /// Forced-pass mask that sets this cut's field to the maximum level.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lepcore::selection::vid::VidCut;
    /// assert_eq!(VidCut::MissingHits.mask(), 0o7000000000);
    /// assert_eq!(VidCut::RelPfIsoScaled.mask(), 0o0070000000);
    /// assert_eq!(VidCut::MinPt.mask(), 0o0000000007);
    /// ```
    pub fn mask(&self) -> u32 {
        VID_FIELD_MASK << self.shift()
    }

    /// OR-combined forced-pass mask of several cuts.
    pub fn combined_mask(cuts: &[VidCut]) -> u32 {
        cuts.iter().fold(0, |acc, cut| acc | cut.mask())
    }
}

impl Display for VidCut {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            VidCut::MissingHits => "GsfEleMissingHitsCut",
            VidCut::ConversionVeto => "GsfEleConversionVetoCut",
            VidCut::RelPfIsoScaled => "GsfEleRelPFIsoScaledCut",
            VidCut::EInverseMinusPInverse => "GsfEleEInverseMinusPInverseCut",
            VidCut::HadronicOverEmEnergyScaled => "GsfEleHadronicOverEMEnergyScaledCut",
            VidCut::Full5x5SigmaIEtaIEta => "GsfEleFull5x5SigmaIEtaIEtaCut",
            VidCut::DPhiIn => "GsfEleDPhiInCut",
            VidCut::DEtaInSeed => "GsfEleDEtaInSeedCut",
            VidCut::ScEtaMultiRange => "GsfEleSCEtaMultiRangeCut",
            VidCut::MinPt => "MinPtCut",
        };
        write!(f, "{}", name)
    }
}

/// Unpacked VID bitmap: one level per cut, in `VidCut::ALL` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VidBitmap {
    pub fields: [u8; VID_FIELDS],
}

impl VidBitmap {
    /// Unpacks the lower 30 bits of `code`; the two high bits are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use lepcore::selection::vid::VidBitmap;
    /// let bitmap = VidBitmap::decode(0o1234567012);
    /// assert_eq!(bitmap.fields, [1, 2, 3, 4, 5, 6, 7, 0, 1, 2]);
    /// ```
    pub fn decode(code: u32) -> Self {
        let mut fields = [0u8; VID_FIELDS];
        let mut v = code;
        for field in fields.iter_mut().rev() {
            *field = (v & VID_FIELD_MASK) as u8;
            v >>= VID_FIELD_BITS;
        }
        VidBitmap { fields }
    }

    /// Builds a bitmap from explicit levels, rejecting any level above 7.
    pub fn try_from_fields(fields: [u8; VID_FIELDS]) -> Result<Self, LepError> {
        match fields.iter().position(|&value| value > VID_MAX_LEVEL) {
            Some(field) => Err(LepError::FieldOutOfRange { field, value: fields[field] }),
            None => Ok(VidBitmap { fields }),
        }
    }

    /// Bitmap with every cut at the same level.
    pub fn uniform(level: u8) -> Result<Self, LepError> {
        if level > VID_MAX_LEVEL {
            return Err(LepError::LevelOutOfRange(level));
        }
        Ok(VidBitmap { fields: [level; VID_FIELDS] })
    }

    pub fn encode(&self) -> u32 {
        self.fields
            .iter()
            .fold(0u32, |acc, &field| (acc << VID_FIELD_BITS) | (field as u32 & VID_FIELD_MASK))
    }

    pub fn level(&self, cut: VidCut) -> u8 {
        self.fields[cut.field()]
    }

    pub fn set_level(&mut self, cut: VidCut, level: u8) -> Result<(), LepError> {
        if level > VID_MAX_LEVEL {
            return Err(LepError::FieldOutOfRange { field: cut.field(), value: level });
        }
        self.fields[cut.field()] = level;
        Ok(())
    }

    /// True iff every cut is at or above `level`.
    pub fn passes(&self, level: u8) -> bool {
        self.fields.iter().all(|&field| field >= level)
    }

    /// The cuts that stay below `level`.
    pub fn failing_cuts(&self, level: u8) -> Vec<VidCut> {
        VidCut::ALL
            .iter()
            .copied()
            .filter(|cut| self.level(*cut) < level)
            .collect()
    }
}

impl From<u32> for VidBitmap {
    fn from(code: u32) -> Self {
        VidBitmap::decode(code)
    }
}

/// Tests a single packed code against `level` after OR-ing `forced` into it.
pub fn passes_vid(code: u32, level: u8, forced: u32) -> bool {
    VidBitmap::decode(code | forced).passes(level)
}

/// Evaluates packed VID codes against a working-point level.
///
/// # Arguments
///
/// * `codes` - packed VID bitmaps, one per candidate.
/// * `level` - minimum level every cut must reach (0..=7, anything above always fails).
/// * `forced` - bits OR-ed into every code first, e.g. `VidCut::RelPfIsoScaled.mask()`
///   to waive the isolation cut; pass 0 to force nothing.
///
/// # Example
///
/// ```rust
/// # use lepcore::selection::vid::{eval, VidCut};
/// let codes = vec![0o1111111111, 0o1101111111];
/// assert_eq!(eval(&codes, 1, 0), vec![true, false]);
/// assert_eq!(eval(&codes, 1, VidCut::RelPfIsoScaled.mask()), vec![true, true]);
/// ```
pub fn eval(codes: &[u32], level: u8, forced: u32) -> Vec<bool> {
    codes.iter().map(|&code| passes_vid(code, level, forced)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_match_field_layout() {
        let expected: [u32; VID_FIELDS] = [
            0o7000000000,
            0o0700000000,
            0o0070000000,
            0o0007000000,
            0o0000700000,
            0o0000070000,
            0o0000007000,
            0o0000000700,
            0o0000000070,
            0o0000000007,
        ];
        for (cut, mask) in VidCut::ALL.iter().zip(expected.iter()) {
            assert_eq!(cut.mask(), *mask, "{}", cut);
        }
        assert_eq!(VidCut::combined_mask(&VidCut::ALL), (1 << 30) - 1);
    }

    #[test]
    fn test_all_fields_at_level_pass() {
        for level in 0..=VID_MAX_LEVEL {
            let code = VidBitmap::uniform(level).unwrap().encode();
            assert_eq!(eval(&[code], level, 0), vec![true]);
        }
    }

    #[test]
    fn test_single_field_below_level_fails() {
        let level = 3;
        for cut in VidCut::ALL {
            let mut bitmap = VidBitmap::uniform(level).unwrap();
            bitmap.set_level(cut, level - 1).unwrap();
            assert!(!passes_vid(bitmap.encode(), level, 0), "{}", cut);
            assert_eq!(bitmap.failing_cuts(level), vec![cut]);
            assert!(passes_vid(bitmap.encode(), level, cut.mask()), "{}", cut);
        }
    }

    #[test]
    fn test_high_bits_are_ignored() {
        let code = VidBitmap::uniform(2).unwrap().encode();
        assert!(passes_vid(code | 0xC000_0000, 2, 0));
        assert_eq!(VidBitmap::decode(code | 0xC000_0000), VidBitmap::decode(code));
    }

    #[test]
    fn test_zero_level_passes_everything() {
        assert_eq!(eval(&[0, 0o1234567012, u32::MAX], 0, 0), vec![true, true, true]);
    }

    #[test]
    fn test_level_above_range_fails_everything() {
        assert_eq!(eval(&[u32::MAX], 8, 0), vec![false]);
    }

    #[test]
    fn test_try_from_fields_rejects_overflow() {
        let mut fields = [1u8; VID_FIELDS];
        fields[4] = 9;
        assert_eq!(
            VidBitmap::try_from_fields(fields),
            Err(LepError::FieldOutOfRange { field: 4, value: 9 })
        );
        assert!(VidBitmap::uniform(8).is_err());
    }

    #[test]
    fn test_decode_encode_fields() {
        let bitmap = VidBitmap::try_from_fields([4, 4, 0, 4, 4, 4, 4, 4, 4, 4]).unwrap();
        let code = bitmap.encode();
        assert_eq!(code, 0o4404444444);
        assert_eq!(VidBitmap::from(code), bitmap);
        assert_eq!(bitmap.level(VidCut::RelPfIsoScaled), 0);
    }
}
