//! Typed per-event candidate collections.
//!
//! Every collection stores one `Vec` per attribute, all positionally aligned.
//! Alignment is checked once by `validate` when an event is read; the
//! selection and merge routines rely on it without further checks.

use serde::{Deserialize, Serialize};

use lepcore::algorithm::utility::{argsort_descending, mask_indices, take};

use crate::error::{FrameError, Result};

pub const PDG_ELECTRON: i32 = 11;
pub const PDG_MUON: i32 = 13;

/// Columnar view shared by all lepton collections.
pub trait Candidates: Sized {
    const NAME: &'static str;
    const PDG_ID: i32;

    fn pt(&self) -> &[f32];
    fn eta(&self) -> &[f32];
    fn phi(&self) -> &[f32];
    fn dxy(&self) -> &[f32];
    fn dz(&self) -> &[f32];
    fn charge(&self) -> &[i32];

    /// Supercluster eta offset, absent for muons.
    fn delta_eta_sc(&self) -> Option<&[f32]> {
        None
    }

    fn mc(&self) -> Option<&McColumns>;

    /// Rows at `indices`, in that order.
    fn take(&self, indices: &[usize]) -> Self;

    fn validate(&self) -> Result<()>;

    fn len(&self) -> usize {
        self.pt().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps the rows where `mask` is true, preserving order.
    fn select(&self, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), self.len(), "{}: mask is not aligned", Self::NAME);
        self.take(&mask_indices(mask))
    }

    /// Rows reordered by descending pt, ties in original order.
    fn sorted_by_pt(&self) -> Self {
        self.take(&argsort_descending(self.pt()))
    }
}

fn check_column(collection: &'static str, column: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(FrameError::LengthMismatch { collection, column, expected, actual });
    }
    Ok(())
}

/// Generator matching columns, only present in simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McColumns {
    pub gen_part_idx: Vec<i32>,
    pub gen_part_flav: Vec<u8>,
}

impl McColumns {
    pub fn take(&self, indices: &[usize]) -> Self {
        McColumns {
            gen_part_idx: take(&self.gen_part_idx, indices),
            gen_part_flav: take(&self.gen_part_flav, indices),
        }
    }

    fn validate(&self, collection: &'static str, expected: usize) -> Result<()> {
        check_column(collection, "gen_part_idx", expected, self.gen_part_idx.len())?;
        check_column(collection, "gen_part_flav", expected, self.gen_part_flav.len())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Electrons {
    pub pt: Vec<f32>,
    pub eta: Vec<f32>,
    pub phi: Vec<f32>,
    pub delta_eta_sc: Vec<f32>,
    pub dxy: Vec<f32>,
    pub dz: Vec<f32>,
    pub charge: Vec<i32>,
    pub pf_rel_iso03_all: Vec<f32>,
    pub vid_nested_wp_bitmap: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc: Option<McColumns>,
}

impl Candidates for Electrons {
    const NAME: &'static str = "Electron";
    const PDG_ID: i32 = PDG_ELECTRON;

    fn pt(&self) -> &[f32] { &self.pt }
    fn eta(&self) -> &[f32] { &self.eta }
    fn phi(&self) -> &[f32] { &self.phi }
    fn dxy(&self) -> &[f32] { &self.dxy }
    fn dz(&self) -> &[f32] { &self.dz }
    fn charge(&self) -> &[i32] { &self.charge }
    fn delta_eta_sc(&self) -> Option<&[f32]> { Some(self.delta_eta_sc.as_slice()) }
    fn mc(&self) -> Option<&McColumns> { self.mc.as_ref() }

    fn take(&self, indices: &[usize]) -> Self {
        Electrons {
            pt: take(&self.pt, indices),
            eta: take(&self.eta, indices),
            phi: take(&self.phi, indices),
            delta_eta_sc: take(&self.delta_eta_sc, indices),
            dxy: take(&self.dxy, indices),
            dz: take(&self.dz, indices),
            charge: take(&self.charge, indices),
            pf_rel_iso03_all: take(&self.pf_rel_iso03_all, indices),
            vid_nested_wp_bitmap: take(&self.vid_nested_wp_bitmap, indices),
            mc: self.mc.as_ref().map(|mc| mc.take(indices)),
        }
    }

    fn validate(&self) -> Result<()> {
        let n = self.pt.len();
        check_column(Self::NAME, "eta", n, self.eta.len())?;
        check_column(Self::NAME, "phi", n, self.phi.len())?;
        check_column(Self::NAME, "delta_eta_sc", n, self.delta_eta_sc.len())?;
        check_column(Self::NAME, "dxy", n, self.dxy.len())?;
        check_column(Self::NAME, "dz", n, self.dz.len())?;
        check_column(Self::NAME, "charge", n, self.charge.len())?;
        check_column(Self::NAME, "pf_rel_iso03_all", n, self.pf_rel_iso03_all.len())?;
        check_column(Self::NAME, "vid_nested_wp_bitmap", n, self.vid_nested_wp_bitmap.len())?;
        match &self.mc {
            Some(mc) => mc.validate(Self::NAME, n),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowPtElectrons {
    pub pt: Vec<f32>,
    pub eta: Vec<f32>,
    pub phi: Vec<f32>,
    pub delta_eta_sc: Vec<f32>,
    pub dxy: Vec<f32>,
    pub dz: Vec<f32>,
    pub charge: Vec<i32>,
    pub mini_pf_rel_iso_all: Vec<f32>,
    /// BDT identification score.
    pub id: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc: Option<McColumns>,
}

impl Candidates for LowPtElectrons {
    const NAME: &'static str = "LowPtElectron";
    const PDG_ID: i32 = PDG_ELECTRON;

    fn pt(&self) -> &[f32] { &self.pt }
    fn eta(&self) -> &[f32] { &self.eta }
    fn phi(&self) -> &[f32] { &self.phi }
    fn dxy(&self) -> &[f32] { &self.dxy }
    fn dz(&self) -> &[f32] { &self.dz }
    fn charge(&self) -> &[i32] { &self.charge }
    fn delta_eta_sc(&self) -> Option<&[f32]> { Some(self.delta_eta_sc.as_slice()) }
    fn mc(&self) -> Option<&McColumns> { self.mc.as_ref() }

    fn take(&self, indices: &[usize]) -> Self {
        LowPtElectrons {
            pt: take(&self.pt, indices),
            eta: take(&self.eta, indices),
            phi: take(&self.phi, indices),
            delta_eta_sc: take(&self.delta_eta_sc, indices),
            dxy: take(&self.dxy, indices),
            dz: take(&self.dz, indices),
            charge: take(&self.charge, indices),
            mini_pf_rel_iso_all: take(&self.mini_pf_rel_iso_all, indices),
            id: take(&self.id, indices),
            mc: self.mc.as_ref().map(|mc| mc.take(indices)),
        }
    }

    fn validate(&self) -> Result<()> {
        let n = self.pt.len();
        check_column(Self::NAME, "eta", n, self.eta.len())?;
        check_column(Self::NAME, "phi", n, self.phi.len())?;
        check_column(Self::NAME, "delta_eta_sc", n, self.delta_eta_sc.len())?;
        check_column(Self::NAME, "dxy", n, self.dxy.len())?;
        check_column(Self::NAME, "dz", n, self.dz.len())?;
        check_column(Self::NAME, "charge", n, self.charge.len())?;
        check_column(Self::NAME, "mini_pf_rel_iso_all", n, self.mini_pf_rel_iso_all.len())?;
        check_column(Self::NAME, "id", n, self.id.len())?;
        match &self.mc {
            Some(mc) => mc.validate(Self::NAME, n),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Muons {
    pub pt: Vec<f32>,
    pub eta: Vec<f32>,
    pub phi: Vec<f32>,
    pub dxy: Vec<f32>,
    pub dz: Vec<f32>,
    pub charge: Vec<i32>,
    pub pf_rel_iso03_all: Vec<f32>,
    pub loose_id: Vec<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc: Option<McColumns>,
}

impl Candidates for Muons {
    const NAME: &'static str = "Muon";
    const PDG_ID: i32 = PDG_MUON;

    fn pt(&self) -> &[f32] { &self.pt }
    fn eta(&self) -> &[f32] { &self.eta }
    fn phi(&self) -> &[f32] { &self.phi }
    fn dxy(&self) -> &[f32] { &self.dxy }
    fn dz(&self) -> &[f32] { &self.dz }
    fn charge(&self) -> &[i32] { &self.charge }
    fn mc(&self) -> Option<&McColumns> { self.mc.as_ref() }

    fn take(&self, indices: &[usize]) -> Self {
        Muons {
            pt: take(&self.pt, indices),
            eta: take(&self.eta, indices),
            phi: take(&self.phi, indices),
            dxy: take(&self.dxy, indices),
            dz: take(&self.dz, indices),
            charge: take(&self.charge, indices),
            pf_rel_iso03_all: take(&self.pf_rel_iso03_all, indices),
            loose_id: take(&self.loose_id, indices),
            mc: self.mc.as_ref().map(|mc| mc.take(indices)),
        }
    }

    fn validate(&self) -> Result<()> {
        let n = self.pt.len();
        check_column(Self::NAME, "eta", n, self.eta.len())?;
        check_column(Self::NAME, "phi", n, self.phi.len())?;
        check_column(Self::NAME, "dxy", n, self.dxy.len())?;
        check_column(Self::NAME, "dz", n, self.dz.len())?;
        check_column(Self::NAME, "charge", n, self.charge.len())?;
        check_column(Self::NAME, "pf_rel_iso03_all", n, self.pf_rel_iso03_all.len())?;
        check_column(Self::NAME, "loose_id", n, self.loose_id.len())?;
        match &self.mc {
            Some(mc) => mc.validate(Self::NAME, n),
            None => Ok(()),
        }
    }
}
