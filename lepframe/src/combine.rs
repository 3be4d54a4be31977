//! Combination of two lepton collections into one provenance-tagged collection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use lepcore::merge::gather::{gather, gather_values, Operand};
use lepcore::merge::ordered::merge_by_pt;
use lepcore::merge::overlap::overlap_veto_merge_with_radius;
use lepcore::merge::provenance::{second_mask, Provenance};

use crate::data::collection::{Candidates, McColumns};

/// Generator index used for candidates of a collection without MC columns.
pub const NO_GEN_PART_IDX: i32 = -1;
/// Generator flavour used for candidates of a collection without MC columns.
pub const NO_GEN_PART_FLAV: u8 = 0;

/// Merged collection; `provenance[i]` tells which input row `i` was taken from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Merged {
    pub pt: Vec<f32>,
    pub eta: Vec<f32>,
    pub phi: Vec<f32>,
    /// 0 for candidates of a collection without a supercluster.
    pub delta_eta_sc: Vec<f32>,
    pub dxy: Vec<f32>,
    pub dz: Vec<f32>,
    pub charge: Vec<i32>,
    pub pdg_id: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc: Option<McColumns>,
    pub provenance: Vec<Provenance>,
}

impl Merged {
    /// Follows `provenance` through every column of `first` and `second`.
    pub fn gather<A: Candidates, B: Candidates>(provenance: Vec<Provenance>, first: &A, second: &B) -> Self {
        let delta_eta_sc = gather(
            &provenance,
            supercluster_operand(first),
            supercluster_operand(second),
        );

        let mc = match (first.mc(), second.mc()) {
            (None, None) => None,
            (mc1, mc2) => Some(McColumns {
                gen_part_idx: gather(
                    &provenance,
                    mc_operand(mc1, |mc| &mc.gen_part_idx, NO_GEN_PART_IDX),
                    mc_operand(mc2, |mc| &mc.gen_part_idx, NO_GEN_PART_IDX),
                ),
                gen_part_flav: gather(
                    &provenance,
                    mc_operand(mc1, |mc| &mc.gen_part_flav, NO_GEN_PART_FLAV),
                    mc_operand(mc2, |mc| &mc.gen_part_flav, NO_GEN_PART_FLAV),
                ),
            }),
        };

        Merged {
            pt: gather_values(&provenance, first.pt(), second.pt()),
            eta: gather_values(&provenance, first.eta(), second.eta()),
            phi: gather_values(&provenance, first.phi(), second.phi()),
            delta_eta_sc,
            dxy: gather_values(&provenance, first.dxy(), second.dxy()),
            dz: gather_values(&provenance, first.dz(), second.dz()),
            charge: gather_values(&provenance, first.charge(), second.charge()),
            pdg_id: gather(&provenance, Operand::Scalar(A::PDG_ID), Operand::Scalar(B::PDG_ID)),
            mc,
            provenance,
        }
    }

    pub fn len(&self) -> usize {
        self.provenance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provenance.is_empty()
    }

    /// True for candidates taken from the second input.
    pub fn from_second(&self) -> Vec<bool> {
        second_mask(&self.provenance)
    }
}

fn supercluster_operand<C: Candidates>(candidates: &C) -> Operand<'_, f32> {
    match candidates.delta_eta_sc() {
        Some(values) => Operand::Values(values),
        None => Operand::Scalar(0.0),
    }
}

fn mc_operand<'a, T: Clone>(
    mc: Option<&'a McColumns>,
    column: impl Fn(&'a McColumns) -> &'a Vec<T>,
    missing: T,
) -> Operand<'a, T> {
    match mc {
        Some(mc) => Operand::from(column(mc)),
        None => Operand::Scalar(missing),
    }
}

/// Interleaves two pt-descending collections by pt; on equal pt `second` comes first.
///
/// # Example
///
/// ```rust
/// # use lepframe::combine::merge_ordered;
/// # use lepframe::data::collection::{Electrons, Muons};
/// let muons = Muons { pt: vec![30.0], eta: vec![0.0], phi: vec![0.0], dxy: vec![0.0], dz: vec![0.0],
///     charge: vec![1], pf_rel_iso03_all: vec![0.0], loose_id: vec![true], mc: None };
/// let electrons = Electrons { pt: vec![30.0], eta: vec![1.0], phi: vec![1.0], delta_eta_sc: vec![0.1],
///     dxy: vec![0.0], dz: vec![0.0], charge: vec![-1], ..Default::default() };
/// let leptons = merge_ordered(&muons, &electrons);
/// assert_eq!(leptons.pdg_id, vec![11, 13]);
/// assert_eq!(leptons.delta_eta_sc, vec![0.1, 0.0]);
/// ```
pub fn merge_ordered<A: Candidates, B: Candidates>(first: &A, second: &B) -> Merged {
    let provenance = merge_by_pt(first.pt(), second.pt());
    debug!("merged {} {} and {} {} by pt", first.len(), A::NAME, second.len(), B::NAME);
    Merged::gather(provenance, first, second)
}

/// All of `first`, then the candidates of `second` further than `dr` from every one of them.
pub fn merge_overlap_veto<A: Candidates, B: Candidates>(first: &A, second: &B, dr: f32) -> Merged {
    let provenance = overlap_veto_merge_with_radius(first.eta(), first.phi(), second.eta(), second.phi(), dr);
    debug!(
        "merged {} {} with {} of {} {}",
        first.len(),
        A::NAME,
        provenance.len() - first.len(),
        second.len(),
        B::NAME
    );
    Merged::gather(provenance, first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::collection::{Electrons, LowPtElectrons, Muons};
    use lepcore::merge::overlap::OVERLAP_DR;
    use lepcore::merge::provenance::Provenance::{First, Second};

    fn electrons() -> Electrons {
        Electrons {
            pt: vec![50.0, 20.0],
            eta: vec![0.0, 1.0],
            phi: vec![0.0, 2.0],
            delta_eta_sc: vec![0.01, 0.02],
            dxy: vec![0.001, 0.002],
            dz: vec![0.01, 0.02],
            charge: vec![1, -1],
            pf_rel_iso03_all: vec![0.0; 2],
            vid_nested_wp_bitmap: vec![0; 2],
            mc: Some(McColumns { gen_part_idx: vec![3, 7], gen_part_flav: vec![1, 1] }),
        }
    }

    fn low_pt_electrons() -> LowPtElectrons {
        LowPtElectrons {
            pt: vec![48.0, 9.0, 4.0],
            eta: vec![0.02, -1.0, 1.05],
            phi: vec![0.01, -2.0, 2.05],
            delta_eta_sc: vec![0.03, 0.04, 0.05],
            dxy: vec![0.003, 0.004, 0.005],
            dz: vec![0.03, 0.04, 0.05],
            charge: vec![1, 1, -1],
            mini_pf_rel_iso_all: vec![0.0; 3],
            id: vec![1.0; 3],
            mc: None,
        }
    }

    fn muons() -> Muons {
        Muons {
            pt: vec![50.0, 15.0],
            eta: vec![0.5, -0.5],
            phi: vec![1.0, -1.0],
            dxy: vec![0.0; 2],
            dz: vec![0.0; 2],
            charge: vec![-1, 1],
            pf_rel_iso03_all: vec![0.0; 2],
            loose_id: vec![true; 2],
            mc: None,
        }
    }

    #[test]
    fn test_overlap_veto_combination() {
        let combined = merge_overlap_veto(&electrons(), &low_pt_electrons(), OVERLAP_DR);
        assert_eq!(combined.provenance, vec![First(0), First(1), Second(1)]);
        assert_eq!(combined.pt, vec![50.0, 20.0, 9.0]);
        assert_eq!(combined.delta_eta_sc, vec![0.01, 0.02, 0.04]);
        assert_eq!(combined.from_second(), vec![false, false, true]);
        assert_eq!(combined.pdg_id, vec![11, 11, 11]);

        let mc = combined.mc.unwrap();
        assert_eq!(mc.gen_part_idx, vec![3, 7, NO_GEN_PART_IDX]);
        assert_eq!(mc.gen_part_flav, vec![1, 1, NO_GEN_PART_FLAV]);
    }

    #[test]
    fn test_ordered_combination() {
        let leptons = merge_ordered(&muons(), &electrons());
        assert_eq!(leptons.provenance, vec![Second(0), First(0), Second(1), First(1)]);
        assert_eq!(leptons.pt, vec![50.0, 50.0, 20.0, 15.0]);
        assert_eq!(leptons.pdg_id, vec![11, 13, 11, 13]);
        assert_eq!(leptons.charge, vec![1, -1, -1, 1]);
        assert_eq!(leptons.delta_eta_sc, vec![0.01, 0.0, 0.02, 0.0]);
        assert_eq!(leptons.mc.unwrap().gen_part_idx, vec![3, NO_GEN_PART_IDX, 7, NO_GEN_PART_IDX]);
    }

    #[test]
    fn test_no_mc_on_either_side() {
        let leptons = merge_ordered(&muons(), &low_pt_electrons());
        assert!(leptons.mc.is_none());
        assert_eq!(leptons.len(), 5);
    }

    #[test]
    fn test_empty_inputs() {
        let merged = merge_overlap_veto(&Muons::default(), &Electrons::default(), OVERLAP_DR);
        assert!(merged.is_empty());
        assert!(merged.pt.is_empty());
    }
}
