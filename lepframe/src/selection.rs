//! Lepton working points.
//!
//! Each selection reduces one collection to a keep-mask that is the AND of
//! its kinematic cuts, the hybrid isolation and its identification
//! requirement. All bounds are strict.

use serde::{Deserialize, Serialize};

use lepcore::algorithm::utility::mask_and;
use lepcore::selection::ecal_gap::ecal_gap;
use lepcore::selection::isolation::{hybrid_iso, IsolationWorkingPoint};
use lepcore::selection::vid::{eval, VidCut};

use crate::data::collection::{Candidates, Electrons, LowPtElectrons, Muons};

pub trait Selection {
    type Input: Candidates;

    fn mask(&self, input: &Self::Input) -> Vec<bool>;

    /// The selected candidates, in input order.
    fn apply(&self, input: &Self::Input) -> Self::Input {
        input.select(&self.mask(input))
    }
}

/// Cuts on pt, |eta| and the impact parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KinematicCuts {
    pub min_pt: f32,
    pub max_abs_eta: f32,
    pub max_abs_dxy: f32,
    pub max_abs_dz: f32,
}

impl KinematicCuts {
    pub fn new(min_pt: f32, max_abs_eta: f32, max_abs_dxy: f32, max_abs_dz: f32) -> Self {
        KinematicCuts { min_pt, max_abs_eta, max_abs_dxy, max_abs_dz }
    }

    pub fn passes(&self, pt: f32, eta: f32, dxy: f32, dz: f32) -> bool {
        pt > self.min_pt
            && eta.abs() < self.max_abs_eta
            && dxy.abs() < self.max_abs_dxy
            && dz.abs() < self.max_abs_dz
    }

    pub fn mask<C: Candidates>(&self, input: &C) -> Vec<bool> {
        (0..input.len())
            .map(|i| self.passes(input.pt()[i], input.eta()[i], input.dxy()[i], input.dz()[i]))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectronSelection {
    pub kinematics: KinematicCuts,
    pub isolation: IsolationWorkingPoint,
    pub veto_ecal_gap: bool,
    pub vid_level: u8,
    /// VID criteria that are forced to pass, e.g. isolation when it is cut on separately.
    pub vid_forced: Vec<VidCut>,
}

impl Default for ElectronSelection {
    fn default() -> Self {
        ElectronSelection {
            kinematics: KinematicCuts::new(5.0, 2.5, 0.02, 0.1),
            isolation: IsolationWorkingPoint::tight(),
            veto_ecal_gap: true,
            vid_level: 1,
            vid_forced: vec![VidCut::RelPfIsoScaled],
        }
    }
}

impl ElectronSelection {
    pub fn loose() -> Self {
        ElectronSelection {
            kinematics: KinematicCuts::new(5.0, 2.5, 0.1, 0.5),
            isolation: IsolationWorkingPoint::loose(),
            ..Default::default()
        }
    }
}

impl Selection for ElectronSelection {
    type Input = Electrons;

    fn mask(&self, input: &Electrons) -> Vec<bool> {
        let mut mask = self.kinematics.mask(input);
        if self.veto_ecal_gap {
            mask = mask_and(&mask, &ecal_gap(&input.eta, &input.delta_eta_sc));
        }
        mask = mask_and(&mask, &hybrid_iso(&input.pt, &input.pf_rel_iso03_all, &self.isolation));
        let forced = VidCut::combined_mask(&self.vid_forced);
        mask_and(&mask, &eval(&input.vid_nested_wp_bitmap, self.vid_level, forced))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowPtElectronSelection {
    pub kinematics: KinematicCuts,
    pub isolation: IsolationWorkingPoint,
    pub veto_ecal_gap: bool,
    /// Lower bound (exclusive) on the BDT identification score.
    pub min_id: f32,
}

impl Default for LowPtElectronSelection {
    fn default() -> Self {
        LowPtElectronSelection {
            kinematics: KinematicCuts::new(3.0, 2.5, 0.02, 0.1),
            isolation: IsolationWorkingPoint::tight().with_mini_isolation(),
            veto_ecal_gap: true,
            min_id: 0.0,
        }
    }
}

impl LowPtElectronSelection {
    pub fn loose() -> Self {
        LowPtElectronSelection {
            kinematics: KinematicCuts::new(3.0, 2.5, 0.1, 0.5),
            isolation: IsolationWorkingPoint::loose().with_mini_isolation(),
            ..Default::default()
        }
    }
}

impl Selection for LowPtElectronSelection {
    type Input = LowPtElectrons;

    fn mask(&self, input: &LowPtElectrons) -> Vec<bool> {
        let mut mask = self.kinematics.mask(input);
        if self.veto_ecal_gap {
            mask = mask_and(&mask, &ecal_gap(&input.eta, &input.delta_eta_sc));
        }
        mask = mask_and(&mask, &hybrid_iso(&input.pt, &input.mini_pf_rel_iso_all, &self.isolation));
        let id: Vec<bool> = input.id.iter().map(|&id| id > self.min_id).collect();
        mask_and(&mask, &id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuonSelection {
    pub kinematics: KinematicCuts,
    pub isolation: IsolationWorkingPoint,
    pub require_loose_id: bool,
}

impl Default for MuonSelection {
    fn default() -> Self {
        MuonSelection {
            kinematics: KinematicCuts::new(3.5, 2.4, 0.02, 0.1),
            isolation: IsolationWorkingPoint::tight(),
            require_loose_id: true,
        }
    }
}

impl MuonSelection {
    pub fn loose() -> Self {
        MuonSelection {
            kinematics: KinematicCuts::new(3.5, 2.4, 0.1, 0.5),
            isolation: IsolationWorkingPoint::loose(),
            ..Default::default()
        }
    }
}

impl Selection for MuonSelection {
    type Input = Muons;

    fn mask(&self, input: &Muons) -> Vec<bool> {
        let mut mask = self.kinematics.mask(input);
        mask = mask_and(&mask, &hybrid_iso(&input.pt, &input.pf_rel_iso03_all, &self.isolation));
        if self.require_loose_id {
            mask = mask_and(&mask, &input.loose_id);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lepcore::selection::vid::VidBitmap;

    fn electrons() -> Electrons {
        let good = VidBitmap::uniform(2).unwrap().encode();
        let mut no_iso = VidBitmap::uniform(2).unwrap();
        no_iso.set_level(VidCut::RelPfIsoScaled, 0).unwrap();
        let mut no_hits = VidBitmap::uniform(2).unwrap();
        no_hits.set_level(VidCut::MissingHits, 0).unwrap();

        // good, in gap, low pt, not isolated, vid isolation waived, vid failing, displaced
        Electrons {
            pt: vec![40.0, 30.0, 4.0, 30.0, 20.0, 20.0, 20.0],
            eta: vec![0.5, 1.5, 0.5, 0.5, -2.0, 0.1, 0.1],
            phi: vec![0.0; 7],
            delta_eta_sc: vec![0.0; 7],
            dxy: vec![0.001, 0.001, 0.001, 0.001, 0.001, 0.001, 0.05],
            dz: vec![0.01; 7],
            charge: vec![1; 7],
            pf_rel_iso03_all: vec![0.05, 0.05, 0.05, 0.5, 0.05, 0.05, 0.05],
            vid_nested_wp_bitmap: vec![good, good, good, good, no_iso.encode(), no_hits.encode(), good],
            mc: None,
        }
    }

    #[test]
    fn test_electron_mask() {
        let mask = ElectronSelection::default().mask(&electrons());
        assert_eq!(mask, vec![true, false, false, false, true, false, false]);
    }

    #[test]
    fn test_electron_loose_relaxes_iso_and_dxy() {
        let mask = ElectronSelection::loose().mask(&electrons());
        assert_eq!(mask, vec![true, false, false, true, true, false, true]);
    }

    #[test]
    fn test_electron_apply_counts() {
        let selected = ElectronSelection::default().apply(&electrons());
        assert_eq!(selected.len(), 2);
        assert_eq!(selected.eta, vec![0.5, -2.0]);
    }

    #[test]
    fn test_low_pt_electron_mask() {
        let input = LowPtElectrons {
            pt: vec![3.0, 4.0, 4.0, 60.0, 8.0],
            eta: vec![0.0, 0.0, 0.0, 0.0, 0.0],
            phi: vec![0.0; 5],
            delta_eta_sc: vec![0.0; 5],
            dxy: vec![0.0; 5],
            dz: vec![0.0; 5],
            charge: vec![-1; 5],
            // 4 * 0.5 = 2.0 < 5 * 0.4294; 60 GeV threshold is 0.2 * (tan(1/6) / tan(0.3))^2 ~ 0.059
            mini_pf_rel_iso_all: vec![0.0, 0.5, 0.5, 0.1, 0.0],
            id: vec![1.0, 1.0, -0.5, 1.0, 0.0],
            mc: None,
        };
        let mask = LowPtElectronSelection::default().mask(&input);
        assert_eq!(mask, vec![false, true, false, false, false]);
    }

    #[test]
    fn test_muon_mask() {
        let input = Muons {
            pt: vec![3.5, 10.0, 10.0, 10.0, 30.0],
            eta: vec![0.0, 2.45, 0.0, 0.0, -1.0],
            phi: vec![0.0; 5],
            dxy: vec![0.0; 5],
            dz: vec![0.0; 5],
            charge: vec![1; 5],
            pf_rel_iso03_all: vec![0.0, 0.0, 0.0, 0.0, 0.1],
            loose_id: vec![true, true, false, true, true],
            mc: None,
        };
        let mask = MuonSelection::default().mask(&input);
        assert_eq!(mask, vec![false, false, false, true, true]);

        let mut no_id = MuonSelection::default();
        no_id.require_loose_id = false;
        assert_eq!(no_id.mask(&input), vec![false, false, true, true, true]);
    }

    #[test]
    fn test_selection_from_partial_json() {
        let selection: MuonSelection = serde_json::from_str(r#"{"require_loose_id": false}"#).unwrap();
        assert_eq!(selection.kinematics, MuonSelection::default().kinematics);
        assert!(!selection.require_loose_id);
    }
}
