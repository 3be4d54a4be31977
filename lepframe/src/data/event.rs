use serde::{Deserialize, Serialize};

use crate::data::collection::{Candidates, Electrons, LowPtElectrons, Muons};
use crate::error::Result;

/// Reconstructed lepton candidates of one collision event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub event: u64,
    pub electrons: Electrons,
    pub low_pt_electrons: LowPtElectrons,
    pub muons: Muons,
}

impl Event {
    pub fn new(event: u64, electrons: Electrons, low_pt_electrons: LowPtElectrons, muons: Muons) -> Self {
        Event { event, electrons, low_pt_electrons, muons }
    }

    /// Checks column alignment of every collection.
    pub fn validate(&self) -> Result<()> {
        self.electrons.validate()?;
        self.low_pt_electrons.validate()?;
        self.muons.validate()
    }

    pub fn num_candidates(&self) -> usize {
        self.electrons.len() + self.low_pt_electrons.len() + self.muons.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    #[test]
    fn test_event_from_partial_json() {
        let json = r#"{"event": 42, "muons": {"pt": [12.5], "eta": [0.3], "phi": [1.2], "dxy": [0.001],
            "dz": [0.01], "charge": [-1], "pf_rel_iso03_all": [0.05], "loose_id": [true]}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event, 42);
        assert_eq!(event.num_candidates(), 1);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_validate_propagates_first_error() {
        let mut event = Event::default();
        event.low_pt_electrons.pt = vec![5.0];
        assert!(matches!(
            event.validate(),
            Err(FrameError::LengthMismatch { collection: "LowPtElectron", column: "eta", .. })
        ));
    }
}
