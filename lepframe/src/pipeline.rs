use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lepcore::algorithm::utility::is_sorted_descending;
use lepcore::merge::overlap::OVERLAP_DR;

use crate::combine::{merge_ordered, merge_overlap_veto, Merged};
use crate::data::collection::Candidates;
use crate::data::event::Event;
use crate::error::{FrameError, Result};
use crate::selection::{ElectronSelection, LowPtElectronSelection, MuonSelection, Selection};

/// Selections and merge parameters of one analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub electron: ElectronSelection,
    pub low_pt_electron: LowPtElectronSelection,
    pub muon: MuonSelection,
    /// Veto radius between standard and low-pt electrons.
    pub overlap_dr: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            electron: ElectronSelection::default(),
            low_pt_electron: LowPtElectronSelection::default(),
            muon: MuonSelection::default(),
            overlap_dr: OVERLAP_DR,
        }
    }
}

impl AnalysisConfig {
    pub fn loose() -> Self {
        AnalysisConfig::default().with_loose_selections()
    }

    /// Replaces all three selections by their loose working points.
    pub fn with_loose_selections(self) -> Self {
        AnalysisConfig {
            electron: ElectronSelection::loose(),
            low_pt_electron: LowPtElectronSelection::loose(),
            muon: MuonSelection::loose(),
            ..self
        }
    }

    /// Loads a JSON configuration; missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FrameError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| FrameError::Config { path: path.to_path_buf(), source })
    }
}

/// Selected and combined leptons of one event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event: u64,
    pub n_good_electrons: usize,
    pub n_good_low_pt_electrons: usize,
    pub n_good_muons: usize,
    /// Good electrons followed by the non-overlapping good low-pt electrons.
    pub combined_electrons: Merged,
    /// Good muons and good electrons, ordered by pt.
    pub leptons: Merged,
}

fn ensure_pt_ordered<C: Candidates>(candidates: C, event: u64) -> C {
    if is_sorted_descending(candidates.pt()) {
        candidates
    } else {
        warn!("event {}: {} not sorted by pt, sorting", event, C::NAME);
        candidates.sorted_by_pt()
    }
}

/// Runs selection and both combinations for one event.
pub fn process_event(event: &Event, config: &AnalysisConfig) -> EventSummary {
    let electrons = config.electron.apply(&event.electrons);
    let low_pt_electrons = config.low_pt_electron.apply(&event.low_pt_electrons);
    let muons = config.muon.apply(&event.muons);

    debug!(
        "event {}: {} electrons, {} low-pt electrons, {} muons selected",
        event.event,
        electrons.len(),
        low_pt_electrons.len(),
        muons.len()
    );

    let combined_electrons = merge_overlap_veto(&electrons, &low_pt_electrons, config.overlap_dr);

    let electrons = ensure_pt_ordered(electrons, event.event);
    let muons = ensure_pt_ordered(muons, event.event);
    let leptons = merge_ordered(&muons, &electrons);

    EventSummary {
        event: event.event,
        n_good_electrons: electrons.len(),
        n_good_low_pt_electrons: low_pt_electrons.len(),
        n_good_muons: muons.len(),
        combined_electrons,
        leptons,
    }
}

/// Processes events in parallel; summaries keep the input order.
///
/// # Arguments
///
/// * `events` - validated events.
/// * `config` - analysis configuration.
/// * `num_threads` - size of the thread pool, 0 lets rayon decide.
pub fn process_events(events: &[Event], config: &AnalysisConfig, num_threads: usize) -> Result<Vec<EventSummary>> {
    let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;

    let summaries: Vec<EventSummary> = pool.install(|| {
        events.par_iter()
            .map(|event| process_event(event, config))
            .collect()
    });

    let n_leptons: usize = summaries.iter().map(|s| s.leptons.len()).sum();
    info!("processed {} events, {} selected leptons", summaries.len(), n_leptons);

    Ok(summaries)
}
