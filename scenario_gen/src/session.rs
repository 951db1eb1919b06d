use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::sampling::fork_rng;
use crate::{load_tracks, GenerationError, TrackFile};

/// A time interval in seconds, as searched by the moving window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

/// Everything that carries over between strategy invocations within one scenario generation run:
/// the random source, the moving-window cursor, and the parsed track files. Owned by the driver;
/// separate runs use separate sessions.
pub struct GenerationSession {
    rng: XorShiftRng,
    scenario_idx: usize,
    window: Option<TimeWindow>,
    track_files: BTreeMap<String, Arc<TrackFile>>,
}

impl GenerationSession {
    pub fn new(rng_seed: u64) -> GenerationSession {
        GenerationSession {
            rng: XorShiftRng::seed_from_u64(rng_seed),
            scenario_idx: 0,
            window: None,
            track_files: BTreeMap::new(),
        }
    }

    /// Call before generating each scenario. Index 0 means a new run starts, so the moving window
    /// goes back to the beginning.
    pub fn start_scenario(&mut self, scenario_idx: usize) {
        self.scenario_idx = scenario_idx;
        if scenario_idx == 0 {
            self.window = None;
        }
    }

    pub fn scenario_idx(&self) -> usize {
        self.scenario_idx
    }

    /// The last window accepted in this run, if any.
    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }

    pub(crate) fn set_window(&mut self, window: TimeWindow) {
        if let Some(prev) = self.window {
            assert!(
                window.start >= prev.start,
                "moving window went backwards from {:?} to {:?}",
                prev,
                window
            );
        }
        self.window = Some(window);
    }

    /// Each strategy invocation draws from its own generator, forked from the session's.
    pub fn fork_rng(&mut self) -> XorShiftRng {
        fork_rng(&mut self.rng)
    }

    /// Parses a track file the first time it's requested, then reuses it.
    pub fn load_tracks(&mut self, path: &str) -> Result<Arc<TrackFile>, GenerationError> {
        if let Some(file) = self.track_files.get(path) {
            return Ok(file.clone());
        }
        let file = Arc::new(load_tracks(path)?);
        info!("Loaded {} tracks from {}", file.len(), path);
        self.track_files.insert(path.to_string(), file.clone());
        Ok(file)
    }

    /// Pre-seeds the cache, so `path` is never read from disk.
    pub fn insert_tracks(&mut self, path: &str, tracks: TrackFile) {
        self.track_files.insert(path.to_string(), Arc::new(tracks));
    }
}
