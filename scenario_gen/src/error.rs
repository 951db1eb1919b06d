use thiserror::Error;

use crate::TrackId;

/// Everything that can go wrong while generating agent states and geometries. None of these are
/// retried; the scenario generation driver decides what to do.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// An option value is invalid or out of range. Fix the config before rerunning.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A track file couldn't be read, or a requested track isn't in it.
    #[error("couldn't load track data: {message}")]
    DataLoad {
        track_id: Option<TrackId>,
        message: String,
    },
    /// The moving window reached MaxTime without satisfying the occupancy constraints.
    #[error("no track ids found for scenario idx {scenario_idx} before reaching MaxTime {max_time}s. Consider lowering the number of scenarios.")]
    ExhaustedSearch { scenario_idx: usize, max_time: f64 },
    /// A shape or curve is malformed.
    #[error("bad geometry: {0}")]
    Geometry(String),
}

impl GenerationError {
    pub(crate) fn config<S: Into<String>>(msg: S) -> GenerationError {
        GenerationError::Configuration(msg.into())
    }

    pub(crate) fn data<S: Into<String>>(track_id: Option<TrackId>, msg: S) -> GenerationError {
        GenerationError::DataLoad {
            track_id,
            message: msg.into(),
        }
    }

    pub(crate) fn geometry<E: std::fmt::Display>(err: E) -> GenerationError {
        GenerationError::Geometry(err.to_string())
    }

    /// The track responsible for a DataLoad failure, if known.
    pub fn track_id(&self) -> Option<TrackId> {
        match self {
            GenerationError::DataLoad { track_id, .. } => *track_id,
            _ => None,
        }
    }
}
