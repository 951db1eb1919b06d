//! The three ways of populating a road corridor with agents.

use serde::Serialize;

pub use self::track_ids::InteractionDataTrackIds;
pub use self::uniform::UniformVehicleDistribution;
pub use self::window::InteractionDataWindow;

use crate::{
    find_lane_positions, AgentShape, AgentState, AgentStatesGeometriesConfig, GenerationError,
    RoadCorridor, Track, TrackFile, TrackId,
};

mod track_ids;
mod uniform;
mod window;

/// What a strategy produced for one road corridor. States, geometries and the per-agent metadata
/// line up by index.
#[derive(Clone, Debug, Serialize)]
pub struct AgentStatesGeometries {
    pub agent_states: Vec<AgentState>,
    pub agent_geometries: Vec<AgentShape>,
    pub metadata: AgentMetadata,
    /// The configuration exactly as it was used
    pub config: AgentStatesGeometriesConfig,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum AgentMetadata {
    Uniform {
        /// The lane label each agent was placed on
        agent_lane_positions: Vec<usize>,
    },
    Tracks(TrackMetadata),
}

/// Describes agents imported from recorded tracks.
#[derive(Clone, Debug, Serialize)]
pub struct TrackMetadata {
    pub track_ids: Vec<TrackId>,
    pub agent_ids: Vec<TrackId>,
    #[serde(skip)]
    pub tracks: Vec<Track>,
    pub start_time: f64,
    pub end_time: f64,
    /// Every lane containing each agent's initial position. Possibly empty.
    pub agent_lane_positions: Vec<Vec<usize>>,
}

impl AgentMetadata {
    pub fn num_agents(&self) -> usize {
        match self {
            AgentMetadata::Uniform {
                agent_lane_positions,
            } => agent_lane_positions.len(),
            AgentMetadata::Tracks(m) => m.agent_lane_positions.len(),
        }
    }

    /// The lanes of each agent, regardless of strategy.
    pub fn agent_lane_positions(&self) -> Vec<Vec<usize>> {
        match self {
            AgentMetadata::Uniform {
                agent_lane_positions,
            } => agent_lane_positions.iter().map(|lp| vec![*lp]).collect(),
            AgentMetadata::Tracks(m) => m.agent_lane_positions.clone(),
        }
    }

    pub fn as_tracks(&self) -> Option<&TrackMetadata> {
        match self {
            AgentMetadata::Uniform { .. } => None,
            AgentMetadata::Tracks(m) => Some(m),
        }
    }
}

pub(crate) type StrategyOutput = (Vec<AgentState>, Vec<AgentShape>, AgentMetadata);

/// Agents built from tracks, before the time window is known to the metadata.
pub(crate) struct ImportedAgents {
    pub states: Vec<AgentState>,
    pub shapes: Vec<AgentShape>,
    pub lane_positions: Vec<Vec<usize>>,
    pub tracks: Vec<Track>,
}

/// Looks up each track, takes its state at the requested time (or its own first timestamp), and
/// derives the footprint and lanes.
pub(crate) fn import_tracks(
    track_file: &TrackFile,
    track_ids: &[TrackId],
    time_ms: Option<f64>,
    wheel_base: f64,
    road_corridor: &RoadCorridor,
) -> Result<ImportedAgents, GenerationError> {
    let mut agents = ImportedAgents {
        states: Vec::new(),
        shapes: Vec::new(),
        lane_positions: Vec::new(),
        tracks: Vec::new(),
    };
    for id in track_ids {
        let track = track_file.get(*id)?;
        let state = match time_ms {
            Some(time_ms) => track.state_at(time_ms)?,
            None => track.initial_state()?,
        };
        let lanes = find_lane_positions(state.pos(), road_corridor);
        if lanes.is_empty() {
            warn!("{} starts at {} outside every lane", id, state.pos());
        }

        agents.states.push(state);
        agents.shapes.push(AgentShape::from_track(track, wheel_base)?);
        agents.lane_positions.push(lanes);
        agents.tracks.push(track.clone());
    }
    Ok(agents)
}
