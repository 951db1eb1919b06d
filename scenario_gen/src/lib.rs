//! Generates the initial agents of a driving scenario on a road corridor: where each agent starts,
//! how fast it goes, and what its footprint looks like. Agents are either placed procedurally
//! along the lanes or imported from recorded vehicle tracks. Agents generated for different
//! source/sink pairs of one scenario can then be checked for collisions against each other.

#[macro_use]
extern crate log;

pub use self::config::{AgentStatesGeometriesConfig, OptionDoc, SourceSinkConfig};
pub use self::corridor::{LaneCorridor, RoadCorridor};
pub use self::error::GenerationError;
pub use self::lane_locator::find_lane_positions;
pub use self::overlaps::{find_overlaps, OverlapRecord};
pub use self::sampling::{
    fork_rng, sample_distance_uniform, sample_uniform, sample_velocity_uniform,
};
pub use self::session::{GenerationSession, TimeWindow};
pub use self::shape::AgentShape;
pub use self::state::AgentState;
pub use self::strategies::{
    AgentMetadata, AgentStatesGeometries, InteractionDataTrackIds, InteractionDataWindow,
    TrackMetadata, UniformVehicleDistribution,
};
pub use self::tracks::{load_tracks, read_tracks, MotionState, Track, TrackFile, TrackId};

mod config;
mod corridor;
mod error;
mod lane_locator;
mod overlaps;
mod sampling;
mod session;
mod shape;
mod state;
mod strategies;
mod tracks;
