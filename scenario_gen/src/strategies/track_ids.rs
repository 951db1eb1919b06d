use serde::{Deserialize, Serialize};

use crate::config::{check_positive, OptionDoc};
use crate::strategies::{import_tracks, AgentMetadata, StrategyOutput, TrackMetadata};
use crate::{GenerationError, GenerationSession, RoadCorridor, TrackId};

/// Imports a fixed set of recorded vehicles, by track id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InteractionDataTrackIds {
    pub track_filename: String,
    pub track_ids: Vec<TrackId>,
    /// In ms. When absent, each track starts at its own first timestamp.
    pub start_ts: Option<f64>,
    /// In ms. When absent, the first track's last timestamp.
    pub end_ts: Option<f64>,
    pub wheel_base: f64,
}

impl Default for InteractionDataTrackIds {
    fn default() -> InteractionDataTrackIds {
        InteractionDataTrackIds {
            track_filename: DEFAULT_TRACK_FILENAME.to_string(),
            track_ids: vec![TrackId(1)],
            start_ts: None,
            end_ts: None,
            wheel_base: 2.7,
        }
    }
}

pub(crate) const DEFAULT_TRACK_FILENAME: &str = "data/vehicle_tracks_000.csv";

impl InteractionDataTrackIds {
    pub fn describe() -> Vec<OptionDoc> {
        OptionDoc::list(
            &InteractionDataTrackIds::default(),
            &[
                ("TrackFilename", "Path to the track file (csv)"),
                ("TrackIds", "IDs of the vehicle tracks to import"),
                (
                    "StartTs",
                    "Timestamp when to start the scenario (ms). Each track's first timestamp if \
                     null",
                ),
                (
                    "EndTs",
                    "Timestamp when to end the scenario (ms). The first track's last timestamp \
                     if null",
                ),
                ("WheelBase", "Wheelbase assumed for shape calculation"),
            ],
        )
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        check_positive("WheelBase", self.wheel_base)?;
        if let (Some(start), Some(end)) = (self.start_ts, self.end_ts) {
            if start > end {
                return Err(GenerationError::config(format!(
                    "StartTs {} is after EndTs {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn create(
        &self,
        road_corridor: &RoadCorridor,
        session: &mut GenerationSession,
    ) -> Result<StrategyOutput, GenerationError> {
        let track_file = session.load_tracks(&self.track_filename)?;
        let agents = import_tracks(
            &track_file,
            &self.track_ids,
            self.start_ts,
            self.wheel_base,
            road_corridor,
        )?;

        let start_time = self.start_ts.unwrap_or_else(|| {
            agents
                .tracks
                .first()
                .map(|t| t.time_stamp_ms_first as f64)
                .unwrap_or(0.0)
        });
        let end_time = self.end_ts.unwrap_or_else(|| {
            agents
                .tracks
                .first()
                .map(|t| t.time_stamp_ms_last as f64)
                .unwrap_or(0.0)
        });

        Ok((
            agents.states,
            agents.shapes,
            AgentMetadata::Tracks(TrackMetadata {
                track_ids: self.track_ids.clone(),
                agent_ids: self.track_ids.clone(),
                tracks: agents.tracks,
                start_time,
                end_time,
                agent_lane_positions: agents.lane_positions,
            }),
        ))
    }
}
