use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{check_positive, OptionDoc};
use crate::strategies::track_ids::DEFAULT_TRACK_FILENAME;
use crate::strategies::{import_tracks, AgentMetadata, StrategyOutput, TrackMetadata};
use crate::{
    find_lane_positions, GenerationError, GenerationSession, RoadCorridor, TimeWindow, TrackFile,
    TrackId,
};

/// Slides a time window over a recording until the vehicles present during the whole window
/// satisfy per-lane occupancy constraints. Successive scenarios of one run continue the sweep
/// where the previous one stopped, so each gets a different window.
///
/// Times here are in seconds, but the reported start/end times are in ms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InteractionDataWindow {
    pub track_filename: String,
    pub wheel_base: f64,
    pub window_length: f64,
    pub skip_time_delta: f64,
    pub min_time: f64,
    pub max_time: f64,
    pub only_on_one_lane: bool,
    /// Indexed by lane position
    pub minimum_numbers_per_lane: Vec<usize>,
}

impl Default for InteractionDataWindow {
    fn default() -> InteractionDataWindow {
        InteractionDataWindow {
            track_filename: DEFAULT_TRACK_FILENAME.to_string(),
            wheel_base: 2.7,
            window_length: 0.2,
            skip_time_delta: 0.1,
            min_time: 0.0,
            max_time: 100.0,
            only_on_one_lane: true,
            minimum_numbers_per_lane: vec![1, 0],
        }
    }
}

impl InteractionDataWindow {
    pub fn describe() -> Vec<OptionDoc> {
        OptionDoc::list(
            &InteractionDataWindow::default(),
            &[
                ("TrackFilename", "Path to the track file (csv)"),
                ("WheelBase", "Wheelbase assumed for shape calculation"),
                (
                    "WindowLength",
                    "Window length (s) for the search of agents for a scenario",
                ),
                (
                    "SkipTimeDelta",
                    "Time delta (s) between the start of the current and the next search window",
                ),
                (
                    "MinTime",
                    "Time offset (s) from the beginning of the track file to start searching",
                ),
                ("MaxTime", "Max time (s) included in the search"),
                (
                    "OnlyOnOneLane",
                    "If true, only windows where every agent is on a single lane are accepted",
                ),
                (
                    "MinimumNumbersPerLane",
                    "List where each element specifies how many vehicles must at least be on \
                     this lane. Lane position equals list index",
                ),
            ],
        )
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        check_positive("WheelBase", self.wheel_base)?;
        check_positive("WindowLength", self.window_length)?;
        // Otherwise the window never moves and the search never ends
        check_positive("SkipTimeDelta", self.skip_time_delta)?;
        if !self.min_time.is_finite() || !self.max_time.is_finite() || self.min_time > self.max_time
        {
            return Err(GenerationError::config(format!(
                "MinTime {} must not be after MaxTime {}",
                self.min_time, self.max_time
            )));
        }
        Ok(())
    }

    pub(crate) fn create(
        &self,
        road_corridor: &RoadCorridor,
        session: &mut GenerationSession,
    ) -> Result<StrategyOutput, GenerationError> {
        let track_file = session.load_tracks(&self.track_filename)?;
        let (window, track_ids) = match self.find_track_ids_moving_window(
            session.window(),
            &track_file,
            road_corridor,
        )? {
            Some(found) => found,
            None => {
                return Err(GenerationError::ExhaustedSearch {
                    scenario_idx: session.scenario_idx(),
                    max_time: self.max_time,
                });
            }
        };
        info!(
            "Scenario {}: {} tracks in window [{}s, {}s]",
            session.scenario_idx(),
            track_ids.len(),
            window.start,
            window.end
        );

        let agents = import_tracks(
            &track_file,
            &track_ids,
            Some(window.start * 1000.0),
            self.wheel_base,
            road_corridor,
        )?;
        session.set_window(window);

        Ok((
            agents.states,
            agents.shapes,
            AgentMetadata::Tracks(TrackMetadata {
                track_ids: track_ids.clone(),
                agent_ids: track_ids,
                tracks: agents.tracks,
                start_time: window.start * 1000.0,
                end_time: window.end * 1000.0,
                agent_lane_positions: agents.lane_positions,
            }),
        ))
    }

    fn advance_window(&self, cursor: Option<TimeWindow>) -> TimeWindow {
        let start = match cursor {
            None => self.min_time,
            Some(prev) => prev.start + self.skip_time_delta,
        };
        TimeWindow {
            start,
            end: start + self.window_length,
        }
    }

    /// Moves the window forward from the cursor until the constraints hold. None once the window
    /// would end after MaxTime.
    pub fn find_track_ids_moving_window(
        &self,
        cursor: Option<TimeWindow>,
        track_file: &TrackFile,
        road_corridor: &RoadCorridor,
    ) -> Result<Option<(TimeWindow, Vec<TrackId>)>, GenerationError> {
        // The sweep only terminates if the window really moves forward
        self.validate()?;

        let mut cursor = cursor;
        loop {
            let window = self.advance_window(cursor);
            cursor = Some(window);
            if window.end > self.max_time {
                return Ok(None);
            }

            let track_ids = find_track_ids(track_file, window);
            if track_ids.is_empty() {
                continue;
            }
            if self.check_window(window, &track_ids, track_file, road_corridor)? {
                return Ok(Some((window, track_ids)));
            }
            debug!("Skipping window [{}s, {}s]", window.start, window.end);
        }
    }

    /// Are the lane constraints satisfied by the vehicles present during this window?
    fn check_window(
        &self,
        window: TimeWindow,
        track_ids: &[TrackId],
        track_file: &TrackFile,
        road_corridor: &RoadCorridor,
    ) -> Result<bool, GenerationError> {
        let mut numbers_per_lane: BTreeMap<usize, usize> = BTreeMap::new();
        for id in track_ids {
            let state = track_file.get(*id)?.state_at(window.start * 1000.0)?;
            let lane_positions = find_lane_positions(state.pos(), road_corridor);
            // A single ambiguous vehicle makes the whole window unreliable
            if self.only_on_one_lane && lane_positions.len() != 1 {
                return Ok(false);
            }
            if let Some(lp) = lane_positions.first() {
                *numbers_per_lane.entry(*lp).or_insert(0) += 1;
            }
        }

        Ok(self
            .minimum_numbers_per_lane
            .iter()
            .enumerate()
            .all(|(lp, minimum)| numbers_per_lane.get(&lp).copied().unwrap_or(0) >= *minimum))
    }
}

/// Every track recorded for the whole window.
fn find_track_ids(track_file: &TrackFile, window: TimeWindow) -> Vec<TrackId> {
    track_file
        .tracks
        .values()
        .filter(|track| track.covers(window.start, window.end))
        .map(|track| track.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_tracks;
    use crate::tests::{session_with_tracks, straight_lane, two_lane_corridor, TRACKS_PATH};

    fn search(minimum_numbers_per_lane: Vec<usize>, max_time: f64) -> InteractionDataWindow {
        InteractionDataWindow {
            track_filename: TRACKS_PATH.to_string(),
            max_time,
            minimum_numbers_per_lane,
            ..Default::default()
        }
    }

    /// Lane 0 spans y in [-2, 2], lane 1 spans y in [1, 6]
    fn overlapping_corridor() -> RoadCorridor {
        RoadCorridor::new(vec![
            straight_lane(0.0, 100.0, 4.0),
            straight_lane(3.5, 100.0, 5.0),
        ])
    }

    #[test]
    fn first_window_that_fits() {
        let mut session = session_with_tracks();
        session.start_scenario(0);
        let (states, shapes, metadata) = search(vec![1, 0], 10.0)
            .create(&two_lane_corridor(100.0), &mut session)
            .unwrap();

        let metadata = metadata.as_tracks().unwrap().clone();
        assert_eq!(metadata.track_ids, vec![TrackId(1), TrackId(2)]);
        assert_eq!(states.len(), 2);
        assert_eq!(shapes.len(), 2);
        assert_eq!(metadata.start_time, 0.0);
        assert!((metadata.end_time - 200.0).abs() < 1e-6);
        assert_eq!(metadata.agent_lane_positions, vec![vec![0], vec![0]]);
        assert_eq!(session.window().unwrap().start, 0.0);
    }

    #[test]
    fn one_ambiguous_vehicle_discards_the_window() {
        // Track 2 sits at y = 1.5, on both lanes, until t = 1s. Track 1 alone on lane 0 would
        // satisfy the minimum, but the whole window is still skipped.
        let mut session = session_with_tracks();
        session.start_scenario(0);
        let (_, _, metadata) = search(vec![1, 0], 10.0)
            .create(&overlapping_corridor(), &mut session)
            .unwrap();

        let metadata = metadata.as_tracks().unwrap().clone();
        assert_eq!(metadata.track_ids, vec![TrackId(1)]);
        assert!((metadata.start_time - 900.0).abs() < 1e-6);
        assert!((metadata.end_time - 1100.0).abs() < 1e-6);
    }

    #[test]
    fn ambiguous_vehicles_count_on_their_first_lane() {
        let mut session = session_with_tracks();
        session.start_scenario(0);
        let config = InteractionDataWindow {
            only_on_one_lane: false,
            ..search(vec![2, 0], 10.0)
        };
        let (_, _, metadata) = config
            .create(&overlapping_corridor(), &mut session)
            .unwrap();
        let metadata = metadata.as_tracks().unwrap().clone();
        assert_eq!(metadata.track_ids, vec![TrackId(1), TrackId(2)]);
        assert_eq!(metadata.agent_lane_positions, vec![vec![0], vec![0, 1]]);
    }

    #[test]
    fn window_moves_forward_across_scenarios_and_resets() {
        let corridor = two_lane_corridor(100.0);
        let config = search(vec![1, 1], 10.0);
        let mut session = session_with_tracks();

        let mut starts = Vec::new();
        for idx in 0..3 {
            session.start_scenario(idx);
            let (_, _, metadata) = config.create(&corridor, &mut session).unwrap();
            let metadata = metadata.as_tracks().unwrap().clone();
            // Track 3 is the only vehicle on lane 1, from t = 1s
            assert!(metadata.track_ids.contains(&TrackId(3)));
            starts.push(metadata.start_time);
        }
        assert!((starts[0] - 1100.0).abs() < 1e-6);
        assert!(starts.windows(2).all(|pair| pair[1] > pair[0]));

        session.start_scenario(0);
        let (_, _, metadata) = config.create(&corridor, &mut session).unwrap();
        assert!((metadata.as_tracks().unwrap().start_time - 1100.0).abs() < 1e-6);
    }

    #[test]
    fn exhausted_search_keeps_the_cursor() {
        let corridor = two_lane_corridor(100.0);
        let mut session = session_with_tracks();
        session.start_scenario(0);
        search(vec![1, 0], 10.0)
            .create(&corridor, &mut session)
            .unwrap();
        let before = session.window();

        session.start_scenario(1);
        let err = search(vec![1, 1], 0.5)
            .create(&corridor, &mut session)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ExhaustedSearch {
                scenario_idx: 1,
                ..
            }
        ));
        assert_eq!(session.window(), before);
    }

    #[test]
    fn nothing_recorded_exhausts_the_search() {
        let config = search(vec![0, 0], 10.0);
        let found = config
            .find_track_ids_moving_window(None, &TrackFile::default(), &two_lane_corridor(100.0))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn frozen_window_is_rejected_instead_of_searched() {
        let config = InteractionDataWindow {
            skip_time_delta: 0.0,
            ..search(vec![1, 1], 10.0)
        };
        let track_file = read_tracks(include_str!("../../tests/data/tracks.csv").as_bytes())
            .unwrap();
        assert!(matches!(
            config.find_track_ids_moving_window(
                Some(TimeWindow {
                    start: 0.0,
                    end: 0.2
                }),
                &track_file,
                &two_lane_corridor(100.0),
            ),
            Err(GenerationError::Configuration(_))
        ));
    }
}
