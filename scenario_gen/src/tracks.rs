//! Recorded vehicle tracks, in the CSV layout of the INTERACTION dataset:
//! `track_id,frame_id,timestamp_ms,agent_type,x,y,vx,vy,psi_rad,length,width`.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

use geom::Angle;

use crate::{AgentState, GenerationError};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub usize);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Track #{}", self.0)
    }
}

/// One recorded sample of a vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub time_stamp_ms: i64,
    /// Center of the vehicle
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub psi_rad: f64,
}

impl MotionState {
    /// Time in seconds, speed as the magnitude of the velocity vector.
    pub fn to_agent_state(&self) -> AgentState {
        AgentState {
            time: self.time_stamp_ms as f64 / 1000.0,
            x: self.x,
            y: self.y,
            heading: self.psi_rad,
            velocity: self.vx.hypot(self.vy),
        }
    }
}

/// The recorded time series of one external vehicle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub agent_type: String,
    pub length: f64,
    pub width: f64,
    pub time_stamp_ms_first: i64,
    pub time_stamp_ms_last: i64,
    /// Keyed by timestamp in ms
    pub motion_states: BTreeMap<i64, MotionState>,
}

impl Track {
    /// Does the recording cover the whole window, given in seconds?
    pub fn covers(&self, start_secs: f64, end_secs: f64) -> bool {
        self.time_stamp_ms_first as f64 / 1000.0 <= start_secs
            && self.time_stamp_ms_last as f64 / 1000.0 >= end_secs
    }

    /// The state at some time in ms. Between two recorded samples, position, velocity and heading
    /// are interpolated linearly; the heading along the shorter arc.
    pub fn state_at(&self, time_ms: f64) -> Result<AgentState, GenerationError> {
        if !(self.time_stamp_ms_first as f64 <= time_ms && time_ms <= self.time_stamp_ms_last as f64)
        {
            return Err(GenerationError::data(
                Some(self.id),
                format!(
                    "{} has no state at {}ms, only [{}, {}]ms is recorded",
                    self.id, time_ms, self.time_stamp_ms_first, self.time_stamp_ms_last
                ),
            ));
        }

        let floor = time_ms.floor() as i64;
        let before = self.motion_states.range(..=floor).next_back();
        let after = self.motion_states.range(floor..).find(|(t, _)| **t as f64 >= time_ms);
        match (before, after) {
            (Some((_, state)), _) if state.time_stamp_ms as f64 == time_ms => {
                Ok(state.to_agent_state())
            }
            (Some((t1, s1)), Some((t2, s2))) => {
                let pct = if t1 == t2 {
                    0.0
                } else {
                    (time_ms - *t1 as f64) / ((*t2 - *t1) as f64)
                };
                let lerp = |a: f64, b: f64| a + pct * (b - a);
                let heading = Angle::new_rads(s1.psi_rad)
                    .interpolate(Angle::new_rads(s2.psi_rad), pct)
                    .radians();
                Ok(AgentState {
                    time: time_ms / 1000.0,
                    x: lerp(s1.x, s2.x),
                    y: lerp(s1.y, s2.y),
                    heading,
                    velocity: lerp(s1.vx, s2.vx).hypot(lerp(s1.vy, s2.vy)),
                })
            }
            _ => Err(GenerationError::data(
                Some(self.id),
                format!("{} has a gap around {}ms", self.id, time_ms),
            )),
        }
    }

    pub fn initial_state(&self) -> Result<AgentState, GenerationError> {
        self.state_at(self.time_stamp_ms_first as f64)
    }
}

/// Every track in one recording, ordered by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackFile {
    pub tracks: BTreeMap<TrackId, Track>,
}

impl TrackFile {
    pub fn get(&self, id: TrackId) -> Result<&Track, GenerationError> {
        self.tracks
            .get(&id)
            .ok_or_else(|| GenerationError::data(Some(id), format!("{} isn't in the track file", id)))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct Record {
    track_id: usize,
    #[allow(dead_code)]
    frame_id: usize,
    timestamp_ms: i64,
    agent_type: String,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    psi_rad: f64,
    length: f64,
    width: f64,
}

/// Reads every track from a CSV file.
pub fn load_tracks(path: &str) -> Result<TrackFile, GenerationError> {
    let file = fs_err::File::open(path).map_err(|err| GenerationError::data(None, err.to_string()))?;
    read_tracks(file).map_err(|err| match err {
        GenerationError::DataLoad { track_id, message } => GenerationError::DataLoad {
            track_id,
            message: format!("{}: {}", path, message),
        },
        err => err,
    })
}

/// Parses tracks from any CSV source. Rows of a track may appear in any order.
pub fn read_tracks<R: Read>(reader: R) -> Result<TrackFile, GenerationError> {
    let mut tracks: BTreeMap<TrackId, Track> = BTreeMap::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec.map_err(|err| GenerationError::data(None, err.to_string()))?;
        let id = TrackId(rec.track_id);
        let track = tracks.entry(id).or_insert_with(|| Track {
            id,
            agent_type: rec.agent_type.clone(),
            length: rec.length,
            width: rec.width,
            time_stamp_ms_first: rec.timestamp_ms,
            time_stamp_ms_last: rec.timestamp_ms,
            motion_states: BTreeMap::new(),
        });
        track.time_stamp_ms_first = track.time_stamp_ms_first.min(rec.timestamp_ms);
        track.time_stamp_ms_last = track.time_stamp_ms_last.max(rec.timestamp_ms);
        if track
            .motion_states
            .insert(
                rec.timestamp_ms,
                MotionState {
                    time_stamp_ms: rec.timestamp_ms,
                    x: rec.x,
                    y: rec.y,
                    vx: rec.vx,
                    vy: rec.vy,
                    psi_rad: rec.psi_rad,
                },
            )
            .is_some()
        {
            return Err(GenerationError::data(
                Some(id),
                format!("{} has two rows at {}ms", id, rec.timestamp_ms),
            ));
        }
    }
    Ok(TrackFile { tracks })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "track_id,frame_id,timestamp_ms,agent_type,x,y,vx,vy,psi_rad,length,width
1,1,100,car,0.0,0.0,10.0,0.0,0.0,4.5,1.8
1,2,200,car,1.0,0.0,10.0,0.0,0.0,4.5,1.8
2,2,200,car,5.0,4.0,0.0,3.0,1.5707963,4.0,2.0
1,3,300,car,2.0,0.0,6.0,8.0,0.0,4.5,1.8
";

    #[test]
    fn groups_rows_by_track() {
        let file = read_tracks(CSV.as_bytes()).unwrap();
        assert_eq!(file.len(), 2);

        let track = file.get(TrackId(1)).unwrap();
        assert_eq!(track.time_stamp_ms_first, 100);
        assert_eq!(track.time_stamp_ms_last, 300);
        assert_eq!(track.motion_states.len(), 3);
        assert_eq!(track.length, 4.5);

        let err = file.get(TrackId(7)).unwrap_err();
        assert_eq!(err.track_id(), Some(TrackId(7)));
    }

    #[test]
    fn exact_and_interpolated_states() {
        let file = read_tracks(CSV.as_bytes()).unwrap();
        let track = file.get(TrackId(1)).unwrap();

        let exact = track.state_at(300.0).unwrap();
        assert_eq!(exact.to_array(), [0.3, 2.0, 0.0, 0.0, 10.0]);

        let between = track.state_at(150.0).unwrap();
        assert!((between.x - 0.5).abs() < 1e-9);
        assert!((between.velocity - 10.0).abs() < 1e-9);
        assert!((between.time - 0.15).abs() < 1e-9);

        assert!(track.state_at(50.0).is_err());
        assert!(track.state_at(301.0).is_err());
    }

    #[test]
    fn duplicate_timestamps_are_rejected() {
        let csv = "track_id,frame_id,timestamp_ms,agent_type,x,y,vx,vy,psi_rad,length,width
3,1,100,car,0.0,0.0,1.0,0.0,0.0,4.5,1.8
3,1,100,car,0.0,0.0,1.0,0.0,0.0,4.5,1.8
";
        let err = read_tracks(csv.as_bytes()).unwrap_err();
        assert_eq!(err.track_id(), Some(TrackId(3)));
    }
}
