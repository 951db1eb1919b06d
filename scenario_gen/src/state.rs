use serde::{Deserialize, Serialize};

use geom::{Angle, Pt2D};

/// The initial kinematic state of one agent, consumed positionally by the simulation as
/// `[time, x, y, heading, velocity]`. For procedurally placed agents, time is just 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 5]", into = "[f64; 5]")]
pub struct AgentState {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    /// Radians, counter-clockwise from +x
    pub heading: f64,
    pub velocity: f64,
}

impl AgentState {
    pub const TIME: usize = 0;
    pub const X_POSITION: usize = 1;
    pub const Y_POSITION: usize = 2;
    pub const THETA_POSITION: usize = 3;
    pub const VEL_POSITION: usize = 4;

    pub fn new(time: f64, pos: Pt2D, heading: Angle, velocity: f64) -> AgentState {
        AgentState {
            time,
            x: pos.x(),
            y: pos.y(),
            heading: heading.radians(),
            velocity,
        }
    }

    pub fn pos(&self) -> Pt2D {
        Pt2D::new(self.x, self.y)
    }

    pub fn angle(&self) -> Angle {
        Angle::new_rads(self.heading)
    }

    pub fn to_array(self) -> [f64; 5] {
        [self.time, self.x, self.y, self.heading, self.velocity]
    }
}

impl From<[f64; 5]> for AgentState {
    fn from(raw: [f64; 5]) -> AgentState {
        AgentState {
            time: raw[AgentState::TIME],
            x: raw[AgentState::X_POSITION],
            y: raw[AgentState::Y_POSITION],
            heading: raw[AgentState::THETA_POSITION],
            velocity: raw[AgentState::VEL_POSITION],
        }
    }
}

impl From<AgentState> for [f64; 5] {
    fn from(state: AgentState) -> [f64; 5] {
        state.to_array()
    }
}
