use serde::{Deserialize, Serialize};

use geom::{Distance, Polygon, Pt2D};

use crate::{AgentState, GenerationError, Track};

/// The 2D footprint of an agent, in its own frame: the reference point is the origin and the
/// agent faces +x. Shared freely between agents; never mutated once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentShape {
    polygon: Polygon,
}

impl AgentShape {
    pub fn new(polygon: Polygon) -> AgentShape {
        AgentShape { polygon }
    }

    /// A rectangle reaching `front` ahead of and `rear` behind the reference point.
    pub fn rectangle(front: f64, rear: f64, width: f64) -> Result<AgentShape, GenerationError> {
        if front + rear <= 0.0 || width <= 0.0 {
            return Err(GenerationError::Geometry(format!(
                "vehicle shape with front {}, rear {}, width {} has no area",
                front, rear, width
            )));
        }
        let half_width = width / 2.0;
        Polygon::rectangle_spanning(-rear, -half_width, front, half_width)
            .map(AgentShape::new)
            .map_err(GenerationError::geometry)
    }

    /// The standard passenger car placed by procedural strategies, referenced at the rear axle.
    pub fn car_limousine() -> AgentShape {
        AgentShape::new(Polygon::must_new(vec![
            Pt2D::new(-1.0, -1.0),
            Pt2D::new(-1.0, 1.0),
            Pt2D::new(3.0, 1.0),
            Pt2D::new(3.0, -1.0),
        ]))
    }

    /// A rectangle with the recorded length and width of the tracked vehicle. Recorded positions
    /// are the vehicle's center, so the reference point sits half a wheel base behind it.
    pub fn from_track(track: &Track, wheel_base: f64) -> Result<AgentShape, GenerationError> {
        let half_length = track.length / 2.0;
        let half_base = wheel_base / 2.0;
        AgentShape::rectangle(half_length + half_base, half_length - half_base, track.width)
            .map_err(|err| {
                GenerationError::Geometry(format!("track {}: {}", track.id, err))
            })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// How far the shape reaches ahead of the reference point.
    pub fn front_dist(&self) -> Distance {
        Distance::meters(self.polygon.get_bounds().max_x)
    }

    /// How far the shape reaches behind the reference point.
    pub fn rear_dist(&self) -> Distance {
        Distance::meters(-self.polygon.get_bounds().min_x)
    }

    /// The footprint rotated to the state's heading and moved to its position.
    pub fn place(&self, state: &AgentState) -> Polygon {
        self.polygon
            .rotate_around(state.angle(), Pt2D::new(0.0, 0.0))
            .translate(state.x, state.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limousine_overhangs() {
        let shape = AgentShape::car_limousine();
        assert_eq!(shape.front_dist(), Distance::meters(3.0));
        assert_eq!(shape.rear_dist(), Distance::meters(1.0));
    }

    #[test]
    fn placed_footprint_follows_heading() {
        let shape = AgentShape::car_limousine();
        let state = AgentState::from([0.0, 10.0, 5.0, std::f64::consts::FRAC_PI_2, 0.0]);
        let bounds = shape.place(&state).get_bounds();
        // Facing +y now, so the front reaches 3m up and the sides are 1m left/right
        assert!((bounds.max_y - 8.0).abs() < 1e-9);
        assert!((bounds.min_y - 4.0).abs() < 1e-9);
        assert!((bounds.min_x - 9.0).abs() < 1e-9);
        assert!((bounds.max_x - 11.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_rectangle_is_a_geometry_error() {
        assert!(matches!(
            AgentShape::rectangle(1.0, -1.0, 2.0),
            Err(GenerationError::Geometry(_))
        ));
        assert!(matches!(
            AgentShape::rectangle(1.0, 1.0, 0.0),
            Err(GenerationError::Geometry(_))
        ));
    }
}
