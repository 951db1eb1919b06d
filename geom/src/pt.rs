use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Angle, Distance};

/// A point in the local map frame, in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        if !x.is_finite() || !y.is_finite() {
            panic!("Bad Pt2D {}, {}", x, y);
        }

        Pt2D { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn dist_to(self, to: Pt2D) -> Distance {
        Distance::meters((self.x - to.x).hypot(self.y - to.y))
    }

    pub fn approx_eq(self, other: Pt2D, threshold: Distance) -> bool {
        self.dist_to(other) <= threshold
    }

    pub fn angle_to(self, to: Pt2D) -> Angle {
        Angle::new_rads((to.y - self.y).atan2(to.x - self.x))
    }

    pub fn offset(self, dx: f64, dy: f64) -> Pt2D {
        Pt2D::new(self.x + dx, self.y + dy)
    }

    /// Rotates counter-clockwise by `angle` around `pivot`.
    pub fn rotate_around(self, angle: Angle, pivot: Pt2D) -> Pt2D {
        let (sin, cos) = angle.radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Pt2D::new(
            pivot.x + dx * cos - dy * sin,
            pivot.y + dx * sin + dy * cos,
        )
    }

    /// Interpolates towards `other`. `pct` 0 gives self, 1 gives other.
    pub fn lerp(self, other: Pt2D, pct: f64) -> Pt2D {
        Pt2D::new(
            self.x + pct * (other.x - self.x),
            self.y + pct * (other.y - self.y),
        )
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({0}, {1})", self.x, self.y)
    }
}

impl From<Pt2D> for geo::Coordinate<f64> {
    fn from(pt: Pt2D) -> Self {
        geo::Coordinate { x: pt.x, y: pt.y }
    }
}

impl From<Pt2D> for geo::Point<f64> {
    fn from(pt: Pt2D) -> Self {
        geo::Point::new(pt.x, pt.y)
    }
}
