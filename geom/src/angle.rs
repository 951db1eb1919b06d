use std::{f64, fmt};

use serde::{Deserialize, Serialize};

/// An angle, stored in radians. Not normalized; whatever atan2 or the caller produced is kept.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub fn new_rads(rads: f64) -> Angle {
        Angle(rads)
    }

    pub fn degrees(degs: f64) -> Angle {
        Angle(degs.to_radians())
    }

    /// The raw value in radians, as it was constructed.
    pub fn radians(self) -> f64 {
        self.0
    }

    /// In [0, 2pi)
    pub fn normalized_radians(self) -> f64 {
        self.0.rem_euclid(2.0 * f64::consts::PI)
    }

    pub fn normalized_degrees(self) -> f64 {
        self.normalized_radians().to_degrees()
    }

    /// The signed difference to reach `other` along the shortest arc, in (-pi, pi].
    pub fn shortest_rotation_towards(self, other: Angle) -> f64 {
        let diff = (other.0 - self.0).rem_euclid(2.0 * f64::consts::PI);
        if diff > f64::consts::PI {
            diff - 2.0 * f64::consts::PI
        } else {
            diff
        }
    }

    /// Linearly interpolates along the shortest arc. `pct` 0 gives self, 1 gives other.
    pub fn interpolate(self, other: Angle, pct: f64) -> Angle {
        Angle(self.0 + pct * self.shortest_rotation_towards(other))
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.normalized_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_wraps_around() {
        let a = Angle::degrees(350.0);
        let b = Angle::degrees(10.0);
        let mid = a.interpolate(b, 0.5);
        assert!(mid.normalized_degrees() < 1e-9 || (360.0 - mid.normalized_degrees()) < 1e-9);

        let quarter = Angle::degrees(0.0).interpolate(Angle::degrees(90.0), 0.5);
        assert!((quarter.normalized_degrees() - 45.0).abs() < 1e-9);
    }
}
