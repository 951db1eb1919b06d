use std::convert::TryFrom;
use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Angle, Distance, Pt2D, EPSILON_DIST};

/// An open curve made of straight segments, queried by arc length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pt2D>", into = "Vec<Pt2D>")]
pub struct PolyLine {
    pts: Vec<Pt2D>,
    // Cached, since every arc-length query needs it
    length: Distance,
}

impl PolyLine {
    pub fn new(pts: Vec<Pt2D>) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine");
        }
        if let Some(pt) = pts.iter().find(|pt| !pt.is_finite()) {
            bail!("PolyLine has a non-finite point {}", pt);
        }
        if pts
            .windows(2)
            .any(|pair| pair[0].approx_eq(pair[1], EPSILON_DIST))
        {
            bail!("PolyLine has repeat adjacent points");
        }

        let length = pts.windows(2).map(|pair| pair[0].dist_to(pair[1])).sum();
        Ok(PolyLine { pts, length })
    }

    pub fn must_new(pts: Vec<Pt2D>) -> PolyLine {
        PolyLine::new(pts).unwrap()
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn length(&self) -> Distance {
        self.length
    }

    /// Returns the point at some arc length, and the tangent angle of the segment containing it.
    /// A distance landing exactly on an interior vertex uses the segment starting there.
    pub fn dist_along(&self, dist_along: Distance) -> Result<(Pt2D, Angle)> {
        if dist_along < Distance::ZERO {
            bail!("dist_along {} is negative", dist_along);
        }
        if dist_along > self.length + EPSILON_DIST {
            bail!(
                "dist_along {} is longer than the PolyLine ({})",
                dist_along,
                self.length
            );
        }

        let num_lines = self.pts.len() - 1;
        let mut dist_left = dist_along;
        for (idx, pair) in self.pts.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let line_length = from.dist_to(to);
            if dist_left < line_length || idx == num_lines - 1 {
                let pct = (dist_left / line_length).clamp(0.0, 1.0);
                return Ok((from.lerp(to, pct), from.angle_to(to)));
            }
            dist_left -= line_length;
        }
        unreachable!()
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::LineString(
            self.pts.iter().map(|pt| vec![pt.x(), pt.y()]).collect(),
        ))
    }
}

impl TryFrom<Vec<Pt2D>> for PolyLine {
    type Error = anyhow::Error;

    fn try_from(pts: Vec<Pt2D>) -> Result<PolyLine> {
        PolyLine::new(pts)
    }
}

impl From<PolyLine> for Vec<Pt2D> {
    fn from(pl: PolyLine) -> Vec<Pt2D> {
        pl.pts
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PolyLine::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> PolyLine {
        PolyLine::must_new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(10.0, 0.0),
            Pt2D::new(10.0, 5.0),
        ])
    }

    #[test]
    fn length_sums_segments() {
        assert_eq!(l_shape().length(), Distance::meters(15.0));
    }

    #[test]
    fn dist_along_follows_segments() {
        let pl = l_shape();

        let (pt, angle) = pl.dist_along(Distance::meters(4.0)).unwrap();
        assert!(pt.approx_eq(Pt2D::new(4.0, 0.0), EPSILON_DIST));
        assert_eq!(angle.radians(), 0.0);

        // On the corner, the second segment wins
        let (pt, angle) = pl.dist_along(Distance::meters(10.0)).unwrap();
        assert!(pt.approx_eq(Pt2D::new(10.0, 0.0), EPSILON_DIST));
        assert!((angle.normalized_degrees() - 90.0).abs() < 1e-9);

        let (pt, _) = pl.dist_along(Distance::meters(15.0)).unwrap();
        assert!(pt.approx_eq(Pt2D::new(10.0, 5.0), EPSILON_DIST));

        assert!(pl.dist_along(Distance::meters(15.1)).is_err());
        assert!(pl.dist_along(Distance::meters(-0.1)).is_err());
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(PolyLine::new(vec![Pt2D::new(0.0, 0.0)]).is_err());
        assert!(PolyLine::new(vec![Pt2D::new(1.0, 1.0), Pt2D::new(1.0, 1.0)]).is_err());
    }

    #[test]
    fn deserializes_from_points() {
        let pl: PolyLine = serde_json::from_str(r#"[{"x": 0, "y": 0}, {"x": 3, "y": 4}]"#).unwrap();
        assert_eq!(pl.length(), Distance::meters(5.0));

        let bad: Result<PolyLine, _> = serde_json::from_str(r#"[{"x": 0, "y": 0}]"#);
        assert!(bad.is_err());
    }
}
