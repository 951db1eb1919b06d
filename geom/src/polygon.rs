use std::convert::TryFrom;
use std::fmt;

use anyhow::{bail, Result};
use geo::Intersects;
use serde::{Deserialize, Serialize};

use crate::{Angle, Bounds, Pt2D, EPSILON_DIST};

/// A simple polygon without holes. The ring is always stored closed (first point == last point).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pt2D>", into = "Vec<Pt2D>")]
pub struct Polygon {
    points: Vec<Pt2D>,
}

impl Polygon {
    /// The ring may be given open or closed.
    pub fn new(mut pts: Vec<Pt2D>) -> Result<Polygon> {
        if let Some(pt) = pts.iter().find(|pt| !pt.is_finite()) {
            bail!("Polygon has a non-finite point {}", pt);
        }
        if pts.len() >= 2 && !pts[0].approx_eq(*pts.last().unwrap(), EPSILON_DIST) {
            pts.push(pts[0]);
        }
        // Closed, so 3 distinct points need 4 entries
        if pts.len() < 4 {
            bail!("Polygon needs at least 3 distinct points, got {:?}", pts);
        }

        let polygon = Polygon { points: pts };
        if polygon.signed_area().abs() < EPSILON_DIST.inner_meters() {
            bail!("Polygon has no area: {:?}", polygon.points);
        }
        Ok(polygon)
    }

    pub fn must_new(pts: Vec<Pt2D>) -> Polygon {
        Polygon::new(pts).unwrap()
    }

    /// An axis-aligned rectangle spanning [min_x, max_x] x [min_y, max_y].
    pub fn rectangle_spanning(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Polygon> {
        Polygon::new(vec![
            Pt2D::new(min_x, min_y),
            Pt2D::new(max_x, min_y),
            Pt2D::new(max_x, max_y),
            Pt2D::new(min_x, max_y),
        ])
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.points
    }

    /// Shoelace formula. Positive for counter-clockwise rings.
    fn signed_area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].x() * pair[1].y() - pair[1].x() * pair[0].y())
            .sum::<f64>()
            / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::from(&self.points)
    }

    /// Does the point lie inside this polygon or on its boundary?
    pub fn contains_pt(&self, pt: Pt2D) -> bool {
        self.to_geo().intersects(&geo::Point::from(pt))
    }

    /// Exact intersection test. Touching edges count.
    pub fn intersects(&self, other: &Polygon) -> bool {
        if !self.get_bounds().intersects(&other.get_bounds()) {
            return false;
        }
        self.to_geo().intersects(&other.to_geo())
    }

    fn transform<F: Fn(Pt2D) -> Pt2D>(&self, f: F) -> Polygon {
        Polygon {
            points: self.points.iter().map(|pt| f(*pt)).collect(),
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Polygon {
        self.transform(|pt| pt.offset(dx, dy))
    }

    pub fn rotate_around(&self, angle: Angle, pivot: Pt2D) -> Polygon {
        self.transform(|pt| pt.rotate_around(angle, pivot))
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![self
            .points
            .iter()
            .map(|pt| vec![pt.x(), pt.y()])
            .collect()]))
    }

    fn to_geo(&self) -> geo::Polygon<f64> {
        let exterior: Vec<geo::Coordinate<f64>> =
            self.points.iter().map(|pt| geo::Coordinate::from(*pt)).collect();
        geo::Polygon::new(geo::LineString(exterior), Vec::new())
    }
}

impl TryFrom<Vec<Pt2D>> for Polygon {
    type Error = anyhow::Error;

    fn try_from(pts: Vec<Pt2D>) -> Result<Polygon> {
        Polygon::new(pts)
    }
}

impl From<Polygon> for Vec<Pt2D> {
    fn from(polygon: Polygon) -> Vec<Pt2D> {
        polygon.points
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Polygon with {} points", self.points.len())?;
        for (idx, pt) in self.points.iter().enumerate() {
            writeln!(f, "  {}: {}", idx, pt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Polygon {
        Polygon::must_new(vec![
            Pt2D::new(-1.0, 0.0),
            Pt2D::new(-1.0, 1.0),
            Pt2D::new(1.0, 1.0),
            Pt2D::new(1.0, 0.0),
        ])
    }

    #[test]
    fn closes_the_ring() {
        let polygon = unit_box();
        assert_eq!(polygon.points().len(), 5);
        assert_eq!(polygon.points()[0], polygon.points()[4]);
        assert!((polygon.area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_degenerate_rings() {
        assert!(Polygon::new(vec![Pt2D::new(0.0, 0.0), Pt2D::new(1.0, 0.0)]).is_err());
        // Collinear
        assert!(Polygon::new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(1.0, 0.0),
            Pt2D::new(2.0, 0.0),
        ])
        .is_err());
    }

    #[test]
    fn contains_and_intersects() {
        let polygon = unit_box();
        assert!(polygon.contains_pt(Pt2D::new(0.0, 0.5)));
        assert!(!polygon.contains_pt(Pt2D::new(3.0, 0.5)));
        // Edges and corners count
        assert!(polygon.contains_pt(Pt2D::new(1.0, 0.5)));
        assert!(polygon.contains_pt(Pt2D::new(-1.0, 1.0)));
        assert!(!polygon.contains_pt(Pt2D::new(1.0001, 0.5)));

        assert!(polygon.intersects(&polygon.translate(1.5, 0.5)));
        assert!(!polygon.intersects(&polygon.translate(2.5, 0.0)));
        assert!(!polygon.intersects(&polygon.translate(0.0, 10.0)));
    }

    #[test]
    fn rotation_changes_footprint() {
        // A long thin bar along x, rotated upright, no longer reaches x = 3
        let bar = Polygon::rectangle_spanning(0.0, -0.1, 4.0, 0.1).unwrap();
        let probe = Polygon::rectangle_spanning(2.9, -0.05, 3.1, 0.05).unwrap();
        assert!(bar.intersects(&probe));
        assert!(!bar
            .rotate_around(Angle::degrees(90.0), Pt2D::new(0.0, 0.0))
            .intersects(&probe));
    }
}
