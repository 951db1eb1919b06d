use geom::Pt2D;

use crate::RoadCorridor;

/// Returns the positions of every lane corridor whose polygon contains the point, in corridor
/// order. Points on a lane's boundary belong to it. Lane polygons may overlap or share edges, so
/// this can return several lanes, or none at all.
pub fn find_lane_positions(pt: Pt2D, road_corridor: &RoadCorridor) -> Vec<usize> {
    road_corridor
        .lane_corridors
        .iter()
        .enumerate()
        .filter(|(_, lane)| lane.polygon.contains_pt(pt))
        .map(|(idx, _)| idx)
        .collect()
}
