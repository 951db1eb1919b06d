use serde::{Deserialize, Serialize};

use geom::{PolyLine, Polygon};

/// A single-lane stretch of road. Identified only by its position in the parent RoadCorridor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaneCorridor {
    pub center_line: PolyLine,
    pub polygon: Polygon,
}

/// Lane corridors of one road section between a source and a sink, ordered by lane position.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoadCorridor {
    pub lane_corridors: Vec<LaneCorridor>,
}

impl RoadCorridor {
    pub fn new(lane_corridors: Vec<LaneCorridor>) -> RoadCorridor {
        RoadCorridor { lane_corridors }
    }

    pub fn num_lanes(&self) -> usize {
        self.lane_corridors.len()
    }

    pub fn get(&self, lane_position: usize) -> Option<&LaneCorridor> {
        self.lane_corridors.get(lane_position)
    }
}
