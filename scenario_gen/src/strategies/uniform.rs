use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};

use geom::Distance;

use crate::config::{check_range, OptionDoc};
use crate::sampling::{sample_distance_uniform, sample_velocity_uniform};
use crate::strategies::{AgentMetadata, StrategyOutput};
use crate::{AgentShape, AgentState, GenerationError, GenerationSession, LaneCorridor, RoadCorridor};

/// Places standard cars along lanes, one after another, with randomly sampled gaps and speeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UniformVehicleDistribution {
    /// Lane positions to fill. None means every lane.
    pub lane_positions: Option<Vec<usize>>,
    pub vehicle_distance_range: (f64, f64),
    pub other_vehicle_velocity_range: (f64, f64),
    pub s_range: (f64, f64),
}

impl Default for UniformVehicleDistribution {
    fn default() -> UniformVehicleDistribution {
        UniformVehicleDistribution {
            lane_positions: None,
            vehicle_distance_range: (10.0, 20.0),
            other_vehicle_velocity_range: (20.0, 30.0),
            s_range: (0.1, 0.7),
        }
    }
}

impl UniformVehicleDistribution {
    pub fn describe() -> Vec<OptionDoc> {
        OptionDoc::list(
            &UniformVehicleDistribution::default(),
            &[
                (
                    "LanePositions",
                    "List of values out of 0:max_num_lanes-1. Vehicles are placed only on these \
                     lanes, or on all lanes if null",
                ),
                (
                    "VehicleDistanceRange",
                    "Distance range between vehicles in meters given as a pair, from which \
                     distances are sampled uniformly",
                ),
                (
                    "OtherVehicleVelocityRange",
                    "Lower and upper bound of velocity in km/h given as a pair, from which \
                     velocities are sampled uniformly",
                ),
                (
                    "SRange",
                    "Pair of values between 0 and 1 to limit placement to a certain part of the \
                     road corridor",
                ),
            ],
        )
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        check_range("VehicleDistanceRange", self.vehicle_distance_range)?;
        check_range("OtherVehicleVelocityRange", self.other_vehicle_velocity_range)?;
        check_range("SRange", self.s_range)?;
        if self.vehicle_distance_range.0 < 0.0 {
            return Err(GenerationError::config(format!(
                "VehicleDistanceRange can't be negative, got {:?}",
                self.vehicle_distance_range
            )));
        }
        if self.s_range.0 < 0.0 || self.s_range.1 > 1.0 {
            return Err(GenerationError::config(format!(
                "SRange must lie within [0, 1], got {:?}",
                self.s_range
            )));
        }
        // Otherwise placement never advances along the lane
        let shape = AgentShape::car_limousine();
        let min_step = shape.front_dist() + shape.rear_dist()
            + Distance::meters(self.vehicle_distance_range.0);
        if min_step <= Distance::ZERO {
            return Err(GenerationError::config(format!(
                "Vehicles would be placed on top of each other; the minimum step is {}",
                min_step
            )));
        }
        Ok(())
    }

    pub(crate) fn create(
        &self,
        road_corridor: &RoadCorridor,
        session: &mut GenerationSession,
    ) -> Result<StrategyOutput, GenerationError> {
        let mut rng = session.fork_rng();
        let shape = AgentShape::car_limousine();

        let mut agent_states = Vec::new();
        let mut agent_geometries = Vec::new();
        let mut agent_lane_positions = Vec::new();
        for (lane_corridor, label) in self.select_lane_corridors(road_corridor)? {
            let states = self.agents_along_lane_corridor(lane_corridor, &shape, &mut rng)?;
            agent_lane_positions.extend(std::iter::repeat(label).take(states.len()));
            agent_geometries.extend(std::iter::repeat(shape.clone()).take(states.len()));
            agent_states.extend(states);
        }

        Ok((
            agent_states,
            agent_geometries,
            AgentMetadata::Uniform {
                agent_lane_positions,
            },
        ))
    }

    /// Pairs each lane to fill with its label. Explicit lane positions label themselves; when
    /// filling every lane, labels count from 1.
    fn select_lane_corridors<'a>(
        &self,
        road_corridor: &'a RoadCorridor,
    ) -> Result<Vec<(&'a LaneCorridor, usize)>, GenerationError> {
        match self.lane_positions {
            Some(ref lane_positions) => lane_positions
                .iter()
                .map(|lp| {
                    road_corridor
                        .get(*lp)
                        .map(|lane| (lane, *lp))
                        .ok_or_else(|| {
                            GenerationError::config(format!(
                                "LanePositions has {}, but the road corridor only has {} lanes",
                                lp,
                                road_corridor.num_lanes()
                            ))
                        })
                })
                .collect(),
            None => Ok(road_corridor
                .lane_corridors
                .iter()
                .enumerate()
                .map(|(idx, lane)| (lane, idx + 1))
                .collect()),
        }
    }

    fn agents_along_lane_corridor(
        &self,
        lane_corridor: &LaneCorridor,
        shape: &AgentShape,
        rng: &mut XorShiftRng,
    ) -> Result<Vec<AgentState>, GenerationError> {
        let center_line = &lane_corridor.center_line;
        let length = center_line.length();
        let vehicle_length = shape.front_dist() + shape.rear_dist();

        let mut states = Vec::new();
        let mut dist_along = self.s_range.0 * length;
        while dist_along < self.s_range.1 * length {
            let (pt, angle) = center_line
                .dist_along(dist_along)
                .map_err(GenerationError::geometry)?;
            let velocity = sample_velocity_uniform(rng, self.other_vehicle_velocity_range);
            states.push(AgentState::new(0.0, pt, angle, velocity));

            dist_along += vehicle_length
                + Distance::meters(sample_distance_uniform(rng, self.vehicle_distance_range));
        }
        Ok(states)
    }
}
