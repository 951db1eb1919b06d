use serde::{Deserialize, Serialize};

use crate::strategies::{
    AgentStatesGeometries, InteractionDataTrackIds, InteractionDataWindow,
    UniformVehicleDistribution,
};
use crate::{GenerationError, GenerationSession, RoadCorridor};

/// Picks how agents populate one road corridor. The strategy is chosen by the `"Type"` field and
/// fixed at parse time; the remaining fields are that strategy's options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum AgentStatesGeometriesConfig {
    UniformVehicleDistribution(UniformVehicleDistribution),
    InteractionDataTrackIdsStatesGeometries(InteractionDataTrackIds),
    InteractionDataWindowStatesGeometries(InteractionDataWindow),
}

impl AgentStatesGeometriesConfig {
    /// Parses and validates.
    pub fn from_json(raw: &str) -> Result<AgentStatesGeometriesConfig, GenerationError> {
        let config: AgentStatesGeometriesConfig = serde_json::from_str(raw)
            .map_err(|err| GenerationError::config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        match self {
            AgentStatesGeometriesConfig::UniformVehicleDistribution(c) => c.validate(),
            AgentStatesGeometriesConfig::InteractionDataTrackIdsStatesGeometries(c) => c.validate(),
            AgentStatesGeometriesConfig::InteractionDataWindowStatesGeometries(c) => c.validate(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AgentStatesGeometriesConfig::UniformVehicleDistribution(_) => {
                "UniformVehicleDistribution"
            }
            AgentStatesGeometriesConfig::InteractionDataTrackIdsStatesGeometries(_) => {
                "InteractionDataTrackIdsStatesGeometries"
            }
            AgentStatesGeometriesConfig::InteractionDataWindowStatesGeometries(_) => {
                "InteractionDataWindowStatesGeometries"
            }
        }
    }

    /// Every option of this strategy, with its description and default value.
    pub fn describe(&self) -> Vec<OptionDoc> {
        match self {
            AgentStatesGeometriesConfig::UniformVehicleDistribution(_) => {
                UniformVehicleDistribution::describe()
            }
            AgentStatesGeometriesConfig::InteractionDataTrackIdsStatesGeometries(_) => {
                InteractionDataTrackIds::describe()
            }
            AgentStatesGeometriesConfig::InteractionDataWindowStatesGeometries(_) => {
                InteractionDataWindow::describe()
            }
        }
    }

    /// One config per strategy, with every option at its default.
    pub fn all_defaults() -> Vec<AgentStatesGeometriesConfig> {
        vec![
            AgentStatesGeometriesConfig::UniformVehicleDistribution(Default::default()),
            AgentStatesGeometriesConfig::InteractionDataTrackIdsStatesGeometries(
                Default::default(),
            ),
            AgentStatesGeometriesConfig::InteractionDataWindowStatesGeometries(Default::default()),
        ]
    }

    /// Populates the road corridor with agents. The config is validated first, since the fields
    /// are public and may have been set without going through `from_json`.
    pub fn create_from_config(
        &self,
        road_corridor: &RoadCorridor,
        session: &mut GenerationSession,
    ) -> Result<AgentStatesGeometries, GenerationError> {
        self.validate()?;
        let (agent_states, agent_geometries, metadata) = match self {
            AgentStatesGeometriesConfig::UniformVehicleDistribution(c) => {
                c.create(road_corridor, session)?
            }
            AgentStatesGeometriesConfig::InteractionDataTrackIdsStatesGeometries(c) => {
                c.create(road_corridor, session)?
            }
            AgentStatesGeometriesConfig::InteractionDataWindowStatesGeometries(c) => {
                c.create(road_corridor, session)?
            }
        };
        check_lengths(
            self.type_name(),
            agent_states.len(),
            agent_geometries.len(),
            metadata.num_agents(),
        )?;
        debug!(
            "{} placed {} agents on {} lanes",
            self.type_name(),
            agent_states.len(),
            road_corridor.num_lanes()
        );
        Ok(AgentStatesGeometries {
            agent_states,
            agent_geometries,
            metadata,
            config: self.clone(),
        })
    }
}

/// Help text for one option.
#[derive(Clone, Debug, Serialize)]
pub struct OptionDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub default: serde_json::Value,
}

impl OptionDoc {
    /// Pairs descriptions with the values found in a serialized default config.
    pub(crate) fn list<T: Serialize>(
        defaults: &T,
        descriptions: &[(&'static str, &'static str)],
    ) -> Vec<OptionDoc> {
        let values = serde_json::to_value(defaults).unwrap_or(serde_json::Value::Null);
        descriptions
            .iter()
            .map(|&(name, description)| OptionDoc {
                name,
                description,
                default: values
                    .get(name)
                    .cloned()
                    .unwrap_or(serde_json::Value::Null),
            })
            .collect()
    }
}

/// One source/sink entry of a scenario: the road corridor between them and how to populate it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceSinkConfig {
    pub description: String,
    pub road_corridor: RoadCorridor,
    pub config_agent_states_geometries: AgentStatesGeometriesConfig,
}

/// States, geometries and lane positions must line up by index.
fn check_lengths(
    type_name: &str,
    num_states: usize,
    num_geometries: usize,
    num_lane_positions: usize,
) -> Result<(), GenerationError> {
    if num_states != num_geometries || num_states != num_lane_positions {
        return Err(GenerationError::Geometry(format!(
            "{} produced {} states, {} geometries and {} lane positions",
            type_name, num_states, num_geometries, num_lane_positions
        )));
    }
    Ok(())
}

pub(crate) fn check_range(name: &str, (low, high): (f64, f64)) -> Result<(), GenerationError> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(GenerationError::config(format!(
            "{} must be an ordered pair of finite numbers, got ({}, {})",
            name, low, high
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), GenerationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(GenerationError::config(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}
