use std::io::Write;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};

use scenario_gen::{
    find_overlaps, AgentShape, AgentState, AgentStatesGeometries, GenerationError,
    GenerationSession, RoadCorridor, SourceSinkConfig,
};

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Job {
    sources_sinks: Vec<SourceSinkConfig>,
}

#[derive(Serialize)]
struct Scenario {
    scenario_idx: usize,
    sources_sinks: Vec<GeneratedSourceSink>,
}

#[derive(Serialize)]
struct GeneratedSourceSink {
    description: String,
    #[serde(flatten)]
    agents: AgentStatesGeometries,
}

pub fn run(
    job_path: String,
    num_scenarios: usize,
    rng_seed: u64,
    output: Option<String>,
    geojson_path: Option<String>,
) -> Result<()> {
    let job: Job = serde_json::from_str(&fs_err::read_to_string(&job_path)?)
        .with_context(|| format!("parsing job {}", job_path))?;
    for source_sink in &job.sources_sinks {
        source_sink
            .config_agent_states_geometries
            .validate()
            .with_context(|| format!("source/sink {}", source_sink.description))?;
    }

    let mut session = GenerationSession::new(rng_seed);
    let mut scenarios = Vec::new();
    'scenarios: for scenario_idx in 0..num_scenarios {
        session.start_scenario(scenario_idx);

        let mut sources_sinks = Vec::new();
        for source_sink in &job.sources_sinks {
            match source_sink
                .config_agent_states_geometries
                .create_from_config(&source_sink.road_corridor, &mut session)
            {
                Ok(agents) => {
                    sources_sinks.push(GeneratedSourceSink {
                        description: source_sink.description.clone(),
                        agents,
                    });
                }
                Err(err @ GenerationError::ExhaustedSearch { .. }) => {
                    warn!("{}", err);
                    break 'scenarios;
                }
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!(
                            "scenario {}, source/sink {}",
                            scenario_idx, source_sink.description
                        )
                    });
                }
            }
        }

        let configs: Vec<(Vec<AgentState>, Vec<AgentShape>)> = sources_sinks
            .iter()
            .map(|ss| {
                (
                    ss.agents.agent_states.clone(),
                    ss.agents.agent_geometries.clone(),
                )
            })
            .collect();
        let overlaps = find_overlaps(&configs)?;
        if !overlaps.is_empty() {
            warn!(
                "Dropping scenario {}: agents of different source/sinks collide in {:?}",
                scenario_idx,
                overlaps.keys().collect::<Vec<_>>()
            );
            continue;
        }

        info!(
            "Scenario {} has {} agents",
            scenario_idx,
            sources_sinks
                .iter()
                .map(|ss| ss.agents.agent_states.len())
                .sum::<usize>()
        );
        scenarios.push(Scenario {
            scenario_idx,
            sources_sinks,
        });
    }
    info!(
        "Generated {} of {} requested scenarios",
        scenarios.len(),
        num_scenarios
    );

    if let Some(path) = geojson_path {
        match scenarios.first() {
            Some(scenario) => write_geojson(&path, &job.sources_sinks, scenario)?,
            None => warn!("No scenario to write to {}", path),
        }
    }
    crate::write_json(output, &scenarios)
}

/// Lanes of every road corridor and the footprints of every agent, in local coordinates.
fn write_geojson(path: &str, sources_sinks: &[SourceSinkConfig], scenario: &Scenario) -> Result<()> {
    let mut features = Vec::new();
    for (source_sink, generated) in sources_sinks.iter().zip(scenario.sources_sinks.iter()) {
        features.extend(lane_features(&source_sink.description, &source_sink.road_corridor));

        for (idx, (state, shape)) in generated
            .agents
            .agent_states
            .iter()
            .zip(generated.agents.agent_geometries.iter())
            .enumerate()
        {
            let mut feature = Feature {
                bbox: None,
                geometry: Some(shape.place(state).to_geojson()),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property("type", "agent");
            feature.set_property("source_sink", generated.description.clone());
            feature.set_property("agent", idx);
            feature.set_property("velocity", state.velocity);
            features.push(feature);
        }
    }

    let gj = GeoJson::FeatureCollection(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    });
    let mut file = fs_err::File::create(path)?;
    write!(file, "{}", serde_json::to_string_pretty(&gj)?)?;
    info!("Wrote {}", path);
    Ok(())
}

fn lane_features(description: &str, road_corridor: &RoadCorridor) -> Vec<Feature> {
    let mut features = Vec::new();
    for (lane_position, lane) in road_corridor.lane_corridors.iter().enumerate() {
        let mut feature = Feature {
            bbox: None,
            geometry: Some(lane.polygon.to_geojson()),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("type", "lane");
        feature.set_property("source_sink", description);
        feature.set_property("lane_position", lane_position);
        features.push(feature);

        let mut feature = Feature {
            bbox: None,
            geometry: Some(lane.center_line.to_geojson()),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("type", "center line");
        feature.set_property("source_sink", description);
        feature.set_property("lane_position", lane_position);
        features.push(feature);
    }
    features
}
