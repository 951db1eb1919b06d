//! Generates the initial agents of driving scenarios from a job file, and a few tools to inspect
//! the inputs and outputs.

#[macro_use]
extern crate log;

mod generate;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use scenario_gen::{AgentShape, AgentState, AgentStatesGeometriesConfig, OptionDoc};

#[derive(StructOpt)]
#[structopt(name = "scgen", about = "Generates agent states and geometries for scenarios")]
enum Command {
    /// Populates every source/sink of a job with agents, for several scenarios. Scenarios where
    /// agents of different source/sinks collide are dropped.
    Generate {
        /// The path to a JSON job, listing the source/sink configs under `SourcesSinks`
        #[structopt(long)]
        job: String,
        /// How many scenarios to attempt. Fewer may be written if the moving window runs out of
        /// recorded time.
        #[structopt(long, default_value = "1")]
        num_scenarios: usize,
        /// A seed for generating random numbers
        #[structopt(long, default_value = "42")]
        rng_seed: u64,
        /// The JSON file to write. Prints to STDOUT if omitted.
        #[structopt(long)]
        output: Option<String>,
        /// Also write lanes and agent footprints of the first scenario as GeoJSON
        #[structopt(long)]
        geojson: Option<String>,
    },
    /// Dumps the default config of every strategy, with a description of each option.
    DefaultParams {
        /// The JSON file to write. Prints to STDOUT if omitted.
        #[structopt(long)]
        output: Option<String>,
    },
    /// Reports collisions between agents of different configurations. The input is a JSON list,
    /// each entry having `agent_states` and `agent_geometries`, like the source/sinks written by
    /// `generate`.
    FindOverlaps {
        #[structopt()]
        input: String,
    },
}

fn main() -> Result<()> {
    setup_logger();

    match Command::from_args() {
        Command::Generate {
            job,
            num_scenarios,
            rng_seed,
            output,
            geojson,
        } => generate::run(job, num_scenarios, rng_seed, output, geojson)?,
        Command::DefaultParams { output } => default_params(output)?,
        Command::FindOverlaps { input } => find_overlaps(input)?,
    }
    Ok(())
}

/// Log to STDERR, so JSON printed to STDOUT stays clean. RUST_LOG overrides the level.
fn setup_logger() {
    use env_logger::{Builder, Env, Target};
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();
}

/// Writes JSON to a file, or STDOUT without a path.
pub fn write_json<T: Serialize>(output: Option<String>, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs_err::write(&path, contents)?;
            info!("Wrote {}", path);
        }
        None => println!("{}", contents),
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StrategyDefaults {
    config: AgentStatesGeometriesConfig,
    options: Vec<OptionDoc>,
}

fn default_params(output: Option<String>) -> Result<()> {
    let defaults: Vec<StrategyDefaults> = AgentStatesGeometriesConfig::all_defaults()
        .into_iter()
        .map(|config| StrategyDefaults {
            options: config.describe(),
            config,
        })
        .collect();
    write_json(output, &defaults)
}

#[derive(Deserialize)]
struct Agents {
    agent_states: Vec<AgentState>,
    agent_geometries: Vec<AgentShape>,
}

fn find_overlaps(input: String) -> Result<()> {
    let configs: Vec<Agents> = serde_json::from_str(&fs_err::read_to_string(&input)?)
        .with_context(|| format!("parsing {}", input))?;
    let configs: Vec<(Vec<AgentState>, Vec<AgentShape>)> = configs
        .into_iter()
        .map(|c| (c.agent_states, c.agent_geometries))
        .collect();
    let overlaps = scenario_gen::find_overlaps(&configs)?;
    info!(
        "{} pairs of configurations collide",
        overlaps.len()
    );
    write_json(None, &overlaps)
}
