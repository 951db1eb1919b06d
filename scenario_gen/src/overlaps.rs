use std::collections::BTreeMap;

use serde::Serialize;

use geom::Polygon;

use crate::{AgentShape, AgentState, GenerationError};

/// Agent `first.1` of configuration `first.0` collides with agent `second.1` of configuration
/// `second.0`. The first configuration index is always the smaller one. Serialized as the nested
/// pair `[[i, a], [j, b]]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "((usize, usize), (usize, usize))")]
pub struct OverlapRecord {
    pub first: (usize, usize),
    pub second: (usize, usize),
}

impl From<OverlapRecord> for ((usize, usize), (usize, usize)) {
    fn from(record: OverlapRecord) -> Self {
        (record.first, record.second)
    }
}

/// Finds every collision between agents of different configurations, each given as parallel
/// state and shape lists. Agents of the same configuration are never compared against each other.
///
/// The result is keyed by `"i-j"` with `i < j`, and only has keys for pairs of configurations
/// that collide at least once. Records are ordered by the agent index in `i`, then in `j`.
pub fn find_overlaps(
    configs: &[(Vec<AgentState>, Vec<AgentShape>)],
) -> Result<BTreeMap<String, Vec<OverlapRecord>>, GenerationError> {
    let mut placed: Vec<Vec<Polygon>> = Vec::new();
    for (idx, (states, shapes)) in configs.iter().enumerate() {
        if states.len() != shapes.len() {
            return Err(GenerationError::Geometry(format!(
                "configuration {} has {} states, but {} shapes",
                idx,
                states.len(),
                shapes.len()
            )));
        }
        placed.push(
            states
                .iter()
                .zip(shapes.iter())
                .map(|(state, shape)| shape.place(state))
                .collect(),
        );
    }

    let mut overlaps = BTreeMap::new();
    for (i, agents_i) in placed.iter().enumerate() {
        for (j, agents_j) in placed.iter().enumerate().skip(i + 1) {
            let mut records = Vec::new();
            for (idx_a, a) in agents_i.iter().enumerate() {
                for (idx_b, b) in agents_j.iter().enumerate() {
                    if a.intersects(b) {
                        records.push(OverlapRecord {
                            first: (i, idx_a),
                            second: (j, idx_b),
                        });
                    }
                }
            }
            if !records.is_empty() {
                debug!("Configurations {} and {} overlap {} times", i, j, records.len());
                overlaps.insert(format!("{}-{}", i, j), records);
            }
        }
    }
    Ok(overlaps)
}
