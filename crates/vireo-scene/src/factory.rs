//! Component factories — one registry per component role.
//!
//! Creators receive a [`ComponentArgs`] bag of string attributes, the way
//! components are described in scene descriptions, and return `None` when
//! the attributes do not suit them.

use std::collections::BTreeMap;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use vireo_factory::Registry;
use vireo_types::{NodeId, VireoError, VireoResult};

use crate::component::{BehaviorModel, CollisionPipeline, ConstraintSet, InteractionForceField, OdeSolver};

pub type SolverRegistry = Registry<String, Box<dyn OdeSolver>, ComponentArgs>;
pub type ForceFieldRegistry = Registry<String, Box<dyn InteractionForceField>, ComponentArgs>;
pub type BehaviorRegistry = Registry<String, Box<dyn BehaviorModel>, ComponentArgs>;
pub type PipelineRegistry = Registry<String, Box<dyn CollisionPipeline>, ComponentArgs>;
pub type ConstraintRegistry = Registry<String, Box<dyn ConstraintSet>, ComponentArgs>;

/// Construction arguments handed to component creators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentArgs {
    /// Instance name; creators fall back to their own default.
    pub name: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl ComponentArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    pub fn name_or(&self, default: &str) -> String {
        self.name.clone().unwrap_or_else(|| default.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Parses attribute `key`. Absent is `Ok(None)`, unparsable is an error.
    pub fn parse<T: FromStr>(&self, key: &str) -> VireoResult<Option<T>> {
        self.get(key)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|_| {
                    VireoError::InvalidArgument(format!("attribute '{key}': cannot parse '{raw}'"))
                })
            })
            .transpose()
    }

    pub fn get_f64(&self, key: &str) -> VireoResult<Option<f64>> {
        self.parse(key)
    }

    /// Node reference written as a bare index (`"3"`) or `"#3"`.
    pub fn get_node(&self, key: &str) -> VireoResult<Option<NodeId>> {
        self.get(key)
            .map(|raw| {
                let digits = raw.trim().trim_start_matches('#');
                digits.parse::<u32>().map(NodeId).map_err(|_| {
                    VireoError::InvalidArgument(format!("attribute '{key}': '{raw}' is not a node id"))
                })
            })
            .transpose()
    }

    /// Vector written as three numbers separated by spaces or commas.
    pub fn get_vec3(&self, key: &str) -> VireoResult<Option<DVec3>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let parts: Vec<f64> = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::parse::<f64>)
            .collect::<Result<_, _>>()
            .map_err(|_| VireoError::InvalidArgument(format!("attribute '{key}': '{raw}' is not a vector")))?;
        match parts.as_slice() {
            [x, y, z] => Ok(Some(DVec3::new(*x, *y, *z))),
            _ => Err(VireoError::InvalidArgument(format!(
                "attribute '{key}': expected 3 components, got {}",
                parts.len()
            ))),
        }
    }

    /// List of indices written as numbers separated by spaces or commas.
    pub fn get_indices(&self, key: &str) -> VireoResult<Option<Vec<usize>>> {
        self.get(key)
            .map(|raw| {
                raw.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<usize>().map_err(|_| {
                            VireoError::InvalidArgument(format!("attribute '{key}': '{s}' is not an index"))
                        })
                    })
                    .collect::<VireoResult<Vec<usize>>>()
            })
            .transpose()
    }
}
