use super::meta::{impl_slurm_response, one_or_many, SlurmMessage};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    pub errors: Vec<SlurmMessage>,
    pub warnings: Vec<SlurmMessage>,
    pub nodes: Vec<NodeInfo>,
}

impl_slurm_response!(NodesResponse);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub state: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u64>,
    #[serde(default)]
    pub partitions: Vec<String>,
    /// Every other attribute slurmrestd reported.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
