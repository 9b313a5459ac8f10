use super::meta::{impl_slurm_response, SlurmMessage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    pub errors: Vec<SlurmMessage>,
    pub warnings: Vec<SlurmMessage>,
    /// Scheduler statistics, passed through uninterpreted.
    pub statistics: Value,
}

impl_slurm_response!(DiagnosticsResponse);
