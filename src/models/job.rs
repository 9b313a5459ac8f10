use super::meta::{impl_slurm_response, one_or_many, SlurmMessage};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque scheduler job identifier, used verbatim as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRef(String);

impl JobRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for JobRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&JobRef> for JobRef {
    fn from(value: &JobRef) -> Self {
        value.clone()
    }
}

impl From<u32> for JobRef {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for JobRef {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Request body of the submission endpoint: the caller's payload, unvalidated,
/// under a `job` field.
#[derive(Debug, Clone, Serialize)]
pub struct JobSubmission<'a, P> {
    pub job: &'a P,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    pub errors: Vec<SlurmMessage>,
    pub warnings: Vec<SlurmMessage>,
    pub jobs: Vec<JobInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub job_state: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<String>,
    /// Every other attribute slurmrestd reported.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSubmitResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    pub errors: Vec<SlurmMessage>,
    pub warnings: Vec<SlurmMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_submit_user_msg: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CancelJobResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    pub errors: Vec<SlurmMessage>,
    pub warnings: Vec<SlurmMessage>,
}

impl_slurm_response!(JobsResponse, JobSubmitResponse, CancelJobResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn submission_wraps_payload_in_job_field() {
        let payload = json!({"name": "x"});
        let body = serde_json::to_value(JobSubmission { job: &payload }).expect("json");
        assert_eq!(body, json!({"job": {"name": "x"}}));
    }

    #[test]
    fn job_ref_accepts_numbers_and_strings() {
        assert_eq!(JobRef::from(42u32).as_str(), "42");
        assert_eq!(JobRef::from("1234_5").to_string(), "1234_5");
    }

    #[test]
    fn jobs_response_keeps_order_and_unknown_fields() {
        let body = r#"{"jobs":[
            {"job_id":7,"name":"a","job_state":"RUNNING","array_job_id":0},
            {"job_id":3,"name":"b","job_state":["PENDING"]}
        ],"errors":[],"warnings":[{"description":"old plugin"}]}"#;
        let response: JobsResponse = serde_json::from_str(body).expect("json");
        let ids: Vec<_> = response.jobs.iter().filter_map(|job| job.job_id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(response.jobs[0].job_state, vec!["RUNNING"]);
        assert!(response.jobs[0].extra.contains_key("array_job_id"));
        assert_eq!(response.jobs[1].job_state, vec!["PENDING"]);
        assert_eq!(response.warnings.len(), 1);
    }
}
