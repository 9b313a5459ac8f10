use crate::models::JobRef;
use reqwest::Method;

/// The slurmrestd operations this client knows, with their method and path
/// below `{base}/slurm/{version}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Token,
    Diagnostics,
    Jobs,
    JobDetail(JobRef),
    SubmitJob,
    CancelJob(JobRef),
    Nodes,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::SubmitJob => Method::POST,
            Endpoint::CancelJob(_) => Method::DELETE,
            _ => Method::GET,
        }
    }

    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::Token => vec!["token"],
            Endpoint::Diagnostics => vec!["diag"],
            Endpoint::Jobs => vec!["jobs"],
            Endpoint::JobDetail(job) | Endpoint::CancelJob(job) => vec!["job", job.as_str()],
            Endpoint::SubmitJob => vec!["job", "submit"],
            Endpoint::Nodes => vec!["nodes"],
        }
    }
}
