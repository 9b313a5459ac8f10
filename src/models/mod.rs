mod diag;
mod job;
mod meta;
mod node;
mod token;

pub use diag::DiagnosticsResponse;
pub use job::{CancelJobResponse, JobInfo, JobRef, JobSubmission, JobSubmitResponse, JobsResponse};
pub use meta::{SlurmMessage, SlurmResponse};
pub use node::{NodeInfo, NodesResponse};
pub use token::TokenResponse;
