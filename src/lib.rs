#![forbid(unsafe_code)]

mod build_url;
mod client;
mod client_defaults;
mod credential;
mod error;
mod models;
mod session;

pub use client::{Endpoint, SlurmClient, SlurmClientBuilder};
pub use client_defaults::{DEFAULT_API_VERSION, USER_NAME_HEADER, USER_TOKEN_HEADER};
pub use credential::Credential;
pub use error::{ApiError, Error, ErrorKind};
pub use models::{
    CancelJobResponse, DiagnosticsResponse, JobInfo, JobRef, JobSubmission, JobSubmitResponse,
    JobsResponse, NodeInfo, NodesResponse, SlurmMessage, SlurmResponse, TokenResponse,
};
pub use session::{FileStorage, MemoryStorage, SessionConfig, SessionStore, TokenStorage};
