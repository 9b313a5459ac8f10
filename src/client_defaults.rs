use std::time::Duration;

pub(crate) const DEFAULT_TIMEOUT_MILLIS: u64 = 10_000;
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MILLIS);

pub const DEFAULT_API_VERSION: &str = "v0.0.39";
pub const USER_NAME_HEADER: &str = "X-SLURM-USER-NAME";
pub const USER_TOKEN_HEADER: &str = "X-SLURM-USER-TOKEN";

pub(crate) const DEFAULT_USER_NAME: &str = "vagrant";
pub(crate) const DEFAULT_STORAGE_KEY: &str = "slurm_token";
pub(crate) const DEFAULT_TOKEN_FIELD: &str = "SLURM_JWT";
