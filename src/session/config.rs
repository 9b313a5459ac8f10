use crate::client_defaults::{DEFAULT_STORAGE_KEY, DEFAULT_TOKEN_FIELD, DEFAULT_USER_NAME};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings of a [`SessionStore`](super::SessionStore). Deserializable so a
/// deployment can keep it next to its other configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Principal sent as `X-SLURM-USER-NAME` with every authenticated call.
    pub user_name: String,
    /// Storage key holding the raw token.
    pub storage_key: String,
    /// Field of the issuance response that carries the token.
    pub token_field: String,
    /// Initial token used when storage holds none. Persisted like any `set`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_token: Option<String>,
    /// Clear the session and re-acquire once when an authenticated call is rejected with 401.
    pub reacquire_on_unauthorized: bool,
}

impl SessionConfig {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    pub fn with_seed_token(mut self, token: impl Into<String>) -> Self {
        self.seed_token = Some(token.into());
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_token_field(mut self, field: impl Into<String>) -> Self {
        self.token_field = field.into();
        self
    }

    pub fn with_reacquire_on_unauthorized(mut self, enabled: bool) -> Self {
        self.reacquire_on_unauthorized = enabled;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            seed_token: None,
            reacquire_on_unauthorized: true,
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("user_name", &self.user_name)
            .field("storage_key", &self.storage_key)
            .field("token_field", &self.token_field)
            .field("seed_token", &self.seed_token.as_ref().map(|_| "<redacted>"))
            .field("reacquire_on_unauthorized", &self.reacquire_on_unauthorized)
            .finish()
    }
}
