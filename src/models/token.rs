use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of the credential-issuance endpoint. Kept as a raw object because the
/// name of the token field is configurable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TokenResponse {
    /// Non-empty string value of `field`, if present.
    pub fn token(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_reads_named_field() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"SLURM_JWT":"abc123","meta":{}}"#).expect("json");
        assert_eq!(response.token("SLURM_JWT"), Some("abc123"));
        assert_eq!(response.token("token"), None);
    }

    #[test]
    fn token_ignores_empty_and_non_string_values() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"SLURM_JWT":"","other":42}"#).expect("json");
        assert_eq!(response.token("SLURM_JWT"), None);
        assert_eq!(response.token("other"), None);
    }
}
