use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the `errors` or `warnings` array slurmrestd attaches to every response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlurmMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SlurmMessage {
    /// Most specific human-readable text of the entry.
    pub fn summary(&self) -> Option<String> {
        [&self.description, &self.error]
            .into_iter()
            .flatten()
            .map(|text| text.trim())
            .find(|text| !text.is_empty())
            .map(str::to_string)
    }
}

/// Common envelope of Slurm REST responses.
pub trait SlurmResponse {
    fn errors(&self) -> &[SlurmMessage];
    fn warnings(&self) -> &[SlurmMessage];
}

macro_rules! impl_slurm_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::models::SlurmResponse for $ty {
                fn errors(&self) -> &[$crate::models::SlurmMessage] {
                    &self.errors
                }

                fn warnings(&self) -> &[$crate::models::SlurmMessage] {
                    &self.warnings
                }
            }
        )+
    };
}

pub(crate) use impl_slurm_response;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts both `"RUNNING"` and `["RUNNING","COMPLETING"]`; newer API
/// versions report state flags as arrays.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}
