use crate::models::SlurmMessage;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::fmt;

pub(crate) const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Error reported by slurmrestd (or whatever sits in front of it) for a
/// non-success HTTP status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    /// Entries of the Slurm `errors` array, when the body carried one.
    pub errors: Vec<SlurmMessage>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "status={}", self.status)
        } else {
            write!(f, "status={}, message={}", self.status, self.message)
        }
    }
}

/// Coarse failure category, used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network unreachable, DNS failure, connection reset or timeout.
    Transport,
    /// 401 from the scheduler, or a credential that could not be obtained.
    Authentication,
    /// 404 on a job or node reference.
    NotFound,
    /// Any other 4xx, or a request that could not be built locally.
    Validation,
    /// 5xx, or an unexpected non-success status.
    Server,
    /// A success response whose body did not match the expected shape.
    Decode,
    /// Durable token storage could not be read or written.
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("slurm api error: {0}")]
    Api(ApiError),
    #[error("token response has no {0} field")]
    MissingTokenField(String),
    #[error("authentication failed: {0}")]
    AuthenticationFailed(#[source] Box<Error>),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBaseUrl(_) | Error::Url(_) | Error::Config(_) => ErrorKind::Validation,
            Error::Http(err) => {
                if err.is_decode() {
                    ErrorKind::Decode
                } else if let Some(status) = err.status() {
                    kind_for_status(status)
                } else {
                    ErrorKind::Transport
                }
            }
            Error::Json(_) => ErrorKind::Decode,
            Error::Io(_) | Error::Storage(_) => ErrorKind::Storage,
            Error::Api(err) => StatusCode::from_u16(err.status)
                .map(kind_for_status)
                .unwrap_or(ErrorKind::Server),
            Error::MissingTokenField(_) | Error::AuthenticationFailed(_) => {
                ErrorKind::Authentication
            }
        }
    }

    /// True when the request was abandoned because it exceeded the configured timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout(),
            Error::AuthenticationFailed(inner) => inner.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of the failed exchange, if the scheduler answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::Http(err) => err.status().map(|status| status.as_u16()),
            Error::AuthenticationFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// The error an acquisition failure wraps, or `self` for every other variant.
    pub fn cause(&self) -> &Error {
        match self {
            Error::AuthenticationFailed(inner) => inner.cause(),
            _ => self,
        }
    }
}

pub(crate) fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        _ if status.is_client_error() => ErrorKind::Validation,
        _ => ErrorKind::Server,
    }
}

pub(crate) async fn read_body_with_limit_async(
    resp: &mut Response,
    limit: usize,
) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    let mut remaining = limit;
    while let Some(chunk) = resp.chunk().await? {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(chunk.len());
        body.extend_from_slice(&chunk[..take]);
        remaining -= take;
    }
    Ok(body)
}

pub(crate) fn fallback_message(status: StatusCode, body: &[u8]) -> String {
    let body_text = String::from_utf8_lossy(body);
    if body_text.trim().is_empty() {
        match status.canonical_reason() {
            Some(reason) => format!("http status {} {}", status.as_u16(), reason),
            None => format!("http status {}", status.as_u16()),
        }
    } else {
        body_text.trim().to_string()
    }
}

#[derive(Deserialize)]
struct SlurmErrorBody {
    #[serde(default)]
    errors: Vec<SlurmMessage>,
}

/// Builds an [`Error::Api`] from a non-success response body. The message is
/// taken from the first Slurm error entry when present, otherwise the body text
/// or the canonical reason phrase.
pub(crate) fn parse_error_from_body(status: StatusCode, body: &[u8]) -> Error {
    let errors = serde_json::from_slice::<SlurmErrorBody>(body)
        .map(|parsed| parsed.errors)
        .unwrap_or_default();
    let message = errors
        .iter()
        .find_map(SlurmMessage::summary)
        .unwrap_or_else(|| fallback_message(status, body));
    Error::Api(ApiError {
        status: status.as_u16(),
        message,
        errors,
    })
}
