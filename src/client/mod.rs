use crate::build_url::{build_url, BuildUrlOptions};
use crate::client_defaults::{
    DEFAULT_API_VERSION, DEFAULT_TIMEOUT, USER_NAME_HEADER, USER_TOKEN_HEADER,
};
use crate::credential::Credential;
use crate::error::{
    parse_error_from_body, read_body_with_limit_async, Error, MAX_ERROR_BODY_BYTES,
};
use crate::models::SlurmResponse;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Certificate, Client as HttpClient, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

mod diag;
mod endpoint;
mod jobs;
mod nodes;
mod token;

pub use endpoint::Endpoint;

/// Builder for [`SlurmClient`].
///
/// `base_url` should point to the API prefix slurmrestd is served under
/// (e.g., `http://slurm.example:6820` or `https://portal.example/api`).
/// Trailing slashes are allowed.
pub struct SlurmClientBuilder {
    base_url: Url,
    api_version: String,
    timeout: Option<Duration>,
    follow_redirects: bool,
    default_headers: HeaderMap,
    ca_certs: Vec<Certificate>,
}

impl SlurmClientBuilder {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, Error> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(Self {
            base_url: Url::parse(base_url.as_ref())?,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            follow_redirects: false,
            default_headers,
            ca_certs: Vec::new(),
        })
    }

    /// Versioned path segment, `v0.0.39` by default.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Upper bound on every call; an exceeded call fails with a timeout error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Control whether HTTP redirects should be followed.
    ///
    /// Disabled by default so the auth headers never reach a redirected host.
    pub fn follow_redirects(mut self, follow_redirects: bool) -> Self {
        self.follow_redirects = follow_redirects;
        self
    }

    /// Adds a header sent with every request. Name and value are validated immediately.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, Error> {
        let name = HeaderName::from_bytes(name.as_ref().as_bytes())
            .map_err(|e| Error::Config(format!("invalid header name: {}", e)))?;
        let value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| Error::Config(format!("invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Add a CA certificate PEM for TLS validation.
    pub fn add_ca_cert_pem(mut self, ca_pem: &[u8]) -> Result<Self, Error> {
        self.ca_certs.push(Certificate::from_pem(ca_pem)?);
        Ok(self)
    }

    pub fn build(self) -> Result<SlurmClient, Error> {
        if self.api_version.trim().is_empty() {
            return Err(Error::Config("api version must not be empty".to_string()));
        }
        let mut builder = HttpClient::builder().default_headers(self.default_headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if !self.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }
        for cert in self.ca_certs {
            builder = builder.add_root_certificate(cert);
        }
        let http = builder.build()?;
        Ok(SlurmClient {
            base_url: self.base_url,
            api_version: self.api_version,
            http,
        })
    }
}

/// Stateless client for the slurmrestd endpoints this crate covers.
///
/// Every operation takes an optional [`Credential`]; `None` sends the request
/// without auth headers. Nothing is retried.
#[derive(Debug, Clone)]
pub struct SlurmClient {
    base_url: Url,
    api_version: String,
    http: HttpClient,
}

impl SlurmClient {
    pub fn builder(base_url: impl AsRef<str>) -> Result<SlurmClientBuilder, Error> {
        SlurmClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Resolves `endpoint` against the base URL and API version.
    pub fn endpoint_url(&self, endpoint: &Endpoint) -> Result<Url, Error> {
        let mut segments = vec!["slurm", self.api_version.as_str()];
        segments.extend(endpoint.segments());
        build_url(&self.base_url, &segments, BuildUrlOptions::REQUEST)
    }

    fn request(
        &self,
        endpoint: &Endpoint,
        credential: Option<&Credential>,
    ) -> Result<RequestBuilder, Error> {
        let url = self.endpoint_url(endpoint)?;
        let method = endpoint.method();
        debug!(
            "{} {} (authenticated: {})",
            method,
            url.path(),
            credential.is_some()
        );
        let req = self.http.request(method, url);
        apply_auth(req, credential)
    }

    async fn expect_ok_json<T>(&self, resp: Response) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned + SlurmResponse,
    {
        let data = self.expect_ok_raw_json::<T>(resp).await?;
        for warning in data.warnings() {
            warn!(
                "slurmrestd warning: {}",
                warning.summary().unwrap_or_default()
            );
        }
        Ok(data)
    }

    async fn expect_ok_raw_json<T: serde::de::DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, Error> {
        if resp.status().is_success() {
            resp.json::<T>().await.map_err(Error::from)
        } else {
            self.parse_error(resp).await
        }
    }

    async fn parse_error<T>(&self, mut resp: Response) -> Result<T, Error> {
        let status = resp.status();
        let body = read_body_with_limit_async(&mut resp, MAX_ERROR_BODY_BYTES).await?;
        let err = parse_error_from_body(status, &body);
        debug!("request to {} failed: {}", resp.url().path(), err);
        Err(err)
    }
}

/// Attaches the principal and token as two separate headers. An empty token is
/// still sent; the scheduler decides whether it is acceptable.
fn apply_auth(
    req: RequestBuilder,
    credential: Option<&Credential>,
) -> Result<RequestBuilder, Error> {
    let Some(credential) = credential else {
        return Ok(req);
    };
    let user_name = HeaderValue::from_str(credential.user_name()).map_err(|e| {
        Error::Config(format!("invalid {} header value: {}", USER_NAME_HEADER, e))
    })?;
    let mut token = HeaderValue::from_str(credential.token()).map_err(|e| {
        Error::Config(format!("invalid {} header value: {}", USER_TOKEN_HEADER, e))
    })?;
    token.set_sensitive(true);
    Ok(req
        .header(USER_NAME_HEADER, user_name)
        .header(USER_TOKEN_HEADER, token))
}
