//! Transport configuration shared by every builder of a factory

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{HarnessError, Result};
use crate::http::auth::Authenticator;
use crate::utils::StringUtils;

pub const ENV_BASE_URL: &str = "REST_HARNESS_BASE_URL";
pub const ENV_INSECURE: &str = "REST_HARNESS_INSECURE";
pub const ENV_BEARER_TOKEN: &str = "REST_HARNESS_BEARER_TOKEN";
pub const ENV_TIMEOUT: &str = "REST_HARNESS_TIMEOUT";

/// HTTP method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", method)
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Certificate validation policy.
///
/// `DangerAcceptInvalidCerts` turns off all certificate checks and is only
/// meant for local test servers with self-signed certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsPolicy {
    Verify { ca_cert_file: Option<PathBuf> },
    DangerAcceptInvalidCerts,
}

impl Default for TlsPolicy {
    fn default() -> Self {
        TlsPolicy::Verify { ca_cert_file: None }
    }
}

impl TlsPolicy {
    pub fn accepts_invalid_certs(&self) -> bool {
        matches!(self, TlsPolicy::DangerAcceptInvalidCerts)
    }
}

/// Process-wide transport settings, read-only once a factory is built.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: String,
    pub tls: TlsPolicy,
    pub authenticator: Option<Authenticator>,
    pub default_headers: HashMap<String, String>,
    pub user_agent: Option<String>,
    /// Whole-request timeout handed to the HTTP client. `None` leaves it unbounded.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        TransportConfig {
            base_url: base_url.into(),
            tls: TlsPolicy::default(),
            authenticator: None,
            default_headers: HashMap::new(),
            user_agent: Some(format!("rest-harness/{}", crate::VERSION)),
            timeout: None,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Profile for a local development server with a self-signed certificate.
    pub fn local_test(base_url: impl Into<String>) -> Self {
        Self::new(base_url).with_tls(TlsPolicy::DangerAcceptInvalidCerts)
    }

    /// Build from `REST_HARNESS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_BASE_URL)
            .map_err(|_| HarnessError::Config(format!("{} is not set", ENV_BASE_URL)))?;
        let mut config = Self::new(base_url);

        if let Ok(value) = std::env::var(ENV_INSECURE) {
            if parse_flag(&value)? {
                config.tls = TlsPolicy::DangerAcceptInvalidCerts;
            }
        }
        if let Ok(token) = std::env::var(ENV_BEARER_TOKEN) {
            if !token.is_empty() {
                config.authenticator = Some(Authenticator::Bearer(token));
            }
        }
        if let Ok(value) = std::env::var(ENV_TIMEOUT) {
            config.timeout = Some(StringUtils::parse_timeout(&value)?);
        }

        Ok(config)
    }

    pub fn with_tls(mut self, tls: TlsPolicy) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(HarnessError::Config(format!(
            "Invalid boolean for {}: '{}'",
            ENV_INSECURE, other
        ))),
    }
}
