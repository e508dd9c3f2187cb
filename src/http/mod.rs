//! HTTP transport module
//!
//! Builders resolve their configuration into an [`HttpRequest`] and hand it to a
//! [`Transport`]. [`ReqwestTransport`] is the real implementation; tests can swap
//! in [`MockTransport`](crate::testing::MockTransport).

use crate::config::TransportConfig;
use crate::error::{HarnessError, Result};
use crate::ssl::SslUtils;
use async_trait::async_trait;
use log::{debug, log_enabled, Level};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder};
use url::Url;

pub mod auth;
pub mod request;
pub mod response;

pub use request::{FileAttachment, FilePart, FileSource, HttpRequest, RequestBody, RequestSpec};
pub use response::RawResponse;

/// Minimal capability a builder needs from an HTTP client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue exactly one request and return whatever the server answered.
    async fn send(&self, request: HttpRequest) -> Result<RawResponse>;
}

/// reqwest-backed transport, built once and shared by every builder
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
    /// Defaults, user agent and authenticator, validated once.
    base_headers: HeaderMap,
}

impl ReqwestTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new().connect_timeout(config.connect_timeout);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        builder = SslUtils::apply(&config.tls, builder)?;

        let base_headers = base_headers(&config)?;
        let client = builder.build().map_err(HarnessError::Http)?;

        Ok(Self {
            client,
            config,
            base_headers,
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn build_request(&self, request: HttpRequest) -> Result<reqwest::Request> {
        let mut headers = self.base_headers.clone();

        // Request headers are inserted last, so they replace defaults and the authenticator.
        for (key, value) in &request.headers {
            insert_header(&mut headers, key, value)?;
        }

        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .headers(headers);

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { files, json } => builder.multipart(multipart_form(files, json)?),
        };

        builder.build().map_err(HarnessError::Http)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        let request = self.build_request(request)?;

        if log_enabled!(Level::Debug) {
            log_request_headers(&request);
        }

        let response = self.client.execute(request).await.map_err(map_send_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_send_error)?;
        debug!("< {} ({} bytes)", status, body.len());

        Ok(RawResponse::new(status, headers, body.to_vec()))
    }
}

fn base_headers(config: &TransportConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.default_headers {
        insert_header(&mut headers, key, value)?;
    }

    if let Some(user_agent) = &config.user_agent {
        insert_header(&mut headers, USER_AGENT.as_str(), user_agent)?;
    }

    if let Some(authenticator) = &config.authenticator {
        insert_header(&mut headers, AUTHORIZATION.as_str(), &authenticator.header_value())?;
    }

    Ok(headers)
}

fn multipart_form(files: Vec<FilePart>, json: Option<serde_json::Value>) -> Result<Form> {
    let mut form = Form::new();
    for file in files {
        let content_type = file.content_type;
        let part = Part::bytes(file.content)
            .file_name(file.file_name)
            .mime_str(&content_type)
            .map_err(|e| {
                HarnessError::Config(format!("Invalid content type '{}': {}", content_type, e))
            })?;
        form = form.part(file.field_name, part);
    }
    if let Some(value) = json {
        let part = Part::text(value.to_string()).mime_str("application/json")?;
        form = form.part("body", part);
    }
    Ok(form)
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| HarnessError::Config(format!("Invalid header name '{}': {}", name, e)))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| HarnessError::Config(format!("Invalid value for header '{}': {}", name, e)))?;
    headers.insert(name, value);
    Ok(())
}

fn map_send_error(err: reqwest::Error) -> HarnessError {
    if err.is_timeout() {
        HarnessError::Timeout
    } else {
        HarnessError::Http(err)
    }
}

fn log_request_headers(request: &reqwest::Request) {
    let url = request.url();
    debug!("> {} {}", request.method(), request_path(url));

    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => debug!("> Host: {}:{}", host, port),
            None => debug!("> Host: {}", host),
        }
    }

    for (name, value) in request.headers().iter() {
        if *name == AUTHORIZATION {
            debug!("> {}: <redacted>", name);
            continue;
        }
        let value = value.to_str().unwrap_or("<non-utf8>");
        debug!("> {}: {}", name, value);
    }
}

fn request_path(url: &Url) -> String {
    match url[url::Position::BeforePath..].trim() {
        "" => "/".to_string(),
        path => path.to_string(),
    }
}
