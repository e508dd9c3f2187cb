//! Fluent request builder
//!
//! A [`RequestBuilder`] accumulates one request through chained `with_*` calls and
//! sends it when a terminal method (`with_get`, `with_post_raw`, ...) is awaited.
//! Terminal methods take the builder by value, so an instance cannot be executed
//! twice.

use crate::config::HttpMethod;
use crate::error::{HarnessError, Result};
use crate::http::{FileAttachment, FileSource, RawResponse, RequestSpec, Transport};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

pub struct RequestBuilder {
    transport: Arc<dyn Transport>,
    base_url: Arc<Url>,
    spec: RequestSpec,
    /// First failure seen while configuring, reported by the terminal call.
    deferred: Option<HarnessError>,
}

impl RequestBuilder {
    pub(crate) fn new(transport: Arc<dyn Transport>, base_url: Arc<Url>) -> Self {
        Self {
            transport,
            base_url,
            spec: RequestSpec::default(),
            deferred: None,
        }
    }

    /// Target path relative to the base URL; may contain `{name}` placeholders.
    pub fn with_request(mut self, path: impl Into<String>) -> Self {
        self.spec.path = Some(path.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.set_header(name.into(), value.into());
        self
    }

    /// Appends; repeated names are all sent.
    pub fn with_query_parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.spec.query.push((name.into(), value.to_string()));
        self
    }

    pub fn with_url_segment(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.spec.segments.insert(name.into(), value.to_string());
        self
    }

    /// JSON body. A later call replaces the earlier body.
    pub fn with_body<B: Serialize + ?Sized>(mut self, payload: &B) -> Self {
        match serde_json::to_value(payload) {
            Ok(value) => self.spec.body = Some(value),
            Err(err) => self.defer(HarnessError::Json(err)),
        }
        self
    }

    /// Multipart file entry. Paths are read only when the request is executed.
    pub fn with_file(
        mut self,
        field_name: impl Into<String>,
        source: impl Into<FileSource>,
        content_type: impl Into<String>,
    ) -> Self {
        self.spec.files.push(FileAttachment {
            field_name: field_name.into(),
            source: source.into(),
            content_type: content_type.into(),
        });
        self
    }

    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    pub async fn with_get<T: DeserializeOwned>(self) -> Result<T> {
        self.execute(HttpMethod::Get).await
    }

    pub async fn with_get_raw(self) -> Result<RawResponse> {
        self.execute_raw(HttpMethod::Get).await
    }

    pub async fn with_post<T: DeserializeOwned>(self) -> Result<T> {
        self.execute(HttpMethod::Post).await
    }

    pub async fn with_post_raw(self) -> Result<RawResponse> {
        self.execute_raw(HttpMethod::Post).await
    }

    pub async fn with_put<T: DeserializeOwned>(self) -> Result<T> {
        self.execute(HttpMethod::Put).await
    }

    pub async fn with_put_raw(self) -> Result<RawResponse> {
        self.execute_raw(HttpMethod::Put).await
    }

    pub async fn with_patch_raw(self) -> Result<RawResponse> {
        self.execute_raw(HttpMethod::Patch).await
    }

    pub async fn with_delete_raw(self) -> Result<RawResponse> {
        self.execute_raw(HttpMethod::Delete).await
    }

    /// Send and deserialize the body into `T`, whatever the status code.
    pub async fn execute<T: DeserializeOwned>(self, method: HttpMethod) -> Result<T> {
        self.execute_raw(method).await?.json()
    }

    /// Send and return the response untouched.
    pub async fn execute_raw(self, method: HttpMethod) -> Result<RawResponse> {
        if let Some(err) = self.deferred {
            return Err(err);
        }

        let request = self.spec.resolve(method, &self.base_url).await?;
        let target = request.url.clone();
        debug!("{} {}", method, target);

        let response = self.transport.send(request).await?;
        debug!("{} {} -> {}", method, target, response.status());
        trace!("response body: {}", response.pretty_body());

        Ok(response)
    }

    fn defer(&mut self, err: HarnessError) {
        if self.deferred.is_none() {
            self.deferred = Some(err);
        }
    }
}
