//! Request specification and its resolved, ready-to-send form

use crate::config::HttpMethod;
use crate::error::{HarnessError, Result};
use crate::utils::{FileUtils, UrlUtils};
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Where the bytes of an upload come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Read from disk when the request is executed.
    Path(PathBuf),
    /// Already in memory.
    Bytes { file_name: String, content: Vec<u8> },
}

impl FileSource {
    pub fn bytes(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        FileSource::Bytes {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

impl From<PathBuf> for FileSource {
    fn from(path: PathBuf) -> Self {
        FileSource::Path(path)
    }
}

impl From<&Path> for FileSource {
    fn from(path: &Path) -> Self {
        FileSource::Path(path.to_path_buf())
    }
}

impl From<&str> for FileSource {
    fn from(path: &str) -> Self {
        FileSource::Path(PathBuf::from(path))
    }
}

impl From<String> for FileSource {
    fn from(path: String) -> Self {
        FileSource::Path(PathBuf::from(path))
    }
}

/// One multipart file entry as configured on a builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub field_name: String,
    pub source: FileSource,
    pub content_type: String,
}

/// Everything a builder has accumulated for one logical request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSpec {
    pub path: Option<String>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub segments: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub files: Vec<FileAttachment>,
}

impl RequestSpec {
    pub fn is_empty(&self) -> bool {
        *self == RequestSpec::default()
    }

    /// Header names compare case-insensitively; the last write wins.
    pub fn set_header(&mut self, name: String, value: String) {
        match self
            .headers
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(index) => self.headers[index] = (name, value),
            None => self.headers.push((name, value)),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Validate and build the final URL without touching the network or disk.
    pub fn resolve_url(&self, base: &Url) -> Result<Url> {
        let path = match self.path.as_deref() {
            Some(path) if !path.trim().is_empty() => path,
            _ => {
                return Err(HarnessError::Config(
                    "Request path not set; call with_request before executing".to_string(),
                ))
            }
        };

        let expanded = UrlUtils::expand_segments(path, &self.segments)?;
        let mut url = UrlUtils::join(base, &expanded)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn validate_headers(&self) -> Result<()> {
        for (name, value) in &self.headers {
            if name.is_empty() {
                return Err(HarnessError::Config("Header name must not be empty".to_string()));
            }
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HarnessError::Config(format!("Invalid header name '{}': {}", name, e)))?;
            HeaderValue::from_str(value).map_err(|e| {
                HarnessError::Config(format!("Invalid value for header '{}': {}", name, e))
            })?;
        }
        Ok(())
    }

    fn validate_files(&self) -> Result<()> {
        for attachment in &self.files {
            if attachment.field_name.is_empty() {
                return Err(HarnessError::Config(
                    "Multipart field name must not be empty".to_string(),
                ));
            }
            attachment.content_type.parse::<mime::Mime>().map_err(|e| {
                HarnessError::Config(format!(
                    "Invalid content type '{}' for field '{}': {}",
                    attachment.content_type, attachment.field_name, e
                ))
            })?;
        }
        Ok(())
    }

    /// Load upload contents. Files are opened here and closed before returning.
    pub async fn resolve_body(&self) -> Result<RequestBody> {
        if self.files.is_empty() {
            return Ok(match &self.body {
                Some(value) => RequestBody::Json(value.clone()),
                None => RequestBody::Empty,
            });
        }

        let mut parts = Vec::with_capacity(self.files.len());
        for attachment in &self.files {
            let (file_name, content) = match &attachment.source {
                FileSource::Path(path) => {
                    (FileUtils::upload_name(path), FileUtils::read_upload(path).await?)
                }
                FileSource::Bytes { file_name, content } => (file_name.clone(), content.clone()),
            };
            parts.push(FilePart {
                field_name: attachment.field_name.clone(),
                file_name,
                content_type: attachment.content_type.clone(),
                content,
            });
        }

        Ok(RequestBody::Multipart {
            files: parts,
            json: self.body.clone(),
        })
    }

    /// Turn the accumulated configuration into a request ready for a transport.
    ///
    /// Configuration problems are reported before any upload file is read.
    pub async fn resolve(&self, method: HttpMethod, base: &Url) -> Result<HttpRequest> {
        let url = self.resolve_url(base)?;
        self.validate_headers()?;
        self.validate_files()?;
        let body = self.resolve_body().await?;
        Ok(HttpRequest {
            method,
            url,
            headers: self.headers.clone(),
            body,
        })
    }
}

/// A file part with its content loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Files, plus the JSON body as an `application/json` part named `body` when both were set.
    Multipart {
        files: Vec<FilePart>,
        json: Option<serde_json::Value>,
    },
}

/// Fully resolved request handed to a [`Transport`](crate::http::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Query pairs in the order they were added
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}
