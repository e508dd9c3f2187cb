//! Utility functions and helpers

use crate::error::{HarnessError, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate a base URL; only http and https are accepted.
    pub fn validate_base_url(input: &str) -> Result<Url> {
        let url = Url::parse(input)
            .map_err(|e| HarnessError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(HarnessError::InvalidUrl(format!(
                "Unsupported scheme '{}' in '{}'",
                scheme, input
            ))),
        }
    }

    /// Join a relative resource path onto the base URL.
    ///
    /// The base path is kept even without a trailing slash, so
    /// `https://host/api` + `Product` gives `https://host/api/Product`.
    /// The result must stay under the base: absolute URLs and paths that climb
    /// out of the base path are rejected.
    pub fn join(base: &Url, path: &str) -> Result<Url> {
        let relative = path.trim_start_matches('/');
        if Url::parse(relative).is_ok() {
            return Err(HarnessError::Config(format!(
                "Request path '{}' is an absolute URL; pass a path relative to the base URL",
                path
            )));
        }

        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        let joined = base.join(relative).map_err(|e| {
            HarnessError::InvalidUrl(format!("Cannot join '{}' onto '{}': {}", path, base, e))
        })?;

        if joined.origin() != base.origin() || !joined.path().starts_with(base.path()) {
            return Err(HarnessError::Config(format!(
                "Request path '{}' resolves to '{}', outside of '{}'",
                path, joined, base
            )));
        }
        Ok(joined)
    }

    /// Percent-encode a value for use as one path segment
    pub fn encode_segment(value: &str) -> String {
        utf8_percent_encode(value, PATH_SEGMENT).to_string()
    }

    /// Replace every `{name}` placeholder in `template` with its encoded segment value.
    pub fn expand_segments(template: &str, segments: &HashMap<String, String>) -> Result<String> {
        let mut expanded = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            expanded.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                HarnessError::Config(format!("Unterminated placeholder in path '{}'", template))
            })?;
            let name = &after[..close];
            if name.is_empty() {
                return Err(HarnessError::Config(format!(
                    "Empty placeholder in path '{}'",
                    template
                )));
            }
            let value = segments.get(name).ok_or_else(|| {
                HarnessError::Config(format!(
                    "No value for URL segment '{}' in path '{}'",
                    name, template
                ))
            })?;
            if value == "." || value == ".." {
                return Err(HarnessError::Config(format!(
                    "URL segment '{}' must not be '{}'",
                    name, value
                )));
            }
            expanded.push_str(&Self::encode_segment(value));
            rest = &after[close + 1..];
        }
        expanded.push_str(rest);

        Ok(expanded)
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Read a file for upload, reporting failures as resource-access errors.
    pub async fn read_upload(path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|source| HarnessError::ResourceAccess {
                path: path.to_path_buf(),
                source,
            })
    }

    /// File name sent in the multipart `Content-Disposition` header
    pub fn upload_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string())
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse timeout values (supports suffixes like 's', 'm', 'h')
    pub fn parse_timeout(input: &str) -> Result<std::time::Duration> {
        if let Ok(seconds) = input.parse::<u64>() {
            return Ok(std::time::Duration::from_secs(seconds));
        }

        let (number_part, suffix) = if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1)
        } else if let Some(stripped) = input.strip_suffix('m') {
            (stripped, 60)
        } else if let Some(stripped) = input.strip_suffix('h') {
            (stripped, 3600)
        } else {
            return Err(HarnessError::Config(format!(
                "Invalid timeout format: '{}'. Use number with optional suffix (s/m/h)",
                input
            )));
        };

        let number: u64 = number_part.parse().map_err(|_| {
            HarnessError::Config(format!("Invalid timeout number: '{}'", number_part))
        })?;

        let seconds = number.checked_mul(suffix).ok_or_else(|| {
            HarnessError::Config(format!("Timeout too large: '{}'", input))
        })?;

        Ok(std::time::Duration::from_secs(seconds))
    }
}
