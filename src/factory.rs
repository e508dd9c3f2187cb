//! Factory handing out fresh builders over one shared transport

use crate::builder::RequestBuilder;
use crate::config::TransportConfig;
use crate::error::Result;
use crate::http::{ReqwestTransport, Transport};
use crate::utils::UrlUtils;
use log::info;
use std::sync::Arc;
use url::Url;

/// Cheap to clone; clones share the same transport.
#[derive(Clone)]
pub struct RequestFactory {
    transport: Arc<dyn Transport>,
    base_url: Arc<Url>,
}

impl RequestFactory {
    /// Build the reqwest transport once from `config`.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let base_url = UrlUtils::validate_base_url(&config.base_url)?;
        info!(
            "request factory for {} (certificate validation {})",
            base_url,
            if config.tls.accepts_invalid_certs() {
                "disabled"
            } else {
                "enabled"
            }
        );
        let transport = ReqwestTransport::new(config)?;
        Ok(Self {
            transport: Arc::new(transport),
            base_url: Arc::new(base_url),
        })
    }

    /// Use an existing transport, e.g. a [`MockTransport`](crate::testing::MockTransport).
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = UrlUtils::validate_base_url(base_url)?;
        Ok(Self {
            transport,
            base_url: Arc::new(base_url),
        })
    }

    /// New builder with an empty request spec.
    pub fn create(&self) -> RequestBuilder {
        RequestBuilder::new(Arc::clone(&self.transport), Arc::clone(&self.base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
