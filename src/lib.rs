//! rest-harness - Fluent request building for HTTP API tests
//!
//! A [`RequestFactory`] owns one configured transport and hands out independent
//! [`RequestBuilder`]s. Each builder collects a path, headers, query parameters,
//! URL segments, a JSON body and file uploads, then sends them exactly once.

pub mod builder;
pub mod config;
pub mod error;
pub mod factory;
pub mod http;
pub mod logging;
pub mod ssl;
pub mod testing;
pub mod utils;

pub use builder::RequestBuilder;
pub use config::{HttpMethod, TlsPolicy, TransportConfig};
pub use error::{ErrorKind, HarnessError, Result};
pub use factory::RequestFactory;
pub use http::auth::Authenticator;
pub use http::{RawResponse, Transport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
