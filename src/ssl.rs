//! SSL/TLS configuration and utilities

use crate::config::TlsPolicy;
use crate::error::{HarnessError, Result};
use log::warn;
use reqwest::ClientBuilder;
use std::path::Path;

/// SSL/TLS certificate utilities
pub struct SslUtils;

impl SslUtils {
    /// Validate SSL configuration
    pub fn validate_policy(policy: &TlsPolicy) -> Result<()> {
        if let TlsPolicy::Verify {
            ca_cert_file: Some(ca_cert),
        } = policy
        {
            if !ca_cert.is_file() {
                return Err(HarnessError::Ssl(format!(
                    "CA certificate file not found: {:?}",
                    ca_cert
                )));
            }
        }
        Ok(())
    }

    /// Apply the policy to a client builder
    pub fn apply(policy: &TlsPolicy, builder: ClientBuilder) -> Result<ClientBuilder> {
        Self::validate_policy(policy)?;
        match policy {
            TlsPolicy::Verify { ca_cert_file: None } => Ok(builder),
            TlsPolicy::Verify {
                ca_cert_file: Some(path),
            } => {
                let pem = Self::read_cert_file(path)?;
                let cert = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| HarnessError::Ssl(format!("Invalid CA certificate: {}", e)))?;
                Ok(builder.add_root_certificate(cert))
            }
            TlsPolicy::DangerAcceptInvalidCerts => {
                warn!("TLS certificate validation is disabled for this transport");
                Ok(builder.danger_accept_invalid_certs(true))
            }
        }
    }

    /// Read certificate file contents
    pub fn read_cert_file(path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path)
            .map_err(|e| HarnessError::Ssl(format!("Cannot read CA certificate {:?}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::SslUtils;
    use crate::config::TlsPolicy;
    use crate::error::HarnessError;

    #[test]
    fn missing_ca_file_is_rejected() {
        let policy = TlsPolicy::Verify {
            ca_cert_file: Some("/nonexistent/ca.pem".into()),
        };
        let err = SslUtils::validate_policy(&policy).expect_err("missing file");
        assert!(matches!(err, HarnessError::Ssl(_)));
    }

    #[test]
    fn default_and_bypass_policies_validate() {
        SslUtils::validate_policy(&TlsPolicy::default()).expect("default");
        SslUtils::validate_policy(&TlsPolicy::DangerAcceptInvalidCerts).expect("bypass");
    }
}
