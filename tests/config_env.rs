use rest_harness::config::{ENV_BASE_URL, ENV_BEARER_TOKEN, ENV_INSECURE, ENV_TIMEOUT};
use rest_harness::{Authenticator, TransportConfig};
use std::time::Duration;

// Environment variables are process-wide, so every case lives in one test.
#[test]
fn test_transport_config_from_env() {
    std::env::remove_var(ENV_BASE_URL);
    assert!(TransportConfig::from_env().is_err());

    std::env::set_var(ENV_BASE_URL, "https://localhost:5001");
    std::env::set_var(ENV_INSECURE, "true");
    std::env::set_var(ENV_BEARER_TOKEN, "from-env");
    std::env::set_var(ENV_TIMEOUT, "2m");

    let config = TransportConfig::from_env().expect("config from env");
    assert_eq!(config.base_url, "https://localhost:5001");
    assert!(config.tls.accepts_invalid_certs());
    assert_eq!(
        config.authenticator,
        Some(Authenticator::Bearer("from-env".to_string()))
    );
    assert_eq!(config.timeout, Some(Duration::from_secs(120)));

    std::env::set_var(ENV_TIMEOUT, "soon");
    assert!(TransportConfig::from_env().is_err());
}
