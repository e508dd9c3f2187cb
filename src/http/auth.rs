//! HTTP authentication utilities

use base64::Engine;

/// Credentials attached to every request of a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authenticator {
    Bearer(String),
    Basic { username: String, password: String },
}

impl Authenticator {
    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        match self {
            Authenticator::Bearer(token) => bearer_token(token),
            Authenticator::Basic { username, password } => basic_auth(username, password),
        }
    }
}

/// Create basic auth header value
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}

/// Create bearer token header value
pub fn bearer_token(token: &str) -> String {
    format!("Bearer {}", token)
}

#[cfg(test)]
mod tests {
    use super::Authenticator;

    #[test]
    fn basic_header_is_base64_encoded() {
        let auth = Authenticator::Basic {
            username: "user".to_string(),
            password: "pass".to_string(),
        };
        assert_eq!(auth.header_value(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn bearer_header_prefixes_token() {
        let auth = Authenticator::Bearer("abc".to_string());
        assert_eq!(auth.header_value(), "Bearer abc");
    }
}
