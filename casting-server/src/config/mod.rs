pub(crate) use crate::config::auth::AuthConfig;
use confique::Config;

pub mod auth;

/// Main configuration structure for the casting server
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The port the server will listen to (default: 8080)
    #[config(env = "CASTING_PORT", default = 8080)]
    pub port: u16,

    /// Load a small fixed catalog of actors and movies at startup (default: false)
    #[config(env = "CASTING_SEED_DEMO_DATA", default = false)]
    pub seed_demo_data: bool,

    /// Identity provider configuration
    #[config(nested)]
    pub auth: AuthConfig,
}

impl Settings {
    /// Creates a new Settings instance from environment variables
    pub fn new() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }

    #[cfg(test)]
    pub fn for_test_with_jwks(jwks_mock: &wiremock::MockServer) -> Self {
        use casting_auth::testing::{TEST_AUDIENCE, TEST_ISSUER};

        Self {
            port: 0, // Let the OS choose a port
            seed_demo_data: false,
            auth: AuthConfig {
                issuer: TEST_ISSUER.to_string(),
                audience: TEST_AUDIENCE.to_string(),
                jwks_url: Some(format!("{}/.well-known/jwks.json", jwks_mock.uri())),
                algorithm: "RS256".to_string(),
                fetch_timeout: 2,
                leeway: 0,
                min_refresh_interval: 0,
            },
        }
    }
}
