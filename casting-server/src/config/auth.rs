//! Identity provider configuration

use confique::Config;
use std::time::Duration;

/// Settings for verifying bearer tokens issued by the identity provider
#[derive(Debug, Config, Clone)]
pub struct AuthConfig {
    /// Expected token issuer, e.g. `https://tenant.auth0.com/` (required)
    #[config(env = "CASTING_AUTH_ISSUER")]
    pub issuer: String,

    /// Expected token audience (required)
    #[config(env = "CASTING_AUTH_AUDIENCE")]
    pub audience: String,

    /// Key set endpoint (default: `<issuer>/.well-known/jwks.json`)
    #[config(env = "CASTING_AUTH_JWKS_URL")]
    pub jwks_url: Option<String>,

    /// The only signing algorithm tokens may use (default: RS256)
    #[config(env = "CASTING_AUTH_ALGORITHM", default = "RS256")]
    pub algorithm: String,

    /// Key set download timeout in seconds (default: 5)
    #[config(env = "CASTING_AUTH_FETCH_TIMEOUT", default = 5)]
    pub fetch_timeout: u64,

    /// Tolerated clock skew on token expiry in seconds (default: 0)
    #[config(env = "CASTING_AUTH_LEEWAY", default = 0)]
    pub leeway: u64,

    /// Minimum seconds between key set downloads; 0 refreshes on every unknown key (default: 0)
    #[config(env = "CASTING_AUTH_MIN_REFRESH_INTERVAL", default = 0)]
    pub min_refresh_interval: u64,
}

impl AuthConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    pub fn min_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.min_refresh_interval)
    }
}
