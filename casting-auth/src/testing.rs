//! Fixed RSA key pair and a token signer for test suites.
//!
//! The private key is test-only; it signs tokens that verify against the
//! key set returned by [`test_jwks`].

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode, get_current_timestamp};
use serde_json::{Map, Value, json};

pub const TEST_KID: &str = "test-key";
pub const TEST_ISSUER: &str = "https://casting-agency.test.auth0.com/";
pub const TEST_AUDIENCE: &str = "casting";

const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/test_rsa_key.pem");
const JWKS_JSON: &str = include_str!("../fixtures/test_jwks.json");

/// The published key set matching the test private key, as JSON
pub fn test_jwks() -> Value {
    serde_json::from_str(JWKS_JSON).expect("test JWKS fixture is valid JSON")
}

/// The published key set matching the test private key
pub fn test_key_set() -> JwkSet {
    serde_json::from_str(JWKS_JSON).expect("test JWKS fixture is a valid key set")
}

/// Builds and signs tokens with sensible defaults: test issuer and audience,
/// one hour of validity, and no permissions claim.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    kid: Option<String>,
    claims: Map<String, Value>,
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBuilder {
    pub fn new() -> Self {
        let now = get_current_timestamp();
        let mut claims = Map::new();
        claims.insert("iss".to_string(), json!(TEST_ISSUER));
        claims.insert("aud".to_string(), json!(TEST_AUDIENCE));
        claims.insert("sub".to_string(), json!("auth0|casting-director"));
        claims.insert("iat".to_string(), json!(now));
        claims.insert("exp".to_string(), json!(now + 3600));
        Self {
            kid: Some(TEST_KID.to_string()),
            claims,
        }
    }

    pub fn kid(mut self, kid: Option<&str>) -> Self {
        self.kid = kid.map(str::to_string);
        self
    }

    pub fn issuer(self, issuer: &str) -> Self {
        self.claim("iss", json!(issuer))
    }

    pub fn audience(self, audience: Value) -> Self {
        self.claim("aud", audience)
    }

    /// Sets `exp` relative to now; negative values produce an expired token
    pub fn expires_in(self, seconds: i64) -> Self {
        let exp = get_current_timestamp() as i64 + seconds;
        self.claim("exp", json!(exp))
    }

    pub fn permissions(self, permissions: &[&str]) -> Self {
        self.claim("permissions", json!(permissions))
    }

    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.claims.insert(name.to_string(), value);
        self
    }

    pub fn without_claim(mut self, name: &str) -> Self {
        self.claims.remove(name);
        self
    }

    /// Signs with the test RSA key using RS256
    pub fn sign(&self) -> String {
        let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes())
            .expect("test private key is valid PEM");
        self.sign_with(Algorithm::RS256, &key)
    }

    /// Signs with a shared secret using HS256
    pub fn sign_hs256(&self, secret: &[u8]) -> String {
        self.sign_with(Algorithm::HS256, &EncodingKey::from_secret(secret))
    }

    fn sign_with(&self, algorithm: Algorithm, key: &EncodingKey) -> String {
        let mut header = Header::new(algorithm);
        header.kid = self.kid.clone();
        encode(&header, &self.claims, key).expect("test token encodes")
    }
}
