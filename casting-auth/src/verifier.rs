use crate::claims::ClaimSet;
use crate::error::{AuthError, BuildError};
use crate::header::bearer_token;
use crate::jwks::KeyCache;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use log::debug;
use std::sync::Arc;

/// Validates bearer tokens against the provider's published keys
pub struct TokenVerifier {
    keys: Arc<KeyCache>,
    issuer: String,
    audience: String,
    algorithm: Algorithm,
    leeway: u64,
}

impl TokenVerifier {
    /// Creates a verifier expecting tokens signed with `algorithm`.
    ///
    /// Symmetric algorithms are refused: a shared secret cannot be published in
    /// a key set.
    pub fn new(
        keys: Arc<KeyCache>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        algorithm: Algorithm,
    ) -> Result<Self, BuildError> {
        if is_symmetric(algorithm) {
            return Err(BuildError::SymmetricAlgorithm(algorithm));
        }
        Ok(Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            algorithm,
            leeway: 0,
        })
    }

    /// Clock skew tolerated on `exp`, in seconds (default: 0)
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    pub fn keys(&self) -> &Arc<KeyCache> {
        &self.keys
    }

    /// Verifies the raw value of an `Authorization` header
    pub async fn verify(&self, raw_header: Option<&[u8]>) -> Result<ClaimSet, AuthError> {
        let token = bearer_token(raw_header)?;
        self.verify_token(token).await
    }

    /// Verifies a bare token, without the `Bearer` scheme
    pub async fn verify_token(&self, token: &str) -> Result<ClaimSet, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!("Undecodable token header: {}", e);
            AuthError::MalformedHeader
        })?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        if header.alg != self.algorithm {
            return Err(AuthError::DisallowedAlgorithm(header.alg));
        }

        let key = self.keys.get_key(&kid).await?;

        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.leeway = self.leeway;
        // `exp` is exclusive: a token expiring in the current second is expired
        validation.reject_tokens_expiring_in_less_than = 1;

        decode::<ClaimSet>(token, key.decoding_key(), &validation)
            .map(|data| data.claims)
            .map_err(classify)
    }
}

pub(crate) fn is_symmetric(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

// jsonwebtoken checks the signature, then `exp`, then issuer and audience,
// which is the order the gates are reported in.
fn classify(error: JwtError) -> AuthError {
    match error.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Json(_) => AuthError::InvalidClaims(error.to_string()),
        _ => AuthError::InvalidToken(error.to_string()),
    }
}
