//! # casting-auth
//!
//! Bearer token authorization for the casting agency API.
//!
//! ## Components
//!
//! - **Keys:** Caches the identity provider's published signing keys and
//!   refreshes them when an unknown key id shows up.
//! - **Verifier:** Checks a token's structure, signature, expiry, issuer and
//!   audience, yielding its claims.
//! - **Permissions:** Checks that verified claims grant one named permission.
//! - **Authorizer:** Runs the two in order for one request.

pub mod builder;
pub mod claims;
pub mod error;
pub mod header;
pub mod jwks;
pub mod permissions;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod verifier;

pub use crate::builder::AuthorizerBuilder;
pub use crate::claims::ClaimSet;
pub use crate::error::{AuthError, BuildError};
pub use crate::header::HeaderSource;
pub use crate::jwks::{KeyCache, KeySet, KeySource, RemoteKeySource, StaticKeySource};
pub use crate::verifier::TokenVerifier;

use crate::builder::Missing;
use crate::permissions::check_permission;
use log::{debug, warn};
use std::sync::Arc;

/// Verifies a request's bearer token and checks one required permission.
///
/// Shared by every protected route; cheap to wrap in an [`Arc`].
pub struct Authorizer {
    verifier: TokenVerifier,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer").finish_non_exhaustive()
    }
}

impl Authorizer {
    pub fn builder() -> AuthorizerBuilder<Missing> {
        AuthorizerBuilder::new()
    }

    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    pub fn keys(&self) -> &Arc<KeyCache> {
        self.verifier.keys()
    }

    /// Authorizes `request` for `required_permission`.
    ///
    /// Stops at the first failing check. The token itself is never logged.
    pub async fn authorize<R>(
        &self,
        request: &R,
        required_permission: &str,
    ) -> Result<ClaimSet, AuthError>
    where
        R: HeaderSource + ?Sized,
    {
        let claims = match self.verifier.verify(request.authorization()).await {
            Ok(claims) => claims,
            Err(e) => {
                warn!(
                    "Rejected request for '{}': {} ({:?})",
                    required_permission,
                    e.code(),
                    e
                );
                return Err(e);
            }
        };

        if let Err(e) = check_permission(&claims, required_permission) {
            warn!(
                "Subject {:?} lacks '{}': {}",
                claims.subject,
                required_permission,
                e.code()
            );
            return Err(e);
        }

        debug!(
            "Authorized subject {:?} for '{}'",
            claims.subject, required_permission
        );
        Ok(claims)
    }
}
