use crate::error::AuthError;
use http::header::AUTHORIZATION;
use http::{HeaderMap, Request};

/// Case-insensitive header lookup supplied by the request boundary
pub trait HeaderSource {
    /// Raw bytes of the first value of `name`, if present
    fn header(&self, name: &str) -> Option<&[u8]>;

    /// The `Authorization` header
    fn authorization(&self) -> Option<&[u8]> {
        self.header(AUTHORIZATION.as_str())
    }
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.get(name).map(|value| value.as_bytes())
    }
}

impl<B> HeaderSource for Request<B> {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers().header(name)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
///
/// The scheme is case-sensitive and separated from a non-empty token by exactly
/// one space.
pub fn bearer_token(raw: Option<&[u8]>) -> Result<&str, AuthError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(AuthError::HeaderMissing),
    };
    let value = std::str::from_utf8(raw).map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(*token),
        _ => Err(AuthError::MalformedHeader),
    }
}
