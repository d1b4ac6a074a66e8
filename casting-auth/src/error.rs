use http::StatusCode;
use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Failure of a single authorization run.
///
/// The `Display` text is the client-facing message. Internal detail (fetch
/// errors, the missing permission) is carried in fields for logging only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    #[error("Authorization malformed.")]
    MalformedHeader,

    #[error("Authorization malformed.")]
    MissingKeyId,

    #[error("Unable to parse authentication token.")]
    DisallowedAlgorithm(Algorithm),

    #[error("Unable to parse authentication token.")]
    InvalidToken(String),

    #[error("Unable to find the appropriate key.")]
    UnknownKey(String),

    #[error("Unable to fetch signing keys.")]
    KeysUnavailable(String),

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims(String),

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    Unauthorized(String),
}

impl AuthError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::HeaderMissing => "authorization_header_missing",
            Self::MalformedHeader
            | Self::MissingKeyId
            | Self::DisallowedAlgorithm(_)
            | Self::InvalidToken(_) => "invalid_header",
            Self::UnknownKey(_) | Self::KeysUnavailable(_) => "keys_unavailable",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims(_) | Self::PermissionsMissing => "invalid_claims",
            Self::Unauthorized(_) => "unauthorized",
        }
    }

    /// HTTP status the boundary should answer with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::HeaderMissing | Self::TokenExpired | Self::KeysUnavailable(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::MalformedHeader
            | Self::MissingKeyId
            | Self::DisallowedAlgorithm(_)
            | Self::InvalidToken(_)
            | Self::UnknownKey(_)
            | Self::InvalidClaims(_)
            | Self::PermissionsMissing => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
        }
    }
}

/// Errors raised while assembling an [`Authorizer`](crate::Authorizer)
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Signing algorithm {0:?} is symmetric; only public-key algorithms are accepted")]
    SymmetricAlgorithm(Algorithm),

    #[error("Unknown signing algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
