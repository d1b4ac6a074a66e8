use crate::Authorizer;
use crate::error::BuildError;
use crate::jwks::{KeyCache, KeySource, RemoteKeySource, StaticKeySource};
use crate::verifier::{TokenVerifier, is_symmetric};
use jsonwebtoken::Algorithm;
use jsonwebtoken::jwk::JwkSet;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Marker types to track whether a key source has been provided.
pub struct Missing;
pub struct Present;

enum SourceChoice {
    Remote(Url),
    Custom(Box<dyn KeySource>),
}

/// A builder for configuring an [`Authorizer`].
/// The builder is generic over one type parameter:
/// - KeysSet: whether the signing key source has been supplied.
pub struct AuthorizerBuilder<KeysSet> {
    source: Option<SourceChoice>,
    issuer: Option<String>,
    audience: Option<String>,
    algorithm: Algorithm,
    leeway: u64,
    fetch_timeout: Duration,
    min_refresh_interval: Duration,
    _keys: PhantomData<KeysSet>,
}

impl AuthorizerBuilder<Missing> {
    /// Creates a new builder expecting RS256 tokens and a 5 second key fetch timeout.
    pub fn new() -> Self {
        Self {
            source: None,
            issuer: None,
            audience: None,
            algorithm: Algorithm::RS256,
            leeway: 0,
            fetch_timeout: Duration::from_secs(5),
            min_refresh_interval: Duration::ZERO,
            _keys: PhantomData,
        }
    }
}

impl Default for AuthorizerBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<KeysSet> AuthorizerBuilder<KeysSet> {
    /// Sets the expected `iss` claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the expected `aud` claim.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sets the one signing algorithm tokens must declare.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Result<Self, BuildError> {
        if is_symmetric(algorithm) {
            return Err(BuildError::SymmetricAlgorithm(algorithm));
        }
        self.algorithm = algorithm;
        Ok(self)
    }

    /// Sets the signing algorithm by its JOSE name, e.g. `RS256`.
    pub fn with_algorithm_name(self, name: &str) -> Result<Self, BuildError> {
        let algorithm =
            Algorithm::from_str(name).map_err(|_| BuildError::UnknownAlgorithm(name.to_string()))?;
        self.with_algorithm(algorithm)
    }

    /// Clock skew tolerated on `exp`, in seconds.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Sets how long a single key set download may take.
    /// Only applies to remote key sources.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Sets the minimum time between two key set downloads.
    /// Zero (the default) lets every unknown key id trigger a refresh.
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    fn with_source(self, source: SourceChoice) -> AuthorizerBuilder<Present> {
        AuthorizerBuilder {
            source: Some(source),
            issuer: self.issuer,
            audience: self.audience,
            algorithm: self.algorithm,
            leeway: self.leeway,
            fetch_timeout: self.fetch_timeout,
            min_refresh_interval: self.min_refresh_interval,
            _keys: PhantomData,
        }
    }
}

// Methods for setting the key source:
impl AuthorizerBuilder<Missing> {
    /// Downloads keys from an explicit JWKS endpoint.
    pub fn with_jwks_url(self, url: &str) -> Result<AuthorizerBuilder<Present>, BuildError> {
        let url = Url::parse(url)?;
        Ok(self.with_source(SourceChoice::Remote(url)))
    }

    /// Downloads keys from `<issuer>/.well-known/jwks.json`.
    /// The issuer must be set first.
    pub fn with_issuer_jwks(self) -> Result<AuthorizerBuilder<Present>, BuildError> {
        let issuer = self
            .issuer
            .as_deref()
            .ok_or(BuildError::MissingSetting("issuer"))?;
        let url = jwks_url_for_issuer(issuer)?;
        Ok(self.with_source(SourceChoice::Remote(url)))
    }

    /// Serves keys from a fixed, pre-loaded set. Nothing is ever downloaded.
    pub fn with_key_set(self, set: &JwkSet) -> AuthorizerBuilder<Present> {
        self.with_source(SourceChoice::Custom(Box::new(StaticKeySource::new(set))))
    }

    /// Uses any other [`KeySource`] implementation.
    pub fn with_key_source(self, source: impl KeySource + 'static) -> AuthorizerBuilder<Present> {
        self.with_source(SourceChoice::Custom(Box::new(source)))
    }
}

impl AuthorizerBuilder<Present> {
    /// Assembles the key cache and verifier.
    pub fn build(self) -> Result<Authorizer, BuildError> {
        let issuer = self.issuer.ok_or(BuildError::MissingSetting("issuer"))?;
        let audience = self.audience.ok_or(BuildError::MissingSetting("audience"))?;

        let source: Box<dyn KeySource> = match self.source {
            Some(SourceChoice::Remote(url)) => Box::new(RemoteKeySource::new(url, self.fetch_timeout)?),
            Some(SourceChoice::Custom(source)) => source,
            None => return Err(BuildError::MissingSetting("key source")),
        };
        let keys = KeyCache::from_source(source).with_min_refresh_interval(self.min_refresh_interval);

        let verifier = TokenVerifier::new(Arc::new(keys), issuer, audience, self.algorithm)?
            .with_leeway(self.leeway);
        Ok(Authorizer::new(verifier))
    }
}

/// The conventional key set location for an issuer.
pub fn jwks_url_for_issuer(issuer: &str) -> Result<Url, url::ParseError> {
    let base = if issuer.ends_with('/') {
        Url::parse(issuer)?
    } else {
        Url::parse(&format!("{issuer}/"))?
    };
    base.join(".well-known/jwks.json")
}
