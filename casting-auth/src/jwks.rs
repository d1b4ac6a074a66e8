//! Signing key retrieval and caching.
//!
//! The identity provider publishes its public keys as a JSON Web Key Set. The
//! [`KeyCache`] keeps the last complete set in memory and goes back to its
//! [`KeySource`] only when a token names a key it has never seen.

use crate::error::AuthError;
use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use log::{debug, info, warn};
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use url::Url;

/// Public key used to verify token signatures
#[derive(Clone)]
pub struct SigningKey {
    pub kid: String,
    /// Algorithm advertised by the key set, if any
    pub algorithm: Option<KeyAlgorithm>,
    key: DecodingKey,
}

impl SigningKey {
    /// Converts a published JWK into a signing key.
    ///
    /// Keys without a `kid` and symmetric (`oct`) keys are not usable for
    /// verification and yield `None`.
    pub fn from_jwk(jwk: &Jwk) -> Option<Self> {
        let kid = jwk.common.key_id.clone()?;
        if matches!(jwk.algorithm, AlgorithmParameters::OctetKey(_)) {
            debug!("Skipping symmetric key '{}' from key set", kid);
            return None;
        }
        match DecodingKey::from_jwk(jwk) {
            Ok(key) => Some(Self {
                kid,
                algorithm: jwk.common.key_algorithm,
                key,
            }),
            Err(e) => {
                warn!("Skipping unusable key '{}' from key set: {}", kid, e);
                None
            }
        }
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Immutable snapshot of the provider's keys, indexed by `kid`
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, SigningKey>,
}

impl KeySet {
    pub fn get(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<&JwkSet> for KeySet {
    fn from(set: &JwkSet) -> Self {
        let keys = set
            .keys
            .iter()
            .filter_map(SigningKey::from_jwk)
            .map(|key| (key.kid.clone(), key))
            .collect();
        Self { keys }
    }
}

/// Where the key set comes from
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Fetches the complete key set
    async fn fetch(&self) -> Result<KeySet, AuthError>;
}

/// Fetches the key set over HTTP(S) from the provider's well-known endpoint
pub struct RemoteKeySource {
    client: Client,
    url: Url,
    attempts: u32,
}

impl RemoteKeySource {
    /// Creates a source with a per-attempt `timeout` and one retry
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url,
            attempts: 2,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn fetch_once(&self) -> Result<KeySet, String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("GET {} returned {}", self.url, status));
        }

        let set = response
            .json::<JwkSet>()
            .await
            .map_err(|e| format!("malformed key set from {}: {}", self.url, e))?;

        let keys = KeySet::from(&set);
        if keys.is_empty() {
            return Err(format!("key set from {} has no usable keys", self.url));
        }
        Ok(keys)
    }
}

#[async_trait]
impl KeySource for RemoteKeySource {
    async fn fetch(&self) -> Result<KeySet, AuthError> {
        let mut last_error = String::new();
        for attempt in 1..=self.attempts {
            match self.fetch_once().await {
                Ok(keys) => {
                    info!("Fetched {} signing key(s) from {}", keys.len(), self.url);
                    return Ok(keys);
                }
                Err(e) => {
                    warn!(
                        "Key set fetch attempt {}/{} failed: {}",
                        attempt, self.attempts, e
                    );
                    last_error = e;
                }
            }
        }
        Err(AuthError::KeysUnavailable(last_error))
    }
}

/// Fixed key set, for deployments with pinned keys and for tests
#[derive(Debug, Clone)]
pub struct StaticKeySource {
    keys: KeySet,
}

impl StaticKeySource {
    pub fn new(set: &JwkSet) -> Self {
        Self {
            keys: KeySet::from(set),
        }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn fetch(&self) -> Result<KeySet, AuthError> {
        Ok(self.keys.clone())
    }
}

/// Outcome of the latest fetch, read by callers that queued behind it
#[derive(Default)]
struct FetchState {
    /// Time of the last successful fetch
    fetched_at: Option<Instant>,
    last_error: Option<AuthError>,
}

/// Process-wide cache of signing keys.
///
/// Readers take the current snapshot under a short read lock. A refresh
/// builds a whole new [`KeySet`] and swaps it in, so a reader never sees a
/// half-populated set and an abandoned refresh leaves the old one in place.
///
/// Callers that miss while a fetch is running wait for it and take its
/// outcome rather than starting another one.
pub struct KeyCache {
    source: Box<dyn KeySource>,
    snapshot: RwLock<Arc<KeySet>>,
    /// Serializes fetches
    fetch: Mutex<FetchState>,
    /// Bumped once per completed fetch, successful or not
    generation: AtomicU64,
    min_refresh_interval: Duration,
}

impl KeyCache {
    pub fn new(source: impl KeySource + 'static) -> Self {
        Self::from_source(Box::new(source))
    }

    pub fn from_source(source: Box<dyn KeySource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(KeySet::default())),
            fetch: Mutex::new(FetchState::default()),
            generation: AtomicU64::new(0),
            min_refresh_interval: Duration::ZERO,
        }
    }

    /// Limits how often a miss may trigger a new fetch
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Current snapshot of the cached keys
    pub async fn snapshot(&self) -> Arc<KeySet> {
        self.snapshot.read().await.clone()
    }

    /// Resolves `kid`, fetching the key set on a miss
    pub async fn get_key(&self, kid: &str) -> Result<SigningKey, AuthError> {
        let seen = self.generation.load(Ordering::Acquire);
        if let Some(key) = self.snapshot().await.get(kid) {
            return Ok(key.clone());
        }

        let mut state = self.fetch.lock().await;

        if let Some(key) = self.snapshot().await.get(kid) {
            return Ok(key.clone());
        }

        // A fetch completed after our miss; its answer stands for us too
        if self.generation.load(Ordering::Acquire) != seen {
            if let Some(error) = &state.last_error {
                return Err(error.clone());
            }
            debug!("Key '{}' absent from the key set fetched while waiting", kid);
            return Err(AuthError::UnknownKey(kid.to_string()));
        }

        if let Some(at) = state.fetched_at {
            if at.elapsed() < self.min_refresh_interval {
                debug!("Key '{}' unknown and refresh interval not elapsed", kid);
                return Err(AuthError::UnknownKey(kid.to_string()));
            }
        }

        let keys = self.fetch_and_swap(&mut state).await?;
        keys.get(kid).cloned().ok_or_else(|| {
            warn!("Key '{}' is not present in the refreshed key set", kid);
            AuthError::UnknownKey(kid.to_string())
        })
    }

    /// Unconditionally fetches the key set and replaces the snapshot
    pub async fn refresh(&self) -> Result<usize, AuthError> {
        let mut state = self.fetch.lock().await;
        let keys = self.fetch_and_swap(&mut state).await?;
        Ok(keys.len())
    }

    // Dropping this future before the fetch resolves changes nothing
    async fn fetch_and_swap(&self, state: &mut FetchState) -> Result<Arc<KeySet>, AuthError> {
        let outcome = match self.source.fetch().await {
            Ok(keys) => {
                let keys = Arc::new(keys);
                *self.snapshot.write().await = keys.clone();
                state.fetched_at = Some(Instant::now());
                state.last_error = None;
                Ok(keys)
            }
            Err(error) => {
                state.last_error = Some(error.clone());
                Err(error)
            }
        };
        self.generation.fetch_add(1, Ordering::Release);
        outcome
    }
}
