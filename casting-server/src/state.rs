use crate::config::{AuthConfig, Settings};
use crate::store::memory::MemoryStore;
use crate::store::seed::seed_demo_data;
use crate::store::CatalogStore;
use casting_auth::{Authorizer, BuildError};
use log::{info, warn};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub authorizer: Arc<Authorizer>,
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub async fn new(settings: Settings) -> Result<Self, BuildError> {
        let authorizer = Self::build_authorizer(&settings.auth)?;

        let store = MemoryStore::new();
        if settings.seed_demo_data {
            if let Err(e) = seed_demo_data(&store).await {
                warn!("Failed to seed demo data: {}", e);
            }
        }

        Ok(Self {
            settings: Arc::new(settings),
            authorizer: Arc::new(authorizer),
            store: Arc::new(store),
        })
    }

    fn build_authorizer(auth: &AuthConfig) -> Result<Authorizer, BuildError> {
        let builder = Authorizer::builder()
            .with_issuer(&auth.issuer)
            .with_audience(&auth.audience)
            .with_algorithm_name(&auth.algorithm)?
            .with_fetch_timeout(auth.fetch_timeout())
            .with_leeway(auth.leeway)
            .with_min_refresh_interval(auth.min_refresh_interval());

        let builder = match &auth.jwks_url {
            Some(url) => builder.with_jwks_url(url)?,
            None => builder.with_issuer_jwks()?,
        };
        builder.build()
    }

    /// Fetches signing keys ahead of the first request.
    /// Failure is not fatal: keys are fetched again on first use.
    pub async fn warm_up(&self) {
        match self.authorizer.keys().refresh().await {
            Ok(count) => info!("Loaded {} signing key(s)", count),
            Err(e) => warn!(
                "Could not load signing keys at startup, will retry on first request: {:?}",
                e
            ),
        }
    }

    /// Ready once the signing keys have been loaded
    pub async fn keys_loaded(&self) -> usize {
        self.authorizer.keys().snapshot().await.len()
    }
}
