//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: configuración, toggles, credenciales,
//! cache y el agregador ya cableado con el registry de adapters.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::clients;
use crate::config::environment::EnvironmentConfig;
use crate::config::toggles::FeatureToggles;
use crate::services::aggregator_service::AggregatorService;
use crate::services::cache_service::ScooterCache;
use crate::services::credential_service::CredentialService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub toggles: FeatureToggles,
    pub credentials: Arc<CredentialService>,
    pub cache: Arc<ScooterCache>,
    pub aggregator: Arc<AggregatorService>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let toggles = FeatureToggles::from_env();
        let credentials = Arc::new(CredentialService::from_config(&config, http_client.clone()));
        let cache = Arc::new(ScooterCache::new(config.cache_ttl_seconds));
        let adapters = clients::build_registry(&config, &http_client, &credentials);
        let aggregator = Arc::new(AggregatorService::new(
            adapters,
            cache.clone(),
            toggles.clone(),
        ));

        Self {
            config,
            toggles,
            credentials,
            cache,
            aggregator,
            http_client,
        }
    }
}
