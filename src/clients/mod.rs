//! Clients - HTTP Clients for External Operator APIs
//!
//! This module contains one adapter per operator plus the shared contract:
//! fetch_raw trae los payloads crudos del operador y normalize los mapea al
//! Vehicle canónico. El registry construye los adapters reales desde la
//! configuración; load_operator es el único punto de entrada y aplica el
//! toggle por operador y el retry acotado tras un 401.

pub mod bolt_client;
pub mod lime_client;
pub mod tier_client;
pub mod voi_client;
pub mod zvipp_client;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::environment::EnvironmentConfig;
use crate::config::toggles::FeatureToggles;
use crate::models::operator::Operator;
use crate::models::vehicle::Vehicle;
use crate::services::credential_service::CredentialService;
use crate::utils::errors::{AppError, AppResult};

pub use bolt_client::BoltClient;
pub use lime_client::LimeClient;
pub use tier_client::TierClient;
pub use voi_client::VoiClient;
pub use zvipp_client::ZvippClient;

/// Payload crudo de un feed, con la etiqueta regional/de cuenta que lo trajo
#[derive(Debug, Clone)]
pub struct RawFeed {
    pub tag: Option<String>,
    pub body: String,
}

/// Contrato por operador: traer el feed crudo y normalizarlo
#[async_trait]
pub trait OperatorAdapter: Send + Sync {
    fn operator(&self) -> Operator;

    /// Exento del filtro de radio (servicio de zona/tarifa plana)
    fn radius_exempt(&self) -> bool {
        false
    }

    /// Llamadas HTTP del operador; varios feeds regionales se devuelven juntos
    async fn fetch_raw(&self) -> AppResult<Vec<RawFeed>>;

    /// Parsear un feed crudo al Vehicle canónico. Registros individuales
    /// malformados se saltan; un payload ilegible es fallo del operador.
    fn normalize(&self, feed: &RawFeed) -> AppResult<Vec<Vehicle>>;

    /// Refrescar la credencial de la cuenta que falló con 401. Devuelve
    /// false si el operador no tiene credencial refrescable.
    async fn refresh_credentials(&self, _failed_account: Option<&str>) -> AppResult<bool> {
        Ok(false)
    }
}

/// Envelope GBFS compartido por la mayoría de los feeds
#[derive(Debug, Deserialize)]
pub(crate) struct GbfsFeed {
    pub data: GbfsData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GbfsData {
    pub bikes: Vec<serde_json::Value>,
}

/// Punto de entrada del registry: toggle, fetch+normalize y retry tras 401
pub async fn load_operator(
    adapter: Arc<dyn OperatorAdapter>,
    toggles: FeatureToggles,
) -> AppResult<Vec<Vehicle>> {
    let operator = adapter.operator();

    if toggles.is_off(operator).await {
        log::info!("⛔ Operator {} is toggled off", operator);
        return Ok(Vec::new());
    }

    match fetch_and_normalize(adapter.as_ref()).await {
        Ok(vehicles) => Ok(vehicles),
        Err(err) if err.is_unauthorized() => {
            let account = err.failed_account().map(str::to_string);
            if adapter.refresh_credentials(account.as_deref()).await? {
                // Un solo retry por request; si vuelve a fallar, el operador
                // no contribuye en este ciclo
                fetch_and_normalize(adapter.as_ref()).await
            } else {
                Err(err)
            }
        }
        Err(err) => Err(err),
    }
}

async fn fetch_and_normalize(adapter: &dyn OperatorAdapter) -> AppResult<Vec<Vehicle>> {
    let feeds = adapter.fetch_raw().await?;
    let mut vehicles = Vec::new();
    for feed in &feeds {
        vehicles.extend(adapter.normalize(feed)?);
    }
    Ok(vehicles)
}

/// Enviar un request a un operador y devolver el body, mapeando non-2xx
pub(crate) async fn read_feed(
    request: reqwest::RequestBuilder,
    operator: Operator,
    account: Option<&str>,
) -> AppResult<String> {
    let response = request.send().await.map_err(|err| {
        AppError::upstream(
            operator,
            account.map(str::to_string),
            err.status().map(|status| status.as_u16()),
            err.to_string(),
        )
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::upstream(
            operator,
            account.map(str::to_string),
            Some(status.as_u16()),
            format!("upstream returned {}", status),
        ));
    }

    response.text().await.map_err(|err| {
        AppError::upstream(
            operator,
            account.map(str::to_string),
            None,
            err.to_string(),
        )
    })
}

/// Registry de adapters reales, uno por operador conocido
pub fn build_registry(
    config: &EnvironmentConfig,
    http: &reqwest::Client,
    credentials: &Arc<CredentialService>,
) -> HashMap<Operator, Arc<dyn OperatorAdapter>> {
    let mut registry: HashMap<Operator, Arc<dyn OperatorAdapter>> = HashMap::new();
    registry.insert(
        Operator::Voi,
        Arc::new(VoiClient::new(config, http.clone(), credentials.clone())),
    );
    registry.insert(
        Operator::Tier,
        Arc::new(TierClient::new(config, http.clone())),
    );
    registry.insert(
        Operator::Zvipp,
        Arc::new(ZvippClient::new(config, http.clone())),
    );
    registry.insert(
        Operator::Lime,
        Arc::new(LimeClient::new(config, http.clone())),
    );
    registry.insert(
        Operator::Bolt,
        Arc::new(BoltClient::new(config, http.clone(), credentials.clone())),
    );
    registry
}
