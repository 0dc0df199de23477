//! Cache de frescura por operador
//!
//! Una entrada por operador con TTL fijo y refresh single-flight: si ya hay
//! un refresh en vuelo para un operador, los demás callers esperan ese
//! resultado en vez de duplicar la llamada al upstream. Un refresh fallido
//! conserva la entrada anterior (se sirve stale); sin entrada previa se
//! devuelve una lista vacía. Los errores del loader nunca escapan.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::models::operator::Operator;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

/// Entrada de cache: último fetch exitoso de un operador
#[derive(Debug, Clone)]
struct CacheEntry {
    vehicles: Vec<Vehicle>,
    fetched_at: DateTime<Utc>,
}

/// Cache de scooters por operador
pub struct ScooterCache {
    ttl: Duration,
    entries: RwLock<HashMap<Operator, CacheEntry>>,
    flights: Mutex<HashMap<Operator, Arc<Mutex<()>>>>,
}

impl ScooterCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds as i64),
            entries: RwLock::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Valor fresco o refresh vía loader (a lo sumo uno en vuelo por operador)
    pub async fn get<F, Fut>(&self, operator: Operator, loader: F) -> Vec<Vehicle>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Vec<Vehicle>>>,
    {
        if let Some(vehicles) = self.fresh_value(operator).await {
            debug!("🛴 Scooter cache HIT para {}", operator);
            return vehicles;
        }

        let flight = self.flight_lock(operator).await;
        let _guard = flight.lock().await;

        // Un caller coalescido encuentra fresca la entrada que dejó el líder
        if let Some(vehicles) = self.fresh_value(operator).await {
            debug!("🛴 Scooter cache HIT (coalesced) para {}", operator);
            return vehicles;
        }

        debug!("❌ Scooter cache MISS para {}", operator);
        match loader().await {
            Ok(vehicles) => {
                let mut entries = self.entries.write().await;
                entries.insert(
                    operator,
                    CacheEntry {
                        vehicles: vehicles.clone(),
                        fetched_at: Utc::now(),
                    },
                );
                vehicles
            }
            Err(err) => {
                log::error!("❌ {} fetch failed: {}", operator, err);
                match self.stale_value(operator).await {
                    Some(vehicles) => {
                        log::warn!("⏰ Sirviendo datos stale para {}", operator);
                        vehicles
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    async fn fresh_value(&self, operator: Operator) -> Option<Vec<Vehicle>> {
        let entries = self.entries.read().await;
        entries.get(&operator).and_then(|entry| {
            if Utc::now() - entry.fetched_at < self.ttl {
                Some(entry.vehicles.clone())
            } else {
                None
            }
        })
    }

    async fn stale_value(&self, operator: Operator) -> Option<Vec<Vehicle>> {
        let entries = self.entries.read().await;
        entries.get(&operator).map(|entry| entry.vehicles.clone())
    }

    async fn flight_lock(&self, operator: Operator) -> Arc<Mutex<()>> {
        let mut flights = self.flights.lock().await;
        flights
            .entry(operator)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
