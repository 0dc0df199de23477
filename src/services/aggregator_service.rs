//! Servicio agregador
//!
//! Orquesta un request de punta a punta: fan-out concurrente a los
//! operadores resueltos (a través del cache), merge de las listas,
//! filtrado por bounding box y radio, ranking por distancia y truncado.
//! El fallo de un operador nunca afecta la contribución de los demás.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::clients::{load_operator, OperatorAdapter};
use crate::config::toggles::FeatureToggles;
use crate::models::operator::Operator;
use crate::models::vehicle::Vehicle;
use crate::services::cache_service::ScooterCache;
use crate::utils::geo::{distance, NORWAY_BBOX};

/// Agregador sobre el registry de adapters
pub struct AggregatorService {
    adapters: HashMap<Operator, Arc<dyn OperatorAdapter>>,
    cache: Arc<ScooterCache>,
    toggles: FeatureToggles,
}

impl AggregatorService {
    pub fn new(
        adapters: HashMap<Operator, Arc<dyn OperatorAdapter>>,
        cache: Arc<ScooterCache>,
        toggles: FeatureToggles,
    ) -> Self {
        Self {
            adapters,
            cache,
            toggles,
        }
    }

    /// Vehículos más cercanos al punto, ordenados por distancia ascendente
    pub async fn find_nearby(
        &self,
        lat: f64,
        lon: f64,
        range: f64,
        max: usize,
        operators: &[Operator],
    ) -> Vec<Vehicle> {
        let tasks = operators.iter().filter_map(|operator| {
            let adapter = self.adapters.get(operator)?.clone();
            let cache = self.cache.clone();
            let toggles = self.toggles.clone();
            let operator = *operator;
            Some(async move {
                cache
                    .get(operator, move || load_operator(adapter, toggles))
                    .await
            })
        });

        // Barrera: el merge espera a que todos los operadores terminen
        let per_operator: Vec<Vec<Vehicle>> = join_all(tasks).await;

        let mut ranked: Vec<(f64, Vehicle)> = per_operator
            .into_iter()
            .flatten()
            .filter(|vehicle| NORWAY_BBOX.contains(vehicle.lat, vehicle.lon))
            .filter(|vehicle| {
                self.radius_exempt(vehicle.operator)
                    || distance(lat, lon, vehicle.lat, vehicle.lon) <= range
            })
            .map(|vehicle| (distance(lat, lon, vehicle.lat, vehicle.lon), vehicle))
            .collect();

        // Orden total determinista: distancia, empates por id
        ranked.sort_by(|(da, va), (db, vb)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| va.id.cmp(&vb.id))
        });
        ranked.truncate(max);
        ranked.into_iter().map(|(_, vehicle)| vehicle).collect()
    }

    /// La exención de radio es una propiedad del adapter, no del agregador
    fn radius_exempt(&self, operator: Operator) -> bool {
        self.adapters
            .get(&operator)
            .map(|adapter| adapter.radius_exempt())
            .unwrap_or(false)
    }
}
