//! Adapter de LIME
//!
//! Feed de Oslo con un token estático de configuración (sin ciclo de
//! refresh: un 401 de Lime es un fallo del operador y se absorbe).

use serde::Deserialize;

use super::{read_feed, GbfsFeed, OperatorAdapter, RawFeed};
use crate::config::environment::EnvironmentConfig;
use crate::models::operator::Operator;
use crate::models::raw;
use crate::models::vehicle::{RentalUris, Vehicle};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct LimeBike {
    #[serde(deserialize_with = "raw::loose_string")]
    bike_id: String,
    #[serde(deserialize_with = "raw::loose_f64")]
    lat: f64,
    #[serde(deserialize_with = "raw::loose_f64")]
    lon: f64,
    battery_level: Option<f64>,
    rental_uris: Option<RentalUris>,
    #[serde(default, deserialize_with = "raw::flag")]
    is_disabled: bool,
    #[serde(default, deserialize_with = "raw::flag")]
    is_reserved: bool,
}

pub struct LimeClient {
    http: reqwest::Client,
    url_oslo: String,
    api_token: String,
}

impl LimeClient {
    pub fn new(config: &EnvironmentConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            url_oslo: config.lime_url_oslo.clone(),
            api_token: config.lime_api_token.clone(),
        }
    }
}

#[async_trait::async_trait]
impl OperatorAdapter for LimeClient {
    fn operator(&self) -> Operator {
        Operator::Lime
    }

    async fn fetch_raw(&self) -> AppResult<Vec<RawFeed>> {
        let request = self
            .http
            .get(&self.url_oslo)
            .header("Authorization", format!("Bearer {}", self.api_token));
        let body = read_feed(request, Operator::Lime, None).await?;
        Ok(vec![RawFeed {
            tag: Some("oslo".to_string()),
            body,
        }])
    }

    fn normalize(&self, feed: &RawFeed) -> AppResult<Vec<Vehicle>> {
        let parsed: GbfsFeed = serde_json::from_str(&feed.body).map_err(|err| {
            AppError::upstream(
                Operator::Lime,
                feed.tag.clone(),
                None,
                format!("malformed feed: {}", err),
            )
        })?;

        let mut vehicles = Vec::with_capacity(parsed.data.bikes.len());
        for record in parsed.data.bikes {
            let bike: LimeBike = match serde_json::from_value(record) {
                Ok(bike) => bike,
                Err(err) => {
                    log::warn!("⚠️ Skipping malformed lime record: {}", err);
                    continue;
                }
            };
            if bike.is_disabled || bike.is_reserved {
                continue;
            }
            if !bike.lat.is_finite() || !bike.lon.is_finite() {
                continue;
            }
            let mut vehicle = Vehicle::new(Operator::Lime, &bike.bike_id, bike.lat, bike.lon);
            vehicle.battery = bike.battery_level;
            vehicle.rental_uris = bike.rental_uris;
            vehicles.push(vehicle);
        }
        Ok(vehicles)
    }
}
