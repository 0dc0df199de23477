//! Adapter de BOLT
//!
//! Bolt opera con una cuenta independiente por ciudad, cada una con su
//! propio token de login. Un 401 en una ciudad refresca solo el token de
//! esa cuenta; los demás siguen válidos.

use std::sync::Arc;

use serde::Deserialize;

use super::{read_feed, GbfsFeed, OperatorAdapter, RawFeed};
use crate::config::environment::EnvironmentConfig;
use crate::models::operator::{BoltCity, Operator};
use crate::models::raw;
use crate::models::vehicle::{RentalUris, Vehicle};
use crate::services::credential_service::CredentialService;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct BoltBike {
    #[serde(deserialize_with = "raw::loose_string")]
    bike_id: String,
    #[serde(deserialize_with = "raw::loose_f64")]
    lat: f64,
    #[serde(deserialize_with = "raw::loose_f64")]
    lon: f64,
    rental_uris: Option<RentalUris>,
    #[serde(default, deserialize_with = "raw::flag")]
    is_disabled: bool,
    #[serde(default, deserialize_with = "raw::flag")]
    is_reserved: bool,
}

pub struct BoltClient {
    http: reqwest::Client,
    urls: Vec<(BoltCity, String)>,
    credentials: Arc<CredentialService>,
}

impl BoltClient {
    pub fn new(
        config: &EnvironmentConfig,
        http: reqwest::Client,
        credentials: Arc<CredentialService>,
    ) -> Self {
        let urls = BoltCity::ALL
            .iter()
            .map(|city| (*city, config.bolt_url(*city).to_string()))
            .collect();
        Self {
            http,
            urls,
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl OperatorAdapter for BoltClient {
    fn operator(&self) -> Operator {
        Operator::Bolt
    }

    async fn fetch_raw(&self) -> AppResult<Vec<RawFeed>> {
        let mut feeds = Vec::with_capacity(self.urls.len());
        for (city, url) in &self.urls {
            let token = self.credentials.ensure(city.account_key()).await?;
            let request = self
                .http
                .get(url)
                .header("Authorization", format!("Bearer {}", token))
                .header("Accept", "application/json");
            let body = read_feed(request, Operator::Bolt, Some(city.account_key())).await?;
            feeds.push(RawFeed {
                tag: Some(city.name().to_string()),
                body,
            });
        }
        Ok(feeds)
    }

    fn normalize(&self, feed: &RawFeed) -> AppResult<Vec<Vehicle>> {
        let parsed: GbfsFeed = serde_json::from_str(&feed.body).map_err(|err| {
            AppError::upstream(
                Operator::Bolt,
                feed.tag.clone(),
                None,
                format!("malformed feed: {}", err),
            )
        })?;

        let mut vehicles = Vec::with_capacity(parsed.data.bikes.len());
        for record in parsed.data.bikes {
            let bike: BoltBike = match serde_json::from_value(record) {
                Ok(bike) => bike,
                Err(err) => {
                    log::warn!("⚠️ Skipping malformed bolt record: {}", err);
                    continue;
                }
            };
            if bike.is_disabled || bike.is_reserved {
                continue;
            }
            if !bike.lat.is_finite() || !bike.lon.is_finite() {
                continue;
            }
            let mut vehicle = Vehicle::new(Operator::Bolt, &bike.bike_id, bike.lat, bike.lon);
            vehicle.rental_uris = bike.rental_uris;
            vehicle.city = feed.tag.clone();
            vehicles.push(vehicle);
        }
        Ok(vehicles)
    }

    async fn refresh_credentials(&self, failed_account: Option<&str>) -> AppResult<bool> {
        match failed_account {
            Some(account) => {
                self.credentials.refresh(account).await?;
                Ok(true)
            }
            // Sin cuenta identificada no hay nada que refrescar
            None => Ok(false),
        }
    }
}
