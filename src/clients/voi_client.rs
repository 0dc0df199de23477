//! Adapter de VOI
//!
//! VOI expone dos feeds regionales (Oslo y Trondheim) detrás de un bearer
//! token de client credentials; ambos se traen con la extensión de batería
//! y se mergean en una sola lista.

use std::sync::Arc;

use serde::Deserialize;

use super::{read_feed, GbfsFeed, OperatorAdapter, RawFeed};
use crate::config::environment::EnvironmentConfig;
use crate::models::operator::Operator;
use crate::models::raw;
use crate::models::vehicle::Vehicle;
use crate::services::credential_service::CredentialService;
use crate::utils::errors::{AppError, AppResult};

/// Clave de la cuenta de VOI en el CredentialService
pub const VOI_ACCOUNT: &str = "voi";

/// Content type del perfil MDS que piden los endpoints de VOI
pub const MDS_ACCEPT: &str = "application/vnd.mds.provider+json;version=0.3";

#[derive(Debug, Deserialize)]
struct VoiBike {
    bike_id: String,
    lat: f64,
    lon: f64,
    battery: Option<f64>,
    #[serde(default, deserialize_with = "raw::flag")]
    is_disabled: bool,
    #[serde(default, deserialize_with = "raw::flag")]
    is_reserved: bool,
}

pub struct VoiClient {
    http: reqwest::Client,
    url_oslo: String,
    url_trondheim: String,
    credentials: Arc<CredentialService>,
}

impl VoiClient {
    pub fn new(
        config: &EnvironmentConfig,
        http: reqwest::Client,
        credentials: Arc<CredentialService>,
    ) -> Self {
        Self {
            http,
            url_oslo: config.voi_url_oslo.clone(),
            url_trondheim: config.voi_url_trondheim.clone(),
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl OperatorAdapter for VoiClient {
    fn operator(&self) -> Operator {
        Operator::Voi
    }

    async fn fetch_raw(&self) -> AppResult<Vec<RawFeed>> {
        let token = self.credentials.ensure(VOI_ACCOUNT).await?;

        let mut feeds = Vec::with_capacity(2);
        for (region, url) in [("oslo", &self.url_oslo), ("trondheim", &self.url_trondheim)] {
            let request = self
                .http
                .get(url)
                .header("Authorization", format!("Bearer {}", token))
                .header("X-Voigbfs-Ext", "Battery")
                .header("Accept", MDS_ACCEPT);
            let body = read_feed(request, Operator::Voi, Some(VOI_ACCOUNT)).await?;
            feeds.push(RawFeed {
                tag: Some(region.to_string()),
                body,
            });
        }
        Ok(feeds)
    }

    fn normalize(&self, feed: &RawFeed) -> AppResult<Vec<Vehicle>> {
        let parsed: GbfsFeed = serde_json::from_str(&feed.body).map_err(|err| {
            AppError::upstream(
                Operator::Voi,
                feed.tag.clone(),
                None,
                format!("malformed feed: {}", err),
            )
        })?;

        let mut vehicles = Vec::with_capacity(parsed.data.bikes.len());
        for record in parsed.data.bikes {
            let bike: VoiBike = match serde_json::from_value(record) {
                Ok(bike) => bike,
                Err(err) => {
                    log::warn!("⚠️ Skipping malformed voi record: {}", err);
                    continue;
                }
            };
            if bike.is_disabled || bike.is_reserved {
                continue;
            }
            if !bike.lat.is_finite() || !bike.lon.is_finite() {
                continue;
            }
            let mut vehicle = Vehicle::new(Operator::Voi, &bike.bike_id, bike.lat, bike.lon);
            vehicle.battery = bike.battery;
            vehicles.push(vehicle);
        }
        Ok(vehicles)
    }

    async fn refresh_credentials(&self, failed_account: Option<&str>) -> AppResult<bool> {
        self.credentials
            .refresh(failed_account.unwrap_or(VOI_ACCOUNT))
            .await?;
        Ok(true)
    }
}
