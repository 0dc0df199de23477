//! Adapter de TIER
//!
//! TIER autentica con un api key en header y publica un solo feed nacional.
//! Es el operador exento del filtro de radio: representa un servicio de
//! zona con tarifa plana, no vehículos free-floating.

use serde::Deserialize;

use super::{read_feed, OperatorAdapter, RawFeed};
use crate::config::environment::EnvironmentConfig;
use crate::models::operator::Operator;
use crate::models::raw;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct TierFeed {
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TierRecord {
    #[serde(deserialize_with = "raw::loose_string")]
    id: String,
    attributes: TierAttributes,
}

#[derive(Debug, Deserialize)]
struct TierAttributes {
    lat: f64,
    lng: f64,
    #[serde(default, deserialize_with = "raw::opt_loose_string")]
    code: Option<String>,
    #[serde(rename = "batteryLevel")]
    battery_level: Option<f64>,
}

pub struct TierClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl TierClient {
    pub fn new(config: &EnvironmentConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            url: config.tier_url.clone(),
            api_key: config.tier_api_key.clone(),
        }
    }
}

#[async_trait::async_trait]
impl OperatorAdapter for TierClient {
    fn operator(&self) -> Operator {
        Operator::Tier
    }

    fn radius_exempt(&self) -> bool {
        true
    }

    async fn fetch_raw(&self) -> AppResult<Vec<RawFeed>> {
        let request = self.http.get(&self.url).header("x-api-key", &self.api_key);
        let body = read_feed(request, Operator::Tier, None).await?;
        Ok(vec![RawFeed { tag: None, body }])
    }

    fn normalize(&self, feed: &RawFeed) -> AppResult<Vec<Vehicle>> {
        let parsed: TierFeed = serde_json::from_str(&feed.body).map_err(|err| {
            AppError::upstream(
                Operator::Tier,
                None,
                None,
                format!("malformed feed: {}", err),
            )
        })?;

        let mut vehicles = Vec::with_capacity(parsed.data.len());
        for record in parsed.data {
            let record: TierRecord = match serde_json::from_value(record) {
                Ok(record) => record,
                Err(err) => {
                    log::warn!("⚠️ Skipping malformed tier record: {}", err);
                    continue;
                }
            };
            if !record.attributes.lat.is_finite() || !record.attributes.lng.is_finite() {
                continue;
            }
            let mut vehicle = Vehicle::new(
                Operator::Tier,
                &record.id,
                record.attributes.lat,
                record.attributes.lng,
            );
            vehicle.code = record.attributes.code;
            vehicle.battery = record.attributes.battery_level;
            vehicles.push(vehicle);
        }
        Ok(vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TierClient {
        TierClient {
            http: reqwest::Client::new(),
            url: "http://localhost/tier".to_string(),
            api_key: "key".to_string(),
        }
    }

    #[test]
    fn test_normalize_maps_attributes() {
        let body = r#"{
            "data": [
                {"id": "t1", "attributes": {"lat": 59.91, "lng": 10.75, "code": 4711, "batteryLevel": 55.0}},
                {"id": "t2", "attributes": {"lng": 10.76}},
                {"id": "t3", "attributes": {"lat": 59.92, "lng": 10.77}}
            ]
        }"#;
        let feed = RawFeed {
            tag: None,
            body: body.to_string(),
        };

        let vehicles = client().normalize(&feed).unwrap();
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].id, "TIER:t1");
        assert_eq!(vehicles[0].code.as_deref(), Some("4711"));
        assert_eq!(vehicles[0].battery, Some(55.0));
        assert!(vehicles[1].code.is_none());
    }

    #[test]
    fn test_tier_is_radius_exempt() {
        assert!(client().radius_exempt());
    }
}
