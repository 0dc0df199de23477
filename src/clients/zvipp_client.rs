//! Adapter de ZVIPP
//!
//! Feed único de Drammen, sin autenticación. Las coordenadas llegan como
//! strings y los flags como 0/1.

use serde::Deserialize;

use super::{read_feed, GbfsFeed, OperatorAdapter, RawFeed};
use crate::config::environment::EnvironmentConfig;
use crate::models::operator::Operator;
use crate::models::raw;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct ZvippBike {
    #[serde(deserialize_with = "raw::loose_string")]
    bike_id: String,
    #[serde(deserialize_with = "raw::loose_f64")]
    lat: f64,
    #[serde(deserialize_with = "raw::loose_f64")]
    lon: f64,
    #[serde(rename = "qr-code")]
    qr_code: Option<String>,
    battery: Option<f64>,
    #[serde(default, deserialize_with = "raw::flag")]
    is_disabled: bool,
    #[serde(default, deserialize_with = "raw::flag")]
    is_reserved: bool,
}

pub struct ZvippClient {
    http: reqwest::Client,
    url_drammen: String,
}

impl ZvippClient {
    pub fn new(config: &EnvironmentConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            url_drammen: config.zvipp_url_drammen.clone(),
        }
    }
}

#[async_trait::async_trait]
impl OperatorAdapter for ZvippClient {
    fn operator(&self) -> Operator {
        Operator::Zvipp
    }

    async fn fetch_raw(&self) -> AppResult<Vec<RawFeed>> {
        let request = self.http.get(&self.url_drammen);
        let body = read_feed(request, Operator::Zvipp, None).await?;
        Ok(vec![RawFeed {
            tag: Some("drammen".to_string()),
            body,
        }])
    }

    fn normalize(&self, feed: &RawFeed) -> AppResult<Vec<Vehicle>> {
        let parsed: GbfsFeed = serde_json::from_str(&feed.body).map_err(|err| {
            AppError::upstream(
                Operator::Zvipp,
                feed.tag.clone(),
                None,
                format!("malformed feed: {}", err),
            )
        })?;

        let mut vehicles = Vec::with_capacity(parsed.data.bikes.len());
        for record in parsed.data.bikes {
            let bike: ZvippBike = match serde_json::from_value(record) {
                Ok(bike) => bike,
                Err(err) => {
                    log::warn!("⚠️ Skipping malformed zvipp record: {}", err);
                    continue;
                }
            };
            if bike.is_disabled || bike.is_reserved {
                continue;
            }
            if !bike.lat.is_finite() || !bike.lon.is_finite() {
                continue;
            }
            let mut vehicle = Vehicle::new(Operator::Zvipp, &bike.bike_id, bike.lat, bike.lon);
            vehicle.code = bike.qr_code;
            vehicle.battery = bike.battery;
            vehicles.push(vehicle);
        }
        Ok(vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ZvippClient {
        ZvippClient {
            http: reqwest::Client::new(),
            url_drammen: "http://localhost/zvipp".to_string(),
        }
    }

    #[test]
    fn test_normalize_handles_string_coords_and_numeric_flags() {
        let body = r#"{
            "data": {
                "bikes": [
                    {"bike_id": 101, "lat": "59.744", "lon": "10.204", "qr-code": "QR-101", "battery": 64.0, "is_disabled": 0, "is_reserved": 0},
                    {"bike_id": 102, "lat": "59.745", "lon": "10.205", "is_disabled": 1, "is_reserved": 0},
                    {"bike_id": 103, "lat": "59.746", "lon": "10.206", "is_disabled": 0, "is_reserved": 1},
                    {"bike_id": 104, "lat": "abc", "lon": "10.207"}
                ]
            }
        }"#;
        let feed = RawFeed {
            tag: Some("drammen".to_string()),
            body: body.to_string(),
        };

        let vehicles = client().normalize(&feed).unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, "ZVIPP:101");
        assert_eq!(vehicles[0].code.as_deref(), Some("QR-101"));
        assert!((vehicles[0].lat - 59.744).abs() < 1e-9);
    }
}
