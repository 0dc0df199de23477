//! Endpoint de scooters cercanos
//!
//! Este módulo contiene el endpoint principal del gateway: valida el
//! header de cliente y los parámetros del query, resuelve la whitelist de
//! operadores y delega en el agregador. Solo los errores de input llegan
//! al cliente como 400; los fallos de upstream ya fueron absorbidos.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::models::operator::Operator;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Header obligatorio que identifica al cliente
pub const CLIENT_HEADER_NAME: &str = "X-Client-Name";

const DEFAULT_RANGE_METERS: f64 = 200.0;
/// Radio máximo permitido; requests por encima se recortan en silencio
const MAX_RANGE_METERS: f64 = 500.0;
const DEFAULT_MAX_RESULTS: usize = 20;

#[derive(Debug, Deserialize)]
pub struct ScooterQueryParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub range: Option<String>,
    pub max: Option<String>,
    pub operators: Option<String>,
}

pub fn create_scooter_router() -> Router<AppState> {
    Router::new().route("/scooters", get(get_scooters).options(preflight))
}

/// Endpoint principal: scooters cercanos a un punto
pub async fn get_scooters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ScooterQueryParams>,
) -> AppResult<Json<Vec<Vehicle>>> {
    let client = headers
        .get(CLIENT_HEADER_NAME)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if client.is_empty() {
        log::info!("⚠️ {} missing!", CLIENT_HEADER_NAME);
        return Err(AppError::bad_request(format!(
            "{} header missing. Please include a header '{}' with a value on the form 'Organization - Usecase'.",
            CLIENT_HEADER_NAME, CLIENT_HEADER_NAME
        )));
    }
    log_client_name(&state, client);

    let lat = parse_coordinate(params.lat.as_deref());
    let lon = parse_coordinate(params.lon.as_deref());
    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(AppError::bad_request("Coordinates missing (lat and lon)")),
    };

    let range = params
        .range
        .as_deref()
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(DEFAULT_RANGE_METERS)
        .min(MAX_RANGE_METERS);
    let max = params
        .max
        .as_deref()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_RESULTS);

    let operators = resolve_operators(params.operators.as_deref())?;

    let vehicles = state
        .aggregator
        .find_nearby(lat, lon, range, max, &operators)
        .await;

    log::info!(
        "🛴 Scooters nearby ({}, {}, range: {}, max: {}): {}",
        lat,
        lon,
        range,
        max,
        vehicles.len()
    );
    Ok(Json(vehicles))
}

/// Respuesta vacía para el preflight de CORS
async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
}

/// Whitelist explícita validada contra el enum, o todos los operadores
fn resolve_operators(raw: Option<&str>) -> AppResult<Vec<Operator>> {
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(Operator::ALL.to_vec()),
    };

    let names: Vec<&str> = raw.split(',').collect();
    let invalid: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| Operator::from_name(name).is_none())
        .collect();
    if !invalid.is_empty() {
        return Err(AppError::bad_request(format!(
            "Invalid operator names passed: {}",
            invalid.join(", ")
        )));
    }

    Ok(names
        .iter()
        .filter_map(|name| Operator::from_name(name))
        .collect())
}

/// Registrar el nombre del cliente, salvo los callers internos
fn log_client_name(state: &AppState, client: &str) {
    if !client.starts_with(&state.config.internal_client_prefix) {
        log::info!("{}: {}", CLIENT_HEADER_NAME, client);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(Some("59.91")), Some(59.91));
        assert_eq!(parse_coordinate(Some("abc")), None);
        assert_eq!(parse_coordinate(Some("NaN")), None);
        assert_eq!(parse_coordinate(None), None);
    }

    #[test]
    fn test_resolve_operators_rejects_unknown_names() {
        let err = resolve_operators(Some("voi,bogus")).unwrap_err();
        match err {
            AppError::BadRequest(message) => assert!(message.contains("bogus")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_operators_case_insensitive() {
        let operators = resolve_operators(Some("VOI,Lime")).unwrap();
        assert_eq!(operators, vec![Operator::Voi, Operator::Lime]);
    }

    #[test]
    fn test_resolve_operators_defaults_to_all() {
        let operators = resolve_operators(None).unwrap();
        assert_eq!(operators.len(), Operator::ALL.len());
    }
}
