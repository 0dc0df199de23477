//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle canónico que se devuelve al
//! cliente. Los adapters de cada operador mapean sus registros crudos a
//! esta forma; después de la normalización lat/lon siempre son numéricos.

use serde::{Deserialize, Serialize};

use crate::models::operator::Operator;

/// Vehículo normalizado - unidad de salida del agregador
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Id global con namespace de operador, ej. "VOI:abc-123"
    pub id: String,
    pub operator: Operator,
    pub lat: f64,
    pub lon: f64,
    /// Nivel de batería - algunos operadores no lo exponen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    /// Código visible en el vehículo (QR o similar)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_uris: Option<RentalUris>,
    /// Ciudad de la cuenta, solo para operadores con cuentas por ciudad
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Vehicle {
    /// Constructor con los campos obligatorios; los extras se agregan aparte
    pub fn new(operator: Operator, raw_id: &str, lat: f64, lon: f64) -> Self {
        Self {
            id: operator.vehicle_id(raw_id),
            operator,
            lat,
            lon,
            battery: None,
            code: None,
            rental_uris: None,
            city: None,
        }
    }
}

/// Deep links de alquiler, pasados sin modificar desde el feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalUris {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}
