//! Helpers de deserialización para registros crudos
//!
//! Los feeds de los operadores no son consistentes entre sí: los flags
//! `is_disabled`/`is_reserved` llegan como boolean o como 0/1, y las
//! coordenadas e ids llegan como número o como string según el operador.
//! Estos helpers absorben esas variantes en la frontera de parseo.

use serde::{Deserialize, Deserializer};

/// Deserializar un flag que puede venir como boolean o como entero 0/1
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

/// Deserializar un número que puede venir como f64 o como string numérico
pub fn loose_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
    }

    match Loose::deserialize(deserializer)? {
        Loose::Number(value) => Ok(value),
        Loose::Text(value) => value.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Deserializar un id que puede venir como string o como número
pub fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Number(f64),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(value) => value,
        Loose::Int(value) => value.to_string(),
        Loose::Number(value) => value.to_string(),
    })
}

/// Variante opcional de loose_string para campos que pueden faltar o ser null
pub fn opt_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Number(f64),
    }

    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        Loose::Text(text) => text,
        Loose::Int(number) => number.to_string(),
        Loose::Number(number) => number.to_string(),
    }))
}
