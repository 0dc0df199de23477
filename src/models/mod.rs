//! Modelos del sistema
//!
//! Este módulo contiene el modelo canónico de vehículo, el conjunto cerrado
//! de operadores y los helpers de deserialización para los feeds crudos.

pub mod operator;
pub mod raw;
pub mod vehicle;

pub use operator::*;
pub use vehicle::*;
