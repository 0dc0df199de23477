//! Services module
//!
//! Este módulo contiene la lógica de negocio: credenciales de operadores,
//! cache de frescura y el agregador que orquesta el fan-out.

pub mod aggregator_service;
pub mod cache_service;
pub mod credential_service;

pub use aggregator_service::*;
pub use cache_service::*;
pub use credential_service::*;
