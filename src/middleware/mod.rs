//! Middleware del sistema
//!
//! Este módulo contiene el middleware de CORS para el endpoint público.

pub mod cors;

pub use cors::*;
