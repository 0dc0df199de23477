//! Middleware de CORS
//!
//! Este módulo maneja la configuración de CORS para permitir
//! requests desde diferentes orígenes.

use tower_http::cors::CorsLayer;

/// Crear middleware de CORS para el endpoint público
/// NOTA: Permite cualquier origen - el endpoint es de solo lectura
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}
