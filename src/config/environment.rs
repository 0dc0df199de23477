//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: URLs y credenciales
//! por operador, TTL del cache y prefijo de clientes internos.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    /// TTL del cache de scooters en segundos
    pub cache_ttl_seconds: u64,
    /// Prefijo de clientes internos que no se registran en el log
    pub internal_client_prefix: String,
    // URLs y credenciales de VOI
    pub voi_url_oslo: String,
    pub voi_url_trondheim: String,
    pub voi_auth_url: String,
    pub voi_api_user: String,
    pub voi_api_pass: String,
    // TIER
    pub tier_url: String,
    pub tier_api_key: String,
    // ZVIPP
    pub zvipp_url_drammen: String,
    // LIME
    pub lime_url_oslo: String,
    pub lime_api_token: String,
    // BOLT - una cuenta por ciudad
    pub bolt_auth_url: String,
    pub bolt_url_oslo: String,
    pub bolt_url_lillestrom: String,
    pub bolt_url_fredrikstad: String,
    pub bolt_url_bergen: String,
    pub bolt_api_oslo_user: String,
    pub bolt_api_oslo_pass: String,
    pub bolt_api_lillestrom_user: String,
    pub bolt_api_lillestrom_pass: String,
    pub bolt_api_fredrikstad_user: String,
    pub bolt_api_fredrikstad_pass: String,
    pub bolt_api_bergen_user: String,
    pub bolt_api_bergen_pass: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(30),
            internal_client_prefix: env::var("INTERNAL_CLIENT_PREFIX")
                .unwrap_or_else(|_| "internal".to_string()),
            voi_url_oslo: env::var("VOI_URL_OSLO").expect("VOI_URL_OSLO must be set"),
            voi_url_trondheim: env::var("VOI_URL_TRONDHEIM")
                .expect("VOI_URL_TRONDHEIM must be set"),
            voi_auth_url: env::var("VOI_AUTH_URL").expect("VOI_AUTH_URL must be set"),
            voi_api_user: env::var("VOI_API_USER").expect("VOI_API_USER must be set"),
            voi_api_pass: env::var("VOI_API_PASS").expect("VOI_API_PASS must be set"),
            tier_url: env::var("TIER_URL").expect("TIER_URL must be set"),
            tier_api_key: env::var("TIER_API_KEY").expect("TIER_API_KEY must be set"),
            zvipp_url_drammen: env::var("ZVIPP_URL_DRAMMEN")
                .expect("ZVIPP_URL_DRAMMEN must be set"),
            lime_url_oslo: env::var("LIME_URL_OSLO").expect("LIME_URL_OSLO must be set"),
            lime_api_token: env::var("LIME_API_TOKEN").expect("LIME_API_TOKEN must be set"),
            bolt_auth_url: env::var("BOLT_AUTH_URL").expect("BOLT_AUTH_URL must be set"),
            bolt_url_oslo: env::var("BOLT_URL_OSLO").expect("BOLT_URL_OSLO must be set"),
            bolt_url_lillestrom: env::var("BOLT_URL_LILLESTROM")
                .expect("BOLT_URL_LILLESTROM must be set"),
            bolt_url_fredrikstad: env::var("BOLT_URL_FREDRIKSTAD")
                .expect("BOLT_URL_FREDRIKSTAD must be set"),
            bolt_url_bergen: env::var("BOLT_URL_BERGEN").expect("BOLT_URL_BERGEN must be set"),
            bolt_api_oslo_user: env::var("BOLT_API_OSLO_USER")
                .expect("BOLT_API_OSLO_USER must be set"),
            bolt_api_oslo_pass: env::var("BOLT_API_OSLO_PASS")
                .expect("BOLT_API_OSLO_PASS must be set"),
            bolt_api_lillestrom_user: env::var("BOLT_API_LILLESTROM_USER")
                .expect("BOLT_API_LILLESTROM_USER must be set"),
            bolt_api_lillestrom_pass: env::var("BOLT_API_LILLESTROM_PASS")
                .expect("BOLT_API_LILLESTROM_PASS must be set"),
            bolt_api_fredrikstad_user: env::var("BOLT_API_FREDRIKSTAD_USER")
                .expect("BOLT_API_FREDRIKSTAD_USER must be set"),
            bolt_api_fredrikstad_pass: env::var("BOLT_API_FREDRIKSTAD_PASS")
                .expect("BOLT_API_FREDRIKSTAD_PASS must be set"),
            bolt_api_bergen_user: env::var("BOLT_API_BERGEN_USER")
                .expect("BOLT_API_BERGEN_USER must be set"),
            bolt_api_bergen_pass: env::var("BOLT_API_BERGEN_PASS")
                .expect("BOLT_API_BERGEN_PASS must be set"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// URL del feed de una ciudad de Bolt
    pub fn bolt_url(&self, city: crate::models::operator::BoltCity) -> &str {
        use crate::models::operator::BoltCity;
        match city {
            BoltCity::Oslo => &self.bolt_url_oslo,
            BoltCity::Lillestrom => &self.bolt_url_lillestrom,
            BoltCity::Fredrikstad => &self.bolt_url_fredrikstad,
            BoltCity::Bergen => &self.bolt_url_bergen,
        }
    }

    /// Credenciales de la cuenta de una ciudad de Bolt
    pub fn bolt_credentials(&self, city: crate::models::operator::BoltCity) -> (&str, &str) {
        use crate::models::operator::BoltCity;
        match city {
            BoltCity::Oslo => (&self.bolt_api_oslo_user, &self.bolt_api_oslo_pass),
            BoltCity::Lillestrom => (
                &self.bolt_api_lillestrom_user,
                &self.bolt_api_lillestrom_pass,
            ),
            BoltCity::Fredrikstad => (
                &self.bolt_api_fredrikstad_user,
                &self.bolt_api_fredrikstad_pass,
            ),
            BoltCity::Bergen => (&self.bolt_api_bergen_user, &self.bolt_api_bergen_pass),
        }
    }
}
