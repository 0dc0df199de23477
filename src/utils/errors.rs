//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas. Solo BadRequest
//! llega a los clientes como 4xx; los errores de upstream se absorben
//! en la frontera de cache y nunca tumban el endpoint agregado.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::operator::Operator;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error from {operator}: {message}")]
    Upstream {
        operator: Operator,
        /// Cuenta que falló, para operadores con múltiples cuentas
        account: Option<String>,
        status: Option<u16>,
        message: String,
    },

    #[error("Auth error for account {account}: {message}")]
    Auth { account: String, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> AppError {
        AppError::BadRequest(message.into())
    }

    pub fn upstream(
        operator: Operator,
        account: Option<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> AppError {
        AppError::Upstream {
            operator,
            account,
            status,
            message: message.into(),
        }
    }

    pub fn auth(account: impl Into<String>, message: impl Into<String>) -> AppError {
        AppError::Auth {
            account: account.into(),
            message: message.into(),
        }
    }

    /// true si el upstream respondió 401 - dispara el único refresh permitido
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AppError::Upstream {
                status: Some(401),
                ..
            }
        )
    }

    /// Cuenta que originó el fallo, si se conoce
    pub fn failed_account(&self) -> Option<&str> {
        match self {
            AppError::Upstream { account, .. } => account.as_deref(),
            AppError::Auth { account, .. } => Some(account.as_str()),
            _ => None,
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::BadRequest(msg) => {
                eprintln!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Upstream {
                operator,
                account,
                status,
                message,
            } => {
                eprintln!("Upstream error from {}: {}", operator, message);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "Upstream Error".to_string(),
                        message: "An error occurred while communicating with an operator"
                            .to_string(),
                        details: Some(json!({
                            "operator": operator.name(),
                            "account": account,
                            "status": status,
                            "upstream_error": message,
                        })),
                        code: Some("UPSTREAM_ERROR".to_string()),
                    },
                )
            }

            AppError::Auth { account, message } => {
                eprintln!("Auth error for account {}: {}", account, message);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "Auth Error".to_string(),
                        message: "An error occurred while authenticating with an operator"
                            .to_string(),
                        details: Some(json!({ "account": account, "auth_error": message })),
                        code: Some("AUTH_ERROR".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;
