//! Servicio de credenciales por cuenta de operador
//!
//! Mantiene los bearer tokens de los operadores que requieren login. Cada
//! cuenta (VOI tiene una, Bolt tiene una por ciudad) pasa por el ciclo
//! Unset -> Valid -> Refreshing -> Valid. Los tokens solo se mutan aquí;
//! los adapters los leen vía ensure() y piden refresh() después de un 401.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};

use crate::utils::errors::{AppError, AppResult};

/// Estado del token de una cuenta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Unset,
    Valid,
    Refreshing,
}

/// Token de una cuenta - vacío hasta el primer login
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: String,
    pub state: TokenState,
}

impl Credential {
    fn unset() -> Self {
        Self {
            token: String::new(),
            state: TokenState::Unset,
        }
    }
}

/// Estilo de login de la cuenta
#[derive(Debug, Clone)]
pub enum LoginKind {
    /// Basic auth + body form "grant_type=client_credentials" (VOI)
    ClientCredentials,
    /// POST JSON {user_name, user_pass} (Bolt)
    UserPass,
}

/// Configuración de una cuenta: endpoint de login y credenciales
#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub login_url: String,
    pub username: String,
    pub password: String,
    pub kind: LoginKind,
    /// Header Accept que exige el endpoint de login, si aplica
    pub accept: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Servicio de credenciales - dueño exclusivo de los tokens
pub struct CredentialService {
    http: reqwest::Client,
    accounts: HashMap<String, AccountConfig>,
    credentials: RwLock<HashMap<String, Credential>>,
    login_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CredentialService {
    pub fn new(http: reqwest::Client, accounts: HashMap<String, AccountConfig>) -> Self {
        Self {
            http,
            accounts,
            credentials: RwLock::new(HashMap::new()),
            login_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Construir las cuentas conocidas desde la configuración del entorno
    pub fn from_config(
        config: &crate::config::environment::EnvironmentConfig,
        http: reqwest::Client,
    ) -> Self {
        use crate::clients::voi_client::{MDS_ACCEPT, VOI_ACCOUNT};
        use crate::models::operator::BoltCity;

        let mut accounts = HashMap::new();
        accounts.insert(
            VOI_ACCOUNT.to_string(),
            AccountConfig {
                login_url: config.voi_auth_url.clone(),
                username: config.voi_api_user.clone(),
                password: config.voi_api_pass.clone(),
                kind: LoginKind::ClientCredentials,
                accept: Some(MDS_ACCEPT.to_string()),
            },
        );
        for city in BoltCity::ALL {
            let (username, password) = config.bolt_credentials(city);
            accounts.insert(
                city.account_key().to_string(),
                AccountConfig {
                    login_url: config.bolt_auth_url.clone(),
                    username: username.to_string(),
                    password: password.to_string(),
                    kind: LoginKind::UserPass,
                    accept: None,
                },
            );
        }
        Self::new(http, accounts)
    }

    /// Token actual de la cuenta; hace login primero si nunca se obtuvo uno
    pub async fn ensure(&self, account: &str) -> AppResult<String> {
        {
            let credentials = self.credentials.read().await;
            if let Some(credential) = credentials.get(account) {
                if credential.state == TokenState::Valid {
                    return Ok(credential.token.clone());
                }
            }
        }
        self.login_serialized(account, false).await
    }

    /// Login forzado después de un 401; reemplaza el token de esa cuenta
    pub async fn refresh(&self, account: &str) -> AppResult<String> {
        log::info!("🔄 Refreshing session key for account {}", account);
        self.login_serialized(account, true).await
    }

    /// Estado actual de la cuenta, para observabilidad y tests
    pub async fn token_state(&self, account: &str) -> TokenState {
        let credentials = self.credentials.read().await;
        credentials
            .get(account)
            .map(|credential| credential.state)
            .unwrap_or(TokenState::Unset)
    }

    /// Serializar logins por cuenta: un solo login en vuelo a la vez
    async fn login_serialized(&self, account: &str, force: bool) -> AppResult<String> {
        let lock = self.login_lock(account).await;
        let _guard = lock.lock().await;

        if !force {
            // Otro caller pudo completar el login mientras esperábamos
            let credentials = self.credentials.read().await;
            if let Some(credential) = credentials.get(account) {
                if credential.state == TokenState::Valid {
                    return Ok(credential.token.clone());
                }
            }
        }

        self.set_state(account, TokenState::Refreshing).await;
        match self.login(account).await {
            Ok(token) => {
                let mut credentials = self.credentials.write().await;
                credentials.insert(
                    account.to_string(),
                    Credential {
                        token: token.clone(),
                        state: TokenState::Valid,
                    },
                );
                log::info!("💾 Token almacenado para cuenta {}", account);
                Ok(token)
            }
            Err(err) => {
                log::error!("❌ Failed to refresh session key for {}: {}", account, err);
                self.set_state(account, TokenState::Unset).await;
                Err(err)
            }
        }
    }

    async fn login(&self, account: &str) -> AppResult<String> {
        let config = self
            .accounts
            .get(account)
            .ok_or_else(|| AppError::auth(account, "unknown account"))?;

        let mut request = match config.kind {
            LoginKind::ClientCredentials => self
                .http
                .post(&config.login_url)
                .basic_auth(&config.username, Some(&config.password))
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body("grant_type=client_credentials"),
            LoginKind::UserPass => self.http.post(&config.login_url).json(&json!({
                "user_name": config.username,
                "user_pass": config.password,
            })),
        };
        if let Some(accept) = &config.accept {
            request = request.header("Accept", accept);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AppError::auth(account, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::auth(
                account,
                format!("login returned {}", status),
            ));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|err| AppError::auth(account, format!("malformed login response: {}", err)))?;

        Ok(body.access_token)
    }

    async fn set_state(&self, account: &str, state: TokenState) {
        let mut credentials = self.credentials.write().await;
        credentials
            .entry(account.to_string())
            .or_insert_with(Credential::unset)
            .state = state;
    }

    async fn login_lock(&self, account: &str) -> Arc<Mutex<()>> {
        let mut locks = self.login_locks.lock().await;
        locks
            .entry(account.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
