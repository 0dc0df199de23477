//! Feature toggles por operador
//!
//! Cada operador se puede apagar en runtime sin reiniciar el proceso. Los
//! valores son strings "on"/"off" (se siembran desde TOGGLE_<OPERADOR> en
//! el entorno) y se consultan antes de cada fetch: un operador apagado
//! devuelve una lista vacía sin llamar a su API.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::operator::Operator;

const TOGGLE_ON: &str = "on";
const TOGGLE_OFF: &str = "off";

/// Fuente de toggles por operador
#[derive(Clone)]
pub struct FeatureToggles {
    states: Arc<RwLock<HashMap<Operator, String>>>,
}

impl FeatureToggles {
    /// Sembrar los toggles desde variables de entorno (default: todo on)
    pub fn from_env() -> Self {
        let mut states = HashMap::new();
        for operator in Operator::ALL {
            let value = env::var(format!("TOGGLE_{}", operator.prefix()))
                .unwrap_or_else(|_| TOGGLE_ON.to_string());
            states.insert(operator, value);
        }
        Self {
            states: Arc::new(RwLock::new(states)),
        }
    }

    /// Estado actual del toggle como string
    pub async fn state(&self, operator: Operator) -> String {
        let states = self.states.read().await;
        states
            .get(&operator)
            .cloned()
            .unwrap_or_else(|| TOGGLE_ON.to_string())
    }

    pub async fn is_off(&self, operator: Operator) -> bool {
        self.state(operator).await == TOGGLE_OFF
    }

    /// Cambiar un toggle en runtime
    pub async fn set(&self, operator: Operator, value: &str) {
        let mut states = self.states.write().await;
        states.insert(operator, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toggles_default_on_and_runtime_off() {
        let toggles = FeatureToggles::from_env();
        assert!(!toggles.is_off(Operator::Voi).await);

        toggles.set(Operator::Voi, "off").await;
        assert!(toggles.is_off(Operator::Voi).await);
        assert_eq!(toggles.state(Operator::Voi).await, "off");

        toggles.set(Operator::Voi, "on").await;
        assert!(!toggles.is_off(Operator::Voi).await);
    }
}
