//! Modelo de Operator
//!
//! Este módulo define el conjunto cerrado de operadores conocidos y las
//! cuentas por ciudad de Bolt. Agregar un operador significa extender el
//! enum y registrar su adapter, no tocar el agregador.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operadores de micromovilidad soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Voi,
    Tier,
    Zvipp,
    Lime,
    Bolt,
}

impl Operator {
    /// Conjunto completo de operadores, usado cuando el request no trae whitelist
    pub const ALL: [Operator; 5] = [
        Operator::Voi,
        Operator::Tier,
        Operator::Zvipp,
        Operator::Lime,
        Operator::Bolt,
    ];

    /// Parsear un nombre de operador (case-insensitive)
    pub fn from_name(name: &str) -> Option<Operator> {
        match name.to_lowercase().as_str() {
            "voi" => Some(Operator::Voi),
            "tier" => Some(Operator::Tier),
            "zvipp" => Some(Operator::Zvipp),
            "lime" => Some(Operator::Lime),
            "bolt" => Some(Operator::Bolt),
            _ => None,
        }
    }

    /// Nombre en minúsculas, igual que la serialización JSON
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Voi => "voi",
            Operator::Tier => "tier",
            Operator::Zvipp => "zvipp",
            Operator::Lime => "lime",
            Operator::Bolt => "bolt",
        }
    }

    /// Prefijo en mayúsculas para namespacing de ids
    pub fn prefix(&self) -> &'static str {
        match self {
            Operator::Voi => "VOI",
            Operator::Tier => "TIER",
            Operator::Zvipp => "ZVIPP",
            Operator::Lime => "LIME",
            Operator::Bolt => "BOLT",
        }
    }

    /// Construir el id global de un vehículo a partir del id crudo del feed
    pub fn vehicle_id(&self, raw_id: &str) -> String {
        format!("{}:{}", self.prefix(), raw_id)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cuentas por ciudad de Bolt - cada una tiene credenciales y token propios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoltCity {
    Oslo,
    Lillestrom,
    Fredrikstad,
    Bergen,
}

impl BoltCity {
    pub const ALL: [BoltCity; 4] = [
        BoltCity::Oslo,
        BoltCity::Lillestrom,
        BoltCity::Fredrikstad,
        BoltCity::Bergen,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BoltCity::Oslo => "oslo",
            BoltCity::Lillestrom => "lillestrom",
            BoltCity::Fredrikstad => "fredrikstad",
            BoltCity::Bergen => "bergen",
        }
    }

    /// Clave de la cuenta en el CredentialService
    pub fn account_key(&self) -> &'static str {
        match self {
            BoltCity::Oslo => "bolt:oslo",
            BoltCity::Lillestrom => "bolt:lillestrom",
            BoltCity::Fredrikstad => "bolt:fredrikstad",
            BoltCity::Bergen => "bolt:bergen",
        }
    }
}
