//! Contract types and how lenders read them.
//!
//! A static lookup from the kind of employment contract to the risk a
//! bank associates with it, plus the recommendations shown alongside.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    /// Término indefinido.
    Indefinite,
    /// Término fijo.
    Fixed,
    /// Obra o labor.
    ObraLabor,
    /// Prestación de servicios.
    Ops,
}

impl ContractType {
    pub const ALL: [ContractType; 4] = [
        ContractType::Indefinite,
        ContractType::Fixed,
        ContractType::ObraLabor,
        ContractType::Ops,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ContractType::Indefinite => "INDEFINITE",
            ContractType::Fixed => "FIXED",
            ContractType::ObraLabor => "OBRA_LABOR",
            ContractType::Ops => "OPS",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown contract type '{0}'")]
pub struct UnknownContractType(pub String);

impl FromStr for ContractType {
    type Err = UnknownContractType;

    /// Case-insensitive; accepts `-` in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        ContractType::ALL
            .into_iter()
            .find(|t| t.code() == normalized)
            .ok_or_else(|| UnknownContractType(s.to_string()))
    }
}

/// Risk a lender assigns to a contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Bajo,
    Medio,
    Alto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    pub label: &'static str,
    pub risk_level: RiskLevel,
    pub bank_view: &'static str,
    pub description: &'static str,
}

/// Lookup result shown once the applicant picks a contract type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    #[serde(flatten)]
    pub info: ContractInfo,
    pub warning: Option<&'static str>,
    pub recommendations: Vec<&'static str>,
}

const GENERAL_RECOMMENDATIONS: [&str; 2] = [
    "Mantén tus pagos de seguridad social al día.",
    "Guarda tus desprendibles de los últimos 6 meses.",
];

/// Items to verify before applying, whatever the contract.
pub const APPLICATION_CHECKLIST: [&str; 4] = [
    "Tengo mis desprendibles de nómina de los últimos 3 a 6 meses.",
    "Verifiqué que mis cesantías están depositadas en el fondo.",
    "Mi seguridad social (Salud, Pensión, ARL) está al día.",
    "Si tengo ingresos variables, aparecen en los desprendibles.",
];

pub fn contract_info(contract_type: ContractType) -> ContractInfo {
    let (label, risk_level, bank_view, description) = match contract_type {
        ContractType::Indefinite => (
            "Término Indefinido",
            RiskLevel::Bajo,
            "Favorito del Banco",
            "Genera la mayor confianza para el estudio de crédito al no tener fecha de finalización.",
        ),
        ContractType::Fixed => (
            "Término Fijo",
            RiskLevel::Medio,
            "Requiere Renovación",
            "El banco usualmente pedirá que hayas renovado el contrato al menos una vez.",
        ),
        ContractType::ObraLabor => (
            "Obra o Labor",
            RiskLevel::Medio,
            "Requiere Antigüedad",
            "Los bancos suelen pedir una antigüedad mayor o un codeudor debido a la naturaleza temporal.",
        ),
        ContractType::Ops => (
            "Prestación de Servicios",
            RiskLevel::Alto,
            "Independiente",
            "No es contrato laboral. Debes demostrar ingresos mediante extractos bancarios sólidos.",
        ),
    };
    ContractInfo {
        contract_type,
        label,
        risk_level,
        bank_view,
        description,
    }
}

/// All contract types in display order.
pub fn all_contracts() -> Vec<ContractInfo> {
    ContractType::ALL.into_iter().map(contract_info).collect()
}

pub fn risk_analysis(contract_type: ContractType) -> RiskAnalysis {
    let mut recommendations = GENERAL_RECOMMENDATIONS.to_vec();
    if contract_type == ContractType::Fixed {
        recommendations.push("Intenta renovar el contrato antes de aplicar.");
    }
    let warning = match contract_type {
        ContractType::Ops => {
            Some("Necesitas extractos bancarios impecables para demostrar tus ingresos.")
        }
        _ => None,
    };
    RiskAnalysis {
        info: contract_info(contract_type),
        warning,
        recommendations,
    }
}
