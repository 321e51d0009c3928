//! # Client Type — Individual or Entity
//!
//! The onboarding form handles exactly two shapes of client. This is the
//! one definition of that choice; schema tables, typed records and the CLI
//! all match on it exhaustively.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::KycError;

/// The kind of client being onboarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    /// A natural person.
    Individual,
    /// A legal entity (company, partnership, trust, foundation).
    Entity,
}

/// Number of client types.
pub const CLIENT_TYPE_COUNT: usize = 2;

impl ClientType {
    /// Both client types in form tab order.
    pub fn all() -> &'static [ClientType] {
        &[Self::Individual, Self::Entity]
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Entity => "entity",
        }
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = KycError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "entity" => Ok(Self::Entity),
            other => Err(KycError::Parse(format!("unknown client type: {other:?}"))),
        }
    }
}
