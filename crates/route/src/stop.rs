use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which end of a trade leg a stop represents. Closed two-member set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Exporter,
    Importer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Exporter => write!(f, "exporter"),
            Role::Importer => write!(f, "importer"),
        }
    }
}

/// One country entry in a normalized trade route.
///
/// `extra` preserves any fields beyond the core contract; the host's detail
/// panel renders them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStop {
    pub country: String,
    pub role: Role,
    pub material: String,
    pub hs_code: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// An immutable exporter→importer pair.
///
/// Constructed only by [`crate::normalize_route`]; the first stop is always
/// the exporter and the second the importer.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    stops: [TradeStop; 2],
}

impl Route {
    pub(crate) fn new(exporter: TradeStop, importer: TradeStop) -> Self {
        debug_assert_eq!(exporter.role, Role::Exporter);
        debug_assert_eq!(importer.role, Role::Importer);
        Self {
            stops: [exporter, importer],
        }
    }

    pub fn exporter(&self) -> &TradeStop {
        &self.stops[0]
    }

    pub fn importer(&self) -> &TradeStop {
        &self.stops[1]
    }

    pub fn stops(&self) -> &[TradeStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// A stop-like record as received from the host application, before
/// normalization. Everything is optional; `hs_code` may arrive as a JSON
/// number and is coerced to a string during normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawStop {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub hs_code: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawStop {
    pub fn named(country: &str) -> Self {
        Self {
            country: Some(country.to_string()),
            ..Self::default()
        }
    }

    pub fn with_role(country: &str, role: &str) -> Self {
        Self {
            country: Some(country.to_string()),
            role: Some(role.to_string()),
            ..Self::default()
        }
    }
}
