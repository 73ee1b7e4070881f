use std::collections::BTreeMap;

use crate::countries::resolve_country;
use crate::stop::{RawStop, Role, Route, TradeStop};

const DEFAULT_MATERIAL: &str = "Export shipment";
const DEFAULT_HS_CODE: &str = "0000.00";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Fewer than two usable entries remained after dropping nameless ones.
    TooFewStops { usable: usize },
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::TooFewStops { usable } => {
                write!(f, "route needs at least 2 stops, found {usable}")
            }
        }
    }
}

impl std::error::Error for RouteError {}

struct Candidate {
    country: String,
    role: String,
    material: Option<String>,
    hs_code: Option<String>,
    extra: BTreeMap<String, serde_json::Value>,
}

/// Validates and canonicalizes raw stop-like records into exactly one ordered
/// exporter→importer pair.
///
/// Selection: the first entry tagged `exporter` (else the first overall) and
/// the first entry tagged `importer` (else the last overall). Country names
/// are code-expanded and trimmed; roles are forced; missing material/hs_code
/// is backfilled from the sibling stop before falling back to the defaults.
pub fn normalize_route(raw: &[RawStop]) -> Result<Route, RouteError> {
    let candidates: Vec<Candidate> = raw.iter().filter_map(candidate).collect();
    if candidates.len() < 2 {
        return Err(RouteError::TooFewStops {
            usable: candidates.len(),
        });
    }

    let exporter_idx = candidates
        .iter()
        .position(|c| c.role == "exporter")
        .unwrap_or(0);
    let importer_idx = candidates
        .iter()
        .position(|c| c.role == "importer")
        .unwrap_or(candidates.len() - 1);

    let exp = &candidates[exporter_idx];
    let imp = &candidates[importer_idx];

    let exporter_material = exp
        .material
        .clone()
        .or_else(|| imp.material.clone())
        .unwrap_or_else(|| DEFAULT_MATERIAL.to_string());
    let exporter_hs = exp
        .hs_code
        .clone()
        .or_else(|| imp.hs_code.clone())
        .unwrap_or_else(|| DEFAULT_HS_CODE.to_string());

    let importer_material = imp.material.clone().unwrap_or_else(|| exporter_material.clone());
    let importer_hs = imp.hs_code.clone().unwrap_or_else(|| exporter_hs.clone());

    let exporter = TradeStop {
        country: exp.country.clone(),
        role: Role::Exporter,
        material: exporter_material,
        hs_code: exporter_hs,
        extra: exp.extra.clone(),
    };
    let importer = TradeStop {
        country: imp.country.clone(),
        role: Role::Importer,
        material: importer_material,
        hs_code: importer_hs,
        extra: imp.extra.clone(),
    };

    Ok(Route::new(exporter, importer))
}

/// Parses a JSON document (array of stop-like records) and normalizes it.
/// This is the fallback route contract for hosts that hand over raw JSON.
pub fn normalize_route_json(payload: &str) -> Result<Route, RouteJsonError> {
    let raw: Vec<RawStop> = serde_json::from_str(payload).map_err(RouteJsonError::Parse)?;
    normalize_route(&raw).map_err(RouteJsonError::Normalize)
}

#[derive(Debug)]
pub enum RouteJsonError {
    Parse(serde_json::Error),
    Normalize(RouteError),
}

impl std::fmt::Display for RouteJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteJsonError::Parse(e) => write!(f, "invalid route document: {e}"),
            RouteJsonError::Normalize(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RouteJsonError {}

fn candidate(raw: &RawStop) -> Option<Candidate> {
    let name = raw.country.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }
    let country = resolve_country(name).trim().to_string();

    Some(Candidate {
        country,
        role: raw
            .role
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase(),
        material: non_empty(raw.material.as_deref()),
        hs_code: raw.hs_code.as_ref().and_then(hs_code_string),
        extra: raw.extra.clone(),
    })
}

fn non_empty(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

/// `hs_code` arrives as either a string or a bare number; coerce both to the
/// trimmed string form used for flower matching.
fn hs_code_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => non_empty(Some(s)),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{RouteError, normalize_route, normalize_route_json};
    use crate::stop::{RawStop, Role};
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_empty_and_single_entry_input() {
        assert_eq!(
            normalize_route(&[]),
            Err(RouteError::TooFewStops { usable: 0 })
        );
        assert_eq!(
            normalize_route(&[RawStop::named("China")]),
            Err(RouteError::TooFewStops { usable: 1 })
        );
    }

    #[test]
    fn rejects_entries_without_country_names() {
        let raw = vec![
            RawStop::default(),
            RawStop::named("   "),
            RawStop::named("Japan"),
        ];
        assert_eq!(
            normalize_route(&raw),
            Err(RouteError::TooFewStops { usable: 1 })
        );
    }

    #[test]
    fn forces_roles_and_backfills_defaults() {
        let raw = vec![
            RawStop::named("China"),
            RawStop::with_role("Germany", "importer"),
        ];
        let route = normalize_route(&raw).expect("route");

        let exporter = route.exporter();
        assert_eq!(exporter.country, "China");
        assert_eq!(exporter.role, Role::Exporter);
        assert_eq!(exporter.material, "Export shipment");
        assert_eq!(exporter.hs_code, "0000.00");

        let importer = route.importer();
        assert_eq!(importer.country, "Germany");
        assert_eq!(importer.role, Role::Importer);
        assert_eq!(importer.material, "Export shipment");
        assert_eq!(importer.hs_code, "0000.00");
    }

    #[test]
    fn picks_tagged_entries_over_positional_fallbacks() {
        let raw = vec![
            RawStop::named("France"),
            RawStop::with_role("India", "exporter"),
            RawStop::with_role("Brazil", "importer"),
            RawStop::named("Canada"),
        ];
        let route = normalize_route(&raw).expect("route");
        assert_eq!(route.exporter().country, "India");
        assert_eq!(route.importer().country, "Brazil");
    }

    #[test]
    fn importer_backfills_material_and_hs_code_from_exporter() {
        let mut exporter = RawStop::with_role("IN", "exporter");
        exporter.material = Some("Refined lithium".to_string());
        exporter.hs_code = Some(serde_json::json!("2805.19"));
        let importer = RawStop::with_role("JP", "importer");

        let route = normalize_route(&[exporter, importer]).expect("route");
        assert_eq!(route.exporter().country, "India");
        assert_eq!(route.importer().country, "Japan");
        assert_eq!(route.importer().material, "Refined lithium");
        assert_eq!(route.importer().hs_code, "2805.19");
    }

    #[test]
    fn coerces_numeric_hs_codes() {
        let mut exporter = RawStop::with_role("China", "exporter");
        exporter.hs_code = Some(serde_json::json!(8471));
        let importer = RawStop::with_role("Germany", "importer");
        let route = normalize_route(&[exporter, importer]).expect("route");
        assert_eq!(route.exporter().hs_code, "8471");
    }

    #[test]
    fn parses_fallback_json_documents() {
        let payload = r#"[
            {"country": "US", "role": "exporter", "material": "Copper wire", "hs_code": "7408.11", "origin_port": "Long Beach"},
            {"country": "DE", "role": "importer"}
        ]"#;
        let route = normalize_route_json(payload).expect("route");
        assert_eq!(route.exporter().country, "United States of America");
        assert_eq!(route.importer().material, "Copper wire");
        assert_eq!(
            route.exporter().extra.get("origin_port"),
            Some(&serde_json::json!("Long Beach"))
        );
    }

    #[test]
    fn trims_country_names() {
        let raw = vec![
            RawStop::named("  Italy  "),
            RawStop::with_role("  Australia ", "importer"),
        ];
        let route = normalize_route(&raw).expect("route");
        assert_eq!(route.exporter().country, "Italy");
        assert_eq!(route.importer().country, "Australia");
    }
}
