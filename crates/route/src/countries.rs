/// ISO-2 country codes the upstream analysis service emits, mapped to the
/// display names used by the boundary dataset.
const COUNTRY_CODES: &[(&str, &str)] = &[
    ("US", "United States of America"),
    ("IN", "India"),
    ("CN", "China"),
    ("DE", "Germany"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("IT", "Italy"),
    ("CA", "Canada"),
    ("BR", "Brazil"),
    ("AU", "Australia"),
];

/// Expands a two-letter country code to its display name; anything not in the
/// table passes through unchanged.
pub fn resolve_country(name_or_code: &str) -> &str {
    let trimmed = name_or_code.trim();
    if trimmed.len() != 2 {
        return name_or_code;
    }
    for (code, name) in COUNTRY_CODES {
        if code.eq_ignore_ascii_case(trimmed) {
            return name;
        }
    }
    name_or_code
}

#[cfg(test)]
mod tests {
    use super::resolve_country;

    #[test]
    fn expands_known_codes_case_insensitively() {
        assert_eq!(resolve_country("US"), "United States of America");
        assert_eq!(resolve_country("de"), "Germany");
    }

    #[test]
    fn passes_through_names_and_unknown_codes() {
        assert_eq!(resolve_country("Germany"), "Germany");
        assert_eq!(resolve_country("ZZ"), "ZZ");
    }
}
