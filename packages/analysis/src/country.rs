//! Country inference from address text.
//!
//! A best-effort heuristic: the lowercased address is matched against a
//! fixed table of country and city name substrings, first match wins.
//! This is not authoritative geocoding; the trait exists so the keyword
//! table can later be swapped for a proper reverse-geocoding lookup
//! without touching the estimation pipeline.

/// Resolves a country code from a free-form address.
pub trait CountryResolver: Send + Sync {
    /// Returns the two-letter country code inferred for `address`.
    fn resolve(&self, address: &str) -> String;
}

/// Country code used when nothing in the address matches.
pub const DEFAULT_COUNTRY: &str = "FR";

/// Keyword → country code table. Ordered: earlier entries win, so a
/// country name beats a city name appearing later in the address.
const COUNTRY_KEYWORDS: &[(&str, &str)] = &[
    ("france", "FR"),
    ("paris", "FR"),
    ("lyon", "FR"),
    ("marseille", "FR"),
    ("allemagne", "DE"),
    ("germany", "DE"),
    ("berlin", "DE"),
    ("munich", "DE"),
    ("italie", "IT"),
    ("italy", "IT"),
    ("rome", "IT"),
    ("milan", "IT"),
    ("espagne", "ES"),
    ("spain", "ES"),
    ("madrid", "ES"),
    ("barcelona", "ES"),
    ("royaume-uni", "UK"),
    ("united kingdom", "UK"),
    ("london", "UK"),
    ("pologne", "PL"),
    ("poland", "PL"),
    ("warsaw", "PL"),
    ("pays-bas", "NL"),
    ("netherlands", "NL"),
    ("amsterdam", "NL"),
    ("belgique", "BE"),
    ("belgium", "BE"),
    ("brussels", "BE"),
    ("autriche", "AT"),
    ("austria", "AT"),
    ("vienna", "AT"),
    ("suisse", "CH"),
    ("switzerland", "CH"),
    ("zurich", "CH"),
    ("suède", "SE"),
    ("sweden", "SE"),
    ("stockholm", "SE"),
    ("norvège", "NO"),
    ("norway", "NO"),
    ("oslo", "NO"),
    ("danemark", "DK"),
    ("denmark", "DK"),
    ("copenhagen", "DK"),
    ("finlande", "FI"),
    ("finland", "FI"),
    ("helsinki", "FI"),
    ("irlande", "IE"),
    ("ireland", "IE"),
    ("dublin", "IE"),
    ("portugal", "PT"),
    ("lisbon", "PT"),
    ("grèce", "EL"),
    ("greece", "EL"),
    ("athens", "EL"),
];

/// The default keyword-table resolver.
pub struct KeywordCountryResolver;

impl CountryResolver for KeywordCountryResolver {
    fn resolve(&self, address: &str) -> String {
        let address = address.to_lowercase();
        COUNTRY_KEYWORDS
            .iter()
            .find(|(keyword, _)| address.contains(keyword))
            .map_or(DEFAULT_COUNTRY, |(_, code)| *code)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(address: &str) -> String {
        KeywordCountryResolver.resolve(address)
    }

    #[test]
    fn matches_country_names() {
        assert_eq!(resolve("12 Hauptstraße, Germany"), "DE");
        assert_eq!(resolve("Praça do Comércio, Portugal"), "PT");
    }

    #[test]
    fn matches_city_names() {
        assert_eq!(resolve("10 Downing Street, London"), "UK");
        assert_eq!(resolve("Plaza Mayor, Madrid"), "ES");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(resolve("PARIS"), "FR");
        assert_eq!(resolve("BeRlIn"), "DE");
    }

    #[test]
    fn first_table_entry_wins() {
        // "france" precedes "london" in the table, so a French address
        // mentioning a London-named street stays French.
        assert_eq!(resolve("Rue de London, France"), "FR");
    }

    #[test]
    fn unknown_addresses_default_to_france() {
        assert_eq!(resolve("1600 Pennsylvania Avenue"), DEFAULT_COUNTRY);
        assert_eq!(resolve(""), DEFAULT_COUNTRY);
    }
}
