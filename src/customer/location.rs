use std::collections::HashMap;

use super::iso3166::COUNTRIES;

/// An ISO 3166-1 country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    /// English short name, as published by ISO
    pub name: &'static str,
    pub alpha2: &'static str,
    pub alpha3: &'static str,
    pub numeric: &'static str,
}

/// Resolves free-text country names against the ISO 3166-1 table.
///
/// Matching is exact on the full short name, ignoring case. Partial names
/// (`"United"`, `"Korea"`) are misses.
///
/// # Examples
///
/// ```
/// use customer_batch::customer::location::LocationResolver;
///
/// let resolver = LocationResolver::default();
///
/// let germany = resolver.resolve("germany").unwrap();
/// assert_eq!(germany.name, "Germany");
/// assert_eq!(germany.alpha3, "DEU");
///
/// assert!(resolver.resolve("Mars").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LocationResolver {
    by_name: HashMap<String, &'static Country>,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new(COUNTRIES)
    }
}

impl LocationResolver {
    pub fn new(countries: &'static [Country]) -> Self {
        let by_name = countries
            .iter()
            .map(|country| (country.name.to_lowercase(), country))
            .collect();
        Self { by_name }
    }

    pub fn resolve(&self, name: &str) -> Option<&'static Country> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::LocationResolver;

    #[test]
    fn table_is_complete() {
        assert_eq!(LocationResolver::default().len(), 249);
    }

    #[test]
    fn lookup_ignores_case() {
        let resolver = LocationResolver::default();
        for candidate in ["France", "FRANCE", "fRaNcE"] {
            assert_eq!(resolver.resolve(candidate).map(|c| c.alpha3), Some("FRA"));
        }
    }

    #[test]
    fn non_ascii_names_resolve() {
        let resolver = LocationResolver::default();
        assert_eq!(resolver.resolve("côte d'ivoire").map(|c| c.alpha3), Some("CIV"));
        assert_eq!(resolver.resolve("ÅLAND ISLANDS").map(|c| c.alpha2), Some("AX"));
    }

    #[test]
    fn partial_names_are_misses() {
        let resolver = LocationResolver::default();
        assert!(resolver.resolve("United").is_none());
        assert!(resolver.resolve("Korea").is_none());
        assert!(resolver.resolve("Germ").is_none());
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn codes_are_not_names() {
        let resolver = LocationResolver::default();
        assert!(resolver.resolve("DEU").is_none());
        assert!(resolver.resolve("US").is_none());
    }

    #[test]
    fn long_official_names_resolve() {
        let resolver = LocationResolver::default();
        let uk = resolver
            .resolve("United Kingdom of Great Britain and Northern Ireland")
            .unwrap();
        assert_eq!(uk.alpha3, "GBR");
        assert_eq!(uk.numeric, "826");
    }
}
