use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Observation – one (country, year) row of the Gapminder table
// ---------------------------------------------------------------------------

/// A single country-year observation.
///
/// Field names on the wire follow the Gapminder table (`lifeExp`, `gdpPercap`, …)
/// so the same struct reads CSV / JSON and writes CSV exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: String,
    pub continent: String,
    pub year: i32,
    #[serde(rename = "lifeExp")]
    pub life_exp: f64,
    pub pop: f64,
    #[serde(rename = "gdpPercap")]
    pub gdp_percap: f64,
    /// ISO 3166-1 alpha-3 code, when the source carries it.
    #[serde(default)]
    pub iso_alpha: Option<String>,
    /// ISO 3166-1 numeric code, when the source carries it.
    #[serde(default)]
    pub iso_num: Option<i64>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete, immutable table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed year and continent indices.
///
/// Built once at startup and shared behind an `Arc`; there are no mutating
/// methods.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    years: Vec<i32>,
    continents: BTreeSet<String>,
}

impl Dataset {
    /// Build the year / continent indices from the loaded rows.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let years: BTreeSet<i32> = observations.iter().map(|o| o.year).collect();
        let continents: BTreeSet<String> =
            observations.iter().map(|o| o.continent.clone()).collect();

        Dataset {
            observations,
            years: years.into_iter().collect(),
            continents,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct years present in the table, ascending.
    pub fn available_years(&self) -> &[i32] {
        &self.years
    }

    /// Distinct continent labels, sorted.
    pub fn continents(&self) -> &BTreeSet<String> {
        &self.continents
    }

    /// Number of distinct countries observed in `year`.
    pub fn country_count(&self, year: i32) -> usize {
        self.observations
            .iter()
            .filter(|o| o.year == year)
            .map(|o| o.country.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::fixtures::{gapminder_fixture, observation};

    #[test]
    fn fixture_years_cover_gapminder_range() {
        let ds = gapminder_fixture();
        let years = ds.available_years();
        assert_eq!(years.first(), Some(&1952));
        assert_eq!(years.last(), Some(&2007));
        assert_eq!(years.len(), 12);
    }

    #[test]
    fn continents_are_deduplicated() {
        let ds = gapminder_fixture();
        let continents: Vec<&str> = ds.continents().iter().map(String::as_str).collect();
        assert_eq!(continents, vec!["Africa", "Americas", "Asia", "Europe", "Oceania"]);
    }

    #[test]
    fn country_count_ignores_other_years() {
        let ds = Dataset::from_observations(vec![
            observation("Chile", "Americas", 1952, 54.7, 6.4e6, 3939.9),
            observation("Chile", "Americas", 1957, 56.1, 7.0e6, 4315.6),
            observation("Peru", "Americas", 1957, 46.3, 1.0e7, 4245.3),
        ]);
        assert_eq!(ds.country_count(1952), 1);
        assert_eq!(ds.country_count(1957), 2);
        assert_eq!(ds.country_count(1962), 0);
    }

    proptest! {
        #[test]
        fn available_years_sorted_and_unique(
            years in proptest::collection::vec(1900..2100i32, 1..200)
        ) {
            let rows = years
                .iter()
                .map(|&y| observation("X", "Asia", y, 50.0, 1.0e6, 1000.0))
                .collect();
            let ds = Dataset::from_observations(rows);
            let out = ds.available_years();

            prop_assert!(!out.is_empty());
            prop_assert!(out.windows(2).all(|w| w[0] < w[1]));
            for y in &years {
                prop_assert!(out.contains(y));
            }
        }
    }
}
