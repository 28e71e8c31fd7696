//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset (once, at startup)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  Vec<Observation>, year + continent index
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year == selected → FilteredView
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::model::{Dataset, Observation};

    pub fn observation(
        country: &str,
        continent: &str,
        year: i32,
        life_exp: f64,
        pop: f64,
        gdp_percap: f64,
    ) -> Observation {
        Observation {
            country: country.to_string(),
            continent: continent.to_string(),
            year,
            life_exp,
            pop,
            gdp_percap,
            iso_alpha: None,
            iso_num: None,
        }
    }

    /// Gapminder-shaped table: 1952..=2007 every five years, eight countries
    /// across all five continents. Eritrea only appears from 1992 on.
    pub fn gapminder_fixture() -> Dataset {
        let countries = [
            ("Nigeria", "Africa", 33.0e6, 1077.0),
            ("Eritrea", "Africa", 1.4e6, 328.9),
            ("Brazil", "Americas", 56.6e6, 2108.9),
            ("Canada", "Americas", 14.8e6, 11367.2),
            ("Japan", "Asia", 86.5e6, 3216.9),
            ("India", "Asia", 372.0e6, 546.6),
            ("Norway", "Europe", 3.3e6, 10095.4),
            ("Australia", "Oceania", 8.7e6, 10039.6),
        ];

        let mut rows = Vec::new();
        for year in (1952..=2007).step_by(5) {
            let t = f64::from(year - 1952);
            for &(country, continent, pop0, gdp0) in &countries {
                if country == "Eritrea" && year < 1992 {
                    continue;
                }
                rows.push(observation(
                    country,
                    continent,
                    year,
                    45.0 + t * 0.4,
                    pop0 * (1.0 + t * 0.02),
                    gdp0 * (1.0 + t * 0.03),
                ));
            }
        }
        Dataset::from_observations(rows)
    }
}
