//! Speaker population sampling
//!
//! Samples a target speaker population matching the product's market
//! distribution: city (with its country and accent), gender, banded age and
//! speech rate. Each sampled speaker gets a unique identifier used to key
//! every downstream artifact.

use anyhow::{Context, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// A city bucket with its country, accent and population share
struct CityBucket {
    city: &'static str,
    country: &'static str,
    accent: &'static str,
    percent: u32,
}

/// Target market distribution
const CITY_BUCKETS: &[CityBucket] = &[
    CityBucket { city: "Los Angeles", country: "USA", accent: "Westcoast US", percent: 30 },
    CityBucket { city: "New York", country: "USA", accent: "Eastcoast US", percent: 25 },
    CityBucket { city: "Chicago", country: "USA", accent: "Midwest US", percent: 10 },
    CityBucket { city: "Dallas", country: "USA", accent: "South US", percent: 5 },
    CityBucket { city: "Miami", country: "USA", accent: "Latin", percent: 10 },
    CityBucket { city: "Montreal", country: "CA", accent: "French", percent: 5 },
    CityBucket { city: "London", country: "UK", accent: "England", percent: 10 },
    CityBucket { city: "Delhi", country: "IND", accent: "India", percent: 3 },
    CityBucket { city: "Sydney", country: "AUS", accent: "Australia", percent: 2 },
];

/// Age bands with their population share (min, max, percent)
const AGE_BANDS: &[(u32, u32, u32)] = &[
    (15, 24, 18),
    (25, 34, 30),
    (35, 44, 22),
    (45, 54, 15),
    (55, 64, 10),
    (65, 80, 5),
];

/// Speech-rate classes with their share
const RATE_SHARES: &[(&str, u32)] = &[("Fast", 20), ("Normal", 60), ("Slow", 20)];

/// One sampled speaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerRow {
    pub identifier: String,
    pub country: String,
    pub city: String,
    pub accent: String,
    pub gender: String,
    pub age: u32,
    pub speech_rate: String,
}

/// Sample `count` speakers from the target distribution
///
/// Identifiers are `{country}_{city}_{gender}_{age}_{rate}`, suffixed `_1`,
/// `_2`, ... when the same combination repeats.
pub fn sample_population(count: usize, seed: Option<u64>) -> Vec<SpeakerRow> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let city_dist =
        WeightedIndex::new(CITY_BUCKETS.iter().map(|b| b.percent)).expect("static weights");
    let age_dist =
        WeightedIndex::new(AGE_BANDS.iter().map(|b| b.2)).expect("static weights");
    let rate_dist =
        WeightedIndex::new(RATE_SHARES.iter().map(|r| r.1)).expect("static weights");

    let mut rows = Vec::with_capacity(count);
    let mut seen: HashMap<String, usize> = HashMap::new();

    for _ in 0..count {
        let bucket = &CITY_BUCKETS[city_dist.sample(&mut rng)];
        let gender = if rng.gen_bool(0.5) { "Male" } else { "Female" };
        let (min_age, max_age, _) = AGE_BANDS[age_dist.sample(&mut rng)];
        let age = rng.gen_range(min_age..=max_age);
        let rate = RATE_SHARES[rate_dist.sample(&mut rng)].0;

        let base = format!("{}_{}_{}_{}_{}", bucket.country, bucket.city, gender, age, rate);
        let identifier = match seen.get_mut(&base) {
            Some(n) => {
                *n += 1;
                format!("{}_{}", base, n)
            }
            None => {
                seen.insert(base.clone(), 0);
                base
            }
        };

        rows.push(SpeakerRow {
            identifier,
            country: bucket.country.to_string(),
            city: bucket.city.to_string(),
            accent: bucket.accent.to_string(),
            gender: gender.to_string(),
            age,
            speech_rate: rate.to_string(),
        });
    }

    rows
}

/// Write speakers to CSV
pub fn write_csv(rows: &[SpeakerRow], out_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(out_path)
        .with_context(|| format!("Creating {}", out_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} speakers to {}", rows.len(), out_path.display());
    Ok(())
}

/// Read speakers back from CSV
pub fn read_csv(path: &Path) -> Result<Vec<SpeakerRow>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Reading {}", path.display()))?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<SpeakerRow>, _>>()
        .with_context(|| format!("Parsing {}", path.display()))?;
    Ok(rows)
}

/// Log the sampled distribution for a quick sanity check
pub fn log_distribution(rows: &[SpeakerRow]) {
    let total = rows.len().max(1);

    let mut by_city: HashMap<&str, usize> = HashMap::new();
    let mut by_gender: HashMap<&str, usize> = HashMap::new();
    let mut by_rate: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *by_city.entry(row.city.as_str()).or_insert(0) += 1;
        *by_gender.entry(row.gender.as_str()).or_insert(0) += 1;
        *by_rate.entry(row.speech_rate.as_str()).or_insert(0) += 1;
    }

    info!("City distribution:");
    let mut cities: Vec<_> = by_city.into_iter().collect();
    cities.sort_by(|a, b| b.1.cmp(&a.1));
    for (city, count) in cities {
        info!("  {}: {:.1}%", city, count as f64 * 100.0 / total as f64);
    }

    info!("Gender distribution:");
    for (gender, count) in by_gender {
        info!("  {}: {:.1}%", gender, count as f64 * 100.0 / total as f64);
    }

    info!("Speech rate distribution:");
    for (rate, count) in by_rate {
        info!("  {}: {:.1}%", rate, count as f64 * 100.0 / total as f64);
    }

    let mut ages: Vec<u32> = rows.iter().map(|r| r.age).collect();
    ages.sort_unstable();
    if !ages.is_empty() {
        let median = ages[ages.len() / 2];
        let mean = ages.iter().sum::<u32>() as f64 / ages.len() as f64;
        info!(
            "Age: range {}-{}, median {}, mean {:.1}",
            ages[0],
            ages[ages.len() - 1],
            median,
            mean
        );
    }

    let unique: std::collections::HashSet<&str> =
        rows.iter().map(|r| r.identifier.as_str()).collect();
    if unique.len() != rows.len() {
        tracing::warn!(
            "Identifier collision: {} rows, {} unique",
            rows.len(),
            unique.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sample_count_and_uniqueness() {
        let rows = sample_population(300, Some(42));
        assert_eq!(rows.len(), 300);

        let unique: std::collections::HashSet<&str> =
            rows.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(unique.len(), 300, "identifiers must be unique");
    }

    #[test]
    fn test_sample_deterministic_under_seed() {
        let a = sample_population(50, Some(7));
        let b = sample_population(50, Some(7));
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.identifier, y.identifier);
        }
    }

    #[test]
    fn test_ages_within_bands() {
        for row in sample_population(500, Some(1)) {
            assert!(row.age >= 15 && row.age <= 80, "age {} out of range", row.age);
        }
    }

    #[test]
    fn test_distribution_roughly_matches_weights() {
        let rows = sample_population(2000, Some(123));
        let la = rows.iter().filter(|r| r.city == "Los Angeles").count();
        let sydney = rows.iter().filter(|r| r.city == "Sydney").count();
        // 30% vs 2% with generous slack
        assert!(la > sydney * 5, "LA {} Sydney {}", la, sydney);

        let normal = rows.iter().filter(|r| r.speech_rate == "Normal").count();
        assert!(normal as f64 > rows.len() as f64 * 0.5);
    }

    #[test]
    fn test_csv_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("speakers.csv");

        let rows = sample_population(10, Some(9));
        write_csv(&rows, &path).unwrap();
        let read_back = read_csv(&path).unwrap();

        assert_eq!(read_back.len(), 10);
        assert_eq!(read_back[0].identifier, rows[0].identifier);
        assert_eq!(read_back[3].age, rows[3].age);
    }
}
