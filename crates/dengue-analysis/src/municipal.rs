//! Confirmed cases by municipality of residence.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use dengue_assets::{MunicipalPopulation, StatePopulation};
use dengue_ingest::columns;
use dengue_ingest::{CaseFrame, numeric_column_i64};
use dengue_model::Cve;

use crate::filters::confirmed_cases;
use crate::state::{NationalSummary, national_summary, per_100k};
use crate::stats::{mean, median, quantile, sample_std};

/// Filters applied to the top-municipalities table.
#[derive(Debug, Clone, Copy)]
pub struct MunicipalOptions {
    /// Minimum confirmed cases for a municipality to rank.
    pub min_cases: u64,
    /// Number of ranked rows to keep.
    pub top: usize,
}

impl Default for MunicipalOptions {
    fn default() -> Self {
        Self {
            min_cases: 100,
            top: 30,
        }
    }
}

/// Descriptive statistics over the surviving municipal rates.
#[derive(Debug, Clone, Serialize)]
pub struct RateStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; zero when fewer than two rates.
    pub std: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MunicipalRow {
    pub cve: String,
    pub municipality: String,
    pub state: String,
    pub total: u64,
    pub population: u64,
    pub rate: f64,
}

impl MunicipalRow {
    /// Display name used by the table: `Papantla, Veracruz`.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.municipality, self.state)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MunicipalBreakdown {
    pub year: u16,
    pub national: NationalSummary,
    /// Rate per CVE for the map; only municipalities with known
    /// population and at least one case.
    pub rates: BTreeMap<String, f64>,
    pub stats: RateStats,
    /// Top table, rate-descending, at least `min_cases` each.
    pub top: Vec<MunicipalRow>,
    /// Case records that could not be keyed to a municipality with
    /// known population.
    pub unmatched: u64,
}

/// Count confirmed cases per CVE and join the municipal population.
///
/// Municipalities absent from the population table are dropped from the
/// map and the stats; their records still count nationally.
pub fn municipal_breakdown(
    frame: &CaseFrame,
    municipal: &MunicipalPopulation,
    states: &StatePopulation,
    options: &MunicipalOptions,
) -> Result<MunicipalBreakdown> {
    let confirmed = confirmed_cases(&frame.data)?;
    let national = national_summary(confirmed.height() as u64, frame.year, states)?;

    let entities = numeric_column_i64(&confirmed, columns::ENTIDAD_RES)?;
    let municipalities = numeric_column_i64(&confirmed, columns::MUNICIPIO_RES)?;

    let mut counts: BTreeMap<Cve, u64> = BTreeMap::new();
    let mut unmatched = 0u64;
    for (entity, municipality) in entities.iter().zip(&municipalities) {
        match entity
            .zip(*municipality)
            .and_then(|(e, m)| Cve::from_codes(e, m))
        {
            Some(cve) => *counts.entry(cve).or_default() += 1,
            None => unmatched += 1,
        }
    }

    let mut rates = BTreeMap::new();
    let mut rows = Vec::new();
    for (cve, total) in counts {
        let Some(entry) = municipal.get(&cve) else {
            unmatched += total;
            continue;
        };
        if entry.population == 0 {
            unmatched += total;
            continue;
        }
        let rate = per_100k(total, entry.population);
        if rate == 0.0 {
            continue;
        }
        rates.insert(cve.as_str().to_string(), rate);
        rows.push(MunicipalRow {
            cve: cve.as_str().to_string(),
            municipality: entry.municipality.clone(),
            state: entry.state.clone(),
            total,
            population: entry.population,
            rate,
        });
    }
    debug!(
        year = frame.year,
        mapped = rates.len(),
        unmatched,
        "municipal counts joined"
    );

    let mut sorted: Vec<f64> = rates.values().copied().collect();
    sorted.sort_by(f64::total_cmp);
    let stats = RateStats {
        mean: mean(&sorted).unwrap_or(0.0),
        median: median(&sorted).unwrap_or(0.0),
        std: sample_std(&sorted).unwrap_or(0.0),
        p25: quantile(&sorted, 0.25).unwrap_or(0.0),
        p75: quantile(&sorted, 0.75).unwrap_or(0.0),
        p95: quantile(&sorted, 0.95).unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
    };

    let mut top: Vec<MunicipalRow> = rows
        .into_iter()
        .filter(|row| row.total >= options.min_cases)
        .collect();
    top.sort_by(|a, b| b.rate.total_cmp(&a.rate).then_with(|| a.cve.cmp(&b.cve)));
    top.truncate(options.top);

    Ok(MunicipalBreakdown {
        year: frame.year,
        national,
        rates,
        stats,
        top,
        unmatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{case_frame, municipal_population, state_population};

    fn make_frame() -> CaseFrame {
        let mut records = Vec::new();
        // 120 confirmed cases in Papantla, 2 in Aguascalientes, 1 in a
        // municipality with no population row.
        for _ in 0..120 {
            records.push((30i64, 131i64, 1i64, 30i64, "09/06/2023", 2i64, 1i64, 3i64));
        }
        records.push((1, 1, 1, 40, "11/06/2023", 2, 2, 3));
        records.push((1, 1, 2, 41, "11/06/2023", 2, 2, 3));
        records.push((7, 999, 1, 22, "12/06/2023", 2, 3, 3));
        records.push((7, 999, 1, 22, "12/06/2023", 1, 3, 3)); // probable
        case_frame(2023, &records)
    }

    fn make_population() -> MunicipalPopulation {
        municipal_population(&[
            (30, 131, "Veracruz de Ignacio de la Llave", "Papantla", 160_000),
            (1, 1, "Aguascalientes", "Aguascalientes", 1_000_000),
        ])
    }

    #[test]
    fn rates_drop_unmatched_municipalities() {
        let frame = make_frame();
        let states = state_population(&[(2023, 1_000_000)], 130_000_000);
        let breakdown =
            municipal_breakdown(&frame, &make_population(), &states, &MunicipalOptions::default())
                .unwrap();

        assert_eq!(breakdown.national.total, 123);
        assert_eq!(breakdown.rates.len(), 2);
        assert_eq!(breakdown.unmatched, 1);

        let papantla = breakdown.rates.get("30131").unwrap();
        assert!((papantla - 75.0).abs() < 1e-9); // 120 / 160k * 100k
    }

    #[test]
    fn top_table_applies_case_floor_and_order() {
        let frame = make_frame();
        let states = state_population(&[(2023, 1_000_000)], 130_000_000);
        let breakdown =
            municipal_breakdown(&frame, &make_population(), &states, &MunicipalOptions::default())
                .unwrap();

        // Aguascalientes has 2 cases, below the 100-case floor.
        assert_eq!(breakdown.top.len(), 1);
        assert_eq!(breakdown.top[0].cve, "30131");
        assert_eq!(breakdown.top[0].display_name(), "Papantla, Veracruz");
    }

    #[test]
    fn stats_cover_the_surviving_rates() {
        let frame = make_frame();
        let states = state_population(&[(2023, 1_000_000)], 130_000_000);
        let breakdown =
            municipal_breakdown(&frame, &make_population(), &states, &MunicipalOptions::default())
                .unwrap();

        // Two rates: 0.2 (Aguascalientes) and 75.0 (Papantla).
        assert!((breakdown.stats.max - 75.0).abs() < 1e-9);
        assert!((breakdown.stats.median - 37.6).abs() < 1e-9);
        assert!(breakdown.stats.std > 0.0);
    }

    #[test]
    fn custom_options_change_the_floor() {
        let frame = make_frame();
        let states = state_population(&[(2023, 1_000_000)], 130_000_000);
        let options = MunicipalOptions {
            min_cases: 1,
            top: 10,
        };
        let breakdown =
            municipal_breakdown(&frame, &make_population(), &states, &options).unwrap();
        assert_eq!(breakdown.top.len(), 2);
        assert!(breakdown.top[0].rate >= breakdown.top[1].rate);
    }
}
