//! Confirmed cases by entity of residence.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use dengue_assets::StatePopulation;
use dengue_ingest::columns;
use dengue_ingest::{CaseFrame, numeric_column_i64};
use dengue_model::{EntityId, Sex};

use crate::filters::confirmed_cases;

/// National totals over all confirmed records, before any residence
/// filtering. Non-resident records (codes 97-99) count here even though
/// they are absent from the state rows.
#[derive(Debug, Clone, Serialize)]
pub struct NationalSummary {
    pub year: u16,
    pub total: u64,
    pub population: u64,
    /// Confirmed cases per 100k inhabitants.
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateRow {
    /// INEGI entity code, 1-32.
    pub entity: u8,
    pub name: String,
    pub female: u64,
    pub male: u64,
    /// All confirmed residents, unknown-sex records included.
    pub total: u64,
    pub population: u64,
    pub rate: f64,
}

/// The state view: national summary plus all 32 entities sorted by
/// rate descending.
#[derive(Debug, Clone, Serialize)]
pub struct StateBreakdown {
    pub year: u16,
    pub national: NationalSummary,
    pub rows: Vec<StateRow>,
}

pub(crate) fn national_summary(
    confirmed_total: u64,
    year: u16,
    population: &StatePopulation,
) -> Result<NationalSummary> {
    let national_population = population
        .national(year)
        .with_context(|| format!("national population not available for {year}"))?;
    Ok(NationalSummary {
        year,
        total: confirmed_total,
        population: national_population,
        rate: per_100k(confirmed_total, national_population),
    })
}

pub(crate) fn per_100k(total: u64, population: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }
    total as f64 / population as f64 * 100_000.0
}

/// Count confirmed cases per entity and sex and join the state
/// population for the report year.
pub fn state_breakdown(frame: &CaseFrame, population: &StatePopulation) -> Result<StateBreakdown> {
    let confirmed = confirmed_cases(&frame.data)?;
    let national = national_summary(confirmed.height() as u64, frame.year, population)?;

    let entities = numeric_column_i64(&confirmed, columns::ENTIDAD_RES)?;
    let sexes = numeric_column_i64(&confirmed, columns::SEXO)?;

    // (female, male, total) per entity; unknown sex reaches the total
    // column only.
    let mut counts: BTreeMap<u8, (u64, u64, u64)> = BTreeMap::new();
    let mut non_resident = 0u64;
    for (entity_code, sex_code) in entities.iter().zip(&sexes) {
        let Some(entity) = entity_code.and_then(EntityId::from_code) else {
            non_resident += 1;
            continue;
        };
        if !entity.is_resident() {
            non_resident += 1;
            continue;
        }
        let entry = counts.entry(entity.code()).or_default();
        match sex_code.and_then(Sex::from_code) {
            Some(Sex::Female) => entry.0 += 1,
            Some(Sex::Male) => entry.1 += 1,
            None => {}
        }
        entry.2 += 1;
    }
    debug!(
        year = frame.year,
        confirmed = national.total,
        non_resident,
        "state counts accumulated"
    );

    let mut rows = Vec::with_capacity(32);
    for entity in EntityId::states() {
        let name = entity.name().unwrap_or_default().to_string();
        let state_population = population
            .state(&name, frame.year)
            .with_context(|| format!("population for {name} not available for {}", frame.year))?;
        let (female, male, total) = counts.get(&entity.code()).copied().unwrap_or_default();
        rows.push(StateRow {
            entity: entity.code(),
            rate: per_100k(total, state_population),
            name,
            female,
            male,
            total,
            population: state_population,
        });
    }
    rows.sort_by(|a, b| b.rate.total_cmp(&a.rate).then_with(|| a.name.cmp(&b.name)));

    Ok(StateBreakdown {
        year: frame.year,
        national,
        rows,
    })
}
