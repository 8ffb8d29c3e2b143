//! Incidence by quinquennial age band and sex.

use anyhow::{Context, Result};
use serde::Serialize;

use dengue_assets::AgePopulation;
use dengue_ingest::columns;
use dengue_ingest::{CaseFrame, numeric_column_i64};
use dengue_model::{AgeBand, Sex};

use crate::filters::{confirmed_cases, confirmed_deaths};

/// What the profile counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Measure {
    /// Confirmed infections (`ESTATUS_CASO == 2`).
    Infections,
    /// Committee-confirmed deaths (`DICTAMEN == 1`).
    Deaths,
}

impl Measure {
    pub fn label(self) -> &'static str {
        match self {
            Self::Infections => "Infecciones",
            Self::Deaths => "Defunciones",
        }
    }
}

/// One band: counts, sex-specific populations and rates.
#[derive(Debug, Clone, Serialize)]
pub struct AgeSexRow {
    pub band: String,
    pub female: u64,
    pub male: u64,
    pub female_population: u64,
    pub male_population: u64,
    /// Per 100k women in the band.
    pub female_rate: f64,
    /// Per 100k men in the band.
    pub male_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgeSexProfile {
    pub year: u16,
    pub measure: Measure,
    /// All 18 bands in ascending age order.
    pub bands: Vec<AgeSexRow>,
    pub female_total: u64,
    pub male_total: u64,
}

/// Count records per band and sex and join the quinquennial
/// populations. Records with unknown sex or out-of-range age are
/// skipped; validation reports them separately.
pub fn age_sex_profile(
    frame: &CaseFrame,
    measure: Measure,
    female_population: &AgePopulation,
    male_population: &AgePopulation,
) -> Result<AgeSexProfile> {
    let selected = match measure {
        Measure::Infections => confirmed_cases(&frame.data)?,
        Measure::Deaths => confirmed_deaths(&frame.data)?,
    };

    let sexes = numeric_column_i64(&selected, columns::SEXO)?;
    let ages = numeric_column_i64(&selected, columns::EDAD_ANOS)?;

    let mut female = vec![0u64; AgeBand::COUNT];
    let mut male = vec![0u64; AgeBand::COUNT];
    for (sex_code, age) in sexes.iter().zip(&ages) {
        let Some(sex) = sex_code.and_then(Sex::from_code) else {
            continue;
        };
        let Some(band) = age
            .and_then(|a| u32::try_from(a).ok())
            .and_then(AgeBand::from_age)
        else {
            continue;
        };
        match sex {
            Sex::Female => female[band.index()] += 1,
            Sex::Male => male[band.index()] += 1,
        }
    }

    let female_pop = female_population
        .for_year(frame.year, std::path::Path::new("quinquenal_mujeres.csv"))
        .with_context(|| format!("female quinquennial population for {}", frame.year))?;
    let male_pop = male_population
        .for_year(frame.year, std::path::Path::new("quinquenal_hombres.csv"))
        .with_context(|| format!("male quinquennial population for {}", frame.year))?;

    let bands = AgeBand::all()
        .map(|band| {
            let idx = band.index();
            AgeSexRow {
                band: band.label(),
                female: female[idx],
                male: male[idx],
                female_population: female_pop[idx],
                male_population: male_pop[idx],
                female_rate: band_rate(female[idx], female_pop[idx]),
                male_rate: band_rate(male[idx], male_pop[idx]),
            }
        })
        .collect();

    Ok(AgeSexProfile {
        year: frame.year,
        measure,
        bands,
        female_total: female.iter().sum(),
        male_total: male.iter().sum(),
    })
}

fn band_rate(count: u64, population: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }
    count as f64 / population as f64 * 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{age_population, case_frame};

    #[test]
    fn infections_bin_by_age_and_sex() {
        let frame = case_frame(
            2023,
            &[
                (14, 39, 1, 3, "01/06/2023", 2, 1, 3),   // F 0-4
                (14, 39, 1, 4, "01/06/2023", 2, 1, 3),   // F 0-4
                (14, 39, 2, 7, "01/06/2023", 2, 1, 3),   // M 5-9
                (14, 39, 2, 90, "01/06/2023", 2, 1, 3),  // M ≥85
                (14, 39, 2, 130, "01/06/2023", 2, 1, 3), // implausible, skipped
                (14, 39, 9, 30, "01/06/2023", 2, 1, 3),  // unknown sex, skipped
                (14, 39, 1, 10, "01/06/2023", 3, 1, 3),  // discarded, skipped
            ],
        );
        let female_pop = age_population(2023, 100_000);
        let male_pop = age_population(2023, 200_000);

        let profile =
            age_sex_profile(&frame, Measure::Infections, &female_pop, &male_pop).unwrap();
        assert_eq!(profile.bands.len(), 18);
        assert_eq!(profile.female_total, 2);
        assert_eq!(profile.male_total, 2);

        let first = &profile.bands[0];
        assert_eq!(first.band, "0-4");
        assert_eq!(first.female, 2);
        assert_eq!(first.male, 0);
        assert!((first.female_rate - 2.0).abs() < 1e-12); // 2 / 100k * 100k

        let last = profile.bands.last().unwrap();
        assert_eq!(last.band, "≥85");
        assert_eq!(last.male, 1);
    }

    #[test]
    fn deaths_use_the_dictamen_filter() {
        let frame = case_frame(
            2023,
            &[
                (14, 39, 1, 30, "01/06/2023", 2, 1, 1), // confirmed death
                (14, 39, 2, 60, "01/06/2023", 2, 1, 2), // under study
                (14, 39, 2, 62, "01/06/2023", 1, 1, 1), // death, probable case
            ],
        );
        let female_pop = age_population(2023, 100_000);
        let male_pop = age_population(2023, 200_000);

        let profile = age_sex_profile(&frame, Measure::Deaths, &female_pop, &male_pop).unwrap();
        assert_eq!(profile.female_total + profile.male_total, 2);
        assert_eq!(profile.bands[6].female, 1); // 30-34
    }
}
