//! Serotype split of confirmed cases and deaths.

use anyhow::Result;
use polars::prelude::DataFrame;
use serde::Serialize;

use dengue_ingest::columns;
use dengue_ingest::{CaseFrame, numeric_column_i64};
use dengue_model::Serotype;

use crate::filters::{confirmed_cases, confirmed_deaths};

#[derive(Debug, Clone, Serialize)]
pub struct SerotypeCount {
    /// Dataset code (1-5).
    pub code: i64,
    /// Display label (`DENV-1` .. `Sin serotipo aislado`).
    pub label: String,
    pub total: u64,
    /// Share of records with an identified PCR result.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SerotypeSplit {
    pub year: u16,
    /// Confirmed cases by serotype, code order, observed serotypes only.
    pub cases: Vec<SerotypeCount>,
    pub case_total: u64,
    /// Confirmed deaths by serotype.
    pub deaths: Vec<SerotypeCount>,
    pub death_total: u64,
}

/// Group confirmed cases and deaths by PCR result.
///
/// Records with a null or unknown `RESULTADO_PCR` are excluded from
/// both numerator and denominator, so percentages describe typed
/// results only.
pub fn serotype_split(frame: &CaseFrame) -> Result<SerotypeSplit> {
    let cases = count_serotypes(&confirmed_cases(&frame.data)?)?;
    let deaths = count_serotypes(&confirmed_deaths(&frame.data)?)?;
    let case_total = cases.iter().map(|c| c.total).sum();
    let death_total = deaths.iter().map(|c| c.total).sum();
    Ok(SerotypeSplit {
        year: frame.year,
        cases,
        case_total,
        deaths,
        death_total,
    })
}

fn count_serotypes(df: &DataFrame) -> Result<Vec<SerotypeCount>> {
    let results = numeric_column_i64(df, columns::RESULTADO_PCR)?;
    let mut counts = [0u64; Serotype::ALL.len()];
    for code in results.into_iter().flatten() {
        if let Some(serotype) = Serotype::from_code(code) {
            counts[(serotype.code() - 1) as usize] += 1;
        }
    }
    let denominator: u64 = counts.iter().sum();
    let split = Serotype::ALL
        .iter()
        .filter(|serotype| counts[(serotype.code() - 1) as usize] > 0)
        .map(|serotype| {
            let total = counts[(serotype.code() - 1) as usize];
            SerotypeCount {
                code: serotype.code(),
                label: serotype.label().to_string(),
                total,
                percent: total as f64 / denominator as f64 * 100.0,
            }
        })
        .collect();
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::case_frame;

    #[test]
    fn percentages_exclude_untyped_results() {
        let frame = case_frame(
            2023,
            &[
                (14, 39, 1, 30, "01/06/2023", 2, 1, 3),
                (14, 39, 1, 31, "01/06/2023", 2, 1, 3),
                (14, 39, 2, 32, "01/06/2023", 2, 2, 3),
                (14, 39, 2, 33, "01/06/2023", 2, 5, 3),
                (14, 39, 2, 34, "01/06/2023", 2, 0, 3), // unknown code, dropped
                (14, 39, 2, 35, "01/06/2023", 1, 1, 3), // probable, dropped
            ],
        );
        let split = serotype_split(&frame).unwrap();

        assert_eq!(split.case_total, 4);
        assert_eq!(split.cases.len(), 3);
        assert_eq!(split.cases[0].label, "DENV-1");
        assert!((split.cases[0].percent - 50.0).abs() < 1e-12);
        assert!((split.cases[1].percent - 25.0).abs() < 1e-12);
        assert_eq!(split.cases[2].label, "Sin serotipo aislado");
    }

    #[test]
    fn deaths_split_separately() {
        let frame = case_frame(
            2023,
            &[
                (14, 39, 1, 30, "01/06/2023", 2, 1, 1),
                (14, 39, 1, 55, "01/06/2023", 2, 3, 1),
                (14, 39, 2, 32, "01/06/2023", 2, 2, 3),
            ],
        );
        let split = serotype_split(&frame).unwrap();
        assert_eq!(split.death_total, 2);
        assert_eq!(split.deaths.len(), 2);
        assert_eq!(split.deaths[1].label, "DENV-3");
        assert!((split.deaths[0].percent - 50.0).abs() < 1e-12);
    }

    #[test]
    fn empty_groups_are_empty_not_nan() {
        let frame = case_frame(2023, &[(14, 39, 1, 30, "01/06/2023", 1, 1, 3)]);
        let split = serotype_split(&frame).unwrap();
        assert!(split.cases.is_empty());
        assert_eq!(split.case_total, 0);
    }
}
