//! Record filters shared by every view.

use anyhow::Result;
use polars::prelude::DataFrame;

use dengue_ingest::columns;
use dengue_ingest::{filter_rows, numeric_column_i64};
use dengue_model::{CaseStatus, DeathVerdict};

/// Rows with `ESTATUS_CASO == 2`. Every case aggregation starts here.
pub fn confirmed_cases(df: &DataFrame) -> Result<DataFrame> {
    let status = numeric_column_i64(df, columns::ESTATUS_CASO)?;
    let keep: Vec<bool> = status
        .iter()
        .map(|code| {
            code.and_then(CaseStatus::from_code)
                .is_some_and(CaseStatus::is_confirmed)
        })
        .collect();
    let mut out = df.clone();
    filter_rows(&mut out, &keep)?;
    Ok(out)
}

/// Rows with `DICTAMEN == 1`, the committee-confirmed dengue deaths.
pub fn confirmed_deaths(df: &DataFrame) -> Result<DataFrame> {
    let verdict = numeric_column_i64(df, columns::DICTAMEN)?;
    let keep: Vec<bool> = verdict
        .iter()
        .map(|code| {
            code.and_then(DeathVerdict::from_code)
                .is_some_and(DeathVerdict::is_confirmed_death)
        })
        .collect();
    let mut out = df.clone();
    filter_rows(&mut out, &keep)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("ESTATUS_CASO".into(), vec![1i64, 2, 2, 3]).into_column(),
            Series::new("DICTAMEN".into(), vec![3i64, 1, 2, 1]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn confirmed_keeps_status_two_only() {
        let confirmed = confirmed_cases(&frame()).unwrap();
        assert_eq!(confirmed.height(), 2);
    }

    #[test]
    fn deaths_keep_verdict_one_regardless_of_status() {
        let deaths = confirmed_deaths(&frame()).unwrap();
        assert_eq!(deaths.height(), 2);
    }
}
