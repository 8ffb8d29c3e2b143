//! Fixture builders for the view tests.

use std::path::PathBuf;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

use dengue_assets::{AgePopulation, MunicipalPopulation, StatePopulation};
use dengue_ingest::CaseFrame;
use dengue_model::{AgeBand, EntityId, NATIONAL_NAME};

/// A case record: (entity, municipality, sex, age, onset, status, pcr,
/// dictamen). Mirrors the canonical column order.
pub type Record<'a> = (i64, i64, i64, i64, &'a str, i64, i64, i64);

pub fn case_frame(year: u16, records: &[Record<'_>]) -> CaseFrame {
    let entity: Vec<i64> = records.iter().map(|r| r.0).collect();
    let municipality: Vec<i64> = records.iter().map(|r| r.1).collect();
    let sex: Vec<i64> = records.iter().map(|r| r.2).collect();
    let age: Vec<i64> = records.iter().map(|r| r.3).collect();
    let onset: Vec<&str> = records.iter().map(|r| r.4).collect();
    let status: Vec<i64> = records.iter().map(|r| r.5).collect();
    let pcr: Vec<i64> = records.iter().map(|r| r.6).collect();
    let dictamen: Vec<i64> = records.iter().map(|r| r.7).collect();

    let data = DataFrame::new(vec![
        Series::new("ENTIDAD_RES".into(), entity).into_column(),
        Series::new("MUNICIPIO_RES".into(), municipality).into_column(),
        Series::new("SEXO".into(), sex).into_column(),
        Series::new("EDAD_ANOS".into(), age).into_column(),
        Series::new("FECHA_SIGN_SINTOMAS".into(), onset).into_column(),
        Series::new("ESTATUS_CASO".into(), status).into_column(),
        Series::new("RESULTADO_PCR".into(), pcr).into_column(),
        Series::new("DICTAMEN".into(), dictamen).into_column(),
    ])
    .expect("fixture frame");

    CaseFrame {
        year,
        data,
        source: PathBuf::from(format!("{year}.csv")),
        fingerprint: "0123456789abcdef".to_string(),
    }
}

/// A state table where every state has `per_state` inhabitants.
pub fn state_population(years: &[(u16, u64)], national: u64) -> StatePopulation {
    let dir = tempfile::tempdir().expect("tempdir");
    let header: Vec<String> = years.iter().map(|(year, _)| year.to_string()).collect();
    let mut lines = vec![format!("entidad,{}", header.join(","))];
    let national_row: Vec<String> = years.iter().map(|_| national.to_string()).collect();
    lines.push(format!("{NATIONAL_NAME},{}", national_row.join(",")));
    for entity in EntityId::states() {
        let row: Vec<String> = years
            .iter()
            .map(|(_, per_state)| per_state.to_string())
            .collect();
        lines.push(format!("{},{}", entity.name().unwrap(), row.join(",")));
    }
    let path = dir.path().join("entidades.csv");
    std::fs::write(&path, lines.join("\n")).expect("write fixture");
    StatePopulation::load(&path).expect("load fixture")
}

/// A quinquennial table where band `i` has `base + i` inhabitants.
pub fn age_population(year: u16, base: u64) -> AgePopulation {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut lines = vec![format!("grupo,{year}")];
    for band in AgeBand::all() {
        lines.push(format!("{},{}", band.label(), base + band.index() as u64));
    }
    let path = dir.path().join("quinquenal.csv");
    std::fs::write(&path, lines.join("\n")).expect("write fixture");
    AgePopulation::load(&path).expect("load fixture")
}

/// Municipal table from (entity, municipality, state, name, population).
pub fn municipal_population(entries: &[(i64, i64, &str, &str, u64)]) -> MunicipalPopulation {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut lines = vec!["clave_entidad,clave_municipio,entidad,municipio,poblacion".to_string()];
    for (entity, municipality, state, name, population) in entries {
        lines.push(format!("{entity},{municipality},{state},{name},{population}"));
    }
    let path = dir.path().join("municipios.csv");
    std::fs::write(&path, lines.join("\n")).expect("write fixture");
    MunicipalPopulation::load(&path).expect("load fixture")
}
