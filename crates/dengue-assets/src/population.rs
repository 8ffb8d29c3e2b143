//! CONAPO population table loaders.
//!
//! All three tables share the same layout: a label column followed by
//! one column per projection year. State rows carry the official CONAPO
//! names; the loader folds the four long-form names to the catalog names
//! via [`dengue_model::canonical_name`], so lookups always use catalog
//! naming.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use dengue_model::{AgeBand, Cve, NATIONAL_NAME, canonical_name};

use crate::error::{AssetsError, Result};

/// Mid-year population per state and year, plus the national row.
#[derive(Debug, Clone)]
pub struct StatePopulation {
    years: Vec<u16>,
    national: Vec<u64>,
    by_state: BTreeMap<String, Vec<u64>>,
}

impl StatePopulation {
    pub fn load(path: &Path) -> Result<Self> {
        let (years, rows) = read_year_table(path)?;
        let mut national = Vec::new();
        let mut by_state = BTreeMap::new();
        for (label, counts) in rows {
            if label == NATIONAL_NAME {
                national = counts;
            } else {
                by_state.insert(canonical_name(&label).to_string(), counts);
            }
        }
        if national.is_empty() {
            return Err(AssetsError::invalid(
                path,
                format!("missing national row '{NATIONAL_NAME}'"),
            ));
        }
        if by_state.len() != 32 {
            return Err(AssetsError::invalid(
                path,
                format!("expected 32 state rows, found {}", by_state.len()),
            ));
        }
        Ok(Self {
            years,
            national,
            by_state,
        })
    }

    pub fn years(&self) -> &[u16] {
        &self.years
    }

    pub fn national(&self, year: u16) -> Option<u64> {
        let idx = self.year_index(year)?;
        self.national.get(idx).copied()
    }

    /// Population of a state by catalog name (aliases accepted).
    pub fn state(&self, name: &str, year: u16) -> Option<u64> {
        let idx = self.year_index(year)?;
        self.by_state
            .get(canonical_name(name))
            .and_then(|counts| counts.get(idx))
            .copied()
    }

    fn year_index(&self, year: u16) -> Option<usize> {
        self.years.iter().position(|y| *y == year)
    }
}

/// Quinquennial population for one sex, rows keyed by age-band label.
#[derive(Debug, Clone)]
pub struct AgePopulation {
    years: Vec<u16>,
    /// Indexed by `AgeBand::index()`.
    bands: Vec<Vec<u64>>,
}

impl AgePopulation {
    pub fn load(path: &Path) -> Result<Self> {
        let (years, rows) = read_year_table(path)?;
        let mut bands: Vec<Option<Vec<u64>>> = vec![None; AgeBand::COUNT];
        for (label, counts) in rows {
            let Some(band) = AgeBand::from_label(&label) else {
                return Err(AssetsError::invalid(
                    path,
                    format!("unknown age band label '{label}'"),
                ));
            };
            bands[band.index()] = Some(counts);
        }
        let bands: Vec<Vec<u64>> = bands
            .into_iter()
            .enumerate()
            .map(|(idx, counts)| {
                counts.ok_or_else(|| {
                    let label = AgeBand::all().nth(idx).map(|b| b.label()).unwrap_or_default();
                    AssetsError::invalid(path, format!("missing age band row '{label}'"))
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self { years, bands })
    }

    pub fn band(&self, band: AgeBand, year: u16) -> Option<u64> {
        let idx = self.years.iter().position(|y| *y == year)?;
        self.bands.get(band.index())?.get(idx).copied()
    }

    /// All 18 band populations for a year, in band order.
    pub fn for_year(&self, year: u16, path_hint: &Path) -> Result<Vec<u64>> {
        let idx = self
            .years
            .iter()
            .position(|y| *y == year)
            .ok_or(AssetsError::YearNotCovered {
                year,
                path: path_hint.to_path_buf(),
            })?;
        Ok(self.bands.iter().map(|counts| counts[idx]).collect())
    }
}

/// One municipal population entry.
#[derive(Debug, Clone)]
pub struct MunicipalEntry {
    pub municipality: String,
    pub state: String,
    pub population: u64,
}

/// Municipal population keyed by concatenated CVE.
#[derive(Debug, Clone, Default)]
pub struct MunicipalPopulation {
    by_cve: BTreeMap<Cve, MunicipalEntry>,
}

impl MunicipalPopulation {
    /// Load the optional municipal table. Returns
    /// [`AssetsError::Missing`] when the file is not present.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AssetsError::Missing {
                path: path.to_path_buf(),
            });
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| AssetsError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;
        let headers = reader
            .headers()
            .map_err(|e| AssetsError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?
            .clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
                .ok_or_else(|| AssetsError::invalid(path, format!("missing column '{name}'")))
        };
        let entity_idx = column("clave_entidad")?;
        let municipality_idx = column("clave_municipio")?;
        let state_name_idx = column("entidad")?;
        let name_idx = column("municipio")?;
        let population_idx = column("poblacion")?;

        let mut by_cve = BTreeMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| AssetsError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim();
            let (Ok(entity), Ok(municipality)) = (
                field(entity_idx).parse::<i64>(),
                field(municipality_idx).parse::<i64>(),
            ) else {
                continue;
            };
            let Some(cve) = Cve::from_codes(entity, municipality) else {
                continue;
            };
            let Ok(population) = field(population_idx).parse::<u64>() else {
                continue;
            };
            by_cve.insert(
                cve,
                MunicipalEntry {
                    municipality: field(name_idx).to_string(),
                    state: canonical_name(field(state_name_idx)).to_string(),
                    population,
                },
            );
        }
        Ok(Self { by_cve })
    }

    pub fn get(&self, cve: &Cve) -> Option<&MunicipalEntry> {
        self.by_cve.get(cve)
    }

    pub fn len(&self) -> usize {
        self.by_cve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cve.is_empty()
    }
}

/// Read a label-plus-year-columns table shared by the CONAPO files.
fn read_year_table(path: &Path) -> Result<(Vec<u16>, Vec<(String, Vec<u64>)>)> {
    if !path.is_file() {
        return Err(AssetsError::Missing {
            path: path.to_path_buf(),
        });
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| AssetsError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
    let headers = reader
        .headers()
        .map_err(|e| AssetsError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();

    let mut years = Vec::new();
    for header in headers.iter().skip(1) {
        let year = header.trim().parse::<u16>().map_err(|_| {
            AssetsError::invalid(path, format!("year column expected, found '{header}'"))
        })?;
        years.push(year);
    }
    if years.is_empty() {
        return Err(AssetsError::invalid(path, "no year columns"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AssetsError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let label = record.get(0).unwrap_or("").trim().to_string();
        if label.is_empty() {
            continue;
        }
        let mut counts = Vec::with_capacity(years.len());
        for value in record.iter().skip(1) {
            let count = value.trim().parse::<u64>().map_err(|_| {
                AssetsError::invalid(path, format!("bad population value '{value}' in '{label}'"))
            })?;
            counts.push(count);
        }
        if counts.len() != years.len() {
            return Err(AssetsError::invalid(
                path,
                format!("row '{label}' has {} values for {} years", counts.len(), years.len()),
            ));
        }
        rows.push((label, counts));
    }
    Ok((years, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dengue_model::EntityId;

    fn write_state_table(dir: &Path) -> std::path::PathBuf {
        let mut lines = vec!["entidad,2022,2023".to_string()];
        lines.push(format!("{NATIONAL_NAME},130000000,131000000"));
        for entity in EntityId::states() {
            // CONAPO long names for the aliased states
            let name = match entity.code() {
                5 => "Coahuila de Zaragoza",
                15 => "México",
                16 => "Michoacán de Ocampo",
                30 => "Veracruz de Ignacio de la Llave",
                _ => entity.name().unwrap(),
            };
            lines.push(format!("{name},{},{}", 1000 + u64::from(entity.code()), 2000));
        }
        let path = dir.join("entidades.csv");
        std::fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    #[test]
    fn state_population_applies_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_state_table(dir.path());
        let population = StatePopulation::load(&path).unwrap();

        assert_eq!(population.national(2022), Some(130_000_000));
        assert_eq!(population.state("Veracruz", 2022), Some(1030));
        assert_eq!(
            population.state("Veracruz de Ignacio de la Llave", 2022),
            Some(1030)
        );
        assert_eq!(population.state("Estado de México", 2022), Some(1015));
        assert_eq!(population.state("Jalisco", 2024), None);
    }

    #[test]
    fn state_population_requires_national_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entidades.csv");
        std::fs::write(&path, "entidad,2023\nJalisco,100\n").unwrap();
        assert!(StatePopulation::load(&path).is_err());
    }

    #[test]
    fn age_population_loads_all_bands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quinquenal.csv");
        let mut lines = vec!["grupo,2023".to_string()];
        for band in AgeBand::all() {
            lines.push(format!("{},{}", band.label(), 100 + band.index()));
        }
        std::fs::write(&path, lines.join("\n")).unwrap();

        let population = AgePopulation::load(&path).unwrap();
        let counts = population.for_year(2023, &path).unwrap();
        assert_eq!(counts.len(), AgeBand::COUNT);
        assert_eq!(counts[0], 100);
        assert_eq!(counts[17], 117);
        assert_eq!(
            population.band(AgeBand::from_age(90).unwrap(), 2023),
            Some(117)
        );
        assert!(matches!(
            population.for_year(2030, &path),
            Err(AssetsError::YearNotCovered { year: 2030, .. })
        ));
    }

    #[test]
    fn age_population_rejects_incomplete_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quinquenal.csv");
        std::fs::write(&path, "grupo,2023\n0-4,100\n").unwrap();
        assert!(AgePopulation::load(&path).is_err());
    }

    #[test]
    fn municipal_population_joins_by_cve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("municipios.csv");
        std::fs::write(
            &path,
            "clave_entidad,clave_municipio,entidad,municipio,poblacion\n\
             1,1,Aguascalientes,Aguascalientes,1002119\n\
             30,131,Veracruz de Ignacio de la Llave,Papantla,161888\n",
        )
        .unwrap();

        let population = MunicipalPopulation::load(&path).unwrap();
        assert_eq!(population.len(), 2);
        let entry = population
            .get(&Cve::from_codes(30, 131).unwrap())
            .unwrap();
        assert_eq!(entry.municipality, "Papantla");
        assert_eq!(entry.state, "Veracruz");
        assert_eq!(entry.population, 161_888);
    }

    #[test]
    fn municipal_population_missing_is_typed() {
        let dir = tempfile::tempdir().unwrap();
        let result = MunicipalPopulation::load(&dir.path().join("municipios.csv"));
        assert!(matches!(result, Err(ref e) if e.is_missing()));
    }
}
