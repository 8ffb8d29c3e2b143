//! Year-file discovery.
//!
//! The SSA open-data portal publishes one case file per year. A data
//! directory is expected to hold them as `<year>.csv` (`2023.csv`);
//! anything else in the directory is ignored.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// A discovered case file for one reporting year.
#[derive(Debug, Clone)]
pub struct YearFile {
    pub year: u16,
    pub path: PathBuf,
}

/// Years accepted as file stems. The portal started publishing case-level
/// files well after 2000; the upper bound guards against stray numerics.
const YEAR_RANGE: std::ops::RangeInclusive<u16> = 2000..=2100;

/// Lists the year files in a directory, sorted by year ascending.
pub fn find_year_files(dir: &Path) -> Result<Vec<YearFile>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            continue;
        }

        let Some(year) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.trim().parse::<u16>().ok())
            .filter(|year| YEAR_RANGE.contains(year))
        else {
            continue;
        };

        files.push(YearFile { year, path });
    }

    files.sort_by_key(|file| file.year);
    Ok(files)
}

/// Resolve the file for a requested year, defaulting to the latest one.
pub fn resolve_year_file(dir: &Path, year: Option<u16>) -> Result<YearFile> {
    let files = find_year_files(dir)?;
    if files.is_empty() {
        return Err(IngestError::NoYearFiles {
            path: dir.to_path_buf(),
        });
    }
    match year {
        Some(wanted) => files
            .into_iter()
            .find(|file| file.year == wanted)
            .ok_or(IngestError::YearNotFound {
                year: wanted,
                path: dir.to_path_buf(),
            }),
        None => Ok(files.into_iter().next_back().expect("non-empty")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_data_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in &["2021.csv", "2023.csv", "2022.CSV", "notas.csv", "README.md"] {
            std::fs::write(dir.path().join(name), "SEXO\n1\n").unwrap();
        }
        dir
    }

    #[test]
    fn finds_and_sorts_year_files() {
        let dir = create_data_dir();
        let files = find_year_files(dir.path()).unwrap();
        let years: Vec<u16> = files.iter().map(|f| f.year).collect();
        assert_eq!(years, vec![2021, 2022, 2023]);
    }

    #[test]
    fn missing_directory_errors() {
        let result = find_year_files(Path::new("/nonexistent/dengue-data"));
        assert!(matches!(
            result,
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn resolves_latest_by_default() {
        let dir = create_data_dir();
        let file = resolve_year_file(dir.path(), None).unwrap();
        assert_eq!(file.year, 2023);
    }

    #[test]
    fn resolves_requested_year() {
        let dir = create_data_dir();
        let file = resolve_year_file(dir.path(), Some(2021)).unwrap();
        assert_eq!(file.year, 2021);
        assert!(matches!(
            resolve_year_file(dir.path(), Some(2019)),
            Err(IngestError::YearNotFound { year: 2019, .. })
        ));
    }
}
