//! CSV reading into case frames.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::frame::CaseFrame;

/// Read a year file into a [`CaseFrame`].
///
/// Headers are normalized (BOM stripped, uppercased) after the read so
/// downstream code can rely on the canonical column constants. Schema
/// inference is left to Polars; code columns may come back as integers
/// or strings depending on the year, which is why all consumers go
/// through the `AnyValue` helpers.
pub fn read_case_frame(path: &Path, year: u16) -> Result<CaseFrame> {
    let fingerprint = file_fingerprint(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("read CSV: {}", path.display()))?;

    normalize_headers(&mut df)?;

    debug!(
        year,
        source = %path.display(),
        rows = df.height(),
        columns = df.width(),
        fingerprint = %fingerprint,
        "case file read"
    );

    Ok(CaseFrame {
        year,
        data: df,
        source: path.to_path_buf(),
        fingerprint,
    })
}

/// Uppercase headers and strip BOM/whitespace so files saved through
/// spreadsheet tools still match the canonical column names.
fn normalize_headers(df: &mut DataFrame) -> Result<()> {
    let names = df.get_column_names_owned();
    for name in names {
        let normalized = normalize_header(name.as_str());
        if normalized != name.as_str() {
            df.rename(name.as_str(), normalized.into())
                .with_context(|| format!("rename column {name}"))?;
        }
    }
    Ok(())
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_uppercase()
}

/// SHA-256 of the file contents, truncated to 16 hex chars.
fn file_fingerprint(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read for fingerprint: {}", path.display()))?;
    let digest = Sha256::digest(&bytes);
    let mut hash = hex::encode(digest);
    hash.truncate(16);
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns;
    use crate::polars_utils::numeric_column_i64;

    #[test]
    fn reads_and_normalizes_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2023.csv");
        std::fs::write(
            &path,
            "\u{feff}entidad_res,Sexo,ESTATUS_CASO\n14,1,2\n9,2,1\n",
        )
        .unwrap();

        let frame = read_case_frame(&path, 2023).unwrap();
        assert_eq!(frame.record_count(), 2);
        assert_eq!(
            numeric_column_i64(&frame.data, columns::ENTIDAD_RES).unwrap(),
            vec![Some(14), Some(9)]
        );
        assert_eq!(
            numeric_column_i64(&frame.data, columns::SEXO).unwrap(),
            vec![Some(1), Some(2)]
        );
    }

    #[test]
    fn fingerprint_is_stable_and_content_bound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2023.csv");
        std::fs::write(&path, "SEXO\n1\n").unwrap();

        let first = read_case_frame(&path, 2023).unwrap();
        let second = read_case_frame(&path, 2023).unwrap();
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.fingerprint.len(), 16);

        std::fs::write(&path, "SEXO\n2\n").unwrap();
        let changed = read_case_frame(&path, 2023).unwrap();
        assert_ne!(first.fingerprint, changed.fingerprint);
    }
}
