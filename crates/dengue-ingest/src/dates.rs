//! Onset date parsing.

use chrono::NaiveDate;

/// Parse a date cell from a case file.
///
/// The portal writes dates day-first (`09/08/2023`); exports re-saved
/// through other tools occasionally carry ISO dates, so that format is
/// accepted as a fallback.
pub fn parse_case_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn day_first_is_the_primary_format() {
        // 9 August, not 8 September
        let date = parse_case_date("09/08/2023").unwrap();
        assert_eq!((date.day(), date.month(), date.year()), (9, 8, 2023));
    }

    #[test]
    fn iso_fallback() {
        let date = parse_case_date("2023-08-09").unwrap();
        assert_eq!((date.day(), date.month()), (9, 8));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_case_date(""), None);
        assert_eq!(parse_case_date("  "), None);
        assert_eq!(parse_case_date("31/02/2023"), None);
        assert_eq!(parse_case_date("sin fecha"), None);
    }
}
