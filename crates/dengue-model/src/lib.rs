pub mod age;
pub mod codes;
pub mod cve;
pub mod entity;
pub mod quality;

pub use age::AgeBand;
pub use codes::{CaseStatus, DeathVerdict, Serotype, Sex};
pub use cve::Cve;
pub use entity::{EntityId, NATIONAL_NAME, canonical_name};
pub use quality::{IssueSeverity, QualityIssue, QualityReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_report_counts() {
        let report = QualityReport {
            year: 2023,
            source: "2023.csv".to_string(),
            rows: 10,
            issues: vec![
                QualityIssue {
                    code: "REQ001".to_string(),
                    message: "missing required column ENTIDAD_RES".to_string(),
                    severity: IssueSeverity::Error,
                    column: Some("ENTIDAD_RES".to_string()),
                    count: None,
                    samples: vec![],
                },
                QualityIssue {
                    code: "COD001".to_string(),
                    message: "unknown SEXO codes".to_string(),
                    severity: IssueSeverity::Warning,
                    column: Some("SEXO".to_string()),
                    count: Some(2),
                    samples: vec!["9".to_string()],
                },
            ],
        };
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn quality_report_serializes() {
        let report = QualityReport {
            year: 2023,
            source: "2023.csv".to_string(),
            rows: 0,
            issues: vec![],
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: QualityReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(round.year, 2023);
        assert!(!round.has_errors());
    }
}
