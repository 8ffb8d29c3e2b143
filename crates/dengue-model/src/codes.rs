//! Coded variables from the SSA dengue dataset dictionary.
//!
//! Every enum parses from the integer code the open-data files carry.
//! Unknown codes return `None`; the validation layer counts them, the
//! analysis layer skips them.

/// `SEXO`: 1 = MUJER, 2 = HOMBRE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Female),
            2 => Some(Self::Male),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Female => 1,
            Self::Male => 2,
        }
    }

    /// Plural label used in chart legends and tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Female => "Mujeres",
            Self::Male => "Hombres",
        }
    }
}

/// `ESTATUS_CASO`: epidemiological case classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    /// 1 - probable, awaiting confirmation.
    Probable,
    /// 2 - laboratory or association confirmed. Only these records feed
    /// the report aggregations.
    Confirmed,
    /// 3 - discarded.
    Discarded,
}

impl CaseStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Probable),
            2 => Some(Self::Confirmed),
            3 => Some(Self::Discarded),
            _ => None,
        }
    }

    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// `RESULTADO_PCR`: serotype identified by RT-PCR.
///
/// Codes 1-4 map to DENV-1 through DENV-4; code 5 marks a confirmed case
/// where no serotype could be isolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Serotype {
    Denv1,
    Denv2,
    Denv3,
    Denv4,
    Untyped,
}

impl Serotype {
    /// All serotypes in dataset code order.
    pub const ALL: [Serotype; 5] = [
        Serotype::Denv1,
        Serotype::Denv2,
        Serotype::Denv3,
        Serotype::Denv4,
        Serotype::Untyped,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Denv1),
            2 => Some(Self::Denv2),
            3 => Some(Self::Denv3),
            4 => Some(Self::Denv4),
            5 => Some(Self::Untyped),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Denv1 => 1,
            Self::Denv2 => 2,
            Self::Denv3 => 3,
            Self::Denv4 => 4,
            Self::Untyped => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Denv1 => "DENV-1",
            Self::Denv2 => "DENV-2",
            Self::Denv3 => "DENV-3",
            Self::Denv4 => "DENV-4",
            Self::Untyped => "Sin serotipo aislado",
        }
    }
}

/// `DICTAMEN`: mortality committee verdict for deceased cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathVerdict {
    /// 1 - death confirmed as caused by dengue.
    ConfirmedDeath,
    /// 2 - under study.
    UnderStudy,
    /// 3 - ruled out.
    RuledOut,
}

impl DeathVerdict {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::ConfirmedDeath),
            2 => Some(Self::UnderStudy),
            3 => Some(Self::RuledOut),
            _ => None,
        }
    }

    pub fn is_confirmed_death(self) -> bool {
        matches!(self, Self::ConfirmedDeath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_codes_follow_ssa_dictionary() {
        assert_eq!(Sex::from_code(1), Some(Sex::Female));
        assert_eq!(Sex::from_code(2), Some(Sex::Male));
        assert_eq!(Sex::from_code(0), None);
        assert_eq!(Sex::Female.label(), "Mujeres");
    }

    #[test]
    fn only_status_two_confirms() {
        assert!(CaseStatus::from_code(2).unwrap().is_confirmed());
        assert!(!CaseStatus::from_code(1).unwrap().is_confirmed());
        assert!(!CaseStatus::from_code(3).unwrap().is_confirmed());
        assert_eq!(CaseStatus::from_code(4), None);
    }

    #[test]
    fn serotype_labels() {
        assert_eq!(Serotype::from_code(1).unwrap().label(), "DENV-1");
        assert_eq!(
            Serotype::from_code(5).unwrap().label(),
            "Sin serotipo aislado"
        );
        assert_eq!(Serotype::from_code(6), None);
        let codes: Vec<i64> = Serotype::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn verdict_one_is_confirmed_death() {
        assert!(DeathVerdict::from_code(1).unwrap().is_confirmed_death());
        assert!(!DeathVerdict::from_code(2).unwrap().is_confirmed_death());
    }
}
