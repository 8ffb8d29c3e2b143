//! Mexican federal entity catalog.
//!
//! The SSA case dataset codes residence states with the INEGI entity
//! numbering (1-32). Codes 97-99 mark unspecified or foreign residence;
//! they are representable but never map to a catalog name.
//!
//! Catalog names follow the convention used by the report and by the
//! `NOM_ENT` property of the state GeoJSON. CONAPO population tables use
//! the long official names for four states; [`EntityId::from_name`]
//! accepts those as aliases.

/// Row label for the national total in CONAPO population tables.
pub const NATIONAL_NAME: &str = "Estados Unidos Mexicanos";

/// Catalog of the 32 federal entities, indexed by INEGI code minus one.
const ENTITY_NAMES: [&str; 32] = [
    "Aguascalientes",
    "Baja California",
    "Baja California Sur",
    "Campeche",
    "Coahuila",
    "Colima",
    "Chiapas",
    "Chihuahua",
    "Ciudad de México",
    "Durango",
    "Guanajuato",
    "Guerrero",
    "Hidalgo",
    "Jalisco",
    "Estado de México",
    "Michoacán",
    "Morelos",
    "Nayarit",
    "Nuevo León",
    "Oaxaca",
    "Puebla",
    "Querétaro",
    "Quintana Roo",
    "San Luis Potosí",
    "Sinaloa",
    "Sonora",
    "Tabasco",
    "Tamaulipas",
    "Tlaxcala",
    "Veracruz",
    "Yucatán",
    "Zacatecas",
];

/// Official CONAPO names that differ from the catalog name.
const NAME_ALIASES: [(&str, &str); 4] = [
    ("Coahuila de Zaragoza", "Coahuila"),
    ("México", "Estado de México"),
    ("Michoacán de Ocampo", "Michoacán"),
    ("Veracruz de Ignacio de la Llave", "Veracruz"),
];

/// A federal entity code as recorded in `ENTIDAD_RES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u8);

impl EntityId {
    /// Highest valid state code.
    pub const MAX_STATE: u8 = 32;

    pub fn new(code: u8) -> Self {
        Self(code)
    }

    /// Parse an entity code from raw data. Negative and out-of-u8 values
    /// are rejected; codes above 32 (97-99 in SSA files) are kept so the
    /// caller can count non-resident records.
    pub fn from_code(code: i64) -> Option<Self> {
        u8::try_from(code).ok().map(Self)
    }

    /// Look up an entity by catalog name or CONAPO alias.
    pub fn from_name(name: &str) -> Option<Self> {
        let canonical = canonical_name(name);
        ENTITY_NAMES
            .iter()
            .position(|entry| *entry == canonical)
            .map(|idx| Self(idx as u8 + 1))
    }

    pub fn code(self) -> u8 {
        self.0
    }

    /// True when the code identifies one of the 32 states.
    pub fn is_resident(self) -> bool {
        (1..=Self::MAX_STATE).contains(&self.0)
    }

    /// Catalog name, `None` for non-state codes.
    pub fn name(self) -> Option<&'static str> {
        if self.is_resident() {
            Some(ENTITY_NAMES[usize::from(self.0) - 1])
        } else {
            None
        }
    }

    /// Iterate the 32 states in code order.
    pub fn states() -> impl Iterator<Item = EntityId> {
        (1..=Self::MAX_STATE).map(EntityId)
    }
}

/// Resolve CONAPO aliases to the catalog name, passing through otherwise.
pub fn canonical_name(name: &str) -> &str {
    let trimmed = name.trim();
    for (alias, canonical) in NAME_ALIASES {
        if trimmed == alias {
            return canonical;
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_all_states() {
        for entity in EntityId::states() {
            assert!(entity.is_resident());
            assert!(entity.name().is_some());
        }
        assert_eq!(EntityId::states().count(), 32);
    }

    #[test]
    fn known_codes() {
        assert_eq!(EntityId::new(9).name(), Some("Ciudad de México"));
        assert_eq!(EntityId::new(15).name(), Some("Estado de México"));
        assert_eq!(EntityId::new(32).name(), Some("Zacatecas"));
    }

    #[test]
    fn non_resident_codes_have_no_name() {
        let foreign = EntityId::from_code(99).unwrap();
        assert!(!foreign.is_resident());
        assert_eq!(foreign.name(), None);
        assert_eq!(EntityId::from_code(-1), None);
    }

    #[test]
    fn conapo_aliases_resolve() {
        assert_eq!(
            EntityId::from_name("Veracruz de Ignacio de la Llave"),
            Some(EntityId::new(30))
        );
        assert_eq!(EntityId::from_name("México"), Some(EntityId::new(15)));
        assert_eq!(EntityId::from_name("Coahuila"), Some(EntityId::new(5)));
        assert_eq!(EntityId::from_name("Atlantis"), None);
    }
}
