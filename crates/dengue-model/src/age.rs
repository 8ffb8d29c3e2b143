//! Quinquennial age bands.
//!
//! The age/sex incidence view groups cases into the 18 five-year bands
//! CONAPO publishes population projections for, with an open-ended last
//! band labeled `≥85`. Band labels must match the population table row
//! labels exactly so rates can be joined by label.

/// Inclusive bounds of every band. The last band is open-ended in
/// spirit; 120 is the plausibility ceiling for recorded ages.
const BOUNDS: [(u32, u32); 18] = [
    (0, 4),
    (5, 9),
    (10, 14),
    (15, 19),
    (20, 24),
    (25, 29),
    (30, 34),
    (35, 39),
    (40, 44),
    (45, 49),
    (50, 54),
    (55, 59),
    (60, 64),
    (65, 69),
    (70, 74),
    (75, 79),
    (80, 84),
    (85, 120),
];

/// One of the 18 quinquennial bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgeBand(usize);

impl AgeBand {
    /// Number of bands.
    pub const COUNT: usize = BOUNDS.len();

    /// Band containing `age`, or `None` for ages above 120.
    pub fn from_age(age: u32) -> Option<Self> {
        BOUNDS
            .iter()
            .position(|(lo, hi)| (*lo..=*hi).contains(&age))
            .map(Self)
    }

    /// All bands in ascending order.
    pub fn all() -> impl Iterator<Item = AgeBand> {
        (0..Self::COUNT).map(AgeBand)
    }

    /// Zero-based position of the band.
    pub fn index(self) -> usize {
        self.0
    }

    /// Display label: `0-4` .. `80-84`, then `≥85`.
    pub fn label(self) -> String {
        let (lo, hi) = BOUNDS[self.0];
        if self.0 == Self::COUNT - 1 {
            format!("≥{lo}")
        } else {
            format!("{lo}-{hi}")
        }
    }

    /// Parse a band from its display label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().find(|band| band.label() == label.trim())
    }
}
