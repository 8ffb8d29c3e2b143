//! Color scales and the qualitative palette.
//!
//! Stop values reproduce the published charts: `portland` on the maps,
//! `rainbow` on the calendar, `Vivid` on the donuts.

/// A sequential scale as ordered (position, rgb) stops.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    stops: &'static [(f64, (u8, u8, u8))],
}

/// Diverging blue-to-red scale used by both maps.
pub const PORTLAND: Palette = Palette {
    stops: &[
        (0.0, (12, 51, 131)),
        (0.25, (10, 136, 186)),
        (0.5, (242, 211, 56)),
        (0.75, (242, 143, 56)),
        (1.0, (217, 30, 30)),
    ],
};

/// Spectral scale used by the calendar heatmap.
pub const RAINBOW: Palette = Palette {
    stops: &[
        (0.0, (150, 0, 90)),
        (0.125, (0, 0, 200)),
        (0.25, (0, 25, 255)),
        (0.375, (0, 152, 255)),
        (0.5, (44, 255, 150)),
        (0.625, (151, 255, 0)),
        (0.75, (255, 234, 0)),
        (0.875, (255, 111, 0)),
        (1.0, (255, 0, 0)),
    ],
};

/// Qualitative palette for the donut slices, in slice order.
pub const VIVID: [&str; 11] = [
    "#E58606", "#5D69B1", "#52BCA3", "#99C945", "#CC61B0", "#24796C", "#DAA51B", "#2F8AC4",
    "#764E9F", "#ED645A", "#A5AA99",
];

impl Palette {
    /// Hex color at normalized position `t`, linearly interpolated
    /// between the surrounding stops and clamped to the ends.
    pub fn color_at(&self, t: f64) -> String {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mut lower = self.stops[0];
        for stop in self.stops {
            if stop.0 <= t {
                lower = *stop;
            } else {
                let (p0, (r0, g0, b0)) = lower;
                let (p1, (r1, g1, b1)) = *stop;
                let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
                return hex(lerp(r0, r1, f), lerp(g0, g1, f), lerp(b0, b1, f));
            }
        }
        let (_, (r, g, b)) = lower;
        hex(r, g, b)
    }
}

fn lerp(a: u8, b: u8, f: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8
}

fn hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_the_stops() {
        assert_eq!(PORTLAND.color_at(0.0), "#0C3383");
        assert_eq!(PORTLAND.color_at(1.0), "#D91E1E");
        assert_eq!(RAINBOW.color_at(0.5), "#2CFF96");
    }

    #[test]
    fn midpoints_interpolate() {
        // Halfway between the first two portland stops.
        assert_eq!(PORTLAND.color_at(0.125), "#0B5E9F");
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(PORTLAND.color_at(-1.0), PORTLAND.color_at(0.0));
        assert_eq!(PORTLAND.color_at(2.0), PORTLAND.color_at(1.0));
        assert_eq!(PORTLAND.color_at(f64::NAN), PORTLAND.color_at(0.0));
    }
}
