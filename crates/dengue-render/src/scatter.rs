//! Age-band rate scatter, one marker series per sex.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use dengue_analysis::stats::format_grouped;
use dengue_analysis::AgeSexProfile;

use crate::svg::{Anchor, Canvas, TextStyle, fmt_coord};
use crate::theme;

const PLOT_LEFT: f64 = 90.0;
const PLOT_TOP: f64 = 110.0;
const PLOT_RIGHT: f64 = 1230.0;
const PLOT_BOTTOM: f64 = 600.0;
const MARKER_RADIUS: f64 = 7.0;
const Y_TICKS: usize = 6;

/// Render the infections or deaths age/sex profile.
pub fn render_age_sex(profile: &AgeSexProfile, path: &Path) -> Result<()> {
    let mut canvas = Canvas::new(theme::WIDTH, theme::HEIGHT)?;

    let noun = profile.measure.label().to_lowercase();
    let center = canvas.width() / 2.0;
    canvas.text(
        center,
        44.0,
        &format!(
            "Tasa de {noun} de dengue por grupo de edad y sexo, {}",
            profile.year
        ),
        &TextStyle::new(theme::TITLE_SIZE, Anchor::Middle).bold(),
    )?;
    canvas.text(
        center,
        76.0,
        "Por cada 100 mil habitantes del grupo",
        &TextStyle::new(theme::SUBTITLE_SIZE, Anchor::Middle),
    )?;

    canvas.rect(
        PLOT_LEFT,
        PLOT_TOP,
        PLOT_RIGHT - PLOT_LEFT,
        PLOT_BOTTOM - PLOT_TOP,
        theme::PANEL,
    )?;

    let max_rate = profile
        .bands
        .iter()
        .flat_map(|row| [row.female_rate, row.male_rate])
        .fold(0.0f64, f64::max);
    let y_max = nice_ceiling(max_rate);

    // horizontal gridlines with tick labels
    let tick_style = TextStyle::new(theme::TICK_SIZE, Anchor::End);
    for i in 0..=Y_TICKS {
        let value = y_max * i as f64 / Y_TICKS as f64;
        let y = PLOT_BOTTOM - (PLOT_BOTTOM - PLOT_TOP) * i as f64 / Y_TICKS as f64;
        if i > 0 {
            canvas.line(PLOT_LEFT, y, PLOT_RIGHT, y, theme::PAPER, 1.0)?;
        }
        let decimals = if y_max < 10.0 { 1 } else { 0 };
        canvas.text(
            PLOT_LEFT - 10.0,
            y + 4.0,
            &format_grouped(value, decimals),
            &tick_style,
        )?;
    }

    let band_count = profile.bands.len().max(1);
    let step = (PLOT_RIGHT - PLOT_LEFT) / band_count as f64;
    let label_style = TextStyle::new(theme::TICK_SIZE, Anchor::End).rotated(-45.0);
    for (i, row) in profile.bands.iter().enumerate() {
        let x = PLOT_LEFT + step * (i as f64 + 0.5);
        canvas.text(x, PLOT_BOTTOM + 20.0, &row.band, &label_style)?;

        let female_y = rate_y(row.female_rate, y_max);
        let male_y = rate_y(row.male_rate, y_max);
        diamond(&mut canvas, x, female_y, MARKER_RADIUS, theme::FEMALE_MARKER)?;
        canvas.circle(
            x,
            male_y,
            MARKER_RADIUS,
            None,
            Some((theme::MALE_MARKER, 2.0)),
        )?;
    }

    canvas.text(
        24.0,
        (PLOT_TOP + PLOT_BOTTOM) / 2.0,
        "Tasa por 100 mil",
        &TextStyle::new(theme::TICK_SIZE, Anchor::Middle).rotated(-90.0),
    )?;
    canvas.text(
        (PLOT_LEFT + PLOT_RIGHT) / 2.0,
        PLOT_BOTTOM + 70.0,
        "Grupo de edad",
        &TextStyle::new(theme::TICK_SIZE, Anchor::Middle),
    )?;

    draw_legend(&mut canvas, profile)?;

    debug!(path = %path.display(), measure = ?profile.measure, "age/sex profile rendered");
    canvas.save(path)
}

fn rate_y(rate: f64, y_max: f64) -> f64 {
    let fraction = if y_max > 0.0 { rate / y_max } else { 0.0 };
    PLOT_BOTTOM - (PLOT_BOTTOM - PLOT_TOP) * fraction.clamp(0.0, 1.0)
}

/// Round up to 1, 2 or 5 times a power of ten so the top gridline sits
/// on a readable value.
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let normalized = value / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

fn diamond(canvas: &mut Canvas, cx: f64, cy: f64, r: f64, stroke: &str) -> Result<()> {
    let d = format!(
        "M{},{} L{},{} L{},{} L{},{} Z",
        fmt_coord(cx),
        fmt_coord(cy - r),
        fmt_coord(cx + r),
        fmt_coord(cy),
        fmt_coord(cx),
        fmt_coord(cy + r),
        fmt_coord(cx - r),
        fmt_coord(cy),
    );
    canvas.path(&d, None, Some((stroke, 2.0)))
}

fn draw_legend(canvas: &mut Canvas, profile: &AgeSexProfile) -> Result<()> {
    let y = PLOT_TOP + 24.0;
    let x = PLOT_RIGHT - 250.0;
    let style = TextStyle::new(theme::TICK_SIZE, Anchor::Start);

    diamond(canvas, x, y, MARKER_RADIUS, theme::FEMALE_MARKER)?;
    canvas.text(
        x + 16.0,
        y + 4.0,
        &format!(
            "Mujeres ({})",
            format_grouped(profile.female_total as f64, 0)
        ),
        &style,
    )?;

    canvas.circle(x, y + 26.0, MARKER_RADIUS, None, Some((theme::MALE_MARKER, 2.0)))?;
    canvas.text(
        x + 16.0,
        y + 30.0,
        &format!("Hombres ({})", format_grouped(profile.male_total as f64, 0)),
        &style,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceilings_land_on_round_values() {
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(0.7), 1.0);
        assert_eq!(nice_ceiling(1.3), 2.0);
        assert_eq!(nice_ceiling(37.0), 50.0);
        assert_eq!(nice_ceiling(82.0), 100.0);
        assert_eq!(nice_ceiling(100.0), 100.0);
    }

    #[test]
    fn rates_map_into_the_plot_area() {
        assert_eq!(rate_y(0.0, 100.0), PLOT_BOTTOM);
        assert_eq!(rate_y(100.0, 100.0), PLOT_TOP);
        let mid = rate_y(50.0, 100.0);
        assert!(mid > PLOT_TOP && mid < PLOT_BOTTOM);
        // degenerate axis keeps markers on the baseline
        assert_eq!(rate_y(5.0, 0.0), PLOT_BOTTOM);
    }
}
