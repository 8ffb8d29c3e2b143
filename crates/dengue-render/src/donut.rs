//! Serotype donuts: confirmed cases on the left, deaths on the right.

use std::f64::consts::PI;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use dengue_analysis::SerotypeSplit;
use dengue_analysis::serotype::SerotypeCount;
use dengue_analysis::stats::format_grouped;

use crate::palette::VIVID;
use crate::svg::{Anchor, Canvas, TextStyle, fmt_coord};
use crate::theme;

/// Inner radius as a fraction of the outer one.
const HOLE: f64 = 0.75;
const OUTER_RADIUS: f64 = 160.0;
const SLICE_OUTLINE: f64 = 5.0;

/// Color for a serotype code, stable across both donuts.
fn slice_color(code: i64) -> &'static str {
    let index = usize::try_from(code - 1).unwrap_or(0);
    VIVID[index % VIVID.len()]
}

/// Render the serotype split figure.
pub fn render_serotypes(split: &SerotypeSplit, path: &Path) -> Result<()> {
    let mut canvas = Canvas::new(theme::WIDTH, theme::HEIGHT)?;

    let center = canvas.width() / 2.0;
    canvas.text(
        center,
        44.0,
        &format!("Serotipos de dengue identificados, {}", split.year),
        &TextStyle::new(theme::TITLE_SIZE, Anchor::Middle).bold(),
    )?;
    canvas.text(
        center,
        76.0,
        "Porcentaje sobre los registros con resultado de PCR",
        &TextStyle::new(theme::SUBTITLE_SIZE, Anchor::Middle),
    )?;

    let cy = 330.0;
    draw_donut(
        &mut canvas,
        360.0,
        cy,
        &split.cases,
        "Casos confirmados",
        split.case_total,
    )?;
    draw_donut(
        &mut canvas,
        920.0,
        cy,
        &split.deaths,
        "Defunciones",
        split.death_total,
    )?;

    draw_legend(&mut canvas, split)?;

    debug!(path = %path.display(), "serotype donuts rendered");
    canvas.save(path)
}

fn draw_donut(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    counts: &[SerotypeCount],
    title: &str,
    total: u64,
) -> Result<()> {
    canvas.text(
        cx,
        cy - OUTER_RADIUS - 40.0,
        title,
        &TextStyle::new(theme::SUBTITLE_SIZE, Anchor::Middle).bold(),
    )?;

    if counts.is_empty() {
        canvas.circle(cx, cy, OUTER_RADIUS, None, Some((theme::PANEL, 8.0)))?;
        canvas.text(
            cx,
            cy + 5.0,
            "Sin registros",
            &TextStyle::new(theme::SUBTITLE_SIZE, Anchor::Middle),
        )?;
        return Ok(());
    }

    // clockwise from 12 o'clock, slices in code order
    let mut start_angle = -PI / 2.0;
    for count in counts {
        let sweep = count.percent / 100.0 * 2.0 * PI;
        let end_angle = start_angle + sweep;
        let d = annular_sector(cx, cy, OUTER_RADIUS, OUTER_RADIUS * HOLE, start_angle, sweep);
        canvas.path(
            &d,
            Some(slice_color(count.code)),
            Some((theme::PANEL, SLICE_OUTLINE)),
        )?;

        let mid = (start_angle + end_angle) / 2.0;
        let label_r = OUTER_RADIUS + 28.0;
        let lx = cx + label_r * mid.cos();
        let ly = cy + label_r * mid.sin();
        let anchor = if mid.cos() > 0.15 {
            Anchor::Start
        } else if mid.cos() < -0.15 {
            Anchor::End
        } else {
            Anchor::Middle
        };
        let style = TextStyle::new(theme::TICK_SIZE, anchor);
        canvas.text(lx, ly, &format!("{:.2}%", count.percent), &style)?;
        canvas.text(
            lx,
            ly + 16.0,
            &format!("({})", format_grouped(count.total as f64, 0)),
            &style,
        )?;

        start_angle = end_angle;
    }

    canvas.text(
        cx,
        cy - 4.0,
        &format_grouped(total as f64, 0),
        &TextStyle::new(theme::TITLE_SIZE, Anchor::Middle).bold(),
    )?;
    canvas.text(
        cx,
        cy + 24.0,
        "registros",
        &TextStyle::new(theme::TICK_SIZE, Anchor::Middle),
    )?;
    Ok(())
}

/// Path data for one donut slice. A sweep within rounding error of the
/// full circle is split into two half arcs because a single SVG arc
/// cannot span 360 degrees.
fn annular_sector(cx: f64, cy: f64, outer: f64, inner: f64, start: f64, sweep: f64) -> String {
    if sweep >= 2.0 * PI - 1e-6 {
        let half_a = annular_sector(cx, cy, outer, inner, start, PI);
        let half_b = annular_sector(cx, cy, outer, inner, start + PI, PI);
        return format!("{half_a} {half_b}");
    }

    let end = start + sweep;
    let (x0, y0) = (cx + outer * start.cos(), cy + outer * start.sin());
    let (x1, y1) = (cx + outer * end.cos(), cy + outer * end.sin());
    let (x2, y2) = (cx + inner * end.cos(), cy + inner * end.sin());
    let (x3, y3) = (cx + inner * start.cos(), cy + inner * start.sin());
    let large = i32::from(sweep > PI);
    format!(
        "M{},{} A{o},{o} 0 {large} 1 {},{} L{},{} A{i},{i} 0 {large} 0 {},{} Z",
        fmt_coord(x0),
        fmt_coord(y0),
        fmt_coord(x1),
        fmt_coord(y1),
        fmt_coord(x2),
        fmt_coord(y2),
        fmt_coord(x3),
        fmt_coord(y3),
        o = fmt_coord(outer),
        i = fmt_coord(inner),
    )
}

fn draw_legend(canvas: &mut Canvas, split: &SerotypeSplit) -> Result<()> {
    // union of both donuts, code order, deduplicated
    let mut entries: Vec<(i64, &str)> = Vec::new();
    for count in split.cases.iter().chain(&split.deaths) {
        if !entries.iter().any(|(code, _)| *code == count.code) {
            entries.push((count.code, count.label.as_str()));
        }
    }
    entries.sort_by_key(|(code, _)| *code);

    let swatch = 14.0;
    let spacing = 190.0;
    let total_width = spacing * entries.len().saturating_sub(1) as f64;
    let mut x = canvas.width() / 2.0 - total_width / 2.0;
    let y = canvas.height() - 60.0;
    let style = TextStyle::new(theme::TICK_SIZE, Anchor::Start);
    for (code, label) in entries {
        canvas.rect(x - swatch / 2.0, y - swatch + 2.0, swatch, swatch, slice_color(code))?;
        canvas.text(x + swatch, y, label, &style)?;
        x += spacing;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sectors_use_arcs_and_close() {
        let d = annular_sector(100.0, 100.0, 80.0, 60.0, -PI / 2.0, PI / 3.0);
        assert_eq!(d.matches('A').count(), 2);
        assert!(d.ends_with('Z'));
        // short sweep keeps the small-arc flag
        assert!(d.contains(" 0 0 1 "));
    }

    #[test]
    fn wide_sectors_set_the_large_arc_flag() {
        let d = annular_sector(100.0, 100.0, 80.0, 60.0, 0.0, 1.5 * PI);
        assert!(d.contains(" 0 1 1 "));
    }

    #[test]
    fn a_full_circle_becomes_two_halves() {
        let d = annular_sector(100.0, 100.0, 80.0, 60.0, 0.0, 2.0 * PI);
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
    }

    #[test]
    fn serotype_colors_are_stable() {
        assert_eq!(slice_color(1), VIVID[0]);
        assert_eq!(slice_color(5), VIVID[4]);
    }
}
