//! State and municipal incidence maps.
//!
//! Boundaries come in as lon/lat rings and are projected with a plain
//! equirectangular projection, longitude scaled by the cosine of the
//! mean latitude so Mexico keeps its shape. Fill colors follow the
//! Portland scale capped at the 95th percentile of the rates.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Result, bail};
use tracing::{debug, warn};

use dengue_analysis::stats::{ColorScale, format_grouped};
use dengue_analysis::{MunicipalBreakdown, NationalSummary, StateBreakdown};
use dengue_assets::FeatureSet;
use dengue_model::EntityId;

use crate::palette::{PORTLAND, Palette};
use crate::svg::{Anchor, Canvas, TextStyle, fmt_coord};
use crate::theme;

/// Tick intervals on the state color bar.
const STATE_INTERVALS: usize = 11;
/// Tick intervals on the municipal color bar.
const MUNICIPAL_INTERVALS: usize = 13;

const MAP_LEFT: f64 = 40.0;
const MAP_TOP: f64 = 110.0;
const MAP_WIDTH: f64 = 1020.0;
const MAP_HEIGHT: f64 = 560.0;
const BAR_LEFT: f64 = 1120.0;
const BAR_TOP: f64 = 140.0;
const BAR_WIDTH: f64 = 26.0;
const BAR_HEIGHT: f64 = 480.0;

struct Projection {
    min_lon: f64,
    max_lat: f64,
    cos_lat: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Projection {
    /// Fit `bounds` into the map area, centered, with a small margin.
    fn fit(bounds: (f64, f64, f64, f64)) -> Self {
        let (min_lon, min_lat, max_lon, max_lat) = bounds;
        let cos_lat = ((min_lat + max_lat) / 2.0).to_radians().cos().max(0.01);
        let span_x = ((max_lon - min_lon) * cos_lat).max(f64::EPSILON);
        let span_y = (max_lat - min_lat).max(f64::EPSILON);

        let margin = 12.0;
        let scale = ((MAP_WIDTH - 2.0 * margin) / span_x).min((MAP_HEIGHT - 2.0 * margin) / span_y);
        let offset_x = MAP_LEFT + (MAP_WIDTH - span_x * scale) / 2.0;
        let offset_y = MAP_TOP + (MAP_HEIGHT - span_y * scale) / 2.0;
        Self {
            min_lon,
            max_lat,
            cos_lat,
            scale,
            offset_x,
            offset_y,
        }
    }

    fn point(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = self.offset_x + (lon - self.min_lon) * self.cos_lat * self.scale;
        let y = self.offset_y + (self.max_lat - lat) * self.scale;
        (x, y)
    }
}

fn ring_path(projection: &Projection, rings: &[Vec<(f64, f64)>]) -> String {
    let mut d = String::new();
    for ring in rings {
        for (i, (lon, lat)) in ring.iter().enumerate() {
            let (x, y) = projection.point(*lon, *lat);
            let op = if i == 0 { 'M' } else { 'L' };
            d.push_str(&format!("{op}{},{} ", fmt_coord(x), fmt_coord(y)));
        }
        d.push_str("Z ");
    }
    d.trim_end().to_string()
}

fn draw_header(canvas: &mut Canvas, title: &str, subtitle: &str) -> Result<()> {
    let center = canvas.width() / 2.0;
    canvas.text(
        center,
        44.0,
        title,
        &TextStyle::new(theme::TITLE_SIZE, Anchor::Middle).bold(),
    )?;
    canvas.text(
        center,
        76.0,
        subtitle,
        &TextStyle::new(theme::SUBTITLE_SIZE, Anchor::Middle),
    )?;
    Ok(())
}

/// Subtitle under the map title: national rate, then the confirmed
/// record count it comes from.
fn national_subtitle(national: &NationalSummary) -> String {
    format!(
        "Nacional: {} ({} registros)",
        format_grouped(national.rate, 2),
        format_grouped(national.total as f64, 0),
    )
}

fn draw_footer(canvas: &mut Canvas, text: &str) -> Result<()> {
    canvas.text(
        canvas.width() / 2.0,
        canvas.height() - 18.0,
        text,
        &TextStyle::new(theme::FOOTER_SIZE, Anchor::Middle),
    )?;
    Ok(())
}

/// Vertical color bar with the scale's tick marks; max at the top.
fn draw_color_bar(canvas: &mut Canvas, scale: &ColorScale, palette: &Palette) -> Result<()> {
    const SLICES: usize = 64;
    let slice_height = BAR_HEIGHT / SLICES as f64;
    for i in 0..SLICES {
        // slice 0 sits at the top of the bar
        let t = 1.0 - (i as f64 + 0.5) / SLICES as f64;
        let color = palette.color_at(t);
        canvas.rect(
            BAR_LEFT,
            BAR_TOP + i as f64 * slice_height,
            BAR_WIDTH,
            slice_height + 0.5,
            &color,
        )?;
    }

    let style = TextStyle::new(theme::TICK_SIZE, Anchor::Start);
    for (mark, label) in scale.marks.iter().zip(&scale.labels) {
        let y = BAR_TOP + BAR_HEIGHT * (1.0 - scale.position(*mark));
        canvas.line(
            BAR_LEFT + BAR_WIDTH,
            y,
            BAR_LEFT + BAR_WIDTH + 5.0,
            y,
            theme::TEXT,
            1.0,
        )?;
        canvas.text(BAR_LEFT + BAR_WIDTH + 9.0, y + 4.0, label, &style)?;
    }
    canvas.text(
        BAR_LEFT + BAR_WIDTH / 2.0,
        BAR_TOP - 14.0,
        "Tasa",
        &TextStyle::new(theme::TICK_SIZE, Anchor::Middle),
    )?;
    Ok(())
}

/// Render the state incidence map.
pub fn render_state_map(
    breakdown: &StateBreakdown,
    features: &FeatureSet,
    path: &Path,
) -> Result<()> {
    let Some(bounds) = features.bounds() else {
        bail!("state boundary file has no usable features");
    };
    let projection = Projection::fit(bounds);

    let mut rates: HashMap<u8, f64> = HashMap::with_capacity(breakdown.rows.len());
    for row in &breakdown.rows {
        rates.insert(row.entity, row.rate);
    }
    let values: Vec<f64> = breakdown.rows.iter().map(|row| row.rate).collect();
    let scale = ColorScale::build(&values, STATE_INTERVALS);

    let mut canvas = Canvas::new(theme::WIDTH, theme::HEIGHT)?;
    draw_header(
        &mut canvas,
        &format!(
            "Incidencia de dengue por entidad federativa, {}",
            breakdown.year
        ),
        &national_subtitle(&breakdown.national),
    )?;

    let mut unmatched = 0usize;
    for feature in &features.features {
        let rate = EntityId::from_name(&feature.key).and_then(|entity| rates.get(&entity.code()));
        let fill = match rate {
            Some(rate) => PORTLAND.color_at(scale.position(*rate)),
            None => {
                unmatched += 1;
                theme::LAND.to_string()
            }
        };
        let d = ring_path(&projection, &feature.rings);
        canvas.path(&d, Some(&fill), Some((theme::PAPER, 0.8)))?;
    }
    if unmatched > 0 {
        warn!(unmatched, "state features without a matching entity name");
    }

    draw_color_bar(&mut canvas, &scale, &PORTLAND)?;
    draw_footer(
        &mut canvas,
        "Casos confirmados por cada 100 mil habitantes. Fuente: Secretaría de Salud.",
    )?;

    debug!(path = %path.display(), features = features.features.len(), "state map rendered");
    canvas.save(path)
}

/// Render the municipal incidence map: municipal polygons colored by
/// rate, state outlines on top, and the rate statistics box.
pub fn render_municipal_map(
    breakdown: &MunicipalBreakdown,
    features: &FeatureSet,
    state_outline: Option<&FeatureSet>,
    path: &Path,
) -> Result<()> {
    let Some(bounds) = features.bounds() else {
        bail!("municipal boundary file has no usable features");
    };
    let projection = Projection::fit(bounds);

    let values: Vec<f64> = breakdown.rates.values().copied().collect();
    let scale = ColorScale::build_fine(&values, MUNICIPAL_INTERVALS);

    let mut canvas = Canvas::new(theme::WIDTH, theme::HEIGHT)?;
    draw_header(
        &mut canvas,
        &format!("Incidencia de dengue por municipio, {}", breakdown.year),
        &national_subtitle(&breakdown.national),
    )?;

    for feature in &features.features {
        let fill = match breakdown.rates.get(&feature.key) {
            Some(rate) => PORTLAND.color_at(scale.position(*rate)),
            None => theme::LAND_MUNICIPAL.to_string(),
        };
        let d = ring_path(&projection, &feature.rings);
        canvas.path(&d, Some(&fill), None)?;
    }

    if let Some(outline) = state_outline {
        for feature in &outline.features {
            let d = ring_path(&projection, &feature.rings);
            canvas.path(&d, None, Some((theme::TEXT, 0.6)))?;
        }
    }

    draw_stats_box(&mut canvas, breakdown)?;
    draw_color_bar(&mut canvas, &scale, &PORTLAND)?;
    draw_footer(
        &mut canvas,
        "Casos confirmados por cada 100 mil habitantes. Fuente: Secretaría de Salud.",
    )?;

    debug!(path = %path.display(), features = features.features.len(), "municipal map rendered");
    canvas.save(path)
}

fn draw_stats_box(canvas: &mut Canvas, breakdown: &MunicipalBreakdown) -> Result<()> {
    let stats = &breakdown.stats;
    let lines = [
        ("Media", stats.mean),
        ("Mediana", stats.median),
        ("Desv. est.", stats.std),
        ("P25", stats.p25),
        ("P75", stats.p75),
        ("P95", stats.p95),
        ("Máx.", stats.max),
    ];

    let x = MAP_LEFT + 8.0;
    let y = MAP_TOP + 6.0;
    let line_height = 19.0;
    let height = 30.0 + lines.len() as f64 * line_height;
    canvas.rect_outlined(x, y, 170.0, height, Some(theme::PANEL), theme::TEXT, 0.6)?;
    canvas.text(
        x + 10.0,
        y + 20.0,
        "Tasas municipales",
        &TextStyle::new(theme::TICK_SIZE, Anchor::Start).bold(),
    )?;
    for (i, (label, value)) in lines.iter().enumerate() {
        let ty = y + 40.0 + i as f64 * line_height;
        let style = TextStyle::new(theme::TICK_SIZE, Anchor::Start);
        canvas.text(x + 10.0, ty, label, &style)?;
        canvas.text(
            x + 160.0,
            ty,
            &format_grouped(*value, 1),
            &TextStyle::new(theme::TICK_SIZE, Anchor::End),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_preserves_orientation() {
        // Mexico-ish box: west is smaller x, north is smaller y.
        let projection = Projection::fit((-118.0, 14.0, -86.0, 33.0));
        let (west_x, north_y) = projection.point(-118.0, 33.0);
        let (east_x, south_y) = projection.point(-86.0, 14.0);
        assert!(west_x < east_x);
        assert!(north_y < south_y);
        assert!(west_x >= MAP_LEFT);
        assert!(south_y <= MAP_TOP + MAP_HEIGHT);
    }

    #[test]
    fn subtitle_leads_with_rate_then_record_count() {
        let national = NationalSummary {
            year: 2023,
            total: 54_406,
            population: 129_713_690,
            rate: 41.943,
        };
        assert_eq!(
            national_subtitle(&national),
            "Nacional: 41.94 (54,406 registros)"
        );
    }

    #[test]
    fn ring_paths_close_each_ring() {
        let projection = Projection::fit((0.0, 0.0, 10.0, 10.0));
        let rings = vec![
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)],
            vec![(2.0, 2.0), (3.0, 2.0), (3.0, 3.0)],
        ];
        let d = ring_path(&projection, &rings);
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
        assert!(d.ends_with('Z'));
    }
}
