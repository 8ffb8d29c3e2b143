//! Daily case heatmap laid out as a year calendar.
//!
//! Rows are weekdays (Monday on top), columns are weeks; month starts
//! are outlined and days without records keep the panel color instead
//! of reading as zero.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use dengue_analysis::calendar::{CaseCalendar, MONTH_ABBREV, WEEKDAY_ABBREV};
use dengue_analysis::stats::{ColorScale, format_grouped, linspace};

use crate::palette::RAINBOW;
use crate::svg::{Anchor, Canvas, TextStyle};
use crate::theme;

/// Tick intervals on the calendar color bar.
const INTERVALS: usize = 9;

const GRID_LEFT: f64 = 70.0;
const GRID_TOP: f64 = 150.0;
const GRID_BOTTOM: f64 = 430.0;
const GRID_RIGHT: f64 = 1090.0;
const BAR_LEFT: f64 = 1150.0;
const BAR_TOP: f64 = 150.0;
const BAR_WIDTH: f64 = 26.0;
const BAR_HEIGHT: f64 = 280.0;

/// Render the daily onset-date calendar.
pub fn render_calendar(calendar: &CaseCalendar, path: &Path) -> Result<()> {
    let mut canvas = Canvas::new(theme::WIDTH, theme::HEIGHT)?;

    let center = canvas.width() / 2.0;
    canvas.text(
        center,
        44.0,
        &format!(
            "Casos confirmados de dengue por fecha de inicio de síntomas, {}",
            calendar.year
        ),
        &TextStyle::new(theme::TITLE_SIZE, Anchor::Middle).bold(),
    )?;
    canvas.text(
        center,
        76.0,
        "Un cuadro por día; los días sin registros quedan en blanco",
        &TextStyle::new(theme::SUBTITLE_SIZE, Anchor::Middle),
    )?;

    let scale = ColorScale::build(&calendar.counts(), INTERVALS);

    let weeks = f64::from(calendar.week_count().max(1));
    let cell_w = (GRID_RIGHT - GRID_LEFT) / weeks;
    let cell_h = (GRID_BOTTOM - GRID_TOP) / 7.0;
    let gap = 1.0;

    let tick_style = TextStyle::new(theme::TICK_SIZE, Anchor::End);
    for (row, label) in WEEKDAY_ABBREV.iter().enumerate() {
        let y = GRID_TOP + cell_h * (row as f64 + 0.5) + 4.0;
        canvas.text(GRID_LEFT - 10.0, y, label, &tick_style)?;
    }

    for day in &calendar.days {
        let x = GRID_LEFT + cell_w * f64::from(day.week);
        let y = GRID_TOP + cell_h * f64::from(day.weekday);
        let fill = match day.count {
            Some(count) => RAINBOW.color_at(scale.position(f64::from(count))),
            None => theme::PANEL.to_string(),
        };
        canvas.rect(x, y, cell_w - gap, cell_h - gap, &fill)?;
        if day.month_start {
            canvas.rect_outlined(x, y, cell_w - gap, cell_h - gap, None, theme::TEXT, 1.4)?;
        }
    }

    let month_style = TextStyle::new(theme::TICK_SIZE, Anchor::Middle);
    for (position, label) in month_label_positions(weeks).into_iter().zip(MONTH_ABBREV) {
        canvas.text(
            GRID_LEFT + cell_w * position,
            GRID_TOP - 10.0,
            label,
            &month_style,
        )?;
    }

    draw_color_bar(&mut canvas, &scale)?;
    draw_stats_strip(&mut canvas, calendar)?;

    debug!(path = %path.display(), weeks = calendar.week_count(), "calendar rendered");
    canvas.save(path)
}

/// Evenly spaced month label columns, in week units, inset so the
/// first and last labels sit over their months rather than the grid
/// edges (1.5 and `weeks - 4.5` for a 54-column year).
fn month_label_positions(weeks: f64) -> Vec<f64> {
    linspace(1.5, (weeks - 4.5).max(1.5), MONTH_ABBREV.len())
}

fn draw_color_bar(canvas: &mut Canvas, scale: &ColorScale) -> Result<()> {
    const SLICES: usize = 64;
    let slice_height = BAR_HEIGHT / SLICES as f64;
    for i in 0..SLICES {
        let t = 1.0 - (i as f64 + 0.5) / SLICES as f64;
        canvas.rect(
            BAR_LEFT,
            BAR_TOP + i as f64 * slice_height,
            BAR_WIDTH,
            slice_height + 0.5,
            &RAINBOW.color_at(t),
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
        "Casos",
        &TextStyle::new(theme::TICK_SIZE, Anchor::Middle),
    )?;
    Ok(())
}

fn draw_stats_strip(canvas: &mut Canvas, calendar: &CaseCalendar) -> Result<()> {
    let stats = &calendar.stats;
    let mut lines = vec![
        format!(
            "Total en el año: {} casos, media diaria {}",
            format_grouped(stats.total as f64, 0),
            format_grouped(stats.daily_mean, 1),
        ),
    ];
    if let Some((date, count)) = stats.peak_day {
        lines.push(format!(
            "Día pico: {} con {} casos",
            date.format("%d/%m/%Y"),
            format_grouped(f64::from(count), 0),
        ));
    }
    if let (Some(name), Some((_, total))) = (stats.peak_month_name(), stats.peak_month) {
        lines.push(format!(
            "Mes pico: {name} con {} casos",
            format_grouped(total as f64, 0),
        ));
    }
    if stats.out_of_year > 0 {
        lines.push(format!(
            "{} registros con fecha fuera del año, excluidos",
            format_grouped(stats.out_of_year as f64, 0),
        ));
    }

    let style = TextStyle::new(theme::SUBTITLE_SIZE, Anchor::Middle);
    let mut y = GRID_BOTTOM + 90.0;
    for line in &lines {
        canvas.text(canvas.width() / 2.0, y, line, &style)?;
        y += 30.0;
    }
    Ok(())
}
