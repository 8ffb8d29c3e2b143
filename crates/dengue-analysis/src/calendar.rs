//! Daily case calendar for one report year.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use dengue_ingest::columns;
use dengue_ingest::{CaseFrame, parse_case_date, string_column};

use crate::filters::confirmed_cases;

/// Spanish month names for the stats strip.
pub const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Abbreviations across the top of the calendar.
pub const MONTH_ABBREV: [&str; 12] = [
    "Ene.", "Feb.", "Mar.", "Abr.", "May.", "Jun.", "Jul.", "Ago.", "Sep.", "Oct.", "Nov.", "Dic.",
];

/// Weekday labels, Monday first.
pub const WEEKDAY_ABBREV: [&str; 7] = ["Lun.", "Mar.", "Mié.", "Jue.", "Vie.", "Sáb.", "Dom."];

/// One cell of the calendar grid.
#[derive(Debug, Clone)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Monday = 0 .. Sunday = 6; the grid row.
    pub weekday: u8,
    /// The grid column; week 0 starts on January 1st.
    pub week: u16,
    /// First day of a month, drawn with an outline.
    pub month_start: bool,
    /// `None` for days without a single record, rendered as "no data"
    /// rather than zero.
    pub count: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct CalendarStats {
    /// Day with the most records.
    pub peak_day: Option<(NaiveDate, u32)>,
    /// Month with the most records: (0-based month index, count).
    pub peak_month: Option<(usize, u64)>,
    /// Confirmed records inside the year.
    pub total: u64,
    /// `total` over days in the year.
    pub daily_mean: f64,
    /// Confirmed records whose onset date fell outside the year.
    pub out_of_year: u64,
    /// Confirmed records with unparseable or empty onset dates.
    pub unparsed: u64,
}

impl CalendarStats {
    pub fn peak_month_name(&self) -> Option<&'static str> {
        self.peak_month.map(|(month, _)| MONTH_NAMES[month])
    }
}

#[derive(Debug, Clone)]
pub struct CaseCalendar {
    pub year: u16,
    /// Every day of the year in order, leap years included.
    pub days: Vec<CalendarDay>,
    pub stats: CalendarStats,
}

impl CaseCalendar {
    /// Highest week column, for sizing the grid.
    pub fn week_count(&self) -> u16 {
        self.days.last().map_or(0, |day| day.week + 1)
    }

    /// Daily counts where at least one record exists.
    pub fn counts(&self) -> Vec<f64> {
        self.days
            .iter()
            .filter_map(|day| day.count.map(f64::from))
            .collect()
    }
}

/// Build the full-year daily grid of confirmed cases by onset date.
///
/// Out-of-year onset dates are excluded from the grid and counted in
/// the stats; the validation layer raises the matching warning.
pub fn case_calendar(frame: &CaseFrame) -> Result<CaseCalendar> {
    let confirmed = confirmed_cases(&frame.data)?;
    let onsets = string_column(&confirmed, columns::FECHA_SIGN_SINTOMAS)?;

    let year = i32::from(frame.year);
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid report year {year}"))?;
    let days_in_year = if start.leap_year() { 366 } else { 365 };

    let mut counts = vec![0u32; days_in_year];
    let mut out_of_year = 0u64;
    let mut unparsed = 0u64;
    for raw in &onsets {
        match parse_case_date(raw) {
            Some(date) if date.year() == year => {
                counts[date.ordinal0() as usize] += 1;
            }
            Some(_) => out_of_year += 1,
            None => unparsed += 1,
        }
    }
    debug!(
        year = frame.year,
        in_year = onsets.len() as u64 - out_of_year - unparsed,
        out_of_year,
        unparsed,
        "calendar counts accumulated"
    );

    // Week columns are padded so January 1st lands in week 0 at its
    // actual weekday row.
    let pad = start.weekday().num_days_from_monday() as usize;
    let mut days = Vec::with_capacity(days_in_year);
    for (index, count) in counts.iter().enumerate() {
        let date = start + chrono::Days::new(index as u64);
        days.push(CalendarDay {
            date,
            weekday: date.weekday().num_days_from_monday() as u8,
            week: ((pad + index) / 7) as u16,
            month_start: date.day() == 1,
            count: (*count > 0).then_some(*count),
        });
    }

    let peak_day = days
        .iter()
        .filter_map(|day| day.count.map(|count| (day.date, count)))
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)));

    let mut month_totals = [0u64; 12];
    for day in &days {
        if let Some(count) = day.count {
            month_totals[day.date.month0() as usize] += u64::from(count);
        }
    }
    let peak_month = month_totals
        .iter()
        .enumerate()
        .filter(|(_, total)| **total > 0)
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(month, total)| (month, *total));

    let total: u64 = counts.iter().map(|c| u64::from(*c)).sum();
    let stats = CalendarStats {
        peak_day,
        peak_month,
        total,
        daily_mean: total as f64 / days_in_year as f64,
        out_of_year,
        unparsed,
    };

    Ok(CaseCalendar {
        year: frame.year,
        days,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::case_frame;

    #[test]
    fn grid_covers_the_whole_year() {
        let frame = case_frame(2023, &[(14, 39, 1, 30, "09/08/2023", 2, 1, 3)]);
        let calendar = case_calendar(&frame).unwrap();
        assert_eq!(calendar.days.len(), 365);

        // 2023 starts on a Sunday: Jan 1 is row 6 of week 0, Jan 2
        // opens week 1.
        assert_eq!(calendar.days[0].weekday, 6);
        assert_eq!(calendar.days[0].week, 0);
        assert_eq!(calendar.days[1].weekday, 0);
        assert_eq!(calendar.days[1].week, 1);
        assert_eq!(calendar.week_count(), 53);
    }

    #[test]
    fn leap_years_have_366_cells() {
        let frame = case_frame(2024, &[(14, 39, 1, 30, "29/02/2024", 2, 1, 3)]);
        let calendar = case_calendar(&frame).unwrap();
        assert_eq!(calendar.days.len(), 366);
        let leap_day = calendar
            .days
            .iter()
            .find(|d| d.date == NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
            .unwrap();
        assert_eq!(leap_day.count, Some(1));
    }

    #[test]
    fn zero_days_are_none_not_zero() {
        let frame = case_frame(
            2023,
            &[
                (14, 39, 1, 30, "09/08/2023", 2, 1, 3),
                (14, 39, 2, 31, "09/08/2023", 2, 1, 3),
                (9, 17, 1, 12, "10/08/2023", 2, 1, 3),
            ],
        );
        let calendar = case_calendar(&frame).unwrap();
        let with_data: Vec<&CalendarDay> =
            calendar.days.iter().filter(|d| d.count.is_some()).collect();
        assert_eq!(with_data.len(), 2);
        assert_eq!(with_data[0].count, Some(2));
        assert!(calendar.days[0].count.is_none());
    }

    #[test]
    fn month_starts_are_flagged() {
        let frame = case_frame(2023, &[(14, 39, 1, 30, "09/08/2023", 2, 1, 3)]);
        let calendar = case_calendar(&frame).unwrap();
        let flagged = calendar.days.iter().filter(|d| d.month_start).count();
        assert_eq!(flagged, 12);
    }

    #[test]
    fn stats_track_peaks_and_leaks() {
        let frame = case_frame(
            2023,
            &[
                (14, 39, 1, 30, "09/08/2023", 2, 1, 3),
                (14, 39, 2, 31, "09/08/2023", 2, 1, 3),
                (14, 39, 1, 28, "10/09/2023", 2, 1, 3),
                (14, 39, 1, 28, "05/01/2022", 2, 1, 3), // out of year
                (14, 39, 1, 28, "sin fecha", 2, 1, 3),  // unparseable
                (14, 39, 1, 28, "09/08/2023", 1, 1, 3), // probable, dropped
            ],
        );
        let calendar = case_calendar(&frame).unwrap();
        let stats = &calendar.stats;
        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.peak_day,
            Some((NaiveDate::from_ymd_opt(2023, 8, 9).unwrap(), 2))
        );
        assert_eq!(stats.peak_month, Some((7, 2)));
        assert_eq!(stats.peak_month_name(), Some("agosto"));
        assert_eq!(stats.out_of_year, 1);
        assert_eq!(stats.unparsed, 1);
        assert!((stats.daily_mean - 3.0 / 365.0).abs() < 1e-12);
    }
}
