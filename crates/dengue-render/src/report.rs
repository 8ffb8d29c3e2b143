//! The markdown report that ties the year's figures together.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use dengue_analysis::stats::format_grouped;
use dengue_analysis::{
    AgeSexProfile, CaseCalendar, MunicipalBreakdown, SerotypeSplit, StateBreakdown,
};
use dengue_analysis::serotype::SerotypeCount;

use crate::table::{Align, MarkdownTable};

/// File names of the figures the report embeds; map entries are `None`
/// when their boundary files were unavailable.
#[derive(Debug, Clone)]
pub struct Figures {
    pub state_map: Option<String>,
    pub municipal_map: Option<String>,
    pub age_sex: String,
    pub deaths_age_sex: String,
    pub calendar: String,
    pub serotypes: String,
}

/// Everything the report needs, borrowed from the pipeline.
#[derive(Debug)]
pub struct ReportContext<'a> {
    pub year: u16,
    pub source_name: &'a str,
    pub fingerprint: &'a str,
    pub generated: NaiveDate,
    pub states: &'a StateBreakdown,
    pub municipal: Option<&'a MunicipalBreakdown>,
    pub infections: &'a AgeSexProfile,
    pub deaths: &'a AgeSexProfile,
    pub calendar: &'a CaseCalendar,
    pub serotypes: &'a SerotypeSplit,
    pub figures: Figures,
}

/// Write `reporte_{year}.md`.
pub fn write_report(context: &ReportContext<'_>, path: &Path) -> Result<()> {
    let body = render_report(context);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    std::fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "report written");
    Ok(())
}

pub fn render_report(context: &ReportContext<'_>) -> String {
    let mut out = String::new();
    let year = context.year;
    let national = &context.states.national;

    out.push_str(&format!("# Dengue en México, {year}\n\n"));
    out.push_str(&format!(
        "Durante {year} se confirmaron **{} casos** de dengue en el país, \
         una tasa nacional de **{} por cada 100 mil habitantes**.\n\n",
        format_grouped(national.total as f64, 0),
        format_grouped(national.rate, 2),
    ));

    state_section(&mut out, context);
    municipal_section(&mut out, context);
    age_sex_section(&mut out, context);
    calendar_section(&mut out, context);
    serotype_section(&mut out, context);

    out.push_str("---\n\n");
    out.push_str(&format!(
        "Fuente: Secretaría de Salud, Dirección General de Epidemiología \
         (`{}`, huella `{}`). Poblaciones CONAPO. Generado el {}.\n",
        context.source_name,
        context.fingerprint,
        context.generated.format("%d/%m/%Y"),
    ));
    out
}

fn figure(out: &mut String, file: &str, alt: &str) {
    out.push_str(&format!("![{alt}]({file})\n\n"));
}

fn state_section(out: &mut String, context: &ReportContext<'_>) {
    out.push_str("## Casos por entidad federativa\n\n");
    if let Some(map) = &context.figures.state_map {
        figure(out, map, "Mapa estatal de incidencia");
    }

    // two consecutive 16-row tables so both halves fit side by side in
    // the published layout
    let rows = &context.states.rows;
    for half in rows.chunks(16) {
        let mut table = MarkdownTable::new(&[
            ("Entidad", Align::Left),
            ("Mujeres", Align::Right),
            ("Hombres", Align::Right),
            ("Total", Align::Right),
            ("Tasa", Align::Right),
        ]);
        for row in half {
            table.row([
                row.name.clone(),
                format_grouped(row.female as f64, 0),
                format_grouped(row.male as f64, 0),
                format_grouped(row.total as f64, 0),
                format_grouped(row.rate, 2),
            ]);
        }
        out.push_str(&table.render());
        out.push('\n');
    }
}

fn municipal_section(out: &mut String, context: &ReportContext<'_>) {
    let Some(municipal) = context.municipal else {
        return;
    };
    out.push_str("## Casos por municipio\n\n");
    if let Some(map) = &context.figures.municipal_map {
        figure(out, map, "Mapa municipal de incidencia");
    }

    let stats = &municipal.stats;
    out.push_str(&format!(
        "Tasas municipales: media {}, mediana {}, desviación estándar {}, \
         percentil 95 {}, máxima {}.\n\n",
        format_grouped(stats.mean, 1),
        format_grouped(stats.median, 1),
        format_grouped(stats.std, 1),
        format_grouped(stats.p95, 1),
        format_grouped(stats.max, 1),
    ));

    if !municipal.top.is_empty() {
        out.push_str("### Municipios con mayor tasa\n\n");
        let mut table = MarkdownTable::new(&[
            ("Municipio", Align::Left),
            ("Casos", Align::Right),
            ("Población", Align::Right),
            ("Tasa", Align::Right),
        ]);
        for row in &municipal.top {
            table.row([
                row.display_name(),
                format_grouped(row.total as f64, 0),
                format_grouped(row.population as f64, 0),
                format_grouped(row.rate, 2),
            ]);
        }
        out.push_str(&table.render());
        out.push('\n');
    }
}

fn age_sex_section(out: &mut String, context: &ReportContext<'_>) {
    out.push_str("## Edad y sexo\n\n");
    profile_paragraph(out, &context.figures.age_sex, context.infections);
    profile_paragraph(out, &context.figures.deaths_age_sex, context.deaths);
}

fn profile_paragraph(out: &mut String, file: &str, profile: &AgeSexProfile) {
    let noun = profile.measure.label();
    figure(
        out,
        file,
        &format!("Tasa de {} por edad y sexo", noun.to_lowercase()),
    );
    out.push_str(&format!(
        "{noun} confirmadas: {} en mujeres y {} en hombres.\n\n",
        format_grouped(profile.female_total as f64, 0),
        format_grouped(profile.male_total as f64, 0),
    ));
}

fn calendar_section(out: &mut String, context: &ReportContext<'_>) {
    out.push_str("## Curva temporal\n\n");
    figure(out, &context.figures.calendar, "Calendario de casos diarios");

    let stats = &context.calendar.stats;
    if let Some((date, count)) = stats.peak_day {
        out.push_str(&format!(
            "El día con más inicios de síntomas fue el {} con {} casos",
            date.format("%d/%m/%Y"),
            format_grouped(f64::from(count), 0),
        ));
        if let Some(month) = stats.peak_month_name() {
            out.push_str(&format!("; el mes pico fue {month}"));
        }
        out.push_str(".\n\n");
    }
}

fn serotype_section(out: &mut String, context: &ReportContext<'_>) {
    out.push_str("## Serotipos\n\n");
    figure(out, &context.figures.serotypes, "Serotipos identificados");

    serotype_table(out, "Casos confirmados", &context.serotypes.cases);
    serotype_table(out, "Defunciones", &context.serotypes.deaths);
}

fn serotype_table(out: &mut String, title: &str, counts: &[SerotypeCount]) {
    if counts.is_empty() {
        return;
    }
    out.push_str(&format!("### {title}\n\n"));
    let mut table = MarkdownTable::new(&[
        ("Serotipo", Align::Left),
        ("Registros", Align::Right),
        ("Porcentaje", Align::Right),
    ]);
    for count in counts {
        table.row([
            count.label.clone(),
            format_grouped(count.total as f64, 0),
            format!("{:.2}%", count.percent),
        ]);
    }
    out.push_str(&table.render());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use dengue_analysis::calendar::{CalendarStats, CaseCalendar};
    use dengue_analysis::{Measure, NationalSummary, StateBreakdown};
    use dengue_analysis::state::StateRow;

    fn context_fixture() -> (
        StateBreakdown,
        AgeSexProfile,
        AgeSexProfile,
        CaseCalendar,
        SerotypeSplit,
    ) {
        let national = NationalSummary {
            year: 2023,
            total: 54_406,
            population: 129_713_690,
            rate: 41.94,
        };
        let states = StateBreakdown {
            year: 2023,
            national: national.clone(),
            rows: vec![
                StateRow {
                    entity: 30,
                    name: "Veracruz".into(),
                    female: 6_000,
                    male: 5_500,
                    total: 11_600,
                    population: 8_062_579,
                    rate: 143.87,
                },
                StateRow {
                    entity: 1,
                    name: "Aguascalientes".into(),
                    female: 3,
                    male: 4,
                    total: 7,
                    population: 1_425_607,
                    rate: 0.49,
                },
            ],
        };
        let infections = AgeSexProfile {
            year: 2023,
            measure: Measure::Infections,
            bands: Vec::new(),
            female_total: 28_000,
            male_total: 26_406,
        };
        let deaths = AgeSexProfile {
            year: 2023,
            measure: Measure::Deaths,
            bands: Vec::new(),
            female_total: 38,
            male_total: 42,
        };
        let calendar = CaseCalendar {
            year: 2023,
            days: Vec::new(),
            stats: CalendarStats {
                peak_day: Some((NaiveDate::from_ymd_opt(2023, 8, 9).unwrap(), 612)),
                peak_month: Some((7, 14_200)),
                total: 54_406,
                daily_mean: 149.06,
                out_of_year: 3,
                unparsed: 0,
            },
        };
        let serotypes = SerotypeSplit {
            year: 2023,
            cases: vec![
                SerotypeCount {
                    code: 1,
                    label: "DENV-1".into(),
                    total: 800,
                    percent: 40.0,
                },
                SerotypeCount {
                    code: 2,
                    label: "DENV-2".into(),
                    total: 1_200,
                    percent: 60.0,
                },
            ],
            case_total: 2_000,
            deaths: Vec::new(),
            death_total: 0,
        };
        (states, infections, deaths, calendar, serotypes)
    }

    #[test]
    fn report_covers_every_section() {
        let (states, infections, deaths, calendar, serotypes) = context_fixture();
        let context = ReportContext {
            year: 2023,
            source_name: "dengue_2023.csv",
            fingerprint: "0123456789abcdef",
            generated: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            states: &states,
            municipal: None,
            infections: &infections,
            deaths: &deaths,
            calendar: &calendar,
            serotypes: &serotypes,
            figures: Figures {
                state_map: Some("estatal_2023.svg".into()),
                municipal_map: None,
                age_sex: "edad_sexo_2023.svg".into(),
                deaths_age_sex: "defunciones_edad_sexo_2023.svg".into(),
                calendar: "calendario_2023.svg".into(),
                serotypes: "serotipos_2023.svg".into(),
            },
        };
        let body = render_report(&context);

        assert!(body.starts_with("# Dengue en México, 2023\n"));
        assert!(body.contains("**54,406 casos**"));
        assert!(body.contains("![Mapa estatal de incidencia](estatal_2023.svg)"));
        assert!(body.contains("| Veracruz"));
        // no municipal breakdown, no municipal section
        assert!(!body.contains("## Casos por municipio"));
        assert!(body.contains("![Tasa de infecciones por edad y sexo](edad_sexo_2023.svg)"));
        assert!(body.contains("Infecciones confirmadas: 28,000 en mujeres y 26,406 en hombres."));
        assert!(body.contains("Defunciones confirmadas: 38 en mujeres y 42 en hombres."));
        assert!(body.contains("el mes pico fue agosto"));
        assert!(body.contains("| DENV-2"));
        assert!(!body.contains("### Defunciones"));
        assert!(body.contains("huella `0123456789abcdef`"));
        assert!(body.contains("Generado el 15/01/2024"));
    }

}
