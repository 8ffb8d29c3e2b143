//! Console summary tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dengue_cli::pipeline::{OutputStatus, ReportResult};
use dengue_model::{IssueSeverity, QualityReport};

pub fn print_summary(result: &ReportResult) {
    println!("Año: {}", result.year);
    println!("Fuente: {}", result.source_name);
    println!("Salida: {}", result.output_dir.display());
    println!(
        "Casos confirmados: {} (tasa nacional {:.2} por 100 mil)",
        result.confirmed_total, result.national_rate
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Producto"),
        header_cell("Archivo"),
        header_cell("Estado"),
    ]);
    apply_table_style(&mut table);
    for output in &result.outputs {
        let status_cell = match &output.status {
            OutputStatus::Written => Cell::new("escrito").fg(Color::Green),
            OutputStatus::DryRun => Cell::new("dry-run").fg(Color::Yellow),
            OutputStatus::Skipped(reason) => Cell::new(format!("omitido: {reason}"))
                .fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(output.label),
            Cell::new(&output.file_name),
            status_cell,
        ]);
    }
    println!("{table}");

    print_issue_table(&result.quality);
}

/// The quality issue table shared by `report` and `check`.
pub fn print_issue_table(report: &QualityReport) {
    if report.issues.is_empty() {
        println!(
            "Sin incidencias de calidad en {} ({} filas).",
            report.source, report.rows
        );
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Código"),
        header_cell("Severidad"),
        header_cell("Columna"),
        header_cell("Registros"),
        header_cell("Detalle"),
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(3) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    for issue in &report.issues {
        let severity_cell = match issue.severity {
            IssueSeverity::Error => Cell::new("error").fg(Color::Red),
            IssueSeverity::Warning => Cell::new("aviso").fg(Color::Yellow),
        };
        let count = issue
            .count
            .map(|count| count.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut detail = issue.message.clone();
        if !issue.samples.is_empty() {
            detail.push_str(&format!(" (ej. {})", issue.samples.join(", ")));
        }
        table.add_row(vec![
            Cell::new(&issue.code),
            severity_cell,
            Cell::new(issue.column.as_deref().unwrap_or("-")),
            Cell::new(count),
            Cell::new(detail),
        ]);
    }
    println!("{table}");
    println!(
        "{} errores, {} avisos en {} filas.",
        report.error_count(),
        report.warning_count(),
        report.rows
    );
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}
