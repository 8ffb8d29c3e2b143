//! One function per subcommand.

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use tracing::info_span;

use dengue_analysis::MunicipalOptions;
use dengue_assets::{FileStatus, assets_root, verify_assets};
use dengue_ingest::find_year_files;
use dengue_model::EntityId;
use dengue_validate::{run_checks, write_quality_json};

use dengue_cli::pipeline::{ReportOptions, ReportResult, ingest, run_report};

use crate::cli::{AssetsArgs, CheckArgs, ReportArgs, YearsArgs};

pub fn run_report_command(args: &ReportArgs) -> Result<ReportResult> {
    let options = ReportOptions {
        data_dir: args.data_dir.clone(),
        year: args.year,
        output_dir: args.output_dir.clone(),
        assets_dir: args.assets_dir.clone(),
        municipal: MunicipalOptions {
            min_cases: args.min_municipal_cases,
            top: args.top,
        },
        skip_maps: args.skip_maps,
        dry_run: args.dry_run,
        strict: args.strict,
    };
    run_report(&options)
}

/// Quality checks only; returns true when the exit code should be 1.
pub fn run_check(args: &CheckArgs) -> Result<bool> {
    let options = ReportOptions {
        data_dir: args.data_dir.clone(),
        year: args.year,
        output_dir: None,
        assets_dir: None,
        municipal: MunicipalOptions::default(),
        skip_maps: true,
        dry_run: true,
        strict: args.strict,
    };
    let frame = {
        let span = info_span!("ingest", data_dir = %args.data_dir.display());
        let _guard = span.enter();
        ingest(&options)?
    };
    let report = run_checks(&frame);
    if let Some(path) = &args.json {
        write_quality_json(&report, path).context("write quality JSON")?;
    }
    crate::summary::print_issue_table(&report);
    Ok(report.has_errors() || (args.strict && report.warning_count() > 0))
}

pub fn run_years(args: &YearsArgs) -> Result<()> {
    let files = find_year_files(&args.data_dir)?;
    if files.is_empty() {
        println!(
            "Sin archivos de año en {} (se esperan nombres como 2023.csv).",
            args.data_dir.display()
        );
        return Ok(());
    }
    for file in files {
        println!("{}  {}", file.year, file.path.display());
    }
    Ok(())
}

pub fn run_entities() {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Clave").fg(Color::Cyan),
        Cell::new("Entidad").fg(Color::Cyan),
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for entity in EntityId::states() {
        table.add_row(vec![
            Cell::new(format!("{:02}", entity.code())),
            Cell::new(entity.name().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

/// Verify manifest pins; returns true when the exit code should be 1.
pub fn run_assets_verify(args: &AssetsArgs) -> Result<bool> {
    let root = args.assets_dir.clone().unwrap_or_else(assets_root);
    let report = verify_assets(&root)?;
    for check in &report.checks {
        let status = match &check.status {
            FileStatus::Verified => "ok".to_string(),
            FileStatus::Missing => "falta".to_string(),
            FileStatus::Mismatch { expected, actual } => {
                format!("huella distinta (esperada {expected}, actual {actual})")
            }
        };
        println!("{}  {}  {}", check.path, check.role, status);
    }
    if report.ok() {
        println!("Activos verificados en {}.", report.root.display());
    } else {
        println!(
            "{} archivos fallaron la verificación en {}.",
            report.failure_count(),
            report.root.display()
        );
    }
    Ok(!report.ok())
}
