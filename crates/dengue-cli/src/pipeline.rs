//! Report pipeline with explicit stages.
//!
//! The pipeline runs, in order:
//! 1. **Ingest**: resolve and read the year's case file
//! 2. **Validate**: data quality checks over the raw frame
//! 3. **References**: population tables and optional boundary files
//! 4. **Analyze**: the five report views
//! 5. **Render**: figures, the markdown report and the quality JSON
//!
//! Each stage takes the output of the previous one and returns typed
//! results; failures carry the stage context up through `anyhow`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use tracing::{info, info_span, warn};

use dengue_analysis::{
    AgeSexProfile, CaseCalendar, Measure, MunicipalBreakdown, MunicipalOptions, SerotypeSplit,
    StateBreakdown, age_sex_profile, case_calendar, municipal_breakdown, serotype_split,
    state_breakdown,
};
use dengue_assets::geo::{MUNICIPAL_KEY_PROPERTY, STATE_KEY_PROPERTY};
use dengue_assets::{
    AgePopulation, FeatureSet, MunicipalPopulation, StatePopulation, assets_root, load_features,
    paths,
};
use dengue_ingest::{CaseFrame, read_case_frame, resolve_year_file};
use dengue_model::{QualityReport, Sex};
use dengue_render::{
    Figures, ReportContext, render_age_sex, render_calendar, render_municipal_map,
    render_serotypes, render_state_map, write_report,
};
use dengue_validate::{run_checks, write_quality_json};

/// Everything the `report` command hands the pipeline.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub data_dir: PathBuf,
    pub year: Option<u16>,
    /// Default: `<data_dir>/reporte`.
    pub output_dir: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub municipal: MunicipalOptions,
    pub skip_maps: bool,
    pub dry_run: bool,
    pub strict: bool,
}

/// Status of one pipeline output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputStatus {
    Written,
    /// Analysis ran but nothing was written.
    DryRun,
    Skipped(&'static str),
}

#[derive(Debug, Clone)]
pub struct OutputFile {
    pub label: &'static str,
    pub file_name: String,
    pub status: OutputStatus,
}

/// What the pipeline produced, for the console summary.
#[derive(Debug)]
pub struct ReportResult {
    pub year: u16,
    pub source_name: String,
    pub output_dir: PathBuf,
    pub confirmed_total: u64,
    pub national_rate: f64,
    pub quality: QualityReport,
    pub outputs: Vec<OutputFile>,
    strict: bool,
}

impl ReportResult {
    /// Exit-code condition: quality errors always fail; warnings fail
    /// under `--strict`.
    pub fn has_errors(&self) -> bool {
        self.quality.has_errors() || (self.strict && self.quality.warning_count() > 0)
    }
}

struct References {
    states: StatePopulation,
    female: AgePopulation,
    male: AgePopulation,
    municipal: Option<MunicipalPopulation>,
    state_geo: Option<FeatureSet>,
    municipal_geo: Option<FeatureSet>,
}

struct Analysis {
    states: StateBreakdown,
    municipal: Option<MunicipalBreakdown>,
    infections: AgeSexProfile,
    deaths: AgeSexProfile,
    calendar: CaseCalendar,
    serotypes: SerotypeSplit,
}

/// Run the whole report pipeline for one year.
pub fn run_report(options: &ReportOptions) -> Result<ReportResult> {
    let frame = {
        let span = info_span!("ingest", data_dir = %options.data_dir.display());
        let _guard = span.enter();
        ingest(options)?
    };

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| options.data_dir.join("reporte"));

    let quality = {
        let span = info_span!("validate", year = frame.year);
        let _guard = span.enter();
        run_checks(&frame)
    };
    if quality.has_errors() {
        if !options.dry_run {
            let path = output_dir.join(format!("calidad_{}.json", frame.year));
            write_quality_json(&quality, &path)?;
        }
        bail!(
            "{} quality errors in {}; run `denguemx check {}` for details",
            quality.error_count(),
            frame.source_name(),
            options.data_dir.display(),
        );
    }

    let references = {
        let span = info_span!("references");
        let _guard = span.enter();
        load_references(options)?
    };

    let analysis = {
        let span = info_span!("analyze", year = frame.year);
        let _guard = span.enter();
        analyze(&frame, &references, options)?
    };

    let outputs = {
        let span = info_span!("render", output_dir = %output_dir.display());
        let _guard = span.enter();
        render(&frame, &quality, &references, &analysis, &output_dir, options)?
    };

    info!(
        year = frame.year,
        confirmed = analysis.states.national.total,
        outputs = outputs
            .iter()
            .filter(|o| o.status == OutputStatus::Written)
            .count(),
        "report pipeline finished"
    );

    Ok(ReportResult {
        year: frame.year,
        source_name: frame.source_name(),
        output_dir,
        confirmed_total: analysis.states.national.total,
        national_rate: analysis.states.national.rate,
        quality,
        outputs,
        strict: options.strict,
    })
}

/// Resolve and read the requested year file.
pub fn ingest(options: &ReportOptions) -> Result<CaseFrame> {
    let year_file = resolve_year_file(&options.data_dir, options.year)?;
    info!(year = year_file.year, path = %year_file.path.display(), "year file resolved");
    Ok(read_case_frame(&year_file.path, year_file.year)?)
}

fn load_references(options: &ReportOptions) -> Result<References> {
    let root = options.assets_dir.clone().unwrap_or_else(assets_root);

    let states = StatePopulation::load(&paths::state_population_path(&root))
        .context("load state population")?;
    let female = AgePopulation::load(&paths::age_population_path(&root, Sex::Female))
        .context("load female population")?;
    let male = AgePopulation::load(&paths::age_population_path(&root, Sex::Male))
        .context("load male population")?;

    let municipal = match MunicipalPopulation::load(&paths::municipal_population_path(&root)) {
        Ok(table) => {
            info!(municipalities = table.len(), "municipal population loaded");
            Some(table)
        }
        Err(error) if error.is_missing() => {
            warn!("municipal population table not found, skipping the municipal view");
            None
        }
        Err(error) => return Err(error).context("load municipal population"),
    };

    let state_geo = if options.skip_maps {
        None
    } else {
        load_optional_features(&paths::state_geo_path(&root), STATE_KEY_PROPERTY, "state")?
    };
    let municipal_geo = if options.skip_maps || municipal.is_none() {
        None
    } else {
        load_optional_features(
            &paths::municipal_geo_path(&root),
            MUNICIPAL_KEY_PROPERTY,
            "municipal",
        )?
    };

    Ok(References {
        states,
        female,
        male,
        municipal,
        state_geo,
        municipal_geo,
    })
}

fn load_optional_features(
    path: &Path,
    key_property: &str,
    kind: &'static str,
) -> Result<Option<FeatureSet>> {
    match load_features(path, key_property) {
        Ok(set) => {
            if set.skipped > 0 {
                warn!(kind, skipped = set.skipped, "boundary features dropped");
            }
            Ok(Some(set))
        }
        Err(error) if error.is_missing() => {
            warn!(kind, path = %path.display(), "boundary file not found, skipping the map");
            Ok(None)
        }
        Err(error) => Err(error).with_context(|| format!("load {kind} boundaries")),
    }
}

fn analyze(frame: &CaseFrame, references: &References, options: &ReportOptions) -> Result<Analysis> {
    let states = state_breakdown(frame, &references.states).context("state view")?;
    let municipal = references
        .municipal
        .as_ref()
        .map(|table| {
            municipal_breakdown(frame, table, &references.states, &options.municipal)
                .context("municipal view")
        })
        .transpose()?;
    let infections = age_sex_profile(
        frame,
        Measure::Infections,
        &references.female,
        &references.male,
    )
    .context("infections age/sex view")?;
    let deaths = age_sex_profile(frame, Measure::Deaths, &references.female, &references.male)
        .context("deaths age/sex view")?;
    let calendar = case_calendar(frame).context("calendar view")?;
    let serotypes = serotype_split(frame).context("serotype view")?;

    if calendar.stats.out_of_year > 0 {
        warn!(
            out_of_year = calendar.stats.out_of_year,
            "onset dates outside the report year were excluded"
        );
    }

    Ok(Analysis {
        states,
        municipal,
        infections,
        deaths,
        calendar,
        serotypes,
    })
}

fn render(
    frame: &CaseFrame,
    quality: &QualityReport,
    references: &References,
    analysis: &Analysis,
    output_dir: &Path,
    options: &ReportOptions,
) -> Result<Vec<OutputFile>> {
    let year = frame.year;
    let mut outputs = Vec::new();
    let dry_run = options.dry_run;

    let mut emit = |label: &'static str, file_name: String, status: OutputStatus| {
        outputs.push(OutputFile {
            label,
            file_name,
            status,
        });
    };

    let state_map_file = format!("estatal_{year}.svg");
    let state_map = match (&references.state_geo, options.skip_maps) {
        (_, true) => {
            emit("Mapa estatal", state_map_file, OutputStatus::Skipped("--skip-maps"));
            None
        }
        (None, _) => {
            emit(
                "Mapa estatal",
                state_map_file,
                OutputStatus::Skipped("sin archivo de límites"),
            );
            None
        }
        (Some(features), _) => {
            if !dry_run {
                render_state_map(&analysis.states, features, &output_dir.join(&state_map_file))?;
            }
            emit(
                "Mapa estatal",
                state_map_file.clone(),
                written_or_dry(dry_run),
            );
            Some(state_map_file)
        }
    };

    let municipal_map_file = format!("municipal_{year}.svg");
    let municipal_map = match (&analysis.municipal, &references.municipal_geo) {
        (Some(breakdown), Some(features)) if !options.skip_maps => {
            if !dry_run {
                render_municipal_map(
                    breakdown,
                    features,
                    references.state_geo.as_ref(),
                    &output_dir.join(&municipal_map_file),
                )?;
            }
            emit(
                "Mapa municipal",
                municipal_map_file.clone(),
                written_or_dry(dry_run),
            );
            Some(municipal_map_file)
        }
        (None, _) => {
            emit(
                "Mapa municipal",
                municipal_map_file,
                OutputStatus::Skipped("sin población municipal"),
            );
            None
        }
        _ => {
            emit(
                "Mapa municipal",
                municipal_map_file,
                OutputStatus::Skipped(if options.skip_maps {
                    "--skip-maps"
                } else {
                    "sin archivo de límites"
                }),
            );
            None
        }
    };

    let age_sex_file = format!("edad_sexo_{year}.svg");
    if !dry_run {
        render_age_sex(&analysis.infections, &output_dir.join(&age_sex_file))?;
    }
    emit("Edad y sexo", age_sex_file.clone(), written_or_dry(dry_run));

    let deaths_file = format!("defunciones_edad_sexo_{year}.svg");
    if !dry_run {
        render_age_sex(&analysis.deaths, &output_dir.join(&deaths_file))?;
    }
    emit("Defunciones", deaths_file.clone(), written_or_dry(dry_run));

    let calendar_file = format!("calendario_{year}.svg");
    if !dry_run {
        render_calendar(&analysis.calendar, &output_dir.join(&calendar_file))?;
    }
    emit("Calendario", calendar_file.clone(), written_or_dry(dry_run));

    let serotypes_file = format!("serotipos_{year}.svg");
    if !dry_run {
        render_serotypes(&analysis.serotypes, &output_dir.join(&serotypes_file))?;
    }
    emit("Serotipos", serotypes_file.clone(), written_or_dry(dry_run));

    let report_file = format!("reporte_{year}.md");
    if !dry_run {
        let source_name = frame.source_name();
        let context = ReportContext {
            year,
            source_name: &source_name,
            fingerprint: &frame.fingerprint,
            generated: Local::now().date_naive(),
            states: &analysis.states,
            municipal: analysis.municipal.as_ref(),
            infections: &analysis.infections,
            deaths: &analysis.deaths,
            calendar: &analysis.calendar,
            serotypes: &analysis.serotypes,
            figures: Figures {
                state_map,
                municipal_map,
                age_sex: age_sex_file,
                deaths_age_sex: deaths_file,
                calendar: calendar_file,
                serotypes: serotypes_file,
            },
        };
        write_report(&context, &output_dir.join(&report_file))?;
    }
    emit("Reporte", report_file, written_or_dry(dry_run));

    let quality_file = format!("calidad_{year}.json");
    if !dry_run {
        write_quality_json(quality, &output_dir.join(&quality_file))?;
    }
    emit("Calidad", quality_file, written_or_dry(dry_run));

    Ok(outputs)
}

fn written_or_dry(dry_run: bool) -> OutputStatus {
    if dry_run {
        OutputStatus::DryRun
    } else {
        OutputStatus::Written
    }
}
