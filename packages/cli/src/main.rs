#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the OSM address cleaner.
//!
//! Uses `indicatif-log-bridge` (via [`osm_clean_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the element spinner never fight for the terminal.

mod output;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use osm_clean_address::{
    AddressProcessor, AddressTables, Diagnostics, DiagnosticsReport, StreetNameCleaner,
    ZipCodeTable,
};
use osm_clean_cli_utils::{IndicatifProgress, MultiProgress};
use osm_clean_osm::read_elements;

#[derive(Parser)]
#[command(name = "osm_clean", about = "OSM address cleaning tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean every address in an OSM extract and write JSON lines
    Process {
        /// OSM XML (`.osm`) or PBF (`.osm.pbf`) extract
        input: PathBuf,
        /// Postcode reference CSV with `zip_code`, `city`, and `state` columns
        #[arg(long)]
        zip_codes: PathBuf,
        /// Output path for JSON lines (default: `<INPUT>.json`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the diagnostics report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List street names whose suffix is not recognized, grouped by suffix
    Audit {
        /// OSM XML (`.osm`) or PBF (`.osm.pbf`) extract
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = osm_clean_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            zip_codes,
            output,
            report,
        } => {
            let output = output.unwrap_or_else(|| output::default_output_path(&input));
            process(&multi, &input, &zip_codes, &output, report.as_deref())?;
        }
        Commands::Audit { input } => audit(&multi, &input)?,
    }

    Ok(())
}

fn process(
    multi: &MultiProgress,
    input: &Path,
    zip_codes: &Path,
    output: &Path,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let tables = AddressTables::builtin()?;
    let processor = AddressProcessor::new(tables, ZipCodeTable::from_path(zip_codes)?);

    let file = File::create(output)
        .map_err(|e| format!("Failed to create {}: {e}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let mut diagnostics = Diagnostics::new();
    let mut write_error = None;

    let progress = IndicatifProgress::records_spinner(multi, "Cleaning addresses");
    let count = read_elements(input, progress.as_ref(), |mut element| {
        if write_error.is_some() {
            return;
        }
        processor.process_element(&mut element, &mut diagnostics);
        if let Err(e) = output::write_json_line(&mut writer, &element) {
            write_error = Some(e);
        }
    })?;

    if let Some(e) = write_error {
        return Err(format!("Failed to write {}: {e}", output.display()).into());
    }
    writer.flush()?;

    let report = DiagnosticsReport::build(&diagnostics, processor.zip_codes());
    log::info!(
        "Wrote {count} elements to {} in {:.1}s",
        output.display(),
        start.elapsed().as_secs_f64()
    );
    log::info!("{}", report.summary());

    if let Some(path) = report_path {
        let file = File::create(path)
            .map_err(|e| format!("Failed to create {}: {e}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        log::info!("Wrote diagnostics report to {}", path.display());
    }

    Ok(())
}

fn audit(multi: &MultiProgress, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let cleaner = StreetNameCleaner::new(AddressTables::builtin()?.suffixes.index());
    let mut diagnostics = Diagnostics::new();

    let progress = IndicatifProgress::records_spinner(multi, "Auditing street names");
    read_elements(input, progress.as_ref(), |element| {
        if let Some(street) = element.address.as_ref().and_then(|a| a.street.as_deref()) {
            cleaner.clean(street, &mut diagnostics);
        }
    })?;

    let stdout = std::io::stdout();
    output::write_unclassified(&mut stdout.lock(), &diagnostics)?;

    Ok(())
}
