mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use app::{LaunchOptions, RustyMurmurApp};
use clap::Parser;
use data::dataset::Dataset;
use data::index::DEFAULT_RECORDING_INDEX;
use eframe::egui;

/// Heart-sound dataset viewer.
#[derive(Debug, Parser)]
#[command(name = "rusty-murmur", version, about)]
struct Cli {
    /// Dataset root containing `training_data/` and `training_data.csv`.
    root: Option<PathBuf>,

    /// Patient ID to load at start-up.
    #[arg(short, long)]
    patient: Option<String>,

    /// Valve to plot (defaults to the patient's first recording).
    #[arg(long, requires = "patient")]
    valve: Option<String>,

    /// Recording index at that valve [default: 0].
    #[arg(long, requires = "valve")]
    recording: Option<String>,

    /// Load every patient (or only `--patient`) without opening a window.
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.check {
        let root = cli.root.as_deref().context("--check needs a dataset root")?;
        return check(root, cli.patient.as_deref());
    }

    let launch = LaunchOptions {
        root: cli.root,
        patient: cli.patient,
        recording: recording_selection(cli.valve, cli.recording),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Murmur – Heart Sound Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyMurmurApp::new(launch)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}

/// `--valve` with `--recording`, falling back to the unsuffixed index.
fn recording_selection(valve: Option<String>, index: Option<String>) -> Option<(String, String)> {
    let index = index.unwrap_or_else(|| DEFAULT_RECORDING_INDEX.to_string());
    valve.map(|valve| (valve, index))
}

/// Build patient records headlessly, stopping at the first failure.
fn check(root: &Path, patient: Option<&str>) -> Result<()> {
    let dataset =
        Dataset::open(root).with_context(|| format!("opening dataset {}", root.display()))?;

    if let Some(id) = patient {
        let patient = dataset
            .get_patient(id)
            .with_context(|| format!("loading patient {id}"))?;
        print!("{patient}");
        return Ok(());
    }

    if dataset.is_empty() {
        bail!("no patients found under {}", root.display());
    }

    let mut loaded = 0usize;
    for result in &dataset {
        let patient = result.context("loading dataset")?;
        let seconds: f64 = patient
            .recordings
            .values()
            .flat_map(|by_index| by_index.values())
            .map(|r| r.duration())
            .sum();
        println!(
            "{}: {} recordings, {seconds:.1} s, murmur {}, outcome {}",
            patient.id,
            patient.recording_keys().count(),
            patient.metadata.murmur,
            patient.metadata.outcome
        );
        loaded += 1;
    }

    log::info!("Checked {loaded} patients");
    Ok(())
}
