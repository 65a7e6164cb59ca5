//! `digitpad-replay` - replay a recorded sketch through a session.
//!
//! ```text
//! digitpad-replay <events.json> [--settings settings.json] [--model model.json] [--png grid.png]
//! ```
//!
//! Events are a JSON array of `{"at_ms": 0, "phase": "began", "x": 50.0, "y": 50.0}`.
//! Without `--model` the classifier returns no scores, which still exercises
//! the whole pipeline and prints the normalized grid.

use anyhow::{Context, Result, bail};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use digitpad::classifier::{Classifier, InferenceError, LinearClassifier};
use digitpad::normalize::NormalizedGrid;
use digitpad::session::{ClassificationReport, DrawSession, TimedEvent};
use digitpad::settings::SketchSettings;
use digitpad::surface::ImageSurface;

/// Extra time allowed for offloaded classifications at the end of a replay
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

struct Args {
    events: PathBuf,
    settings: Option<PathBuf>,
    model: Option<PathBuf>,
    png: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut events = None;
    let mut settings = None;
    let mut model = None;
    let mut png = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => settings = Some(next_path(&mut args, "--settings")?),
            "--model" => model = Some(next_path(&mut args, "--model")?),
            "--png" => png = Some(next_path(&mut args, "--png")?),
            flag if flag.starts_with("--") => bail!("Unknown option {}", flag),
            path if events.is_none() => events = Some(PathBuf::from(path)),
            extra => bail!("Unexpected argument {}", extra),
        }
    }

    Ok(Args {
        events: events.context(
            "Usage: digitpad-replay <events.json> [--settings FILE] [--model FILE] [--png FILE]",
        )?,
        settings,
        model,
        png,
    })
}

fn next_path(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf> {
    args.next()
        .map(PathBuf::from)
        .with_context(|| format!("{} needs a path", flag))
}

fn load_classifier(model: Option<&PathBuf>) -> Result<Box<dyn Classifier>> {
    let classifier: Box<dyn Classifier> = match model {
        Some(path) => Box::new(
            LinearClassifier::load(path)
                .with_context(|| format!("Failed to load model {}", path.display()))?,
        ),
        None => Box::new(|_: &NormalizedGrid| Ok::<Vec<f32>, InferenceError>(Vec::new())),
    };
    Ok(classifier)
}

fn print_report(report: &ClassificationReport) {
    match report.display() {
        Some(text) => println!(
            "sketch {}: {} {}",
            report.generation,
            text.label,
            text.confidence.unwrap_or_default()
        ),
        None => println!("sketch {}: nothing to classify", report.generation),
    }
    if let Some(grid) = &report.grid {
        println!("{}\n", grid.to_ascii());
    }
}

fn main() -> Result<()> {
    digitpad::logging::init();
    let args = parse_args()?;

    let settings = match &args.settings {
        Some(path) => SketchSettings::load(path)
            .with_context(|| format!("Failed to load settings {}", path.display()))?,
        None => SketchSettings::default(),
    };

    let json = std::fs::read_to_string(&args.events)
        .with_context(|| format!("Failed to read {}", args.events.display()))?;
    let mut events: Vec<TimedEvent> =
        serde_json::from_str(&json).context("Failed to parse pointer events")?;
    events.sort_by_key(|e| e.at_ms);
    info!("Replaying {} pointer events", events.len());

    let surface = ImageSurface::new(settings.canvas_width, settings.canvas_height)
        .with_ink(settings.ink_color);
    let classifier = load_classifier(args.model.as_ref())?;
    let mut session =
        DrawSession::with_shared_classifier(surface, Arc::new(Mutex::new(classifier)), &settings);

    let start = Instant::now();
    let mut reports = Vec::new();
    for timed in &events {
        let now = start + Duration::from_millis(timed.at_ms);
        reports.extend(session.poll(now));
        session.handle(timed.event, now);
    }

    let end = events
        .last()
        .map_or(start, |e| start + Duration::from_millis(e.at_ms))
        + settings.settle_delay();
    reports.extend(session.poll(end));
    reports.extend(session.wait_for_classification(DRAIN_TIMEOUT));

    for report in &reports {
        print_report(report);
    }

    if let Some(path) = &args.png {
        let grid = reports
            .iter()
            .rev()
            .find_map(|r| r.grid.as_ref())
            .context("No grid was produced")?;
        grid.to_image()
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote grid preview to {}", path.display());
    }

    Ok(())
}
