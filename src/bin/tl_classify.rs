//! tl_classify - classify traffic light state in image files
//!
//! Verifies both model artifacts against their pinned checksums, loads the
//! detector and the color classifier once, then prints one label per image.

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use tl_classifier::{ClassifierConfig, ColorLabel, FrameReport};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image files to classify (JPEG or PNG).
    images: Vec<PathBuf>,
    /// Config file (JSON, or TOML by extension). Defaults to $TL_CONFIG.
    #[arg(long, env = "TL_CONFIG")]
    config: Option<PathBuf>,
    /// Print one JSON object per image instead of plain labels.
    #[arg(long)]
    json: bool,
    /// Only verify the model artifacts, then exit.
    #[arg(long)]
    verify_only: bool,
}

#[derive(Serialize)]
#[cfg_attr(not(feature = "backend-tract"), allow(dead_code))]
struct ImageResult<'a> {
    image: &'a str,
    label: ColorLabel,
    code: u8,
    report: &'a FrameReport,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = ClassifierConfig::load_from(args.config.as_deref())?;
    let detector_artifact = cfg.detector_artifact()?;
    let classifier_artifact = cfg.classifier_artifact()?;
    let detector_path = detector_artifact.ensure()?.to_path_buf();
    let classifier_path = classifier_artifact.ensure()?.to_path_buf();

    if args.verify_only {
        log::info!("model artifacts verified");
        return Ok(());
    }
    if args.images.is_empty() {
        return Err(anyhow!("no images given"));
    }

    run(&args, &cfg, detector_path, classifier_path)
}

#[cfg(feature = "backend-tract")]
fn run(
    args: &Args,
    cfg: &ClassifierConfig,
    detector_path: PathBuf,
    classifier_path: PathBuf,
) -> Result<()> {
    use anyhow::Context;
    use tl_classifier::{DoubleStageClassifier, Frame, TractClassifier, TractDetector};

    let (width, height) = cfg.detector_input;
    let detector = TractDetector::new(&detector_path, width, height)?;
    let classifier = TractClassifier::new(&classifier_path)?;
    let mut pipeline = DoubleStageClassifier::new(detector, classifier);
    pipeline.warm_up()?;

    for path in &args.images {
        let frame = Frame::open(path)?;
        let report = pipeline
            .classify_with_report(&frame)
            .with_context(|| format!("failed to classify {}", path.display()))?;
        print_result(args, path, &report)?;
    }
    Ok(())
}

#[cfg(not(feature = "backend-tract"))]
fn run(
    _args: &Args,
    _cfg: &ClassifierConfig,
    _detector_path: PathBuf,
    _classifier_path: PathBuf,
) -> Result<()> {
    Err(anyhow!(
        "tl_classify was built without an inference backend; rebuild with --features backend-tract"
    ))
}

#[cfg_attr(not(feature = "backend-tract"), allow(dead_code))]
fn print_result(args: &Args, path: &std::path::Path, report: &FrameReport) -> Result<()> {
    let image = path.display().to_string();
    if args.json {
        let line = serde_json::to_string(&ImageResult {
            image: &image,
            label: report.label,
            code: report.label.code(),
            report,
        })?;
        println!("{}", line);
    } else {
        println!("{}\t{}", image, report.label);
    }
    Ok(())
}
