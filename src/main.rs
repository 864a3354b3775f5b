use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod args;

use args::{Args, Command};
use zero_sense::config::AppConfig;
use zero_sense::gaze::{ratio_text, state_text, GazePipeline};
use zero_sense::gesture::GesturePipeline;
use zero_sense::landmarks::{load_face_sidecar, HandTrace, RecordedFaceSource, RecordedHandSource};
use zero_sense::logging::init_logging;
use zero_sense::overlay::FrameAnnotator;
use zero_sense::pipeline::Pipeline;
use zero_sense::types::GazeReading;

fn main() -> Result<()> {
    let args = Args::parse();

    // Config decides the real subscriber, so loading logs through a temporary one
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || AppConfig::load(&args.config))
        .with_context(|| format!("invalid configuration in {}", args.config.display()))?;

    init_logging(&config.logging);

    match &args.command {
        Command::Gesture { trace } => run_gesture(&config, trace, args.mirror),
        Command::Gaze { dir, debug_dir } => {
            let debug_dir = debug_dir
                .clone()
                .or_else(|| config.gaze.debug_overlay.then(|| dir.join("debug")));
            run_gaze(&config, dir, debug_dir.as_deref(), args.mirror)
        }
        Command::InitConfig => {
            config.save(&args.config)?;
            println!("Wrote configuration to {}", args.config.display());
            Ok(())
        }
    }
}

fn run_gesture(config: &AppConfig, trace_path: &Path, mirror: bool) -> Result<()> {
    let trace = HandTrace::load(trace_path)
        .with_context(|| format!("failed to load hand trace {}", trace_path.display()))?;
    let frame_count = trace.frames.len();
    // Recorded sources never look at pixels
    let frame = RgbImage::new(trace.width, trace.height);

    let source = RecordedHandSource::new(trace.frames).mirrored(mirror);
    let mut pipeline = GesturePipeline::new(source, &config.gesture);
    info!(pipeline = %pipeline.name(), frames = frame_count, "replaying hand trace");

    let mut fired = 0;
    for i in 0..frame_count {
        match pipeline.classify(&frame)? {
            Some(direction) => {
                fired += 1;
                println!("frame {:>4}: {}", i + 1, direction.label().green().bold());
            }
            None => println!("frame {:>4}: {}", i + 1, "-".dimmed()),
        }
    }

    info!(gestures = fired, "replay finished");
    Ok(())
}

fn run_gaze(config: &AppConfig, dir: &Path, debug_dir: Option<&Path>, mirror: bool) -> Result<()> {
    let frames = list_frames(dir)?;
    if let Some(out) = debug_dir {
        fs::create_dir_all(out)
            .with_context(|| format!("failed to create debug directory {}", out.display()))?;
    }

    let mut pipeline = GazePipeline::new(RecordedFaceSource::default(), &config.gaze);
    info!(pipeline = %pipeline.name(), frames = frames.len(), "replaying gaze frames");

    for path in &frames {
        let mut frame = image::open(path)
            .with_context(|| format!("failed to read frame {}", path.display()))?
            .to_rgb8();

        let sidecar = path.with_extension("json");
        let mut face = if sidecar.exists() {
            load_face_sidecar(&sidecar)
                .with_context(|| format!("failed to read landmarks {}", sidecar.display()))?
        } else {
            warn!(frame = %path.display(), "no landmark sidecar, treating as no face");
            None
        };

        if mirror {
            image::imageops::flip_horizontal_in_place(&mut frame);
            face = face.map(|f| f.mirrored(frame.width()));
        }
        pipeline.source_mut().push(face);

        let reading = match debug_dir {
            Some(out) => {
                let mut annotator = FrameAnnotator::new(frame.clone());
                let reading = pipeline.read_with_hook(&frame, &mut annotator)?;
                let name = path.file_name().context("frame path has no file name")?;
                annotator
                    .into_image()
                    .save(out.join(name))
                    .with_context(|| format!("failed to write annotated {}", path.display()))?;
                reading
            }
            None => pipeline.read(&frame)?,
        };

        print_gaze_status(path, reading.as_ref());
    }

    Ok(())
}

fn print_gaze_status(path: &Path, reading: Option<&GazeReading>) {
    let state = state_text(reading);
    let colored_state = match state {
        "left" => state.blue(),
        "center" => state.green(),
        "right" => state.truecolor(255, 165, 0),
        "closed" => state.red(),
        _ => state.truecolor(200, 200, 200),
    };
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    println!(
        "{:<20} Gaze: {:<10} Ratio: {}",
        name,
        colored_state.bold(),
        ratio_text(reading)
    );
}

/// `frame_*` images in `dir`, in name order
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_frame_image(p))
        .collect();
    frames.sort();
    Ok(frames)
}

fn is_frame_image(path: &Path) -> bool {
    let is_frame = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("frame_"));
    let is_image = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"));
    is_frame && is_image
}
