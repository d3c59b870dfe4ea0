use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use skinfilter_core::detection::domain::face_detector::FaceDetector;
use skinfilter_core::detection::infrastructure::json_face_detector::JsonFaceDetector;
use skinfilter_core::pipeline::frame_processor::{FrameProcessor, OverloadPolicy, ProcessorConfig};
use skinfilter_core::pipeline::frame_smoothing_pipeline::FrameSmoothingPipeline;
use skinfilter_core::pipeline::infrastructure::threaded_frame_processor::ThreadedFrameProcessor;
use skinfilter_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use skinfilter_core::pipeline::region_order::BlendOrder;
use skinfilter_core::pipeline::smooth_image_use_case::SmoothImageUseCase;
use skinfilter_core::pipeline::smoothing_config::{SmoothingConfig, SmoothingScope};
use skinfilter_core::smoothing::infrastructure::gaussian_smoothing_filter::GaussianSmoothingFilter;
use skinfilter_core::video::infrastructure::image_file_source::{is_image, ImageFileSource};
use skinfilter_core::video::infrastructure::image_file_writer::{ImageFileWriter, OutputTarget};

/// Skin smoothing for detected face regions in images and frame sequences.
#[derive(Parser)]
#[command(name = "skin-filter")]
struct Cli {
    /// Input image, or a directory of frames.
    input: PathBuf,

    /// Output image, or a directory for the smoothed frames.
    output: PathBuf,

    /// JSON face detections: a list of regions, or an object keyed by frame index.
    #[arg(long)]
    detections: PathBuf,

    /// JSON smoothing config. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Smoothing strength (0.0-1.0).
    #[arg(long)]
    amount: Option<f64>,

    /// Radius multiplier k in k * face_width / 750.
    #[arg(long)]
    radius_scale: Option<f64>,

    /// Smoothing scope: region or frame.
    #[arg(long)]
    scope: Option<String>,

    /// Blend order for overlapping faces: detector or position.
    #[arg(long)]
    order: Option<String>,

    /// Keep eyes and lips sharp using landmark outlines.
    #[arg(long)]
    preserve_features: bool,

    /// Pass frames through without smoothing.
    #[arg(long)]
    disable: bool,

    /// Drop incoming frames while the worker is busy instead of waiting.
    #[arg(long)]
    drop_when_busy: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate(&cli)?;
    let config = build_config(&cli)?;

    let detector: Box<dyn FaceDetector> = Box::new(JsonFaceDetector::from_path(&cli.detections)?);
    let pipeline = FrameSmoothingPipeline::new(Box::new(GaussianSmoothingFilter::new()));

    if cli.input.is_dir() {
        let overload = if cli.drop_when_busy {
            OverloadPolicy::DropNewest
        } else {
            OverloadPolicy::Block
        };
        run_sequence(&cli.input, &cli.output, detector, pipeline, config, overload)
    } else {
        run_image(&cli.input, &cli.output, detector, pipeline, &config)
    }
}

fn run_image(
    input: &Path,
    output: &Path,
    detector: Box<dyn FaceDetector>,
    pipeline: FrameSmoothingPipeline,
    config: &SmoothingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = ImageFileSource::open(input)?;
    let writer = ImageFileWriter::new(OutputTarget::File(output.to_path_buf()));

    let mut use_case =
        SmoothImageUseCase::new(Box::new(source), detector, pipeline, Box::new(writer));
    use_case.execute(config)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_sequence(
    input: &Path,
    output: &Path,
    detector: Box<dyn FaceDetector>,
    pipeline: FrameSmoothingPipeline,
    config: SmoothingConfig,
    overload: OverloadPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = ImageFileSource::open(input)?;
    let mut writer = ImageFileWriter::new(OutputTarget::Directory(output.to_path_buf()));
    let mut logger = StdoutPipelineLogger::default();

    let stats = ThreadedFrameProcessor::new().run(
        Box::new(source),
        detector,
        pipeline,
        &mut writer,
        ProcessorConfig::new(config).with_overload(overload),
        &mut logger,
    )?;
    logger.summary();

    log::info!(
        "Wrote {} frame(s) to {} ({} dropped, {} failed)",
        stats.presented,
        output.display(),
        stats.dropped,
        stats.failed
    );
    Ok(())
}

fn build_config(cli: &Cli) -> Result<SmoothingConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => SmoothingConfig::load(path)?,
        None => SmoothingConfig::default(),
    };

    if let Some(amount) = cli.amount {
        config.amount = amount;
    }
    if let Some(radius_scale) = cli.radius_scale {
        config.radius_scale = radius_scale;
    }
    if let Some(scope) = &cli.scope {
        config.scope = SmoothingScope::parse(scope)?;
    }
    if let Some(order) = &cli.order {
        config.order = BlendOrder::parse(order)?;
    }
    if cli.preserve_features {
        config.preserve_features = true;
    }
    if cli.disable {
        config.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if !cli.detections.exists() {
        return Err(format!("Detections file not found: {}", cli.detections.display()).into());
    }
    if cli.input.is_dir() {
        if cli.output.is_file() {
            return Err(format!(
                "Output must be a directory when the input is a directory: {}",
                cli.output.display()
            )
            .into());
        }
    } else {
        if !is_image(&cli.input) {
            return Err(format!("Unsupported input format: {}", cli.input.display()).into());
        }
        if !is_image(&cli.output) {
            return Err(format!("Unsupported output format: {}", cli.output.display()).into());
        }
        if cli.drop_when_busy {
            return Err("--drop-when-busy only applies to frame directories".into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_frame(path: &Path, value: u8) {
        let img = image::RgbImage::from_pixel(64, 48, image::Rgb([value, value, value]));
        img.save(path).unwrap();
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("skin-filter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = cli(&[
            "in.png",
            "out.png",
            "--detections",
            "faces.json",
            "--amount",
            "0.5",
            "--scope",
            "frame",
            "--order",
            "position",
            "--preserve-features",
            "--disable",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.amount, 0.5);
        assert_eq!(config.scope, SmoothingScope::Frame);
        assert_eq!(config.order, BlendOrder::Position);
        assert!(config.preserve_features);
        assert!(!config.enabled);
        assert_eq!(config.radius_scale, 7.0);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("smoothing.json");
        std::fs::write(&config_path, r#"{"amount": 0.3, "radius_scale": 4.0}"#).unwrap();

        let cli = cli(&[
            "in.png",
            "out.png",
            "--detections",
            "faces.json",
            "--config",
            config_path.to_str().unwrap(),
            "--amount",
            "0.8",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.amount, 0.8);
        assert_eq!(config.radius_scale, 4.0);
    }

    #[test]
    fn test_flag_replaces_invalid_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("smoothing.json");
        std::fs::write(&config_path, r#"{"amount": 1.5}"#).unwrap();
        let base = [
            "in.png",
            "out.png",
            "--detections",
            "faces.json",
            "--config",
            config_path.to_str().unwrap(),
        ];

        assert!(build_config(&cli(&base)).is_err());

        let args: Vec<&str> = base.iter().copied().chain(["--amount", "0.5"]).collect();
        let config = build_config(&cli(&args)).unwrap();
        assert_eq!(config.amount, 0.5);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let base = ["in.png", "out.png", "--detections", "faces.json"];
        for extra in [["--amount", "1.5"], ["--scope", "face"], ["--order", "random"]] {
            let args: Vec<&str> = base.iter().chain(extra.iter()).copied().collect();
            assert!(build_config(&cli(&args)).is_err());
        }
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let cli = cli(&["/nonexistent/in.png", "out.png", "--detections", "faces.json"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_detections_flag_is_required() {
        assert!(Cli::try_parse_from(["skin-filter", "in.png", "out.png"]).is_err());
    }

    #[test]
    fn test_smooths_single_image() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        let detections = dir.path().join("faces.json");
        write_frame(&input, 90);
        std::fs::write(&detections, r#"[{"x": 0.25, "y": 0.25, "width": 0.5, "height": 0.5}]"#)
            .unwrap();

        run(cli(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--detections",
            detections.to_str().unwrap(),
        ]))
        .unwrap();

        let img = image::open(&output).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (64, 48));
    }

    #[test]
    fn test_smooths_frame_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("frames");
        let output = dir.path().join("smoothed");
        std::fs::create_dir(&input).unwrap();
        for (i, name) in ["a.png", "b.png", "c.png"].iter().enumerate() {
            write_frame(&input.join(name), 40 * i as u8);
        }
        let detections = dir.path().join("faces.json");
        std::fs::write(
            &detections,
            r#"{"1": [{"x": 0.2, "y": 0.2, "width": 0.4, "height": 0.5}]}"#,
        )
        .unwrap();

        run(cli(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--detections",
            detections.to_str().unwrap(),
        ]))
        .unwrap();

        for i in 0..3 {
            assert!(output.join(format!("frame_{i:06}.png")).exists());
        }
    }
}
