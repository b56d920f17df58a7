use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yolopost::io::{load_rgb_image, save_image};
use yolopost::{
    DecodeOptions, Detection, Detector, ImageView, LetterboxConfig, Pipeline, PipelineConfig,
    RawOutput, Size, SuppressParams, YoloPostError, YoloPostResult,
};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "yolopost CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LetterboxConfigJson {
    target_width: usize,
    target_height: usize,
    fill_value: u8,
    parallel: bool,
}

impl Default for LetterboxConfigJson {
    fn default() -> Self {
        let cfg = LetterboxConfig::default();
        Self {
            target_width: cfg.target.width,
            target_height: cfg.target.height,
            fill_value: cfg.fill_value,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    num_classes: Option<usize>,
    ymin_from_height: bool,
    parallel: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SuppressConfigJson {
    score_threshold: f32,
    iou_threshold: f32,
    top_k: usize,
    class_agnostic: bool,
}

impl Default for SuppressConfigJson {
    fn default() -> Self {
        let cfg = SuppressParams::default();
        Self {
            score_threshold: cfg.score_threshold,
            iou_threshold: cfg.iou_threshold,
            top_k: cfg.top_k,
            class_agnostic: cfg.class_agnostic,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    tensor_path: String,
    tensor_shape: Vec<usize>,
    output_path: Option<String>,
    letterboxed_path: Option<String>,
    source_coordinates: bool,
    letterbox: LetterboxConfigJson,
    decode: DecodeConfigJson,
    suppress: SuppressConfigJson,
}

impl Config {
    fn pipeline_config(&self) -> YoloPostResult<PipelineConfig> {
        Ok(PipelineConfig {
            letterbox: LetterboxConfig {
                target: Size::new(self.letterbox.target_width, self.letterbox.target_height)?,
                fill_value: self.letterbox.fill_value,
                parallel: self.letterbox.parallel,
            },
            decode: DecodeOptions {
                ymin_from_height: self.decode.ymin_from_height,
                parallel: self.decode.parallel,
            },
            suppress: SuppressParams {
                score_threshold: self.suppress.score_threshold,
                iou_threshold: self.suppress.iou_threshold,
                top_k: self.suppress.top_k,
                class_agnostic: self.suppress.class_agnostic,
            },
            num_classes: self.decode.num_classes,
        })
    }
}

/// Detector stand-in that replays a raw little-endian `f32` tensor dump.
struct TensorFileDetector {
    path: PathBuf,
    shape: Vec<usize>,
}

impl Detector for TensorFileDetector {
    fn infer(&mut self, input: ImageView<'_, u8>) -> YoloPostResult<RawOutput> {
        tracing::info!(
            width = input.width(),
            height = input.height(),
            "replaying tensor for letterboxed input"
        );
        let bytes = fs::read(&self.path).map_err(|err| YoloPostError::Inference {
            reason: format!("{}: {err}", self.path.display()),
        })?;
        if bytes.len() % 4 != 0 {
            return Err(YoloPostError::Inference {
                reason: format!("tensor file length {} is not a multiple of 4", bytes.len()),
            });
        }
        let data = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        RawOutput::from_shape(data, &self.shape)
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    index: usize,
    class_id: usize,
    score: f32,
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

impl From<Detection> for DetectionRecord {
    fn from(value: Detection) -> Self {
        Self {
            index: value.index,
            class_id: value.class_id,
            score: value.score,
            xmin: value.rect.xmin,
            ymin: value.rect.ymin,
            xmax: value.rect.xmax,
            ymax: value.rect.ymax,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    source_width: usize,
    source_height: usize,
    scale: f64,
    content_width: usize,
    content_height: usize,
    coordinates: &'static str,
    detections: Vec<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("yolopost=info".parse()?)
                    .add_directive("yolopost_cli=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() || config.tensor_path.is_empty() {
        return Err("image_path and tensor_path must be set in the config".into());
    }

    let pipeline = Pipeline::new(config.pipeline_config()?)?;
    let image = load_rgb_image(&config.image_path)?;
    let mut detector = TensorFileDetector {
        path: PathBuf::from(&config.tensor_path),
        shape: config.tensor_shape.clone(),
    };

    let frame = pipeline.run(&mut detector, image.view())?;
    tracing::info!(kept = frame.detections.len(), "suppression finished");

    if let Some(path) = &config.letterboxed_path {
        save_image(frame.letterboxed.image(), path)?;
    }

    let (coordinates, detections) = if config.source_coordinates {
        ("source", frame.source_detections())
    } else {
        ("letterboxed", frame.detections.clone())
    };
    let output = Output {
        source_width: frame.letterboxed.source_size().width,
        source_height: frame.letterboxed.source_size().height,
        scale: frame.letterboxed.scale(),
        content_width: frame.letterboxed.content_size().width,
        content_height: frame.letterboxed.content_size().height,
        coordinates,
        detections: detections.into_iter().map(DetectionRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
