// SPDX-License-Identifier: MPL-2.0
use clarifi_studio::application::{self, port::RemoteRequest, BatchItem, BatchOperation};
use clarifi_studio::config::{self, Config};
use clarifi_studio::domain::editing::{
    AdjustmentField, CropInsets, ExportQuality, FilterName, FlipAxis, ResizeRequest,
    RotationAngle, TransformOp,
};
use clarifi_studio::editor::{EditSession, ExportFlow, ImageSource, LoadMode, RemoteOutcome};
use clarifi_studio::error::{Error, Result};
use clarifi_studio::infrastructure::HttpProcessor;
use clarifi_studio::media::ExportFormat;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
Usage: clarifi-studio <input>... [options]

With several inputs, exactly one operation is applied to each file and
every result is written to the --output directory.

Geometry (applied in this order):
  --crop L,T,R,B         Trim pixels from each edge
  --resize WxH           Resize; either side may be omitted (e.g. 800x)
  --keep-aspect          Derive the omitted resize side from the aspect ratio
  --rotate DEG           Rotate clockwise by a multiple of 90
  --flip AXIS            horizontal | vertical

Adjustments (factors in 0..2, hue in -0.5..0.5):
  --brightness F  --contrast F  --saturation F  --hue F
  --filter NAME          none | grayscale | sepia | invert | blur | sharpen

Remote processing:
  --remote ENDPOINT      e.g. premium/auto-enhance or filter/cartoon
  --field NAME=VALUE     Extra form field for --remote (repeatable)

Output:
  --format FMT           png | jpeg | webp (default: from --output or config)
  --quality Q            JPEG quality in 0..1
  --target-kb N          Pick the best JPEG quality that fits N kilobytes
  --output PATH          Output file, or directory for several inputs
                         (default: <name>_<suffix>.<ext>)
  --config PATH          Read settings from PATH instead of the default location
";

#[derive(Debug, Default)]
struct Cli {
    inputs: Vec<PathBuf>,
    crop: Option<CropInsets>,
    resize: Option<ResizeRequest>,
    rotate: Option<i32>,
    flip: Option<FlipAxis>,
    brightness: Option<f32>,
    contrast: Option<f32>,
    saturation: Option<f32>,
    hue: Option<f32>,
    filter: Option<FilterName>,
    remote: Option<String>,
    fields: Vec<String>,
    format: Option<ExportFormat>,
    quality: Option<f32>,
    target_kb: Option<u64>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_resize(value: &str) -> Result<(Option<u32>, Option<u32>)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| Error::InvalidGeometry(format!("expected WxH, got '{value}'")))?;
    let side = |s: &str| -> Result<Option<u32>> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        s.parse::<u32>()
            .map(Some)
            .map_err(|e| Error::InvalidGeometry(format!("invalid resize side '{s}': {e}")))
    };
    Ok((side(w)?, side(h)?))
}

fn parse_args() -> std::result::Result<Option<Cli>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let keep_aspect = args.contains("--keep-aspect");
    let resize = args
        .opt_value_from_fn("--resize", parse_resize)?
        .map(|(width, height)| ResizeRequest {
            width,
            height,
            keep_aspect,
        });

    let mut cli = Cli {
        crop: args.opt_value_from_str("--crop")?,
        resize,
        rotate: args.opt_value_from_str("--rotate")?,
        flip: args.opt_value_from_str("--flip")?,
        brightness: args.opt_value_from_str("--brightness")?,
        contrast: args.opt_value_from_str("--contrast")?,
        saturation: args.opt_value_from_str("--saturation")?,
        hue: args.opt_value_from_str("--hue")?,
        filter: args.opt_value_from_str("--filter")?,
        remote: args.opt_value_from_str("--remote")?,
        fields: args.values_from_str("--field")?,
        format: args.opt_value_from_str("--format")?,
        quality: args.opt_value_from_str("--quality")?,
        target_kb: args.opt_value_from_str("--target-kb")?,
        output: args.opt_value_from_os_str("--output", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
        config: args.opt_value_from_os_str("--config", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
        inputs: Vec::new(),
    };

    for arg in args.finish() {
        if arg.to_string_lossy().starts_with('-') {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unknown option '{}'", arg.to_string_lossy()),
            });
        }
        cli.inputs.push(PathBuf::from(arg));
    }
    if cli.inputs.is_empty() {
        return Err(pico_args::Error::MissingArgument);
    }
    Ok(Some(cli))
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => config::load_from_path(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "using default settings");
            Config::default()
        }),
        None => {
            let (config, warning) = config::load();
            if let Some(warning) = warning {
                tracing::warn!(%warning, "settings file ignored");
            }
            config
        }
    }
}

fn remote_request(endpoint: &str, fields: &[String]) -> Result<RemoteRequest> {
    fields
        .iter()
        .try_fold(RemoteRequest::new(endpoint), |request, field| {
            let (name, value) = field.split_once('=').ok_or_else(|| {
                Error::UnknownOperation(format!("field '{field}' is not NAME=VALUE"))
            })?;
            Ok(request.with_field(name.trim(), value))
        })
}

impl Cli {
    fn has_local_edits(&self) -> bool {
        self.crop.is_some()
            || self.resize.is_some()
            || self.rotate.is_some()
            || self.flip.is_some()
            || self.brightness.is_some()
            || self.contrast.is_some()
            || self.saturation.is_some()
            || self.hue.is_some()
            || self.filter.is_some()
    }

    /// Export naming for a single input.
    fn flow(&self) -> ExportFlow {
        if self.target_kb.is_some() {
            ExportFlow::Compress
        } else if !self.has_local_edits()
            && self.remote.as_deref() == Some(RemoteRequest::remove_background().endpoint())
        {
            ExportFlow::RemoveBackground
        } else if !self.has_local_edits() && self.remote.is_none() {
            ExportFlow::Convert
        } else {
            ExportFlow::Edit
        }
    }

    /// The one operation a batch run applies.
    fn batch_operation(&self) -> Result<BatchOperation> {
        let mut operations = Vec::new();
        if let Some(insets) = self.crop {
            operations.push(BatchOperation::Transform(TransformOp::Crop(insets)));
        }
        if let Some(request) = self.resize {
            operations.push(BatchOperation::Transform(TransformOp::Resize(request)));
        }
        if let Some(degrees) = self.rotate {
            let angle = RotationAngle::from_degrees(degrees)?;
            operations.push(BatchOperation::Transform(TransformOp::Rotate(angle)));
        }
        if let Some(axis) = self.flip {
            operations.push(BatchOperation::Transform(TransformOp::Flip(axis)));
        }
        let sliders = [
            (AdjustmentField::Brightness, self.brightness),
            (AdjustmentField::Contrast, self.contrast),
            (AdjustmentField::Saturation, self.saturation),
            (AdjustmentField::Hue, self.hue),
        ];
        for (field, value) in sliders {
            if let Some(value) = value {
                operations.push(BatchOperation::Adjust(field, value));
            }
        }
        if let Some(filter) = self.filter {
            operations.push(BatchOperation::Filter(filter));
        }
        if let Some(endpoint) = self.remote.as_deref() {
            operations.push(BatchOperation::Remote(remote_request(endpoint, &self.fields)?));
        }

        match <[BatchOperation; 1]>::try_from(operations) {
            Ok([operation]) => Ok(operation),
            Err(operations) => Err(Error::UnknownOperation(format!(
                "batch needs exactly one operation, got {}",
                operations.len()
            ))),
        }
    }

    fn format(&self, config: &Config) -> ExportFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(ExportFormat::from_path))
            .unwrap_or_else(|| config.export_format())
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref());
    if cli.inputs.len() > 1 {
        run_batch(&cli, &config).await
    } else {
        run_single(&cli, &config).await
    }
}

async fn run_batch(cli: &Cli, config: &Config) -> Result<()> {
    let operation = cli.batch_operation()?;
    let format = cli.format.unwrap_or_else(|| config.export_format());
    let output_dir = cli.output.clone().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)?;

    let mut sources = Vec::with_capacity(cli.inputs.len());
    let mut unreadable = Vec::new();
    for input in &cli.inputs {
        match ImageSource::from_path(input) {
            Ok(source) => sources.push(source),
            Err(err) => unreadable.push(BatchItem {
                source: input.display().to_string(),
                outcome: Err(err),
            }),
        }
    }

    let processor = HttpProcessor::from_config(config)
        .map_err(|e| Error::RemoteProcessing(e.to_string()))?;
    let mut report = application::run_batch(config, &processor, sources, &operation, format).await;
    report.items.extend(unreadable);

    for item in &report.items {
        match &item.outcome {
            Ok(exported) => {
                let path = output_dir.join(&exported.filename);
                exported.save_to_file(&path)?;
                println!("{} -> {}", item.source, path.display());
            }
            Err(err) => println!("{}: {err}", item.source),
        }
    }
    println!("Processed {}/{}", report.succeeded(), report.total());

    if report.failed() > 0 {
        return Err(Error::Export(format!(
            "{} of {} images failed",
            report.failed(),
            report.total()
        )));
    }
    Ok(())
}

async fn run_single(cli: &Cli, config: &Config) -> Result<()> {
    let session = Mutex::new(EditSession::new(config));
    let input = cli
        .inputs
        .first()
        .ok_or_else(|| Error::UnknownOperation("no input file".into()))?;

    let source = ImageSource::from_path(input)?;
    application::load_image(&session, source, LoadMode::Fresh).await?;

    {
        let mut session = session.lock().await;
        if let Some(insets) = cli.crop {
            session.apply_transform(TransformOp::Crop(insets))?;
        }
        if let Some(request) = cli.resize {
            session.apply_transform(TransformOp::Resize(request))?;
        }
        if let Some(degrees) = cli.rotate {
            session.apply_transform(TransformOp::Rotate(RotationAngle::from_degrees(degrees)?))?;
        }
        if let Some(axis) = cli.flip {
            session.apply_transform(TransformOp::Flip(axis))?;
        }

        let now = std::time::Instant::now();
        let sliders = [
            (AdjustmentField::Brightness, cli.brightness),
            (AdjustmentField::Contrast, cli.contrast),
            (AdjustmentField::Saturation, cli.saturation),
            (AdjustmentField::Hue, cli.hue),
        ];
        for (field, value) in sliders {
            if let Some(value) = value {
                session.set_adjustment(field, value, now)?;
            }
        }
        session.commit_adjustments();

        if let Some(filter) = cli.filter {
            session.apply_filter_name(filter)?;
        }
    }

    if let Some(endpoint) = cli.remote.as_deref() {
        let request = remote_request(endpoint, &cli.fields)?;
        let processor = HttpProcessor::from_config(config)
            .map_err(|e| Error::RemoteProcessing(e.to_string()))?;
        if let RemoteOutcome::Stale = application::apply_remote(&session, &processor, request).await? {
            tracing::warn!("remote result arrived after the image changed");
        }
    }

    let session = session.lock().await;
    let format = cli.format(config);
    let exported = match cli.target_kb {
        Some(target_kb) => session.export_compressed(format, target_kb)?,
        None => {
            let quality = cli
                .quality
                .map_or_else(|| config.export_quality(), ExportQuality::new);
            session.export_for(&cli.flow(), format, quality)?
        }
    };
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&exported.filename));
    exported.save_to_file(&output)?;

    let status = session.status();
    println!(
        "{} ({}x{}, {} history entries, {} bytes)",
        output.display(),
        status.width,
        status.height,
        status.history_len,
        exported.bytes.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clarifi_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match parse_args() {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "editing failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
