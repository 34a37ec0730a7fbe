//! px-resize: resize images to exact dimensions from the command line.

mod output;

use anyhow::Context;
use cachepx_image::{
    detect_format, inspect, FilterKind, ImageFormat, OutputPolicy, Resizer, ResizerConfig,
};
use clap::{Args, Parser, Subcommand};
use output::{format_ratio, format_size, Status};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "px-resize")]
#[command(about = "Resize images to exact dimensions at a given quality")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "CACHEPX_CONFIG")]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Encoding overrides shared by resize and fit.
#[derive(Args, Debug, Default)]
struct EncodeArgs {
    /// Output quality 0-100 (defaults to the configured quality)
    #[arg(short, long, allow_negative_numbers = true)]
    quality: Option<i32>,

    /// Output format (defaults to the output extension, then the input format)
    #[arg(long)]
    format: Option<ImageFormat>,

    /// Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3
    #[arg(long)]
    filter: Option<FilterKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize an image to exactly WIDTH x HEIGHT
    Resize {
        /// Input image
        input: PathBuf,
        /// Output path
        #[arg(short, long)]
        output: PathBuf,
        /// Target width in pixels
        #[arg(short = 'W', long, allow_negative_numbers = true)]
        width: i32,
        /// Target height in pixels
        #[arg(short = 'H', long, allow_negative_numbers = true)]
        height: i32,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Downsample an image to fit inside a box, keeping aspect ratio
    Fit {
        /// Input image
        input: PathBuf,
        /// Output path
        #[arg(short, long)]
        output: PathBuf,
        /// Maximum width in pixels
        #[arg(long, allow_negative_numbers = true)]
        max_width: i32,
        /// Maximum height in pixels
        #[arg(long, allow_negative_numbers = true)]
        max_height: i32,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Detect image format from file
    Detect {
        /// Path to image file
        path: PathBuf,
    },
    /// Show format, dimensions and size of an image
    Inspect {
        /// Path to image file
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "px_resize=debug,cachepx_image=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Resize { input, output, width, height, encode } => {
            let config = build_config(cli.config.as_deref(), &encode, &output)?;
            let quality = encode.quality.unwrap_or(config.default_quality.value().into());
            let data = read_input(&input)?;

            let result = Resizer::new(config).try_resize(&data, width, height, quality);
            Ok(exit_code(write_result(&data, result, &output)?))
        }

        Commands::Fit { input, output, max_width, max_height, encode } => {
            let config = build_config(cli.config.as_deref(), &encode, &output)?;
            let quality = encode.quality.unwrap_or(config.default_quality.value().into());
            let data = read_input(&input)?;

            let result = Resizer::new(config).fit(&data, max_width, max_height, quality);
            Ok(exit_code(write_result(&data, result, &output)?))
        }

        Commands::Detect { path } => {
            let data = read_input(&path)?;
            match detect_format(&data) {
                Ok(format) => {
                    println!("Format: {:?}", format);
                    println!("MIME: {}", format.mime_type());
                    println!("Extensions: {:?}", format.extensions());
                    println!("Resizable: {}", if format.can_decode() { "yes" } else { "no" });
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    Status::error(&e.to_string());
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Inspect { path, json } => {
            let data = read_input(&path)?;
            match inspect(&data) {
                Ok(info) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&info)?);
                    } else {
                        println!("Format: {:?}", info.format);
                        println!("Dimensions: {}x{}", info.width, info.height);
                        println!("Aspect Ratio: {:.2}", info.aspect_ratio());
                        println!("Size: {}", format_size(info.size_bytes as u64));
                        println!("Orientation: {}", info.orientation());
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    Status::error(&format!("Could not inspect {}: {}", path.display(), e));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Layer CLI overrides on top of the loaded configuration.
fn build_config(
    path: Option<&str>,
    encode: &EncodeArgs,
    output: &Path,
) -> anyhow::Result<ResizerConfig> {
    let mut config = ResizerConfig::load(path).context("Failed to load configuration")?;

    if let Some(filter) = encode.filter {
        config.filter = filter;
    }
    config.output = output_policy(encode.format, output, config.output);
    config.validate()?;

    tracing::debug!(?config, "effective configuration");
    Ok(config)
}

/// `--format` wins, then a recognised output extension, then the configured policy.
fn output_policy(format: Option<ImageFormat>, output: &Path, configured: OutputPolicy) -> OutputPolicy {
    if let Some(format) = format {
        return OutputPolicy::Fixed(format);
    }

    output
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)
        .map(OutputPolicy::Fixed)
        .unwrap_or(configured)
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Write a successful result and report it; returns whether anything was written.
fn write_result(
    input: &[u8],
    result: cachepx_image::Result<Vec<u8>>,
    output: &Path,
) -> anyhow::Result<bool> {
    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(kind = e.kind(), "resize rejected");
            Status::error(&format!("Resize failed ({}): {}", e.kind(), e));
            return Ok(false);
        }
    };

    std::fs::write(output, &bytes).with_context(|| format!("Failed to write {}", output.display()))?;

    let info = inspect(&bytes)?;
    Status::success(&format!(
        "Wrote {} ({}x{} {}, {})",
        output.display(),
        info.width,
        info.height,
        info.format,
        format_size(bytes.len() as u64)
    ));
    Status::info(&format!(
        "Size change: {} -> {} ({})",
        format_size(input.len() as u64),
        format_size(bytes.len() as u64),
        format_ratio(input.len() as u64, bytes.len() as u64)
    ));

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resize_with_negative_width() {
        let cli = Cli::parse_from([
            "px-resize", "resize", "in.jpg", "-o", "out.jpg", "-W", "-5", "-H", "10", "-q", "80",
        ]);
        match cli.command {
            Commands::Resize { width, height, encode, .. } => {
                assert_eq!((width, height), (-5, 10));
                assert_eq!(encode.quality, Some(80));
            }
            _ => panic!("expected resize"),
        }
    }

    #[test]
    fn test_parse_fit_with_negative_box() {
        let cli = Cli::parse_from([
            "px-resize", "fit", "in.png", "-o", "out.png", "--max-width", "-10", "--max-height", "-1",
        ]);
        match cli.command {
            Commands::Fit { max_width, max_height, .. } => {
                assert_eq!((max_width, max_height), (-10, -1));
            }
            _ => panic!("expected fit"),
        }
    }

    #[test]
    fn test_parse_format_and_filter() {
        let cli = Cli::parse_from([
            "px-resize", "fit", "in.png", "-o", "out", "--max-width", "100", "--max-height", "50",
            "--format", "webp", "--filter", "bilinear",
        ]);
        match cli.command {
            Commands::Fit { encode, .. } => {
                assert_eq!(encode.format, Some(ImageFormat::WebP));
                assert_eq!(encode.filter, Some(FilterKind::Triangle));
            }
            _ => panic!("expected fit"),
        }
    }

    #[test]
    fn test_output_policy_precedence() {
        let same = OutputPolicy::SameAsInput;
        assert_eq!(
            output_policy(Some(ImageFormat::Png), Path::new("a.jpg"), same),
            OutputPolicy::Fixed(ImageFormat::Png)
        );
        assert_eq!(
            output_policy(None, Path::new("a.JPG"), same),
            OutputPolicy::Fixed(ImageFormat::Jpeg)
        );
        assert_eq!(output_policy(None, Path::new("a.bin"), same), same);
        assert_eq!(output_policy(None, Path::new("noext"), same), same);
    }

    #[test]
    fn test_build_config_rejects_unencodable_extension() {
        let encode = EncodeArgs::default();
        assert!(build_config(None, &encode, Path::new("out.avif")).is_err());
        assert!(build_config(None, &encode, Path::new("out.png")).is_ok());
    }

    #[test]
    fn test_write_result_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        let output = tmp.path().join("out.png");

        let img = image::RgbImage::from_fn(8, 6, |x, y| image::Rgb([x as u8 * 30, y as u8 * 40, 90]));
        img.save(&source).unwrap();

        let config = build_config(None, &EncodeArgs::default(), &output).unwrap();
        let data = read_input(&source).unwrap();
        let written = write_result(&data, Resizer::new(config).try_resize(&data, 4, 3, 80), &output);
        assert!(written.unwrap());

        let info = inspect(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(info.format, ImageFormat::Png);
        assert_eq!((info.width, info.height), (4, 3));
    }

    #[test]
    fn test_write_result_reports_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.png");

        let result = Resizer::default().try_resize(b"", 4, 3, 80);
        assert!(!write_result(b"", result, &output).unwrap());
        assert!(!output.exists());
    }
}
