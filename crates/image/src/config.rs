//! Resizer configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! yields [`ResizerConfig::default`].
//!
//! ```toml
//! filter = "lanczos3"
//! output = "same-as-input"      # or { fixed = "jpeg" }
//! quality_policy = "clamp"      # or "reject"
//! default_quality = 85
//! background = [255, 255, 255]
//!
//! [limits]
//! max_width = 16384
//! max_height = 16384
//! max_alloc = 536870912
//! ```

use crate::{ImageFormat, Quality, QualityPolicy, ResizeError, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resampling filter applied when changing dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Nearest neighbour
    Nearest,
    /// Bilinear
    Triangle,
    /// Bicubic (Catmull-Rom)
    CatmullRom,
    /// Gaussian
    Gaussian,
    /// Lanczos with window 3
    #[default]
    Lanczos3,
}

impl FilterKind {
    pub(crate) fn filter_type(self) -> FilterType {
        match self {
            FilterKind::Nearest => FilterType::Nearest,
            FilterKind::Triangle => FilterType::Triangle,
            FilterKind::CatmullRom => FilterType::CatmullRom,
            FilterKind::Gaussian => FilterType::Gaussian,
            FilterKind::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl std::str::FromStr for FilterKind {
    type Err = ResizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(FilterKind::Nearest),
            "triangle" | "bilinear" => Ok(FilterKind::Triangle),
            "catmull-rom" | "catmullrom" | "bicubic" => Ok(FilterKind::CatmullRom),
            "gaussian" => Ok(FilterKind::Gaussian),
            "lanczos3" | "lanczos" => Ok(FilterKind::Lanczos3),
            other => Err(ResizeError::Config(format!("unknown filter: {other}"))),
        }
    }
}

/// Which family the resized image is encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputPolicy {
    /// Re-encode in the family detected from the input.
    #[default]
    SameAsInput,
    /// Always encode in one family.
    Fixed(ImageFormat),
}

impl OutputPolicy {
    /// Resolve the output family for a given input family.
    pub fn resolve(self, input: ImageFormat) -> ImageFormat {
        match self {
            OutputPolicy::SameAsInput => input,
            OutputPolicy::Fixed(format) => format,
        }
    }
}

/// Size and allocation ceilings for decoding and resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeLimits {
    /// Maximum source or target width
    #[serde(default = "default_max_edge")]
    pub max_width: u32,

    /// Maximum source or target height
    #[serde(default = "default_max_edge")]
    pub max_height: u32,

    /// Maximum bytes for a single decode, and for the RGBA8 output raster
    /// (`width * height * 4`) checked before decoding.
    ///
    /// The resampler's floating-point intermediate buffer is not counted, so
    /// peak memory for a request near this limit can be a few times higher.
    #[serde(default = "default_max_alloc")]
    pub max_alloc: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_width: default_max_edge(),
            max_height: default_max_edge(),
            max_alloc: default_max_alloc(),
        }
    }
}

impl DecodeLimits {
    pub(crate) fn to_codec_limits(self) -> image::io::Limits {
        let mut limits = image::io::Limits::default();
        limits.max_image_width = Some(self.max_width);
        limits.max_image_height = Some(self.max_height);
        limits.max_alloc = Some(self.max_alloc);
        limits
    }
}

fn default_max_edge() -> u32 {
    16_384
}

fn default_max_alloc() -> u64 {
    512 * 1024 * 1024
}

/// Configuration for a [`crate::Resizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizerConfig {
    /// Resampling filter
    #[serde(default)]
    pub filter: FilterKind,

    /// Output family policy
    #[serde(default)]
    pub output: OutputPolicy,

    /// Handling of out-of-range quality values
    #[serde(default)]
    pub quality_policy: QualityPolicy,

    /// Quality used by callers that do not supply one
    #[serde(default)]
    pub default_quality: Quality,

    /// Background (RGB) that alpha is flattened onto for JPEG output
    #[serde(default = "default_background")]
    pub background: [u8; 3],

    /// Decode and raster limits
    #[serde(default)]
    pub limits: DecodeLimits,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            filter: FilterKind::default(),
            output: OutputPolicy::default(),
            quality_policy: QualityPolicy::default(),
            default_quality: Quality::default(),
            background: default_background(),
            limits: DecodeLimits::default(),
        }
    }
}

fn default_background() -> [u8; 3] {
    [255, 255, 255]
}

const CONFIG_CANDIDATES: [&str; 3] = [".cachepx.toml", "cachepx.toml", ".config/cachepx.toml"];

impl ResizerConfig {
    /// Load configuration from a file path, a standard location, or defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        match config_path {
            Some(p) => Self::from_file(&p),
            None => Ok(Self::default()),
        }
    }

    /// Load and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResizeError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ResizeError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded resizer config");
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that make every request fail.
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.max_width == 0 || limits.max_height == 0 || limits.max_alloc == 0 {
            return Err(ResizeError::Config("limits must be non-zero".into()));
        }
        if let OutputPolicy::Fixed(format) = self.output {
            if !format.can_encode() {
                return Err(ResizeError::Config(format!(
                    "no encoder available for fixed output format {format}"
                )));
            }
        }
        Ok(())
    }
}

fn find_config_file() -> Option<String> {
    CONFIG_CANDIDATES
        .iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(|candidate| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = ResizerConfig::default();
        assert_eq!(config.filter, FilterKind::Lanczos3);
        assert_eq!(config.output, OutputPolicy::SameAsInput);
        assert_eq!(config.quality_policy, QualityPolicy::Clamp);
        assert_eq!(config.background, [255, 255, 255]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: ResizerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ResizerConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let config: ResizerConfig = toml::from_str(
            r#"
            filter = "triangle"
            output = { fixed = "jpeg" }
            quality_policy = "reject"
            default_quality = 70
            background = [0, 0, 0]

            [limits]
            max_width = 2048
            "#,
        )
        .unwrap();

        assert_eq!(config.filter, FilterKind::Triangle);
        assert_eq!(config.output, OutputPolicy::Fixed(ImageFormat::Jpeg));
        assert_eq!(config.quality_policy, QualityPolicy::Reject);
        assert_eq!(config.default_quality.value(), 70);
        assert_eq!(config.limits.max_width, 2048);
        assert_eq!(config.limits.max_height, 16_384);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "filter = \"nearest\"").unwrap();

        let config = ResizerConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.filter, FilterKind::Nearest);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = ResizerConfig::load(Some("/nonexistent/cachepx.toml")).unwrap_err();
        assert!(matches!(err, ResizeError::Config(_)));
    }

    #[test]
    fn test_fixed_output_without_encoder_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output = {{ fixed = \"avif\" }}").unwrap();

        let err = ResizerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ResizeError::Config(_)));
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("bilinear".parse::<FilterKind>().unwrap(), FilterKind::Triangle);
        assert_eq!("Lanczos3".parse::<FilterKind>().unwrap(), FilterKind::Lanczos3);
        assert!("box".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_output_policy_resolve() {
        assert_eq!(OutputPolicy::SameAsInput.resolve(ImageFormat::Png), ImageFormat::Png);
        assert_eq!(
            OutputPolicy::Fixed(ImageFormat::Jpeg).resolve(ImageFormat::Png),
            ImageFormat::Jpeg
        );
    }
}
