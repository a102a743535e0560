//! Tool configuration module.
//!
//! Handles loading, validating and merging `instafit.toml`. Stock defaults are
//! overridden by whatever keys the user file sets; everything else keeps its
//! default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [zoom]
//! min = 0.1                 # Smallest zoom factor the slider allows
//! max = 3.0                 # Largest zoom factor
//! step = 0.01               # Slider granularity
//!
//! [background]
//! color = "#ffffff"         # Canvas fill behind the image
//!
//! [render]
//! sampling = "bilinear"     # "bilinear" or "nearest"
//!
//! [export]
//! format = "png"            # "png" or "jpeg"
//! output_dir = "."          # Where exports are written
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [background]
//! color = "#101010"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::compositor::CompositorSettings;
use crate::imaging::{Sampling, ZoomRange};
use crate::types::{ExportFormat, Rgb};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILE_NAME: &str = "instafit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `instafit.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Zoom slider bounds.
    pub zoom: ZoomRange,
    /// Initial background color.
    pub background: BackgroundConfig,
    /// Resampling settings.
    pub render: RenderConfig,
    /// Export defaults.
    pub export: ExportConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if !(zoom.min.is_finite() && zoom.max.is_finite() && zoom.step.is_finite()) {
            return Err(ConfigError::Validation(
                "zoom values must be finite".into(),
            ));
        }
        if zoom.min <= 0.0 {
            return Err(ConfigError::Validation("zoom.min must be > 0".into()));
        }
        if zoom.max < zoom.min {
            return Err(ConfigError::Validation(
                "zoom.max must be >= zoom.min".into(),
            ));
        }
        if zoom.step <= 0.0 {
            return Err(ConfigError::Validation("zoom.step must be > 0".into()));
        }
        if self.export.output_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Compositor settings implied by this config.
    pub fn compositor_settings(&self) -> CompositorSettings {
        CompositorSettings {
            zoom: self.zoom,
            sampling: self.render.sampling,
            background: self.background.color,
        }
    }
}

/// Background fill settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    /// Color as `#rrggbb` or `#rgb`.
    pub color: Rgb,
}

/// Resampling settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub sampling: Sampling,
}

/// Export defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Directory exports are written to, relative to the working directory.
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            output_dir: ".".to_string(),
        }
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// Parse and validate the contents of an `instafit.toml`.
///
/// Every table and key is optional; whatever is missing keeps its default.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `instafit.toml` in the given directory.
///
/// A missing file yields the defaults. Unknown keys and out-of-range values
/// are errors.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        log::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
        return Ok(AppConfig::default());
    }
    let config = parse_config(&fs::read_to_string(&config_path)?)?;
    log::debug!("Loaded {}", config_path.display());
    Ok(config)
}

/// Returns a fully-commented stock `instafit.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# instafit configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Zoom slider
# ---------------------------------------------------------------------------
[zoom]
# Zoom factor bounds, applied on top of the fit mode.
min = 0.1
max = 3.0
# Values are snapped to min + k * step.
step = 0.01

# ---------------------------------------------------------------------------
# Background
# ---------------------------------------------------------------------------
[background]
# Fill behind the image, as #rrggbb or #rgb.
# `compose --auto-bg` replaces it with the image's average edge color.
color = "#ffffff"

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# "bilinear" (smooth) or "nearest" (hard pixels, good for pixel art).
sampling = "bilinear"

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# "png" (lossless, keeps transparency) or "jpeg" (quality 100).
format = "png"
# Output directory; the file is always named instagram-1080x1350.<ext>.
output_dir = "."
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.zoom, ZoomRange::default());
        assert_eq!(config.background.color, Rgb::WHITE);
        assert_eq!(config.render.sampling, Sampling::Bilinear);
        assert_eq!(config.export.format, ExportFormat::Png);
        assert_eq!(config.export.output_dir, ".");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[background]
color = "#101010"
"##;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.background.color, Rgb::new(16, 16, 16));
        // Defaults preserved
        assert_eq!(config.zoom.max, 3.0);
        assert_eq!(config.export.format, ExportFormat::Png);
    }

    #[test]
    fn parse_partial_zoom_table() {
        let toml = r#"
[zoom]
max = 5.0
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.zoom.max, 5.0);
        assert_eq!(config.zoom.min, 0.1);
    }

    #[test]
    fn parse_export_and_render() {
        let toml = r#"
[export]
format = "jpg"
output_dir = "out"

[render]
sampling = "nearest"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.export.format, ExportFormat::Jpeg);
        assert_eq!(config.export.output_dir, "out");
        assert_eq!(config.render.sampling, Sampling::Nearest);
    }

    #[test]
    fn bad_color_is_parse_error() {
        let toml = r#"
[background]
color = "white"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn compositor_settings_follow_config() {
        let mut config = AppConfig::default();
        config.background.color = Rgb::BLACK;
        config.render.sampling = Sampling::Nearest;
        let settings = config.compositor_settings();
        assert_eq!(settings.background, Rgb::BLACK);
        assert_eq!(settings.sampling, Sampling::Nearest);
        assert_eq!(settings.zoom, config.zoom);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.background.color, Rgb::WHITE);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r##"
[background]
color = "#123456"

[zoom]
step = 0.05
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.background.color, Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(config.zoom.step, 0.05);
        assert_eq!(config.zoom.min, 0.1);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[zoom]
min = 2.0
max = 1.0
"#,
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[zoom]
maximum = 3.0
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[canvas]\nwidth = 1\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_min() {
        let mut config = AppConfig::default();
        config.zoom.min = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("zoom.min"));
    }

    #[test]
    fn validate_rejects_zero_step() {
        let mut config = AppConfig::default();
        config.zoom.step = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_nan() {
        let mut config = AppConfig::default();
        config.zoom.max = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_output_dir() {
        let mut config = AppConfig::default();
        config.export.output_dir = "  ".into();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // parse_config / stock_config_toml tests
    // =========================================================================

    #[test]
    fn parse_config_validates() {
        let result = parse_config("[zoom]\nstep = -1.0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn parse_config_empty_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.zoom, ZoomRange::default());
        assert_eq!(config.export.output_dir, ".");
    }

    #[test]
    fn load_config_sparse_section_keeps_sibling_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "[export]\nformat = \"jpeg\"\n").unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.export.format, ExportFormat::Jpeg);
        assert_eq!(config.export.output_dir, ".");
        assert_eq!(config.background.color, Rgb::WHITE);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.zoom, ZoomRange::default());
        assert_eq!(config.background.color, Rgb::WHITE);
        assert_eq!(config.render.sampling, Sampling::Bilinear);
        assert_eq!(config.export.format, ExportFormat::Png);
        assert_eq!(config.export.output_dir, ".");
    }
}
