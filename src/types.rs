//! Shared value types used by the compositor, the session layer, the config
//! file and the CLI.
//!
//! All of them round-trip through strings so they can appear in
//! `instafit.toml` and on the command line with the same spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 1080;
/// Output canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1350;

/// Base name of every exported file (extension depends on the format).
pub const EXPORT_STEM: &str = "instagram-1080x1350";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid color '{0}': expected #rgb or #rrggbb")]
    Color(String),
    #[error("invalid fit mode '{0}': expected none, cover or contain")]
    FitMode(String),
    #[error("invalid export format '{0}': expected png or jpeg")]
    ExportFormat(String),
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as lowercase `#rrggbb`, the form a color input reports.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Color(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            // #rgb expands each nibble: #f80 == #ff8800
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
                Ok(Self::new(
                    nibble(0).map_err(|_| err())?,
                    nibble(1).map_err(|_| err())?,
                    nibble(2).map_err(|_| err())?,
                ))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                Ok(Self::new(
                    byte(0).map_err(|_| err())?,
                    byte(2).map_err(|_| err())?,
                    byte(4).map_err(|_| err())?,
                ))
            }
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// How the source image's display size relates to the canvas.
///
/// - `None`: intrinsic size times the zoom factor.
/// - `Cover`: fill the canvas, cropping the overflowing axis.
/// - `Contain`: fit entirely inside the canvas, leaving margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    None,
    Cover,
    #[default]
    Contain,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::None => "none",
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FitMode::None),
            "cover" => Ok(FitMode::Cover),
            "contain" => Ok(FitMode::Contain),
            _ => Err(ParseError::FitMode(s.to_string())),
        }
    }
}

/// Encoded output format for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl ExportFormat {
    /// File extension used in the export file name.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png => f.write_str("png"),
            ExportFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" | "image/jpeg" => Ok(ExportFormat::Jpeg),
            _ => Err(ParseError::ExportFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Rgb
    // =========================================================================

    #[test]
    fn rgb_parses_long_hex() {
        assert_eq!("#0a141e".parse::<Rgb>().unwrap(), Rgb::new(10, 20, 30));
    }

    #[test]
    fn rgb_parses_short_hex() {
        assert_eq!("#f80".parse::<Rgb>().unwrap(), Rgb::new(255, 136, 0));
    }

    #[test]
    fn rgb_parse_is_case_insensitive() {
        assert_eq!("#FFaa00".parse::<Rgb>().unwrap(), Rgb::new(255, 170, 0));
    }

    #[test]
    fn rgb_rejects_missing_hash() {
        assert!("ffffff".parse::<Rgb>().is_err());
    }

    #[test]
    fn rgb_rejects_bad_length_and_digits() {
        assert!("#ffff".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
        assert!("#".parse::<Rgb>().is_err());
    }

    #[test]
    fn rgb_hex_is_zero_padded_lowercase() {
        assert_eq!(Rgb::new(10, 20, 30).to_hex(), "#0a141e");
        assert_eq!(Rgb::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn rgb_default_is_white() {
        assert_eq!(Rgb::default(), Rgb::WHITE);
    }

    // =========================================================================
    // FitMode / ExportFormat
    // =========================================================================

    #[test]
    fn fit_mode_parses_all_variants() {
        assert_eq!("none".parse::<FitMode>().unwrap(), FitMode::None);
        assert_eq!("Cover".parse::<FitMode>().unwrap(), FitMode::Cover);
        assert_eq!(" contain ".parse::<FitMode>().unwrap(), FitMode::Contain);
        assert!("stretch".parse::<FitMode>().is_err());
    }

    #[test]
    fn fit_mode_default_is_contain() {
        assert_eq!(FitMode::default(), FitMode::Contain);
    }

    #[test]
    fn export_format_extensions() {
        assert_eq!(ExportFormat::Png.extension(), "png");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn export_format_accepts_mime_and_short_names() {
        assert_eq!("image/png".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("jpg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("image/jpeg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert!("gif".parse::<ExportFormat>().is_err());
    }
}
