// SPDX-License-Identifier: GPL-3.0-only

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Current on-disk config layout version
pub const CONFIG_VERSION: u32 = 1;

const CONFIG_DIR_NAME: &str = "qrscanner";
const CONFIG_FILE_NAME: &str = "config.json";

/// Barcode formats the decoder is asked to look for
///
/// Only QR codes can actually be decoded; the other switches are kept so a
/// config written for a full-featured scanner still round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeFormats {
    pub product_1d: bool,
    pub industrial_1d: bool,
    pub qr: bool,
    pub data_matrix: bool,
    pub aztec: bool,
    pub pdf417: bool,
}

impl Default for DecodeFormats {
    fn default() -> Self {
        Self {
            product_1d: true,
            industrial_1d: true,
            qr: true,
            data_matrix: true,
            aztec: false,
            pdf417: false,
        }
    }
}

impl DecodeFormats {
    /// Names of enabled formats the detector cannot handle
    pub fn unsupported_enabled(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.product_1d {
            names.push("1D product");
        }
        if self.industrial_1d {
            names.push("1D industrial");
        }
        if self.data_matrix {
            names.push("Data Matrix");
        }
        if self.aztec {
            names.push("Aztec");
        }
        if self.pdf417 {
            names.push("PDF417");
        }
        names
    }
}

/// Scanner behavior flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Ring the terminal bell when a code is decoded
    pub play_beep: bool,
    pub vibrate: bool,
    pub copy_to_clipboard: bool,
    pub auto_focus: bool,
    /// Invert luminance before detection (light-on-dark codes)
    pub invert_scan: bool,
    pub disable_continuous_focus: bool,
    pub disable_barcode_scene_mode: bool,
    pub disable_metering: bool,
    pub disable_exposure: bool,
    pub decode_formats: DecodeFormats,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            play_beep: true,
            vibrate: false,
            copy_to_clipboard: false,
            auto_focus: true,
            invert_scan: false,
            disable_continuous_focus: true,
            disable_barcode_scene_mode: true,
            disable_metering: true,
            disable_exposure: true,
            decode_formats: DecodeFormats::default(),
        }
    }
}

/// Colors and sizes of the viewfinder overlay (colors are 0xAARRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewfinderStyle {
    pub mask_color: u32,
    pub result_color: u32,
    pub possible_result_points_color: u32,
    pub frame_color: u32,
    pub laser_color: u32,
    /// Height of the scan line in display pixels
    pub slider_height: u32,
}

impl Default for ViewfinderStyle {
    fn default() -> Self {
        Self {
            mask_color: 0x6000_0000,
            result_color: 0xB000_0000,
            possible_result_points_color: 0xC0FF_BD21,
            frame_color: 0xFFFF_FFFF,
            laser_color: 0xFF33_CC33,
            slider_height: 2,
        }
    }
}

/// Physical display description used to size generated barcodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayMetrics {
    pub width_px: u32,
    pub height_px: u32,
    pub density_dpi: f32,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            width_px: 1080,
            height_px: 1920,
            density_dpi: 480.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub scan: ScanConfig,
    pub viewfinder: ViewfinderStyle,
    pub display: DisplayMetrics,
    /// Image file or directory scanned last
    pub last_scan_source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            scan: ScanConfig::default(),
            viewfinder: ViewfinderStyle::default(),
            display: DisplayMetrics::default(),
            last_scan_source: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config, falling back to defaults when missing or unreadable
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config");
                return Self::default();
            }
        };

        match serde_json::from_str::<Config>(&contents) {
            Ok(config) => {
                if config.version != CONFIG_VERSION {
                    info!(
                        found = config.version,
                        expected = CONFIG_VERSION,
                        "Config version differs, missing fields use defaults"
                    );
                }
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = Self::path().ok_or_else(|| AppError::Config("no config directory".into()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"scan": {"invert_scan": true}}"#).unwrap();
        assert!(config.scan.invert_scan);
        assert!(config.scan.play_beep);
        assert!(config.scan.decode_formats.qr);
        assert_eq!(config.viewfinder, ViewfinderStyle::default());
    }

    #[test]
    fn test_unsupported_formats_listed() {
        let formats = DecodeFormats {
            product_1d: false,
            industrial_1d: false,
            qr: true,
            data_matrix: false,
            aztec: true,
            pdf417: false,
        };
        assert_eq!(formats.unsupported_enabled(), vec!["Aztec"]);
    }
}
