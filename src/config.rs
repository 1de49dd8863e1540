//! Read-only application configuration
//!
//! Supplies the brush catalog, border defaults and the capture mode. The
//! core never writes configuration back to disk.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use crate::domain::{BrushPreset, ShapeColor};
use crate::export::SaveTarget;

/// Largest border the compositor will draw, in pixels
pub const MAX_BORDER_THICKNESS: i32 = 512;

/// Border colors used when the configured text does not parse
pub const FALLBACK_GRADIENT_START: ShapeColor = ShapeColor::argb(0xFF, 0x8B, 0x5C, 0xF6);
pub const FALLBACK_GRADIENT_END: ShapeColor = ShapeColor::argb(0xFF, 0xEC, 0x48, 0x99);

/// Ordered list of brush presets; never empty
#[derive(Debug, Clone, PartialEq)]
pub struct BrushCatalog {
    presets: Vec<BrushPreset>,
}

impl Default for BrushCatalog {
    fn default() -> Self {
        Self {
            presets: default_brushes(),
        }
    }
}

impl BrushCatalog {
    /// Build a catalog, falling back to the defaults when `presets` is empty
    pub fn new(presets: Vec<BrushPreset>) -> Self {
        if presets.is_empty() {
            log::warn!("Empty brush catalog, using defaults");
            return Self::default();
        }
        Self { presets }
    }

    pub fn presets(&self) -> &[BrushPreset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Preset at `index`, or the first one when out of range
    pub fn get(&self, index: usize) -> &BrushPreset {
        self.presets.get(index).unwrap_or(&self.presets[0])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.name == name)
    }
}

fn default_brushes() -> Vec<BrushPreset> {
    vec![
        BrushPreset::new("Red Accent", ShapeColor::rgb(0xFF, 0x00, 0x00), 4.0),
        BrushPreset::new("Fluorescent Cyan", ShapeColor::rgb(0x00, 0xE5, 0xFF), 4.0),
        BrushPreset::new("Bright Purple", ShapeColor::rgb(0x7B, 0x61, 0xFF), 4.0),
        BrushPreset::new("Black Thick Line", ShapeColor::rgb(0x00, 0x00, 0x00), 6.0),
    ]
}

/// Border settings as stored; colors stay text until turned into a [`BorderSpec`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    pub enabled: bool,
    pub thickness: i32,
    pub gradient_start: String,
    pub gradient_end: String,
    pub preset: String,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            thickness: 24,
            gradient_start: "#FF5B8DEF".to_string(),
            gradient_end: "#FF84A8FF".to_string(),
            preset: BorderPreset::Custom.name().to_string(),
        }
    }
}

impl BorderConfig {
    /// Resolve colors and clamp the thickness
    pub fn to_spec(&self) -> BorderSpec {
        BorderSpec {
            enabled: self.enabled,
            thickness_px: self.thickness.clamp(0, MAX_BORDER_THICKNESS),
            gradient_start: ShapeColor::parse_or(&self.gradient_start, FALLBACK_GRADIENT_START),
            gradient_end: ShapeColor::parse_or(&self.gradient_end, FALLBACK_GRADIENT_END),
            preset_name: self.preset.clone(),
        }
    }

    /// Overwrite thickness and colors with a named preset
    pub fn apply_preset(&mut self, preset: BorderPreset) {
        self.preset = preset.name().to_string();
        if let Some((thickness, start, end)) = preset.values() {
            self.thickness = thickness;
            self.gradient_start = start.to_string();
            self.gradient_end = end.to_string();
        }
    }
}

/// Resolved border parameters for the compositor
#[derive(Debug, Clone, PartialEq)]
pub struct BorderSpec {
    pub enabled: bool,
    pub thickness_px: i32,
    pub gradient_start: ShapeColor,
    pub gradient_end: ShapeColor,
    pub preset_name: String,
}

impl Default for BorderSpec {
    fn default() -> Self {
        BorderConfig::default().to_spec()
    }
}

/// Built-in border looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPreset {
    #[default]
    Custom,
    PurplePinkDream,
    RainbowSpectrum,
    MistyWhite,
    WarmOrangeGold,
    DarkNightBlue,
    FluorescentCyanPurple,
}

impl BorderPreset {
    pub const ALL: [BorderPreset; 7] = [
        BorderPreset::Custom,
        BorderPreset::PurplePinkDream,
        BorderPreset::RainbowSpectrum,
        BorderPreset::MistyWhite,
        BorderPreset::WarmOrangeGold,
        BorderPreset::DarkNightBlue,
        BorderPreset::FluorescentCyanPurple,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BorderPreset::Custom => "Custom",
            BorderPreset::PurplePinkDream => "Purple Pink Dream",
            BorderPreset::RainbowSpectrum => "Rainbow Spectrum",
            BorderPreset::MistyWhite => "Misty White",
            BorderPreset::WarmOrangeGold => "Warm Orange Gold",
            BorderPreset::DarkNightBlue => "Dark Night Blue",
            BorderPreset::FluorescentCyanPurple => "Fluorescent Cyan Purple",
        }
    }

    /// Unknown names map to `Custom`
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .unwrap_or_default()
    }

    /// Thickness and gradient colors; `None` for `Custom`
    pub fn values(self) -> Option<(i32, &'static str, &'static str)> {
        match self {
            BorderPreset::Custom => None,
            BorderPreset::PurplePinkDream => Some((40, "#FF8B5CF6", "#FFEC4899")),
            BorderPreset::RainbowSpectrum => Some((45, "#FF8B5CF6", "#FFFBBF24")),
            BorderPreset::MistyWhite => Some((36, "#FFFFFFFF", "#FFEFEFEF")),
            BorderPreset::WarmOrangeGold => Some((32, "#FFFF6B35", "#FFFBBF24")),
            BorderPreset::DarkNightBlue => Some((30, "#FF0F172A", "#FF1E293B")),
            BorderPreset::FluorescentCyanPurple => Some((35, "#FF06B6D4", "#FF8B5CF6")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory finished images are written to
    pub save_directory: PathBuf,
    /// File name with an optional `{yyyyMMdd_HHmmss}` timestamp token
    pub file_name_pattern: String,
    /// Whether to also copy the result to the clipboard
    pub copy_to_clipboard: bool,
    /// Open captures in the annotation editor instead of saving directly
    pub open_in_editor: bool,
    pub border: BorderConfig,
    pub brushes: Vec<BrushPreset>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            file_name_pattern: "screenshot_{yyyyMMdd_HHmmss}.png".to_string(),
            copy_to_clipboard: true,
            open_in_editor: false,
            border: BorderConfig::default(),
            brushes: default_brushes(),
        }
    }
}

/// Pictures directory used when no save directory is configured
pub(crate) fn default_save_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("framesnap")
}

impl AppConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "framesnap";

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:?}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn brush_catalog(&self) -> BrushCatalog {
        BrushCatalog::new(self.brushes.clone())
    }

    pub fn border_spec(&self) -> BorderSpec {
        self.border.to_spec()
    }

    pub fn save_target(&self) -> SaveTarget {
        SaveTarget {
            directory: self.save_directory.clone(),
            file_name_pattern: self.file_name_pattern.clone(),
            copy_to_clipboard: self.copy_to_clipboard,
        }
    }
}
