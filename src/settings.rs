//! Game settings and preferences
//!
//! Persisted separately from leaderboards in LocalStorage (web) or a JSON file
//! (native). Settings are validated into a [`SessionConfig`] before a session
//! can use them.

use std::fmt;
use std::ops::RangeInclusive;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An opaque RGB colour token, stored as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    pub fn rgb(&self) -> u32 {
        self.0
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Self::from_rgb)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Default splash colours
pub const DEFAULT_PALETTE: [Color; 9] = [
    Color::from_rgb(0xFF4D6D),
    Color::from_rgb(0xFF8A00),
    Color::from_rgb(0xFFD700),
    Color::from_rgb(0x4CD964),
    Color::from_rgb(0x32BFBF),
    Color::from_rgb(0x4DA6FF),
    Color::from_rgb(0xA36BFF),
    Color::from_rgb(0xFF5CCB),
    Color::from_rgb(0xFFB84D),
];

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Session ===
    /// Durations offered in the selector (seconds)
    pub duration_options: Vec<u32>,
    /// Selected session duration (seconds)
    pub duration_secs: u32,

    // === Circles ===
    /// Smallest circle radius (px)
    pub min_size: f32,
    /// Largest circle radius (px)
    pub max_size: f32,
    /// Colours a circle is drawn from
    pub palette: Vec<Color>,
    /// Glitter speckles on top of circles (render-side decoration)
    pub glitter: bool,

    // === Player ===
    /// Name used for the last saved score, offered as the default next time
    pub last_player: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration_options: vec![10, 20, 30, 60],
            duration_secs: 30,

            min_size: 12.0,
            max_size: 110.0,
            palette: DEFAULT_PALETTE.to_vec(),
            glitter: true,

            last_player: None,
        }
    }
}

/// Validated session parameters
///
/// Only obtainable through [`Settings::validate`], so the duration is positive,
/// the size range is positive and ordered, and the palette is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    duration_secs: u32,
    min_size: f32,
    max_size: f32,
    palette: Vec<Color>,
}

impl SessionConfig {
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn duration_ms(&self) -> f64 {
        f64::from(self.duration_secs) * 1000.0
    }

    pub fn size_range(&self) -> RangeInclusive<f32> {
        self.min_size..=self.max_size
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

/// LocalStorage key
#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "circle_pop_settings";

/// Accept a stage size only if both extents are finite and positive
pub fn check_stage(stage: Vec2) -> Result<Vec2, ConfigError> {
    if stage.is_finite() && stage.x > 0.0 && stage.y > 0.0 {
        Ok(stage)
    } else {
        Err(ConfigError::InvalidStage {
            width: stage.x,
            height: stage.y,
        })
    }
}

impl Settings {
    /// Check the settings and build the config a session runs with
    pub fn validate(&self) -> Result<SessionConfig, ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::NonPositiveDuration(self.duration_secs));
        }
        if !self.duration_options.contains(&self.duration_secs) {
            return Err(ConfigError::DurationNotOffered {
                selected: self.duration_secs,
                offered: self.duration_options.clone(),
            });
        }

        let (min, max) = (self.min_size, self.max_size);
        // NaN fails both comparisons, so it lands here too
        if !(min > 0.0 && max > 0.0) || !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonPositiveSize { min, max });
        }
        if min > max {
            return Err(ConfigError::InvertedSizeRange { min, max });
        }

        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }

        Ok(SessionConfig {
            duration_secs: self.duration_secs,
            min_size: min,
            max_size: max,
            palette: self.palette.clone(),
        })
    }

    /// Select a different session duration (seconds)
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Remember a player name, ignoring blank input
    pub fn remember_player(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.last_player = Some(name.to_string());
        }
    }

    /// Load settings from LocalStorage (WASM only), falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        use crate::persistence::local_storage;

        match local_storage::get_item(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed stored settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings storage unavailable, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), crate::error::StorageError> {
        let json = serde_json::to_string(self)?;
        crate::persistence::local_storage::set_item(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), crate::error::StorageError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
