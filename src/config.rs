//! Runtime configuration
//!
//! Loaded from TOML at startup. Every field has a default, so a missing
//! file (or a partial one) still yields a complete config.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::rays::GodRaysConfig;
use crate::tiles::TileSize;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub tiles: TileConfig,
    pub entrance: EntranceConfig,
    pub render: RenderConfig,
    pub rays: RaysConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub size: TileSize,
    /// How long a hovered cell stays highlighted.
    pub highlight_ms: u64,
    /// Background color transition length.
    pub transition_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntranceConfig {
    /// Start the entrance anyway after this long without font readiness.
    pub font_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Target frames per second.
    pub fps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaysConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub params: GodRaysConfig,
}

// ============================================================
// Defaults
// ============================================================

impl Default for TileConfig {
    fn default() -> Self {
        Self { size: TileSize::Md, highlight_ms: 2000, transition_ms: 2000 }
    }
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self { font_timeout_ms: 3000 }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

impl Default for RaysConfig {
    fn default() -> Self {
        Self { enabled: true, params: GodRaysConfig::default() }
    }
}

// ============================================================
// Accessors
// ============================================================

impl TileConfig {
    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

impl EntranceConfig {
    pub fn font_timeout(&self) -> Duration {
        Duration::from_millis(self.font_timeout_ms)
    }
}

impl RenderConfig {
    /// Time between frames. A zero fps is treated as 1.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

// ============================================================
// Loading
// ============================================================

impl FolioConfig {
    /// Load config from a TOML file.
    ///
    /// A missing file yields defaults. A file that exists but does not parse
    /// is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::parse(&content).map_err(|message| FolioError::config(path, message))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Write the current config as TOML.
    pub fn to_toml(&self) -> std::result::Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FolioConfig::default();
        assert_eq!(config.tiles.size, TileSize::Md);
        assert_eq!(config.tiles.highlight(), Duration::from_secs(2));
        assert_eq!(config.entrance.font_timeout(), Duration::from_secs(3));
        assert_eq!(config.render.fps, 60);
        assert!(config.rays.enabled);
        assert_eq!(config.rays.params, GodRaysConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = FolioConfig::parse(
            r#"
            [tiles]
            size = "lg"

            [rays]
            enabled = false
            speed = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.tiles.size, TileSize::Lg);
        assert_eq!(config.tiles.highlight_ms, 2000);
        assert!(!config.rays.enabled);
        assert_eq!(config.rays.params.speed, 2.0);
        assert_eq!(config.rays.params.density, 0.38);
    }

    #[test]
    fn test_frame_interval() {
        let render = RenderConfig { fps: 50 };
        assert_eq!(render.frame_interval(), Duration::from_millis(20));
        assert_eq!(RenderConfig { fps: 0 }.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = FolioConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tiles]\nsize = \"huge\"").unwrap();

        let err = FolioConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, FolioError::Config { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = FolioConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[tiles]"));
        assert_eq!(FolioConfig::parse(&text).unwrap(), config);
    }
}
