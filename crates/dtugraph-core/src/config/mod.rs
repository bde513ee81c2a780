//! Configuration management with file persistence
//!
//! The configuration seeds the initial view state and relayout policy. View
//! changes made at runtime are not written back here.

use anyhow::{Context, anyhow};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::Tier;
use crate::view::LayoutKind;

/// Dtugraph configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub relayout: RelayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub default_tiers: Vec<Tier>,
    /// Unknown layout names fall back to the default layout
    #[serde(deserialize_with = "deserialize_layout")]
    pub layout: LayoutKind,
    pub labels_visible: bool,
    pub controls_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayoutConfig {
    /// In-flight relayouts older than this are reported as failed
    pub timeout_ms: u64,
}

fn deserialize_layout<'de, D>(deserializer: D) -> Result<LayoutKind, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(LayoutKind::parse_or_default(&raw))
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_tiers: Tier::all().to_vec(),
            layout: LayoutKind::Force,
            labels_visible: true,
            controls_visible: true,
        }
    }
}

impl Default for RelayoutConfig {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("DTUGRAPH_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("dtugraph")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.relayout.timeout_ms == 0 {
            return Err(anyhow!("relayout.timeout_ms must be greater than zero"));
        }
        if self.view.default_tiers.is_empty() {
            return Err(anyhow!("view.default_tiers needs at least one tier"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "view.default_tiers" => Ok(self
                .view
                .default_tiers
                .iter()
                .map(Tier::as_str)
                .collect::<Vec<_>>()
                .join(", ")),
            "view.layout" => Ok(self.view.layout.to_string()),
            "view.labels_visible" => Ok(self.view.labels_visible.to_string()),
            "view.controls_visible" => Ok(self.view.controls_visible.to_string()),
            "relayout.timeout_ms" => Ok(self.relayout.timeout_ms.to_string()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `dtugraph config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "view.default_tiers" => {
                let mut tiers = Vec::new();
                for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    let tier: Tier = name.parse()?;
                    if !tiers.contains(&tier) {
                        tiers.push(tier);
                    }
                }
                if tiers.is_empty() {
                    return Err(anyhow!("At least one default tier is required"));
                }
                self.view.default_tiers = tiers;
            }
            "view.layout" => {
                self.view.layout = value.parse()?;
            }
            "view.labels_visible" => {
                self.view.labels_visible = value
                    .parse()
                    .with_context(|| format!("Invalid labels_visible value: {}", value))?;
            }
            "view.controls_visible" => {
                self.view.controls_visible = value
                    .parse()
                    .with_context(|| format!("Invalid controls_visible value: {}", value))?;
            }
            "relayout.timeout_ms" => {
                let timeout: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_ms value: {}", value))?;
                if timeout == 0 {
                    return Err(anyhow!("Relayout timeout must be greater than zero"));
                }
                self.relayout.timeout_ms = timeout;
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `dtugraph config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "view.default_tiers",
            "view.layout",
            "view.labels_visible",
            "view.controls_visible",
            "relayout.timeout_ms",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults by removing the file
    pub fn reset() -> anyhow::Result<()> {
        Self::reset_at(&Self::config_path()?)
    }

    pub fn reset_at(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
