use crate::crew::CrewPolicy;
use crate::error::{Result, RosterError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Menu used when the aircraft has none and no chef is aboard.
    #[serde(default = "default_standard_menu")]
    pub standard_menu: String,
    #[serde(default = "default_target_crew")]
    pub default_target_crew: u32,
    #[serde(default = "default_min_cabin_crew")]
    pub min_cabin_crew: u32,
    #[serde(default = "default_extra_chief_limit")]
    pub extra_chief_limit: u32,
    /// Fixed seed for menu and seat randomness. Unset means entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
    /// Flight, crew, and passenger data, relative to the project root.
    #[serde(default = "default_directory_file")]
    pub directory_file: PathBuf,
}

fn default_version() -> u32 {
    1
}

fn default_standard_menu() -> String {
    "Standard Airline Food".to_string()
}

fn default_target_crew() -> u32 {
    6
}

fn default_min_cabin_crew() -> u32 {
    3
}

fn default_extra_chief_limit() -> u32 {
    3
}

fn default_directory_file() -> PathBuf {
    PathBuf::from(paths::DIRECTORY_FILE)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            standard_menu: default_standard_menu(),
            default_target_crew: default_target_crew(),
            min_cabin_crew: default_min_cabin_crew(),
            extra_chief_limit: default_extra_chief_limit(),
            rng_seed: None,
            directory_file: default_directory_file(),
        }
    }
}

impl EngineConfig {
    pub fn policy(&self) -> CrewPolicy {
        CrewPolicy {
            default_target_crew: self.default_target_crew,
            min_cabin_crew: self.min_cabin_crew,
            extra_chief_limit: self.extra_chief_limit,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(RosterError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: EngineConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.min_cabin_crew == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "min_cabin_crew is 0: flights could depart without cabin crew".into(),
            });
        }
        if self.default_target_crew < self.min_cabin_crew.saturating_add(2) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "default_target_crew ({}) is below two pilots plus min_cabin_crew ({}); the cabin floor will apply",
                    self.default_target_crew, self.min_cabin_crew
                ),
            });
        }
        if self.standard_menu.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "standard_menu is empty".into(),
            });
        }

        warnings
    }
}
