use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cave::CaveOptions;
use crate::crypto::kdf::DEFAULT_POW;
use crate::errors::{Result, SesameError};

/// User configuration, loaded from `.sesame.toml`.
///
/// Every field has a sensible default so Sesame works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the cave file.
    #[serde(default = "default_path")]
    pub path: String,

    /// Memory exponent for master and lock key derivation (default: 30 = 1 GiB).
    #[serde(default = "default_pow")]
    pub pow: u32,

    /// Directory for the lock file (default: the system temp dir).
    #[serde(default)]
    pub lock_dir: Option<String>,

    /// Print secrets instead of copying them to the clipboard.
    #[serde(default)]
    pub echo: bool,

    /// Use terse messages.
    #[serde(default)]
    pub quiet: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_path() -> String {
    ".".to_string()
}

fn default_pow() -> u32 {
    DEFAULT_POW
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            path: default_path(),
            pow: default_pow(),
            lock_dir: None,
            echo: false,
            quiet: false,
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = ".sesame.toml";

    /// Load settings from `<dir>/.sesame.toml`, falling back to the
    /// home directory and then to defaults.
    ///
    /// A file that exists but cannot be parsed is an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let candidates = [Some(dir.to_path_buf()), dirs::home_dir()];
        for base in candidates.into_iter().flatten() {
            let config_path = base.join(Self::FILE_NAME);
            if config_path.exists() {
                return Self::load_file(&config_path);
            }
        }
        Ok(Self::default())
    }

    /// Load settings from one specific file.
    pub fn load_file(config_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(config_path)?;

        toml::from_str(&contents).map_err(|e| {
            SesameError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// The lock directory, defaulting to the system temp dir.
    pub fn lock_dir(&self) -> PathBuf {
        self.lock_dir
            .as_ref()
            .map_or_else(std::env::temp_dir, PathBuf::from)
    }

    /// Convert into cave construction options.
    pub fn cave_options(&self) -> CaveOptions {
        CaveOptions {
            pow: self.pow,
            lock_dir: self.lock_dir(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
