//! Layered configuration.
//!
//! Sources, later wins:
//!
//! 1. built-in defaults ([`Config::default`])
//! 2. user file: `<config_dir>/between/config.toml`
//! 3. project file: `./between.toml`, or an explicit `--config` path
//! 4. command-line flags (applied by the binary)
//!
//! ```toml
//! [engine]
//! kind = "auto"                    # dense | sparse | auto
//! sparse_density_threshold = 0.05  # auto picks sparse below this M / N²
//!
//! [output]
//! precision = 6
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::EngineKind;

/// File name looked up in the project directory.
pub const PROJECT_CONFIG_FILE: &str = "between.toml";

/// Largest accepted output precision.
pub const MAX_PRECISION: usize = 17;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub kind: EngineKind,
    #[serde(default = "default_sparse_density_threshold")]
    pub sparse_density_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            sparse_density_threshold: default_sparse_density_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

/// A partially specified config file. Absent keys leave lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverlay {
    #[serde(default)]
    pub engine: EngineOverlay,
    #[serde(default)]
    pub output: OutputOverlay,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineOverlay {
    pub kind: Option<EngineKind>,
    pub sparse_density_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputOverlay {
    pub precision: Option<usize>,
}

impl Config {
    /// Apply the keys present in `overlay` on top of `self`.
    pub fn apply(&mut self, overlay: &ConfigOverlay) {
        if let Some(kind) = overlay.engine.kind {
            self.engine.kind = kind;
        }
        if let Some(threshold) = overlay.engine.sparse_density_threshold {
            self.engine.sparse_density_threshold = threshold;
        }
        if let Some(precision) = overlay.output.precision {
            self.output.precision = precision;
        }
    }

    /// Reject values the pipeline cannot honor.
    ///
    /// # Errors
    ///
    /// Returns an error for a density threshold outside `[0, 1]` or a
    /// precision above [`MAX_PRECISION`].
    pub fn validate(&self) -> Result<()> {
        let threshold = self.engine.sparse_density_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            bail!("engine.sparse_density_threshold must be within [0, 1], got {threshold}");
        }
        if self.output.precision > MAX_PRECISION {
            bail!(
                "output.precision must be at most {MAX_PRECISION}, got {}",
                self.output.precision
            );
        }
        Ok(())
    }
}

/// Parse one config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid config TOML.
pub fn load_config_file(path: &Path) -> Result<ConfigOverlay> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ConfigOverlay>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Path of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("between/config.toml"))
}

/// Load the per-user config; missing file means no overrides.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigOverlay> {
    match user_config_path() {
        Some(path) if path.exists() => load_config_file(&path),
        _ => Ok(ConfigOverlay::default()),
    }
}

/// Load `between.toml` from `project_root`; missing file means no overrides.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ConfigOverlay> {
    let path = project_root.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(ConfigOverlay::default());
    }
    load_config_file(&path)
}

/// Resolve defaults, the user file, and the project (or explicit) file.
///
/// An explicit path must exist; the implicit files are optional.
///
/// # Errors
///
/// Returns an error if any consulted file is unreadable or invalid, or the
/// merged result fails [`Config::validate`].
pub fn resolve_config(project_root: &Path, explicit: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();
    config.apply(&load_user_config()?);

    let project = match explicit {
        Some(path) => load_config_file(path)?,
        None => load_project_config(project_root)?,
    };
    config.apply(&project);

    config.validate()?;
    Ok(config)
}

const fn default_sparse_density_threshold() -> f64 {
    0.05
}

const fn default_precision() -> usize {
    6
}
