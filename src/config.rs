use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::descriptor::{Descriptor, DEFAULT_VOCAB_BASE, DEFAULT_VOCAB_PREFIX};
use crate::errors::{Result, SysGraphError};
use crate::index::CollisionPolicy;

/// Name of the configuration file.
pub const CONFIG_FILENAME: &str = "sysgraph.toml";

/// Name of the directory holding the user-level configuration.
pub const CONFIG_DIR: &str = "sysgraph";

/// Configuration for a transformation run.
///
/// Controls the address scheme, the collision policy, and which library
/// packages are left out of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Base URI every resource address starts with.
    pub base_uri: String,
    /// Optional path inserted between the base URI and the kind segment.
    pub rest_path: Option<String>,
    /// Prefix bound to the vocabulary namespace.
    pub vocab_prefix: String,
    /// Namespace of the vocabulary terms used as classes and predicates.
    pub vocab_base: String,
    /// What happens when two elements claim the same identity.
    pub collision_policy: CollisionPolicy,
    /// Packages that are not mapped, together with their contents.
    pub excluded_packages: Vec<String>,
    /// Extra vocabulary prefixes usable in meta-properties.
    pub prefixes: BTreeMap<String, String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            version: 1,
            base_uri: "http://localhost:8080/sysgraph".to_string(),
            rest_path: None,
            vocab_prefix: DEFAULT_VOCAB_PREFIX.to_string(),
            vocab_base: DEFAULT_VOCAB_BASE.to_string(),
            collision_policy: CollisionPolicy::LastWriteWins,
            excluded_packages: vec![
                "SysML".to_string(),
                "UML Standard Profile".to_string(),
                "MD Customization for SysML".to_string(),
                "QUDV Library".to_string(),
                "SI Definitions".to_string(),
                "SI Value Types".to_string(),
                "ISO-80000".to_string(),
            ],
            prefixes: BTreeMap::new(),
        }
    }
}

impl GraphConfig {
    /// Checks the configuration before any transformation starts.
    pub fn validate(&self) -> Result<()> {
        self.descriptor()?;
        if self.vocab_prefix.is_empty() {
            return Err(SysGraphError::Config {
                message: "vocab_prefix must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the address descriptor. Fails on a malformed base URI.
    pub fn descriptor(&self) -> Result<Descriptor> {
        let mut descriptor = Descriptor::new(&self.base_uri)?
            .with_vocabulary(&self.vocab_prefix, &self.vocab_base);
        if let Some(rest) = &self.rest_path {
            descriptor = descriptor.with_rest_path(rest);
        }
        Ok(descriptor)
    }
}

/// Returns the user-level configuration file path, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Looks for `sysgraph.toml` in `dir`, then in the user config directory.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let local = dir.join(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }
    user_config_path().filter(|p| p.is_file())
}

/// Loads the configuration from disk.
///
/// If the file does not exist, returns the default configuration.
pub fn load_config(path: &Path) -> Result<GraphConfig> {
    if !path.exists() {
        return Ok(GraphConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| SysGraphError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    let config: GraphConfig = toml::from_str(&contents).map_err(|e| SysGraphError::Config {
        message: format!("failed to parse config file '{}': {}", path.display(), e),
    })?;

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
pub fn save_config(path: &Path, config: &GraphConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SysGraphError::Config {
            message: format!(
                "failed to create config directory '{}': {}",
                parent.display(),
                e
            ),
        })?;
    }

    let tmp_path = path.with_extension("tmp");

    let text = toml::to_string_pretty(config).map_err(|e| SysGraphError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &text).map_err(|e| SysGraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, path).map_err(|e| SysGraphError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            path.display(),
            e
        ),
    })?;

    Ok(())
}
