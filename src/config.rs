//! Server configuration
//!
//! Values come from three layers, lowest priority first: command-line flags,
//! LSP `initializationOptions`, and environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::lsp::features::document_symbols::LEGACY_TAG_COLUMN_OFFSET;

pub const CLR_VERSION_ENV: &str = "ASPNET_LS_CLR_VERSION";

/// Target runtime version. Controls which expression forms are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClrVersion {
    Net1_1,
    Net2_0,
    #[default]
    Net4_0,
}

impl ClrVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClrVersion::Net1_1 => "1.1",
            ClrVersion::Net2_0 => "2.0",
            ClrVersion::Net4_0 => "4.0",
        }
    }
}

impl FromStr for ClrVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches(['v', 'V']).to_ascii_lowercase();
        match normalized.as_str() {
            "1.1" | "1" | "net11" => Ok(ClrVersion::Net1_1),
            "2.0" | "2" | "3.5" | "net20" | "net35" => Ok(ClrVersion::Net2_0),
            "4.0" | "4" | "4.5" | "net40" | "net45" => Ok(ClrVersion::Net4_0),
            _ => Err(format!("unknown CLR version '{}', expected 1.1, 2.0 or 4.0", s)),
        }
    }
}

impl TryFrom<String> for ClrVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClrVersion> for String {
    fn from(version: ClrVersion) -> Self {
        version.as_str().to_string()
    }
}

impl fmt::Display for ClrVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub clr_version: ClrVersion,
    /// Column shift applied to tag ranges in the outline.
    pub outline_tag_column_offset: u32,
    pub enable_parameter_insight: bool,
    pub type_index_paths: Vec<PathBuf>,
    pub use_bundled_index: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            clr_version: ClrVersion::default(),
            outline_tag_column_offset: LEGACY_TAG_COLUMN_OFFSET,
            enable_parameter_insight: true,
            type_index_paths: Vec::new(),
            use_bundled_index: true,
        }
    }
}

/// Subset of settings a client may send in `initializationOptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverrides {
    pub clr_version: Option<ClrVersion>,
    pub outline_tag_column_offset: Option<u32>,
    pub enable_parameter_insight: Option<bool>,
    pub type_index_paths: Option<Vec<PathBuf>>,
    pub use_bundled_index: Option<bool>,
}

impl ServerConfig {
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(version) = overrides.clr_version {
            self.clr_version = version;
        }
        if let Some(offset) = overrides.outline_tag_column_offset {
            self.outline_tag_column_offset = offset;
        }
        if let Some(enabled) = overrides.enable_parameter_insight {
            self.enable_parameter_insight = enabled;
        }
        if let Some(paths) = overrides.type_index_paths {
            self.type_index_paths.extend(paths);
        }
        if let Some(bundled) = overrides.use_bundled_index {
            self.use_bundled_index = bundled;
        }
    }

    /// Layers client options and then environment variables over `self`.
    ///
    /// # Arguments
    /// * `init_options` - The raw `initializationOptions` value, if any
    ///
    /// Malformed options are logged and ignored.
    pub fn from_env_or_default(&self, init_options: Option<&serde_json::Value>) -> Self {
        let mut config = self.clone();

        if let Some(value) = init_options {
            match serde_json::from_value::<ConfigOverrides>(value.clone()) {
                Ok(overrides) => {
                    debug!("Applying initialization options: {:?}", overrides);
                    config.apply(overrides);
                }
                Err(e) => warn!("Ignoring malformed initializationOptions: {}", e),
            }
        }

        if let Ok(value) = std::env::var(CLR_VERSION_ENV) {
            match value.parse() {
                Ok(version) => config.clr_version = version,
                Err(e) => warn!("Ignoring {}: {}", CLR_VERSION_ENV, e),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clr_version_parse() {
        assert_eq!("1.1".parse::<ClrVersion>(), Ok(ClrVersion::Net1_1));
        assert_eq!("v2.0".parse::<ClrVersion>(), Ok(ClrVersion::Net2_0));
        assert_eq!("net45".parse::<ClrVersion>(), Ok(ClrVersion::Net4_0));
        assert!("5.0".parse::<ClrVersion>().is_err());
        assert!(ClrVersion::Net2_0 < ClrVersion::Net4_0);
    }

    #[test]
    fn test_initialization_options_override_defaults() {
        let base = ServerConfig::default();
        let options = json!({
            "outlineTagColumnOffset": 0,
            "enableParameterInsight": false,
            "typeIndexPaths": ["/tmp/extra.typeindex.json"]
        });
        let config = base.from_env_or_default(Some(&options));
        assert_eq!(config.outline_tag_column_offset, 0);
        assert!(!config.enable_parameter_insight);
        assert_eq!(config.type_index_paths.len(), 1);
        assert!(config.use_bundled_index);
    }

    #[test]
    fn test_malformed_options_are_ignored() {
        let base = ServerConfig::default();
        let config = base.from_env_or_default(Some(&json!({ "clrVersion": "9.9" })));
        assert_eq!(config.outline_tag_column_offset, LEGACY_TAG_COLUMN_OFFSET);
    }
}
