use serde::{Deserialize, Serialize};

use crate::source::DEFAULT_MAX_SOURCE_BYTES;

// Serde default functions
const fn default_max_source_bytes() -> u64 {
    DEFAULT_MAX_SOURCE_BYTES
}

fn default_output_prefix() -> String {
    "resultado".to_string()
}

fn default_pdf_version() -> String {
    "1.5".to_string()
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maximum accepted size for either input file, in bytes
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: u64,

    /// Prefix for the generated output file name (`<prefix>_<date>.pdf`)
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// PDF version written into the composite document
    #[serde(default = "default_pdf_version")]
    pub pdf_version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: default_max_source_bytes(),
            output_prefix: default_output_prefix(),
            pdf_version: default_pdf_version(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })
    }

    /// Load from default locations (~/.config/pdf-refit/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("pdf-refit").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.max_source_bytes, 10 * 1024 * 1024);
        assert_eq!(config.output_prefix, "resultado");
        assert_eq!(config.pdf_version, "1.5");
    }

    #[test]
    fn test_partial_toml_uses_field_defaults() {
        let config: AppConfig = toml::from_str("output_prefix = \"combined\"").unwrap();
        assert_eq!(config.output_prefix, "combined");
        assert_eq!(config.max_source_bytes, 10 * 1024 * 1024);
    }
}
