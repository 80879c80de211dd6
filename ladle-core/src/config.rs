//! Extraction configuration from environment variables.

use std::env;

use crate::error::ConfigError;

pub const SCAN_ALL_SCRIPTS_VAR: &str = "LADLE_SCAN_ALL_SCRIPTS";
pub const SANITIZE_JSON_VAR: &str = "LADLE_SANITIZE_JSON";
pub const PAGE_FALLBACKS_VAR: &str = "LADLE_PAGE_FALLBACKS";

/// Knobs for [`crate::extract_recipe_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Try every JSON-LD script in document order instead of only the first.
    pub scan_all_scripts: bool,
    /// Escape raw control characters inside JSON strings before decoding.
    pub sanitize_json: bool,
    /// Fill `source_url` and `image_url` from the page head when the
    /// JSON-LD node has neither.
    pub page_fallbacks: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            scan_all_scripts: false,
            sanitize_json: true,
            page_fallbacks: true,
        }
    }
}

impl ExtractConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `LADLE_SCAN_ALL_SCRIPTS`: Try every JSON-LD script (default: false)
    /// - `LADLE_SANITIZE_JSON`: Escape control characters in strings (default: true)
    /// - `LADLE_PAGE_FALLBACKS`: Use canonical/og tags for missing fields (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`ExtractConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let scan_all_scripts =
            read_bool(&lookup, SCAN_ALL_SCRIPTS_VAR)?.unwrap_or(defaults.scan_all_scripts);
        let sanitize_json =
            read_bool(&lookup, SANITIZE_JSON_VAR)?.unwrap_or(defaults.sanitize_json);
        let page_fallbacks =
            read_bool(&lookup, PAGE_FALLBACKS_VAR)?.unwrap_or(defaults.page_fallbacks);

        Ok(Self {
            scan_all_scripts,
            sanitize_json,
            page_fallbacks,
        })
    }
}

fn read_bool<F>(lookup: &F, name: &str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "1" | "true" | "yes" => Ok(Some(true)),
        "0" | "false" | "no" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: raw,
        }),
    }
}
