//! Configuration for the observed-schema engine
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (docpack.toml)
//! - Environment variables (DOCPACK_*)
//!
//! ## Example config file (docpack.toml):
//! ```toml
//! # Max distinct attribute-value samples kept per attribute
//! value_cap = 20
//!
//! # An attribute present in at least this fraction of a tag's occurrences
//! # is considered typical; its absence is reported
//! missing_attr_threshold = 0.95
//!
//! # Nesting-depth guard for sample traversal
//! max_depth = 512
//! ```
//!
//! The cap and the threshold are deliberately configuration parameters, not
//! baked-in constants; CLI flags override file and environment values.

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::schema::DEFAULT_VALUE_CAP;
use crate::walker::DEFAULT_MAX_DEPTH;

/// Default missing-typical-attribute frequency threshold
pub const DEFAULT_MISSING_ATTR_THRESHOLD: f64 = 0.95;

/// Engine tuning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Max distinct attribute-value samples per attribute before the
    /// attribute is treated as free text
    #[serde(default = "default_value_cap")]
    pub value_cap: usize,

    /// Minimum historical frequency for an attribute to count as typical
    #[serde(default = "default_missing_attr_threshold")]
    pub missing_attr_threshold: f64,

    /// Traversal nesting-depth guard
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            value_cap: DEFAULT_VALUE_CAP,
            missing_attr_threshold: DEFAULT_MISSING_ATTR_THRESHOLD,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Load from docpack.toml and DOCPACK_* environment variables, falling
    /// back to defaults for anything unset
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("docpack").required(false))
            .add_source(Environment::with_prefix("DOCPACK"))
            .build()?
            .try_deserialize()
    }
}

fn default_value_cap() -> usize {
    DEFAULT_VALUE_CAP
}

fn default_missing_attr_threshold() -> f64 {
    DEFAULT_MISSING_ATTR_THRESHOLD
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
