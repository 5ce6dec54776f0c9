// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loaded from `deferred.toml`.
//!
//! ```toml
//! version = 1
//!
//! [run]
//! fail_fast = false
//!
//! [dependencies]
//! check = "error"   # error | warn | off
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Default config file name.
pub const CONFIG_FILE: &str = "deferred.toml";

/// Supported config version.
pub const CONFIG_VERSION: u32 = 1;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub version: u32,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub dependencies: DependenciesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            run: RunConfig::default(),
            dependencies: DependenciesConfig::default(),
        }
    }
}

/// Harness run settings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Stop after the first failing example.
    pub fail_fast: bool,
}

/// Dependency checking settings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependenciesConfig {
    /// Check level: error, warn, or off.
    pub check: CheckLevel,
}

/// Check level: error, warn, or off.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    #[default]
    Error,
    Warn,
    Off,
}

impl Config {
    /// Parse configuration from TOML content. `path` is used in messages.
    pub fn parse(content: &str, path: &Path) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if config.version != CONFIG_VERSION {
            anyhow::bail!(
                "unsupported config version {} in {} (expected {})",
                config.version,
                path.display(),
                CONFIG_VERSION
            );
        }
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content, path)
    }

    /// Load `deferred.toml` from `dir`, or the defaults when it is absent.
    pub fn discover(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE, dir.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
