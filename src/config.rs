//! Runtime configuration assembly
//!
//! Merges the persisted per-session settings document with the typed
//! CLI-level overrides into the single [`RuntimeConfig`] handed to agent
//! construction. The bootstrap layer only produces paths; this is the
//! first place artifact contents are actually read.

use crate::error::{Error, Result};
use crate::memory::MemoryKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted per-session agent settings (the settings artifact schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Name the agent uses for itself
    pub ai_name: String,

    /// One-line description of the agent's role
    pub ai_role: String,

    /// Goals pursued in order
    #[serde(default)]
    pub ai_goals: Vec<String>,

    /// Spending ceiling in USD; 0.0 means unlimited
    #[serde(default)]
    pub api_budget: f64,
}

impl AgentProfile {
    /// Load a profile from a settings YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "failed to read settings file {}: {e}",
                path.display()
            ))
        })?;
        let profile: AgentProfile = serde_yaml::from_str(&contents).map_err(|e| {
            Error::Config(format!("invalid settings file {}: {e}", path.display()))
        })?;
        Ok(profile)
    }
}

/// Model tier restriction resolved from the CLI flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelTier {
    /// Use the smart model for reasoning, fast model where it suffices
    #[default]
    Any,
    /// Restrict every call to the fast model
    FastOnly,
    /// Restrict every call to the smart model
    SmartOnly,
}

/// Typed CLI pass-through values merged over the persisted profile.
///
/// These are parsed upstream by clap and not interpreted during bootstrap;
/// they only take effect here.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub continuous: bool,
    pub continuous_limit: Option<u32>,
    pub skip_reprompt: bool,
    pub speak: bool,
    pub debug: bool,
    pub model_tier: ModelTier,
    pub memory_backend: MemoryKind,
    pub browser_name: Option<String>,
    pub allow_downloads: bool,
    pub skip_news: bool,
}

/// Fully assembled runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// The loaded settings-artifact contents
    pub profile: AgentProfile,

    /// Resolved settings artifact path (the session identity)
    pub settings_path: PathBuf,

    /// Resolved memory index path
    pub memory_path: PathBuf,

    pub memory_backend: MemoryKind,
    pub continuous: bool,
    pub continuous_limit: Option<u32>,
    pub skip_reprompt: bool,
    pub speak: bool,
    pub debug: bool,
    pub model_tier: ModelTier,
    pub browser: String,
    pub allow_downloads: bool,
    pub skip_news: bool,
}

fn default_browser() -> String {
    "chrome".to_string()
}

impl RuntimeConfig {
    /// Assemble the runtime configuration from the bootstrap-resolved
    /// paths and the CLI overrides. Reads and validates the settings
    /// artifact; never writes either artifact.
    pub fn assemble(
        settings_path: PathBuf,
        memory_path: PathBuf,
        overrides: RunOverrides,
    ) -> Result<Self> {
        let profile = AgentProfile::load(&settings_path)?;

        Ok(Self {
            profile,
            settings_path,
            memory_path,
            memory_backend: overrides.memory_backend,
            continuous: overrides.continuous,
            continuous_limit: overrides.continuous_limit,
            skip_reprompt: overrides.skip_reprompt,
            speak: overrides.speak,
            debug: overrides.debug,
            model_tier: overrides.model_tier,
            browser: overrides.browser_name.unwrap_or_else(default_browser),
            allow_downloads: overrides.allow_downloads,
            skip_news: overrides.skip_news,
        })
    }
}
