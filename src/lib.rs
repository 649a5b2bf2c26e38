//! AutoClaw - Autonomous Personal AI Assistant
//!
//! AutoClaw is a command-line assistant that pursues operator-defined
//! goals across sessions. A run is bootstrapped from two durable
//! artifacts — a per-session settings document and a shared memory index
//! file — which are resolved and provisioned before the interaction loop
//! starts.
//!
//! ## Startup flow
//!
//! ```text
//! CLI flags (clap)
//!      │
//!      ▼
//! bootstrap ── ensure_memory_store ──► memory index file ({} if new,
//!      │                               world-read/write by policy)
//!      ├────── resolve_settings ─────► settings artifact (reused if the
//!      │                               identity exists, else copied from
//!      ▼                               the bundled template)
//! config assembly (settings + CLI overrides)
//!      │
//!      ▼
//! memory backend + chat client + system prompt
//!      │
//!      ▼
//! agent interaction loop
//! ```
//!
//! ## Modules
//!
//! - [`bootstrap`]: session/settings resolution and memory-store provisioning
//! - [`config`]: settings schema and runtime configuration assembly
//! - [`memory`]: persistent memory backends behind a common trait
//! - [`prompt`]: system prompt construction
//! - [`llm`]: chat-completions provider
//! - [`startup`]: pre-loop checks and diagnostics
//! - [`agent`]: the interaction loop

pub mod agent;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod prompt;
pub mod startup;

pub use bootstrap::BootstrapPaths;
pub use config::RuntimeConfig;
pub use error::{Error, Result};
