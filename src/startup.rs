//! Startup checks and diagnostics
//!
//! Everything here runs after bootstrap and before the interaction loop.
//! Only the API-key check is fatal; the bulletin fetch and the git branch
//! probe are best-effort and degrade to silence.

use crate::error::{Error, Result};
use std::time::Duration;
use tokio::process::Command;

const BULLETIN_URL: &str =
    "https://raw.githubusercontent.com/A3S-Lab/AutoClaw/main/BULLETIN.md";

const BULLETIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Release branch that production installs are expected to run
pub const SUPPORTED_BRANCH: &str = "stable";

/// Fetch the API key from the environment, failing with a clear
/// diagnostic when it is missing
pub fn require_api_key() -> Result<String> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(Error::Config(
            "OPENAI_API_KEY is not set; export it before starting the assistant".to_string(),
        )),
    }
}

/// Latest project bulletin, if one can be fetched quickly
pub async fn latest_bulletin() -> Option<String> {
    let client = reqwest::Client::builder()
        .timeout(BULLETIN_TIMEOUT)
        .build()
        .ok()?;

    match client.get(BULLETIN_URL).send().await {
        Ok(response) if response.status().is_success() => {
            let body = response.text().await.ok()?;
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Ok(response) => {
            tracing::debug!(status = %response.status(), "bulletin fetch rejected");
            None
        }
        Err(e) => {
            tracing::debug!("bulletin fetch failed: {e}");
            None
        }
    }
}

/// Name of the git branch the working directory is on, if any
pub async fn current_git_branch() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }
    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!branch.is_empty()).then_some(branch)
}
