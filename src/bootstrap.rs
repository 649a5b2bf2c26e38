//! Session bootstrap: filesystem provisioning before the agent starts
//!
//! Resolves and materializes the two on-disk artifacts every run depends
//! on: the memory index file and the per-session settings document. The
//! memory store is provisioned first since it has no dependency on the
//! session identity; the settings artifact is then either reused (resumed
//! session) or minted from the bundled template (fresh session).
//!
//! All operations here are plain blocking `std::fs` calls executed
//! sequentially during startup. Provisioning failures are fatal: there is
//! no retry, and the agent is never constructed against a half-resolved
//! path.

use crate::error::{Error, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Permission mode applied to the memory index file.
///
/// The memory store is shared across processes and user contexts running
/// the same assistant, so every user must be able to read and write it.
/// This is a deliberate sharing policy; serializing concurrent writers is
/// the memory backend's job, not this layer's.
pub const MEMORY_STORE_MODE: u32 = 0o666;

/// On-disk representation of a freshly created, empty memory store.
pub const EMPTY_MEMORY_STORE: &str = "{}";

/// Base name for settings artifacts minted without an explicit path.
pub const DEFAULT_SETTINGS_NAME: &str = "ai_settings_default";

/// Default settings document bundled with the binary. Seeded to the
/// template path on first run so a fresh install can bootstrap.
pub const BUNDLED_SETTINGS_TEMPLATE: &str =
    include_str!("../templates/ai_settings_default.yaml");

/// Filesystem locations the bootstrap operates on.
///
/// Constructed once by the caller and passed in explicitly; nothing in
/// this module resolves paths from ambient process state.
#[derive(Debug, Clone)]
pub struct BootstrapPaths {
    /// The read-only default settings document seeding every new session
    pub template: PathBuf,

    /// Directory where timestamp-named settings artifacts are minted
    pub session_dir: PathBuf,

    /// Default location of the memory index file
    pub memory_index: PathBuf,
}

impl BootstrapPaths {
    /// Standard layout under a data directory (typically `~/.autoclaw`)
    pub fn under_data_dir(data_dir: &Path) -> Self {
        Self {
            template: data_dir
                .join("templates")
                .join(format!("{DEFAULT_SETTINGS_NAME}.yaml")),
            session_dir: data_dir.join("sessions"),
            memory_index: data_dir.join("memory").join("memory_index.json"),
        }
    }
}

/// Write the bundled settings template to `template` if nothing exists
/// there yet. An existing template file is never touched.
pub fn seed_template(template: &Path) -> Result<()> {
    if template.exists() {
        return Ok(());
    }
    if let Some(parent) = template.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::Bootstrap(format!(
                "failed to create template directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    fs::write(template, BUNDLED_SETTINGS_TEMPLATE).map_err(|e| {
        Error::Bootstrap(format!(
            "failed to write settings template {}: {e}",
            template.display()
        ))
    })?;
    tracing::debug!(template = %template.display(), "seeded bundled settings template");
    Ok(())
}

/// Ensure a memory index file exists at `path`, creating parents and an
/// empty `{}` store as needed, and stamp it with [`MEMORY_STORE_MODE`].
///
/// Existing contents are left untouched: wiping the store for a fresh run
/// is the memory backend's reset capability, invoked later with an
/// explicit flag. Calling this twice with the same path is a no-op beyond
/// the permission stamp, which is itself idempotent. A store created by a
/// different user cannot be re-stamped; that is fine as long as its mode
/// already grants shared read and write.
pub fn ensure_memory_store(path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Bootstrap(format!(
                    "failed to create memory store directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }

    if !path.exists() {
        fs::write(path, EMPTY_MEMORY_STORE).map_err(|e| {
            Error::Bootstrap(format!(
                "failed to create memory index {}: {e}",
                path.display()
            ))
        })?;
        tracing::info!(path = %path.display(), "created empty memory index");
    }

    // Only the file's owner may chmod it. A cooperating user who did not
    // create the store must not die here when the mode is already open
    // enough.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(MEMORY_STORE_MODE)) {
            let mode = fs::metadata(path)
                .map_err(|e| {
                    Error::Bootstrap(format!(
                        "failed to inspect memory index {}: {e}",
                        path.display()
                    ))
                })?
                .permissions()
                .mode();
            if mode & MEMORY_STORE_MODE != MEMORY_STORE_MODE {
                return Err(Error::Bootstrap(format!(
                    "failed to set permissions on memory index {}: {e}",
                    path.display()
                )));
            }
            tracing::debug!(
                path = %path.display(),
                "memory index already shared, skipping permission stamp"
            );
        }
    }

    Ok(path.to_path_buf())
}

/// Resolve the settings artifact for this run.
///
/// An explicit path is used verbatim as the session identity; without one
/// a timestamped identity is minted under the session directory. If a file
/// already exists at the identity it is reused as-is, which is what makes
/// resumption work: pass the same explicit path twice and the second run
/// continues from the first run's settings. Otherwise the template is
/// copied into place via a temporary name and an atomic rename, so a
/// concurrent reader never observes a half-written settings file.
///
/// The timestamp has second precision: two runs started within the same
/// second without an explicit path share an identity. Accepted behavior,
/// kept as-is.
pub fn resolve_settings(paths: &BootstrapPaths, explicit: Option<&Path>) -> Result<PathBuf> {
    let identity = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let stamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
            paths
                .session_dir
                .join(format!("{DEFAULT_SETTINGS_NAME}-{stamp}.yaml"))
        }
    };

    if identity.exists() {
        tracing::info!(settings = %identity.display(), "resuming existing session settings");
        return Ok(identity);
    }

    if !paths.template.is_file() {
        return Err(Error::Bootstrap(format!(
            "settings template not found at {}",
            paths.template.display()
        )));
    }

    if let Some(parent) = identity.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Bootstrap(format!(
                    "failed to create session directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let staging = identity.with_extension(format!("tmp.{}", std::process::id()));
    fs::copy(&paths.template, &staging).map_err(|e| {
        Error::Bootstrap(format!(
            "failed to copy settings template {} to {}: {e}",
            paths.template.display(),
            staging.display()
        ))
    })?;
    fs::rename(&staging, &identity).map_err(|e| {
        Error::Bootstrap(format!(
            "failed to move new settings file into place at {}: {e}",
            identity.display()
        ))
    })?;

    tracing::info!(settings = %identity.display(), "created new session settings from template");
    Ok(identity)
}

/// Run the full bootstrap sequence and hand back the two resolved paths.
///
/// Memory store first: it does not depend on the session identity, and a
/// failure there must not leave a freshly minted settings reference
/// behind. Neither artifact's contents are inspected here.
pub fn bootstrap(
    paths: &BootstrapPaths,
    explicit_settings: Option<&Path>,
    explicit_memory: Option<&Path>,
) -> Result<(PathBuf, PathBuf)> {
    let memory_path = ensure_memory_store(explicit_memory.unwrap_or(&paths.memory_index))?;
    let settings_path = resolve_settings(paths, explicit_settings)?;
    Ok((settings_path, memory_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE_BODY: &str = "ai_name: Test\nai_role: a test assistant\n";

    fn fixture() -> (TempDir, BootstrapPaths) {
        let dir = TempDir::new().unwrap();
        let paths = BootstrapPaths::under_data_dir(dir.path());
        fs::create_dir_all(paths.template.parent().unwrap()).unwrap();
        fs::write(&paths.template, TEMPLATE_BODY).unwrap();
        (dir, paths)
    }

    #[test]
    fn test_resolve_creates_template_copy_at_explicit_path() {
        let (dir, paths) = fixture();
        let target = dir.path().join("custom").join("session-a.yaml");

        let resolved = resolve_settings(&paths, Some(&target)).unwrap();

        assert_eq!(resolved, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), TEMPLATE_BODY);
    }

    #[test]
    fn test_resolve_reuses_existing_file_without_mutation() {
        let (dir, paths) = fixture();
        let target = dir.path().join("session-b.yaml");
        fs::write(&target, "ai_name: Edited\n").unwrap();

        let resolved = resolve_settings(&paths, Some(&target)).unwrap();

        assert_eq!(resolved, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "ai_name: Edited\n");
    }

    #[test]
    fn test_resolve_without_explicit_path_mints_timestamped_identity() {
        let (_dir, paths) = fixture();

        let resolved = resolve_settings(&paths, None).unwrap();

        assert!(resolved.starts_with(&paths.session_dir));
        let name = resolved.file_name().unwrap().to_string_lossy().to_string();
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert!(name.starts_with(DEFAULT_SETTINGS_NAME));
        assert!(name.contains(&today));
        assert_eq!(fs::read_to_string(&resolved).unwrap(), TEMPLATE_BODY);
    }

    #[test]
    fn test_resolve_fails_when_template_missing() {
        let dir = TempDir::new().unwrap();
        let paths = BootstrapPaths::under_data_dir(dir.path());
        let target = dir.path().join("fresh.yaml");

        let err = resolve_settings(&paths, Some(&target)).unwrap_err();

        assert!(matches!(err, Error::Bootstrap(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_ensure_creates_empty_mapping_with_shared_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("mem.json");

        let resolved = ensure_memory_store(&path).unwrap();

        assert_eq!(resolved, path);
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, serde_json::json!({}));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, MEMORY_STORE_MODE);
        }
    }

    #[test]
    fn test_ensure_leaves_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mem.json");
        fs::write(&path, r#"{"0":"remembered"}"#).unwrap();

        ensure_memory_store(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"0":"remembered"}"#
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_accepts_existing_store_that_is_already_shared() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mem.json");
        fs::write(&path, r#"{"0":"shared entry"}"#).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(MEMORY_STORE_MODE)).unwrap();

        let resolved = ensure_memory_store(&path).unwrap();

        assert_eq!(resolved, path);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"0":"shared entry"}"#
        );
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, MEMORY_STORE_MODE);
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_widens_restrictive_mode_on_owned_store() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mem.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        ensure_memory_store(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, MEMORY_STORE_MODE);
    }

    #[test]
    fn test_bootstrap_twice_is_idempotent() {
        let (dir, paths) = fixture();
        let settings = dir.path().join("session-c.yaml");
        let memory = dir.path().join("mem").join("index.json");

        let first = bootstrap(&paths, Some(&settings), Some(&memory)).unwrap();
        fs::write(&settings, "ai_name: Mutated\n").unwrap();
        fs::write(&memory, r#"{"0":"kept"}"#).unwrap();

        let second = bootstrap(&paths, Some(&settings), Some(&memory)).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&settings).unwrap(), "ai_name: Mutated\n");
        assert_eq!(fs::read_to_string(&memory).unwrap(), r#"{"0":"kept"}"#);
    }

    #[test]
    fn test_bootstrap_uses_default_paths_without_explicit_ones() {
        let (_dir, paths) = fixture();

        let (settings, memory) = bootstrap(&paths, None, None).unwrap();

        assert_eq!(memory, paths.memory_index);
        assert!(memory.exists());
        assert!(settings.starts_with(&paths.session_dir));
        assert!(settings.exists());
    }

    #[test]
    fn test_seed_template_never_clobbers_existing_file() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("templates").join("default.yaml");

        seed_template(&template).unwrap();
        assert_eq!(
            fs::read_to_string(&template).unwrap(),
            BUNDLED_SETTINGS_TEMPLATE
        );

        fs::write(&template, "ai_name: Custom\n").unwrap();
        seed_template(&template).unwrap();
        assert_eq!(fs::read_to_string(&template).unwrap(), "ai_name: Custom\n");
    }
}
