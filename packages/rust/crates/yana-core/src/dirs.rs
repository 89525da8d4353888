//! Config and cache directory resolution.
//!
//! Lookup order for each directory:
//! 1. `YANA_CONFIG_HOME` / `YANA_CACHE_HOME`
//! 2. `XDG_CONFIG_HOME/yana` / `XDG_CACHE_HOME/yana`
//! 3. Platform directory (via `dirs`) joined with `yana`
//!
//! Relative values are anchored to the current working directory.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const APP_DIR_NAME: &str = "yana";

/// Cache for resolved directories to avoid repeated env lookups
static CONFIG_HOME: OnceLock<PathBuf> = OnceLock::new();
static CACHE_HOME: OnceLock<PathBuf> = OnceLock::new();
static CONFIG_HOME_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Directory resolver for Yana's config and cache homes.
#[derive(Debug, Clone)]
pub struct YanaDirs;

impl YanaDirs {
    /// Directory holding `settings.yaml`.
    #[inline]
    pub fn config_home() -> PathBuf {
        if let Some(path) = CONFIG_HOME_OVERRIDE.get() {
            return absolutize(&current_dir(), path.clone());
        }
        CONFIG_HOME
            .get_or_init(|| {
                resolve_dir_with(
                    |key| env::var(key).ok(),
                    "YANA_CONFIG_HOME",
                    "XDG_CONFIG_HOME",
                    ::dirs::config_dir(),
                )
            })
            .clone()
    }

    /// Directory holding the path cache file.
    #[inline]
    pub fn cache_home() -> PathBuf {
        CACHE_HOME
            .get_or_init(|| {
                resolve_dir_with(
                    |key| env::var(key).ok(),
                    "YANA_CACHE_HOME",
                    "XDG_CACHE_HOME",
                    ::dirs::cache_dir(),
                )
            })
            .clone()
    }

    /// Set config-home override (used by CLI `--conf`).
    ///
    /// First caller wins; later values are ignored with a warning.
    pub fn set_config_home_override(path: impl Into<PathBuf>) {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return;
        }
        if CONFIG_HOME_OVERRIDE.set(path.clone()).is_err()
            && let Some(current) = CONFIG_HOME_OVERRIDE.get()
            && current != &path
        {
            tracing::warn!(
                current = %current.display(),
                ignored = %path.display(),
                "config home override already set; ignoring subsequent value"
            );
        }
    }
}

/// Resolve a directory from an app-specific key, an XDG key, or a platform
/// fallback, in that order.
pub(crate) fn resolve_dir_with<F>(
    lookup: F,
    app_key: &str,
    xdg_key: &str,
    platform: Option<PathBuf>,
) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let cwd = current_dir();

    if let Some(value) = non_empty(app_key) {
        return absolutize(&cwd, PathBuf::from(value));
    }
    if let Some(value) = non_empty(xdg_key) {
        return absolutize(&cwd, PathBuf::from(value)).join(APP_DIR_NAME);
    }
    platform.map_or_else(
        || cwd.join(format!(".{APP_DIR_NAME}")),
        |dir| dir.join(APP_DIR_NAME),
    )
}

fn current_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn absolutize(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}
