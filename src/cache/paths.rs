// Cache path utilities.
// Resolves the default cache directory and the files kept inside it.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// File name of the starred repository cache entry.
pub const STARRED_CACHE_FILE: &str = "starred_repositories.json";

/// File name of the application log.
pub const LOG_FILE: &str = "starfind.log";

/// Get the default cache directory (~/.cache/starfind on Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "starfind").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the starred repository cache entry inside `cache_dir`.
pub fn starred_cache_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(STARRED_CACHE_FILE)
}

/// Path to the log file inside `cache_dir`.
pub fn log_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(LOG_FILE)
}
