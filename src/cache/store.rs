// Cache store for the starred repository set.
// Handles JSON serialization, expiry checking, and atomic filesystem writes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::github::Repository;

/// Default TTL for the starred repository set: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached repository set with its freshness window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// When the entry stops being usable.
    pub expires_at: DateTime<Utc>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
    /// Repositories in fetch order.
    pub data: Vec<Repository>,
}

impl CacheEnvelope {
    /// Create a new envelope stamped with the current time.
    pub fn new(data: Vec<Repository>, ttl: Duration) -> Self {
        let created_at = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = created_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            expires_at,
            created_at,
            data,
        }
    }

    /// Check if the envelope has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Read the envelope at `path` without checking expiry.
pub fn read_envelope(path: &Path) -> Result<CacheEnvelope, CacheError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(CacheError::NotFound),
        Err(e) => return Err(CacheError::Io(e)),
    };

    serde_json::from_str(&contents).map_err(|e| CacheError::Corrupt(e.to_string()))
}

/// Read cached repositories, failing if the entry has expired.
pub fn read(path: &Path) -> Result<Vec<Repository>, CacheError> {
    let envelope = read_envelope(path)?;
    if envelope.is_expired() {
        return Err(CacheError::Expired {
            expires_at: envelope.expires_at.to_rfc3339(),
        });
    }
    Ok(envelope.data)
}

/// Replace the cache entry at `path` with `repositories`.
pub fn write(path: &Path, repositories: &[Repository], ttl: Duration) -> Result<(), CacheError> {
    write_envelope(path, &CacheEnvelope::new(repositories.to_vec(), ttl))
}

/// Write an envelope to `path` atomically.
pub fn write_envelope(path: &Path, envelope: &CacheEnvelope) -> Result<(), CacheError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(envelope)
        .map_err(|e| CacheError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let result = (|| -> io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(CacheError::Io(e));
    }

    Ok(())
}
