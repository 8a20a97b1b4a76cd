// Cache module for local filesystem caching.
// Stores the starred repository set so repeated runs can skip the GitHub API.

pub mod paths;
pub mod store;

pub use paths::{default_cache_dir, log_path, starred_cache_path};
pub use store::{CacheEnvelope, DEFAULT_TTL, read, read_envelope, write, write_envelope};
