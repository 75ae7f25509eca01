//! Engine configuration.
//!
//! Provides [`S3Config`] for tuning the objstack S3 engine. Values can be
//! built explicitly through the typed builder or loaded from `OBJSTACK_*`
//! environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default threshold above which blobs spill to disk.
const DEFAULT_MAX_MEMORY_OBJECT_SIZE: usize = 524_288;

/// Default and upper bound for listing page sizes.
const DEFAULT_MAX_KEYS_LIMIT: usize = 1000;

/// S3 engine configuration.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::config::S3Config;
///
/// let config = S3Config::default();
/// assert_eq!(config.max_keys_limit, 1000);
/// assert_eq!(config.default_content_type, "application/octet-stream");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct S3Config {
    /// Maximum blob size (in bytes) kept entirely in memory before spilling to disk.
    #[builder(default = DEFAULT_MAX_MEMORY_OBJECT_SIZE)]
    pub max_memory_object_size: usize,

    /// Directory for spilled blobs. `None` uses the OS temp directory.
    #[builder(default, setter(strip_option))]
    pub spill_dir: Option<PathBuf>,

    /// Default and maximum value of `max-keys`, `max-uploads` and `max-parts`.
    #[builder(default = DEFAULT_MAX_KEYS_LIMIT)]
    pub max_keys_limit: usize,

    /// Content type recorded when a write does not specify one.
    #[builder(default = mime::APPLICATION_OCTET_STREAM.to_string())]
    pub default_content_type: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            max_memory_object_size: DEFAULT_MAX_MEMORY_OBJECT_SIZE,
            spill_dir: None,
            max_keys_limit: DEFAULT_MAX_KEYS_LIMIT,
            default_content_type: mime::APPLICATION_OCTET_STREAM.to_string(),
        }
    }
}

impl S3Config {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults;
    /// unparsable numbers are ignored):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OBJSTACK_MAX_MEMORY_OBJECT_SIZE` | `524288` |
    /// | `OBJSTACK_SPILL_DIR` | OS temp dir |
    /// | `OBJSTACK_MAX_KEYS_LIMIT` | `1000` |
    /// | `OBJSTACK_DEFAULT_CONTENT_TYPE` | `application/octet-stream` |
    ///
    /// # Examples
    ///
    /// ```
    /// use objstack_s3_core::config::S3Config;
    ///
    /// let config = S3Config::from_env();
    /// assert!(!config.default_content_type.is_empty());
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(n) = env_parse("OBJSTACK_MAX_MEMORY_OBJECT_SIZE") {
            config.max_memory_object_size = n;
        }
        if let Ok(v) = std::env::var("OBJSTACK_SPILL_DIR") {
            if !v.is_empty() {
                config.spill_dir = Some(PathBuf::from(v));
            }
        }
        if let Some(n) = env_parse::<usize>("OBJSTACK_MAX_KEYS_LIMIT") {
            if n > 0 {
                config.max_keys_limit = n;
            }
        }
        if let Ok(v) = std::env::var("OBJSTACK_DEFAULT_CONTENT_TYPE") {
            if v.parse::<mime::Mime>().is_ok() {
                config.default_content_type = v;
            }
        }

        config
    }
}

/// Read and parse an environment variable, ignoring missing or bad values.
fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
