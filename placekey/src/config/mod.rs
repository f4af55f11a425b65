//! Configuration for the resolution client and the CLI.
//!
//! - [`ClientConfig`]: builder-style settings handed to
//!   [`PlacekeyClient`](crate::client::PlacekeyClient)
//! - [`ConfigFile`]: the user's `~/.placekey/config.ini`
//!
//! ```
//! use placekey::config::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new("my-key")
//!     .with_max_retries(3)
//!     .with_single_rate_limit(10, Duration::from_secs(1));
//!
//! assert_eq!(config.max_retries(), 3);
//! assert_eq!(config.base_url(), "https://api.placekey.io/v1");
//! ```

mod client;
mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use client::ClientConfig;
pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigError, API_KEY_ENV};
pub use settings::{ApiSettings, BatchSettings, CacheSettings, ConfigFile, RateLimitSettings};
