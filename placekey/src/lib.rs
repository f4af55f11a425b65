//! Placekey - Encoding, validation and resolution of placekeys
//!
//! A placekey is a compact identifier for a physical place: an optional
//! `what` part naming a point of interest and a `where` part naming a
//! hexagonal grid cell, written `what@where`.
//!
//! # Modules
//!
//! - [`codec`]: conversion between coordinates, grid cells and placekeys
//! - [`validate`]: format checks and normalization
//! - [`spatial`]: neighbours, distances, boundaries and polygon fills
//! - [`client`]: the remote resolution API with caching, rate limiting and
//!   retries
//! - [`batch`]: chunked processing of record collections
//!
//! ```
//! use placekey::codec::PlacekeyCodec;
//!
//! let codec = PlacekeyCodec::with_h3()?;
//! let placekey = codec.encode(37.7371, -122.44283)?;
//! assert_eq!(placekey.as_str(), "@5vg-7gq-tvz");
//! # Ok::<(), placekey::codec::CodecError>(())
//! ```

pub mod batch;
pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod grid;
pub mod log;
pub mod logging;
pub mod spatial;
pub mod validate;

/// Version of the placekey library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert_eq!(VERSION.split('.').count(), 3);
    }
}
