//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use super::defaults::MAX_BATCH_SIZE;
use super::file::ConfigError;
use super::settings::ConfigFile;
use ini::{Ini, Properties};
use std::str::FromStr;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses `section.key` if present, leaving `target` untouched otherwise.
fn parse_into<T: FromStr>(
    props: &Properties,
    section: &str,
    key: &str,
    reason: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(v) = props.get(key) {
        *target = v.trim().parse().map_err(|_| invalid(section, key, v, reason))?;
    }
    Ok(())
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(section, key, value, "must be true or false")),
    }
}

fn positive(section: &str, key: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(invalid(section, key, "0", "must be greater than zero"));
    }
    Ok(())
}

/// Starts from `ConfigFile::default()` and overlays the values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("api")) {
        if let Some(v) = section.get("key") {
            let v = v.trim();
            if !v.is_empty() {
                config.api.key = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid("api", "base_url", v, "must be an http(s) URL"));
            }
            config.api.base_url = v.trim_end_matches('/').to_string();
        }
        parse_into(
            section,
            "api",
            "timeout_secs",
            "must be a positive integer (seconds)",
            &mut config.api.timeout_secs,
        )?;
        parse_into(
            section,
            "api",
            "max_retries",
            "must be a non-negative integer",
            &mut config.api.max_retries,
        )?;
    }

    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool("cache", "enabled", v)?;
        }
        parse_into(
            section,
            "cache",
            "capacity",
            "must be a non-negative integer",
            &mut config.cache.capacity,
        )?;
    }

    if let Some(section) = ini.section(Some("rate_limit")) {
        let limits = &mut config.rate_limit;
        let reason = "must be a positive integer";
        parse_into(section, "rate_limit", "single_requests", reason, &mut limits.single_requests)?;
        parse_into(
            section,
            "rate_limit",
            "single_period_secs",
            reason,
            &mut limits.single_period_secs,
        )?;
        parse_into(section, "rate_limit", "batch_requests", reason, &mut limits.batch_requests)?;
        parse_into(
            section,
            "rate_limit",
            "batch_period_secs",
            reason,
            &mut limits.batch_period_secs,
        )?;
        positive("rate_limit", "single_requests", limits.single_requests)?;
        positive("rate_limit", "batch_requests", limits.batch_requests)?;
    }

    if let Some(section) = ini.section(Some("batch")) {
        parse_into(
            section,
            "batch",
            "chunk_size",
            "must be a positive integer",
            &mut config.batch.chunk_size,
        )?;
        positive("batch", "chunk_size", config.batch.chunk_size)?;
        if config.batch.chunk_size > MAX_BATCH_SIZE {
            return Err(invalid(
                "batch",
                "chunk_size",
                &config.batch.chunk_size.to_string(),
                "must be at most 100",
            ));
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ConfigFile, ConfigError> {
        parse_ini(&Ini::load_from_str(text).unwrap())
    }

    #[test]
    fn test_empty_ini_is_default() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_parses_all_sections() {
        let config = parse(
            "[api]\nkey = abc\nbase_url = http://localhost:9000/v1/\ntimeout_secs = 5\nmax_retries = 2\n\
             [cache]\nenabled = false\ncapacity = 50\n\
             [rate_limit]\nsingle_requests = 10\nsingle_period_secs = 1\nbatch_requests = 20\nbatch_period_secs = 2\n\
             [batch]\nchunk_size = 25\n",
        )
        .unwrap();

        assert_eq!(config.api.key.as_deref(), Some("abc"));
        assert_eq!(config.api.base_url, "http://localhost:9000/v1");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.max_retries, 2);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.capacity, 50);
        assert_eq!(config.rate_limit.single_requests, 10);
        assert_eq!(config.rate_limit.batch_period_secs, 2);
        assert_eq!(config.batch.chunk_size, 25);
    }

    #[test]
    fn test_empty_key_is_none() {
        assert!(parse("[api]\nkey =\n").unwrap().api.key.is_none());
    }

    #[test]
    fn test_invalid_number() {
        let err = parse("[api]\ntimeout_secs = soon\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "timeout_secs"
        ));
        assert!(err.to_string().contains("api.timeout_secs"));
    }

    #[test]
    fn test_invalid_bool() {
        assert!(matches!(
            parse("[cache]\nenabled = maybe\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_url() {
        assert!(parse("[api]\nbase_url = api.placekey.io\n").is_err());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        assert!(parse("[rate_limit]\nsingle_requests = 0\n").is_err());
    }

    #[test]
    fn test_chunk_size_bounds() {
        assert!(parse("[batch]\nchunk_size = 0\n").is_err());
        assert!(parse("[batch]\nchunk_size = 101\n").is_err());
        assert_eq!(parse("[batch]\nchunk_size = 100\n").unwrap().batch.chunk_size, 100);
    }
}
