//! Application configuration loaded from environment variables.
//!
//! Nothing here is secret: the playback token is supplied at runtime by
//! the client and kept in the key-value store.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Root directory of the file-backed key-value store
    pub data_dir: PathBuf,
    /// Base URL of the remote music playback API
    pub playback_api_url: String,
    /// Seconds between "currently playing" polls
    pub playback_poll_secs: u64,
    /// Capacity of the sensor subscription channel
    pub sensor_buffer: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let playback_poll_secs: u64 = parse_var("PLAYBACK_POLL_SECS", 10)?;
        if playback_poll_secs == 0 {
            return Err(ConfigError::Invalid("PLAYBACK_POLL_SECS", "0".to_string()));
        }

        let sensor_buffer: usize = parse_var("SENSOR_BUFFER", 1024)?;
        if sensor_buffer == 0 {
            return Err(ConfigError::Invalid("SENSOR_BUFFER", "0".to_string()));
        }

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            playback_api_url: env::var("PLAYBACK_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string()),
            playback_poll_secs,
            sensor_buffer,
        })
    }

    /// Config for tests: nothing touches the network or disk.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:8081".to_string(),
            data_dir: env::temp_dir().join("endorphin-tracker-test"),
            playback_api_url: "http://127.0.0.1:9".to_string(),
            playback_poll_secs: 10,
            sensor_buffer: 64,
        }
    }
}

/// Parse an optional numeric environment variable, falling back to `default`.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global, so everything that mutates
    // them lives in this one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("PORT");
        env::set_var("DATA_DIR", "/tmp/endorphin-data");
        env::set_var("PLAYBACK_API_URL", "http://localhost:3000/v1/");
        env::set_var("PLAYBACK_POLL_SECS", "5");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/endorphin-data"));
        assert_eq!(config.playback_api_url, "http://localhost:3000/v1");
        assert_eq!(config.playback_poll_secs, 5);

        env::set_var("PLAYBACK_POLL_SECS", "0");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("PLAYBACK_POLL_SECS", _))
        ));

        env::set_var("PLAYBACK_POLL_SECS", "often");
        assert!(Config::from_env().is_err());

        env::remove_var("PLAYBACK_POLL_SECS");
        env::remove_var("PLAYBACK_API_URL");
        env::remove_var("DATA_DIR");
    }
}
