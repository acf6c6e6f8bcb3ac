//! Runtime configuration loaded from a JSON file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::publish::WriteMode;
use crate::stabilizer::{LabelMarkers, StabilizerConfig};

/// Configuration of the relay. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Detections below this confidence are dropped by the detection source
    pub confidence_floor: f32,
    /// Minimum seconds between two publishes of an unchanged category
    pub debounce_window_secs: f64,
    pub write_mode: WriteMode,
    /// Database path the records are written under
    pub sink_path: String,
    pub database_url: String,
    /// Upper bound for a single sink request
    pub request_timeout_secs: f64,
    pub labels: LabelMarkers,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.5,
            debounce_window_secs: 1.0,
            write_mode: WriteMode::Overwrite,
            sink_path: "deteksi".into(),
            database_url: "https://example-default-rtdb.firebaseio.com".into(),
            request_timeout_secs: 3.0,
            labels: LabelMarkers::default(),
        }
    }
}

impl RelayConfig {
    /// Check every field; the first violation is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(ConfigError::ConfidenceFloor(self.confidence_floor));
        }
        // try_from_secs_f64 also rejects NaN, negative and oversized values
        if Duration::try_from_secs_f64(self.debounce_window_secs).is_err() {
            return Err(ConfigError::DebounceWindow(self.debounce_window_secs));
        }
        if Duration::try_from_secs_f64(self.request_timeout_secs).is_err()
            || self.request_timeout_secs <= 0.0
        {
            return Err(ConfigError::RequestTimeout(self.request_timeout_secs));
        }
        if self.sink_path.trim_matches('/').trim().is_empty() {
            return Err(ConfigError::EmptySinkPath);
        }
        match reqwest::Url::parse(&self.database_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            Ok(url) => Err(ConfigError::DatabaseUrl {
                url: self.database_url.clone(),
                reason: format!("unsupported scheme {:?}", url.scheme()),
            }),
            Err(err) => Err(ConfigError::DatabaseUrl {
                url: self.database_url.clone(),
                reason: err.to_string(),
            }),
        }
    }

    /// Debounce window as a `Duration`. Saturates on values `validate` rejects.
    pub fn debounce_window(&self) -> Duration {
        Duration::try_from_secs_f64(self.debounce_window_secs).unwrap_or(Duration::MAX)
    }

    /// Per-request sink timeout as a `Duration`. Saturates like `debounce_window`.
    pub fn request_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_timeout_secs).unwrap_or(Duration::MAX)
    }

    /// Build the stabilizer configuration from the debounce window.
    pub fn stabilizer_config(&self) -> StabilizerConfig {
        StabilizerConfig {
            debounce_window: self.debounce_window(),
        }
    }
}

/// Read, parse and validate a config file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RelayConfig =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce_window(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RelayConfig =
            serde_json::from_str(r#"{ "write_mode": "append", "debounce_window_secs": 2.0 }"#)
                .unwrap();
        assert_eq!(config.write_mode, WriteMode::Append);
        assert_eq!(config.debounce_window(), Duration::from_secs(2));
        assert_eq!(config.confidence_floor, 0.5);
        assert_eq!(config.sink_path, "deteksi");
    }

    #[test]
    fn test_negative_debounce_rejected() {
        let config = RelayConfig {
            debounce_window_secs: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DebounceWindow(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let floor = RelayConfig {
            confidence_floor: 1.5,
            ..Default::default()
        };
        assert!(matches!(floor.validate(), Err(ConfigError::ConfidenceFloor(_))));

        let path = RelayConfig {
            sink_path: " / ".into(),
            ..Default::default()
        };
        assert!(matches!(path.validate(), Err(ConfigError::EmptySinkPath)));

        let url = RelayConfig {
            database_url: "ftp://example.com".into(),
            ..Default::default()
        };
        assert!(matches!(url.validate(), Err(ConfigError::DatabaseUrl { .. })));

        let timeout = RelayConfig {
            request_timeout_secs: 0.0,
            ..Default::default()
        };
        assert!(matches!(timeout.validate(), Err(ConfigError::RequestTimeout(_))));
    }

    #[test]
    fn test_oversized_durations_rejected() {
        let window = RelayConfig {
            debounce_window_secs: 1e20,
            ..Default::default()
        };
        assert!(matches!(window.validate(), Err(ConfigError::DebounceWindow(_))));
        assert_eq!(window.debounce_window(), Duration::MAX);

        let nan = RelayConfig {
            debounce_window_secs: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(nan.validate(), Err(ConfigError::DebounceWindow(_))));

        let timeout = RelayConfig {
            request_timeout_secs: 1e30,
            ..Default::default()
        };
        assert!(matches!(timeout.validate(), Err(ConfigError::RequestTimeout(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir()
            .join(format!("waste-relay-config-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{ "sink_path": "deteksi_sampah/jenis_sampah_", "labels": { "negative_markers": ["non"] } }"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.sink_path, "deteksi_sampah/jenis_sampah_");
        assert_eq!(config.labels.negative_markers, vec!["non".to_string()]);
        assert_eq!(
            config.labels.positive_markers,
            LabelMarkers::default().positive_markers
        );
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/waste-relay.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
