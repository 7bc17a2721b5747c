//! Sensor identity and operating range, loaded once at startup.
//!
//! The on-disk format is four newline-separated fields:
//!
//! ```text
//! DC-Sensor-01
//! Data Center Room A
//! 22.0
//! 24.0
//! ```

use crate::error::ConfigError;
use crate::validator::TemperatureRange;
use std::path::Path;

/// Identity and configuration of a single virtual sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorConfig {
    name: String,
    location: String,
    range: TemperatureRange,
}

impl SensorConfig {
    /// Creates a configuration from explicit parameters.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        min_temp: f64,
        max_temp: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            name: name.into(),
            location: location.into(),
            range: TemperatureRange::new(min_temp, max_temp)?,
        })
    }

    /// Parses the four-line text format. Lines past the fourth are ignored.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut lines = text.lines().map(str::trim);

        let name = lines.next().ok_or(ConfigError::MissingField("name"))?;
        let location = lines.next().ok_or(ConfigError::MissingField("location"))?;
        let min_temp = parse_number(lines.next(), "min_temp")?;
        let max_temp = parse_number(lines.next(), "max_temp")?;

        Self::new(name, location, min_temp, max_temp)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                }
            }
        })?;
        Self::parse(&text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn range(&self) -> TemperatureRange {
        self.range
    }

    pub fn min_temp(&self) -> f64 {
        self.range.min()
    }

    pub fn max_temp(&self) -> f64 {
        self.range.max()
    }
}

fn parse_number(line: Option<&str>, field: &'static str) -> Result<f64, ConfigError> {
    let raw = line.ok_or(ConfigError::MissingField(field))?;
    raw.parse::<f64>().map_err(|_| ConfigError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_identity_and_range() {
        let config = SensorConfig::new("DC-Sensor-01", "Data Center Room A", 22.0, 24.0).unwrap();

        assert_eq!(config.name(), "DC-Sensor-01");
        assert_eq!(config.location(), "Data Center Room A");
        assert_eq!(config.min_temp(), 22.0);
        assert_eq!(config.max_temp(), 24.0);
    }

    #[test]
    fn test_parse_trims_and_ignores_extra_lines() {
        let config = SensorConfig::parse("  DC-Sensor-01 \r\nRoom A\n22.0\n 24.5\ntrailing\n").unwrap();

        assert_eq!(config.name(), "DC-Sensor-01");
        assert_eq!(config.location(), "Room A");
        assert_eq!(config.max_temp(), 24.5);
    }

    #[test]
    fn test_parse_missing_field() {
        let err = SensorConfig::parse("DC-Sensor-01\nRoom A\n22.0").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("max_temp")));
    }

    #[test]
    fn test_parse_invalid_number() {
        let err = SensorConfig::parse("s\nl\ntwenty\n24.0").unwrap_err();
        match err {
            ConfigError::InvalidNumber { field, value } => {
                assert_eq!(field, "min_temp");
                assert_eq!(value, "twenty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let err = SensorConfig::parse("s\nl\n24\n22").unwrap_err();
        assert!(matches!(err, ConfigError::InvertedRange { .. }));
    }

    #[test]
    fn test_parse_rejects_nan() {
        let err = SensorConfig::parse("s\nl\nNaN\n22").unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteBound { field: "min_temp", .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SensorConfig::load(dir.path().join("config.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().starts_with("File not found:"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, "DC-Sensor-01\nData Center Room A\n22.0\n24.0\n").unwrap();

        let config = SensorConfig::load(&path).unwrap();
        assert_eq!(config.range(), TemperatureRange::new(22.0, 24.0).unwrap());
    }
}
