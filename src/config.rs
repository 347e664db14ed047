//! Run configuration.
//!
//! Values come from defaults, then an optional TOML file, then command
//! line flags. Example file:
//!
//! ```toml
//! rows = 100
//! cols = 100
//! frames = 2000
//! speed = 1000.0
//!
//! [noise]
//! kind = "salt_and_pepper"
//! p = 0.3
//! salt_vs_pepper = 0.8
//! seed = 42
//! ```

use std::{fs, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{NoiseParameters, SimError, Size};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Sim(#[from] SimError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub rows: usize,
    pub cols: usize,
    /// Number of frames in the run.
    pub frames: usize,
    /// Target frames per second for a display loop.
    pub speed: f64,
    pub noise: NoiseParameters,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 100,
            cols: 100,
            frames: 2000,
            speed: 1000.0,
            noise: NoiseParameters::default(),
        }
    }
}

impl SimConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.size()?;
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(SimError::invalid("speed", self.speed, "must be finite and > 0"));
        }
        self.noise.validate()
    }

    pub fn size(&self) -> Result<Size, SimError> {
        Size::new(self.rows, self.cols)
    }

    /// Delay between two frames, never below one millisecond.
    pub fn frame_interval(&self) -> Duration {
        let millis = (1000.0 / self.speed).floor() as u64;
        Duration::from_millis(millis.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoiseKind;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.size().unwrap(), Size::new(100, 100).unwrap());
        assert_eq!(config.noise.kind, NoiseKind::Uniform);
        assert_eq!(config.noise.p, 0.5);
    }

    #[test]
    fn test_frame_interval() {
        let mut config = SimConfig::default();
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
        config.speed = 10.0;
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
        config.speed = 3.0;
        assert_eq!(config.frame_interval(), Duration::from_millis(333));
        config.speed = 5000.0;
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_partial_toml() {
        let config = SimConfig::from_toml(
            r#"
            rows = 20
            frames = 50

            [noise]
            kind = "gaussian"
            std = 0.2
            seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.rows, 20);
        assert_eq!(config.cols, 100);
        assert_eq!(config.frames, 50);
        assert_eq!(config.noise.kind, NoiseKind::Gaussian);
        assert_eq!(config.noise.std, 0.2);
        assert_eq!(config.noise.p, 0.5);
        assert_eq!(config.noise.seed, Some(9));
    }

    #[test]
    fn test_unknown_noise_kind() {
        let err = SimConfig::from_toml("[noise]\nkind = \"perlin\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("perlin"));
    }

    #[test]
    fn test_invalid_values() {
        let err = SimConfig::from_toml("[noise]\np = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Sim(SimError::InvalidParameter { name: "p", .. })
        ));
        assert!(SimConfig::from_toml("rows = 0").is_err());
        assert!(SimConfig::from_toml("speed = 0.0").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = SimConfig {
            frames: 12,
            noise: NoiseParameters::salt_and_pepper(0.25, 0.5).with_seed(1),
            ..SimConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SimConfig::from_toml(&text).unwrap(), config);
    }
}
