use std::path::Path;

use anyhow::{anyhow, Error};
use common::ColorLaw;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    packet::{DEFAULT_MAX_BYTES, MAX_DATAGRAM_BYTES, MIN_PACKET_BYTES},
    render::Effect,
};

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// IP address of the strip controller
    pub address: String,
    pub port: u16,
    pub led_count: usize,
    #[serde(default = "default_brightness")]
    pub brightness: u8,
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Size of every datagram on the wire
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    #[serde(default)]
    pub color_law: ColorLaw,
    #[serde(default)]
    pub effect: Effect,
}

fn default_brightness() -> u8 {
    255
}

fn default_fps() -> u32 {
    60
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: "192.168.0.99".to_string(),
            port: 65506,
            led_count: 10,
            brightness: default_brightness(),
            fps: default_fps(),
            max_bytes: default_max_bytes(),
            color_law: ColorLaw::default(),
            effect: Effect::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Error> {
        Config::load_from("config.ron")
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let config = std::fs::read_to_string(path)?;
        let config: Config = ron::from_str(&config)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load_from`], but a missing file gives the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config: {} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        Config::load_from(path)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.fps == 0 {
            return Err(anyhow!("fps must be at least 1"));
        }
        if !(MIN_PACKET_BYTES..=MAX_DATAGRAM_BYTES).contains(&self.max_bytes) {
            return Err(anyhow!(
                "max_bytes is {}, it must be between {} and {}",
                self.max_bytes,
                MIN_PACKET_BYTES,
                MAX_DATAGRAM_BYTES
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::HsvColor;

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.ron", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load() {
        // Write an example config file
        let path = write_config(
            "strip-full",
            r#"(
    address: "10.0.0.42",
    port: 4048,
    led_count: 300,
    brightness: 128,
    fps: 30,
    max_bytes: 1200,
    color_law: Spectrum,
    effect: Rainbow(
        initial: (hue: 0, saturation: 255, value: 200),
        delta_hue: 3,
        speed: 1,
    ),
)"#,
        );

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config,
            Config {
                address: "10.0.0.42".to_string(),
                port: 4048,
                led_count: 300,
                brightness: 128,
                fps: 30,
                max_bytes: 1200,
                color_law: ColorLaw::Spectrum,
                effect: Effect::Rainbow {
                    initial: HsvColor::new(0, 255, 200),
                    delta_hue: 3,
                    speed: 1,
                },
            }
        );

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_defaults() {
        let path = write_config(
            "strip-minimal",
            r#"(
    address: "192.168.0.99",
    port: 65506,
    led_count: 10,
)"#,
        );

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_solid_effect() {
        let path = write_config(
            "strip-solid",
            r#"(
    address: "::1",
    port: 9000,
    led_count: 1,
    effect: Solid((hue: 96, saturation: 255, value: 255)),
)"#,
        );

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.effect, Effect::Solid(HsvColor::new(96, 255, 255)));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let config = Config {
            fps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_bytes: 9,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_bytes: 65_508,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load_from("/nonexistent/strip.ron").is_err());
        assert_eq!(
            Config::load_or_default("/nonexistent/strip.ron").unwrap(),
            Config::default()
        );
    }

    #[test]
    fn test_invalid_file_is_not_replaced_by_defaults() {
        let path = write_config("strip-invalid", "(address: 12)");
        assert!(Config::load_or_default(&path).is_err());
        std::fs::remove_file(path).unwrap();
    }
}
