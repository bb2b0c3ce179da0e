//! TOML-based configuration for the bridge.
//!
//! The file lists every switch to control.  Its default location is:
//! - Windows:  `%APPDATA%\HD6224\config.toml`
//! - Linux:    `~/.config/hd6224/config.toml`
//! - macOS:    `~/Library/Application Support/HD6224/config.toml`
//!
//! An explicit path (the `--config` flag) overrides the default.
//!
//! ```toml
//! [bridge]
//! log_level = "info"
//!
//! [[devices]]
//! name = "Office KVM"
//! path = "/dev/ttyUSB0"
//! baud_rate = 9600
//! input1 = "Workstation"
//! input2 = "Laptop"
//! input3 = "Media PC"
//! input4 = "Lab"
//! ```
//!
//! Fields annotated with `#[serde(default = "some_fn")]` take the return value
//! of `some_fn()` when absent, so a device entry only needs `name` and `path`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use hd6224_core::{domain::serial::DEFAULT_BAUD_RATE, SerialSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::device_controller::DeviceProfile;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The config parsed but describes something the bridge cannot run.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// One switch and the labels of its four inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Display name; must be unique across the file.
    pub name: String,
    /// Serial device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub path: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_input1")]
    pub input1: String,
    #[serde(default = "default_input2")]
    pub input2: String,
    #[serde(default = "default_input3")]
    pub input3: String,
    #[serde(default = "default_input4")]
    pub input4: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}
fn default_input1() -> String {
    "Input 1".to_string()
}
fn default_input2() -> String {
    "Input 2".to_string()
}
fn default_input3() -> String {
    "Input 3".to_string()
}
fn default_input4() -> String {
    "Input 4".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl DeviceConfig {
    /// Creates an entry with the default baud rate and input labels.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            baud_rate: default_baud_rate(),
            input1: default_input1(),
            input2: default_input2(),
            input3: default_input3(),
            input4: default_input4(),
        }
    }

    pub fn serial_settings(&self) -> SerialSettings {
        SerialSettings::new(self.path.clone(), self.baud_rate)
    }

    /// Converts the entry into what a device controller is built from.
    pub fn to_profile(&self) -> DeviceProfile {
        DeviceProfile {
            name: self.name.clone(),
            serial: self.serial_settings(),
            input_labels: [
                self.input1.clone(),
                self.input2.clone(),
                self.input3.clone(),
                self.input4.clone(),
            ],
        }
    }
}

impl AppConfig {
    /// Config with a single placeholder device, written by `--init`.
    pub fn example() -> Self {
        let mut device = DeviceConfig::new("Office KVM", "/dev/ttyUSB0");
        device.input1 = "Workstation".to_string();
        device.input2 = "Laptop".to_string();
        Self {
            bridge: BridgeConfig::default(),
            devices: vec![device],
        }
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty name or path, a zero
    /// baud rate, or two devices sharing a name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for (i, device) in self.devices.iter().enumerate() {
            let position = i + 1;
            if device.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("device #{position} has an empty name")));
            }
            if device.path.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "device {:?} has an empty serial path",
                    device.name
                )));
            }
            if device.baud_rate == 0 {
                return Err(ConfigError::Invalid(format!(
                    "device {:?} has a zero baud rate",
                    device.name
                )));
            }
            if !names.insert(device.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "device name {:?} is used more than once",
                    device.name
                )));
            }
        }
        Ok(())
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads and validates the config at `path`, returning `AppConfig::default()`
/// if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::Invalid`] if validation fails.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<AppConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Writes `config` to `path` as pretty TOML, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `hd6224` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("HD6224"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("hd6224"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("HD6224")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("hd6224_test_{}", Uuid::new_v4()))
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_has_no_devices() {
        let cfg = AppConfig::default();
        assert!(cfg.devices.is_empty());
        assert_eq!(cfg.bridge.log_level, "info");
    }

    #[test]
    fn test_minimal_device_entry_uses_defaults() {
        // Arrange
        let toml_str = r#"
[[devices]]
name = "Office KVM"
path = "/dev/ttyUSB0"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize minimal");

        // Assert
        let device = &cfg.devices[0];
        assert_eq!(device.baud_rate, 9600);
        assert_eq!(device.input1, "Input 1");
        assert_eq!(device.input4, "Input 4");
        assert_eq!(cfg.bridge.log_level, "info");
    }

    #[test]
    fn test_full_device_entry_overrides_defaults() {
        let toml_str = r#"
[bridge]
log_level = "debug"

[[devices]]
name = "Office KVM"
path = "/dev/ttyUSB0"
baud_rate = 19200
input1 = "Workstation"
input2 = "Laptop"
input3 = "Media PC"
input4 = "Lab"
"#;

        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize full");

        assert_eq!(cfg.bridge.log_level, "debug");
        let profile = cfg.devices[0].to_profile();
        assert_eq!(profile.serial.baud_rate, 19200);
        assert_eq!(profile.serial.path, "/dev/ttyUSB0");
        assert_eq!(profile.input_labels[2], "Media PC");
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_device_without_path_is_rejected_by_serde() {
        let result: Result<AppConfig, toml::de::Error> =
            toml::from_str("[[devices]]\nname = \"kvm\"\n");
        assert!(result.is_err(), "path is required");
    }

    #[test]
    fn test_example_config_is_valid() {
        let cfg = AppConfig::example();
        assert_eq!(cfg.devices.len(), 1);
        assert!(cfg.validate().is_ok());
    }

    // ── Validation ────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_accepts_distinct_devices() {
        let cfg = AppConfig {
            devices: vec![
                DeviceConfig::new("a", "/dev/ttyUSB0"),
                DeviceConfig::new("b", "/dev/ttyUSB1"),
            ],
            ..AppConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let cfg = AppConfig {
            devices: vec![
                DeviceConfig::new("kvm", "/dev/ttyUSB0"),
                DeviceConfig::new("kvm", "/dev/ttyUSB1"),
            ],
            ..AppConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_path_and_zero_baud() {
        let mut empty_path = AppConfig::default();
        empty_path.devices.push(DeviceConfig::new("kvm", "  "));
        assert!(matches!(empty_path.validate(), Err(ConfigError::Invalid(_))));

        let mut zero_baud = AppConfig::default();
        let mut device = DeviceConfig::new("kvm", "/dev/ttyUSB0");
        device.baud_rate = 0;
        zero_baud.devices.push(device);
        assert!(matches!(zero_baud.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut cfg = AppConfig::default();
        cfg.devices.push(DeviceConfig::new("", "/dev/ttyUSB0"));
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    // ── File repository ──────────────────────────────────────────────────────

    #[test]
    fn test_load_config_from_missing_file_returns_default() {
        let path = temp_dir().join("config.toml");
        let cfg = load_config_from(&path).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        let mut device = DeviceConfig::new("Office KVM", "/dev/ttyUSB0");
        device.input2 = "Laptop".to_string();
        cfg.devices.push(device);

        // Act
        save_config_to(&path, &cfg).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_from_malformed_file_returns_parse_error() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "devices = 3").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_from_invalid_file_returns_invalid() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[devices]]\nname = \"kvm\"\npath = \"\"\n").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
            assert!(path.parent().map_or(false, |p| p.ends_with("hd6224") || p.ends_with("HD6224")));
        }
        // NoPlatformConfigDir in a stripped CI environment is also acceptable.
    }
}
