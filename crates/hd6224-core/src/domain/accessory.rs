//! Static identity published for each KVM unit.
//!
//! The automation host shows this information in its device details view.
//! None of it is read from the switch; the manufacturer, model, and firmware
//! strings are fixed for the HD6224A and the serial number is the configured
//! serial path, which is the only thing that tells two units apart.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MANUFACTURER: &str = "BlackBox";
pub const MODEL: &str = "HD6224A";
pub const FIRMWARE_REVISION: &str = "V2";

/// Category hint for the host's device icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryCategory {
    TvSetTopBox,
}

/// Identity metadata for one configured KVM unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInfo {
    /// Stable identifier derived from the serial path.
    pub id: Uuid,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub firmware_revision: String,
    /// The serial device path, e.g. `/dev/ttyUSB0`.
    pub serial_number: String,
    pub category: AccessoryCategory,
}

impl AccessoryInfo {
    /// Builds the identity for a unit attached at `path`.
    ///
    /// The identifier is a UUID v5 of the path, so a restart with the same
    /// configuration yields the same identity.
    pub fn new(name: impl Into<String>, path: &str) -> Self {
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("hd6224:{path}").as_bytes()),
            name: name.into(),
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            firmware_revision: FIRMWARE_REVISION.to_string(),
            serial_number: path.to_string(),
            category: AccessoryCategory::TvSetTopBox,
        }
    }
}
