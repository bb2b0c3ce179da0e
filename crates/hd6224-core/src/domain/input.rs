//! Input identifiers and input-slot descriptors.
//!
//! The HD6224A exposes four video/USB inputs numbered 1 through 4.  The
//! automation host refers to them by numeric identifier; the user sees the
//! free-text label configured for each slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of physical inputs on the HD6224A.
pub const INPUT_COUNT: usize = 4;

/// Identifier of a KVM input as sent by the automation host.
///
/// The nominal domain is `1..=4`, but the identifier is deliberately not
/// range-checked on construction: the host owns that constraint and the
/// controller forwards whatever it receives.  Use [`InputId::is_in_range`]
/// to detect values the switch will not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputId(u32);

impl InputId {
    /// Input selected before any command has been issued.
    pub const DEFAULT: InputId = InputId(1);

    /// The four identifiers the switch understands, in port order.
    pub const ALL: [InputId; INPUT_COUNT] = [InputId(1), InputId(2), InputId(3), InputId(4)];

    /// Wraps a raw identifier without validating it.
    pub const fn new(raw: u32) -> Self {
        InputId(raw)
    }

    /// Returns the raw numeric identifier.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` if the identifier names one of the four physical inputs.
    pub const fn is_in_range(self) -> bool {
        self.0 >= 1 && self.0 <= INPUT_COUNT as u32
    }
}

impl Default for InputId {
    fn default() -> Self {
        InputId::DEFAULT
    }
}

impl From<u32> for InputId {
    fn from(raw: u32) -> Self {
        InputId(raw)
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when text cannot be parsed as an [`InputId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input identifier {0:?}: expected an unsigned integer")]
pub struct ParseInputIdError(pub String);

impl FromStr for InputId {
    type Err = ParseInputIdError;

    /// Parses a decimal identifier.  Out-of-range numbers such as `7` parse
    /// successfully; only non-numeric text is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(InputId)
            .map_err(|_| ParseInputIdError(s.to_string()))
    }
}

/// Physical connector type advertised for an input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSourceType {
    Hdmi,
}

/// Display metadata for one input slot.  Carries no behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    /// Identifier the host sends when the user picks this slot.
    pub id: InputId,
    /// Internal slot name (`input1` … `input4`).
    pub name: String,
    /// User-configured label, e.g. `"Workstation"`.
    pub label: String,
    pub source_type: InputSourceType,
    /// Every slot is reported as configured.
    pub configured: bool,
    /// Every slot is reported as visible.
    pub visible: bool,
}

impl InputDescriptor {
    /// Creates the descriptor for slot `id` with the given label.
    pub fn new(id: InputId, label: impl Into<String>) -> Self {
        Self {
            id,
            name: format!("input{id}"),
            label: label.into(),
            source_type: InputSourceType::Hdmi,
            configured: true,
            visible: true,
        }
    }

    /// Builds the four slot descriptors from their labels, in port order.
    pub fn slots<S: AsRef<str>>(labels: &[S; INPUT_COUNT]) -> Vec<InputDescriptor> {
        InputId::ALL
            .iter()
            .zip(labels.iter())
            .map(|(id, label)| InputDescriptor::new(*id, label.as_ref()))
            .collect()
    }
}
