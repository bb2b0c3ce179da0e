//! Domain entities for the HD6224 bridge.
//!
//! This module contains plain data with no infrastructure dependencies.
//! Code in outer layers (the controller, the serial adapter, the command
//! bridge) depends on these types, but the domain never depends on them.

/// Static identity of a KVM unit as seen by the automation host.
pub mod accessory;

/// Input identifiers and per-slot display metadata.
pub mod input;

/// Serial line settings and the HD6224A's fixed framing.
pub mod serial;
