//! # hd6224-core
//!
//! Shared library for the HD6224 serial bridge containing the domain types,
//! the outbound command encoding, and the inbound line decoder for the
//! BlackBox HD6224A four-port KVM switch.
//!
//! It has zero dependencies on OS APIs, serial drivers, or async runtimes.
//!
//! # Architecture overview
//!
//! The HD6224A is a hardware KVM switch that routes one of four inputs to a
//! shared keyboard, monitor, and mouse.  It is controlled over RS-232 with a
//! tiny ASCII command set.  This crate defines:
//!
//! - **`domain`** – Pure data with no behaviour beyond validation: input
//!   identifiers and their display labels, the static accessory identity
//!   published to the automation host, and the fixed serial framing.
//!
//! - **`protocol`** – How bytes travel over the serial line.  Outbound
//!   commands are encoded as `//m<N>\r\n`; inbound bytes are split into lines
//!   on a bare carriage return.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `hd6224_core::InputId` instead of `hd6224_core::domain::input::InputId`.
pub use domain::accessory::{AccessoryCategory, AccessoryInfo};
pub use domain::input::{InputDescriptor, InputId, ParseInputIdError, INPUT_COUNT};
pub use domain::serial::{SerialFraming, SerialSettings};
pub use protocol::command::KvmCommand;
pub use protocol::line_decoder::LineDecoder;
