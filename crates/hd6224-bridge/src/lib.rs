//! hd6224-bridge library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the bridge do?
//!
//! The bridge sits between a home-automation host and one or more BlackBox
//! HD6224A KVM switches attached over RS-232.  The host asks for two things:
//! "power" (which the bridge maps to opening or closing the serial port) and
//! "select input N" (which becomes a `//mN\r\n` command on the wire).  State
//! queries are answered from memory; the switch is never polled.

/// Application layer: the device controller, registry, and host capabilities.
pub mod application;

/// Infrastructure layer: serial transport, config storage, and the host command bridge.
pub mod infrastructure;
