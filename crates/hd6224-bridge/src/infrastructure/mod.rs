//! Infrastructure layer for the bridge.
//!
//! Contains OS-facing adapters: the serial port driver, TOML configuration
//! storage, and the line-oriented command bridge the binary uses in place of
//! a full automation host.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `hd6224_core`; the application layer only reaches into it for the
//! [`serial::SerialTransport`] trait and its error type.

pub mod command_bridge;
pub mod serial;
pub mod storage;
