//! Application layer for the bridge.
//!
//! Use cases here depend on the [`SerialTransport`] trait rather than a
//! concrete serial driver, so they can be exercised with in-memory transports.
//!
//! # Sub-modules
//!
//! - **`device_controller`** – Turns power and input-selection requests into
//!   transport calls and answers state queries from its local cache.
//!
//! - **`device_registry`** – Holds every configured controller and resolves
//!   the host's device references.
//!
//! - **`host`** – The capability struct the host hands to each controller and
//!   the events controllers publish back.
//!
//! [`SerialTransport`]: crate::infrastructure::serial::SerialTransport

pub mod device_controller;
pub mod device_registry;
pub mod host;
