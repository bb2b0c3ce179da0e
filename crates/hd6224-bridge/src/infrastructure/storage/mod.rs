//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads and writes the TOML file that lists the
//! switches to control, falling back to an empty configuration when the file
//! does not exist yet.

pub mod config;
