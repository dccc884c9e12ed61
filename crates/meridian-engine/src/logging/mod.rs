//! Logging setup.
//!
//! The engine logs through the `log` facade; this module only wires up
//! `env_logger` once for binaries and tests.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
