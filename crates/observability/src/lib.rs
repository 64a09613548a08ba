//! # sanvidhan-observability
//!
//! Structured Logging via tracing-subscriber. Die Ausgabe geht nach
//! stderr, damit die Terminal-Oberflaeche auf stdout ungestoert bleibt.

pub mod logging;

pub use logging::{logging_initialisieren, LogEinstellungen, LogFormat};
