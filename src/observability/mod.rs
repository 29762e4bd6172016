//! OpenTelemetry tracing with file-based OTLP export.
//!
//! Library code only emits `tracing` spans and events. This module wires them
//! to disk for callers that want a trace of what the store and sheet did:
//!
//! ```text
//! tracing → tracing-opentelemetry → opentelemetry_sdk → OTLP JSON lines → rotating file
//! ```
//!
//! The level comes from [`Config::trace_level`](crate::Config::trace_level)
//! (default `"info"`). Files rotate at 10 MiB and keep three backups.
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `exporter`: Span exporter and OTLP JSON encoding
//! - `rotating_file`: Size-rotated line writer

mod exporter;
mod init;
mod rotating_file;

pub use init::init_tracing;
