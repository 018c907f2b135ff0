//! Structured logging.
//!
//! Every layer logs through `tracing` macros. This module installs the
//! subscriber that decides where those records go.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → stderr | FileWriter (rotating)
//! ```
//!
//! # Configuration
//!
//! Level is resolved from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! Setting `trace_file` redirects output to a file rotated at 10 MB with three
//! backups.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer

pub mod file_writer;
pub mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
