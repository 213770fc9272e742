//! Singer target driver for the `custom_object_records` stream.
//!
//! Reads newline-delimited SCHEMA / RECORD / STATE messages, resolves each
//! record into an operation and decides when batches are flushed: when a
//! group fills up, on every STATE message and at end of input. A STATE is
//! only echoed to the output after the flush it follows has succeeded.

mod error;
mod message;
mod runner;

pub use error::{DriverError, DriverResult};
pub use message::{SingerMessage, SUPPORTED_STREAM};
pub use runner::{DriverOptions, RunSummary, StreamDriver};
