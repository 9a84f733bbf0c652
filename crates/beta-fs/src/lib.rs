//! Filesystem helpers for the beta publisher
//!
//! Provides atomic writes and JSON document I/O for manifest files.

pub mod error;
pub mod io;

pub use error::{Error, Result};
pub use io::{read_json, read_text, write_atomic, write_json_pretty};
