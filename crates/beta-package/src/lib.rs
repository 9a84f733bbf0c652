//! External tool invocations for beta publishing.
//!
//! - [`Packager`] / [`VscePackager`]: runs `vsce package` in an extension
//!   directory and returns the archive it produced
//! - [`DependencyInstaller`] / [`CommandInstaller`]: bulk dependency install
//!   before packaging
//!
//! Both stream the child's output to the terminal and treat a non-zero exit
//! status as a failure.

pub mod error;
pub mod installer;
pub mod packager;

pub use error::{Error, Result};
pub use installer::{CommandInstaller, DependencyInstaller, check_binary_on_path};
pub use packager::{Packager, VscePackager, archive_file_name};
