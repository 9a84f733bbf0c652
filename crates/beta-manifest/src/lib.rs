//! Package manifest patching for beta publishing.
//!
//! Before an extension is packaged for the beta channel, every sibling package
//! that was already published in this run is pinned to its freshly published
//! version. The list of those packages (the published package record) is a
//! JSON array of `"name:version"` strings written by an earlier stage.
//!
//! - [`PublishedRecord`] loads and parses that list
//! - [`PackageManifest`] edits the `dependencies`/`devDependencies` sections
//! - [`ManifestPatcher`] ties both together per extension directory and turns
//!   every failure into a [`PatchReport`] instead of aborting the run

pub mod error;
pub mod manifest;
pub mod patcher;
pub mod record;

/// Name of the manifest file inside an extension (or nested web project) directory.
pub const MANIFEST_FILENAME: &str = "package.json";

pub use error::{Error, Result};
pub use manifest::{DependencyChange, DependencySection, PackageManifest};
pub use patcher::{ManifestPatcher, PatchOutcome, PatchReport};
pub use record::{PublishedPackage, PublishedRecord};
