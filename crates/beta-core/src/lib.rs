//! Beta publishing orchestration.
//!
//! [`Publisher::run`] drives one beta release of an extension monorepo:
//!
//! 1. discover extensions and keep those with an unpublished local version
//! 2. pin sibling packages in each candidate's `package.json` and `web/package.json`
//! 3. install dependencies once
//! 4. package each candidate in turn and submit its archive for upload
//! 5. report a summary, after the uploads finish unless [`UploadMode::Detached`]
//!
//! Per-extension failures are collected in the [`PublishReport`]; only
//! configuration, discovery and install failures end the run early.

pub mod config;
pub mod discovery;
pub mod error;
pub mod observer;
pub mod publisher;
pub mod report;

pub use config::{DiscoveryConfig, InstallConfig, PackagerConfig, PublishConfig, UploadMode};
pub use discovery::{
    CommandVersionRegistry, ExtensionInfo, ExtensionSource, StaticExtensionSource,
    StaticVersionRegistry, VersionRegistry, WorkspaceExtensionSource, is_unpublished,
};
pub use error::{Error, Result};
pub use observer::{NoopObserver, PublishObserver};
pub use publisher::Publisher;
pub use report::{CandidateReport, PackageStatus, PublishReport, Summary, UploadStatus};
