//! Shared test utilities for the beta publisher workspace.
//!
//! This crate provides a temporary extension monorepo fixture so crate test
//! suites do not each hand-roll `package.json` trees. It is a dev-dependency
//! only, never published.

pub mod monorepo;

pub use monorepo::TestMonorepo;
