//! In-place editing of `package.json` dependency pins.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::record::PublishedRecord;

/// A dependency mapping inside a package manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencySection {
    Dependencies,
    DevDependencies,
}

impl DependencySection {
    /// Lookup order used when pinning: `dependencies` wins over `devDependencies`.
    pub const LOOKUP_ORDER: [DependencySection; 2] =
        [DependencySection::Dependencies, DependencySection::DevDependencies];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
        }
    }
}

impl std::fmt::Display for DependencySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A single pin applied to a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyChange {
    pub name: String,
    pub section: DependencySection,
    pub from: String,
    pub to: String,
}

/// A parsed package manifest.
///
/// The whole document is kept so that unrelated fields survive a rewrite;
/// key order is preserved.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl PackageManifest {
    /// Parse manifest text; `path` is only recorded for later saving and errors.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let value: Value = serde_json::from_str(content).map_err(|source| {
            beta_fs::Error::JsonParse {
                path: path.clone(),
                source,
            }
        })?;
        Self::from_value(path, value)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let value: Value = beta_fs::read_json(path)?;
        Self::from_value(path, value)
    }

    fn from_value(path: impl Into<PathBuf>, value: Value) -> Result<Self> {
        let path = path.into();
        match value {
            Value::Object(document) => Ok(Self { path, document }),
            _ => Err(Error::NotAnObject { path }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The version pinned for `name` in `section`, if present.
    pub fn dependency(&self, section: DependencySection, name: &str) -> Option<&Value> {
        self.document
            .get(section.key())
            .and_then(Value::as_object)
            .and_then(|deps| deps.get(name))
    }

    /// Pin every record entry found in `dependencies` or, failing that, in
    /// `devDependencies`. Returns the pins that changed a value.
    pub fn apply(&mut self, record: &PublishedRecord) -> Vec<DependencyChange> {
        let mut changes = Vec::new();

        for package in record.packages() {
            let Some(section) = DependencySection::LOOKUP_ORDER
                .into_iter()
                .find(|section| self.dependency(*section, &package.name).is_some_and(is_truthy))
            else {
                continue;
            };

            let Some(deps) = self
                .document
                .get_mut(section.key())
                .and_then(Value::as_object_mut)
            else {
                continue;
            };

            let previous = deps.insert(
                package.name.clone(),
                Value::String(package.version.clone()),
            );
            let from = previous.as_ref().map(display_value).unwrap_or_default();
            if from != package.version {
                changes.push(DependencyChange {
                    name: package.name.clone(),
                    section,
                    from,
                    to: package.version.clone(),
                });
            }
        }

        changes
    }

    /// Pretty-printed JSON text of the current document.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.document).map_err(|source| {
            Error::Fs(beta_fs::Error::JsonSerialize {
                path: self.path.clone(),
                source,
            })
        })
    }

    /// Overwrite the manifest file with the full, reserialized document.
    pub fn save(&self) -> Result<()> {
        beta_fs::write_json_pretty(&self.path, &self.document)?;
        Ok(())
    }
}

/// Mirrors the truthiness check the release scripts use for dependency entries.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
