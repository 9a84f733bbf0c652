//! The published package record: sibling packages already published in this run.

use std::path::Path;

use crate::error::{Error, Result};

/// One `name:version` entry of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPackage {
    pub name: String,
    pub version: String,
}

impl PublishedPackage {
    /// Parse a single `name:version` entry.
    ///
    /// Only the first two `:`-separated segments are used; anything after a
    /// second colon is ignored.
    pub fn parse(entry: &str) -> Result<Self> {
        let mut parts = entry.split(':');
        let name = parts.next().unwrap_or_default();
        match parts.next() {
            Some(version) if !name.is_empty() && !version.is_empty() => Ok(Self {
                name: name.to_string(),
                version: version.to_string(),
            }),
            _ => Err(Error::InvalidRecordEntry {
                entry: entry.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PublishedPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Ordered list of published packages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedRecord {
    packages: Vec<PublishedPackage>,
}

impl PublishedRecord {
    /// Build a record from raw `name:version` strings.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let packages = entries
            .into_iter()
            .map(|entry| PublishedPackage::parse(entry.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { packages })
    }

    /// Parse a record from its JSON text (an array of strings).
    pub fn parse(json: &str) -> Result<Self> {
        let entries: Vec<String> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load the record file written by the publishing stage.
    pub fn load(path: &Path) -> Result<Self> {
        let entries: Vec<String> = beta_fs::read_json(path)?;
        let record = Self::from_entries(entries)?;
        tracing::debug!(path = %path.display(), packages = record.len(), "loaded published package record");
        Ok(record)
    }

    pub fn packages(&self) -> &[PublishedPackage] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scoped_package() {
        let pkg = PublishedPackage::parse("@iceworks/common-service:1.0.3").unwrap();
        assert_eq!(pkg.name, "@iceworks/common-service");
        assert_eq!(pkg.version, "1.0.3");
    }

    #[test]
    fn test_parse_ignores_extra_segments() {
        let pkg = PublishedPackage::parse("foo:1.2.0:ignored").unwrap();
        assert_eq!(pkg.version, "1.2.0");
    }

    #[test]
    fn test_parse_rejects_missing_version() {
        assert!(PublishedPackage::parse("foo").is_err());
        assert!(PublishedPackage::parse("foo:").is_err());
        assert!(PublishedPackage::parse(":1.0.0").is_err());
    }

    #[test]
    fn test_display_matches_entry_format() {
        let pkg = PublishedPackage::parse("foo:1.2.0").unwrap();
        assert_eq!(pkg.to_string(), "foo:1.2.0");
    }

    #[test]
    fn test_record_parse_keeps_order() {
        let record = PublishedRecord::parse(r#"["b:2.0.0", "a:1.0.0"]"#).unwrap();
        let names: Vec<_> = record.packages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_record_parse_rejects_non_string_entries() {
        assert!(matches!(
            PublishedRecord::parse(r#"[1, 2]"#),
            Err(Error::RecordParse(_))
        ));
    }

    #[test]
    fn test_empty_record() {
        let record = PublishedRecord::parse("[]").unwrap();
        assert!(record.is_empty());
    }
}
