//! Image labels.
//!
//! [`Labels`] is the ordered key/value collection carried by a `LABEL`
//! instruction, and [`OciLabels`] maps the standard OCI annotation fields onto
//! their well-known keys.
//!
//! # Label Schema
//!
//! - `org.opencontainers.image.title` - Human-readable image title
//! - `org.opencontainers.image.version` - Version of the packaged software
//! - `org.opencontainers.image.vendor` - Distributing entity
//! - `org.opencontainers.image.description` - Human-readable description
//! - `org.opencontainers.image.url` - Where to find more information
//! - `org.opencontainers.image.source` - Source repository URL
//! - `org.opencontainers.image.licenses` - SPDX license expression
//! - `org.opencontainers.image.revision` - Source control revision
//! - `org.opencontainers.image.created` - RFC 3339 creation timestamp
//!
//! # Example
//!
//! ```
//! use dockergen_core::{oci_labels, OciLabels};
//!
//! let label = oci_labels(OciLabels {
//!     title: Some("my-app".to_string()),
//!     version: Some("1.0.0".to_string()),
//!     ..Default::default()
//! });
//! assert_eq!(
//!     label.render(),
//!     "LABEL \\\n      org.opencontainers.image.title=\"my-app\" \\\n      org.opencontainers.image.version=\"1.0.0\""
//! );
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;

pub const OCI_TITLE: &str = "org.opencontainers.image.title";
pub const OCI_VERSION: &str = "org.opencontainers.image.version";
pub const OCI_VENDOR: &str = "org.opencontainers.image.vendor";
pub const OCI_DESCRIPTION: &str = "org.opencontainers.image.description";
pub const OCI_URL: &str = "org.opencontainers.image.url";
pub const OCI_SOURCE: &str = "org.opencontainers.image.source";
pub const OCI_LICENSES: &str = "org.opencontainers.image.licenses";
pub const OCI_REVISION: &str = "org.opencontainers.image.revision";
pub const OCI_CREATED: &str = "org.opencontainers.image.created";

/// Insertion-ordered label map.
///
/// Re-inserting an existing key replaces its value but keeps its original
/// position, so rendering stays stable across overlays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(IndexMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`; entries from `other` win on collision.
    pub fn overlay(&mut self, other: &Labels) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Labels
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut labels = Labels::new();
        labels.extend(iter);
        labels
    }
}

impl<K, V> Extend<(K, V)> for Labels
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl From<IndexMap<String, String>> for Labels {
    fn from(map: IndexMap<String, String>) -> Self {
        Self(map)
    }
}

/// Standard OCI annotation fields.
///
/// Unset fields are omitted from the resulting label. `extra` is merged last
/// and overrides any well-known key it repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OciLabels {
    pub title: Option<String>,
    pub version: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub licenses: Option<String>,
    pub revision: Option<String>,
    pub created: Option<String>,
    pub extra: Labels,
}

impl OciLabels {
    /// Collect the set fields, in schema order, followed by the overlay.
    pub fn to_labels(&self) -> Labels {
        let well_known = [
            (OCI_TITLE, &self.title),
            (OCI_VERSION, &self.version),
            (OCI_VENDOR, &self.vendor),
            (OCI_DESCRIPTION, &self.description),
            (OCI_URL, &self.url),
            (OCI_SOURCE, &self.source),
            (OCI_LICENSES, &self.licenses),
            (OCI_REVISION, &self.revision),
            (OCI_CREATED, &self.created),
        ];

        let mut labels: Labels = well_known
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
            .collect();
        labels.overlay(&self.extra);
        labels
    }
}

/// Build a `LABEL` instruction from standard OCI annotation fields.
pub fn oci_labels(fields: OciLabels) -> Instruction {
    Instruction::Label {
        labels: fields.to_labels(),
    }
}
