//! TOML-file entry store backend
//!
//! One TOML document per store: each table is keyed by the full entry
//! name, with a `value` string and an optional `meta` table:
//!
//! ```toml
//! ["user/hello"]
//! value = "22"
//!
//! ["user/act/%"]
//! value = "10"
//! meta = { comment = "inactive-layer default" }
//! ```

use crate::error::{Error, Result};
use crate::store::EntryStore;
use ctx_entries::{Entry, EntryName, EntrySet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct Document {
    entries: BTreeMap<String, EntryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    meta: BTreeMap<String, String>,
}

/// An entry store backed by a single TOML file.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
}

impl TomlStore {
    /// Open a store at `path`. The file does not have to exist yet;
    /// loading a missing file yields an empty set.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntryStore for TomlStore {
    fn load(&mut self) -> Result<EntrySet> {
        if !self.path.is_file() {
            tracing::debug!(path = %self.path.display(), "no store file, loading empty set");
            return Ok(EntrySet::new());
        }

        let text = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let document: Document = toml::from_str(&text).map_err(|e| Error::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let mut set = EntrySet::new();
        for (name, record) in document.entries {
            let name = EntryName::parse(&name)?;
            let mut entry = match record.value {
                Some(value) => Entry::new(name, value),
                None => Entry::without_value(name),
            };
            for (key, value) in record.meta {
                entry.set_meta(key, value);
            }
            set.append(entry);
        }
        tracing::debug!(path = %self.path.display(), count = set.len(), "loaded entry set");
        Ok(set)
    }

    fn commit(&mut self, set: &EntrySet) -> Result<()> {
        let mut document = Document::default();
        for entry in set.iter() {
            document.entries.insert(
                entry.name().to_string(),
                EntryRecord {
                    value: entry.value().map(str::to_string),
                    meta: entry
                        .meta_iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                },
            );
        }

        let text = toml::to_string_pretty(&document)?;
        fs::write(&self.path, text).map_err(|e| Error::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), count = set.len(), "committed entry set");
        Ok(())
    }
}
