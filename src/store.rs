//! Schema snapshot persistence
//!
//! Snapshots are JSON envelopes: the observed schema plus a creation
//! timestamp and a SHA256 checksum of the schema content. Writes are
//! all-or-nothing: the envelope lands in a temp file beside the target and
//! is renamed into place, so a consumer can never observe a partial snapshot.
//! Loads verify the checksum and reject envelopes with missing or misshapen
//! fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::checksum::Checksum;
use crate::error::{Result, SchemaError};
use crate::schema::ObservedSchema;

/// On-disk snapshot envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    /// When this snapshot was written
    pub created_at: DateTime<Utc>,
    /// SHA256 of the schema's canonical JSON
    pub checksum: Checksum,
    /// The schema itself
    pub schema: ObservedSchema,
}

/// Write an output artifact completely or not at all: the content lands in a
/// temp file beside the target and is renamed into place. Applies to every
/// artifact the engine emits, not just snapshots.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Temp file in the same directory so the rename stays on one filesystem.
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Write a schema snapshot to `path`, completely or not at all
pub fn save_snapshot(schema: &ObservedSchema, path: &Path) -> Result<()> {
    let content = serde_json::to_value(schema)?;
    let envelope = SnapshotEnvelope {
        created_at: Utc::now(),
        checksum: Checksum::from_json(&content),
        schema: schema.clone(),
    };
    let json = serde_json::to_string_pretty(&envelope)?;
    write_artifact(path, &json)?;

    info!(path = %path.display(), tags = schema.tag_count(), "wrote schema snapshot");
    Ok(())
}

/// Load a schema snapshot from `path`, verifying shape and checksum
pub fn load_snapshot(path: &Path) -> Result<ObservedSchema> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(SchemaError::TargetNotFound {
                path: path.display().to_string(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    let envelope: SnapshotEnvelope =
        serde_json::from_str(&raw).map_err(|err| SchemaError::SchemaFormat {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

    let content = serde_json::to_value(&envelope.schema)?;
    if !envelope.checksum.verify_json(&content) {
        return Err(SchemaError::SchemaFormat {
            path: path.display().to_string(),
            reason: "content does not match recorded checksum".to_string(),
        });
    }

    Ok(envelope.schema)
}

/// A directory of named schema snapshots
pub struct SchemaStore {
    root: PathBuf,
}

impl SchemaStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of a named snapshot
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }

    /// Persist a schema under a snapshot name
    pub fn save(&self, name: &str, schema: &ObservedSchema) -> Result<()> {
        save_snapshot(schema, &self.path(name))
    }

    /// Load a named snapshot, read-only
    pub fn load(&self, name: &str) -> Result<ObservedSchema> {
        load_snapshot(&self.path(name))
    }

    /// List available snapshot names, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        match fs::read_dir(&self.root) {
            Ok(entries) => {
                for entry in entries {
                    let path = entry?.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("json") {
                        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                            names.push(stem.to_string());
                        }
                    }
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulate::SchemaBuilder;
    use crate::config::EngineConfig;
    use crate::element::{Element, Sample};
    use tempfile::tempdir;

    fn schema() -> ObservedSchema {
        let mut builder = SchemaBuilder::new(&EngineConfig::default());
        builder.merge_corpus(&[Sample::new(
            "Stories/Story_u1.xml",
            Element::new("Story").attr("Self", "u1"),
        )]);
        builder.finish()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SchemaStore::open(dir.path());

        store.save("baseline", &schema()).unwrap();
        let loaded = store.load("baseline").unwrap();
        assert_eq!(loaded, schema());
        assert_eq!(store.list().unwrap(), vec!["baseline".to_string()]);
    }

    #[test]
    fn test_missing_snapshot_is_target_not_found() {
        let dir = tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SchemaError::TargetNotFound { .. }));
    }

    #[test]
    fn test_misshapen_snapshot_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"elements": {}}"#).unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaFormat { .. }));
    }

    #[test]
    fn test_tampered_snapshot_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snap.json");
        save_snapshot(&schema(), &path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let tampered = raw.replace("\"count\": 1", "\"count\": 7");
        assert_ne!(raw, tampered);
        fs::write(&path, tampered).unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaFormat { .. }));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snap.json");
        save_snapshot(&schema(), &path).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
