//! Sample corpus loading
//!
//! Samples cross the crate boundary as JSON-serialized element trees, one
//! file per logical sample. This module collects and parses them from files
//! or directories, in sorted order so runs are deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::element::Sample;
use crate::error::{Result, SchemaError};

/// Collect sample files from a mix of file and directory inputs.
///
/// Directories are walked recursively for `*.json` files; results are sorted.
/// A missing input is [`SchemaError::TargetNotFound`].
pub fn collect_sample_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            return Err(SchemaError::TargetNotFound {
                path: input.display().to_string(),
            });
        }
    }
    files.sort();
    Ok(files)
}

/// Parse one sample file. A file that cannot be read or parsed is a
/// malformed sample, recoverable by the caller.
pub fn load_sample(path: &Path) -> Result<Sample> {
    let file = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|err| SchemaError::MalformedSample {
        file: file.clone(),
        reason: err.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|err| SchemaError::MalformedSample {
        file,
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use tempfile::tempdir;

    #[test]
    fn test_collect_sorted_from_directory() {
        let dir = tempdir().unwrap();
        for name in ["b.json", "a.json", "ignore.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let files = collect_sample_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let err = collect_sample_files(&[PathBuf::from("/no/such/corpus")]).unwrap_err();
        assert!(matches!(err, SchemaError::TargetNotFound { .. }));
    }

    #[test]
    fn test_unparseable_sample_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        let err = load_sample(&path).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedSample { .. }));
    }

    #[test]
    fn test_load_sample_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("story.json");
        let sample = Sample::new("Stories/Story_u1.xml", Element::new("Story"));
        fs::write(&path, serde_json::to_string(&sample).unwrap()).unwrap();

        let loaded = load_sample(&path).unwrap();
        assert_eq!(loaded.file, "Stories/Story_u1.xml");
    }
}
