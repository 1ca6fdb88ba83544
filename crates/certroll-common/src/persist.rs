//! JSON documents on disk.
//!
//! Decode failures surface as `io::ErrorKind::InvalidData` so callers can
//! tell a corrupt document from one that could not be read at all.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

fn invalid_data(e: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, io::Error> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(invalid_data)
}

/// Like [`read_json`], but a missing file is `Ok(None)`.
pub fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, io::Error> {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(invalid_data),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write `value` as pretty JSON, replacing `path` in one step.
///
/// Readers see either the old or the new document, never a partial one.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), io::Error> {
    let mut json = serde_json::to_vec_pretty(value).map_err(invalid_data)?;
    json.push(b'\n');
    replace_file(path, &json)
}

/// Sync `contents` into a sibling `.json.tmp`, then rename it over `path`.
fn replace_file(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp);
    })
}
