//! JSON artifacts written under the output directory
//!
//! Every write fully overwrites the target file. There is no locking or
//! atomic rename; a run is single-process and sequential.

use crate::error::{ConnectError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// File holding the whole authorization payload
pub const AUTHZ_PAYLOAD_FILE: &str = "authz_payload.json";

/// File holding the raw Connected App listing
pub const APP_LIST_FILE: &str = "list_of_apps.json";

/// File holding the request body sent for one organization
pub fn org_authz_file(org_id: &str) -> String {
    format!("authz_{}.json", org_id)
}

/// Writes and reads JSON artifacts in one directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `value` as 4-space indented JSON to `name`, creating the
    /// directory when needed
    ///
    /// # Returns
    ///
    /// The path written
    pub fn write_json(&self, name: &str, value: &Value) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ConnectError::Artifact(format!(
                "failed to create output directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut ser)?;

        let path = self.dir.join(name);
        std::fs::write(&path, buf).map_err(|e| {
            ConnectError::Artifact(format!("failed to write {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Wrote artifact");
        Ok(path)
    }

    /// Read an artifact back
    pub fn read_json(&self, name: &str) -> Result<Value> {
        let path = self.dir.join(name);
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            ConnectError::Artifact(format!("failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}
