use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::KeyControllerError;
use crate::resource::KeyResourceData;

/// JSON file holding the single key record managed by the CLI.
///
/// The record may contain import material, so the file is written owner-only.
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<KeyResourceData, KeyControllerError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            KeyControllerError::State(format!(
                "Failed to read state file {}: {e}",
                self.path.display()
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            KeyControllerError::State(format!(
                "Failed to parse state file {}: {e}",
                self.path.display()
            ))
        })
    }

    pub fn save(&self, data: &KeyResourceData) -> Result<(), KeyControllerError> {
        let serialized = serde_json::to_string_pretty(data)
            .map_err(|e| KeyControllerError::State(format!("Failed to serialize record: {e}")))?;

        fs::write(&self.path, serialized).map_err(|e| {
            KeyControllerError::State(format!(
                "Failed to write state file {}: {e}",
                self.path.display()
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)
                .map_err(|e| KeyControllerError::State(format!("Failed to get state file metadata: {e}")))?
                .permissions();
            perms.set_mode(0o600); // rw-------
            fs::set_permissions(&self.path, perms).map_err(|e| {
                KeyControllerError::State(format!("Failed to set state file permissions: {e}"))
            })?;
        }

        debug!("State written to {}", self.path.display());
        Ok(())
    }

    /// Remove the file; a file that is already gone is not an error
    pub fn remove(&self) -> Result<(), KeyControllerError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KeyControllerError::State(format!(
                "Failed to remove state file {}: {e}",
                self.path.display()
            ))),
        }
    }
}
