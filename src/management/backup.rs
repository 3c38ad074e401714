use std::collections::BTreeMap;
use std::io::Error;
use std::path::PathBuf;

use crate::library::{LocalTrack, Uri};

#[derive(Debug)]
pub enum BackupError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for BackupError {
    fn from(err: Error) -> Self {
        BackupError::IoError(err)
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        BackupError::SerdeError(err)
    }
}

/// Persists the lightweight `path -> uri` backup map.
///
/// The URI tri-state serializes as `null` (unresolved), `false` (confirmed
/// unavailable), or a string, so a restore never conflates "never searched"
/// with "searched but absent".
pub struct BackupManager {
    path: PathBuf,
}

impl BackupManager {
    pub fn new() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("splisync/backup/uris.json");
        BackupManager { path }
    }

    pub fn with_path(path: PathBuf) -> Self {
        BackupManager { path }
    }

    pub async fn save<'a>(
        &self,
        tracks: impl Iterator<Item = &'a LocalTrack>,
    ) -> Result<usize, BackupError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(BackupError::IoError)?;
        }

        let map: BTreeMap<&std::path::Path, &Uri> =
            tracks.map(|t| (t.path.as_path(), &t.uri)).collect();
        let json = serde_json::to_string_pretty(&map)?;
        async_fs::write(&self.path, json)
            .await
            .map_err(BackupError::IoError)?;
        Ok(map.len())
    }

    pub async fn load(&self) -> Result<BTreeMap<PathBuf, Uri>, BackupError> {
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(BackupError::IoError)?;
        let map: BTreeMap<PathBuf, Uri> = serde_json::from_str(&content)?;
        Ok(map)
    }
}

impl Default for BackupManager {
    fn default() -> Self {
        Self::new()
    }
}
