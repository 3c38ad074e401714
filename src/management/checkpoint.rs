use std::io::Error;
use std::path::PathBuf;

use crate::library::TrackCollection;

#[derive(Debug)]
pub enum CheckpointError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for CheckpointError {
    fn from(err: Error) -> Self {
        CheckpointError::IoError(err)
    }
}

impl From<serde_json::Error> for CheckpointError {
    fn from(err: serde_json::Error) -> Self {
        CheckpointError::SerdeError(err)
    }
}

/// Pipeline stages with persisted checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Check,
    Tags,
    Push,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Search => "search",
            Stage::Check => "check",
            Stage::Tags => "tags",
            Stage::Push => "push",
        }
    }
}

pub struct CheckpointManager {
    base_dir: PathBuf,
}

impl CheckpointManager {
    pub fn new() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("splisync/checkpoints");
        CheckpointManager { base_dir: path }
    }

    pub fn with_dir(base_dir: PathBuf) -> Self {
        CheckpointManager { base_dir }
    }

    pub async fn save(
        &self,
        stage: Stage,
        collections: &[TrackCollection],
    ) -> Result<(), CheckpointError> {
        let path = self.stage_path(stage);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(CheckpointError::IoError)?;
        }

        let map: std::collections::BTreeMap<&str, &Vec<crate::library::LocalTrack>> = collections
            .iter()
            .map(|c| (c.name.as_str(), &c.tracks))
            .collect();
        let json = serde_json::to_string_pretty(&map)?;
        async_fs::write(path, json)
            .await
            .map_err(CheckpointError::IoError)
    }

    /// Loads a stage checkpoint. A missing file is not an error: it means
    /// the stage has to be recomputed.
    pub async fn load(&self, stage: Stage) -> Result<Option<Vec<TrackCollection>>, CheckpointError> {
        let path = self.stage_path(stage);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CheckpointError::IoError(e)),
        };

        let map: std::collections::BTreeMap<String, Vec<crate::library::LocalTrack>> =
            serde_json::from_str(&content)?;
        Ok(Some(
            map.into_iter()
                .map(|(name, tracks)| TrackCollection { name, tracks })
                .collect(),
        ))
    }

    pub async fn clear(&self, stage: Stage) -> Result<(), CheckpointError> {
        let path = self.stage_path(stage);
        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CheckpointError::IoError(e)),
        }
    }

    fn stage_path(&self, stage: Stage) -> PathBuf {
        self.base_dir.join(format!("{}.json", stage.name()))
    }
}

impl Default for CheckpointManager {
    fn default() -> Self {
        Self::new()
    }
}
