use std::path::PathBuf;

use crate::domain::model::WeekStart;
use crate::domain::ports::CheckpointStore;
use crate::utils::error::{DigestError, Result};

/// 單行文字檔，例如 `2024, 03, 04`
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CheckpointStore for FileCheckpointStore {
    async fn load(&self) -> Result<WeekStart> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DigestError::checkpoint(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        content.parse()
    }

    async fn save(&self, week: WeekStart) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, week.to_string()).await?;
        Ok(())
    }
}
