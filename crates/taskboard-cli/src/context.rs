use std::path::{Path, PathBuf};

use taskboard_core::{AppConfig, TaskboardResult};
use taskboard_domain::{BoardSnapshot, Column, Task};

pub struct CliContext {
    pub snapshot: BoardSnapshot,
    pub config: AppConfig,
    path: PathBuf,
}

impl CliContext {
    /// Read the board file. A missing file is an empty board.
    pub async fn load(file_path: &str, config: AppConfig) -> TaskboardResult<Self> {
        let path = PathBuf::from(file_path);
        let snapshot = if tokio::fs::try_exists(&path).await? {
            let bytes = tokio::fs::read(&path).await?;
            BoardSnapshot::from_json_bytes(&bytes)?
        } else {
            tracing::info!("Board file {} not found, starting empty", path.display());
            BoardSnapshot::default()
        };

        Ok(Self {
            snapshot,
            config,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Columns from the board file, then the config override, then the
    /// built-in four.
    pub fn columns(&self) -> TaskboardResult<Vec<Column>> {
        if !self.snapshot.columns.is_empty() {
            return Ok(self.snapshot.columns.clone());
        }
        match &self.config.columns {
            Some(overrides) => Column::from_config(overrides),
            None => Ok(Column::defaults()),
        }
    }

    pub async fn save(&self, tasks: &[Task]) -> TaskboardResult<()> {
        let snapshot = BoardSnapshot::new(self.snapshot.columns.clone(), tasks.to_vec());
        let bytes = snapshot.to_json_bytes()?;
        tokio::fs::write(&self.path, bytes).await?;
        tracing::info!("Saved {} task(s) to {}", tasks.len(), self.path.display());
        Ok(())
    }
}
