//! タスクストアモジュール

use crate::error::StoreError;
use crate::model::Tasks;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSONファイルによるタスクストア
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// 新しいTaskStoreを作成
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 全タスクを読み込む
    ///
    /// ファイルが存在しない場合は空の一覧を返す。
    pub fn load(&self) -> Result<Tasks, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("ストアが存在しないため空の一覧を使用: {}", self.path.display());
                return Ok(Tasks::default());
            }
            Err(source) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let tasks: Tasks =
            serde_json::from_str(&content).map_err(|source| StoreError::ParseError {
                path: self.path.clone(),
                source,
            })?;
        debug!("{}件のタスクを読み込みました", tasks.len());

        Ok(tasks)
    }

    /// 全タスクを書き出す
    ///
    /// 一時ファイルに書いてからリネームするため、途中で落ちても元のファイルは壊れない。
    pub fn save(&self, tasks: &Tasks) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(tasks).map_err(StoreError::SerializeError)?;
        let write_error = |source: io::Error| StoreError::WriteError {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(write_error)?;
            }
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content).map_err(write_error)?;
        fs::rename(&tmp_path, &self.path).map_err(write_error)?;
        debug!("{}件のタスクを保存しました", tasks.len());

        Ok(())
    }

    /// 書き込み用の一時ファイルパス（同じディレクトリ内）
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
