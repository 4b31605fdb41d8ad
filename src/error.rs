//! エラー型定義モジュール

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to create directory: {0}")]
    DirectoryCreationError(io::Error),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// ストアエラー
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read task store {}: {source}", path.display())]
    ReadError { path: PathBuf, source: io::Error },

    #[error("failed to write task store {}: {source}", path.display())]
    WriteError { path: PathBuf, source: io::Error },

    #[error("malformed task store {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize tasks: {0}")]
    SerializeError(serde_json::Error),
}

/// タスク操作エラー
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task {0} does not exist")]
    NotFound(u64),

    #[error("cannot assign a new task id: highest id is {0}")]
    IdExhausted(u64),

    #[error(transparent)]
    StoreError(#[from] StoreError),
}

/// タイマーエラー
#[derive(Error, Debug)]
pub enum TimerError {
    #[error("failed to install signal handler: {0}")]
    SignalHandlerError(String),

    #[error("failed to write to terminal: {0}")]
    OutputError(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue("refresh_seconds must be greater than 0".to_string());
        assert!(err.to_string().contains("refresh_seconds"));
    }

    #[test]
    fn test_task_not_found_display() {
        let err = TaskError::NotFound(42);
        assert_eq!(err.to_string(), "Task 42 does not exist");
    }

    #[test]
    fn test_store_error_display_includes_path() {
        let err = StoreError::ReadError {
            path: PathBuf::from("/tmp/.clerk-db"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/.clerk-db"));
        assert!(message.contains("permission denied"));
    }

    #[test]
    fn test_task_error_wraps_store_error_transparently() {
        let store_err = StoreError::WriteError {
            path: PathBuf::from("/tmp/.clerk-db"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        let expected = store_err.to_string();
        let err = TaskError::from(store_err);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_timer_error_display() {
        let err = TimerError::SignalHandlerError("already set".to_string());
        assert!(err.to_string().contains("signal handler"));
    }
}
