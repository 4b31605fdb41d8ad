//! 設定モジュール

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct Config {
    /// タスクストアのファイルパス
    pub store_path: PathBuf,
    /// 計測中の表示更新間隔（秒）
    pub refresh_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: home_dir().join(".clerk-db"),
            refresh_seconds: 1,
        }
    }
}

/// TOML設定ファイル用構造体
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    store_path: Option<String>,
    refresh_seconds: Option<u64>,
}

/// CLI引数
#[derive(Debug, Default)]
pub struct CliArgs {
    pub store: Option<PathBuf>,
}

impl Config {
    /// 設定を読み込む
    ///
    /// 優先順位: CLI引数 > 設定ファイル > デフォルト値
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path(), cli_args)
    }

    fn load_from(config_path: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            let file_config: FileConfig = toml::from_str(&content)?;
            config.merge_file_config(&file_config);
        }

        config.merge_cli_args(cli_args);
        config.validate()?;
        config.ensure_directories()?;

        Ok(config)
    }

    /// ファイル設定をマージ
    fn merge_file_config(&mut self, file_config: &FileConfig) {
        if let Some(ref path) = file_config.store_path {
            self.store_path = expand_home(path);
        }
        if let Some(refresh) = file_config.refresh_seconds {
            self.refresh_seconds = refresh;
        }
    }

    /// CLI引数をマージ
    fn merge_cli_args(&mut self, cli_args: &CliArgs) {
        if let Some(ref store) = cli_args.store {
            self.store_path = store.clone();
        }
    }

    /// 設定値をバリデート
    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "refresh_seconds must be greater than 0".to_string(),
            ));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "store_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// ストアの親ディレクトリを作成
    fn ensure_directories(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.store_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(ConfigError::DirectoryCreationError)?;
            }
        }
        Ok(())
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// 設定ファイルのパスを取得
fn config_file_path() -> PathBuf {
    home_dir().join(".clerk").join("config.toml")
}

/// 先頭の `~/` をホームディレクトリに展開
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}
