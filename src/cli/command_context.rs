// コマンド共通コンテキスト
//
// 設定ファイル読み込みやパス解決の重複をCLI層で集約する。

use crate::core::config::Config;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// プロジェクトルート（または明示された設定ファイル）から設定を読み込んでコンテキストを作成
    pub fn load(project_path: PathBuf, config_path: Option<PathBuf>) -> Result<Self> {
        let config_path =
            config_path.unwrap_or_else(|| project_path.join(Config::DEFAULT_CONFIG_PATH));
        if !config_path.exists() {
            return Err(anyhow!(
                "Config file not found: {:?}. Create it with at least one environment.",
                config_path
            ));
        }

        let config =
            Config::from_file(&config_path).with_context(|| "Failed to read config file")?;

        Ok(Self {
            project_path,
            config_path,
            config,
        })
    }

    /// エンティティ定義ディレクトリの絶対パス
    pub fn schema_dir(&self) -> PathBuf {
        self.project_path.join(&self.config.schema_dir)
    }

    /// エンティティ定義ディレクトリを解決し、存在することを確認して返す
    ///
    /// 明示的な指定があればそれを優先します。
    pub fn require_schema_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        let path = match override_dir {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => self.project_path.join(dir),
            None => self.schema_dir(),
        };
        if !path.exists() {
            return Err(anyhow!("Schema directory not found: {:?}", path));
        }
        Ok(path)
    }
}
