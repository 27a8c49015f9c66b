// 設定ファイル管理
//
// プロジェクトの設定ファイル（YAML形式）の読み込み、検証、
// 環境別のデータベース接続設定の管理を行います。

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 接続ドライバー
///
/// SQL Server は tiberius、その他は sqlx の Any ドライバー経由で接続します。
/// 接続URLのスキームと、テーブル存在確認クエリの選択に使用します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Driver {
    #[serde(rename = "postgresql", alias = "postgres")]
    PostgreSQL,
    #[serde(rename = "mysql")]
    MySQL,
    #[serde(rename = "sqlite")]
    SQLite,
    #[serde(rename = "sqlserver", alias = "mssql")]
    SqlServer,
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Driver::PostgreSQL => write!(f, "postgresql"),
            Driver::MySQL => write!(f, "mysql"),
            Driver::SQLite => write!(f, "sqlite"),
            Driver::SqlServer => write!(f, "sqlserver"),
        }
    }
}

impl Driver {
    /// 接続URLのスキームからドライバーを推定
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split("://").next()?;
        match scheme.strip_prefix("jdbc:").unwrap_or(scheme) {
            "postgres" | "postgresql" => Some(Driver::PostgreSQL),
            "mysql" | "mariadb" => Some(Driver::MySQL),
            "sqlite" => Some(Driver::SQLite),
            "sqlserver" => Some(Driver::SqlServer),
            _ => None,
        }
    }
}

/// プロジェクト設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 設定ファイルのバージョン
    pub version: String,

    /// エンティティ定義ディレクトリ
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// 環境別のデータベース設定
    pub environments: HashMap<String, DatabaseConfig>,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from(crate::core::naming::ENTITY_DIR)
}

impl Config {
    /// デフォルトの設定ファイルパス
    pub const DEFAULT_CONFIG_PATH: &'static str = crate::core::naming::CONFIG_FILE;

    /// 設定ファイルを読み込んで検証
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = content.parse()?;
        config.validate()?;
        Ok(config)
    }

    /// 指定された環境のデータベース設定を取得
    pub fn get_database_config(&self, environment: &str) -> Result<DatabaseConfig> {
        self.environments.get(environment).cloned().ok_or_else(|| {
            let mut available: Vec<&String> = self.environments.keys().collect();
            available.sort();
            anyhow!(
                "Environment '{}' not found. Available environments: {:?}",
                environment,
                available
            )
        })
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        // バージョンチェック
        if self.version.is_empty() {
            return Err(anyhow!("Config file version is not specified"));
        }

        // 環境設定チェック
        if self.environments.is_empty() {
            return Err(anyhow!(
                "At least one environment configuration is required"
            ));
        }

        // 各環境のデータベース設定を検証
        for (env_name, db_config) in &self.environments {
            db_config
                .validate()
                .with_context(|| format!("Invalid config for environment '{}'", env_name))?;
        }

        Ok(())
    }
}

/// std::str::FromStrトレイトの実装
impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        serde_saphyr::from_str(yaml).with_context(|| "Failed to parse config file")
    }
}

/// データベース接続設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 接続ドライバー
    pub driver: Driver,

    /// ホスト名（SQLiteの場合は不要）
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号（未指定の場合はドライバーの既定値）
    #[serde(default)]
    pub port: Option<u16>,

    /// データベース名（SQLiteの場合はファイルパス）
    #[serde(default)]
    pub database: String,

    /// ユーザー名
    pub user: Option<String>,

    /// パスワード
    pub password: Option<String>,

    /// 接続URL（指定された場合は他の項目より優先）
    pub url: Option<String>,

    /// サーバー証明書を検証せずに信頼する（SQL Serverのみ）
    #[serde(default)]
    pub trust_server_certificate: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            match Driver::from_url(url) {
                Some(driver) if driver == self.driver => return Ok(()),
                Some(driver) => {
                    return Err(anyhow!(
                        "Connection URL scheme '{}' does not match driver '{}'",
                        driver,
                        self.driver
                    ))
                }
                None => return Err(anyhow!("Unsupported connection URL: {}", url)),
            }
        }

        if self.database.is_empty() {
            return Err(anyhow!("Database name is not specified"));
        }

        Ok(())
    }

    /// ポート番号（未指定の場合はドライバーの既定値）
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(match self.driver {
            Driver::PostgreSQL => 5432,
            Driver::MySQL => 3306,
            Driver::SQLite => 0,
            Driver::SqlServer => 1433,
        })
    }
}
