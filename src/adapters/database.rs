// データベース接続アダプター
//
// SQLxを使用したデータベース接続とDDL実行を行います。
// 呼び出しごとに接続を開き、1リクエストを実行して閉じます（プールは使用しません）。

use crate::adapters::connection_string::build_connection_string;
use crate::adapters::sql_generator::Statement;
use crate::core::config::{DatabaseConfig, Driver};
use crate::core::error::DatabaseError;
use async_trait::async_trait;
use sqlx::{AnyConnection, Connection};
use std::fmt;
use tracing::debug;

/// DDL実行インターフェース
///
/// 生成されたDDL文をデータベースへ送信します。
/// 失敗は握りつぶさずにそのまま返します。
#[async_trait]
pub trait DdlExecutor: Send + Sync {
    /// DDL文を1件実行
    async fn execute(&self, statement: &Statement) -> Result<(), DatabaseError>;
}

/// データベース接続サービス
///
/// 接続文字列を保持し、呼び出しごとに一時的な接続を開きます。
#[derive(Clone)]
pub struct DatabaseConnectionService {
    driver: Driver,
    connection_string: String,
}

impl DatabaseConnectionService {
    /// 接続設定から新しいDatabaseConnectionServiceを作成
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            driver: config.driver,
            connection_string: build_connection_string(config),
        }
    }

    /// 接続URLから作成
    pub fn from_url(driver: Driver, url: impl Into<String>) -> Self {
        Self {
            driver,
            connection_string: url.into(),
        }
    }

    /// 接続ドライバーを取得
    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// 一時的な接続を開く
    pub async fn connect(&self) -> Result<AnyConnection, DatabaseError> {
        AnyConnection::connect(&self.connection_string)
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("Failed to open {} connection", self.driver),
                cause: e.to_string(),
            })
    }

    /// 接続を閉じる
    pub async fn close(&self, connection: AnyConnection) -> Result<(), DatabaseError> {
        connection
            .close()
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("Failed to close {} connection", self.driver),
                cause: e.to_string(),
            })
    }

    /// SQL文を1件実行
    pub async fn execute_sql(&self, sql: &str) -> Result<(), DatabaseError> {
        let mut connection = self.connect().await?;

        let result = sqlx::Executor::execute(&mut connection, sqlx::raw_sql(sql)).await;

        // 実行結果に関わらず接続は閉じる（実行エラーを優先して返す）
        let closed = self.close(connection).await;
        result.map_err(|e| DatabaseError::Query {
            message: e.to_string(),
            sql: Some(sql.to_string()),
        })?;
        closed
    }
}

impl fmt::Debug for DatabaseConnectionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 接続文字列は認証情報を含むため出力しない
        f.debug_struct("DatabaseConnectionService")
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DdlExecutor for DatabaseConnectionService {
    async fn execute(&self, statement: &Statement) -> Result<(), DatabaseError> {
        let sql = statement.to_sql();
        debug!(kind = statement.kind(), table = statement.table_name(), sql = %sql, "Executing DDL");
        self.execute_sql(&sql).await
    }
}
