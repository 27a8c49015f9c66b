// SQL Server接続アダプター
//
// tiberius（TDS）を使用したSQL Serverへの接続、DDL実行、スキーマ取得を行います。
// 呼び出しごとにTCP接続を開き、1リクエストを実行して閉じます。

use crate::adapters::connection_string::build_connection_string;
use crate::adapters::database::DdlExecutor;
use crate::adapters::schema_introspector::{
    empty_projection_query, table_exists_query, SchemaIntrospector,
};
use crate::adapters::sql_generator::Statement;
use crate::core::config::{DatabaseConfig, Driver};
use crate::core::error::DatabaseError;
use async_trait::async_trait;
use std::fmt;
use tiberius::{Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

type SqlServerClient = Client<Compat<TcpStream>>;

/// SQL Server接続サービス
///
/// JDBC形式の接続文字列を保持し、呼び出しごとに一時的な接続を開きます。
#[derive(Clone)]
pub struct SqlServerConnectionService {
    connection_string: String,
}

impl SqlServerConnectionService {
    /// 接続設定から新しいSqlServerConnectionServiceを作成
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            connection_string: build_connection_string(config),
        }
    }

    /// JDBC形式の接続文字列から作成
    pub fn from_jdbc(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    fn client_config(&self) -> Result<Config, DatabaseError> {
        Config::from_jdbc_string(&self.connection_string).map_err(|e| DatabaseError::Connection {
            message: "Invalid sqlserver connection string".to_string(),
            cause: e.to_string(),
        })
    }

    /// 一時的な接続を開く
    pub async fn connect(&self) -> Result<SqlServerClient, DatabaseError> {
        let config = self.client_config()?;

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(open_error)?;
        tcp.set_nodelay(true).map_err(open_error)?;

        Client::connect(config, tcp.compat_write())
            .await
            .map_err(open_error)
    }

    /// 接続を閉じる
    pub async fn close(&self, client: SqlServerClient) -> Result<(), DatabaseError> {
        client.close().await.map_err(|e| DatabaseError::Connection {
            message: format!("Failed to close {} connection", Driver::SqlServer),
            cause: e.to_string(),
        })
    }

    /// SQL文を1件実行
    pub async fn execute_sql(&self, sql: &str) -> Result<(), DatabaseError> {
        let mut client = self.connect().await?;

        let result = match client.simple_query(sql).await {
            Ok(stream) => stream.into_results().await.map(|_| ()),
            Err(e) => Err(e),
        };

        // 実行結果に関わらず接続は閉じる（実行エラーを優先して返す）
        let closed = self.close(client).await;
        result.map_err(|e| DatabaseError::Query {
            message: e.to_string(),
            sql: Some(sql.to_string()),
        })?;
        closed
    }
}

impl fmt::Debug for SqlServerConnectionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 接続文字列は認証情報を含むため出力しない
        f.debug_struct("SqlServerConnectionService")
            .finish_non_exhaustive()
    }
}

fn open_error(error: impl fmt::Display) -> DatabaseError {
    DatabaseError::Connection {
        message: format!("Failed to open {} connection", Driver::SqlServer),
        cause: error.to_string(),
    }
}

/// 結果セットのメタデータからカラム名を読む（行は読まない）
async fn read_column_names(
    client: &mut SqlServerClient,
    sql: &str,
) -> tiberius::Result<Vec<String>> {
    let mut stream = client.simple_query(sql).await?;
    let names = stream
        .columns()
        .await?
        .map(|columns| columns.iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();
    stream.into_results().await?;
    Ok(names)
}

async fn read_count(client: &mut SqlServerClient, sql: &str) -> tiberius::Result<Option<i32>> {
    match client.simple_query(sql).await?.into_row().await? {
        Some(row) => row.try_get::<i32, _>(0),
        None => Ok(None),
    }
}

#[async_trait]
impl DdlExecutor for SqlServerConnectionService {
    async fn execute(&self, statement: &Statement) -> Result<(), DatabaseError> {
        let sql = statement.to_sql();
        debug!(kind = statement.kind(), table = statement.table_name(), sql = %sql, "Executing DDL");
        self.execute_sql(&sql).await
    }
}

#[async_trait]
impl SchemaIntrospector for SqlServerConnectionService {
    async fn table_exists(&self, table_name: &str) -> Result<bool, DatabaseError> {
        let sql = table_exists_query(Driver::SqlServer, table_name);
        let mut client = self.connect().await?;

        let result = read_count(&mut client, &sql).await;
        let closed = self.close(client).await;

        let count = result.map_err(|e| DatabaseError::Query {
            message: format!("Failed to check existence of table '{}': {}", table_name, e),
            sql: Some(sql),
        })?;
        closed?;

        let exists = count.unwrap_or(0) > 0;
        debug!(table = table_name, exists, "Checked table existence");
        Ok(exists)
    }

    async fn existing_columns(&self, table_name: &str) -> Result<Vec<String>, DatabaseError> {
        let sql = empty_projection_query(table_name);
        let mut client = self.connect().await?;

        let result = read_column_names(&mut client, &sql).await;
        let closed = self.close(client).await;

        let columns = result.map_err(|e| DatabaseError::Query {
            message: format!("Failed to read columns of table '{}': {}", table_name, e),
            sql: Some(sql),
        })?;
        closed?;

        debug!(table = table_name, columns = ?columns, "Read existing columns");
        Ok(columns)
    }
}
