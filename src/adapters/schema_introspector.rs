// スキーマイントロスペクター
//
// ライブデータベースからテーブルの存在有無と既存カラム名を取得します。
// 呼び出しごとに接続を開閉し、外部トランザクションには参加しません。
// SQLx経由のカラム名はカタログから文字列として読み、結果列の型には依存しません。

use crate::adapters::database::DatabaseConnectionService;
use crate::adapters::sql_quote::quote_string_literal;
use crate::core::config::Driver;
use crate::core::error::DatabaseError;
use async_trait::async_trait;
use sqlx::Row;
use tracing::debug;

/// スキーマ取得インターフェース
#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    /// テーブルが存在するか確認
    async fn table_exists(&self, table_name: &str) -> Result<bool, DatabaseError>;

    /// 既存カラム名を取得（テーブル定義順）
    async fn existing_columns(&self, table_name: &str) -> Result<Vec<String>, DatabaseError>;
}

/// テーブル存在確認クエリを生成
///
/// テーブル名は文字列リテラルとしてエスケープして埋め込みます。
pub fn table_exists_query(driver: Driver, table_name: &str) -> String {
    let literal = quote_string_literal(table_name);
    match driver {
        Driver::PostgreSQL => format!(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND LOWER(table_name) = LOWER({})",
            literal
        ),
        Driver::MySQL => format!(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND LOWER(table_name) = LOWER({})",
            literal
        ),
        Driver::SQLite => format!(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND LOWER(name) = LOWER({})",
            literal
        ),
        Driver::SqlServer => format!(
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_TYPE = 'BASE TABLE' AND TABLE_NAME = {}",
            literal
        ),
    }
}

/// カタログから既存カラム名を定義順に取得するクエリを生成
pub fn column_names_query(driver: Driver, table_name: &str) -> String {
    let literal = quote_string_literal(table_name);
    match driver {
        Driver::PostgreSQL => format!(
            "SELECT CAST(column_name AS TEXT) FROM information_schema.columns \
             WHERE table_schema = current_schema() AND LOWER(table_name) = LOWER({}) \
             ORDER BY ordinal_position",
            literal
        ),
        Driver::MySQL => format!(
            "SELECT CAST(column_name AS CHAR) FROM information_schema.columns \
             WHERE table_schema = DATABASE() AND LOWER(table_name) = LOWER({}) \
             ORDER BY ordinal_position",
            literal
        ),
        Driver::SQLite => format!(
            "SELECT name FROM pragma_table_info({}) ORDER BY cid",
            literal
        ),
        Driver::SqlServer => format!(
            "SELECT COLUMN_NAME FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_NAME = {} ORDER BY ORDINAL_POSITION",
            literal
        ),
    }
}

/// カラム取得用の0行を返す射影クエリ
pub fn empty_projection_query(table_name: &str) -> String {
    format!("SELECT * FROM {} WHERE 1=0", table_name)
}

/// SQLx実装のイントロスペクター
#[derive(Debug, Clone)]
pub struct SqlxSchemaIntrospector {
    service: DatabaseConnectionService,
}

impl SqlxSchemaIntrospector {
    /// 新しいSqlxSchemaIntrospectorを作成
    pub fn new(service: DatabaseConnectionService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SchemaIntrospector for SqlxSchemaIntrospector {
    async fn table_exists(&self, table_name: &str) -> Result<bool, DatabaseError> {
        let sql = table_exists_query(self.service.driver(), table_name);
        let mut connection = self.service.connect().await?;

        let result = sqlx::query(&sql).fetch_one(&mut connection).await;
        let closed = self.service.close(connection).await;

        let row = result.map_err(|e| DatabaseError::Query {
            message: format!("Failed to check existence of table '{}': {}", table_name, e),
            sql: Some(sql.clone()),
        })?;
        closed?;

        let count: i64 = row.try_get(0).map_err(|e| DatabaseError::Query {
            message: format!("Unexpected table existence result: {}", e),
            sql: Some(sql),
        })?;

        debug!(table = table_name, exists = count > 0, "Checked table existence");
        Ok(count > 0)
    }

    async fn existing_columns(&self, table_name: &str) -> Result<Vec<String>, DatabaseError> {
        let sql = column_names_query(self.service.driver(), table_name);
        let mut connection = self.service.connect().await?;

        let result = sqlx::query(&sql).fetch_all(&mut connection).await;
        let closed = self.service.close(connection).await;

        let rows = result.map_err(|e| DatabaseError::Query {
            message: format!("Failed to read columns of table '{}': {}", table_name, e),
            sql: Some(sql.clone()),
        })?;
        closed?;

        let columns = rows
            .iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Query {
                message: format!("Unexpected column name result: {}", e),
                sql: Some(sql),
            })?;

        debug!(table = table_name, columns = ?columns, "Read existing columns");
        Ok(columns)
    }
}
