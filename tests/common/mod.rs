// 統合テスト共通ヘルパー
//
// 実データベースの代わりに、DDL文を解釈してテーブル/カラムを記録する
// インメモリデータベースを提供します。
#![allow(dead_code)]

use async_trait::async_trait;
use sediment::adapters::database::DdlExecutor;
use sediment::adapters::schema_introspector::SchemaIntrospector;
use sediment::adapters::sql_generator::Statement;
use sediment::core::error::DatabaseError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Vec<String>>,
    indexes: Vec<String>,
    executed: Vec<String>,
    introspections: usize,
    fail_on: Option<&'static str>,
}

/// インメモリデータベース
///
/// クローンは同じ状態を共有します。
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<Mutex<State>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存テーブルを持つデータベースを作成
    pub fn with_table(table: &str, columns: &[&str]) -> Self {
        let database = Self::new();
        database.state.lock().unwrap().tables.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        database
    }

    /// 指定した種類の文（create_table / alter_table / create_index）の実行を失敗させる
    pub fn fail_on(&self, kind: &'static str) {
        self.state.lock().unwrap().fail_on = Some(kind);
    }

    /// 実行されたSQL（実行順）
    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// テーブルのカラム（定義順）
    pub fn columns(&self, table: &str) -> Option<Vec<String>> {
        self.state.lock().unwrap().tables.get(table).cloned()
    }

    /// 作成されたインデックス名
    pub fn indexes(&self) -> Vec<String> {
        self.state.lock().unwrap().indexes.clone()
    }

    /// イントロスペクション呼び出し回数
    pub fn introspections(&self) -> usize {
        self.state.lock().unwrap().introspections
    }
}

#[async_trait]
impl SchemaIntrospector for InMemoryDatabase {
    async fn table_exists(&self, table_name: &str) -> Result<bool, DatabaseError> {
        let mut state = self.state.lock().unwrap();
        state.introspections += 1;
        Ok(state.tables.contains_key(table_name))
    }

    async fn existing_columns(&self, table_name: &str) -> Result<Vec<String>, DatabaseError> {
        let mut state = self.state.lock().unwrap();
        state.introspections += 1;
        state
            .tables
            .get(table_name)
            .cloned()
            .ok_or_else(|| DatabaseError::Query {
                message: format!("no such table: {}", table_name),
                sql: None,
            })
    }
}

#[async_trait]
impl DdlExecutor for InMemoryDatabase {
    async fn execute(&self, statement: &Statement) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().unwrap();
        let sql = statement.to_sql();

        if state.fail_on == Some(statement.kind()) {
            return Err(DatabaseError::Query {
                message: "simulated failure".to_string(),
                sql: Some(sql),
            });
        }

        match statement {
            Statement::CreateTable(create) => {
                if state.tables.contains_key(&create.name) {
                    return Err(DatabaseError::Query {
                        message: format!("table {} already exists", create.name),
                        sql: Some(sql),
                    });
                }
                let columns = create.columns.iter().map(|c| c.name.clone()).collect();
                state.tables.insert(create.name.clone(), columns);
            }
            Statement::AlterTable(alter) => {
                let columns = state
                    .tables
                    .get_mut(&alter.name)
                    .ok_or_else(|| DatabaseError::Query {
                        message: format!("no such table: {}", alter.name),
                        sql: Some(sql.clone()),
                    })?;
                columns.extend(alter.add_columns.iter().map(|c| c.name.clone()));
            }
            Statement::CreateIndex(index) => {
                state.indexes.push(index.name.clone());
            }
        }

        state.executed.push(sql);
        Ok(())
    }
}
