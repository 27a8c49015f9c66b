// スキーマ同期サービス
//
// エンティティのテーブルスキーマとライブデータベースを突き合わせ、
// テーブル作成またはカラム追加のDDLを生成・実行するオーケストレーター。

use crate::adapters::database::{DatabaseConnectionService, DdlExecutor};
use crate::adapters::schema_introspector::{SchemaIntrospector, SqlxSchemaIntrospector};
use crate::adapters::sql_generator::sqlserver::SqlServerSqlGenerator;
use crate::adapters::sql_generator::{SqlGenerator, Statement};
use crate::adapters::sqlserver_connection::SqlServerConnectionService;
use crate::adapters::type_mapping::SqlServerTypeMapper;
use crate::core::config::{DatabaseConfig, Driver};
use crate::core::error::SyncError;
use crate::core::schema::{Entity, TableSchema};
use crate::services::column_extractor::SchemaChangeSet;
use crate::services::schema_validator::SchemaValidatorService;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// 同期アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// テーブルを新規作成
    Create,
    /// 既存テーブルにカラムを追加
    Alter,
    /// 変更なし
    UpToDate,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Create => write!(f, "create"),
            SyncAction::Alter => write!(f, "alter"),
            SyncAction::UpToDate => write!(f, "up-to-date"),
        }
    }
}

/// 同期計画
///
/// 実行順に並んだDDL文（テーブルDDL → CREATE INDEX）を保持します。
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    /// テーブル名
    pub table_name: String,
    /// 同期アクション
    pub action: SyncAction,
    /// 実行するDDL文（実行順）
    pub statements: Vec<Statement>,
}

impl SyncPlan {
    /// 実行するDDLがないかどうか
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// SQL文字列の一覧
    pub fn to_sql(&self) -> Vec<String> {
        self.statements.iter().map(Statement::to_sql).collect()
    }
}

/// 同期結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    /// テーブル名
    pub table_name: String,
    /// 同期アクション
    pub action: SyncAction,
    /// 実行（dry-run時は実行予定）のSQL文
    pub statements: Vec<String>,
    /// 実際に実行したかどうか
    pub applied: bool,
}

impl SyncReport {
    fn from_plan(plan: &SyncPlan, applied: bool) -> Self {
        Self {
            table_name: plan.table_name.clone(),
            action: plan.action,
            statements: plan.to_sql(),
            applied,
        }
    }
}

/// スキーマ同期サービス
///
/// 1回の呼び出しで1テーブルを同期します。呼び出し間で状態を共有しないため、
/// 異なるテーブルの同期は並行して実行できます。同一テーブルの同時同期は呼び出し側で直列化してください。
pub struct SchemaSynchronizer {
    introspector: Box<dyn SchemaIntrospector>,
    executor: Box<dyn DdlExecutor>,
    type_mapper: SqlServerTypeMapper,
    generator: SqlServerSqlGenerator,
    validator: SchemaValidatorService,
}

impl SchemaSynchronizer {
    /// 新しいSchemaSynchronizerを作成
    pub fn new(introspector: Box<dyn SchemaIntrospector>, executor: Box<dyn DdlExecutor>) -> Self {
        Self {
            introspector,
            executor,
            type_mapper: SqlServerTypeMapper::new(),
            generator: SqlServerSqlGenerator::new(),
            validator: SchemaValidatorService::new(),
        }
    }

    /// SQLx接続サービスから作成
    pub fn with_connection(service: DatabaseConnectionService) -> Self {
        Self::new(
            Box::new(SqlxSchemaIntrospector::new(service.clone())),
            Box::new(service),
        )
    }

    /// 接続設定のドライバーに応じた接続実装で作成
    pub fn for_database(config: &DatabaseConfig) -> Self {
        match config.driver {
            Driver::SqlServer => {
                let service = SqlServerConnectionService::new(config);
                Self::new(Box::new(service.clone()), Box::new(service))
            }
            Driver::PostgreSQL | Driver::MySQL | Driver::SQLite => {
                Self::with_connection(DatabaseConnectionService::new(config))
            }
        }
    }

    /// エンティティ型のテーブルを同期（チェーン可能）
    ///
    /// ```ignore
    /// synchronizer.register::<Customer>().await?.register::<Order>().await?;
    /// ```
    pub async fn register<E: Entity>(&self) -> Result<&Self, SyncError> {
        self.synchronize(E::table_schema()).await?;
        Ok(self)
    }

    /// テーブルスキーマを同期
    ///
    /// 計画したDDLを順に実行し、最初の失敗で中断してエラーを返します。
    pub async fn synchronize(&self, schema: TableSchema) -> Result<SyncReport, SyncError> {
        let plan = self.plan(schema).await?;

        for statement in &plan.statements {
            debug!(table = %plan.table_name, kind = statement.kind(), "Applying statement");
            self.executor.execute(statement).await?;
        }

        if !plan.is_empty() {
            info!(
                table = %plan.table_name,
                action = %plan.action,
                statements = plan.statements.len(),
                "Table synchronized"
            );
        }

        Ok(SyncReport::from_plan(&plan, true))
    }

    /// 同期計画のみを作成（DDLは実行しない）
    pub async fn dry_run(&self, schema: TableSchema) -> Result<SyncReport, SyncError> {
        let plan = self.plan(schema).await?;
        Ok(SyncReport::from_plan(&plan, false))
    }

    /// ライブデータベースを参照して同期計画を作成
    pub async fn plan(&self, schema: TableSchema) -> Result<SyncPlan, SyncError> {
        let schema = self.prepare(schema)?;

        let plan = if self.introspector.table_exists(&schema.table_name).await? {
            let existing_columns = self
                .introspector
                .existing_columns(&schema.table_name)
                .await?;
            self.compile(&schema, Some(existing_columns.as_slice()))
        } else {
            self.compile(&schema, None)
        };

        debug!(
            table = %plan.table_name,
            action = %plan.action,
            statements = plan.statements.len(),
            "Planned synchronization"
        );
        Ok(plan)
    }

    /// 検証と型名解決を行う
    pub fn prepare(&self, mut schema: TableSchema) -> Result<TableSchema, SyncError> {
        self.validator
            .validate(&schema)
            .into_result(&schema.table_name)?;

        self.type_mapper.map_schema(&mut schema);

        self.validator
            .validate_resolved(&schema)
            .into_result(&schema.table_name)?;

        Ok(schema)
    }

    /// 型名解決済みスキーマと既存カラムからDDLを組み立てる
    ///
    /// # Arguments
    ///
    /// * `schema` - 型名解決済みのテーブルスキーマ
    /// * `existing_columns` - 既存カラム名（テーブルが存在しない場合は None）
    pub fn compile(&self, schema: &TableSchema, existing_columns: Option<&[String]>) -> SyncPlan {
        let table_name = schema.table_name.clone();

        let (action, change_set) = match existing_columns {
            None => (SyncAction::Create, SchemaChangeSet::for_create(schema)),
            Some(existing) => {
                let change_set = SchemaChangeSet::for_alter(schema, existing);
                if change_set.is_empty() {
                    return SyncPlan {
                        table_name,
                        action: SyncAction::UpToDate,
                        statements: Vec::new(),
                    };
                }
                (SyncAction::Alter, change_set)
            }
        };

        let mut statements = Vec::new();
        match action {
            SyncAction::Create => statements.push(self.generator.generate_create_table(schema)),
            _ => statements.extend(
                self.generator
                    .generate_alter_table(schema, &change_set.columns_to_add),
            ),
        }
        statements.extend(
            change_set
                .indexes_to_create
                .iter()
                .map(|column| self.generator.generate_create_index(column, &table_name)),
        );

        SyncPlan {
            table_name,
            action,
            statements,
        }
    }
}

impl fmt::Debug for SchemaSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaSynchronizer").finish_non_exhaustive()
    }
}
