// syncコマンドハンドラー
//
// エンティティ定義とデータベースの同期機能を実装します。
// - エンティティ定義ファイルの読み込み
// - 環境別の接続設定の解決
// - テーブルごとの作成/カラム追加DDLの生成と実行（dry-run時は表示のみ）
// - 実行結果のサマリー表示

use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::services::schema_parser::SchemaParserService;
use crate::services::schema_synchronizer::{SchemaSynchronizer, SyncAction, SyncReport};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// syncコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutput {
    /// Dry runモードかどうか
    pub dry_run: bool,
    /// 対象環境
    pub environment: String,
    /// テーブルごとの結果（定義順）
    pub tables: Vec<SyncReport>,
}

impl SyncOutput {
    /// DDLを伴ったテーブル数
    pub fn changed_count(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| t.action != SyncAction::UpToDate)
            .count()
    }
}

impl CommandOutput for SyncOutput {
    fn to_text(&self) -> String {
        let mut output = String::new();

        if self.dry_run {
            output.push_str(&format!(
                "{}\n\n",
                format!("Dry run for environment '{}'", self.environment).bold()
            ));
        }

        for table in &self.tables {
            let label = match table.action {
                SyncAction::Create => "create".green(),
                SyncAction::Alter => "alter".yellow(),
                SyncAction::UpToDate => "up-to-date".dimmed(),
            };
            output.push_str(&format!("{:<12} {}\n", label, table.table_name));
            for sql in &table.statements {
                output.push_str(&format!("    {}\n", sql.cyan()));
            }
        }

        let verb = if self.dry_run { "would change" } else { "changed" };
        output.push_str(&format!(
            "\n{} table(s) checked, {} {}.",
            self.tables.len(),
            self.changed_count(),
            verb
        ));
        output
    }
}

/// syncコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct SyncCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// 対象環境
    pub env: String,
    /// Dry run - 実行せずにDDLを表示
    pub dry_run: bool,
    /// エンティティ定義ディレクトリ
    pub schema_dir: Option<PathBuf>,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// syncコマンドハンドラー
#[derive(Debug, Default)]
pub struct SyncCommandHandler {}

impl SyncCommandHandler {
    /// 新しいSyncCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// syncコマンドを実行
    ///
    /// # Returns
    ///
    /// 成功時は同期結果の概要、失敗時は最初に失敗したテーブルを含むエラー
    pub async fn execute(&self, command: &SyncCommand) -> Result<String> {
        let output = self.run(command).await?;
        render_output(&output, &command.format)
    }

    /// 同期を実行して構造化された結果を返す
    pub async fn run(&self, command: &SyncCommand) -> Result<SyncOutput> {
        let context =
            CommandContext::load(command.project_path.clone(), command.config_path.clone())?;

        let schema_dir = context.require_schema_dir(command.schema_dir.as_deref())?;
        debug!(schema_dir = %schema_dir.display(), "Resolved schema directory");

        let schemas = SchemaParserService::new()
            .parse_schema_directory(&schema_dir)
            .with_context(|| "Failed to parse entity definitions")?;
        debug!(count = schemas.len(), "Loaded entity definitions");

        let db_config = context.config.get_database_config(&command.env)?;
        let synchronizer = SchemaSynchronizer::for_database(&db_config);

        let mut tables = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let table_name = schema.table_name.clone();
            let report = if command.dry_run {
                synchronizer.dry_run(schema).await
            } else {
                synchronizer.synchronize(schema).await
            }
            .with_context(|| format!("Failed to synchronize table '{}'", table_name))?;

            tables.push(report);
        }

        info!(
            environment = %command.env,
            tables = tables.len(),
            dry_run = command.dry_run,
            "Synchronization finished"
        );

        Ok(SyncOutput {
            dry_run: command.dry_run,
            environment: command.env.clone(),
            tables,
        })
    }
}
