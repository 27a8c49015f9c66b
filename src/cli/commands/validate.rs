// validateコマンドハンドラー
//
// データベースに接続せずにエンティティ定義を検証します。
// - エンティティ定義ファイルの読み込み
// - バリデーションルールの実行と型名解決
// - エラーのフォーマットされた表示
// - 各エンティティのCREATE TABLE文の表示

use crate::adapters::sql_generator::sqlserver::SqlServerSqlGenerator;
use crate::adapters::sql_generator::SqlGenerator;
use crate::adapters::type_mapping::SqlServerTypeMapper;
use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::schema::TableSchema;
use crate::services::schema_parser::SchemaParserService;
use crate::services::schema_validator::SchemaValidatorService;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::PathBuf;

/// エンティティごとの検証結果
#[derive(Debug, Clone, Serialize)]
pub struct EntityValidation {
    /// テーブル名
    pub table_name: String,
    /// エラーメッセージ
    pub errors: Vec<String>,
    /// 修正提案
    pub suggestions: Vec<String>,
    /// 検証成功時のCREATE TABLE文
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_table: Option<String>,
}

/// validateコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutput {
    /// 検証が成功したかどうか
    pub valid: bool,
    /// エンティティごとの結果
    pub entities: Vec<EntityValidation>,
}

impl ValidateOutput {
    /// エラーの総数
    pub fn error_count(&self) -> usize {
        self.entities.iter().map(|e| e.errors.len()).sum()
    }
}

impl CommandOutput for ValidateOutput {
    fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("=== Entity Validation Results ===\n\n");

        for entity in &self.entities {
            if entity.errors.is_empty() {
                output.push_str(&format!("✓ {}\n", entity.table_name));
                if let Some(sql) = &entity.create_table {
                    output.push_str(&format!("    {}\n", sql));
                }
                continue;
            }

            output.push_str(&format!("✗ {}\n", entity.table_name));
            for (i, error) in entity.errors.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, error));
            }
            for suggestion in &entity.suggestions {
                output.push_str(&format!("     Suggestion: {}\n", suggestion));
            }
        }

        // 結果サマリー
        output.push_str("\n=== Result ===\n");
        if self.valid {
            output.push_str(&format!(
                "✓ Validation complete. {} entity definition(s), no errors found.",
                self.entities.len()
            ));
        } else {
            output.push_str(&format!(
                "✗ Validation complete. {} error(s) found.",
                self.error_count()
            ));
        }

        output
    }
}

/// validateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ValidateCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// エンティティ定義ディレクトリ（指定されない場合は設定ファイルから取得）
    pub schema_dir: Option<PathBuf>,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// validateコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct ValidateCommandHandler {}

impl ValidateCommandHandler {
    /// 新しいValidateCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// validateコマンドを実行
    ///
    /// 検証エラーがある場合は結果を表示した上でエラーを返します。
    pub fn execute(&self, command: &ValidateCommand) -> Result<String> {
        let context =
            CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let schema_dir = context.require_schema_dir(command.schema_dir.as_deref())?;

        let schemas = SchemaParserService::new()
            .parse_schema_directory(&schema_dir)
            .with_context(|| "Failed to parse entity definitions")?;

        let output = self.validate_schemas(schemas);
        let rendered = render_output(&output, &command.format)?;

        if output.valid {
            Ok(rendered)
        } else {
            Err(anyhow!("{}", rendered))
        }
    }

    /// スキーマ一覧を検証
    pub fn validate_schemas(&self, schemas: Vec<TableSchema>) -> ValidateOutput {
        let validator = SchemaValidatorService::new();
        let mapper = SqlServerTypeMapper::new();
        let generator = SqlServerSqlGenerator::new();

        let entities: Vec<EntityValidation> = schemas
            .into_iter()
            .map(|mut schema| {
                let mut result = validator.validate(&schema);
                if result.is_valid() {
                    mapper.map_schema(&mut schema);
                    result.merge(validator.validate_resolved(&schema));
                }

                let create_table = result
                    .is_valid()
                    .then(|| generator.generate_create_table(&schema).to_sql());

                EntityValidation {
                    table_name: schema.table_name,
                    errors: result.errors.iter().map(|e| e.to_string()).collect(),
                    suggestions: result
                        .errors
                        .iter()
                        .filter_map(|e| e.suggestion().map(str::to_string))
                        .collect(),
                    create_table,
                }
            })
            .collect();

        ValidateOutput {
            valid: entities.iter().all(|e| e.errors.is_empty()),
            entities,
        }
    }
}
