// スキーマバリデーターサービス
//
// DDL生成前にエンティティメタデータの整合性を検証するサービス。
// カラムの有無、重複、識別子、予約語、主キー、型名解決を検証します。

use crate::core::error::{ErrorLocation, ValidationError, ValidationResult};
use crate::core::naming::DEFAULT_PRIMARY_KEY;
use crate::core::schema::TableSchema;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// DDLに埋め込み可能な識別子（クォートなし）
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// T-SQLの予約語（クォートなしでは識別子に使用できない）
const RESERVED_WORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUTHORIZATION", "BACKUP", "BEGIN",
    "BETWEEN", "BREAK", "BROWSE", "BULK", "BY", "CASCADE", "CASE", "CHECK", "CHECKPOINT",
    "CLOSE", "CLUSTERED", "COALESCE", "COLLATE", "COLUMN", "COMMIT", "COMPUTE", "CONSTRAINT",
    "CONTAINS", "CONTAINSTABLE", "CONTINUE", "CONVERT", "CREATE", "CROSS", "CURRENT",
    "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER", "CURSOR", "DATABASE",
    "DBCC", "DEALLOCATE", "DECLARE", "DEFAULT", "DELETE", "DENY", "DESC", "DISK", "DISTINCT",
    "DISTRIBUTED", "DOUBLE", "DROP", "DUMP", "ELSE", "END", "ERRLVL", "ESCAPE", "EXCEPT",
    "EXEC", "EXECUTE", "EXISTS", "EXIT", "EXTERNAL", "FETCH", "FILE", "FILLFACTOR", "FOR",
    "FOREIGN", "FREETEXT", "FREETEXTTABLE", "FROM", "FULL", "FUNCTION", "GOTO", "GRANT",
    "GROUP", "HAVING", "HOLDLOCK", "IDENTITY", "IDENTITY_INSERT", "IDENTITYCOL", "IF", "IN",
    "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "KEY", "KILL", "LEFT",
    "LIKE", "LINENO", "LOAD", "MERGE", "NATIONAL", "NOCHECK", "NONCLUSTERED", "NOT", "NULL",
    "NULLIF", "OF", "OFF", "OFFSETS", "ON", "OPEN", "OPENDATASOURCE", "OPENQUERY",
    "OPENROWSET", "OPENXML", "OPTION", "OR", "ORDER", "OUTER", "OVER", "PERCENT", "PIVOT",
    "PLAN", "PRECISION", "PRIMARY", "PRINT", "PROC", "PROCEDURE", "PUBLIC", "RAISERROR",
    "READ", "READTEXT", "RECONFIGURE", "REFERENCES", "REPLICATION", "RESTORE", "RESTRICT",
    "RETURN", "REVERT", "REVOKE", "RIGHT", "ROLLBACK", "ROWCOUNT", "ROWGUIDCOL", "RULE",
    "SAVE", "SCHEMA", "SECURITYAUDIT", "SELECT", "SEMANTICKEYPHRASETABLE",
    "SEMANTICSIMILARITYDETAILSTABLE", "SEMANTICSIMILARITYTABLE", "SESSION_USER", "SET",
    "SETUSER", "SHUTDOWN", "SOME", "STATISTICS", "SYSTEM_USER", "TABLE", "TABLESAMPLE",
    "TEXTSIZE", "THEN", "TO", "TOP", "TRAN", "TRANSACTION", "TRIGGER", "TRUNCATE",
    "TRY_CONVERT", "TSEQUAL", "UNION", "UNIQUE", "UNPIVOT", "UPDATE", "UPDATETEXT", "USE",
    "USER", "VALUES", "VARYING", "VIEW", "WAITFOR", "WHEN", "WHERE", "WHILE", "WITH",
    "WRITETEXT",
];

/// 識別子として使用可能か判定
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// 予約語か判定（大文字小文字を区別しない）
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(name))
}

/// スキーマバリデーターサービス
///
/// テーブルスキーマの検証を行います。
#[derive(Debug, Clone, Default)]
pub struct SchemaValidatorService {}

impl SchemaValidatorService {
    /// 新しいSchemaValidatorServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// 型名解決前に実施できる検証
    ///
    /// # Arguments
    ///
    /// * `schema` - 検証対象のテーブルスキーマ
    ///
    /// # Returns
    ///
    /// 検証結果（エラーのリストを含む）
    pub fn validate(&self, schema: &TableSchema) -> ValidationResult {
        let mut result = ValidationResult::new();
        let table_name = &schema.table_name;

        if !is_valid_identifier(table_name) {
            result.add_error(ValidationError::Identifier {
                message: format!("Table name '{}' is not a valid identifier", table_name),
                location: Some(ErrorLocation::with_table(table_name.clone())),
                suggestion: Some(
                    "Use letters, digits and underscores, starting with a letter or underscore"
                        .to_string(),
                ),
            });
        } else if is_reserved_word(table_name) {
            result.add_error(ValidationError::Identifier {
                message: format!("Table name '{}' is a reserved word", table_name),
                location: Some(ErrorLocation::with_table(table_name.clone())),
                suggestion: Some(format!("Rename the table, for example to '{}s'", table_name)),
            });
        }

        // テーブルが少なくとも1つのカラムを持つことを検証
        if schema.columns.is_empty() {
            result.add_error(ValidationError::Structure {
                message: format!("Table '{}' has no columns", table_name),
                location: Some(ErrorLocation::with_table(table_name.clone())),
                suggestion: Some("Declare at least one column".to_string()),
            });
            return result;
        }

        let mut seen = HashSet::new();
        for column in &schema.columns {
            if !is_valid_identifier(&column.name) {
                result.add_error(ValidationError::Identifier {
                    message: format!("Column name '{}' is not a valid identifier", column.name),
                    location: Some(ErrorLocation::with_column(table_name.clone(), column.name.clone())),
                    suggestion: None,
                });
            } else if is_reserved_word(&column.name) {
                result.add_error(ValidationError::Identifier {
                    message: format!("Column name '{}' is a reserved word", column.name),
                    location: Some(ErrorLocation::with_column(table_name.clone(), column.name.clone())),
                    suggestion: Some(format!(
                        "Rename the column, for example to '{}{}'",
                        table_name, column.name
                    )),
                });
            }

            // 未クォート識別子は大文字小文字を区別しないため、正規化して比較する
            if !seen.insert(column.name.to_ascii_lowercase()) {
                result.add_error(ValidationError::Structure {
                    message: format!("Column '{}' is declared more than once", column.name),
                    location: Some(ErrorLocation::with_column(table_name.clone(), column.name.clone())),
                    suggestion: Some("Column names must be unique within a table".to_string()),
                });
            }
        }

        // 主キー未指定の場合は Id カラムへのフォールバックが成立することを確認
        if schema.primary_key_columns().is_empty()
            && schema.get_column(DEFAULT_PRIMARY_KEY).is_none()
        {
            result.add_error(ValidationError::PrimaryKey {
                message: format!(
                    "Table '{}' has no primary key column and no '{}' column to fall back to",
                    table_name, DEFAULT_PRIMARY_KEY
                ),
                location: Some(ErrorLocation::with_table(table_name.clone())),
                suggestion: Some(format!(
                    "Mark a column as primary_key or declare a column named '{}'",
                    DEFAULT_PRIMARY_KEY
                )),
            });
        }

        result
    }

    /// 型名解決後の検証
    ///
    /// すべてのカラムに空でない型名が書き込まれていることを確認します。
    pub fn validate_resolved(&self, schema: &TableSchema) -> ValidationResult {
        let mut result = ValidationResult::new();

        for column in &schema.columns {
            if column.type_name().trim().is_empty() {
                result.add_error(ValidationError::UnresolvedType {
                    message: format!("Column '{}' has no resolved database type", column.name),
                    location: Some(ErrorLocation::with_column(
                        schema.table_name.clone(),
                        column.name.clone(),
                    )),
                });
            }
        }

        result
    }
}
