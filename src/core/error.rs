// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、ValidationError, DatabaseError, IoError, SyncError を定義します。

use thiserror::Error;

/// バリデーションエラー
///
/// エンティティメタデータの検証時に発生するエラーを表現します。
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Schema structure error (no columns, duplicates)
    #[error("Structure error: {message}{}", format_location_opt(.location))]
    Structure {
        /// エラーメッセージ
        message: String,
        /// エラー発生位置
        location: Option<ErrorLocation>,
        /// 修正提案
        suggestion: Option<String>,
    },

    /// Invalid identifier error
    #[error("Identifier error: {message}{}", format_location_opt(.location))]
    Identifier {
        /// エラーメッセージ
        message: String,
        /// エラー発生位置
        location: Option<ErrorLocation>,
        /// 修正提案
        suggestion: Option<String>,
    },

    /// Primary key error
    #[error("Primary key error: {message}{}", format_location_opt(.location))]
    PrimaryKey {
        /// エラーメッセージ
        message: String,
        /// エラー発生位置
        location: Option<ErrorLocation>,
        /// 修正提案
        suggestion: Option<String>,
    },

    /// Unresolved column type
    #[error("Type error: {message}{}", format_location_opt(.location))]
    UnresolvedType {
        /// エラーメッセージ
        message: String,
        /// エラー発生位置
        location: Option<ErrorLocation>,
    },
}

impl ValidationError {
    /// 構造エラーかどうか
    pub fn is_structure(&self) -> bool {
        matches!(self, ValidationError::Structure { .. })
    }

    /// 識別子エラーかどうか
    pub fn is_identifier(&self) -> bool {
        matches!(self, ValidationError::Identifier { .. })
    }

    /// 主キーエラーかどうか
    pub fn is_primary_key(&self) -> bool {
        matches!(self, ValidationError::PrimaryKey { .. })
    }

    /// 型未解決エラーかどうか
    pub fn is_unresolved_type(&self) -> bool {
        matches!(self, ValidationError::UnresolvedType { .. })
    }

    /// エラー発生位置を取得
    pub fn location(&self) -> Option<&ErrorLocation> {
        match self {
            ValidationError::Structure { location, .. }
            | ValidationError::Identifier { location, .. }
            | ValidationError::PrimaryKey { location, .. }
            | ValidationError::UnresolvedType { location, .. } => location.as_ref(),
        }
    }

    /// 修正提案を取得
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ValidationError::Structure { suggestion, .. }
            | ValidationError::Identifier { suggestion, .. }
            | ValidationError::PrimaryKey { suggestion, .. } => suggestion.as_deref(),
            ValidationError::UnresolvedType { .. } => None,
        }
    }
}

/// エラー発生位置
///
/// エンティティ定義内のエラー発生位置を表現します。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorLocation {
    /// テーブル名
    pub table: Option<String>,
    /// カラム名
    pub column: Option<String>,
}

impl ErrorLocation {
    /// テーブル名を指定してエラー位置を作成
    pub fn with_table(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: None,
        }
    }

    /// テーブル名とカラム名を指定してエラー位置を作成
    pub fn with_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: Some(column.into()),
        }
    }

    /// 位置情報をフォーマット
    pub fn format(&self) -> String {
        let mut parts = Vec::new();

        if let Some(table) = &self.table {
            parts.push(format!("table: {}", table));
        }
        if let Some(column) = &self.column {
            parts.push(format!("column: {}", column));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}

/// 位置情報をフォーマットするヘルパー関数
fn format_location_opt(location: &Option<ErrorLocation>) -> String {
    location.as_ref().map_or(String::new(), |loc| loc.format())
}

/// バリデーション結果
///
/// スキーマ検証の結果を表現します。
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// エラーのリスト
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// 新しいバリデーション結果を作成
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// 検証が成功したかどうか（エラーがない場合は成功）
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// エラーの数を取得
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 他のバリデーション結果をマージ
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// エラーがあれば SyncError に変換
    pub fn into_result(self, table: &str) -> Result<(), SyncError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SyncError::InvalidSchema {
                table: table.to_string(),
                errors: self.errors,
            })
        }
    }
}

/// データベースエラー
///
/// データベース操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Database connection error: {message} (cause: {cause})")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Query execution error
    #[error("Query execution error: {message}")]
    Query {
        /// エラーメッセージ
        message: String,
        /// 失敗したSQL
        sql: Option<String>,
    },
}

impl DatabaseError {
    /// 接続エラーかどうか
    pub fn is_connection(&self) -> bool {
        matches!(self, DatabaseError::Connection { .. })
    }

    /// クエリエラーかどうか
    pub fn is_query(&self) -> bool {
        matches!(self, DatabaseError::Query { .. })
    }

    /// 失敗したSQLを取得
    pub fn sql(&self) -> Option<&str> {
        match self {
            DatabaseError::Query { sql, .. } => sql.as_deref(),
            DatabaseError::Connection { .. } => None,
        }
    }
}

/// I/Oエラー
///
/// ファイル操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound {
        /// ファイルパス
        path: String,
    },

    /// File read error
    #[error("Failed to read file: {path} (cause: {cause})")]
    FileRead {
        /// ファイルパス
        path: String,
        /// エラー原因
        cause: String,
    },
}

impl IoError {
    /// ファイルが見つからないエラーかどうか
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, IoError::FileNotFound { .. })
    }

    /// ファイル読み込みエラーかどうか
    pub fn is_file_read(&self) -> bool {
        matches!(self, IoError::FileRead { .. })
    }
}

/// 同期エラー
///
/// テーブル同期処理の失敗を表現します。
/// 部分的に適用されたスキーマを成功として扱わないため、すべて呼び出し元へ伝播します。
#[derive(Debug, Error)]
pub enum SyncError {
    /// Entity metadata rejected before any DDL was compiled
    #[error("Invalid schema for table '{table}': {}", format_errors(.errors))]
    InvalidSchema {
        /// テーブル名
        table: String,
        /// 検証エラーのリスト
        errors: Vec<ValidationError>,
    },

    /// Introspection or DDL execution failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl SyncError {
    /// スキーマ不正エラーかどうか
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self, SyncError::InvalidSchema { .. })
    }

    /// データベースエラーかどうか
    pub fn is_database(&self) -> bool {
        matches!(self, SyncError::Database(_))
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
