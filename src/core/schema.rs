// エンティティスキーマドメインモデル
//
// エンティティ型から導出されるテーブル定義を表現する型システム。
// TableSchema, ColumnDescriptor, SqlDbType, NativeType, Entity を提供します。

use crate::core::naming::DEFAULT_PRIMARY_KEY;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 宣言されたデータベース型
///
/// エンティティ側で明示的に指定されるSQL Server系の型タグです。
/// 指定された場合は NativeType より優先されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDbType {
    BigInt,
    Binary,
    Bit,
    Char,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    NVarChar,
    Real,
    SmallDateTime,
    SmallInt,
    SmallMoney,
    Structured,
    Text,
    Time,
    Timestamp,
    TinyInt,
    Udt,
    UniqueIdentifier,
    VarBinary,
    VarChar,
    Variant,
    Xml,
}

impl SqlDbType {
    /// 型タグ名（小文字）
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDbType::BigInt => "bigint",
            SqlDbType::Binary => "binary",
            SqlDbType::Bit => "bit",
            SqlDbType::Char => "char",
            SqlDbType::Date => "date",
            SqlDbType::DateTime => "datetime",
            SqlDbType::DateTime2 => "datetime2",
            SqlDbType::DateTimeOffset => "datetimeoffset",
            SqlDbType::Decimal => "decimal",
            SqlDbType::Float => "float",
            SqlDbType::Image => "image",
            SqlDbType::Int => "int",
            SqlDbType::Money => "money",
            SqlDbType::NChar => "nchar",
            SqlDbType::NText => "ntext",
            SqlDbType::NVarChar => "nvarchar",
            SqlDbType::Real => "real",
            SqlDbType::SmallDateTime => "smalldatetime",
            SqlDbType::SmallInt => "smallint",
            SqlDbType::SmallMoney => "smallmoney",
            SqlDbType::Structured => "structured",
            SqlDbType::Text => "text",
            SqlDbType::Time => "time",
            SqlDbType::Timestamp => "timestamp",
            SqlDbType::TinyInt => "tinyint",
            SqlDbType::Udt => "udt",
            SqlDbType::UniqueIdentifier => "uniqueidentifier",
            SqlDbType::VarBinary => "varbinary",
            SqlDbType::VarChar => "varchar",
            SqlDbType::Variant => "variant",
            SqlDbType::Xml => "xml",
        }
    }
}

impl fmt::Display for SqlDbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ランタイム側のネイティブ型
///
/// SqlDbType が指定されていない場合に型名の導出元となります。
/// 未知の型は `Other` として保持され、既定の型にフォールバックします。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NativeType {
    #[default]
    String,
    Int16,
    Int32,
    Int64,
    Decimal,
    Float32,
    Float64,
    DateTime,
    DateTimeOffset,
    Bool,
    Bytes,
    Duration,
    Chars,
    Guid,
    Other(String),
}

impl NativeType {
    /// 型名
    pub fn name(&self) -> &str {
        match self {
            NativeType::String => "string",
            NativeType::Int16 => "int16",
            NativeType::Int32 => "int32",
            NativeType::Int64 => "int64",
            NativeType::Decimal => "decimal",
            NativeType::Float32 => "float32",
            NativeType::Float64 => "float64",
            NativeType::DateTime => "datetime",
            NativeType::DateTimeOffset => "datetimeoffset",
            NativeType::Bool => "bool",
            NativeType::Bytes => "bytes",
            NativeType::Duration => "duration",
            NativeType::Chars => "chars",
            NativeType::Guid => "guid",
            NativeType::Other(name) => name,
        }
    }
}

impl From<String> for NativeType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "string" => NativeType::String,
            "int16" | "i16" | "short" => NativeType::Int16,
            "int32" | "i32" | "int" => NativeType::Int32,
            "int64" | "i64" | "long" => NativeType::Int64,
            "decimal" => NativeType::Decimal,
            "float32" | "f32" | "float" => NativeType::Float32,
            "float64" | "f64" | "double" => NativeType::Float64,
            "datetime" => NativeType::DateTime,
            "datetimeoffset" => NativeType::DateTimeOffset,
            "bool" | "boolean" => NativeType::Bool,
            "bytes" => NativeType::Bytes,
            "duration" | "timespan" => NativeType::Duration,
            "chars" => NativeType::Chars,
            "guid" | "uuid" => NativeType::Guid,
            _ => NativeType::Other(value),
        }
    }
}

impl From<NativeType> for String {
    fn from(value: NativeType) -> Self {
        value.name().to_string()
    }
}

/// カラム記述子
///
/// テーブル内の単一カラムの名前、型、制約を表現します。
/// `db_type_name` は型マッパーによって解決時に書き込まれます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// カラム名
    pub name: String,

    /// 宣言されたデータベース型
    #[serde(default)]
    pub db_type: Option<SqlDbType>,

    /// ネイティブ型
    #[serde(rename = "type", default)]
    pub native_type: NativeType,

    /// サイズ（文字数、桁数）
    #[serde(default)]
    pub size: Option<u32>,

    /// 精度（小数点以下桁数）
    #[serde(default)]
    pub precision: Option<u32>,

    /// NULL許可フラグ
    #[serde(default = "default_allow_nulls")]
    pub allow_nulls: bool,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default)]
    pub auto_increment: bool,

    #[serde(default)]
    pub index: bool,

    #[serde(default)]
    pub unique_index: bool,

    #[serde(default)]
    pub clustered_index: bool,

    /// 解決済みのDB型名
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub db_type_name: Option<String>,
}

fn default_allow_nulls() -> bool {
    true
}

impl ColumnDescriptor {
    /// 新しいカラム記述子を作成
    pub fn new(name: impl Into<String>, native_type: NativeType) -> Self {
        Self {
            name: name.into(),
            db_type: None,
            native_type,
            size: None,
            precision: None,
            allow_nulls: true,
            primary_key: false,
            auto_increment: false,
            index: false,
            unique_index: false,
            clustered_index: false,
            db_type_name: None,
        }
    }

    /// データベース型を宣言
    pub fn db_type(mut self, db_type: SqlDbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.allow_nulls = false;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.allow_nulls = true;
        self
    }

    /// 主キーとして指定（NOT NULL を伴う）
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.allow_nulls = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn index(mut self) -> Self {
        self.index = true;
        self
    }

    /// ユニークインデックスとして指定
    pub fn unique_index(mut self) -> Self {
        self.index = true;
        self.unique_index = true;
        self
    }

    /// クラスター化インデックスとして指定
    pub fn clustered_index(mut self) -> Self {
        self.index = true;
        self.clustered_index = true;
        self
    }

    /// 有効なサイズ（0 は未指定として扱う）
    pub fn effective_size(&self) -> Option<u32> {
        self.size.filter(|size| *size != 0)
    }

    /// 有効な精度（0 は未指定として扱う）
    pub fn effective_precision(&self) -> Option<u32> {
        self.precision.filter(|precision| *precision != 0)
    }

    /// 解決済みのDB型名（未解決の場合は空文字列）
    pub fn type_name(&self) -> &str {
        self.db_type_name.as_deref().unwrap_or("")
    }
}

/// テーブルスキーマ
///
/// 1つのエンティティ型に対応するテーブル定義です。
/// カラムの順序は宣言順であり、DDLのカラム順序になります。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// テーブル名
    #[serde(rename = "table")]
    pub table_name: String,

    /// カラム定義のリスト（宣言順）
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// 新しいテーブルスキーマを作成
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// カラムを追加（ビルダー形式）
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// 指定されたカラムを取得（大文字小文字を区別しない）
    pub fn get_column(&self, column_name: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(column_name))
    }

    /// カラム名の一覧（宣言順）
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// 主キーとして指定されたカラムを取得（宣言順）
    pub fn primary_key_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }

    /// 主キー制約に使用するカラム名
    ///
    /// 主キー指定がない場合は `Id` にフォールバックします。
    pub fn resolved_primary_key(&self) -> Vec<String> {
        let columns: Vec<String> = self
            .primary_key_columns()
            .into_iter()
            .map(|c| c.name.clone())
            .collect();

        if columns.is_empty() {
            vec![DEFAULT_PRIMARY_KEY.to_string()]
        } else {
            columns
        }
    }
}

/// エンティティメタデータの提供者
///
/// エンティティ型ごとにカラム定義を静的に宣言します。
/// テーブル名は既定で型名（モジュールパスを除く）になります。
///
/// # Examples
/// ```
/// use sediment::core::schema::{ColumnDescriptor, Entity, NativeType};
///
/// struct Customer;
///
/// impl Entity for Customer {
///     fn columns() -> Vec<ColumnDescriptor> {
///         vec![
///             ColumnDescriptor::new("Id", NativeType::Int64).primary_key().auto_increment(),
///             ColumnDescriptor::new("Name", NativeType::String),
///         ]
///     }
/// }
///
/// let schema = Customer::table_schema();
/// assert_eq!(schema.table_name, "Customer");
/// assert_eq!(schema.columns.len(), 2);
/// ```
pub trait Entity {
    /// カラム定義（宣言順）
    fn columns() -> Vec<ColumnDescriptor>;

    /// テーブル名
    ///
    /// ジェネリクス引数は除外し、外側の型名のみを使用します。
    fn table_name() -> String {
        let full_name = std::any::type_name::<Self>();
        let path = full_name.split('<').next().unwrap_or(full_name);
        path.rsplit("::").next().unwrap_or(path).to_string()
    }

    /// テーブルスキーマを生成
    ///
    /// 呼び出しのたびに新しく構築されます。
    fn table_schema() -> TableSchema {
        TableSchema {
            table_name: Self::table_name(),
            columns: Self::columns(),
        }
    }
}
