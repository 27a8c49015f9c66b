// 型マッピングサービス
//
// カラム記述子（宣言DB型またはネイティブ型 + サイズ/精度）から
// SQL Server 構文の型名を導出します。失敗経路はなく、未知の型は既定型にフォールバックします。

use crate::core::schema::{ColumnDescriptor, NativeType, SqlDbType, TableSchema};

/// 文字列型の既定幅
pub const DEFAULT_VARCHAR_WIDTH: u32 = 100;

/// SQL Server 用型マッパー
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerTypeMapper;

impl SqlServerTypeMapper {
    /// 新しいSqlServerTypeMapperを作成
    pub fn new() -> Self {
        Self
    }

    /// スキーマ内の全カラムの型名を解決
    pub fn map_schema(&self, schema: &mut TableSchema) {
        for column in &mut schema.columns {
            self.resolve(column);
        }
    }

    /// カラムの型名を解決し、記述子の `db_type_name` に書き込む
    pub fn resolve<'a>(&self, column: &'a mut ColumnDescriptor) -> &'a str {
        let type_name = self.to_db_type_name(column);
        column.db_type_name.insert(type_name).as_str()
    }

    /// カラムの型名を導出
    ///
    /// 宣言DB型が指定されていればそれを優先し、なければネイティブ型から導出します。
    pub fn to_db_type_name(&self, column: &ColumnDescriptor) -> String {
        match column.db_type {
            Some(db_type) => self.format_db_type(
                db_type,
                column.effective_size(),
                column.effective_precision(),
            ),
            None => self.format_native_type(&column.native_type),
        }
    }

    /// 宣言DB型 → SQL型文字列
    ///
    /// # Arguments
    /// * `db_type` - 宣言DB型
    /// * `size` - サイズ（0 は未指定）
    /// * `precision` - 精度（0 は未指定）
    pub fn format_db_type(
        &self,
        db_type: SqlDbType,
        size: Option<u32>,
        precision: Option<u32>,
    ) -> String {
        match db_type {
            // bigint はサイズ修飾を受け付けない
            SqlDbType::BigInt => "bigint".to_string(),
            SqlDbType::Bit => "bit".to_string(),
            SqlDbType::Binary | SqlDbType::Image => "binary".to_string(),
            SqlDbType::Char => sized("char", size),
            SqlDbType::Date => "date".to_string(),
            SqlDbType::DateTime | SqlDbType::DateTime2 => "datetime".to_string(),
            SqlDbType::DateTimeOffset => "datetimeoffset".to_string(),
            SqlDbType::Decimal => numeric("decimal", size, precision),
            SqlDbType::Float => numeric("float", size, precision),
            SqlDbType::Int => "int".to_string(),
            SqlDbType::Money => "money".to_string(),
            SqlDbType::NChar => sized("nchar", size),
            SqlDbType::NVarChar => {
                format!("nvarchar({})", size.unwrap_or(DEFAULT_VARCHAR_WIDTH))
            }
            SqlDbType::Real => numeric("real", size, precision),
            SqlDbType::SmallInt => "smallint".to_string(),
            SqlDbType::SmallMoney => "smallmoney".to_string(),
            SqlDbType::SmallDateTime => "smalldatetime".to_string(),
            SqlDbType::Text => "text".to_string(),
            SqlDbType::Time => "time".to_string(),
            SqlDbType::TinyInt => "tinyint".to_string(),
            SqlDbType::UniqueIdentifier => "uniqueidentifier".to_string(),
            SqlDbType::VarBinary => "varbinary".to_string(),
            SqlDbType::VarChar => {
                format!("varchar({})", size.unwrap_or(DEFAULT_VARCHAR_WIDTH))
            }
            // 専用の変換がない型はタグ名をそのまま使用
            SqlDbType::NText
            | SqlDbType::Structured
            | SqlDbType::Timestamp
            | SqlDbType::Udt
            | SqlDbType::Variant
            | SqlDbType::Xml => db_type.as_str().to_string(),
        }
    }

    /// ネイティブ型 → SQL型文字列
    pub fn format_native_type(&self, native_type: &NativeType) -> String {
        match native_type {
            NativeType::String => format!("varchar({})", DEFAULT_VARCHAR_WIDTH),
            NativeType::Int16 | NativeType::Int32 => "int".to_string(),
            NativeType::Int64 => "bigint".to_string(),
            NativeType::Decimal => "decimal".to_string(),
            NativeType::Float32 | NativeType::Float64 => "float".to_string(),
            NativeType::DateTime => "datetime".to_string(),
            NativeType::Bool => "bit".to_string(),
            NativeType::DateTimeOffset => "datetimeoffset".to_string(),
            NativeType::Bytes => "binary".to_string(),
            NativeType::Duration => "time".to_string(),
            NativeType::Chars => "char".to_string(),
            NativeType::Guid => "uniqueidentifier".to_string(),
            NativeType::Other(name) => {
                tracing::debug!(native_type = %name, "Unmapped native type, falling back to varchar");
                format!("varchar({})", DEFAULT_VARCHAR_WIDTH)
            }
        }
    }
}

/// `type(size)` または `type`
fn sized(keyword: &str, size: Option<u32>) -> String {
    match size {
        Some(size) => format!("{}({})", keyword, size),
        None => keyword.to_string(),
    }
}

/// `type(size,precision)`、`type(size)`、`type` の順で優先
fn numeric(keyword: &str, size: Option<u32>, precision: Option<u32>) -> String {
    match (size, precision) {
        (Some(size), Some(precision)) => format!("{}({},{})", keyword, size, precision),
        (Some(size), None) => format!("{}({})", keyword, size),
        _ => keyword.to_string(),
    }
}
