// DDL文の構造表現
//
// CREATE TABLE / ALTER TABLE ADD / CREATE INDEX を句単位で保持し、
// Display 実装で送信用の正確なSQL文字列を生成します。

use std::fmt;

/// DDL文
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable(CreateTable),
    AlterTable(AlterTable),
    CreateIndex(CreateIndex),
}

impl Statement {
    /// SQL文字列を生成
    pub fn to_sql(&self) -> String {
        self.to_string()
    }

    /// 対象テーブル名
    pub fn table_name(&self) -> &str {
        match self {
            Statement::CreateTable(stmt) => &stmt.name,
            Statement::AlterTable(stmt) => &stmt.name,
            Statement::CreateIndex(stmt) => &stmt.table,
        }
    }

    /// 文の種類（ログ出力用）
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::CreateTable(_) => "create_table",
            Statement::AlterTable(_) => "alter_table",
            Statement::CreateIndex(_) => "create_index",
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable(stmt) => fmt::Display::fmt(stmt, f),
            Statement::AlterTable(stmt) => fmt::Display::fmt(stmt, f),
            Statement::CreateIndex(stmt) => fmt::Display::fmt(stmt, f),
        }
    }
}

/// カラム定義句
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// カラム名
    pub name: String,
    /// 解決済みの型名
    pub type_name: String,
    /// Identity(1,1) を付与するか
    pub identity: bool,
    /// NOT NULL を付与するか
    pub not_null: bool,
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.type_name)?;
        if self.identity {
            f.write_str(" Identity(1,1)")?;
        }
        if self.not_null {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}

/// 主キー制約句
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyConstraint {
    /// 制約名（PK_<table>）
    pub name: String,
    /// 対象カラム（宣言順）
    pub columns: Vec<String>,
}

impl fmt::Display for PrimaryKeyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CONSTRAINT {} PRIMARY KEY({})",
            self.name,
            self.columns.join(",")
        )
    }
}

/// CREATE TABLE文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    /// テーブル名
    pub name: String,
    /// カラム定義（宣言順）
    pub columns: Vec<ColumnDef>,
    /// 主キー制約
    pub primary_key: PrimaryKeyConstraint,
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TABLE {}( ", self.name)?;
        // 各カラムの後に必ずカンマを置き、主キー制約は空白1つで続ける
        for column in &self.columns {
            write!(f, "{},", column)?;
        }
        write!(f, " {})", self.primary_key)
    }
}

/// ALTER TABLE ADD文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTable {
    /// テーブル名
    pub name: String,
    /// 追加するカラム定義
    pub add_columns: Vec<ColumnDef>,
}

impl fmt::Display for AlterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALTER TABLE {} ADD ", self.name)?;
        for (i, column) in self.add_columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", column)?;
        }
        Ok(())
    }
}

/// CREATE INDEX文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndex {
    /// インデックス名（idx_<column>）
    pub name: String,
    /// 対象テーブル
    pub table: String,
    /// 対象カラム
    pub column: String,
    pub unique: bool,
    pub clustered: bool,
}

impl fmt::Display for CreateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE")?;
        if self.unique {
            f.write_str(" UNIQUE")?;
        }
        if self.clustered {
            f.write_str(" CLUSTERED")?;
        }
        write!(f, " INDEX {} ON {}({})", self.name, self.table, self.column)
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}

impl From<AlterTable> for Statement {
    fn from(value: AlterTable) -> Self {
        Self::AlterTable(value)
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
