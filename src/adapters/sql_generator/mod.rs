// SQL生成アダプター
//
// エンティティスキーマからDDL文を組み立てるアダプター層。
// データベースには一切アクセスしない純粋な文字列組み立てです。

pub mod sqlserver;
pub mod statement;

pub use statement::{AlterTable, ColumnDef, CreateIndex, CreateTable, PrimaryKeyConstraint, Statement};

use crate::core::schema::{ColumnDescriptor, TableSchema};

/// SQLジェネレータートレイト
///
/// 方言ごとのDDLジェネレーターが実装すべきインターフェース。
/// 型名は事前に型マッパーで解決済みである必要があります。
pub trait SqlGenerator {
    /// CREATE TABLE文を生成
    ///
    /// # Arguments
    ///
    /// * `schema` - 型名解決済みのテーブルスキーマ
    fn generate_create_table(&self, schema: &TableSchema) -> Statement;

    /// ALTER TABLE ADD文を生成
    ///
    /// # Arguments
    ///
    /// * `schema` - 型名解決済みのテーブルスキーマ
    /// * `missing_columns` - 既存テーブルに存在しないカラム
    ///
    /// # Returns
    ///
    /// 追加カラムがない場合は None
    fn generate_alter_table(
        &self,
        schema: &TableSchema,
        missing_columns: &[&ColumnDescriptor],
    ) -> Option<Statement>;

    /// CREATE INDEX文を生成
    ///
    /// # Arguments
    ///
    /// * `column` - インデックス対象のカラム
    /// * `table_name` - テーブル名
    fn generate_create_index(&self, column: &ColumnDescriptor, table_name: &str) -> Statement;

    /// 主キー制約句を生成
    fn generate_primary_key_constraint(&self, schema: &TableSchema) -> PrimaryKeyConstraint;
}
