// カラム/インデックス抽出サービス
//
// テーブルスキーマと既存カラム名から、DDL対象となるカラムと
// インデックス作成対象のカラムを導出します。

use crate::core::schema::{ColumnDescriptor, TableSchema};

/// 既存テーブルに存在しないカラムを宣言順で取得
///
/// カラム名の比較は大文字小文字を区別しません（未クォート識別子の畳み込みに合わせる）。
pub fn columns_to_add<'a, S: AsRef<str>>(
    schema: &'a TableSchema,
    existing_columns: &[S],
) -> Vec<&'a ColumnDescriptor> {
    schema
        .columns
        .iter()
        .filter(|column| {
            !existing_columns
                .iter()
                .any(|existing| existing.as_ref().eq_ignore_ascii_case(&column.name))
        })
        .collect()
}

/// インデックス指定されたカラムを宣言順で取得
pub fn indexes_to_create<'a>(columns: &[&'a ColumnDescriptor]) -> Vec<&'a ColumnDescriptor> {
    columns.iter().copied().filter(|column| column.index).collect()
}

/// DDL対象の変更セット
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaChangeSet<'a> {
    /// 追加（作成）するカラム
    pub columns_to_add: Vec<&'a ColumnDescriptor>,
    /// 作成するインデックスの対象カラム
    pub indexes_to_create: Vec<&'a ColumnDescriptor>,
}

impl<'a> SchemaChangeSet<'a> {
    /// テーブル新規作成時の変更セット（全カラムが対象）
    pub fn for_create(schema: &'a TableSchema) -> Self {
        let columns_to_add: Vec<&ColumnDescriptor> = schema.columns.iter().collect();
        let indexes_to_create = indexes_to_create(&columns_to_add);
        Self {
            columns_to_add,
            indexes_to_create,
        }
    }

    /// 既存テーブル変更時の変更セット（新規カラムのみが対象）
    pub fn for_alter<S: AsRef<str>>(schema: &'a TableSchema, existing_columns: &[S]) -> Self {
        let columns_to_add = columns_to_add(schema, existing_columns);
        let indexes_to_create = indexes_to_create(&columns_to_add);
        Self {
            columns_to_add,
            indexes_to_create,
        }
    }

    /// 変更がないかどうか
    pub fn is_empty(&self) -> bool {
        self.columns_to_add.is_empty()
    }
}
