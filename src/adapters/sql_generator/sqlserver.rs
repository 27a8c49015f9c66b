// SQL Server用SQLジェネレーター
//
// エンティティスキーマからSQL Server用のDDL文を生成します。

use crate::adapters::sql_generator::{
    AlterTable, ColumnDef, CreateIndex, CreateTable, PrimaryKeyConstraint, SqlGenerator,
    Statement,
};
use crate::core::naming::{index_name, primary_key_name};
use crate::core::schema::{ColumnDescriptor, TableSchema};

/// SQL Server用SQLジェネレーター
#[derive(Debug, Clone, Default)]
pub struct SqlServerSqlGenerator {}

impl SqlServerSqlGenerator {
    /// 新しいSqlServerSqlGeneratorを作成
    pub fn new() -> Self {
        Self {}
    }

    /// カラム定義句を生成
    fn generate_column_definition(&self, column: &ColumnDescriptor) -> ColumnDef {
        ColumnDef {
            name: column.name.clone(),
            type_name: column.type_name().to_string(),
            identity: column.auto_increment,
            not_null: !column.allow_nulls,
        }
    }
}

impl SqlGenerator for SqlServerSqlGenerator {
    fn generate_create_table(&self, schema: &TableSchema) -> Statement {
        CreateTable {
            name: schema.table_name.clone(),
            columns: schema
                .columns
                .iter()
                .map(|column| self.generate_column_definition(column))
                .collect(),
            primary_key: self.generate_primary_key_constraint(schema),
        }
        .into()
    }

    fn generate_alter_table(
        &self,
        schema: &TableSchema,
        missing_columns: &[&ColumnDescriptor],
    ) -> Option<Statement> {
        if missing_columns.is_empty() {
            return None;
        }

        Some(
            AlterTable {
                name: schema.table_name.clone(),
                add_columns: missing_columns
                    .iter()
                    .map(|column| self.generate_column_definition(column))
                    .collect(),
            }
            .into(),
        )
    }

    fn generate_create_index(&self, column: &ColumnDescriptor, table_name: &str) -> Statement {
        CreateIndex {
            name: index_name(&column.name),
            table: table_name.to_string(),
            column: column.name.clone(),
            unique: column.unique_index,
            clustered: column.clustered_index,
        }
        .into()
    }

    fn generate_primary_key_constraint(&self, schema: &TableSchema) -> PrimaryKeyConstraint {
        PrimaryKeyConstraint {
            name: primary_key_name(&schema.table_name),
            columns: schema.resolved_primary_key(),
        }
    }
}
