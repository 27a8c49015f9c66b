/// DDL生成のテスト
///
/// CREATE TABLE / ALTER TABLE ADD / CREATE INDEX の出力テキストと
/// 文構造（AST）の両方を検証します。

#[cfg(test)]
mod sql_generator_tests {
    use sediment::adapters::sql_generator::sqlserver::SqlServerSqlGenerator;
    use sediment::adapters::sql_generator::{SqlGenerator, Statement};
    use sediment::adapters::type_mapping::SqlServerTypeMapper;
    use sediment::core::schema::{ColumnDescriptor, NativeType, SqlDbType, TableSchema};

    fn mapped(schema: TableSchema) -> TableSchema {
        let mut schema = schema;
        SqlServerTypeMapper::new().map_schema(&mut schema);
        schema
    }

    /// 複合主キーは宣言順に並ぶ
    #[test]
    fn test_composite_primary_key() {
        let schema = mapped(
            TableSchema::new("OrderLines")
                .column(ColumnDescriptor::new("OrderId", NativeType::Int64).primary_key())
                .column(ColumnDescriptor::new("Quantity", NativeType::Int32).not_null())
                .column(ColumnDescriptor::new("LineNumber", NativeType::Int32).primary_key()),
        );

        let generator = SqlServerSqlGenerator::new();
        let sql = generator.generate_create_table(&schema).to_sql();

        assert_eq!(
            sql,
            "CREATE TABLE OrderLines( OrderId bigint NOT NULL,Quantity int NOT NULL,LineNumber int NOT NULL, CONSTRAINT PK_OrderLines PRIMARY KEY(OrderId,LineNumber))"
        );

        let constraint = generator.generate_primary_key_constraint(&schema);
        assert_eq!(constraint.name, "PK_OrderLines");
        assert_eq!(constraint.columns, vec!["OrderId", "LineNumber"]);
    }

    /// 主キー指定がなければ Id を主キーとする
    #[test]
    fn test_primary_key_falls_back_to_id() {
        let schema = mapped(
            TableSchema::new("Tags")
                .column(ColumnDescriptor::new("Id", NativeType::Int32))
                .column(ColumnDescriptor::new("Label", NativeType::String)),
        );

        let sql = SqlServerSqlGenerator::new()
            .generate_create_table(&schema)
            .to_sql();

        assert_eq!(
            sql,
            "CREATE TABLE Tags( Id int,Label varchar(100), CONSTRAINT PK_Tags PRIMARY KEY(Id))"
        );
    }

    /// Identity と NOT NULL の順序
    #[test]
    fn test_identity_column() {
        let schema = mapped(
            TableSchema::new("Users")
                .column(ColumnDescriptor::new("Id", NativeType::Int64).primary_key().auto_increment())
                .column(
                    ColumnDescriptor::new("Email", NativeType::String)
                        .db_type(SqlDbType::NVarChar)
                        .size(255)
                        .not_null(),
                ),
        );

        let statement = SqlServerSqlGenerator::new().generate_create_table(&schema);

        match &statement {
            Statement::CreateTable(create) => {
                assert_eq!(create.name, "Users");
                assert!(create.columns[0].identity && create.columns[0].not_null);
                assert!(!create.columns[1].identity && create.columns[1].not_null);
            }
            other => panic!("Expected CREATE TABLE, got {:?}", other),
        }
        assert_eq!(
            statement.to_sql(),
            "CREATE TABLE Users( Id bigint Identity(1,1) NOT NULL,Email nvarchar(255) NOT NULL, CONSTRAINT PK_Users PRIMARY KEY(Id))"
        );
    }

    /// ALTER TABLE は不足カラムのみを1文で追加する
    #[test]
    fn test_alter_table_adds_missing_columns() {
        let schema = mapped(
            TableSchema::new("Users")
                .column(ColumnDescriptor::new("Id", NativeType::Int64).primary_key())
                .column(ColumnDescriptor::new("Age", NativeType::Int32))
                .column(ColumnDescriptor::new("Active", NativeType::Bool).not_null()),
        );
        let missing: Vec<&ColumnDescriptor> = schema.columns[1..].iter().collect();

        let statement = SqlServerSqlGenerator::new()
            .generate_alter_table(&schema, &missing)
            .expect("statement for missing columns");

        assert_eq!(statement.kind(), "alter_table");
        assert_eq!(statement.to_sql(), "ALTER TABLE Users ADD Age int, Active bit NOT NULL");
    }

    /// 不足カラムがなければALTER文は生成しない
    #[test]
    fn test_alter_table_without_columns() {
        let schema = mapped(
            TableSchema::new("Users").column(ColumnDescriptor::new("Id", NativeType::Int64)),
        );

        assert!(SqlServerSqlGenerator::new()
            .generate_alter_table(&schema, &[])
            .is_none());
    }

    /// インデックスの修飾子の組み合わせ
    #[test]
    fn test_index_variants() {
        let generator = SqlServerSqlGenerator::new();

        let plain = ColumnDescriptor::new("Email", NativeType::String).index();
        let unique = ColumnDescriptor::new("Email", NativeType::String).unique_index();
        let clustered = ColumnDescriptor::new("Email", NativeType::String).clustered_index();
        let both = ColumnDescriptor::new("Email", NativeType::String)
            .index()
            .unique_index()
            .clustered_index();

        assert_eq!(
            generator.generate_create_index(&plain, "Users").to_sql(),
            "CREATE INDEX idx_Email ON Users(Email)"
        );
        assert_eq!(
            generator.generate_create_index(&unique, "Users").to_sql(),
            "CREATE UNIQUE INDEX idx_Email ON Users(Email)"
        );
        assert_eq!(
            generator.generate_create_index(&clustered, "Users").to_sql(),
            "CREATE CLUSTERED INDEX idx_Email ON Users(Email)"
        );
        assert_eq!(
            generator.generate_create_index(&both, "Users").to_sql(),
            "CREATE UNIQUE CLUSTERED INDEX idx_Email ON Users(Email)"
        );
    }

    /// 文の種類とテーブル名
    #[test]
    fn test_statement_metadata() {
        let column = ColumnDescriptor::new("Sku", NativeType::String).index();
        let statement = SqlServerSqlGenerator::new().generate_create_index(&column, "Products");

        assert_eq!(statement.kind(), "create_index");
        assert_eq!(statement.table_name(), "Products");
        assert_eq!(statement.to_string(), statement.to_sql());
    }
}
