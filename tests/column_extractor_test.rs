/// カラム/インデックス抽出のテスト
///
/// 既存カラムとの突き合わせによる追加カラムとインデックス対象の導出を検証します。

#[cfg(test)]
mod column_extractor_tests {
    use sediment::core::schema::{ColumnDescriptor, NativeType, TableSchema};
    use sediment::services::column_extractor::{columns_to_add, indexes_to_create, SchemaChangeSet};

    fn names(columns: &[&ColumnDescriptor]) -> Vec<String> {
        columns.iter().map(|c| c.name.clone()).collect()
    }

    /// 既存カラムのインデックス指定は無視され、新規カラムのみが対象となる
    #[test]
    fn test_alter_path_extracts_only_new_columns() {
        let schema = TableSchema::new("T")
            .column(ColumnDescriptor::new("A", NativeType::Int32).index())
            .column(ColumnDescriptor::new("B", NativeType::String).unique_index())
            .column(ColumnDescriptor::new("C", NativeType::String).index());

        let change_set = SchemaChangeSet::for_alter(&schema, &["A", "B"]);

        assert_eq!(names(&change_set.columns_to_add), vec!["C"]);
        assert_eq!(names(&change_set.indexes_to_create), vec!["C"]);
    }

    /// インデックス指定のない新規カラムはインデックス対象にならない
    #[test]
    fn test_alter_path_without_index_flag() {
        let schema = TableSchema::new("T")
            .column(ColumnDescriptor::new("A", NativeType::Int32).index())
            .column(ColumnDescriptor::new("B", NativeType::String))
            .column(ColumnDescriptor::new("C", NativeType::String));

        let change_set = SchemaChangeSet::for_alter(&schema, &["A", "B"]);

        assert_eq!(names(&change_set.columns_to_add), vec!["C"]);
        assert!(change_set.indexes_to_create.is_empty());
    }

    /// 作成時は全カラムが対象となり、インデックス対象は宣言順
    #[test]
    fn test_create_path_covers_all_columns() {
        let schema = TableSchema::new("T")
            .column(ColumnDescriptor::new("Id", NativeType::Int32).primary_key())
            .column(ColumnDescriptor::new("Sku", NativeType::String).unique_index())
            .column(ColumnDescriptor::new("Name", NativeType::String))
            .column(ColumnDescriptor::new("Category", NativeType::String).index());

        let change_set = SchemaChangeSet::for_create(&schema);

        assert_eq!(names(&change_set.columns_to_add), vec!["Id", "Sku", "Name", "Category"]);
        assert_eq!(names(&change_set.indexes_to_create), vec!["Sku", "Category"]);
        assert!(!change_set.is_empty());
    }

    /// 既存カラムがすべて揃っていれば変更なし
    #[test]
    fn test_up_to_date_table() {
        let schema = TableSchema::new("T")
            .column(ColumnDescriptor::new("A", NativeType::Int32))
            .column(ColumnDescriptor::new("B", NativeType::Int32));
        let existing = vec!["B".to_string(), "A".to_string(), "Legacy".to_string()];

        let change_set = SchemaChangeSet::for_alter(&schema, existing.as_slice());

        assert!(change_set.is_empty());
        assert!(change_set.indexes_to_create.is_empty());
    }

    /// 小文字に畳み込まれた既存カラム名も一致とみなす
    #[test]
    fn test_lowercased_existing_columns_match() {
        let schema = TableSchema::new("T")
            .column(ColumnDescriptor::new("Email", NativeType::String))
            .column(ColumnDescriptor::new("DisplayName", NativeType::String));

        assert!(columns_to_add(&schema, &["email", "displayname"]).is_empty());
        assert_eq!(names(&columns_to_add(&schema, &["EMAIL"])), vec!["DisplayName"]);
    }

    /// インデックス対象の抽出は入力順を保つ
    #[test]
    fn test_indexes_to_create_preserves_order() {
        let b = ColumnDescriptor::new("B", NativeType::String).clustered_index();
        let a = ColumnDescriptor::new("A", NativeType::String).index();
        let plain = ColumnDescriptor::new("Plain", NativeType::String);

        let indexes = indexes_to_create(&[&b, &plain, &a]);

        assert_eq!(names(&indexes), vec!["B", "A"]);
    }
}
