mod common;

/// スキーマ同期のテスト
///
/// インメモリデータベースを使用して、作成・カラム追加・冪等性・
/// エラー伝播を検証します。
#[cfg(test)]
mod schema_synchronizer_tests {
    use super::common::InMemoryDatabase;
    use sediment::core::config::{DatabaseConfig, Driver};
    use sediment::core::schema::{ColumnDescriptor, Entity, NativeType, TableSchema};
    use sediment::services::schema_synchronizer::{SchemaSynchronizer, SyncAction};

    fn synchronizer(database: &InMemoryDatabase) -> SchemaSynchronizer {
        SchemaSynchronizer::new(Box::new(database.clone()), Box::new(database.clone()))
    }

    fn schema_ab() -> TableSchema {
        TableSchema::new("T")
            .column(ColumnDescriptor::new("A", NativeType::Int32).primary_key())
            .column(ColumnDescriptor::new("B", NativeType::String).index())
    }

    struct Customer;

    impl Entity for Customer {
        fn columns() -> Vec<ColumnDescriptor> {
            vec![
                ColumnDescriptor::new("Id", NativeType::Int64).primary_key().auto_increment(),
                ColumnDescriptor::new("Name", NativeType::String).not_null(),
            ]
        }
    }

    struct Order;

    impl Entity for Order {
        fn columns() -> Vec<ColumnDescriptor> {
            vec![
                ColumnDescriptor::new("Id", NativeType::Int64).primary_key().auto_increment(),
                ColumnDescriptor::new("CustomerId", NativeType::Int64).index(),
            ]
        }

        fn table_name() -> String {
            "Orders".to_string()
        }
    }

    /// 空のデータベースに対してはテーブルを作成し、その後インデックスを作成する
    #[tokio::test]
    async fn test_create_table_with_indexes() {
        let database = InMemoryDatabase::new();

        let report = synchronizer(&database).synchronize(schema_ab()).await.unwrap();

        assert_eq!(report.action, SyncAction::Create);
        assert!(report.applied);
        assert_eq!(
            database.executed(),
            vec![
                "CREATE TABLE T( A int NOT NULL,B varchar(100), CONSTRAINT PK_T PRIMARY KEY(A))",
                "CREATE INDEX idx_B ON T(B)",
            ]
        );
        assert_eq!(database.columns("T"), Some(vec!["A".to_string(), "B".to_string()]));
    }

    /// 2回目の同期ではDDLを発行しない
    #[tokio::test]
    async fn test_synchronize_is_idempotent() {
        let database = InMemoryDatabase::new();
        let sync = synchronizer(&database);

        sync.synchronize(schema_ab()).await.unwrap();
        let executed_after_first = database.executed().len();

        let report = sync.synchronize(schema_ab()).await.unwrap();

        assert_eq!(report.action, SyncAction::UpToDate);
        assert!(report.statements.is_empty());
        assert_eq!(database.executed().len(), executed_after_first);
    }

    /// カラムを追加したスキーマは1件のALTER TABLEのみを発行する
    #[tokio::test]
    async fn test_create_then_alter_round_trip() {
        let database = InMemoryDatabase::new();
        let sync = synchronizer(&database);

        sync.synchronize(schema_ab()).await.unwrap();
        let before = database.executed().len();

        let extended = schema_ab().column(ColumnDescriptor::new("C", NativeType::DateTime));
        let report = sync.synchronize(extended).await.unwrap();

        let executed = database.executed();
        let new_statements = &executed[before..];
        assert_eq!(report.action, SyncAction::Alter);
        assert_eq!(new_statements, ["ALTER TABLE T ADD C datetime"]);
        assert!(!new_statements[0].contains(" A ") && !new_statements[0].contains(" B "));
        assert_eq!(
            database.columns("T"),
            Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
    }

    /// 追加カラムのインデックスのみを作成し、既存カラムのインデックスは再作成しない
    #[tokio::test]
    async fn test_alter_creates_indexes_for_new_columns_only() {
        let database = InMemoryDatabase::with_table("T", &["A", "B"]);

        let schema = schema_ab().column(ColumnDescriptor::new("C", NativeType::String).unique_index());
        synchronizer(&database).synchronize(schema).await.unwrap();

        assert_eq!(
            database.executed(),
            vec![
                "ALTER TABLE T ADD C varchar(100)",
                "CREATE UNIQUE INDEX idx_C ON T(C)",
            ]
        );
        assert_eq!(database.indexes(), vec!["idx_C"]);
    }

    /// 小文字に畳み込まれた既存カラムは一致とみなし、DDLを発行しない
    #[tokio::test]
    async fn test_lowercased_existing_columns_are_up_to_date() {
        let database = InMemoryDatabase::with_table("T", &["a", "b"]);

        let report = synchronizer(&database).synchronize(schema_ab()).await.unwrap();

        assert_eq!(report.action, SyncAction::UpToDate);
        assert!(database.executed().is_empty());
    }

    /// SQL Serverの接続設定ではTDS接続が使用される
    #[tokio::test]
    async fn test_for_database_dispatches_sqlserver_driver() {
        let config = DatabaseConfig {
            driver: Driver::SqlServer,
            host: "127.0.0.1".to_string(),
            port: Some(1),
            database: "app".to_string(),
            user: None,
            password: None,
            url: None,
            trust_server_certificate: false,
        };

        let error = SchemaSynchronizer::for_database(&config)
            .synchronize(schema_ab())
            .await
            .unwrap_err();

        assert!(error.is_database());
        assert!(error.to_string().contains("Failed to open sqlserver connection"));
    }

    /// dry-runは計画のみを返し、DDLを実行しない
    #[tokio::test]
    async fn test_dry_run_executes_nothing() {
        let database = InMemoryDatabase::with_table("T", &["A"]);

        let report = synchronizer(&database).dry_run(schema_ab()).await.unwrap();

        assert!(!report.applied);
        assert_eq!(report.action, SyncAction::Alter);
        assert_eq!(
            report.statements,
            vec!["ALTER TABLE T ADD B varchar(100)", "CREATE INDEX idx_B ON T(B)"]
        );
        assert!(database.executed().is_empty());
    }

    /// エンティティ型をチェーンして同期できる
    #[tokio::test]
    async fn test_register_chains_entities() {
        let database = InMemoryDatabase::new();
        let sync = synchronizer(&database);

        sync.register::<Customer>()
            .await
            .unwrap()
            .register::<Order>()
            .await
            .unwrap();

        assert!(database.columns("Customer").is_some());
        assert_eq!(
            database.columns("Orders"),
            Some(vec!["Id".to_string(), "CustomerId".to_string()])
        );
        assert_eq!(
            database.executed()[0],
            "CREATE TABLE Customer( Id bigint Identity(1,1) NOT NULL,Name varchar(100) NOT NULL, CONSTRAINT PK_Customer PRIMARY KEY(Id))"
        );
        assert_eq!(database.executed().last().unwrap(), "CREATE INDEX idx_CustomerId ON Orders(CustomerId)");
    }

    /// 同期のたびにデータベースを参照する（キャッシュしない）
    #[tokio::test]
    async fn test_every_call_introspects() {
        let database = InMemoryDatabase::with_table("T", &["A", "B"]);
        let sync = synchronizer(&database);

        sync.synchronize(schema_ab()).await.unwrap();
        let first = database.introspections();
        sync.synchronize(schema_ab()).await.unwrap();

        assert_eq!(database.introspections(), first * 2);
    }

    /// DDLの失敗は呼び出し元に伝播し、後続の文は実行されない
    #[tokio::test]
    async fn test_execution_failure_stops_plan() {
        let database = InMemoryDatabase::new();
        database.fail_on("create_index");

        let error = synchronizer(&database)
            .synchronize(schema_ab())
            .await
            .unwrap_err();

        assert!(error.is_database());
        assert!(error.to_string().contains("simulated failure"));
        // テーブル作成のみが実行済み
        assert_eq!(database.executed().len(), 1);
        assert!(database.columns("T").is_some());
    }

    /// 不正なスキーマはデータベースに触れる前に拒否される
    #[tokio::test]
    async fn test_invalid_schema_is_rejected_before_introspection() {
        let database = InMemoryDatabase::new();
        let schema = TableSchema::new("Logs").column(ColumnDescriptor::new("Message", NativeType::String));

        let error = synchronizer(&database).synchronize(schema).await.unwrap_err();

        assert!(error.is_invalid_schema());
        assert_eq!(database.introspections(), 0);
        assert!(database.executed().is_empty());
    }

    /// 異なるテーブルの同期は並行実行できる
    #[tokio::test]
    async fn test_concurrent_synchronization_of_distinct_tables() {
        let database = InMemoryDatabase::new();
        let sync = synchronizer(&database);

        let (customers, orders) = tokio::join!(
            sync.synchronize(Customer::table_schema()),
            sync.synchronize(Order::table_schema())
        );

        assert_eq!(customers.unwrap().action, SyncAction::Create);
        assert_eq!(orders.unwrap().action, SyncAction::Create);
        assert!(database.columns("Customer").is_some());
        assert!(database.columns("Orders").is_some());
    }
}
