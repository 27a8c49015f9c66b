// Adapters
// データベースアクセス、型マッピング、DDL生成を抽象化

pub mod connection_string;
pub mod database;
pub mod schema_introspector;
pub mod sql_generator;
pub mod sql_quote;
pub mod sqlserver_connection;
pub mod type_mapping;
