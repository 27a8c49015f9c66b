// Services Layer
// ドメインロジックを実行するサービス層

pub mod column_extractor;
pub mod schema_parser;
pub mod schema_synchronizer;
pub mod schema_validator;
