// Core Domain
// エンティティスキーマ、設定、エラー型などの純粋なドメインモデル

pub mod config;
pub mod error;
pub mod naming;
pub mod schema;
