// Sedimentライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメインモデル（エンティティスキーマ、設定、エラー）
// - adapters: データベースアクセス、型マッピング、DDL生成
// - services: 検証、カラム抽出、同期オーケストレーション

pub mod adapters;
pub mod cli;
pub mod core;
pub mod services;
