// 命名ポリシー
//
// 既定のパスとDDLで使用する命名規則の単一ソースを提供します。

/// 既定の設定ファイル名
pub const CONFIG_FILE: &str = ".sediment.yaml";

/// 既定のエンティティ定義ディレクトリ
pub const ENTITY_DIR: &str = "entities";

/// プライマリキー未指定時に使用するカラム名
pub const DEFAULT_PRIMARY_KEY: &str = "Id";

/// 主キー制約名を生成（PK_<table>）
pub fn primary_key_name(table_name: &str) -> String {
    format!("PK_{}", table_name)
}

/// インデックス名を生成（idx_<column>）
pub fn index_name(column_name: &str) -> String {
    format!("idx_{}", column_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_names() {
        assert_eq!(primary_key_name("Users"), "PK_Users");
        assert_eq!(index_name("Email"), "idx_Email");
    }

    #[test]
    fn test_default_paths() {
        assert_eq!(CONFIG_FILE, ".sediment.yaml");
        assert_eq!(ENTITY_DIR, "entities");
    }
}
