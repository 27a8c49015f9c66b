// エンティティ定義パーサーサービス
//
// YAMLエンティティ定義ファイルの読み込みと解析を行うサービス。
// ディレクトリ内のファイルをファイル名順に読み込み、宣言順のテーブルスキーマ一覧を生成します。

use crate::core::error::IoError;
use crate::core::schema::TableSchema;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// エンティティ定義ファイルの内容
#[derive(Debug, Clone, Deserialize)]
pub struct EntityFile {
    /// エンティティ（テーブル）定義のリスト
    #[serde(default)]
    pub entities: Vec<TableSchema>,
}

/// エンティティ定義パーサーサービス
#[derive(Debug, Clone, Default)]
pub struct SchemaParserService {}

impl SchemaParserService {
    /// 新しいSchemaParserServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// 指定されたディレクトリからすべてのYAMLファイルを読み込み、テーブルスキーマ一覧を返す
    ///
    /// # Arguments
    ///
    /// * `schema_dir` - エンティティ定義ファイルが格納されたディレクトリ
    ///
    /// # Errors
    ///
    /// - ディレクトリが存在しない場合
    /// - YAMLファイルの解析に失敗した場合
    /// - 同じテーブルが複数回定義されている場合
    pub fn parse_schema_directory(&self, schema_dir: &Path) -> Result<Vec<TableSchema>> {
        // ディレクトリの存在確認
        if !schema_dir.exists() {
            return Err(IoError::FileNotFound {
                path: schema_dir.display().to_string(),
            }
            .into());
        }

        if !schema_dir.is_dir() {
            return Err(anyhow!(
                "Schema path is not a directory: {}",
                schema_dir.display()
            ));
        }

        let mut schemas: Vec<TableSchema> = Vec::new();
        let mut seen = HashSet::new();

        for file_path in self.scan_yaml_files(schema_dir)? {
            let file = self
                .parse_schema_file(&file_path)
                .with_context(|| format!("Failed to parse entity file: {:?}", file_path))?;

            for schema in file.entities {
                if !seen.insert(schema.table_name.clone()) {
                    return Err(anyhow!(
                        "Table '{}' is defined more than once (last seen in {:?})",
                        schema.table_name,
                        file_path
                    ));
                }
                schemas.push(schema);
            }
        }

        Ok(schemas)
    }

    /// 単一のYAMLファイルを解析
    ///
    /// # Errors
    ///
    /// - ファイルが存在しない場合
    /// - ファイルの読み込みに失敗した場合
    /// - YAMLの解析に失敗した場合
    pub fn parse_schema_file(&self, file_path: &Path) -> Result<EntityFile> {
        // ファイルの存在確認
        if !file_path.exists() {
            return Err(IoError::FileNotFound {
                path: file_path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(file_path).map_err(|e| IoError::FileRead {
            path: file_path.display().to_string(),
            cause: e.to_string(),
        })?;

        self.parse_schema_str(&content)
    }

    /// YAML文字列を解析
    pub fn parse_schema_str(&self, content: &str) -> Result<EntityFile> {
        serde_saphyr::from_str(content).with_context(|| "Failed to parse entity YAML")
    }

    /// ディレクトリ内のYAMLファイルをファイル名順にスキャン
    ///
    /// .yaml と .yml 拡張子を持つファイルのみを収集します。
    fn scan_yaml_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut yaml_files = Vec::new();

        let entries = fs::read_dir(dir).map_err(|e| IoError::FileRead {
            path: dir.display().to_string(),
            cause: e.to_string(),
        })?;

        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to read directory entry in {:?}", dir))?
                .path();
            if !path.is_file() {
                continue;
            }

            let is_yaml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "yaml" || ext == "yml");
            if is_yaml {
                yaml_files.push(path);
            }
        }

        yaml_files.sort();
        Ok(yaml_files)
    }
}
