// SQLリテラルクォートユーティリティ
//
// イントロスペクションクエリに埋め込む文字列リテラルのエスケープを提供します。

/// 文字列リテラルクォート（シングルクォート）
///
/// リテラル内のシングルクォートは二重にエスケープします。
///
/// # Examples
/// ```
/// use sediment::adapters::sql_quote::quote_string_literal;
/// assert_eq!(quote_string_literal("Users"), "'Users'");
/// assert_eq!(quote_string_literal("O'Brien"), "'O''Brien'");
/// ```
pub fn quote_string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
