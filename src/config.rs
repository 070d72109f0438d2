//! レイアウト設定（`.sqlfmt.toml`）
//!
//! ```toml
//! indent-width = 4
//! use-tabs = false
//! ```
//!
//! 読み込み順: 明示されたパス → カレントディレクトリの `.sqlfmt.toml` → デフォルト。
//! エディタから渡された `FormattingOptions` はファイルの設定より優先する。

use crate::error::SqlFmtError;
use crate::i18n::{fmt_msg, MsgKey};
use crate::protocol::FormattingOptions;
use crate::suggest::find_similar;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// デフォルトの設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".sqlfmt.toml";

const KNOWN_KEYS: &[&str] = &["indent-width", "use-tabs"];

/// フォーマッタの設定値
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// インデント1段あたりのスペース数
    pub indent_width: usize,
    /// `true` ならインデントにタブ1文字を使う
    pub use_tabs: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            use_tabs: false,
        }
    }
}

impl LayoutConfig {
    /// インデントマーカー1つ分の文字列
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_width)
        }
    }

    /// エディタのオプションで上書きした設定を返す
    pub fn with_options(&self, options: Option<&FormattingOptions>) -> Self {
        match options {
            Some(options) => Self {
                indent_width: options.tab_size as usize,
                use_tabs: !options.insert_spaces,
            },
            None => self.clone(),
        }
    }
}

/// 設定を読み込む。失敗時は警告を出してデフォルトを返す
pub fn load_config(path: Option<&str>) -> LayoutConfig {
    if let Some(path) = path {
        match read_config(Path::new(path)) {
            Ok(cfg) => return cfg,
            Err(e) => tracing::warn!("{}", e.short()),
        }
    }

    let default_path = Path::new(CONFIG_FILE_NAME);
    if default_path.exists() {
        match read_config(default_path) {
            Ok(cfg) => return cfg,
            Err(e) => tracing::warn!("{}", e.short()),
        }
    }

    LayoutConfig::default()
}

/// 設定ファイルを読んでパースする
pub fn read_config(path: &Path) -> Result<LayoutConfig, SqlFmtError> {
    let shown = dunce::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();
    let content = fs::read_to_string(path).map_err(|e| {
        SqlFmtError::config_error(fmt_msg(
            MsgKey::ConfigReadFailed,
            &[&shown, &e.to_string()],
        ))
    })?;
    let cfg = parse_config(&content, &shown)?;
    tracing::debug!(path = %shown, ?cfg, "loaded layout config");
    Ok(cfg)
}

/// TOML文字列をパースする。`file` はエラーメッセージ用
pub fn parse_config(content: &str, file: &str) -> Result<LayoutConfig, SqlFmtError> {
    let parse_error = |detail: String| {
        SqlFmtError::config_error(fmt_msg(MsgKey::ConfigParseFailed, &[file, &detail]))
    };

    // 未知のキーは候補付きで報告する
    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
        parse_error(e.message().to_string())
    })?;
    if let Some(unknown) = table.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        let mut error =
            SqlFmtError::config_error(fmt_msg(MsgKey::ConfigUnknownKey, &[unknown]))
                .with_note(file.to_string());
        let similar = find_similar(unknown, KNOWN_KEYS.iter().copied(), 3, 1);
        if let Some(best) = similar.first() {
            error = error.with_help(fmt_msg(MsgKey::DidYouMean, &[best]));
        }
        return Err(error);
    }

    toml::from_str(content).map_err(|e: toml::de::Error| parse_error(e.message().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let cfg = parse_config("indent-width = 4\nuse-tabs = true\n", "t.toml").unwrap();
        assert_eq!(cfg.indent_width, 4);
        assert!(cfg.use_tabs);
        assert_eq!(cfg.indent_unit(), "\t");
    }

    #[test]
    fn missing_keys_use_defaults() {
        let cfg = parse_config("", "t.toml").unwrap();
        assert_eq!(cfg, LayoutConfig::default());
        assert_eq!(cfg.indent_unit(), "  ");
    }

    #[test]
    fn unknown_key_suggests_a_fix() {
        let err = parse_config("indnet-width = 4", "t.toml").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0701);
        assert!(err.full().contains("indent-width"), "{}", err.full());
    }

    #[test]
    fn wrong_type_is_an_error() {
        let err = parse_config("indent-width = \"wide\"", "t.toml").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0701);
    }

    #[test]
    fn editor_options_override_file_settings() {
        let file = LayoutConfig {
            indent_width: 4,
            use_tabs: false,
        };
        let options = FormattingOptions {
            tab_size: 3,
            insert_spaces: true,
        };
        assert_eq!(file.with_options(Some(&options)).indent_unit(), "   ");
        let tabs = FormattingOptions {
            tab_size: 8,
            insert_spaces: false,
        };
        assert_eq!(file.with_options(Some(&tabs)).indent_unit(), "\t");
        assert_eq!(file.with_options(None), file);
    }

    #[test]
    fn load_config_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "indent-width = 8").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(load_config(Some(&path)).indent_width, 8);
    }

    #[test]
    fn unreadable_explicit_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = read_config(&missing).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E0701);
        // カレントディレクトリに設定ファイルがなければデフォルト
        if !Path::new(CONFIG_FILE_NAME).exists() {
            assert_eq!(
                load_config(missing.to_str()),
                LayoutConfig::default()
            );
        }
    }
}
