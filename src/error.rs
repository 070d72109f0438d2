//! sqlfmtエラー処理
//!
//! 構造化されたエラー情報を提供し、以下をサポート：
//! - エラーコードによる分類
//! - ソース上の位置情報（行・列）
//! - ヒント
//! - 複数の出力形式（人間向け/JSON）

use crate::i18n::{fmt_msg, msg, MsgKey};
use crate::protocol::Position;
use std::fmt;

/// エラーコード
///
/// Rustコンパイラ風の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 5xxx: I/Oエラー
    E0501, // ファイル読み込みエラー
    E0502, // ファイル書き込みエラー

    // 6xxx: パースエラー
    E0601, // 構文エラー
    E0602, // 字句解析エラー
    E0603, // 予期しないトークン
    E0605, // EOF（入力終端）エラー

    // 7xxx: 設定エラー
    E0701, // 設定ファイルエラー
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// ソースコード上の位置情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    /// 0始まりの行
    pub line: u32,
    /// 0始まりの列（UTF-16コード単位）
    pub column: u32,
    pub length: usize,
    pub source_line: Option<String>,
}

impl SourceLocation {
    pub fn new(file: String, line: u32, column: u32) -> Self {
        Self {
            file,
            line,
            column,
            length: 1,
            source_line: None,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_source_line(mut self, source_line: String) -> Self {
        self.source_line = Some(source_line);
        self
    }
}

/// 字句解析・構文解析の低レベルエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("unexpected character {found:?} at {at:?}")]
    UnexpectedChar { found: char, at: Position },
    #[error("unclosed string literal starting at {at:?}")]
    UnclosedString { at: Position },
    #[error("unclosed quoted identifier starting at {at:?}")]
    UnclosedQuotedIdent { at: Position },
    #[error("unclosed block comment starting at {at:?}")]
    UnclosedBlockComment { at: Position },
    #[error("unmatched ')' at {at:?}")]
    UnmatchedCloseParen { at: Position },
    #[error("'(' at {at:?} is never closed")]
    UnclosedParen { at: Position },
}

impl SyntaxError {
    /// エラーの発生位置
    pub fn position(&self) -> Position {
        match self {
            SyntaxError::UnexpectedChar { at, .. }
            | SyntaxError::UnclosedString { at }
            | SyntaxError::UnclosedQuotedIdent { at }
            | SyntaxError::UnclosedBlockComment { at }
            | SyntaxError::UnmatchedCloseParen { at }
            | SyntaxError::UnclosedParen { at } => *at,
        }
    }
}

/// 構造化されたエラー情報
#[derive(Debug, Clone)]
pub struct SqlFmtError {
    /// エラーコード
    code: ErrorCode,
    /// メインメッセージ（1行）
    message: String,
    /// ソースコード上の位置
    location: Option<SourceLocation>,
    /// 詳細な説明（note）
    notes: Vec<String>,
    /// 解決のヒント（help）
    help: Vec<String>,
}

impl SqlFmtError {
    /// 新しいエラーを作成
    pub fn new<S: Into<String>>(code: ErrorCode, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// 位置情報を追加
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// noteを追加
    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.notes.push(note.into());
        self
    }

    /// helpを追加
    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help.push(help.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// シンプルなメッセージのみ取得
    pub fn message(&self) -> &str {
        &self.message
    }

    /// エラーコード + メッセージ（ログ用）
    pub fn short(&self) -> String {
        format!("error[{}]: {}", self.code, self.message)
    }

    /// 完全な詳細情報（CLI用）
    pub fn full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("error[{}]: {}\n", self.code, self.message));

        // 位置情報（表示は1始まり）
        if let Some(loc) = &self.location {
            let line = loc.line + 1;
            // 行番号の桁数に合わせた余白（`|` の位置を揃える）
            let gutter = " ".repeat(line.to_string().len());
            output.push_str(&format!("{} --> {}:{}:{}\n", gutter, loc.file, line, loc.column + 1));

            if let Some(source) = &loc.source_line {
                output.push_str(&format!("{} |\n", gutter));
                output.push_str(&format!("{} | {}\n", line, source));

                let spaces = caret_padding(source, loc.column);
                let carets = "^".repeat(loc.length.max(1));
                output.push_str(&format!("{} | {}{}\n", gutter, spaces, carets));
            }

            output.push_str(&format!("{} |\n", gutter));
        }

        for note in &self.notes {
            output.push_str(&format!("  = note: {}\n", note));
        }
        for help_text in &self.help {
            output.push_str(&format!("  = help: {}\n", help_text));
        }

        output
    }

    /// JSON形式で出力（エディタ統合用）
    #[cfg(feature = "format-json")]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        json!({
            "code": self.code.to_string(),
            "message": self.message,
            "location": self.location.as_ref().map(|loc| json!({
                "file": loc.file,
                "line": loc.line,
                "column": loc.column,
                "length": loc.length,
            })),
            "notes": self.notes,
            "help": self.help,
        })
    }
}

impl fmt::Display for SqlFmtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full())
    }
}

impl std::error::Error for SqlFmtError {}

// ========================================
// エラー構築ヘルパー関数
// ========================================

impl SqlFmtError {
    /// 字句・構文エラーを、元テキストの該当行付きで変換する
    pub fn from_syntax(err: &SyntaxError, file: &str, source: &str) -> Self {
        let at = err.position();
        let (code, message, help) = match err {
            SyntaxError::UnexpectedChar { found, .. } => (
                ErrorCode::E0602,
                fmt_msg(MsgKey::UnexpectedChar, &[&found.to_string()]),
                None,
            ),
            SyntaxError::UnclosedString { .. } => (
                ErrorCode::E0602,
                msg(MsgKey::UnclosedString).to_string(),
                Some(MsgKey::HelpCloseString),
            ),
            SyntaxError::UnclosedQuotedIdent { .. } => (
                ErrorCode::E0602,
                msg(MsgKey::UnclosedQuotedIdent).to_string(),
                Some(MsgKey::HelpCloseString),
            ),
            SyntaxError::UnclosedBlockComment { .. } => (
                ErrorCode::E0602,
                msg(MsgKey::UnclosedBlockComment).to_string(),
                Some(MsgKey::HelpCloseComment),
            ),
            SyntaxError::UnmatchedCloseParen { .. } => (
                ErrorCode::E0603,
                msg(MsgKey::UnmatchedCloseParen).to_string(),
                None,
            ),
            SyntaxError::UnclosedParen { .. } => (
                ErrorCode::E0605,
                msg(MsgKey::UnclosedParen).to_string(),
                Some(MsgKey::HelpCloseParen),
            ),
        };

        let mut location = SourceLocation::new(file.to_string(), at.line, at.character);
        if let Some(line) = source.lines().nth(at.line as usize) {
            location = location.with_source_line(line.to_string());
        }

        let mut error = SqlFmtError::new(code, message).with_location(location);
        if let Some(key) = help {
            error = error.with_help(msg(key));
        }
        error
    }

    /// ファイル読み込みエラー
    pub fn read_error(path: &str, detail: &str) -> Self {
        SqlFmtError::new(
            ErrorCode::E0501,
            fmt_msg(MsgKey::FileReadFailed, &[path, detail]),
        )
    }

    /// ファイル書き込みエラー
    pub fn write_error(path: &str, detail: &str) -> Self {
        SqlFmtError::new(
            ErrorCode::E0502,
            fmt_msg(MsgKey::FileWriteFailed, &[path, detail]),
        )
    }

    /// 設定ファイルエラー
    pub fn config_error(message: String) -> Self {
        SqlFmtError::new(ErrorCode::E0701, message)
    }
}

/// `column`（UTF-16単位）までのソース行の文字を空白に置き換える。タブはタブのまま
fn caret_padding(source: &str, column: u32) -> String {
    let mut units = 0u32;
    source
        .chars()
        .take_while(|c| {
            let inside = units < column;
            units += c.len_utf16() as u32;
            inside
        })
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_error() {
        let err = SqlFmtError::new(ErrorCode::E0601, "syntax error");
        assert_eq!(err.message(), "syntax error");
        assert_eq!(err.short(), "error[E0601]: syntax error");
    }

    #[test]
    fn test_error_with_location() {
        let loc = SourceLocation::new("query.sql".to_string(), 9, 6)
            .with_length(3)
            .with_source_line("WHERE (a = 1".to_string());

        let err = SqlFmtError::new(ErrorCode::E0605, "unclosed")
            .with_location(loc)
            .with_help("add a matching ')'");

        let full = err.full();
        assert!(full.contains("error[E0605]"));
        assert!(full.contains("query.sql:10:7"));
        let lines: Vec<&str> = full.lines().collect();
        let source = lines.iter().position(|l| l.ends_with("WHERE (a = 1")).unwrap();
        let caret_line = lines[source + 1];
        let offending = lines[source].find('(').unwrap();
        assert_eq!(caret_line.find('^'), Some(offending));
        assert!(caret_line.ends_with("^^^"));
        // `|` の位置が揃っている
        assert_eq!(lines[source].find('|'), caret_line.find('|'));
        assert!(full.contains("= help:"));
    }

    #[test]
    fn test_from_syntax_carries_source_line() {
        let source = "SELECT a\nFROM (t";
        let err = SyntaxError::UnclosedParen {
            at: Position::new(1, 5),
        };
        let converted = SqlFmtError::from_syntax(&err, "<stdin>", source);
        assert_eq!(converted.code(), ErrorCode::E0605);
        let loc = converted.location().unwrap();
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 5);
        assert_eq!(loc.source_line.as_deref(), Some("FROM (t"));
    }

    #[test]
    fn test_display_trait() {
        let err = SqlFmtError::new(ErrorCode::E0701, "bad config").with_note("line 3");
        let displayed = format!("{}", err);
        assert!(displayed.contains("error[E0701]"));
        assert!(displayed.contains("= note: line 3"));
    }

    #[cfg(feature = "format-json")]
    #[test]
    fn test_to_json() {
        let err = SqlFmtError::new(ErrorCode::E0602, "unclosed string literal");
        let json = err.to_json();
        assert_eq!(json["code"], "E0602");
        assert!(json["location"].is_null());
    }
}
