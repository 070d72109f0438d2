//! ホスト（LSP）とやり取りするプロトコル型
//!
//! フィールド名はLSPのJSON表現（camelCase）に合わせる。

use serde::{Deserialize, Serialize};

/// テキスト上の位置（0始まりの行と、UTF-16コード単位の列）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// 半開区間 `[start, end)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// 置換編集
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

/// エディタから渡される整形オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingOptions {
    pub tab_size: u32,
    pub insert_spaces: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            tab_size: 2,
            insert_spaces: true,
        }
    }
}

/// `textDocument/formatting` のパラメータ（ドキュメント識別子はホスト側で解決済み）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFormattingParams {
    #[serde(default)]
    pub options: Option<FormattingOptions>,
}

/// `textDocument/rangeFormatting` のパラメータ
///
/// `range` は受け付けるが、整形は常にドキュメント全体に対して行う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRangeFormattingParams {
    pub range: Range,
    #[serde(default)]
    pub options: Option<FormattingOptions>,
}
