//! SQLフォーマッター
//!
//! パース済みの木を規則表に従って書き換え、ドキュメント全体を置き換える
//! 1つの編集として返す。
//!
//! - `env`: インデント段数と兄弟カーソルを持つレイアウト環境
//! - `rules`: キーワード・トークン種別ごとのレイアウト規則表
//! - `engine`: ノードの種類ごとの整形関数と振り分け
//!
//! 整形は行幅を見ない規則ベース。元の空白は再現せず、トークンの並びだけを保つ。

mod engine;
mod env;
mod rules;

pub use engine::eval;
pub use env::LayoutEnv;
pub use rules::{apply_rules, LayoutAction, LayoutRule, ITEM_RULES, MULTI_KEYWORD_RULES};

use crate::ast::Node;
use crate::config::LayoutConfig;
use crate::error::SqlFmtError;
use crate::parser::parse;
use crate::protocol::{
    DocumentFormattingParams, DocumentRangeFormattingParams, FormattingOptions, Range,
    TextEdit,
};

/// 1回の整形の結果
#[derive(Debug, Clone)]
pub struct FormattedTree {
    /// 書き換え後の木
    pub tree: Node,
    pub text: String,
    /// 元の木が覆っていた範囲（編集の置換範囲）
    pub range: Range,
    /// 走査を終えた時点の段数。0でなければ規則の組み合わせがずれている
    pub final_indent_level: i32,
    /// 走査中の最小の段数
    pub lowest_indent_level: i32,
}

/// 木を整形する。環境は呼び出しごとに新しく作る
pub fn format_node(root: &Node, config: &LayoutConfig) -> FormattedTree {
    let mut env = LayoutEnv::new();
    let tree = eval(root, &mut env);
    let text = tree.render(&config.indent_unit());

    let (start, end) = root.span().unwrap_or_default();
    let formatted = FormattedTree {
        tree,
        text,
        range: Range::new(start, end),
        final_indent_level: env.indent_level(),
        lowest_indent_level: env.lowest_level(),
    };
    if formatted.final_indent_level != 0 || formatted.lowest_indent_level < 0 {
        tracing::debug!(
            final_level = formatted.final_indent_level,
            lowest_level = formatted.lowest_indent_level,
            "indent level drift"
        );
    }
    formatted
}

/// テキストをパースして整形する。`file` はエラー表示用の名前
pub fn format_source(
    text: &str,
    file: &str,
    config: &LayoutConfig,
) -> Result<FormattedTree, SqlFmtError> {
    let root = parse(text).map_err(|e| SqlFmtError::from_syntax(&e, file, text))?;
    tracing::debug!(
        file,
        bytes = text.len(),
        statements = root.as_list().map_or(0, |l| l.children.len()),
        "formatting document"
    );
    Ok(format_node(&root, config))
}

/// ドキュメント全体を置き換える編集を1つ作る
pub fn format_document(
    text: &str,
    options: Option<&FormattingOptions>,
    config: &LayoutConfig,
) -> Result<TextEdit, SqlFmtError> {
    let config = config.with_options(options);
    let formatted = format_source(text, "<document>", &config)?;
    Ok(TextEdit {
        range: formatted.range,
        new_text: formatted.text,
    })
}

/// `textDocument/formatting`: 常にちょうど1つの編集を返す
pub fn format(
    text: &str,
    params: &DocumentFormattingParams,
) -> Result<Vec<TextEdit>, SqlFmtError> {
    let edit = format_document(text, params.options.as_ref(), &LayoutConfig::default())?;
    Ok(vec![edit])
}

/// `textDocument/rangeFormatting`: 範囲は受け取るが、ドキュメント全体を整形する
pub fn format_range(
    text: &str,
    params: &DocumentRangeFormattingParams,
) -> Result<Vec<TextEdit>, SqlFmtError> {
    tracing::debug!(range = ?params.range, "range ignored, formatting whole document");
    let edit = format_document(text, params.options.as_ref(), &LayoutConfig::default())?;
    Ok(vec![edit])
}

/// 既定の設定で整形したテキストを返す
pub fn format_text(text: &str) -> Result<String, SqlFmtError> {
    Ok(format_source(text, "<input>", &LayoutConfig::default())?.text)
}
