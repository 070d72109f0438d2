use super::msg_key::MsgKey;
use super::msg_key::MsgKey::*;
use super::ui_msg::UiMsg;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 英語エラーメッセージ
pub static EN_MSGS: LazyLock<HashMap<MsgKey, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // レキサーエラー
        (UnexpectedChar, "unexpected character: {0}"),
        (UnclosedString, "unclosed string literal"),
        (UnclosedQuotedIdent, "unclosed quoted identifier"),
        (UnclosedBlockComment, "unclosed block comment"),
        // パーサーエラー
        (UnmatchedCloseParen, "unmatched ')'"),
        (UnclosedParen, "unexpected end of input: '(' is not closed"),
        // 設定ファイル
        (ConfigReadFailed, "failed to read config {0}: {1}"),
        (ConfigParseFailed, "failed to parse config {0}: {1}"),
        (ConfigUnknownKey, "unknown config key: {0}"),
        // I/O
        (FileReadFailed, "failed to read {0}: {1}"),
        (FileWriteFailed, "failed to write {0}: {1}"),
        // ヒント
        (HelpCloseParen, "add a matching ')'"),
        (HelpCloseString, "terminate the literal with a matching quote"),
        (HelpCloseComment, "terminate the comment with '*/'"),
        (DidYouMean, "did you mean: {0}?"),
    ])
});

/// 英語UIメッセージ
pub static EN_UI_MSGS: LazyLock<HashMap<UiMsg, &'static str>> = LazyLock::new(|| {
    use UiMsg::*;
    HashMap::from([
        (
            HelpText,
            "sqlfmt - rule-based SQL formatter

USAGE:
    sqlfmt [OPTIONS] [FILE|-]...

OPTIONS:
    -w, --write          Rewrite files in place
        --check          Exit with status 1 if any file would be reformatted
        --edits          Print the edit list as JSON instead of the formatted text
        --config PATH    Read layout settings from PATH (default: ./.sqlfmt.toml)
        --indent N       Indent width in spaces
        --tabs           Indent with tabs
    -v, --verbose        Enable debug logging (see also SQLFMT_LOG)
    -h, --help           Show this help
    -V, --version        Show version

Reads standard input when no file (or '-') is given.",
        ),
        (VersionString, "sqlfmt v{0}"),
        (ErrorUnknownOption, "Error: unknown option: {0}"),
        (ErrorRequiresArg, "Error: {0} requires an argument"),
        (ErrorInvalidNumber, "Error: {0} expects a number, got {1}"),
        (ErrorWriteNeedsFile, "Error: --write cannot be used with standard input"),
        (
            ErrorEditsUnavailable,
            "Error: --edits requires the 'format-json' feature",
        ),
        (CheckWouldReformat, "would reformat {0}"),
        (CheckSummary, "{0} file(s) would be reformatted"),
        (DidYouMeanOption, "  did you mean: {0}?"),
    ])
});
