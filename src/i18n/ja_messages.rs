use super::msg_key::MsgKey;
use super::msg_key::MsgKey::*;
use super::ui_msg::UiMsg;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 日本語エラーメッセージ
pub static JA_MSGS: LazyLock<HashMap<MsgKey, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // レキサーエラー
        (UnexpectedChar, "予期しない文字: {0}"),
        (UnclosedString, "文字列リテラルが閉じられていません"),
        (UnclosedQuotedIdent, "引用符付き識別子が閉じられていません"),
        (UnclosedBlockComment, "ブロックコメントが閉じられていません"),
        // パーサーエラー
        (UnmatchedCloseParen, "対応する '(' がない ')' です"),
        (UnclosedParen, "入力の終端に達しました: '(' が閉じられていません"),
        // 設定ファイル
        (ConfigReadFailed, "設定ファイル {0} の読み込みに失敗: {1}"),
        (ConfigParseFailed, "設定ファイル {0} のパースに失敗: {1}"),
        (ConfigUnknownKey, "不明な設定キー: {0}"),
        // I/O
        (FileReadFailed, "{0} の読み込みに失敗: {1}"),
        (FileWriteFailed, "{0} の書き込みに失敗: {1}"),
        // ヒント
        (HelpCloseParen, "対応する ')' を追加してください"),
        (HelpCloseString, "同じ引用符でリテラルを閉じてください"),
        (HelpCloseComment, "'*/' でコメントを閉じてください"),
        (DidYouMean, "もしかして: {0}"),
    ])
});

/// 日本語UIメッセージ（未定義のキーは英語にフォールバック）
pub static JA_UI_MSGS: LazyLock<HashMap<UiMsg, &'static str>> = LazyLock::new(|| {
    use UiMsg::*;
    HashMap::from([
        (ErrorUnknownOption, "エラー: 不明なオプション: {0}"),
        (ErrorRequiresArg, "エラー: {0} には引数が必要です"),
        (ErrorInvalidNumber, "エラー: {0} には数値を指定してください（実際: {1}）"),
        (ErrorWriteNeedsFile, "エラー: --write は標準入力と併用できません"),
        (
            ErrorEditsUnavailable,
            "エラー: --edits には 'format-json' フィーチャーが必要です",
        ),
        (CheckWouldReformat, "{0} は整形が必要です"),
        (CheckSummary, "{0} 個のファイルが整形対象です"),
        (DidYouMeanOption, "  もしかして: {0}"),
    ])
});
