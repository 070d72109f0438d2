/// エラーメッセージキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgKey {
    // レキサーエラー
    UnexpectedChar,
    UnclosedString,
    UnclosedQuotedIdent,
    UnclosedBlockComment,

    // パーサーエラー
    UnmatchedCloseParen,
    UnclosedParen,

    // 設定ファイル
    ConfigReadFailed,  // {0}: パス, {1}: 詳細
    ConfigParseFailed, // {0}: パス, {1}: 詳細
    ConfigUnknownKey,  // {0}: キー

    // I/O
    FileReadFailed,  // {0}: パス, {1}: 詳細
    FileWriteFailed, // {0}: パス, {1}: 詳細

    // ヒント
    HelpCloseParen,
    HelpCloseString,
    HelpCloseComment,
    DidYouMean, // {0}: 候補
}
