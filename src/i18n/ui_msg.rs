/// UIメッセージキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiMsg {
    // ヘルプ・バージョン
    HelpText,
    VersionString,

    // 引数エラー
    ErrorUnknownOption,
    ErrorRequiresArg,
    ErrorInvalidNumber,
    ErrorWriteNeedsFile,
    ErrorEditsUnavailable,

    // --check
    CheckWouldReformat,
    CheckSummary,

    // その他
    DidYouMeanOption,
}
