use super::msg_key::MsgKey;
use super::ui_msg::UiMsg;
use super::{EN_MSGS, EN_UI_MSGS, JA_MSGS, JA_UI_MSGS};
use std::sync::OnceLock;

/// 言語設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    Ja,
}

impl Lang {
    /// 環境変数から言語を取得
    /// 優先順位: SQLFMT_LANG > LANG > デフォルト(en)
    pub fn from_env() -> Self {
        if let Ok(lang) = std::env::var("SQLFMT_LANG") {
            return Self::parse(&lang);
        }

        // LANGから言語コードを取得（ja_JP.UTF-8 -> ja）
        if let Ok(lang) = std::env::var("LANG") {
            let lang_code = lang.split('_').next().unwrap_or("");
            return Self::parse(lang_code);
        }

        Lang::En
    }

    /// 言語コードをパース
    fn parse(code: &str) -> Self {
        match code {
            "ja" | "ja_JP" => Lang::Ja,
            _ => Lang::En, // 未対応言語は英語にフォールバック
        }
    }

    /// 言語コードを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
        }
    }
}

/// メッセージマネージャー（HashMap検索、enフォールバック）
pub struct Messages {
    lang: Lang,
}

impl Messages {
    /// 言語設定でMessagesインスタンスを作成
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    /// メッセージを取得（jaになければenにフォールバック）
    pub fn get(&self, key: MsgKey) -> &'static str {
        match self.lang {
            Lang::En => EN_MSGS.get(&key).unwrap_or(&"[missing message]"),
            Lang::Ja => JA_MSGS
                .get(&key)
                .or_else(|| EN_MSGS.get(&key))
                .unwrap_or(&"[missing message]"),
        }
    }

    /// UIメッセージを取得（jaになければenにフォールバック）
    pub fn ui(&self, key: UiMsg) -> &'static str {
        match self.lang {
            Lang::En => EN_UI_MSGS.get(&key).unwrap_or(&"[missing message]"),
            Lang::Ja => JA_UI_MSGS
                .get(&key)
                .or_else(|| EN_UI_MSGS.get(&key))
                .unwrap_or(&"[missing message]"),
        }
    }

    /// メッセージをフォーマット（プレースホルダー {0}, {1}, ... を置換）
    pub fn fmt(&self, key: MsgKey, args: &[&str]) -> String {
        substitute(self.get(key), args)
    }

    /// UIメッセージをフォーマット
    pub fn fmt_ui(&self, key: UiMsg, args: &[&str]) -> String {
        substitute(self.ui(key), args)
    }
}

/// プレースホルダーを置換する。一度の走査でO(n)で処理
fn substitute(template: &str, args: &[&str]) -> String {
    let estimated_size = template.len() + args.iter().map(|s| s.len()).sum::<usize>();
    let mut result = String::with_capacity(estimated_size);

    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            result.push(ch);
            continue;
        }

        let mut digits = String::new();
        let mut lookahead = chars.clone();
        let mut replaced = false;
        for d in lookahead.by_ref() {
            if d.is_ascii_digit() {
                digits.push(d);
                continue;
            }
            if d == '}' && !digits.is_empty() {
                if let Some(arg) = digits.parse::<usize>().ok().and_then(|i| args.get(i)) {
                    result.push_str(arg);
                    replaced = true;
                }
            }
            break;
        }

        if replaced {
            chars = lookahead;
        } else {
            // プレースホルダーではない（または引数不足）のでそのまま出力
            result.push(ch);
        }
    }

    result
}

// グローバルインスタンス
static MESSAGES: OnceLock<Messages> = OnceLock::new();

/// i18nシステムを初期化
pub fn init() {
    let _ = messages();
}

/// グローバルなメッセージインスタンスを取得
pub fn messages() -> &'static Messages {
    MESSAGES.get_or_init(|| Messages::new(Lang::from_env()))
}

/// メッセージを取得してフォーマット
pub fn fmt_msg(key: MsgKey, args: &[&str]) -> String {
    messages().fmt(key, args)
}

/// UIメッセージを取得してフォーマット
pub fn fmt_ui_msg(key: UiMsg, args: &[&str]) -> String {
    messages().fmt_ui(key, args)
}

/// メッセージを取得
pub fn msg(key: MsgKey) -> &'static str {
    messages().get(key)
}

/// UIメッセージを取得
pub fn ui_msg(key: UiMsg) -> &'static str {
    messages().ui(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_positional_placeholders() {
        let m = Messages::new(Lang::En);
        assert_eq!(
            m.fmt(MsgKey::FileReadFailed, &["a.sql", "denied"]),
            "failed to read a.sql: denied"
        );
    }

    #[test]
    fn keeps_unmatched_braces() {
        assert_eq!(substitute("{x} {0} {9}", &["a"]), "{x} a {9}");
        assert_eq!(substitute("{", &[]), "{");
    }

    #[test]
    fn japanese_falls_back_to_english() {
        let m = Messages::new(Lang::Ja);
        // HelpTextは日本語表に無いので英語が返る
        assert!(m.ui(UiMsg::HelpText).starts_with("sqlfmt"));
        assert_eq!(m.get(MsgKey::ConfigUnknownKey), "不明な設定キー: {0}");
    }

    #[test]
    fn every_key_has_english_text() {
        let m = Messages::new(Lang::En);
        for key in [
            MsgKey::UnexpectedChar,
            MsgKey::UnclosedString,
            MsgKey::UnclosedQuotedIdent,
            MsgKey::UnclosedBlockComment,
            MsgKey::UnmatchedCloseParen,
            MsgKey::UnclosedParen,
            MsgKey::ConfigReadFailed,
            MsgKey::ConfigParseFailed,
            MsgKey::ConfigUnknownKey,
            MsgKey::FileReadFailed,
            MsgKey::FileWriteFailed,
            MsgKey::HelpCloseParen,
            MsgKey::HelpCloseString,
            MsgKey::HelpCloseComment,
            MsgKey::DidYouMean,
        ] {
            assert_ne!(m.get(key), "[missing message]", "{:?}", key);
        }
    }
}
