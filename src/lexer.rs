//! SQL字句解析器
//!
//! 空白とコメントも捨てずにトークン化する。各トークンはLSP互換の位置
//! （0始まりの行、UTF-16コード単位の列）を持つ。

use crate::error::SyntaxError;
use crate::protocol::Position;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use std::fmt;

/// キーワードとして扱う単語（大文字）
static KEYWORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "CONSTRAINT",
        "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END",
        "EXCEPT", "EXISTS", "FALSE", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "ILIKE", "IN",
        "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE",
        "LIMIT", "NATURAL", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY",
        "RECURSIVE", "REFERENCES", "RETURNING", "RIGHT", "SELECT", "SET", "TABLE", "THEN",
        "TRUE", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES", "VIEW", "WHEN", "WHERE", "WITH",
    ]
    .into_iter()
    .collect()
});

/// 単語がキーワードかどうか（大文字小文字を区別しない）
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(word.to_ascii_uppercase().as_str())
}

/// トークンの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // 単語・リテラル
    Keyword,
    Ident,
    Number,
    StringLit,
    Placeholder, // ? / $1 / :name / @name

    // 区切り
    Comma,
    Period,
    LParen,
    RParen,
    Semicolon,

    // 比較演算子
    Eq,   // =
    Neq,  // <> / !=
    Lt,   // <
    Gt,   // >
    LtEq, // <=
    GtEq, // >=

    // 算術演算子
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    Concat, // ||

    // トリビア
    Whitespace,
    LineComment,
    BlockComment,

    Other,
}

impl TokenKind {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Neq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Mult
                | TokenKind::Div
                | TokenKind::Mod
                | TokenKind::Concat
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// ソース上の1トークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
    pub end: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// キーワードなら大文字化した綴りを返す
    pub fn keyword(&self) -> Option<String> {
        (self.kind == TokenKind::Keyword).then(|| self.text.to_ascii_uppercase())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// 入力文字列をトークン列に変換する
pub fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(src).tokenize()
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    character: u32,
    /// 直前の（トリビア以外の）トークン種別。符号付き数値の判定に使う
    last_significant: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 0,
            character: 0,
            last_significant: None,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// 1文字進め、行・列を更新する
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.character = 0;
        } else {
            self.character += ch.len_utf16() as u32;
        }
        Some(ch)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        while self.pos < self.src.len() {
            let start_pos = self.pos;
            let start = self.position();
            let kind = self.next_kind(start)?;
            let text = &self.src[start_pos..self.pos];
            tokens.push(Token::new(kind, text, start, self.position()));
            if !matches!(kind, TokenKind::Whitespace) && !kind.is_comment() {
                self.last_significant = Some(kind);
            }
        }
        Ok(tokens)
    }

    /// 次のトークンを読み進め、その種類を返す
    fn next_kind(&mut self, start: Position) -> Result<TokenKind, SyntaxError> {
        let Some(ch) = self.peek() else {
            return Ok(TokenKind::Other);
        };

        if ch.is_whitespace() {
            self.bump_while(char::is_whitespace);
            return Ok(TokenKind::Whitespace);
        }

        if self.rest().starts_with("--") {
            self.bump_while(|c| c != '\n');
            return Ok(TokenKind::LineComment);
        }

        if self.rest().starts_with("/*") {
            self.bump();
            self.bump();
            loop {
                if self.rest().starts_with("*/") {
                    self.bump();
                    self.bump();
                    return Ok(TokenKind::BlockComment);
                }
                if self.bump().is_none() {
                    return Err(SyntaxError::UnclosedBlockComment { at: start });
                }
            }
        }

        if matches!(ch, '-' | '+')
            && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
            && self.sign_allowed()
        {
            self.bump();
            self.read_number();
            return Ok(TokenKind::Number);
        }

        macro_rules! punct {
            ($pattern:expr, $kind:expr) => {
                if self.rest().starts_with($pattern) {
                    for _ in 0..$pattern.chars().count() {
                        self.bump();
                    }
                    return Ok($kind);
                }
            };
        }

        punct!("<>", TokenKind::Neq);
        punct!("!=", TokenKind::Neq);
        punct!("<=", TokenKind::LtEq);
        punct!(">=", TokenKind::GtEq);
        punct!("||", TokenKind::Concat);
        punct!("::", TokenKind::Other);

        match ch {
            '\'' => {
                self.read_quoted('\'', '\'')
                    .ok_or(SyntaxError::UnclosedString { at: start })?;
                Ok(TokenKind::StringLit)
            }
            '"' => {
                self.read_quoted('"', '"')
                    .ok_or(SyntaxError::UnclosedQuotedIdent { at: start })?;
                Ok(TokenKind::Ident)
            }
            '`' => {
                self.read_quoted('`', '`')
                    .ok_or(SyntaxError::UnclosedQuotedIdent { at: start })?;
                Ok(TokenKind::Ident)
            }
            '[' => {
                self.read_quoted('[', ']')
                    .ok_or(SyntaxError::UnclosedQuotedIdent { at: start })?;
                Ok(TokenKind::Ident)
            }
            c if c.is_ascii_digit() => {
                self.read_number();
                Ok(TokenKind::Number)
            }
            c if is_ident_start(c) => {
                let word_start = self.pos;
                self.bump_while(is_ident_char);
                if is_keyword(&self.src[word_start..self.pos]) {
                    Ok(TokenKind::Keyword)
                } else {
                    Ok(TokenKind::Ident)
                }
            }
            '?' => {
                self.bump();
                Ok(TokenKind::Placeholder)
            }
            '$' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.bump();
                self.bump_while(|c| c.is_ascii_digit());
                Ok(TokenKind::Placeholder)
            }
            ':' | '@' if self.peek_nth(1).is_some_and(is_ident_start) => {
                self.bump();
                self.bump_while(is_ident_char);
                Ok(TokenKind::Placeholder)
            }
            c if c.is_control() => Err(SyntaxError::UnexpectedChar { found: c, at: start }),
            _ => {
                self.bump();
                Ok(match ch {
                    ',' => TokenKind::Comma,
                    '.' => TokenKind::Period,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    ';' => TokenKind::Semicolon,
                    '=' => TokenKind::Eq,
                    '<' => TokenKind::Lt,
                    '>' => TokenKind::Gt,
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Mult,
                    '/' => TokenKind::Div,
                    '%' => TokenKind::Mod,
                    // どれにも該当しない1文字を Other として扱う
                    _ => TokenKind::Other,
                })
            }
        }
    }

    /// 直前のトークンが値で終わっていなければ、`-`/`+` は数値の符号とみなす
    fn sign_allowed(&self) -> bool {
        !matches!(
            self.last_significant,
            Some(
                TokenKind::Ident
                    | TokenKind::Number
                    | TokenKind::StringLit
                    | TokenKind::Placeholder
                    | TokenKind::RParen
                    | TokenKind::Period
            )
        )
    }

    /// 引用符で囲まれた部分を読む。閉じ引用符の二重化はエスケープとみなす
    fn read_quoted(&mut self, open: char, close: char) -> Option<()> {
        debug_assert_eq!(self.peek(), Some(open));
        self.bump();
        loop {
            let ch = self.bump()?;
            if ch == close {
                if open != '[' && self.peek() == Some(close) {
                    self.bump();
                    continue;
                }
                return Some(());
            }
        }
    }

    fn read_number(&mut self) {
        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.bump();
                }
                self.bump_while(|c| c.is_ascii_digit());
            }
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
