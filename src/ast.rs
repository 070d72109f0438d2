//! パース済みSQLのノードモデル
//!
//! パーサーが生成する構造ノードと、フォーマッタが挿入する合成レイアウトノード
//! （空白・改行・インデント・句読点）を1つの列挙型で表す。

use crate::lexer::{Token, TokenKind};
use crate::protocol::Position;
use std::fmt;

/// インデント1単位の既定値（スペース2つ）
pub const DEFAULT_INDENT_UNIT: &str = "  ";

/// SQL木のノード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// 単一トークン（キーワード・リテラル・記号・空白・コメント）
    Item(Token),
    /// `LEFT OUTER JOIN` などの複数語キーワード
    MultiKeyword(MultiKeyword),
    Aliased(Aliased),
    Identifier(Token),
    MemberIdentifier(MemberIdentifier),
    Operator(Operator),
    Comparison(Comparison),
    Parenthesis(Parenthesis),
    IdentifierList(IdentifierList),
    /// 順序付きの子を持つ汎用コンポジット
    List(TokenList),
    /// フォーマッタの出力コンポジット
    ItemWith(Vec<Node>),
    /// フォーマッタが生成する合成ノード
    Layout(LayoutNode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiKeyword {
    pub words: Vec<Token>,
}

impl MultiKeyword {
    /// 大文字化し、空白1つで連結した綴り（例: `LEFT OUTER JOIN`）
    pub fn phrase(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aliased {
    pub real_name: Box<Node>,
    /// 明示的な `AS` キーワード
    pub as_keyword: Option<Token>,
    pub alias: Box<Node>,
}

impl Aliased {
    pub fn is_as(&self) -> bool {
        self.as_keyword.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberIdentifier {
    pub parent: Box<Node>,
    pub period: Token,
    pub child: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub left: Box<Node>,
    pub operator: Token,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub left: Box<Node>,
    pub comparison: Token,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parenthesis {
    pub open: Token,
    /// 常に `Node::List`（`ListKind::Group`）
    pub inner: Box<Node>,
    pub close: Token,
}

impl Parenthesis {
    pub fn inner(&self) -> &Node {
        &self.inner
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierList {
    pub items: Vec<Node>,
    pub commas: Vec<Token>,
}

impl IdentifierList {
    pub fn identifiers(&self) -> &[Node] {
        &self.items
    }
}

/// 汎用コンポジットの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// ルート（文の並び）
    Query,
    /// `;` で区切られた1文
    Statement,
    /// 括弧の中身など
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList {
    pub kind: ListKind,
    pub children: Vec<Node>,
}

impl TokenList {
    pub fn new(kind: ListKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }
}

/// フォーマッタが挿入する合成ノード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutNode {
    Whitespace,
    Linebreak,
    Indent,
    Comma,
    Period,
    LParen,
    RParen,
}

impl LayoutNode {
    pub fn text<'a>(&self, indent_unit: &'a str) -> &'a str {
        match self {
            LayoutNode::Whitespace => " ",
            LayoutNode::Linebreak => "\n",
            LayoutNode::Indent => indent_unit,
            LayoutNode::Comma => ",",
            LayoutNode::Period => ".",
            LayoutNode::LParen => "(",
            LayoutNode::RParen => ")",
        }
    }
}

impl Node {
    pub fn whitespace() -> Node {
        Node::Layout(LayoutNode::Whitespace)
    }

    pub fn linebreak() -> Node {
        Node::Layout(LayoutNode::Linebreak)
    }

    pub fn indent() -> Node {
        Node::Layout(LayoutNode::Indent)
    }

    pub fn list(kind: ListKind, children: Vec<Node>) -> Node {
        Node::List(TokenList::new(kind, children))
    }

    /// 単一トークンのノードならそのトークン
    pub fn token(&self) -> Option<&Token> {
        match self {
            Node::Item(token) | Node::Identifier(token) => Some(token),
            _ => None,
        }
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        self.token().map(|t| t.kind)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Item(t) if t.is_whitespace())
    }

    /// 順序付きの子を持つコンポジットならその中身
    pub fn as_list(&self) -> Option<&TokenList> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    /// ノードが覆う元テキストの範囲（合成ノードは `None`）
    pub fn span(&self) -> Option<(Position, Position)> {
        match self {
            Node::Item(t) | Node::Identifier(t) => Some((t.start, t.end)),
            Node::MultiKeyword(m) => Some((m.words.first()?.start, m.words.last()?.end)),
            Node::Aliased(a) => join_spans(a.real_name.span(), a.alias.span()),
            Node::MemberIdentifier(m) => join_spans(m.parent.span(), m.child.span()),
            Node::Operator(o) => join_spans(o.left.span(), o.right.span()),
            Node::Comparison(c) => join_spans(c.left.span(), c.right.span()),
            Node::Parenthesis(p) => Some((p.open.start, p.close.end)),
            Node::IdentifierList(l) => join_spans(
                l.items.iter().find_map(Node::span),
                l.items.iter().rev().find_map(Node::span),
            ),
            Node::List(TokenList { children, .. }) | Node::ItemWith(children) => join_spans(
                children.iter().find_map(Node::span),
                children.iter().rev().find_map(Node::span),
            ),
            Node::Layout(_) => None,
        }
    }

    /// レンダリング結果の先頭文字
    pub fn first_char(&self) -> Option<char> {
        match self {
            Node::Item(t) | Node::Identifier(t) => t.text.chars().next(),
            Node::MultiKeyword(m) => m.words.first()?.text.chars().next(),
            Node::Aliased(a) => a.real_name.first_char(),
            Node::MemberIdentifier(m) => m.parent.first_char(),
            Node::Operator(o) => o.left.first_char(),
            Node::Comparison(c) => c.left.first_char(),
            Node::Parenthesis(_) => Some('('),
            Node::IdentifierList(l) => l.items.iter().find_map(Node::first_char),
            Node::List(TokenList { children, .. }) | Node::ItemWith(children) => {
                children.iter().find_map(Node::first_char)
            }
            Node::Layout(l) => l.text(DEFAULT_INDENT_UNIT).chars().next(),
        }
    }

    /// レンダリング結果の末尾文字
    pub fn last_char(&self) -> Option<char> {
        match self {
            Node::Item(t) | Node::Identifier(t) => t.text.chars().next_back(),
            Node::MultiKeyword(m) => m.words.last()?.text.chars().next_back(),
            Node::Aliased(a) => a.alias.last_char(),
            Node::MemberIdentifier(m) => m.child.last_char(),
            Node::Operator(o) => o.right.last_char(),
            Node::Comparison(c) => c.right.last_char(),
            Node::Parenthesis(_) => Some(')'),
            Node::IdentifierList(l) => l.items.iter().rev().find_map(Node::last_char),
            Node::List(TokenList { children, .. }) | Node::ItemWith(children) => {
                children.iter().rev().find_map(Node::last_char)
            }
            Node::Layout(l) => l.text(DEFAULT_INDENT_UNIT).chars().next_back(),
        }
    }

    /// 指定したインデント単位で文字列化する
    pub fn render(&self, indent_unit: &str) -> String {
        let mut out = String::new();
        self.render_into(&mut out, indent_unit);
        out
    }

    pub fn render_into(&self, out: &mut String, indent_unit: &str) {
        match self {
            Node::Item(t) | Node::Identifier(t) => out.push_str(&t.text),
            Node::MultiKeyword(m) => {
                for (i, word) in m.words.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&word.text);
                }
            }
            Node::Aliased(a) => {
                a.real_name.render_into(out, indent_unit);
                out.push(' ');
                if let Some(as_keyword) = &a.as_keyword {
                    out.push_str(&as_keyword.text);
                    out.push(' ');
                }
                a.alias.render_into(out, indent_unit);
            }
            Node::MemberIdentifier(m) => {
                m.parent.render_into(out, indent_unit);
                out.push_str(&m.period.text);
                m.child.render_into(out, indent_unit);
            }
            Node::Operator(Operator {
                left,
                operator: symbol,
                right,
            })
            | Node::Comparison(Comparison {
                left,
                comparison: symbol,
                right,
            }) => {
                left.render_into(out, indent_unit);
                out.push(' ');
                out.push_str(&symbol.text);
                out.push(' ');
                right.render_into(out, indent_unit);
            }
            Node::Parenthesis(p) => {
                out.push_str(&p.open.text);
                p.inner.render_into(out, indent_unit);
                out.push_str(&p.close.text);
            }
            Node::IdentifierList(l) => {
                for (i, item) in l.items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.render_into(out, indent_unit);
                }
            }
            Node::List(TokenList { children, .. }) | Node::ItemWith(children) => {
                for child in children {
                    child.render_into(out, indent_unit);
                }
            }
            Node::Layout(l) => out.push_str(l.text(indent_unit)),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_INDENT_UNIT))
    }
}

fn join_spans(
    first: Option<(Position, Position)>,
    last: Option<(Position, Position)>,
) -> Option<(Position, Position)> {
    Some((first?.0, last?.1))
}
