//! SQLのグルーピングパーサー
//!
//! 完全な構文解析はせず、トークン列を整形に必要な粒度の木にまとめる。
//! 空白とコメントは木に残し、元テキストのトークンが失われないようにする。
//!
//! 手順:
//! 1. `;` の直後で文を区切る（`;` は手前の文に含める）
//! 2. 括弧を再帰的にまとめる
//! 3. 各階層のノード列に対して、複数語キーワード → メンバー識別子 → 算術演算 →
//!    比較 → エイリアス → 識別子リストの順にまとめる

use crate::ast::{
    Aliased, Comparison, IdentifierList, ListKind, MemberIdentifier, MultiKeyword, Node,
    Operator, Parenthesis,
};
use crate::error::SyntaxError;
use crate::lexer::{Lexer, Token, TokenKind};

/// 1つのノードにまとめる複数語キーワード（長いものを先に試す）
///
/// 結合句は整形規則のある句だけ。`FULL JOIN` などは単独の `JOIN` として扱う
const MULTI_KEYWORDS: &[&[&str]] = &[
    &["LEFT", "OUTER", "JOIN"],
    &["RIGHT", "OUTER", "JOIN"],
    &["INNER", "JOIN"],
    &["CROSS", "JOIN"],
    &["OUTER", "JOIN"],
    &["LEFT", "JOIN"],
    &["RIGHT", "JOIN"],
    &["ORDER", "BY"],
    &["GROUP", "BY"],
];

/// テキストをパースしてルート（`ListKind::Query`）を返す
pub fn parse(text: &str) -> Result<Node, SyntaxError> {
    Parser::new(text)?.parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, SyntaxError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Parser { tokens, pos: 0 })
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// 文の並びをパースする
    pub fn parse(&mut self) -> Result<Node, SyntaxError> {
        let mut statements = Vec::new();
        while self.current().is_some() {
            statements.push(self.parse_statement()?);
        }
        Ok(Node::list(ListKind::Query, statements))
    }

    /// `;` まで（`;` を含む）、または入力終端までを1文としてパースする
    fn parse_statement(&mut self) -> Result<Node, SyntaxError> {
        let mut flat = Vec::new();
        while let Some(token) = self.advance() {
            let is_end = token.kind == TokenKind::Semicolon;
            flat.push(token);
            if is_end {
                break;
            }
        }
        Ok(Node::list(ListKind::Statement, group_parens(flat)?))
    }
}

/// 括弧を再帰的にまとめ、各階層にグルーピングを適用する
fn group_parens(tokens: Vec<Token>) -> Result<Vec<Node>, SyntaxError> {
    // 開き括弧ごとに (開き括弧, 外側の階層のノード列) を積む
    let mut stack: Vec<(Token, Vec<Node>)> = Vec::new();
    let mut current: Vec<Node> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::LParen => {
                stack.push((token, std::mem::take(&mut current)));
            }
            TokenKind::RParen => {
                let Some((open, outer)) = stack.pop() else {
                    return Err(SyntaxError::UnmatchedCloseParen { at: token.start });
                };
                let inner = std::mem::replace(&mut current, outer);
                current.push(Node::Parenthesis(Parenthesis {
                    open,
                    inner: Box::new(Node::list(ListKind::Group, group(inner))),
                    close: token,
                }));
            }
            TokenKind::Ident => current.push(Node::Identifier(token)),
            _ => current.push(Node::Item(token)),
        }
    }

    if let Some((open, _)) = stack.pop() {
        return Err(SyntaxError::UnclosedParen { at: open.start });
    }
    Ok(group(current))
}

/// 1階層分のノード列にグルーピングを順に適用する
fn group(nodes: Vec<Node>) -> Vec<Node> {
    let nodes = group_multi_keywords(nodes);
    let nodes = reduce(nodes, 3, member);
    let nodes = reduce(nodes, 3, operator);
    let nodes = reduce(nodes, 3, comparison);
    let nodes = reduce(nodes, 3, alias_with_as);
    let nodes = reduce(nodes, 2, bare_alias);
    reduce(nodes, 3, identifier_list)
}

// ========================================
// 複数語キーワード
// ========================================

fn group_multi_keywords(nodes: Vec<Node>) -> Vec<Node> {
    let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(slots.len());
    let mut i = 0;

    while i < slots.len() {
        if let Some(indices) = match_multi_keyword(&slots, i) {
            let words = indices
                .iter()
                .filter_map(|&j| match slots[j].take() {
                    Some(Node::Item(token)) => Some(token),
                    _ => None,
                })
                .collect();
            out.push(Node::MultiKeyword(MultiKeyword { words }));
            // 語の間の空白は捨てる
            i = indices.last().map_or(i, |&last| last) + 1;
            continue;
        }
        if let Some(node) = slots[i].take() {
            out.push(node);
        }
        i += 1;
    }
    out
}

/// `start` から始まる複数語キーワードを探し、構成する語の位置を返す
fn match_multi_keyword(slots: &[Option<Node>], start: usize) -> Option<Vec<usize>> {
    let keyword_at = |i: usize| -> Option<String> {
        match slots.get(i)? {
            Some(Node::Item(token)) => token.keyword(),
            _ => None,
        }
    };
    keyword_at(start)?;

    'phrases: for phrase in MULTI_KEYWORDS {
        let mut indices = Vec::with_capacity(phrase.len());
        let mut i = start;
        for (n, word) in phrase.iter().enumerate() {
            if n > 0 {
                i += 1;
                while matches!(slots.get(i), Some(Some(node)) if node.is_whitespace()) {
                    i += 1;
                }
            }
            if keyword_at(i).as_deref() != Some(*word) {
                continue 'phrases;
            }
            indices.push(i);
        }
        return Some(indices);
    }
    None
}

// ========================================
// シフト還元によるまとめ上げ
// ========================================

/// 還元規則。空白を除いた末尾 `arity` 個のノードを受け取り、
/// まとめられれば1ノードを、まとめられなければ受け取ったノードをそのまま返す
type Rule = fn(Vec<Node>) -> Result<Node, Vec<Node>>;

/// ノードを1つずつ積み、空白以外を積むたびに末尾へ規則を試す（左結合になる）
fn reduce(nodes: Vec<Node>, arity: usize, rule: Rule) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let significant = !node.is_whitespace();
        out.push(node);
        if significant {
            try_reduce(&mut out, arity, rule);
        }
    }
    out
}

fn try_reduce(out: &mut Vec<Node>, arity: usize, rule: Rule) {
    let mut first = out.len();
    for _ in 0..arity {
        match (0..first).rev().find(|&i| !out[i].is_whitespace()) {
            Some(i) => first = i,
            None => return,
        }
    }

    let tail = out.split_off(first);
    // 還元に失敗したら空白込みで元の並びに戻すため、配置を覚えておく
    let layout: Vec<bool> = tail.iter().map(Node::is_whitespace).collect();
    let (gaps, operands): (Vec<Node>, Vec<Node>) =
        tail.into_iter().partition(Node::is_whitespace);

    match rule(operands) {
        Ok(node) => out.push(node),
        Err(operands) => {
            let mut operands = operands.into_iter();
            let mut gaps = gaps.into_iter();
            for is_gap in layout {
                let node = if is_gap { gaps.next() } else { operands.next() };
                out.extend(node);
            }
        }
    }
}

// ========================================
// 還元規則
// ========================================

fn is_keyword(node: &Node, words: &[&str]) -> bool {
    matches!(node, Node::Item(t) if t.keyword().is_some_and(|k| words.contains(&k.as_str())))
}

/// 算術・比較の被演算子になれるノード
fn is_operand(node: &Node) -> bool {
    match node {
        Node::Identifier(_)
        | Node::MemberIdentifier(_)
        | Node::Operator(_)
        | Node::Parenthesis(_) => true,
        Node::Item(t) => {
            matches!(
                t.kind,
                TokenKind::Number | TokenKind::StringLit | TokenKind::Placeholder
            ) || is_keyword(node, &["NULL", "TRUE", "FALSE"])
        }
        _ => false,
    }
}

/// エイリアスを付けられるノード
fn is_aliasable(node: &Node) -> bool {
    is_operand(node) && !is_keyword(node, &["NULL", "TRUE", "FALSE"])
}

/// 識別子リストの要素になれるノード
fn is_list_element(node: &Node) -> bool {
    is_operand(node)
        || matches!(node, Node::Aliased(_) | Node::Comparison(_))
        || node.token_kind() == Some(TokenKind::Mult)
}

/// `parent . child`
fn member(nodes: Vec<Node>) -> Result<Node, Vec<Node>> {
    let [parent, period, child] = <[Node; 3]>::try_from(nodes)?;
    match (parent, period, child) {
        (
            parent @ (Node::Identifier(_) | Node::MemberIdentifier(_)),
            Node::Item(period),
            child,
        ) if period.kind == TokenKind::Period && is_member_child(&child, &period) => {
            let child = match child {
                Node::Item(t) if t.kind == TokenKind::Keyword => Node::Identifier(t),
                other => other,
            };
            Ok(Node::MemberIdentifier(MemberIdentifier {
                parent: Box::new(parent),
                period,
                child: Box::new(child),
            }))
        }
        (a, b, c) => Err(vec![a, b, c]),
    }
}

fn is_member_child(child: &Node, period: &Token) -> bool {
    match child {
        Node::Identifier(_) => true,
        Node::Item(t) => match t.kind {
            TokenKind::Mult => true,
            // `t.key` のように、ピリオド直後のキーワードは識別子とみなす
            TokenKind::Keyword => t.start == period.end,
            _ => false,
        },
        _ => false,
    }
}

/// `left (+|-|*|/|%||) right`
fn operator(nodes: Vec<Node>) -> Result<Node, Vec<Node>> {
    let [left, symbol, right] = <[Node; 3]>::try_from(nodes)?;
    match (left, symbol, right) {
        (left, Node::Item(operator), right)
            if operator.kind.is_arithmetic() && is_operand(&left) && is_operand(&right) =>
        {
            Ok(Node::Operator(Operator {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }))
        }
        (a, b, c) => Err(vec![a, b, c]),
    }
}

/// `left (=|<>|<|>|<=|>=) right`
fn comparison(nodes: Vec<Node>) -> Result<Node, Vec<Node>> {
    let [left, symbol, right] = <[Node; 3]>::try_from(nodes)?;
    match (left, symbol, right) {
        (left, Node::Item(comparison), right)
            if comparison.kind.is_comparison() && is_operand(&left) && is_operand(&right) =>
        {
            Ok(Node::Comparison(Comparison {
                left: Box::new(left),
                comparison,
                right: Box::new(right),
            }))
        }
        (a, b, c) => Err(vec![a, b, c]),
    }
}

/// `real AS alias`
fn alias_with_as(nodes: Vec<Node>) -> Result<Node, Vec<Node>> {
    let [real, as_keyword, alias] = <[Node; 3]>::try_from(nodes)?;
    match (real, as_keyword, alias) {
        (real, Node::Item(as_keyword), alias @ Node::Identifier(_))
            if is_aliasable(&real) && as_keyword.keyword().as_deref() == Some("AS") =>
        {
            Ok(Node::Aliased(Aliased {
                real_name: Box::new(real),
                as_keyword: Some(as_keyword),
                alias: Box::new(alias),
            }))
        }
        (a, b, c) => Err(vec![a, b, c]),
    }
}

/// `real alias`
fn bare_alias(nodes: Vec<Node>) -> Result<Node, Vec<Node>> {
    let [real, alias] = <[Node; 2]>::try_from(nodes)?;
    match (real, alias) {
        (real, alias @ Node::Identifier(_)) if is_aliasable(&real) => {
            Ok(Node::Aliased(Aliased {
                real_name: Box::new(real),
                as_keyword: None,
                alias: Box::new(alias),
            }))
        }
        (a, b) => Err(vec![a, b]),
    }
}

/// `a, b, c`（要素2つ以上）
fn identifier_list(nodes: Vec<Node>) -> Result<Node, Vec<Node>> {
    let [head, comma, element] = <[Node; 3]>::try_from(nodes)?;
    match (head, comma, element) {
        (Node::IdentifierList(mut list), Node::Item(comma), element)
            if comma.kind == TokenKind::Comma && is_list_element(&element) =>
        {
            list.items.push(element);
            list.commas.push(comma);
            Ok(Node::IdentifierList(list))
        }
        (head, Node::Item(comma), element)
            if comma.kind == TokenKind::Comma
                && is_list_element(&head)
                && is_list_element(&element) =>
        {
            Ok(Node::IdentifierList(IdentifierList {
                items: vec![head, element],
                commas: vec![comma],
            }))
        }
        (a, b, c) => Err(vec![a, b, c]),
    }
}
