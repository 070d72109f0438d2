//! ノードの書き換え
//!
//! `eval` がノードの種類ごとの整形関数へ振り分ける。どの整形関数も元のノードは
//! 変更せず、元のトークンとレイアウトノードを並べた新しいノードを返す。

use super::env::LayoutEnv;
use super::rules::{apply_rules, ITEM_RULES, MULTI_KEYWORD_RULES};
use crate::ast::{
    Aliased, IdentifierList, LayoutNode, ListKind, MemberIdentifier, Node, Parenthesis,
    TokenList,
};
use crate::lexer::Token;

/// ノードを整形したノードを返す
pub fn eval<'a>(node: &'a Node, env: &mut LayoutEnv<'a>) -> Node {
    match node {
        Node::Item(_) => apply_rules(ITEM_RULES, node, env),
        Node::MultiKeyword(_) => apply_rules(MULTI_KEYWORD_RULES, node, env),
        Node::Aliased(aliased) => format_aliased(aliased, env),
        Node::Identifier(_) => Node::ItemWith(vec![node.clone()]),
        Node::MemberIdentifier(member) => format_member_identifier(member, env),
        Node::Operator(op) => format_infix(&op.left, &op.operator, &op.right, env),
        Node::Comparison(cmp) => format_infix(&cmp.left, &cmp.comparison, &cmp.right, env),
        Node::Parenthesis(paren) => format_parenthesis(paren, env),
        Node::IdentifierList(list) => format_identifier_list(list, env),
        Node::List(list) if list.kind == ListKind::Statement => format_statement(list, env),
        Node::List(list) => Node::list(list.kind, rewrite_children(&list.children, env)),
        Node::ItemWith(_) | Node::Layout(_) => node.clone(),
    }
}

/// `real [AS] alias`
fn format_aliased<'a>(aliased: &'a Aliased, env: &mut LayoutEnv<'a>) -> Node {
    let mut parts = vec![eval(&aliased.real_name, env), Node::whitespace()];
    if let Some(as_keyword) = &aliased.as_keyword {
        parts.push(Node::Item(as_keyword.clone()));
        parts.push(Node::whitespace());
    }
    parts.push(eval(&aliased.alias, env));
    Node::ItemWith(parts)
}

fn format_member_identifier<'a>(member: &'a MemberIdentifier, env: &mut LayoutEnv<'a>) -> Node {
    Node::ItemWith(vec![
        eval(&member.parent, env),
        Node::Layout(LayoutNode::Period),
        eval(&member.child, env),
    ])
}

/// 算術演算と比較の共通形 `left symbol right`
fn format_infix<'a>(
    left: &'a Node,
    symbol: &Token,
    right: &'a Node,
    env: &mut LayoutEnv<'a>,
) -> Node {
    Node::ItemWith(vec![
        eval(left, env),
        Node::whitespace(),
        Node::Item(symbol.clone()),
        Node::whitespace(),
        eval(right, env),
    ])
}

/// `(` 改行 1段深いインデント 中身 改行 元の段数のインデント `)`
fn format_parenthesis<'a>(paren: &'a Parenthesis, env: &mut LayoutEnv<'a>) -> Node {
    let mut parts = vec![Node::Layout(LayoutNode::LParen)];
    env.nested(|env| {
        parts.extend(env.linebreak_with_indents());
        parts.push(eval(paren.inner(), env));
    });
    parts.extend(env.linebreak_with_indents());
    parts.push(Node::Layout(LayoutNode::RParen));
    Node::ItemWith(parts)
}

/// 要素を `,` 改行 インデント で区切る。空のリストは空の出力
fn format_identifier_list<'a>(list: &'a IdentifierList, env: &mut LayoutEnv<'a>) -> Node {
    let mut parts = Vec::with_capacity(list.identifiers().len() * 3);
    for (i, item) in list.identifiers().iter().enumerate() {
        if i > 0 {
            parts.push(Node::Layout(LayoutNode::Comma));
            parts.extend(env.linebreak_with_indents());
        }
        parts.push(eval(item, env));
    }
    Node::ItemWith(parts)
}

/// 文ごとに段数を0から始め、後ろに別の文が続くなら改行で区切る
fn format_statement<'a>(list: &'a TokenList, env: &mut LayoutEnv<'a>) -> Node {
    let followed = env.cursor().is_some_and(|c| c.peek_next().is_some());
    env.set_level(0);

    let mut children = rewrite_children(&list.children, env);
    if env.indent_level() != 0 {
        tracing::debug!(level = env.indent_level(), "statement ended at non-zero indent level");
    }
    if followed {
        children.push(Node::linebreak());
    }
    Node::list(ListKind::Statement, children)
}

/// 子を左から順に、同じ環境を通して書き換える。元の空白は捨てる
fn rewrite_children<'a>(children: &'a [Node], env: &mut LayoutEnv<'a>) -> Vec<Node> {
    let outer = env.enter(children);
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    let mut prev_is_comment = false;

    while let Some(child) = env.next_sibling() {
        let formatted = eval(child, env);
        let is_comment = child.token_kind().is_some_and(|k| k.is_comment());

        let boundary = (
            out.iter().rev().find_map(Node::last_char),
            formatted.first_char(),
        );
        if let (Some(prev), Some(next)) = boundary {
            let touching = !prev.is_whitespace() && !next.is_whitespace();
            if touching && (would_fuse(prev, next) || is_comment || prev_is_comment) {
                out.push(Node::whitespace());
            }
        }

        out.push(formatted);
        prev_is_comment = is_comment;
    }

    env.leave(outer);
    out
}

/// 隣接させると再字句解析で別のトークンになってしまう組か
fn would_fuse(prev: char, next: char) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || "_$\"'`[].?@#".contains(c);
    let is_symbol = |c: char| "+-*/%<>=!|&^~:".contains(c);

    (is_word(prev) && is_word(next))
        || (is_symbol(prev) && is_symbol(next))
        // `:name` / `@name` がプレースホルダーになる
        || (matches!(prev, ':' | '@') && is_word(next))
        // `- 1` が符号付き数値になる
        || (matches!(prev, '+' | '-') && next.is_ascii_digit())
}
