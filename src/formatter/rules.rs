//! レイアウト規則表
//!
//! 規則は (判定条件, 動作) の組のデータとして持つ。単一トークン（`Item`）と
//! 複数語キーワード（`MultiKeyword`）それぞれに表があり、当てはまる規則は
//! 表の順にすべて適用される。
//!
//! 1つの規則の適用手順:
//! 1. `indent_before` だけ段数を動かす
//! 2. 前に `[空白]`、`[改行 + 新しい段数のインデント]` を付ける
//! 3. 後ろに `[空白]` を付け、`linebreak_after` なら改行し、
//!    `indent_after` だけ段数を動かしてからインデントを付ける
//!
//! 前に付けるものは既存の先頭へ差し込むので、後の規則ほど外側に来る。

use super::env::LayoutEnv;
use crate::ast::Node;
use crate::lexer::TokenKind;
use crate::matcher::NodeMatcher;
use smallvec::SmallVec;

/// 規則1つ分の動作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutAction {
    pub whitespace_before: bool,
    pub linebreak_before: bool,
    /// 前置の改行より先に動かす段数
    pub indent_before: i32,
    pub whitespace_after: bool,
    pub linebreak_after: bool,
    /// 後置の改行の後に動かす段数
    pub indent_after: i32,
}

impl LayoutAction {
    pub const NONE: LayoutAction = LayoutAction {
        whitespace_before: false,
        linebreak_before: false,
        indent_before: 0,
        whitespace_after: false,
        linebreak_after: false,
        indent_after: 0,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutRule {
    pub name: &'static str,
    pub matcher: NodeMatcher,
    pub action: LayoutAction,
}

/// 単一トークンの規則
pub static ITEM_RULES: &[LayoutRule] = &[
    LayoutRule {
        name: "whitespace-after",
        matcher: NodeMatcher::keywords(&["JOIN", "ON", "AND", "OR", "LIMIT"]),
        action: LayoutAction {
            whitespace_after: true,
            ..LayoutAction::NONE
        },
    },
    LayoutRule {
        name: "whitespace-around",
        matcher: NodeMatcher::keywords(&["BETWEEN", "USING"]),
        action: LayoutAction {
            whitespace_before: true,
            whitespace_after: true,
            ..LayoutAction::NONE
        },
    },
    LayoutRule {
        name: "outdent-before",
        matcher: NodeMatcher::keywords(&[
            "FROM", "JOIN", "WHERE", "HAVING", "LIMIT", "UNION", "VALUES", "SET", "EXCEPT",
        ]),
        action: LayoutAction {
            linebreak_before: true,
            indent_before: -1,
            ..LayoutAction::NONE
        },
    },
    LayoutRule {
        name: "indent-before",
        matcher: NodeMatcher::keywords(&["ON"]),
        action: LayoutAction {
            linebreak_before: true,
            indent_before: 1,
            ..LayoutAction::NONE
        },
    },
    LayoutRule {
        name: "linebreak-before",
        matcher: NodeMatcher::keywords(&["AND", "OR"]),
        action: LayoutAction {
            linebreak_before: true,
            ..LayoutAction::NONE
        },
    },
    LayoutRule {
        name: "indent-after",
        matcher: NodeMatcher::keywords(&["SELECT", "FROM", "WHERE"])
            .with_tokens(&[TokenKind::LParen]),
        action: LayoutAction {
            linebreak_after: true,
            indent_after: 1,
            ..LayoutAction::NONE
        },
    },
    LayoutRule {
        name: "linebreak-after",
        matcher: NodeMatcher::tokens(&[TokenKind::Comma]),
        action: LayoutAction {
            linebreak_after: true,
            ..LayoutAction::NONE
        },
    },
    // 行コメントの後ろに続くトークンがコメントに飲み込まれないようにする
    LayoutRule {
        name: "linebreak-after-line-comment",
        matcher: NodeMatcher::tokens(&[TokenKind::LineComment]),
        action: LayoutAction {
            linebreak_after: true,
            ..LayoutAction::NONE
        },
    },
];

/// 複数語キーワード（結合句）の規則
pub static MULTI_KEYWORD_RULES: &[LayoutRule] = &[
    LayoutRule {
        name: "join-whitespace-after",
        matcher: NodeMatcher::keywords(JOIN_PHRASES),
        action: LayoutAction {
            whitespace_after: true,
            ..LayoutAction::NONE
        },
    },
    LayoutRule {
        name: "join-outdent-before",
        matcher: NodeMatcher::keywords(JOIN_PHRASES),
        action: LayoutAction {
            linebreak_before: true,
            indent_before: -1,
            ..LayoutAction::NONE
        },
    },
];

const JOIN_PHRASES: &[&str] = &[
    "INNER JOIN",
    "CROSS JOIN",
    "OUTER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "LEFT OUTER JOIN",
    "RIGHT OUTER JOIN",
];

/// 当てはまる規則をすべて適用し、`node` を前後のレイアウトノードで包む
pub fn apply_rules(rules: &[LayoutRule], node: &Node, env: &mut LayoutEnv<'_>) -> Node {
    let mut before: SmallVec<[Node; 4]> = SmallVec::new();
    let mut after: SmallVec<[Node; 4]> = SmallVec::new();

    for rule in rules.iter().filter(|r| r.matcher.is_match(node)) {
        let action = &rule.action;
        tracing::trace!(
            rule = rule.name,
            node = %node,
            level = env.indent_level(),
            "layout rule"
        );

        if action.indent_before != 0 {
            env.shift(action.indent_before);
        }
        let mut prefix: SmallVec<[Node; 4]> = SmallVec::new();
        if action.whitespace_before {
            prefix.push(Node::whitespace());
        }
        if action.linebreak_before {
            prefix.extend(env.linebreak_with_indents());
        }
        before.insert_many(0, prefix);

        if action.whitespace_after {
            after.push(Node::whitespace());
        }
        if action.linebreak_after {
            after.push(Node::linebreak());
            if action.indent_after != 0 {
                env.shift(action.indent_after);
            }
            after.extend(env.indents());
        }
    }

    let mut parts = Vec::with_capacity(before.len() + 1 + after.len());
    parts.extend(before);
    parts.push(node.clone());
    parts.extend(after);
    Node::ItemWith(parts)
}
