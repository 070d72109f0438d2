//! ノードの照合とカーソル
//!
//! - `NodeMatcher`: キーワード（大文字小文字を区別しない）またはトークン種別でノードを判定する
//! - `NodeCursor`: 兄弟ノード列の上を進むカーソル。レイアウト規則が前後の兄弟を参照するために使う

use crate::ast::Node;
use crate::lexer::TokenKind;

/// ノードの判定条件。どれか1つに当てはまれば一致
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeMatcher {
    /// 大文字で書く（複数語は空白1つ区切り）
    pub expect_keywords: &'static [&'static str],
    pub expect_tokens: &'static [TokenKind],
}

impl NodeMatcher {
    pub const fn keywords(expect_keywords: &'static [&'static str]) -> Self {
        Self {
            expect_keywords,
            expect_tokens: &[],
        }
    }

    pub const fn tokens(expect_tokens: &'static [TokenKind]) -> Self {
        Self {
            expect_keywords: &[],
            expect_tokens,
        }
    }

    pub const fn with_tokens(mut self, expect_tokens: &'static [TokenKind]) -> Self {
        self.expect_tokens = expect_tokens;
        self
    }

    pub fn is_match(&self, node: &Node) -> bool {
        match node {
            Node::Item(token) => {
                if self.expect_tokens.contains(&token.kind) {
                    return true;
                }
                token
                    .keyword()
                    .is_some_and(|kw| self.expect_keywords.contains(&kw.as_str()))
            }
            Node::MultiKeyword(mk) => {
                let phrase = mk.phrase();
                self.expect_keywords.contains(&phrase.as_str())
            }
            _ => false,
        }
    }
}

/// 兄弟ノード列の上のカーソル
///
/// `next` で進み、`current` は最後に進んだ位置を指す。
#[derive(Debug, Clone)]
pub struct NodeCursor<'a> {
    nodes: &'a [Node],
    /// 次に `next` で返す位置
    pos: usize,
    current: Option<usize>,
}

impl<'a> NodeCursor<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            nodes,
            pos: 0,
            current: None,
        }
    }

    /// 次のノードへ進む。`ignore_whitespace` なら空白トークンを読み飛ばす
    pub fn next(&mut self, ignore_whitespace: bool) -> Option<&'a Node> {
        while let Some(node) = self.nodes.get(self.pos) {
            let at = self.pos;
            self.pos += 1;
            if ignore_whitespace && node.is_whitespace() {
                continue;
            }
            self.current = Some(at);
            return Some(node);
        }
        self.current = None;
        None
    }

    pub fn current(&self) -> Option<&'a Node> {
        self.current.and_then(|i| self.nodes.get(i))
    }

    /// 現在位置より後ろで最初の、空白でない兄弟
    pub fn peek_next(&self) -> Option<&'a Node> {
        let from = self.current.map_or(self.pos, |i| i + 1);
        self.nodes[from.min(self.nodes.len())..]
            .iter()
            .find(|n| !n.is_whitespace())
    }

    /// 現在位置より前で最も近い、空白でない兄弟
    pub fn peek_prev(&self) -> Option<&'a Node> {
        let until = self.current?;
        self.nodes[..until].iter().rev().find(|n| !n.is_whitespace())
    }

    pub fn peek_next_is(&self, matcher: &NodeMatcher) -> bool {
        self.peek_next().is_some_and(|n| matcher.is_match(n))
    }

    pub fn peek_prev_is(&self, matcher: &NodeMatcher) -> bool {
        self.peek_prev().is_some_and(|n| matcher.is_match(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ListKind, MultiKeyword};
    use crate::lexer::{tokenize, Token};

    fn items(src: &str) -> Vec<Node> {
        tokenize(src).unwrap().into_iter().map(Node::Item).collect()
    }

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Default::default(), Default::default())
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let matcher = NodeMatcher::keywords(&["FROM", "WHERE"]);
        let nodes = items("from x Where");
        assert!(matcher.is_match(&nodes[0]));
        assert!(!matcher.is_match(&nodes[2]));
        assert!(matcher.is_match(&nodes[4]));
    }

    #[test]
    fn token_kinds_match_regardless_of_text() {
        let matcher = NodeMatcher::tokens(&[TokenKind::Comma, TokenKind::LParen]);
        assert!(matcher.is_match(&Node::Item(token(TokenKind::Comma, ","))));
        assert!(!matcher.is_match(&Node::Item(token(TokenKind::RParen, ")"))));
        let combined = NodeMatcher::keywords(&["SELECT"]).with_tokens(&[TokenKind::LParen]);
        assert!(combined.is_match(&Node::Item(token(TokenKind::LParen, "("))));
    }

    #[test]
    fn multi_keyword_matches_its_phrase() {
        let node = Node::MultiKeyword(MultiKeyword {
            words: vec![
                token(TokenKind::Keyword, "Left"),
                token(TokenKind::Keyword, "join"),
            ],
        });
        assert!(NodeMatcher::keywords(&["LEFT JOIN"]).is_match(&node));
        assert!(!NodeMatcher::keywords(&["JOIN"]).is_match(&node));
    }

    #[test]
    fn identifiers_and_composites_never_match() {
        let matcher = NodeMatcher::keywords(&["T"]).with_tokens(&[TokenKind::Ident]);
        assert!(!matcher.is_match(&Node::Identifier(token(TokenKind::Ident, "t"))));
        assert!(!matcher.is_match(&Node::list(ListKind::Group, Vec::new())));
    }

    #[test]
    fn cursor_skips_whitespace_and_peeks() {
        let nodes = items("a , b");
        let mut cursor = NodeCursor::new(&nodes);
        assert_eq!(cursor.next(true).unwrap().to_string(), "a");
        assert!(cursor.peek_next_is(&NodeMatcher::tokens(&[TokenKind::Comma])));
        assert!(cursor.peek_prev().is_none());

        assert_eq!(cursor.next(false).unwrap().to_string(), " ");
        assert_eq!(cursor.next(true).unwrap().to_string(), ",");
        assert_eq!(cursor.peek_prev().unwrap().to_string(), "a");
        assert_eq!(cursor.next(true).unwrap().to_string(), "b");
        assert!(cursor.peek_next().is_none());
        assert!(cursor.next(true).is_none());
        assert!(cursor.current().is_none());
    }
}
