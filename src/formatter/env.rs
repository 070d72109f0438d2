//! レイアウト環境
//!
//! 1回の整形呼び出しが専有する可変状態。インデント段数と、いま走査している
//! 兄弟ノード列のカーソルを持つ。兄弟間で同じ環境を使い回すので、ある子が
//! 変えた段数は次の兄弟から見える。

use crate::ast::Node;
use crate::matcher::NodeCursor;

#[derive(Debug, Default)]
pub struct LayoutEnv<'a> {
    /// 負にもなりうる（描画時に0へ切り詰める）
    indent_level: i32,
    /// これまでに到達した最小の段数（ずれの報告用）
    lowest_level: i32,
    cursor: Option<NodeCursor<'a>>,
}

impl<'a> LayoutEnv<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent_level(&self) -> i32 {
        self.indent_level
    }

    pub fn lowest_level(&self) -> i32 {
        self.lowest_level
    }

    pub fn shift(&mut self, delta: i32) {
        self.set_level(self.indent_level + delta);
    }

    pub fn set_level(&mut self, level: i32) {
        if level < 0 && level < self.lowest_level {
            tracing::debug!(level, "indent level went negative");
        }
        self.indent_level = level;
        self.lowest_level = self.lowest_level.min(level);
    }

    /// 現在の段数ぶんのインデントマーカー
    pub fn indents(&self) -> impl Iterator<Item = Node> {
        std::iter::repeat(Node::indent()).take(self.indent_level.max(0) as usize)
    }

    /// 改行と現在の段数ぶんのインデント
    pub fn linebreak_with_indents(&self) -> impl Iterator<Item = Node> {
        std::iter::once(Node::linebreak()).chain(self.indents())
    }

    /// 1段深くして `f` を実行し、終わったら段数を実行前の値へ戻す。
    /// 内側で何段動いても外側へは漏れない
    pub fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let snapshot = self.indent_level;
        self.shift(1);
        let result = f(self);
        self.indent_level = snapshot;
        result
    }

    /// `children` の走査を始める。戻り値は `leave` に渡す
    pub fn enter(&mut self, children: &'a [Node]) -> Option<NodeCursor<'a>> {
        self.cursor.replace(NodeCursor::new(children))
    }

    /// 走査を終え、外側のカーソルに戻す
    pub fn leave(&mut self, outer: Option<NodeCursor<'a>>) {
        self.cursor = outer;
    }

    /// 空白を読み飛ばして次の兄弟へ進む
    pub fn next_sibling(&mut self) -> Option<&'a Node> {
        self.cursor.as_mut()?.next(true)
    }

    pub fn cursor(&self) -> Option<&NodeCursor<'a>> {
        self.cursor.as_ref()
    }
}
