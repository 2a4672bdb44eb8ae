//! Comment attachment.
//!
//! Comments are kept out of the tree. After a parse, every comment is
//! located against the node extents: it trails the nearest node ending
//! before it and leads the nearest node starting after it, both taken among
//! the children of the smallest node that encloses it. A comment with
//! neither neighbour is an inner comment of that enclosing node. The result
//! is a side table of [`NodeComments`] keyed by node extent.

use esparse_ast::{AstVisitor, Comment, Expression, NodeComments, Program};
use esparse_core::collections::FxMap;
use esparse_core::text::Span;

/// One node extent in the extent tree.
#[derive(Debug)]
struct Extent {
    start: u32,
    end: u32,
    children: Vec<usize>,
}

/// Builds the extent tree from visitor enter/leave events.
#[derive(Debug)]
struct ExtentTree {
    nodes: Vec<Extent>,
    stack: Vec<usize>,
}

impl ExtentTree {
    fn new() -> Self {
        // The root covers everything, so top-level comments have an owner.
        let root = Extent { start: 0, end: u32::MAX, children: Vec::new() };
        Self { nodes: vec![root], stack: vec![0] }
    }

    /// The deepest extent that contains `[start, end)`.
    fn enclosing(&self, start: u32, end: u32) -> usize {
        let mut current = 0;
        'descend: loop {
            for &child in &self.nodes[current].children {
                let node = &self.nodes[child];
                if node.start <= start && end <= node.end {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }
}

impl<'a> AstVisitor<'a> for ExtentTree {
    fn enter(&mut self, span: Span) {
        let index = self.nodes.len();
        self.nodes.push(Extent { start: span.start.index, end: span.end.index, children: Vec::new() });
        if let Some(&parent) = self.stack.last() {
            self.nodes[parent].children.push(index);
        }
        self.stack.push(index);
    }

    fn leave(&mut self, _span: Span) {
        self.stack.pop();
    }
}

/// Attach `comments` to the nodes of `program`.
pub(crate) fn attach_to_program(program: &Program<'_>, comments: &[Comment<'_>]) -> Vec<NodeComments> {
    if comments.is_empty() {
        return Vec::new();
    }
    let mut tree = ExtentTree::new();
    tree.visit_program(program);
    attach(&tree, comments)
}

/// Attach `comments` to the nodes of a standalone expression.
pub(crate) fn attach_to_expression(expression: &Expression<'_>, comments: &[Comment<'_>]) -> Vec<NodeComments> {
    if comments.is_empty() {
        return Vec::new();
    }
    let mut tree = ExtentTree::new();
    tree.visit_expression(expression);
    attach(&tree, comments)
}

#[derive(Clone, Copy)]
enum Slot {
    Leading,
    Trailing,
    Inner,
}

fn attach(tree: &ExtentTree, comments: &[Comment<'_>]) -> Vec<NodeComments> {
    let mut table: FxMap<(u32, u32), NodeComments> = FxMap::default();
    let mut push = |node: &Extent, slot: Slot, index: u32| {
        let entry = table.entry((node.start, node.end)).or_insert_with(|| NodeComments {
            start: node.start,
            end: node.end,
            ..NodeComments::default()
        });
        let list = match slot {
            Slot::Leading => &mut entry.leading,
            Slot::Trailing => &mut entry.trailing,
            Slot::Inner => &mut entry.inner,
        };
        if !list.contains(&index) {
            list.push(index);
        }
    };

    for (index, comment) in comments.iter().enumerate() {
        let (start, end) = (comment.span.start.index, comment.span.end.index);
        let owner = tree.enclosing(start, end);
        let children = &tree.nodes[owner].children;
        let preceding = children.iter().rev().map(|&c| &tree.nodes[c]).find(|node| node.end <= start);
        let following = children.iter().map(|&c| &tree.nodes[c]).find(|node| node.start >= end);

        let index = index as u32;
        if preceding.is_none() && following.is_none() {
            if owner != 0 {
                push(&tree.nodes[owner], Slot::Inner, index);
            }
            continue;
        }
        if let Some(node) = preceding {
            push(node, Slot::Trailing, index);
        }
        if let Some(node) = following {
            push(node, Slot::Leading, index);
        }
    }

    let mut attachments: Vec<NodeComments> = table.into_values().collect();
    attachments.sort_by_key(|entry| (entry.start, std::cmp::Reverse(entry.end)));
    attachments
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;
    use bumpalo::Bump;

    fn attachments(src: &str) -> Vec<esparse_ast::NodeComments> {
        let arena = Bump::new();
        let file = crate::parse(&arena, src, &ParserOptions::default()).unwrap();
        file.comment_attachments
    }

    #[test]
    fn test_leading_and_trailing() {
        let table = attachments("/* a */ x; // b\ny;");
        // `x;` is 8..10 and `y;` is 16..18.
        let x = table.iter().find(|e| e.start == 8 && e.end == 10).expect("x statement");
        assert_eq!(x.leading, [0]);
        assert_eq!(x.trailing, [1]);
        let y = table.iter().find(|e| e.start == 16 && e.end == 18).expect("y statement");
        assert_eq!(y.leading, [1]);
    }

    #[test]
    fn test_inner_comment() {
        let table = attachments("function f() { /* empty */ }");
        let body = table.iter().find(|e| !e.inner.is_empty()).expect("inner comment");
        assert_eq!(body.inner, [0]);
        assert_eq!((body.start, body.end), (13, 28));
    }

    #[test]
    fn test_between_operands() {
        let table = attachments("a /* c */ + b;");
        let a = table.iter().find(|e| e.start == 0 && e.end == 1).expect("a");
        assert_eq!(a.trailing, [0]);
        let b = table.iter().find(|e| e.start == 12 && e.end == 13).expect("b");
        assert_eq!(b.leading, [0]);
    }

    #[test]
    fn test_disabled() {
        let arena = Bump::new();
        let options = ParserOptions::default().with_attach_comment(false);
        let file = crate::parse(&arena, "// c\nx;", &options).unwrap();
        assert!(file.comment_attachments.is_empty());
        assert_eq!(file.comments.len(), 1);
    }
}
