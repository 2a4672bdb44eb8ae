//! esparse_ast: Syntax tree definitions for the esparse ECMAScript parser.
//!
//! Defines the token vocabulary, the arena-allocated node types for the core
//! grammar and for each dialect (JSX, TypeScript, Flow, placeholders, ESTree),
//! and a visitor over the whole tree. Nodes serialize to Babel's JSON shape.

pub mod accessors;
pub mod ext;
pub mod flags;
pub mod flow;
pub mod jsx;
pub mod node;
pub mod token;
pub mod token_kind;
pub mod ts;
pub mod visitor;

// Re-export key types
pub use ext::{
    ClassMemberExtension, ExpressionExtension, ObjectMemberExtension, PatternExtension, Placeholder,
    PlaceholderKind, StatementExtension, V8IntrinsicIdentifier,
};
pub use flags::NodeFlags;
pub use node::*;
pub use token::{Comment, CommentKind, Token, TokenOrComment, TokenValue};
pub use token_kind::TokenKind;
pub use visitor::AstVisitor;

#[cfg(test)]
mod tests {
    use super::*;
    use esparse_core::text::{Position, Span};

    fn span(start: u32, end: u32) -> Span {
        Span::new(
            Position { line: 1, column: start, index: start },
            Position { line: 1, column: end, index: end },
        )
    }

    // ========================================================================
    // Serialization shape
    // ========================================================================

    #[test]
    fn test_identifier_serializes_babel_shape() {
        let id = Identifier::new(span(0, 3), "foo");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["type"], "Identifier");
        assert_eq!(json["name"], "foo");
        assert_eq!(json["start"], 0);
        assert_eq!(json["end"], 3);
        assert_eq!(json["loc"]["start"]["line"], 1);
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn test_parenthesized_flag_adds_extra() {
        let lit = NumericLiteral {
            data: NodeData::new(span(1, 2)),
            value: 1.0,
            raw: "1",
        };
        lit.data.set_flag(NodeFlags::PARENTHESIZED);
        let json = serde_json::to_value(Expression::NumericLiteral(&lit)).unwrap();
        assert_eq!(json["type"], "NumericLiteral");
        assert_eq!(json["extra"]["parenthesized"], true);
        assert_eq!(json["raw"], "1");
    }

    #[test]
    fn test_statement_enum_is_untagged() {
        let id = Identifier::new(span(0, 1), "a");
        let stmt = ExpressionStatement {
            data: NodeData::new(span(0, 2)),
            expression: Expression::Identifier(&id),
            directive: None,
        };
        let json = serde_json::to_value(Statement::Expression(&stmt)).unwrap();
        assert_eq!(json["type"], "ExpressionStatement");
        assert_eq!(json["expression"]["type"], "Identifier");
    }

    // ========================================================================
    // Visitor
    // ========================================================================

    struct SpanCollector {
        entered: Vec<(u32, u32)>,
        depth: i32,
    }

    impl<'a> AstVisitor<'a> for SpanCollector {
        fn enter(&mut self, span: Span) {
            self.entered.push((span.start.index, span.end.index));
            self.depth += 1;
        }

        fn leave(&mut self, _span: Span) {
            self.depth -= 1;
        }
    }

    #[test]
    fn test_visitor_walks_in_source_order() {
        let left = Identifier::new(span(0, 1), "a");
        let right = Identifier::new(span(4, 5), "b");
        let binary = BinaryExpression {
            data: NodeData::new(span(0, 5)),
            operator: BinaryOperator::Addition,
            left: Expression::Identifier(&left),
            right: Expression::Identifier(&right),
        };
        let stmt = ExpressionStatement {
            data: NodeData::new(span(0, 6)),
            expression: Expression::Binary(&binary),
            directive: None,
        };
        let body = [Statement::Expression(&stmt)];
        let program = Program {
            data: NodeData::new(span(0, 6)),
            source_type: SourceType::Script,
            interpreter: None,
            body: &body,
            directives: &[],
        };

        let mut collector = SpanCollector { entered: Vec::new(), depth: 0 };
        collector.visit_program(&program);
        assert_eq!(collector.depth, 0);
        assert_eq!(collector.entered, vec![(0, 6), (0, 6), (0, 5), (0, 1), (4, 5)]);
    }
}
