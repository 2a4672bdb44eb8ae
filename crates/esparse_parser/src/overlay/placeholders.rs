//! The `placeholders` plugin: `%%name%%` stands in for an identifier,
//! expression, statement, pattern or class body of a code template.

use super::{Layer, Overlay};
use crate::parser::{PResult, Parser};
use crate::statement::StatementContext;
use esparse_ast::*;
use esparse_diagnostics::messages;
use esparse_scanner::LexerFeatures;

pub(crate) struct PlaceholdersOverlay;

impl PlaceholdersOverlay {
    /// `%%name%%` at the current token, if there is one.
    fn parse_placeholder<'a>(p: &mut Parser<'a>, expected_node: PlaceholderKind) -> PResult<Option<&'a Placeholder<'a>>> {
        if !p.is(TokenKind::Placeholder) {
            return Ok(None);
        }
        let start = p.start();
        p.next()?;
        Self::assert_no_space(p)?;
        let name = p.parse_identifier(true)?;
        Self::assert_no_space(p)?;
        p.expect(TokenKind::Placeholder)?;
        Ok(Some(p.alloc(Placeholder { data: p.finish(start), expected_node, name })))
    }

    fn assert_no_space(p: &mut Parser<'_>) -> PResult<()> {
        if p.start() > p.last_end() {
            p.raise(&messages::PLACEHOLDER_UNEXPECTED_SPACE, p.last_end(), &[])?;
        }
        Ok(())
    }

    fn retag<'a>(p: &Parser<'a>, placeholder: &'a Placeholder<'a>, expected_node: PlaceholderKind) -> &'a Placeholder<'a> {
        p.alloc(Placeholder { data: NodeData::new(placeholder.data.span), expected_node, name: placeholder.name })
    }
}

impl Overlay for PlaceholdersOverlay {
    fn name(&self) -> &'static str {
        "placeholders"
    }

    fn lexer_features(&self) -> LexerFeatures {
        LexerFeatures::PLACEHOLDERS
    }

    fn parse_expr_atom<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<Expression<'a>>> {
        let Some(placeholder) = Self::parse_placeholder(p, PlaceholderKind::Expression)? else { return Ok(None) };
        Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::Placeholder(placeholder)))))
    }

    fn parse_binding_atom<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<Pattern<'a>>> {
        let Some(placeholder) = Self::parse_placeholder(p, PlaceholderKind::Pattern)? else { return Ok(None) };
        Ok(Some(Pattern::Extension(p.alloc(PatternExtension::Placeholder(placeholder)))))
    }

    fn parse_declaration_id<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<BindingName<'a>>> {
        let Some(placeholder) = Self::parse_placeholder(p, PlaceholderKind::Identifier)? else { return Ok(None) };
        Ok(Some(BindingName::Placeholder(placeholder)))
    }

    fn parse_class_body<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<ClassBodyOrPlaceholder<'a>>> {
        let Some(placeholder) = Self::parse_placeholder(p, PlaceholderKind::ClassBody)? else { return Ok(None) };
        Ok(Some(ClassBodyOrPlaceholder::Placeholder(placeholder)))
    }

    /// A placeholder alone on its line is a statement; anything following
    /// it makes it an expression.
    fn parse_statement<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        _context: StatementContext,
    ) -> PResult<Option<Statement<'a>>> {
        if !p.is(TokenKind::Placeholder) {
            return Ok(None);
        }
        let checkpoint = p.checkpoint();
        let Some(placeholder) = Self::parse_placeholder(p, PlaceholderKind::Statement)? else { return Ok(None) };
        if !p.is_line_terminator()? {
            p.restore(checkpoint);
            return Ok(None);
        }
        Ok(Some(Statement::Extension(p.alloc(StatementExtension::Placeholder(placeholder)))))
    }

    fn to_assignable_extension<'a>(
        &self,
        p: &mut Parser<'a>,
        _layer: Layer,
        ext: &'a ExpressionExtension<'a>,
        _is_binding: bool,
    ) -> PResult<Option<Pattern<'a>>> {
        let ExpressionExtension::Placeholder(placeholder) = *ext else { return Ok(None) };
        let pattern = Self::retag(p, placeholder, PlaceholderKind::Pattern);
        Ok(Some(Pattern::Extension(p.alloc(PatternExtension::Placeholder(pattern)))))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;
    use bumpalo::Bump;
    use esparse_ast::*;

    fn options() -> ParserOptions {
        ParserOptions::default().with_plugin("placeholders")
    }

    fn placeholder_kind(stmt: &Statement<'_>) -> Option<PlaceholderKind> {
        match stmt {
            Statement::Extension(StatementExtension::Placeholder(p)) => Some(p.expected_node),
            _ => None,
        }
    }

    #[test]
    fn test_statement_and_expression_positions() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "%%body%%;\n%%value%% + 1;", &options()).unwrap();
        assert_eq!(placeholder_kind(&file.program.body[0]), Some(PlaceholderKind::Statement));
        match file.program.body[1] {
            Statement::Expression(stmt) => {
                let Expression::Binary(binary) = stmt.expression else { panic!("binary") };
                assert!(matches!(binary.left, Expression::Extension(ExpressionExtension::Placeholder(_))));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_declaration_positions() {
        let arena = Bump::new();
        let src = "function %%name%%(%%param%%) {}\nclass A %%members%%";
        let file = crate::parse(&arena, src, &options()).unwrap();
        match file.program.body[0] {
            Statement::Function(f) => {
                assert!(matches!(f.id, Some(BindingName::Placeholder(p)) if p.expected_node == PlaceholderKind::Identifier));
                assert!(matches!(f.params[0], Pattern::Extension(PatternExtension::Placeholder(_))));
            }
            other => panic!("{other:?}"),
        }
        match file.program.body[1] {
            Statement::Class(class) => assert!(matches!(class.body, ClassBodyOrPlaceholder::Placeholder(_))),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_assignment_target() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "%%target%% = 1;", &options()).unwrap();
        let Statement::Expression(stmt) = file.program.body[0] else { panic!("statement") };
        let Expression::Assignment(assign) = stmt.expression else { panic!("assignment") };
        match assign.left {
            Pattern::Extension(PatternExtension::Placeholder(p)) => assert_eq!(p.expected_node, PlaceholderKind::Pattern),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_space_inside_delimiters() {
        let arena = Bump::new();
        let err = crate::parse(&arena, "%% name%%;", &options()).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.reason_code()), Some("UnexpectedSpace"));
        let err = crate::parse(&arena, "%%name%%;", &ParserOptions::default()).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.reason_code()), Some("MissingPlugin"));
    }
}
