//! The `v8intrinsic` plugin: `%Name(args)` calls to engine intrinsics.

use super::{Layer, Overlay};
use crate::parser::{PResult, Parser};
use esparse_ast::*;
use esparse_diagnostics::messages;

pub(crate) struct V8IntrinsicOverlay;

impl Overlay for V8IntrinsicOverlay {
    fn name(&self) -> &'static str {
        "v8intrinsic"
    }

    fn parse_expr_atom<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<Expression<'a>>> {
        if !p.is(TokenKind::Modulo) {
            return Ok(None);
        }
        let start = p.start();
        p.next()?;
        if p.token().is_keyword_or_name() {
            let name = p.parse_identifier_name(true)?;
            if p.is(TokenKind::ParenL) {
                let intrinsic = p.alloc(V8IntrinsicIdentifier { data: p.finish(start), name });
                return Ok(Some(Expression::Extension(p.alloc(ExpressionExtension::V8Intrinsic(intrinsic)))));
            }
        }
        Err(p.error_at(&messages::UNEXPECTED_TOKEN, start, &[]))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;
    use bumpalo::Bump;
    use esparse_ast::*;

    fn options() -> ParserOptions {
        ParserOptions::default().with_plugin("v8intrinsic")
    }

    #[test]
    fn test_intrinsic_call() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "%DebugPrint(foo);", &options()).unwrap();
        let Some(Statement::Expression(stmt)) = file.program.body.first() else { panic!("statement") };
        let Expression::Call(call) = stmt.expression else { panic!("call") };
        match call.callee {
            Expression::Extension(ExpressionExtension::V8Intrinsic(id)) => assert_eq!(id.name, "DebugPrint"),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_modulo_still_binary() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "a % b;", &options()).unwrap();
        let Some(Statement::Expression(stmt)) = file.program.body.first() else { panic!("statement") };
        assert!(matches!(stmt.expression, Expression::Binary(_)));
    }

    #[test]
    fn test_intrinsic_must_be_called() {
        let arena = Bump::new();
        let err = crate::parse(&arena, "%DebugPrint;", &options()).unwrap_err();
        let diag = err.diagnostic().expect("syntax error");
        assert_eq!(diag.reason_code(), "UnexpectedToken");
    }

    #[test]
    fn test_intrinsic_names_only_its_plugin() {
        let arena = Bump::new();
        for options in [ParserOptions::default(), ParserOptions::default().with_plugin("placeholders")] {
            let err = crate::parse(&arena, "%DebugPrint(x);", &options).unwrap_err();
            let diag = err.diagnostic().expect("syntax error");
            assert_eq!(diag.reason_code(), "MissingPlugin");
            assert_eq!(diag.missing_plugins, ["v8intrinsic"]);
        }
    }
}
