//! `import` and `export` declarations.

use crate::class::ClassHead;
use crate::lval::LvalTarget;
use crate::overlay::{dispatch, Layer};
use crate::parser::{PResult, Parser};
use crate::statement::FunctionFlags;
use crate::utilities::*;
use esparse_ast::*;
use esparse_diagnostics::messages;
use esparse_scope::BindingFlags;
use tracing::trace;

/// Names a binding pattern introduces, in source order.
fn collect_bound_names<'a>(pattern: &Pattern<'a>, out: &mut Vec<&'a Identifier<'a>>) {
    match *pattern {
        Pattern::Identifier(id) => out.push(id),
        Pattern::Object(object) => {
            for member in object.properties {
                match *member {
                    ObjectPatternMember::Property(property) => collect_bound_names(&property.value, out),
                    ObjectPatternMember::Rest(rest) => collect_bound_names(&rest.argument, out),
                    ObjectPatternMember::Estree(property) => {
                        if let esparse_ast::ext::estree::PropertyValue::Pattern(value) = property.value {
                            collect_bound_names(&value, out);
                        }
                    }
                }
            }
        }
        Pattern::Array(array) => {
            for element in array.elements.iter().flatten() {
                collect_bound_names(element, out);
            }
        }
        Pattern::Assignment(assign) => collect_bound_names(&assign.left, out),
        Pattern::Rest(rest) => collect_bound_names(&rest.argument, out),
        Pattern::Member(_) | Pattern::Extension(_) => {}
    }
}

/// Declarations that export only types: dialect type declarations and
/// ambient `declare` forms.
fn is_type_only_declaration(declaration: &Statement<'_>) -> bool {
    match *declaration {
        Statement::Extension(ext) => ext.is_type_only(),
        Statement::Variable(variable) => variable.declare,
        Statement::Function(function) => function.declare,
        Statement::Class(class) => class.declare,
        _ => false,
    }
}

fn is_value_kind(kind: Option<ImportKind>) -> bool {
    matches!(kind, None | Some(ImportKind::Value))
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Imports
    // ========================================================================

    /// The rest of an import declaration; `import` has been consumed.
    pub(crate) fn parse_import(&mut self, start: usize) -> PResult<&'a ImportDeclaration<'a>> {
        let import_kind = dispatch!(self, Layer::OUTERMOST, parse_import_kind(false));
        trace!(start, ?import_kind, "import");

        let mut specifiers = Vec::new();
        if !self.is(TokenKind::String) {
            let has_default = self.is(TokenKind::Name);
            if has_default {
                let local = self.parse_import_local(import_kind)?;
                specifiers.push(ImportSpecifierKind::Default(
                    self.alloc(ImportDefaultSpecifier { data: self.finish(span_start(local.data.span)), local }),
                ));
            }
            if !has_default || self.eat(TokenKind::Comma)? {
                if self.is(TokenKind::Star) {
                    let ns_start = self.start();
                    self.next()?;
                    self.expect_contextual("as")?;
                    let local = self.parse_import_local(import_kind)?;
                    specifiers.push(ImportSpecifierKind::Namespace(
                        self.alloc(ImportNamespaceSpecifier { data: self.finish(ns_start), local }),
                    ));
                } else {
                    let named_start = self.start();
                    self.parse_named_imports(import_kind, &mut specifiers)?;
                    if has_default && import_kind == Some(ImportKind::Type) && self.is_typescript() {
                        self.raise(&messages::TS_TYPE_IMPORT_CANNOT_SPECIFY_DEFAULT_AND_NAMED, named_start, &[])?;
                    }
                }
            }
            self.expect_contextual("from")?;
        }
        let source = self.parse_string_literal()?;
        self.semicolon()?;
        Ok(self.alloc(ImportDeclaration {
            data: self.finish(start),
            specifiers: self.alloc_vec(specifiers),
            source,
            import_kind: import_kind.or(self.has_type_plugin().then_some(ImportKind::Value)),
        }))
    }

    /// How an import binding is declared. TypeScript tracks type-only
    /// imports separately so they may be shadowed by values.
    fn import_binding(&self, kind: Option<ImportKind>) -> BindingFlags {
        match (self.is_typescript(), kind) {
            (true, Some(ImportKind::Type)) => BindingFlags::TYPE_TS_TYPE_IMPORT,
            (true, _) => BindingFlags::TYPE_TS_VALUE_IMPORT,
            (false, _) => BindingFlags::TYPE_LEXICAL,
        }
    }

    /// A local import binding, declared in the module scope.
    fn parse_import_local(&mut self, kind: Option<ImportKind>) -> PResult<&'a Identifier<'a>> {
        let local = self.parse_identifier(false)?;
        let binding = self.import_binding(kind);
        self.check_lval(&Pattern::Identifier(local), LvalTarget::binding("import specifier", binding), None)?;
        Ok(local)
    }

    fn parse_named_imports(
        &mut self,
        declaration_kind: Option<ImportKind>,
        specifiers: &mut Vec<ImportSpecifierKind<'a>>,
    ) -> PResult<()> {
        self.expect(TokenKind::BraceL)?;
        let mut first = true;
        while !self.eat(TokenKind::BraceR)? {
            if !first {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::BraceR)? {
                    break;
                }
            }
            first = false;

            let start = self.start();
            let import_kind = dispatch!(self, Layer::OUTERMOST, parse_import_kind(true));
            let imported = self.parse_module_export_name()?;
            let local = if self.eat_contextual("as")? {
                self.parse_identifier(false)?
            } else {
                match imported {
                    ModuleExportName::Identifier(id) => {
                        self.check_reserved_word(id.name, span_start(id.data.span), true, true)?;
                        id
                    }
                    ModuleExportName::String(literal) => {
                        self.raise(&messages::IMPORT_BINDING_IS_STRING, start, &[literal.value])?;
                        self.alloc(Identifier::new(literal.data.span, literal.value))
                    }
                }
            };
            let binding = self.import_binding(import_kind.or(declaration_kind));
            self.check_lval(&Pattern::Identifier(local), LvalTarget::binding("import specifier", binding), None)?;
            specifiers.push(ImportSpecifierKind::Named(self.alloc(ImportSpecifier {
                data: self.finish(start),
                imported,
                local,
                import_kind,
            })));
        }
        Ok(())
    }

    /// An identifier or, for arbitrary namespace names, a string.
    pub(crate) fn parse_module_export_name(&mut self) -> PResult<ModuleExportName<'a>> {
        if self.is(TokenKind::String) {
            return Ok(ModuleExportName::String(self.parse_string_literal()?));
        }
        Ok(ModuleExportName::Identifier(self.parse_identifier(true)?))
    }

    // ========================================================================
    // Exports
    // ========================================================================

    /// The rest of an export declaration; `export` has been consumed.
    /// `decorators` were written before `export`.
    pub(crate) fn parse_export(
        &mut self,
        start: usize,
        decorators: &'a [&'a Decorator<'a>],
    ) -> PResult<ModuleItem<'a>> {
        let export_kind = dispatch!(self, Layer::OUTERMOST, parse_import_kind(false));
        trace!(start, ?export_kind, "export");

        if self.is(TokenKind::Star) {
            return self.parse_export_star(start, export_kind);
        }
        if self.is(TokenKind::BraceL) {
            return self.parse_export_named(start, export_kind);
        }
        if self.is(TokenKind::Default) {
            return self.parse_export_default(start, decorators);
        }

        let declaration = self.parse_export_declaration(decorators)?;
        self.check_declaration_exports(&declaration)?;
        let declared_kind = if is_type_only_declaration(&declaration) { ImportKind::Type } else { ImportKind::Value };
        Ok(ModuleItem::ExportNamed(self.alloc(ExportNamedDeclaration {
            data: self.finish(start),
            declaration: Some(declaration),
            specifiers: &[],
            source: None,
            export_kind: export_kind.or(self.has_type_plugin().then_some(declared_kind)),
        })))
    }

    fn parse_export_star(&mut self, start: usize, export_kind: Option<ImportKind>) -> PResult<ModuleItem<'a>> {
        let star_start = self.start();
        self.next()?;
        if self.eat_contextual("as")? {
            let exported = self.parse_module_export_name()?;
            if is_value_kind(export_kind) {
                self.check_duplicate_export(exported.name(), span_start(exported.span()))?;
            }
            let specifier = ExportSpecifierKind::Namespace(
                self.alloc(ExportNamespaceSpecifier { data: self.finish(star_start), exported }),
            );
            self.expect_contextual("from")?;
            let source = self.parse_string_literal()?;
            self.semicolon()?;
            return Ok(ModuleItem::ExportNamed(self.alloc(ExportNamedDeclaration {
                data: self.finish(start),
                declaration: None,
                specifiers: self.alloc_vec(vec![specifier]),
                source: Some(source),
                export_kind,
            })));
        }
        self.expect_contextual("from")?;
        let source = self.parse_string_literal()?;
        self.semicolon()?;
        Ok(ModuleItem::ExportAll(self.alloc(ExportAllDeclaration { data: self.finish(start), source, export_kind })))
    }

    fn parse_export_named(&mut self, start: usize, export_kind: Option<ImportKind>) -> PResult<ModuleItem<'a>> {
        let specifiers = self.parse_export_specifiers()?;
        let source = if self.eat_contextual("from")? { Some(self.parse_string_literal()?) } else { None };

        for specifier in &specifiers {
            let ExportSpecifierKind::Named(specifier) = *specifier else { continue };
            let is_value = is_value_kind(export_kind) && is_value_kind(specifier.export_kind);
            if is_value {
                self.check_duplicate_export(specifier.exported.name(), span_start(specifier.exported.span()))?;
            }
            if source.is_some() {
                continue;
            }
            match specifier.local {
                ModuleExportName::String(literal) => {
                    let exported = specifier.exported.name();
                    self.raise(
                        &messages::EXPORT_BINDING_IS_STRING,
                        span_start(literal.data.span),
                        &[literal.value, exported],
                    )?;
                }
                ModuleExportName::Identifier(local) => {
                    let pos = span_start(local.data.span);
                    self.check_reserved_word(local.name, pos, true, false)?;
                    if is_value {
                        let atom = self.intern(local.name);
                        self.scope.check_local_export(atom, pos as u32);
                    }
                }
            }
        }
        self.semicolon()?;
        Ok(ModuleItem::ExportNamed(self.alloc(ExportNamedDeclaration {
            data: self.finish(start),
            declaration: None,
            specifiers: self.alloc_vec(specifiers),
            source,
            export_kind: export_kind.or(self.has_type_plugin().then_some(ImportKind::Value)),
        })))
    }

    fn parse_export_specifiers(&mut self) -> PResult<Vec<ExportSpecifierKind<'a>>> {
        self.expect(TokenKind::BraceL)?;
        let mut specifiers = Vec::new();
        let mut first = true;
        while !self.eat(TokenKind::BraceR)? {
            if !first {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::BraceR)? {
                    break;
                }
            }
            first = false;

            let start = self.start();
            let export_kind = dispatch!(self, Layer::OUTERMOST, parse_import_kind(true));
            let local = self.parse_module_export_name()?;
            let exported = if self.eat_contextual("as")? { self.parse_module_export_name()? } else { local };
            specifiers.push(ExportSpecifierKind::Named(self.alloc(ExportSpecifier {
                data: self.finish(start),
                local,
                exported,
                export_kind,
            })));
        }
        Ok(specifiers)
    }

    fn parse_export_default(&mut self, start: usize, decorators: &'a [&'a Decorator<'a>]) -> PResult<ModuleItem<'a>> {
        let default_start = self.start();
        self.next()?;
        self.check_duplicate_export("default", default_start)?;

        let decl_start = self.start();
        let declaration = match self.token() {
            TokenKind::Function => {
                self.next()?;
                let flags = FunctionFlags::DECLARATION | FunctionFlags::NULLABLE_ID;
                ExportDefaultKind::Function(self.parse_function(decl_start, flags)?)
            }
            TokenKind::Name if self.is_async_function()? => {
                self.next()?;
                self.next()?;
                let flags = FunctionFlags::DECLARATION | FunctionFlags::NULLABLE_ID | FunctionFlags::ASYNC;
                ExportDefaultKind::Function(self.parse_function(decl_start, flags)?)
            }
            TokenKind::Class => ExportDefaultKind::Class(self.parse_class(decl_start, decorators, true, true)?),
            TokenKind::At => {
                let decorators = self.parse_decorators_after_export(decorators)?;
                ExportDefaultKind::Class(self.parse_class(decl_start, decorators, true, true)?)
            }
            TokenKind::Name if self.is_typescript() && self.is_contextual("abstract") && self.lookahead()?.kind == TokenKind::Class => {
                self.next()?;
                ExportDefaultKind::Class(self.parse_class_with(decl_start, decorators, true, true, ClassHead::ABSTRACT)?)
            }
            TokenKind::Const | TokenKind::Var => return Err(self.unexpected()),
            _ => {
                if !decorators.is_empty() {
                    return Err(self.error_at(&messages::UNEXPECTED_LEADING_DECORATOR, start, &[]));
                }
                let expr = self.parse_maybe_assign_allow_in(None)?;
                self.semicolon()?;
                ExportDefaultKind::Expression(expr)
            }
        };
        Ok(ModuleItem::ExportDefault(self.alloc(ExportDefaultDeclaration { data: self.finish(start), declaration })))
    }

    /// `export @dec class`. Decorators may sit on either side of `export`,
    /// not both.
    fn parse_decorators_after_export(
        &mut self,
        before: &'a [&'a Decorator<'a>],
    ) -> PResult<&'a [&'a Decorator<'a>]> {
        if !before.is_empty() {
            return Err(self.error_at(&messages::DECORATORS_BEFORE_AFTER_EXPORT, self.start(), &[]));
        }
        let decorators = self.parse_decorators()?;
        if !self.is(TokenKind::Class) {
            return Err(self.error_at(&messages::UNEXPECTED_LEADING_DECORATOR, self.start(), &[]));
        }
        Ok(decorators)
    }

    /// A declaration after `export`.
    fn parse_export_declaration(&mut self, decorators: &'a [&'a Decorator<'a>]) -> PResult<Statement<'a>> {
        if let Some(statement) = dispatch!(self, Layer::OUTERMOST, parse_export_declaration()) {
            if !decorators.is_empty() && !matches!(statement, Statement::Class(_)) {
                return Err(self.error_at(&messages::UNEXPECTED_LEADING_DECORATOR, span_start(decorators[0].data.span), &[]));
            }
            return Ok(statement);
        }
        let start = self.start();
        match self.token() {
            TokenKind::Class => Ok(Statement::Class(self.parse_class(start, decorators, true, false)?)),
            TokenKind::At => {
                let decorators = self.parse_decorators_after_export(decorators)?;
                Ok(Statement::Class(self.parse_class(start, decorators, true, false)?))
            }
            _ if !decorators.is_empty() => {
                Err(self.error_at(&messages::UNEXPECTED_LEADING_DECORATOR, span_start(decorators[0].data.span), &[]))
            }
            TokenKind::Var | TokenKind::Const | TokenKind::Function => self.parse_statement_list_item(),
            TokenKind::Name if self.is_contextual("let") || self.is_async_function()? => self.parse_statement_list_item(),
            _ => Err(self.unexpected()),
        }
    }

    // ========================================================================
    // Export bookkeeping
    // ========================================================================

    fn check_duplicate_export(&mut self, name: &str, pos: usize) -> PResult<()> {
        let atom = self.intern(name);
        if self.exported_names.insert(atom) {
            return Ok(());
        }
        if name == "default" {
            self.raise(&messages::DUPLICATE_DEFAULT_EXPORT, pos, &[])
        } else {
            self.raise(&messages::DUPLICATE_EXPORT, pos, &[name])
        }
    }

    /// Register the names an exported declaration binds.
    fn check_declaration_exports(&mut self, declaration: &Statement<'a>) -> PResult<()> {
        let mut names = Vec::new();
        match *declaration {
            Statement::Variable(variable) => {
                if variable.declare {
                    return Ok(());
                }
                for declarator in variable.declarations {
                    collect_bound_names(&declarator.id, &mut names);
                }
            }
            Statement::Function(function) => {
                if let Some(id) = function.id.and_then(|id| id.as_identifier()) {
                    names.push(id);
                }
            }
            Statement::Class(class) => {
                if let Some(id) = class.id.and_then(|id| id.as_identifier()) {
                    names.push(id);
                }
            }
            _ => {}
        }
        for id in names {
            self.check_duplicate_export(id.name, span_start(id.data.span))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ParserOptions, SourceTypeOption};
    use bumpalo::Bump;

    fn module() -> ParserOptions {
        ParserOptions { source_type: SourceTypeOption::Module, ..ParserOptions::default() }
    }

    fn reason(src: &str) -> Option<&'static str> {
        let arena = Bump::new();
        let err = crate::parse(&arena, src, &module()).expect_err("should fail");
        err.diagnostic().map(|d| d.reason_code())
    }

    // ========================================================================
    // Bound names
    // ========================================================================

    #[test]
    fn test_collect_bound_names() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "var { a, b: [c, ...d], ...e } = f;", &ParserOptions::default()).unwrap();
        let Some(Statement::Variable(variable)) = file.program.body.first() else { panic!("expected var") };
        let mut names = Vec::new();
        collect_bound_names(&variable.declarations[0].id, &mut names);
        let names: Vec<&str> = names.iter().map(|id| id.name).collect();
        assert_eq!(names, ["a", "c", "d", "e"]);
    }

    // ========================================================================
    // Imports
    // ========================================================================

    #[test]
    fn test_import_forms() {
        let arena = Bump::new();
        let src = "import a, * as ns from 'm'; import b, { c, d as e, 'f g' as h } from 'n'; import 'side';";
        let file = crate::parse(&arena, src, &module()).unwrap();
        let counts: Vec<usize> = file
            .program
            .body
            .iter()
            .map(|stmt| match stmt {
                Statement::Module(ModuleItem::Import(decl)) => decl.specifiers.len(),
                other => panic!("{other:?}"),
            })
            .collect();
        assert_eq!(counts, [2, 4, 0]);
    }

    #[test]
    fn test_import_errors() {
        assert_eq!(reason("import { 'a b' } from 'm';"), Some("ImportBindingIsString"));
        assert_eq!(reason("import a from 'm'; let a;"), Some("VarRedeclaration"));
        assert_eq!(reason("import { default } from 'm';"), Some("UnexpectedKeyword"));
    }

    // ========================================================================
    // Exports
    // ========================================================================

    #[test]
    fn test_export_forms() {
        let arena = Bump::new();
        let src = "export * from 'a'; export * as ns from 'b'; export { x as y, z } ; export default function () {} export const x = 1, w = 2; export class C {} let z;";
        let file = crate::parse(&arena, src, &module()).unwrap();
        assert_eq!(file.program.body.len(), 7);
        assert!(matches!(file.program.body[0], Statement::Module(ModuleItem::ExportAll(_))));
        assert!(matches!(file.program.body[3], Statement::Module(ModuleItem::ExportDefault(_))));
        assert!(file.errors.is_empty());
    }

    #[test]
    fn test_export_errors() {
        assert_eq!(reason("export { a }; export { b as a }; var a, b;"), Some("DuplicateExport"));
        assert_eq!(reason("export default 1; export default 2;"), Some("DuplicateDefaultExport"));
        assert_eq!(reason("export { missing };"), Some("ModuleExportUndefined"));
        assert_eq!(reason("export { 'a' as b };"), Some("ExportBindingIsString"));
        assert_eq!(reason("export var 1;"), Some("UnexpectedToken"));
    }

    #[test]
    fn test_module_syntax_in_script() {
        let arena = Bump::new();
        let err = crate::parse(&arena, "import a from 'm';", &ParserOptions::default()).unwrap_err();
        assert_eq!(err.diagnostic().map(|d| d.reason_code()), Some("ImportOutsideModule"));
    }
}
