//! Classes and decorators.

use crate::expression::MethodContext;
use crate::options::Plugins;
use crate::overlay::{dispatch, Layer};
use crate::parser::{PResult, Parser};
use crate::utilities::*;
use bitflags::bitflags;
use esparse_ast::ext::estree::LiteralValue;
use esparse_ast::*;
use esparse_diagnostics::messages;
use esparse_scope::{BindingFlags, ClassElementKind, ParamFlags, PrivateNameError, ScopeFlags};
use tracing::trace;

bitflags! {
    /// Modifiers written ahead of `class`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct ClassHead: u8 {
        const ABSTRACT = 1 << 0;
        const DECLARE  = 1 << 1;
    }
}

/// Modifiers read ahead of a class member key.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberModifiers<'a> {
    pub decorators: &'a [&'a Decorator<'a>],
    pub is_static: bool,
    pub accessibility: Option<Accessibility>,
    pub is_abstract: bool,
    pub is_override: bool,
    pub readonly: bool,
    pub declare: bool,
    pub variance: Option<&'a flow::Variance>,
}

impl MemberModifiers<'_> {
    /// Any modifier besides `static` and decorators.
    fn has_type_modifier(&self) -> bool {
        self.accessibility.is_some() || self.is_abstract || self.is_override || self.readonly || self.declare
    }
}

/// What a type dialect reads between a property key and its initializer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyTypeInfo<'a> {
    pub optional: bool,
    pub definite: bool,
    pub type_annotation: Option<TypeAnnotation<'a>>,
}

/// Per-body facts that outlive a single member.
struct ClassBodyState {
    head: ClassHead,
    had_super_class: bool,
    had_constructor: bool,
}

/// A class member key.
#[derive(Clone, Copy)]
struct MemberKey<'a> {
    key: Expression<'a>,
    computed: bool,
    is_private: bool,
}

impl<'a> MemberKey<'a> {
    /// `constructor` as a plain or string key.
    fn is_constructor(&self) -> bool {
        !self.computed && !self.is_private && static_key_name(&self.key) == Some("constructor")
    }

    fn start(&self) -> usize {
        span_start(self.key.span())
    }
}

/// Shape of a class method about to be parsed.
#[derive(Clone, Copy)]
struct MethodSpec {
    kind: MethodKind,
    generator: bool,
    is_async: bool,
    optional: bool,
    allow_direct_super: bool,
}

impl MethodSpec {
    fn plain(kind: MethodKind) -> Self {
        Self { kind, generator: false, is_async: false, optional: false, allow_direct_super: false }
    }
}

/// The name of a non-computed key written as an identifier or string.
fn static_key_name<'a>(key: &Expression<'a>) -> Option<&'a str> {
    match *key {
        Expression::Identifier(id) => Some(id.name),
        Expression::StringLiteral(lit) => Some(lit.value),
        Expression::Extension(ExpressionExtension::EstreeLiteral(lit)) => match lit.value {
            LiteralValue::String(value) => Some(value),
            _ => None,
        },
        _ => None,
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Decorators
    // ========================================================================

    /// A run of decorators, possibly empty.
    pub(crate) fn parse_decorators(&mut self) -> PResult<&'a [&'a Decorator<'a>]> {
        let mut decorators = Vec::new();
        while self.is(TokenKind::At) {
            decorators.push(self.parse_decorator()?);
        }
        Ok(self.alloc_vec(decorators))
    }

    fn parse_decorator(&mut self) -> PResult<&'a Decorator<'a>> {
        let start = self.start();
        if !self.plugins.has_decorators() {
            return Err(self.missing_plugins(start, &["decorators", "decorators-legacy"]));
        }
        self.next()?;

        let expression = if self.has_plugin(Plugins::DECORATORS) {
            if self.is(TokenKind::ParenL) {
                let paren_start = self.start();
                self.next()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::ParenR)?;
                let wrapped = self.wrap_parenthesis(paren_start, inner);
                self.parse_maybe_decorator_arguments(wrapped)?
            } else {
                let path_start = self.start();
                let mut expr = Expression::Identifier(self.parse_identifier(false)?);
                while self.eat(TokenKind::Dot)? {
                    let property = if self.is(TokenKind::PrivateName) {
                        let name = self.parse_private_name()?;
                        self.use_private_name(name)?;
                        Expression::PrivateName(name)
                    } else {
                        Expression::Identifier(self.parse_identifier(true)?)
                    };
                    expr = Expression::Member(self.alloc(MemberExpression {
                        kind: MemberType::MemberExpression,
                        data: self.finish(path_start),
                        object: expr,
                        computed: false,
                        property,
                        optional: None,
                    }));
                }
                self.parse_maybe_decorator_arguments(expr)?
            }
        } else {
            self.parse_expr_subscripts(None)?
        };
        Ok(self.alloc(Decorator { data: self.finish(start), expression }))
    }

    fn parse_maybe_decorator_arguments(&mut self, callee: Expression<'a>) -> PResult<Expression<'a>> {
        if !self.eat(TokenKind::ParenL)? {
            return Ok(callee);
        }
        let start = span_start(callee.span());
        let (arguments, _) = self.parse_call_arguments(TokenKind::ParenR, None)?;
        self.to_referenced_arguments(&arguments)?;
        Ok(Expression::Call(self.alloc(CallExpression {
            kind: CallType::CallExpression,
            data: self.finish(start),
            callee,
            arguments: self.alloc_vec(arguments),
            optional: None,
            type_parameters: None,
        })))
    }

    // ========================================================================
    // Private names
    // ========================================================================

    /// Record a reference to `#name`, resolved when the class bodies close.
    pub(crate) fn use_private_name(&mut self, name: &'a PrivateName<'a>) -> PResult<()> {
        let atom = self.intern(name.id.name);
        let pos = span_start(name.data.span) as u32;
        match self.class_scope.use_private_name(atom, pos) {
            Ok(()) => Ok(()),
            Err(error) => self.report_private_name_error(error),
        }
    }

    fn declare_private_name(&mut self, key: &MemberKey<'a>, kind: ClassElementKind) -> PResult<()> {
        let Expression::PrivateName(name) = key.key else {
            return Ok(());
        };
        let atom = self.intern(name.id.name);
        match self.class_scope.declare_private_name(atom, kind, key.start() as u32) {
            Ok(()) => Ok(()),
            Err(error) => self.report_private_name_error(error),
        }
    }

    fn report_private_name_error(&mut self, error: PrivateNameError) -> PResult<()> {
        let (message, name, pos) = match error {
            PrivateNameError::Redeclaration { name, pos } => (&messages::PRIVATE_NAME_REDECLARATION, name, pos),
            PrivateNameError::Unresolved { name, pos } => (&messages::INVALID_PRIVATE_FIELD_RESOLUTION, name, pos),
        };
        let name = self.interner.resolve(name).to_owned();
        self.raise(message, pos as usize, &[&name])
    }

    // ========================================================================
    // Class heads
    // ========================================================================

    /// A class declaration or expression at `class`.
    pub(crate) fn parse_class(
        &mut self,
        start: usize,
        decorators: &'a [&'a Decorator<'a>],
        is_statement: bool,
        optional_id: bool,
    ) -> PResult<&'a Class<'a>> {
        self.parse_class_with(start, decorators, is_statement, optional_id, ClassHead::empty())
    }

    pub(crate) fn parse_class_with(
        &mut self,
        start: usize,
        decorators: &'a [&'a Decorator<'a>],
        is_statement: bool,
        optional_id: bool,
        head: ClassHead,
    ) -> PResult<&'a Class<'a>> {
        trace!(start, is_statement, "class");
        self.expect(TokenKind::Class)?;
        // The whole class, heritage included, is strict code.
        let old_strict = self.scanner.replace_strict(true);

        let id = self.parse_class_id(is_statement, optional_id, head)?;
        let type_parameters =
            if self.is(TokenKind::Lt) { dispatch!(self, Layer::OUTERMOST, parse_type_parameters()) } else { None };

        let (super_class, super_type_parameters) = if self.eat(TokenKind::Extends)? {
            let super_class = self.parse_expr_subscripts(None)?;
            (Some(super_class), self.parse_type_arguments_opt()?)
        } else {
            (None, None)
        };
        let implements = dispatch!(self, Layer::OUTERMOST, parse_class_implements()).unwrap_or(&[]);

        let body = match dispatch!(self, Layer::OUTERMOST, parse_class_body()) {
            Some(body) => {
                self.scanner.replace_strict(old_strict);
                body
            }
            None => ClassBodyOrPlaceholder::Body(self.parse_class_body(super_class.is_some(), head, old_strict)?),
        };

        let kind = if is_statement { ClassType::ClassDeclaration } else { ClassType::ClassExpression };
        Ok(self.alloc(Class {
            kind,
            data: self.finish(start),
            decorators,
            id,
            super_class,
            body,
            type_parameters,
            super_type_parameters,
            implements,
            is_abstract: head.contains(ClassHead::ABSTRACT),
            declare: head.contains(ClassHead::DECLARE),
        }))
    }

    fn parse_class_id(
        &mut self,
        is_statement: bool,
        optional_id: bool,
        head: ClassHead,
    ) -> PResult<Option<BindingName<'a>>> {
        if let Some(id) = dispatch!(self, Layer::OUTERMOST, parse_declaration_id()) {
            return Ok(Some(id));
        }
        let implements_clause =
            self.is_typescript() && (!is_statement || optional_id) && self.is_contextual("implements");
        if self.is(TokenKind::Name) && !implements_clause {
            let id = self.parse_identifier(false)?;
            if is_statement {
                let binding =
                    if head.contains(ClassHead::DECLARE) { BindingFlags::TYPE_TS_AMBIENT } else { BindingFlags::TYPE_CLASS };
                self.check_identifier(id, binding, false)?;
            }
            return Ok(Some(BindingName::Identifier(id)));
        }
        if optional_id || !is_statement {
            return Ok(None);
        }
        Err(self.error_at(&messages::CLASS_NAME_IS_REQUIRED, self.start(), &[]))
    }

    // ========================================================================
    // Class bodies
    // ========================================================================

    fn parse_class_body(&mut self, had_super_class: bool, head: ClassHead, old_strict: bool) -> PResult<&'a ClassBody<'a>> {
        let start = self.start();
        self.class_scope.enter();
        let old_ambient = self.state.in_ambient_context;
        if head.contains(ClassHead::DECLARE) {
            self.state.in_ambient_context = true;
        }
        self.expect(TokenKind::BraceL)?;

        let mut state = ClassBodyState { head, had_super_class, had_constructor: false };
        let mut members = Vec::new();
        let mut decorators: Vec<&'a Decorator<'a>> = Vec::new();
        while !self.is(TokenKind::BraceR) {
            match self.token() {
                TokenKind::Eof => return Err(self.unexpected()),
                TokenKind::Semi => {
                    if !decorators.is_empty() {
                        return Err(self.unexpected());
                    }
                    self.next()?;
                }
                TokenKind::At => decorators.push(self.parse_decorator()?),
                _ => {
                    let member_decorators = self.alloc_vec(std::mem::take(&mut decorators));
                    let member = self.parse_class_member(&mut state, member_decorators)?;
                    let member = dispatch!(self, Layer::OUTERMOST, finish_class_member(member)).unwrap_or(member);
                    members.push(member);
                }
            }
        }
        if !decorators.is_empty() {
            return Err(self.error_at(&messages::TRAILING_DECORATOR, self.start(), &[]));
        }
        // The token after the body is read with the outer strictness.
        self.scanner.replace_strict(old_strict);
        self.next()?;
        self.state.in_ambient_context = old_ambient;

        for error in self.class_scope.exit() {
            self.report_private_name_error(error)?;
        }
        Ok(self.alloc(ClassBody { data: self.finish(start), body: self.alloc_vec(members) }))
    }

    fn parse_class_member(
        &mut self,
        state: &mut ClassBodyState,
        decorators: &'a [&'a Decorator<'a>],
    ) -> PResult<ClassMember<'a>> {
        let start = decorators.first().map_or(self.start(), |first| span_start(first.data.span));
        let mut modifiers = MemberModifiers { decorators, ..MemberModifiers::default() };
        dispatch!(self, Layer::OUTERMOST, parse_class_member_modifiers(&mut modifiers));

        if !modifiers.is_static && self.is_contextual("static") && !self.scanner.contains_esc() {
            if let Some(member) = self.parse_member_named_static(start, &modifiers, state)? {
                return Ok(member);
            }
            modifiers.is_static = true;
        }
        if modifiers.is_static && self.is(TokenKind::BraceL) {
            return self.parse_static_block(start, &modifiers);
        }
        if let Some(member) = dispatch!(self, Layer::OUTERMOST, parse_class_member_extension(start, &modifiers)) {
            return Ok(member);
        }
        self.parse_class_member_with_is_static(start, &modifiers, state)
    }

    /// `static` was just seen: a method or field may be named `static`.
    /// Returns `None` once `static` turns out to be the modifier.
    fn parse_member_named_static(
        &mut self,
        start: usize,
        modifiers: &MemberModifiers<'a>,
        state: &mut ClassBodyState,
    ) -> PResult<Option<ClassMember<'a>>> {
        let id = self.parse_identifier(true)?;
        let key = MemberKey { key: Expression::Identifier(id), computed: false, is_private: false };
        if self.is_class_method() {
            let member = self.push_class_method(start, modifiers, key, MethodSpec::plain(MethodKind::Method), state)?;
            return Ok(Some(member));
        }
        if self.is_class_property() {
            return Ok(Some(self.push_class_property(start, modifiers, key, false)?));
        }
        Ok(None)
    }

    fn parse_static_block(&mut self, start: usize, modifiers: &MemberModifiers<'a>) -> PResult<ClassMember<'a>> {
        if self.is_typescript() && modifiers.has_type_modifier() {
            self.raise(&messages::TS_STATIC_BLOCK_CANNOT_HAVE_MODIFIER, start, &[])?;
        }
        self.next()?;
        self.scope.enter(ScopeFlags::CLASS | ScopeFlags::STATIC_BLOCK | ScopeFlags::SUPER);
        let old_labels = std::mem::take(&mut self.state.labels);
        self.prod_param.enter(ParamFlags::NONE);
        let (body, _) = self.parse_block_body(TokenKind::BraceR, false, false, |_, _| Ok(()))?;
        self.prod_param.exit();
        self.state.labels = old_labels;
        self.scope.exit();

        if !modifiers.decorators.is_empty() {
            self.raise(&messages::DECORATOR_STATIC_BLOCK, start, &[])?;
        }
        Ok(ClassMember::StaticBlock(self.alloc(StaticBlock { data: self.finish(start), body })))
    }

    fn parse_class_member_with_is_static(
        &mut self,
        start: usize,
        modifiers: &MemberModifiers<'a>,
        state: &mut ClassBodyState,
    ) -> PResult<ClassMember<'a>> {
        let is_static = modifiers.is_static;

        if self.eat(TokenKind::Star)? {
            let key = self.parse_class_element_name(is_static)?;
            if key.is_constructor() && !is_static {
                self.raise(&messages::CONSTRUCTOR_IS_GENERATOR, key.start(), &[])?;
            }
            let spec = MethodSpec { generator: true, ..MethodSpec::plain(MethodKind::Method) };
            return self.push_class_method(start, modifiers, key, spec, state);
        }

        let maybe_contextual = self.is(TokenKind::Name) && !self.scanner.contains_esc();
        let key = self.parse_class_element_name(is_static)?;
        let contextual = match key.key {
            Expression::Identifier(id) if maybe_contextual => Some(id.name),
            _ => None,
        };
        let question_pos = self.start();
        let optional = self.is_typescript() && self.eat(TokenKind::Question)?;

        if self.is_class_method() {
            let mut spec = MethodSpec { optional, ..MethodSpec::plain(MethodKind::Method) };
            if key.is_constructor() && !is_static {
                if state.had_constructor && !self.is_typescript() {
                    self.raise(&messages::DUPLICATE_CONSTRUCTOR, key.start(), &[])?;
                }
                if !modifiers.decorators.is_empty() {
                    self.raise(&messages::DECORATOR_CONSTRUCTOR, start, &[])?;
                }
                state.had_constructor = true;
                spec.kind = MethodKind::Constructor;
                spec.allow_direct_super = state.had_super_class;
            }
            return self.push_class_method(start, modifiers, key, spec, state);
        }
        if self.is_class_property() {
            return self.push_class_property(start, modifiers, key, optional);
        }

        match contextual {
            Some("async") if !self.at_line_terminator() => {
                if optional {
                    return Err(self.error_at(&messages::UNEXPECTED_TOKEN, question_pos, &[]));
                }
                let generator = self.eat(TokenKind::Star)?;
                let key = self.parse_class_element_name(is_static)?;
                let optional = self.is_typescript() && self.eat(TokenKind::Question)?;
                if key.is_constructor() && !is_static {
                    self.raise(&messages::CONSTRUCTOR_IS_ASYNC, key.start(), &[])?;
                }
                let spec = MethodSpec { generator, is_async: true, optional, ..MethodSpec::plain(MethodKind::Method) };
                self.push_class_method(start, modifiers, key, spec, state)
            }
            Some(word @ ("get" | "set")) if !(self.is(TokenKind::Star) && self.at_line_terminator()) => {
                if optional {
                    return Err(self.error_at(&messages::UNEXPECTED_TOKEN, question_pos, &[]));
                }
                let kind = if word == "get" { MethodKind::Get } else { MethodKind::Set };
                let key = self.parse_class_element_name(is_static)?;
                let optional = self.is_typescript() && self.eat(TokenKind::Question)?;
                if key.is_constructor() && !is_static {
                    self.raise(&messages::CONSTRUCTOR_IS_ACCESSOR, key.start(), &[])?;
                }
                let spec = MethodSpec { optional, ..MethodSpec::plain(kind) };
                self.push_class_method(start, modifiers, key, spec, state)
            }
            _ if self.at_line_terminator() => self.push_class_property(start, modifiers, key, optional),
            _ => Err(self.unexpected()),
        }
    }

    /// A member key, private names included.
    fn parse_class_element_name(&mut self, is_static: bool) -> PResult<MemberKey<'a>> {
        let start = self.start();
        if is_static
            && matches!(self.token(), TokenKind::Name | TokenKind::String)
            && self.token_value().as_str() == Some("prototype")
        {
            self.raise(&messages::STATIC_PROTOTYPE, start, &[])?;
        }
        if self.is(TokenKind::PrivateName) {
            if self.token_str() == "constructor" {
                self.raise(&messages::CONSTRUCTOR_CLASS_PRIVATE_FIELD, start, &[])?;
            }
            let name = self.parse_private_name()?;
            return Ok(MemberKey { key: Expression::PrivateName(name), computed: false, is_private: true });
        }
        let (key, computed) = self.parse_property_name(None, false)?;
        Ok(MemberKey { key, computed, is_private: false })
    }

    fn is_class_method(&self) -> bool {
        self.is(TokenKind::ParenL) || (self.has_type_plugin() && self.is(TokenKind::Lt))
    }

    fn is_class_property(&self) -> bool {
        matches!(self.token(), TokenKind::Eq | TokenKind::Semi | TokenKind::BraceR)
            || (self.has_type_plugin() && self.is(TokenKind::Colon))
            || (self.is_typescript() && self.is(TokenKind::Bang))
    }

    /// A member ends here, without consuming a `;`.
    fn at_line_terminator(&self) -> bool {
        self.is(TokenKind::Semi) || self.can_insert_semicolon()
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn push_class_method(
        &mut self,
        start: usize,
        modifiers: &MemberModifiers<'a>,
        key: MemberKey<'a>,
        spec: MethodSpec,
        state: &ClassBodyState,
    ) -> PResult<ClassMember<'a>> {
        let parts = self.parse_method(MethodContext {
            generator: spec.generator,
            is_async: spec.is_async,
            is_constructor: spec.kind == MethodKind::Constructor,
            allow_direct_super: spec.allow_direct_super,
            in_class: true,
            allow_bodiless: true,
            directive_error_pos: span_end(key.key.span()),
        })?;

        if matches!(spec.kind, MethodKind::Get | MethodKind::Set) {
            self.check_getter_setter_params(spec.kind, parts.params, start)?;
        }
        if key.is_private {
            let kind = match (spec.kind, modifiers.is_static) {
                (MethodKind::Get, false) => ClassElementKind::KIND_GETTER,
                (MethodKind::Get, true) => ClassElementKind::STATIC_GETTER,
                (MethodKind::Set, false) => ClassElementKind::KIND_SETTER,
                (MethodKind::Set, true) => ClassElementKind::STATIC_SETTER,
                _ => ClassElementKind::OTHER,
            };
            self.declare_private_name(&key, kind)?;
        }
        if modifiers.is_abstract {
            if !state.head.contains(ClassHead::ABSTRACT) {
                self.raise(&messages::TS_NON_ABSTRACT_CLASS_HAS_ABSTRACT_METHOD, start, &[])?;
            }
            if parts.body.is_some() {
                let name = static_key_name(&key.key).unwrap_or("");
                self.raise(&messages::TS_ABSTRACT_METHOD_HAS_IMPLEMENTATION, start, &[name])?;
            }
        }

        let node_type = if parts.body.is_none() {
            ClassMethodType::TsDeclareMethod
        } else if key.is_private {
            ClassMethodType::ClassPrivateMethod
        } else {
            ClassMethodType::ClassMethod
        };
        Ok(ClassMember::Method(self.alloc(ClassMethod {
            node_type,
            data: self.finish(start),
            decorators: modifiers.decorators,
            kind: spec.kind,
            is_static: modifiers.is_static,
            key: key.key,
            computed: key.computed,
            generator: spec.generator,
            is_async: spec.is_async,
            params: parts.params,
            body: parts.body,
            accessibility: modifiers.accessibility,
            is_abstract: modifiers.is_abstract,
            is_override: modifiers.is_override,
            optional: spec.optional,
            type_parameters: parts.type_parameters,
            return_type: parts.return_type,
        })))
    }

    fn push_class_property(
        &mut self,
        start: usize,
        modifiers: &MemberModifiers<'a>,
        key: MemberKey<'a>,
        optional: bool,
    ) -> PResult<ClassMember<'a>> {
        if key.is_constructor() {
            self.raise(&messages::CONSTRUCTOR_CLASS_FIELD, key.start(), &[])?;
        }
        let type_info = dispatch!(self, Layer::OUTERMOST, parse_class_property_type()).unwrap_or_default();

        if self.is_typescript() && self.is(TokenKind::Eq) {
            let eq_pos = self.start();
            let readonly_const = modifiers.readonly && type_info.type_annotation.is_none();
            if self.state.in_ambient_context && !readonly_const {
                self.raise(&messages::TS_INITIALIZER_NOT_ALLOWED_IN_AMBIENT_CONTEXT, eq_pos, &[])?;
            }
            if modifiers.is_abstract {
                let name = static_key_name(&key.key).unwrap_or("");
                self.raise(&messages::TS_ABSTRACT_PROPERTY_HAS_INITIALIZER, eq_pos, &[name])?;
            }
        }

        // Initializers run as if in a method of the class.
        self.scope.enter(ScopeFlags::CLASS | ScopeFlags::SUPER);
        self.prod_param.enter(ParamFlags::NONE);
        let value = if self.eat(TokenKind::Eq)? { Some(self.parse_maybe_assign_allow_in(None)?) } else { None };
        self.prod_param.exit();
        self.scope.exit();
        self.semicolon()?;

        if key.is_private {
            self.declare_private_name(&key, ClassElementKind::OTHER)?;
        }
        let node_type =
            if key.is_private { ClassPropertyType::ClassPrivateProperty } else { ClassPropertyType::ClassProperty };
        Ok(ClassMember::Property(self.alloc(ClassProperty {
            node_type,
            data: self.finish(start),
            decorators: modifiers.decorators,
            is_static: modifiers.is_static,
            key: key.key,
            computed: key.computed,
            value,
            accessibility: modifiers.accessibility,
            is_abstract: modifiers.is_abstract,
            is_override: modifiers.is_override,
            optional: optional || type_info.optional,
            readonly: modifiers.readonly,
            declare: modifiers.declare,
            definite: type_info.definite,
            type_annotation: type_info.type_annotation,
            variance: modifiers.variance,
        })))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;
    use bumpalo::Bump;
    use esparse_ast::*;

    fn first_class<'a>(file: &File<'a>) -> &'a Class<'a> {
        match file.program.body.first() {
            Some(Statement::Class(class)) => class,
            other => panic!("expected a class, got {other:?}"),
        }
    }

    fn members<'a>(class: &Class<'a>) -> &'a [ClassMember<'a>] {
        match class.body {
            ClassBodyOrPlaceholder::Body(body) => body.body,
            ClassBodyOrPlaceholder::Placeholder(_) => panic!("placeholder body"),
        }
    }

    fn reason(src: &str) -> Option<&'static str> {
        let arena = Bump::new();
        let err = crate::parse(&arena, src, &ParserOptions::default()).expect_err("should fail");
        err.diagnostic().map(|d| d.reason_code())
    }

    // ========================================================================
    // Members
    // ========================================================================

    #[test]
    fn test_member_kinds() {
        let arena = Bump::new();
        let src = "class A extends B { constructor() { super(); } static x = 1; #y; get z() { return 1 } set z(v) {} static { this.w = 2 } async *gen() {} }";
        let file = crate::parse(&arena, src, &ParserOptions::default()).unwrap();
        let class = first_class(&file);
        assert!(class.super_class.is_some());
        let members = members(class);
        assert_eq!(members.len(), 7);
        match members[0] {
            ClassMember::Method(m) => assert_eq!(m.kind, MethodKind::Constructor),
            other => panic!("{other:?}"),
        }
        match members[1] {
            ClassMember::Property(p) => assert!(p.is_static),
            other => panic!("{other:?}"),
        }
        match members[2] {
            ClassMember::Property(p) => assert_eq!(p.node_type, ClassPropertyType::ClassPrivateProperty),
            other => panic!("{other:?}"),
        }
        assert!(matches!(members[5], ClassMember::StaticBlock(_)));
        match members[6] {
            ClassMember::Method(m) => assert!(m.generator && m.is_async),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_contextual_names_as_keys() {
        let arena = Bump::new();
        let src = "class A { static() {} get; set = 1; async\n foo() {} static static() {} }";
        let file = crate::parse(&arena, src, &ParserOptions::default()).unwrap();
        let members = members(first_class(&file));
        assert_eq!(members.len(), 6);
        match members[0] {
            ClassMember::Method(m) => assert!(!m.is_static),
            other => panic!("{other:?}"),
        }
        match members[5] {
            ClassMember::Method(m) => assert!(m.is_static),
            other => panic!("{other:?}"),
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_constructor_errors() {
        assert_eq!(reason("class A { constructor() {} constructor() {} }"), Some("DuplicateConstructor"));
        assert_eq!(reason("class A { get constructor() {} }"), Some("ConstructorIsAccessor"));
        assert_eq!(reason("class A { async constructor() {} }"), Some("ConstructorIsAsync"));
        assert_eq!(reason("class A { *constructor() {} }"), Some("ConstructorIsGenerator"));
        assert_eq!(reason("class A { constructor = 1 }"), Some("ConstructorClassField"));
        assert_eq!(reason("class A { #constructor }"), Some("ConstructorClassPrivateField"));
        assert_eq!(reason("class A { static prototype() {} }"), Some("StaticPrototype"));
    }

    #[test]
    fn test_private_names() {
        let arena = Bump::new();
        let ok = "class A { get #x() {} set #x(v) {} m() { return this.#x + (#x in this) } }";
        assert!(crate::parse(&arena, ok, &ParserOptions::default()).is_ok());
        assert_eq!(reason("class A { #x; #x; }"), Some("PrivateNameRedeclaration"));
        assert_eq!(reason("class A { m() { this.#y } }"), Some("InvalidPrivateFieldResolution"));
        assert_eq!(reason("this.#y"), Some("InvalidPrivateFieldResolution"));
    }

    #[test]
    fn test_class_body_is_strict() {
        assert_eq!(reason("class A { m() { with (a) {} } }"), Some("StrictWith"));
        assert_eq!(reason("class { }"), Some("ClassNameIsRequired"));
        let arena = Bump::new();
        assert!(crate::parse(&arena, "class A {}; with (a) {}", &ParserOptions::default()).is_ok());
    }

    #[test]
    fn test_getter_setter_arity() {
        assert_eq!(reason("class A { get x(a) {} }"), Some("BadGetterArity"));
        assert_eq!(reason("class A { set x() {} }"), Some("BadSetterArity"));
    }
}
