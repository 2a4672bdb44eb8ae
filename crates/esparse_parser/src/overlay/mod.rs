//! Grammar overlays.
//!
//! Each plugin that changes the grammar is an [`Overlay`]: a stateless value
//! that may take over a hook point and either handle the construct itself or
//! resume the chain at the next layer. Overlays are composed once per parse,
//! outermost first, and a hook call starting at [`Layer`] `n` visits the
//! overlays from index `n` on before falling back to the base grammar.
//!
//! A hook returns `Ok(None)` to decline, which hands the call to the next
//! overlay. To wrap the rest of the chain instead, an overlay calls the
//! matching `*_from(layer, ..)` method on the parser with the layer it was
//! given.

use crate::class::{MemberModifiers, PropertyTypeInfo};
use crate::expression::{ExpressionErrors, SubscriptState};
use crate::lval::BindingPosition;
use crate::options::{PluginSet, Plugins};
use crate::parser::{PResult, Parser};
use crate::statement::StatementContext;
use crate::utilities::{span_end, span_start};
use esparse_ast::{
    ArrayPattern, AssignmentPattern, BindingName, ClassBodyOrPlaceholder, ClassImplements, ClassMember, Decorator,
    Directive, Expression, ExpressionExtension, Identifier, ImportKind, NodeData, ObjectMember, ObjectMemberExtension,
    ObjectPattern, ObjectPatternMember, Pattern, PatternProperty, RestElement, Statement, TokenKind, TypeAnnotation,
    TypeArguments, TypeParameters,
};
use esparse_core::text::Span;
use esparse_scanner::LexerFeatures;

pub(crate) mod estree_shape;
pub(crate) mod flow;
pub(crate) mod jsx;
pub(crate) mod placeholders;
pub(crate) mod typescript;
pub(crate) mod v8intrinsic;

/// Position in the composed overlay list a hook call starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer(pub(crate) usize);

impl Layer {
    /// Start from the outermost overlay.
    pub const OUTERMOST: Layer = Layer(0);
}

/// Build the overlay list for a plugin set, outermost first.
pub(crate) fn compose(plugins: &PluginSet) -> Vec<&'static dyn Overlay> {
    let mut overlays: Vec<&'static dyn Overlay> = Vec::new();
    if plugins.has(Plugins::ESTREE) {
        overlays.push(&estree_shape::EstreeOverlay);
    }
    if plugins.has(Plugins::TYPESCRIPT) {
        overlays.push(&typescript::TypeScriptOverlay);
    }
    if plugins.has(Plugins::FLOW) {
        overlays.push(&flow::FlowOverlay);
    }
    if plugins.has(Plugins::JSX) {
        overlays.push(&jsx::JsxOverlay);
    }
    if plugins.has(Plugins::V8INTRINSIC) {
        overlays.push(&v8intrinsic::V8IntrinsicOverlay);
    }
    if plugins.has(Plugins::PLACEHOLDERS) {
        overlays.push(&placeholders::PlaceholdersOverlay);
    }
    overlays
}

/// Run a hook over the overlays from `layer` on. Evaluates to the first
/// handled result, or `None` when every overlay declined.
macro_rules! dispatch {
    ($p:expr, $layer:expr, $hook:ident($($arg:expr),* $(,)?)) => {{
        let overlays = $p.overlays;
        let mut handled = None;
        for (index, overlay) in overlays.iter().enumerate().skip($layer.0) {
            if let Some(result) = overlay.$hook($p, $crate::overlay::Layer(index + 1) $(, $arg)*)? {
                handled = Some(result);
                break;
            }
        }
        handled
    }};
}
pub(crate) use dispatch;

/// Attach `?` and a type annotation to a binding, stretching its span to
/// `end`. Shared by the type dialects.
pub(crate) fn annotate_pattern<'a>(
    p: &Parser<'a>,
    pattern: Pattern<'a>,
    optional: bool,
    annotation: Option<TypeAnnotation<'a>>,
    end: usize,
) -> Pattern<'a> {
    let start = span_start(pattern.span());
    match pattern {
        Pattern::Identifier(id) => Pattern::Identifier(p.alloc(Identifier {
            data: p.finish_at(start, end),
            name: id.name,
            optional: optional || id.optional,
            type_annotation: annotation.or(id.type_annotation),
        })),
        Pattern::Object(object) => Pattern::Object(p.alloc(ObjectPattern {
            data: p.finish_at(start, end),
            properties: object.properties,
            type_annotation: annotation.or(object.type_annotation),
        })),
        Pattern::Array(array) => Pattern::Array(p.alloc(ArrayPattern {
            data: p.finish_at(start, end),
            elements: array.elements,
            type_annotation: annotation.or(array.type_annotation),
        })),
        Pattern::Rest(rest) => Pattern::Rest(p.alloc(RestElement {
            data: p.finish_at(start, end),
            argument: rest.argument,
            type_annotation: annotation.or(rest.type_annotation),
        })),
        Pattern::Assignment(assign) => Pattern::Assignment(p.alloc(AssignmentPattern {
            data: NodeData::new(assign.data.span),
            left: annotate_pattern(p, assign.left, optional, annotation, span_end(assign.left.span())),
            right: assign.right,
        })),
        Pattern::Member(_) | Pattern::Extension(_) => pattern,
    }
}

/// Whether the contextual `type` (or `typeof`) at the current token marks
/// an import or export kind rather than naming a binding.
pub(crate) fn import_kind_applies(p: &mut Parser<'_>, in_specifier: bool) -> PResult<bool> {
    let la = p.lookahead()?;
    if in_specifier {
        // `{ type }` and `{ type as x }` name a binding called `type`.
        return Ok((la.kind.is_keyword_or_name() || la.kind == TokenKind::String) && !la.is_contextual("as"));
    }
    if matches!(la.kind, TokenKind::BraceL | TokenKind::Star) {
        return Ok(true);
    }
    if la.kind != TokenKind::Name || p.scanner.last_tok_kind() != TokenKind::Import {
        return Ok(false);
    }
    // `import type from "x"` imports a default binding named `type`.
    if la.is_contextual("from") {
        return Ok(!matches!(next_non_space_char(p, la.end), Some('"' | '\'')));
    }
    Ok(true)
}

fn next_non_space_char(p: &Parser<'_>, mut pos: usize) -> Option<char> {
    while let Some(ch) = p.char_at(pos) {
        if !ch.is_whitespace() {
            return Some(ch);
        }
        pos += ch.len_utf8();
    }
    None
}

/// A grammar extension. Every hook defaults to declining.
#[allow(unused_variables)]
pub trait Overlay: Sync {
    fn name(&self) -> &'static str;

    /// Scanner features this overlay needs.
    fn lexer_features(&self) -> LexerFeatures {
        LexerFeatures::empty()
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_maybe_assign<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    fn parse_conditional<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        expr: Expression<'a>,
        start: usize,
        errors: Option<&mut ExpressionErrors>,
    ) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    /// One binary operator step: combine `left` with the operator at the
    /// current token and its right operand.
    fn parse_expr_op<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        left: Expression<'a>,
        left_start: usize,
        min_prec: u8,
    ) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    fn parse_maybe_unary<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    fn parse_subscript<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        base: Expression<'a>,
        start: usize,
        state: &mut SubscriptState,
    ) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    fn parse_expr_atom<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    /// An item of a parenthesized list, after its expression.
    fn parse_paren_item<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        expr: Expression<'a>,
        start: usize,
    ) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    /// Type arguments at a call, `new` or heritage position.
    fn parse_type_arguments<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<TypeArguments<'a>>> {
        Ok(None)
    }

    // ========================================================================
    // Patterns and functions
    // ========================================================================

    fn parse_binding_atom<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<Pattern<'a>>> {
        Ok(None)
    }

    /// A parameter, before its own atom is read.
    fn parse_assignable_list_item<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        decorators: &'a [&'a Decorator<'a>],
    ) -> PResult<Option<Pattern<'a>>> {
        Ok(None)
    }

    /// `?` and `: T` after a binding. Returns the annotated pattern and
    /// whether a definite-assignment `!` was present.
    fn parse_binding_annotation<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        pattern: Pattern<'a>,
        position: BindingPosition,
    ) -> PResult<Option<(Pattern<'a>, bool)>> {
        Ok(None)
    }

    /// The name of a function or class declaration.
    fn parse_declaration_id<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<BindingName<'a>>> {
        Ok(None)
    }

    fn parse_type_parameters<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<TypeParameters<'a>>> {
        Ok(None)
    }

    fn parse_return_type<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<TypeAnnotation<'a>>> {
        Ok(None)
    }

    /// Whether a function may end without a body here.
    fn allows_missing_body(&self, p: &Parser<'_>) -> bool {
        false
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn parse_class_implements<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
    ) -> PResult<Option<&'a [ClassImplements<'a>]>> {
        Ok(None)
    }

    fn parse_class_body<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<ClassBodyOrPlaceholder<'a>>> {
        Ok(None)
    }

    /// Modifiers ahead of a class member key.
    fn parse_class_member_modifiers<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        modifiers: &mut MemberModifiers<'a>,
    ) -> PResult<Option<()>> {
        Ok(None)
    }

    /// A member the core grammar has no production for.
    fn parse_class_member_extension<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        start: usize,
        modifiers: &MemberModifiers<'a>,
    ) -> PResult<Option<ClassMember<'a>>> {
        Ok(None)
    }

    /// `?`, `!` and `: T` after a member key.
    fn parse_class_property_type<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<PropertyTypeInfo<'a>>> {
        Ok(None)
    }

    // ========================================================================
    // Statements and modules
    // ========================================================================

    fn parse_statement<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        context: StatementContext,
    ) -> PResult<Option<Statement<'a>>> {
        Ok(None)
    }

    /// A declaration after `export` that the core grammar does not know.
    fn parse_export_declaration<'a>(&self, p: &mut Parser<'a>, layer: Layer) -> PResult<Option<Statement<'a>>> {
        Ok(None)
    }

    /// `type`/`typeof` after `import` or `export`, or inside specifier braces.
    fn parse_import_kind<'a>(&self, p: &mut Parser<'a>, layer: Layer, in_specifier: bool) -> PResult<Option<ImportKind>> {
        Ok(None)
    }

    // ========================================================================
    // Node finishing
    // ========================================================================

    fn finish_literal<'a>(&self, p: &mut Parser<'a>, layer: Layer, expr: Expression<'a>) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    fn finish_object_member<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        member: ObjectMember<'a>,
    ) -> PResult<Option<ObjectMember<'a>>> {
        Ok(None)
    }

    fn finish_pattern_property<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        property: &'a PatternProperty<'a>,
    ) -> PResult<Option<ObjectPatternMember<'a>>> {
        Ok(None)
    }

    fn finish_class_member<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        member: ClassMember<'a>,
    ) -> PResult<Option<ClassMember<'a>>> {
        Ok(None)
    }

    fn finish_import_call<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        span: Span,
        source: Expression<'a>,
        options: Option<Expression<'a>>,
    ) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    /// The outermost link of a chain containing `?.`.
    fn finish_optional_chain<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        expr: Expression<'a>,
    ) -> PResult<Option<Expression<'a>>> {
        Ok(None)
    }

    /// Replace a directive prologue with statements.
    fn finish_directives<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        directives: &'a [Directive<'a>],
    ) -> PResult<Option<Vec<Statement<'a>>>> {
        Ok(None)
    }

    // ========================================================================
    // Assignment targets
    // ========================================================================

    /// Convert a dialect expression into an assignment target.
    fn to_assignable_extension<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        ext: &'a ExpressionExtension<'a>,
        is_binding: bool,
    ) -> PResult<Option<Pattern<'a>>> {
        Ok(None)
    }

    fn to_assignable_member<'a>(
        &self,
        p: &mut Parser<'a>,
        layer: Layer,
        member: &'a ObjectMemberExtension<'a>,
        is_binding: bool,
    ) -> PResult<Option<ObjectPatternMember<'a>>> {
        Ok(None)
    }
}
