//! Core AST node definitions.
//!
//! Nodes follow the Babel AST shape so the serialized tree can be consumed by
//! existing tooling. Every category enum is serialized untagged and every
//! node struct writes its own `"type"` tag, which lets dialect nodes reached
//! through an `Extension` variant show their own type name.
//!
//! Children are arena references and lists are arena slices.

use crate::ext::{
    ClassMemberExtension, ExpressionExtension, ObjectMemberExtension, PatternExtension, Placeholder,
    StatementExtension,
};
use crate::flags::NodeFlags;
use crate::flow;
use crate::token::{Comment, TokenOrComment};
use crate::ts;
use esparse_core::text::Span;
use esparse_diagnostics::Diagnostic;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::cell::Cell;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// Source location.
    pub span: Span,
    /// Node flags. A cell so a finished node can be marked parenthesized.
    pub flags: Cell<NodeFlags>,
}

impl NodeData {
    #[inline]
    pub fn new(span: Span) -> Self {
        Self {
            span,
            flags: Cell::new(NodeFlags::NONE),
        }
    }

    #[inline]
    pub fn set_flag(&self, flag: NodeFlags) {
        self.flags.set(self.flags.get() | flag);
    }

    #[inline]
    pub fn is_parenthesized(&self) -> bool {
        self.flags.get().is_parenthesized()
    }
}

impl Serialize for NodeData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let parenthesized = self.is_parenthesized();
        let mut state = serializer.serialize_struct("NodeData", 3 + parenthesized as usize)?;
        state.serialize_field("start", &self.span.start.index)?;
        state.serialize_field("end", &self.span.end.index)?;
        state.serialize_field("loc", &self.span)?;
        if parenthesized {
            state.serialize_field("extra", &Extra { parenthesized })?;
        }
        state.end()
    }
}

#[derive(Serialize)]
struct Extra {
    parenthesized: bool,
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_empty<T>(list: &&[T]) -> bool {
    list.is_empty()
}

// ============================================================================
// Root
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Script,
    Module,
}

/// The result of a full parse.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct File<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub program: &'a Program<'a>,
    pub comments: Vec<Comment<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenOrComment<'a>>>,
    pub errors: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comment_attachments: Vec<NodeComments>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_filename: Option<String>,
}

/// The result of parsing a single expression.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionFile<'a> {
    pub expression: Expression<'a>,
    pub comments: Vec<Comment<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenOrComment<'a>>>,
    pub errors: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comment_attachments: Vec<NodeComments>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Program<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub source_type: SourceType,
    pub interpreter: Option<&'a InterpreterDirective<'a>>,
    pub body: NodeList<'a, Statement<'a>>,
    pub directives: NodeList<'a, Directive<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct InterpreterDirective<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct Directive<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: &'a DirectiveLiteral<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct DirectiveLiteral<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: &'a str,
    pub raw: &'a str,
}

/// Comments attached to one node, as indices into [`File::comments`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeComments {
    pub start: u32,
    pub end: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub leading: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trailing: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inner: Vec<u32>,
}

// ============================================================================
// Dialect type hooks
// ============================================================================

/// A type annotation from either type dialect.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TypeAnnotation<'a> {
    Ts(&'a ts::TsTypeAnnotation<'a>),
    Flow(&'a flow::FlowTypeAnnotation<'a>),
}

impl TypeAnnotation<'_> {
    pub fn span(&self) -> Span {
        match self {
            TypeAnnotation::Ts(n) => n.data.span,
            TypeAnnotation::Flow(n) => n.data.span,
        }
    }
}

/// Declared type parameters `<T, U>`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TypeParameters<'a> {
    Ts(&'a ts::TsTypeParameterDeclaration<'a>),
    Flow(&'a flow::FlowTypeParameterDeclaration<'a>),
}

/// Type arguments supplied at a use site.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TypeArguments<'a> {
    Ts(&'a ts::TsTypeParameterInstantiation<'a>),
    Flow(&'a flow::FlowTypeParameterInstantiation<'a>),
}

impl TypeArguments<'_> {
    pub fn span(&self) -> Span {
        match self {
            TypeArguments::Ts(n) => n.data.span,
            TypeArguments::Flow(n) => n.data.span,
        }
    }
}

/// An entry of a class `implements` clause.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ClassImplements<'a> {
    Ts(&'a ts::TsExpressionWithTypeArguments<'a>),
    Flow(&'a flow::ClassImplements<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Public,
    Private,
    Protected,
}

impl Accessibility {
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "public" => Some(Accessibility::Public),
            "private" => Some(Accessibility::Private),
            "protected" => Some(Accessibility::Protected),
            _ => None,
        }
    }
}

// ============================================================================
// Identifiers and Literals
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Identifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: &'a str,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<TypeAnnotation<'a>>,
}

impl<'a> Identifier<'a> {
    pub fn new(span: Span, name: &'a str) -> Self {
        Self {
            data: NodeData::new(span),
            name,
            optional: false,
            type_annotation: None,
        }
    }
}

/// `#name`. The identifier holds the name without the hash.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct PrivateName<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct StringLiteral<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: &'a str,
    pub raw: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct NumericLiteral<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: f64,
    pub raw: &'a str,
}

/// `value` holds the digits without separators or the `n` suffix.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct BigIntLiteral<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: &'a str,
    pub raw: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct BooleanLiteral {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct NullLiteral {
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct RegExpLiteral<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub pattern: &'a str,
    pub flags: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct TemplateLiteral<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub quasis: NodeList<'a, TemplateElement<'a>>,
    pub expressions: NodeList<'a, Expression<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct TemplateElement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: TemplateElementValue<'a>,
    pub tail: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateElementValue<'a> {
    pub raw: &'a str,
    /// `None` when the chunk holds an escape that is only legal when tagged.
    pub cooked: Option<&'a str>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Expression<'a> {
    Identifier(&'a Identifier<'a>),
    PrivateName(&'a PrivateName<'a>),
    StringLiteral(&'a StringLiteral<'a>),
    NumericLiteral(&'a NumericLiteral<'a>),
    BigIntLiteral(&'a BigIntLiteral<'a>),
    BooleanLiteral(&'a BooleanLiteral),
    NullLiteral(&'a NullLiteral),
    RegExpLiteral(&'a RegExpLiteral<'a>),
    TemplateLiteral(&'a TemplateLiteral<'a>),
    TaggedTemplate(&'a TaggedTemplateExpression<'a>),
    This(&'a ThisExpression),
    Super(&'a Super),
    Import(&'a Import),
    Array(&'a ArrayExpression<'a>),
    Object(&'a ObjectExpression<'a>),
    Function(&'a Function<'a>),
    ArrowFunction(&'a ArrowFunctionExpression<'a>),
    Class(&'a Class<'a>),
    Unary(&'a UnaryExpression<'a>),
    Update(&'a UpdateExpression<'a>),
    Binary(&'a BinaryExpression<'a>),
    Logical(&'a LogicalExpression<'a>),
    Assignment(&'a AssignmentExpression<'a>),
    Conditional(&'a ConditionalExpression<'a>),
    Call(&'a CallExpression<'a>),
    New(&'a NewExpression<'a>),
    Member(&'a MemberExpression<'a>),
    Sequence(&'a SequenceExpression<'a>),
    Yield(&'a YieldExpression<'a>),
    Await(&'a AwaitExpression<'a>),
    MetaProperty(&'a MetaProperty<'a>),
    Parenthesized(&'a ParenthesizedExpression<'a>),
    Extension(&'a ExpressionExtension<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ThisExpression {
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct Super {
    #[serde(flatten)]
    pub data: NodeData,
}

/// The callee of a dynamic `import(...)` call.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct Import {
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct TaggedTemplateExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub tag: Expression<'a>,
    pub quasi: &'a TemplateLiteral<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeArguments<'a>>,
}

/// An element of an array literal or an argument list.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ExprOrSpread<'a> {
    Expression(Expression<'a>),
    Spread(&'a SpreadElement<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct SpreadElement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub argument: Expression<'a>,
}

/// `[a, , ...b]`. Holes are `None`.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ArrayExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub elements: NodeList<'a, Option<ExprOrSpread<'a>>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ObjectExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectMember<'a>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ObjectMember<'a> {
    Property(&'a ObjectProperty<'a>),
    Method(&'a ObjectMethod<'a>),
    Spread(&'a SpreadElement<'a>),
    Extension(&'a ObjectMemberExtension<'a>),
}

/// `key: value` or shorthand `key`. A shorthand `{a = 1}` holds an
/// assignment expression that only survives conversion to a pattern.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ObjectProperty<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub method: bool,
    pub key: Expression<'a>,
    pub computed: bool,
    pub shorthand: bool,
    pub value: Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ObjectMethod<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub kind: MethodKind,
    pub method: bool,
    pub key: Expression<'a>,
    pub computed: bool,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub params: NodeList<'a, Pattern<'a>>,
    pub body: &'a BlockStatement<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeParameters<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeAnnotation<'a>>,
}

/// Which Babel node a [`Function`] serializes as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionType {
    FunctionDeclaration,
    FunctionExpression,
    #[serde(rename = "TSDeclareFunction")]
    TsDeclareFunction,
}

/// A binding name that may also be a placeholder.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum BindingName<'a> {
    Identifier(&'a Identifier<'a>),
    Placeholder(&'a Placeholder<'a>),
}

impl<'a> BindingName<'a> {
    pub fn as_identifier(&self) -> Option<&'a Identifier<'a>> {
        match *self {
            BindingName::Identifier(id) => Some(id),
            BindingName::Placeholder(_) => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Function<'a> {
    #[serde(rename = "type")]
    pub kind: FunctionType,
    #[serde(flatten)]
    pub data: NodeData,
    pub id: Option<BindingName<'a>>,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub params: NodeList<'a, Pattern<'a>>,
    /// `None` only for `TSDeclareFunction`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a BlockStatement<'a>>,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeParameters<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeAnnotation<'a>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ArrowBody<'a> {
    Block(&'a BlockStatement<'a>),
    Expression(Expression<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ArrowFunctionExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: Option<&'a Identifier<'a>>,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub params: NodeList<'a, Pattern<'a>>,
    pub body: ArrowBody<'a>,
    /// True when the body is an expression.
    pub expression: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeParameters<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeAnnotation<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "~")]
    BitwiseNot,
    #[serde(rename = "typeof")]
    Typeof,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "delete")]
    Delete,
}

impl UnaryOperator {
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "-" => UnaryOperator::Minus,
            "+" => UnaryOperator::Plus,
            "!" => UnaryOperator::Not,
            "~" => UnaryOperator::BitwiseNot,
            "typeof" => UnaryOperator::Typeof,
            "void" => UnaryOperator::Void,
            "delete" => UnaryOperator::Delete,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct UnaryExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub operator: UnaryOperator,
    pub prefix: bool,
    pub argument: Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOperator {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

impl UpdateOperator {
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "++" => Some(UpdateOperator::Increment),
            "--" => Some(UpdateOperator::Decrement),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct UpdateExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "===")]
    StrictEqual,
    #[serde(rename = "!==")]
    StrictNotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
    #[serde(rename = ">>>")]
    ShiftRightZeroFill,
    #[serde(rename = "+")]
    Addition,
    #[serde(rename = "-")]
    Subtraction,
    #[serde(rename = "*")]
    Multiplication,
    #[serde(rename = "/")]
    Division,
    #[serde(rename = "%")]
    Remainder,
    #[serde(rename = "**")]
    Exponential,
    #[serde(rename = "|")]
    BitwiseOr,
    #[serde(rename = "^")]
    BitwiseXor,
    #[serde(rename = "&")]
    BitwiseAnd,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    Instanceof,
}

impl BinaryOperator {
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "==" => BinaryOperator::Equal,
            "!=" => BinaryOperator::NotEqual,
            "===" => BinaryOperator::StrictEqual,
            "!==" => BinaryOperator::StrictNotEqual,
            "<" => BinaryOperator::LessThan,
            "<=" => BinaryOperator::LessEqual,
            ">" => BinaryOperator::GreaterThan,
            ">=" => BinaryOperator::GreaterEqual,
            "<<" => BinaryOperator::ShiftLeft,
            ">>" => BinaryOperator::ShiftRight,
            ">>>" => BinaryOperator::ShiftRightZeroFill,
            "+" => BinaryOperator::Addition,
            "-" => BinaryOperator::Subtraction,
            "*" => BinaryOperator::Multiplication,
            "/" => BinaryOperator::Division,
            "%" => BinaryOperator::Remainder,
            "**" => BinaryOperator::Exponential,
            "|" => BinaryOperator::BitwiseOr,
            "^" => BinaryOperator::BitwiseXor,
            "&" => BinaryOperator::BitwiseAnd,
            "in" => BinaryOperator::In,
            "instanceof" => BinaryOperator::Instanceof,
            _ => return None,
        })
    }
}

/// `left` is a private name only for `#x in obj`.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct BinaryExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub operator: BinaryOperator,
    pub left: Expression<'a>,
    pub right: Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOperator {
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "??")]
    Coalesce,
}

impl LogicalOperator {
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "||" => Some(LogicalOperator::Or),
            "&&" => Some(LogicalOperator::And),
            "??" => Some(LogicalOperator::Coalesce),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct LogicalExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub operator: LogicalOperator,
    pub left: Expression<'a>,
    pub right: Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignmentOperator {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    Addition,
    #[serde(rename = "-=")]
    Subtraction,
    #[serde(rename = "*=")]
    Multiplication,
    #[serde(rename = "/=")]
    Division,
    #[serde(rename = "%=")]
    Remainder,
    #[serde(rename = "**=")]
    Exponential,
    #[serde(rename = "<<=")]
    ShiftLeft,
    #[serde(rename = ">>=")]
    ShiftRight,
    #[serde(rename = ">>>=")]
    ShiftRightZeroFill,
    #[serde(rename = "|=")]
    BitwiseOr,
    #[serde(rename = "^=")]
    BitwiseXor,
    #[serde(rename = "&=")]
    BitwiseAnd,
    #[serde(rename = "||=")]
    LogicalOr,
    #[serde(rename = "&&=")]
    LogicalAnd,
    #[serde(rename = "??=")]
    LogicalNullish,
}

impl AssignmentOperator {
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "=" => AssignmentOperator::Assign,
            "+=" => AssignmentOperator::Addition,
            "-=" => AssignmentOperator::Subtraction,
            "*=" => AssignmentOperator::Multiplication,
            "/=" => AssignmentOperator::Division,
            "%=" => AssignmentOperator::Remainder,
            "**=" => AssignmentOperator::Exponential,
            "<<=" => AssignmentOperator::ShiftLeft,
            ">>=" => AssignmentOperator::ShiftRight,
            ">>>=" => AssignmentOperator::ShiftRightZeroFill,
            "|=" => AssignmentOperator::BitwiseOr,
            "^=" => AssignmentOperator::BitwiseXor,
            "&=" => AssignmentOperator::BitwiseAnd,
            "||=" => AssignmentOperator::LogicalOr,
            "&&=" => AssignmentOperator::LogicalAnd,
            "??=" => AssignmentOperator::LogicalNullish,
            _ => return None,
        })
    }

    /// Logical assignments only accept simple targets.
    pub fn is_logical(self) -> bool {
        matches!(
            self,
            AssignmentOperator::LogicalOr | AssignmentOperator::LogicalAnd | AssignmentOperator::LogicalNullish
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub operator: AssignmentOperator,
    pub left: Pattern<'a>,
    pub right: Expression<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ConditionalExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub test: Expression<'a>,
    pub consequent: Expression<'a>,
    pub alternate: Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallType {
    CallExpression,
    OptionalCallExpression,
}

/// `optional` is `Some` only inside an optional chain.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallExpression<'a> {
    #[serde(rename = "type")]
    pub kind: CallType,
    #[serde(flatten)]
    pub data: NodeData,
    pub callee: Expression<'a>,
    pub arguments: NodeList<'a, ExprOrSpread<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeArguments<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct NewExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub callee: Expression<'a>,
    pub arguments: NodeList<'a, ExprOrSpread<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeArguments<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemberType {
    MemberExpression,
    OptionalMemberExpression,
}

/// `property` is an identifier, a private name, or any expression when
/// `computed`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberExpression<'a> {
    #[serde(rename = "type")]
    pub kind: MemberType,
    #[serde(flatten)]
    pub data: NodeData,
    pub object: Expression<'a>,
    pub computed: bool,
    pub property: Expression<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct SequenceExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expressions: NodeList<'a, Expression<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct YieldExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub delegate: bool,
    pub argument: Option<Expression<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct AwaitExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub argument: Expression<'a>,
}

/// `new.target` and `import.meta`.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct MetaProperty<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub meta: &'a Identifier<'a>,
    pub property: &'a Identifier<'a>,
}

/// Only produced with `create_parenthesized_expressions`.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ParenthesizedExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
}

// ============================================================================
// Classes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassType {
    ClassDeclaration,
    ClassExpression,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct Decorator<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ClassBodyOrPlaceholder<'a> {
    Body(&'a ClassBody<'a>),
    Placeholder(&'a Placeholder<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class<'a> {
    #[serde(rename = "type")]
    pub kind: ClassType,
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(skip_serializing_if = "is_empty")]
    pub decorators: NodeList<'a, &'a Decorator<'a>>,
    pub id: Option<BindingName<'a>>,
    pub super_class: Option<Expression<'a>>,
    pub body: ClassBodyOrPlaceholder<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeParameters<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_type_parameters: Option<TypeArguments<'a>>,
    #[serde(skip_serializing_if = "is_empty")]
    pub implements: NodeList<'a, ClassImplements<'a>>,
    #[serde(rename = "abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ClassBody<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub body: NodeList<'a, ClassMember<'a>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ClassMember<'a> {
    Method(&'a ClassMethod<'a>),
    Property(&'a ClassProperty<'a>),
    StaticBlock(&'a StaticBlock<'a>),
    Extension(&'a ClassMemberExtension<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassMethodType {
    ClassMethod,
    ClassPrivateMethod,
    #[serde(rename = "TSDeclareMethod")]
    TsDeclareMethod,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMethod<'a> {
    #[serde(rename = "type")]
    pub node_type: ClassMethodType,
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(skip_serializing_if = "is_empty")]
    pub decorators: NodeList<'a, &'a Decorator<'a>>,
    pub kind: MethodKind,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub key: Expression<'a>,
    pub computed: bool,
    pub generator: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub params: NodeList<'a, Pattern<'a>>,
    /// `None` for `TSDeclareMethod`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a BlockStatement<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    #[serde(rename = "abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    #[serde(rename = "override", skip_serializing_if = "is_false")]
    pub is_override: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeParameters<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeAnnotation<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassPropertyType {
    ClassProperty,
    ClassPrivateProperty,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProperty<'a> {
    #[serde(rename = "type")]
    pub node_type: ClassPropertyType,
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(skip_serializing_if = "is_empty")]
    pub decorators: NodeList<'a, &'a Decorator<'a>>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub key: Expression<'a>,
    pub computed: bool,
    pub value: Option<Expression<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    #[serde(rename = "abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    #[serde(rename = "override", skip_serializing_if = "is_false")]
    pub is_override: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub definite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<TypeAnnotation<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<&'a flow::Variance>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct StaticBlock<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
}

// ============================================================================
// Patterns
// ============================================================================

/// An assignment target or binding pattern.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Pattern<'a> {
    Identifier(&'a Identifier<'a>),
    Object(&'a ObjectPattern<'a>),
    Array(&'a ArrayPattern<'a>),
    Rest(&'a RestElement<'a>),
    Assignment(&'a AssignmentPattern<'a>),
    /// Only valid as an assignment target, never as a binding.
    Member(&'a MemberExpression<'a>),
    Extension(&'a PatternExtension<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ObjectPattern<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectPatternMember<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<TypeAnnotation<'a>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ObjectPatternMember<'a> {
    Property(&'a PatternProperty<'a>),
    Rest(&'a RestElement<'a>),
    Estree(&'a crate::ext::estree::Property<'a>),
}

/// A property inside an object pattern.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "ObjectProperty")]
pub struct PatternProperty<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub method: bool,
    pub key: Expression<'a>,
    pub computed: bool,
    pub shorthand: bool,
    pub value: Pattern<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ArrayPattern<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub elements: NodeList<'a, Option<Pattern<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<TypeAnnotation<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct RestElement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub argument: Pattern<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<TypeAnnotation<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentPattern<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub left: Pattern<'a>,
    pub right: Expression<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Statement<'a> {
    Expression(&'a ExpressionStatement<'a>),
    Block(&'a BlockStatement<'a>),
    Empty(&'a EmptyStatement),
    Debugger(&'a DebuggerStatement),
    With(&'a WithStatement<'a>),
    Return(&'a ReturnStatement<'a>),
    Labeled(&'a LabeledStatement<'a>),
    Break(&'a BreakStatement<'a>),
    Continue(&'a ContinueStatement<'a>),
    If(&'a IfStatement<'a>),
    Switch(&'a SwitchStatement<'a>),
    Throw(&'a ThrowStatement<'a>),
    Try(&'a TryStatement<'a>),
    While(&'a WhileStatement<'a>),
    DoWhile(&'a DoWhileStatement<'a>),
    For(&'a ForStatement<'a>),
    ForIn(&'a ForInStatement<'a>),
    ForOf(&'a ForOfStatement<'a>),
    Function(&'a Function<'a>),
    Variable(&'a VariableDeclaration<'a>),
    Class(&'a Class<'a>),
    Module(ModuleItem<'a>),
    Extension(&'a StatementExtension<'a>),
}

/// `directive` is only set for the ESTree shape.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ExpressionStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct BlockStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
    pub directives: NodeList<'a, Directive<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct EmptyStatement {
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct DebuggerStatement {
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct WithStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub object: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ReturnStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub argument: Option<Expression<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct LabeledStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub label: &'a Identifier<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct BreakStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub label: Option<&'a Identifier<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ContinueStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub label: Option<&'a Identifier<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct IfStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub test: Expression<'a>,
    pub consequent: Statement<'a>,
    pub alternate: Option<Statement<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct SwitchStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub discriminant: Expression<'a>,
    pub cases: NodeList<'a, SwitchCase<'a>>,
}

/// `test` is `None` for `default:`.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct SwitchCase<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub test: Option<Expression<'a>>,
    pub consequent: NodeList<'a, Statement<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ThrowStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub argument: Expression<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct TryStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub block: &'a BlockStatement<'a>,
    pub handler: Option<&'a CatchClause<'a>>,
    pub finalizer: Option<&'a BlockStatement<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct CatchClause<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub param: Option<Pattern<'a>>,
    pub body: &'a BlockStatement<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct WhileStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub test: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct DoWhileStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub body: Statement<'a>,
    pub test: Expression<'a>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ForInit<'a> {
    Variable(&'a VariableDeclaration<'a>),
    Expression(Expression<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ForStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub init: Option<ForInit<'a>>,
    pub test: Option<Expression<'a>>,
    pub update: Option<Expression<'a>>,
    pub body: Statement<'a>,
}

/// The left side of a for-in/of head.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ForLeft<'a> {
    Variable(&'a VariableDeclaration<'a>),
    Pattern(Pattern<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ForInStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub left: ForLeft<'a>,
    pub right: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ForOfStatement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(rename = "await")]
    pub is_await: bool,
    pub left: ForLeft<'a>,
    pub right: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct VariableDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub kind: VariableKind,
    pub declarations: NodeList<'a, VariableDeclarator<'a>>,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct VariableDeclarator<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: Pattern<'a>,
    pub init: Option<Expression<'a>>,
    #[serde(skip_serializing_if = "is_false")]
    pub definite: bool,
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ModuleItem<'a> {
    Import(&'a ImportDeclaration<'a>),
    ExportNamed(&'a ExportNamedDeclaration<'a>),
    ExportDefault(&'a ExportDefaultDeclaration<'a>),
    ExportAll(&'a ExportAllDeclaration<'a>),
}

/// `value`, `type` or `typeof` on imports and exports in the type dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Value,
    Type,
    Typeof,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ImportDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub specifiers: NodeList<'a, ImportSpecifierKind<'a>>,
    pub source: &'a StringLiteral<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_kind: Option<ImportKind>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ImportSpecifierKind<'a> {
    Named(&'a ImportSpecifier<'a>),
    Default(&'a ImportDefaultSpecifier<'a>),
    Namespace(&'a ImportNamespaceSpecifier<'a>),
}

/// An identifier, or a string for arbitrary module namespace names.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ModuleExportName<'a> {
    Identifier(&'a Identifier<'a>),
    String(&'a StringLiteral<'a>),
}

impl<'a> ModuleExportName<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            ModuleExportName::Identifier(id) => id.name,
            ModuleExportName::String(s) => s.value,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ModuleExportName::Identifier(id) => id.data.span,
            ModuleExportName::String(s) => s.data.span,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ImportSpecifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub imported: ModuleExportName<'a>,
    pub local: &'a Identifier<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_kind: Option<ImportKind>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ImportDefaultSpecifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub local: &'a Identifier<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ImportNamespaceSpecifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub local: &'a Identifier<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ExportNamedDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub declaration: Option<Statement<'a>>,
    pub specifiers: NodeList<'a, ExportSpecifierKind<'a>>,
    pub source: Option<&'a StringLiteral<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ImportKind>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ExportSpecifierKind<'a> {
    Named(&'a ExportSpecifier<'a>),
    Namespace(&'a ExportNamespaceSpecifier<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ExportSpecifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub local: ModuleExportName<'a>,
    pub exported: ModuleExportName<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ImportKind>,
}

/// `export * as ns from "m"`.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ExportNamespaceSpecifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub exported: ModuleExportName<'a>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ExportDefaultKind<'a> {
    Function(&'a Function<'a>),
    Class(&'a Class<'a>),
    Expression(Expression<'a>),
    Extension(&'a StatementExtension<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ExportDefaultDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub declaration: ExportDefaultKind<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ExportAllDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub source: &'a StringLiteral<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_kind: Option<ImportKind>,
}
