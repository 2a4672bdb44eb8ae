//! TypeScript nodes: the type grammar, declarations and type-level
//! expressions.

use crate::node::{
    is_empty, is_false, Accessibility, Decorator, Expression, Identifier, NodeData, NodeList, Pattern, Statement,
    StringLiteral,
};
use esparse_core::text::Span;
use serde::ser::Serializer;
use serde::Serialize;

// ============================================================================
// Annotations and parameters
// ============================================================================

/// `: T` after a binding, or the return type of a signature.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeAnnotation", rename_all = "camelCase")]
pub struct TsTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_annotation: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeParameterDeclaration")]
pub struct TsTypeParameterDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub params: NodeList<'a, TsTypeParameter<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeParameter")]
pub struct TsTypeParameter<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: &'a str,
    #[serde(rename = "in", skip_serializing_if = "is_false")]
    pub is_in: bool,
    #[serde(rename = "out", skip_serializing_if = "is_false")]
    pub is_out: bool,
    #[serde(rename = "const", skip_serializing_if = "is_false")]
    pub is_const: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TsType<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<TsType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeParameterInstantiation")]
pub struct TsTypeParameterInstantiation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub params: NodeList<'a, TsType<'a>>,
}

/// `private readonly x` in a constructor parameter list.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSParameterProperty")]
pub struct TsParameterProperty<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(skip_serializing_if = "is_empty")]
    pub decorators: NodeList<'a, &'a Decorator<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(rename = "override", skip_serializing_if = "is_false")]
    pub is_override: bool,
    pub parameter: Pattern<'a>,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TsType<'a> {
    Keyword(&'a TsKeywordType),
    This(&'a TsThisType),
    TypeReference(&'a TsTypeReference<'a>),
    Array(&'a TsArrayType<'a>),
    Tuple(&'a TsTupleType<'a>),
    Optional(&'a TsOptionalType<'a>),
    Rest(&'a TsRestType<'a>),
    NamedTupleMember(&'a TsNamedTupleMember<'a>),
    Union(&'a TsUnionType<'a>),
    Intersection(&'a TsIntersectionType<'a>),
    Literal(&'a TsLiteralType<'a>),
    Function(&'a TsFunctionType<'a>),
    TypeLiteral(&'a TsTypeLiteral<'a>),
    TypeQuery(&'a TsTypeQuery<'a>),
    TypeOperator(&'a TsTypeOperator<'a>),
    IndexedAccess(&'a TsIndexedAccessType<'a>),
    Conditional(&'a TsConditionalType<'a>),
    Infer(&'a TsInferType<'a>),
    Parenthesized(&'a TsParenthesizedType<'a>),
    TypePredicate(&'a TsTypePredicate<'a>),
    Mapped(&'a TsMappedType<'a>),
}

impl TsType<'_> {
    pub fn span(&self) -> Span {
        match self {
            TsType::Keyword(n) => n.data.span,
            TsType::This(n) => n.data.span,
            TsType::TypeReference(n) => n.data.span,
            TsType::Array(n) => n.data.span,
            TsType::Tuple(n) => n.data.span,
            TsType::Optional(n) => n.data.span,
            TsType::Rest(n) => n.data.span,
            TsType::NamedTupleMember(n) => n.data.span,
            TsType::Union(n) => n.data.span,
            TsType::Intersection(n) => n.data.span,
            TsType::Literal(n) => n.data.span,
            TsType::Function(n) => n.data.span,
            TsType::TypeLiteral(n) => n.data.span,
            TsType::TypeQuery(n) => n.data.span,
            TsType::TypeOperator(n) => n.data.span,
            TsType::IndexedAccess(n) => n.data.span,
            TsType::Conditional(n) => n.data.span,
            TsType::Infer(n) => n.data.span,
            TsType::Parenthesized(n) => n.data.span,
            TsType::TypePredicate(n) => n.data.span,
            TsType::Mapped(n) => n.data.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TsKeywordKind {
    #[serde(rename = "TSAnyKeyword")]
    Any,
    #[serde(rename = "TSUnknownKeyword")]
    Unknown,
    #[serde(rename = "TSNumberKeyword")]
    Number,
    #[serde(rename = "TSObjectKeyword")]
    Object,
    #[serde(rename = "TSBooleanKeyword")]
    Boolean,
    #[serde(rename = "TSBigIntKeyword")]
    BigInt,
    #[serde(rename = "TSStringKeyword")]
    String,
    #[serde(rename = "TSSymbolKeyword")]
    Symbol,
    #[serde(rename = "TSVoidKeyword")]
    Void,
    #[serde(rename = "TSUndefinedKeyword")]
    Undefined,
    #[serde(rename = "TSNullKeyword")]
    Null,
    #[serde(rename = "TSNeverKeyword")]
    Never,
}

impl TsKeywordKind {
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "any" => TsKeywordKind::Any,
            "unknown" => TsKeywordKind::Unknown,
            "number" => TsKeywordKind::Number,
            "object" => TsKeywordKind::Object,
            "boolean" => TsKeywordKind::Boolean,
            "bigint" => TsKeywordKind::BigInt,
            "string" => TsKeywordKind::String,
            "symbol" => TsKeywordKind::Symbol,
            "void" => TsKeywordKind::Void,
            "undefined" => TsKeywordKind::Undefined,
            "null" => TsKeywordKind::Null,
            "never" => TsKeywordKind::Never,
            _ => return None,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TsKeywordType {
    #[serde(rename = "type")]
    pub kind: TsKeywordKind,
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSThisType")]
pub struct TsThisType {
    #[serde(flatten)]
    pub data: NodeData,
}

/// `A` or `A.B.C` in type position.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TsEntityName<'a> {
    Identifier(&'a Identifier<'a>),
    Qualified(&'a TsQualifiedName<'a>),
}

impl TsEntityName<'_> {
    pub fn span(&self) -> Span {
        match self {
            TsEntityName::Identifier(n) => n.data.span,
            TsEntityName::Qualified(n) => n.data.span,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSQualifiedName")]
pub struct TsQualifiedName<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub left: TsEntityName<'a>,
    pub right: &'a Identifier<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeReference", rename_all = "camelCase")]
pub struct TsTypeReference<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_name: TsEntityName<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<&'a TsTypeParameterInstantiation<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSArrayType", rename_all = "camelCase")]
pub struct TsArrayType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub element_type: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTupleType", rename_all = "camelCase")]
pub struct TsTupleType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub element_types: NodeList<'a, TsType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSOptionalType", rename_all = "camelCase")]
pub struct TsOptionalType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_annotation: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSRestType", rename_all = "camelCase")]
pub struct TsRestType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_annotation: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSNamedTupleMember", rename_all = "camelCase")]
pub struct TsNamedTupleMember<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub label: &'a Identifier<'a>,
    pub optional: bool,
    pub element_type: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSUnionType")]
pub struct TsUnionType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub types: NodeList<'a, TsType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSIntersectionType")]
pub struct TsIntersectionType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub types: NodeList<'a, TsType<'a>>,
}

/// A string, numeric, boolean, bigint or template literal type.
/// Negative numbers are a unary minus expression.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSLiteralType")]
pub struct TsLiteralType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub literal: Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TsFunctionTypeKind {
    #[serde(rename = "TSFunctionType")]
    Function,
    #[serde(rename = "TSConstructorType")]
    Constructor,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TsFunctionType<'a> {
    #[serde(rename = "type")]
    pub kind: TsFunctionTypeKind,
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<&'a TsTypeParameterDeclaration<'a>>,
    pub parameters: NodeList<'a, Pattern<'a>>,
    pub type_annotation: Option<&'a TsTypeAnnotation<'a>>,
    #[serde(rename = "abstract", skip_serializing_if = "is_false")]
    pub is_abstract: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeLiteral")]
pub struct TsTypeLiteral<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub members: NodeList<'a, TsTypeElement<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeQuery", rename_all = "camelCase")]
pub struct TsTypeQuery<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expr_name: TsEntityName<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<&'a TsTypeParameterInstantiation<'a>>,
}

/// `keyof T`, `unique symbol`, `readonly T[]`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeOperator", rename_all = "camelCase")]
pub struct TsTypeOperator<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub operator: &'a str,
    pub type_annotation: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSIndexedAccessType", rename_all = "camelCase")]
pub struct TsIndexedAccessType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub object_type: TsType<'a>,
    pub index_type: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSConditionalType", rename_all = "camelCase")]
pub struct TsConditionalType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub check_type: TsType<'a>,
    pub extends_type: TsType<'a>,
    pub true_type: TsType<'a>,
    pub false_type: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSInferType", rename_all = "camelCase")]
pub struct TsInferType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_parameter: &'a TsTypeParameter<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSParenthesizedType", rename_all = "camelCase")]
pub struct TsParenthesizedType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_annotation: TsType<'a>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TsPredicateName<'a> {
    Identifier(&'a Identifier<'a>),
    This(&'a TsThisType),
}

/// `x is T`, `asserts x`, `asserts x is T`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypePredicate", rename_all = "camelCase")]
pub struct TsTypePredicate<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub parameter_name: TsPredicateName<'a>,
    pub type_annotation: Option<&'a TsTypeAnnotation<'a>>,
    pub asserts: bool,
}

/// `+`, `-` or a bare modifier on a mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsMappedModifier {
    Present,
    Plus,
    Minus,
}

impl Serialize for TsMappedModifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TsMappedModifier::Present => serializer.serialize_bool(true),
            TsMappedModifier::Plus => serializer.serialize_str("+"),
            TsMappedModifier::Minus => serializer.serialize_str("-"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSMappedType", rename_all = "camelCase")]
pub struct TsMappedType<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<TsMappedModifier>,
    pub type_parameter: &'a TsTypeParameter<'a>,
    pub name_type: Option<TsType<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<TsMappedModifier>,
    pub type_annotation: Option<TsType<'a>>,
}

// ============================================================================
// Type members
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TsTypeElement<'a> {
    Property(&'a TsPropertySignature<'a>),
    Method(&'a TsMethodSignature<'a>),
    Index(&'a TsIndexSignature<'a>),
    Signature(&'a TsSignatureDeclaration<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSPropertySignature", rename_all = "camelCase")]
pub struct TsPropertySignature<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub key: Expression<'a>,
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    pub type_annotation: Option<&'a TsTypeAnnotation<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TsMethodSignatureKind {
    Method,
    Get,
    Set,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSMethodSignature", rename_all = "camelCase")]
pub struct TsMethodSignature<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub key: Expression<'a>,
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    pub kind: TsMethodSignatureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<&'a TsTypeParameterDeclaration<'a>>,
    pub parameters: NodeList<'a, Pattern<'a>>,
    pub type_annotation: Option<&'a TsTypeAnnotation<'a>>,
}

/// `[key: string]: T`. Also a class member.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSIndexSignature", rename_all = "camelCase")]
pub struct TsIndexSignature<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub parameters: NodeList<'a, &'a Identifier<'a>>,
    pub type_annotation: Option<&'a TsTypeAnnotation<'a>>,
    #[serde(skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(rename = "static", skip_serializing_if = "is_false")]
    pub is_static: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TsSignatureKind {
    #[serde(rename = "TSCallSignatureDeclaration")]
    Call,
    #[serde(rename = "TSConstructSignatureDeclaration")]
    Construct,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TsSignatureDeclaration<'a> {
    #[serde(rename = "type")]
    pub kind: TsSignatureKind,
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<&'a TsTypeParameterDeclaration<'a>>,
    pub parameters: NodeList<'a, Pattern<'a>>,
    pub type_annotation: Option<&'a TsTypeAnnotation<'a>>,
}

// ============================================================================
// Declarations
// ============================================================================

/// An `extends` entry of an interface or an `implements` entry of a class.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSExpressionWithTypeArguments", rename_all = "camelCase")]
pub struct TsExpressionWithTypeArguments<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: TsEntityName<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<&'a TsTypeParameterInstantiation<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSInterfaceDeclaration", rename_all = "camelCase")]
pub struct TsInterfaceDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<&'a TsTypeParameterDeclaration<'a>>,
    #[serde(skip_serializing_if = "is_empty")]
    pub extends: NodeList<'a, &'a TsExpressionWithTypeArguments<'a>>,
    pub body: &'a TsInterfaceBody<'a>,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSInterfaceBody")]
pub struct TsInterfaceBody<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub body: NodeList<'a, TsTypeElement<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeAliasDeclaration", rename_all = "camelCase")]
pub struct TsTypeAliasDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<&'a TsTypeParameterDeclaration<'a>>,
    pub type_annotation: TsType<'a>,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSEnumDeclaration")]
pub struct TsEnumDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
    pub members: NodeList<'a, TsEnumMember<'a>>,
    #[serde(rename = "const", skip_serializing_if = "is_false")]
    pub is_const: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

/// `id` is an identifier or a string literal.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSEnumMember")]
pub struct TsEnumMember<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: Expression<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression<'a>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TsModuleName<'a> {
    Identifier(&'a Identifier<'a>),
    String(&'a StringLiteral<'a>),
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum TsModuleBody<'a> {
    Block(&'a TsModuleBlock<'a>),
    /// The inner part of `namespace A.B {}`.
    Declaration(&'a TsModuleDeclaration<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TsModuleKind {
    Global,
    Module,
    Namespace,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSModuleDeclaration")]
pub struct TsModuleDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: TsModuleName<'a>,
    pub kind: TsModuleKind,
    /// `None` for `declare module "m";`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<TsModuleBody<'a>>,
    #[serde(skip_serializing_if = "is_false")]
    pub declare: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSModuleBlock")]
pub struct TsModuleBlock<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
}

// ============================================================================
// Type-level expressions
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSAsExpression", rename_all = "camelCase")]
pub struct TsAsExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
    pub type_annotation: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSSatisfiesExpression", rename_all = "camelCase")]
pub struct TsSatisfiesExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
    pub type_annotation: TsType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSNonNullExpression")]
pub struct TsNonNullExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
}

/// `(x: T)` inside parentheses. Only valid as an arrow parameter; the
/// parser converts it to an annotated pattern or reports it.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeCastExpression", rename_all = "camelCase")]
pub struct TsTypeCastExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
    pub type_annotation: &'a TsTypeAnnotation<'a>,
}

/// `<T>expr`, only outside TSX.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSTypeAssertion", rename_all = "camelCase")]
pub struct TsTypeAssertion<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_annotation: TsType<'a>,
    pub expression: Expression<'a>,
}

/// `f<T>` not followed by a call.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TSInstantiationExpression", rename_all = "camelCase")]
pub struct TsInstantiationExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
    pub type_parameters: &'a TsTypeParameterInstantiation<'a>,
}
