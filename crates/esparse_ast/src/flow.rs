//! Flow nodes: the type grammar, type declarations and type casts.

use crate::node::{is_empty, Expression, Identifier, NodeData, NodeList};
use esparse_core::text::Span;
use serde::Serialize;

// ============================================================================
// Annotations and parameters
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TypeAnnotation", rename_all = "camelCase")]
pub struct FlowTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_annotation: FlowType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TypeParameterDeclaration")]
pub struct FlowTypeParameterDeclaration<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub params: NodeList<'a, FlowTypeParameter<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TypeParameter")]
pub struct FlowTypeParameter<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: &'a str,
    pub variance: Option<&'a Variance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<&'a FlowTypeAnnotation<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FlowType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "TypeParameterInstantiation")]
pub struct FlowTypeParameterInstantiation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub params: NodeList<'a, FlowType<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceKind {
    Plus,
    Minus,
}

/// `+` or `-` before a property or type parameter.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct Variance {
    #[serde(flatten)]
    pub data: NodeData,
    pub kind: VarianceKind,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum FlowType<'a> {
    Keyword(&'a FlowKeywordType),
    Nullable(&'a NullableTypeAnnotation<'a>),
    Union(&'a UnionTypeAnnotation<'a>),
    Intersection(&'a IntersectionTypeAnnotation<'a>),
    Array(&'a ArrayTypeAnnotation<'a>),
    Generic(&'a GenericTypeAnnotation<'a>),
    Object(&'a ObjectTypeAnnotation<'a>),
    Function(&'a FunctionTypeAnnotation<'a>),
    Typeof(&'a TypeofTypeAnnotation<'a>),
    Tuple(&'a TupleTypeAnnotation<'a>),
    StringLiteral(&'a StringLiteralTypeAnnotation<'a>),
    NumberLiteral(&'a NumberLiteralTypeAnnotation<'a>),
    BooleanLiteral(&'a BooleanLiteralTypeAnnotation),
}

impl FlowType<'_> {
    pub fn span(&self) -> Span {
        match self {
            FlowType::Keyword(n) => n.data.span,
            FlowType::Nullable(n) => n.data.span,
            FlowType::Union(n) => n.data.span,
            FlowType::Intersection(n) => n.data.span,
            FlowType::Array(n) => n.data.span,
            FlowType::Generic(n) => n.data.span,
            FlowType::Object(n) => n.data.span,
            FlowType::Function(n) => n.data.span,
            FlowType::Typeof(n) => n.data.span,
            FlowType::Tuple(n) => n.data.span,
            FlowType::StringLiteral(n) => n.data.span,
            FlowType::NumberLiteral(n) => n.data.span,
            FlowType::BooleanLiteral(n) => n.data.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowKeywordKind {
    #[serde(rename = "AnyTypeAnnotation")]
    Any,
    #[serde(rename = "MixedTypeAnnotation")]
    Mixed,
    #[serde(rename = "EmptyTypeAnnotation")]
    Empty,
    #[serde(rename = "BooleanTypeAnnotation")]
    Boolean,
    #[serde(rename = "NumberTypeAnnotation")]
    Number,
    #[serde(rename = "StringTypeAnnotation")]
    String,
    #[serde(rename = "SymbolTypeAnnotation")]
    Symbol,
    #[serde(rename = "BigIntTypeAnnotation")]
    BigInt,
    #[serde(rename = "VoidTypeAnnotation")]
    Void,
    #[serde(rename = "NullLiteralTypeAnnotation")]
    Null,
    #[serde(rename = "ThisTypeAnnotation")]
    This,
    #[serde(rename = "ExistsTypeAnnotation")]
    Exists,
}

impl FlowKeywordKind {
    /// Primitive type names. `void` and `null` are keywords handled by the
    /// caller.
    pub fn from_text(text: &str) -> Option<Self> {
        Some(match text {
            "any" => FlowKeywordKind::Any,
            "mixed" => FlowKeywordKind::Mixed,
            "empty" => FlowKeywordKind::Empty,
            "bool" | "boolean" => FlowKeywordKind::Boolean,
            "number" => FlowKeywordKind::Number,
            "string" => FlowKeywordKind::String,
            "symbol" => FlowKeywordKind::Symbol,
            "bigint" => FlowKeywordKind::BigInt,
            _ => return None,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FlowKeywordType {
    #[serde(rename = "type")]
    pub kind: FlowKeywordKind,
    #[serde(flatten)]
    pub data: NodeData,
}

/// `?T`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct NullableTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_annotation: FlowType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct UnionTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub types: NodeList<'a, FlowType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct IntersectionTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub types: NodeList<'a, FlowType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ArrayTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub element_type: FlowType<'a>,
}

/// `A` or `A.B` in type position.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum FlowTypeId<'a> {
    Identifier(&'a Identifier<'a>),
    Qualified(&'a QualifiedTypeIdentifier<'a>),
}

impl FlowTypeId<'_> {
    pub fn span(&self) -> Span {
        match self {
            FlowTypeId::Identifier(n) => n.data.span,
            FlowTypeId::Qualified(n) => n.data.span,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct QualifiedTypeIdentifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub qualification: FlowTypeId<'a>,
    pub id: &'a Identifier<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct GenericTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: FlowTypeId<'a>,
    pub type_parameters: Option<&'a FlowTypeParameterInstantiation<'a>>,
}

/// `{ a: T }`, exact `{| a: T |}` or explicitly inexact `{ a: T, ... }`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ObjectTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectTypeMember<'a>>,
    pub indexers: NodeList<'a, &'a ObjectTypeIndexer<'a>>,
    pub call_properties: NodeList<'a, &'a ObjectTypeCallProperty<'a>>,
    pub exact: bool,
    pub inexact: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ObjectTypeMember<'a> {
    Property(&'a ObjectTypeProperty<'a>),
    Spread(&'a ObjectTypeSpreadProperty<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ObjectTypeProperty<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    /// An identifier or string literal.
    pub key: Expression<'a>,
    pub value: FlowType<'a>,
    pub optional: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub method: bool,
    pub kind: &'static str,
    pub variance: Option<&'a Variance>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ObjectTypeSpreadProperty<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub argument: FlowType<'a>,
}

/// `[K]: V` or `[name: K]: V`.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ObjectTypeIndexer<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: Option<&'a Identifier<'a>>,
    pub key: FlowType<'a>,
    pub value: FlowType<'a>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub variance: Option<&'a Variance>,
}

/// `(x: T): U` inside an object type.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct ObjectTypeCallProperty<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: &'a FunctionTypeAnnotation<'a>,
    #[serde(rename = "static")]
    pub is_static: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct FunctionTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_parameters: Option<&'a FlowTypeParameterDeclaration<'a>>,
    pub params: NodeList<'a, &'a FunctionTypeParam<'a>>,
    pub rest: Option<&'a FunctionTypeParam<'a>>,
    pub return_type: FlowType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct FunctionTypeParam<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Option<&'a Identifier<'a>>,
    pub optional: bool,
    pub type_annotation: FlowType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct TypeofTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub argument: FlowType<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct TupleTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub types: NodeList<'a, FlowType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct StringLiteralTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: &'a str,
    pub raw: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct NumberLiteralTypeAnnotation<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: f64,
    pub raw: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct BooleanLiteralTypeAnnotation {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: bool,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeAliasKind {
    TypeAlias,
    DeclareTypeAlias,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAlias<'a> {
    #[serde(rename = "type")]
    pub kind: TypeAliasKind,
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
    pub type_parameters: Option<&'a FlowTypeParameterDeclaration<'a>>,
    pub right: FlowType<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpaqueTypeKind {
    OpaqueType,
    DeclareOpaqueType,
}

/// `impltype` is `None` only for the declare form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueType<'a> {
    #[serde(rename = "type")]
    pub kind: OpaqueTypeKind,
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
    pub type_parameters: Option<&'a FlowTypeParameterDeclaration<'a>>,
    pub supertype: Option<FlowType<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impltype: Option<FlowType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct InterfaceExtends<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: FlowTypeId<'a>,
    pub type_parameters: Option<&'a FlowTypeParameterInstantiation<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterfaceKind {
    InterfaceDeclaration,
    DeclareInterface,
    DeclareClass,
}

/// `interface`, `declare interface` and `declare class`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDeclaration<'a> {
    #[serde(rename = "type")]
    pub kind: InterfaceKind,
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
    pub type_parameters: Option<&'a FlowTypeParameterDeclaration<'a>>,
    pub extends: NodeList<'a, &'a InterfaceExtends<'a>>,
    #[serde(skip_serializing_if = "is_empty")]
    pub implements: NodeList<'a, &'a ClassImplements<'a>>,
    pub body: &'a ObjectTypeAnnotation<'a>,
}

/// `declare var x: T;`. The annotation sits on the identifier.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct DeclareVariable<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
}

/// `declare function f(x: T): U;`. The function type sits on the
/// identifier's annotation.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct DeclareFunction<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
}

/// `declare module.exports: T;`
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct DeclareModuleExports<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_annotation: &'a FlowTypeAnnotation<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct ClassImplements<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub id: &'a Identifier<'a>,
    pub type_parameters: Option<&'a FlowTypeParameterInstantiation<'a>>,
}

/// `(expr: T)`. Only valid inside parentheses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct TypeCastExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
    pub type_annotation: &'a FlowTypeAnnotation<'a>,
}
