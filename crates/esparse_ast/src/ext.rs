//! Dialect extension variants.
//!
//! Each core category enum ends in an `Extension` variant pointing at one of
//! the enums below. Overlays build these nodes; the core grammar never does.

use crate::flow;
use crate::jsx;
use crate::node::{Identifier, NodeData};
use crate::ts;
use esparse_core::text::Span;
use serde::Serialize;

// ============================================================================
// Extension enums
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ExpressionExtension<'a> {
    JsxElement(&'a jsx::JsxElement<'a>),
    JsxFragment(&'a jsx::JsxFragment<'a>),
    TsAs(&'a ts::TsAsExpression<'a>),
    TsSatisfies(&'a ts::TsSatisfiesExpression<'a>),
    TsNonNull(&'a ts::TsNonNullExpression<'a>),
    TsTypeAssertion(&'a ts::TsTypeAssertion<'a>),
    TsInstantiation(&'a ts::TsInstantiationExpression<'a>),
    TsTypeCast(&'a ts::TsTypeCastExpression<'a>),
    FlowTypeCast(&'a flow::TypeCastExpression<'a>),
    Placeholder(&'a Placeholder<'a>),
    V8Intrinsic(&'a V8IntrinsicIdentifier<'a>),
    EstreeLiteral(&'a estree::Literal<'a>),
    EstreeChain(&'a estree::ChainExpression<'a>),
    EstreeImport(&'a estree::ImportExpression<'a>),
}

impl ExpressionExtension<'_> {
    pub fn data(&self) -> &NodeData {
        match self {
            ExpressionExtension::JsxElement(n) => &n.data,
            ExpressionExtension::JsxFragment(n) => &n.data,
            ExpressionExtension::TsAs(n) => &n.data,
            ExpressionExtension::TsSatisfies(n) => &n.data,
            ExpressionExtension::TsNonNull(n) => &n.data,
            ExpressionExtension::TsTypeAssertion(n) => &n.data,
            ExpressionExtension::TsInstantiation(n) => &n.data,
            ExpressionExtension::TsTypeCast(n) => &n.data,
            ExpressionExtension::FlowTypeCast(n) => &n.data,
            ExpressionExtension::Placeholder(n) => &n.data,
            ExpressionExtension::V8Intrinsic(n) => &n.data,
            ExpressionExtension::EstreeLiteral(n) => &n.data,
            ExpressionExtension::EstreeChain(n) => &n.data,
            ExpressionExtension::EstreeImport(n) => &n.data,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum StatementExtension<'a> {
    TsInterface(&'a ts::TsInterfaceDeclaration<'a>),
    TsTypeAlias(&'a ts::TsTypeAliasDeclaration<'a>),
    TsEnum(&'a ts::TsEnumDeclaration<'a>),
    TsModule(&'a ts::TsModuleDeclaration<'a>),
    FlowTypeAlias(&'a flow::TypeAlias<'a>),
    FlowOpaqueType(&'a flow::OpaqueType<'a>),
    FlowInterface(&'a flow::InterfaceDeclaration<'a>),
    FlowDeclareVariable(&'a flow::DeclareVariable<'a>),
    FlowDeclareFunction(&'a flow::DeclareFunction<'a>),
    FlowDeclareModuleExports(&'a flow::DeclareModuleExports<'a>),
    Placeholder(&'a Placeholder<'a>),
}

impl StatementExtension<'_> {
    pub fn data(&self) -> &NodeData {
        match self {
            StatementExtension::TsInterface(n) => &n.data,
            StatementExtension::TsTypeAlias(n) => &n.data,
            StatementExtension::TsEnum(n) => &n.data,
            StatementExtension::TsModule(n) => &n.data,
            StatementExtension::FlowTypeAlias(n) => &n.data,
            StatementExtension::FlowOpaqueType(n) => &n.data,
            StatementExtension::FlowInterface(n) => &n.data,
            StatementExtension::FlowDeclareVariable(n) => &n.data,
            StatementExtension::FlowDeclareFunction(n) => &n.data,
            StatementExtension::FlowDeclareModuleExports(n) => &n.data,
            StatementExtension::Placeholder(n) => &n.data,
        }
    }

    /// Whether this declaration only exists at the type level.
    pub fn is_type_only(&self) -> bool {
        !matches!(self, StatementExtension::Placeholder(_) | StatementExtension::TsEnum(_) | StatementExtension::TsModule(_))
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum PatternExtension<'a> {
    TsParameterProperty(&'a ts::TsParameterProperty<'a>),
    TsAs(&'a ts::TsAsExpression<'a>),
    TsSatisfies(&'a ts::TsSatisfiesExpression<'a>),
    TsNonNull(&'a ts::TsNonNullExpression<'a>),
    TsTypeAssertion(&'a ts::TsTypeAssertion<'a>),
    Placeholder(&'a Placeholder<'a>),
}

impl PatternExtension<'_> {
    pub fn data(&self) -> &NodeData {
        match self {
            PatternExtension::TsParameterProperty(n) => &n.data,
            PatternExtension::TsAs(n) => &n.data,
            PatternExtension::TsSatisfies(n) => &n.data,
            PatternExtension::TsNonNull(n) => &n.data,
            PatternExtension::TsTypeAssertion(n) => &n.data,
            PatternExtension::Placeholder(n) => &n.data,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ClassMemberExtension<'a> {
    TsIndexSignature(&'a ts::TsIndexSignature<'a>),
    EstreeMethod(&'a estree::MethodDefinition<'a>),
    EstreeProperty(&'a estree::PropertyDefinition<'a>),
}

impl ClassMemberExtension<'_> {
    pub fn data(&self) -> &NodeData {
        match self {
            ClassMemberExtension::TsIndexSignature(n) => &n.data,
            ClassMemberExtension::EstreeMethod(n) => &n.data,
            ClassMemberExtension::EstreeProperty(n) => &n.data,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ObjectMemberExtension<'a> {
    EstreeProperty(&'a estree::Property<'a>),
}

impl ObjectMemberExtension<'_> {
    pub fn data(&self) -> &NodeData {
        match self {
            ObjectMemberExtension::EstreeProperty(n) => &n.data,
        }
    }
}

// ============================================================================
// Placeholders and intrinsics
// ============================================================================

/// The node kind a placeholder stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaceholderKind {
    Identifier,
    StringLiteral,
    Expression,
    Statement,
    Declaration,
    BlockStatement,
    ClassBody,
    Pattern,
}

/// `%%name%%`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Placeholder<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expected_node: PlaceholderKind,
    pub name: &'a Identifier<'a>,
}

/// `%Name` used as a callee.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub struct V8IntrinsicIdentifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: &'a str,
}

impl Placeholder<'_> {
    pub fn span(&self) -> Span {
        self.data.span
    }
}

// ============================================================================
// ESTree shapes
// ============================================================================

pub mod estree {
    //! Nodes that replace their Babel counterparts under the `estree` plugin.

    use crate::node::{is_empty, Decorator, Expression, Function, NodeData, NodeList, Pattern};
    use serde::ser::Serializer;
    use serde::Serialize;

    /// The runtime value of a literal.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum LiteralValue<'a> {
        String(&'a str),
        Number(f64),
        Boolean(bool),
        Null,
        /// Regex and bigint values have no JSON form.
        Opaque,
    }

    impl Serialize for LiteralValue<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match *self {
                LiteralValue::String(s) => serializer.serialize_str(s),
                LiteralValue::Number(n) => serializer.serialize_f64(n),
                LiteralValue::Boolean(b) => serializer.serialize_bool(b),
                LiteralValue::Null | LiteralValue::Opaque => serializer.serialize_none(),
            }
        }
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    pub struct RegexInfo<'a> {
        pub pattern: &'a str,
        pub flags: &'a str,
    }

    #[derive(Debug, Serialize)]
    #[serde(tag = "type")]
    pub struct Literal<'a> {
        #[serde(flatten)]
        pub data: NodeData,
        pub value: LiteralValue<'a>,
        pub raw: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub regex: Option<RegexInfo<'a>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub bigint: Option<&'a str>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum PropertyKind {
        Init,
        Get,
        Set,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(untagged)]
    pub enum PropertyValue<'a> {
        Expression(Expression<'a>),
        Pattern(Pattern<'a>),
    }

    /// An object literal or object pattern member.
    #[derive(Debug, Serialize)]
    #[serde(tag = "type")]
    pub struct Property<'a> {
        #[serde(flatten)]
        pub data: NodeData,
        pub key: Expression<'a>,
        pub value: PropertyValue<'a>,
        pub kind: PropertyKind,
        pub method: bool,
        pub shorthand: bool,
        pub computed: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum MethodDefinitionKind {
        Constructor,
        Method,
        Get,
        Set,
    }

    #[derive(Debug, Serialize)]
    #[serde(tag = "type")]
    pub struct MethodDefinition<'a> {
        #[serde(flatten)]
        pub data: NodeData,
        #[serde(skip_serializing_if = "is_empty")]
        pub decorators: NodeList<'a, &'a Decorator<'a>>,
        #[serde(rename = "static")]
        pub is_static: bool,
        pub key: Expression<'a>,
        pub computed: bool,
        pub kind: MethodDefinitionKind,
        pub value: &'a Function<'a>,
    }

    #[derive(Debug, Serialize)]
    #[serde(tag = "type")]
    pub struct PropertyDefinition<'a> {
        #[serde(flatten)]
        pub data: NodeData,
        #[serde(skip_serializing_if = "is_empty")]
        pub decorators: NodeList<'a, &'a Decorator<'a>>,
        #[serde(rename = "static")]
        pub is_static: bool,
        pub key: Expression<'a>,
        pub computed: bool,
        pub value: Option<Expression<'a>>,
    }

    /// Wraps the outermost node of an optional chain.
    #[derive(Debug, Serialize)]
    #[serde(tag = "type")]
    pub struct ChainExpression<'a> {
        #[serde(flatten)]
        pub data: NodeData,
        pub expression: Expression<'a>,
    }

    #[derive(Debug, Serialize)]
    #[serde(tag = "type")]
    pub struct ImportExpression<'a> {
        #[serde(flatten)]
        pub data: NodeData,
        pub source: Expression<'a>,
        pub options: Option<Expression<'a>>,
    }
}
