//! JSX nodes.

use crate::node::{Expression, NodeData, NodeList, StringLiteral, TypeArguments};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXElement", rename_all = "camelCase")]
pub struct JsxElement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub opening_element: &'a JsxOpeningElement<'a>,
    pub closing_element: Option<&'a JsxClosingElement<'a>>,
    pub children: NodeList<'a, JsxChild<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXOpeningElement", rename_all = "camelCase")]
pub struct JsxOpeningElement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: JsxElementName<'a>,
    pub attributes: NodeList<'a, JsxAttributeItem<'a>>,
    pub self_closing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<TypeArguments<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXClosingElement")]
pub struct JsxClosingElement<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: JsxElementName<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXFragment", rename_all = "camelCase")]
pub struct JsxFragment<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub opening_fragment: &'a JsxOpeningFragment,
    pub closing_fragment: &'a JsxClosingFragment,
    pub children: NodeList<'a, JsxChild<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXOpeningFragment")]
pub struct JsxOpeningFragment {
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXClosingFragment")]
pub struct JsxClosingFragment {
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum JsxElementName<'a> {
    Identifier(&'a JsxIdentifier<'a>),
    Namespaced(&'a JsxNamespacedName<'a>),
    Member(&'a JsxMemberExpression<'a>),
}

impl<'a> JsxElementName<'a> {
    /// The qualified name used to match opening and closing tags.
    pub fn qualified_name(&self) -> String {
        match self {
            JsxElementName::Identifier(id) => id.name.to_string(),
            JsxElementName::Namespaced(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
            JsxElementName::Member(member) => member.qualified_name(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXIdentifier")]
pub struct JsxIdentifier<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXNamespacedName")]
pub struct JsxNamespacedName<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub namespace: &'a JsxIdentifier<'a>,
    pub name: &'a JsxIdentifier<'a>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum JsxMemberObject<'a> {
    Identifier(&'a JsxIdentifier<'a>),
    Member(&'a JsxMemberExpression<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXMemberExpression")]
pub struct JsxMemberExpression<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub object: JsxMemberObject<'a>,
    pub property: &'a JsxIdentifier<'a>,
}

impl JsxMemberExpression<'_> {
    pub fn qualified_name(&self) -> String {
        let object = match self.object {
            JsxMemberObject::Identifier(id) => id.name.to_string(),
            JsxMemberObject::Member(member) => member.qualified_name(),
        };
        format!("{}.{}", object, self.property.name)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum JsxAttributeItem<'a> {
    Attribute(&'a JsxAttribute<'a>),
    Spread(&'a JsxSpreadAttribute<'a>),
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum JsxAttributeName<'a> {
    Identifier(&'a JsxIdentifier<'a>),
    Namespaced(&'a JsxNamespacedName<'a>),
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum JsxAttributeValue<'a> {
    String(&'a StringLiteral<'a>),
    Container(&'a JsxExpressionContainer<'a>),
    Element(&'a JsxElement<'a>),
    Fragment(&'a JsxFragment<'a>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXAttribute")]
pub struct JsxAttribute<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: JsxAttributeName<'a>,
    pub value: Option<JsxAttributeValue<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXSpreadAttribute")]
pub struct JsxSpreadAttribute<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub argument: Expression<'a>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum JsxExpression<'a> {
    Expression(Expression<'a>),
    Empty(&'a JsxEmptyExpression),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXExpressionContainer")]
pub struct JsxExpressionContainer<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: JsxExpression<'a>,
}

/// The hole in `{}` or `{/* comment */}`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXEmptyExpression")]
pub struct JsxEmptyExpression {
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXSpreadChild")]
pub struct JsxSpreadChild<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression<'a>,
}

/// Text between tags. `value` has entities decoded.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "JSXText")]
pub struct JsxText<'a> {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: &'a str,
    pub raw: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum JsxChild<'a> {
    Text(&'a JsxText<'a>),
    Container(&'a JsxExpressionContainer<'a>),
    Spread(&'a JsxSpreadChild<'a>),
    Element(&'a JsxElement<'a>),
    Fragment(&'a JsxFragment<'a>),
}

