//! The `jsx` plugin: elements and fragments in expression position.
//!
//! The scanner tracks tag and child contexts and hands out `JsxTagStart`,
//! `JsxName`, `JsxText` and `JsxTagEnd` tokens; this overlay assembles them.
//! Every `next()` inside an element therefore reads the following token in
//! the context the current one established.

use super::{Layer, Overlay};
use crate::parser::{PResult, Parser};
use crate::utilities::span_start;
use esparse_ast::jsx::*;
use esparse_ast::{Expression, ExpressionExtension, NodeData, StringLiteral, TokenKind};
use esparse_diagnostics::messages;
use esparse_scanner::LexerFeatures;

pub(crate) struct JsxOverlay;

#[derive(Clone, Copy)]
enum Node<'a> {
    Element(&'a JsxElement<'a>),
    Fragment(&'a JsxFragment<'a>),
}

enum Opening<'a> {
    Element(&'a JsxOpeningElement<'a>),
    Fragment(&'a JsxOpeningFragment),
}

/// A tag or attribute name before any `.` member access.
enum TagName<'a> {
    Plain(&'a JsxIdentifier<'a>),
    Namespaced(&'a JsxNamespacedName<'a>),
}

enum Closing<'a> {
    Element(&'a JsxClosingElement<'a>),
    Fragment(&'a JsxClosingFragment),
}

impl Closing<'_> {
    fn data(&self) -> &NodeData {
        match self {
            Closing::Element(el) => &el.data,
            Closing::Fragment(frag) => &frag.data,
        }
    }
}

impl JsxOverlay {
    // ========================================================================
    // Elements
    // ========================================================================

    /// An element or fragment at its `JsxTagStart`.
    fn parse_element<'a>(p: &mut Parser<'a>) -> PResult<Node<'a>> {
        let start = p.start();
        p.next()?;
        Self::parse_element_at(p, start)
    }

    /// After the `<` of an opening tag.
    fn parse_element_at<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Node<'a>> {
        p.with_recursion_guard(|p| {
            let opening = Self::parse_opening_at(p, start)?;
            let self_closing = matches!(opening, Opening::Element(el) if el.self_closing);
            let mut children = Vec::new();
            let closing = if self_closing { None } else { Some(Self::parse_children(p, &mut children)?) };
            let children = p.alloc_vec(children);

            let node = match (opening, closing) {
                (Opening::Fragment(opening_fragment), Some(closing)) => {
                    let closing_fragment = match closing {
                        Closing::Fragment(frag) => frag,
                        Closing::Element(el) => {
                            p.raise(&messages::JSX_MISSING_CLOSING_TAG_FRAGMENT, span_start(el.data.span), &[])?;
                            p.alloc(JsxClosingFragment { data: NodeData::new(el.data.span) })
                        }
                    };
                    Node::Fragment(p.alloc(JsxFragment {
                        data: p.finish(start),
                        opening_fragment,
                        closing_fragment,
                        children,
                    }))
                }
                (Opening::Fragment(_), None) => return Err(p.unexpected()),
                (Opening::Element(opening_element), closing) => {
                    let closing_element = match closing {
                        None => None,
                        Some(closing) => Some(Self::match_closing(p, opening_element, closing)?),
                    };
                    Node::Element(p.alloc(JsxElement {
                        data: p.finish(start),
                        opening_element,
                        closing_element,
                        children,
                    }))
                }
            };

            if p.is(TokenKind::Lt) {
                return Err(p.error_at(&messages::JSX_UNWRAPPED_ADJACENT_ELEMENTS, p.start(), &[]));
            }
            Ok(node)
        })
    }

    /// The closing tag must repeat the opening tag's name.
    fn match_closing<'a>(
        p: &mut Parser<'a>,
        opening: &'a JsxOpeningElement<'a>,
        closing: Closing<'a>,
    ) -> PResult<&'a JsxClosingElement<'a>> {
        let expected = opening.name.qualified_name();
        let matches = match closing {
            Closing::Element(el) => el.name.qualified_name() == expected,
            Closing::Fragment(_) => false,
        };
        if !matches {
            p.raise(&messages::JSX_MISSING_CLOSING_TAG_ELEMENT, span_start(closing.data().span), &[&expected])?;
        }
        Ok(match closing {
            Closing::Element(el) => el,
            Closing::Fragment(frag) => p.alloc(JsxClosingElement { data: NodeData::new(frag.data.span), name: opening.name }),
        })
    }

    fn parse_opening_at<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Opening<'a>> {
        if p.eat(TokenKind::JsxTagEnd)? {
            return Ok(Opening::Fragment(p.alloc(JsxOpeningFragment { data: p.finish(start) })));
        }
        let name = Self::parse_element_name(p)?;
        let mut attributes = Vec::new();
        while !p.is(TokenKind::Slash) && !p.is(TokenKind::JsxTagEnd) {
            attributes.push(Self::parse_attribute(p)?);
        }
        let self_closing = p.eat(TokenKind::Slash)?;
        p.expect(TokenKind::JsxTagEnd)?;
        let attributes = p.alloc_vec(attributes);
        Ok(Opening::Element(p.alloc(JsxOpeningElement {
            data: p.finish(start),
            name,
            attributes,
            self_closing,
            type_parameters: None,
        })))
    }

    /// After the `</` of a closing tag.
    fn parse_closing_at<'a>(p: &mut Parser<'a>, start: usize) -> PResult<Closing<'a>> {
        if p.eat(TokenKind::JsxTagEnd)? {
            return Ok(Closing::Fragment(p.alloc(JsxClosingFragment { data: p.finish(start) })));
        }
        let name = Self::parse_element_name(p)?;
        p.expect(TokenKind::JsxTagEnd)?;
        Ok(Closing::Element(p.alloc(JsxClosingElement { data: p.finish(start), name })))
    }

    /// Children up to and including the closing tag.
    fn parse_children<'a>(p: &mut Parser<'a>, children: &mut Vec<JsxChild<'a>>) -> PResult<Closing<'a>> {
        loop {
            match p.token() {
                TokenKind::JsxTagStart => {
                    let start = p.start();
                    p.next()?;
                    if p.eat(TokenKind::Slash)? {
                        return Self::parse_closing_at(p, start);
                    }
                    children.push(match Self::parse_element_at(p, start)? {
                        Node::Element(el) => JsxChild::Element(el),
                        Node::Fragment(frag) => JsxChild::Fragment(frag),
                    });
                }
                TokenKind::JsxText => {
                    let start = p.start();
                    let end = p.token_end();
                    let value = p.token_value().as_str().unwrap_or("");
                    let raw = p.source(start, end);
                    p.next()?;
                    children.push(JsxChild::Text(p.alloc(JsxText { data: p.finish_at(start, end), value, raw })));
                }
                TokenKind::BraceL => {
                    let start = p.start();
                    p.next()?;
                    if p.eat(TokenKind::Ellipsis)? {
                        let expression = p.parse_expression()?;
                        p.expect(TokenKind::BraceR)?;
                        children.push(JsxChild::Spread(p.alloc(JsxSpreadChild { data: p.finish(start), expression })));
                    } else {
                        children.push(JsxChild::Container(Self::parse_expression_container(p, start)?));
                    }
                }
                _ => return Err(p.unexpected()),
            }
        }
    }

    /// After the `{` of a container.
    fn parse_expression_container<'a>(p: &mut Parser<'a>, start: usize) -> PResult<&'a JsxExpressionContainer<'a>> {
        let expression = if p.is(TokenKind::BraceR) {
            JsxExpression::Empty(p.alloc(JsxEmptyExpression { data: p.finish_at(p.last_end(), p.start()) }))
        } else {
            JsxExpression::Expression(p.parse_expression()?)
        };
        p.expect(TokenKind::BraceR)?;
        Ok(p.alloc(JsxExpressionContainer { data: p.finish(start), expression }))
    }

    // ========================================================================
    // Names and attributes
    // ========================================================================

    fn parse_identifier<'a>(p: &mut Parser<'a>) -> PResult<&'a JsxIdentifier<'a>> {
        let start = p.start();
        let name = match p.token() {
            TokenKind::JsxName => p.token_value().as_str().unwrap_or(""),
            kind if kind.is_keyword() => kind.label(),
            _ => return Err(p.unexpected()),
        };
        p.next()?;
        Ok(p.alloc(JsxIdentifier { data: p.finish(start), name }))
    }

    /// `name` or `ns:name`.
    fn parse_namespaced_name<'a>(p: &mut Parser<'a>) -> PResult<TagName<'a>> {
        let start = p.start();
        let namespace = Self::parse_identifier(p)?;
        if !p.eat(TokenKind::Colon)? {
            return Ok(TagName::Plain(namespace));
        }
        let name = Self::parse_identifier(p)?;
        Ok(TagName::Namespaced(p.alloc(JsxNamespacedName { data: p.finish(start), namespace, name })))
    }

    fn parse_element_name<'a>(p: &mut Parser<'a>) -> PResult<JsxElementName<'a>> {
        let start = p.start();
        let mut object = match Self::parse_namespaced_name(p)? {
            TagName::Plain(id) => JsxMemberObject::Identifier(id),
            TagName::Namespaced(namespaced) => return Ok(JsxElementName::Namespaced(namespaced)),
        };
        let mut member = None;
        while p.eat(TokenKind::Dot)? {
            let property = Self::parse_identifier(p)?;
            let node = p.alloc(JsxMemberExpression { data: p.finish(start), object, property });
            object = JsxMemberObject::Member(node);
            member = Some(node);
        }
        Ok(match (member, object) {
            (Some(node), _) => JsxElementName::Member(node),
            (None, JsxMemberObject::Identifier(id)) => JsxElementName::Identifier(id),
            (None, JsxMemberObject::Member(node)) => JsxElementName::Member(node),
        })
    }

    fn parse_attribute<'a>(p: &mut Parser<'a>) -> PResult<JsxAttributeItem<'a>> {
        let start = p.start();
        if p.eat(TokenKind::BraceL)? {
            p.expect(TokenKind::Ellipsis)?;
            let argument = p.parse_maybe_assign_allow_in(None)?;
            p.expect(TokenKind::BraceR)?;
            return Ok(JsxAttributeItem::Spread(p.alloc(JsxSpreadAttribute { data: p.finish(start), argument })));
        }
        let name = match Self::parse_namespaced_name(p)? {
            TagName::Plain(id) => JsxAttributeName::Identifier(id),
            TagName::Namespaced(namespaced) => JsxAttributeName::Namespaced(namespaced),
        };
        let value = if p.eat(TokenKind::Eq)? { Some(Self::parse_attribute_value(p)?) } else { None };
        Ok(JsxAttributeItem::Attribute(p.alloc(JsxAttribute { data: p.finish(start), name, value })))
    }

    fn parse_attribute_value<'a>(p: &mut Parser<'a>) -> PResult<JsxAttributeValue<'a>> {
        let start = p.start();
        match p.token() {
            TokenKind::BraceL => {
                p.next()?;
                let container = Self::parse_expression_container(p, start)?;
                match container.expression {
                    JsxExpression::Empty(_) => p.raise(&messages::JSX_ATTRIBUTE_IS_EMPTY, start, &[])?,
                    JsxExpression::Expression(Expression::Sequence(seq)) if !seq.data.is_parenthesized() => {
                        p.raise(&messages::JSX_UNEXPECTED_SEQUENCE_EXPRESSION, span_start(seq.data.span), &[])?
                    }
                    JsxExpression::Expression(_) => {}
                }
                Ok(JsxAttributeValue::Container(container))
            }
            TokenKind::JsxTagStart => Ok(match Self::parse_element(p)? {
                Node::Element(el) => JsxAttributeValue::Element(el),
                Node::Fragment(frag) => JsxAttributeValue::Fragment(frag),
            }),
            TokenKind::String => {
                let end = p.token_end();
                let value = p.token_value().as_str().unwrap_or("");
                let raw = p.source(start, end);
                p.next()?;
                Ok(JsxAttributeValue::String(p.alloc(StringLiteral { data: p.finish_at(start, end), value, raw })))
            }
            _ => Err(p.error_at(&messages::JSX_UNSUPPORTED_VALUE, start, &[])),
        }
    }
}

impl Overlay for JsxOverlay {
    fn name(&self) -> &'static str {
        "jsx"
    }

    fn lexer_features(&self) -> LexerFeatures {
        LexerFeatures::JSX
    }

    fn parse_expr_atom<'a>(&self, p: &mut Parser<'a>, _layer: Layer) -> PResult<Option<Expression<'a>>> {
        match p.token() {
            TokenKind::JsxTagStart => {}
            // `<` where the scanner expected an operand, e.g. after `? :`.
            TokenKind::Lt if p.char_at(p.token_end()) != Some('!') => p.scanner.replace_token(TokenKind::JsxTagStart),
            _ => return Ok(None),
        }
        let ext = match Self::parse_element(p)? {
            Node::Element(el) => ExpressionExtension::JsxElement(el),
            Node::Fragment(frag) => ExpressionExtension::JsxFragment(frag),
        };
        Ok(Some(Expression::Extension(p.alloc(ext))))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;
    use bumpalo::Bump;
    use esparse_ast::jsx::*;
    use esparse_ast::*;

    fn jsx() -> ParserOptions {
        ParserOptions::default().with_plugin("jsx")
    }

    fn element<'a>(file: &File<'a>) -> &'a JsxElement<'a> {
        match file.program.body.first() {
            Some(Statement::Expression(stmt)) => match stmt.expression {
                Expression::Extension(ExpressionExtension::JsxElement(el)) => el,
                other => panic!("expected an element, got {other:?}"),
            },
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    fn reason(src: &str) -> Option<&'static str> {
        let arena = Bump::new();
        let err = crate::parse(&arena, src, &jsx()).expect_err("should fail");
        err.diagnostic().map(|d| d.reason_code())
    }

    // ========================================================================
    // Elements
    // ========================================================================

    #[test]
    fn test_attributes_and_children() {
        let arena = Bump::new();
        let file = crate::parse(&arena, r#"<div className="a" {...rest} data-x>hi {name}</div>;"#, &jsx()).unwrap();
        let el = element(&file);
        assert_eq!(el.opening_element.name.qualified_name(), "div");
        assert_eq!(el.opening_element.attributes.len(), 3);
        match el.opening_element.attributes[0] {
            JsxAttributeItem::Attribute(attr) => {
                assert!(matches!(attr.value, Some(JsxAttributeValue::String(s)) if s.value == "a"));
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(el.opening_element.attributes[1], JsxAttributeItem::Spread(_)));
        assert_eq!(el.children.len(), 2);
        assert!(matches!(el.children[0], JsxChild::Text(t) if t.value == "hi "));
        assert!(matches!(el.children[1], JsxChild::Container(_)));
        assert!(el.closing_element.is_some());
    }

    #[test]
    fn test_nested_and_fragment() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "<a><b/>{<c/>}<></></a>;", &jsx()).unwrap();
        let el = element(&file);
        assert_eq!(el.children.len(), 3);
        assert!(matches!(el.children[0], JsxChild::Element(b) if b.opening_element.self_closing));
        assert!(matches!(el.children[2], JsxChild::Fragment(_)));
    }

    #[test]
    fn test_member_and_namespaced_names() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "<a.b.c x:y='1'></a.b.c>;", &jsx()).unwrap();
        let el = element(&file);
        assert_eq!(el.opening_element.name.qualified_name(), "a.b.c");
        match el.opening_element.attributes[0] {
            JsxAttributeItem::Attribute(attr) => assert!(matches!(attr.name, JsxAttributeName::Namespaced(_))),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_element_in_operand_position() {
        let arena = Bump::new();
        let file = crate::parse(&arena, "x = cond ? <a/> : <b></b>;", &jsx()).unwrap();
        assert_eq!(file.program.body.len(), 1);
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_jsx_errors() {
        assert_eq!(reason("<a></b>;"), Some("MissingClosingTagElement"));
        assert_eq!(reason("<></a>;"), Some("MissingClosingTagFragment"));
        assert_eq!(reason("<a/><b/>;"), Some("UnwrappedAdjacentJSXElements"));
        assert_eq!(reason("<a b={} />;"), Some("AttributeIsEmpty"));
        assert_eq!(reason("<a b=1 />;"), Some("UnsupportedJsxValue"));
    }

    #[test]
    fn test_without_plugin() {
        let arena = Bump::new();
        let err = crate::parse(&arena, "<a/>;", &ParserOptions::default()).unwrap_err();
        let diag = err.diagnostic().expect("syntax error");
        assert_eq!(diag.reason_code(), "MissingOneOfPlugins");
        assert!(diag.missing_plugins.contains(&"jsx"));
    }
}
