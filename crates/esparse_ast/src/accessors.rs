//! Uniform access to [`NodeData`] across the category enums.

use crate::node::*;
use esparse_core::text::Span;

impl<'a> Expression<'a> {
    pub fn data(&self) -> &'a NodeData {
        match *self {
            Expression::Identifier(n) => &n.data,
            Expression::PrivateName(n) => &n.data,
            Expression::StringLiteral(n) => &n.data,
            Expression::NumericLiteral(n) => &n.data,
            Expression::BigIntLiteral(n) => &n.data,
            Expression::BooleanLiteral(n) => &n.data,
            Expression::NullLiteral(n) => &n.data,
            Expression::RegExpLiteral(n) => &n.data,
            Expression::TemplateLiteral(n) => &n.data,
            Expression::TaggedTemplate(n) => &n.data,
            Expression::This(n) => &n.data,
            Expression::Super(n) => &n.data,
            Expression::Import(n) => &n.data,
            Expression::Array(n) => &n.data,
            Expression::Object(n) => &n.data,
            Expression::Function(n) => &n.data,
            Expression::ArrowFunction(n) => &n.data,
            Expression::Class(n) => &n.data,
            Expression::Unary(n) => &n.data,
            Expression::Update(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Logical(n) => &n.data,
            Expression::Assignment(n) => &n.data,
            Expression::Conditional(n) => &n.data,
            Expression::Call(n) => &n.data,
            Expression::New(n) => &n.data,
            Expression::Member(n) => &n.data,
            Expression::Sequence(n) => &n.data,
            Expression::Yield(n) => &n.data,
            Expression::Await(n) => &n.data,
            Expression::MetaProperty(n) => &n.data,
            Expression::Parenthesized(n) => &n.data,
            Expression::Extension(n) => n.data(),
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.data().span
    }

    #[inline]
    pub fn is_parenthesized(&self) -> bool {
        self.data().is_parenthesized()
    }

    /// The identifier name, if this is a plain identifier.
    pub fn identifier_name(&self) -> Option<&'a str> {
        match *self {
            Expression::Identifier(id) => Some(id.name),
            _ => None,
        }
    }

    /// Whether this is a (possibly optional) call or member chain link.
    pub fn is_optional_chain(&self) -> bool {
        match self {
            Expression::Member(m) => m.kind == MemberType::OptionalMemberExpression,
            Expression::Call(c) => c.kind == CallType::OptionalCallExpression,
            _ => false,
        }
    }
}

impl<'a> Statement<'a> {
    pub fn data(&self) -> &'a NodeData {
        match *self {
            Statement::Expression(n) => &n.data,
            Statement::Block(n) => &n.data,
            Statement::Empty(n) => &n.data,
            Statement::Debugger(n) => &n.data,
            Statement::With(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::Labeled(n) => &n.data,
            Statement::Break(n) => &n.data,
            Statement::Continue(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::Switch(n) => &n.data,
            Statement::Throw(n) => &n.data,
            Statement::Try(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::DoWhile(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::ForIn(n) => &n.data,
            Statement::ForOf(n) => &n.data,
            Statement::Function(n) => &n.data,
            Statement::Variable(n) => &n.data,
            Statement::Class(n) => &n.data,
            Statement::Module(item) => item.data(),
            Statement::Extension(n) => n.data(),
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.data().span
    }
}

impl<'a> ModuleItem<'a> {
    pub fn data(&self) -> &'a NodeData {
        match *self {
            ModuleItem::Import(n) => &n.data,
            ModuleItem::ExportNamed(n) => &n.data,
            ModuleItem::ExportDefault(n) => &n.data,
            ModuleItem::ExportAll(n) => &n.data,
        }
    }
}

impl<'a> Pattern<'a> {
    pub fn data(&self) -> &'a NodeData {
        match *self {
            Pattern::Identifier(n) => &n.data,
            Pattern::Object(n) => &n.data,
            Pattern::Array(n) => &n.data,
            Pattern::Rest(n) => &n.data,
            Pattern::Assignment(n) => &n.data,
            Pattern::Member(n) => &n.data,
            Pattern::Extension(n) => n.data(),
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.data().span
    }

    /// A parameter list is simple when every entry is a plain identifier.
    pub fn is_simple_parameter(&self) -> bool {
        matches!(self, Pattern::Identifier(_))
    }
}

impl<'a> ClassMember<'a> {
    pub fn data(&self) -> &'a NodeData {
        match *self {
            ClassMember::Method(n) => &n.data,
            ClassMember::Property(n) => &n.data,
            ClassMember::StaticBlock(n) => &n.data,
            ClassMember::Extension(n) => n.data(),
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.data().span
    }
}

impl<'a> ObjectMember<'a> {
    pub fn data(&self) -> &'a NodeData {
        match *self {
            ObjectMember::Property(n) => &n.data,
            ObjectMember::Method(n) => &n.data,
            ObjectMember::Spread(n) => &n.data,
            ObjectMember::Extension(n) => n.data(),
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.data().span
    }
}

impl<'a> ExprOrSpread<'a> {
    pub fn span(&self) -> Span {
        match self {
            ExprOrSpread::Expression(e) => e.span(),
            ExprOrSpread::Spread(s) => s.data.span,
        }
    }
}

impl<'a> ObjectPatternMember<'a> {
    pub fn span(&self) -> Span {
        match self {
            ObjectPatternMember::Property(n) => n.data.span,
            ObjectPatternMember::Rest(n) => n.data.span,
            ObjectPatternMember::Estree(n) => n.data.span,
        }
    }
}

impl<'a> BindingName<'a> {
    pub fn span(&self) -> Span {
        match self {
            BindingName::Identifier(n) => n.data.span,
            BindingName::Placeholder(n) => n.data.span,
        }
    }
}

impl<'a> ForLeft<'a> {
    pub fn span(&self) -> Span {
        match self {
            ForLeft::Variable(n) => n.data.span,
            ForLeft::Pattern(p) => p.span(),
        }
    }
}
