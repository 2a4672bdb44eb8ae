//! AST visitor trait for traversing the syntax tree.
//!
//! Default implementations walk into children in source order and bracket
//! every node with [`AstVisitor::enter`] / [`AstVisitor::leave`], so a visitor
//! that only cares about node extents can override just those two hooks.

use crate::ext::*;
use crate::flow::{self, FlowType};
use crate::jsx::*;
use crate::node::*;
use crate::ts::{self, TsType};
use esparse_core::text::Span;

pub trait AstVisitor<'a> {
    /// Called before the children of every node.
    fn enter(&mut self, _span: Span) {}

    /// Called after the children of every node.
    fn leave(&mut self, _span: Span) {}

    fn visit_program(&mut self, node: &Program<'a>) {
        self.enter(node.data.span);
        if let Some(interpreter) = node.interpreter {
            self.enter(interpreter.data.span);
            self.leave(interpreter.data.span);
        }
        for directive in node.directives.iter() {
            self.visit_directive(directive);
        }
        for stmt in node.body.iter() {
            self.visit_statement(stmt);
        }
        self.leave(node.data.span);
    }

    fn visit_directive(&mut self, node: &Directive<'a>) {
        self.enter(node.data.span);
        self.enter(node.value.data.span);
        self.leave(node.value.data.span);
        self.leave(node.data.span);
    }

    fn visit_statement(&mut self, stmt: &Statement<'a>) {
        match *stmt {
            Statement::Expression(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.leave(n.data.span);
            }
            Statement::Block(n) => self.visit_block(n),
            Statement::Empty(n) => self.visit_leaf(&n.data),
            Statement::Debugger(n) => self.visit_leaf(&n.data),
            Statement::With(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.object);
                self.visit_statement(&n.body);
                self.leave(n.data.span);
            }
            Statement::Return(n) => {
                self.enter(n.data.span);
                if let Some(arg) = &n.argument {
                    self.visit_expression(arg);
                }
                self.leave(n.data.span);
            }
            Statement::Labeled(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.label);
                self.visit_statement(&n.body);
                self.leave(n.data.span);
            }
            Statement::Break(n) => {
                self.enter(n.data.span);
                if let Some(label) = n.label {
                    self.visit_identifier(label);
                }
                self.leave(n.data.span);
            }
            Statement::Continue(n) => {
                self.enter(n.data.span);
                if let Some(label) = n.label {
                    self.visit_identifier(label);
                }
                self.leave(n.data.span);
            }
            Statement::If(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.test);
                self.visit_statement(&n.consequent);
                if let Some(alt) = &n.alternate {
                    self.visit_statement(alt);
                }
                self.leave(n.data.span);
            }
            Statement::Switch(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.discriminant);
                for case in n.cases.iter() {
                    self.enter(case.data.span);
                    if let Some(test) = &case.test {
                        self.visit_expression(test);
                    }
                    for s in case.consequent.iter() {
                        self.visit_statement(s);
                    }
                    self.leave(case.data.span);
                }
                self.leave(n.data.span);
            }
            Statement::Throw(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.argument);
                self.leave(n.data.span);
            }
            Statement::Try(n) => {
                self.enter(n.data.span);
                self.visit_block(n.block);
                if let Some(handler) = n.handler {
                    self.enter(handler.data.span);
                    if let Some(param) = &handler.param {
                        self.visit_pattern(param);
                    }
                    self.visit_block(handler.body);
                    self.leave(handler.data.span);
                }
                if let Some(finalizer) = n.finalizer {
                    self.visit_block(finalizer);
                }
                self.leave(n.data.span);
            }
            Statement::While(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.test);
                self.visit_statement(&n.body);
                self.leave(n.data.span);
            }
            Statement::DoWhile(n) => {
                self.enter(n.data.span);
                self.visit_statement(&n.body);
                self.visit_expression(&n.test);
                self.leave(n.data.span);
            }
            Statement::For(n) => {
                self.enter(n.data.span);
                match &n.init {
                    Some(ForInit::Variable(decl)) => self.visit_variable_declaration(decl),
                    Some(ForInit::Expression(e)) => self.visit_expression(e),
                    None => {}
                }
                if let Some(test) = &n.test {
                    self.visit_expression(test);
                }
                if let Some(update) = &n.update {
                    self.visit_expression(update);
                }
                self.visit_statement(&n.body);
                self.leave(n.data.span);
            }
            Statement::ForIn(n) => {
                self.enter(n.data.span);
                self.visit_for_left(&n.left);
                self.visit_expression(&n.right);
                self.visit_statement(&n.body);
                self.leave(n.data.span);
            }
            Statement::ForOf(n) => {
                self.enter(n.data.span);
                self.visit_for_left(&n.left);
                self.visit_expression(&n.right);
                self.visit_statement(&n.body);
                self.leave(n.data.span);
            }
            Statement::Function(n) => self.visit_function(n),
            Statement::Variable(n) => self.visit_variable_declaration(n),
            Statement::Class(n) => self.visit_class(n),
            Statement::Module(item) => self.visit_module_item(&item),
            Statement::Extension(ext) => self.visit_statement_extension(ext),
        }
    }

    fn visit_leaf(&mut self, data: &NodeData) {
        self.enter(data.span);
        self.leave(data.span);
    }

    fn visit_block(&mut self, node: &BlockStatement<'a>) {
        self.enter(node.data.span);
        for directive in node.directives.iter() {
            self.visit_directive(directive);
        }
        for stmt in node.body.iter() {
            self.visit_statement(stmt);
        }
        self.leave(node.data.span);
    }

    fn visit_for_left(&mut self, left: &ForLeft<'a>) {
        match left {
            ForLeft::Variable(decl) => self.visit_variable_declaration(decl),
            ForLeft::Pattern(p) => self.visit_pattern(p),
        }
    }

    fn visit_variable_declaration(&mut self, node: &VariableDeclaration<'a>) {
        self.enter(node.data.span);
        for decl in node.declarations.iter() {
            self.enter(decl.data.span);
            self.visit_pattern(&decl.id);
            if let Some(init) = &decl.init {
                self.visit_expression(init);
            }
            self.leave(decl.data.span);
        }
        self.leave(node.data.span);
    }

    fn visit_function(&mut self, node: &Function<'a>) {
        self.enter(node.data.span);
        if let Some(id) = &node.id {
            self.visit_binding_name(id);
        }
        if let Some(tp) = &node.type_parameters {
            self.visit_type_parameters(tp);
        }
        for param in node.params.iter() {
            self.visit_pattern(param);
        }
        if let Some(ret) = &node.return_type {
            self.visit_type_annotation(ret);
        }
        if let Some(body) = node.body {
            self.visit_block(body);
        }
        self.leave(node.data.span);
    }

    fn visit_binding_name(&mut self, name: &BindingName<'a>) {
        match *name {
            BindingName::Identifier(id) => self.visit_identifier(id),
            BindingName::Placeholder(p) => self.visit_placeholder(p),
        }
    }

    fn visit_decorators(&mut self, decorators: &[&Decorator<'a>]) {
        for decorator in decorators.iter() {
            self.enter(decorator.data.span);
            self.visit_expression(&decorator.expression);
            self.leave(decorator.data.span);
        }
    }

    fn visit_class(&mut self, node: &Class<'a>) {
        self.enter(node.data.span);
        self.visit_decorators(node.decorators);
        if let Some(id) = &node.id {
            self.visit_binding_name(id);
        }
        if let Some(tp) = &node.type_parameters {
            self.visit_type_parameters(tp);
        }
        if let Some(sup) = &node.super_class {
            self.visit_expression(sup);
        }
        if let Some(args) = &node.super_type_parameters {
            self.visit_type_arguments(args);
        }
        for imp in node.implements.iter() {
            match *imp {
                ClassImplements::Ts(n) => self.visit_ts_heritage(n),
                ClassImplements::Flow(n) => {
                    self.enter(n.data.span);
                    self.visit_identifier(n.id);
                    if let Some(args) = n.type_parameters {
                        self.visit_flow_type_arguments(args);
                    }
                    self.leave(n.data.span);
                }
            }
        }
        match node.body {
            ClassBodyOrPlaceholder::Body(body) => {
                self.enter(body.data.span);
                for member in body.body.iter() {
                    self.visit_class_member(member);
                }
                self.leave(body.data.span);
            }
            ClassBodyOrPlaceholder::Placeholder(p) => self.visit_placeholder(p),
        }
        self.leave(node.data.span);
    }

    fn visit_class_member(&mut self, member: &ClassMember<'a>) {
        match *member {
            ClassMember::Method(n) => {
                self.enter(n.data.span);
                self.visit_decorators(n.decorators);
                self.visit_expression(&n.key);
                if let Some(tp) = &n.type_parameters {
                    self.visit_type_parameters(tp);
                }
                for param in n.params.iter() {
                    self.visit_pattern(param);
                }
                if let Some(ret) = &n.return_type {
                    self.visit_type_annotation(ret);
                }
                if let Some(body) = n.body {
                    self.visit_block(body);
                }
                self.leave(n.data.span);
            }
            ClassMember::Property(n) => {
                self.enter(n.data.span);
                self.visit_decorators(n.decorators);
                if let Some(variance) = n.variance {
                    self.visit_leaf(&variance.data);
                }
                self.visit_expression(&n.key);
                if let Some(ann) = &n.type_annotation {
                    self.visit_type_annotation(ann);
                }
                if let Some(value) = &n.value {
                    self.visit_expression(value);
                }
                self.leave(n.data.span);
            }
            ClassMember::StaticBlock(n) => {
                self.enter(n.data.span);
                for stmt in n.body.iter() {
                    self.visit_statement(stmt);
                }
                self.leave(n.data.span);
            }
            ClassMember::Extension(ext) => match *ext {
                ClassMemberExtension::TsIndexSignature(n) => self.visit_ts_index_signature(n),
                ClassMemberExtension::EstreeMethod(n) => {
                    self.enter(n.data.span);
                    self.visit_decorators(n.decorators);
                    self.visit_expression(&n.key);
                    self.visit_function(n.value);
                    self.leave(n.data.span);
                }
                ClassMemberExtension::EstreeProperty(n) => {
                    self.enter(n.data.span);
                    self.visit_decorators(n.decorators);
                    self.visit_expression(&n.key);
                    if let Some(value) = &n.value {
                        self.visit_expression(value);
                    }
                    self.leave(n.data.span);
                }
            },
        }
    }

    fn visit_module_item(&mut self, item: &ModuleItem<'a>) {
        match *item {
            ModuleItem::Import(n) => {
                self.enter(n.data.span);
                for spec in n.specifiers.iter() {
                    match *spec {
                        ImportSpecifierKind::Named(s) => {
                            self.enter(s.data.span);
                            self.visit_module_export_name(&s.imported);
                            if s.local.data.span != s.imported.span() {
                                self.visit_identifier(s.local);
                            }
                            self.leave(s.data.span);
                        }
                        ImportSpecifierKind::Default(s) => {
                            self.enter(s.data.span);
                            self.visit_identifier(s.local);
                            self.leave(s.data.span);
                        }
                        ImportSpecifierKind::Namespace(s) => {
                            self.enter(s.data.span);
                            self.visit_identifier(s.local);
                            self.leave(s.data.span);
                        }
                    }
                }
                self.visit_leaf(&n.source.data);
                self.leave(n.data.span);
            }
            ModuleItem::ExportNamed(n) => {
                self.enter(n.data.span);
                if let Some(decl) = &n.declaration {
                    self.visit_statement(decl);
                }
                for spec in n.specifiers.iter() {
                    match *spec {
                        ExportSpecifierKind::Named(s) => {
                            self.enter(s.data.span);
                            self.visit_module_export_name(&s.local);
                            if s.exported.span() != s.local.span() {
                                self.visit_module_export_name(&s.exported);
                            }
                            self.leave(s.data.span);
                        }
                        ExportSpecifierKind::Namespace(s) => {
                            self.enter(s.data.span);
                            self.visit_module_export_name(&s.exported);
                            self.leave(s.data.span);
                        }
                    }
                }
                if let Some(source) = n.source {
                    self.visit_leaf(&source.data);
                }
                self.leave(n.data.span);
            }
            ModuleItem::ExportDefault(n) => {
                self.enter(n.data.span);
                match n.declaration {
                    ExportDefaultKind::Function(f) => self.visit_function(f),
                    ExportDefaultKind::Class(c) => self.visit_class(c),
                    ExportDefaultKind::Expression(e) => self.visit_expression(&e),
                    ExportDefaultKind::Extension(ext) => self.visit_statement_extension(ext),
                }
                self.leave(n.data.span);
            }
            ModuleItem::ExportAll(n) => {
                self.enter(n.data.span);
                self.visit_leaf(&n.source.data);
                self.leave(n.data.span);
            }
        }
    }

    fn visit_module_export_name(&mut self, name: &ModuleExportName<'a>) {
        match *name {
            ModuleExportName::Identifier(id) => self.visit_identifier(id),
            ModuleExportName::String(s) => self.visit_leaf(&s.data),
        }
    }

    // -- Expressions --

    fn visit_expression(&mut self, expr: &Expression<'a>) {
        match *expr {
            Expression::Identifier(n) => self.visit_identifier(n),
            Expression::PrivateName(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                self.leave(n.data.span);
            }
            Expression::StringLiteral(n) => self.visit_leaf(&n.data),
            Expression::NumericLiteral(n) => self.visit_leaf(&n.data),
            Expression::BigIntLiteral(n) => self.visit_leaf(&n.data),
            Expression::BooleanLiteral(n) => self.visit_leaf(&n.data),
            Expression::NullLiteral(n) => self.visit_leaf(&n.data),
            Expression::RegExpLiteral(n) => self.visit_leaf(&n.data),
            Expression::TemplateLiteral(n) => self.visit_template_literal(n),
            Expression::TaggedTemplate(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.tag);
                if let Some(args) = &n.type_parameters {
                    self.visit_type_arguments(args);
                }
                self.visit_template_literal(n.quasi);
                self.leave(n.data.span);
            }
            Expression::This(n) => self.visit_leaf(&n.data),
            Expression::Super(n) => self.visit_leaf(&n.data),
            Expression::Import(n) => self.visit_leaf(&n.data),
            Expression::Array(n) => {
                self.enter(n.data.span);
                for elem in n.elements.iter().flatten() {
                    self.visit_expr_or_spread(elem);
                }
                self.leave(n.data.span);
            }
            Expression::Object(n) => {
                self.enter(n.data.span);
                for member in n.properties.iter() {
                    self.visit_object_member(member);
                }
                self.leave(n.data.span);
            }
            Expression::Function(n) => self.visit_function(n),
            Expression::ArrowFunction(n) => {
                self.enter(n.data.span);
                if let Some(tp) = &n.type_parameters {
                    self.visit_type_parameters(tp);
                }
                for param in n.params.iter() {
                    self.visit_pattern(param);
                }
                if let Some(ret) = &n.return_type {
                    self.visit_type_annotation(ret);
                }
                match n.body {
                    ArrowBody::Block(block) => self.visit_block(block),
                    ArrowBody::Expression(e) => self.visit_expression(&e),
                }
                self.leave(n.data.span);
            }
            Expression::Class(n) => self.visit_class(n),
            Expression::Unary(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.argument);
                self.leave(n.data.span);
            }
            Expression::Update(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.argument);
                self.leave(n.data.span);
            }
            Expression::Binary(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.left);
                self.visit_expression(&n.right);
                self.leave(n.data.span);
            }
            Expression::Logical(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.left);
                self.visit_expression(&n.right);
                self.leave(n.data.span);
            }
            Expression::Assignment(n) => {
                self.enter(n.data.span);
                self.visit_pattern(&n.left);
                self.visit_expression(&n.right);
                self.leave(n.data.span);
            }
            Expression::Conditional(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.test);
                self.visit_expression(&n.consequent);
                self.visit_expression(&n.alternate);
                self.leave(n.data.span);
            }
            Expression::Call(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.callee);
                if let Some(args) = &n.type_parameters {
                    self.visit_type_arguments(args);
                }
                for arg in n.arguments.iter() {
                    self.visit_expr_or_spread(arg);
                }
                self.leave(n.data.span);
            }
            Expression::New(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.callee);
                if let Some(args) = &n.type_parameters {
                    self.visit_type_arguments(args);
                }
                for arg in n.arguments.iter() {
                    self.visit_expr_or_spread(arg);
                }
                self.leave(n.data.span);
            }
            Expression::Member(n) => self.visit_member(n),
            Expression::Sequence(n) => {
                self.enter(n.data.span);
                for e in n.expressions.iter() {
                    self.visit_expression(e);
                }
                self.leave(n.data.span);
            }
            Expression::Yield(n) => {
                self.enter(n.data.span);
                if let Some(arg) = &n.argument {
                    self.visit_expression(arg);
                }
                self.leave(n.data.span);
            }
            Expression::Await(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.argument);
                self.leave(n.data.span);
            }
            Expression::MetaProperty(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.meta);
                self.visit_identifier(n.property);
                self.leave(n.data.span);
            }
            Expression::Parenthesized(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.leave(n.data.span);
            }
            Expression::Extension(ext) => self.visit_expression_extension(ext),
        }
    }

    fn visit_identifier(&mut self, node: &Identifier<'a>) {
        self.enter(node.data.span);
        if let Some(ann) = &node.type_annotation {
            self.visit_type_annotation(ann);
        }
        self.leave(node.data.span);
    }

    fn visit_template_literal(&mut self, node: &TemplateLiteral<'a>) {
        self.enter(node.data.span);
        for (i, quasi) in node.quasis.iter().enumerate() {
            self.visit_leaf(&quasi.data);
            if let Some(e) = node.expressions.get(i) {
                self.visit_expression(e);
            }
        }
        self.leave(node.data.span);
    }

    fn visit_expr_or_spread(&mut self, elem: &ExprOrSpread<'a>) {
        match *elem {
            ExprOrSpread::Expression(e) => self.visit_expression(&e),
            ExprOrSpread::Spread(s) => {
                self.enter(s.data.span);
                self.visit_expression(&s.argument);
                self.leave(s.data.span);
            }
        }
    }

    fn visit_member(&mut self, node: &MemberExpression<'a>) {
        self.enter(node.data.span);
        self.visit_expression(&node.object);
        self.visit_expression(&node.property);
        self.leave(node.data.span);
    }

    fn visit_object_member(&mut self, member: &ObjectMember<'a>) {
        match *member {
            ObjectMember::Property(n) => {
                self.enter(n.data.span);
                if n.shorthand {
                    self.visit_expression(&n.value);
                } else {
                    self.visit_expression(&n.key);
                    self.visit_expression(&n.value);
                }
                self.leave(n.data.span);
            }
            ObjectMember::Method(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.key);
                if let Some(tp) = &n.type_parameters {
                    self.visit_type_parameters(tp);
                }
                for param in n.params.iter() {
                    self.visit_pattern(param);
                }
                if let Some(ret) = &n.return_type {
                    self.visit_type_annotation(ret);
                }
                self.visit_block(n.body);
                self.leave(n.data.span);
            }
            ObjectMember::Spread(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.argument);
                self.leave(n.data.span);
            }
            ObjectMember::Extension(ext) => match *ext {
                ObjectMemberExtension::EstreeProperty(n) => self.visit_estree_property(n),
            },
        }
    }

    fn visit_estree_property(&mut self, node: &estree::Property<'a>) {
        self.enter(node.data.span);
        if !node.shorthand {
            self.visit_expression(&node.key);
        }
        match node.value {
            estree::PropertyValue::Expression(e) => self.visit_expression(&e),
            estree::PropertyValue::Pattern(p) => self.visit_pattern(&p),
        }
        self.leave(node.data.span);
    }

    // -- Patterns --

    fn visit_pattern(&mut self, pattern: &Pattern<'a>) {
        match *pattern {
            Pattern::Identifier(n) => self.visit_identifier(n),
            Pattern::Object(n) => {
                self.enter(n.data.span);
                for prop in n.properties.iter() {
                    match *prop {
                        ObjectPatternMember::Property(p) => {
                            self.enter(p.data.span);
                            if !p.shorthand {
                                self.visit_expression(&p.key);
                            }
                            self.visit_pattern(&p.value);
                            self.leave(p.data.span);
                        }
                        ObjectPatternMember::Rest(r) => self.visit_pattern(&Pattern::Rest(r)),
                        ObjectPatternMember::Estree(p) => self.visit_estree_property(p),
                    }
                }
                if let Some(ann) = &n.type_annotation {
                    self.visit_type_annotation(ann);
                }
                self.leave(n.data.span);
            }
            Pattern::Array(n) => {
                self.enter(n.data.span);
                for elem in n.elements.iter().flatten() {
                    self.visit_pattern(elem);
                }
                if let Some(ann) = &n.type_annotation {
                    self.visit_type_annotation(ann);
                }
                self.leave(n.data.span);
            }
            Pattern::Rest(n) => {
                self.enter(n.data.span);
                self.visit_pattern(&n.argument);
                if let Some(ann) = &n.type_annotation {
                    self.visit_type_annotation(ann);
                }
                self.leave(n.data.span);
            }
            Pattern::Assignment(n) => {
                self.enter(n.data.span);
                self.visit_pattern(&n.left);
                self.visit_expression(&n.right);
                self.leave(n.data.span);
            }
            Pattern::Member(n) => self.visit_member(n),
            Pattern::Extension(ext) => match *ext {
                PatternExtension::TsParameterProperty(n) => {
                    self.enter(n.data.span);
                    self.visit_decorators(n.decorators);
                    self.visit_pattern(&n.parameter);
                    self.leave(n.data.span);
                }
                PatternExtension::TsAs(n) => {
                    self.enter(n.data.span);
                    self.visit_expression(&n.expression);
                    self.visit_ts_type(&n.type_annotation);
                    self.leave(n.data.span);
                }
                PatternExtension::TsSatisfies(n) => {
                    self.enter(n.data.span);
                    self.visit_expression(&n.expression);
                    self.visit_ts_type(&n.type_annotation);
                    self.leave(n.data.span);
                }
                PatternExtension::TsNonNull(n) => {
                    self.enter(n.data.span);
                    self.visit_expression(&n.expression);
                    self.leave(n.data.span);
                }
                PatternExtension::TsTypeAssertion(n) => {
                    self.enter(n.data.span);
                    self.visit_ts_type(&n.type_annotation);
                    self.visit_expression(&n.expression);
                    self.leave(n.data.span);
                }
                PatternExtension::Placeholder(n) => self.visit_placeholder(n),
            },
        }
    }

    // -- Extensions --

    fn visit_placeholder(&mut self, node: &Placeholder<'a>) {
        self.enter(node.data.span);
        self.visit_identifier(node.name);
        self.leave(node.data.span);
    }

    fn visit_expression_extension(&mut self, ext: &ExpressionExtension<'a>) {
        match *ext {
            ExpressionExtension::JsxElement(n) => self.visit_jsx_element(n),
            ExpressionExtension::JsxFragment(n) => self.visit_jsx_fragment(n),
            ExpressionExtension::TsAs(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.visit_ts_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            ExpressionExtension::TsSatisfies(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.visit_ts_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            ExpressionExtension::TsNonNull(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.leave(n.data.span);
            }
            ExpressionExtension::TsTypeAssertion(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.type_annotation);
                self.visit_expression(&n.expression);
                self.leave(n.data.span);
            }
            ExpressionExtension::TsInstantiation(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.visit_ts_type_arguments(n.type_parameters);
                self.leave(n.data.span);
            }
            ExpressionExtension::TsTypeCast(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.visit_ts_annotation(n.type_annotation);
                self.leave(n.data.span);
            }
            ExpressionExtension::FlowTypeCast(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.visit_flow_type_annotation(n.type_annotation);
                self.leave(n.data.span);
            }
            ExpressionExtension::Placeholder(n) => self.visit_placeholder(n),
            ExpressionExtension::V8Intrinsic(n) => self.visit_leaf(&n.data),
            ExpressionExtension::EstreeLiteral(n) => self.visit_leaf(&n.data),
            ExpressionExtension::EstreeChain(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.expression);
                self.leave(n.data.span);
            }
            ExpressionExtension::EstreeImport(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.source);
                if let Some(options) = &n.options {
                    self.visit_expression(options);
                }
                self.leave(n.data.span);
            }
        }
    }

    fn visit_statement_extension(&mut self, ext: &StatementExtension<'a>) {
        match *ext {
            StatementExtension::TsInterface(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                if let Some(tp) = n.type_parameters {
                    self.visit_ts_type_parameters(tp);
                }
                for heritage in n.extends.iter() {
                    self.visit_ts_heritage(heritage);
                }
                self.enter(n.body.data.span);
                for member in n.body.body.iter() {
                    self.visit_ts_type_element(member);
                }
                self.leave(n.body.data.span);
                self.leave(n.data.span);
            }
            StatementExtension::TsTypeAlias(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                if let Some(tp) = n.type_parameters {
                    self.visit_ts_type_parameters(tp);
                }
                self.visit_ts_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            StatementExtension::TsEnum(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                for member in n.members.iter() {
                    self.enter(member.data.span);
                    self.visit_expression(&member.id);
                    if let Some(init) = &member.initializer {
                        self.visit_expression(init);
                    }
                    self.leave(member.data.span);
                }
                self.leave(n.data.span);
            }
            StatementExtension::TsModule(n) => self.visit_ts_module(n),
            StatementExtension::FlowTypeAlias(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                if let Some(tp) = n.type_parameters {
                    self.visit_flow_type_parameters(tp);
                }
                self.visit_flow_type(&n.right);
                self.leave(n.data.span);
            }
            StatementExtension::FlowOpaqueType(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                if let Some(tp) = n.type_parameters {
                    self.visit_flow_type_parameters(tp);
                }
                if let Some(sup) = &n.supertype {
                    self.visit_flow_type(sup);
                }
                if let Some(imp) = &n.impltype {
                    self.visit_flow_type(imp);
                }
                self.leave(n.data.span);
            }
            StatementExtension::FlowInterface(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                if let Some(tp) = n.type_parameters {
                    self.visit_flow_type_parameters(tp);
                }
                for ext in n.extends.iter() {
                    self.enter(ext.data.span);
                    self.visit_flow_type_id(&ext.id);
                    if let Some(args) = ext.type_parameters {
                        self.visit_flow_type_arguments(args);
                    }
                    self.leave(ext.data.span);
                }
                for imp in n.implements.iter() {
                    self.enter(imp.data.span);
                    self.visit_identifier(imp.id);
                    if let Some(args) = imp.type_parameters {
                        self.visit_flow_type_arguments(args);
                    }
                    self.leave(imp.data.span);
                }
                self.visit_flow_type(&FlowType::Object(n.body));
                self.leave(n.data.span);
            }
            StatementExtension::FlowDeclareVariable(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                self.leave(n.data.span);
            }
            StatementExtension::FlowDeclareFunction(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.id);
                self.leave(n.data.span);
            }
            StatementExtension::FlowDeclareModuleExports(n) => {
                self.enter(n.data.span);
                self.visit_flow_type_annotation(n.type_annotation);
                self.leave(n.data.span);
            }
            StatementExtension::Placeholder(n) => self.visit_placeholder(n),
        }
    }

    // -- JSX --

    fn visit_jsx_element(&mut self, node: &JsxElement<'a>) {
        self.enter(node.data.span);
        let opening = node.opening_element;
        self.enter(opening.data.span);
        self.visit_jsx_element_name(&opening.name);
        if let Some(args) = &opening.type_parameters {
            self.visit_type_arguments(args);
        }
        for attr in opening.attributes.iter() {
            match *attr {
                JsxAttributeItem::Attribute(a) => {
                    self.enter(a.data.span);
                    match a.name {
                        JsxAttributeName::Identifier(id) => self.visit_leaf(&id.data),
                        JsxAttributeName::Namespaced(ns) => self.visit_jsx_element_name(&JsxElementName::Namespaced(ns)),
                    }
                    match a.value {
                        Some(JsxAttributeValue::String(s)) => self.visit_leaf(&s.data),
                        Some(JsxAttributeValue::Container(c)) => self.visit_jsx_container(c),
                        Some(JsxAttributeValue::Element(e)) => self.visit_jsx_element(e),
                        Some(JsxAttributeValue::Fragment(f)) => self.visit_jsx_fragment(f),
                        None => {}
                    }
                    self.leave(a.data.span);
                }
                JsxAttributeItem::Spread(s) => {
                    self.enter(s.data.span);
                    self.visit_expression(&s.argument);
                    self.leave(s.data.span);
                }
            }
        }
        self.leave(opening.data.span);
        for child in node.children.iter() {
            self.visit_jsx_child(child);
        }
        if let Some(closing) = node.closing_element {
            self.enter(closing.data.span);
            self.visit_jsx_element_name(&closing.name);
            self.leave(closing.data.span);
        }
        self.leave(node.data.span);
    }

    fn visit_jsx_fragment(&mut self, node: &JsxFragment<'a>) {
        self.enter(node.data.span);
        self.visit_leaf(&node.opening_fragment.data);
        for child in node.children.iter() {
            self.visit_jsx_child(child);
        }
        self.visit_leaf(&node.closing_fragment.data);
        self.leave(node.data.span);
    }

    fn visit_jsx_element_name(&mut self, name: &JsxElementName<'a>) {
        match *name {
            JsxElementName::Identifier(id) => self.visit_leaf(&id.data),
            JsxElementName::Namespaced(ns) => {
                self.enter(ns.data.span);
                self.visit_leaf(&ns.namespace.data);
                self.visit_leaf(&ns.name.data);
                self.leave(ns.data.span);
            }
            JsxElementName::Member(member) => {
                self.enter(member.data.span);
                match member.object {
                    JsxMemberObject::Identifier(id) => self.visit_leaf(&id.data),
                    JsxMemberObject::Member(inner) => self.visit_jsx_element_name(&JsxElementName::Member(inner)),
                }
                self.visit_leaf(&member.property.data);
                self.leave(member.data.span);
            }
        }
    }

    fn visit_jsx_container(&mut self, node: &JsxExpressionContainer<'a>) {
        self.enter(node.data.span);
        match node.expression {
            JsxExpression::Expression(e) => self.visit_expression(&e),
            JsxExpression::Empty(empty) => self.visit_leaf(&empty.data),
        }
        self.leave(node.data.span);
    }

    fn visit_jsx_child(&mut self, child: &JsxChild<'a>) {
        match *child {
            JsxChild::Text(t) => self.visit_leaf(&t.data),
            JsxChild::Container(c) => self.visit_jsx_container(c),
            JsxChild::Spread(s) => {
                self.enter(s.data.span);
                self.visit_expression(&s.expression);
                self.leave(s.data.span);
            }
            JsxChild::Element(e) => self.visit_jsx_element(e),
            JsxChild::Fragment(f) => self.visit_jsx_fragment(f),
        }
    }

    // -- Types --

    fn visit_type_annotation(&mut self, ann: &TypeAnnotation<'a>) {
        match *ann {
            TypeAnnotation::Ts(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            TypeAnnotation::Flow(n) => self.visit_flow_type_annotation(n),
        }
    }

    fn visit_type_parameters(&mut self, params: &TypeParameters<'a>) {
        match *params {
            TypeParameters::Ts(n) => self.visit_ts_type_parameters(n),
            TypeParameters::Flow(n) => self.visit_flow_type_parameters(n),
        }
    }

    fn visit_type_arguments(&mut self, args: &TypeArguments<'a>) {
        match *args {
            TypeArguments::Ts(n) => self.visit_ts_type_arguments(n),
            TypeArguments::Flow(n) => self.visit_flow_type_arguments(n),
        }
    }

    fn visit_ts_type_parameters(&mut self, node: &ts::TsTypeParameterDeclaration<'a>) {
        self.enter(node.data.span);
        for param in node.params.iter() {
            self.visit_ts_type_parameter(param);
        }
        self.leave(node.data.span);
    }

    fn visit_ts_type_parameter(&mut self, node: &ts::TsTypeParameter<'a>) {
        self.enter(node.data.span);
        if let Some(constraint) = &node.constraint {
            self.visit_ts_type(constraint);
        }
        if let Some(default) = &node.default {
            self.visit_ts_type(default);
        }
        self.leave(node.data.span);
    }

    fn visit_ts_type_arguments(&mut self, node: &ts::TsTypeParameterInstantiation<'a>) {
        self.enter(node.data.span);
        for ty in node.params.iter() {
            self.visit_ts_type(ty);
        }
        self.leave(node.data.span);
    }

    fn visit_ts_entity_name(&mut self, name: &ts::TsEntityName<'a>) {
        match *name {
            ts::TsEntityName::Identifier(id) => self.visit_identifier(id),
            ts::TsEntityName::Qualified(q) => {
                self.enter(q.data.span);
                self.visit_ts_entity_name(&q.left);
                self.visit_identifier(q.right);
                self.leave(q.data.span);
            }
        }
    }

    fn visit_ts_heritage(&mut self, node: &ts::TsExpressionWithTypeArguments<'a>) {
        self.enter(node.data.span);
        self.visit_ts_entity_name(&node.expression);
        if let Some(args) = node.type_parameters {
            self.visit_ts_type_arguments(args);
        }
        self.leave(node.data.span);
    }

    fn visit_ts_annotation(&mut self, node: &ts::TsTypeAnnotation<'a>) {
        self.enter(node.data.span);
        self.visit_ts_type(&node.type_annotation);
        self.leave(node.data.span);
    }

    fn visit_ts_signature(
        &mut self,
        type_parameters: Option<&ts::TsTypeParameterDeclaration<'a>>,
        parameters: &[Pattern<'a>],
        return_type: Option<&ts::TsTypeAnnotation<'a>>,
    ) {
        if let Some(tp) = type_parameters {
            self.visit_ts_type_parameters(tp);
        }
        for param in parameters.iter() {
            self.visit_pattern(param);
        }
        if let Some(ret) = return_type {
            self.visit_ts_annotation(ret);
        }
    }

    fn visit_ts_type(&mut self, ty: &TsType<'a>) {
        match *ty {
            TsType::Keyword(n) => self.visit_leaf(&n.data),
            TsType::This(n) => self.visit_leaf(&n.data),
            TsType::TypeReference(n) => {
                self.enter(n.data.span);
                self.visit_ts_entity_name(&n.type_name);
                if let Some(args) = n.type_parameters {
                    self.visit_ts_type_arguments(args);
                }
                self.leave(n.data.span);
            }
            TsType::Array(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.element_type);
                self.leave(n.data.span);
            }
            TsType::Tuple(n) => {
                self.enter(n.data.span);
                for t in n.element_types.iter() {
                    self.visit_ts_type(t);
                }
                self.leave(n.data.span);
            }
            TsType::Optional(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            TsType::Rest(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            TsType::NamedTupleMember(n) => {
                self.enter(n.data.span);
                self.visit_identifier(n.label);
                self.visit_ts_type(&n.element_type);
                self.leave(n.data.span);
            }
            TsType::Union(n) => {
                self.enter(n.data.span);
                for t in n.types.iter() {
                    self.visit_ts_type(t);
                }
                self.leave(n.data.span);
            }
            TsType::Intersection(n) => {
                self.enter(n.data.span);
                for t in n.types.iter() {
                    self.visit_ts_type(t);
                }
                self.leave(n.data.span);
            }
            TsType::Literal(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.literal);
                self.leave(n.data.span);
            }
            TsType::Function(n) => {
                self.enter(n.data.span);
                self.visit_ts_signature(n.type_parameters, n.parameters, n.type_annotation);
                self.leave(n.data.span);
            }
            TsType::TypeLiteral(n) => {
                self.enter(n.data.span);
                for member in n.members.iter() {
                    self.visit_ts_type_element(member);
                }
                self.leave(n.data.span);
            }
            TsType::TypeQuery(n) => {
                self.enter(n.data.span);
                self.visit_ts_entity_name(&n.expr_name);
                if let Some(args) = n.type_parameters {
                    self.visit_ts_type_arguments(args);
                }
                self.leave(n.data.span);
            }
            TsType::TypeOperator(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            TsType::IndexedAccess(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.object_type);
                self.visit_ts_type(&n.index_type);
                self.leave(n.data.span);
            }
            TsType::Conditional(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.check_type);
                self.visit_ts_type(&n.extends_type);
                self.visit_ts_type(&n.true_type);
                self.visit_ts_type(&n.false_type);
                self.leave(n.data.span);
            }
            TsType::Infer(n) => {
                self.enter(n.data.span);
                self.visit_ts_type_parameter(n.type_parameter);
                self.leave(n.data.span);
            }
            TsType::Parenthesized(n) => {
                self.enter(n.data.span);
                self.visit_ts_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            TsType::TypePredicate(n) => {
                self.enter(n.data.span);
                match n.parameter_name {
                    ts::TsPredicateName::Identifier(id) => self.visit_identifier(id),
                    ts::TsPredicateName::This(this) => self.visit_leaf(&this.data),
                }
                if let Some(ann) = n.type_annotation {
                    self.visit_ts_annotation(ann);
                }
                self.leave(n.data.span);
            }
            TsType::Mapped(n) => {
                self.enter(n.data.span);
                self.visit_ts_type_parameter(n.type_parameter);
                if let Some(name) = &n.name_type {
                    self.visit_ts_type(name);
                }
                if let Some(ann) = &n.type_annotation {
                    self.visit_ts_type(ann);
                }
                self.leave(n.data.span);
            }
        }
    }

    fn visit_ts_index_signature(&mut self, node: &ts::TsIndexSignature<'a>) {
        self.enter(node.data.span);
        for param in node.parameters.iter() {
            self.visit_identifier(param);
        }
        if let Some(ann) = node.type_annotation {
            self.visit_ts_annotation(ann);
        }
        self.leave(node.data.span);
    }

    fn visit_ts_type_element(&mut self, member: &ts::TsTypeElement<'a>) {
        match *member {
            ts::TsTypeElement::Property(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.key);
                if let Some(ann) = n.type_annotation {
                    self.visit_ts_annotation(ann);
                }
                self.leave(n.data.span);
            }
            ts::TsTypeElement::Method(n) => {
                self.enter(n.data.span);
                self.visit_expression(&n.key);
                self.visit_ts_signature(n.type_parameters, n.parameters, n.type_annotation);
                self.leave(n.data.span);
            }
            ts::TsTypeElement::Index(n) => self.visit_ts_index_signature(n),
            ts::TsTypeElement::Signature(n) => {
                self.enter(n.data.span);
                self.visit_ts_signature(n.type_parameters, n.parameters, n.type_annotation);
                self.leave(n.data.span);
            }
        }
    }

    fn visit_ts_module(&mut self, node: &ts::TsModuleDeclaration<'a>) {
        self.enter(node.data.span);
        match node.id {
            ts::TsModuleName::Identifier(id) => self.visit_identifier(id),
            ts::TsModuleName::String(s) => self.visit_leaf(&s.data),
        }
        match node.body {
            Some(ts::TsModuleBody::Block(block)) => {
                self.enter(block.data.span);
                for stmt in block.body.iter() {
                    self.visit_statement(stmt);
                }
                self.leave(block.data.span);
            }
            Some(ts::TsModuleBody::Declaration(inner)) => self.visit_ts_module(inner),
            None => {}
        }
        self.leave(node.data.span);
    }

    fn visit_flow_type_annotation(&mut self, node: &flow::FlowTypeAnnotation<'a>) {
        self.enter(node.data.span);
        self.visit_flow_type(&node.type_annotation);
        self.leave(node.data.span);
    }

    fn visit_flow_type_parameters(&mut self, node: &flow::FlowTypeParameterDeclaration<'a>) {
        self.enter(node.data.span);
        for param in node.params.iter() {
            self.enter(param.data.span);
            if let Some(variance) = param.variance {
                self.visit_leaf(&variance.data);
            }
            if let Some(bound) = param.bound {
                self.visit_flow_type_annotation(bound);
            }
            if let Some(default) = &param.default {
                self.visit_flow_type(default);
            }
            self.leave(param.data.span);
        }
        self.leave(node.data.span);
    }

    fn visit_flow_type_arguments(&mut self, node: &flow::FlowTypeParameterInstantiation<'a>) {
        self.enter(node.data.span);
        for ty in node.params.iter() {
            self.visit_flow_type(ty);
        }
        self.leave(node.data.span);
    }

    fn visit_flow_type_id(&mut self, id: &flow::FlowTypeId<'a>) {
        match *id {
            flow::FlowTypeId::Identifier(ident) => self.visit_identifier(ident),
            flow::FlowTypeId::Qualified(q) => {
                self.enter(q.data.span);
                self.visit_flow_type_id(&q.qualification);
                self.visit_identifier(q.id);
                self.leave(q.data.span);
            }
        }
    }

    fn visit_flow_function_type(&mut self, node: &flow::FunctionTypeAnnotation<'a>) {
        self.enter(node.data.span);
        if let Some(tp) = node.type_parameters {
            self.visit_flow_type_parameters(tp);
        }
        for param in node.params.iter().chain(node.rest.iter()) {
            self.enter(param.data.span);
            if let Some(name) = param.name {
                self.visit_identifier(name);
            }
            self.visit_flow_type(&param.type_annotation);
            self.leave(param.data.span);
        }
        self.visit_flow_type(&node.return_type);
        self.leave(node.data.span);
    }

    fn visit_flow_type(&mut self, ty: &FlowType<'a>) {
        match *ty {
            FlowType::Keyword(n) => self.visit_leaf(&n.data),
            FlowType::Nullable(n) => {
                self.enter(n.data.span);
                self.visit_flow_type(&n.type_annotation);
                self.leave(n.data.span);
            }
            FlowType::Union(n) => {
                self.enter(n.data.span);
                for t in n.types.iter() {
                    self.visit_flow_type(t);
                }
                self.leave(n.data.span);
            }
            FlowType::Intersection(n) => {
                self.enter(n.data.span);
                for t in n.types.iter() {
                    self.visit_flow_type(t);
                }
                self.leave(n.data.span);
            }
            FlowType::Array(n) => {
                self.enter(n.data.span);
                self.visit_flow_type(&n.element_type);
                self.leave(n.data.span);
            }
            FlowType::Generic(n) => {
                self.enter(n.data.span);
                self.visit_flow_type_id(&n.id);
                if let Some(args) = n.type_parameters {
                    self.visit_flow_type_arguments(args);
                }
                self.leave(n.data.span);
            }
            FlowType::Object(n) => {
                self.enter(n.data.span);
                for prop in n.properties.iter() {
                    match *prop {
                        flow::ObjectTypeMember::Property(p) => {
                            self.enter(p.data.span);
                            if let Some(variance) = p.variance {
                                self.visit_leaf(&variance.data);
                            }
                            self.visit_expression(&p.key);
                            self.visit_flow_type(&p.value);
                            self.leave(p.data.span);
                        }
                        flow::ObjectTypeMember::Spread(s) => {
                            self.enter(s.data.span);
                            self.visit_flow_type(&s.argument);
                            self.leave(s.data.span);
                        }
                    }
                }
                for indexer in n.indexers.iter() {
                    self.enter(indexer.data.span);
                    if let Some(id) = indexer.id {
                        self.visit_identifier(id);
                    }
                    self.visit_flow_type(&indexer.key);
                    self.visit_flow_type(&indexer.value);
                    self.leave(indexer.data.span);
                }
                for call in n.call_properties.iter() {
                    self.enter(call.data.span);
                    self.visit_flow_function_type(call.value);
                    self.leave(call.data.span);
                }
                self.leave(n.data.span);
            }
            FlowType::Function(n) => self.visit_flow_function_type(n),
            FlowType::Typeof(n) => {
                self.enter(n.data.span);
                self.visit_flow_type(&n.argument);
                self.leave(n.data.span);
            }
            FlowType::Tuple(n) => {
                self.enter(n.data.span);
                for t in n.types.iter() {
                    self.visit_flow_type(t);
                }
                self.leave(n.data.span);
            }
            FlowType::StringLiteral(n) => self.visit_leaf(&n.data),
            FlowType::NumberLiteral(n) => self.visit_leaf(&n.data),
            FlowType::BooleanLiteral(n) => self.visit_leaf(&n.data),
        }
    }
}
