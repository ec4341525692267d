//! Identifier resolution.
//!
//! One combined pre-/post-order walk over the translation unit. Pre-order
//! handlers open scopes, record declarations and resolve uses; the post-order
//! handler closes every scope a pre-order handler opened.
//!
//! Linkage computation lives in [`super::linkage`], tag handling in
//! [`super::tags`].

use std::convert::Infallible;

use log::{debug, trace};

use crate::ast::dispatch::{Dispatcher, Handler};
use crate::ast::traverse::{AncestorWalk, for_each_dfs_pre_and_po};
use crate::ast::{Ast, DeclContext, KindSet, NameId, NodeKind, NodeRef, NodeTag, Resolved, TypedefResolution};
use crate::diagnostic::{DiagnosticEngine, SemanticError, SemanticWarning};
use crate::lang_options::LangOptions;
use crate::source_manager::SourceSpan;
use crate::token::TokenIndex;

use super::builtins;
use super::scope::{DeclaredId, ScopeStack};
use super::tags::StandaloneCheck;

type PreResult = Result<bool, SemanticError>;

/// Where a declarator id declares its name.
#[derive(Default)]
struct ContextFinder {
    context: Option<DeclContext>,
}

pub struct IdResolver<'a> {
    pub(super) ast: &'a Ast,
    pub(super) diag: &'a mut DiagnosticEngine,
    pub(super) opts: &'a LangOptions,
    pub(super) scopes: ScopeStack,
    /// Declarator ids with external linkage not yet matched by a file-scope
    /// declaration.
    pub(super) pending_linkages: Vec<NodeRef>,
    context_walk: AncestorWalk<ContextFinder, Infallible>,
    pub(super) standalone_walk: AncestorWalk<StandaloneCheck<'a>, Infallible>,
}

impl<'a> IdResolver<'a> {
    pub fn new(ast: &'a Ast, diag: &'a mut DiagnosticEngine, opts: &'a LangOptions) -> Self {
        let context_boundary = KindSet::of_all(&[
            NodeTag::StructDeclarator,
            NodeTag::ParameterDeclarationDeclarator,
            NodeTag::InitDeclarator,
            NodeTag::FunctionDefinition,
        ]);
        let context_walk = AncestorWalk::new(
            NodeTag::DirectDeclaratorId,
            context_boundary,
            vec![
                Handler::of(NodeTag::StructDeclarator, |f: &mut ContextFinder, n| {
                    f.context = Some(DeclContext::StructDecl(n));
                    Ok(false)
                }),
                Handler::of(NodeTag::ParameterDeclarationDeclarator, |f: &mut ContextFinder, n| {
                    f.context = Some(DeclContext::ParameterDecl(n));
                    Ok(false)
                }),
                Handler::of(NodeTag::InitDeclarator, |f: &mut ContextFinder, n| {
                    f.context = Some(DeclContext::InitDecl(n));
                    Ok(false)
                }),
                Handler::of(NodeTag::FunctionDefinition, |f: &mut ContextFinder, n| {
                    f.context = Some(DeclContext::FunctionDef(n));
                    Ok(false)
                }),
            ],
            // Declarators and direct declarators on the way up.
            |_, _| Ok(true),
        );

        IdResolver {
            ast,
            diag,
            opts,
            scopes: ScopeStack::new(),
            pending_linkages: Vec::new(),
            context_walk,
            standalone_walk: super::tags::standalone_walk(),
        }
    }

    /// Resolve the whole translation unit.
    pub fn run(&mut self) -> Result<(), SemanticError> {
        let pre = Dispatcher::new(
            vec![
                Handler::new(
                    KindSet::of_all(&[
                        NodeTag::FunctionDefinition,
                        NodeTag::StmtCompound,
                        NodeTag::StmtIf,
                        NodeTag::StmtSwitch,
                        NodeTag::StmtForInitDecl,
                        NodeTag::StmtForInitExpr,
                        NodeTag::StmtWhile,
                        NodeTag::StmtDo,
                    ]),
                    open_scope,
                ),
                Handler::new(KindSet::STMT, on_statement),
                Handler::of(NodeTag::ParameterDeclarationList, on_parameter_list),
                Handler::of(NodeTag::DirectDeclaratorId, on_declarator_id),
                Handler::of(NodeTag::Enumerator, on_enumerator),
                Handler::of(NodeTag::IdentifierList, on_identifier_list),
                Handler::of(NodeTag::StructOrUnionRef, |r: &mut IdResolver<'a>, n| {
                    r.handle_sou_ref(n).map(|()| false)
                }),
                Handler::of(NodeTag::StructOrUnionDef, |r: &mut IdResolver<'a>, n| {
                    r.handle_sou_def(n).map(|()| false)
                }),
                Handler::of(NodeTag::EnumRef, |r: &mut IdResolver<'a>, n| r.handle_enum_ref(n).map(|()| false)),
                Handler::of(NodeTag::EnumDef, |r: &mut IdResolver<'a>, n| r.handle_enum_def(n).map(|()| false)),
                Handler::of(NodeTag::ExprId, |r: &mut IdResolver<'a>, n| r.resolve_expr_id(n).map(|()| false)),
                Handler::of(NodeTag::TypeSpecifierTdid, |r: &mut IdResolver<'a>, n| {
                    r.resolve_typedef_name(n).map(|()| false)
                }),
            ],
            |_, _| Ok(false),
        );
        let post = Dispatcher::new(vec![Handler::new(KindSet::all(), close_scope)], close_scope);

        debug!("IdResolver: Resolving {} nodes", self.ast.len());
        let ast = self.ast;
        for_each_dfs_pre_and_po(ast, ast.root(), self, &pre, &post)?;
        debug_assert_eq!(self.scopes.depth(), 1, "unbalanced scopes");
        Ok(())
    }

    pub(super) fn name_and_span(&self, token: TokenIndex) -> (NameId, SourceSpan) {
        (self.ast.spelling(token), self.ast.token_span(token))
    }

    fn find_context(&self, ddid: NodeRef) -> DeclContext {
        let mut finder = ContextFinder::default();
        let Ok(()) = self.context_walk.run(self.ast, ddid, &mut finder);
        match finder.context {
            Some(context) => context,
            None => panic!("ICE: declarator id {} outside of any declaration", ddid),
        }
    }

    fn resolve_expr_id(&mut self, node: NodeRef) -> Result<(), SemanticError> {
        let ast = self.ast;
        let data = ast.expr_id(node);
        let name = ast.spelling(data.token);
        let non_parens_parent = ast.non_parens_parent(node);

        // A goto target names a label of an enclosing block.
        if let Some(goto) = non_parens_parent.filter(|&p| ast.tag(p) == NodeTag::StmtGoto) {
            let mut current = Some(goto);
            while let Some(p) = current {
                if ast.tag(p) == NodeTag::StmtCompound
                    && let Some(label) = ast.lookup_label(p, data.token)
                {
                    data.resolved.set(Resolved::Label(label));
                    return Ok(());
                }
                current = ast.parent(p);
            }
        }

        if let Some(found) = self.scopes.lookup_id(ast, name, |_| true, false) {
            data.resolved.set(found.resolved());
            return Ok(());
        }

        if builtins::is_builtin_id(name) {
            data.resolved.set(Resolved::Builtin);
            return Ok(());
        }

        if self.inside_attribute(node) {
            trace!("IdResolver: Leaving '{}' in attribute unresolved", name);
            return Ok(());
        }

        let (name, location) = self.name_and_span(data.token);
        if self.is_callee(node) && !self.diag.warnings_as_errors {
            self.diag
                .report_warning(SemanticWarning::ImplicitFunctionDeclaration { name, location });
            return Ok(());
        }

        Err(SemanticError::UndeclaredIdentifier { name, location })
    }

    fn inside_attribute(&self, node: NodeRef) -> bool {
        let mut current = self.ast.parent(node);
        while let Some(p) = current {
            if self.ast.tag(p) == NodeTag::Attribute {
                return true;
            }
            current = self.ast.parent(p);
        }
        false
    }

    /// Whether the identifier, possibly parenthesized, is the function
    /// expression of a call.
    fn is_callee(&self, node: NodeRef) -> bool {
        let ast = self.ast;
        let mut outer = node;
        while let Some(p) = ast.parent(outer).filter(|&p| ast.tag(p) == NodeTag::ExprParenthesized) {
            outer = p;
        }
        match ast.parent(outer).map(|p| ast.kind(p)) {
            Some(NodeKind::ExprFuncInvocation(call)) => call.callee == outer,
            _ => false,
        }
    }

    fn resolve_typedef_name(&mut self, node: NodeRef) -> Result<(), SemanticError> {
        let NodeKind::TypeSpecifierTdid(data) = self.ast.kind(node) else {
            panic!("ICE: expected TypeSpecifierTdid");
        };
        let name = self.ast.spelling(data.token);

        if let Some(declarator) = self.scopes.lookup_typedef_declarator(self.ast, name) {
            data.resolved.set(TypedefResolution::Declarator(declarator));
            return Ok(());
        }

        if builtins::is_builtin_typedef(name) {
            data.resolved.set(TypedefResolution::Builtin);
            return Ok(());
        }

        let (name, location) = self.name_and_span(data.token);
        Err(SemanticError::UndeclaredTypedef { name, location })
    }
}

fn open_scope(resolver: &mut IdResolver<'_>, _: NodeRef) -> PreResult {
    resolver.scopes.push_scope();
    Ok(true)
}

fn close_scope(resolver: &mut IdResolver<'_>, _: NodeRef) -> Result<(), SemanticError> {
    resolver.scopes.pop_scope();
    Ok(())
}

/// Sub-statements of selection and iteration statements get a scope of their
/// own. Compound statements already open one.
fn on_statement(resolver: &mut IdResolver<'_>, stmt: NodeRef) -> PreResult {
    match resolver.ast.parent_tag(stmt) {
        Some(parent) if KindSet::SCOPED_STMT_PARENT.has(parent) => open_scope(resolver, stmt),
        _ => Ok(false),
    }
}

/// A prototype's parameters get a scope of their own, except in a function
/// definition, which shares its scope with its parameters.
fn on_parameter_list(resolver: &mut IdResolver<'_>, list: NodeRef) -> PreResult {
    let ast = resolver.ast;
    let in_definition = match ast.parent(list) {
        Some(p) if ast.tag(p) == NodeTag::DirectDeclaratorFunc => ast.is_fundef_declarator_func(p),
        Some(p) if ast.tag(p) == NodeTag::DirectAbstractDeclaratorFunc => false,
        _ => panic!("ICE: parameter list {} outside of a function declarator", list),
    };
    if in_definition {
        return Ok(false);
    }
    open_scope(resolver, list)
}

fn on_declarator_id(resolver: &mut IdResolver<'_>, ddid: NodeRef) -> PreResult {
    let context = resolver.find_context(ddid);
    resolver.ast.declarator_id(ddid).context.set(Some(context));
    trace!("IdResolver: {} declared in {:?}", ddid, context);

    match context {
        DeclContext::StructDecl(_) => {}
        DeclContext::ParameterDecl(_) => resolver.scopes.declare_id(DeclaredId::Declarator(ddid)),
        DeclContext::InitDecl(init_declarator) => resolver.handle_init_decl(ddid, init_declarator)?,
        DeclContext::FunctionDef(fundef) => resolver.handle_fun_def(ddid, fundef)?,
    }
    Ok(false)
}

fn on_enumerator(resolver: &mut IdResolver<'_>, enumerator: NodeRef) -> PreResult {
    resolver.scopes.declare_id(DeclaredId::Enumerator(enumerator));
    Ok(false)
}

/// Only the identifier list of the function being defined declares names.
fn on_identifier_list(resolver: &mut IdResolver<'_>, list: NodeRef) -> PreResult {
    let ast = resolver.ast;
    let declares = ast
        .parent(list)
        .is_some_and(|p| ast.tag(p) == NodeTag::DirectDeclaratorFunc && ast.is_fundef_declarator_func(p));
    if declares {
        resolver.scopes.declare_id(DeclaredId::ParamIdList(list));
    }
    Ok(false)
}
