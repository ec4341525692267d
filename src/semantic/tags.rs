//! Struct, union and enum tags.
//!
//! All declarations of one struct or union tag are joined into a ring (see
//! [`TagChain`](crate::ast::TagChain)); a usage links to the declaration it
//! found. Enums cannot be forward declared, so an enum reference links
//! straight to its definition. All three kinds share one tag namespace.

use std::convert::Infallible;

use log::debug;

use crate::ast::dispatch::Handler;
use crate::ast::traverse::AncestorWalk;
use crate::ast::{Ast, KindSet, NodeKind, NodeRef, NodeTag};
use crate::diagnostic::SemanticError;

use super::resolver::IdResolver;
use super::scope::TagDecl;

/// Whether a struct or union reference declares its tag (`struct S;`) or
/// uses it.
pub struct StandaloneCheck<'a> {
    ast: &'a Ast,
    standalone: bool,
}

fn on_struct_declaration(check: &mut StandaloneCheck<'_>, node: NodeRef) -> Result<bool, Infallible> {
    if let NodeKind::StructDeclaration(data) = check.ast.kind(node) {
        check.standalone = data.declarators.is_empty();
    }
    Ok(false)
}

fn on_declaration(check: &mut StandaloneCheck<'_>, node: NodeRef) -> Result<bool, Infallible> {
    if let NodeKind::Declaration(data) = check.ast.kind(node) {
        check.standalone = data.init_declarators.is_empty();
    }
    Ok(false)
}

fn on_usage(check: &mut StandaloneCheck<'_>, _: NodeRef) -> Result<bool, Infallible> {
    check.standalone = false;
    Ok(false)
}

pub(super) fn standalone_walk<'a>() -> AncestorWalk<StandaloneCheck<'a>, Infallible> {
    let boundary = KindSet::of_all(&[
        NodeTag::StructDeclaration,
        NodeTag::TypeName,
        NodeTag::Declaration,
        NodeTag::ParameterDeclarationDeclarator,
        NodeTag::ParameterDeclarationAbstract,
        NodeTag::FunctionDefinition,
    ]);
    AncestorWalk::new(
        NodeTag::StructOrUnionRef,
        boundary,
        vec![
            Handler::of(NodeTag::StructDeclaration, on_struct_declaration),
            Handler::of(NodeTag::Declaration, on_declaration),
            Handler::new(
                KindSet::of_all(&[
                    NodeTag::TypeName,
                    NodeTag::ParameterDeclarationDeclarator,
                    NodeTag::ParameterDeclarationAbstract,
                    NodeTag::FunctionDefinition,
                ]),
                on_usage,
            ),
        ],
        // Specifier lists.
        |_, _| Ok(true),
    )
}

impl IdResolver<'_> {
    pub(super) fn handle_sou_ref(&mut self, node: NodeRef) -> Result<(), SemanticError> {
        let ast = self.ast;
        let NodeKind::StructOrUnionRef(data) = ast.kind(node) else {
            panic!("ICE: expected StructOrUnionRef");
        };
        let (name, location) = self.name_and_span(data.token);

        let mut check = StandaloneCheck { ast, standalone: false };
        let Ok(()) = self.standalone_walk.run(ast, node, &mut check);

        // A declaration only redeclares a tag of the current scope.
        let Some(prev) = self.scopes.lookup_tag(ast, name, check.standalone) else {
            if self.scopes.lookup_enum_def(ast, name, true).is_some() {
                return Err(SemanticError::TagKindMismatch { name, location });
            }
            debug!("Tags: Declared {:?} '{}' ({})", data.kind, name, node);
            self.scopes.declare_tag(TagDecl::Ref(node));
            return Ok(());
        };

        if check.standalone {
            ast.link_tag_chain(node, prev.node());
        } else {
            data.declaration.set(Some(prev.node()));
        }

        if ast.tag_kind(prev.node()) != data.kind {
            return Err(SemanticError::TagKindMismatch { name, location });
        }
        Ok(())
    }

    pub(super) fn handle_sou_def(&mut self, node: NodeRef) -> Result<(), SemanticError> {
        let ast = self.ast;
        let NodeKind::StructOrUnionDef(data) = ast.kind(node) else {
            panic!("ICE: expected StructOrUnionDef");
        };
        let Some(token) = data.token else {
            return Ok(());
        };
        let (name, location) = self.name_and_span(token);

        match self.scopes.lookup_tag(ast, name, true) {
            Some(prev) => {
                let prev_def = match prev {
                    TagDecl::Def(def) => Some(def),
                    TagDecl::Ref(r) => ast.find_tag_definition(r),
                };
                ast.link_tag_chain(node, prev.node());

                if ast.tag_kind(prev.node()) != data.kind {
                    return Err(SemanticError::TagKindMismatch { name, location });
                }
                if prev_def.is_some() {
                    return Err(SemanticError::StructOrUnionRedefined { name, location });
                }
            }
            None => {
                if self.scopes.lookup_enum_def(ast, name, true).is_some() {
                    return Err(SemanticError::TagKindMismatch { name, location });
                }
                self.scopes.declare_tag(TagDecl::Def(node));
            }
        }
        debug!("Tags: Defined {:?} '{}' ({})", data.kind, name, node);
        Ok(())
    }

    pub(super) fn handle_enum_def(&mut self, node: NodeRef) -> Result<(), SemanticError> {
        let ast = self.ast;
        let NodeKind::EnumDef(data) = ast.kind(node) else {
            panic!("ICE: expected EnumDef");
        };
        let Some(token) = data.token else {
            return Ok(());
        };
        let (name, location) = self.name_and_span(token);

        if self.scopes.lookup_enum_def(ast, name, true).is_some() {
            return Err(SemanticError::EnumRedeclared { name, location });
        }
        if self.scopes.lookup_tag(ast, name, true).is_some() {
            return Err(SemanticError::TagKindMismatch { name, location });
        }

        debug!("Tags: Defined enum '{}' ({})", name, node);
        self.scopes.define_enum(node);
        Ok(())
    }

    pub(super) fn handle_enum_ref(&mut self, node: NodeRef) -> Result<(), SemanticError> {
        let ast = self.ast;
        let NodeKind::EnumRef(data) = ast.kind(node) else {
            panic!("ICE: expected EnumRef");
        };
        let (name, location) = self.name_and_span(data.token);

        match self.scopes.lookup_enum_def(ast, name, false) {
            Some(def) => {
                data.definition.set(Some(def));
                Ok(())
            }
            None => Err(SemanticError::EnumUndeclared { name, location }),
        }
    }
}
