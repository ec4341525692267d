//! Linkage of declarations and function definitions.
//!
//! Every declaration that can have linkage gets a [`LinkageKind`] and, when it
//! redeclares an entity seen before, a link to that earlier declaration.
//! External declarations at block scope that nothing visible matches are
//! kept on a pending list until a file-scope declaration of the same name
//! shows up.

use log::debug;

use crate::ast::{DeclContext, Linkage, LinkageKind, NodeRef, NodeTag, StorageClass};
use crate::diagnostic::SemanticError;

use super::resolver::IdResolver;
use super::scope::DeclaredId;

impl IdResolver<'_> {
    fn context_of(&self, ddid: NodeRef) -> DeclContext {
        match self.ast.declarator_id(ddid).context.get() {
            Some(context) => context,
            None => panic!("ICE: declarator id {} has no context yet", ddid),
        }
    }

    fn storage_class_of(&self, context: DeclContext) -> StorageClass {
        self.ast
            .context_specifiers(context)
            .map_or(StorageClass::None, |specs| self.ast.storage_class(specs))
    }

    /// The `InitDeclarator` or `FunctionDefinition` carrying the linkage of a
    /// recorded identifier.
    fn linkage_owner(&self, id: DeclaredId) -> Option<NodeRef> {
        match id {
            DeclaredId::Declarator(ddid) => match self.context_of(ddid) {
                DeclContext::InitDecl(n) | DeclContext::FunctionDef(n) => Some(n),
                DeclContext::ParameterDecl(_) | DeclContext::StructDecl(_) => None,
            },
            DeclaredId::Enumerator(_) | DeclaredId::ParamIdList(_) => None,
        }
    }

    fn linkage_kind_of(&self, id: DeclaredId) -> LinkageKind {
        match id {
            DeclaredId::Declarator(ddid) => self.ast.context_linkage_kind(self.context_of(ddid)),
            DeclaredId::Enumerator(_) | DeclaredId::ParamIdList(_) => LinkageKind::None,
        }
    }

    fn has_linkage(&self, id: DeclaredId) -> bool {
        self.linkage_kind_of(id) != LinkageKind::None
    }

    /// Share the linkage of `prev`, which must have linkage.
    fn link(&self, linkage: &Linkage, prev: DeclaredId) {
        let Some(owner) = self.linkage_owner(prev) else {
            panic!("ICE: linking to {:?}, which has no linkage", prev);
        };
        linkage.link_to(owner, self.ast.linkage(owner).kind());
    }

    fn is_typedef(&self, id: DeclaredId) -> bool {
        match id {
            DeclaredId::Declarator(ddid) => match self.context_of(ddid) {
                context @ DeclContext::InitDecl(_) => self.storage_class_of(context) == StorageClass::Typedef,
                _ => false,
            },
            _ => false,
        }
    }

    /// Declarator id of an ordinary declaration.
    pub(super) fn handle_init_decl(&mut self, ddid: NodeRef, init_declarator: NodeRef) -> Result<(), SemanticError> {
        let ast = self.ast;
        let token = ast.declarator_id(ddid).token;
        let (name, location) = self.name_and_span(token);
        let declaration = ast.containing_declaration(init_declarator);
        let sc = self.storage_class_of(DeclContext::InitDecl(init_declarator));
        let is_fun = ast.declares_function(ddid);
        let at_file_scope = ast.is_at_file_scope(declaration);
        let nested_auto_fun = is_fun && !at_file_scope && sc == StorageClass::Auto;

        if nested_auto_fun && !self.opts.gnu_mode {
            return Err(SemanticError::NestedFunctionExtension { name, location });
        }

        let prev = self.scopes.lookup_id(ast, name, |_| true, false);

        let is_local_nonfun = !is_fun && !at_file_scope && sc != StorageClass::Extern;
        let no_linkage = is_local_nonfun
            || (!matches!(sc, StorageClass::None | StorageClass::Static | StorageClass::Extern) && !nested_auto_fun);

        // Same-scope redeclarations.
        if let Some(prev) = prev
            && prev.in_innermost
            && (no_linkage || matches!(prev.found, DeclaredId::Enumerator(_)))
        {
            let both_typedefs = sc == StorageClass::Typedef && self.is_typedef(prev.found);
            // `int f(a) int a; { ... }`
            let oldstyle_param = is_local_nonfun
                && matches!(prev.found, DeclaredId::ParamIdList(_))
                && ast.parent_tag(declaration) == Some(NodeTag::DeclarationList);
            if !(both_typedefs || oldstyle_param) {
                return Err(SemanticError::InvalidRedeclaration { name, location });
            }
        }

        if no_linkage {
            self.scopes.declare_id(DeclaredId::Declarator(ddid));
            return Ok(());
        }

        let linkage = &ast.init_declarator(init_declarator).linkage;
        if at_file_scope && sc == StorageClass::Static {
            match prev {
                Some(prev) => {
                    if self.linkage_kind_of(prev.found) != LinkageKind::Internal {
                        return Err(SemanticError::StaticFollowsNonStatic { name, location });
                    }
                    self.link(linkage, prev.found);
                }
                None => {
                    self.try_resolve_pending(ddid, LinkageKind::Internal)?;
                }
            }
        } else if sc == StorageClass::Extern || (sc == StorageClass::None && is_fun) {
            // Inherit the linkage of the nearest visible declaration that has
            // one, external otherwise.
            let mut target = prev.map(|p| p.found).filter(|&id| self.has_linkage(id));
            if target.is_none() && prev.is_some() {
                if let Some(with_linkage) = self.scopes.lookup_id(ast, name, |id| self.has_linkage(id), false) {
                    if self.linkage_kind_of(with_linkage.found) != LinkageKind::External {
                        return Err(SemanticError::ExternFollowsStatic { name, location });
                    }
                    target = Some(with_linkage.found);
                }
            }
            match target {
                Some(target) => self.link(linkage, target),
                None => self.add_pending(ddid, LinkageKind::External)?,
            }
        } else if at_file_scope {
            // Object at file scope without storage class.
            match prev {
                Some(prev) => {
                    if self.linkage_kind_of(prev.found) != LinkageKind::External {
                        return Err(SemanticError::NonStaticFollowsStatic { name, location });
                    }
                    self.link(linkage, prev.found);
                }
                None => {
                    self.try_resolve_pending(ddid, LinkageKind::External)?;
                }
            }
        } else if nested_auto_fun {
            match prev.filter(|p| p.in_innermost) {
                Some(prev) => {
                    if self.linkage_kind_of(prev.found) != LinkageKind::NestedFunAuto {
                        return Err(SemanticError::AutoNestedFollowsExternal { name, location });
                    }
                    self.link(linkage, prev.found);
                }
                None => linkage.set_kind(LinkageKind::NestedFunAuto),
            }
        } else {
            debug_assert!(sc == StorageClass::Static && is_fun && !at_file_scope);
            return Err(SemanticError::StaticAtBlockScopeFunction { name, location });
        }

        debug!(
            "Linkage: '{}' ({}) is {:?}, linked to {:?}",
            name,
            init_declarator,
            linkage.kind(),
            linkage.target()
        );
        self.scopes.declare_id(DeclaredId::Declarator(ddid));
        Ok(())
    }

    /// Declarator id naming the function of a function definition.
    pub(super) fn handle_fun_def(&mut self, ddid: NodeRef, fundef: NodeRef) -> Result<(), SemanticError> {
        let ast = self.ast;
        let token = ast.declarator_id(ddid).token;
        let (name, location) = self.name_and_span(token);

        if !ast.declares_function(ddid) {
            return Err(SemanticError::MissingFunctionDeclarator { name, location });
        }

        let sc = self.storage_class_of(DeclContext::FunctionDef(fundef));
        let at_file_scope = ast.is_at_file_scope(fundef);
        let valid_sc = match sc {
            StorageClass::None => true,
            StorageClass::Static | StorageClass::Extern => at_file_scope,
            StorageClass::Auto => !at_file_scope,
            StorageClass::Typedef | StorageClass::Register => false,
        };
        if !valid_sc {
            return Err(SemanticError::InvalidFunctionStorageClass { name, location });
        }
        if !at_file_scope && !self.opts.gnu_mode {
            return Err(SemanticError::NestedFunctionExtension { name, location });
        }

        // The definition's own scope is already open; its name belongs to
        // the enclosing one.
        let prev = self.scopes.lookup_id(ast, name, |_| true, true);

        if let Some(prev) = prev
            && prev.in_innermost
            && matches!(prev.found, DeclaredId::Enumerator(_) | DeclaredId::ParamIdList(_))
        {
            return Err(SemanticError::InvalidRedeclaration { name, location });
        }

        let linkage = &ast.function_definition(fundef).linkage;
        if !at_file_scope {
            match prev.filter(|p| p.in_innermost) {
                Some(prev) => {
                    if self.linkage_kind_of(prev.found) != LinkageKind::NestedFunAuto {
                        return Err(SemanticError::NestedDefinitionFollowsExternal { name, location });
                    }
                    self.link(linkage, prev.found);
                }
                None => linkage.set_kind(LinkageKind::NestedFunAuto),
            }
        } else if sc == StorageClass::Static {
            match prev {
                Some(prev) => {
                    if self.linkage_kind_of(prev.found) != LinkageKind::Internal {
                        return Err(SemanticError::StaticFollowsNonStatic { name, location });
                    }
                    self.link(linkage, prev.found);
                }
                None => {
                    self.try_resolve_pending(ddid, LinkageKind::Internal)?;
                }
            }
        } else {
            match prev.filter(|p| self.has_linkage(p.found)) {
                Some(prev) => self.link(linkage, prev.found),
                None => {
                    self.try_resolve_pending(ddid, LinkageKind::External)?;
                }
            }
        }

        debug!(
            "Linkage: function '{}' ({}) is {:?}, linked to {:?}",
            name,
            fundef,
            linkage.kind(),
            linkage.target()
        );
        self.scopes.declare_id_in_enclosing(DeclaredId::Declarator(ddid));
        Ok(())
    }

    /// Match `ddid` against the pending list, or park it there.
    fn add_pending(&mut self, ddid: NodeRef, kind: LinkageKind) -> Result<(), SemanticError> {
        if !self.try_resolve_pending(ddid, kind)? {
            let name = self.ast.spelling(self.ast.declarator_id(ddid).token);
            debug!("Linkage: '{}' ({}) left pending", name, ddid);
            self.pending_linkages.push(ddid);
        }
        Ok(())
    }

    /// Link `ddid` to a pending declaration of the same name, if any, and
    /// give it linkage `kind` otherwise.
    ///
    /// Returns whether later declarations can find `ddid` through ordinary
    /// lookup, i.e. whether it was declared at file scope.
    fn try_resolve_pending(&mut self, ddid: NodeRef, kind: LinkageKind) -> Result<bool, SemanticError> {
        let ast = self.ast;
        let token = ast.declarator_id(ddid).token;
        let name = ast.spelling(token);

        let (owner, at_file_scope) = match self.context_of(ddid) {
            DeclContext::InitDecl(n) => (n, ast.is_at_file_scope(ast.containing_declaration(n))),
            DeclContext::FunctionDef(n) => (n, ast.is_at_file_scope(n)),
            context => panic!("ICE: {:?} cannot have linkage", context),
        };
        let linkage = ast.linkage(owner);

        let Some(pos) = self.pending_linkages.iter().position(|&p| ast.name_of(p) == Some(name)) else {
            linkage.set_kind(kind);
            return Ok(at_file_scope);
        };

        let pending = DeclaredId::Declarator(self.pending_linkages[pos]);
        let pending_kind = self.linkage_kind_of(pending);
        debug_assert_eq!(pending_kind, LinkageKind::External);
        if kind != pending_kind {
            let (name, location) = self.name_and_span(token);
            return Err(SemanticError::StaticFollowsExternal { name, location });
        }

        self.link(linkage, pending);
        if at_file_scope {
            // Later declarations find this one through ordinary lookup.
            self.pending_linkages.remove(pos);
            return Ok(true);
        }
        Ok(false)
    }
}
