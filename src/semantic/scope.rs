//! Lexical scopes of the identifier resolver.
//!
//! Scopes form a stack that mirrors the nesting of scope-opening constructs
//! during the traversal. Each scope keeps three insertion-ordered lists: the
//! ordinary identifiers declared in it, the struct/union tags and the enum
//! definitions. A popped scope is gone for good.

use log::{debug, trace};

use crate::ast::{Ast, NameId, NodeKind, NodeRef, Resolved};

/// An ordinary identifier recorded in a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredId {
    /// A `DirectDeclaratorId`.
    Declarator(NodeRef),
    Enumerator(NodeRef),
    /// An old-style parameter `IdentifierList`; it declares all its names.
    ParamIdList(NodeRef),
}

/// A struct or union tag recorded in a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDecl {
    Ref(NodeRef),
    Def(NodeRef),
}

impl TagDecl {
    pub fn node(self) -> NodeRef {
        match self {
            TagDecl::Ref(n) | TagDecl::Def(n) => n,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scope {
    declared_ids: Vec<DeclaredId>,
    declared_tags: Vec<TagDecl>,
    defined_enums: Vec<NodeRef>,
}

/// Result of an ordinary identifier lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdLookup {
    pub found: DeclaredId,
    /// Position of the name within an old-style parameter list.
    pub slot: u32,
    /// Whether the record lives in the first scope searched.
    pub in_innermost: bool,
}

impl IdLookup {
    /// What an identifier expression resolving to this record refers to.
    pub fn resolved(&self) -> Resolved {
        match self.found {
            DeclaredId::Declarator(d) => Resolved::Declarator(d),
            DeclaredId::Enumerator(e) => Resolved::Enumerator(e),
            DeclaredId::ParamIdList(list) => Resolved::InParamIdList { list, slot: self.slot },
        }
    }
}

/// The stack of active scopes. It starts out holding the file scope.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::default()],
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
        debug!("ScopeStack: Pushed new scope. Depth is now {}", self.scopes.len());
    }

    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "ICE: attempted to pop the file scope");
        self.scopes.pop();
        debug!("ScopeStack: Popped scope. Depth is now {}", self.scopes.len());
    }

    fn current(&mut self) -> &mut Scope {
        match self.scopes.last_mut() {
            Some(scope) => scope,
            None => panic!("ICE: empty scope stack"),
        }
    }

    pub fn declare_id(&mut self, id: DeclaredId) {
        self.current().declared_ids.push(id);
    }

    /// Record `id` in the scope just outside the current one.
    pub fn declare_id_in_enclosing(&mut self, id: DeclaredId) {
        let len = self.scopes.len();
        assert!(len >= 2, "ICE: no enclosing scope");
        self.scopes[len - 2].declared_ids.push(id);
    }

    pub fn declare_tag(&mut self, tag: TagDecl) {
        self.current().declared_tags.push(tag);
    }

    pub fn define_enum(&mut self, enum_def: NodeRef) {
        self.current().defined_enums.push(enum_def);
    }

    /// Look up an ordinary identifier, innermost scope first.
    ///
    /// Within one scope the latest record wins. If `filter` rejects that
    /// record the rest of the scope is skipped and the search goes on
    /// outwards. With `skip_innermost` the current scope is not searched.
    pub fn lookup_id(
        &self,
        ast: &Ast,
        name: NameId,
        filter: impl Fn(DeclaredId) -> bool,
        skip_innermost: bool,
    ) -> Option<IdLookup> {
        let skip = usize::from(skip_innermost);
        assert!(self.scopes.len() > skip, "ICE: no scope left to search");

        for (depth, scope) in self.scopes.iter().rev().skip(skip).enumerate() {
            let hit = scope
                .declared_ids
                .iter()
                .rev()
                .find_map(|&id| Self::match_id(ast, id, name).map(|slot| (id, slot)));
            let Some((found, slot)) = hit else {
                continue;
            };
            if !filter(found) {
                continue;
            }
            trace!("ScopeStack: '{}' found as {:?} at depth {}", name, found, depth);
            return Some(IdLookup {
                found,
                slot,
                in_innermost: depth == 0,
            });
        }
        None
    }

    /// Slot of `name` if the record declares it.
    fn match_id(ast: &Ast, id: DeclaredId, name: NameId) -> Option<u32> {
        match id {
            DeclaredId::Declarator(n) | DeclaredId::Enumerator(n) => (ast.name_of(n) == Some(name)).then_some(0),
            DeclaredId::ParamIdList(list) => match ast.kind(list) {
                NodeKind::IdentifierList(tokens) => tokens
                    .iter()
                    .position(|&t| ast.spelling(t) == name)
                    .map(|slot| slot as u32),
                other => panic!("ICE: expected IdentifierList, found {:?}", other.tag()),
            },
        }
    }

    /// The latest declarator-id record for `name`, ignoring enumerators and
    /// parameter lists.
    pub fn lookup_typedef_declarator(&self, ast: &Ast, name: NameId) -> Option<NodeRef> {
        self.scopes.iter().rev().find_map(|scope| {
            scope.declared_ids.iter().rev().find_map(|&id| match id {
                DeclaredId::Declarator(d) if ast.name_of(d) == Some(name) => Some(d),
                _ => None,
            })
        })
    }

    fn searched(&self, only_current: bool) -> impl Iterator<Item = &Scope> {
        let count = if only_current { 1 } else { self.scopes.len() };
        self.scopes.iter().rev().take(count)
    }

    pub fn lookup_tag(&self, ast: &Ast, name: NameId, only_current: bool) -> Option<TagDecl> {
        self.searched(only_current).find_map(|scope| {
            scope
                .declared_tags
                .iter()
                .copied()
                .find(|tag| ast.name_of(tag.node()) == Some(name))
        })
    }

    pub fn lookup_enum_def(&self, ast: &Ast, name: NameId, only_current: bool) -> Option<NodeRef> {
        self.searched(only_current).find_map(|scope| {
            scope
                .defined_enums
                .iter()
                .copied()
                .find(|&e| ast.name_of(e) == Some(name))
        })
    }
}
