//! Abstract Syntax Tree (AST) for the resolution passes.
//!
//! The AST is a flattened arena: every node lives in `Ast::kinds` and refers
//! to its children through [`NodeRef`] indices. Parent links are recorded once
//! when a node is attached, so upward walks need no extra bookkeeping.
//!
//! ## Architecture
//!
//! - [`nodes`]: node kinds and the data attached to them
//! - [`kind_set`]: bit sets over node kinds and the grammar's parent relation
//! - [`dispatch`]: kind-directed handler dispatch
//! - [`traverse`]: depth-first and ancestor walks built on the dispatcher
//! - [`builder`]: programmatic construction of well-formed trees
//! - [`dumper`]: textual dump of resolution results
//!
//! Resolution results (linkage, resolved references, tag chains, label
//! tables) are written through `Cell`s, so the passes only need `&Ast`.

use std::cell::Cell;
use std::num::NonZeroU32;

use thin_vec::ThinVec;

/// Represents an interned string using symbol_table crate.
pub type NameId = symbol_table::GlobalSymbol;

use crate::source_manager::SourceSpan;
use crate::token::{TokenIndex, TokenStream};

pub mod builder;
pub mod dispatch;
pub mod dumper;
pub mod kind_set;
pub mod nodes;
pub mod traverse;

pub use builder::AstBuilder;
pub use kind_set::KindSet;
pub use nodes::*;

#[cfg(test)]
mod tests_dispatch;
#[cfg(test)]
mod tests_traverse;

/// The flattened AST storage.
#[derive(Debug, Default)]
pub struct Ast {
    pub kinds: Vec<NodeKind>,
    parents: Vec<Option<NodeRef>>,
    tokens: TokenStream,
    root: Option<NodeRef>,
    resolved: Cell<bool>,
}

impl Ast {
    pub fn new(tokens: TokenStream) -> Self {
        Ast {
            tokens,
            ..Ast::default()
        }
    }

    /// Add a node and adopt its children.
    pub(crate) fn push_node(&mut self, kind: NodeKind) -> NodeRef {
        let index = self.kinds.len() as u32 + 1; // Start from 1 for NonZeroU32
        let node = NodeRef::new(index).expect("NodeRef overflow");
        let parents = &mut self.parents;
        kind.for_each_child(|child| {
            let slot = &mut parents[child.index()];
            assert!(slot.is_none(), "ICE: node {:?} attached twice", child);
            *slot = Some(node);
        });
        self.kinds.push(kind);
        self.parents.push(None);
        node
    }

    pub(crate) fn set_root(&mut self, root: NodeRef) {
        self.root = Some(root);
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut TokenStream {
        &mut self.tokens
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The translation unit node.
    pub fn root(&self) -> NodeRef {
        match self.root {
            Some(root) => root,
            None => panic!("ICE: AST has no translation unit"),
        }
    }

    pub fn kind(&self, node: NodeRef) -> &NodeKind {
        &self.kinds[node.index()]
    }

    pub fn tag(&self, node: NodeRef) -> NodeTag {
        self.kind(node).tag()
    }

    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.parents[node.index()]
    }

    pub fn parent_tag(&self, node: NodeRef) -> Option<NodeTag> {
        self.parent(node).map(|p| self.tag(p))
    }

    /// Children in source order.
    pub fn children(&self, node: NodeRef) -> ThinVec<NodeRef> {
        let mut children = ThinVec::new();
        self.kind(node).for_each_child(|c| children.push(c));
        children
    }

    /// The `index`th child, `None` past the last one.
    pub fn child(&self, node: NodeRef, index: usize) -> Option<NodeRef> {
        self.children(node).get(index).copied()
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn spelling(&self, token: TokenIndex) -> NameId {
        self.tokens.spelling(token)
    }

    pub fn token_span(&self, token: TokenIndex) -> SourceSpan {
        self.tokens.span(token)
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.resolved.get()
    }

    pub(crate) fn mark_resolved(&self) {
        self.resolved.set(true);
    }
}

/// Node reference type for referencing nodes in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct NodeRef(NonZeroU32);

impl NodeRef {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn index(self) -> usize {
        (self.get() - 1) as usize
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.get())
    }
}

// Typed accessors. The parser guarantees the shape, so a mismatch is an ICE.
impl Ast {
    pub fn declarator_id(&self, node: NodeRef) -> &DeclaratorIdData {
        match self.kind(node) {
            NodeKind::DirectDeclaratorId(data) => data,
            other => panic!("ICE: expected DirectDeclaratorId, found {:?}", other.tag()),
        }
    }

    pub fn expr_id(&self, node: NodeRef) -> &ExprIdData {
        match self.kind(node) {
            NodeKind::ExprId(data) => data,
            other => panic!("ICE: expected ExprId, found {:?}", other.tag()),
        }
    }

    pub fn init_declarator(&self, node: NodeRef) -> &InitDeclaratorData {
        match self.kind(node) {
            NodeKind::InitDeclarator(data) => data,
            other => panic!("ICE: expected InitDeclarator, found {:?}", other.tag()),
        }
    }

    pub fn function_definition(&self, node: NodeRef) -> &FunctionDefinitionData {
        match self.kind(node) {
            NodeKind::FunctionDefinition(data) => data,
            other => panic!("ICE: expected FunctionDefinition, found {:?}", other.tag()),
        }
    }

    pub fn compound(&self, node: NodeRef) -> &CompoundStmtData {
        match self.kind(node) {
            NodeKind::StmtCompound(data) => data,
            other => panic!("ICE: expected StmtCompound, found {:?}", other.tag()),
        }
    }

    pub fn labeled_stmt(&self, node: NodeRef) -> &LabeledStmtData {
        match self.kind(node) {
            NodeKind::StmtLabeled(data) => data,
            other => panic!("ICE: expected StmtLabeled, found {:?}", other.tag()),
        }
    }

    /// Token of a node that names something, if it has one.
    pub fn name_token(&self, node: NodeRef) -> Option<TokenIndex> {
        match self.kind(node) {
            NodeKind::DirectDeclaratorId(data) => Some(data.token),
            NodeKind::ExprId(data) => Some(data.token),
            NodeKind::Enumerator(data) => Some(data.token),
            NodeKind::TypeSpecifierTdid(data) => Some(data.token),
            NodeKind::StructOrUnionRef(data) => Some(data.token),
            NodeKind::StructOrUnionDef(data) => data.token,
            NodeKind::EnumRef(data) => Some(data.token),
            NodeKind::EnumDef(data) => data.token,
            NodeKind::StmtLabeled(data) => Some(data.label),
            NodeKind::Attribute(data) => Some(data.name),
            _ => None,
        }
    }

    pub fn name_of(&self, node: NodeRef) -> Option<NameId> {
        self.name_token(node).map(|t| self.spelling(t))
    }
}

// Structural queries used by resolution.
impl Ast {
    /// First ancestor that is not an `ExprParenthesized`.
    pub fn non_parens_parent(&self, node: NodeRef) -> Option<NodeRef> {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if self.tag(p) != NodeTag::ExprParenthesized {
                return Some(p);
            }
            current = self.parent(p);
        }
        None
    }

    /// First ancestor that is neither a declarator nor a direct declarator.
    pub fn first_non_declarator_parent(&self, node: NodeRef) -> Option<NodeRef> {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if !KindSet::DECLARATOR.contains(KindSet::of(self.tag(p))) {
                return Some(p);
            }
            current = self.parent(p);
        }
        None
    }

    /// Whether the declarator id names a function, i.e. the innermost
    /// derivation applied to it is a function declarator.
    pub fn declares_function(&self, ddid: NodeRef) -> bool {
        let mut current = ddid;
        while let Some(p) = self.parent(current) {
            match self.kind(p) {
                NodeKind::DirectDeclaratorFunc(data) => return data.direct == current,
                NodeKind::DirectDeclaratorParenthesized(_) => {}
                NodeKind::Declarator(data) if data.pointer.is_none() => {}
                _ => return false,
            }
            current = p;
        }
        false
    }

    /// The `DirectDeclaratorId` a declarator ultimately names.
    pub fn declarator_id_of(&self, declarator: NodeRef) -> Option<NodeRef> {
        let mut current = declarator;
        loop {
            current = match self.kind(current) {
                NodeKind::DirectDeclaratorId(_) => return Some(current),
                NodeKind::Declarator(data) => data.direct,
                NodeKind::DirectDeclaratorParenthesized(inner) => *inner,
                NodeKind::DirectDeclaratorArray(data) => data.direct,
                NodeKind::DirectDeclaratorFunc(data) => data.direct,
                NodeKind::InitDeclarator(data) => data.declarator,
                NodeKind::FunctionDefinition(data) => data.declarator,
                _ => return None,
            };
        }
    }

    /// The storage class given in a specifier list, `StorageClass::None` if absent.
    pub fn storage_class(&self, specifiers: NodeRef) -> StorageClass {
        match self.kind(specifiers) {
            NodeKind::DeclarationSpecifiers(items) => items
                .iter()
                .find_map(|&s| match self.kind(s) {
                    NodeKind::StorageClassSpecifier(sc) => Some(*sc),
                    _ => None,
                })
                .unwrap_or(StorageClass::None),
            _ => StorageClass::None,
        }
    }

    /// Whether a declaration or function definition appears at file scope.
    pub fn is_at_file_scope(&self, node: NodeRef) -> bool {
        self.parent_tag(node) == Some(NodeTag::TranslationUnit)
    }

    /// The `Declaration` owning an init-declarator.
    pub fn containing_declaration(&self, init_declarator: NodeRef) -> NodeRef {
        match self.parent(init_declarator) {
            Some(d) if self.tag(d) == NodeTag::Declaration => d,
            _ => panic!("ICE: init declarator {} outside a declaration", init_declarator),
        }
    }

    /// Specifier list of the declaration a declarator context belongs to.
    pub fn context_specifiers(&self, context: DeclContext) -> Option<NodeRef> {
        match context {
            DeclContext::InitDecl(id) => match self.kind(self.containing_declaration(id)) {
                NodeKind::Declaration(d) => Some(d.specifiers),
                _ => None,
            },
            DeclContext::FunctionDef(fd) => Some(self.function_definition(fd).specifiers),
            DeclContext::ParameterDecl(_) | DeclContext::StructDecl(_) => None,
        }
    }

    /// Whether the function declarator's parameters belong to the function
    /// definition being defined.
    pub fn is_fundef_declarator_func(&self, ddf: NodeRef) -> bool {
        self.first_non_declarator_parent(ddf)
            .is_some_and(|p| self.tag(p) == NodeTag::FunctionDefinition)
    }
}

// Linkage chains.
impl Ast {
    /// Linkage record of an `InitDeclarator` or `FunctionDefinition`.
    pub fn linkage(&self, node: NodeRef) -> &Linkage {
        match self.kind(node) {
            NodeKind::InitDeclarator(data) => &data.linkage,
            NodeKind::FunctionDefinition(data) => &data.linkage,
            other => panic!("ICE: {:?} carries no linkage", other.tag()),
        }
    }

    /// Linkage of the declaration a declarator context denotes; declarators
    /// of parameters and members never have linkage.
    pub fn context_linkage_kind(&self, context: DeclContext) -> LinkageKind {
        match context {
            DeclContext::InitDecl(n) | DeclContext::FunctionDef(n) => self.linkage(n).kind(),
            DeclContext::ParameterDecl(_) | DeclContext::StructDecl(_) => LinkageKind::None,
        }
    }

    /// Follow linkage targets back to the first declaration of the entity.
    pub fn linkage_chain_head(&self, node: NodeRef) -> NodeRef {
        let mut current = node;
        while let Some(target) = self.linkage(current).target() {
            current = target;
        }
        current
    }
}

// Struct/union tag chains.
impl Ast {
    pub fn tag_chain(&self, node: NodeRef) -> &TagChain {
        match self.kind(node) {
            NodeKind::StructOrUnionRef(data) => &data.chain,
            NodeKind::StructOrUnionDef(data) => &data.chain,
            other => panic!("ICE: {:?} is not a struct or union tag", other.tag()),
        }
    }

    pub fn tag_kind(&self, node: NodeRef) -> TagKind {
        match self.kind(node) {
            NodeKind::StructOrUnionRef(data) => data.kind,
            NodeKind::StructOrUnionDef(data) => data.kind,
            other => panic!("ICE: {:?} is not a struct or union tag", other.tag()),
        }
    }

    fn tag_chain_next(&self, node: NodeRef) -> NodeRef {
        self.tag_chain(node).next.get().unwrap_or(node)
    }

    /// Splice `node`'s (singleton) ring into `prev`'s ring.
    pub fn link_tag_chain(&self, node: NodeRef, prev: NodeRef) {
        debug_assert!(self.tag_chain(node).next.get().is_none());
        let after_prev = self.tag_chain_next(prev);
        self.tag_chain(node).next.set(Some(after_prev));
        self.tag_chain(prev).next.set(Some(node));
    }

    /// All members of `node`'s ring, starting at `node`.
    pub fn tag_chain_members(&self, node: NodeRef) -> Vec<NodeRef> {
        let mut members = vec![node];
        let mut current = self.tag_chain_next(node);
        while current != node {
            members.push(current);
            current = self.tag_chain_next(current);
        }
        members
    }

    /// The definition in `node`'s ring, if any.
    pub fn find_tag_definition(&self, node: NodeRef) -> Option<NodeRef> {
        self.tag_chain_members(node)
            .into_iter()
            .find(|&n| self.tag(n) == NodeTag::StructOrUnionDef)
    }
}

// Per-compound label tables.
impl Ast {
    pub fn register_label(&self, compound: NodeRef, labeled: NodeRef) {
        self.compound(compound).labels.borrow_mut().push(labeled);
    }

    /// Labeled statement registered to `compound` with the spelling of `label`.
    pub fn lookup_label(&self, compound: NodeRef, label: TokenIndex) -> Option<NodeRef> {
        let name = self.spelling(label);
        self.compound(compound)
            .labels
            .borrow()
            .iter()
            .copied()
            .find(|&l| self.spelling(self.labeled_stmt(l).label) == name)
    }

    /// Whether `label` is declared `__label__` at the head of `compound`.
    pub fn is_local_label(&self, compound: NodeRef, label: TokenIndex) -> bool {
        let name = self.spelling(label);
        self.compound(compound)
            .local_labels
            .iter()
            .any(|&l| self.spelling(l) == name)
    }
}
