//! Depth-first and ancestor walks over the AST.
//!
//! Every visit returns a `Result`; the first `Err` aborts the whole walk and
//! is handed back to the caller.

use crate::ast::dispatch::{Dispatcher, Handler, HandlerFn};
use crate::ast::kind_set::ancestor_closure;
use crate::ast::{Ast, KindSet, NodeRef, NodeTag};

/// Visit children in order, then the node itself.
pub fn for_each_dfs_po<C, E>(
    ast: &Ast,
    node: NodeRef,
    ctx: &mut C,
    visit: &Dispatcher<C, Result<(), E>>,
) -> Result<(), E> {
    for child in ast.children(node) {
        for_each_dfs_po(ast, child, ctx, visit)?;
    }
    visit.dispatch(ctx, ast.tag(node), node)
}

/// Run `pre` on the way down and `post` on the way up.
///
/// Children are always visited. `post` only runs for nodes whose `pre`
/// returned `true`.
pub fn for_each_dfs_pre_and_po<C, E>(
    ast: &Ast,
    node: NodeRef,
    ctx: &mut C,
    pre: &Dispatcher<C, Result<bool, E>>,
    post: &Dispatcher<C, Result<(), E>>,
) -> Result<(), E> {
    let tag = ast.tag(node);
    let opened = pre.dispatch(ctx, tag, node)?;
    for child in ast.children(node) {
        for_each_dfs_pre_and_po(ast, child, ctx, pre, post)?;
    }
    if opened {
        post.dispatch(ctx, tag, node)?;
    }
    Ok(())
}

/// Visit the ancestors of `start`, innermost first.
///
/// A visit returns whether to keep climbing. A node whose kind is in
/// `boundary` is visited and ends the walk; its handler must not ask to
/// continue.
pub fn for_each_ancestor<C, E>(
    ast: &Ast,
    start: NodeRef,
    boundary: KindSet,
    ctx: &mut C,
    visit: &Dispatcher<C, Result<bool, E>>,
) -> Result<(), E> {
    let mut current = ast.parent(start);
    while let Some(node) = current {
        let tag = ast.tag(node);
        let keep_going = visit.dispatch(ctx, tag, node)?;
        if boundary.has(tag) {
            debug_assert!(!keep_going, "boundary handler for {:?} asked to continue", tag);
            break;
        }
        if !keep_going {
            break;
        }
        current = ast.parent(node);
    }
    Ok(())
}

/// An ancestor walk prepared for one starting kind, with its dispatch
/// strategy sized by the ancestor closure of that kind.
pub struct AncestorWalk<C, E> {
    boundary: KindSet,
    dispatcher: Dispatcher<C, Result<bool, E>>,
}

impl<C, E> AncestorWalk<C, E> {
    pub fn new(
        start: NodeTag,
        boundary: KindSet,
        handlers: Vec<Handler<C, Result<bool, E>>>,
        fallback: HandlerFn<C, Result<bool, E>>,
    ) -> Self {
        let candidates = ancestor_closure(start, boundary);
        AncestorWalk {
            boundary,
            dispatcher: Dispatcher::for_candidates(handlers, fallback, candidates),
        }
    }

    pub fn run(&self, ast: &Ast, start: NodeRef, ctx: &mut C) -> Result<(), E> {
        for_each_ancestor(ast, start, self.boundary, ctx, &self.dispatcher)
    }

    pub fn uses_table(&self) -> bool {
        self.dispatcher.uses_table()
    }
}
