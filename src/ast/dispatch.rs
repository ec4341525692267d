//! Kind-directed handler dispatch.
//!
//! A [`Dispatcher`] holds an ordered list of handlers, each keyed by a set of
//! node kinds. Dispatching a node runs the first handler whose key contains
//! the node's kind, or the fallback if none does.
//!
//! Small handler sets are probed linearly. Once the number of candidate kinds
//! reaches [`DOUBLE_DISPATCH_THRESHOLD`] a per-kind table is built up front so
//! each dispatch is a single index. Both strategies select the same handler.

use log::trace;

use crate::ast::{KindSet, NodeRef, NodeTag};

pub const DOUBLE_DISPATCH_THRESHOLD: usize = 8;

/// Handlers are plain functions; all state lives in the context `C`.
pub type HandlerFn<C, R> = fn(&mut C, NodeRef) -> R;

pub struct Handler<C, R> {
    pub kinds: KindSet,
    pub func: HandlerFn<C, R>,
}

impl<C, R> Handler<C, R> {
    pub fn new(kinds: KindSet, func: HandlerFn<C, R>) -> Self {
        Handler { kinds, func }
    }

    pub fn of(tag: NodeTag, func: HandlerFn<C, R>) -> Self {
        Handler::new(KindSet::of(tag), func)
    }
}

enum Strategy {
    Probe,
    /// Handler index per node kind.
    Table(Box<[Option<u8>; NodeTag::COUNT]>),
}

pub struct Dispatcher<C, R> {
    handlers: Vec<Handler<C, R>>,
    fallback: HandlerFn<C, R>,
    strategy: Strategy,
}

impl<C, R> Dispatcher<C, R> {
    /// Strategy chosen by the number of handlers.
    pub fn new(handlers: Vec<Handler<C, R>>, fallback: HandlerFn<C, R>) -> Self {
        let count = handlers.len();
        Self::with_candidate_count(handlers, fallback, count)
    }

    /// Strategy chosen by the number of kinds that can ever be dispatched,
    /// e.g. the ancestor closure of an upward walk.
    pub fn for_candidates(handlers: Vec<Handler<C, R>>, fallback: HandlerFn<C, R>, candidates: KindSet) -> Self {
        Self::with_candidate_count(handlers, fallback, candidates.len())
    }

    fn with_candidate_count(handlers: Vec<Handler<C, R>>, fallback: HandlerFn<C, R>, count: usize) -> Self {
        assert!(handlers.len() <= u8::MAX as usize, "ICE: too many handlers");
        let strategy = if count >= DOUBLE_DISPATCH_THRESHOLD {
            let mut table = Box::new([None; NodeTag::COUNT]);
            for (i, handler) in handlers.iter().enumerate() {
                for tag in handler.kinds.tags() {
                    // First handler in list order wins.
                    table[tag.index()].get_or_insert(i as u8);
                }
            }
            Strategy::Table(table)
        } else {
            Strategy::Probe
        };
        trace!(
            "Dispatcher: {} handlers, {} candidate kinds, table={}",
            handlers.len(),
            count,
            matches!(strategy, Strategy::Table(_))
        );
        Dispatcher {
            handlers,
            fallback,
            strategy,
        }
    }

    pub fn uses_table(&self) -> bool {
        matches!(self.strategy, Strategy::Table(_))
    }

    /// Index of the handler `tag` dispatches to.
    pub fn handler_index(&self, tag: NodeTag) -> Option<usize> {
        match &self.strategy {
            Strategy::Probe => self.handlers.iter().position(|h| h.kinds.has(tag)),
            Strategy::Table(table) => table[tag.index()].map(usize::from),
        }
    }

    pub fn dispatch(&self, ctx: &mut C, tag: NodeTag, node: NodeRef) -> R {
        match self.handler_index(tag) {
            Some(i) => (self.handlers[i].func)(ctx, node),
            None => (self.fallback)(ctx, node),
        }
    }
}
