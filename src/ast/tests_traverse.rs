use crate::ast::dispatch::{Dispatcher, Handler};
use crate::ast::traverse::{AncestorWalk, for_each_ancestor, for_each_dfs_po, for_each_dfs_pre_and_po};
use crate::ast::{Ast, AstBuilder, BinaryOp, KindSet, NodeRef, NodeTag, StorageClass};

struct Tree {
    ast: Ast,
    a: NodeRef,
    b: NodeRef,
    sum: NodeRef,
    declaration: NodeRef,
}

/// int x = a + b;
fn tree() -> Tree {
    let mut b = AstBuilder::new();
    let a = b.id("a");
    let bb = b.id("b");
    let sum = b.binop(BinaryOp::Add, a, bb);
    let declaration = b.int_definition(StorageClass::None, "x", sum);
    Tree {
        ast: b.finish(vec![declaration]),
        a,
        b: bb,
        sum,
        declaration,
    }
}

fn record(seen: &mut Vec<NodeRef>, node: NodeRef) -> Result<(), NodeRef> {
    seen.push(node);
    Ok(())
}

fn position(seen: &[NodeRef], node: NodeRef) -> usize {
    seen.iter().position(|&n| n == node).unwrap()
}

#[test]
fn test_post_order_visits_children_first() {
    let t = tree();
    let visit = Dispatcher::new(vec![], record);
    let mut seen = Vec::new();

    for_each_dfs_po(&t.ast, t.ast.root(), &mut seen, &visit).unwrap();

    assert_eq!(seen.len(), t.ast.len());
    assert_eq!(seen.last(), Some(&t.ast.root()));
    assert!(position(&seen, t.a) < position(&seen, t.b));
    assert!(position(&seen, t.b) < position(&seen, t.sum));
    assert!(position(&seen, t.sum) < position(&seen, t.declaration));
}

#[test]
fn test_first_error_stops_the_walk() {
    fn fail(seen: &mut Vec<NodeRef>, node: NodeRef) -> Result<(), NodeRef> {
        seen.push(node);
        Err(node)
    }

    let t = tree();
    let visit = Dispatcher::new(vec![Handler::of(NodeTag::ExprId, fail)], record);
    let mut seen = Vec::new();

    let result = for_each_dfs_po(&t.ast, t.ast.root(), &mut seen, &visit);

    assert_eq!(result, Err(t.a));
    assert!(!seen.contains(&t.b));
    assert!(!seen.contains(&t.sum));
}

#[derive(Debug, PartialEq)]
enum Event {
    Pre(NodeRef),
    Post(NodeRef),
}

#[test]
fn test_post_runs_only_where_pre_asked() {
    fn on_pre(events: &mut Vec<Event>, node: NodeRef) -> Result<bool, ()> {
        events.push(Event::Pre(node));
        Ok(false)
    }
    fn on_pre_open(events: &mut Vec<Event>, node: NodeRef) -> Result<bool, ()> {
        events.push(Event::Pre(node));
        Ok(true)
    }
    fn on_post(events: &mut Vec<Event>, node: NodeRef) -> Result<(), ()> {
        events.push(Event::Post(node));
        Ok(())
    }

    let t = tree();
    let pre = Dispatcher::new(vec![Handler::of(NodeTag::ExprBinop, on_pre_open)], on_pre);
    let post = Dispatcher::new(vec![], on_post);
    let mut events = Vec::new();

    for_each_dfs_pre_and_po(&t.ast, t.ast.root(), &mut events, &pre, &post).unwrap();

    let posts: Vec<&Event> = events.iter().filter(|e| matches!(e, Event::Post(_))).collect();
    assert_eq!(posts, vec![&Event::Post(t.sum)]);

    let start = events.iter().position(|e| *e == Event::Pre(t.sum)).unwrap();
    assert_eq!(
        &events[start..start + 4],
        &[Event::Pre(t.sum), Event::Pre(t.a), Event::Pre(t.b), Event::Post(t.sum)]
    );
}

fn climb(seen: &mut Vec<NodeRef>, node: NodeRef) -> Result<bool, ()> {
    seen.push(node);
    Ok(true)
}

fn stop(seen: &mut Vec<NodeRef>, node: NodeRef) -> Result<bool, ()> {
    seen.push(node);
    Ok(false)
}

#[test]
fn test_ancestor_walk_ends_at_boundary() {
    let t = tree();
    let ast = &t.ast;
    let visit = Dispatcher::new(vec![Handler::of(NodeTag::Declaration, stop)], climb);
    let mut seen = Vec::new();

    for_each_ancestor(ast, t.a, KindSet::of(NodeTag::Declaration), &mut seen, &visit).unwrap();

    let tags: Vec<NodeTag> = seen.iter().map(|&n| ast.tag(n)).collect();
    assert_eq!(
        tags,
        vec![
            NodeTag::ExprBinop,
            NodeTag::InitializerExpr,
            NodeTag::InitDeclarator,
            NodeTag::Declaration,
        ]
    );
}

#[test]
fn test_ancestor_walk_ends_when_handler_stops() {
    let t = tree();
    let ast = &t.ast;
    let walk = AncestorWalk::new(
        NodeTag::ExprId,
        KindSet::of(NodeTag::Declaration),
        vec![
            Handler::of(NodeTag::InitializerExpr, stop),
            Handler::of(NodeTag::Declaration, stop),
        ],
        climb,
    );
    let mut seen = Vec::new();

    walk.run(ast, t.b, &mut seen).unwrap();

    assert_eq!(seen, vec![t.sum, ast.parent(t.sum).unwrap()]);
    assert_eq!(ast.tag(seen[1]), NodeTag::InitializerExpr);
}

#[test]
fn test_ancestor_walk_from_root_visits_nothing() {
    let t = tree();
    let visit = Dispatcher::new(vec![], climb);
    let mut seen = Vec::new();

    for_each_ancestor(&t.ast, t.ast.root(), KindSet::empty(), &mut seen, &visit).unwrap();

    assert!(seen.is_empty());
}
