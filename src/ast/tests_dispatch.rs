use crate::ast::dispatch::{DOUBLE_DISPATCH_THRESHOLD, Dispatcher, Handler};
use crate::ast::kind_set::ancestor_closure;
use crate::ast::traverse::AncestorWalk;
use crate::ast::{KindSet, NodeRef, NodeTag};

fn statement(_: &mut u32, _: NodeRef) -> &'static str {
    "statement"
}

fn compound(_: &mut u32, _: NodeRef) -> &'static str {
    "compound"
}

fn expression(_: &mut u32, _: NodeRef) -> &'static str {
    "expression"
}

fn identifier(_: &mut u32, _: NodeRef) -> &'static str {
    "identifier"
}

fn counted(calls: &mut u32, _: NodeRef) -> &'static str {
    *calls += 1;
    "counted"
}

fn fallback(_: &mut u32, _: NodeRef) -> &'static str {
    "fallback"
}

fn handlers() -> Vec<Handler<u32, &'static str>> {
    vec![
        Handler::new(KindSet::STMT, statement),
        Handler::of(NodeTag::StmtCompound, compound),
        Handler::of(NodeTag::ExprId, identifier),
        Handler::new(KindSet::EXPR, expression),
    ]
}

fn node() -> NodeRef {
    NodeRef::new(1).unwrap()
}

#[test]
fn test_small_handler_sets_are_probed() {
    let dispatcher = Dispatcher::new(handlers(), fallback);
    assert!(!dispatcher.uses_table());
}

#[test]
fn test_threshold_switches_to_table() {
    let below: Vec<Handler<u32, &'static str>> = (0..DOUBLE_DISPATCH_THRESHOLD - 1)
        .map(|i| Handler::of(NodeTag::ALL[i], counted))
        .collect();
    assert!(!Dispatcher::new(below, fallback).uses_table());

    let at: Vec<Handler<u32, &'static str>> = (0..DOUBLE_DISPATCH_THRESHOLD)
        .map(|i| Handler::of(NodeTag::ALL[i], counted))
        .collect();
    assert!(Dispatcher::new(at, fallback).uses_table());
}

#[test]
fn test_first_matching_handler_wins() {
    let probe = Dispatcher::new(handlers(), fallback);
    let table = Dispatcher::for_candidates(handlers(), fallback, KindSet::all());
    assert!(table.uses_table());

    let mut calls = 0;
    for dispatcher in [&probe, &table] {
        // The statement handler shadows the compound one.
        assert_eq!(dispatcher.dispatch(&mut calls, NodeTag::StmtCompound, node()), "statement");
        assert_eq!(dispatcher.dispatch(&mut calls, NodeTag::ExprId, node()), "identifier");
        assert_eq!(dispatcher.dispatch(&mut calls, NodeTag::ExprBinop, node()), "expression");
        assert_eq!(dispatcher.dispatch(&mut calls, NodeTag::Declaration, node()), "fallback");
    }
}

#[test]
fn test_probe_and_table_agree_on_every_kind() {
    let probe = Dispatcher::new(handlers(), fallback);
    let table = Dispatcher::for_candidates(handlers(), fallback, KindSet::all());

    for tag in NodeTag::ALL {
        assert_eq!(probe.handler_index(tag), table.handler_index(tag), "{:?}", tag);
    }
}

#[test]
fn test_dispatch_passes_context() {
    let dispatcher = Dispatcher::new(vec![Handler::of(NodeTag::ExprId, counted)], fallback);
    let mut calls = 0;
    dispatcher.dispatch(&mut calls, NodeTag::ExprId, node());
    dispatcher.dispatch(&mut calls, NodeTag::ExprId, node());
    dispatcher.dispatch(&mut calls, NodeTag::ExprConstant, node());
    assert_eq!(calls, 2);
}

#[test]
fn test_ancestor_closure_of_declarator_id() {
    let boundary = KindSet::of_all(&[
        NodeTag::StructDeclarator,
        NodeTag::ParameterDeclarationDeclarator,
        NodeTag::InitDeclarator,
        NodeTag::FunctionDefinition,
    ]);
    let closure = ancestor_closure(NodeTag::DirectDeclaratorId, boundary);

    assert_eq!(
        closure,
        boundary
            | KindSet::of_all(&[
                NodeTag::Declarator,
                NodeTag::DirectDeclaratorParenthesized,
                NodeTag::DirectDeclaratorArray,
                NodeTag::DirectDeclaratorFunc,
            ])
    );
    // Boundaries are not expanded.
    assert!(!closure.has(NodeTag::Declaration));
    assert!(!closure.has(NodeTag::TranslationUnit));
}

#[test]
fn test_ancestor_closure_of_abstract_declarator() {
    let boundary = KindSet::of_all(&[NodeTag::TypeName, NodeTag::ParameterDeclarationAbstract]);
    let closure = ancestor_closure(NodeTag::DirectAbstractDeclaratorArray, boundary);

    assert_eq!(
        closure,
        boundary
            | KindSet::of_all(&[
                NodeTag::AbstractDeclarator,
                NodeTag::DirectAbstractDeclaratorParenthesized,
                NodeTag::DirectAbstractDeclaratorArray,
                NodeTag::DirectAbstractDeclaratorFunc,
            ])
    );
    assert!(!closure.has(NodeTag::ExprCast));
    assert!(!closure.has(NodeTag::ParameterDeclarationList));
}

#[test]
fn test_ancestor_walk_is_sized_by_closure() {
    fn keep_climbing(_: &mut u32, _: NodeRef) -> Result<bool, ()> {
        Ok(true)
    }
    fn stop(_: &mut u32, _: NodeRef) -> Result<bool, ()> {
        Ok(false)
    }

    // One handler, but labels can sit under any statement container.
    let walk = AncestorWalk::new(
        NodeTag::StmtLabeled,
        KindSet::of(NodeTag::FunctionDefinition),
        vec![Handler::of(NodeTag::FunctionDefinition, stop)],
        keep_climbing,
    );
    assert!(walk.uses_table());

    // A storage class specifier only ever sits in a specifier list.
    let walk = AncestorWalk::new(
        NodeTag::StorageClassSpecifier,
        KindSet::of(NodeTag::DeclarationSpecifiers),
        vec![Handler::of(NodeTag::DeclarationSpecifiers, stop)],
        keep_climbing,
    );
    assert!(!walk.uses_table());
}
