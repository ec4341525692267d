use crate::ast::{AstBuilder, NodeRef, NodeTag, Resolved, StorageClass};
use crate::lang_options::LangOptions;
use crate::semantic::register_labels;
use crate::tests::test_utils::{find_named, find_nodes, run_fail_with_message, run_pass, run_with, setup};

fn labels_of(ast: &crate::ast::Ast, compound: NodeRef) -> Vec<NodeRef> {
    ast.compound(compound).labels.borrow().to_vec()
}

#[test]
fn test_label_registers_in_function_body() {
    setup();
    // void f(void) { { L: ; } }
    let mut b = AstBuilder::new();
    let empty = b.empty_stmt();
    let l = b.labeled("L", empty);
    let inner = b.compound(vec![l]);
    let f = b.simple_function(StorageClass::None, "f", vec![inner]);
    let ast = b.finish(vec![f]);

    register_labels(&ast, &LangOptions::default()).unwrap();

    let body = ast.function_definition(f).body;
    assert_eq!(labels_of(&ast, body), vec![l]);
    assert!(labels_of(&ast, inner).is_empty());
}

#[test]
fn test_goto_resolves_label_of_enclosing_block() {
    // void f(void) { { L: ; } goto L; }
    let mut b = AstBuilder::new();
    let empty = b.empty_stmt();
    let l = b.labeled("L", empty);
    let inner = b.compound(vec![l]);
    let goto = b.goto("L");
    let f = b.simple_function(StorageClass::None, "f", vec![inner, goto]);
    let ast = b.finish(vec![f]);

    run_pass(&ast);

    let target = find_named(&ast, NodeTag::ExprId, "L")[0];
    assert_eq!(ast.expr_id(target).resolved.get(), Resolved::Label(l));
}

#[test]
fn test_goto_before_label_resolves() {
    // void f(void) { goto L; { L: ; } }
    let mut b = AstBuilder::new();
    let goto = b.goto("L");
    let empty = b.empty_stmt();
    let l = b.labeled("L", empty);
    let inner = b.compound(vec![l]);
    let f = b.simple_function(StorageClass::None, "f", vec![goto, inner]);
    let ast = b.finish(vec![f]);

    run_pass(&ast);

    let target = find_named(&ast, NodeTag::ExprId, "L")[0];
    assert_eq!(ast.expr_id(target).resolved.get(), Resolved::Label(l));
}

#[test]
fn test_label_redefined_in_sibling_block() {
    // void f(void) { { L: ; } { L: ; } }
    let mut b = AstBuilder::new();
    let e1 = b.empty_stmt();
    let l1 = b.labeled("L", e1);
    let c1 = b.compound(vec![l1]);
    let e2 = b.empty_stmt();
    let l2 = b.labeled("L", e2);
    let c2 = b.compound(vec![l2]);
    let f = b.simple_function(StorageClass::None, "f", vec![c1, c2]);
    let ast = b.finish(vec![f]);

    let error = run_fail_with_message(&ast, "label redefined");
    assert_eq!(error.location(), ast.token_span(ast.labeled_stmt(l2).label));
}

#[test]
fn test_same_label_in_two_functions() {
    let mut b = AstBuilder::new();
    let e1 = b.empty_stmt();
    let l1 = b.labeled("L", e1);
    let f = b.simple_function(StorageClass::None, "f", vec![l1]);
    let e2 = b.empty_stmt();
    let l2 = b.labeled("L", e2);
    let g = b.simple_function(StorageClass::None, "g", vec![l2]);
    let ast = b.finish(vec![f, g]);

    run_pass(&ast);
}

#[test]
fn test_local_label_shadows_function_label() {
    // void f(void) {
    //     { __label__ L; L: ; goto L; }
    //     L: ;
    //     goto L;
    // }
    let mut b = AstBuilder::new();
    let e1 = b.empty_stmt();
    let inner_label = b.labeled("L", e1);
    let inner_goto = b.goto("L");
    let inner = b.compound_with_local_labels(&["L"], vec![inner_label, inner_goto]);
    let e2 = b.empty_stmt();
    let outer_label = b.labeled("L", e2);
    let outer_goto = b.goto("L");
    let f = b.simple_function(StorageClass::None, "f", vec![inner, outer_label, outer_goto]);
    let ast = b.finish(vec![f]);

    run_pass(&ast);

    assert_eq!(labels_of(&ast, inner), vec![inner_label]);
    let targets = find_named(&ast, NodeTag::ExprId, "L");
    assert_eq!(ast.expr_id(targets[0]).resolved.get(), Resolved::Label(inner_label));
    assert_eq!(ast.expr_id(targets[1]).resolved.get(), Resolved::Label(outer_label));
}

#[test]
fn test_local_label_declared_in_outer_block() {
    // void f(void) { { __label__ L; { L: ; } goto L; } }
    let mut b = AstBuilder::new();
    let e = b.empty_stmt();
    let l = b.labeled("L", e);
    let innermost = b.compound(vec![l]);
    let goto = b.goto("L");
    let middle = b.compound_with_local_labels(&["L"], vec![innermost, goto]);
    let f = b.simple_function(StorageClass::None, "f", vec![middle]);
    let ast = b.finish(vec![f]);

    run_pass(&ast);

    assert_eq!(labels_of(&ast, middle), vec![l]);
    assert!(labels_of(&ast, ast.function_definition(f).body).is_empty());
}

#[test]
fn test_nested_labels() {
    // void f(void) { L: M: ; }
    let mut b = AstBuilder::new();
    let e = b.empty_stmt();
    let m = b.labeled("M", e);
    let l = b.labeled("L", m);
    let f = b.simple_function(StorageClass::None, "f", vec![l]);
    let ast = b.finish(vec![f]);

    run_pass(&ast);

    // Post-order: the inner label registers first.
    assert_eq!(labels_of(&ast, ast.function_definition(f).body), vec![m, l]);
}

/// void f(void) { ({ L: ; 1; }); L: ; }
fn label_in_statement_expression() -> (crate::ast::Ast, NodeRef, NodeRef) {
    let mut b = AstBuilder::new();
    let e1 = b.empty_stmt();
    let inner_label = b.labeled("L", e1);
    let one = b.constant(1);
    let value = b.expr_stmt(Some(one));
    let block = b.compound(vec![inner_label, value]);
    let stmt_expr = b.stmt_expr(block);
    let s = b.expr_stmt(Some(stmt_expr));
    let e2 = b.empty_stmt();
    let outer_label = b.labeled("L", e2);
    let f = b.simple_function(StorageClass::None, "f", vec![s, outer_label]);
    (b.finish(vec![f]), block, inner_label)
}

#[test]
fn test_statement_expression_confines_labels() {
    let (ast, block, inner_label) = label_in_statement_expression();
    run_pass(&ast);
    assert_eq!(labels_of(&ast, block), vec![inner_label]);
}

#[test]
fn test_statement_expression_without_boundary() {
    let (ast, _, _) = label_in_statement_expression();
    let opts = LangOptions {
        statement_expression_label_boundary: false,
        ..LangOptions::default()
    };
    let (result, diag) = run_with(&ast, &opts, &[]);
    assert_eq!(result.unwrap_err().to_string(), "label redefined");
    assert!(diag.has_errors());
}

#[test]
fn test_label_in_statement_expression_registers_once_without_boundary() {
    // void f(void) { ({ L: ; 1; }); }
    let mut b = AstBuilder::new();
    let e = b.empty_stmt();
    let l = b.labeled("L", e);
    let one = b.constant(1);
    let value = b.expr_stmt(Some(one));
    let block = b.compound(vec![l, value]);
    let stmt_expr = b.stmt_expr(block);
    let s = b.expr_stmt(Some(stmt_expr));
    let f = b.simple_function(StorageClass::None, "f", vec![s]);
    let ast = b.finish(vec![f]);
    let opts = LangOptions {
        statement_expression_label_boundary: false,
        ..LangOptions::default()
    };

    register_labels(&ast, &opts).unwrap();

    assert_eq!(labels_of(&ast, ast.function_definition(f).body), vec![l]);
    assert!(labels_of(&ast, block).is_empty());
}

#[test]
fn test_goto_out_of_statement_expression() {
    // void f(void) { ({ goto L; 1; }); L: ; }
    let mut b = AstBuilder::new();
    let goto = b.goto("L");
    let one = b.constant(1);
    let value = b.expr_stmt(Some(one));
    let block = b.compound(vec![goto, value]);
    let stmt_expr = b.stmt_expr(block);
    let s = b.expr_stmt(Some(stmt_expr));
    let e = b.empty_stmt();
    let l = b.labeled("L", e);
    let f = b.simple_function(StorageClass::None, "f", vec![s, l]);
    let ast = b.finish(vec![f]);

    run_pass(&ast);

    let target = find_nodes(&ast, NodeTag::ExprId)[0];
    assert_eq!(ast.expr_id(target).resolved.get(), Resolved::Label(l));
}

#[test]
fn test_goto_unknown_label_is_undeclared() {
    let mut b = AstBuilder::new();
    let goto = b.goto("nowhere");
    let f = b.simple_function(StorageClass::None, "f", vec![goto]);
    let ast = b.finish(vec![f]);

    run_fail_with_message(&ast, "identifier not declared");
}
