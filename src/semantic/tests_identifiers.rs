use crate::ast::{
    AstBuilder, DeclContext, EnumDefData, NodeKind, NodeTag, PodSpec, Resolved, StorageClass, TypedefResolution,
};
use crate::diagnostic::DiagnosticLevel;
use crate::tests::test_utils::{find_named, find_nodes, run_fail_with_message, run_pass};

fn typedef_resolution(ast: &crate::ast::Ast, tdid: crate::ast::NodeRef) -> TypedefResolution {
    match ast.kind(tdid) {
        NodeKind::TypeSpecifierTdid(data) => data.resolved.get(),
        other => panic!("not a typedef name: {:?}", other.tag()),
    }
}

#[test]
fn test_undeclared_identifier_is_fatal() {
    // void f(void) { x = 1; }
    let mut b = AstBuilder::new();
    let x = b.id("x");
    let one = b.constant(1);
    let assign = b.assign(x, one);
    let s = b.expr_stmt(Some(assign));
    let f = b.simple_function(StorageClass::None, "f", vec![s]);
    let ast = b.finish(vec![f]);

    let error = run_fail_with_message(&ast, "identifier not declared");
    assert_eq!(error.location(), ast.token_span(ast.expr_id(x).token));
}

#[test]
fn test_call_of_undeclared_function_warns() {
    // void f(void) { g(); }
    let mut b = AstBuilder::new();
    let call = b.call_stmt("g", vec![]);
    let f = b.simple_function(StorageClass::None, "f", vec![call]);
    let ast = b.finish(vec![f]);

    let diag = run_pass(&ast);

    let g = find_named(&ast, NodeTag::ExprId, "g")[0];
    assert_eq!(ast.expr_id(g).resolved.get(), Resolved::None);
    assert_eq!(diag.diagnostics().len(), 1);
    assert_eq!(diag.diagnostics()[0].level, DiagnosticLevel::Warning);
    assert_eq!(diag.diagnostics()[0].message, "identifier not declared");
    assert_eq!(diag.diagnostics()[0].location, ast.token_span(ast.expr_id(g).token));
}

#[test]
fn test_call_through_parentheses_warns() {
    // void f(void) { (g)(); }
    let mut b = AstBuilder::new();
    let g = b.id("g");
    let paren = b.parens(g);
    let call = b.call(paren, vec![]);
    let s = b.expr_stmt(Some(call));
    let f = b.simple_function(StorageClass::None, "f", vec![s]);
    let ast = b.finish(vec![f]);

    let diag = run_pass(&ast);
    assert_eq!(diag.diagnostics().len(), 1);
}

#[test]
fn test_undeclared_call_argument_is_fatal() {
    // int g(void); void f(void) { g(x); }
    let mut b = AstBuilder::new();
    let g = b.function_declaration(StorageClass::None, "g");
    let x = b.id("x");
    let call = b.call_stmt("g", vec![x]);
    let f = b.simple_function(StorageClass::None, "f", vec![call]);
    let ast = b.finish(vec![g, f]);

    let error = run_fail_with_message(&ast, "identifier not declared");
    assert_eq!(error.name().map(|n| n.as_str()), Some("x"));
}

#[test]
fn test_attribute_arguments_may_stay_unresolved() {
    // void f(void) { __attribute__((cleanup(release))) int x; }
    let mut b = AstBuilder::new();
    let release = b.id("release");
    let cleanup = b.attribute("cleanup", vec![release]);
    let int = b.pod(PodSpec::Int);
    let specs = b.specifiers(vec![cleanup, int]);
    let declarator = b.declarator_id("x");
    let init = b.init_declarator(declarator, None);
    let decl = b.declaration(specs, vec![init]);
    let f = b.simple_function(StorageClass::None, "f", vec![decl]);
    let ast = b.finish(vec![f]);

    let diag = run_pass(&ast);

    assert_eq!(ast.expr_id(release).resolved.get(), Resolved::None);
    assert!(diag.diagnostics().is_empty());
}

#[test]
fn test_attribute_arguments_resolve_when_declared() {
    // int release(void);
    // void f(void) { __attribute__((cleanup(release))) int x; }
    let mut b = AstBuilder::new();
    let release_decl = b.function_declaration(StorageClass::None, "release");
    let release = b.id("release");
    let cleanup = b.attribute("cleanup", vec![release]);
    let int = b.pod(PodSpec::Int);
    let specs = b.specifiers(vec![cleanup, int]);
    let declarator = b.declarator_id("x");
    let init = b.init_declarator(declarator, None);
    let decl = b.declaration(specs, vec![init]);
    let f = b.simple_function(StorageClass::None, "f", vec![decl]);
    let ast = b.finish(vec![release_decl, f]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "release")[0];
    assert_eq!(ast.expr_id(release).resolved.get(), Resolved::Declarator(declared));
}

#[test]
fn test_builtin_function() {
    // void f(void) { __builtin_expect(1, 0); }
    let mut b = AstBuilder::new();
    let one = b.constant(1);
    let zero = b.constant(0);
    let call = b.call_stmt("__builtin_expect", vec![one, zero]);
    let f = b.simple_function(StorageClass::None, "f", vec![call]);
    let ast = b.finish(vec![f]);

    let diag = run_pass(&ast);

    let callee = find_nodes(&ast, NodeTag::ExprId)[0];
    assert_eq!(ast.expr_id(callee).resolved.get(), Resolved::Builtin);
    assert!(diag.diagnostics().is_empty());
}

#[test]
fn test_declaration_hides_builtin() {
    // int __builtin_expect; void f(void) { __builtin_expect = 1; }
    let mut b = AstBuilder::new();
    let decl = b.int_declaration(StorageClass::None, "__builtin_expect");
    let id = b.id("__builtin_expect");
    let one = b.constant(1);
    let assign = b.assign(id, one);
    let s = b.expr_stmt(Some(assign));
    let f = b.simple_function(StorageClass::None, "f", vec![s]);
    let ast = b.finish(vec![decl, f]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "__builtin_expect")[0];
    assert_eq!(ast.expr_id(id).resolved.get(), Resolved::Declarator(declared));
}

#[test]
fn test_typedef_name_resolves() {
    // typedef int T; T x;
    let mut b = AstBuilder::new();
    let typedef = b.typedef_declaration("T");
    let t = b.typedef_name("T");
    let declarator = b.declarator_id("x");
    let var = b.typed_declaration(t, declarator);
    let ast = b.finish(vec![typedef, var]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "T")[0];
    assert_eq!(typedef_resolution(&ast, t), TypedefResolution::Declarator(declared));
}

#[test]
fn test_inner_typedef_wins() {
    // typedef int T;
    // void f(void) { typedef long T; T x; }
    let mut b = AstBuilder::new();
    let outer = b.typedef_declaration("T");
    let long = b.pod(PodSpec::Long);
    let specs = b.decl_specs(StorageClass::Typedef, long);
    let declarator = b.declarator_id("T");
    let init = b.init_declarator(declarator, None);
    let inner = b.declaration(specs, vec![init]);
    let t = b.typedef_name("T");
    let x = b.declarator_id("x");
    let var = b.typed_declaration(t, x);
    let f = b.simple_function(StorageClass::None, "f", vec![inner, var]);
    let ast = b.finish(vec![outer, f]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "T");
    assert_eq!(typedef_resolution(&ast, t), TypedefResolution::Declarator(declared[1]));
}

#[test]
fn test_unknown_typedef_name_is_fatal() {
    // U x;
    let mut b = AstBuilder::new();
    let u = b.typedef_name("U");
    let declarator = b.declarator_id("x");
    let var = b.typed_declaration(u, declarator);
    let ast = b.finish(vec![var]);

    run_fail_with_message(&ast, "typedef identifier not declared");
}

#[test]
fn test_builtin_typedef_name() {
    // __builtin_va_list ap;
    let mut b = AstBuilder::new();
    let t = b.typedef_name("__builtin_va_list");
    let declarator = b.declarator_id("ap");
    let var = b.typed_declaration(t, declarator);
    let ast = b.finish(vec![var]);

    run_pass(&ast);

    assert_eq!(typedef_resolution(&ast, t), TypedefResolution::Builtin);
}

#[test]
fn test_typedef_name_in_cast() {
    // typedef int T; void f(void) { (T) 0; }
    let mut b = AstBuilder::new();
    let typedef = b.typedef_declaration("T");
    let t = b.typedef_name("T");
    let sq = b.spec_quals(vec![t]);
    let type_name = b.type_name(sq, None);
    let zero = b.constant(0);
    let cast = b.cast(type_name, zero);
    let s = b.expr_stmt(Some(cast));
    let f = b.simple_function(StorageClass::None, "f", vec![s]);
    let ast = b.finish(vec![typedef, f]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "T")[0];
    assert_eq!(typedef_resolution(&ast, t), TypedefResolution::Declarator(declared));
}

#[test]
fn test_enumerator_use() {
    // enum { A, B = A }; int x = B;
    let mut b = AstBuilder::new();
    let a = b.enumerator("A", None);
    let a_use = b.id("A");
    let b_enumerator = b.enumerator("B", Some(a_use));
    let def = b.push(NodeKind::EnumDef(EnumDefData {
        token: None,
        enumerators: vec![a, b_enumerator].into(),
    }));
    let enum_decl = b.standalone_declaration(def);
    let b_use = b.id("B");
    let var = b.int_definition(StorageClass::None, "x", b_use);
    let ast = b.finish(vec![enum_decl, var]);

    run_pass(&ast);

    assert_eq!(ast.expr_id(a_use).resolved.get(), Resolved::Enumerator(a));
    assert_eq!(ast.expr_id(b_use).resolved.get(), Resolved::Enumerator(b_enumerator));
}

#[test]
fn test_parameters_are_visible_in_body() {
    // int f(int a) { return a; }
    let mut b = AstBuilder::new();
    let specs = b.int_specs(StorageClass::None);
    let param = b.int_param("a");
    let params = b.param_list(vec![param], false);
    let declarator = b.func_declarator("f", Some(params));
    let a = b.id("a");
    let ret = b.return_stmt(Some(a));
    let body = b.compound(vec![ret]);
    let def = b.function_definition(specs, declarator, None, body);
    let ast = b.finish(vec![def]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "a")[0];
    assert_eq!(ast.expr_id(a).resolved.get(), Resolved::Declarator(declared));
    assert_eq!(
        ast.declarator_id(declared).context.get(),
        Some(DeclContext::ParameterDecl(param))
    );
}

#[test]
fn test_prototype_parameters_are_not_visible_afterwards() {
    // int g(int a);
    // int f(void) { return a; }
    let mut b = AstBuilder::new();
    let specs = b.int_specs(StorageClass::None);
    let param = b.int_param("a");
    let params = b.param_list(vec![param], false);
    let declarator = b.func_declarator("g", Some(params));
    let init = b.init_declarator(declarator, None);
    let proto = b.declaration(specs, vec![init]);
    let a = b.id("a");
    let ret = b.return_stmt(Some(a));
    let f = b.simple_function(StorageClass::None, "f", vec![ret]);
    let ast = b.finish(vec![proto, f]);

    run_fail_with_message(&ast, "identifier not declared");
}

#[test]
fn test_local_shadows_parameter() {
    // int f(int a) { { int a; return a; } }
    let mut b = AstBuilder::new();
    let specs = b.int_specs(StorageClass::None);
    let param = b.int_param("a");
    let params = b.param_list(vec![param], false);
    let declarator = b.func_declarator("f", Some(params));
    let local = b.int_declaration(StorageClass::None, "a");
    let a = b.id("a");
    let ret = b.return_stmt(Some(a));
    let inner = b.compound(vec![local, ret]);
    let body = b.compound(vec![inner]);
    let def = b.function_definition(specs, declarator, None, body);
    let ast = b.finish(vec![def]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "a");
    assert_eq!(ast.expr_id(a).resolved.get(), Resolved::Declarator(declared[1]));
}

#[test]
fn test_declarator_contexts() {
    // struct S { int m; };
    // int v;
    // int f(int p) { }
    let mut b = AstBuilder::new();
    let member = b.int_member("m");
    let s = b.struct_def(crate::ast::TagKind::Struct, Some("S"), vec![member]);
    let s_decl = b.standalone_declaration(s);
    let v = b.int_declaration(StorageClass::None, "v");
    let specs = b.int_specs(StorageClass::None);
    let param = b.int_param("p");
    let params = b.param_list(vec![param], false);
    let declarator = b.func_declarator("f", Some(params));
    let body = b.compound(vec![]);
    let def = b.function_definition(specs, declarator, None, body);
    let ast = b.finish(vec![s_decl, v, def]);

    run_pass(&ast);

    let context_of = |name: &str| {
        let ddid = find_named(&ast, NodeTag::DirectDeclaratorId, name)[0];
        ast.declarator_id(ddid).context.get()
    };
    let struct_declarator = find_nodes(&ast, NodeTag::StructDeclarator)[0];
    let init_declarator = find_nodes(&ast, NodeTag::InitDeclarator)[0];
    assert_eq!(context_of("m"), Some(DeclContext::StructDecl(struct_declarator)));
    assert_eq!(context_of("v"), Some(DeclContext::InitDecl(init_declarator)));
    assert_eq!(context_of("p"), Some(DeclContext::ParameterDecl(param)));
    assert_eq!(context_of("f"), Some(DeclContext::FunctionDef(def)));
}

#[test]
fn test_members_do_not_declare_ordinary_names() {
    // struct S { int m; }; void f(void) { m = 1; }
    let mut b = AstBuilder::new();
    let member = b.int_member("m");
    let s = b.struct_def(crate::ast::TagKind::Struct, Some("S"), vec![member]);
    let s_decl = b.standalone_declaration(s);
    let m = b.id("m");
    let one = b.constant(1);
    let assign = b.assign(m, one);
    let stmt = b.expr_stmt(Some(assign));
    let f = b.simple_function(StorageClass::None, "f", vec![stmt]);
    let ast = b.finish(vec![s_decl, f]);

    run_fail_with_message(&ast, "identifier not declared");
}

#[test]
fn test_member_access_leaves_member_name_alone() {
    // struct S { int m; } s; void f(void) { s.m = 1; }
    let mut b = AstBuilder::new();
    let member = b.int_member("m");
    let s_def = b.struct_def(crate::ast::TagKind::Struct, Some("S"), vec![member]);
    let declarator = b.declarator_id("s");
    let var = b.typed_declaration(s_def, declarator);
    let s = b.id("s");
    let access = b.member(s, "m", false);
    let one = b.constant(1);
    let assign = b.assign(access, one);
    let stmt = b.expr_stmt(Some(assign));
    let f = b.simple_function(StorageClass::None, "f", vec![stmt]);
    let ast = b.finish(vec![var, f]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "s")[0];
    assert_eq!(ast.expr_id(s).resolved.get(), Resolved::Declarator(declared));
}

#[test]
fn test_initializer_sees_its_own_declarator() {
    // void f(void) { int n = sizeof n; }
    let mut b = AstBuilder::new();
    let n = b.id("n");
    let size = b.push(NodeKind::ExprSizeofExpr(n));
    let decl = b.int_definition(StorageClass::None, "n", size);
    let f = b.simple_function(StorageClass::None, "f", vec![decl]);
    let ast = b.finish(vec![f]);

    run_pass(&ast);

    let declared = find_named(&ast, NodeTag::DirectDeclaratorId, "n")[0];
    assert_eq!(ast.expr_id(n).resolved.get(), Resolved::Declarator(declared));
}
