//! Programmatic construction of translation units.
//!
//! The builder plays the parser's role: nodes are created bottom-up, each
//! node adopts its children when pushed, and identifier spellings are
//! interned into the token stream with spans into a synthesized source
//! buffer (spellings separated by a space).

use std::cell::{Cell, RefCell};

use thin_vec::ThinVec;

use crate::ast::*;
use crate::source_manager::{SourceId, SourceSpan};
use crate::token::{Token, TokenIndex, TokenStream};

pub struct AstBuilder {
    ast: Ast,
    source_id: SourceId,
    offset: u32,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    pub fn new() -> Self {
        AstBuilder {
            ast: Ast::new(TokenStream::new()),
            source_id: SourceId::new(2).unwrap_or(SourceId::BUILTIN),
            offset: 0,
        }
    }

    /// Wrap `items` in a translation unit and hand out the finished tree.
    pub fn finish(mut self, items: Vec<NodeRef>) -> Ast {
        let root = self.push(NodeKind::TranslationUnit(items.into()));
        self.ast.set_root(root);
        self.ast
    }

    pub fn push(&mut self, kind: NodeKind) -> NodeRef {
        self.ast.push_node(kind)
    }

    /// Intern an identifier token.
    pub fn ident(&mut self, name: &str) -> TokenIndex {
        let span = SourceSpan::new_with_length(self.source_id, self.offset, name.len() as u32);
        self.offset += name.len() as u32 + 1;
        self.ast.tokens_mut().push(Token {
            spelling: NameId::new(name),
            span,
        })
    }

    // --- Specifiers ---

    pub fn specifiers(&mut self, items: Vec<NodeRef>) -> NodeRef {
        self.push(NodeKind::DeclarationSpecifiers(items.into()))
    }

    pub fn spec_quals(&mut self, items: Vec<NodeRef>) -> NodeRef {
        self.push(NodeKind::SpecifierQualifierList(items.into()))
    }

    pub fn storage(&mut self, sc: StorageClass) -> NodeRef {
        self.push(NodeKind::StorageClassSpecifier(sc))
    }

    pub fn pod(&mut self, pod: PodSpec) -> NodeRef {
        self.push(NodeKind::TypeSpecifierPod(pod))
    }

    pub fn qualifier(&mut self, qualifiers: TypeQualifiers) -> NodeRef {
        self.push(NodeKind::TypeQualifier(qualifiers))
    }

    pub fn typedef_name(&mut self, name: &str) -> NodeRef {
        let token = self.ident(name);
        self.push(NodeKind::TypeSpecifierTdid(TypedefNameData {
            token,
            resolved: Cell::new(TypedefResolution::Unresolved),
        }))
    }

    /// Declaration specifiers made of an optional storage class and `ty`.
    pub fn decl_specs(&mut self, sc: StorageClass, ty: NodeRef) -> NodeRef {
        let mut items = Vec::new();
        if sc != StorageClass::None {
            items.push(self.storage(sc));
        }
        items.push(ty);
        self.specifiers(items)
    }

    pub fn int_specs(&mut self, sc: StorageClass) -> NodeRef {
        let int = self.pod(PodSpec::Int);
        self.decl_specs(sc, int)
    }

    pub fn attribute(&mut self, name: &str, params: Vec<NodeRef>) -> NodeRef {
        let name = self.ident(name);
        self.push(NodeKind::Attribute(AttributeData {
            name,
            params: params.into(),
        }))
    }

    // --- Declarators ---

    pub fn direct_id(&mut self, name: &str) -> NodeRef {
        let token = self.ident(name);
        self.push(NodeKind::DirectDeclaratorId(DeclaratorIdData {
            token,
            context: Cell::new(None),
        }))
    }

    pub fn declarator(&mut self, pointer: Option<NodeRef>, direct: NodeRef) -> NodeRef {
        self.push(NodeKind::Declarator(DeclaratorData { pointer, direct }))
    }

    /// Plain `name` declarator.
    pub fn declarator_id(&mut self, name: &str) -> NodeRef {
        let direct = self.direct_id(name);
        self.declarator(None, direct)
    }

    pub fn pointer(&mut self, levels: usize) -> NodeRef {
        let levels: ThinVec<TypeQualifiers> = (0..levels).map(|_| TypeQualifiers::empty()).collect();
        self.push(NodeKind::Pointer(levels))
    }

    /// `*name`
    pub fn pointer_declarator(&mut self, name: &str) -> NodeRef {
        let pointer = self.pointer(1);
        let direct = self.direct_id(name);
        self.declarator(Some(pointer), direct)
    }

    pub fn paren_declarator(&mut self, declarator: NodeRef) -> NodeRef {
        self.push(NodeKind::DirectDeclaratorParenthesized(declarator))
    }

    pub fn array_declarator(&mut self, direct: NodeRef, size: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::DirectDeclaratorArray(ArrayDeclaratorData { direct, size }))
    }

    pub fn func_direct_declarator(&mut self, direct: NodeRef, params: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::DirectDeclaratorFunc(FuncDeclaratorData { direct, params }))
    }

    /// `name(params)`
    pub fn func_declarator(&mut self, name: &str, params: Option<NodeRef>) -> NodeRef {
        let id = self.direct_id(name);
        let func = self.func_direct_declarator(id, params);
        self.declarator(None, func)
    }

    pub fn param_list(&mut self, params: Vec<NodeRef>, variadic: bool) -> NodeRef {
        self.push(NodeKind::ParameterDeclarationList(ParameterListData {
            params: params.into(),
            variadic,
        }))
    }

    pub fn param(&mut self, specifiers: NodeRef, declarator: NodeRef) -> NodeRef {
        self.push(NodeKind::ParameterDeclarationDeclarator(ParameterDeclarationData {
            specifiers,
            declarator,
        }))
    }

    /// `int name` parameter.
    pub fn int_param(&mut self, name: &str) -> NodeRef {
        let specs = self.int_specs(StorageClass::None);
        let declarator = self.declarator_id(name);
        self.param(specs, declarator)
    }

    pub fn abstract_param(&mut self, specifiers: NodeRef, declarator: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::ParameterDeclarationAbstract(AbstractParameterDeclarationData {
            specifiers,
            declarator,
        }))
    }

    /// `(void)`
    pub fn void_params(&mut self) -> NodeRef {
        let void = self.pod(PodSpec::Void);
        let specs = self.specifiers(vec![void]);
        let param = self.abstract_param(specs, None);
        self.param_list(vec![param], false)
    }

    pub fn identifier_list(&mut self, names: &[&str]) -> NodeRef {
        let tokens: ThinVec<TokenIndex> = names.iter().map(|n| self.ident(n)).collect();
        self.push(NodeKind::IdentifierList(tokens))
    }

    pub fn abstract_declarator(&mut self, pointer: Option<NodeRef>, direct: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::AbstractDeclarator(AbstractDeclaratorData { pointer, direct }))
    }

    pub fn abstract_func_declarator(&mut self, direct: Option<NodeRef>, params: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::DirectAbstractDeclaratorFunc(AbstractFuncDeclaratorData { direct, params }))
    }

    pub fn type_name(&mut self, spec_quals: NodeRef, declarator: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::TypeName(TypeNameData {
            specifiers: spec_quals,
            declarator,
        }))
    }

    // --- Declarations ---

    pub fn init_declarator(&mut self, declarator: NodeRef, initializer: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::InitDeclarator(InitDeclaratorData {
            declarator,
            initializer,
            linkage: Linkage::default(),
        }))
    }

    pub fn initializer(&mut self, expr: NodeRef) -> NodeRef {
        self.push(NodeKind::InitializerExpr(expr))
    }

    pub fn declaration(&mut self, specifiers: NodeRef, init_declarators: Vec<NodeRef>) -> NodeRef {
        self.push(NodeKind::Declaration(DeclarationData {
            specifiers,
            init_declarators: init_declarators.into(),
        }))
    }

    /// `sc int name;`
    pub fn int_declaration(&mut self, sc: StorageClass, name: &str) -> NodeRef {
        let specs = self.int_specs(sc);
        let declarator = self.declarator_id(name);
        let init = self.init_declarator(declarator, None);
        self.declaration(specs, vec![init])
    }

    /// `sc int name = value;`
    pub fn int_definition(&mut self, sc: StorageClass, name: &str, value: NodeRef) -> NodeRef {
        let specs = self.int_specs(sc);
        let declarator = self.declarator_id(name);
        let value = self.initializer(value);
        let init = self.init_declarator(declarator, Some(value));
        self.declaration(specs, vec![init])
    }

    /// `sc int name(void);`
    pub fn function_declaration(&mut self, sc: StorageClass, name: &str) -> NodeRef {
        let specs = self.int_specs(sc);
        let params = self.void_params();
        let declarator = self.func_declarator(name, Some(params));
        let init = self.init_declarator(declarator, None);
        self.declaration(specs, vec![init])
    }

    /// `typedef int name;`
    pub fn typedef_declaration(&mut self, name: &str) -> NodeRef {
        self.int_declaration(StorageClass::Typedef, name)
    }

    pub fn function_definition(
        &mut self,
        specifiers: NodeRef,
        declarator: NodeRef,
        declarations: Option<Vec<NodeRef>>,
        body: NodeRef,
    ) -> NodeRef {
        let declarations = declarations.map(|d| self.push(NodeKind::DeclarationList(d.into())));
        self.push(NodeKind::FunctionDefinition(FunctionDefinitionData {
            specifiers,
            declarator,
            declarations,
            body,
            linkage: Linkage::default(),
        }))
    }

    /// `sc int name(void) { items }`
    pub fn simple_function(&mut self, sc: StorageClass, name: &str, items: Vec<NodeRef>) -> NodeRef {
        let specs = self.int_specs(sc);
        let params = self.void_params();
        let declarator = self.func_declarator(name, Some(params));
        let body = self.compound(items);
        self.function_definition(specs, declarator, None, body)
    }

    // --- Tags ---

    pub fn struct_ref(&mut self, kind: TagKind, name: &str) -> NodeRef {
        let token = self.ident(name);
        self.push(NodeKind::StructOrUnionRef(TagRefData {
            kind,
            token,
            chain: TagChain::default(),
            declaration: Cell::new(None),
        }))
    }

    pub fn struct_def(&mut self, kind: TagKind, name: Option<&str>, members: Vec<NodeRef>) -> NodeRef {
        let token = name.map(|n| self.ident(n));
        self.push(NodeKind::StructOrUnionDef(TagDefData {
            kind,
            token,
            members: members.into(),
            chain: TagChain::default(),
        }))
    }

    pub fn struct_declaration(&mut self, spec_quals: NodeRef, declarators: Vec<NodeRef>) -> NodeRef {
        self.push(NodeKind::StructDeclaration(StructDeclarationData {
            specifiers: spec_quals,
            declarators: declarators.into(),
        }))
    }

    pub fn struct_declarator(&mut self, declarator: Option<NodeRef>, width: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::StructDeclarator(StructDeclaratorData { declarator, width }))
    }

    /// `int name;` member.
    pub fn int_member(&mut self, name: &str) -> NodeRef {
        let int = self.pod(PodSpec::Int);
        let sq = self.spec_quals(vec![int]);
        let declarator = self.declarator_id(name);
        let member = self.struct_declarator(Some(declarator), None);
        self.struct_declaration(sq, vec![member])
    }

    /// Anonymous struct/union member.
    pub fn unnamed_member(&mut self, def: NodeRef) -> NodeRef {
        self.push(NodeKind::StructDeclarationUnnamedSou(def))
    }

    pub fn enumerator(&mut self, name: &str, value: Option<NodeRef>) -> NodeRef {
        let token = self.ident(name);
        self.push(NodeKind::Enumerator(EnumeratorData { token, value }))
    }

    pub fn enum_def(&mut self, name: Option<&str>, enumerators: &[&str]) -> NodeRef {
        let token = name.map(|n| self.ident(n));
        let enumerators: ThinVec<NodeRef> = enumerators.iter().map(|e| self.enumerator(e, None)).collect();
        self.push(NodeKind::EnumDef(EnumDefData { token, enumerators }))
    }

    pub fn enum_ref(&mut self, name: &str) -> NodeRef {
        let token = self.ident(name);
        self.push(NodeKind::EnumRef(EnumRefData {
            token,
            definition: Cell::new(None),
        }))
    }

    /// `type;` with no declarators, e.g. `struct S;`.
    pub fn standalone_declaration(&mut self, ty: NodeRef) -> NodeRef {
        let specs = self.specifiers(vec![ty]);
        self.declaration(specs, Vec::new())
    }

    /// `ty name;`
    pub fn typed_declaration(&mut self, ty: NodeRef, declarator: NodeRef) -> NodeRef {
        let specs = self.specifiers(vec![ty]);
        let init = self.init_declarator(declarator, None);
        self.declaration(specs, vec![init])
    }

    // --- Statements ---

    pub fn compound(&mut self, items: Vec<NodeRef>) -> NodeRef {
        self.compound_with_local_labels(&[], items)
    }

    /// `{ __label__ labels...; items }`
    pub fn compound_with_local_labels(&mut self, labels: &[&str], items: Vec<NodeRef>) -> NodeRef {
        let local_labels: ThinVec<TokenIndex> = labels.iter().map(|l| self.ident(l)).collect();
        self.push(NodeKind::StmtCompound(CompoundStmtData {
            local_labels,
            items: items.into(),
            labels: RefCell::new(ThinVec::new()),
        }))
    }

    pub fn labeled(&mut self, label: &str, stmt: NodeRef) -> NodeRef {
        let label = self.ident(label);
        self.push(NodeKind::StmtLabeled(LabeledStmtData { label, stmt }))
    }

    pub fn goto(&mut self, label: &str) -> NodeRef {
        let target = self.id(label);
        self.push(NodeKind::StmtGoto(target))
    }

    pub fn expr_stmt(&mut self, expr: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::StmtExpr(expr))
    }

    /// `;`
    pub fn empty_stmt(&mut self) -> NodeRef {
        self.expr_stmt(None)
    }

    pub fn if_stmt(&mut self, condition: NodeRef, then_branch: NodeRef, else_branch: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::StmtIf(IfStmtData {
            condition,
            then_branch,
            else_branch,
        }))
    }

    pub fn switch_stmt(&mut self, condition: NodeRef, body: NodeRef) -> NodeRef {
        self.push(NodeKind::StmtSwitch(condition, body))
    }

    pub fn case_stmt(&mut self, expr: NodeRef, stmt: NodeRef) -> NodeRef {
        self.push(NodeKind::StmtCase(expr, stmt))
    }

    pub fn default_stmt(&mut self, stmt: NodeRef) -> NodeRef {
        self.push(NodeKind::StmtDefault(stmt))
    }

    pub fn while_stmt(&mut self, condition: NodeRef, body: NodeRef) -> NodeRef {
        self.push(NodeKind::StmtWhile(condition, body))
    }

    pub fn do_stmt(&mut self, body: NodeRef, condition: NodeRef) -> NodeRef {
        self.push(NodeKind::StmtDo(body, condition))
    }

    pub fn for_expr(
        &mut self,
        init: Option<NodeRef>,
        condition: Option<NodeRef>,
        increment: Option<NodeRef>,
        body: NodeRef,
    ) -> NodeRef {
        self.push(NodeKind::StmtForInitExpr(ForStmtData {
            init,
            condition,
            increment,
            body,
        }))
    }

    pub fn for_decl(
        &mut self,
        declaration: NodeRef,
        condition: Option<NodeRef>,
        increment: Option<NodeRef>,
        body: NodeRef,
    ) -> NodeRef {
        self.push(NodeKind::StmtForInitDecl(ForStmtData {
            init: Some(declaration),
            condition,
            increment,
            body,
        }))
    }

    pub fn return_stmt(&mut self, expr: Option<NodeRef>) -> NodeRef {
        self.push(NodeKind::StmtReturn(expr))
    }

    pub fn break_stmt(&mut self) -> NodeRef {
        self.push(NodeKind::StmtBreak)
    }

    // --- Expressions ---

    pub fn id(&mut self, name: &str) -> NodeRef {
        let token = self.ident(name);
        self.push(NodeKind::ExprId(ExprIdData {
            token,
            resolved: Cell::new(Resolved::None),
        }))
    }

    pub fn constant(&mut self, value: i64) -> NodeRef {
        self.push(NodeKind::ExprConstant(value))
    }

    pub fn parens(&mut self, expr: NodeRef) -> NodeRef {
        self.push(NodeKind::ExprParenthesized(expr))
    }

    pub fn call(&mut self, callee: NodeRef, args: Vec<NodeRef>) -> NodeRef {
        self.push(NodeKind::ExprFuncInvocation(CallData {
            callee,
            args: args.into(),
        }))
    }

    /// `name(args);`
    pub fn call_stmt(&mut self, name: &str, args: Vec<NodeRef>) -> NodeRef {
        let callee = self.id(name);
        let call = self.call(callee, args);
        self.expr_stmt(Some(call))
    }

    pub fn assign(&mut self, lhs: NodeRef, rhs: NodeRef) -> NodeRef {
        self.push(NodeKind::ExprAssignment(None, lhs, rhs))
    }

    pub fn binop(&mut self, op: BinaryOp, lhs: NodeRef, rhs: NodeRef) -> NodeRef {
        self.push(NodeKind::ExprBinop(op, lhs, rhs))
    }

    pub fn unop(&mut self, op: UnaryOp, expr: NodeRef) -> NodeRef {
        self.push(NodeKind::ExprUnaryOp(op, expr))
    }

    pub fn member(&mut self, base: NodeRef, member: &str, is_arrow: bool) -> NodeRef {
        let member = self.ident(member);
        self.push(NodeKind::ExprMember(MemberData { base, member, is_arrow }))
    }

    pub fn cast(&mut self, type_name: NodeRef, expr: NodeRef) -> NodeRef {
        self.push(NodeKind::ExprCast(type_name, expr))
    }

    pub fn sizeof_type(&mut self, type_name: NodeRef) -> NodeRef {
        self.push(NodeKind::ExprSizeofType(type_name))
    }

    /// GNU `({ ... })`
    pub fn stmt_expr(&mut self, compound: NodeRef) -> NodeRef {
        self.push(NodeKind::ExprStatement(compound))
    }
}
