//! AST node definitions.
//!
//! This module contains the `NodeKind` enum covering the C grammar the
//! resolver works on, its fieldless mirror `NodeTag`, and the data carried by
//! the larger variants. Fields written by resolution use `Cell`/`RefCell` so
//! the passes can annotate a shared `&Ast`.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use thin_vec::ThinVec;

use crate::ast::NodeRef;
use crate::token::TokenIndex;

/// The core enum defining all AST node types.
/// Children are referenced by `NodeRef` into the owning `Ast`.
#[derive(Debug, Clone, Serialize)]
pub enum NodeKind {
    // --- Top level ---
    TranslationUnit(ThinVec<NodeRef> /* external declarations */),
    FunctionDefinition(FunctionDefinitionData),
    /// Old-style parameter declarations between a prototype and its body.
    DeclarationList(ThinVec<NodeRef>),
    Declaration(DeclarationData),

    // --- Specifiers ---
    DeclarationSpecifiers(ThinVec<NodeRef>),
    SpecifierQualifierList(ThinVec<NodeRef>),
    StorageClassSpecifier(StorageClass),
    TypeQualifier(TypeQualifiers),
    TypeSpecifierPod(PodSpec),
    TypeSpecifierTdid(TypedefNameData),
    StructOrUnionRef(TagRefData),
    StructOrUnionDef(TagDefData),
    StructDeclaration(StructDeclarationData),
    /// Anonymous struct or union member, holds a `StructOrUnionDef`.
    StructDeclarationUnnamedSou(NodeRef),
    StructDeclarator(StructDeclaratorData),
    EnumRef(EnumRefData),
    EnumDef(EnumDefData),
    Enumerator(EnumeratorData),
    /// `__attribute__((name(params...)))`
    Attribute(AttributeData),

    // --- Declarators ---
    InitDeclarator(InitDeclaratorData),
    Declarator(DeclaratorData),
    Pointer(ThinVec<TypeQualifiers> /* one entry per `*` */),
    DirectDeclaratorId(DeclaratorIdData),
    DirectDeclaratorParenthesized(NodeRef /* declarator */),
    DirectDeclaratorArray(ArrayDeclaratorData),
    DirectDeclaratorFunc(FuncDeclaratorData),
    AbstractDeclarator(AbstractDeclaratorData),
    DirectAbstractDeclaratorParenthesized(NodeRef /* abstract declarator */),
    DirectAbstractDeclaratorArray(AbstractArrayDeclaratorData),
    DirectAbstractDeclaratorFunc(AbstractFuncDeclaratorData),
    ParameterDeclarationList(ParameterListData),
    ParameterDeclarationDeclarator(ParameterDeclarationData),
    ParameterDeclarationAbstract(AbstractParameterDeclarationData),
    /// Old-style (K&R) parameter names.
    IdentifierList(ThinVec<TokenIndex>),
    TypeName(TypeNameData),
    InitializerExpr(NodeRef),
    InitializerList(ThinVec<NodeRef>),

    // --- Statements ---
    StmtLabeled(LabeledStmtData),
    StmtCase(NodeRef /* expr */, NodeRef /* stmt */),
    StmtCaseRange(NodeRef /* low */, NodeRef /* high */, NodeRef /* stmt */), // GNU extension
    StmtDefault(NodeRef),
    StmtCompound(CompoundStmtData),
    StmtExpr(Option<NodeRef>),
    StmtIf(IfStmtData),
    StmtSwitch(NodeRef /* condition */, NodeRef /* body */),
    StmtWhile(NodeRef /* condition */, NodeRef /* body */),
    StmtDo(NodeRef /* body */, NodeRef /* condition */),
    StmtForInitExpr(ForStmtData),
    StmtForInitDecl(ForStmtData),
    StmtGoto(NodeRef /* target expression */),
    StmtContinue,
    StmtBreak,
    StmtReturn(Option<NodeRef>),

    // --- Expressions ---
    ExprId(ExprIdData),
    ExprConstant(i64),
    ExprString(TokenIndex),
    ExprParenthesized(NodeRef),
    ExprFuncInvocation(CallData),
    ExprMember(MemberData),
    ExprArraySubscript(NodeRef /* base */, NodeRef /* index */),
    ExprUnaryOp(UnaryOp, NodeRef),
    ExprBinop(BinaryOp, NodeRef, NodeRef),
    ExprAssignment(Option<BinaryOp> /* compound op */, NodeRef, NodeRef),
    ExprConditional(NodeRef, Option<NodeRef> /* GNU `?:` omits it */, NodeRef),
    ExprComma(NodeRef, NodeRef),
    ExprCast(NodeRef /* type name */, NodeRef),
    ExprSizeofExpr(NodeRef),
    ExprSizeofType(NodeRef /* type name */),
    ExprCompoundLiteral(NodeRef /* type name */, NodeRef /* initializer list */),
    /// GNU statement expression `({ ... })`, holds a `StmtCompound`.
    ExprStatement(NodeRef),
}

/// Fieldless discriminant of [`NodeKind`], usable as a table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum NodeTag {
    TranslationUnit,
    FunctionDefinition,
    DeclarationList,
    Declaration,
    DeclarationSpecifiers,
    SpecifierQualifierList,
    StorageClassSpecifier,
    TypeQualifier,
    TypeSpecifierPod,
    TypeSpecifierTdid,
    StructOrUnionRef,
    StructOrUnionDef,
    StructDeclaration,
    StructDeclarationUnnamedSou,
    StructDeclarator,
    EnumRef,
    EnumDef,
    Enumerator,
    Attribute,
    InitDeclarator,
    Declarator,
    Pointer,
    DirectDeclaratorId,
    DirectDeclaratorParenthesized,
    DirectDeclaratorArray,
    DirectDeclaratorFunc,
    AbstractDeclarator,
    DirectAbstractDeclaratorParenthesized,
    DirectAbstractDeclaratorArray,
    DirectAbstractDeclaratorFunc,
    ParameterDeclarationList,
    ParameterDeclarationDeclarator,
    ParameterDeclarationAbstract,
    IdentifierList,
    TypeName,
    InitializerExpr,
    InitializerList,
    StmtLabeled,
    StmtCase,
    StmtCaseRange,
    StmtDefault,
    StmtCompound,
    StmtExpr,
    StmtIf,
    StmtSwitch,
    StmtWhile,
    StmtDo,
    StmtForInitExpr,
    StmtForInitDecl,
    StmtGoto,
    StmtContinue,
    StmtBreak,
    StmtReturn,
    ExprId,
    ExprConstant,
    ExprString,
    ExprParenthesized,
    ExprFuncInvocation,
    ExprMember,
    ExprArraySubscript,
    ExprUnaryOp,
    ExprBinop,
    ExprAssignment,
    ExprConditional,
    ExprComma,
    ExprCast,
    ExprSizeofExpr,
    ExprSizeofType,
    ExprCompoundLiteral,
    ExprStatement,
}

impl NodeTag {
    pub const COUNT: usize = NodeTag::ExprStatement as usize + 1;

    pub const ALL: [NodeTag; NodeTag::COUNT] = {
        use NodeTag::*;
        [
            TranslationUnit,
            FunctionDefinition,
            DeclarationList,
            Declaration,
            DeclarationSpecifiers,
            SpecifierQualifierList,
            StorageClassSpecifier,
            TypeQualifier,
            TypeSpecifierPod,
            TypeSpecifierTdid,
            StructOrUnionRef,
            StructOrUnionDef,
            StructDeclaration,
            StructDeclarationUnnamedSou,
            StructDeclarator,
            EnumRef,
            EnumDef,
            Enumerator,
            Attribute,
            InitDeclarator,
            Declarator,
            Pointer,
            DirectDeclaratorId,
            DirectDeclaratorParenthesized,
            DirectDeclaratorArray,
            DirectDeclaratorFunc,
            AbstractDeclarator,
            DirectAbstractDeclaratorParenthesized,
            DirectAbstractDeclaratorArray,
            DirectAbstractDeclaratorFunc,
            ParameterDeclarationList,
            ParameterDeclarationDeclarator,
            ParameterDeclarationAbstract,
            IdentifierList,
            TypeName,
            InitializerExpr,
            InitializerList,
            StmtLabeled,
            StmtCase,
            StmtCaseRange,
            StmtDefault,
            StmtCompound,
            StmtExpr,
            StmtIf,
            StmtSwitch,
            StmtWhile,
            StmtDo,
            StmtForInitExpr,
            StmtForInitDecl,
            StmtGoto,
            StmtContinue,
            StmtBreak,
            StmtReturn,
            ExprId,
            ExprConstant,
            ExprString,
            ExprParenthesized,
            ExprFuncInvocation,
            ExprMember,
            ExprArraySubscript,
            ExprUnaryOp,
            ExprBinop,
            ExprAssignment,
            ExprConditional,
            ExprComma,
            ExprCast,
            ExprSizeofExpr,
            ExprSizeofType,
            ExprCompoundLiteral,
            ExprStatement,
        ]
    };

    pub fn index(self) -> usize {
        self as usize
    }
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::TranslationUnit(_) => NodeTag::TranslationUnit,
            NodeKind::FunctionDefinition(_) => NodeTag::FunctionDefinition,
            NodeKind::DeclarationList(_) => NodeTag::DeclarationList,
            NodeKind::Declaration(_) => NodeTag::Declaration,
            NodeKind::DeclarationSpecifiers(_) => NodeTag::DeclarationSpecifiers,
            NodeKind::SpecifierQualifierList(_) => NodeTag::SpecifierQualifierList,
            NodeKind::StorageClassSpecifier(_) => NodeTag::StorageClassSpecifier,
            NodeKind::TypeQualifier(_) => NodeTag::TypeQualifier,
            NodeKind::TypeSpecifierPod(_) => NodeTag::TypeSpecifierPod,
            NodeKind::TypeSpecifierTdid(_) => NodeTag::TypeSpecifierTdid,
            NodeKind::StructOrUnionRef(_) => NodeTag::StructOrUnionRef,
            NodeKind::StructOrUnionDef(_) => NodeTag::StructOrUnionDef,
            NodeKind::StructDeclaration(_) => NodeTag::StructDeclaration,
            NodeKind::StructDeclarationUnnamedSou(_) => NodeTag::StructDeclarationUnnamedSou,
            NodeKind::StructDeclarator(_) => NodeTag::StructDeclarator,
            NodeKind::EnumRef(_) => NodeTag::EnumRef,
            NodeKind::EnumDef(_) => NodeTag::EnumDef,
            NodeKind::Enumerator(_) => NodeTag::Enumerator,
            NodeKind::Attribute(_) => NodeTag::Attribute,
            NodeKind::InitDeclarator(_) => NodeTag::InitDeclarator,
            NodeKind::Declarator(_) => NodeTag::Declarator,
            NodeKind::Pointer(_) => NodeTag::Pointer,
            NodeKind::DirectDeclaratorId(_) => NodeTag::DirectDeclaratorId,
            NodeKind::DirectDeclaratorParenthesized(_) => NodeTag::DirectDeclaratorParenthesized,
            NodeKind::DirectDeclaratorArray(_) => NodeTag::DirectDeclaratorArray,
            NodeKind::DirectDeclaratorFunc(_) => NodeTag::DirectDeclaratorFunc,
            NodeKind::AbstractDeclarator(_) => NodeTag::AbstractDeclarator,
            NodeKind::DirectAbstractDeclaratorParenthesized(_) => NodeTag::DirectAbstractDeclaratorParenthesized,
            NodeKind::DirectAbstractDeclaratorArray(_) => NodeTag::DirectAbstractDeclaratorArray,
            NodeKind::DirectAbstractDeclaratorFunc(_) => NodeTag::DirectAbstractDeclaratorFunc,
            NodeKind::ParameterDeclarationList(_) => NodeTag::ParameterDeclarationList,
            NodeKind::ParameterDeclarationDeclarator(_) => NodeTag::ParameterDeclarationDeclarator,
            NodeKind::ParameterDeclarationAbstract(_) => NodeTag::ParameterDeclarationAbstract,
            NodeKind::IdentifierList(_) => NodeTag::IdentifierList,
            NodeKind::TypeName(_) => NodeTag::TypeName,
            NodeKind::InitializerExpr(_) => NodeTag::InitializerExpr,
            NodeKind::InitializerList(_) => NodeTag::InitializerList,
            NodeKind::StmtLabeled(_) => NodeTag::StmtLabeled,
            NodeKind::StmtCase(..) => NodeTag::StmtCase,
            NodeKind::StmtCaseRange(..) => NodeTag::StmtCaseRange,
            NodeKind::StmtDefault(_) => NodeTag::StmtDefault,
            NodeKind::StmtCompound(_) => NodeTag::StmtCompound,
            NodeKind::StmtExpr(_) => NodeTag::StmtExpr,
            NodeKind::StmtIf(_) => NodeTag::StmtIf,
            NodeKind::StmtSwitch(..) => NodeTag::StmtSwitch,
            NodeKind::StmtWhile(..) => NodeTag::StmtWhile,
            NodeKind::StmtDo(..) => NodeTag::StmtDo,
            NodeKind::StmtForInitExpr(_) => NodeTag::StmtForInitExpr,
            NodeKind::StmtForInitDecl(_) => NodeTag::StmtForInitDecl,
            NodeKind::StmtGoto(_) => NodeTag::StmtGoto,
            NodeKind::StmtContinue => NodeTag::StmtContinue,
            NodeKind::StmtBreak => NodeTag::StmtBreak,
            NodeKind::StmtReturn(_) => NodeTag::StmtReturn,
            NodeKind::ExprId(_) => NodeTag::ExprId,
            NodeKind::ExprConstant(_) => NodeTag::ExprConstant,
            NodeKind::ExprString(_) => NodeTag::ExprString,
            NodeKind::ExprParenthesized(_) => NodeTag::ExprParenthesized,
            NodeKind::ExprFuncInvocation(_) => NodeTag::ExprFuncInvocation,
            NodeKind::ExprMember(_) => NodeTag::ExprMember,
            NodeKind::ExprArraySubscript(..) => NodeTag::ExprArraySubscript,
            NodeKind::ExprUnaryOp(..) => NodeTag::ExprUnaryOp,
            NodeKind::ExprBinop(..) => NodeTag::ExprBinop,
            NodeKind::ExprAssignment(..) => NodeTag::ExprAssignment,
            NodeKind::ExprConditional(..) => NodeTag::ExprConditional,
            NodeKind::ExprComma(..) => NodeTag::ExprComma,
            NodeKind::ExprCast(..) => NodeTag::ExprCast,
            NodeKind::ExprSizeofExpr(_) => NodeTag::ExprSizeofExpr,
            NodeKind::ExprSizeofType(_) => NodeTag::ExprSizeofType,
            NodeKind::ExprCompoundLiteral(..) => NodeTag::ExprCompoundLiteral,
            NodeKind::ExprStatement(_) => NodeTag::ExprStatement,
        }
    }

    /// Calls `f` on every child in source order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeRef)) {
        let opt = |child: Option<NodeRef>, f: &mut dyn FnMut(NodeRef)| {
            if let Some(child) = child {
                f(child);
            }
        };
        match self {
            NodeKind::TranslationUnit(items)
            | NodeKind::DeclarationList(items)
            | NodeKind::DeclarationSpecifiers(items)
            | NodeKind::SpecifierQualifierList(items)
            | NodeKind::InitializerList(items) => items.iter().copied().for_each(f),
            NodeKind::FunctionDefinition(data) => {
                f(data.specifiers);
                f(data.declarator);
                opt(data.declarations, &mut f);
                f(data.body);
            }
            NodeKind::Declaration(data) => {
                f(data.specifiers);
                data.init_declarators.iter().copied().for_each(f);
            }
            NodeKind::StructOrUnionDef(data) => data.members.iter().copied().for_each(f),
            NodeKind::StructDeclaration(data) => {
                f(data.specifiers);
                data.declarators.iter().copied().for_each(f);
            }
            NodeKind::StructDeclarationUnnamedSou(sou) => f(*sou),
            NodeKind::StructDeclarator(data) => {
                opt(data.declarator, &mut f);
                opt(data.width, &mut f);
            }
            NodeKind::EnumDef(data) => data.enumerators.iter().copied().for_each(f),
            NodeKind::Enumerator(data) => opt(data.value, &mut f),
            NodeKind::Attribute(data) => data.params.iter().copied().for_each(f),
            NodeKind::InitDeclarator(data) => {
                f(data.declarator);
                opt(data.initializer, &mut f);
            }
            NodeKind::Declarator(data) => {
                opt(data.pointer, &mut f);
                f(data.direct);
            }
            NodeKind::DirectDeclaratorParenthesized(inner)
            | NodeKind::DirectAbstractDeclaratorParenthesized(inner) => f(*inner),
            NodeKind::DirectDeclaratorArray(data) => {
                f(data.direct);
                opt(data.size, &mut f);
            }
            NodeKind::DirectDeclaratorFunc(data) => {
                f(data.direct);
                opt(data.params, &mut f);
            }
            NodeKind::AbstractDeclarator(data) => {
                opt(data.pointer, &mut f);
                opt(data.direct, &mut f);
            }
            NodeKind::DirectAbstractDeclaratorArray(data) => {
                opt(data.direct, &mut f);
                opt(data.size, &mut f);
            }
            NodeKind::DirectAbstractDeclaratorFunc(data) => {
                opt(data.direct, &mut f);
                opt(data.params, &mut f);
            }
            NodeKind::ParameterDeclarationList(data) => data.params.iter().copied().for_each(f),
            NodeKind::ParameterDeclarationDeclarator(data) => {
                f(data.specifiers);
                f(data.declarator);
            }
            NodeKind::ParameterDeclarationAbstract(data) => {
                f(data.specifiers);
                opt(data.declarator, &mut f);
            }
            NodeKind::TypeName(data) => {
                f(data.specifiers);
                opt(data.declarator, &mut f);
            }
            NodeKind::InitializerExpr(expr) => f(*expr),
            NodeKind::StmtLabeled(data) => f(data.stmt),
            NodeKind::StmtCase(expr, stmt) => {
                f(*expr);
                f(*stmt);
            }
            NodeKind::StmtCaseRange(low, high, stmt) => {
                f(*low);
                f(*high);
                f(*stmt);
            }
            NodeKind::StmtDefault(stmt) => f(*stmt),
            NodeKind::StmtCompound(data) => data.items.iter().copied().for_each(f),
            NodeKind::StmtExpr(expr) | NodeKind::StmtReturn(expr) => opt(*expr, &mut f),
            NodeKind::StmtIf(data) => {
                f(data.condition);
                f(data.then_branch);
                opt(data.else_branch, &mut f);
            }
            NodeKind::StmtSwitch(a, b) | NodeKind::StmtWhile(a, b) | NodeKind::StmtDo(a, b) => {
                f(*a);
                f(*b);
            }
            NodeKind::StmtForInitExpr(data) | NodeKind::StmtForInitDecl(data) => {
                opt(data.init, &mut f);
                opt(data.condition, &mut f);
                opt(data.increment, &mut f);
                f(data.body);
            }
            NodeKind::StmtGoto(target) => f(*target),
            NodeKind::ExprParenthesized(e)
            | NodeKind::ExprUnaryOp(_, e)
            | NodeKind::ExprSizeofExpr(e)
            | NodeKind::ExprSizeofType(e)
            | NodeKind::ExprStatement(e) => f(*e),
            NodeKind::ExprFuncInvocation(data) => {
                f(data.callee);
                data.args.iter().copied().for_each(f);
            }
            NodeKind::ExprMember(data) => f(data.base),
            NodeKind::ExprArraySubscript(a, b)
            | NodeKind::ExprBinop(_, a, b)
            | NodeKind::ExprAssignment(_, a, b)
            | NodeKind::ExprComma(a, b)
            | NodeKind::ExprCast(a, b)
            | NodeKind::ExprCompoundLiteral(a, b) => {
                f(*a);
                f(*b);
            }
            NodeKind::ExprConditional(cond, then, els) => {
                f(*cond);
                opt(*then, &mut f);
                f(*els);
            }
            NodeKind::StorageClassSpecifier(_)
            | NodeKind::TypeQualifier(_)
            | NodeKind::TypeSpecifierPod(_)
            | NodeKind::TypeSpecifierTdid(_)
            | NodeKind::StructOrUnionRef(_)
            | NodeKind::EnumRef(_)
            | NodeKind::Pointer(_)
            | NodeKind::DirectDeclaratorId(_)
            | NodeKind::IdentifierList(_)
            | NodeKind::StmtContinue
            | NodeKind::StmtBreak
            | NodeKind::ExprId(_)
            | NodeKind::ExprConstant(_)
            | NodeKind::ExprString(_) => {}
        }
    }
}

/// Storage class specifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StorageClass {
    None,
    Typedef,
    Extern,
    Static,
    Auto,
    Register,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
    pub struct TypeQualifiers: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const RESTRICT = 1 << 2;
        const ATOMIC = 1 << 3; // C11 _Atomic
    }
}

/// Builtin (plain old data) type specifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PodSpec {
    Void,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TagKind {
    Struct,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    AddrOf,
    Deref,
    Plus,
    Minus,
    BitNot,
    LogicNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    LogicAnd,
    LogicOr,
}

/// What an identifier expression resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Resolved {
    #[default]
    None,
    /// A `DirectDeclaratorId`.
    Declarator(NodeRef),
    Enumerator(NodeRef),
    /// Slot `slot` of an old-style parameter `IdentifierList`.
    InParamIdList { list: NodeRef, slot: u32 },
    /// A `StmtLabeled`, for `goto` operands.
    Label(NodeRef),
    /// A compiler builtin.
    Builtin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TypedefResolution {
    #[default]
    Unresolved,
    /// The `DirectDeclaratorId` of the typedef declaration.
    Declarator(NodeRef),
    Builtin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LinkageKind {
    #[default]
    None,
    Internal,
    External,
    /// GNU extension: block-scope function declared or defined `auto`.
    NestedFunAuto,
}

/// Linkage of an init-declarator or function definition.
///
/// `target` points at the `InitDeclarator` or `FunctionDefinition` this
/// declaration shares its linkage with; following targets leads to the first
/// declaration of the entity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Linkage {
    pub kind: Cell<LinkageKind>,
    pub target: Cell<Option<NodeRef>>,
}

impl Linkage {
    pub fn kind(&self) -> LinkageKind {
        self.kind.get()
    }

    pub fn set_kind(&self, kind: LinkageKind) {
        self.kind.set(kind);
    }

    pub fn link_to(&self, target: NodeRef, kind: LinkageKind) {
        self.kind.set(kind);
        self.target.set(Some(target));
    }

    pub fn target(&self) -> Option<NodeRef> {
        self.target.get()
    }
}

/// Where a `DirectDeclaratorId` declares its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclContext {
    /// Member of a struct or union, the `StructDeclarator`.
    StructDecl(NodeRef),
    /// The `ParameterDeclarationDeclarator`.
    ParameterDecl(NodeRef),
    /// The `InitDeclarator`.
    InitDecl(NodeRef),
    /// The `FunctionDefinition`.
    FunctionDef(NodeRef),
}

/// Ring of all declarations (refs and defs) of one struct/union tag.
/// `None` means the node is alone in its ring.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagChain {
    pub next: Cell<Option<NodeRef>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinitionData {
    pub specifiers: NodeRef,
    pub declarator: NodeRef,
    pub declarations: Option<NodeRef>,
    pub body: NodeRef,
    pub linkage: Linkage,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeclarationData {
    pub specifiers: NodeRef,
    pub init_declarators: ThinVec<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypedefNameData {
    pub token: TokenIndex,
    pub resolved: Cell<TypedefResolution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagRefData {
    pub kind: TagKind,
    pub token: TokenIndex,
    pub chain: TagChain,
    /// For usages: the declaration the reference resolved to.
    pub declaration: Cell<Option<NodeRef>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagDefData {
    pub kind: TagKind,
    pub token: Option<TokenIndex>,
    pub members: ThinVec<NodeRef>,
    pub chain: TagChain,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructDeclarationData {
    pub specifiers: NodeRef,
    pub declarators: ThinVec<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructDeclaratorData {
    pub declarator: Option<NodeRef>,
    pub width: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumRefData {
    pub token: TokenIndex,
    pub definition: Cell<Option<NodeRef>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumDefData {
    pub token: Option<TokenIndex>,
    pub enumerators: ThinVec<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumeratorData {
    pub token: TokenIndex,
    pub value: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeData {
    pub name: TokenIndex,
    pub params: ThinVec<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitDeclaratorData {
    pub declarator: NodeRef,
    pub initializer: Option<NodeRef>,
    pub linkage: Linkage,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeclaratorData {
    pub pointer: Option<NodeRef>,
    pub direct: NodeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeclaratorIdData {
    pub token: TokenIndex,
    pub context: Cell<Option<DeclContext>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrayDeclaratorData {
    pub direct: NodeRef,
    pub size: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuncDeclaratorData {
    pub direct: NodeRef,
    /// `ParameterDeclarationList` or `IdentifierList`, `None` for `()`.
    pub params: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbstractDeclaratorData {
    pub pointer: Option<NodeRef>,
    pub direct: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbstractArrayDeclaratorData {
    pub direct: Option<NodeRef>,
    pub size: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbstractFuncDeclaratorData {
    pub direct: Option<NodeRef>,
    pub params: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterListData {
    pub params: ThinVec<NodeRef>,
    pub variadic: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterDeclarationData {
    pub specifiers: NodeRef,
    pub declarator: NodeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbstractParameterDeclarationData {
    pub specifiers: NodeRef,
    pub declarator: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeNameData {
    pub specifiers: NodeRef,
    pub declarator: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabeledStmtData {
    pub label: TokenIndex,
    pub stmt: NodeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompoundStmtData {
    /// Labels declared with `__label__` at the start of the block.
    pub local_labels: ThinVec<TokenIndex>,
    pub items: ThinVec<NodeRef>,
    /// `StmtLabeled` nodes registered to this block.
    pub labels: RefCell<ThinVec<NodeRef>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IfStmtData {
    pub condition: NodeRef,
    pub then_branch: NodeRef,
    pub else_branch: Option<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForStmtData {
    /// Expression for `StmtForInitExpr`, `Declaration` for `StmtForInitDecl`.
    pub init: Option<NodeRef>,
    pub condition: Option<NodeRef>,
    pub increment: Option<NodeRef>,
    pub body: NodeRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExprIdData {
    pub token: TokenIndex,
    pub resolved: Cell<Resolved>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallData {
    pub callee: NodeRef,
    pub args: ThinVec<NodeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberData {
    pub base: NodeRef,
    pub member: TokenIndex,
    pub is_arrow: bool,
}
