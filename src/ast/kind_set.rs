//! Sets of node kinds.
//!
//! Handler keys, ancestor-walk boundaries and the grammar's parent relation
//! are all expressed as `KindSet`s, one bit per [`NodeTag`].

use crate::ast::NodeTag;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KindSet: u128 {
        const _ = !0;
    }
}

impl KindSet {
    pub const fn of(tag: NodeTag) -> KindSet {
        KindSet::from_bits_retain(1u128 << tag as u8)
    }

    pub const fn of_all(tags: &[NodeTag]) -> KindSet {
        let mut bits = 0u128;
        let mut i = 0;
        while i < tags.len() {
            bits |= 1u128 << tags[i] as u8;
            i += 1;
        }
        KindSet::from_bits_retain(bits)
    }

    pub fn has(self, tag: NodeTag) -> bool {
        self.contains(KindSet::of(tag))
    }

    pub fn len(self) -> usize {
        self.bits().count_ones() as usize
    }

    pub fn tags(self) -> impl Iterator<Item = NodeTag> {
        NodeTag::ALL.into_iter().filter(move |&t| self.has(t))
    }

    pub const STMT: KindSet = KindSet::of_all(&[
        NodeTag::StmtLabeled,
        NodeTag::StmtCase,
        NodeTag::StmtCaseRange,
        NodeTag::StmtDefault,
        NodeTag::StmtCompound,
        NodeTag::StmtExpr,
        NodeTag::StmtIf,
        NodeTag::StmtSwitch,
        NodeTag::StmtWhile,
        NodeTag::StmtDo,
        NodeTag::StmtForInitExpr,
        NodeTag::StmtForInitDecl,
        NodeTag::StmtGoto,
        NodeTag::StmtContinue,
        NodeTag::StmtBreak,
        NodeTag::StmtReturn,
    ]);

    /// Statements whose sub-statements get a scope of their own.
    pub const SCOPED_STMT_PARENT: KindSet = KindSet::of_all(&[
        NodeTag::StmtIf,
        NodeTag::StmtSwitch,
        NodeTag::StmtForInitDecl,
        NodeTag::StmtForInitExpr,
        NodeTag::StmtWhile,
        NodeTag::StmtDo,
    ]);

    pub const EXPR: KindSet = KindSet::of_all(&[
        NodeTag::ExprId,
        NodeTag::ExprConstant,
        NodeTag::ExprString,
        NodeTag::ExprParenthesized,
        NodeTag::ExprFuncInvocation,
        NodeTag::ExprMember,
        NodeTag::ExprArraySubscript,
        NodeTag::ExprUnaryOp,
        NodeTag::ExprBinop,
        NodeTag::ExprAssignment,
        NodeTag::ExprConditional,
        NodeTag::ExprComma,
        NodeTag::ExprCast,
        NodeTag::ExprSizeofExpr,
        NodeTag::ExprSizeofType,
        NodeTag::ExprCompoundLiteral,
        NodeTag::ExprStatement,
    ]);

    /// `declarator` and all `direct_declarator` kinds.
    pub const DECLARATOR: KindSet = KindSet::of_all(&[
        NodeTag::Declarator,
        NodeTag::DirectDeclaratorId,
        NodeTag::DirectDeclaratorParenthesized,
        NodeTag::DirectDeclaratorArray,
        NodeTag::DirectDeclaratorFunc,
    ]);

    pub const SPECIFIER_LIST: KindSet =
        KindSet::of_all(&[NodeTag::DeclarationSpecifiers, NodeTag::SpecifierQualifierList]);

    /// Statement kinds that can hold another statement as a child.
    const STMT_CONTAINER: KindSet = KindSet::of_all(&[
        NodeTag::StmtCompound,
        NodeTag::StmtLabeled,
        NodeTag::StmtCase,
        NodeTag::StmtCaseRange,
        NodeTag::StmtDefault,
        NodeTag::StmtIf,
        NodeTag::StmtSwitch,
        NodeTag::StmtWhile,
        NodeTag::StmtDo,
        NodeTag::StmtForInitExpr,
        NodeTag::StmtForInitDecl,
    ]);

    /// Node kinds that can hold an expression as a child.
    const EXPR_CONTAINER: KindSet = KindSet::EXPR.union(KindSet::of_all(&[
        NodeTag::StmtExpr,
        NodeTag::StmtIf,
        NodeTag::StmtSwitch,
        NodeTag::StmtWhile,
        NodeTag::StmtDo,
        NodeTag::StmtForInitExpr,
        NodeTag::StmtForInitDecl,
        NodeTag::StmtReturn,
        NodeTag::StmtGoto,
        NodeTag::StmtCase,
        NodeTag::StmtCaseRange,
        NodeTag::InitializerExpr,
        NodeTag::DirectDeclaratorArray,
        NodeTag::DirectAbstractDeclaratorArray,
        NodeTag::Enumerator,
        NodeTag::StructDeclarator,
        NodeTag::Attribute,
    ]));
}

impl NodeTag {
    /// Every kind a node of this kind can be attached to.
    pub fn parent_kinds(self) -> KindSet {
        use NodeTag as T;
        match self {
            T::TranslationUnit => KindSet::empty(),
            T::FunctionDefinition => KindSet::of_all(&[T::TranslationUnit, T::StmtCompound]),
            T::DeclarationList => KindSet::of(T::FunctionDefinition),
            T::Declaration => KindSet::of_all(&[
                T::TranslationUnit,
                T::DeclarationList,
                T::StmtCompound,
                T::StmtForInitDecl,
            ]),
            T::DeclarationSpecifiers => KindSet::of_all(&[
                T::Declaration,
                T::FunctionDefinition,
                T::ParameterDeclarationDeclarator,
                T::ParameterDeclarationAbstract,
            ]),
            T::SpecifierQualifierList => KindSet::of_all(&[T::StructDeclaration, T::TypeName]),
            T::StorageClassSpecifier => KindSet::of(T::DeclarationSpecifiers),
            T::TypeQualifier
            | T::TypeSpecifierPod
            | T::TypeSpecifierTdid
            | T::StructOrUnionRef
            | T::EnumRef
            | T::EnumDef
            | T::Attribute => KindSet::SPECIFIER_LIST,
            T::StructOrUnionDef => KindSet::SPECIFIER_LIST | KindSet::of(T::StructDeclarationUnnamedSou),
            T::StructDeclaration | T::StructDeclarationUnnamedSou => KindSet::of(T::StructOrUnionDef),
            T::StructDeclarator => KindSet::of(T::StructDeclaration),
            T::Enumerator => KindSet::of(T::EnumDef),
            T::InitDeclarator => KindSet::of(T::Declaration),
            T::Declarator => KindSet::of_all(&[
                T::InitDeclarator,
                T::FunctionDefinition,
                T::StructDeclarator,
                T::ParameterDeclarationDeclarator,
                T::DirectDeclaratorParenthesized,
            ]),
            T::Pointer => KindSet::of_all(&[T::Declarator, T::AbstractDeclarator]),
            T::DirectDeclaratorId
            | T::DirectDeclaratorParenthesized
            | T::DirectDeclaratorArray
            | T::DirectDeclaratorFunc => {
                KindSet::of_all(&[T::Declarator, T::DirectDeclaratorArray, T::DirectDeclaratorFunc])
            }
            T::AbstractDeclarator => KindSet::of_all(&[
                T::TypeName,
                T::ParameterDeclarationAbstract,
                T::DirectAbstractDeclaratorParenthesized,
            ]),
            T::DirectAbstractDeclaratorParenthesized
            | T::DirectAbstractDeclaratorArray
            | T::DirectAbstractDeclaratorFunc => KindSet::of_all(&[
                T::AbstractDeclarator,
                T::DirectAbstractDeclaratorArray,
                T::DirectAbstractDeclaratorFunc,
            ]),
            T::ParameterDeclarationList => {
                KindSet::of_all(&[T::DirectDeclaratorFunc, T::DirectAbstractDeclaratorFunc])
            }
            T::ParameterDeclarationDeclarator | T::ParameterDeclarationAbstract => {
                KindSet::of(T::ParameterDeclarationList)
            }
            T::IdentifierList => KindSet::of(T::DirectDeclaratorFunc),
            T::TypeName => KindSet::of_all(&[T::ExprCast, T::ExprSizeofType, T::ExprCompoundLiteral]),
            T::InitializerExpr => KindSet::of_all(&[T::InitDeclarator, T::InitializerList]),
            T::InitializerList => {
                KindSet::of_all(&[T::InitDeclarator, T::InitializerList, T::ExprCompoundLiteral])
            }
            T::StmtCompound => {
                KindSet::STMT_CONTAINER | KindSet::of_all(&[T::FunctionDefinition, T::ExprStatement])
            }
            _ if KindSet::STMT.has(self) => KindSet::STMT_CONTAINER,
            _ => {
                debug_assert!(KindSet::EXPR.has(self));
                KindSet::EXPR_CONTAINER
            }
        }
    }
}

/// All kinds that can appear above a node of kind `start`.
///
/// Boundary kinds are included but not expanded further, matching an
/// ancestor walk that stops at the first boundary it meets.
pub fn ancestor_closure(start: NodeTag, boundary: KindSet) -> KindSet {
    let mut closure = KindSet::empty();
    let mut worklist: Vec<NodeTag> = start.parent_kinds().tags().collect();
    while let Some(tag) = worklist.pop() {
        if closure.has(tag) {
            continue;
        }
        closure |= KindSet::of(tag);
        if !boundary.has(tag) {
            worklist.extend(tag.parent_kinds().tags().filter(|&t| !closure.has(t)));
        }
    }
    closure
}
