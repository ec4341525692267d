//! Label registration.
//!
//! Every labeled statement is registered in one compound statement. By
//! default that is the outermost block of the enclosing function, so labels
//! are visible function-wide. A `__label__` declaration at the head of a
//! block keeps the label in that block instead. The search never leaves a
//! function definition, and by default not a GNU statement expression
//! either.

use log::debug;

use crate::ast::dispatch::{Dispatcher, Handler};
use crate::ast::traverse::{AncestorWalk, for_each_dfs_po};
use crate::ast::{Ast, KindSet, NodeRef, NodeTag};
use crate::diagnostic::SemanticError;
use crate::lang_options::LangOptions;
use crate::token::TokenIndex;

/// State of one ancestor search for a label's block.
struct LabelScopeFinder<'a> {
    ast: &'a Ast,
    label: TokenIndex,
    registrar: Option<NodeRef>,
}

fn on_compound(finder: &mut LabelScopeFinder<'_>, compound: NodeRef) -> Result<bool, SemanticError> {
    let ast = finder.ast;
    finder.registrar = Some(compound);

    if ast.lookup_label(compound, finder.label).is_some() {
        return Err(SemanticError::LabelRedefined {
            name: ast.spelling(finder.label),
            location: ast.token_span(finder.label),
        });
    }

    Ok(!ast.is_local_label(compound, finder.label))
}

fn stop(_: &mut LabelScopeFinder<'_>, _: NodeRef) -> Result<bool, SemanticError> {
    Ok(false)
}

fn climb(_: &mut LabelScopeFinder<'_>, _: NodeRef) -> Result<bool, SemanticError> {
    Ok(true)
}

struct LabelRegistrar<'a> {
    ast: &'a Ast,
    walk: AncestorWalk<LabelScopeFinder<'a>, SemanticError>,
}

fn on_labeled(registrar: &mut LabelRegistrar<'_>, labeled: NodeRef) -> Result<(), SemanticError> {
    let ast = registrar.ast;
    let mut finder = LabelScopeFinder {
        ast,
        label: ast.labeled_stmt(labeled).label,
        registrar: None,
    };
    registrar.walk.run(ast, labeled, &mut finder)?;

    let Some(compound) = finder.registrar else {
        panic!("ICE: label {} outside of any block", labeled);
    };
    debug!(
        "Labels: Registered '{}' ({}) in block {}",
        ast.spelling(finder.label),
        labeled,
        compound
    );
    ast.register_label(compound, labeled);
    Ok(())
}

/// Bind every labeled statement of the translation unit to its block.
pub fn register_labels(ast: &Ast, opts: &LangOptions) -> Result<(), SemanticError> {
    let mut handlers = vec![
        Handler::of(NodeTag::StmtCompound, on_compound),
        Handler::of(NodeTag::FunctionDefinition, stop),
    ];
    let boundary = if opts.statement_expression_label_boundary {
        handlers.push(Handler::of(NodeTag::ExprStatement, stop));
        KindSet::of(NodeTag::ExprStatement)
    } else {
        KindSet::empty()
    };

    let mut registrar = LabelRegistrar {
        ast,
        walk: AncestorWalk::new(NodeTag::StmtLabeled, boundary, handlers, climb),
    };
    let visit = Dispatcher::new(vec![Handler::of(NodeTag::StmtLabeled, on_labeled)], |_, _| Ok(()));
    for_each_dfs_po(ast, ast.root(), &mut registrar, &visit)
}
