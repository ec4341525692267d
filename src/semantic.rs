//! Semantic resolution module.
//!
//! Resolution runs in two fixed phases over a parsed translation unit:
//! - Label registration: every labeled statement is bound to the block it
//!   is visible in
//! - Identifier resolution: scopes, declarations, tags, typedef names and
//!   linkage
//!
//! Both phases write their results into the AST. The first fatal error
//! aborts resolution of the whole translation unit.

pub mod builtins;
pub mod labels;
mod linkage;
pub mod resolver;
pub mod scope;
mod tags;

#[cfg(test)]
mod tests_identifiers;
#[cfg(test)]
mod tests_labels;

use log::debug;

use crate::ast::Ast;
use crate::diagnostic::{DiagnosticEngine, SemanticError};
use crate::lang_options::LangOptions;

pub use labels::register_labels;
pub use resolver::IdResolver;
pub use scope::{DeclaredId, ScopeStack, TagDecl};

/// Resolve a translation unit.
///
/// A tree can be resolved only once. A fatal error is reported to `diag`
/// and returned; the tree must then be discarded.
pub fn resolve(ast: &Ast, diag: &mut DiagnosticEngine, opts: &LangOptions) -> Result<(), SemanticError> {
    let result = run_phases(ast, diag, opts);
    if let Err(error) = &result {
        debug!("Resolution aborted: {}", error);
        diag.report_error(error);
    }
    result
}

fn run_phases(ast: &Ast, diag: &mut DiagnosticEngine, opts: &LangOptions) -> Result<(), SemanticError> {
    if ast.is_resolved() {
        return Err(SemanticError::AlreadyResolved);
    }
    ast.mark_resolved();

    debug!("Registering labels");
    register_labels(ast, opts)?;
    debug!("Resolving identifiers");
    IdResolver::new(ast, diag, opts).run()?;
    debug!("Resolution complete");
    Ok(())
}
