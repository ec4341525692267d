//! Name and linkage resolution for a C front end.
//!
//! Takes a parsed translation unit and binds every identifier, tag, typedef
//! name and goto label to its declaration, and computes the linkage of every
//! declaration.
pub mod ast;
/// Contains the diagnostics sink and the semantic error types.
pub mod diagnostic;
/// Contains the options controlling resolution.
pub mod lang_options;
/// Contains the resolution passes.
pub mod semantic;
pub mod source_manager;
pub mod token;


pub use ast::{Ast, AstBuilder, NameId, NodeRef};
pub use diagnostic::{Diagnostic, DiagnosticEngine, DiagnosticLevel, SemanticError, SemanticWarning};
pub use lang_options::LangOptions;
pub use semantic::resolve;
