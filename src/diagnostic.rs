use crate::ast::NameId;
use crate::source_manager::SourceSpan;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum DiagnosticLevel {
    /// Aborts resolution of the translation unit.
    Fatal,
    Warning,
}

/// One entry in the diagnostics sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub location: SourceSpan,
}

/// Append-only sink for the remarks produced while resolving a translation unit
pub struct DiagnosticEngine {
    pub diagnostics: Vec<Diagnostic>,
    pub warnings_as_errors: bool,
    pub disable_all_warnings: bool,
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        DiagnosticEngine {
            diagnostics: Vec::new(),
            warnings_as_errors: false,
            disable_all_warnings: false,
        }
    }

    /// Build an engine from `-W` style switches (`error`, `no-warnings`).
    pub fn from_warnings(warnings: &[String]) -> Self {
        let warnings_as_errors = warnings.iter().any(|w| w == "error");
        let disable_all_warnings = warnings.iter().any(|w| w == "no-warnings");
        Self {
            diagnostics: Vec::new(),
            warnings_as_errors,
            disable_all_warnings,
        }
    }

    pub fn report_error(&mut self, error: &SemanticError) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Fatal,
            message: error.to_string(),
            location: error.location(),
        });
    }

    pub fn report_warning(&mut self, warning: SemanticWarning) {
        if self.disable_all_warnings {
            return;
        }

        let level = if self.warnings_as_errors {
            DiagnosticLevel::Fatal
        } else {
            DiagnosticLevel::Warning
        };
        self.diagnostics.push(Diagnostic {
            level,
            message: warning.to_string(),
            location: warning.location(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Fatal)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Fatal resolution errors. The first one raised aborts the pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    // Labels
    #[error("label redefined")]
    LabelRedefined { name: NameId, location: SourceSpan },

    // Ordinary identifiers and linkage
    #[error("invalid redeclaration")]
    InvalidRedeclaration { name: NameId, location: SourceSpan },
    #[error("static declaration follows non-static one")]
    StaticFollowsNonStatic { name: NameId, location: SourceSpan },
    #[error("extern declaration follows static one")]
    ExternFollowsStatic { name: NameId, location: SourceSpan },
    #[error("non-static declaration follows static one")]
    NonStaticFollowsStatic { name: NameId, location: SourceSpan },
    #[error("static declaration follows external one")]
    StaticFollowsExternal { name: NameId, location: SourceSpan },
    #[error("auto nested function declaration follows an external one")]
    AutoNestedFollowsExternal { name: NameId, location: SourceSpan },
    #[error("nested function definition follows an external declaration")]
    NestedDefinitionFollowsExternal { name: NameId, location: SourceSpan },
    #[error("static specifier at non-local function declaration")]
    StaticAtBlockScopeFunction { name: NameId, location: SourceSpan },
    #[error("nested functions are a GNU extension")]
    NestedFunctionExtension { name: NameId, location: SourceSpan },

    // Function definitions
    #[error("no function declarator in definition's prototype")]
    MissingFunctionDeclarator { name: NameId, location: SourceSpan },
    #[error("invalid storage class at function definition")]
    InvalidFunctionStorageClass { name: NameId, location: SourceSpan },

    // Tags
    #[error("tag redeclared as a different kind")]
    TagKindMismatch { name: NameId, location: SourceSpan },
    #[error("struct or union redefined")]
    StructOrUnionRedefined { name: NameId, location: SourceSpan },
    #[error("enum redeclared")]
    EnumRedeclared { name: NameId, location: SourceSpan },
    #[error("enum undeclared")]
    EnumUndeclared { name: NameId, location: SourceSpan },

    // Uses
    #[error("identifier not declared")]
    UndeclaredIdentifier { name: NameId, location: SourceSpan },
    #[error("typedef identifier not declared")]
    UndeclaredTypedef { name: NameId, location: SourceSpan },

    #[error("translation unit already resolved")]
    AlreadyResolved,
}

impl SemanticError {
    pub fn location(&self) -> SourceSpan {
        match self {
            SemanticError::LabelRedefined { location, .. }
            | SemanticError::InvalidRedeclaration { location, .. }
            | SemanticError::StaticFollowsNonStatic { location, .. }
            | SemanticError::ExternFollowsStatic { location, .. }
            | SemanticError::NonStaticFollowsStatic { location, .. }
            | SemanticError::StaticFollowsExternal { location, .. }
            | SemanticError::AutoNestedFollowsExternal { location, .. }
            | SemanticError::NestedDefinitionFollowsExternal { location, .. }
            | SemanticError::StaticAtBlockScopeFunction { location, .. }
            | SemanticError::NestedFunctionExtension { location, .. }
            | SemanticError::MissingFunctionDeclarator { location, .. }
            | SemanticError::InvalidFunctionStorageClass { location, .. }
            | SemanticError::TagKindMismatch { location, .. }
            | SemanticError::StructOrUnionRedefined { location, .. }
            | SemanticError::EnumRedeclared { location, .. }
            | SemanticError::EnumUndeclared { location, .. }
            | SemanticError::UndeclaredIdentifier { location, .. }
            | SemanticError::UndeclaredTypedef { location, .. } => *location,
            SemanticError::AlreadyResolved => SourceSpan::empty(),
        }
    }

    /// The identifier the error is about, if any.
    pub fn name(&self) -> Option<NameId> {
        match self {
            SemanticError::LabelRedefined { name, .. }
            | SemanticError::InvalidRedeclaration { name, .. }
            | SemanticError::StaticFollowsNonStatic { name, .. }
            | SemanticError::ExternFollowsStatic { name, .. }
            | SemanticError::NonStaticFollowsStatic { name, .. }
            | SemanticError::StaticFollowsExternal { name, .. }
            | SemanticError::AutoNestedFollowsExternal { name, .. }
            | SemanticError::NestedDefinitionFollowsExternal { name, .. }
            | SemanticError::StaticAtBlockScopeFunction { name, .. }
            | SemanticError::NestedFunctionExtension { name, .. }
            | SemanticError::MissingFunctionDeclarator { name, .. }
            | SemanticError::InvalidFunctionStorageClass { name, .. }
            | SemanticError::TagKindMismatch { name, .. }
            | SemanticError::StructOrUnionRedefined { name, .. }
            | SemanticError::EnumRedeclared { name, .. }
            | SemanticError::EnumUndeclared { name, .. }
            | SemanticError::UndeclaredIdentifier { name, .. }
            | SemanticError::UndeclaredTypedef { name, .. } => Some(*name),
            SemanticError::AlreadyResolved => None,
        }
    }
}

/// Semantic warnings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticWarning {
    /// Call of a function that has not been declared.
    #[error("identifier not declared")]
    ImplicitFunctionDeclaration { name: NameId, location: SourceSpan },
}

impl SemanticWarning {
    pub fn location(&self) -> SourceSpan {
        match self {
            SemanticWarning::ImplicitFunctionDeclaration { location, .. } => *location,
        }
    }
}
