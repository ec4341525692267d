/// Language options affecting resolution behavior
#[derive(Copy, Clone, Debug)]
pub struct LangOptions {
    pub gnu_mode: bool, // GNU extensions (nested functions, `auto` function declarations)
    /// Whether a GNU statement expression `({ ... })` confines the labels
    /// defined inside it. When off, the search for the block a label belongs
    /// to continues into the enclosing compound statements.
    pub statement_expression_label_boundary: bool,
}

impl LangOptions {
    /// Strict ISO C: no GNU extensions.
    pub fn iso() -> Self {
        LangOptions {
            gnu_mode: false,
            ..LangOptions::default()
        }
    }
}

impl Default for LangOptions {
    fn default() -> Self {
        LangOptions {
            gnu_mode: true,
            statement_expression_label_boundary: true,
        }
    }
}
