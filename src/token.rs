//! Preprocessed tokens as seen by the resolver.
//!
//! AST nodes that carry an identifier hold a [`TokenIndex`] rather than the
//! spelling itself; the spelling and source range are looked up through the
//! [`TokenStream`] owned by the AST.

use serde::Serialize;

use crate::ast::NameId;
use crate::source_manager::SourceSpan;

/// Index of a token inside a [`TokenStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TokenIndex(u32);

impl TokenIndex {
    pub fn new(index: u32) -> Self {
        TokenIndex(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub spelling: NameId,
    pub span: SourceSpan,
}

/// Random-access, append-only token storage.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        TokenStream::default()
    }

    pub fn push(&mut self, token: Token) -> TokenIndex {
        let index = TokenIndex(self.tokens.len() as u32);
        self.tokens.push(token);
        index
    }

    pub fn get(&self, index: TokenIndex) -> &Token {
        &self.tokens[index.index()]
    }

    pub fn spelling(&self, index: TokenIndex) -> NameId {
        self.get(index).spelling
    }

    pub fn span(&self, index: TokenIndex) -> SourceSpan {
        self.get(index).span
    }

    /// Whether two tokens are spelled the same.
    pub fn same_spelling(&self, a: TokenIndex, b: TokenIndex) -> bool {
        self.spelling(a) == self.spelling(b)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl std::ops::Index<TokenIndex> for TokenStream {
    type Output = Token;

    fn index(&self, index: TokenIndex) -> &Token {
        self.get(index)
    }
}
