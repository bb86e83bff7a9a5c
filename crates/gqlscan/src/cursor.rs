use crate::{Token, TokenRef};

/// Read-only view of the scan, handed to the token hook for every token.
///
/// The span accessors are only meaningful for the token currently being
/// delivered; the same cursor is updated in place for the next one.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'src> {
    pub(crate) input: &'src [u8],
    pub(crate) token: Token,
    pub(crate) tail: usize,
    pub(crate) head: usize,
    pub(crate) level: usize,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(input: &'src [u8]) -> Self {
        Self {
            input,
            token: Token::DefQuery,
            tail: 0,
            head: 0,
            level: 0,
        }
    }

    /// Kind of the current token.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Raw bytes of the current token. Name tokens exclude their sigil and
    /// string tokens exclude their quotes; structural tokens are empty.
    #[must_use]
    pub fn value(&self) -> &'src [u8] {
        &self.input[self.tail..self.head]
    }

    /// Start offset of the current token.
    #[must_use]
    pub fn index_tail(&self) -> usize {
        self.tail
    }

    /// End offset (exclusive) of the current token.
    #[must_use]
    pub fn index_head(&self) -> usize {
        self.head
    }

    /// Selection-set depth. `Set` reports the depth it opens and `SetEnd`
    /// the depth it returns to.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The whole input being scanned.
    #[must_use]
    pub fn input(&self) -> &'src [u8] {
        self.input
    }
}

impl From<&Cursor<'_>> for TokenRef {
    fn from(cursor: &Cursor<'_>) -> Self {
        TokenRef {
            kind: cursor.token,
            tail: cursor.tail,
            head: cursor.head,
            level: cursor.level,
        }
    }
}

/// Open composite value tracked while scanning argument and default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    Obj,
    Arr,
}
