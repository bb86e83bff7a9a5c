//! Byte classifiers and fixed keyword matchers.
//!
//! Everything here is a pure function of the input; the state machine calls
//! these at every position, so they stay small enough to inline.

use crate::Token;

#[inline(always)]
pub(crate) const fn is_name_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

#[inline(always)]
pub(crate) const fn is_name_body(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Insignificant characters between tokens (comments are handled by
/// [`skip_ignored`]).
#[inline(always)]
pub(crate) const fn is_ignored(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b',')
}

/// Raw bytes that may not appear inside a single-line string.
#[inline(always)]
pub(crate) const fn is_string_control(b: u8) -> bool {
    b < 0x20 && b != b'\t'
}

/// Raw bytes that may not appear inside a block string.
#[inline(always)]
pub(crate) const fn is_block_string_control(b: u8) -> bool {
    b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r')
}

/// Whether a scalar value may end right before `next`. `None` is end of
/// input.
///
/// Only numbers and names go through this check. A string ends at its
/// closing quote, so `"x"@d` passes the scanner while `1@d` and `null@d` do
/// not.
#[inline(always)]
pub(crate) const fn is_value_terminator(next: Option<u8>) -> bool {
    match next {
        None => true,
        Some(b) => is_ignored(b) || matches!(b, b')' | b'}' | b']' | b'{' | b'[' | b'#'),
    }
}

/// Advances `i` past whitespace, commas, and `#` line comments.
#[inline]
pub(crate) fn skip_ignored(input: &[u8], mut i: usize) -> usize {
    while let Some(&b) = input.get(i) {
        if is_ignored(b) {
            i += 1;
        } else if b == b'#' {
            i += 1;
            while let Some(&c) = input.get(i) {
                if c == b'\n' || c == b'\r' {
                    break;
                }
                i += 1;
            }
        } else {
            break;
        }
    }
    i
}

/// Offset at which the token after `previous` begins, given that `previous`
/// was consumed up to `i`.
///
/// Skips ignored input and the punctuation no token spans: `:`, `=`, the
/// `$` and `@` sigils, opening quotes, `...` and the `on` of a type
/// condition. Inline fragments without a type condition begin at the `{` or
/// `@` that follows the spread.
pub(crate) fn next_token_start(input: &[u8], previous: Token, i: usize) -> usize {
    let mut i = skip_ignored(input, i);
    if previous == Token::FragName && Keyword::On.matches_at(input, i) {
        i = skip_ignored(input, i + Keyword::On.bytes().len());
    }
    loop {
        match input.get(i) {
            Some(b':' | b'=') => i = skip_ignored(input, i + 1),
            Some(b'$' | b'@') => return i + 1,
            Some(b'"') if input[i..].starts_with(b"\"\"\"") => return i + 3,
            Some(b'"') => return i + 1,
            Some(b'.') if input[i..].starts_with(b"...") => {
                let j = skip_ignored(input, i + 3);
                return if Keyword::On.matches_at(input, j) {
                    skip_ignored(input, j + Keyword::On.bytes().len())
                } else {
                    j
                };
            }
            _ => return i,
        }
    }
}

/// Returns the end of the name starting at `i`. The caller has checked that
/// `input[i]` is a name start.
#[inline]
pub(crate) fn name_end(input: &[u8], mut i: usize) -> usize {
    i += 1;
    while input.get(i).is_some_and(|&b| is_name_body(b)) {
        i += 1;
    }
    i
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Query,
    Mutation,
    Subscription,
    Fragment,
    On,
    True,
    False,
    Null,
}

impl Keyword {
    pub(crate) const fn bytes(self) -> &'static [u8] {
        match self {
            Keyword::Query => b"query",
            Keyword::Mutation => b"mutation",
            Keyword::Subscription => b"subscription",
            Keyword::Fragment => b"fragment",
            Keyword::On => b"on",
            Keyword::True => b"true",
            Keyword::False => b"false",
            Keyword::Null => b"null",
        }
    }

    /// Fixed-offset comparison: the keyword must appear at `i` and must not
    /// be followed by a name character (`queryX` is a name, not `query`).
    #[inline]
    pub(crate) fn matches_at(self, input: &[u8], i: usize) -> bool {
        let kw = self.bytes();
        let end = i + kw.len();
        input.get(i..end) == Some(kw) && !input.get(end).is_some_and(|&b| is_name_body(b))
    }

    /// Definition keyword starting at `i`, chosen by its first byte.
    #[inline]
    pub(crate) fn definition_at(input: &[u8], i: usize) -> Option<Keyword> {
        let candidate = match input.get(i)? {
            b'q' => Keyword::Query,
            b'm' => Keyword::Mutation,
            b's' => Keyword::Subscription,
            b'f' => Keyword::Fragment,
            _ => return None,
        };
        candidate.matches_at(input, i).then_some(candidate)
    }

    pub(crate) const fn definition_token(self) -> Token {
        match self {
            Keyword::Mutation => Token::DefMutation,
            Keyword::Subscription => Token::DefSubscription,
            Keyword::Fragment => Token::DefFragment,
            _ => Token::DefQuery,
        }
    }

    /// Token for a complete name in value position: a keyword literal or an
    /// enum value.
    #[inline]
    pub(crate) fn value_token(name: &[u8]) -> Token {
        if name == Keyword::True.bytes() {
            Token::True
        } else if name == Keyword::False.bytes() {
            Token::False
        } else if name == Keyword::Null.bytes() {
            Token::Null
        } else {
            Token::EnumVal
        }
    }
}
