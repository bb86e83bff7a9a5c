//! Per-thread pool of scanners backing the free scan functions.
//!
//! A scanner is taken from the pool for the duration of one scan and put
//! back afterwards, so a hook may start another scan on the same thread
//! without sharing state. The pool only grows; if a hook panics, the scanner
//! it was using is dropped instead of returned.

use core::cell::RefCell;
use std::vec::Vec;

use crate::{BufferError, Cursor, Error, Scanner, TokenRef};

std::thread_local! {
    static POOL: RefCell<Vec<Scanner>> = const { RefCell::new(Vec::new()) };
}

fn with_scanner<R>(f: impl FnOnce(&mut Scanner) -> R) -> R {
    let mut scanner = POOL
        .with(|pool| pool.borrow_mut().pop())
        .unwrap_or_else(|| {
            tracing::trace!("scanner pool empty, allocating");
            Scanner::default()
        });
    let result = f(&mut scanner);
    POOL.with(|pool| pool.borrow_mut().push(scanner));
    result
}

/// Scans `input` with a pooled [`Scanner`]; see [`Scanner::scan`].
///
/// ```
/// let err = gqlscan::scan(b"{ a b c }", |c| c.value() == b"b").unwrap_err();
/// assert!(err.is_aborted());
/// assert_eq!(err.index, 6);
/// ```
///
/// # Errors
///
/// The first syntax violation, or the abort requested by `on_token`.
pub fn scan<'src, F>(input: &'src [u8], on_token: F) -> Result<(), Error>
where
    F: FnMut(&Cursor<'src>) -> bool,
{
    with_scanner(|scanner| scanner.scan(input, on_token))
}

/// Scans `input` with a pooled [`Scanner`]; see [`Scanner::scan_all`].
///
/// # Errors
///
/// The first syntax violation.
pub fn scan_all<'src, F>(input: &'src [u8], on_token: F) -> Result<(), Error>
where
    F: FnMut(&Cursor<'src>),
{
    with_scanner(|scanner| scanner.scan_all(input, on_token))
}

/// Scans `input` into `out` with a pooled [`Scanner`]; see
/// [`Scanner::scan_to_buffer`].
///
/// # Errors
///
/// The first syntax violation or a full buffer, together with the number of
/// records written.
pub fn scan_to_buffer(input: &[u8], out: &mut [TokenRef]) -> Result<usize, BufferError> {
    with_scanner(|scanner| scanner.scan_to_buffer(input, out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;

    fn pooled() -> usize {
        POOL.with(|pool| pool.borrow().len())
    }

    #[test]
    fn scanners_are_returned_to_the_pool() {
        scan_all(b"{ a }", |_| {}).unwrap();
        let before = pooled();
        assert!(before >= 1);
        scan_all(b"{ a }", |_| {}).unwrap();
        assert_eq!(pooled(), before);
    }

    #[test]
    fn nested_scans_use_separate_scanners() {
        let outer = b"{ a(x: [1, {y: [2]}]) }";
        let mut inner_tokens = 0;
        scan_all(outer, |c| {
            if c.token() == Token::Field {
                scan_all(b"{ b(z: [[3]]) }", |_| inner_tokens += 1).unwrap();
            }
        })
        .unwrap();
        assert_eq!(inner_tokens, 12);
        assert!(pooled() >= 2);
    }
}
