mod property_documents;

use alloc::{string::String, vec::Vec};

use crate::{Error, Scanner, Token, TokenRef};

/// Number of quickcheck cases per property.
pub(crate) fn test_count() -> u64 {
    if cfg!(any(miri, feature = "test-fast")) {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}

/// Every token of a successful scan, as records.
pub(crate) fn records(input: &[u8]) -> Result<Vec<TokenRef>, Error> {
    let mut out = Vec::new();
    Scanner::default().scan_all(input, |c| out.push(TokenRef::from(c)))?;
    Ok(out)
}

/// Where the token after `all[k]` begins: its tail, or the end of input
/// when `all[k]` is the last token.
pub(crate) fn start_after(input: &[u8], all: &[TokenRef], k: usize) -> usize {
    all.get(k + 1).map_or(input.len(), |t| t.tail)
}

/// Kind and raw text of every token; panics on a scan error.
pub(crate) fn pairs(input: &str) -> Vec<(Token, String)> {
    let mut out = Vec::new();
    Scanner::default()
        .scan_all(input.as_bytes(), |c| {
            out.push((c.token(), String::from_utf8_lossy(c.value()).into_owned()));
        })
        .unwrap_or_else(|err| panic!("{input:?}: {err}"));
    out
}

/// The error a scan of `input` ends with; panics if it succeeds.
pub(crate) fn scan_error(input: &str) -> Error {
    Scanner::default()
        .scan_all(input.as_bytes(), |_| {})
        .expect_err(input)
}

/// Interpreted content of a token, decoded through a buffer of `chunk`
/// bytes.
pub(crate) fn interpreted(input: &[u8], record: &TokenRef, chunk: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buffer = alloc::vec![0; chunk];
    record.scan_interpreted(input, &mut buffer, |c| {
        out.extend_from_slice(c);
        false
    });
    out
}
