use alloc::vec::Vec;

use quickcheck::QuickCheck;
use regex::bytes::Regex;

use super::{arbitrary::Document, records, start_after, test_count};
use crate::{ErrorCode, Scanner, Token, TokenRef};

fn is_name_token(kind: Token) -> bool {
    matches!(
        kind,
        Token::OperationName
            | Token::DirectiveName
            | Token::FragTypeCond
            | Token::FragName
            | Token::NamedSpread
            | Token::FieldAlias
            | Token::Field
            | Token::ArgName
            | Token::EnumVal
            | Token::VarName
            | Token::VarTypeName
            | Token::VarRef
            | Token::ObjField
    )
}

/// Property: every generated document scans without error, tokens come in
/// source order, and selection-set levels stay balanced.
#[test]
fn valid_documents_scan_cleanly() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document) -> bool {
        let input = doc.0.as_bytes();
        let names = Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").unwrap();
        let toks = match records(input) {
            Ok(toks) => toks,
            Err(err) => panic!("{:?}: {err}", doc.0),
        };

        let mut level = 0usize;
        let mut last_tail = 0;
        for t in &toks {
            assert!(t.tail <= t.head && t.head <= input.len(), "{t:?}");
            assert!(t.tail >= last_tail, "{t:?} out of order in {:?}", doc.0);
            last_tail = t.tail;
            match t.kind {
                Token::Set => {
                    assert_eq!(t.level, level + 1);
                    level += 1;
                }
                Token::SetEnd => {
                    assert_eq!(t.level + 1, level);
                    level -= 1;
                }
                _ => assert_eq!(t.level, level, "{t:?}"),
            }
            if is_name_token(t.kind) {
                assert!(names.is_match(t.value(input)), "{t:?} in {:?}", doc.0);
            }
        }
        level == 0 && toks.last().is_some_and(|t| t.kind == Token::SetEnd)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document) -> bool);
}

/// Property: the three delivery strategies see the same tokens and end with
/// the same outcome, for valid documents and for arbitrary bytes.
#[test]
fn strategies_agree() {
    fn check(input: &[u8]) -> bool {
        let mut scanner = Scanner::default();

        let mut full = Vec::new();
        let full_result = scanner.scan_all(input, |c| full.push(TokenRef::from(c)));

        let mut early = Vec::new();
        let early_result = scanner.scan(input, |c| {
            early.push(TokenRef::from(c));
            false
        });

        let mut out = alloc::vec![TokenRef::default(); full.len()];
        let buffered = scanner.scan_to_buffer(input, &mut out);
        let buffered_result = match buffered {
            Ok(written) => {
                assert_eq!(written, full.len());
                Ok(())
            }
            Err(err) => {
                assert_eq!(err.written, full.len());
                Err(err.error)
            }
        };

        if let Err(err) = full_result {
            assert!(err.index <= input.len());
            assert_ne!(err.code, ErrorCode::CallbackFn);
            assert_ne!(err.code, ErrorCode::CapacityExceeded);
        }
        full == early && full[..] == out[..] && full_result == early_result && full_result == buffered_result
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop_documents(doc: Document) -> bool {
        check(doc.0.as_bytes())
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop_bytes(bytes: Vec<u8>) -> bool {
        check(&bytes)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop_documents as fn(Document) -> bool);
    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop_bytes as fn(Vec<u8>) -> bool);
}

/// Property: stopping after token `k` delivers exactly `k + 1` tokens and
/// reports the offset where token `k + 1` begins.
#[test]
fn early_exit_stops_immediately() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document, k: usize) -> bool {
        let input = doc.0.as_bytes();
        let all = records(input).unwrap();
        let k = k % all.len();

        let mut seen = Vec::new();
        let err = Scanner::default()
            .scan(input, |c| {
                seen.push(TokenRef::from(c));
                seen.len() == k + 1
            })
            .unwrap_err();

        seen[..] == all[..=k]
            && err.code == ErrorCode::CallbackFn
            && err.index == start_after(input, &all, k)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document, usize) -> bool);
}

/// Property: scanning the same input twice with the same strategy yields
/// identical tokens and an identical outcome, also through a reused scanner.
#[test]
fn scans_are_deterministic() {
    fn check(input: &[u8]) -> bool {
        let traverse = || {
            let mut toks = Vec::new();
            let result = Scanner::default().scan_all(input, |c| toks.push(TokenRef::from(c)));
            (toks, result)
        };
        let first = traverse();
        let second = traverse();

        let mut scanner = Scanner::default();
        let mut out_a = alloc::vec![TokenRef::default(); 2 * input.len() + 2];
        let mut out_b = out_a.clone();
        let a = scanner.scan_to_buffer(input, &mut out_a);
        let b = scanner.scan_to_buffer(input, &mut out_b);

        first == second && a == b && out_a == out_b
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop_documents(doc: Document) -> bool {
        check(doc.0.as_bytes())
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop_bytes(bytes: Vec<u8>) -> bool {
        check(&bytes)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop_documents as fn(Document) -> bool);
    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop_bytes as fn(Vec<u8>) -> bool);
}

/// Property: truncating a document inside its last selection set always
/// yields an error positioned inside the truncated input.
#[test]
fn truncated_documents_fail_in_bounds() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document) -> bool {
        let input = doc.0.trim_end().as_bytes();
        let cut = &input[..input.len() - 1];
        match Scanner::default().scan_all(cut, |_| {}) {
            Ok(()) => false,
            Err(err) => err.index <= cut.len(),
        }
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document) -> bool);
}
