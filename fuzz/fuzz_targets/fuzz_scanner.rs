#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use gqlscan::{ErrorCode, Scanner, ScannerOptions, TokenRef};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 2; // 1 flag byte + 1 decode buffer size

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static IGNORED: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r\n", b",", b"# c\n"];

static FRAGMENTS: &[&[u8]] = &[
    b"query", b"mutation", b"subscription", b"fragment", b"on", b"...", b"{", b"}", b"(", b")",
    b"[", b"]", b":", b"=", b"!", b"$", b"@", b"true", b"null", b"\"\"\"", b"\\u00e9", b"-0.5e3",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Occasionally rebuilds the input from GraphQL-shaped pieces so the fuzzer
/// spends time past the first syntax error.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if max_size < HEADER {
        return fuzzer_mutate(data, size, max_size);
    }
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1] = with_rng(|rng| rng.next_u32() as u8);

        let mut prefix = HEADER;
        let target = size.clamp(HEADER + 1, max_size);
        while prefix < target {
            let piece = with_rng(|rng| {
                if rng.random_bool(0.3) {
                    IGNORED[rng.random_range(0..IGNORED.len())].to_vec()
                } else if rng.random_bool(0.2) {
                    piece_from_bytes(rng)
                } else {
                    FRAGMENTS[rng.random_range(0..FRAGMENTS.len())].to_vec()
                }
            });
            let len = piece.len().min(max_size - prefix);
            data[prefix..prefix + len].copy_from_slice(&piece[..len]);
            prefix += len;
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// A name or a string literal built from random bytes.
fn piece_from_bytes(rng: &mut SmallRng) -> Vec<u8> {
    let bytes: Vec<u8> = (0..rng.random_range(1..32)).map(|_| rng.random::<u8>()).collect();
    match Piece::arbitrary(&mut Unstructured::new(&bytes)) {
        Ok(Piece::Name(n)) => format!("n{n}").into_bytes(),
        Ok(Piece::Int(i)) => i.to_string().into_bytes(),
        Ok(Piece::Text(s)) => serde_json::to_vec(&s).unwrap_or_default(),
        Err(_) => b"x".to_vec(),
    }
}

#[derive(Debug, Arbitrary)]
enum Piece {
    Name(u16),
    Int(i64),
    Text(String),
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn scanner(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let buffer_len = usize::from(data[1] % 16);
    let input = &data[HEADER..];

    let mut scanner = Scanner::new(ScannerOptions {
        stack_capacity: usize::from(flags & 0x7),
        panic_on_error: false,
    });

    let mut full = Vec::new();
    let full_result = scanner.scan_all(input, |c| full.push(TokenRef::from(c)));
    if let Err(err) = &full_result {
        assert!(err.index <= input.len(), "{err}");
        assert!(!err.is_aborted() && !err.is_capacity_exceeded(), "{err}");
    }

    // Stop after a token chosen by the flags.
    if !full.is_empty() {
        let stop = usize::from(flags >> 3) % full.len();
        let mut seen = 0;
        let err = scanner
            .scan(input, |_| {
                seen += 1;
                seen == stop + 1
            })
            .expect_err("callback asked to stop");
        assert_eq!(seen, stop + 1);
        assert_eq!(err.code, ErrorCode::CallbackFn);
        assert!(err.index >= full[stop].head && err.index <= input.len());
        if let Some(next) = full.get(stop + 1) {
            assert_eq!(err.index, next.tail);
        }
    }

    let mut out = vec![TokenRef::default(); full.len()];
    match scanner.scan_to_buffer(input, &mut out) {
        Ok(written) => {
            assert!(full_result.is_ok());
            assert_eq!(written, full.len());
        }
        Err(err) => {
            assert_eq!(err.written, full.len());
            assert_eq!(Err(err.error), full_result);
        }
    }
    assert_eq!(out, full);

    let mut buffer = vec![0u8; buffer_len];
    for record in &full {
        let mut total = 0;
        record.scan_interpreted(input, &mut buffer, |chunk| {
            assert!(!chunk.is_empty() && chunk.len() <= buffer_len);
            total += chunk.len();
            false
        });
        assert!(total <= record.head - record.tail);
    }
}

fuzz_target!(|data: &[u8]| scanner(data));
