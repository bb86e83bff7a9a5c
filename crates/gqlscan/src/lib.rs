//! A zero-copy, callback-driven scanner for GraphQL query documents.
//!
//! The scanner validates the structure of a document (operations, fragment
//! definitions, selection sets, arguments, variables, directives and values)
//! in a single forward pass and reports every lexeme to a hook through a
//! [`Cursor`]. No syntax tree is built and token text is never copied: spans
//! point into the input. The first violation ends the scan with an
//! [`Error`] carrying its byte offset.
//!
//! Three delivery strategies share one state machine:
//!
//! - [`scan`]: hook returns `true` to stop early.
//! - [`scan_all`]: hook sees every token.
//! - [`scan_to_buffer`]: records go into a caller-provided slice.
//!
//! ```rust
//! use gqlscan::Token;
//!
//! let query = br#"query Q($id: ID!) { user(id: $id) { name } }"#;
//! let mut seen = Vec::new();
//! gqlscan::scan_all(query, |c| seen.push((c.token(), c.value()))).unwrap();
//! assert_eq!(seen[0], (Token::DefQuery, &b"query"[..]));
//! assert_eq!(seen[1], (Token::OperationName, &b"Q"[..]));
//! assert!(seen.contains(&(Token::VarRef, &b"id"[..])));
//! ```
//!
//! The free functions borrow a [`Scanner`] from a per-thread pool and need
//! the `std` feature (on by default). Without it, create a [`Scanner`] and
//! reuse it.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod classify;
mod cursor;
mod error;
mod escape;
mod interpreted;
mod options;
#[cfg(feature = "std")]
mod pool;
mod scanner;
mod sink;
mod token;

#[cfg(test)]
mod tests;

pub use cursor::Cursor;
pub use error::{BufferError, Error, ErrorCode, Expect};
pub use options::ScannerOptions;
#[cfg(feature = "std")]
pub use pool::{scan, scan_all, scan_to_buffer};
pub use scanner::Scanner;
pub use sink::TokenSink;
pub use token::{Token, TokenRef};
