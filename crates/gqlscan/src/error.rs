use core::fmt;

use thiserror::Error;

/// Closed set of error kinds a scan can end with.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    /// The early-exit hook asked the scan to stop.
    #[error("callback function returned error")]
    CallbackFn,
    /// A byte that does not fit the grammar at this position.
    #[error("unexpected token")]
    UnexpectedToken,
    /// The input ended inside a construct.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// A malformed number literal.
    #[error("invalid number value")]
    InvalidNumber,
    /// A literal or enum name not followed by a value terminator.
    #[error("invalid value")]
    InvalidValue,
    /// A malformed variable type.
    #[error("invalid type")]
    InvalidType,
    /// The bounded output buffer is full (buffer writer only).
    #[error("token buffer capacity exceeded")]
    CapacityExceeded,
}

/// The grammar construct the scanner anticipated when it failed.
///
/// Only used to phrase diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Expect {
    Definition,
    AfterDefKeyword,
    AfterOperationName,
    SelectionSet,
    Selection,
    AfterSelection,
    AfterFieldName,
    AfterFieldArgs,
    AfterAlias,
    Spread,
    Fragment,
    FragmentName,
    KeywordOn,
    FragmentTypeCondition,
    InlineFragment,
    DirectiveName,
    ArgumentName,
    ColonAfterArgumentName,
    AfterArgumentValue,
    Value,
    DefaultVariableValue,
    VariableReference,
    ColonAfterObjectFieldName,
    AfterObjectValue,
    AfterArrayValue,
    EndOfString,
    EndOfBlockString,
    EscapedSequence,
    EscapedUnicodeSequence,
    VariableName,
    ColonAfterVariableName,
    VariableType,
    AfterVariableType,
    AfterVariableDefinition,
}

impl Expect {
    /// Human-readable label of the construct.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Expect::Definition => "definition",
            Expect::AfterDefKeyword => "operation name, variable list or selection set",
            Expect::AfterOperationName => "variable list or selection set",
            Expect::SelectionSet => "selection set",
            Expect::Selection => "selection",
            Expect::AfterSelection => "selection or end of selection set",
            Expect::AfterFieldName => {
                "alias, argument list, selection set or end of selection set"
            }
            Expect::AfterFieldArgs => "selection, selection set or end of selection set",
            Expect::AfterAlias => "field name",
            Expect::Spread => "spread",
            Expect::Fragment => "fragment name or inline fragment",
            Expect::FragmentName => "fragment name",
            Expect::KeywordOn => "keyword on",
            Expect::FragmentTypeCondition => "fragment type condition",
            Expect::InlineFragment => "inline fragment type condition",
            Expect::DirectiveName => "directive name",
            Expect::ArgumentName => "argument name",
            Expect::ColonAfterArgumentName => "colon after argument name",
            Expect::AfterArgumentValue => "argument name or end of argument list",
            Expect::Value => "value",
            Expect::DefaultVariableValue => "default variable value",
            Expect::VariableReference => "referenced variable name",
            Expect::ColonAfterObjectFieldName => "colon after object field name",
            Expect::AfterObjectValue => "object field name or end of object",
            Expect::AfterArrayValue => "value or end of array",
            Expect::EndOfString => "end of string",
            Expect::EndOfBlockString => "end of block string",
            Expect::EscapedSequence => "escaped sequence",
            Expect::EscapedUnicodeSequence => "escaped unicode sequence",
            Expect::VariableName => "variable name",
            Expect::ColonAfterVariableName => "colon after variable name",
            Expect::VariableType => "variable type",
            Expect::AfterVariableType => "variable name, default value or end of variable list",
            Expect::AfterVariableDefinition => "variable name or end of variable list",
        }
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first violation found by a scan.
///
/// `index` is a byte offset into the scanned input; `at` is the character
/// decoded at that offset, absent at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Error {
    /// Byte offset of the offending input.
    pub index: usize,
    /// Character at `index`; invalid UTF-8 decodes to U+FFFD.
    pub at: Option<char>,
    /// What went wrong.
    pub code: ErrorCode,
    /// What the scanner was looking for.
    pub expected: Option<Expect>,
}

impl Error {
    pub(crate) fn new(
        input: &[u8],
        index: usize,
        code: ErrorCode,
        expected: Option<Expect>,
    ) -> Self {
        let at = input.get(index..).and_then(|rest| {
            if rest.is_empty() {
                return None;
            }
            let (ch, _) = bstr::decode_utf8(rest);
            Some(ch.unwrap_or('\u{FFFD}'))
        });
        Self {
            index,
            at,
            code,
            expected,
        }
    }

    /// Whether the error was requested by the caller's hook.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.code == ErrorCode::CallbackFn
    }

    /// Whether the error reports a full output buffer.
    #[must_use]
    pub fn is_capacity_exceeded(&self) -> bool {
        self.code == ErrorCode::CapacityExceeded
    }
}

/// Same notion of "printable" as a terminal would need: no control or
/// formatting characters, no whitespace other than the ASCII space.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !(ch.is_control()
        || ch.is_whitespace()
        || matches!(ch, '\u{200B}'..='\u{200F}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'))
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at index {}", self.index)?;
        if self.code != ErrorCode::UnexpectedEof {
            match self.at {
                Some(ch) if is_printable(ch) => write!(f, " ({ch})")?,
                Some(ch) => write!(f, " (0x{:x})", ch as u32)?,
                None => {}
            }
        }
        write!(f, ": {}", self.code)?;
        if let Some(expected) = self.expected {
            write!(f, "; expected {expected}")?;
        }
        Ok(())
    }
}

impl core::error::Error for Error {}

/// Error returned by the buffer writer, together with the number of tokens
/// written before the scan stopped. Those tokens remain valid.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{error}")]
pub struct BufferError {
    /// Number of leading entries of the output buffer that hold tokens.
    pub written: usize,
    /// Why the scan stopped.
    pub error: Error,
}
