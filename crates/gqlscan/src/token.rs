use core::fmt;

/// The closed set of lexeme kinds produced by a scan.
///
/// Every grammar production yields exactly one token. Name-like tokens carry
/// a span over the name (sigils such as `$`, `@` and `...` are excluded),
/// literal tokens carry a span over their raw source text, and structural
/// tokens carry an empty span positioned at their punctuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    /// `query` keyword, or a zero-width marker for the `{ ... }` shorthand.
    DefQuery,
    /// `mutation` keyword.
    DefMutation,
    /// `subscription` keyword.
    DefSubscription,
    /// `fragment` keyword.
    DefFragment,
    /// Name following an operation keyword.
    OperationName,
    /// Name following `@`.
    DirectiveName,
    /// `(` opening a variable list.
    VarList,
    /// `)` closing a variable list.
    VarListEnd,
    /// `(` opening an argument list.
    ArgList,
    /// `)` closing an argument list.
    ArgListEnd,
    /// `{` opening a selection set.
    Set,
    /// `}` closing a selection set.
    SetEnd,
    /// Type condition of a fragment definition.
    FragTypeCond,
    /// Name of a fragment definition.
    FragName,
    /// Inline fragment; spans the type condition when one is present.
    FragInline,
    /// Name of a fragment spread.
    NamedSpread,
    /// Field alias (the name before `:`).
    FieldAlias,
    /// Field name.
    Field,
    /// Argument name.
    ArgName,
    /// Enum-like bare name in value position.
    EnumVal,
    /// `[` opening a list value.
    Arr,
    /// `]` closing a list value.
    ArrEnd,
    /// Single-line string; spans the raw body between the quotes.
    Str,
    /// Block string; spans the raw body between the triple quotes.
    StrBlock,
    /// Integer literal.
    Int,
    /// Float literal (fraction or exponent present).
    Float,
    /// `true`.
    True,
    /// `false`.
    False,
    /// `null`.
    Null,
    /// Name of a declared variable.
    VarName,
    /// Named variable type.
    VarTypeName,
    /// `[` opening a list type.
    VarTypeArr,
    /// `]` closing a list type.
    VarTypeArrEnd,
    /// `!` marking a non-null type.
    VarTypeNotNull,
    /// Variable referenced in value position.
    VarRef,
    /// `{` opening an object value.
    Obj,
    /// `}` closing an object value.
    ObjEnd,
    /// Object field name.
    ObjField,
}

impl Token {
    /// Short, stable name used in diagnostics and snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Token::DefQuery => "query definition",
            Token::DefMutation => "mutation definition",
            Token::DefSubscription => "subscription definition",
            Token::DefFragment => "fragment definition",
            Token::OperationName => "operation name",
            Token::DirectiveName => "directive name",
            Token::VarList => "variable list",
            Token::VarListEnd => "variable list end",
            Token::ArgList => "argument list",
            Token::ArgListEnd => "argument list end",
            Token::Set => "selection set",
            Token::SetEnd => "selection set end",
            Token::FragTypeCond => "fragment type condition",
            Token::FragName => "fragment name",
            Token::FragInline => "fragment inline",
            Token::NamedSpread => "named spread",
            Token::FieldAlias => "field alias",
            Token::Field => "field",
            Token::ArgName => "argument name",
            Token::EnumVal => "enum value",
            Token::Arr => "array",
            Token::ArrEnd => "array end",
            Token::Str => "string",
            Token::StrBlock => "block string",
            Token::Int => "integer",
            Token::Float => "float",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::VarName => "variable name",
            Token::VarTypeName => "variable type",
            Token::VarTypeArr => "variable type array",
            Token::VarTypeArrEnd => "variable type array end",
            Token::VarTypeNotNull => "variable type not null",
            Token::VarRef => "variable reference",
            Token::Obj => "object",
            Token::ObjEnd => "object end",
            Token::ObjField => "object field",
        }
    }

    /// Whether this token is a literal the interpreted-content decoder
    /// transforms (as opposed to copying the raw span).
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self, Token::Str | Token::StrBlock)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token record written by [`scan_to_buffer`](crate::scan_to_buffer).
///
/// `head` is exclusive: the token's raw text is `input[tail..head]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenRef {
    /// Kind of the token.
    pub kind: Token,
    /// Start offset of the span.
    pub tail: usize,
    /// End offset of the span.
    pub head: usize,
    /// Selection-set nesting depth at the time the token was produced.
    pub level: usize,
}

impl TokenRef {
    /// Returns the raw bytes of this token inside `input`.
    ///
    /// `input` must be the buffer the token was scanned from.
    #[must_use]
    pub fn value<'src>(&self, input: &'src [u8]) -> &'src [u8] {
        &input[self.tail..self.head]
    }
}

/// Placeholder record for pre-filling output buffers; never produced by a
/// scan.
impl Default for TokenRef {
    fn default() -> Self {
        Self {
            kind: Token::DefQuery,
            tail: 0,
            head: 0,
            level: 0,
        }
    }
}
