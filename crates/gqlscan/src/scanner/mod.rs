//! The structural state machine.
//!
//! Every resumption point of the grammar is one [`State`]; [`Machine::run`]
//! dispatches on it until the document ends or a violation is found. A state
//! handler skips ignored input, inspects one significant byte, emits the
//! tokens it completes and returns the next state. Nested values are tracked
//! on a container stack; selection sets and list types only need counters.

mod value;


use alloc::vec::Vec;
use core::ops::ControlFlow;

use crate::{
    BufferError, Cursor, Error, ErrorCode, Expect, ScannerOptions, Token, TokenRef,
    classify::{Keyword, is_name_start, name_end, next_token_start, skip_ignored},
    cursor::Container,
    sink::{BufferWriter, EarlyExit, TokenSink, Traverse},
};

/// Where the scan continues once a directive (and its arguments) ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveTarget {
    Operation,
    FragmentDef,
    FragmentInline,
    FragmentRef,
    Field,
    Variable,
}

impl DirectiveTarget {
    fn resume(self) -> State {
        match self {
            DirectiveTarget::Operation
            | DirectiveTarget::FragmentDef
            | DirectiveTarget::FragmentInline => State::BeforeSelectionSet(self),
            DirectiveTarget::FragmentRef => State::AfterSpreadName,
            DirectiveTarget::Field => State::AfterFieldArgs,
            DirectiveTarget::Variable => State::AfterVarDefinition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgsOwner {
    Field,
    Directive,
}

/// What a top-level value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueContext {
    Argument,
    VarDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Definition,
    AfterDefKeyword,
    AfterOperationName,
    BeforeSelectionSet(DirectiveTarget),
    FragmentName,
    FragmentKeywordOn,
    FragmentTypeCond,
    Selection,
    AfterSelection,
    AfterFieldName,
    AfterAlias,
    AfterFieldArgs,
    AfterSpread,
    AfterSpreadName,
    AfterDirectiveName,
    ArgName,
    ArgColon,
    NextArg,
    VarName,
    VarColon,
    VarType,
    AfterVarType { not_null: bool },
    AfterVarDefinition,
    NextVar,
    Value(Expect),
    AfterValue,
    ObjectField,
    ObjectColon,
    Done,
}

pub(crate) struct Machine<'src, 'a, S> {
    input: &'src [u8],
    cursor: Cursor<'src>,
    /// First byte not yet consumed.
    pos: usize,
    stack: &'a mut Vec<Container>,
    sink: &'a mut S,
    seen_definition: bool,
    type_level: usize,
    directive_target: DirectiveTarget,
    args_owner: ArgsOwner,
    value_context: ValueContext,
}

impl<'src, 'a, S: TokenSink<'src>> Machine<'src, 'a, S> {
    pub(crate) fn new(input: &'src [u8], stack: &'a mut Vec<Container>, sink: &'a mut S) -> Self {
        stack.clear();
        Self {
            input,
            cursor: Cursor::new(input),
            pos: 0,
            stack,
            sink,
            seen_definition: false,
            type_level: 0,
            directive_target: DirectiveTarget::Operation,
            args_owner: ArgsOwner::Field,
            value_context: ValueContext::Argument,
        }
    }

    pub(crate) fn run(mut self) -> Result<(), Error> {
        let mut state = State::Definition;
        loop {
            state = match state {
                State::Definition => self.definition()?,
                State::AfterDefKeyword => self.operation_head(false)?,
                State::AfterOperationName => self.operation_head(true)?,
                State::BeforeSelectionSet(target) => self.before_selection_set(target)?,
                State::FragmentName => self.fragment_name()?,
                State::FragmentKeywordOn => self.fragment_keyword_on()?,
                State::FragmentTypeCond => self.fragment_type_cond()?,
                State::Selection => self.selection(true)?,
                State::AfterSelection => self.selection(false)?,
                State::AfterFieldName => self.after_field(true)?,
                State::AfterAlias => self.after_alias()?,
                State::AfterFieldArgs => self.after_field(false)?,
                State::AfterSpread => self.after_spread()?,
                State::AfterSpreadName => self.after_spread_name()?,
                State::AfterDirectiveName => self.after_directive_name()?,
                State::ArgName => self.arg_name(true)?,
                State::ArgColon => self.colon(Expect::ColonAfterArgumentName, State::Value(Expect::Value))?,
                State::NextArg => self.arg_name(false)?,
                State::VarName => self.var_name(true)?,
                State::VarColon => self.colon(Expect::ColonAfterVariableName, State::VarType)?,
                State::VarType => self.var_type()?,
                State::AfterVarType { not_null } => self.after_var_type(not_null)?,
                State::AfterVarDefinition => self.after_var_definition(Expect::AfterVariableDefinition)?,
                State::NextVar => self.var_name(false)?,
                State::Value(expect) => self.value(expect)?,
                State::AfterValue => self.after_value()?,
                State::ObjectField => self.object_field()?,
                State::ObjectColon => {
                    self.colon(Expect::ColonAfterObjectFieldName, State::Value(Expect::Value))?
                }
                State::Done => return Ok(()),
            };
        }
    }

    // ---------------------------------------------------------------------
    // Emission and error helpers
    // ---------------------------------------------------------------------

    /// Delivers a token spanning `tail..head` and moves the scan to `next`.
    #[inline(always)]
    fn emit(&mut self, token: Token, tail: usize, head: usize, next: usize) -> Result<(), Error> {
        self.pos = next;
        self.cursor.token = token;
        self.cursor.tail = tail;
        self.cursor.head = head;
        match self.sink.emit(&self.cursor) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(code) => {
                let at = next_token_start(self.input, token, next);
                Err(Error::new(self.input, at, code, None))
            }
        }
    }

    /// Structural token: empty span at the punctuator `i`, which is consumed.
    #[inline(always)]
    fn punct(&mut self, token: Token, i: usize) -> Result<(), Error> {
        self.emit(token, i, i, i + 1)
    }

    /// Emits the name starting at `i` and consumes it.
    #[inline(always)]
    fn name(&mut self, token: Token, i: usize) -> Result<(), Error> {
        let end = name_end(self.input, i);
        self.emit(token, i, end, end)
    }

    /// Next significant offset and the byte found there.
    #[inline(always)]
    fn peek(&self) -> (usize, Option<u8>) {
        let i = skip_ignored(self.input, self.pos);
        (i, self.input.get(i).copied())
    }

    fn fail(&self, i: usize, code: ErrorCode, expected: Option<Expect>) -> Error {
        Error::new(self.input, i, code, expected)
    }

    /// `UnexpectedEof` at end of input, `UnexpectedToken` anywhere else.
    fn unexpected(&self, i: usize, expected: Expect) -> Error {
        let code = if i >= self.input.len() {
            ErrorCode::UnexpectedEof
        } else {
            ErrorCode::UnexpectedToken
        };
        self.fail(i, code, Some(expected))
    }

    fn colon(&mut self, expected: Expect, next: State) -> Result<State, Error> {
        let (i, b) = self.peek();
        if b == Some(b':') {
            self.pos = i + 1;
            Ok(next)
        } else {
            Err(self.unexpected(i, expected))
        }
    }

    // ---------------------------------------------------------------------
    // Definitions
    // ---------------------------------------------------------------------

    fn definition(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            None if self.seen_definition => Ok(State::Done),
            Some(b'{') => {
                self.seen_definition = true;
                self.emit(Token::DefQuery, i, i, i)?;
                self.open_set(i)
            }
            _ => match Keyword::definition_at(self.input, i) {
                Some(keyword) => {
                    self.seen_definition = true;
                    let end = i + keyword.bytes().len();
                    self.emit(keyword.definition_token(), i, end, end)?;
                    Ok(if keyword == Keyword::Fragment {
                        State::FragmentName
                    } else {
                        State::AfterDefKeyword
                    })
                }
                None => Err(self.unexpected(i, Expect::Definition)),
            },
        }
    }

    fn operation_head(&mut self, named: bool) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(c) if !named && is_name_start(c) => {
                self.name(Token::OperationName, i)?;
                Ok(State::AfterOperationName)
            }
            Some(b'(') => {
                self.punct(Token::VarList, i)?;
                Ok(State::VarName)
            }
            Some(b'@') => self.directive(i, DirectiveTarget::Operation),
            Some(b'{') => self.open_set(i),
            _ if named => Err(self.unexpected(i, Expect::AfterOperationName)),
            _ => Err(self.unexpected(i, Expect::AfterDefKeyword)),
        }
    }

    fn before_selection_set(&mut self, target: DirectiveTarget) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(b'@') => self.directive(i, target),
            Some(b'{') => self.open_set(i),
            _ => Err(self.unexpected(i, Expect::SelectionSet)),
        }
    }

    fn fragment_name(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            // `on` cannot name a fragment
            Some(c) if is_name_start(c) && !Keyword::On.matches_at(self.input, i) => {
                self.name(Token::FragName, i)?;
                Ok(State::FragmentKeywordOn)
            }
            _ => Err(self.unexpected(i, Expect::FragmentName)),
        }
    }

    fn fragment_keyword_on(&mut self) -> Result<State, Error> {
        let (i, _) = self.peek();
        if Keyword::On.matches_at(self.input, i) {
            self.pos = i + Keyword::On.bytes().len();
            Ok(State::FragmentTypeCond)
        } else {
            Err(self.unexpected(i, Expect::KeywordOn))
        }
    }

    fn fragment_type_cond(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(c) if is_name_start(c) => {
                self.name(Token::FragTypeCond, i)?;
                Ok(State::BeforeSelectionSet(DirectiveTarget::FragmentDef))
            }
            _ => Err(self.unexpected(i, Expect::FragmentTypeCondition)),
        }
    }

    // ---------------------------------------------------------------------
    // Selection sets
    // ---------------------------------------------------------------------

    fn open_set(&mut self, i: usize) -> Result<State, Error> {
        self.cursor.level += 1;
        self.punct(Token::Set, i)?;
        Ok(State::Selection)
    }

    fn close_set(&mut self, i: usize) -> Result<State, Error> {
        self.cursor.level -= 1;
        self.punct(Token::SetEnd, i)?;
        Ok(if self.cursor.level == 0 {
            State::Definition
        } else {
            State::AfterSelection
        })
    }

    /// A selection, or the end of the set unless it is still empty.
    fn selection(&mut self, first: bool) -> Result<State, Error> {
        let (i, b) = self.peek();
        if first {
            match b {
                Some(c) if is_name_start(c) => self.field(i),
                Some(b'.') => self.spread(i),
                _ => Err(self.unexpected(i, Expect::Selection)),
            }
        } else {
            self.selection_or_end(i, b, Expect::AfterSelection)
        }
    }

    fn selection_or_end(&mut self, i: usize, b: Option<u8>, expected: Expect) -> Result<State, Error> {
        match b {
            Some(b'}') => self.close_set(i),
            Some(c) if is_name_start(c) => self.field(i),
            Some(b'.') => self.spread(i),
            _ => Err(self.unexpected(i, expected)),
        }
    }

    /// Field or alias at `i`, told apart by looking past the name for `:`.
    fn field(&mut self, i: usize) -> Result<State, Error> {
        let end = name_end(self.input, i);
        let colon = skip_ignored(self.input, end);
        if self.input.get(colon) == Some(&b':') {
            self.emit(Token::FieldAlias, i, end, colon + 1)?;
            Ok(State::AfterAlias)
        } else {
            self.emit(Token::Field, i, end, end)?;
            Ok(State::AfterFieldName)
        }
    }

    fn after_alias(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(c) if is_name_start(c) => {
                self.name(Token::Field, i)?;
                Ok(State::AfterFieldName)
            }
            _ => Err(self.unexpected(i, Expect::AfterAlias)),
        }
    }

    fn after_field(&mut self, args_allowed: bool) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(b'(') if args_allowed => {
                self.args_owner = ArgsOwner::Field;
                self.punct(Token::ArgList, i)?;
                Ok(State::ArgName)
            }
            Some(b'@') => self.directive(i, DirectiveTarget::Field),
            Some(b'{') => self.open_set(i),
            _ if args_allowed => self.selection_or_end(i, b, Expect::AfterFieldName),
            _ => self.selection_or_end(i, b, Expect::AfterFieldArgs),
        }
    }

    fn spread(&mut self, i: usize) -> Result<State, Error> {
        for j in i + 1..i + 3 {
            if self.input.get(j) != Some(&b'.') {
                return Err(self.unexpected(j, Expect::Spread));
            }
        }
        self.pos = i + 3;
        Ok(State::AfterSpread)
    }

    fn after_spread(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(_) if Keyword::On.matches_at(self.input, i) => {
                let t = skip_ignored(self.input, i + Keyword::On.bytes().len());
                match self.input.get(t) {
                    Some(&c) if is_name_start(c) => {
                        self.name(Token::FragInline, t)?;
                        Ok(State::BeforeSelectionSet(DirectiveTarget::FragmentInline))
                    }
                    _ => Err(self.unexpected(t, Expect::InlineFragment)),
                }
            }
            Some(c) if is_name_start(c) => {
                self.name(Token::NamedSpread, i)?;
                Ok(State::AfterSpreadName)
            }
            Some(b'{') => {
                self.emit(Token::FragInline, i, i, i)?;
                self.open_set(i)
            }
            Some(b'@') => {
                self.emit(Token::FragInline, i, i, i)?;
                self.directive(i, DirectiveTarget::FragmentInline)
            }
            _ => Err(self.unexpected(i, Expect::Fragment)),
        }
    }

    fn after_spread_name(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(b'@') => self.directive(i, DirectiveTarget::FragmentRef),
            _ => self.selection_or_end(i, b, Expect::AfterSelection),
        }
    }

    // ---------------------------------------------------------------------
    // Directives and arguments
    // ---------------------------------------------------------------------

    /// Directive whose `@` is at `i`; the name must follow immediately.
    fn directive(&mut self, i: usize, target: DirectiveTarget) -> Result<State, Error> {
        let n = i + 1;
        match self.input.get(n) {
            Some(&c) if is_name_start(c) => {
                self.directive_target = target;
                self.name(Token::DirectiveName, n)?;
                Ok(State::AfterDirectiveName)
            }
            _ => Err(self.unexpected(n, Expect::DirectiveName)),
        }
    }

    fn after_directive_name(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        if b == Some(b'(') {
            self.args_owner = ArgsOwner::Directive;
            self.punct(Token::ArgList, i)?;
            Ok(State::ArgName)
        } else {
            Ok(self.directive_target.resume())
        }
    }

    /// An argument name, or the end of the list unless it is still empty.
    fn arg_name(&mut self, first: bool) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(b')') if !first => {
                self.punct(Token::ArgListEnd, i)?;
                Ok(match self.args_owner {
                    ArgsOwner::Field => State::AfterFieldArgs,
                    ArgsOwner::Directive => self.directive_target.resume(),
                })
            }
            Some(c) if is_name_start(c) => {
                self.value_context = ValueContext::Argument;
                self.name(Token::ArgName, i)?;
                Ok(State::ArgColon)
            }
            _ if first => Err(self.unexpected(i, Expect::ArgumentName)),
            _ => Err(self.unexpected(i, Expect::AfterArgumentValue)),
        }
    }

    // ---------------------------------------------------------------------
    // Variable definitions
    // ---------------------------------------------------------------------

    /// A `$name`, or the end of the list unless it is still empty.
    fn var_name(&mut self, first: bool) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(b')') if !first => {
                self.punct(Token::VarListEnd, i)?;
                Ok(State::BeforeSelectionSet(DirectiveTarget::Operation))
            }
            Some(b'$') => {
                let n = i + 1;
                match self.input.get(n) {
                    Some(&c) if is_name_start(c) => {
                        self.name(Token::VarName, n)?;
                        Ok(State::VarColon)
                    }
                    _ => Err(self.unexpected(n, Expect::VariableName)),
                }
            }
            _ if first => Err(self.unexpected(i, Expect::VariableName)),
            _ => Err(self.unexpected(i, Expect::AfterVariableDefinition)),
        }
    }

    fn var_type(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(b'[') => {
                self.type_level += 1;
                self.punct(Token::VarTypeArr, i)?;
                Ok(State::VarType)
            }
            Some(c) if is_name_start(c) => {
                self.name(Token::VarTypeName, i)?;
                Ok(State::AfterVarType { not_null: false })
            }
            None => Err(self.fail(i, ErrorCode::UnexpectedEof, Some(Expect::VariableType))),
            Some(_) => Err(self.fail(i, ErrorCode::InvalidType, Some(Expect::VariableType))),
        }
    }

    fn after_var_type(&mut self, not_null: bool) -> Result<State, Error> {
        let (i, b) = self.peek();
        let inside_list = self.type_level > 0;
        match b {
            Some(b'!') if !not_null => {
                self.punct(Token::VarTypeNotNull, i)?;
                Ok(State::AfterVarType { not_null: true })
            }
            Some(b']') if inside_list => {
                self.type_level -= 1;
                self.punct(Token::VarTypeArrEnd, i)?;
                Ok(State::AfterVarType { not_null: false })
            }
            Some(b'!' | b']') => {
                Err(self.fail(i, ErrorCode::InvalidType, Some(Expect::AfterVariableType)))
            }
            None if inside_list => {
                Err(self.fail(i, ErrorCode::UnexpectedEof, Some(Expect::VariableType)))
            }
            Some(_) if inside_list => {
                Err(self.fail(i, ErrorCode::InvalidType, Some(Expect::VariableType)))
            }
            Some(b'=') => {
                self.value_context = ValueContext::VarDefault;
                self.pos = i + 1;
                Ok(State::Value(Expect::DefaultVariableValue))
            }
            _ => self.after_var_definition(Expect::AfterVariableType),
        }
    }

    fn after_var_definition(&mut self, expected: Expect) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(b'@') => self.directive(i, DirectiveTarget::Variable),
            Some(b'$' | b')') => Ok(State::NextVar),
            _ => Err(self.unexpected(i, expected)),
        }
    }
}

/// Reusable scanning state.
///
/// A scanner owns the container stack used for nested values, so repeated
/// scans through the same scanner do not allocate once the stack has grown
/// to the deepest nesting seen. It is not tied to any input.
///
/// ```
/// use gqlscan::{Scanner, ScannerOptions, Token};
///
/// let mut scanner = Scanner::new(ScannerOptions::default());
/// let mut fields = Vec::new();
/// scanner
///     .scan_all(b"{ a b { c } }", |c| {
///         if c.token() == Token::Field {
///             fields.push(c.value());
///         }
///     })
///     .unwrap();
/// assert_eq!(fields, [&b"a"[..], b"b", b"c"]);
/// ```
#[derive(Debug)]
pub struct Scanner {
    stack: Vec<Container>,
    options: ScannerOptions,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScannerOptions::default())
    }
}

impl Scanner {
    /// Creates a scanner with the given options.
    #[must_use]
    pub fn new(options: ScannerOptions) -> Self {
        Self {
            stack: Vec::with_capacity(options.stack_capacity),
            options,
        }
    }

    /// Scans `input`, calling `on_token` for every token. The scan stops with
    /// [`ErrorCode::CallbackFn`] as soon as `on_token` returns `true`.
    ///
    /// # Errors
    ///
    /// The first syntax violation, or the abort requested by `on_token`.
    pub fn scan<'src, F>(&mut self, input: &'src [u8], on_token: F) -> Result<(), Error>
    where
        F: FnMut(&Cursor<'src>) -> bool,
    {
        self.scan_with(input, &mut EarlyExit(on_token))
    }

    /// Scans `input`, calling `on_token` for every token without the option
    /// to stop early.
    ///
    /// # Errors
    ///
    /// The first syntax violation.
    pub fn scan_all<'src, F>(&mut self, input: &'src [u8], on_token: F) -> Result<(), Error>
    where
        F: FnMut(&Cursor<'src>),
    {
        self.scan_with(input, &mut Traverse(on_token))
    }

    /// Scans `input` into `out` and returns the number of records written.
    ///
    /// # Errors
    ///
    /// The first syntax violation, or [`ErrorCode::CapacityExceeded`] when a
    /// token does not fit. Either way [`BufferError::written`] leading
    /// records of `out` are valid.
    pub fn scan_to_buffer(
        &mut self,
        input: &[u8],
        out: &mut [TokenRef],
    ) -> Result<usize, BufferError> {
        let mut writer = BufferWriter::new(out);
        match self.scan_with(input, &mut writer) {
            Ok(()) => Ok(writer.written),
            Err(error) => Err(BufferError {
                written: writer.written,
                error,
            }),
        }
    }

    /// Scans `input` into a custom [`TokenSink`].
    ///
    /// # Errors
    ///
    /// The first syntax violation, or the code the sink broke with.
    pub fn scan_with<'src, S>(&mut self, input: &'src [u8], sink: &mut S) -> Result<(), Error>
    where
        S: TokenSink<'src>,
    {
        let result = Machine::new(input, &mut self.stack, sink).run();
        match &result {
            Ok(()) => tracing::trace!(len = input.len(), "scan complete"),
            Err(err) => {
                tracing::debug!(
                    index = err.index,
                    code = ?err.code,
                    expected = ?err.expected,
                    "scan stopped"
                );
                #[cfg(any(test, feature = "fuzzing"))]
                assert!(
                    !self.options.panic_on_error || err.is_aborted() || err.is_capacity_exceeded(),
                    "syntax error: {err}"
                );
            }
        }
        result
    }

    /// Options this scanner was created with.
    #[must_use]
    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }
}
