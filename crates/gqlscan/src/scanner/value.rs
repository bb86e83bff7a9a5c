//! Values: literals, strings, variable references, lists and objects.

use super::{Machine, State, ValueContext};
use crate::{
    Error, ErrorCode, Expect, Token,
    classify::{
        Keyword, is_block_string_control, is_name_start, is_string_control, is_value_terminator,
        name_end,
    },
    cursor::Container,
    escape::check_unicode_escape,
    sink::TokenSink,
};

const BLOCK_QUOTE: &[u8] = b"\"\"\"";

impl<'src, S: TokenSink<'src>> Machine<'src, '_, S> {
    pub(super) fn value(&mut self, expected: Expect) -> Result<State, Error> {
        let input = self.input;
        let (i, b) = self.peek();
        let Some(b) = b else {
            return Err(self.unexpected(i, expected));
        };
        match b {
            b'"' if input[i..].starts_with(BLOCK_QUOTE) => self.block_string(i),
            b'"' => self.string(i),
            b'$' => {
                let n = i + 1;
                match input.get(n) {
                    Some(&c) if is_name_start(c) => {
                        self.name(Token::VarRef, n)?;
                        self.after_value()
                    }
                    _ => Err(self.unexpected(n, Expect::VariableReference)),
                }
            }
            b'[' => {
                self.stack.push(Container::Arr);
                self.punct(Token::Arr, i)?;
                Ok(State::AfterValue)
            }
            b'{' => {
                self.stack.push(Container::Obj);
                self.punct(Token::Obj, i)?;
                Ok(State::ObjectField)
            }
            b'-' | b'+' | b'0'..=b'9' => self.number(i),
            c if is_name_start(c) => {
                let end = name_end(input, i);
                if !is_value_terminator(input.get(end).copied()) {
                    return Err(self.fail(end, ErrorCode::InvalidValue, None));
                }
                self.emit(Keyword::value_token(&input[i..end]), i, end, end)?;
                self.after_value()
            }
            _ => Err(self.unexpected(i, expected)),
        }
    }

    /// Closes finished lists, then picks what follows a complete value.
    pub(super) fn after_value(&mut self) -> Result<State, Error> {
        match self.stack.last() {
            Some(Container::Obj) => Ok(State::ObjectField),
            Some(Container::Arr) => {
                let (i, b) = self.peek();
                if b == Some(b']') {
                    self.stack.pop();
                    self.punct(Token::ArrEnd, i)?;
                    Ok(State::AfterValue)
                } else {
                    Ok(State::Value(Expect::AfterArrayValue))
                }
            }
            None => Ok(match self.value_context {
                ValueContext::Argument => State::NextArg,
                ValueContext::VarDefault => State::AfterVarDefinition,
            }),
        }
    }

    pub(super) fn object_field(&mut self) -> Result<State, Error> {
        let (i, b) = self.peek();
        match b {
            Some(b'}') => {
                self.stack.pop();
                self.punct(Token::ObjEnd, i)?;
                self.after_value()
            }
            Some(c) if is_name_start(c) => {
                self.name(Token::ObjField, i)?;
                Ok(State::ObjectColon)
            }
            _ => Err(self.unexpected(i, Expect::AfterObjectValue)),
        }
    }

    /// Single-line string whose opening quote is at `i`.
    fn string(&mut self, i: usize) -> Result<State, Error> {
        let input = self.input;
        let mut j = i + 1;
        loop {
            match input.get(j) {
                None => return Err(self.unexpected(j, Expect::EndOfString)),
                Some(b'"') => break,
                Some(b'\\') => j = self.escape(j)?,
                Some(&c) if is_string_control(c) => {
                    return Err(self.unexpected(j, Expect::EndOfString));
                }
                Some(_) => j += 1,
            }
        }
        self.emit(Token::Str, i + 1, j, j + 1)?;
        self.after_value()
    }

    /// Checks the escape sequence whose backslash is at `j` and returns the
    /// offset just past it.
    fn escape(&self, j: usize) -> Result<usize, Error> {
        let k = j + 1;
        match self.input.get(k) {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => Ok(k + 1),
            Some(b'u') => match check_unicode_escape(self.input, k + 1) {
                Ok(()) => Ok(k + 5),
                Err(at) => Err(self.unexpected(at, Expect::EscapedUnicodeSequence)),
            },
            _ => Err(self.unexpected(k, Expect::EscapedSequence)),
        }
    }

    /// Block string whose opening `"""` starts at `i`. Only `\"""` is an
    /// escape here; every other backslash is literal.
    fn block_string(&mut self, i: usize) -> Result<State, Error> {
        let input = self.input;
        let mut j = i + BLOCK_QUOTE.len();
        loop {
            match input.get(j) {
                None => return Err(self.unexpected(j, Expect::EndOfBlockString)),
                Some(b'"') if input[j..].starts_with(BLOCK_QUOTE) => break,
                Some(b'\\') if input[j + 1..].starts_with(BLOCK_QUOTE) => j += 4,
                Some(&c) if is_block_string_control(c) => {
                    return Err(self.unexpected(j, Expect::EndOfBlockString));
                }
                Some(_) => j += 1,
            }
        }
        self.emit(Token::StrBlock, i + 3, j, j + 3)?;
        self.after_value()
    }

    /// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`, which must be
    /// followed by a value terminator.
    fn number(&mut self, i: usize) -> Result<State, Error> {
        let input = self.input;
        let digits = |mut j: usize| {
            while input.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            j
        };
        let invalid = |j: usize| self.fail(j, ErrorCode::InvalidNumber, None);

        let mut j = i;
        if input.get(j) == Some(&b'-') {
            j += 1;
        }
        match input.get(j) {
            Some(b'0') => {
                j += 1;
                if input.get(j).is_some_and(u8::is_ascii_digit) {
                    return Err(invalid(j));
                }
            }
            Some(b'1'..=b'9') => j = digits(j + 1),
            // includes a leading `+`
            _ => return Err(invalid(j)),
        }

        let mut token = Token::Int;
        if input.get(j) == Some(&b'.') {
            token = Token::Float;
            j += 1;
            if !input.get(j).is_some_and(u8::is_ascii_digit) {
                return Err(invalid(j));
            }
            j = digits(j);
        }
        if matches!(input.get(j), Some(b'e' | b'E')) {
            token = Token::Float;
            j += 1;
            if matches!(input.get(j), Some(b'+' | b'-')) {
                j += 1;
            }
            if !input.get(j).is_some_and(u8::is_ascii_digit) {
                return Err(invalid(j));
            }
            j = digits(j);
        }
        if !is_value_terminator(input.get(j).copied()) {
            return Err(invalid(j));
        }

        self.emit(token, i, j, j)?;
        self.after_value()
    }
}
