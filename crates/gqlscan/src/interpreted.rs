//! Interpreted content of a token, delivered in bounded chunks.
//!
//! Strings have their escapes decoded, block strings get the common
//! indentation removed and their blank edge lines trimmed. Everything else is
//! copied as is. The decoder never allocates: output goes through the
//! caller's buffer, which is handed to the caller every time it fills up.

use core::ops::ControlFlow;

use bstr::ByteSlice;

use crate::{Cursor, Token, TokenRef, escape::UnicodeEscapeBuffer, escape::decode_unit};

impl Cursor<'_> {
    /// Decodes the current token into `buffer`, calling `on_chunk` with each
    /// filled prefix.
    ///
    /// Chunks are never empty and concatenate to the full interpreted value.
    /// Returning `true` from `on_chunk` stops decoding. Nothing is delivered
    /// when `buffer` is empty.
    ///
    /// ```
    /// let mut decoded = Vec::new();
    /// gqlscan::scan_all(br#"{ f(a: "x\ty") }"#, |c| {
    ///     if c.token() == gqlscan::Token::Str {
    ///         c.scan_interpreted(&mut [0; 2], |chunk| {
    ///             decoded.extend_from_slice(chunk);
    ///             false
    ///         });
    ///     }
    /// })
    /// .unwrap();
    /// assert_eq!(decoded, b"x\ty");
    /// ```
    pub fn scan_interpreted<F>(&self, buffer: &mut [u8], on_chunk: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        interpret(self.token, self.value(), buffer, on_chunk);
    }
}

impl TokenRef {
    /// Same as [`Cursor::scan_interpreted`], for a record produced by
    /// [`scan_to_buffer`](crate::scan_to_buffer). `input` must be the buffer
    /// the record was scanned from.
    pub fn scan_interpreted<F>(&self, input: &[u8], buffer: &mut [u8], on_chunk: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        interpret(self.kind, self.value(input), buffer, on_chunk);
    }
}

fn interpret<F>(token: Token, raw: &[u8], buffer: &mut [u8], on_chunk: F)
where
    F: FnMut(&[u8]) -> bool,
{
    if buffer.is_empty() {
        return;
    }
    let mut writer = ChunkWriter {
        buf: buffer,
        len: 0,
        on_chunk,
    };
    let _ = match token {
        Token::Str => decode_string(raw, &mut writer),
        Token::StrBlock => decode_block_string(raw, &mut writer),
        _ => copy_raw(raw, &mut writer),
    };
}

fn copy_raw<F>(raw: &[u8], w: &mut ChunkWriter<'_, F>) -> ControlFlow<()>
where
    F: FnMut(&[u8]) -> bool,
{
    w.push_slice(raw)?;
    w.flush()
}

/// Fills the caller's buffer and hands it over whenever it is full.
/// `Break` means the caller asked to stop.
struct ChunkWriter<'b, F> {
    buf: &'b mut [u8],
    len: usize,
    on_chunk: F,
}

impl<F: FnMut(&[u8]) -> bool> ChunkWriter<'_, F> {
    fn push_slice(&mut self, mut bytes: &[u8]) -> ControlFlow<()> {
        while !bytes.is_empty() {
            let n = (self.buf.len() - self.len).min(bytes.len());
            self.buf[self.len..self.len + n].copy_from_slice(&bytes[..n]);
            self.len += n;
            bytes = &bytes[n..];
            if self.len == self.buf.len() {
                self.flush()?;
            }
        }
        ControlFlow::Continue(())
    }

    fn push_char(&mut self, ch: char) -> ControlFlow<()> {
        let mut utf8 = [0; 4];
        self.push_slice(ch.encode_utf8(&mut utf8).as_bytes())
    }

    fn flush(&mut self) -> ControlFlow<()> {
        if self.len == 0 {
            return ControlFlow::Continue(());
        }
        let stop = (self.on_chunk)(&self.buf[..self.len]);
        self.len = 0;
        if stop {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// `raw` is the body of a scanned string, so every escape is complete.
fn decode_string<F>(raw: &[u8], w: &mut ChunkWriter<'_, F>) -> ControlFlow<()>
where
    F: FnMut(&[u8]) -> bool,
{
    let mut escapes = UnicodeEscapeBuffer::new();
    let mut i = 0;
    while i < raw.len() {
        let literal_end = raw[i..].find_byte(b'\\').map_or(raw.len(), |n| i + n);
        if literal_end > i {
            if let Some(ch) = escapes.flush() {
                w.push_char(ch)?;
            }
            w.push_slice(&raw[i..literal_end])?;
            i = literal_end;
            continue;
        }
        let Some(&kind) = raw.get(i + 1) else {
            break;
        };
        if kind == b'u' {
            for ch in escapes.feed(decode_unit(raw, i + 2)).into_iter().flatten() {
                w.push_char(ch)?;
            }
            i += 6;
        } else {
            if let Some(ch) = escapes.flush() {
                w.push_char(ch)?;
            }
            let byte = match kind {
                b'b' => 0x08,
                b'f' => 0x0C,
                b'n' => b'\n',
                b'r' => b'\r',
                b't' => b'\t',
                other => other,
            };
            w.push_slice(&[byte])?;
            i += 2;
        }
    }
    if let Some(ch) = escapes.flush() {
        w.push_char(ch)?;
    }
    w.flush()
}

/// Splits on CRLF, CR and LF. A trailing terminator yields a final empty
/// line.
struct Lines<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Lines<'a> {
    fn new(raw: &'a [u8]) -> Self {
        Self { rest: Some(raw) }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = self.rest?;
        match rest.find_byteset(b"\r\n") {
            Some(n) => {
                let skip = if rest[n..].starts_with(b"\r\n") { 2 } else { 1 };
                self.rest = Some(&rest[n + skip..]);
                Some(&rest[..n])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

fn indent(line: &[u8]) -> usize {
    line.iter().take_while(|&&b| b == b' ' || b == b'\t').count()
}

/// Two passes over the raw lines: the first finds the common indentation and
/// the first and last non-blank lines, the second writes.
fn decode_block_string<F>(raw: &[u8], w: &mut ChunkWriter<'_, F>) -> ControlFlow<()>
where
    F: FnMut(&[u8]) -> bool,
{
    let mut common: Option<usize> = None;
    let mut first_content: Option<usize> = None;
    let mut last_content = 0;
    for (n, line) in Lines::new(raw).enumerate() {
        let width = indent(line);
        if width == line.len() {
            continue;
        }
        first_content.get_or_insert(n);
        last_content = n;
        if n > 0 {
            common = Some(common.map_or(width, |c| c.min(width)));
        }
    }
    let Some(first_content) = first_content else {
        return w.flush();
    };
    let common = common.unwrap_or(0);

    for (n, line) in Lines::new(raw)
        .enumerate()
        .take(last_content + 1)
        .skip(first_content)
    {
        if n > first_content {
            w.push_slice(b"\n")?;
        }
        let line = if n == 0 {
            line
        } else {
            &line[common.min(line.len())..]
        };
        push_unescaped_line(line, w)?;
    }
    w.flush()
}

/// Writes `line` with every `\"""` turned into `"""`.
fn push_unescaped_line<F>(mut line: &[u8], w: &mut ChunkWriter<'_, F>) -> ControlFlow<()>
where
    F: FnMut(&[u8]) -> bool,
{
    while let Some(n) = line.find(b"\\\"\"\"") {
        w.push_slice(&line[..n])?;
        w.push_slice(b"\"\"\"")?;
        line = &line[n + 4..];
    }
    w.push_slice(line)
}
