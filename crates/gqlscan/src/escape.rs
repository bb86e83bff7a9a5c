//! `\uXXXX` escape handling shared by the scanner (syntax) and the
//! interpreted-content decoder (values).
//!
//! The scanner only checks that exactly four ASCII hexadecimal digits follow
//! `\u`. The decoder turns each escape into a UTF-16 code unit and feeds it to
//! a [`UnicodeEscapeBuffer`], which pairs surrogates and replaces unpaired
//! ones with U+FFFD.

/// Value of one ASCII hexadecimal digit.
#[inline]
pub(crate) const fn hex_value(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u16),
        b'a'..=b'f' => Some((b - b'a' + 10) as u16),
        b'A'..=b'F' => Some((b - b'A' + 10) as u16),
        _ => None,
    }
}

/// Checks the four digits of a unicode escape starting at `i` (just after
/// `\u`).
///
/// Returns `Err(offset)` pointing at the first byte that is not a hex digit,
/// which is `input.len()` when the input ends early.
#[inline]
pub(crate) fn check_unicode_escape(input: &[u8], i: usize) -> Result<(), usize> {
    for offset in i..i + 4 {
        match input.get(offset) {
            Some(&b) if hex_value(b).is_some() => {}
            Some(_) => return Err(offset),
            None => return Err(input.len()),
        }
    }
    Ok(())
}

/// Decodes the four hex digits at `i`. The scanner has already validated
/// them, so malformed input decodes to the replacement unit.
#[inline]
pub(crate) fn decode_unit(input: &[u8], i: usize) -> u16 {
    let mut unit = 0u16;
    for offset in i..i + 4 {
        match input.get(offset).copied().and_then(hex_value) {
            Some(digit) => unit = (unit << 4) | digit,
            None => return 0xFFFD,
        }
    }
    unit
}

const fn is_high_surrogate(unit: u16) -> bool {
    matches!(unit, 0xD800..=0xDBFF)
}

const fn is_low_surrogate(unit: u16) -> bool {
    matches!(unit, 0xDC00..=0xDFFF)
}

/// Pairs UTF-16 code units produced by consecutive `\u` escapes.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    high: Option<u16>,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self { high: None }
    }

    /// Feeds one code unit and returns the characters it completes, in order.
    ///
    /// A high surrogate is held back until the next unit shows whether it is
    /// paired; an unpaired surrogate becomes U+FFFD.
    pub(crate) fn feed(&mut self, unit: u16) -> [Option<char>; 2] {
        if is_high_surrogate(unit) {
            let unpaired = self.high.replace(unit).map(|_| char::REPLACEMENT_CHARACTER);
            return [unpaired, None];
        }
        if is_low_surrogate(unit) {
            let ch = match self.high.take() {
                Some(high) => {
                    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10)
                        + (u32::from(unit) - 0xDC00);
                    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                }
                None => char::REPLACEMENT_CHARACTER,
            };
            return [Some(ch), None];
        }
        let unpaired = self.flush();
        let ch = char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
        [unpaired, Some(ch)]
    }

    /// Emits a held-back high surrogate as U+FFFD. Called when anything other
    /// than another escape follows.
    pub(crate) fn flush(&mut self) -> Option<char> {
        self.high.take().map(|_| char::REPLACEMENT_CHARACTER)
    }
}
