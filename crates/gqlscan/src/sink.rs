//! Token delivery strategies.
//!
//! The state machine is generic over a [`TokenSink`]; each strategy is one
//! implementation of it and the compiler monomorphizes the scanner per
//! strategy, so the callback-free paths pay nothing for early exit.

use core::ops::ControlFlow;

use crate::{Cursor, ErrorCode, TokenRef};

/// Receives every token produced by a scan.
///
/// Returning [`ControlFlow::Break`] stops the scan; the code becomes the
/// code of the returned [`Error`](crate::Error), reported at the next
/// significant byte after the token.
pub trait TokenSink<'src> {
    /// Called once per token, in source order.
    fn emit(&mut self, cursor: &Cursor<'src>) -> ControlFlow<ErrorCode>;
}

/// Calls a hook that may stop the scan by returning `true`.
pub(crate) struct EarlyExit<F>(pub(crate) F);

impl<'src, F> TokenSink<'src> for EarlyExit<F>
where
    F: FnMut(&Cursor<'src>) -> bool,
{
    #[inline(always)]
    fn emit(&mut self, cursor: &Cursor<'src>) -> ControlFlow<ErrorCode> {
        if (self.0)(cursor) {
            ControlFlow::Break(ErrorCode::CallbackFn)
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Calls a hook for every token; never stops early.
pub(crate) struct Traverse<F>(pub(crate) F);

impl<'src, F> TokenSink<'src> for Traverse<F>
where
    F: FnMut(&Cursor<'src>),
{
    #[inline(always)]
    fn emit(&mut self, cursor: &Cursor<'src>) -> ControlFlow<ErrorCode> {
        (self.0)(cursor);
        ControlFlow::Continue(())
    }
}

/// Appends token records to a caller-provided slice.
pub(crate) struct BufferWriter<'out> {
    out: &'out mut [TokenRef],
    pub(crate) written: usize,
}

impl<'out> BufferWriter<'out> {
    pub(crate) fn new(out: &'out mut [TokenRef]) -> Self {
        Self { out, written: 0 }
    }
}

impl<'src> TokenSink<'src> for BufferWriter<'_> {
    #[inline(always)]
    fn emit(&mut self, cursor: &Cursor<'src>) -> ControlFlow<ErrorCode> {
        let Some(slot) = self.out.get_mut(self.written) else {
            return ControlFlow::Break(ErrorCode::CapacityExceeded);
        };
        *slot = TokenRef::from(cursor);
        self.written += 1;
        ControlFlow::Continue(())
    }
}
