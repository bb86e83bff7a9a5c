/// Configuration options for a [`Scanner`](crate::Scanner).
///
/// # Examples
///
/// ```rust
/// use gqlscan::{Scanner, ScannerOptions};
///
/// let options = ScannerOptions {
///     stack_capacity: 64,
///     ..Default::default()
/// };
/// let mut scanner = Scanner::new(options);
/// assert!(scanner.scan_all(b"{ a(x: [[[1]]]) }", |_| {}).is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScannerOptions {
    /// Initial capacity of the container stack used for nested list and
    /// object values.
    ///
    /// The stack grows past this as needed; the capacity only decides when
    /// the first allocation happens.
    ///
    /// # Default
    ///
    /// `16`
    pub stack_capacity: usize,

    #[cfg(any(test, feature = "fuzzing"))]
    #[cfg_attr(feature = "serde", serde(skip))]
    /// Panic on syntax errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on scan failures.
    pub panic_on_error: bool,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            stack_capacity: 16,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}
