/// Configuration for a [`TextBuilder`](crate::TextBuilder).
///
/// # Examples
///
/// ```rust
/// use bootcore::{BuilderOptions, TextBuilder};
///
/// let mut builder = TextBuilder::with_options(BuilderOptions {
///     capacity: 4,
///     growable: true,
/// });
/// builder.append("longer than four").unwrap();
/// assert_eq!(builder.to_byte_string(), "longer than four");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Number of bytes the buffer holds before an append fails (or grows).
    ///
    /// # Default
    ///
    /// `1024`
    pub capacity: usize,

    /// Whether a full buffer doubles instead of rejecting the append.
    ///
    /// With `false` an append that does not fit fails with
    /// [`BoundsError::Capacity`](crate::BoundsError::Capacity) and leaves the
    /// builder unchanged.
    ///
    /// # Default
    ///
    /// `false`
    pub growable: bool,
}

impl BuilderOptions {
    pub const DEFAULT_CAPACITY: usize = 1024;
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            growable: false,
        }
    }
}

/// Configuration for a [`LineScanner`](crate::LineScanner).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScannerOptions {
    /// Longest line, in bytes, the scanner accumulates.
    ///
    /// A longer line fails with
    /// [`BoundsError::Capacity`](crate::BoundsError::Capacity); the source has
    /// then been consumed through the first byte past the limit.
    ///
    /// # Default
    ///
    /// `None` (unlimited)
    pub max_line_length: Option<usize>,
}
