//! Text builder.
//!
//! [`TextBuilder`] accumulates bytes into a buffer of fixed capacity and a
//! write cursor marking the next free offset. Every append checks the space
//! it needs before writing anything: an append that does not fit fails with
//! [`BoundsError::Capacity`] and leaves the builder exactly as it was, unless
//! the builder was created growable.
//!
//! Integers are written straight into the buffer from a stack scratch array,
//! in the canonical sign style (`-` for negatives, no `+`).
use crate::{
    ByteString,
    error::BoundsError,
    identity::{Identity, RuntimeObject},
    number::{Digits, SignStyle},
    options::BuilderOptions,
};

const TRUE_TEXT: &[u8] = b"True";
const FALSE_TEXT: &[u8] = b"False";

#[derive(Debug)]
pub struct TextBuilder {
    identity: Identity,
    buffer: Box<[u8]>,
    cursor: usize,
    growable: bool,
}

impl TextBuilder {
    /// An empty builder with the default fixed capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BuilderOptions::default())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(BuilderOptions {
            capacity,
            ..BuilderOptions::default()
        })
    }

    #[must_use]
    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            identity: Identity::next(),
            buffer: vec![0; options.capacity].into_boxed_slice(),
            cursor: 0,
            growable: options.growable,
        }
    }

    /// Appends any [`Append`] value.
    ///
    /// # Errors
    ///
    /// See the individual `append_*` methods.
    pub fn append<T: Append>(&mut self, value: T) -> Result<&mut Self, BoundsError> {
        value.append_to(self)?;
        Ok(self)
    }

    /// Appends `True` or `False`.
    ///
    /// # Errors
    ///
    /// [`BoundsError::Capacity`] when the literal does not fit.
    pub fn append_bool(&mut self, value: bool) -> Result<&mut Self, BoundsError> {
        self.append_bytes(if value { TRUE_TEXT } else { FALSE_TEXT })
    }

    /// # Errors
    ///
    /// [`BoundsError::Capacity`] when the buffer is full.
    pub fn append_byte(&mut self, value: u8) -> Result<&mut Self, BoundsError> {
        self.append_bytes(&[value])
    }

    /// Appends the single-byte representation of `value`.
    ///
    /// # Errors
    ///
    /// [`BoundsError::ByteRange`] when `value` is above U+00FF, and
    /// [`BoundsError::Capacity`] when the buffer is full.
    pub fn append_char(&mut self, value: char) -> Result<&mut Self, BoundsError> {
        let byte = u8::try_from(value).map_err(|_| BoundsError::ByteRange {
            value: u32::from(value),
        })?;
        self.append_byte(byte)
    }

    /// # Errors
    ///
    /// [`BoundsError::Capacity`] when the string does not fit.
    pub fn append_string(&mut self, value: &ByteString) -> Result<&mut Self, BoundsError> {
        self.append_bytes(value.bytes())
    }

    /// Appends the decimal digits of `value`, led by `-` when negative.
    ///
    /// # Errors
    ///
    /// [`BoundsError::Capacity`] when the digits do not fit.
    pub fn append_integer(&mut self, value: i64) -> Result<&mut Self, BoundsError> {
        let digits = Digits::new(value, SignStyle::NegativeOnly);
        self.append_bytes(digits.as_bytes())
    }

    /// # Errors
    ///
    /// [`BoundsError::Capacity`] when `bytes` does not fit; nothing is
    /// written in that case.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, BoundsError> {
        self.reserve(bytes.len())?;
        let end = self.cursor + bytes.len();
        self.buffer[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        Ok(self)
    }

    fn reserve(&mut self, needed: usize) -> Result<(), BoundsError> {
        let remaining = self.remaining();
        if needed <= remaining {
            return Ok(());
        }
        if !self.growable {
            return Err(BoundsError::Capacity {
                needed,
                remaining,
                capacity: self.capacity(),
            });
        }

        let required = self.cursor + needed;
        let mut capacity = self.capacity().max(1);
        while capacity < required {
            capacity = capacity.saturating_mul(2);
        }
        let mut grown = vec![0; capacity];
        grown[..self.cursor].copy_from_slice(&self.buffer[..self.cursor]);
        self.buffer = grown.into_boxed_slice();
        Ok(())
    }

    /// Copies the bytes written so far into a new [`ByteString`]. The builder
    /// is left untouched, so repeated calls yield equal strings.
    #[must_use]
    pub fn to_byte_string(&self) -> ByteString {
        ByteString::new(self.as_bytes())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.cursor]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Rewinds the cursor to zero. Capacity is kept.
    pub fn clear(&mut self) {
        self.cursor = 0;
    }
}

impl Default for TextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeObject for TextBuilder {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        "StringBuilder"
    }
}

/// Values a [`TextBuilder`] knows how to render.
pub trait Append {
    /// # Errors
    ///
    /// Whatever the matching `append_*` method on [`TextBuilder`] returns.
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError>;
}

impl Append for bool {
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError> {
        builder.append_bool(self).map(|_| ())
    }
}

impl Append for char {
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError> {
        builder.append_char(self).map(|_| ())
    }
}

impl Append for u8 {
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError> {
        builder.append_byte(self).map(|_| ())
    }
}

impl Append for i32 {
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError> {
        builder.append_integer(i64::from(self)).map(|_| ())
    }
}

impl Append for i64 {
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError> {
        builder.append_integer(self).map(|_| ())
    }
}

impl Append for &ByteString {
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError> {
        builder.append_string(self).map(|_| ())
    }
}

impl Append for &str {
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError> {
        builder.append_bytes(self.as_bytes()).map(|_| ())
    }
}

impl Append for &[u8] {
    fn append_to(self, builder: &mut TextBuilder) -> Result<(), BoundsError> {
        builder.append_bytes(self).map(|_| ())
    }
}
