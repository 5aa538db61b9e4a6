//! Byte streams.
//!
//! Two capabilities, [`ByteSink`] and [`ByteSource`], each moving exactly one
//! byte per call. Streams compose by holding another stream rather than by
//! extending one:
//!
//! - [`NativeInput`](crate::NativeInput) / [`NativeOutput`](crate::NativeOutput)
//!   own a native binding,
//! - [`Forward`] holds (or borrows) any stream and passes bytes through,
//! - [`PrintStream`] holds a sink and turns strings into byte writes.
//!
//! A stream is meant for one writer or one reader at a time; none of these
//! types lock.
use std::sync::Arc;

use crate::{
    ByteString,
    error::{BindingError, TransferError},
    identity::{Identity, RuntimeObject},
    native::{NativeHost, NativeOutput, Resource},
};

/// The byte written after a line by [`PrintStream::print_line`].
pub const LINE_TERMINATOR: u8 = b'\n';

/// Something that accepts single bytes.
pub trait ByteSink {
    /// # Errors
    ///
    /// A [`TransferError`] when the byte could not be delivered.
    fn write_byte(&mut self, byte: u8) -> Result<(), TransferError>;

    /// Writes `bytes` one at a time, in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// The first [`TransferError`] encountered.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
        bytes.iter().try_for_each(|&b| self.write_byte(b))
    }

    /// # Errors
    ///
    /// A [`TransferError`] when pending bytes could not be delivered.
    fn flush(&mut self) -> Result<(), TransferError> {
        Ok(())
    }
}

/// Something that yields single bytes. `Ok(None)` marks end of input.
pub trait ByteSource {
    /// # Errors
    ///
    /// A [`TransferError`] when the read fails.
    fn read_byte(&mut self) -> Result<Option<u8>, TransferError>;
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransferError> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> Result<(), TransferError> {
        (**self).flush()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for Box<S> {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransferError> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> Result<(), TransferError> {
        (**self).flush()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>, TransferError> {
        (**self).read_byte()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_byte(&mut self) -> Result<Option<u8>, TransferError> {
        (**self).read_byte()
    }
}

/// Collects bytes in memory.
impl ByteSink for Vec<u8> {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransferError> {
        self.push(byte);
        Ok(())
    }
}

/// Yields the slice front to back, advancing it.
impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> Result<Option<u8>, TransferError> {
        let Some((&first, rest)) = self.split_first() else {
            return Ok(None);
        };
        *self = rest;
        Ok(Some(first))
    }
}

/// Passes every byte to the stream it holds and counts them.
#[derive(Debug)]
pub struct Forward<S> {
    identity: Identity,
    inner: S,
    transferred: u64,
}

impl<S> Forward<S> {
    pub fn new(inner: S) -> Self {
        Self {
            identity: Identity::next(),
            inner,
            transferred: 0,
        }
    }

    /// Bytes successfully passed through so far.
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteSink> ByteSink for Forward<S> {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransferError> {
        self.inner.write_byte(byte)?;
        self.transferred += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransferError> {
        self.inner.flush()
    }
}

impl<S: ByteSource> ByteSource for Forward<S> {
    fn read_byte(&mut self) -> Result<Option<u8>, TransferError> {
        let byte = self.inner.read_byte()?;
        if byte.is_some() {
            self.transferred += 1;
        }
        Ok(byte)
    }
}

impl<S> RuntimeObject for Forward<S> {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        "OutputStream"
    }
}

/// Writes text to a byte sink.
///
/// Each string is sent as one [`ByteSink::write_byte`] per byte, in order,
/// then the sink is flushed so prompts appear before input is read.
#[derive(Debug)]
pub struct PrintStream<S> {
    identity: Identity,
    sink: S,
}

impl<S: ByteSink> PrintStream<S> {
    pub fn new(sink: S) -> Self {
        Self {
            identity: Identity::next(),
            sink,
        }
    }

    /// # Errors
    ///
    /// The first [`TransferError`] from the sink; bytes before it were
    /// written.
    pub fn print(&mut self, text: impl AsRef<[u8]>) -> Result<(), TransferError> {
        self.sink.write_bytes(text.as_ref())?;
        self.sink.flush()
    }

    /// [`print`](Self::print) followed by [`LINE_TERMINATOR`].
    ///
    /// # Errors
    ///
    /// The first [`TransferError`] from the sink.
    pub fn print_line(&mut self, text: impl AsRef<[u8]>) -> Result<(), TransferError> {
        self.sink.write_bytes(text.as_ref())?;
        self.sink.write_byte(LINE_TERMINATOR)?;
        self.sink.flush()
    }

    /// Writes just the line terminator.
    ///
    /// # Errors
    ///
    /// A [`TransferError`] from the sink.
    pub fn new_line(&mut self) -> Result<(), TransferError> {
        self.print_line(b"")
    }

    /// Prints the runtime description of `object`.
    ///
    /// # Errors
    ///
    /// The first [`TransferError`] from the sink.
    pub fn print_object(&mut self, object: &dyn RuntimeObject) -> Result<(), TransferError> {
        let text: ByteString = object.describe();
        self.print(&text)
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl PrintStream<NativeOutput> {
    /// Binds `resource` for writing and prints to it.
    ///
    /// # Errors
    ///
    /// A [`BindingError`] when the resource cannot be bound.
    pub fn create(host: Arc<dyn NativeHost>, resource: Resource) -> Result<Self, BindingError> {
        Ok(Self::new(NativeOutput::open(host, resource)?))
    }

    /// Flushes and releases the underlying binding.
    ///
    /// # Errors
    ///
    /// The host's flush or release error.
    pub fn close(self) -> Result<(), TransferError> {
        self.sink.close()
    }
}

impl<S: ByteSink> ByteSink for PrintStream<S> {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransferError> {
        self.sink.write_byte(byte)
    }

    fn flush(&mut self) -> Result<(), TransferError> {
        self.sink.flush()
    }
}

impl<S> RuntimeObject for PrintStream<S> {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        "PrintStream"
    }
}
