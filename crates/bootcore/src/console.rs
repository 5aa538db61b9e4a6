use std::sync::Arc;

use crate::{
    ByteString, LineScanner,
    error::{BindingError, Error},
    native::{NativeHost, NativeInput, NativeOutput, Resource},
    stream::PrintStream,
};

/// The process console: standard input, output and error, each bound once.
///
/// Attach one `Console` per host and hand out borrows of its streams; a
/// second attach on the same host fails with
/// [`BindingError::AlreadyBound`] while the first is alive.
#[derive(Debug)]
pub struct Console {
    pub input: NativeInput,
    pub out: PrintStream<NativeOutput>,
    pub err: PrintStream<NativeOutput>,
}

impl Console {
    /// # Errors
    ///
    /// The first [`BindingError`] among the three bindings. Bindings already
    /// made are released again.
    pub fn attach(host: Arc<dyn NativeHost>) -> Result<Self, BindingError> {
        let input = NativeInput::open(host.clone(), Resource::Stdin)?;
        let out = PrintStream::create(host.clone(), Resource::Stdout)?;
        let err = PrintStream::create(host, Resource::Stderr)?;
        Ok(Self { input, out, err })
    }

    /// A scanner over standard input that borrows the console's binding.
    pub fn scanner(&mut self) -> LineScanner<&mut NativeInput> {
        LineScanner::new(&mut self.input)
    }

    /// Prints `text` without a newline, then reads one line of input.
    ///
    /// # Errors
    ///
    /// Transfer errors from either stream.
    pub fn prompt(&mut self, text: impl AsRef<[u8]>) -> Result<ByteString, Error> {
        self.out.print(text)?;
        self.scanner().next_line()
    }
}
