//! Line scanner.
//!
//! [`LineScanner`] pulls one byte at a time from a [`ByteSource`] and splits
//! the stream into lines. A newline and end of input both finish a line and
//! neither is included in it. There is no look-ahead: after a call the source
//! sits just past the terminator that ended the line.
//!
//! End of input with nothing accumulated produces an empty line, which is the
//! same text a blank line produces. [`LineScanner::next_line`] returns only the
//! text and so cannot tell the two apart; [`LineScanner::scan_line`] reports
//! the [`LineEnding`] alongside it.
use tracing::trace;

use crate::{
    ByteString, TextBuilder,
    error::Error,
    identity::{Identity, RuntimeObject},
    options::{BuilderOptions, ScannerOptions},
    stream::{ByteSource, LINE_TERMINATOR},
};

/// What ended a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Newline,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: ByteString,
    pub ending: LineEnding,
}

impl Line {
    /// True when the source was already exhausted: no bytes, no newline.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.ending == LineEnding::EndOfInput && self.text.is_empty()
    }
}

#[derive(Debug)]
pub struct LineScanner<S> {
    identity: Identity,
    source: S,
    options: ScannerOptions,
}

impl<S: ByteSource> LineScanner<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ScannerOptions::default())
    }

    pub fn with_options(source: S, options: ScannerOptions) -> Self {
        Self {
            identity: Identity::next(),
            source,
            options,
        }
    }

    /// Reads the next line and reports how it ended.
    ///
    /// # Errors
    ///
    /// [`Error::Transfer`] when the source fails and [`Error::Bounds`] when
    /// the line exceeds [`ScannerOptions::max_line_length`].
    pub fn scan_line(&mut self) -> Result<Line, Error> {
        let mut line = match self.options.max_line_length {
            Some(limit) => TextBuilder::with_capacity(limit),
            None => TextBuilder::with_options(BuilderOptions {
                capacity: 64,
                growable: true,
            }),
        };

        let ending = loop {
            match self.source.read_byte()? {
                None => break LineEnding::EndOfInput,
                Some(LINE_TERMINATOR) => break LineEnding::Newline,
                Some(byte) => {
                    line.append_byte(byte)?;
                }
            }
        };

        trace!(len = line.len(), ?ending, "scanned line");
        Ok(Line {
            text: line.to_byte_string(),
            ending,
        })
    }

    /// Reads the next line's text. Exhausted input yields an empty string.
    ///
    /// # Errors
    ///
    /// As [`scan_line`](Self::scan_line).
    pub fn next_line(&mut self) -> Result<ByteString, Error> {
        self.scan_line().map(|line| line.text)
    }

    /// Iterates over lines until the source is exhausted.
    ///
    /// Unlike repeated [`next_line`](Self::next_line) calls, the iterator
    /// ends instead of producing empty strings forever. Input ending in a
    /// newline does not produce a trailing empty line.
    pub fn lines(&mut self) -> Lines<'_, S> {
        Lines {
            scanner: self,
            done: false,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S> RuntimeObject for LineScanner<S> {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        "Scanner"
    }
}

/// Iterator returned by [`LineScanner::lines`].
#[derive(Debug)]
pub struct Lines<'a, S> {
    scanner: &'a mut LineScanner<S>,
    done: bool,
}

impl<S: ByteSource> Iterator for Lines<'_, S> {
    type Item = Result<ByteString, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scanner.scan_line() {
            Ok(line) if line.is_exhausted() => {
                self.done = true;
                None
            }
            Ok(line) => {
                self.done = line.ending == LineEnding::EndOfInput;
                Some(Ok(line.text))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
