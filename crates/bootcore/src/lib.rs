//! A small runtime core: byte strings, a fixed-capacity text builder, byte
//! streams over a pluggable native host, a line scanner and bounded random
//! numbers.
//!
//! Every runtime object carries an [`Identity`] drawn from one process-wide
//! counter. Strings are immutable byte sequences compared by content. All
//! input and output funnels through a [`NativeHost`], which binds resources
//! and moves single bytes; [`StdHost`] talks to the real console and file
//! system, [`MemoryHost`] keeps everything in memory.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bootcore::{Console, MemoryHost, Resource, TextBuilder};
//!
//! let host = Arc::new(MemoryHost::with_stdin("world\n"));
//! let mut console = Console::attach(host.clone()).unwrap();
//!
//! let name = console.prompt("name? ").unwrap();
//! let mut greeting = TextBuilder::new();
//! greeting.append("hello, ").unwrap().append(&name).unwrap();
//! console.out.print_line(greeting.to_byte_string()).unwrap();
//!
//! assert_eq!(
//!     host.contents(&Resource::Stdout).unwrap(),
//!     b"name? hello, world\n"
//! );
//! ```

#![allow(missing_docs)]

mod builder;
mod console;
mod error;
mod identity;
mod native;
mod number;
mod options;
mod random;
mod scanner;
mod stream;
mod string;


pub use builder::{Append, TextBuilder};
pub use console::Console;
pub use error::{BindingError, BoundsError, Error, Result, TransferError};
pub use identity::{Identity, Object, RuntimeObject};
pub use native::{
    Access, BindingTable, Handle, MemoryHost, NativeHost, NativeInput, NativeOutput, Resource,
    StdHost,
};
pub use number::{Digits, MAX_INTEGER_LEN, SignStyle};
pub use options::{BuilderOptions, ScannerOptions};
pub use random::BoundedRandom;
pub use scanner::{Line, LineEnding, LineScanner, Lines};
pub use stream::{ByteSink, ByteSource, Forward, LINE_TERMINATOR, PrintStream};
pub use string::ByteString;
