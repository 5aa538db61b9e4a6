use std::io;

use thiserror::Error;

use crate::native::{Handle, Resource};

/// A resource could not be bound to a stream.
///
/// Binding happens once, while a native-bound stream is constructed, so this
/// error always aborts that construction.
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("resource {0} does not exist")]
    NotFound(Resource),
    #[error("resource {resource} is already bound for {access}")]
    AlreadyBound {
        resource: Resource,
        access: crate::native::Access,
    },
    #[error("resource {resource} cannot be bound for {access}")]
    Unsupported {
        resource: Resource,
        access: crate::native::Access,
    },
    #[error("no binding handles left")]
    HandlesExhausted,
    #[error("binding {resource} failed: {source}")]
    Host {
        resource: Resource,
        #[source]
        source: io::Error,
    },
}

/// A single byte transfer failed after the stream was bound.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("read from {resource} failed: {source}")]
    Read {
        resource: Resource,
        #[source]
        source: io::Error,
    },
    #[error("write to {resource} failed: {source}")]
    Write {
        resource: Resource,
        #[source]
        source: io::Error,
    },
    #[error("handle {handle} is not bound")]
    Released { handle: Handle },
    #[error("handle {handle} is not bound for {attempted}")]
    WrongDirection {
        handle: Handle,
        attempted: crate::native::Access,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsError {
    #[error("index {index} out of range for length {len}")]
    Index { index: usize, len: usize },
    #[error("need {needed} bytes but only {remaining} of {capacity} remain")]
    Capacity {
        needed: usize,
        remaining: usize,
        capacity: usize,
    },
    #[error("character U+{value:04X} does not fit in one byte")]
    ByteRange { value: u32 },
    #[error("bound must be positive, got {bound}")]
    NonPositiveBound { bound: i64 },
}

/// Any failure the runtime surfaces.
#[derive(Error, Debug)]
pub enum Error {
    #[error("binding error: {0}")]
    Binding(#[from] BindingError),
    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),
    #[error("bounds error: {0}")]
    Bounds(#[from] BoundsError),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
