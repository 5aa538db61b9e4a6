//! The native bridge.
//!
//! A [`NativeHost`] supplies the four primitives every stream is built on:
//! bind a resource, read one byte, write one byte, release a binding. The
//! runtime never touches a file descriptor itself; it holds [`Handle`]s the
//! host hands out.
//!
//! [`NativeInput`] and [`NativeOutput`] are the only streams that own a
//! binding. They bind while being constructed and release on
//! [`close`](NativeOutput::close) or drop. Everything layered on top of them
//! forwards to them instead of binding again.
mod memory;
mod std_host;
mod table;

use std::{fmt, path::PathBuf, sync::Arc};

pub use memory::MemoryHost;
pub use std_host::StdHost;
pub use table::BindingTable;
use tracing::{debug, warn};

use crate::{
    error::{BindingError, TransferError},
    identity::{Identity, RuntimeObject},
    stream::{ByteSink, ByteSource},
};

/// What a stream can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Stdin,
    Stdout,
    Stderr,
    Path(PathBuf),
}

impl Resource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Resource::Path(path.into())
    }

    /// Console handles only go one way.
    ///
    /// # Errors
    ///
    /// [`BindingError::Unsupported`] for reading an output handle or writing
    /// standard input.
    pub fn check_access(&self, access: Access) -> Result<(), BindingError> {
        match (self, access) {
            (Resource::Stdin, Access::Write)
            | (Resource::Stdout | Resource::Stderr, Access::Read) => {
                Err(BindingError::Unsupported {
                    resource: self.clone(),
                    access,
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Stdin => f.write_str("<stdin>"),
            Resource::Stdout => f.write_str("<stdout>"),
            Resource::Stderr => f.write_str("<stderr>"),
            Resource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::Read => "reading",
            Access::Write => "writing",
        })
    }
}

/// Opaque binding token issued by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Native primitives supplied by the environment.
///
/// Hosts are shared between streams, so every method takes `&self`; an
/// implementation guards its binding table internally. Byte operations block
/// until the transfer completes.
pub trait NativeHost: Send + Sync {
    /// Opens `resource` for `access`.
    ///
    /// # Errors
    ///
    /// A [`BindingError`] when the resource cannot be opened or is already
    /// bound for `access`.
    fn bind(&self, resource: &Resource, access: Access) -> Result<Handle, BindingError>;

    /// Reads one byte; `Ok(None)` is end of input.
    ///
    /// # Errors
    ///
    /// A [`TransferError`] when the handle is stale or the read fails.
    fn read_byte(&self, handle: Handle) -> Result<Option<u8>, TransferError>;

    /// # Errors
    ///
    /// A [`TransferError`] when the handle is stale or the write fails.
    fn write_byte(&self, handle: Handle, byte: u8) -> Result<(), TransferError>;

    /// Pushes written bytes through to the resource.
    ///
    /// # Errors
    ///
    /// A [`TransferError`] when the handle is stale or the flush fails.
    fn flush(&self, handle: Handle) -> Result<(), TransferError>;

    /// # Errors
    ///
    /// [`TransferError::Released`] when the handle is not bound.
    fn release(&self, handle: Handle) -> Result<(), TransferError>;
}

/// A live binding: releases itself exactly once.
struct Binding {
    host: Arc<dyn NativeHost>,
    resource: Resource,
    handle: Handle,
    released: bool,
}

impl Binding {
    fn open(
        host: Arc<dyn NativeHost>,
        resource: Resource,
        access: Access,
    ) -> Result<Self, BindingError> {
        let handle = host.bind(&resource, access)?;
        debug!(%resource, %handle, %access, "bound");
        Ok(Self {
            host,
            resource,
            handle,
            released: false,
        })
    }

    fn release(&mut self) -> Result<(), TransferError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.host.release(self.handle)?;
        debug!(resource = %self.resource, handle = %self.handle, "released");
        Ok(())
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            warn!(
                resource = %self.resource,
                handle = %self.handle,
                %error,
                "release on drop failed"
            );
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("resource", &self.resource)
            .field("handle", &self.handle)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

/// A byte source bound to a native resource.
#[derive(Debug)]
pub struct NativeInput {
    identity: Identity,
    binding: Binding,
}

impl NativeInput {
    /// Binds `resource` for reading.
    ///
    /// # Errors
    ///
    /// A [`BindingError`] from the host; no stream exists in that case.
    pub fn open(host: Arc<dyn NativeHost>, resource: Resource) -> Result<Self, BindingError> {
        Ok(Self {
            identity: Identity::next(),
            binding: Binding::open(host, resource, Access::Read)?,
        })
    }

    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.binding.resource
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        self.binding.handle
    }

    /// Releases the binding.
    ///
    /// # Errors
    ///
    /// The host's release error.
    pub fn close(mut self) -> Result<(), TransferError> {
        self.binding.release()
    }
}

impl ByteSource for NativeInput {
    fn read_byte(&mut self) -> Result<Option<u8>, TransferError> {
        self.binding.host.read_byte(self.binding.handle)
    }
}

impl RuntimeObject for NativeInput {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        "FileInputStream"
    }
}

/// A byte sink bound to a native resource.
#[derive(Debug)]
pub struct NativeOutput {
    identity: Identity,
    binding: Binding,
}

impl NativeOutput {
    /// Binds `resource` for writing. Files are created or truncated.
    ///
    /// # Errors
    ///
    /// A [`BindingError`] from the host; no stream exists in that case.
    pub fn open(host: Arc<dyn NativeHost>, resource: Resource) -> Result<Self, BindingError> {
        Ok(Self {
            identity: Identity::next(),
            binding: Binding::open(host, resource, Access::Write)?,
        })
    }

    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.binding.resource
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        self.binding.handle
    }

    /// Flushes, then releases the binding.
    ///
    /// # Errors
    ///
    /// The host's flush or release error. The binding is released even when
    /// the flush fails.
    pub fn close(mut self) -> Result<(), TransferError> {
        let flushed = self.binding.host.flush(self.binding.handle);
        self.binding.release()?;
        flushed
    }
}

impl ByteSink for NativeOutput {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransferError> {
        self.binding.host.write_byte(self.binding.handle, byte)
    }

    fn flush(&mut self) -> Result<(), TransferError> {
        self.binding.host.flush(self.binding.handle)
    }
}

impl RuntimeObject for NativeOutput {
    fn identity(&self) -> Identity {
        self.identity
    }

    fn type_name(&self) -> &'static str {
        "FileOutputStream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_resources_are_one_way() {
        assert!(Resource::Stdin.check_access(Access::Read).is_ok());
        assert!(Resource::Stdin.check_access(Access::Write).is_err());
        assert!(Resource::Stdout.check_access(Access::Read).is_err());
        assert!(Resource::Stderr.check_access(Access::Write).is_ok());
        assert!(Resource::path("x").check_access(Access::Read).is_ok());
        assert!(Resource::path("x").check_access(Access::Write).is_ok());
    }

    #[test]
    fn dropping_a_stream_releases_its_binding() {
        let host = Arc::new(MemoryHost::new());
        let resource = Resource::path("out.txt");

        let first = NativeOutput::open(host.clone(), resource.clone()).unwrap();
        assert!(matches!(
            NativeOutput::open(host.clone(), resource.clone()),
            Err(BindingError::AlreadyBound { .. })
        ));
        drop(first);

        let second = NativeOutput::open(host.clone(), resource).unwrap();
        second.close().unwrap();
        assert_eq!(host.bound_count(), 0);
    }

    #[test]
    fn open_fails_for_missing_input() {
        let host = Arc::new(MemoryHost::new());
        let err = NativeInput::open(host, Resource::path("nope")).unwrap_err();
        assert!(matches!(err, BindingError::NotFound(Resource::Path(_))));
    }

    #[test]
    fn describe_uses_stream_type_name() {
        let host = Arc::new(MemoryHost::new());
        let out = NativeOutput::open(host, Resource::Stdout).unwrap();
        let expected = format!("FileOutputStream(index={})", out.identity());
        assert_eq!(out.describe(), expected.as_str());
    }
}
