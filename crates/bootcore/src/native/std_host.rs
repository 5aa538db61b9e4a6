use std::{
    fs::File,
    io::{self, ErrorKind, Read, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use super::{Access, BindingTable, Handle, NativeHost, Resource};
use crate::error::{BindingError, TransferError};

#[derive(Debug, Clone)]
enum Port {
    Stdin,
    Stdout,
    Stderr,
    File(Arc<File>),
}

/// Bindings of the process's console handles and files, shared by every
/// [`StdHost`].
static TABLE: OnceLock<Mutex<BindingTable<Port>>> = OnceLock::new();

fn table() -> MutexGuard<'static, BindingTable<Port>> {
    TABLE
        .get_or_init(|| Mutex::new(BindingTable::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Host backed by the process console and the local file system.
///
/// All `StdHost` values share one process-wide binding table, so a file or
/// console handle is bound at most once per direction no matter how many
/// hosts exist. Paths are keyed by their canonical form; a path that does
/// not exist yet is keyed by its canonical parent directory.
///
/// Files bound for writing are created or truncated. Every byte is a separate
/// read or write call on the file; there is no buffering beyond what the
/// standard console handles do themselves. The table lock is not held across
/// the transfer, so a blocked console read does not stall other streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdHost;

impl StdHost {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn port(handle: Handle, access: Access) -> Result<(Resource, Port), TransferError> {
        let mut guard = table();
        let (resource, port) = guard.port_mut(handle, access)?;
        Ok((resource.clone(), port.clone()))
    }
}

fn canonical_path(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    parent
        .canonicalize()
        .map_or_else(|_| path.to_path_buf(), |parent| parent.join(name))
}

/// The key a resource is bound under.
fn canonical(resource: &Resource) -> Resource {
    match resource {
        Resource::Path(path) => Resource::Path(canonical_path(path)),
        console => console.clone(),
    }
}

fn open(resource: &Resource, access: Access) -> Result<Port, BindingError> {
    resource.check_access(access)?;
    let host_error = |source: io::Error| {
        if source.kind() == ErrorKind::NotFound {
            BindingError::NotFound(resource.clone())
        } else {
            BindingError::Host {
                resource: resource.clone(),
                source,
            }
        }
    };

    Ok(match resource {
        Resource::Stdin => Port::Stdin,
        Resource::Stdout => Port::Stdout,
        Resource::Stderr => Port::Stderr,
        Resource::Path(path) => {
            let file = match access {
                Access::Read => File::open(path),
                Access::Write => File::create(path),
            }
            .map_err(host_error)?;
            Port::File(Arc::new(file))
        }
    })
}

fn read_one(mut reader: impl Read) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

impl NativeHost for StdHost {
    fn bind(&self, resource: &Resource, access: Access) -> Result<Handle, BindingError> {
        let key = canonical(resource);
        table().bind(&key, access, |resource| open(resource, access))
    }

    fn read_byte(&self, handle: Handle) -> Result<Option<u8>, TransferError> {
        let (resource, port) = Self::port(handle, Access::Read)?;
        let result = match &port {
            Port::Stdin => read_one(io::stdin().lock()),
            Port::File(file) => read_one(&**file),
            Port::Stdout | Port::Stderr => unreachable!("output ports are never bound for reading"),
        };
        result.map_err(|source| TransferError::Read { resource, source })
    }

    fn write_byte(&self, handle: Handle, byte: u8) -> Result<(), TransferError> {
        let (resource, port) = Self::port(handle, Access::Write)?;
        let result = match &port {
            Port::Stdout => io::stdout().lock().write_all(&[byte]),
            Port::Stderr => io::stderr().lock().write_all(&[byte]),
            Port::File(file) => (&**file).write_all(&[byte]),
            Port::Stdin => unreachable!("stdin is never bound for writing"),
        };
        result.map_err(|source| TransferError::Write { resource, source })
    }

    fn flush(&self, handle: Handle) -> Result<(), TransferError> {
        let (resource, port) = Self::port(handle, Access::Write)?;
        let result = match &port {
            Port::Stdout => io::stdout().lock().flush(),
            Port::Stderr => io::stderr().lock().flush(),
            Port::File(file) => (&**file).flush(),
            Port::Stdin => Ok(()),
        };
        result.map_err(|source| TransferError::Write { resource, source })
    }

    fn release(&self, handle: Handle) -> Result<(), TransferError> {
        table().release(handle).map(|_| ())
    }
}
