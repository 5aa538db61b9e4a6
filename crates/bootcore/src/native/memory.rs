use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use super::{Access, BindingTable, Handle, NativeHost, Resource};
use crate::error::{BindingError, TransferError};

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Reader { position: usize },
    Writer,
}

#[derive(Debug, Default)]
struct State {
    contents: HashMap<Resource, Vec<u8>>,
    table: BindingTable<Cursor>,
}

/// Host whose resources are byte vectors held in memory.
///
/// Console resources are ordinary entries: preload [`Resource::Stdin`] with
/// [`MemoryHost::insert`] and inspect what was printed with
/// [`MemoryHost::contents`]. Binding a resource for writing truncates it,
/// like creating a file. Reading sees bytes written after the reader was
/// bound.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<State>,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose standard input holds `input`.
    #[must_use]
    pub fn with_stdin(input: impl Into<Vec<u8>>) -> Self {
        let host = Self::new();
        host.insert(Resource::Stdin, input);
        host
    }

    /// Replaces the content of `resource`.
    pub fn insert(&self, resource: Resource, bytes: impl Into<Vec<u8>>) {
        self.lock().contents.insert(resource, bytes.into());
    }

    /// A copy of everything currently stored for `resource`.
    #[must_use]
    pub fn contents(&self, resource: &Resource) -> Option<Vec<u8>> {
        self.lock().contents.get(resource).cloned()
    }

    /// Number of live bindings.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.lock().table.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NativeHost for MemoryHost {
    fn bind(&self, resource: &Resource, access: Access) -> Result<Handle, BindingError> {
        let mut state = self.lock();
        let State { contents, table } = &mut *state;
        table.bind(resource, access, |resource| {
            resource.check_access(access)?;
            match access {
                Access::Read => {
                    if contents.contains_key(resource) {
                        Ok(Cursor::Reader { position: 0 })
                    } else if *resource == Resource::Stdin {
                        contents.insert(Resource::Stdin, Vec::new());
                        Ok(Cursor::Reader { position: 0 })
                    } else {
                        Err(BindingError::NotFound(resource.clone()))
                    }
                }
                Access::Write => {
                    contents.insert(resource.clone(), Vec::new());
                    Ok(Cursor::Writer)
                }
            }
        })
    }

    fn read_byte(&self, handle: Handle) -> Result<Option<u8>, TransferError> {
        let mut state = self.lock();
        let State { contents, table } = &mut *state;
        let (resource, cursor) = table.port_mut(handle, Access::Read)?;
        let Cursor::Reader { position } = cursor else {
            return Err(TransferError::WrongDirection {
                handle,
                attempted: Access::Read,
            });
        };

        let byte = contents
            .get(resource)
            .and_then(|bytes| bytes.get(*position))
            .copied();
        if byte.is_some() {
            *position += 1;
        }
        Ok(byte)
    }

    fn write_byte(&self, handle: Handle, byte: u8) -> Result<(), TransferError> {
        let mut state = self.lock();
        let State { contents, table } = &mut *state;
        let (resource, _) = table.port_mut(handle, Access::Write)?;
        contents.entry(resource.clone()).or_default().push(byte);
        Ok(())
    }

    fn flush(&self, handle: Handle) -> Result<(), TransferError> {
        self.lock().table.port_mut(handle, Access::Write).map(|_| ())
    }

    fn release(&self, handle: Handle) -> Result<(), TransferError> {
        self.lock().table.release(handle).map(|_| ())
    }
}
