use std::collections::{HashMap, HashSet};

use crate::error::{BindingError, TransferError};

use super::{Access, Handle, Resource};

#[derive(Debug)]
struct Entry<T> {
    resource: Resource,
    access: Access,
    port: T,
}

/// Handle allocation for a host.
///
/// Each `(resource, access)` pair is bound at most once at a time; binding
/// it again before release fails with [`BindingError::AlreadyBound`]. Handles
/// are never reused within one table.
#[derive(Debug)]
pub struct BindingTable<T> {
    next: u64,
    entries: HashMap<Handle, Entry<T>>,
    bound: HashSet<(Resource, Access)>,
}

impl<T> Default for BindingTable<T> {
    fn default() -> Self {
        Self {
            next: 0,
            entries: HashMap::new(),
            bound: HashSet::new(),
        }
    }
}

impl<T> BindingTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `resource` for `access`, opening the port with `open` only when
    /// the pair is free.
    ///
    /// # Errors
    ///
    /// [`BindingError::AlreadyBound`] when the pair is bound,
    /// [`BindingError::HandlesExhausted`] once every handle has been issued,
    /// or whatever `open` returns.
    pub fn bind<F>(
        &mut self,
        resource: &Resource,
        access: Access,
        open: F,
    ) -> Result<Handle, BindingError>
    where
        F: FnOnce(&Resource) -> Result<T, BindingError>,
    {
        let key = (resource.clone(), access);
        if self.bound.contains(&key) {
            return Err(BindingError::AlreadyBound {
                resource: resource.clone(),
                access,
            });
        }

        let next = self
            .next
            .checked_add(1)
            .ok_or(BindingError::HandlesExhausted)?;
        let port = open(resource)?;
        let handle = Handle(self.next);
        self.next = next;
        self.bound.insert(key);
        self.entries.insert(
            handle,
            Entry {
                resource: resource.clone(),
                access,
                port,
            },
        );
        Ok(handle)
    }

    /// Looks up a live handle bound for `access`.
    ///
    /// # Errors
    ///
    /// [`TransferError::Released`] for an unknown handle and
    /// [`TransferError::WrongDirection`] when it is bound the other way.
    pub fn port_mut(
        &mut self,
        handle: Handle,
        access: Access,
    ) -> Result<(&Resource, &mut T), TransferError> {
        let entry = self
            .entries
            .get_mut(&handle)
            .ok_or(TransferError::Released { handle })?;
        if entry.access != access {
            return Err(TransferError::WrongDirection {
                handle,
                attempted: access,
            });
        }
        Ok((&entry.resource, &mut entry.port))
    }

    /// # Errors
    ///
    /// [`TransferError::Released`] when the handle is not bound.
    pub fn release(&mut self, handle: Handle) -> Result<(Resource, T), TransferError> {
        let entry = self
            .entries
            .remove(&handle)
            .ok_or(TransferError::Released { handle })?;
        self.bound.remove(&(entry.resource.clone(), entry.access));
        Ok((entry.resource, entry.port))
    }

    #[must_use]
    pub fn is_bound(&self, resource: &Resource, access: Access) -> bool {
        self.bound.contains(&(resource.clone(), access))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_unit(_: &Resource) -> Result<(), BindingError> {
        Ok(())
    }

    #[test]
    fn same_pair_binds_once_until_released() {
        let mut table = BindingTable::new();
        let log = Resource::path("log.txt");

        let handle = table.bind(&log, Access::Write, open_unit).unwrap();
        assert!(matches!(
            table.bind(&log, Access::Write, open_unit),
            Err(BindingError::AlreadyBound { .. })
        ));
        // The other direction is a separate binding.
        let reader = table.bind(&log, Access::Read, open_unit).unwrap();
        assert_ne!(handle, reader);

        table.release(handle).unwrap();
        let again = table.bind(&log, Access::Write, open_unit).unwrap();
        assert_ne!(again, handle, "handles are not reused");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn open_failure_leaves_pair_free() {
        let mut table: BindingTable<()> = BindingTable::new();
        let missing = Resource::path("missing");
        let err = table
            .bind(&missing, Access::Read, |r| Err(BindingError::NotFound(r.clone())))
            .unwrap_err();
        assert!(matches!(err, BindingError::NotFound(_)));
        assert!(!table.is_bound(&missing, Access::Read));
        assert!(table.is_empty());
    }

    #[test]
    fn last_handle_is_issued_once_and_never_wraps() {
        let mut table = BindingTable::new();
        table.next = u64::MAX - 1;

        let last = table.bind(&Resource::Stdout, Access::Write, open_unit).unwrap();
        assert_eq!(last, Handle(u64::MAX - 1));
        table.release(last).unwrap();

        assert!(matches!(
            table.bind(&Resource::Stdout, Access::Write, open_unit),
            Err(BindingError::HandlesExhausted)
        ));
        assert!(!table.is_bound(&Resource::Stdout, Access::Write));
        assert!(table.is_empty());
    }

    #[test]
    fn lookups_check_handle_and_direction() {
        let mut table = BindingTable::new();
        let handle = table.bind(&Resource::Stdout, Access::Write, open_unit).unwrap();

        assert!(table.port_mut(handle, Access::Write).is_ok());
        assert!(matches!(
            table.port_mut(handle, Access::Read),
            Err(TransferError::WrongDirection { .. })
        ));

        table.release(handle).unwrap();
        assert!(matches!(
            table.port_mut(handle, Access::Write),
            Err(TransferError::Released { .. })
        ));
        assert!(matches!(table.release(handle), Err(TransferError::Released { .. })));
    }
}
