//! Key to name mapping held on behalf of one owner
//!
//! A name can sit under several keys of the same index. Ownership is kept
//! consistent from both directions:
//!
//! - [`NameIndex::put`] and [`NameIndex::remove`] clear the owner of a name
//!   that is no longer reachable through any key.
//! - An [`OwnershipMonitor`] on every indexed name drops all of its keys as
//!   soon as the name is handed to a different owner.

mod monitor;

pub use monitor::OwnershipMonitor;

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::name::{Name, NameObserver};
use crate::owner::OwnerRef;
use crate::value::Key;

use monitor::Entries;

/// Names of one owner, by key
///
/// Keys keep insertion order. `put` and `remove` scan the whole index, which
/// is fine for per-entity name sets and not meant for global tables.
pub struct NameIndex {
    owner: OwnerRef,
    entries: Rc<Entries>,
    monitor: Rc<OwnershipMonitor>,
}

impl NameIndex {
    pub fn new(owner: OwnerRef) -> Self {
        let entries: Rc<Entries> = Rc::new(RefCell::new(IndexMap::new()));
        let monitor = Rc::new(OwnershipMonitor::new(
            owner.clone(),
            Rc::downgrade(&entries),
        ));
        Self {
            owner,
            entries,
            monitor,
        }
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    /// The name filed under `key`
    pub fn get(&self, key: &Key) -> Option<Name> {
        self.entries.borrow().get(key).cloned()
    }

    /// File `name` under `key`, returning the name it displaced
    ///
    /// Putting a name under the key it already occupies changes nothing and
    /// returns that same name. Otherwise `name` becomes owned by this index's
    /// owner, which evicts it from whichever index held it before.
    pub fn put(&self, key: Key, name: Name) -> Option<Name> {
        if let Some(current) = self.get(&key) {
            if Name::ptr_eq(&current, &name) {
                return Some(current);
            }
        }

        name.set_owner(Some(self.owner.clone()));
        let monitor = self.monitor_handle();
        if !name.has_observer(&monitor) {
            name.add_observer(monitor);
        }

        let previous = self.entries.borrow_mut().insert(key, name);
        if let Some(previous) = &previous {
            self.disown(previous);
        }
        previous
    }

    /// Remove the name filed under `key`
    pub fn remove(&self, key: &Key) -> Option<Name> {
        let removed = self.entries.borrow_mut().shift_remove(key);
        if let Some(removed) = &removed {
            self.disown(removed);
        }
        removed
    }

    pub fn keys(&self) -> Vec<Key> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Indexed names, one entry per key
    pub fn names(&self) -> Vec<Name> {
        self.entries.borrow().values().cloned().collect()
    }

    /// Keys under which `name` itself is filed
    pub fn keys_of(&self, name: &Name) -> Vec<Key> {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, indexed)| Name::ptr_eq(indexed, name))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Whether `name` itself is filed under any key
    pub fn contains(&self, name: &Name) -> bool {
        self.entries
            .borrow()
            .values()
            .any(|indexed| Name::ptr_eq(indexed, name))
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn monitor_handle(&self) -> Rc<dyn NameObserver> {
        self.monitor.clone()
    }

    /// Orphan `name` if no key reaches it any more
    fn disown(&self, name: &Name) {
        if self.contains(name) {
            return;
        }
        // It may already belong to someone else
        if name.owner().as_ref() == Some(&self.owner) {
            tracing::debug!(value = %name.raw_value(), "orphaned name no longer indexed");
            name.set_owner(None);
        }
    }
}

impl std::fmt::Debug for NameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameIndex")
            .field("owner", &self.owner)
            .field("keys", &self.keys())
            .finish()
    }
}
