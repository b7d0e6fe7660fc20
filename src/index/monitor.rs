//! Evicts a name from an index once the name moves to another owner

use std::cell::RefCell;
use std::rc::Weak;

use indexmap::IndexMap;

use crate::name::{Name, NameEvent, NameObserver, Subscription};
use crate::owner::OwnerRef;
use crate::value::Key;

pub(super) type Entries = RefCell<IndexMap<Key, Name>>;

/// Observer attached to every name an index holds
///
/// When a name's owner changes away from the index's owner, every key that
/// still points at that name is dropped and the monitor detaches itself.
/// The monitor only holds a weak handle to the entries, so a name that
/// outlives its old index does not keep the index alive.
pub struct OwnershipMonitor {
    owner: OwnerRef,
    entries: Weak<Entries>,
}

impl OwnershipMonitor {
    pub(super) fn new(owner: OwnerRef, entries: Weak<Entries>) -> Self {
        Self { owner, entries }
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }
}

impl NameObserver for OwnershipMonitor {
    fn name_changed(&self, name: &Name, event: &NameEvent) -> Subscription {
        let NameEvent::OwnerChanged { old, new } = event else {
            return Subscription::Keep;
        };
        if old.as_ref() != Some(&self.owner) || new.as_ref() == Some(&self.owner) {
            return Subscription::Keep;
        }

        if let Some(entries) = self.entries.upgrade() {
            let mut entries = entries.borrow_mut();
            let before = entries.len();
            entries.retain(|_, indexed| !Name::ptr_eq(indexed, name));
            let evicted = before - entries.len();
            if evicted > 0 {
                tracing::debug!(evicted, "dropped stale index entries after owner change");
            }
        }
        Subscription::Detach
    }
}

impl std::fmt::Debug for OwnershipMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipMonitor")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
