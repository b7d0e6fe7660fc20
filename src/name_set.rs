//! Ready-made owner backed by its own index

use std::rc::Rc;
use std::sync::Arc;

use crate::error::NameError;
use crate::index::NameIndex;
use crate::intern::Interner;
use crate::name::Name;
use crate::owner::{Owner, OwnerRef};
use crate::value::{Key, RawValue};

/// An entity known by a set of keyed names
///
/// Always lives behind an `Rc` so its names can point back at it.
///
/// ```
/// use std::sync::Arc;
/// use nametag::{Interner, NameSet};
///
/// let laird = NameSet::new(Arc::new(Interner::default()));
/// laird.name("first", "Laird", true).unwrap();
/// laird.name("last", "Nelson", true).unwrap();
/// let full = laird.name("full", "${first} ${last}", false).unwrap();
/// assert_eq!(full.value().unwrap(), "Laird Nelson");
/// ```
#[derive(Debug)]
pub struct NameSet {
    index: NameIndex,
    interner: Arc<Interner>,
}

impl NameSet {
    pub fn new(interner: Arc<Interner>) -> Rc<Self> {
        Rc::new_cyclic(|me| NameSet {
            index: NameIndex::new(OwnerRef::from_weak(me.clone())),
            interner,
        })
    }

    pub fn owner_ref(&self) -> &OwnerRef {
        self.index.owner()
    }

    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    pub fn interner(&self) -> &Arc<Interner> {
        &self.interner
    }

    pub fn get(&self, key: &Key) -> Option<Name> {
        self.index.get(key)
    }

    pub fn put(&self, key: Key, name: Name) -> Option<Name> {
        self.index.put(key, name)
    }

    pub fn remove(&self, key: &Key) -> Option<Name> {
        self.index.remove(key)
    }

    pub fn keys(&self) -> Vec<Key> {
        self.index.keys()
    }

    pub fn names(&self) -> Vec<Name> {
        self.index.names()
    }

    /// A name for `value`, shared with any key that already holds it
    ///
    /// Reuses a name of this set whose raw value equals `value`, otherwise
    /// creates a new unowned one.
    pub fn name_for(&self, value: RawValue) -> Name {
        self.index
            .names()
            .into_iter()
            .find(|name| name.raw_value() == value)
            .unwrap_or_else(|| Name::new(value))
    }

    /// File a name for `value` under `key` and return it
    pub fn put_value(&self, key: Key, value: RawValue) -> Name {
        let name = self.name_for(value);
        self.index.put(key, name.clone());
        name
    }

    /// Intern `key` and `value` and file the resulting name
    pub fn name(&self, key: &str, value: &str, atomic: bool) -> Result<Name, NameError> {
        let key = self.interner.intern_key(key)?;
        let value = self.interner.intern_value(value, atomic);
        Ok(self.put_value(key, value))
    }

    /// Computed value of the name under `key`
    pub fn value_of(&self, key: &str) -> Result<Option<String>, NameError> {
        let key = Key::new(key)?;
        self.get(&key).map(|name| name.value()).transpose()
    }
}

impl Owner for NameSet {
    fn resolve(&self, key: &Key) -> Option<Name> {
        self.index.get(key)
    }
}
