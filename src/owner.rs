//! The owner contract and the weak handle names keep to their owner

use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::NameError;
use crate::name::Name;
use crate::template::{EvaluationError, Scope};
use crate::value::Key;

/// Anything that can resolve a key to one of its names
///
/// This is all a template needs from the owner of the name being computed.
pub trait Owner {
    fn resolve(&self, key: &Key) -> Option<Name>;
}

/// Non-owning reference from a name back to its owner
///
/// Two handles are equal iff they point at the same owner object.
#[derive(Clone)]
pub struct OwnerRef(Weak<dyn Owner>);

impl OwnerRef {
    pub fn new<O: Owner + 'static>(owner: &Rc<O>) -> Self {
        Self::from_weak(Rc::downgrade(owner))
    }

    /// Build a handle from a weak pointer, e.g. inside `Rc::new_cyclic`
    pub fn from_weak<O: Owner + 'static>(owner: Weak<O>) -> Self {
        Self(owner)
    }

    /// The owner, if it is still alive
    pub fn upgrade(&self) -> Option<Rc<dyn Owner>> {
        self.0.upgrade()
    }

    /// Whether this handle points at `owner`
    pub fn is<O: Owner + 'static>(&self, owner: &Rc<O>) -> bool {
        *self == Self::new(owner)
    }
}

impl PartialEq for OwnerRef {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for OwnerRef {}

impl fmt::Debug for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnerRef")
            .field(&self.0.as_ptr().cast::<()>())
            .finish()
    }
}

/// Resolution scope bound to one owner for a single template execution
pub(crate) struct OwnerScope<'a> {
    owner: &'a dyn Owner,
}

impl<'a> OwnerScope<'a> {
    pub(crate) fn new(owner: &'a dyn Owner) -> Self {
        Self { owner }
    }
}

impl Scope for OwnerScope<'_> {
    fn lookup(&self, key: &str) -> Result<Option<String>, EvaluationError> {
        let Ok(lookup_key) = Key::new(key) else {
            return Ok(None);
        };
        let Some(name) = self.owner.resolve(&lookup_key) else {
            return Ok(None);
        };
        match name.value() {
            Ok(value) => Ok(Some(value)),
            Err(NameError::Evaluation(EvaluationError::CircularReference { chain })) => {
                let chain = if chain.is_empty() {
                    key.to_string()
                } else {
                    format!("{key} -> {chain}")
                };
                Err(EvaluationError::circular(chain))
            }
            Err(NameError::Evaluation(e)) => Err(e),
            Err(e) => Err(EvaluationError::failed(key, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nobody;

    impl Owner for Nobody {
        fn resolve(&self, _key: &Key) -> Option<Name> {
            None
        }
    }

    #[test]
    fn test_owner_ref_identity() {
        let a = Rc::new(Nobody);
        let b = Rc::new(Nobody);
        assert_eq!(OwnerRef::new(&a), OwnerRef::new(&a));
        assert_ne!(OwnerRef::new(&a), OwnerRef::new(&b));
        assert!(OwnerRef::new(&a).is(&a));
        assert!(!OwnerRef::new(&a).is(&b));
    }

    #[test]
    fn test_owner_ref_does_not_keep_owner_alive() {
        let a = Rc::new(Nobody);
        let handle = OwnerRef::new(&a);
        assert!(handle.upgrade().is_some());
        drop(a);
        assert!(handle.upgrade().is_none());
    }

    #[test]
    fn test_scope_missing_key() {
        let owner = Nobody;
        let scope = OwnerScope::new(&owner);
        assert_eq!(scope.lookup("first").unwrap(), None);
    }
}
