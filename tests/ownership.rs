//! Integration tests for name ownership across owners and keys

use std::rc::Rc;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use nametag::{Interner, Key, Name, NameSet, OwnerRef, RawValue};

fn dude(interner: &Arc<Interner>) -> Rc<NameSet> {
    NameSet::new(interner.clone())
}

fn key_strings(set: &NameSet) -> Vec<String> {
    set.keys().iter().map(Key::to_string).collect()
}

#[test]
fn test_reassigning_owner_clears_every_key() {
    let interner = Arc::new(Interner::default());
    let dude1 = dude(&interner);
    let dude2 = dude(&interner);

    let laird = Name::new(RawValue::literal("Laird"));
    dude1.put(interner.intern_key("first").unwrap(), laird.clone());
    dude1.put(interner.intern_key("preferred").unwrap(), laird.clone());
    assert_eq!(key_strings(&dude1), vec!["first", "preferred"]);

    laird.set_owner(Some(dude2.owner_ref().clone()));

    assert!(dude1.keys().is_empty());
    assert!(dude1.names().is_empty());
    assert_eq!(laird.owner().as_ref(), Some(dude2.owner_ref()));
}

#[test]
fn test_put_is_idempotent_per_key() {
    let interner = Arc::new(Interner::default());
    let laird = dude(&interner);
    let name = Name::new(RawValue::literal("Laird"));
    let first = interner.intern_key("first").unwrap();

    assert!(laird.put(first.clone(), name.clone()).is_none());
    let again = laird.put(first, name.clone()).unwrap();

    assert!(Name::ptr_eq(&again, &name));
    assert_eq!(name.observer_count(), 1);
    assert_eq!(laird.names().len(), 1);
}

#[test]
fn test_orphaned_only_when_unreachable() {
    let interner = Arc::new(Interner::default());
    let person = dude(&interner);
    let first = interner.intern_key("first").unwrap();
    let preferred = interner.intern_key("preferred").unwrap();

    let laird = Name::new(RawValue::literal("Laird"));
    let lj = Name::new(RawValue::literal("L. J."));
    person.put(first.clone(), laird.clone());
    person.put(preferred.clone(), laird.clone());

    person.put(preferred.clone(), lj.clone());
    assert!(laird.owner().unwrap().is(&person));

    person.put(first.clone(), lj.clone());
    assert!(laird.owner().is_none());
    assert!(lj.owner().unwrap().is(&person));
    assert_eq!(person.index().keys_of(&lj), vec![first, preferred]);
}

#[test]
fn test_remove_then_reuse_elsewhere() {
    let interner = Arc::new(Interner::default());
    let dude1 = dude(&interner);
    let dude2 = dude(&interner);
    let first = interner.intern_key("first").unwrap();

    let laird = dude1.put_value(first.clone(), RawValue::literal("Laird"));
    assert!(Name::ptr_eq(&dude1.remove(&first).unwrap(), &laird));
    assert!(laird.owner().is_none());
    assert_eq!(laird.observer_count(), 0);

    dude2.put(first.clone(), laird.clone());
    assert!(dude1.get(&first).is_none());
    assert!(Name::ptr_eq(&dude2.get(&first).unwrap(), &laird));
}

#[test]
fn test_equal_names_are_distinct_for_ownership() {
    let interner = Arc::new(Interner::default());
    let person = dude(&interner);
    let first = interner.intern_key("first").unwrap();
    let preferred = interner.intern_key("preferred").unwrap();

    let a = Name::new(RawValue::literal("Laird"));
    let b = Name::new(RawValue::literal("Laird"));
    assert_eq!(a, b);

    person.put(first.clone(), a.clone());
    person.put(preferred, b.clone());
    person.remove(&first);

    // `b` computes the same text but is a different name
    assert!(a.owner().is_none());
    assert!(b.owner().unwrap().is(&person));
}

#[test]
fn test_moving_name_keeps_templates_consistent() {
    let interner = Arc::new(Interner::default());
    let laird = dude(&interner);
    let other = dude(&interner);
    laird.name("first", "Laird", true).unwrap();
    let greeting = laird.name("greeting", "Hi ${first}", false).unwrap();
    assert_eq!(greeting.value().unwrap(), "Hi Laird");

    other.name("first", "Bob", true).unwrap();
    greeting.set_owner(Some(OwnerRef::new(&other)));

    assert!(laird.get(&interner.intern_key("greeting").unwrap()).is_none());
    assert_eq!(greeting.value().unwrap(), "Hi Bob");
}
