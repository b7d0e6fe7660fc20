//! Integration tests for computing template names

use std::rc::Rc;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use nametag::{EvaluationError, Interner, Name, NameError, NameSet, RawValue, Whitespace};

fn laird() -> Rc<NameSet> {
    let set = NameSet::new(Arc::new(Interner::default()));
    set.name("firstName", "Laird", true).unwrap();
    set.name("middleName", "Jarrett", true).unwrap();
    set.name("lastName", "Nelson", true).unwrap();
    set
}

#[test]
fn test_full_name_collapses_whitespace() {
    let set = laird();
    let full = set
        .name("fullName", "${firstName}        ${middleName} ${lastName}", false)
        .unwrap();
    insta::assert_snapshot!(full.value().unwrap(), @"Laird Jarrett Nelson");
}

#[test]
fn test_value_is_recomputed_on_every_read() {
    let set = laird();
    let full = set.name("fullName", "${firstName} ${lastName}", false).unwrap();
    assert_eq!(full.value().unwrap(), "Laird Nelson");

    set.name("lastName", "Nelson-Smith", true).unwrap();
    assert_eq!(full.value().unwrap(), "Laird Nelson-Smith");
}

#[test]
fn test_nested_templates() {
    let set = laird();
    set.name("short", "${firstName} ${lastName}", false).unwrap();
    let formal = set.name("formal", "Mr. ${short}", false).unwrap();
    assert_eq!(formal.value().unwrap(), "Mr. Laird Nelson");
}

#[test]
fn test_bad_syntax_then_recovery() {
    let set = laird();
    let bad = set.name("bad", "${BAD SYNTAX", false).unwrap();

    let err = bad.value().unwrap_err();
    let NameError::Compile(compile) = &err else {
        panic!("expected compile error, got {err:?}");
    };
    assert!(!compile.errors.is_empty());
    assert!(!compile.format("bad").is_empty());

    bad.set_value(RawValue::template("${firstName}"));
    assert_eq!(bad.value().unwrap(), "Laird");
}

#[test]
fn test_unowned_template_is_empty() {
    let name = Name::new(RawValue::template("${firstName}"));
    assert_eq!(name.value().unwrap(), "");
    assert_eq!(name.to_string(), "");
}

#[test]
fn test_unresolved_reference() {
    let set = laird();
    let name = set.name("nick", "${nickName}", false).unwrap();
    match name.value() {
        Err(NameError::Evaluation(EvaluationError::Unresolved { key })) => {
            assert_eq!(key, "nickName")
        }
        other => panic!("expected unresolved reference, got {other:?}"),
    }
}

#[test]
fn test_circular_reference() {
    let set = laird();
    let a = set.name("a", "${b}", false).unwrap();
    set.name("b", "x ${a}", false).unwrap();
    let err = a.value().unwrap_err();
    assert!(matches!(
        err,
        NameError::Evaluation(EvaluationError::CircularReference { .. })
    ));
    insta::assert_snapshot!(err.to_string(), @"circular name reference detected: b -> a");
}

#[test]
fn test_self_reference() {
    let set = laird();
    let me = set.name("me", "${me}", false).unwrap();
    assert!(matches!(
        me.value(),
        Err(NameError::Evaluation(EvaluationError::CircularReference { .. }))
    ));
}

#[test]
fn test_empty_template() {
    let set = laird();
    let empty = set.name("empty", "", false).unwrap();
    assert_eq!(empty.value().unwrap(), "");
}

#[test]
fn test_dollar_without_brace_is_literal() {
    let set = laird();
    let price = set.name("price", "$5 for ${firstName}", false).unwrap();
    assert_eq!(price.value().unwrap(), "$5 for Laird");
}

#[test]
fn test_preserved_whitespace() {
    let set = laird();
    let value = RawValue::new("${firstName}\t${lastName}", false, Whitespace::Preserve);
    let name = set.put_value(set.interner().intern_key("tabbed").unwrap(), value);
    assert_eq!(name.value().unwrap(), "Laird\tNelson");
}
