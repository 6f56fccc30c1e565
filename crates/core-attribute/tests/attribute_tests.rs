//! Integration tests for the attribute model.

use core_attribute::{AttributeError, AttributeValue, IdpAttribute};
use std::collections::BTreeSet;

#[test]
fn attribute_keeps_value_order() {
    let attribute = IdpAttribute::new("eduPersonAffiliation")
        .unwrap()
        .with_value(AttributeValue::from("member"))
        .with_value(AttributeValue::from("student"))
        .with_value(AttributeValue::from("staff"));

    let order: Vec<_> = attribute
        .values()
        .iter()
        .filter_map(AttributeValue::as_str)
        .collect();
    assert_eq!(order, ["member", "student", "staff"]);
}

#[test]
fn whitespace_ids_are_rejected() {
    assert!(matches!(IdpAttribute::new(" \t"), Err(AttributeError::EmptyId)));
}

#[test]
fn value_set_deduplicates() {
    let attribute = IdpAttribute::new("mail")
        .unwrap()
        .with_value(AttributeValue::from("a@x"))
        .with_value(AttributeValue::from("a@x"))
        .with_value(AttributeValue::from("b@x"));

    assert_eq!(attribute.values().len(), 3);
    assert_eq!(attribute.value_set().len(), 2);
}

#[test]
fn filtered_clone_with_empty_keep_set_is_empty() {
    let attribute = IdpAttribute::new("mail")
        .unwrap()
        .with_value(AttributeValue::from("a@x"));

    let filtered = attribute.filtered_clone(&BTreeSet::new());
    assert_eq!(filtered.id(), "mail");
    assert!(filtered.values().is_empty());
}

#[test]
fn scoped_and_plain_values_are_distinct() {
    let scoped = AttributeValue::scoped("staff", "example.org");
    let plain = AttributeValue::from("staff");
    assert_ne!(scoped, plain);

    let attribute = IdpAttribute::new("eduPersonScopedAffiliation")
        .unwrap()
        .with_value(scoped.clone())
        .with_value(plain.clone());

    let keep: BTreeSet<_> = [scoped.clone()].into_iter().collect();
    assert_eq!(attribute.filtered_clone(&keep).values(), &[scoped]);
}
