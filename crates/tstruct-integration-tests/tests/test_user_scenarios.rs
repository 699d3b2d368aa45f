//! End-to-end construction scenarios for a `User` with a nested `Address`.
//!
//! Exercises the engine together with the reference descriptor library:
//! coercion, nested structs, defaults, unknown keys, re-derivation, and
//! instance pass-through.

mod common;

use serde_json::json;
use tstruct_core::{FailureKind, StructType, Value};
use tstruct_types::{coercible, strict, DescriptorExt};

fn address_type() -> StructType {
    let address = StructType::define("Address");
    address
        .attribute("city", strict::string())
        .unwrap()
        .attribute("zipcode", coercible::string())
        .unwrap();
    address
}

fn user_type(address: &StructType) -> StructType {
    let user = StructType::define("User");
    user.attribute("name", coercible::string())
        .unwrap()
        .attribute("age", coercible::integer())
        .unwrap()
        .attribute("address", address.clone())
        .unwrap();
    user
}

// ---------------------------------------------------------------------------
// Nested construction
// ---------------------------------------------------------------------------

#[test]
fn user_with_address_is_coerced() {
    common::init_tracing();
    let user = user_type(&address_type());

    let jane = user
        .construct_json(&json!({
            "name": "Jane",
            "age": "21",
            "address": {"city": "NYC", "zipcode": 123}
        }))
        .unwrap();

    assert_eq!(
        jane.to_json(),
        json!({
            "name": "Jane",
            "age": 21,
            "address": {"city": "NYC", "zipcode": "123"}
        })
    );
    let address = jane.get("address").unwrap().as_struct().unwrap();
    assert_eq!(address.type_name(), "Address");
}

#[test]
fn missing_city_is_tagged_with_address() {
    common::init_tracing();
    let user = user_type(&address_type());

    let err = user
        .construct_json(&json!({
            "name": "Jane",
            "age": "21",
            "address": {"zipcode": 123}
        }))
        .unwrap_err();

    assert!(err.is_missing_key());
    assert_eq!(err.key(), Some("city"));
    assert_eq!(err.origin(), "Address");
    assert_eq!(err.type_name(), "User");
    assert_eq!(
        err.to_string(),
        "[Address.new] :city is missing in Hash input (via User.new at address.city)"
    );
}

#[test]
fn existing_address_instance_is_shared() {
    common::init_tracing();
    let address = address_type();
    let user = user_type(&address);

    let home = address
        .construct_json(&json!({"city": "NYC", "zipcode": "10001"}))
        .unwrap();
    let mut input = tstruct_core::Mapping::new();
    input.insert("name".into(), Value::from("Jane"));
    input.insert("age".into(), Value::Int(21));
    input.insert("address".into(), Value::from(home.clone()));

    let jane = user.construct(input).unwrap();
    let nested = jane.get("address").unwrap().as_struct().unwrap();
    assert!(nested.ptr_eq(&home));
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn admin_defaults_to_true() {
    common::init_tracing();
    let user = StructType::define("User");
    user.attribute("name", strict::string())
        .unwrap()
        .attribute("age", coercible::integer())
        .unwrap()
        .attribute("admin", strict::boolean().default(true))
        .unwrap();

    let jane = user.construct_json(&json!({"name": "Jane", "age": 21})).unwrap();
    assert_eq!(jane.get("admin").unwrap(), &Value::Bool(true));

    let err = user
        .construct_json(&json!({"name": "Jane", "age": 21, "admin": "true"}))
        .unwrap_err();
    assert!(err.is_invalid_type());
    assert_eq!(err.key(), Some("admin"));
    assert_eq!(
        err.kind(),
        &FailureKind::InvalidType {
            key: "admin".into(),
            expected: "strict.bool".into(),
            actual: "\"true\"".into(),
        }
    );
}

#[test]
fn producer_default_is_fresh_per_construction() {
    common::init_tracing();
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    let next = Arc::new(AtomicI64::new(1));
    let ticket = StructType::define("Ticket");
    let counter = Arc::clone(&next);
    ticket
        .attribute(
            "number",
            strict::integer().default_with(move || Value::Int(counter.fetch_add(1, Ordering::SeqCst))),
        )
        .unwrap();

    let first = ticket.construct_default().unwrap();
    let second = ticket.construct_default().unwrap();
    assert_eq!(first.get("number").unwrap(), &Value::Int(1));
    assert_eq!(second.get("number").unwrap(), &Value::Int(2));
}

// ---------------------------------------------------------------------------
// Unknown keys
// ---------------------------------------------------------------------------

#[test]
fn unknown_key_is_dropped() {
    common::init_tracing();
    let user = user_type(&address_type());
    let jane = user
        .construct_json(&json!({
            "name": "Jane",
            "age": 21,
            "invalid": true,
            "address": {"city": "NYC", "zipcode": "1"}
        }))
        .unwrap();
    assert!(jane.get("invalid").is_err());
    assert_eq!(jane.attributes().len(), 3);
}

// ---------------------------------------------------------------------------
// Keyed access errors
// ---------------------------------------------------------------------------

#[test]
fn missing_and_invalid_keys_are_named() {
    common::init_tracing();
    let user = user_type(&address_type());

    let err = user
        .construct_json(&json!({"name": "Jane", "address": {"city": "NYC", "zipcode": "1"}}))
        .unwrap_err();
    assert_eq!(err.kind(), &FailureKind::MissingKey { key: "age".into() });

    let err = user
        .construct_json(&json!({
            "name": "Jane",
            "age": "twenty",
            "address": {"city": "NYC", "zipcode": "1"}
        }))
        .unwrap_err();
    assert!(err.is_invalid_type());
    assert_eq!(err.key(), Some("age"));
}

// ---------------------------------------------------------------------------
// Re-derivation
// ---------------------------------------------------------------------------

#[test]
fn with_changes_builds_a_new_instance() {
    common::init_tracing();
    let user = user_type(&address_type());
    let jane = user
        .construct_json(&json!({
            "name": "Jane",
            "age": 21,
            "address": {"city": "NYC", "zipcode": "1"}
        }))
        .unwrap();

    let older = jane.with_changes([("age", "22")]).unwrap();
    assert_eq!(older.get("age").unwrap(), &Value::Int(22));
    assert_eq!(jane.get("age").unwrap(), &Value::Int(21));
    assert!(!older.ptr_eq(&jane));

    let moved = jane
        .with_changes([("address", Value::from(json!({"city": "LA", "zipcode": 90001})))])
        .unwrap();
    assert_eq!(
        moved.to_json()["address"],
        json!({"city": "LA", "zipcode": "90001"})
    );
}

#[test]
fn same_input_gives_equal_instances() {
    common::init_tracing();
    let user = user_type(&address_type());
    let input = json!({
        "name": "Jane",
        "age": 21,
        "address": {"city": "NYC", "zipcode": "1"}
    });
    assert_eq!(
        user.construct_json(&input).unwrap(),
        user.construct_json(&input).unwrap()
    );
}
