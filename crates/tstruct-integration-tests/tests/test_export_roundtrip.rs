//! Property tests: exporting an instance and constructing again is a fixed
//! point, and export drops exactly the undeclared keys.

mod common;

use proptest::prelude::*;
use tstruct_core::{Definition, Mapping, StructType, Value};
use tstruct_types::{array_of, coercible, strict, DescriptorExt};

fn profile_type() -> StructType {
    common::init_tracing();
    let profile = StructType::define("Profile");
    profile
        .attribute("name", strict::string())
        .unwrap()
        .attribute("age", coercible::integer())
        .unwrap()
        .attribute("active", strict::boolean().default(false))
        .unwrap()
        .attribute("tags", array_of(strict::string()))
        .unwrap()
        .attribute(
            "address",
            Definition::block(|a| {
                a.attribute("city", strict::string())?;
                a.attribute("zipcode", coercible::string())?;
                Ok(())
            }),
        )
        .unwrap();
    profile
}

fn raw_profile() -> impl Strategy<Value = Mapping> {
    (
        "[a-zA-Z ]{0,12}",
        any::<i32>(),
        proptest::option::of(any::<bool>()),
        prop::collection::vec("[a-z]{1,6}", 0..4),
        "[A-Z][a-z]{0,8}",
        0u32..99_999,
        proptest::option::of("[a-z]{1,6}"),
    )
        .prop_map(|(name, age, active, tags, city, zipcode, extra)| {
            let mut raw = Mapping::new();
            raw.insert("name".into(), Value::from(name));
            raw.insert("age".into(), Value::from(age.to_string()));
            if let Some(active) = active {
                raw.insert("active".into(), Value::Bool(active));
            }
            raw.insert(
                "tags".into(),
                Value::List(tags.into_iter().map(Value::from).collect()),
            );
            let address: Value = [
                ("city", Value::from(city)),
                ("zipcode", Value::Int(i64::from(zipcode))),
            ]
            .into_iter()
            .collect();
            raw.insert("address".into(), address);
            if let Some(extra) = extra {
                raw.insert("undeclared".into(), Value::from(extra));
            }
            raw
        })
}

proptest! {
    /// construct ∘ to_mapping is idempotent.
    #[test]
    fn construct_after_export_is_a_fixed_point(raw in raw_profile()) {
        let profile = profile_type();
        let first = profile.construct(raw).unwrap();
        let exported = first.to_mapping();
        let second = profile.construct(exported.clone()).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(second.to_mapping(), exported);
    }

    /// Export holds only declared keys, in declaration order.
    #[test]
    fn export_drops_undeclared_keys(raw in raw_profile()) {
        let profile = profile_type();
        let exported = profile.construct(raw).unwrap().to_mapping();
        let keys: Vec<&str> = exported.keys().map(String::as_str).collect();
        prop_assert_eq!(keys, ["name", "age", "active", "tags", "address"]);
        prop_assert!(matches!(exported["address"], Value::Map(_)));
    }

    /// JSON export agrees with the Serialize impl.
    #[test]
    fn json_export_matches_serde(raw in raw_profile()) {
        let instance = profile_type().construct(raw).unwrap();
        prop_assert_eq!(serde_json::to_value(&instance).unwrap(), instance.to_json());
    }
}
