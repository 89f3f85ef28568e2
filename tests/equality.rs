use memokit::prelude::*;
use proptest::prelude::*;

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-100i32..100).prop_map(Value::from),
        any::<i64>().prop_map(|n| n.to_value()),
        "[a-c]{0,2}".prop_map(Value::from),
    ];

    leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::array),
            prop::collection::vec(("[a-d]", inner), 0..4).prop_map(Value::object),
        ]
    })
}

/// Rebuild `value` with new allocations at every level.
fn deep_copy(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::array(items.iter().map(deep_copy)),
        Value::Object(object) => Value::object(
            object
                .iter()
                .map(|(key, value)| (key.clone(), deep_copy(value))),
        ),
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn comparators_are_reflexive(value in arb_value()) {
        prop_assert!(strict_equals(&value, &value));
        prop_assert!(shallow_equals(&value, &value));
        prop_assert!(deep_equals(&value, &value));
        prop_assert!(shallow_equals(&value, &value.shallow_copy()));
        prop_assert!(deep_equals(&value, &deep_copy(&value)));
    }

    #[test]
    fn comparators_are_symmetric(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(shallow_equals(&a, &b), shallow_equals(&b, &a));
        prop_assert_eq!(deep_equals(&a, &b), deep_equals(&b, &a));

        let c = deep_copy(&a);
        prop_assert_eq!(shallow_equals(&a, &c), shallow_equals(&c, &a));
    }

    #[test]
    fn shallow_equality_implies_deep_equality(a in arb_value(), b in arb_value()) {
        if shallow_equals(&a, &b) {
            prop_assert!(deep_equals(&a, &b));
        }
        prop_assert!(deep_equals(&a, &a.shallow_copy()));
    }

    #[test]
    fn comparators_are_idempotent(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(shallow_equals(&a, &b), shallow_equals(&a, &b));
        prop_assert_eq!(deep_equals(&a, &b), deep_equals(&a, &b));
    }

    #[test]
    fn arrays_of_different_lengths_are_unequal(
        items in prop::collection::vec(arb_value(), 0..4),
        extra in arb_value(),
    ) {
        let a = Value::array(items.iter().cloned());
        let b = Value::array(items.iter().cloned().chain([extra]));

        prop_assert!(!shallow_equals(&a, &b));
        prop_assert!(!deep_equals(&a, &b));
    }
}

#[test]
fn it_compares_empty_structures() {
    let empty_array = Value::array([]);
    let empty_object = Value::from(Object::new());

    assert!(shallow_equals(&empty_array, &Value::array([])));
    assert!(deep_equals(&empty_object, &Value::from(Object::new())));
    // Neither has keys.
    assert!(shallow_equals(&empty_array, &empty_object));
}

#[test]
fn it_distinguishes_nested_identity() {
    let make = || {
        Value::object([
            ("a", Value::from(1)),
            ("b", Value::object([("c", Value::from(2))])),
        ])
    };

    assert!(deep_equals(&make(), &make()));
    assert!(!shallow_equals(&make(), &make()));
}

#[test]
fn it_rejects_extra_keys() {
    let a = Value::object([("x", Value::from(1)), ("y", Value::from(2))]);
    let b = Value::object([("x", Value::from(1))]);

    assert!(!shallow_equals(&a, &b));
    assert!(!deep_equals(&a, &b));
}

#[test]
fn it_keeps_explicit_undefined_distinct_only_when_shallow() {
    let a = Value::object([("x", Value::from(1)), ("y", Value::Undefined)]);
    let b = Value::object([("x", Value::from(1))]);

    assert!(!shallow_equals(&a, &b));
    assert!(deep_equals(&a, &b));
}

#[test]
fn it_compares_typed_props() {
    #[derive(ToValue)]
    struct Props {
        name: String,
        tags: Vec<&'static str>,
    }

    let a = Props {
        name: String::from("a"),
        tags: vec!["x"],
    };
    let b = Props {
        name: String::from("a"),
        tags: vec!["x"],
    };

    assert!(Comparator::equals(&Deep, &a, &b));
    // Nested vectors convert to new arrays.
    assert!(!Comparator::equals(&Shallow, &a, &b));
}
