//! Dispatch tables: literal, predicate, tuple, class, nested and recursive.

#![cfg(feature = "serde")]

use patma::prelude::*;
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

#[test]
fn literal_table() {
    let table = Dispatcher::builder()
        .case("a", "b")
        .call(2, |x: &Value, _: &Path, _: &Dispatcher| format!(":{x}"))
        .case("d", Handler::identity())
        .build();

    assert_eq!(table.call(&"a".into()), Some(Value::from("b")));
    assert_eq!(table.call(&2.into()), Some(Value::from(":2")));
    assert_eq!(table.call(&"d".into()), Some(Value::from("d")));
    assert_eq!(table.call(&"z".into()), None);
}

#[test]
fn predicate_table() {
    let table = dispatch([
        Case::new(is_null(), "null"),
        Case::new(all([is_int(), lt(0)]), "negative"),
        Case::new(is_numeric(), "number"),
        Case::new(is_string(), "string"),
        Case::new(is_container(), "container"),
    ]);

    for (input, expected) in [
        (json!(null), "null"),
        (json!([null, null]), "null"),
        (json!(-3), "negative"),
        (json!(4), "number"),
        (json!("4"), "number"),
        (json!("four"), "string"),
        (json!({"x": 4}), "container"),
    ] {
        assert_eq!(table.call(&v(input.clone())), Some(Value::from(expected)), "{input}");
    }
    assert_eq!(table.call(&Value::Bool(true)), None);
}

#[test]
fn tuple_table() {
    let table = Dispatcher::builder()
        .call(
            TypeSpec::list([is_string(), is_int()]),
            |x: &Value, _: &Path, _: &Dispatcher| {
                let items: Vec<String> = x
                    .as_container()
                    .map(|c| c.values().map(ToString::to_string).collect())
                    .unwrap_or_default();
                items.join("=")
            },
        )
        .case(TypeSpec::list([is_string()]), "single")
        .build();

    assert_eq!(table.call(&v(json!(["port", 80]))), Some(Value::from("port=80")));
    assert_eq!(table.call(&v(json!(["port", "80"]))), Some(Value::from("single")));
    assert_eq!(table.call(&v(json!([80]))), None);
}

#[test]
fn class_table() {
    let registry = TypeRegistry::builder()
        .interface("Shape")
        .class("Circle", ["Shape"])
        .class("Square", ["Shape"])
        .class("Unit", ["Square"])
        .build()
        .unwrap();

    let table = Dispatcher::builder()
        .case("Circle", "round")
        .case(registry.class_spec("Square").unwrap(), "square")
        .case("Shape", "shape")
        .build();

    let make = |name: &str| registry.instantiate::<&str>(name, []).unwrap();
    registry.scope(|| {
        assert_eq!(table.call(&make("Circle")), Some(Value::from("round")));
        assert_eq!(table.call(&make("Unit")), Some(Value::from("square")));
        assert_eq!(table.call(&make("Shape")), Some(Value::from("shape")));
        // declared names never match plain strings
        assert_eq!(table.call(&"Circle".into()), None);
        assert_eq!(table.call(&"Square".into()), None);
        assert_eq!(table.call(&"Shape".into()), None);
    });
}

#[test]
fn template_handler() {
    let table = Dispatcher::builder()
        .case(
            TypeSpec::map([("name", is_string())]),
            Handler::template([
                ("kind", Handler::from("user")),
                (
                    "name",
                    Handler::call(|x: &Value, _: &Path, _: &Dispatcher| {
                        x.as_container()
                            .and_then(|c| c.get(&Key::from("name")).cloned())
                    }),
                ),
            ]),
        )
        .build();

    assert_eq!(
        table.call(&v(json!({"name": "ann", "age": 31}))),
        Some(v(json!({"kind": "user", "name": "ann"})))
    );
}

#[test]
fn nested_tables() {
    let numbers = Dispatcher::builder()
        .case(lt(0), "negative")
        .case(0, "zero")
        .case(gt(0), "positive")
        .build();
    let table = Dispatcher::builder()
        .case(is_int(), numbers)
        .case(is_string(), "text")
        .build();

    assert_eq!(table.call(&(-1).into()), Some(Value::from("negative")));
    assert_eq!(table.call(&0.into()), Some(Value::from("zero")));
    assert_eq!(table.call(&"x".into()), Some(Value::from("text")));
    assert!(table.validate().is_ok());
    assert_eq!(table.depth(), 3);
}

#[test]
fn nested_tables_count_toward_depth() {
    let mut table = dispatch([Case::new(is_int(), "leaf")]);
    for _ in 0..patma::MAX_DEPTH {
        table = dispatch([Case::new(is_int(), table)]);
    }
    assert_eq!(table.call(&1.into()), Some(Value::from("leaf")));
    assert!(matches!(
        table.validate(),
        Err(SpecError::DepthExceeded { max: patma::MAX_DEPTH, .. })
    ));

    let mut template = Handler::from("leaf");
    for _ in 0..patma::MAX_DEPTH {
        template = Handler::template([("next", template)]);
    }
    let table = dispatch([Case::new(is_int(), template)]);
    assert!(table.validate().is_err());
}

#[test]
fn handler_side_recursion() {
    // sums a nested list without naming the table
    let sum = Dispatcher::builder()
        .case(is_int(), Handler::identity())
        .call(is_container(), |x: &Value, _: &Path, d: &Dispatcher| {
            x.as_container()
                .map(|c| {
                    c.values()
                        .filter_map(|child| d.call(child).and_then(|r| r.as_int()))
                        .sum::<i64>()
                })
                .unwrap_or(0)
        })
        .build();

    assert_eq!(sum.call(&v(json!([1, [2, 3], [[4]]]))), Some(Value::from(10)));
}

#[test]
fn rmatch_key_paths() {
    let table = rmatch([
        Case::new(k("a").slice(0, Some(1)), "A"),
        Case::new(k(Value::list(["b", "c"])).slice(-2, None), "BC"),
    ]);

    let input = v(json!({
        "a": 1,
        "apple": 2,
        "banana": 3,
        "b": {"c": 4, "e": {"b": {"c": 5}}}
    }));

    assert_eq!(
        table.call(&input),
        Some(v(json!({
            "a": "A",
            "apple": "A",
            "banana": null,
            "b": {"c": "BC", "e": {"b": {"c": "BC"}}}
        })))
    );
}

#[test]
fn rmatch_leaves_matched_containers_alone() {
    let table = rmatch([
        Case::new(k("raw"), Handler::identity()),
        Case::new(is_string(), Handler::call(|x: &Value, _: &Path, _: &Dispatcher| {
            x.as_str().map(str::to_uppercase)
        })),
    ]);

    let input = v(json!({"raw": ["keep", "me"], "cooked": ["shout", {"deep": "er"}], "n": 1}));
    assert_eq!(
        table.call(&input),
        Some(v(json!({"raw": ["keep", "me"], "cooked": ["SHOUT", {"deep": "ER"}], "n": null})))
    );
}

#[test]
fn trace_records_checked_cases() {
    let table = rmatch([Case::new(is_int(), "int")]);

    let trace = table.call_with_trace(&v(json!([1])));
    assert_eq!(trace.result, table.call(&v(json!([1]))));
    assert_eq!(trace.matched_case, Some(1));
    assert_eq!(trace.steps.len(), 2);
    assert!(trace.steps[0].verdict.is_left());

    let miss = dispatch([Case::new(is_int(), "int")]).call_with_trace(&"x".into());
    assert!(!miss.matched());
    assert_eq!(miss.result, None);
}
