// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property tests for the field contract.

use fieldkit::{ChangeEvent, Field, Key, ListOptions, Model, SchemaBuilder, Value};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

const MEMBERS: [&str; 7] = ["n", "f", "b", "e", "tag", "grid", "pair"];

fn members() -> Vec<Field> {
    vec![
        Field::integer("n").with_default(5).with_min(0).with_max(100),
        Field::number("f").with_min(-10).with_max(10),
        Field::boolean("b"),
        Field::enumeration("e", [(1, "one"), (2, "two"), (3, "three")]).with_default(1),
        Field::value("tag").with_default("none"),
        Field::list(
            "grid",
            Field::list("row", Field::integer("cell").with_default(0), 2usize),
            ListOptions::range(1, 4),
        ),
        Field::tuple(
            "pair",
            [Field::integer("a").with_default(0), Field::boolean("z")],
        ),
    ]
}

fn record() -> Field {
    Field::structure("record", members())
        .resolved()
        .expect("valid record")
}

fn leaves() -> Vec<Field> {
    members()
        .into_iter()
        .map(|f| f.resolved().expect("valid member"))
        .collect()
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-500i64..500).prop_map(Value::Integer),
        (-500.0f64..500.0).prop_map(Value::Number),
        "[0-9a-fx .-]{0,6}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..6)
                .prop_map(|entries| Value::Map(entries.into_iter().collect())),
        ]
    })
}

/// Maps keyed mostly by real member names.
fn arb_record_input() -> impl Strategy<Value = Value> {
    let keys: Vec<&'static str> = MEMBERS.iter().copied().chain(["zz"]).collect();
    prop::collection::vec((prop::sample::select(keys), arb_value()), 0..8)
        .prop_map(|entries| Value::map(entries))
}

fn arb_path() -> impl Strategy<Value = Vec<Key>> {
    prop_oneof![
        prop::sample::select(vec!["n", "f", "b", "e", "tag"])
            .prop_map(|name| vec![Key::from(name)]),
        (1usize..4, 0usize..2).prop_map(|(row, col)| vec![
            Key::from("grid"),
            Key::Index(row),
            Key::Index(col)
        ]),
        (0usize..2).prop_map(|pos| vec![Key::from("pair"), Key::Index(pos)]),
    ]
}

proptest! {
    #[test]
    fn completeness(raw in arb_record_input()) {
        let field = record();
        for value in [field.default_value()].into_iter().chain(field.clean(&raw).ok()) {
            let entries = value.as_map().expect("struct stores a map");
            let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
            prop_assert_eq!(keys, MEMBERS.to_vec());

            let pair = entries["pair"].as_list().expect("tuple stores a list");
            prop_assert_eq!(pair.len(), 2);

            let grid = entries["grid"].as_list().expect("list stores a list");
            prop_assert_eq!(grid.len(), 4);
            prop_assert!(grid[0].is_null());
            for row in &grid[1..] {
                prop_assert_eq!(row.as_list().map(<[Value]>::len), Some(2));
            }
        }
    }

    #[test]
    fn padding(raw in prop::collection::vec(-200i64..200, 0..10)) {
        let field = Field::list(
            "elements",
            Field::integer("element").with_default(0).with_max(100),
            5usize,
        )
        .resolved()
        .expect("valid list");
        let cleaned = field.clean(&Value::list(raw.clone())).expect("integers always clean");
        let items = cleaned.as_list().expect("list");
        prop_assert_eq!(items.len(), 5);
        for (i, item) in items.iter().enumerate() {
            let expected = raw.get(i).map_or(0, |v| (*v).min(100));
            prop_assert_eq!(item, &Value::Integer(expected));
        }
    }

    #[test]
    fn idempotence(raw in arb_value(), record_raw in arb_record_input()) {
        for field in leaves() {
            if let Ok(once) = field.clean(&raw) {
                prop_assert_eq!(field.clean(&once), Ok(once.clone()), "field {}", field.name());
            }
        }
        let field = record();
        if let Ok(once) = field.clean(&record_raw) {
            prop_assert_eq!(field.clean(&once), Ok(once.clone()));
        }
    }

    #[test]
    fn round_trip(raw in arb_record_input()) {
        let field = record();
        for value in [field.default_value()].into_iter().chain(field.clean(&raw).ok()) {
            prop_assert_eq!(field.deserialize(&field.serialize(&value)), value);
        }
    }

    #[test]
    fn text_round_trip(raw in arb_record_input()) {
        let schema = SchemaBuilder::new("Holder")
            .field(record())
            .build()
            .expect("valid schema");
        let model = Model::new(&schema, &Value::map([("record", raw)]));
        let text = model.to_text().expect("encode");
        prop_assert_eq!(Model::from_text(&schema, &text).expect("decode"), model);
    }

    #[test]
    fn change_gating(path in arb_path(), raw in arb_value(), start in arb_record_input()) {
        let schema = SchemaBuilder::new("Holder")
            .field(record())
            .build()
            .expect("valid schema");
        let mut model = Model::new(&schema, &Value::map([("record", start)]));

        let events: Arc<Mutex<Vec<(&'static str, ChangeEvent)>>> = Arc::default();
        let field_sink = Arc::clone(&events);
        model
            .on_field_change("record", move |_, event| {
                field_sink.lock().expect("events lock").push(("field", event.clone()));
            })
            .expect("known accessor");
        let tree_sink = Arc::clone(&events);
        model.on_change(move |_, event| {
            tree_sink.lock().expect("events lock").push(("tree", event.clone()));
        });

        let before = model.get_element("record", &path).expect("valid path").clone();
        let changed = model.set_element("record", &path, raw).expect("valid path");
        let after = model.get_element("record", &path).expect("valid path").clone();
        let events = events.lock().expect("events lock");

        if changed {
            prop_assert_ne!(&before, &after);
            prop_assert_eq!(events.len(), 2);
            prop_assert_eq!(events[0].0, "field");
            prop_assert_eq!(events[1].0, "tree");
            prop_assert_eq!(&events[0].1, &events[1].1);
            prop_assert_eq!(&events[0].1.path, &path);
            prop_assert_eq!(&events[0].1.value, &after);
        } else {
            prop_assert_eq!(before, after);
            prop_assert!(events.is_empty());
        }
    }
}
