//! Property-based tests for meili-query using proptest.

use meili_query::{compile_filter, compile_sort, FilterBuilder, Map, Op, Timestamp, Value};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

fn field() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z_.]{0,11}"
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(Value::from),
        ".{0,16}".prop_map(Value::from),
        any::<i64>().prop_map(|ms| Value::Date(Timestamp(ms))),
    ]
}

fn ordering_op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Gt), Just(Op::Gte), Just(Op::Lt), Just(Op::Lte)]
}

fn doc(map: Map) -> Value {
    Value::Object(map)
}

fn unique_fields(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(field(), 0..max).prop_map(|set| set.into_iter().collect())
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// A bare scalar is shorthand for `$eq`.
    #[test]
    fn scalar_shorthand_is_eq(f in field(), v in scalar()) {
        let short = compile_filter(&doc(Map::new().insert(&f, v.clone()))).unwrap();
        let long = compile_filter(&doc(Map::new().insert(&f, Map::new().insert("$eq", v)))).unwrap();
        prop_assert_eq!(short, long);
    }

    /// A bare array is shorthand for `$in`.
    #[test]
    fn array_shorthand_is_in(f in field(), items in prop::collection::vec(scalar(), 0..6)) {
        let short = compile_filter(&doc(Map::new().insert(&f, items.clone()))).unwrap();
        let long = compile_filter(&doc(Map::new().insert(&f, Map::new().insert("$in", items)))).unwrap();
        let prefix = format!("{f} IN [");
        prop_assert!(short.starts_with(&prefix));
        prop_assert_eq!(short, long);
    }

    /// Absent entries contribute nothing.
    #[test]
    fn absent_entries_are_skipped(a in field(), b in field(), v in scalar()) {
        prop_assume!(a != b);
        let with_absent = doc(Map::new().insert(&a, v.clone()).insert_opt(&b, None::<i64>));
        let without = doc(Map::new().insert(&a, v));
        prop_assert_eq!(compile_filter(&with_absent).unwrap(), compile_filter(&without).unwrap());
    }

    /// `$or` output is parenthesized at any depth, `$and` output never is.
    #[test]
    fn or_parenthesized_and_not(
        values in prop::collection::vec(any::<i64>(), 1..5),
        depth in 1usize..4,
    ) {
        let members: Vec<Value> = values
            .iter()
            .map(|v| doc(Map::new().insert("n", *v)))
            .collect();

        let mut or = doc(Map::new().insert("$or", members.clone()));
        let mut and = doc(Map::new().insert("$and", members));
        for _ in 1..depth {
            or = doc(Map::new().insert("$and", vec![or]));
            and = doc(Map::new().insert("$and", vec![and]));
        }

        let or = compile_filter(&or).unwrap();
        prop_assert!(or.starts_with('(') && or.ends_with(')'), "{}", or);
        prop_assert_eq!(or.matches(" OR ").count(), values.len() - 1);

        let and = compile_filter(&and).unwrap();
        prop_assert!(!and.contains('('), "{}", and);
        prop_assert_eq!(and.matches(" AND ").count(), values.len() - 1);
    }

    /// Top-level clauses come out in insertion order.
    #[test]
    fn filter_keeps_key_order(fields in unique_fields(8)) {
        let map: Map = fields.iter().enumerate().map(|(i, f)| (f.clone(), i as i64)).collect();
        let expected: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{f} = {i}"))
            .collect();
        prop_assert_eq!(compile_filter(&doc(map)).unwrap(), expected.join(" AND "));
    }

    /// Sort tokens come out in insertion order.
    #[test]
    fn sort_keeps_key_order(fields in unique_fields(8), dirs in prop::collection::vec(any::<bool>(), 8)) {
        let map: Map = fields
            .iter()
            .zip(&dirs)
            .map(|(f, asc)| (f.clone(), if *asc { 1 } else { -1 }))
            .collect();
        let expected: Vec<String> = fields
            .iter()
            .zip(&dirs)
            .map(|(f, asc)| format!("{f}:{}", if *asc { "asc" } else { "desc" }))
            .collect();
        prop_assert_eq!(compile_sort(Some(&doc(map))).unwrap(), expected);
    }

    /// Builder and document forms agree, in both operator spellings.
    #[test]
    fn builder_matches_document(f in field(), op in ordering_op(), v in any::<i64>()) {
        let from_doc = compile_filter(&doc(Map::new().insert(&f, Map::new().insert(op.as_str(), v)))).unwrap();
        let symbols = FilterBuilder::new().where_(&f, op.builder_token(), v).unwrap().build();
        let tokens = FilterBuilder::new().where_(&f, op.as_str(), v).unwrap().build();
        prop_assert_eq!(&symbols, &from_doc);
        prop_assert_eq!(tokens, from_doc);
    }

    /// Compilation never panics on arbitrary shallow documents.
    #[test]
    fn arbitrary_operators_never_panic(f in field(), op in "\\$?[a-zA-Z=<>!]{1,12}", v in scalar()) {
        let _ = compile_filter(&doc(Map::new().insert(&f, Map::new().insert(op, v))));
    }
}
