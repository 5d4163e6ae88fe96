//! Formatting knobs exercised end to end.

use serde::Serialize;
use serde_linecoder::{
    strategy, to_string_with_options, to_vec_with_options, EncoderOptions, Error, KeyOrder,
    KeyStyle, ScalarStrategies, Value,
};
use std::collections::BTreeMap;

#[derive(Serialize)]
struct Row {
    a: i32,
}

#[derive(Serialize)]
struct Sub {
    numeral: i32,
    string: &'static str,
}

#[derive(Serialize)]
struct Record {
    int: i32,
    sub: Sub,
}

fn record() -> Record {
    Record {
        int: 12,
        sub: Sub {
            numeral: 76,
            string: "world",
        },
    }
}

#[test]
fn test_records_per_line() {
    let rows = vec![Row { a: 1 }, Row { a: 2 }];
    let out = to_string_with_options(&rows, &EncoderOptions::default()).unwrap();
    assert_eq!(out, "[0.a:1]\n[1.a:2]");
}

#[test]
fn test_custom_delimiters() {
    let options = EncoderOptions::new()
        .with_object_brackets("(", ")")
        .with_item_delimiter("; ")
        .with_key_delimiter("->")
        .with_key_value_divider("=")
        .with_object_delimiter("\r\n");

    assert_eq!(
        to_string_with_options(&record(), &options).unwrap(),
        "(int=12; sub=(sub->numeral=76; sub->string=world))"
    );
    assert_eq!(
        to_string_with_options(&vec![Row { a: 1 }, Row { a: 2 }], &options).unwrap(),
        "(0->a=1)\r\n(1->a=2)"
    );
}

#[test]
fn test_keys_can_be_hidden() {
    let options = EncoderOptions::new().with_include_keys(false);
    assert_eq!(
        to_string_with_options(&record(), &options).unwrap(),
        "[12,[76,world]]"
    );
}

#[test]
fn test_leaf_keys() {
    let options = EncoderOptions::new().with_key_style(KeyStyle::Leaf);
    assert_eq!(
        to_string_with_options(&record(), &options).unwrap(),
        "[int:12,sub:[numeral:76,string:world]]"
    );
}

#[test]
fn test_insertion_order_when_unsorted() {
    #[derive(Serialize)]
    struct Unsorted {
        zeta: i32,
        alpha: i32,
        mid: i32,
    }

    let options = EncoderOptions::new().with_sort_keys(false);
    let value = Unsorted {
        zeta: 1,
        alpha: 2,
        mid: 3,
    };
    assert_eq!(
        to_string_with_options(&value, &options).unwrap(),
        "[zeta:1,alpha:2,mid:3]"
    );
}

#[test]
fn test_natural_versus_lexicographic_order() {
    let map: BTreeMap<&str, i32> = [("item10", 10), ("Item2", 2), ("item1", 1)].into();

    let natural = EncoderOptions::default();
    assert_eq!(
        to_string_with_options(&map, &natural).unwrap(),
        "[item1:1,Item2:2,item10:10]"
    );

    let bytewise = EncoderOptions::new().with_key_order(KeyOrder::lexicographic());
    assert_eq!(
        to_string_with_options(&map, &bytewise).unwrap(),
        "[Item2:2,item1:1,item10:10]"
    );
}

#[test]
fn test_custom_literals() {
    #[derive(Serialize)]
    struct Flags {
        on: bool,
        off: bool,
        nothing: Option<u8>,
    }

    let options = EncoderOptions::new().with_literals("-", "Y", "N");
    let flags = Flags {
        on: true,
        off: false,
        nothing: None,
    };
    assert_eq!(
        to_string_with_options(&flags, &options).unwrap(),
        "[nothing:-,off:N,on:Y]"
    );
}

#[test]
fn test_empty_output_wraps_top_level_sequence() {
    let options = EncoderOptions::new().with_empty_output("\"");
    assert_eq!(
        to_string_with_options(&vec!["a", "b"], &options).unwrap(),
        "\"a\nb\""
    );
    assert_eq!(to_string_with_options(&Vec::<i32>::new(), &options).unwrap(), "\"\"");
}

#[test]
fn test_empty_record_still_bracketed() {
    #[derive(Serialize)]
    struct Empty {}

    assert_eq!(
        to_string_with_options(&Empty {}, &EncoderOptions::default()).unwrap(),
        "[]"
    );
}

#[test]
fn test_strategy_overrides() {
    #[derive(Serialize)]
    struct Upload {
        #[serde(serialize_with = "serde_linecoder::special::serialize_blob")]
        body: Vec<u8>,
        size: u64,
    }

    let strategies = ScalarStrategies::default()
        .with_blob(strategy::blob_hex)
        .with_integer(|n| Ok(Value::number(format!("#{n}"))));
    let options = EncoderOptions::new().with_strategies(strategies);
    let upload = Upload {
        body: vec![0xde, 0xad],
        size: 2,
    };
    assert_eq!(
        to_string_with_options(&upload, &options).unwrap(),
        "[body:dead,size:#2]"
    );
}

#[test]
fn test_strict_integer_strategy() {
    let options = EncoderOptions::new().with_strategies(
        ScalarStrategies::default().with_integer(strategy::integer_within_i64),
    );
    let err = to_string_with_options(&vec![1u64, u64::MAX], &options).unwrap_err();
    match err {
        Error::UnencodableValue { path, reason, .. } => {
            assert_eq!(path.to_string(), "1");
            assert_eq!(reason, "integer out of range");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_key_delimiter_rejected() {
    let options = EncoderOptions::new().with_key_delimiter(vec![0xff]);
    let err = to_vec_with_options(&record(), &options).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_non_utf8_literals_fail_string_output() {
    let options = EncoderOptions::new().with_literals(vec![0xff], "true", "false");
    assert_eq!(to_vec_with_options(&(), &options).unwrap(), vec![0xff]);
    match to_string_with_options(&(), &options) {
        Err(Error::Configuration(msg)) => assert!(msg.contains("null output")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_non_utf8_strategy_output_fails_string_output() {
    let strategies = ScalarStrategies::default().with_string(|_| Ok(Value::String(vec![0xff])));
    let options = EncoderOptions::new().with_strategies(strategies);
    assert!(matches!(
        to_string_with_options(&"x", &options),
        Err(Error::Custom(_))
    ));
}
