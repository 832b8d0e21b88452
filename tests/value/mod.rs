// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use jobquery::*;

#[test]
fn canonical_ordering_across_types() -> Result<()> {
    // Null < Number < String < Object < Array < Bool.
    let ladder = [
        Value::Null,
        Value::from(7i64),
        Value::from("7"),
        Value::from_json_str(r#"{"a": 1}"#)?,
        Value::from_json_str("[1]")?,
        Value::Bool(false),
    ];
    for pair in ladder.windows(2) {
        assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
    }
    Ok(())
}

#[test]
fn numbers_form_one_cohort() -> Result<()> {
    assert_eq!(Value::from(1i64), Value::from(1.0));
    assert!(Value::from(1i64) < Value::from(1.5));
    assert!(Value::from(2.5) < Value::from(3i64));

    // NaN sorts above every number.
    assert!(Value::from(f64::NAN) > Value::from(f64::INFINITY));
    assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
    Ok(())
}

#[test]
fn object_equality_is_order_insensitive() -> Result<()> {
    let a = Value::from_json_str(r#"{"x": 1, "y": [2, {"z": 3}]}"#)?;
    let b = Value::from_json_str(r#"{"y": [2, {"z": 3}], "x": 1}"#)?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn array_ordering_is_element_wise() -> Result<()> {
    assert!(Value::from_json_str("[1, 2]")? < Value::from_json_str("[1, 3]")?);
    assert!(Value::from_json_str("[1, 2]")? < Value::from_json_str("[1, 2, 0]")?);
    Ok(())
}

#[test]
fn serialize_number() -> Result<()> {
    // Check that integral floats are serialized without a fractional part.
    assert_eq!(serde_json::to_string(&Value::from(1.0))?, "1");
    assert_eq!(serde_json::to_string(&Value::from(-1.0))?, "-1");

    // Ensure that fractional parts are also serialized.
    assert_eq!(serde_json::to_string(&Value::from(1.1))?, "1.1");
    assert_eq!(serde_json::to_string(&Value::from(-42i64))?, "-42");
    Ok(())
}

#[test]
fn json_round_trip() -> Result<()> {
    let v = Value::from_json_str(r#"{"name": "copy", "sizes": [1, 2.5], "meta": null}"#)?;
    let again = Value::from_json_str(&v.to_json_str()?)?;
    assert_eq!(v, again);
    Ok(())
}

#[test]
fn value_as_index() -> Result<()> {
    let v = Value::from_json_str(r#"{"jobs": [{"id": "a"}, {"id": "b"}]}"#)?;
    assert_eq!(v["jobs"][1]["id"], Value::from("b"));
    assert_eq!(v["jobs"][7], Value::Missing);
    assert_eq!(v["nope"], Value::Missing);
    assert_eq!(Value::Null["jobs"], Value::Missing);
    Ok(())
}

#[test]
fn missing_is_distinct_from_null() -> Result<()> {
    assert_ne!(Value::Missing, Value::Null);
    assert!(Value::Missing < Value::Null);
    assert!(Value::Null.is_nullish() && Value::Missing.is_nullish());
    assert!(!Value::Null.is_missing());
    Ok(())
}

#[test]
fn accessors() -> Result<()> {
    let v = Value::from_json_str(r#"{"n": 3, "s": "hi", "a": [true]}"#)?;
    assert_eq!(v["n"].as_number()?.as_i64(), Some(3));
    assert_eq!(v["s"].as_string()?.as_ref(), "hi");
    assert_eq!(v["a"].as_array()?.len(), 1);
    assert!(v["s"].as_number().is_err());
    assert!(Value::Missing.as_object().is_err());
    Ok(())
}
