// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use jobquery::*;

fn doc(json: &str) -> Result<Document> {
    Ok(Document::from_value(Value::from_json_str(json)?))
}

fn person() -> Result<Document> {
    doc(r#"{
        "data": {
            "firstName": "Francis",
            "lastName": "Asante",
            "username": "kofrasa",
            "title": "Software Engineer",
            "tags": ["nodejs", "javascript", "python"],
            "age": 45,
            "isActive": true,
            "retirement": null,
            "grades": [
                {"grade": 92.0, "mean": 88, "std": 8},
                {"grade": 78.0, "mean": 90, "std": 5},
                {"grade": 88.0, "mean": 85, "std": 3}
            ]
        }
    }"#)
}

fn matches(query: &str, document: &Document) -> Result<bool> {
    Query::compile(&Value::from_json_str(query)?)?.matches(document)
}

fn eval(expr: &str, document: &Document) -> Result<Value> {
    Expression::compile(&Value::from_json_str(expr)?)?.eval(document)
}

fn eval_empty(expr: &str) -> Result<Value> {
    eval(expr, &Document::from_value(Value::new_object()))
}

// ---------------------------------------------------------------------
// Match mode
// ---------------------------------------------------------------------

#[test]
fn implicit_and_over_fields() -> Result<()> {
    let p = person()?;
    assert!(matches(
        r#"{"data.firstName": "Francis", "data.isActive": true}"#,
        &p
    )?);
    assert!(!matches(
        r#"{"data.firstName": "Francis", "data.isActive": false}"#,
        &p
    )?);
    Ok(())
}

#[test]
fn fan_out_matching() -> Result<()> {
    let p = person()?;
    // Any element of the fanned-out collection may satisfy the predicate.
    assert!(matches(r#"{"data.grades.mean": {"$gt": 70}}"#, &p)?);
    assert!(matches(r#"{"data.grades.mean": 85}"#, &p)?);
    assert!(!matches(r#"{"data.grades.mean": {"$lt": 50}}"#, &p)?);
    assert!(matches(r#"{"data.grades.1.grade": 78.0}"#, &p)?);
    Ok(())
}

#[test]
fn nested_array_indices() -> Result<()> {
    let d = doc(r#"{"data": {"key0": [{"key1": [[{"key2": {"a": "value2"}}]]}]}}"#)?;
    assert!(matches(r#"{"data.key0.key1.0.0.key2.a": "value2"}"#, &d)?);
    // Without indices the fan-out stops at the array-of-arrays.
    assert!(!matches(r#"{"data.key0.key1.key2.a": "value2"}"#, &d)?);
    Ok(())
}

#[test]
fn null_matches_absent_and_present_null() -> Result<()> {
    let with_null = doc(r#"{"data": {"_id": 1, "item": null}}"#)?;
    let without = doc(r#"{"data": {"_id": 2}}"#)?;
    assert!(matches(r#"{"data.item": null}"#, &with_null)?);
    assert!(matches(r#"{"data.item": null}"#, &without)?);

    // $type "null" only accepts the present null.
    assert!(matches(r#"{"data.item": {"$type": "null"}}"#, &with_null)?);
    assert!(!matches(r#"{"data.item": {"$type": "null"}}"#, &without)?);

    // $exists false only accepts the absent field.
    assert!(!matches(r#"{"data.item": {"$exists": false}}"#, &with_null)?);
    assert!(matches(r#"{"data.item": {"$exists": false}}"#, &without)?);
    assert!(matches(r#"{"data.item": {"$exists": true}}"#, &with_null)?);
    Ok(())
}

#[test]
fn comparison_predicates() -> Result<()> {
    let p = person()?;
    assert!(matches(r#"{"data.age": {"$gt": 40, "$lt": 50}}"#, &p)?);
    assert!(matches(r#"{"data.age": {"$gte": 45, "$lte": 45}}"#, &p)?);
    assert!(matches(r#"{"data.age": {"$ne": 30}}"#, &p)?);
    assert!(!matches(r#"{"data.age": {"$gt": 45}}"#, &p)?);
    // Mixed types follow the canonical ordering: numbers sort below strings.
    assert!(matches(r#"{"data.firstName": {"$gt": 1000}}"#, &p)?);
    Ok(())
}

#[test]
fn set_membership() -> Result<()> {
    let p = person()?;
    assert!(matches(r#"{"data.age": {"$in": [44, 45, 46]}}"#, &p)?);
    assert!(matches(r#"{"data.age": {"$nin": [1, 2]}}"#, &p)?);
    // Any element of an array value counts as a member.
    assert!(matches(r#"{"data.tags": {"$in": ["python", "go"]}}"#, &p)?);
    // A null candidate matches the absent field.
    assert!(matches(r#"{"data.nope": {"$in": [null, 1]}}"#, &p)?);
    assert!(!matches(r#"{"data.nope": {"$in": [1]}}"#, &p)?);
    Ok(())
}

#[test]
fn element_predicates() -> Result<()> {
    let p = person()?;
    assert!(matches(r#"{"data.tags": {"$size": 3}}"#, &p)?);
    assert!(!matches(r#"{"data.tags": {"$size": 2}}"#, &p)?);
    assert!(matches(
        r#"{"data.tags": {"$all": ["nodejs", "python"]}}"#,
        &p
    )?);
    assert!(!matches(r#"{"data.tags": {"$all": ["nodejs", "rust"]}}"#, &p)?);
    assert!(matches(r#"{"data.age": {"$mod": [9, 0]}}"#, &p)?);
    assert!(!matches(r#"{"data.age": {"$mod": [9, 1]}}"#, &p)?);
    assert!(matches(r#"{"data.age": {"$type": ["string", "number"]}}"#, &p)?);
    Ok(())
}

#[test]
fn regex_matching() -> Result<()> {
    let p = person()?;
    assert!(matches(r#"{"data.username": {"$matches": "^kof"}}"#, &p)?);
    assert!(!matches(r#"{"data.username": {"$matches": "^zzz"}}"#, &p)?);
    // An array value matches when any element does.
    assert!(matches(r#"{"data.tags": {"$matches": "script$"}}"#, &p)?);
    Ok(())
}

#[test]
fn logical_combinators() -> Result<()> {
    let p = person()?;
    assert!(matches(
        r#"{"$or": [{"data.age": 11}, {"data.username": "kofrasa"}]}"#,
        &p
    )?);
    assert!(matches(
        r#"{"$and": [{"data.age": 45}, {"data.isActive": true}]}"#,
        &p
    )?);
    assert!(matches(r#"{"$nor": [{"data.age": 11}, {"data.isActive": false}]}"#, &p)?);
    assert!(matches(r#"{"$not": {"data.age": 11}}"#, &p)?);
    assert!(matches(r#"{"data.age": {"$not": {"$gt": 100}}}"#, &p)?);
    // A field-level $not also matches the absent field.
    assert!(matches(r#"{"data.nope": {"$not": {"$gt": 0}}}"#, &p)?);
    Ok(())
}

#[test]
fn whole_and_element_equality() -> Result<()> {
    let p = person()?;
    assert!(matches(r#"{"data.tags": "python"}"#, &p)?);
    assert!(matches(
        r#"{"data.tags": ["nodejs", "javascript", "python"]}"#,
        &p
    )?);
    // Deep equality on objects is order-insensitive.
    assert!(matches(
        r#"{"data.grades.0": {"mean": 88, "grade": 92.0, "std": 8}}"#,
        &p
    )?);
    Ok(())
}

#[test]
fn expr_inside_match() -> Result<()> {
    let p = person()?;
    assert!(matches(
        r#"{"$expr": {"$gt": ["$data.age", {"$strLenBytes": "$data.firstName"}]}}"#,
        &p
    )?);
    Ok(())
}

#[test]
fn compile_rejects_malformed_queries() -> Result<()> {
    let bad = [
        r#"{"$bogus": 1}"#,
        r#"{"f": {"$bogus": 1}}"#,
        r#"{"f": {"$type": "float"}}"#,
        r#"{"f": {"$size": -1}}"#,
        r#"{"f": {"$mod": [2]}}"#,
        r#"{"f": {"$mod": [0, 1]}}"#,
        r#"{"f": {"$exists": "yes"}}"#,
        r#"{"$and": {"f": 1}}"#,
    ];
    for query in bad {
        assert!(
            Query::compile(&Value::from_json_str(query)?).is_err(),
            "{query} should not compile"
        );
    }
    let err = Query::compile(&Value::from_json_str(r#"{"f": {"$mod": [2]}}"#)?)
        .unwrap_err()
        .to_string();
    assert_eq!(err, "$mod expression must resolve to array(2)");
    Ok(())
}

#[test]
fn match_only_operators_are_rejected_in_expressions() -> Result<()> {
    let err = Expression::compile(&Value::from_json_str(r#"{"$exists": true}"#)?)
        .unwrap_err()
        .to_string();
    assert!(err.contains("only valid in match context"), "{err}");
    Ok(())
}

#[test]
fn query_depth_is_bounded() -> Result<()> {
    let mut query = "-1".to_string();
    for _ in 0..100 {
        query = format!("{{\"$abs\": {query}}}");
    }
    let wrapped = format!("{{\"$expr\": {query}}}");
    assert!(Query::compile(&Value::from_json_str(&wrapped)?).is_err());

    // A comfortably nested query still compiles.
    let mut shallow = "-1".to_string();
    for _ in 0..10 {
        shallow = format!("{{\"$abs\": {shallow}}}");
    }
    assert!(Query::compile(&Value::from_json_str(&format!(
        "{{\"$expr\": {shallow}}}"
    ))?)
    .is_ok());
    Ok(())
}

// ---------------------------------------------------------------------
// Expression mode
// ---------------------------------------------------------------------

#[test]
fn field_references_resolve_against_the_document() -> Result<()> {
    let p = person()?;
    assert_eq!(eval(r#""$data.age""#, &p)?, Value::from(45i64));
    assert_eq!(eval(r#""$data.nope""#, &p)?, Value::Missing);
    // Strings without the sigil are literals.
    assert_eq!(eval(r#""data.age""#, &p)?, Value::from("data.age"));
    Ok(())
}

#[test]
fn literal_suppresses_interpretation() -> Result<()> {
    let p = person()?;
    assert_eq!(eval(r#"{"$literal": "$data.age"}"#, &p)?, Value::from("$data.age"));
    assert_eq!(
        eval(r#"{"$literal": {"$add": [1, 2]}}"#, &p)?,
        Value::from_json_str(r#"{"$add": [1, 2]}"#)?
    );
    Ok(())
}

#[test]
fn conditional_pricing_scenario() -> Result<()> {
    // The office-supplies inventory: discounted price under 5.
    let inventory = [
        (1, r#"{"data": {"item": "abc1", "qty": 300, "price": 10}}"#, false),
        (2, r#"{"data": {"item": "abc2", "qty": 200, "price": 20}}"#, false),
        (3, r#"{"data": {"item": "xyz1", "qty": 250, "price": 5}}"#, true),
        (4, r#"{"data": {"item": "VWZ1", "qty": 300, "price": 7}}"#, true),
    ];
    let query = r#"{
        "$expr": {
            "$lt": [
                {
                    "$cond": {
                        "if": {"$gte": ["$data.qty", 100]},
                        "then": {"$divide": ["$data.price", 2]},
                        "else": {"$divide": ["$data.price", 4]}
                    }
                },
                5
            ]
        }
    }"#;
    for (id, item, expected) in inventory {
        assert_eq!(matches(query, &doc(item)?)?, expected, "item {id}");
    }
    Ok(())
}

#[test]
fn cond_accepts_array_form() -> Result<()> {
    assert_eq!(
        eval_empty(r#"{"$cond": [true, "yes", "no"]}"#)?,
        Value::from("yes")
    );
    assert_eq!(
        eval_empty(r#"{"$cond": [0, "yes", "no"]}"#)?,
        Value::from("no")
    );
    // Only the taken branch evaluates; the untaken division cannot fail.
    assert_eq!(
        eval_empty(r#"{"$cond": [true, 1, {"$divide": [1, 0]}]}"#)?,
        Value::from(1i64)
    );
    Ok(())
}

#[test]
fn switch_takes_the_first_matching_branch() -> Result<()> {
    let expr = r#"{
        "$switch": {
            "branches": [
                {"case": {"$lt": ["$data.age", 13]}, "then": "child"},
                {"case": {"$lt": ["$data.age", 20]}, "then": "teen"}
            ],
            "default": "adult"
        }
    }"#;
    assert_eq!(eval(expr, &doc(r#"{"data": {"age": 9}}"#)?)?, Value::from("child"));
    assert_eq!(eval(expr, &doc(r#"{"data": {"age": 15}}"#)?)?, Value::from("teen"));
    assert_eq!(eval(expr, &doc(r#"{"data": {"age": 45}}"#)?)?, Value::from("adult"));

    // Falling off the end without a default is an evaluation error.
    let no_default = r#"{"$switch": {"branches": [{"case": false, "then": 1}]}}"#;
    assert!(eval_empty(no_default).is_err());
    Ok(())
}

#[test]
fn if_null_falls_back_on_nullish() -> Result<()> {
    let p = person()?;
    assert_eq!(eval(r#"{"$ifNull": ["$data.age", 0]}"#, &p)?, Value::from(45i64));
    assert_eq!(eval(r#"{"$ifNull": ["$data.nope", 0]}"#, &p)?, Value::from(0i64));
    assert_eq!(
        eval(r#"{"$ifNull": ["$data.retirement", "none"]}"#, &p)?,
        Value::from("none")
    );

    let err = Expression::compile(&Value::from_json_str(r#"{"$ifNull": [1, 2, 3]}"#)?)
        .unwrap_err()
        .to_string();
    assert_eq!(err, "$ifNull expression must resolve to array(2)");
    Ok(())
}

#[test]
fn arithmetic_basics() -> Result<()> {
    assert_eq!(eval_empty(r#"{"$add": [1, 2, 3]}"#)?, Value::from(6i64));
    assert_eq!(eval_empty(r#"{"$subtract": [10, 4]}"#)?, Value::from(6i64));
    assert_eq!(eval_empty(r#"{"$multiply": [2, 3, 4]}"#)?, Value::from(24i64));
    assert_eq!(eval_empty(r#"{"$divide": [10, 4]}"#)?, Value::from(2.5));
    // Even integer division stays integral.
    assert_eq!(eval_empty(r#"{"$divide": [10, 2]}"#)?, Value::from(5i64));
    assert_eq!(eval_empty(r#"{"$mod": [7, 3]}"#)?, Value::from(1i64));
    // The remainder keeps the sign of the dividend.
    assert_eq!(eval_empty(r#"{"$mod": [-7, 3]}"#)?, Value::from(-1i64));
    assert_eq!(eval_empty(r#"{"$abs": -4}"#)?, Value::from(4i64));
    assert_eq!(eval_empty(r#"{"$ceil": 4.1}"#)?, Value::from(5.0));
    assert_eq!(eval_empty(r#"{"$floor": 4.9}"#)?, Value::from(4.0));
    assert!(eval_empty(r#"{"$divide": [1, 0]}"#).is_err());
    assert!(eval_empty(r#"{"$mod": [1, 0]}"#).is_err());
    Ok(())
}

#[test]
fn arithmetic_laws() -> Result<()> {
    // Commutativity and associativity over numbers.
    assert_eq!(
        eval_empty(r#"{"$add": [1.5, 2, 3]}"#)?,
        eval_empty(r#"{"$add": [3, 1.5, 2]}"#)?
    );
    assert_eq!(
        eval_empty(r#"{"$multiply": [2, {"$multiply": [3, 4]}]}"#)?,
        eval_empty(r#"{"$multiply": [{"$multiply": [2, 3]}, 4]}"#)?
    );
    assert_eq!(
        eval_empty(r#"{"$max": [2, 9, 4]}"#)?,
        eval_empty(r#"{"$max": [9, 4, 2]}"#)?
    );
    Ok(())
}

#[test]
fn null_and_missing_propagation() -> Result<()> {
    let p = person()?;
    assert_eq!(eval(r#"{"$add": [1, null]}"#, &p)?, Value::Null);
    assert_eq!(eval(r#"{"$add": [1, "$data.nope"]}"#, &p)?, Value::Missing);
    assert_eq!(eval(r#"{"$multiply": [null, "$data.nope"]}"#, &p)?, Value::Missing);
    // $ifNull catches the propagated missing.
    assert_eq!(
        eval(r#"{"$ifNull": [{"$add": [1, "$data.nope"]}, -1]}"#, &p)?,
        Value::from(-1i64)
    );
    // Comparisons against missing yield null rather than a boolean.
    assert_eq!(eval(r#"{"$lt": ["$data.nope", 5]}"#, &p)?, Value::Null);
    assert_eq!(eval(r#"{"$cmp": ["$data.nope", 5]}"#, &p)?, Value::Null);
    Ok(())
}

#[test]
fn extremes_ignore_nullish() -> Result<()> {
    let p = person()?;
    assert_eq!(eval(r#"{"$max": [2, null, 7, 3]}"#, &p)?, Value::from(7i64));
    assert_eq!(eval(r#"{"$min": [2, "$data.nope", 7]}"#, &p)?, Value::from(2i64));
    assert_eq!(eval(r#"{"$max": [null, null]}"#, &p)?, Value::Null);
    // A single array argument spreads into operands.
    assert_eq!(eval(r#"{"$max": [[3, 9, 4]]}"#, &p)?, Value::from(9i64));
    Ok(())
}

#[test]
fn rounding_is_half_to_even() -> Result<()> {
    assert_eq!(eval_empty(r#"{"$round": 10.5}"#)?, Value::from(10i64));
    assert_eq!(eval_empty(r#"{"$round": 11.5}"#)?, Value::from(12i64));
    assert_eq!(eval_empty(r#"{"$round": 12.5}"#)?, Value::from(12i64));
    assert_eq!(eval_empty(r#"{"$round": [[-45.39, 1]]}"#)?, Value::from(-45.4));
    assert_eq!(eval_empty(r#"{"$round": [-45.39, 1]}"#)?, Value::from(-45.4));
    // Negative places round to tens, hundreds and so on.
    assert_eq!(eval_empty(r#"{"$round": [1234, -2]}"#)?, Value::from(1200i64));
    Ok(())
}

#[test]
fn truncation_is_toward_zero() -> Result<()> {
    assert_eq!(eval_empty(r#"{"$trunc": [[-45.39, 1]]}"#)?, Value::from(-45.3));
    assert_eq!(eval_empty(r#"{"$trunc": [19.87, 0]}"#)?, Value::from(19.0));
    assert_eq!(eval_empty(r#"{"$trunc": [1299, -2]}"#)?, Value::from(1200i64));
    Ok(())
}

#[test]
fn sqrt_distinguishes_nan_and_null() -> Result<()> {
    assert_eq!(eval_empty(r#"{"$sqrt": null}"#)?, Value::Null);
    assert_eq!(eval_empty(r#"{"$sqrt": 25}"#)?, Value::from(5.0));
    // The square root of a negative number is NaN, not an error.
    let nan = eval_empty(r#"{"$sqrt": -1}"#)?;
    assert!(nan.as_number()?.is_nan());
    // And the square root of NaN stays NaN.
    let nested = eval_empty(r#"{"$sqrt": {"$sqrt": -1}}"#)?;
    assert!(nested.as_number()?.is_nan());
    Ok(())
}

#[test]
fn string_operators() -> Result<()> {
    assert_eq!(eval_empty(r#"{"$toLower": "HeLLo"}"#)?, Value::from("hello"));
    assert_eq!(eval_empty(r#"{"$toUpper": "HeLLo"}"#)?, Value::from("HELLO"));
    assert_eq!(eval_empty(r#"{"$toLower": null}"#)?, Value::from(""));
    assert_eq!(
        eval_empty(r#"{"$concat": ["job", "-", "42"]}"#)?,
        Value::from("job-42")
    );
    assert_eq!(eval_empty(r#"{"$concat": ["a", null, "b"]}"#)?, Value::Null);
    assert_eq!(
        eval_empty(r#"{"$split": ["a,b,c", ","]}"#)?,
        Value::from_json_str(r#"["a", "b", "c"]"#)?
    );
    // A separator that never occurs yields a one-element array.
    assert_eq!(
        eval_empty(r#"{"$split": ["abc", "|"]}"#)?,
        Value::from_json_str(r#"["abc"]"#)?
    );
    assert_eq!(eval_empty(r#"{"$strLenBytes": "hello"}"#)?, Value::from(5i64));
    assert_eq!(eval_empty(r#"{"$strcasecmp": ["Hello", "hello"]}"#)?, Value::from(0i64));
    assert_eq!(eval_empty(r#"{"$strcasecmp": ["abc", "abd"]}"#)?, Value::from(-1i64));
    assert_eq!(eval_empty(r#"{"$contains": ["firstName", "stN"]}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$startsWith": ["queue", "qu"]}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$endsWith": ["queue", "eue"]}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$endsWith": ["queue", "xx"]}"#)?, Value::Bool(false));
    Ok(())
}

#[test]
fn substring_is_byte_addressed() -> Result<()> {
    assert_eq!(
        eval_empty(r#"{"$substrBytes": ["hello world", 6, 5]}"#)?,
        Value::from("world")
    );
    assert_eq!(
        eval_empty(r#"{"$substr": ["hello", 0, 2]}"#)?,
        Value::from("he")
    );
    // Negative start yields the empty string.
    assert_eq!(eval_empty(r#"{"$substr": ["hello", -1, 2]}"#)?, Value::from(""));
    // Negative length takes the rest of the string.
    assert_eq!(eval_empty(r#"{"$substr": ["hello", 2, -1]}"#)?, Value::from("llo"));
    // Length may overshoot the end.
    assert_eq!(eval_empty(r#"{"$substr": ["hi", 0, 10]}"#)?, Value::from("hi"));
    Ok(())
}

#[test]
fn trim_family() -> Result<()> {
    assert_eq!(eval_empty(r#"{"$trim": "  hi \t"}"#)?, Value::from("hi"));
    assert_eq!(
        eval_empty(r#"{"$trim": {"input": "xxhixx", "chars": "x"}}"#)?,
        Value::from("hi")
    );
    assert_eq!(
        eval_empty(r#"{"$ltrim": {"input": "xxhix", "chars": "x"}}"#)?,
        Value::from("hix")
    );
    assert_eq!(
        eval_empty(r#"{"$rtrim": {"input": "xxhix", "chars": "x"}}"#)?,
        Value::from("xxhi")
    );
    assert_eq!(eval_empty(r#"{"$trim": {"input": null}}"#)?, Value::Null);
    Ok(())
}

#[test]
fn boolean_conversions_differ_on_strings() -> Result<()> {
    // $toBool: any string, even empty, reads as true.
    assert_eq!(eval_empty(r#"{"$toBool": ""}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$toBool": "false"}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$toBool": 0}"#)?, Value::Bool(false));
    assert_eq!(eval_empty(r#"{"$toBool": 0.25}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$toBool": null}"#)?, Value::Null);

    // $toBoolEx additionally reads "false" and "" as false.
    assert_eq!(eval_empty(r#"{"$toBoolEx": ""}"#)?, Value::Bool(false));
    assert_eq!(eval_empty(r#"{"$toBoolEx": "false"}"#)?, Value::Bool(false));
    assert_eq!(eval_empty(r#"{"$toBoolEx": "true"}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$toBoolEx": 1}"#)?, Value::Bool(true));
    Ok(())
}

#[test]
fn numeric_conversions() -> Result<()> {
    assert_eq!(eval_empty(r#"{"$toLong": "12"}"#)?, Value::from(12i64));
    assert_eq!(eval_empty(r#"{"$toInt": 5.7}"#)?, Value::from(5i64));
    assert_eq!(eval_empty(r#"{"$toInt": true}"#)?, Value::from(1i64));
    assert_eq!(eval_empty(r#"{"$toLong": 3000000000}"#)?, Value::from(3000000000i64));
    // 3e9 does not fit a 32-bit integer.
    assert!(eval_empty(r#"{"$toInt": 3000000000}"#).is_err());
    assert_eq!(eval_empty(r#"{"$toDecimal": "2.5"}"#)?, Value::from(2.5));
    assert_eq!(eval_empty(r#"{"$toDecimal": false}"#)?, Value::from(0.0));
    assert_eq!(eval_empty(r#"{"$toLong": null}"#)?, Value::Null);
    assert!(eval_empty(r#"{"$toLong": "not a number"}"#).is_err());
    Ok(())
}

#[test]
fn string_conversion() -> Result<()> {
    assert_eq!(eval_empty(r#"{"$toString": true}"#)?, Value::from("true"));
    assert_eq!(eval_empty(r#"{"$toString": 2.5}"#)?, Value::from("2.5"));
    // Integral floats print without a fractional part.
    assert_eq!(eval_empty(r#"{"$toString": 2.0}"#)?, Value::from("2"));
    assert_eq!(eval_empty(r#"{"$toString": null}"#)?, Value::Null);
    assert_eq!(eval_empty(r#"{"$isNumber": 2.5}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$isNumber": "2.5"}"#)?, Value::Bool(false));
    Ok(())
}

#[test]
fn logical_expressions() -> Result<()> {
    // The registry-defined identities: $and [] is true, $or [] is false.
    assert_eq!(eval_empty(r#"{"$and": []}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$or": []}"#)?, Value::Bool(false));
    assert_eq!(eval_empty(r#"{"$and": [1, "a", true]}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$and": [1, 0]}"#)?, Value::Bool(false));
    assert_eq!(eval_empty(r#"{"$or": [0, null, "x"]}"#)?, Value::Bool(true));
    // Short-circuit: the failing division is never reached.
    assert_eq!(
        eval_empty(r#"{"$or": [true, {"$divide": [1, 0]}]}"#)?,
        Value::Bool(true)
    );

    // Double negation restores truthiness.
    for literal in ["0", "1", "\"x\"", "null", "true"] {
        let original = eval_empty(literal)?.is_truthy();
        let double = eval_empty(&format!(r#"{{"$not": [{{"$not": [{literal}]}}]}}"#))?;
        assert_eq!(double, Value::Bool(original), "{literal}");
    }
    Ok(())
}

#[test]
fn comparison_algebra() -> Result<()> {
    let pairs = [("1", "2"), ("\"a\"", "\"b\""), ("[1]", "[1, 2]"), ("1", "\"a\"")];
    for (a, b) in pairs {
        assert_eq!(
            eval_empty(&format!(r#"{{"$eq": [{a}, {b}]}}"#))?,
            eval_empty(&format!(r#"{{"$eq": [{b}, {a}]}}"#))?,
        );
        let ab = eval_empty(&format!(r#"{{"$cmp": [{a}, {b}]}}"#))?;
        let ba = eval_empty(&format!(r#"{{"$cmp": [{b}, {a}]}}"#))?;
        let negated = eval_empty(&format!(r#"{{"$subtract": [0, {ba}]}}"#))?;
        assert_eq!(ab, negated, "cmp({a},{b}) != -cmp({b},{a})");
    }
    assert_eq!(eval_empty(r#"{"$in": [2, [1, 2, 3]]}"#)?, Value::Bool(true));
    assert_eq!(eval_empty(r#"{"$nin": [9, [1, 2, 3]]}"#)?, Value::Bool(false));
    Ok(())
}

#[test]
fn composite_literals_evaluate_members() -> Result<()> {
    let p = person()?;
    assert_eq!(
        eval(r#"[{"$add": [1, 1]}, "$data.age"]"#, &p)?,
        Value::from_json_str("[2, 45]")?
    );
    let obj = eval(r#"{"total": {"$add": [1, 2]}, "who": "$data.username"}"#, &p)?;
    assert_eq!(obj, Value::from_json_str(r#"{"total": 3, "who": "kofrasa"}"#)?);
    // Unresolved members are omitted from object literals.
    let partial = eval(r#"{"present": 1, "gone": "$data.nope"}"#, &p)?;
    assert_eq!(partial, Value::from_json_str(r#"{"present": 1}"#)?);
    Ok(())
}

#[test]
fn evaluation_is_idempotent() -> Result<()> {
    let p = person()?;
    let query = Query::compile(&Value::from_json_str(
        r#"{"data.grades.mean": {"$gt": 70}, "data.isActive": true}"#,
    )?)?;
    let first = query.matches(&p)?;
    for _ in 0..3 {
        assert_eq!(query.matches(&p)?, first);
    }
    Ok(())
}
