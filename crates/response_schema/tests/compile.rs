use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use response_schema::{compile, SchemaError};
use serde_json::Value;

fn compiled(definition: &str) -> String {
    compile(definition)
        .expect("definition should compile")
        .expect("definition should yield a schema")
}

#[test]
fn empty_definition_yields_no_schema() {
    assert_eq!(compile("").expect("empty is valid"), None);
    assert_eq!(compile("   ").expect("blank is valid"), None);
}

#[test]
fn literal_json_schema_passes_through_verbatim() {
    let literal = r#"{"type":"object", "properties": {"x": {"type": "number"}}}"#;
    assert_eq!(compiled(literal), literal);
}

#[test]
fn literal_schema_is_not_validated() {
    let literal = "{ not json at all";
    assert_eq!(compiled(literal), literal);
}

#[test]
fn object_schema_has_canonical_shape_and_order() {
    assert_eq!(
        compiled("name:string:the full name|age:integer"),
        concat!(
            r#"{"type":"object","properties":{"#,
            r#""age":{"type":"integer","description":""},"#,
            r#""name":{"type":"string","description":"the full name"}"#,
            r#"}}"#
        )
    );
}

#[test]
fn array_prefix_wraps_object_schema() {
    assert_eq!(
        compiled("[]city:string"),
        r#"{"type":"array","items":{"type":"object","properties":{"city":{"type":"string","description":""}}}}"#
    );
}

#[test]
fn compilation_is_deterministic_regardless_of_field_order() {
    let forward = compiled("a:string|b:number:bee|c:boolean");
    let shuffled = compiled("c:boolean|a:string|b:number:bee");

    assert_eq!(forward, compiled("a:string|b:number:bee|c:boolean"));
    assert_eq!(forward, shuffled);
}

#[test]
fn property_names_match_supplied_field_names() {
    let schema: Value =
        serde_json::from_str(&compiled("zeta:string|alpha:number|mid:boolean:flag"))
            .expect("compiled schema is JSON");

    let names = schema["properties"]
        .as_object()
        .expect("properties object")
        .keys()
        .cloned()
        .collect::<BTreeSet<_>>();
    let expected = ["alpha", "mid", "zeta"]
        .into_iter()
        .map(str::to_owned)
        .collect::<BTreeSet<_>>();

    assert_eq!(names, expected);
}

#[test]
fn single_part_field_fails_without_partial_result() {
    let error = compile("name:string|broken").expect_err("one-part field must fail");
    assert_eq!(
        error,
        SchemaError::InvalidFieldFormat {
            field: "broken".to_owned(),
            parts: 1,
        }
    );
}

#[test]
fn four_part_field_fails() {
    let error = compile("name:string:desc:extra").expect_err("four-part field must fail");
    assert!(matches!(
        error,
        SchemaError::InvalidFieldFormat { parts: 4, .. }
    ));
}

#[test]
fn empty_name_fails() {
    let error = compile(":string").expect_err("missing name must fail");
    assert!(matches!(error, SchemaError::MissingNameOrType { .. }));
}

#[test]
fn error_message_names_offending_field() {
    let error = compile("ok:string|bad").expect_err("must fail");
    assert!(error.to_string().contains("'bad'"));
}
