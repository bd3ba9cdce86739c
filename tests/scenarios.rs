//! End-to-end scenarios driven through the public `generate` entry point.

use lsp_protocol_gen::generate;

#[test]
fn enum_literal_folding_defaults_to_named_enum_member() {
    let schema = r#"{
        "enumerations": [
            {
                "name": "Kind",
                "type": { "kind": "base", "name": "string" },
                "values": [
                    { "name": "a", "value": "a" },
                    { "name": "b", "value": "b" }
                ],
                "supportsCustomValues": false
            }
        ],
        "structures": [
            {
                "name": "X",
                "properties": [
                    { "name": "kind", "type": { "kind": "stringLiteral", "value": "a" } }
                ]
            }
        ]
    }"#;

    let output = generate(schema).unwrap();
    assert!(output.header.contains("enum_string<Kind> kind = Kind::A;"));
}

#[test]
fn nullable_variant_and_optional_variant_render_correctly() {
    let schema = r#"{
        "structures": [
            {
                "name": "X",
                "properties": [
                    {
                        "name": "maybeInt",
                        "type": { "kind": "or", "items": [
                            { "kind": "base", "name": "integer" },
                            { "kind": "base", "name": "null" }
                        ] }
                    },
                    {
                        "name": "threeWay",
                        "type": { "kind": "or", "items": [
                            { "kind": "base", "name": "integer" },
                            { "kind": "base", "name": "string" },
                            { "kind": "base", "name": "null" }
                        ] }
                    },
                    {
                        "name": "optVariant",
                        "optional": true,
                        "type": { "kind": "or", "items": [
                            { "kind": "base", "name": "integer" },
                            { "kind": "base", "name": "string" }
                        ] }
                    }
                ]
            }
        ]
    }"#;

    let output = generate(schema).unwrap();
    assert!(output.header.contains("nullable<integer> maybe_int;"));
    assert!(output.header.contains("variant<null, integer, string> three_way;"));
    assert!(output.header.contains("optional_variant<integer, string> opt_variant = {};"));
}

#[test]
fn self_recursive_struct_uses_shared_handle() {
    let schema = r#"{
        "structures": [
            {
                "name": "Node",
                "properties": [
                    {
                        "name": "children",
                        "type": { "kind": "array", "element": { "kind": "reference", "name": "Node" } }
                    }
                ]
            }
        ]
    }"#;

    let output = generate(schema).unwrap();
    assert!(output.header.contains("sequence<shared_handle<Node>> children;"));
}

#[test]
fn unsafe_override_keeps_both_members_and_warns() {
    let schema = r#"{
        "structures": [
            { "name": "Parent", "properties": [
                { "name": "id", "type": { "kind": "base", "name": "integer" } }
            ] },
            {
                "name": "Child",
                "extends": [ { "kind": "reference", "name": "Parent" } ],
                "properties": [
                    { "name": "id", "type": { "kind": "base", "name": "string" } }
                ]
            }
        ]
    }"#;

    let output = generate(schema).unwrap();
    assert!(output.header.contains("integer id_2;"));
    assert!(output.header.contains("string id;"));
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.kind == lsp_protocol_gen::DiagnosticKind::UnsafeOverride));
}

#[test]
fn request_without_params_synthesizes_a_params_struct() {
    let schema = r#"{
        "requests": [
            { "method": "$/progress" }
        ]
    }"#;

    let output = generate(schema).unwrap();
    assert!(output.header.contains("struct ProgressParams { };"));
    assert!(output.header.contains(r#"X((ProgressParams), (null), "$/progress")"#));
}

#[test]
fn integer_enum_underlying_type_narrows_to_smallest_fit() {
    let small = r#"{
        "enumerations": [
            {
                "name": "Small",
                "type": { "kind": "base", "name": "integer" },
                "values": [
                    { "name": "one", "value": 1 },
                    { "name": "two", "value": 2 },
                    { "name": "five", "value": 5 }
                ],
                "supportsCustomValues": false
            }
        ]
    }"#;
    let output = generate(small).unwrap();
    assert!(output.header.contains("enum class Small : std::int8_t {"));

    let wide_unsigned = r#"{
        "enumerations": [
            {
                "name": "Wide",
                "type": { "kind": "base", "name": "uinteger" },
                "values": [
                    { "name": "one", "value": 1 },
                    { "name": "big", "value": 200 }
                ],
                "supportsCustomValues": false
            }
        ]
    }"#;
    let output = generate(wide_unsigned).unwrap();
    assert!(output.header.contains("enum class Wide : std::uint8_t {"));

    let wide_signed = r#"{
        "enumerations": [
            {
                "name": "WideSigned",
                "type": { "kind": "base", "name": "integer" },
                "values": [
                    { "name": "one", "value": 1 },
                    { "name": "big", "value": 200 }
                ],
                "supportsCustomValues": false
            }
        ]
    }"#;
    let output = generate(wide_signed).unwrap();
    assert!(output.header.contains("enum class WideSigned : std::int16_t {"));
}
