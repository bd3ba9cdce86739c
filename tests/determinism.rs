//! Determinism properties: identical input produces identical output, and
//! output does not depend on the input JSON's definition order.

use lsp_protocol_gen::generate;

const SCHEMA: &str = r#"{
    "structures": [
        {
            "name": "Zeta",
            "properties": [
                { "name": "ref", "type": { "kind": "reference", "name": "Alpha" } }
            ]
        },
        { "name": "Alpha", "properties": [] }
    ],
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
    "typeAliases": [
        { "name": "Maybe", "type": { "kind": "or", "items": [
            { "kind": "reference", "name": "Alpha" },
            { "kind": "base", "name": "null" }
        ] } }
    ],
    "requests": [
        { "method": "initialize", "params": { "kind": "reference", "name": "Alpha" } },
        { "method": "$/progress" }
    ],
    "notifications": [
        { "method": "exit" }
    ]
}"#;

const SCHEMA_PERMUTED: &str = r#"{
    "requests": [
        { "method": "$/progress" },
        { "method": "initialize", "params": { "kind": "reference", "name": "Alpha" } }
    ],
    "notifications": [
        { "method": "exit" }
    ],
    "typeAliases": [
        { "name": "Maybe", "type": { "kind": "or", "items": [
            { "kind": "reference", "name": "Alpha" },
            { "kind": "base", "name": "null" }
        ] } }
    ],
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
        { "name": "Alpha", "properties": [] },
        {
            "name": "Zeta",
            "properties": [
                { "name": "ref", "type": { "kind": "reference", "name": "Alpha" } }
            ]
        }
    ]
}"#;

#[test]
fn same_schema_produces_byte_identical_output_across_runs() {
    let first = generate(SCHEMA).unwrap();
    let second = generate(SCHEMA).unwrap();
    assert_eq!(first.header, second.header);
}

#[test]
fn permuting_definition_order_does_not_change_output() {
    let original = generate(SCHEMA).unwrap();
    let permuted = generate(SCHEMA_PERMUTED).unwrap();
    assert_eq!(original.header, permuted.header);
}
