//! Decode the metaModel JSON into the typed IR ([`crate::model::SchemaModel`]).

pub mod raw;
pub mod validate;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::GenError;
use crate::model::*;
use raw::*;

/// Parse a metaModel JSON document into a [`SchemaModel`].
pub fn parse(schema_json: &str) -> Result<SchemaModel, GenError> {
    let raw: RawMetaModel = serde_json::from_str(schema_json)
        .map_err(|e| GenError::bad_schema("<root>", e.to_string()))?;
    let model = lower(raw)?;
    validate::validate_references(&model)?;
    Ok(model)
}

fn lower(raw: RawMetaModel) -> Result<SchemaModel, GenError> {
    let mut structs = BTreeMap::new();
    for item in raw.structures {
        let def = lower_structure(item)?;
        structs.insert(def.name.clone(), def);
    }

    let mut enums = BTreeMap::new();
    for item in raw.enumerations {
        let def = lower_enum(item)?;
        enums.insert(def.name.clone(), def);
    }

    let mut aliases = BTreeMap::new();
    for item in raw.type_aliases {
        let path = format!("typeAlias[{}]", item.name);
        let type_expr = parse_type_expr(&item.type_expr, &path)?;
        aliases.insert(
            item.name.clone(),
            AliasDef {
                name: item.name,
                type_expr,
                doc: lower_doc(item.doc),
            },
        );
    }

    let mut requests = Vec::with_capacity(raw.requests.len());
    for item in raw.requests {
        let path = format!("request[{}]", item.method);
        let params = item
            .params
            .as_ref()
            .map(|v| parse_type_expr(v, &format!("{path}.params")))
            .transpose()?;
        let result = item
            .result
            .as_ref()
            .map(|v| parse_type_expr(v, &format!("{path}.result")))
            .transpose()?;
        requests.push(RequestDef {
            method: item.method,
            type_name: item.type_name,
            params,
            result,
            doc: lower_doc(item.doc),
        });
    }

    let mut notifications = Vec::with_capacity(raw.notifications.len());
    for item in raw.notifications {
        let path = format!("notification[{}]", item.method);
        let params = item
            .params
            .as_ref()
            .map(|v| parse_type_expr(v, &format!("{path}.params")))
            .transpose()?;
        notifications.push(NotificationDef {
            method: item.method,
            type_name: item.type_name,
            params,
            doc: lower_doc(item.doc),
        });
    }

    Ok(SchemaModel {
        structs,
        enums,
        aliases,
        requests,
        notifications,
    })
}

fn lower_structure(item: RawStructure) -> Result<StructDef, GenError> {
    let mut parents = Vec::new();
    for entry in item.extends.iter().chain(item.mixins.iter()) {
        if entry.get("kind").and_then(Value::as_str) == Some("reference") {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    GenError::bad_schema(format!("structure[{}]", item.name), "extends/mixins reference missing name")
                })?;
            parents.push(name.to_string());
        }
    }

    let mut properties = Vec::with_capacity(item.properties.len());
    for prop in item.properties {
        let path = format!("structure[{}].{}", item.name, prop.name);
        let type_expr = parse_type_expr(&prop.type_expr, &path)?;
        properties.push(PropertyDef {
            name: prop.name,
            type_expr,
            optional: prop.optional,
            doc: lower_doc(prop.doc),
        });
    }

    Ok(StructDef {
        name: item.name.clone(),
        parents,
        properties,
        doc: lower_doc(item.doc),
    })
}

fn lower_enum(item: RawEnum) -> Result<EnumDef, GenError> {
    let path = format!("enumeration[{}]", item.name);
    let base_name = item
        .type_expr
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| GenError::bad_schema(&path, "enumeration type missing name"))?;
    let base_type = match base_name {
        "integer" => EnumBaseType::Integer,
        "uinteger" => EnumBaseType::Uinteger,
        "string" => EnumBaseType::String,
        other => {
            return Err(GenError::bad_schema(
                &path,
                format!("unsupported enumeration base type `{other}`"),
            ));
        }
    };

    let mut values = Vec::with_capacity(item.values.len());
    for value in item.values {
        let literal = match &value.value {
            Value::String(s) => EnumValueLiteral::String(s.clone()),
            Value::Number(n) => EnumValueLiteral::Integer(n.as_i64().ok_or_else(|| {
                GenError::bad_schema(&path, format!("enum value `{}` is not an integer", value.name))
            })?),
            other => {
                return Err(GenError::bad_schema(
                    &path,
                    format!("enum value `{}` has unsupported literal {other}", value.name),
                ));
            }
        };
        values.push(EnumValue {
            name: value.name,
            value: literal,
            doc: lower_doc(value.doc),
        });
    }

    Ok(EnumDef {
        name: item.name,
        base_type,
        values,
        supports_custom_values: item.supports_custom_values,
        doc: lower_doc(item.doc),
    })
}

fn lower_doc(raw: RawDoc) -> DocInfo {
    DocInfo {
        documentation: raw.documentation,
        since: raw.since,
        since_tags: raw.since_tags,
        deprecated: raw.deprecated,
        proposed: raw.proposed,
    }
}

/// Recursively interpret a raw JSON type expression as a [`TypeExpr`].
fn parse_type_expr(value: &Value, path: &str) -> Result<TypeExpr, GenError> {
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| GenError::bad_schema(path, "type expression missing `kind`"))?;

    match kind {
        "base" => {
            let name = require_str(value, "name", path)?;
            Ok(TypeExpr::Base(name.to_string()))
        }
        "reference" => {
            let name = require_str(value, "name", path)?;
            Ok(TypeExpr::Reference(name.to_string()))
        }
        "array" => {
            let element = value
                .get("element")
                .ok_or_else(|| GenError::bad_schema(path, "array type missing `element`"))?;
            let element = parse_type_expr(element, &format!("{path}.element"))?;
            Ok(TypeExpr::Array(Box::new(element)))
        }
        "map" => {
            let key = value
                .get("key")
                .ok_or_else(|| GenError::bad_schema(path, "map type missing `key`"))?;
            let value_ty = value
                .get("value")
                .ok_or_else(|| GenError::bad_schema(path, "map type missing `value`"))?;
            Ok(TypeExpr::Map {
                key: Box::new(parse_type_expr(key, &format!("{path}.key"))?),
                value: Box::new(parse_type_expr(value_ty, &format!("{path}.value"))?),
            })
        }
        "tuple" => {
            let items = parse_type_expr_list(value, "items", path)?;
            Ok(TypeExpr::Tuple(items))
        }
        "or" => {
            let items = parse_type_expr_list(value, "items", path)?;
            Ok(TypeExpr::Or(items))
        }
        "and" => {
            let items = parse_type_expr_list(value, "items", path)?;
            Ok(TypeExpr::And(items))
        }
        "literal" => Ok(TypeExpr::Literal),
        "stringLiteral" => {
            let v = value
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| GenError::bad_schema(path, "stringLiteral missing string `value`"))?;
            Ok(TypeExpr::StringLiteral(v.to_string()))
        }
        "integerLiteral" => {
            let v = value
                .get("value")
                .and_then(Value::as_i64)
                .ok_or_else(|| GenError::bad_schema(path, "integerLiteral missing integer `value`"))?;
            Ok(TypeExpr::IntegerLiteral(v))
        }
        "booleanLiteral" => {
            let v = value
                .get("value")
                .and_then(Value::as_bool)
                .ok_or_else(|| GenError::bad_schema(path, "booleanLiteral missing boolean `value`"))?;
            Ok(TypeExpr::BooleanLiteral(v))
        }
        other => Err(GenError::bad_schema(path, format!("unknown type expression kind `{other}`"))),
    }
}

fn parse_type_expr_list(value: &Value, field: &str, path: &str) -> Result<Vec<TypeExpr>, GenError> {
    let items = value
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| GenError::bad_schema(path, format!("missing `{field}` array")))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_type_expr(item, &format!("{path}.{field}[{i}]")))
        .collect()
}

fn require_str<'a>(value: &'a Value, field: &str, path: &str) -> Result<&'a str, GenError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| GenError::bad_schema(path, format!("missing `{field}`")))
}
