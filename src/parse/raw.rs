//! serde-derived structs mirroring the metaModel JSON shape verbatim.
//!
//! Type expressions are kept as raw [`serde_json::Value`] here rather than a
//! typed enum: the JSON `kind` discriminant reuses the field name `value`
//! for three structurally different things (a map's value type, a literal's
//! value object, a string/integer/boolean literal's scalar value), which
//! doesn't fit a single serde-derived shape. [`super::lower`] interprets
//! the `Value` recursively into [`crate::model::TypeExpr`].

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawMetaModel {
    #[serde(default)]
    pub structures: Vec<RawStructure>,
    #[serde(default)]
    pub enumerations: Vec<RawEnum>,
    #[serde(default, rename = "typeAliases")]
    pub type_aliases: Vec<RawTypeAlias>,
    #[serde(default)]
    pub requests: Vec<RawRequest>,
    #[serde(default)]
    pub notifications: Vec<RawNotification>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStructure {
    pub name: String,
    #[serde(flatten)]
    pub doc: RawDoc,
    #[serde(default)]
    pub extends: Vec<Value>,
    #[serde(default)]
    pub mixins: Vec<Value>,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: Value,
    #[serde(default)]
    pub optional: bool,
    #[serde(flatten)]
    pub doc: RawDoc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnum {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: Value,
    #[serde(default)]
    pub values: Vec<RawEnumValue>,
    #[serde(default, rename = "supportsCustomValues")]
    pub supports_custom_values: bool,
    #[serde(flatten)]
    pub doc: RawDoc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnumValue {
    pub name: String,
    pub value: Value,
    #[serde(flatten)]
    pub doc: RawDoc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTypeAlias {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: Value,
    #[serde(flatten)]
    pub doc: RawDoc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRequest {
    pub method: String,
    #[serde(default, rename = "typeName")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(flatten)]
    pub doc: RawDoc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNotification {
    pub method: String,
    #[serde(default, rename = "typeName")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(flatten)]
    pub doc: RawDoc,
}

/// The doc fields shared by structures, properties, enums, enum values,
/// aliases, requests, and notifications. Flattened into each owner struct.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDoc {
    pub documentation: Option<String>,
    pub since: Option<String>,
    #[serde(default, rename = "sinceTags")]
    pub since_tags: Vec<String>,
    pub deprecated: Option<String>,
    #[serde(default)]
    pub proposed: bool,
}
