//! Map a schema [`TypeExpr`] to a target C++ type string.
//!
//! `render_type` is a pure function of `(type_expr, owner_path, current_struct)`:
//! `current_struct` lets self-references break into a heap indirection,
//! `owner_path` is carried through recursive calls purely for diagnostic
//! context (this renderer never fails — every shape it can see was already
//! validated during parsing).

use std::collections::{HashMap, HashSet};

use crate::model::*;
use crate::namemap::NameMap;

pub struct Renderer<'a> {
    model: &'a SchemaModel,
    names: &'a NameMap,
    closed_string_enums: HashSet<&'a str>,
    /// literal text -> the one closed string enum it uniquely belongs to.
    literal_owner: HashMap<String, &'a str>,
}

impl<'a> Renderer<'a> {
    pub fn new(model: &'a SchemaModel, names: &'a NameMap) -> Self {
        let closed_string_enums: HashSet<&str> = model
            .enums
            .values()
            .filter(|e| e.is_closed_string_enum())
            .map(|e| e.name.as_str())
            .collect();

        let mut candidates: HashMap<String, HashSet<&str>> = HashMap::new();
        for &enum_name in &closed_string_enums {
            let enum_def = &model.enums[enum_name];
            for value in &enum_def.values {
                candidates
                    .entry(value.value.as_string())
                    .or_default()
                    .insert(enum_name);
            }
        }
        let literal_owner = candidates
            .into_iter()
            .filter(|(_, owners)| owners.len() == 1)
            .map(|(literal, owners)| (literal, *owners.iter().next().unwrap()))
            .collect();

        Renderer {
            model,
            names,
            closed_string_enums,
            literal_owner,
        }
    }

    pub fn is_closed_string_enum(&self, name: &str) -> bool {
        self.closed_string_enums.contains(name)
    }

    /// The unique closed string enum that owns `literal`, if any.
    pub fn unique_owner_enum(&self, literal: &str) -> Option<&'a str> {
        self.literal_owner.get(literal).copied()
    }

    pub fn render_type(&self, expr: &TypeExpr, owner_path: &str, current_struct: Option<&str>) -> String {
        match expr {
            TypeExpr::Base(name) => name.clone(),
            TypeExpr::Reference(name) => {
                if current_struct == Some(name.as_str()) {
                    format!("shared_handle<{}>", self.names.get(name))
                } else if self.closed_string_enums.contains(name.as_str()) {
                    format!("enum_string<{}>", self.names.get(name))
                } else {
                    self.names.get(name)
                }
            }
            TypeExpr::Array(element) => {
                format!(
                    "sequence<{}>",
                    self.render_type(element, &format!("{owner_path}.element"), current_struct)
                )
            }
            TypeExpr::Map { key, value } => {
                format!(
                    "ordered_map<{}, {}>",
                    self.render_type(key, &format!("{owner_path}.key"), current_struct),
                    self.render_type(value, &format!("{owner_path}.value"), current_struct),
                )
            }
            TypeExpr::Tuple(items) => {
                if items.is_empty() {
                    "tuple<>".to_string()
                } else {
                    let rendered: Vec<String> = items
                        .iter()
                        .map(|item| self.render_type(item, &format!("{owner_path}.tuple_item"), current_struct))
                        .collect();
                    format!("tuple<{}>", rendered.join(", "))
                }
            }
            TypeExpr::And(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| self.render_type(item, &format!("{owner_path}.and_item"), current_struct))
                    .collect();
                if rendered.len() == 1 {
                    rendered.into_iter().next().unwrap()
                } else {
                    format!("tuple<{}>", rendered.join(", "))
                }
            }
            TypeExpr::Or(items) => self.render_or(items, owner_path, current_struct),
            TypeExpr::Literal => "LspEmptyObject".to_string(),
            TypeExpr::StringLiteral(value) => match self.unique_owner_enum(value) {
                Some(owner_enum) => format!("enum_string<{}>", self.names.get(owner_enum)),
                None => "string".to_string(),
            },
            TypeExpr::IntegerLiteral(_) => "integer".to_string(),
            TypeExpr::BooleanLiteral(_) => "boolean".to_string(),
        }
    }

    fn render_or(&self, items: &[TypeExpr], owner_path: &str, current_struct: Option<&str>) -> String {
        let mut saw_null = false;
        let mut rendered: Vec<String> = Vec::new();
        for item in items {
            if matches!(item, TypeExpr::Base(name) if name == "null") {
                saw_null = true;
                continue;
            }
            rendered.push(self.render_type(item, &format!("{owner_path}.or_item"), current_struct));
        }

        let mut unique: Vec<String> = Vec::new();
        for item in rendered {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }

        if saw_null && unique.len() == 1 {
            return format!("nullable<{}>", unique[0]);
        }
        if saw_null {
            unique.insert(0, "null".to_string());
        }

        match unique.len() {
            0 => "null".to_string(),
            1 => unique.into_iter().next().unwrap(),
            _ => format!("variant<{}>", unique.join(", ")),
        }
    }

    pub fn model(&self) -> &'a SchemaModel {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_def(name: &str, values: &[&str]) -> EnumDef {
        EnumDef {
            name: name.to_string(),
            base_type: EnumBaseType::String,
            values: values
                .iter()
                .map(|v| EnumValue {
                    name: v.to_string(),
                    value: EnumValueLiteral::String(v.to_string()),
                    doc: DocInfo::default(),
                })
                .collect(),
            supports_custom_values: false,
            doc: DocInfo::default(),
        }
    }

    #[test]
    fn nullable_vs_variant() {
        let model = SchemaModel::default();
        let names = NameMap::build(Vec::<String>::new());
        let r = Renderer::new(&model, &names);

        let nullable = TypeExpr::Or(vec![TypeExpr::Base("integer".into()), TypeExpr::Base("null".into())]);
        assert_eq!(r.render_type(&nullable, "x", None), "nullable<integer>");

        let three_way = TypeExpr::Or(vec![
            TypeExpr::Base("integer".into()),
            TypeExpr::Base("string".into()),
            TypeExpr::Base("null".into()),
        ]);
        assert_eq!(r.render_type(&three_way, "x", None), "variant<null, integer, string>");

        let two_way_no_null = TypeExpr::Or(vec![TypeExpr::Base("integer".into()), TypeExpr::Base("string".into())]);
        assert_eq!(r.render_type(&two_way_no_null, "x", None), "variant<integer, string>");
    }

    #[test]
    fn self_reference_uses_shared_handle() {
        let mut model = SchemaModel::default();
        model.structs.insert(
            "Node".into(),
            StructDef {
                name: "Node".into(),
                parents: vec![],
                properties: vec![],
                doc: DocInfo::default(),
            },
        );
        let names = NameMap::build(["Node".to_string()]);
        let r = Renderer::new(&model, &names);
        let children = TypeExpr::Array(Box::new(TypeExpr::Reference("Node".into())));
        assert_eq!(r.render_type(&children, "Node.children", Some("Node")), "sequence<shared_handle<Node>>");
    }

    #[test]
    fn unique_owner_literal_folds_to_enum_string() {
        let mut model = SchemaModel::default();
        model.enums.insert("Kind".into(), enum_def("Kind", &["a", "b"]));
        let names = NameMap::build(["Kind".to_string()]);
        let r = Renderer::new(&model, &names);
        let lit = TypeExpr::StringLiteral("a".into());
        assert_eq!(r.render_type(&lit, "x", None), "enum_string<Kind>");
        let other = TypeExpr::StringLiteral("zzz".into());
        assert_eq!(r.render_type(&other, "x", None), "string");
    }

    #[test]
    fn overlapping_literal_disables_folding() {
        let mut model = SchemaModel::default();
        model.enums.insert("A".into(), enum_def("A", &["shared"]));
        model.enums.insert("B".into(), enum_def("B", &["shared"]));
        let names = NameMap::build(["A".to_string(), "B".to_string()]);
        let r = Renderer::new(&model, &names);
        assert_eq!(r.unique_owner_enum("shared"), None);
    }
}
