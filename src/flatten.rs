//! Expand single-parent structure chains and detect unsafe property
//! overrides.

use std::collections::HashSet;

use crate::diagnostics::Diagnostics;
use crate::model::*;

/// A property plus the struct it was originally declared in — needed so
/// the renderer can use the *declaring* struct as `current_struct` when
/// breaking self-recursion on an inherited field.
#[derive(Debug, Clone)]
pub struct FlattenedProperty {
    pub prop: PropertyDef,
    pub declared_in: String,
}

/// One position in a struct's emitted member list.
pub enum StructMember {
    /// A property inherited through single-parent flattening.
    Inherited { flat: FlattenedProperty, parent: String },
    /// A `flatten<Parent>` member, emitted once per structural parent of a
    /// multi-parent (mixin) struct.
    Flatten { parent: String },
    /// A property declared directly on this struct.
    Own { prop: PropertyDef },
}

/// Recursively collect a struct's flattened properties: the parent's
/// (already flattened) properties, in order, followed by nothing — callers
/// append the struct's own properties separately. Only followed through a
/// *single* struct-kind parent; multi-parent structs are not inlined here.
pub fn collect_flattened_properties(model: &SchemaModel, struct_name: &str) -> Vec<FlattenedProperty> {
    collect_flattened_properties_inner(model, struct_name, &mut HashSet::new())
}

fn collect_flattened_properties_inner(
    model: &SchemaModel,
    struct_name: &str,
    stack: &mut HashSet<String>,
) -> Vec<FlattenedProperty> {
    if !stack.insert(struct_name.to_string()) {
        return Vec::new();
    }

    let mut out = Vec::new();
    if let Some(def) = model.structs.get(struct_name) {
        if def.parents.len() == 1 && model.is_struct(&def.parents[0]) {
            out.extend(collect_flattened_properties_inner(model, &def.parents[0], stack));
        }
        for prop in &def.properties {
            out.push(FlattenedProperty {
                prop: prop.clone(),
                declared_in: struct_name.to_string(),
            });
        }
    }

    stack.remove(struct_name);
    out
}

/// Type `child` is a safe subtype of `parent` per spec §4.5.
pub fn is_safe_subtype(child: &TypeExpr, parent: &TypeExpr) -> bool {
    if child == parent {
        return true;
    }

    match parent {
        TypeExpr::Or(items) => items.iter().any(|item| is_safe_subtype(child, item)),
        _ => match child {
            TypeExpr::Or(items) => !items.is_empty() && items.iter().all(|item| is_safe_subtype(item, parent)),
            _ => is_safe_subtype_non_union(child, parent),
        },
    }
}

fn is_safe_subtype_non_union(child: &TypeExpr, parent: &TypeExpr) -> bool {
    match parent {
        TypeExpr::Base(name) => match (name.as_str(), child) {
            (_, TypeExpr::Base(n2)) => n2 == name,
            ("string", TypeExpr::StringLiteral(_)) => true,
            ("integer", TypeExpr::IntegerLiteral(_)) => true,
            ("uinteger", TypeExpr::IntegerLiteral(v)) => *v >= 0,
            ("boolean", TypeExpr::BooleanLiteral(_)) => true,
            _ => false,
        },
        TypeExpr::Array(p_elem) => match child {
            TypeExpr::Array(c_elem) => is_safe_subtype(c_elem, p_elem),
            _ => false,
        },
        TypeExpr::Map { key: pk, value: pv } => match child {
            TypeExpr::Map { key: ck, value: cv } => is_safe_subtype(ck, pk) && is_safe_subtype(cv, pv),
            _ => false,
        },
        TypeExpr::Tuple(p_items) => match child {
            TypeExpr::Tuple(c_items) => {
                p_items.len() == c_items.len()
                    && c_items.iter().zip(p_items).all(|(c, p)| is_safe_subtype(c, p))
            }
            _ => false,
        },
        _ => false,
    }
}

/// Whether `child_prop` safely overrides `parent_prop` (same declared
/// name, no optional-widening, safe subtype). Returns the failure reason
/// when unsafe.
fn is_safe_override(parent_prop: &PropertyDef, child_prop: &PropertyDef) -> Result<(), String> {
    if parent_prop.name != child_prop.name {
        return Err(format!(
            "member-name collision between `{}` and `{}`",
            parent_prop.name, child_prop.name
        ));
    }
    if child_prop.optional && !parent_prop.optional {
        return Err("child field is optional while parent field is required".to_string());
    }
    if !is_safe_subtype(&child_prop.type_expr, &parent_prop.type_expr) {
        return Err("child field type is not a safe subtype of parent field type".to_string());
    }
    Ok(())
}

/// Build the ordered member list for a struct: inherited/flatten members
/// first, then the struct's own properties. Raises an `UnsafeOverride`
/// diagnostic for every inherited property that a local property collides
/// with (by sanitized member name) without being a safe narrowing — both
/// members are kept in that case so the collision-renamer in the struct
/// emitter can disambiguate them.
pub fn collect_struct_members(model: &SchemaModel, struct_name: &str, diagnostics: &mut Diagnostics) -> Vec<StructMember> {
    use crate::ident::{camel_to_snake, sanitize_identifier};

    let def = &model.structs[struct_name];
    let mut members = Vec::new();

    if def.parents.len() == 1 && model.is_struct(&def.parents[0]) {
        let parent = &def.parents[0];
        let local_by_member_name: std::collections::HashMap<String, &PropertyDef> = def
            .properties
            .iter()
            .map(|p| (sanitize_identifier(&camel_to_snake(&p.name), "field").0, p))
            .collect();

        for flat in collect_flattened_properties(model, parent) {
            let inherited_member_name = sanitize_identifier(&camel_to_snake(&flat.prop.name), "field").0;
            if let Some(&local_prop) = local_by_member_name.get(&inherited_member_name) {
                match is_safe_override(&flat.prop, local_prop) {
                    Ok(()) => continue, // safe narrowing: drop the inherited member
                    Err(reason) => {
                        diagnostics.unsafe_override(
                            struct_name,
                            format!(
                                "inherited `{}` from `{}` conflicts with local `{}`; {}",
                                flat.prop.name, flat.declared_in, local_prop.name, reason
                            ),
                        );
                    }
                }
            }
            members.push(StructMember::Inherited {
                flat,
                parent: parent.clone(),
            });
        }
    } else if def.parents.len() > 1 {
        for parent in &def.parents {
            if model.is_struct(parent) {
                members.push(StructMember::Flatten { parent: parent.clone() });
            }
        }
    }

    for prop in &def.properties {
        members.push(StructMember::Own { prop: prop.clone() });
    }

    members
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, type_expr: TypeExpr, optional: bool) -> PropertyDef {
        PropertyDef {
            name: name.to_string(),
            type_expr,
            optional,
            doc: DocInfo::default(),
        }
    }

    #[test]
    fn reflexive_subtype() {
        let t = TypeExpr::Base("integer".into());
        assert!(is_safe_subtype(&t, &t));
    }

    #[test]
    fn string_widens_string_literal() {
        assert!(is_safe_subtype(&TypeExpr::StringLiteral("a".into()), &TypeExpr::Base("string".into())));
    }

    #[test]
    fn uinteger_rejects_negative_literal() {
        assert!(!is_safe_subtype(&TypeExpr::IntegerLiteral(-1), &TypeExpr::Base("uinteger".into())));
        assert!(is_safe_subtype(&TypeExpr::IntegerLiteral(1), &TypeExpr::Base("uinteger".into())));
    }

    #[test]
    fn unsafe_override_is_flagged_and_both_members_kept() {
        let mut model = SchemaModel::default();
        model.structs.insert(
            "Parent".into(),
            StructDef {
                name: "Parent".into(),
                parents: vec![],
                properties: vec![prop("id", TypeExpr::Base("integer".into()), false)],
                doc: DocInfo::default(),
            },
        );
        model.structs.insert(
            "Child".into(),
            StructDef {
                name: "Child".into(),
                parents: vec!["Parent".into()],
                properties: vec![prop("id", TypeExpr::Base("string".into()), false)],
                doc: DocInfo::default(),
            },
        );

        let mut diags = Diagnostics::new();
        let members = collect_struct_members(&model, "Child", &mut diags);
        assert_eq!(diags.len(), 1);
        // Both the inherited and local `id` are kept; the local one follows
        // the inherited one in emission order (inherited-first, then own).
        let names: Vec<&str> = members
            .iter()
            .map(|m| match m {
                StructMember::Inherited { flat, .. } => flat.prop.name.as_str(),
                StructMember::Own { prop } => prop.name.as_str(),
                StructMember::Flatten { parent } => parent.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["id", "id"]);
    }

    #[test]
    fn safe_override_drops_inherited_member() {
        let mut model = SchemaModel::default();
        model.structs.insert(
            "Parent".into(),
            StructDef {
                name: "Parent".into(),
                parents: vec![],
                properties: vec![prop("kind", TypeExpr::Base("string".into()), false)],
                doc: DocInfo::default(),
            },
        );
        model.structs.insert(
            "Child".into(),
            StructDef {
                name: "Child".into(),
                parents: vec!["Parent".into()],
                properties: vec![prop("kind", TypeExpr::StringLiteral("x".into()), false)],
                doc: DocInfo::default(),
            },
        );
        let mut diags = Diagnostics::new();
        let members = collect_struct_members(&model, "Child", &mut diags);
        assert!(diags.is_empty());
        assert_eq!(members.len(), 1);
    }
}
