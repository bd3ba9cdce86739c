//! Cross-reference resolution check: every [`TypeExpr::Reference`] reachable
//! from the lowered IR must name a struct, enum, or alias that actually
//! exists in the schema (§3's "every reference name... must resolve"
//! invariant; §7 lists an unresolved reference as a fatal `BadSchema`).

use crate::error::GenError;
use crate::model::*;

/// Walk the whole model and fail on the first dangling reference.
pub fn validate_references(model: &SchemaModel) -> Result<(), GenError> {
    for (name, def) in &model.structs {
        for parent in &def.parents {
            check_name(model, parent, &format!("structure[{name}].extends/mixins"))?;
        }
        for prop in &def.properties {
            check_expr(model, &prop.type_expr, &format!("structure[{name}].{}", prop.name))?;
        }
    }
    for (name, def) in &model.aliases {
        check_expr(model, &def.type_expr, &format!("typeAlias[{name}]"))?;
    }
    for req in &model.requests {
        if let Some(expr) = &req.params {
            check_expr(model, expr, &format!("request[{}].params", req.method))?;
        }
        if let Some(expr) = &req.result {
            check_expr(model, expr, &format!("request[{}].result", req.method))?;
        }
    }
    for notif in &model.notifications {
        if let Some(expr) = &notif.params {
            check_expr(model, expr, &format!("notification[{}].params", notif.method))?;
        }
    }
    Ok(())
}

fn check_name(model: &SchemaModel, name: &str, path: &str) -> Result<(), GenError> {
    if is_recursive_alias(name) || model.is_struct(name) || model.is_enum(name) || model.is_alias(name) {
        Ok(())
    } else {
        Err(GenError::bad_schema(path, format!("reference to undeclared name `{name}`")))
    }
}

fn check_expr(model: &SchemaModel, expr: &TypeExpr, path: &str) -> Result<(), GenError> {
    match expr {
        TypeExpr::Base(_) | TypeExpr::Literal | TypeExpr::StringLiteral(_) | TypeExpr::IntegerLiteral(_) | TypeExpr::BooleanLiteral(_) => Ok(()),
        TypeExpr::Reference(name) => check_name(model, name, path),
        TypeExpr::Array(elem) => check_expr(model, elem, path),
        TypeExpr::Map { key, value } => {
            check_expr(model, key, path)?;
            check_expr(model, value, path)
        }
        TypeExpr::Tuple(items) | TypeExpr::Or(items) | TypeExpr::And(items) => {
            for item in items {
                check_expr(model, item, path)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_reference_is_a_bad_schema_error() {
        let mut model = SchemaModel::default();
        model.structs.insert(
            "X".into(),
            StructDef {
                name: "X".into(),
                parents: vec![],
                properties: vec![PropertyDef {
                    name: "y".into(),
                    type_expr: TypeExpr::Reference("Missing".into()),
                    optional: false,
                    doc: DocInfo::default(),
                }],
                doc: DocInfo::default(),
            },
        );
        assert!(matches!(validate_references(&model), Err(GenError::BadSchema { .. })));
    }

    #[test]
    fn recursive_alias_references_are_always_valid() {
        let mut model = SchemaModel::default();
        model.structs.insert(
            "X".into(),
            StructDef {
                name: "X".into(),
                parents: vec![],
                properties: vec![PropertyDef {
                    name: "any".into(),
                    type_expr: TypeExpr::Reference("LSPAny".into()),
                    optional: false,
                    doc: DocInfo::default(),
                }],
                doc: DocInfo::default(),
            },
        );
        assert!(validate_references(&model).is_ok());
    }
}
